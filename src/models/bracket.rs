//! Single-elimination bracket: nodes stored as a binary tree rooted at the final.

use crate::models::bout::{Match, Side};
use crate::models::competitor::CompetitorId;
use serde::{Deserialize, Serialize};

/// Index of a node inside its bracket's node list.
pub type NodeId = usize;

/// One table slot (a bout, or a bye) of the elimination bracket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BracketNode {
    pub id: NodeId,
    /// 1 = first round; the final has the highest round number.
    pub round: u32,
    /// 0-based position within the round, top of the table first.
    pub position: usize,
    pub competitors: [Option<CompetitorId>; 2],
    /// Node whose winner fills each side. `None` in the first round.
    pub feeders: [Option<NodeId>; 2],
    /// Node this node's winner moves on to, and on which side. `None` for the final.
    pub next: Option<(NodeId, Side)>,
    pub is_bye: bool,
    /// Present once both sides are known and a bout is required.
    pub bout: Option<Match>,
    pub winner: Option<CompetitorId>,
}

impl BracketNode {
    pub fn is_complete(&self) -> bool {
        self.winner.is_some()
    }

    pub fn loser(&self) -> Option<CompetitorId> {
        let winner = self.winner?;
        self.competitors
            .iter()
            .flatten()
            .copied()
            .find(|c| *c != winner)
    }
}

/// A generated single-elimination bracket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    /// Power of two, at least 2.
    pub size: usize,
    pub rounds: u32,
    pub bye_count: usize,
    /// Competitors in seed order (index 0 is seed 1).
    pub seeds: Vec<CompetitorId>,
    /// Node 0 is the final; node k is fed by nodes 2k+1 and 2k+2.
    pub nodes: Vec<BracketNode>,
}

impl Bracket {
    pub fn get(&self, id: NodeId) -> Option<&BracketNode> {
        self.nodes.get(id)
    }

    pub fn round(&self, round: u32) -> impl Iterator<Item = &BracketNode> {
        self.nodes.iter().filter(move |n| n.round == round)
    }

    pub fn champion(&self) -> Option<CompetitorId> {
        self.nodes.first().and_then(|n| n.winner)
    }

    pub fn is_complete(&self) -> bool {
        self.champion().is_some()
    }

    /// 1-based seed of a competitor.
    pub fn seed_of(&self, id: CompetitorId) -> Option<usize> {
        self.seeds.iter().position(|c| *c == id).map(|i| i + 1)
    }
}
