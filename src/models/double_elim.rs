//! Double-elimination bracket: winners and losers brackets converging on a grand final.

use crate::models::bout::{Match, Side};
use crate::models::bracket::NodeId;
use crate::models::competitor::CompetitorId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketTag {
    Winners,
    Losers,
    Final,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    #[default]
    Pending,
    InProgress,
    Complete,
}

/// What currently occupies one side of a node.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "competitor")]
pub enum Slot {
    /// The feeding node has not resolved yet.
    #[default]
    Awaiting,
    Filled(CompetitorId),
    /// The feeding node resolved without producing anyone (bye or empty branch).
    Empty,
}

impl Slot {
    pub fn competitor(self) -> Option<CompetitorId> {
        match self {
            Slot::Filled(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_resolved(self) -> bool {
        self != Slot::Awaiting
    }
}

/// Where a result goes: a node and the side it fills there.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub node: NodeId,
    pub side: Side,
}

impl Route {
    pub fn new(node: NodeId, side: Side) -> Self {
        Self { node, side }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeBracketNode {
    pub id: NodeId,
    pub tag: BracketTag,
    /// Round within its own bracket, starting at 1. The reset final is round 2 of `Final`.
    pub round: u32,
    pub position: usize,
    pub slots: [Slot; 2],
    pub winner_to: Option<Route>,
    /// Fixed when the bracket is generated. `None` in the losers bracket (elimination) and finals.
    pub loser_to: Option<Route>,
    pub state: NodeState,
    pub is_bye: bool,
    pub bout: Option<Match>,
    pub winner: Option<CompetitorId>,
    pub loser: Option<CompetitorId>,
}

impl DeBracketNode {
    pub(crate) fn new(id: NodeId, tag: BracketTag, round: u32, position: usize) -> Self {
        Self {
            id,
            tag,
            round,
            position,
            slots: [Slot::Awaiting; 2],
            winner_to: None,
            loser_to: None,
            state: NodeState::Pending,
            is_bye: false,
            bout: None,
            winner: None,
            loser: None,
        }
    }

    /// Both sides are filled and the bout has not been decided.
    pub fn is_ready(&self) -> bool {
        self.state != NodeState::Complete && self.bout.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeBracket {
    pub size: usize,
    pub winners_rounds: u32,
    pub losers_rounds: u32,
    /// Competitors in seed order (index 0 is seed 1).
    pub seeds: Vec<CompetitorId>,
    pub nodes: Vec<DeBracketNode>,
    pub grand_final: NodeId,
    /// Created only when the losers-bracket champion wins the first grand final.
    pub reset: Option<NodeId>,
    pub champion: Option<CompetitorId>,
    pub runner_up: Option<CompetitorId>,
}

impl DeBracket {
    pub fn get(&self, id: NodeId) -> Option<&DeBracketNode> {
        self.nodes.get(id)
    }

    pub fn is_complete(&self) -> bool {
        self.champion.is_some()
    }

    pub fn nodes_in(&self, tag: BracketTag) -> impl Iterator<Item = &DeBracketNode> {
        self.nodes.iter().filter(move |n| n.tag == tag)
    }

    /// Nodes with both competitors known and no result yet.
    pub fn ready_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.is_ready())
            .map(|n| n.id)
            .collect()
    }
}
