//! Pool: a round-robin group of competitors, its bouts and its current ranking.

use crate::models::bout::{Match, MatchId};
use crate::models::competitor::{Competitor, CompetitorId};
use crate::models::ranking::PoolRankingEntry;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    /// 1-based pool number as shown on the pool sheet.
    pub number: usize,
    /// Fixed once the pool is drawn; order is the serpentine seed order.
    pub competitors: Vec<Competitor>,
    pub matches: Vec<Match>,
    /// Derived from `matches`; recomputed after every score entry.
    pub ranking: Vec<PoolRankingEntry>,
}

impl Pool {
    pub fn new(number: usize, competitors: Vec<Competitor>) -> Self {
        Self {
            number,
            competitors,
            matches: Vec::new(),
            ranking: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.competitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.competitors.is_empty()
    }

    /// Row/column position of a competitor on the pool sheet.
    pub fn position_of(&self, id: CompetitorId) -> Option<usize> {
        self.competitors.iter().position(|c| c.id == id)
    }

    pub fn contains(&self, id: CompetitorId) -> bool {
        self.position_of(id).is_some()
    }

    pub fn get_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    pub fn finished_matches(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(|m| m.is_finished())
    }

    /// Every bout has been fenced.
    pub fn is_complete(&self) -> bool {
        !self.matches.is_empty() && self.matches.iter().all(Match::is_finished)
    }
}

/// Grouping attribute two pool-mates share.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingAttribute {
    Club,
    League,
    Nation,
}

/// Two competitors sharing a separated attribute left in the same pool.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeparationConflict {
    pub pool: usize,
    pub first: CompetitorId,
    pub second: CompetitorId,
    pub attribute: GroupingAttribute,
}
