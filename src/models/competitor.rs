//! Competitor and CompetitorStatus data structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a competitor (used in pools, matches and bracket nodes).
pub type CompetitorId = Uuid;

/// Whether a competitor is still taking part.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitorStatus {
    #[default]
    Active,
    Withdrawn,
    Forfeited,
}

/// A fencer on the roster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    pub club: Option<String>,
    pub league: Option<String>,
    pub nation: Option<String>,
    /// Prior ranking; 1 is the strongest. Unseeded competitors sort after every seeded one.
    pub seed: Option<u32>,
    pub status: CompetitorStatus,
}

impl Competitor {
    /// Create an active, unseeded competitor with no grouping attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            club: None,
            league: None,
            nation: None,
            seed: None,
            status: CompetitorStatus::Active,
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_club(mut self, club: impl Into<String>) -> Self {
        self.club = Some(club.into());
        self
    }

    pub fn with_league(mut self, league: impl Into<String>) -> Self {
        self.league = Some(league.into());
        self
    }

    pub fn with_nation(mut self, nation: impl Into<String>) -> Self {
        self.nation = Some(nation.into());
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == CompetitorStatus::Active
    }

    /// Mark the competitor as withdrawn. Identity is unchanged.
    pub fn withdraw(&mut self) {
        self.status = CompetitorStatus::Withdrawn;
    }

    /// Mark the competitor as having forfeited the rest of the event.
    pub fn forfeit(&mut self) {
        self.status = CompetitorStatus::Forfeited;
    }

    /// Sort key for seed order: seeded first by seed, then unseeded.
    pub fn seed_key(&self) -> (bool, u32) {
        match self.seed {
            Some(s) => (false, s),
            None => (true, 0),
        }
    }
}

/// Trimmed text, or `None` when nothing is left.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
