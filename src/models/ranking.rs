//! Ranking rows for pools, the overall ranking and final placements.

use crate::models::competitor::CompetitorId;
use serde::{Deserialize, Serialize};

/// One competitor's line in a pool (or overall) ranking.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolRankingEntry {
    pub competitor: CompetitorId,
    pub name: String,
    /// 1-based; ranks are unique within one ranking.
    pub rank: u32,
    pub victories: u32,
    pub defeats: u32,
    /// Only non-zero in ranking modes that accept drawn bouts.
    pub draws: u32,
    pub touches_scored: u32,
    pub touches_received: u32,
    /// touches_scored - touches_received
    pub index: i64,
    /// victories / bouts fenced, 0 when nothing has been fenced.
    pub ratio: f64,
    /// Points total for points-based ranking keys.
    pub points: Option<u32>,
    /// Pool number the line comes from.
    pub pool: usize,
}

impl PoolRankingEntry {
    pub fn new(competitor: CompetitorId, name: impl Into<String>, pool: usize) -> Self {
        Self {
            competitor,
            name: name.into(),
            pool,
            ..Self::default()
        }
    }

    pub fn bouts(&self) -> u32 {
        self.victories + self.defeats + self.draws
    }

    /// Refresh `index` and `ratio` from the counters.
    pub fn update_derived(&mut self) {
        self.index = i64::from(self.touches_scored) - i64::from(self.touches_received);
        let bouts = self.bouts();
        self.ratio = if bouts == 0 {
            0.0
        } else {
            f64::from(self.victories) / f64::from(bouts)
        };
    }
}

/// Final placement after an elimination bracket. Tied placements share a rank.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FinalPlacement {
    pub competitor: CompetitorId,
    pub rank: u32,
}
