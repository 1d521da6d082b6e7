//! Tournament configuration: pool size bounds, separation rules, ranking mode, elimination format.

use serde::{Deserialize, Serialize};

fn default_min_pool_size() -> usize {
    5
}

fn default_max_pool_size() -> usize {
    7
}

/// Inclusive pool size bounds.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PoolBounds {
    #[serde(default = "default_min_pool_size")]
    pub min: usize,
    #[serde(default = "default_max_pool_size")]
    pub max: usize,
}

impl Default for PoolBounds {
    fn default() -> Self {
        Self {
            min: default_min_pool_size(),
            max: default_max_pool_size(),
        }
    }
}

impl PoolBounds {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, size: usize) -> bool {
        (self.min..=self.max).contains(&size)
    }
}

fn default_true() -> bool {
    true
}

/// Which grouping attributes must not meet inside one pool.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Separation {
    #[serde(default = "default_true")]
    pub by_club: bool,
    #[serde(default)]
    pub by_league: bool,
    #[serde(default)]
    pub by_nation: bool,
}

impl Default for Separation {
    fn default() -> Self {
        Self {
            by_club: true,
            by_league: false,
            by_nation: false,
        }
    }
}

impl Separation {
    pub fn none() -> Self {
        Self {
            by_club: false,
            by_league: false,
            by_nation: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.by_club || self.by_league || self.by_nation)
    }
}

/// Points for a bout decided by at least `min_margin` touches.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MarginBucket {
    pub min_margin: u32,
    pub points: u32,
}

impl MarginBucket {
    pub fn new(min_margin: u32, points: u32) -> Self {
        Self { min_margin, points }
    }
}

/// Point policy for the "Quest" ranking. The bucket with the largest `min_margin` not above the
/// bout's margin applies; a margin below every bucket scores 0.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct QuestPoints {
    pub victory: Vec<MarginBucket>,
    pub defeat: Vec<MarginBucket>,
    #[serde(default)]
    pub draw: u32,
}

impl Default for QuestPoints {
    fn default() -> Self {
        Self {
            victory: vec![
                MarginBucket::new(1, 3),
                MarginBucket::new(3, 4),
                MarginBucket::new(5, 5),
            ],
            defeat: vec![MarginBucket::new(1, 1), MarginBucket::new(3, 0)],
            draw: 2,
        }
    }
}

impl QuestPoints {
    pub fn victory_points(&self, margin: u32) -> u32 {
        bucket_points(&self.victory, margin)
    }

    pub fn defeat_points(&self, margin: u32) -> u32 {
        bucket_points(&self.defeat, margin)
    }
}

fn bucket_points(buckets: &[MarginBucket], margin: u32) -> u32 {
    buckets
        .iter()
        .filter(|b| b.min_margin <= margin)
        .max_by_key(|b| b.min_margin)
        .map(|b| b.points)
        .unwrap_or(0)
}

/// How pool rankings are ordered.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "points")]
pub enum RankingMode {
    /// Victories, then index, then touches scored.
    #[default]
    Standard,
    /// Points from victory-margin buckets, then index, then touches scored.
    Quest(QuestPoints),
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationFormat {
    #[default]
    Single,
    Double,
}

/// Everything a tournament needs decided before the pools are drawn.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    #[serde(default)]
    pub pool_bounds: PoolBounds,
    #[serde(default)]
    pub separation: Separation,
    #[serde(default)]
    pub ranking_mode: RankingMode,
    #[serde(default)]
    pub elimination: EliminationFormat,
    /// How many competitors of the overall ranking go on to the bracket. `None` keeps everyone.
    #[serde(default)]
    pub qualifiers: Option<usize>,
    /// Seed for drawing lots among unseeded competitors. `None` keeps roster order.
    #[serde(default)]
    pub draw_seed: Option<u64>,
}
