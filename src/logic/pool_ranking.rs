//! Pool ranking: per-competitor statistics over finished bouts, ordered by a pluggable key.

use crate::models::{
    MatchId, Pool, PoolRankingEntry, QuestPoints, RankingMode, Side, TournamentError,
};
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoutOutcome {
    Victory,
    Defeat,
    Draw,
}

/// One finished bout from one competitor's point of view.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BoutResult {
    pub scored: u32,
    pub received: u32,
    pub outcome: BoutOutcome,
}

impl BoutResult {
    pub fn margin(&self) -> u32 {
        self.scored.abs_diff(self.received)
    }
}

/// Decides how ranking lines are ordered. Statistics are gathered the same way for every key;
/// a key only adds optional per-bout points and the comparison.
pub trait RankingKey {
    /// Whether finished bouts without a winner may be ranked.
    fn accepts_draws(&self) -> bool {
        false
    }

    /// Whether `bout_points` contributes to `PoolRankingEntry::points`.
    fn scores_points(&self) -> bool {
        false
    }

    fn bout_points(&self, _result: &BoutResult) -> u32 {
        0
    }

    /// `Less` means `a` ranks above `b`. Equal lines keep pool order.
    fn compare(&self, a: &PoolRankingEntry, b: &PoolRankingEntry) -> Ordering;
}

/// Victories, then index, then touches scored.
#[derive(Clone, Copy, Debug, Default)]
pub struct VictoriesKey;

impl RankingKey for VictoriesKey {
    fn compare(&self, a: &PoolRankingEntry, b: &PoolRankingEntry) -> Ordering {
        b.victories
            .cmp(&a.victories)
            .then_with(|| b.index.cmp(&a.index))
            .then_with(|| b.touches_scored.cmp(&a.touches_scored))
    }
}

/// Points from victory-margin buckets, then index, then touches scored.
#[derive(Clone, Debug)]
pub struct QuestKey<'a> {
    pub points: &'a QuestPoints,
}

impl RankingKey for QuestKey<'_> {
    fn accepts_draws(&self) -> bool {
        true
    }

    fn scores_points(&self) -> bool {
        true
    }

    fn bout_points(&self, result: &BoutResult) -> u32 {
        match result.outcome {
            BoutOutcome::Victory => self.points.victory_points(result.margin()),
            BoutOutcome::Defeat => self.points.defeat_points(result.margin()),
            BoutOutcome::Draw => self.points.draw,
        }
    }

    fn compare(&self, a: &PoolRankingEntry, b: &PoolRankingEntry) -> Ordering {
        b.points
            .cmp(&a.points)
            .then_with(|| b.index.cmp(&a.index))
            .then_with(|| b.touches_scored.cmp(&a.touches_scored))
    }
}

impl RankingMode {
    pub fn key(&self) -> Box<dyn RankingKey + '_> {
        match self {
            RankingMode::Standard => Box::new(VictoriesKey),
            RankingMode::Quest(points) => Box::new(QuestKey { points }),
        }
    }
}

/// Rank a pool in the given mode. Only finished bouts count, so a pool still being fenced
/// ranks on what has been fenced so far.
pub fn compute_pool_ranking(
    pool: &Pool,
    mode: &RankingMode,
) -> Result<Vec<PoolRankingEntry>, TournamentError> {
    compute_pool_ranking_with(pool, mode.key().as_ref())
}

/// Rank a pool with any ranking key.
pub fn compute_pool_ranking_with(
    pool: &Pool,
    key: &dyn RankingKey,
) -> Result<Vec<PoolRankingEntry>, TournamentError> {
    let mut entries = pool_statistics(pool, key)?;
    // Stable sort: lines the key cannot separate keep pool (seed) order.
    entries.sort_by(|a, b| key.compare(a, b));
    for (i, e) in entries.iter_mut().enumerate() {
        e.rank = i as u32 + 1;
    }
    Ok(entries)
}

/// Unsorted statistics, one line per competitor in pool order. Any finished bout without
/// exactly one winner (or a draw the key does not accept) fails the whole pool.
pub fn pool_statistics(
    pool: &Pool,
    key: &dyn RankingKey,
) -> Result<Vec<PoolRankingEntry>, TournamentError> {
    let mut entries: Vec<PoolRankingEntry> = pool
        .competitors
        .iter()
        .map(|c| {
            let mut e = PoolRankingEntry::new(c.id, c.name.clone(), pool.number);
            if key.scores_points() {
                e.points = Some(0);
            }
            e
        })
        .collect();

    for m in pool.finished_matches() {
        let winner = m.outcome()?;
        if winner.is_none() && !key.accepts_draws() {
            return Err(TournamentError::InvalidScoreState(m.id));
        }
        let (Some(score_a), Some(score_b)) = (m.score_a, m.score_b) else {
            return Err(TournamentError::InvalidScoreState(m.id));
        };
        for side in [Side::A, Side::B] {
            let id = m.competitor(side);
            let pos = pool
                .position_of(id)
                .ok_or(TournamentError::CompetitorNotFound(id))?;
            let (own, other) = match side {
                Side::A => (score_a, score_b),
                Side::B => (score_b, score_a),
            };
            let result = BoutResult {
                scored: own.touches,
                received: other.touches,
                outcome: match winner {
                    Some(w) if w == side => BoutOutcome::Victory,
                    Some(_) => BoutOutcome::Defeat,
                    None => BoutOutcome::Draw,
                },
            };
            let e = &mut entries[pos];
            match result.outcome {
                BoutOutcome::Victory => e.victories += 1,
                BoutOutcome::Defeat => e.defeats += 1,
                BoutOutcome::Draw => e.draws += 1,
            }
            add_checked(&mut e.touches_scored, result.scored, m.id)?;
            add_checked(&mut e.touches_received, result.received, m.id)?;
            if let Some(points) = e.points.as_mut() {
                add_checked(points, key.bout_points(&result), m.id)?;
            }
        }
    }

    for e in &mut entries {
        e.update_derived();
    }
    Ok(entries)
}

/// Totals that no longer fit are a score-sheet error, not a panic.
fn add_checked(total: &mut u32, value: u32, bout: MatchId) -> Result<(), TournamentError> {
    *total = total
        .checked_add(value)
        .ok_or(TournamentError::InvalidScoreState(bout))?;
    Ok(())
}
