//! Overall ranking across all pools of a round, used to seed the next stage.

use crate::logic::pool_ranking::pool_statistics;
use crate::models::{
    Competitor, CompetitorId, Pool, PoolRankingEntry, RankingMode, TournamentError,
};
use std::cmp::Ordering;

/// Merge every pool into one ranking. Statistics follow the standard mode.
pub fn compute_overall_ranking(pools: &[Pool]) -> Result<Vec<PoolRankingEntry>, TournamentError> {
    compute_overall_ranking_with_mode(pools, &RankingMode::Standard)
}

/// Merge every pool into one ranking, gathering statistics with `mode` (so drawn bouts are
/// accepted when the mode accepts them). Ordering is always:
/// active before withdrawn, victory ratio, index, touches scored, then seed,
/// pool number and pool position.
pub fn compute_overall_ranking_with_mode(
    pools: &[Pool],
    mode: &RankingMode,
) -> Result<Vec<PoolRankingEntry>, TournamentError> {
    let key = mode.key();
    let mut lines: Vec<(PoolRankingEntry, &Competitor, usize)> = Vec::new();
    for pool in pools {
        let stats = pool_statistics(pool, key.as_ref())?;
        for (pos, (entry, competitor)) in stats.into_iter().zip(&pool.competitors).enumerate() {
            lines.push((entry, competitor, pos));
        }
    }

    lines.sort_by(|(a, ca, pa), (b, cb, pb)| {
        cb.is_active()
            .cmp(&ca.is_active())
            .then_with(|| compare_ratio(b, a))
            .then_with(|| b.index.cmp(&a.index))
            .then_with(|| b.touches_scored.cmp(&a.touches_scored))
            .then_with(|| ca.seed_key().cmp(&cb.seed_key()))
            .then_with(|| a.pool.cmp(&b.pool))
            .then_with(|| pa.cmp(pb))
    });

    let ranking: Vec<PoolRankingEntry> = lines
        .into_iter()
        .enumerate()
        .map(|(i, (mut entry, _, _))| {
            entry.rank = i as u32 + 1;
            entry
        })
        .collect();
    log::debug!("Overall ranking computed for {} competitor(s)", ranking.len());
    Ok(ranking)
}

/// Compare victory ratios exactly (cross-multiplied), not through floats.
/// No bouts fenced counts as a ratio of 0.
fn compare_ratio(a: &PoolRankingEntry, b: &PoolRankingEntry) -> Ordering {
    let (va, na) = (u64::from(a.victories), u64::from(a.bouts().max(1)));
    let (vb, nb) = (u64::from(b.victories), u64::from(b.bouts().max(1)));
    (va * nb).cmp(&(vb * na))
}

/// The top `qualifiers` competitors of an overall ranking, skipping anyone no longer active.
/// `None` keeps every active competitor.
pub fn promotion_cut(
    ranking: &[PoolRankingEntry],
    pools: &[Pool],
    qualifiers: Option<usize>,
) -> Vec<CompetitorId> {
    let active = |id: CompetitorId| {
        pools
            .iter()
            .flat_map(|p| p.competitors.iter())
            .any(|c| c.id == id && c.is_active())
    };
    ranking
        .iter()
        .map(|e| e.competitor)
        .filter(|&id| active(id))
        .take(qualifiers.unwrap_or(usize::MAX))
        .collect()
}
