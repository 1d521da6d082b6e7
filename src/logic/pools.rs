//! Pool round: score entry, ranking recomputation and bout presentation order.

use crate::logic::pool_ranking::compute_pool_ranking;
use crate::logic::schedule::{presentation_order, PresentationOrder};
use crate::models::{
    Match, MatchId, Score, Side, SpecialOutcome, Tournament, TournamentError, TournamentState,
};
use chrono::Utc;

/// How a pool bout ended, as supplied by score entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PoolResult {
    /// Touches on each side; the higher score wins.
    Touches { a: u32, b: u32 },
    /// Explicit scores, e.g. a win on priority at equal touches.
    Scores { a: Score, b: Score },
    /// Equal touches with no winner; only ranked by modes that accept draws.
    Draw { a: u32, b: u32 },
    /// One side abandoned, forfeited or was excluded.
    Special { loser: Side, outcome: SpecialOutcome },
}

/// Apply a result to a match copy, then swap it in and re-rank the pool. Nothing on the
/// tournament changes when the result or the resulting ranking is rejected.
pub fn record_pool_result(
    tournament: &mut Tournament,
    pool_number: usize,
    match_id: MatchId,
    result: PoolResult,
) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Pools {
        return Err(TournamentError::InvalidState);
    }
    let mode = tournament.config.ranking_mode.clone();
    let pool = tournament.pool(pool_number)?;
    let mut updated: Match = pool
        .get_match(match_id)
        .cloned()
        .ok_or(TournamentError::MatchNotFound(match_id))?;

    match result {
        PoolResult::Touches { a, b } => updated.record_touches(a, b)?,
        PoolResult::Scores { a, b } => updated.finish(a, b)?,
        PoolResult::Draw { a, b } => updated.record_draw(a, b),
        PoolResult::Special { loser, outcome } => updated.record_special(loser, outcome),
    }
    updated.finished_at = Some(Utc::now());

    let mut candidate = pool.clone();
    if let Some(slot) = candidate.get_match_mut(match_id) {
        *slot = updated;
    }
    candidate.ranking = compute_pool_ranking(&candidate, &mode)?;
    *tournament.pool_mut(pool_number)? = candidate;
    Ok(())
}

/// Mark a pool bout as being fenced.
pub fn start_pool_match(
    tournament: &mut Tournament,
    pool_number: usize,
    match_id: MatchId,
) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Pools {
        return Err(TournamentError::InvalidState);
    }
    tournament
        .pool_mut(pool_number)?
        .get_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?
        .start()
}

/// Presentation order of the pool's pending bouts.
pub fn pool_presentation_order(
    tournament: &Tournament,
    pool_number: usize,
) -> Result<PresentationOrder, TournamentError> {
    Ok(presentation_order(tournament.pool(pool_number)?))
}
