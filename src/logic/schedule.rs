//! Match scheduling: round-robin pairings for a pool and the order bouts are called to the piste.

use crate::models::{CompetitorId, Match, MatchStatus, Pool, TournamentError};
use serde::Serialize;

/// All unordered pairs of `n` pool positions, each exactly once, by the circle method:
/// position 0 stays fixed while the others rotate one step per round. With an odd `n` a
/// phantom position is added and its pairings dropped. Deterministic for a given `n`.
pub fn round_robin_pairs(n: usize) -> Vec<(usize, usize)> {
    if n < 2 {
        return Vec::new();
    }
    let slots = n + n % 2;
    let mut ring: Vec<usize> = (0..slots).collect();
    let mut pairs = Vec::with_capacity(n * (n - 1) / 2);
    for round in 0..slots - 1 {
        for i in 0..slots / 2 {
            let (mut a, mut b) = (ring[i], ring[slots - 1 - i]);
            if a >= n || b >= n {
                continue;
            }
            // Keep the fixed position from always being on side A.
            if i == 0 && round % 2 == 1 {
                std::mem::swap(&mut a, &mut b);
            }
            pairs.push((a, b));
        }
        ring[1..].rotate_right(1);
    }
    pairs
}

/// Pending matches for every pair of the pool, in round-robin order.
pub fn generate_matches(pool: &Pool) -> Result<Vec<Match>, TournamentError> {
    round_robin_pairs(pool.len())
        .into_iter()
        .map(|(a, b)| Match::new(pool.competitors[a].id, pool.competitors[b].id))
        .collect()
}

/// Order in which the pending bouts of a pool should be called.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct PresentationOrder {
    /// Indices into `pool.matches`.
    pub indices: Vec<usize>,
    /// How many times a competitor had to fence two bouts in a row.
    pub back_to_back: usize,
}

/// Greedy presentation order: take the first pending bout sharing no competitor with the bout
/// before it, else the first pending bout. The bout before the first pick is the one in
/// progress, or failing that the most recently finished one.
pub fn presentation_order(pool: &Pool) -> PresentationOrder {
    let mut previous: Option<[CompetitorId; 2]> = last_presented(&pool.matches).map(|m| [m.a, m.b]);
    let mut remaining: Vec<usize> = pool
        .matches
        .iter()
        .enumerate()
        .filter(|(_, m)| m.is_pending())
        .map(|(i, _)| i)
        .collect();

    let mut order = PresentationOrder::default();
    while !remaining.is_empty() {
        let rested = remaining.iter().position(|&i| {
            let m = &pool.matches[i];
            previous.map_or(true, |p| !p.contains(&m.a) && !p.contains(&m.b))
        });
        let pick = match rested {
            Some(pos) => pos,
            None => {
                order.back_to_back += 1;
                0
            }
        };
        let idx = remaining.remove(pick);
        let m = &pool.matches[idx];
        previous = Some([m.a, m.b]);
        order.indices.push(idx);
    }

    if order.back_to_back > 0 {
        log::warn!(
            "Pool {}: {} back-to-back bout(s) could not be avoided",
            pool.number,
            order.back_to_back
        );
    }
    order
}

/// The pool's pending matches, reordered for presentation.
pub fn reorder_pending(pool: &Pool) -> Vec<Match> {
    presentation_order(pool)
        .indices
        .into_iter()
        .map(|i| pool.matches[i].clone())
        .collect()
}

fn last_presented(matches: &[Match]) -> Option<&Match> {
    matches
        .iter()
        .find(|m| m.status == MatchStatus::InProgress)
        .or_else(|| {
            matches
                .iter()
                .enumerate()
                .filter(|(_, m)| m.is_finished())
                .max_by_key(|(i, m)| (m.finished_at, *i))
                .map(|(_, m)| m)
        })
}
