//! Pool distribution: serpentine seeding followed by a swap pass that splits clubs/leagues/nations.

use crate::models::{
    Competitor, GroupingAttribute, Pool, PoolBounds, SeparationConflict, Separation,
    TournamentError,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Smallest roster that can form a pool.
pub const MIN_ROSTER_SIZE: usize = 4;

/// Pools plus any same-attribute pairs the swap pass could not split.
#[derive(Clone, Debug, PartialEq)]
pub struct PoolDistribution {
    pub pools: Vec<Pool>,
    pub residual_collisions: Vec<SeparationConflict>,
}

/// Split `roster` into pools (roster order for unseeded competitors).
pub fn distribute_pools(
    roster: &[Competitor],
    bounds: PoolBounds,
    separation: Separation,
) -> Result<PoolDistribution, TournamentError> {
    distribute_pools_with_draw(roster, bounds, separation, None)
}

/// Split `roster` into pools, drawing lots among unseeded competitors with `draw_seed`.
///
/// 1. Order by seed (unseeded last, shuffled by `draw_seed` if given).
/// 2. Pick the smallest pool count whose sizes fit `bounds` (1 pool if none does).
/// 3. Serpentine: round 1 fills pools forward, round 2 backward, and so on.
/// 4. Swap clashing competitors with the closest-ranked competitor of another pool when the swap
///    creates no new clash. Pairs that cannot be split are returned, not treated as an error.
pub fn distribute_pools_with_draw(
    roster: &[Competitor],
    bounds: PoolBounds,
    separation: Separation,
    draw_seed: Option<u64>,
) -> Result<PoolDistribution, TournamentError> {
    if roster.len() < MIN_ROSTER_SIZE {
        return Err(TournamentError::InsufficientCompetitors {
            required: MIN_ROSTER_SIZE,
            found: roster.len(),
        });
    }
    if bounds.min < 2 || bounds.min > bounds.max {
        return Err(TournamentError::InvalidPoolBounds {
            min: bounds.min,
            max: bounds.max,
        });
    }

    let ordered = seed_order(roster, draw_seed);
    let count = pool_count(ordered.len(), bounds);
    let mut pools = serpentine(ordered.len(), count);
    log::debug!(
        "Distributing {} competitors into {} pool(s) of {}..={}",
        ordered.len(),
        count,
        ordered.len() / count,
        ordered.len().div_ceil(count)
    );

    if !separation.is_empty() {
        let swaps = resolve_collisions(&mut pools, &ordered, separation);
        log::debug!("Separation pass made {} swap(s)", swaps);
    }

    let residual_collisions = collisions(&pools, &ordered, separation);
    if !residual_collisions.is_empty() {
        log::warn!(
            "Pool draw left {} unresolvable separation conflict(s)",
            residual_collisions.len()
        );
    }

    let pools = pools
        .into_iter()
        .enumerate()
        .map(|(i, ranks)| {
            let competitors = ranks.into_iter().map(|r| ordered[r].clone()).collect();
            Pool::new(i + 1, competitors)
        })
        .collect();

    Ok(PoolDistribution {
        pools,
        residual_collisions,
    })
}

/// Smallest pool count such that every pool size lies within `bounds`; 1 if none fits.
pub fn pool_count(roster_len: usize, bounds: PoolBounds) -> usize {
    (1..=roster_len)
        .find(|&count| {
            roster_len / count >= bounds.min && roster_len.div_ceil(count) <= bounds.max
        })
        .unwrap_or(1)
}

fn seed_order(roster: &[Competitor], draw_seed: Option<u64>) -> Vec<Competitor> {
    let mut seeded: Vec<Competitor> = roster.iter().filter(|c| c.seed.is_some()).cloned().collect();
    seeded.sort_by_key(|c| c.seed);
    let mut unseeded: Vec<Competitor> = roster.iter().filter(|c| c.seed.is_none()).cloned().collect();
    if let Some(seed) = draw_seed {
        unseeded.shuffle(&mut StdRng::seed_from_u64(seed));
    }
    seeded.extend(unseeded);
    seeded
}

/// Ranks (indices into the seed order) per pool.
fn serpentine(len: usize, count: usize) -> Vec<Vec<usize>> {
    let mut pools = vec![Vec::new(); count];
    for rank in 0..len {
        let offset = rank % count;
        let pool = if (rank / count) % 2 == 0 {
            offset
        } else {
            count - 1 - offset
        };
        pools[pool].push(rank);
    }
    pools
}

fn shared_attribute(
    a: &Competitor,
    b: &Competitor,
    separation: Separation,
) -> Option<GroupingAttribute> {
    let same = |x: &Option<String>, y: &Option<String>| match (x, y) {
        (Some(x), Some(y)) => x.trim().eq_ignore_ascii_case(y.trim()),
        _ => false,
    };
    if separation.by_club && same(&a.club, &b.club) {
        Some(GroupingAttribute::Club)
    } else if separation.by_league && same(&a.league, &b.league) {
        Some(GroupingAttribute::League)
    } else if separation.by_nation && same(&a.nation, &b.nation) {
        Some(GroupingAttribute::Nation)
    } else {
        None
    }
}

/// Would `candidate` clash with anyone in `pool` other than `leaving`?
fn clashes(
    candidate: usize,
    pool: &[usize],
    leaving: usize,
    ordered: &[Competitor],
    separation: Separation,
) -> bool {
    pool.iter()
        .filter(|&&r| r != leaving && r != candidate)
        .any(|&r| shared_attribute(&ordered[candidate], &ordered[r], separation).is_some())
}

/// Best swap partner for `mover` (currently in pool `from`): the closest rank whose swap leaves
/// neither pool with a new clash.
fn best_swap(
    pools: &[Vec<usize>],
    from: usize,
    mover: usize,
    ordered: &[Competitor],
    separation: Separation,
) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize, usize)> = None;
    for (q, pool) in pools.iter().enumerate() {
        if q == from {
            continue;
        }
        for (k_pos, &k) in pool.iter().enumerate() {
            if clashes(mover, pool, k, ordered, separation)
                || clashes(k, &pools[from], mover, ordered, separation)
            {
                continue;
            }
            let cost = mover.abs_diff(k);
            if best.map_or(true, |(c, _, _)| cost < c) {
                best = Some((cost, q, k_pos));
            }
        }
    }
    best.map(|(_, q, k_pos)| (q, k_pos))
}

/// Each swap removes at least one clashing pair and adds none, so this terminates.
fn resolve_collisions(
    pools: &mut [Vec<usize>],
    ordered: &[Competitor],
    separation: Separation,
) -> usize {
    let mut swaps = 0;
    'search: loop {
        for p in 0..pools.len() {
            for i in 0..pools[p].len() {
                for j in (i + 1)..pools[p].len() {
                    let (stronger, weaker) = (pools[p][i], pools[p][j]);
                    if shared_attribute(&ordered[stronger], &ordered[weaker], separation).is_none() {
                        continue;
                    }
                    // Move the weaker of the pair first; top seeds stay where the serpentine put them.
                    for (pos, mover) in [(j, weaker), (i, stronger)] {
                        if let Some((q, k_pos)) = best_swap(pools, p, mover, ordered, separation) {
                            let partner = pools[q][k_pos];
                            pools[q][k_pos] = mover;
                            pools[p][pos] = partner;
                            pools[p].sort_unstable();
                            pools[q].sort_unstable();
                            swaps += 1;
                            continue 'search;
                        }
                    }
                }
            }
        }
        return swaps;
    }
}

fn collisions(
    pools: &[Vec<usize>],
    ordered: &[Competitor],
    separation: Separation,
) -> Vec<SeparationConflict> {
    let mut found = Vec::new();
    if separation.is_empty() {
        return found;
    }
    for (p, pool) in pools.iter().enumerate() {
        for (i, &a) in pool.iter().enumerate() {
            for &b in &pool[i + 1..] {
                if let Some(attribute) = shared_attribute(&ordered[a], &ordered[b], separation) {
                    found.push(SeparationConflict {
                        pool: p + 1,
                        first: ordered[a].id,
                        second: ordered[b].id,
                        attribute,
                    });
                }
            }
        }
    }
    found
}
