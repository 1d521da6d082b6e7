//! Single-elimination bracket: seeding, byes, node tree and progression.

use crate::models::{
    Bracket, BracketNode, CompetitorId, FinalPlacement, Match, NodeId, Side, TournamentError,
};
use std::collections::HashSet;

/// Fewest competitors an elimination bracket accepts.
pub const MIN_BRACKET_COMPETITORS: usize = 2;

/// Smallest power of two holding `count` competitors (at least 2).
pub fn bracket_size(count: usize) -> usize {
    count.max(2).next_power_of_two()
}

/// 1-based seeds in table order for a bracket of `size`: 1, 16, 8, 9, 4, 13, ... Adjacent
/// entries meet in the first round; seeds 1 and 2 can only meet in the final. Seeds above the
/// competitor count are byes, so byes go to the top seeds and are spread over the table.
pub fn seed_positions(size: usize) -> Vec<usize> {
    let mut seeds = vec![1usize];
    while seeds.len() < size {
        let n = seeds.len();
        let mut next = Vec::with_capacity(n * 2);
        for seed in seeds.iter().copied() {
            next.push(seed);
            next.push(n * 2 + 1 - seed);
        }
        seeds = next;
    }
    seeds
}

/// Check count and uniqueness shared by every bracket format.
pub(crate) fn validate_entrants(competitors: &[CompetitorId]) -> Result<(), TournamentError> {
    if competitors.len() < MIN_BRACKET_COMPETITORS {
        return Err(TournamentError::InsufficientCompetitors {
            required: MIN_BRACKET_COMPETITORS,
            found: competitors.len(),
        });
    }
    let mut seen = HashSet::new();
    if !competitors.iter().all(|c| seen.insert(*c)) {
        return Err(TournamentError::InvalidMatch);
    }
    Ok(())
}

/// Seed order with some competitors pinned to explicit 1-based seeds; the rest fill the free
/// seeds in list order.
pub fn order_with_seeds(
    competitors: &[CompetitorId],
    explicit: &[(CompetitorId, usize)],
) -> Result<Vec<CompetitorId>, TournamentError> {
    let mut slots: Vec<Option<CompetitorId>> = vec![None; competitors.len()];
    let mut pinned: HashSet<CompetitorId> = HashSet::new();
    for &(id, seed) in explicit {
        if !competitors.contains(&id) {
            return Err(TournamentError::CompetitorNotFound(id));
        }
        let taken = seed == 0 || seed > competitors.len() || slots[seed - 1].is_some();
        if taken || !pinned.insert(id) {
            return Err(TournamentError::InvalidState);
        }
        slots[seed - 1] = Some(id);
    }
    let mut rest = competitors.iter().copied().filter(|c| !pinned.contains(c));
    slots
        .into_iter()
        .map(|slot| slot.or_else(|| rest.next()))
        .collect::<Option<Vec<_>>>()
        .ok_or(TournamentError::InvalidState)
}

/// Build a bracket from competitors already in seed order (index 0 is seed 1).
pub fn generate_bracket(seeded: &[CompetitorId]) -> Result<Bracket, TournamentError> {
    validate_entrants(seeded)?;

    let size = bracket_size(seeded.len());
    let rounds = size.trailing_zeros();
    let bye_count = size - seeded.len();
    let seeds = seed_positions(size);

    // Node k sits at depth d = log2(k + 1); the final is node 0, the first round the deepest level.
    let mut nodes: Vec<BracketNode> = (0..size - 1)
        .map(|k| {
            let depth = (k + 1).ilog2();
            let round = rounds - depth;
            BracketNode {
                id: k,
                round,
                position: k + 1 - (1usize << depth),
                competitors: [None, None],
                feeders: if round > 1 {
                    [Some(2 * k + 1), Some(2 * k + 2)]
                } else {
                    [None, None]
                },
                next: (k > 0).then(|| ((k - 1) / 2, Side::from_index((k - 1) % 2))),
                is_bye: false,
                bout: None,
                winner: None,
            }
        })
        .collect();

    let first_round = (size / 2) - 1;
    for p in 0..size / 2 {
        let seat = |i: usize| seeded.get(seeds[i] - 1).copied();
        let node = &mut nodes[first_round + p];
        node.competitors = [seat(2 * p), seat(2 * p + 1)];
        if let [Some(only), None] | [None, Some(only)] = node.competitors {
            node.is_bye = true;
            node.winner = Some(only);
            if let Some((parent, side)) = node.next {
                nodes[parent].competitors[side.index()] = Some(only);
            }
        }
    }

    for node in nodes.iter_mut() {
        open_bout(node)?;
    }

    log::debug!(
        "Bracket of {} for {} competitor(s), {} bye(s)",
        size,
        seeded.len(),
        bye_count
    );
    Ok(Bracket {
        size,
        rounds,
        bye_count,
        seeds: seeded.to_vec(),
        nodes,
    })
}

/// Build a bracket where `explicit` pins competitors to seeds and the rest follow list order.
pub fn generate_bracket_with_seeds(
    competitors: &[CompetitorId],
    explicit: &[(CompetitorId, usize)],
) -> Result<Bracket, TournamentError> {
    validate_entrants(competitors)?;
    let seeded = order_with_seeds(competitors, explicit)?;
    generate_bracket(&seeded)
}

/// Create the bout once both sides are known.
fn open_bout(node: &mut BracketNode) -> Result<(), TournamentError> {
    if node.bout.is_none() && node.winner.is_none() {
        if let [Some(a), Some(b)] = node.competitors {
            node.bout = Some(Match::new(a, b)?);
        }
    }
    Ok(())
}

/// Record an elimination bout and move the winner on. Returns the new bracket; the input is
/// left untouched, also when an error is returned.
pub fn advance_bracket(
    bracket: &Bracket,
    node_id: NodeId,
    touches_a: u32,
    touches_b: u32,
) -> Result<Bracket, TournamentError> {
    let mut next = bracket.clone();
    let node = next
        .nodes
        .get_mut(node_id)
        .ok_or(TournamentError::BracketSizeMismatch(node_id))?;
    if node.winner.is_some() {
        return Err(TournamentError::NodeNotReady(node_id));
    }
    let bout = node
        .bout
        .as_mut()
        .ok_or(TournamentError::NodeNotReady(node_id))?;
    bout.record_touches(touches_a, touches_b)?;
    let winner = bout
        .winner()
        .ok_or(TournamentError::InvalidScoreState(bout.id))?;
    node.winner = Some(winner);

    if let Some((parent, side)) = node.next {
        let parent = &mut next.nodes[parent];
        parent.competitors[side.index()] = Some(winner);
        open_bout(parent)?;
    } else {
        log::info!("Bracket decided");
    }
    Ok(next)
}

/// Placements known so far: champion 1, runner-up 2, losers of round r share 2^(rounds-r)+1.
/// Ties are listed by seed.
pub fn bracket_final_ranking(bracket: &Bracket) -> Vec<FinalPlacement> {
    let mut placements: Vec<(FinalPlacement, usize)> = Vec::new();
    if let Some(champion) = bracket.champion() {
        placements.push((FinalPlacement { competitor: champion, rank: 1 }, 0));
    }
    for node in bracket.nodes.iter().filter(|n| !n.is_bye) {
        if let Some(loser) = node.loser() {
            let rank = (1u32 << (bracket.rounds - node.round)) + 1;
            let seed = bracket.seed_of(loser).unwrap_or(usize::MAX);
            placements.push((FinalPlacement { competitor: loser, rank }, seed));
        }
    }
    placements.sort_by_key(|(p, seed)| (p.rank, *seed));
    placements.into_iter().map(|(p, _)| p).collect()
}
