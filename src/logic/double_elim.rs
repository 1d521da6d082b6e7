//! Double elimination: winners bracket, losers bracket and a grand final with a conditional reset.
//!
//! Every node knows at generation time where its winner and its loser go. Results are pushed
//! along those routes; a node whose two sides are resolved either opens a bout, passes its only
//! competitor on as a bye, or (with nobody in it) passes emptiness on to both routes.

use crate::logic::bracket::{bracket_size, seed_positions, validate_entrants};
use crate::models::{
    BracketTag, CompetitorId, DeBracket, DeBracketNode, FinalPlacement, Match, NodeId, NodeState,
    Route, Side, Slot, TournamentError,
};

/// Build the full double-elimination structure for competitors in seed order.
///
/// Winners round r has size/2^r nodes. For each winners round i+1 (i >= 1) the losers bracket
/// has two rounds: round 2i-1 pairs what came before (first-round losers, or winners of the
/// previous losers round), round 2i meets those winners with the losers dropping from winners
/// round i+1, in reversed table order to delay rematches.
pub fn generate_double_elimination_bracket(
    competitors: &[CompetitorId],
) -> Result<DeBracket, TournamentError> {
    validate_entrants(competitors)?;

    let size = bracket_size(competitors.len());
    let rounds = size.trailing_zeros() as usize;
    let mut nodes: Vec<DeBracketNode> = Vec::new();
    let mut push = |tag: BracketTag, round: usize, position: usize| {
        let id = nodes.len();
        nodes.push(DeBracketNode::new(id, tag, round as u32, position));
        id
    };

    let winners: Vec<Vec<NodeId>> = (1..=rounds)
        .map(|r| (0..size >> r).map(|p| push(BracketTag::Winners, r, p)).collect())
        .collect();
    let losers: Vec<Vec<NodeId>> = (1..2 * rounds.saturating_sub(1) + 1)
        .map(|lr| {
            let count = size >> (lr.div_ceil(2) + 1);
            (0..count).map(|p| push(BracketTag::Losers, lr, p)).collect()
        })
        .collect();
    let grand_final = push(BracketTag::Final, 1, 0);

    // Winners bracket routes.
    for (r, round) in winners.iter().enumerate() {
        for (p, &id) in round.iter().enumerate() {
            let node = &mut nodes[id];
            node.winner_to = Some(match winners.get(r + 1) {
                Some(next) => Route::new(next[p / 2], Side::from_index(p)),
                None => Route::new(grand_final, Side::A),
            });
            node.loser_to = Some(if rounds == 1 {
                Route::new(grand_final, Side::B)
            } else if r == 0 {
                Route::new(losers[0][p / 2], Side::from_index(p))
            } else {
                Route::new(losers[2 * r - 1][round.len() - 1 - p], Side::B)
            });
        }
    }

    // Losers bracket routes.
    for (lr, round) in losers.iter().enumerate() {
        for (p, &id) in round.iter().enumerate() {
            nodes[id].winner_to = Some(if lr % 2 == 0 {
                Route::new(losers[lr + 1][p], Side::A)
            } else {
                match losers.get(lr + 1) {
                    Some(next) => Route::new(next[p / 2], Side::from_index(p)),
                    None => Route::new(grand_final, Side::B),
                }
            });
        }
    }

    let mut bracket = DeBracket {
        size,
        winners_rounds: rounds as u32,
        losers_rounds: losers.len() as u32,
        seeds: competitors.to_vec(),
        nodes,
        grand_final,
        reset: None,
        champion: None,
        runner_up: None,
    };

    let seeds = seed_positions(size);
    let mut queue = Vec::new();
    for (p, &id) in winners[0].iter().enumerate() {
        let seat = |i: usize| match competitors.get(seeds[i] - 1) {
            Some(&c) => Slot::Filled(c),
            None => Slot::Empty,
        };
        bracket.nodes[id].slots = [seat(2 * p), seat(2 * p + 1)];
        queue.push(id);
    }
    settle(&mut bracket, queue)?;

    log::debug!(
        "Double-elimination bracket of {} for {} competitor(s): {} winners round(s), {} losers round(s)",
        size,
        competitors.len(),
        bracket.winners_rounds,
        bracket.losers_rounds
    );
    Ok(bracket)
}

fn place(bracket: &mut DeBracket, route: Option<Route>, slot: Slot, queue: &mut Vec<NodeId>) {
    if let Some(route) = route {
        bracket.nodes[route.node].slots[route.side.index()] = slot;
        queue.push(route.node);
    }
}

/// Resolve every queued node whose sides are both known.
fn settle(bracket: &mut DeBracket, mut queue: Vec<NodeId>) -> Result<(), TournamentError> {
    while let Some(id) = queue.pop() {
        let node = &bracket.nodes[id];
        if node.state == NodeState::Complete || node.bout.is_some() {
            continue;
        }
        let [a, b] = node.slots;
        if !a.is_resolved() || !b.is_resolved() {
            continue;
        }
        let (winner_to, loser_to) = (node.winner_to, node.loser_to);
        match (a.competitor(), b.competitor()) {
            (Some(x), Some(y)) => {
                bracket.nodes[id].bout = Some(Match::new(x, y)?);
            }
            (Some(only), None) | (None, Some(only)) => {
                let node = &mut bracket.nodes[id];
                node.is_bye = true;
                node.state = NodeState::Complete;
                node.winner = Some(only);
                if id == bracket.grand_final {
                    bracket.champion = Some(only);
                }
                place(bracket, winner_to, Slot::Filled(only), &mut queue);
                place(bracket, loser_to, Slot::Empty, &mut queue);
            }
            (None, None) => {
                let node = &mut bracket.nodes[id];
                node.is_bye = true;
                node.state = NodeState::Complete;
                place(bracket, winner_to, Slot::Empty, &mut queue);
                place(bracket, loser_to, Slot::Empty, &mut queue);
            }
        }
    }
    Ok(())
}

fn ready_node(bracket: &mut DeBracket, node_id: NodeId) -> Result<&mut DeBracketNode, TournamentError> {
    let node = bracket
        .nodes
        .get_mut(node_id)
        .ok_or(TournamentError::BracketSizeMismatch(node_id))?;
    if !node.is_ready() {
        return Err(TournamentError::NodeNotReady(node_id));
    }
    Ok(node)
}

/// Mark a ready node's bout as being fenced.
pub fn start_de_match(bracket: &DeBracket, node_id: NodeId) -> Result<DeBracket, TournamentError> {
    let mut next = bracket.clone();
    let node = ready_node(&mut next, node_id)?;
    if let Some(bout) = node.bout.as_mut() {
        bout.start()?;
    }
    node.state = NodeState::InProgress;
    Ok(next)
}

/// Record a bout and route both competitors. Returns the new bracket; on error the input is
/// the only bracket and nothing changed.
///
/// Winners bracket: winner moves up, loser drops to its losers-bracket node.
/// Losers bracket: winner moves on, loser is out.
/// Grand final: if the winners-bracket champion wins the bracket is over; otherwise a reset
/// final between the same two competitors is opened.
pub fn advance_de_match(
    bracket: &DeBracket,
    node_id: NodeId,
    touches_a: u32,
    touches_b: u32,
) -> Result<DeBracket, TournamentError> {
    let mut next = bracket.clone();
    let node = ready_node(&mut next, node_id)?;
    let bout = node
        .bout
        .as_mut()
        .ok_or(TournamentError::NodeNotReady(node_id))?;
    bout.record_touches(touches_a, touches_b)?;
    let winner = bout
        .winner()
        .ok_or(TournamentError::InvalidScoreState(bout.id))?;
    let loser = if winner == bout.a { bout.b } else { bout.a };
    let winners_champion = bout.a;
    node.state = NodeState::Complete;
    node.winner = Some(winner);
    node.loser = Some(loser);
    let (winner_to, loser_to) = (node.winner_to, node.loser_to);

    if node_id == next.grand_final {
        if winner == winners_champion {
            finish(&mut next, winner, loser);
        } else {
            let reset = next.nodes.len();
            let mut node = DeBracketNode::new(reset, BracketTag::Final, 2, 0);
            node.slots = [Slot::Filled(loser), Slot::Filled(winner)];
            node.bout = Some(Match::new(loser, winner)?);
            next.nodes.push(node);
            next.reset = Some(reset);
            log::info!("Losers-bracket champion won the grand final; reset bout required");
        }
    } else if Some(node_id) == next.reset {
        finish(&mut next, winner, loser);
    } else {
        let mut queue = Vec::new();
        place(&mut next, winner_to, Slot::Filled(winner), &mut queue);
        place(&mut next, loser_to, Slot::Filled(loser), &mut queue);
        settle(&mut next, queue)?;
    }
    Ok(next)
}

fn finish(bracket: &mut DeBracket, champion: CompetitorId, runner_up: CompetitorId) {
    bracket.champion = Some(champion);
    bracket.runner_up = Some(runner_up);
    log::info!("Double-elimination bracket decided");
}

/// Placements known so far: champion 1, runner-up 2, then competitors knocked out of the
/// losers bracket, later rounds first. Everyone out in the same losers round shares a rank.
pub fn de_final_ranking(bracket: &DeBracket) -> Vec<FinalPlacement> {
    let mut placements = Vec::new();
    if let Some(champion) = bracket.champion {
        placements.push(FinalPlacement { competitor: champion, rank: 1 });
    }
    if let Some(runner_up) = bracket.runner_up {
        placements.push(FinalPlacement { competitor: runner_up, rank: 2 });
    }

    let seed_of = |id: &CompetitorId| bracket.seeds.iter().position(|c| c == id);
    let mut rank = 3;
    for round in (1..=bracket.losers_rounds).rev() {
        let mut out: Vec<CompetitorId> = bracket
            .nodes_in(BracketTag::Losers)
            .filter(|n| n.round == round && n.state == NodeState::Complete)
            .filter_map(|n| n.loser)
            .collect();
        out.sort_by_key(seed_of);
        let group = out.len() as u32;
        placements.extend(out.into_iter().map(|competitor| FinalPlacement { competitor, rank }));
        rank += group;
    }
    placements
}
