//! Elimination phase: close the pools, seed the bracket, record bracket bouts, final ranking.

use crate::logic::bracket::{advance_bracket, bracket_final_ranking, generate_bracket};
use crate::logic::double_elim::{
    advance_de_match, de_final_ranking, generate_double_elimination_bracket,
};
use crate::logic::overall_ranking::{compute_overall_ranking_with_mode, promotion_cut};
use crate::models::{
    EliminationBracket, EliminationFormat, FinalPlacement, NodeId, Tournament, TournamentError,
    TournamentState,
};

/// Close the pool round (Pools -> Elimination): every bout must be fenced. Computes the
/// overall ranking, keeps the configured number of qualifiers and seeds the bracket with them.
pub fn finish_pools(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Pools {
        return Err(TournamentError::InvalidState);
    }
    if tournament.pools.iter().any(|p| !p.is_complete()) {
        return Err(TournamentError::InvalidState);
    }

    let config = &tournament.config;
    let ranking = compute_overall_ranking_with_mode(&tournament.pools, &config.ranking_mode)?;
    let qualified = promotion_cut(&ranking, &tournament.pools, config.qualifiers);
    let bracket = match config.elimination {
        EliminationFormat::Single => EliminationBracket::Single(generate_bracket(&qualified)?),
        EliminationFormat::Double => {
            EliminationBracket::Double(generate_double_elimination_bracket(&qualified)?)
        }
    };

    log::info!(
        "Pools closed: {} of {} competitor(s) qualified for elimination",
        qualified.len(),
        ranking.len()
    );
    tournament.overall_ranking = ranking;
    tournament.bracket = Some(bracket);
    tournament.state = TournamentState::Elimination;
    Ok(())
}

/// Record an elimination bout; the tournament completes when the bracket has a champion.
pub fn record_bracket_result(
    tournament: &mut Tournament,
    node: NodeId,
    touches_a: u32,
    touches_b: u32,
) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Elimination {
        return Err(TournamentError::InvalidState);
    }
    let (next, complete) = match tournament.bracket.as_ref() {
        Some(EliminationBracket::Single(b)) => {
            let next = advance_bracket(b, node, touches_a, touches_b)?;
            let complete = next.is_complete();
            (EliminationBracket::Single(next), complete)
        }
        Some(EliminationBracket::Double(b)) => {
            let next = advance_de_match(b, node, touches_a, touches_b)?;
            let complete = next.is_complete();
            (EliminationBracket::Double(next), complete)
        }
        None => return Err(TournamentError::InvalidState),
    };
    tournament.bracket = Some(next);
    if complete {
        tournament.state = TournamentState::Completed;
        log::info!("Tournament {} completed", tournament.id);
    }
    Ok(())
}

/// Final ranking: bracket placements known so far, then the competitors cut after the pools,
/// ranked below every bracket entrant in overall-ranking order.
pub fn final_ranking(tournament: &Tournament) -> Result<Vec<FinalPlacement>, TournamentError> {
    let (mut placements, entrants) = match tournament.bracket.as_ref() {
        Some(EliminationBracket::Single(b)) => (bracket_final_ranking(b), &b.seeds),
        Some(EliminationBracket::Double(b)) => (de_final_ranking(b), &b.seeds),
        None => return Err(TournamentError::InvalidState),
    };
    let cut = tournament
        .overall_ranking
        .iter()
        .filter(|e| !entrants.contains(&e.competitor));
    for (i, entry) in cut.enumerate() {
        placements.push(FinalPlacement {
            competitor: entry.competitor,
            rank: (entrants.len() + i + 1) as u32,
        });
    }
    Ok(placements)
}
