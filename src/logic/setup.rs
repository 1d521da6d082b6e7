//! Setup phase: draw the pools and generate their bouts (Setup -> Pools).

use crate::logic::distribution::distribute_pools_with_draw;
use crate::logic::pool_ranking::compute_pool_ranking;
use crate::logic::schedule::generate_matches;
use crate::models::{Competitor, Tournament, TournamentError, TournamentState};

/// Draw pools from the active roster, fill each with its round-robin bouts and an initial
/// (all-zero) ranking. Separation conflicts the draw could not resolve are kept on the
/// tournament for display.
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Setup {
        return Err(TournamentError::InvalidState);
    }
    let active: Vec<Competitor> = tournament
        .roster
        .iter()
        .filter(|c| c.is_active())
        .cloned()
        .collect();

    let config = &tournament.config;
    let mut distribution = distribute_pools_with_draw(
        &active,
        config.pool_bounds,
        config.separation,
        config.draw_seed,
    )?;
    for pool in &mut distribution.pools {
        pool.matches = generate_matches(pool)?;
        pool.ranking = compute_pool_ranking(pool, &config.ranking_mode)?;
    }

    log::info!(
        "Tournament {} started with {} pool(s)",
        tournament.id,
        distribution.pools.len()
    );
    tournament.pools = distribution.pools;
    tournament.separation_conflicts = distribution.residual_collisions;
    tournament.state = TournamentState::Pools;
    Ok(())
}
