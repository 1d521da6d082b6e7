//! Tournament logic: the pure pool/ranking/bracket core plus the stage transitions that apply
//! its results to a `Tournament` snapshot.

mod bracket;
mod distribution;
mod double_elim;
mod elimination;
mod overall_ranking;
mod pool_ranking;
mod pools;
mod roster;
mod schedule;
mod setup;

pub use bracket::{
    advance_bracket, bracket_final_ranking, bracket_size, generate_bracket,
    generate_bracket_with_seeds, order_with_seeds, seed_positions, MIN_BRACKET_COMPETITORS,
};
pub use distribution::{
    distribute_pools, distribute_pools_with_draw, pool_count, PoolDistribution, MIN_ROSTER_SIZE,
};
pub use double_elim::{
    advance_de_match, de_final_ranking, generate_double_elimination_bracket, start_de_match,
};
pub use elimination::{final_ranking, finish_pools, record_bracket_result};
pub use overall_ranking::{compute_overall_ranking, compute_overall_ranking_with_mode, promotion_cut};
pub use pool_ranking::{
    compute_pool_ranking, compute_pool_ranking_with, pool_statistics, BoutOutcome, BoutResult,
    QuestKey, RankingKey, VictoriesKey,
};
pub use pools::{pool_presentation_order, record_pool_result, start_pool_match, PoolResult};
pub use roster::parse_roster_csv;
pub use schedule::{
    generate_matches, presentation_order, reorder_pending, round_robin_pairs, PresentationOrder,
};
pub use setup::start_tournament;
