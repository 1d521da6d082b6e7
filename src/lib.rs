//! Fencing tournament core: pool distribution, round-robin scheduling, pool and overall
//! rankings, single and double elimination brackets. Every core function takes a snapshot and
//! returns a new value; `Tournament` is the caller-owned snapshot the stage functions update.

pub mod logic;
pub mod models;

pub use logic::{
    advance_bracket, advance_de_match, bracket_final_ranking, compute_overall_ranking,
    compute_pool_ranking, de_final_ranking, distribute_pools, final_ranking, finish_pools,
    generate_bracket, generate_double_elimination_bracket, generate_matches, parse_roster_csv,
    pool_presentation_order, record_bracket_result, record_pool_result, reorder_pending,
    start_de_match, start_pool_match, start_tournament, PoolDistribution, PoolResult,
    PresentationOrder,
};
pub use models::{
    Bracket, BracketNode, BracketTag, Competitor, CompetitorId, CompetitorStatus, DeBracket,
    DeBracketNode, EliminationBracket, EliminationFormat, FinalPlacement, Match, MatchId,
    MatchStatus, NodeId, NodeState, Pool, PoolBounds, PoolRankingEntry, QuestPoints,
    RankingMode, Score, Separation, Side, Slot, SpecialOutcome, Tournament, TournamentConfig,
    TournamentError, TournamentId, TournamentState,
};
