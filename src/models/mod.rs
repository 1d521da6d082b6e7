//! Data records exchanged with the orchestration layer: competitors, pools, bouts, rankings, brackets.

mod bout;
mod bracket;
mod competitor;
mod config;
mod double_elim;
mod pool;
mod ranking;
mod tournament;

pub use bout::{Match, MatchId, MatchStatus, Score, Side, SpecialOutcome};
pub use bracket::{Bracket, BracketNode, NodeId};
pub use competitor::{Competitor, CompetitorId, CompetitorStatus};
pub(crate) use competitor::non_empty;
pub use config::{
    EliminationFormat, MarginBucket, PoolBounds, QuestPoints, RankingMode, Separation,
    TournamentConfig,
};
pub use double_elim::{BracketTag, DeBracket, DeBracketNode, NodeState, Route, Slot};
pub use pool::{GroupingAttribute, Pool, SeparationConflict};
pub use ranking::{FinalPlacement, PoolRankingEntry};
pub use tournament::{
    EliminationBracket, Tournament, TournamentError, TournamentId, TournamentState,
};
