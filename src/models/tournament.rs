//! Tournament snapshot, TournamentState and TournamentError.

use crate::models::bracket::{Bracket, NodeId};
use crate::models::bout::MatchId;
use crate::models::competitor::{non_empty, Competitor, CompetitorId};
use crate::models::config::TournamentConfig;
use crate::models::double_elim::DeBracket;
use crate::models::pool::{Pool, SeparationConflict};
use crate::models::ranking::PoolRankingEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Too few competitors to form a pool or a bracket.
    InsufficientCompetitors { required: usize, found: usize },
    /// Pool size bounds are empty or too small for a round robin.
    InvalidPoolBounds { min: usize, max: usize },
    /// A finished match does not have exactly one winner (or carries no scores).
    InvalidScoreState(MatchId),
    /// The bracket has no node with this id.
    BracketSizeMismatch(NodeId),
    /// The node is not waiting for a result (sides not both known, or already decided).
    NodeNotReady(NodeId),
    /// A match needs two different competitors.
    InvalidMatch,
    /// Tournament is not in a state that allows this action.
    InvalidState,
    CompetitorNotFound(CompetitorId),
    PoolNotFound(usize),
    MatchNotFound(MatchId),
    /// A competitor with this name already exists (names are unique, case-insensitive).
    DuplicateCompetitorName,
    /// The roster file could not be read.
    RosterParse(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InsufficientCompetitors { required, found } => {
                write!(f, "Need at least {} competitors (found {})", required, found)
            }
            TournamentError::InvalidPoolBounds { min, max } => {
                write!(f, "Invalid pool size bounds {}..={}", min, max)
            }
            TournamentError::InvalidScoreState(_) => {
                write!(f, "A finished match must have exactly one winner")
            }
            TournamentError::BracketSizeMismatch(node) => {
                write!(f, "Bracket has no node {}", node)
            }
            TournamentError::NodeNotReady(node) => {
                write!(f, "Bracket node {} is not waiting for a result", node)
            }
            TournamentError::InvalidMatch => write!(f, "A match needs two different competitors"),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::CompetitorNotFound(_) => write!(f, "Competitor not found"),
            TournamentError::PoolNotFound(number) => write!(f, "Pool {} not found", number),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::DuplicateCompetitorName => {
                write!(f, "A competitor with this name already exists")
            }
            TournamentError::RosterParse(msg) => write!(f, "Could not read roster: {}", msg),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    /// Building the roster and choosing settings.
    #[default]
    Setup,
    /// Pools drawn; bouts being fenced.
    Pools,
    /// Overall ranking fixed; elimination bracket in play.
    Elimination,
    /// Bracket decided; final ranking available.
    Completed,
}

/// The elimination stage in whichever format was configured.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "format", content = "bracket")]
pub enum EliminationBracket {
    Single(Bracket),
    Double(DeBracket),
}

/// Full tournament snapshot, owned by the caller. Stage functions in `logic` take it, call the
/// pure core and store what comes back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub created_at: DateTime<Utc>,
    pub config: TournamentConfig,
    pub state: TournamentState,
    pub roster: Vec<Competitor>,
    pub pools: Vec<Pool>,
    /// Same-club (etc.) pairs the pool draw could not split.
    pub separation_conflicts: Vec<SeparationConflict>,
    /// Set when the pool round is closed; seeds the bracket.
    pub overall_ranking: Vec<PoolRankingEntry>,
    pub bracket: Option<EliminationBracket>,
}

impl Tournament {
    /// Create a new tournament in Setup state with an empty roster.
    pub fn new(config: TournamentConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            config,
            state: TournamentState::Setup,
            roster: Vec::new(),
            pools: Vec::new(),
            separation_conflicts: Vec::new(),
            overall_ranking: Vec::new(),
            bracket: None,
        }
    }

    /// Create a tournament with an initial roster. Still in Setup until the pools are drawn.
    pub fn with_competitors(competitors: Vec<Competitor>, config: TournamentConfig) -> Self {
        Self {
            roster: competitors,
            ..Self::new(config)
        }
    }

    pub fn get_competitor(&self, id: CompetitorId) -> Option<&Competitor> {
        self.roster.iter().find(|c| c.id == id)
    }

    pub fn pool(&self, number: usize) -> Result<&Pool, TournamentError> {
        self.pools
            .iter()
            .find(|p| p.number == number)
            .ok_or(TournamentError::PoolNotFound(number))
    }

    pub fn pool_mut(&mut self, number: usize) -> Result<&mut Pool, TournamentError> {
        self.pools
            .iter_mut()
            .find(|p| p.number == number)
            .ok_or(TournamentError::PoolNotFound(number))
    }

    /// Add a competitor (Setup only). Names must be unique (case-insensitive); blank club,
    /// league or nation become `None`.
    pub fn add_competitor(&mut self, competitor: Competitor) -> Result<(), TournamentError> {
        if self.state != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        let name = competitor.name.trim();
        if name.is_empty() {
            return Err(TournamentError::InvalidState);
        }
        if self.roster.iter().any(|c| c.name.eq_ignore_ascii_case(name)) {
            return Err(TournamentError::DuplicateCompetitorName);
        }
        let competitor = Competitor {
            name: name.to_string(),
            club: non_empty(competitor.club),
            league: non_empty(competitor.league),
            nation: non_empty(competitor.nation),
            ..competitor
        };
        self.roster.push(competitor);
        Ok(())
    }

    /// Remove a competitor by id (Setup only).
    pub fn remove_competitor(&mut self, id: CompetitorId) -> Result<(), TournamentError> {
        if self.state != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        let idx = self
            .roster
            .iter()
            .position(|c| c.id == id)
            .ok_or(TournamentError::CompetitorNotFound(id))?;
        self.roster.remove(idx);
        Ok(())
    }

    /// Withdraw a competitor. In Setup they simply stay out of the draw; during pools their
    /// pool-sheet copy is updated too so the overall ranking lists them last.
    pub fn withdraw_competitor(&mut self, id: CompetitorId) -> Result<(), TournamentError> {
        self.update_status(id, Competitor::withdraw)
    }

    /// Mark a competitor as having forfeited the rest of the event. Ranked and seeded like a
    /// withdrawal.
    pub fn forfeit_competitor(&mut self, id: CompetitorId) -> Result<(), TournamentError> {
        self.update_status(id, Competitor::forfeit)
    }

    fn update_status(
        &mut self,
        id: CompetitorId,
        apply: fn(&mut Competitor),
    ) -> Result<(), TournamentError> {
        if self.state == TournamentState::Completed {
            return Err(TournamentError::InvalidState);
        }
        apply(
            self.roster
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or(TournamentError::CompetitorNotFound(id))?,
        );
        for c in self.pools.iter_mut().flat_map(|p| p.competitors.iter_mut()) {
            if c.id == id {
                apply(c);
            }
        }
        Ok(())
    }

    /// Update settings (Setup only).
    pub fn set_config(&mut self, config: TournamentConfig) -> Result<(), TournamentError> {
        if self.state != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        self.config = config;
        Ok(())
    }

    /// Back to Setup with the same roster and settings. Clears pools, rankings and bracket.
    pub fn restart_tournament(&mut self) -> Result<(), TournamentError> {
        if self.state == TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        let roster = std::mem::take(&mut self.roster);
        let config = self.config.clone();
        let id = self.id;
        *self = Self::with_competitors(roster, config);
        self.id = id;
        Ok(())
    }
}
