//! Match (bout), Score, Side and special outcomes for pool and bracket bouts.

use crate::models::competitor::CompetitorId;
use crate::models::tournament::TournamentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Which slot of a match. Order only matters for score attribution.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    A,
    B,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    pub fn from_index(index: usize) -> Self {
        if index % 2 == 0 {
            Side::A
        } else {
            Side::B
        }
    }
}

/// Why a bout ended without being fenced to the end.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialOutcome {
    Abandon,
    Forfeit,
    Exclusion,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    InProgress,
    Finished,
}

/// One side's result in a bout.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub touches: u32,
    pub victory: bool,
    /// Set on the side that abandoned, forfeited or was excluded.
    pub special: Option<SpecialOutcome>,
}

impl Score {
    pub fn victory(touches: u32) -> Self {
        Self {
            touches,
            victory: true,
            special: None,
        }
    }

    pub fn defeat(touches: u32) -> Self {
        Self {
            touches,
            victory: false,
            special: None,
        }
    }
}

/// A single bout between two competitors.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub a: CompetitorId,
    pub b: CompetitorId,
    pub score_a: Option<Score>,
    pub score_b: Option<Score>,
    pub status: MatchStatus,
    /// Set by the score-entry layer; used to find the most recent bout when ordering the rest.
    pub finished_at: Option<DateTime<Utc>>,
}

impl Match {
    /// A pending bout. Both slots must hold different competitors.
    pub fn new(a: CompetitorId, b: CompetitorId) -> Result<Self, TournamentError> {
        if a == b {
            return Err(TournamentError::InvalidMatch);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            a,
            b,
            score_a: None,
            score_b: None,
            status: MatchStatus::Pending,
            finished_at: None,
        })
    }

    pub fn competitor(&self, side: Side) -> CompetitorId {
        match side {
            Side::A => self.a,
            Side::B => self.b,
        }
    }

    pub fn score(&self, side: Side) -> Option<Score> {
        match side {
            Side::A => self.score_a,
            Side::B => self.score_b,
        }
    }

    pub fn involves(&self, id: CompetitorId) -> bool {
        self.a == id || self.b == id
    }

    pub fn side_of(&self, id: CompetitorId) -> Option<Side> {
        if self.a == id {
            Some(Side::A)
        } else if self.b == id {
            Some(Side::B)
        } else {
            None
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    pub fn is_pending(&self) -> bool {
        self.status == MatchStatus::Pending
    }

    /// Mark a pending bout as being fenced.
    pub fn start(&mut self) -> Result<(), TournamentError> {
        if self.status != MatchStatus::Pending {
            return Err(TournamentError::InvalidState);
        }
        self.status = MatchStatus::InProgress;
        Ok(())
    }

    /// Record both sides' scores. Exactly one side must carry the victory flag.
    pub fn finish(&mut self, score_a: Score, score_b: Score) -> Result<(), TournamentError> {
        if score_a.victory == score_b.victory {
            return Err(TournamentError::InvalidScoreState(self.id));
        }
        self.score_a = Some(score_a);
        self.score_b = Some(score_b);
        self.status = MatchStatus::Finished;
        Ok(())
    }

    /// Record touches; the higher score wins. Equal touches need an explicit winner via `finish`.
    pub fn record_touches(&mut self, touches_a: u32, touches_b: u32) -> Result<(), TournamentError> {
        if touches_a == touches_b {
            return Err(TournamentError::InvalidScoreState(self.id));
        }
        self.finish(
            Score {
                touches: touches_a,
                victory: touches_a > touches_b,
                special: None,
            },
            Score {
                touches: touches_b,
                victory: touches_b > touches_a,
                special: None,
            },
        )
    }

    /// Record a drawn bout. Only ranking modes that accept draws will rank it.
    pub fn record_draw(&mut self, touches_a: u32, touches_b: u32) {
        self.score_a = Some(Score::defeat(touches_a));
        self.score_b = Some(Score::defeat(touches_b));
        self.status = MatchStatus::Finished;
    }

    /// End the bout because `loser` abandoned, forfeited or was excluded.
    /// Touches already on the sheet are kept; the opponent is credited with the victory.
    pub fn record_special(&mut self, loser: Side, outcome: SpecialOutcome) {
        let touches = |s: Option<Score>| s.map(|s| s.touches).unwrap_or(0);
        let losing = Score {
            touches: touches(self.score(loser)),
            victory: false,
            special: Some(outcome),
        };
        let winning = Score::victory(touches(self.score(loser.other())));
        match loser {
            Side::A => {
                self.score_a = Some(losing);
                self.score_b = Some(winning);
            }
            Side::B => {
                self.score_a = Some(winning);
                self.score_b = Some(losing);
            }
        }
        self.status = MatchStatus::Finished;
    }

    /// Winning side of a finished bout, `None` for a draw.
    /// Unfinished bouts, missing scores and double victories are rejected.
    pub fn outcome(&self) -> Result<Option<Side>, TournamentError> {
        if !self.is_finished() {
            return Err(TournamentError::InvalidState);
        }
        let (Some(a), Some(b)) = (self.score_a, self.score_b) else {
            return Err(TournamentError::InvalidScoreState(self.id));
        };
        match (a.victory, b.victory) {
            (true, false) => Ok(Some(Side::A)),
            (false, true) => Ok(Some(Side::B)),
            (false, false) => Ok(None),
            (true, true) => Err(TournamentError::InvalidScoreState(self.id)),
        }
    }

    /// Winner of a finished, decided bout.
    pub fn winner(&self) -> Option<CompetitorId> {
        match self.outcome() {
            Ok(Some(side)) => Some(self.competitor(side)),
            _ => None,
        }
    }
}
