//! Observable session state.
//!
//! ## Phase
//!
//! The stage of the current round. The engine never advances it by itself;
//! the caller drives Night → Day → Voting and the engine moves to Result
//! once a winner is found.
//!
//! ## SessionState
//!
//! What `Session::state()` hands to collaborators. Built from `im`
//! collections, so taking one is O(1) no matter how long the game has run.

use im::OrdSet;
use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use super::role::Team;

/// Stage of a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Covert actions. Also the phase of a fresh session (round 0).
    #[default]
    Night,
    /// Discussion; votes are accepted.
    Day,
    /// Ballots only; votes are accepted.
    Voting,
    /// The game has a winner.
    Result,
}

impl Phase {
    /// Lowercase name used in log entries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Night => "night",
            Phase::Day => "day",
            Phase::Voting => "voting",
            Phase::Result => "result",
        }
    }

    /// True in the phases that accept votes.
    #[must_use]
    pub const fn accepts_votes(self) -> bool {
        match self {
            Phase::Day | Phase::Voting => true,
            Phase::Night | Phase::Result => false,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a session's public progression.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Game identifier supplied at creation.
    pub game_id: u64,

    /// Round number (0 before the first night).
    pub round: u32,

    /// Current phase.
    pub phase: Phase,

    /// Living players.
    pub alive: OrdSet<PlayerId>,

    /// Dead players.
    pub dead: OrdSet<PlayerId>,

    /// Winning team if the living counts decide the game.
    pub winner: Option<Team>,
}

impl SessionState {
    /// Check whether a player is alive.
    #[must_use]
    pub fn is_alive(&self, player: PlayerId) -> bool {
        self.alive.contains(&player)
    }
}
