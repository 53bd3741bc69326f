//! Error types for the session engine.
//!
//! Three layers:
//! - `EngineError`: setup and lifecycle failures (roster, roles, store)
//! - `StateError`: operations called out of sequence
//! - `IllegalAction`: rejected submissions (dead actor, dead target, ...)
//!
//! None of them leave a session half-updated: every check runs before the
//! first mutation, so a failed call is simply absent from the log.

use crate::core::{ActionKind, Phase, PlayerId, Potion, Role};

/// Errors from session and store operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Roster too small to deal roles
    #[error("not enough players: need at least {required}, got {actual}")]
    NotEnoughPlayers {
        /// Minimum roster size
        required: usize,
        /// Roster size supplied
        actual: usize,
    },

    /// Roster larger than the configured cap
    #[error("too many players: at most {max}, got {actual}")]
    TooManyPlayers {
        /// Configured cap
        max: usize,
        /// Roster size supplied
        actual: usize,
    },

    /// Same id listed twice in a roster
    #[error("duplicate player in roster: {0}")]
    DuplicatePlayer(PlayerId),

    /// Id not in the roster
    #[error("unknown player: {0}")]
    UnknownPlayer(PlayerId),

    /// `assign_roles` called a second time
    #[error("roles have already been assigned")]
    RolesAlreadyAssigned,

    /// Round started before roles were dealt
    #[error("roles have not been assigned")]
    RolesNotAssigned,

    /// Operation out of sequence
    #[error(transparent)]
    State(#[from] StateError),

    /// The game already has a winner
    #[error("game is over")]
    GameOver,

    /// Store already holds a session for this room
    #[error("room already exists: {0}")]
    RoomExists(String),

    /// Store has no session for this room
    #[error("room not found: {0}")]
    RoomNotFound(String),

    /// Every room code of the configured length is taken
    #[error("no free room codes of length {length}")]
    RoomCodesExhausted {
        /// Code length in use
        length: usize,
    },

    /// Room code is empty, too long, or not uppercase alphanumeric
    #[error("invalid room code: {0:?}")]
    InvalidRoomCode(String),

    /// Snapshot encode/decode failure
    #[error("snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),
}

/// Sequencing violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// No round has been started yet
    #[error("cannot {operation}: no round has started")]
    RoundNotStarted {
        /// Operation that was attempted
        operation: &'static str,
    },

    /// Operation not valid in the current phase
    #[error("cannot {operation} during the {phase} phase")]
    WrongPhase {
        /// Operation that was attempted
        operation: &'static str,
        /// Phase at the time of the call
        phase: Phase,
    },

    /// Round already processed
    #[error("cannot {operation}: round {round} was already processed")]
    AlreadyProcessed {
        /// Operation that was attempted
        operation: &'static str,
        /// Round that was processed
        round: u32,
    },
}

/// Why a night action or vote was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IllegalAction {
    /// Submitter is not in the roster
    #[error("{0} is not in this game")]
    UnknownPlayer(PlayerId),

    /// Submitter is dead
    #[error("{0} is dead")]
    DeadPlayer(PlayerId),

    /// Target is not in the roster
    #[error("target {0} is not in this game")]
    UnknownTarget(PlayerId),

    /// Target is dead
    #[error("target {0} is dead")]
    DeadTarget(PlayerId),

    /// Submission outside the phase that accepts it
    #[error("not accepted during the {0} phase")]
    WrongPhase(Phase),

    /// No round started yet, or this round's submissions were already resolved
    #[error("submissions are not open")]
    NotOpen,

    /// Role has no such ability
    #[error("a {role} cannot {action}")]
    NotCapable {
        /// Submitter's role
        role: Role,
        /// Attempted action
        action: ActionKind,
    },

    /// Witch already used this potion
    #[error("the {0} has already been used")]
    PotionSpent(Potion),

    /// The game already has a winner
    #[error("game is over")]
    GameOver,
}
