//! # werewolf-engine
//!
//! Session engine for the social deduction game Werewolf: role dealing,
//! night/day sequencing, night action resolution, vote tallying, win
//! detection, and an event log for real-time fan-out.
//!
//! ## Design Principles
//!
//! 1. **No I/O**: The engine never touches a network or a database.
//!    Persistence and delivery are collaborators that consume
//!    `snapshot_bytes`, `GameRecord`, and `EventLog::since`.
//!
//! 2. **Fail Before Mutating**: Every operation validates first. A refused
//!    submission or an out-of-order call leaves the session untouched.
//!
//! 3. **Pure Rules**: `rules` resolvers are functions of borrowed state, so
//!    they can be tested and benchmarked without a session.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: Alive/dead sets, roles, and the log use
//!   `im-rs`, so `state()` and `player_view()` snapshots are cheap.
//!
//! - **Seeded Randomness**: Role dealing and room codes draw from a ChaCha8
//!   `GameRng`; a fixed `EngineConfig::seed` makes a game reproducible.
//!
//! ## Modules
//!
//! - `core`: Players, roles, actions, phases, RNG, configuration
//! - `error`: Engine, sequencing, and submission errors
//! - `log`: Event log and speeches
//! - `rules`: Role dealing, night resolution, voting, win conditions
//! - `session`: The per-game state machine and the room registry

pub mod core;
pub mod error;
pub mod log;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    PlayerId, Roster,
    Role, Team, Potion, PotionStock,
    GameRng,
    EngineConfig, WolfConsensus, MIN_PLAYERS,
    ActionKind, ActionRecord, NightAction, Submission, VoteTarget,
    Phase, SessionState,
};

pub use crate::error::{EngineError, IllegalAction, StateError};

pub use crate::log::{EntryKind, EventLog, LogEntry, Speech};

pub use crate::rules::{
    RoleAssigner, RoleCounts, RoleMap,
    NightInput, NightOutcome, NightResolver, SeerResult,
    VoteDecision, VoteOutcome, VoteResolver,
    Headcount, WinConditionEvaluator,
};

pub use crate::session::{GameRecord, PlayerView, RoomCode, SeatRecord, Session, SessionStore};
