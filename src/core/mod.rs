//! Core engine types: players, roles, actions, state, RNG, configuration.
//!
//! Everything here is plain data. The rules live in `rules`, and the
//! `session` module sequences them.

pub mod player;
pub mod role;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;

pub use player::{PlayerId, Roster};
pub use role::{Potion, PotionStock, Role, Team};
pub use rng::GameRng;
pub use config::{EngineConfig, WolfConsensus, MIN_PLAYERS};
pub use action::{ActionKind, ActionRecord, NightAction, Submission, VoteTarget};
pub use state::{Phase, SessionState};
