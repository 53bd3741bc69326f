//! Hand-off types for collaborators: membership rows in, views and
//! finished-game records out.

use chrono::{DateTime, Utc};
use im::OrdSet;
use serde::{Deserialize, Serialize};

use crate::core::{Phase, PlayerId, Role, Team};
use crate::log::LogEntry;

/// One membership row, as the storage collaborator keeps it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRecord {
    pub player: PlayerId,
    /// Missing roles restore as villagers.
    pub role: Option<Role>,
    pub alive: bool,
}

impl SeatRecord {
    /// A living seat with a known role.
    #[must_use]
    pub fn new(player: PlayerId, role: Role) -> Self {
        Self {
            player,
            role: Some(role),
            alive: true,
        }
    }

    /// Mark the seat dead.
    #[must_use]
    pub fn dead(mut self) -> Self {
        self.alive = false;
        self
    }
}

/// What one player may see: the public state plus their own role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub game_id: u64,
    pub player: PlayerId,
    pub role: Option<Role>,
    pub is_alive: bool,
    pub round: u32,
    pub phase: Phase,
    pub alive: OrdSet<PlayerId>,
    pub dead: OrdSet<PlayerId>,
    pub log: Vec<LogEntry>,
}

/// Summary of a finished game for durable storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: u64,
    pub winner: Team,
    /// Rounds played.
    pub rounds: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_secs: i64,
    /// Final role of every player.
    pub roles: Vec<(PlayerId, Role)>,
    /// Retained log entries.
    pub log: Vec<LogEntry>,
}
