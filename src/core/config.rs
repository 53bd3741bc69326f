//! Engine configuration.
//!
//! The orchestration layer builds one `EngineConfig` (usually from its own
//! settings file) and hands it to every session it creates.

use serde::{Deserialize, Serialize};

/// Smallest roster that can be dealt roles.
pub const MIN_PLAYERS: usize = 6;

/// How the werewolves' individual picks collapse into one attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WolfConsensus {
    /// Most-picked target wins. Ties go to the target whose first
    /// supporting pick arrived earliest.
    #[default]
    Majority,
    /// The earliest pick wins regardless of the others.
    FirstSubmitted,
}

/// Session configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest roster a session accepts (`None` = no cap).
    pub max_players: Option<usize>,

    /// Default `k` for `recent_log` queries.
    pub recent_log_limit: usize,

    /// Keep at most this many log entries (`None` = unbounded).
    /// Oldest entries are evicted first.
    pub log_capacity: Option<usize>,

    /// Werewolf target selection.
    pub wolf_consensus: WolfConsensus,

    /// Seed for role deals. `None` draws from OS entropy.
    pub seed: Option<u64>,

    /// Length of generated room codes.
    pub room_code_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_players: None,
            recent_log_limit: 20,
            log_capacity: None,
            wolf_consensus: WolfConsensus::Majority,
            seed: None,
            room_code_length: 6,
        }
    }
}

impl EngineConfig {
    /// Cap the roster size.
    #[must_use]
    pub fn with_max_players(mut self, max: usize) -> Self {
        self.max_players = Some(max);
        self
    }

    /// Set the default recent-log window.
    #[must_use]
    pub fn with_recent_log_limit(mut self, limit: usize) -> Self {
        self.recent_log_limit = limit;
        self
    }

    /// Bound the log to a ring buffer of `capacity` entries.
    #[must_use]
    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = Some(capacity);
        self
    }

    /// Set the werewolf consensus policy.
    #[must_use]
    pub fn with_wolf_consensus(mut self, consensus: WolfConsensus) -> Self {
        self.wolf_consensus = consensus;
        self
    }

    /// Use a fixed seed for role deals.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the generated room code length.
    #[must_use]
    pub fn with_room_code_length(mut self, length: usize) -> Self {
        self.room_code_length = length;
        self
    }
}
