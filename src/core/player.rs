//! Player identification and the fixed roster of a game.
//!
//! ## PlayerId
//!
//! Type-safe player identifier. Ids come from the membership collaborator
//! (user ids), so they are sparse integers rather than seat indices.
//!
//! ## Roster
//!
//! The ordered, duplicate-free set of players in one session, kept in the
//! order the caller supplied. Role dealing shuffles a copy of it.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Player identifier, unique within a roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

impl From<u64> for PlayerId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// The fixed set of players in a game session.
///
/// ## Example
///
/// ```
/// use werewolf_engine::core::{PlayerId, Roster};
///
/// let roster = Roster::new((1..=6).map(PlayerId::new)).unwrap();
/// assert_eq!(roster.len(), 6);
/// assert!(roster.contains(PlayerId::new(3)));
/// assert!(!roster.contains(PlayerId::new(7)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<PlayerId>,
}

impl Roster {
    /// Build a roster, rejecting repeated ids.
    pub fn new(players: impl IntoIterator<Item = PlayerId>) -> Result<Self, EngineError> {
        let mut seen = rustc_hash::FxHashSet::default();
        let mut ordered = Vec::new();

        for player in players {
            if !seen.insert(player) {
                return Err(EngineError::DuplicatePlayer(player));
            }
            ordered.push(player);
        }

        Ok(Self { players: ordered })
    }

    /// Number of players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// True if the roster has no players.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Check roster membership.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        self.players.contains(&player)
    }

    /// Iterate in roster order.
    pub fn iter(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().copied()
    }

    /// Players as a slice, in roster order.
    #[must_use]
    pub fn as_slice(&self) -> &[PlayerId] {
        &self.players
    }
}
