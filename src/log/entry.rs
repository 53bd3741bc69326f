//! Log entry types.
//!
//! Narration is system-authored ("Night 2 begins"). Speech is
//! player-authored. A speech entry carries a rendered `message` of the form
//! `"<name>: <content>"`, so consumers that only read narration lines see
//! every speech too.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Phase, PlayerId};

/// What produced a log entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// System narration.
    Narration,
    /// Mirrored player speech.
    Speech {
        player: PlayerId,
        player_name: String,
    },
}

/// One line of the event log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Position in the log, counted from 0 over the whole session. Never
    /// reused, even after a bounded log evicts older entries.
    pub seq: u64,

    /// Round the entry belongs to.
    pub round: u32,

    /// Phase at append time.
    pub phase: Phase,

    /// Human-readable line.
    pub message: String,

    /// When the entry was appended.
    pub timestamp: DateTime<Utc>,

    /// Narration or speech.
    pub kind: EntryKind,
}

impl LogEntry {
    /// True for system narration.
    #[must_use]
    pub fn is_narration(&self) -> bool {
        matches!(self.kind, EntryKind::Narration)
    }

    /// The speaker, for speech entries.
    #[must_use]
    pub fn speaker(&self) -> Option<PlayerId> {
        match &self.kind {
            EntryKind::Speech { player, .. } => Some(*player),
            EntryKind::Narration => None,
        }
    }
}

/// A player's statement, as kept in the session's speech list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speech {
    pub round: u32,
    pub phase: Phase,
    pub player: PlayerId,
    pub player_name: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Speech {
    /// Narration form of the speech.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{}: {}", self.player_name, self.content)
    }
}
