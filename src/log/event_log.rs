//! Append-only event log.

use chrono::Utc;
use im::Vector;
use serde::{Deserialize, Serialize};

use super::entry::{EntryKind, LogEntry, Speech};
use crate::core::Phase;

/// Ordered, append-only record of narration and speech.
///
/// Entries are never edited or reordered. With a capacity set, the log
/// becomes a ring buffer: the oldest entries are dropped once the capacity
/// is exceeded, while `seq` numbers keep counting.
///
/// ## Example
///
/// ```
/// use werewolf_engine::core::Phase;
/// use werewolf_engine::log::EventLog;
///
/// let mut log = EventLog::new();
/// log.narrate(1, Phase::Night, "Night 1 begins");
/// log.narrate(1, Phase::Night, "Nobody died");
///
/// let recent = log.recent(1);
/// assert_eq!(recent.len(), 1);
/// assert_eq!(recent[0].message, "Nobody died");
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    entries: Vector<LogEntry>,
    capacity: Option<usize>,
    next_seq: u64,
}

impl EventLog {
    /// Create an unbounded log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log that retains at most `capacity` entries (minimum 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::default()
        }
    }

    /// Unbounded when `capacity` is `None`.
    #[must_use]
    pub fn bounded(capacity: Option<usize>) -> Self {
        capacity.map_or_else(Self::new, Self::with_capacity)
    }

    /// Append a system narration line.
    pub fn narrate(&mut self, round: u32, phase: Phase, message: impl Into<String>) -> &LogEntry {
        self.push(round, phase, message.into(), EntryKind::Narration)
    }

    /// Append a player speech.
    pub fn speak(&mut self, speech: &Speech) -> &LogEntry {
        let kind = EntryKind::Speech {
            player: speech.player,
            player_name: speech.player_name.clone(),
        };
        self.push(speech.round, speech.phase, speech.render(), kind)
    }

    fn push(&mut self, round: u32, phase: Phase, message: String, kind: EntryKind) -> &LogEntry {
        let entry = LogEntry {
            seq: self.next_seq,
            round,
            phase,
            message,
            timestamp: Utc::now(),
            kind,
        };
        self.next_seq += 1;
        self.entries.push_back(entry);

        if let Some(capacity) = self.capacity {
            while self.entries.len() > capacity {
                self.entries.pop_front();
            }
        }

        &self.entries[self.entries.len() - 1]
    }

    /// All retained entries, oldest first.
    #[must_use]
    pub fn all(&self) -> &Vector<LogEntry> {
        &self.entries
    }

    /// The last `min(limit, len)` entries, oldest first.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<LogEntry> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).cloned().collect()
    }

    /// Entries with `seq >= cursor`, for collaborators that poll.
    #[must_use]
    pub fn since(&self, cursor: u64) -> Vec<LogEntry> {
        self.entries
            .iter()
            .filter(|e| e.seq >= cursor)
            .cloned()
            .collect()
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ever appended, including evicted ones.
    /// Also the cursor to pass to `since` for "only what comes next".
    #[must_use]
    pub fn total_appended(&self) -> u64 {
        self.next_seq
    }

    /// Retention bound, if any.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}
