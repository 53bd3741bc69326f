//! Event log: the session's audit trail.
//!
//! Every appended entry is a candidate for real-time fan-out. The engine
//! does not deliver anything; a notification collaborator polls with
//! `EventLog::since(cursor)` after each operation (or simply diffs
//! `total_appended`).

mod entry;
mod event_log;

pub use entry::{EntryKind, LogEntry, Speech};
pub use event_log::EventLog;
