//! Game rules: role dealing, night resolution, voting, win conditions.
//!
//! Every resolver here is a pure function over borrowed session data.
//! The `Session` applies their outcomes and writes the log.

pub mod roles;
pub mod night;
pub mod vote;
pub mod win;

pub use roles::{RoleAssigner, RoleCounts, RoleMap};
pub use night::{NightInput, NightOutcome, NightResolver, SeerResult};
pub use vote::{VoteDecision, VoteOutcome, VoteResolver};
pub use win::{Headcount, WinConditionEvaluator};
