//! Running games.
//!
//! ## Session Lifecycle
//!
//! ```text
//! create ─► assign_roles ─► start_night ─► process_night_actions
//!                               ▲                    │
//!                               │                    ▼
//!                          check_winner ◄─ process_voting ◄─ start_day (─► start_voting)
//! ```
//!
//! `check_winner` is usually called after both resolutions. Once it finds a
//! winner the phase is Result and every mutating call is refused.
//!
//! `SessionStore` keys sessions by `RoomCode` and hands out finished-game
//! records when rooms are evicted.

mod record;
mod room_code;
#[allow(clippy::module_inception)]
mod session;
mod store;

pub use record::{GameRecord, PlayerView, SeatRecord};
pub use room_code::{RoomCode, MAX_ROOM_CODE_LEN};
pub use session::Session;
pub use store::SessionStore;
