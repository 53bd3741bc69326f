//! Short, shareable room codes.

use serde::{Deserialize, Serialize};

use crate::core::GameRng;
use crate::error::EngineError;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Longest code a room can have.
pub const MAX_ROOM_CODE_LEN: usize = 10;

/// A room code: 1–10 uppercase ASCII letters or digits.
///
/// ```
/// use werewolf_engine::session::RoomCode;
///
/// let code = RoomCode::parse("AB12CD").unwrap();
/// assert_eq!(code.as_str(), "AB12CD");
/// assert!(RoomCode::parse("ab12").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Validate a code.
    pub fn parse(code: &str) -> Result<Self, EngineError> {
        let valid = !code.is_empty()
            && code.len() <= MAX_ROOM_CODE_LEN
            && code.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());

        if valid {
            Ok(Self(code.to_string()))
        } else {
            Err(EngineError::InvalidRoomCode(code.to_string()))
        }
    }

    /// Draw a random code of `length` characters (clamped to 1..=10).
    #[must_use]
    pub fn generate(rng: &mut GameRng, length: usize) -> Self {
        let length = Self::effective_length(length);
        let code = (0..length)
            .map(|_| ALPHABET[rng.index(ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    /// Length `generate` actually draws for a requested `length`.
    #[must_use]
    pub fn effective_length(length: usize) -> usize {
        length.clamp(1, MAX_ROOM_CODE_LEN)
    }

    /// Number of distinct codes of `length` characters.
    #[must_use]
    pub fn capacity(length: usize) -> u64 {
        let alphabet = ALPHABET.len() as u64;
        (0..Self::effective_length(length)).fold(1u64, |n, _| n.saturating_mul(alphabet))
    }

    /// The code as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RoomCode {
    type Error = EngineError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::parse(&code)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

impl std::str::FromStr for RoomCode {
    type Err = EngineError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Self::parse(code)
    }
}
