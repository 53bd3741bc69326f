//! Room code → session registry.

use rustc_hash::FxHashMap;
use tracing::{debug, info, instrument, warn};

use crate::core::{EngineConfig, GameRng, PlayerId};
use crate::error::EngineError;

use super::record::GameRecord;
use super::room_code::RoomCode;
use super::session::Session;

/// Redraws allowed before `generate_room_code` gives up on a crowded space.
const MAX_CODE_DRAWS: usize = 10_000;

/// Owns every live session, keyed by room code.
///
/// The store holds no lock. Wrap it in whatever synchronisation the host
/// uses; each session inside is still a single-writer resource.
#[derive(Debug)]
pub struct SessionStore {
    sessions: FxHashMap<RoomCode, Session>,
    config: EngineConfig,
    rng: GameRng,
}

impl SessionStore {
    /// Empty store; new sessions get `config`.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let rng = GameRng::from_optional_seed(config.seed).for_context("room-codes");
        Self {
            sessions: FxHashMap::default(),
            config,
            rng,
        }
    }

    /// Configuration handed to new sessions.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Draw a room code not currently in use.
    ///
    /// # Errors
    ///
    /// `RoomCodesExhausted` if every code of the configured length is taken,
    /// or if `MAX_CODE_DRAWS` draws all collide.
    pub fn generate_room_code(&mut self) -> Result<RoomCode, EngineError> {
        let length = RoomCode::effective_length(self.config.room_code_length);
        if self.sessions.len() as u64 >= RoomCode::capacity(length) {
            warn!(length, rooms = self.sessions.len(), "Room code space is full");
            return Err(EngineError::RoomCodesExhausted { length });
        }

        for _ in 0..MAX_CODE_DRAWS {
            let code = RoomCode::generate(&mut self.rng, length);
            if !self.sessions.contains_key(&code) {
                return Ok(code);
            }
            debug!(%code, "Room code collision, drawing again");
        }

        warn!(length, draws = MAX_CODE_DRAWS, "No free room code found");
        Err(EngineError::RoomCodesExhausted { length })
    }

    /// Create a session under `room`.
    ///
    /// # Errors
    ///
    /// `RoomExists` if the room is taken, or any roster error from
    /// `Session::with_config`.
    #[instrument(skip(self, players))]
    pub fn create(
        &mut self,
        room: RoomCode,
        game_id: u64,
        players: impl IntoIterator<Item = PlayerId>,
    ) -> Result<&mut Session, EngineError> {
        if self.sessions.contains_key(&room) {
            warn!("Room already exists");
            return Err(EngineError::RoomExists(room.to_string()));
        }

        let session = Session::with_config(game_id, players, self.config.clone())?;
        info!(%room, "Room opened");
        Ok(self.sessions.entry(room).or_insert(session))
    }

    /// Create a session under a freshly drawn room code.
    ///
    /// # Errors
    ///
    /// `RoomCodesExhausted` if no code can be drawn, or any roster error
    /// from `Session::with_config`.
    pub fn open(
        &mut self,
        game_id: u64,
        players: impl IntoIterator<Item = PlayerId>,
    ) -> Result<(RoomCode, &mut Session), EngineError> {
        let room = self.generate_room_code()?;
        let session = Session::with_config(game_id, players, self.config.clone())?;
        info!(%room, game_id, "Room opened");
        Ok((room.clone(), self.sessions.entry(room).or_insert(session)))
    }

    /// Put an existing session (restored or decoded) under `room`,
    /// returning whatever was there before.
    pub fn insert(&mut self, room: RoomCode, session: Session) -> Option<Session> {
        debug!(%room, game_id = session.game_id(), "Session inserted");
        self.sessions.insert(room, session)
    }

    /// Session for `room`.
    #[must_use]
    pub fn get(&self, room: &RoomCode) -> Option<&Session> {
        self.sessions.get(room)
    }

    /// Mutable session for `room`.
    pub fn get_mut(&mut self, room: &RoomCode) -> Option<&mut Session> {
        self.sessions.get_mut(room)
    }

    /// Mutable session for `room`, or `RoomNotFound`.
    ///
    /// # Errors
    ///
    /// `RoomNotFound` if no session is stored under `room`.
    pub fn session_mut(&mut self, room: &RoomCode) -> Result<&mut Session, EngineError> {
        self.sessions
            .get_mut(room)
            .ok_or_else(|| EngineError::RoomNotFound(room.to_string()))
    }

    /// Remove a session.
    pub fn evict(&mut self, room: &RoomCode) -> Option<Session> {
        let session = self.sessions.remove(room);
        if session.is_some() {
            info!(%room, "Room closed");
        }
        session
    }

    /// Remove every finished session, returning their records.
    #[instrument(skip(self))]
    pub fn evict_finished(&mut self) -> Vec<(RoomCode, GameRecord)> {
        let finished: Vec<RoomCode> = self
            .sessions
            .iter()
            .filter(|(_, session)| session.winner().is_some())
            .map(|(room, _)| room.clone())
            .collect();

        let mut records: Vec<(RoomCode, GameRecord)> = finished
            .into_iter()
            .filter_map(|room| {
                let record = self.sessions.remove(&room)?.game_record()?;
                Some((room, record))
            })
            .collect();
        records.sort_by(|(a, _), (b, _)| a.cmp(b));

        info!(evicted = records.len(), "Finished rooms evicted");
        records
    }

    /// Room codes currently in use, sorted.
    #[must_use]
    pub fn rooms(&self) -> Vec<RoomCode> {
        let mut rooms: Vec<RoomCode> = self.sessions.keys().cloned().collect();
        rooms.sort();
        rooms
    }

    /// True if `room` holds a session.
    #[must_use]
    pub fn contains(&self, room: &RoomCode) -> bool {
        self.sessions.contains_key(room)
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True if no sessions are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
