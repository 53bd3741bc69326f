//! The per-game state machine.

use chrono::{DateTime, Utc};
use im::{OrdSet, Vector};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::core::{
    ActionKind, ActionRecord, EngineConfig, GameRng, NightAction, Phase, PlayerId, Potion,
    PotionStock, Role, Roster, SessionState, Submission, Team, VoteTarget, MIN_PLAYERS,
};
use crate::error::{EngineError, IllegalAction, StateError};
use crate::log::{EventLog, LogEntry, Speech};
use crate::rules::{
    NightInput, NightOutcome, NightResolver, RoleAssigner, RoleMap, VoteDecision, VoteOutcome,
    VoteResolver, WinConditionEvaluator,
};

use super::record::{GameRecord, PlayerView, SeatRecord};

/// What has already been resolved in the current round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct RoundMarks {
    night_processed: bool,
    votes_processed: bool,
}

/// One running game.
///
/// A session is a single-writer resource: it holds no lock, so the caller
/// must funnel every call for a room through one path (a task per room, or
/// a per-room mutex). Nothing here blocks or does I/O.
///
/// ## Lifecycle
///
/// ```
/// use werewolf_engine::core::{EngineConfig, PlayerId};
/// use werewolf_engine::session::Session;
///
/// let players = (1..=6).map(PlayerId::new);
/// let mut session = Session::with_config(1, players, EngineConfig::default().with_seed(42)).unwrap();
///
/// session.assign_roles().unwrap();
/// session.start_night().unwrap();
/// let outcome = session.process_night_actions().unwrap();
/// assert!(outcome.killed.is_empty());
///
/// session.start_day().unwrap();
/// assert_eq!(session.process_voting().unwrap(), None);
/// assert_eq!(session.check_winner(), None);
/// assert_eq!(session.round(), 1);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    game_id: u64,
    config: EngineConfig,
    roster: Roster,
    roles: RoleMap,
    alive: OrdSet<PlayerId>,
    dead: OrdSet<PlayerId>,
    round: u32,
    phase: Phase,
    marks: RoundMarks,
    pending_actions: FxHashMap<PlayerId, ActionRecord>,
    pending_votes: FxHashMap<PlayerId, ActionRecord>,
    potions: PotionStock,
    winner: Option<Team>,
    last_vote: Option<VoteOutcome>,
    log: EventLog,
    speeches: Vector<Speech>,
    history: Vector<ActionRecord>,
    next_sequence: u64,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a session with the default configuration.
    ///
    /// # Errors
    ///
    /// `NotEnoughPlayers`, `DuplicatePlayer`, or `TooManyPlayers` when
    /// `EngineConfig::max_players` is set.
    pub fn create(
        game_id: u64,
        players: impl IntoIterator<Item = PlayerId>,
    ) -> Result<Self, EngineError> {
        Self::with_config(game_id, players, EngineConfig::default())
    }

    /// Create a session.
    ///
    /// # Errors
    ///
    /// `NotEnoughPlayers`, `DuplicatePlayer`, or `TooManyPlayers` when
    /// `EngineConfig::max_players` is set.
    #[instrument(skip(players, config))]
    pub fn with_config(
        game_id: u64,
        players: impl IntoIterator<Item = PlayerId>,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        let roster = Roster::new(players)?;
        Self::check_roster_size(&roster, &config)?;

        info!(game_id, players = roster.len(), "Creating session");

        Ok(Self {
            game_id,
            alive: roster.iter().collect(),
            dead: OrdSet::new(),
            roles: RoleMap::default(),
            roster,
            round: 0,
            phase: Phase::Night,
            marks: RoundMarks::default(),
            pending_actions: FxHashMap::default(),
            pending_votes: FxHashMap::default(),
            potions: PotionStock::default(),
            winner: None,
            last_vote: None,
            log: EventLog::bounded(config.log_capacity),
            speeches: Vector::new(),
            history: Vector::new(),
            next_sequence: 0,
            started_at: None,
            finished_at: None,
            config,
        })
    }

    /// Rebuild a running game from membership rows.
    ///
    /// Roles come from the seats (missing ones become villagers) and dead
    /// seats go straight to the dead set. The session resumes at a round
    /// boundary: the next call is `start_night` or `start_day`.
    ///
    /// # Errors
    ///
    /// Same roster checks as `with_config`.
    #[instrument(skip(seats, config))]
    pub fn restore(
        game_id: u64,
        round: u32,
        seats: impl IntoIterator<Item = SeatRecord>,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        let seats: Vec<SeatRecord> = seats.into_iter().collect();
        let mut session = Self::with_config(game_id, seats.iter().map(|s| s.player), config)?;

        session.roles = RoleMap::from_pairs(
            seats
                .iter()
                .map(|s| (s.player, s.role.unwrap_or(Role::Villager))),
        );
        for seat in seats.iter().filter(|s| !s.alive) {
            session.alive.remove(&seat.player);
            session.dead.insert(seat.player);
        }

        session.round = round;
        session.marks = RoundMarks {
            night_processed: true,
            votes_processed: true,
        };
        session.started_at = Some(Utc::now());
        session.log.narrate(round, Phase::Night, "The game has been restored");

        info!(game_id, round, dead = session.dead.len(), "Restored session");
        Ok(session)
    }

    fn check_roster_size(roster: &Roster, config: &EngineConfig) -> Result<(), EngineError> {
        if roster.len() < MIN_PLAYERS {
            return Err(EngineError::NotEnoughPlayers {
                required: MIN_PLAYERS,
                actual: roster.len(),
            });
        }
        if let Some(max) = config.max_players {
            if roster.len() > max {
                return Err(EngineError::TooManyPlayers {
                    max,
                    actual: roster.len(),
                });
            }
        }
        Ok(())
    }

    // === Setup ===

    /// Deal roles. Allowed exactly once.
    ///
    /// # Errors
    ///
    /// `RolesAlreadyAssigned` on a second call.
    #[instrument(skip(self), fields(game_id = self.game_id))]
    pub fn assign_roles(&mut self) -> Result<&RoleMap, EngineError> {
        if !self.roles.is_empty() {
            warn!("Roles already assigned");
            return Err(EngineError::RolesAlreadyAssigned);
        }

        let mut rng = GameRng::from_optional_seed(self.config.seed).for_context("roles");
        self.roles = RoleAssigner::assign(self.roster.as_slice(), &mut rng)?;
        self.started_at = Some(Utc::now());
        self.log
            .narrate(0, self.phase, "The game begins: roles have been assigned");

        info!(players = self.roles.len(), "Roles assigned");
        Ok(&self.roles)
    }

    // === Phase transitions ===

    /// Begin the next night: round += 1, pending actions cleared.
    ///
    /// # Errors
    ///
    /// `RolesNotAssigned` before `assign_roles`, `GameOver` after a winner.
    #[instrument(skip(self), fields(game_id = self.game_id))]
    pub fn start_night(&mut self) -> Result<u32, EngineError> {
        self.ensure_running()?;
        if self.roles.is_empty() {
            return Err(EngineError::RolesNotAssigned);
        }

        self.round += 1;
        self.phase = Phase::Night;
        self.pending_actions.clear();
        self.marks = RoundMarks::default();
        self.log.narrate(
            self.round,
            self.phase,
            format!("Night {} begins: players with night abilities may act", self.round),
        );

        info!(round = self.round, "Night started");
        Ok(self.round)
    }

    /// Begin the day: pending votes cleared.
    ///
    /// # Errors
    ///
    /// `GameOver`, `RoundNotStarted` before the first night, or
    /// `WrongPhase` unless the current phase is Night.
    #[instrument(skip(self), fields(game_id = self.game_id, round = self.round))]
    pub fn start_day(&mut self) -> Result<(), EngineError> {
        self.ensure_running()?;
        self.ensure_round_started("start day")?;
        if self.phase != Phase::Night {
            return Err(self.wrong_phase("start day"));
        }

        self.phase = Phase::Day;
        self.pending_votes.clear();
        self.marks.votes_processed = false;
        self.log.narrate(
            self.round,
            self.phase,
            format!("Day {} begins: discuss", self.round),
        );

        info!("Day started");
        Ok(())
    }

    /// Close discussion and take ballots. Votes already cast are kept.
    ///
    /// # Errors
    ///
    /// `GameOver`, or `WrongPhase` unless the current phase is Day.
    #[instrument(skip(self), fields(game_id = self.game_id, round = self.round))]
    pub fn start_voting(&mut self) -> Result<(), EngineError> {
        self.ensure_running()?;
        if self.phase != Phase::Day {
            return Err(self.wrong_phase("start voting"));
        }

        self.phase = Phase::Voting;
        self.log.narrate(self.round, self.phase, "Voting begins");

        info!("Voting started");
        Ok(())
    }

    // === Submissions ===

    /// Record a night action; `false` if it was refused.
    ///
    /// A later action by the same player this round replaces the earlier one.
    pub fn record_night_action(&mut self, player: PlayerId, action: NightAction) -> bool {
        self.submit_night_action(player, action).is_ok()
    }

    /// Record a night action, explaining refusals.
    ///
    /// # Errors
    ///
    /// The `IllegalAction` describing why the action was refused.
    #[instrument(skip(self), fields(game_id = self.game_id, round = self.round))]
    pub fn submit_night_action(
        &mut self,
        player: PlayerId,
        action: NightAction,
    ) -> Result<(), IllegalAction> {
        if let Err(reason) = self.validate_night_action(player, action) {
            warn!(%player, ?action, %reason, "Night action refused");
            return Err(reason);
        }

        let record = self.next_record(player, Submission::Night(action));
        self.pending_actions.insert(player, record);
        debug!(%player, ?action, "Night action recorded");
        Ok(())
    }

    fn validate_night_action(&self, player: PlayerId, action: NightAction) -> Result<(), IllegalAction> {
        self.validate_submitter(player)?;
        if self.phase != Phase::Night {
            return Err(IllegalAction::WrongPhase(self.phase));
        }
        if self.round == 0 || self.marks.night_processed {
            return Err(IllegalAction::NotOpen);
        }

        let role = self.roles.get(player).ok_or(IllegalAction::NotOpen)?;
        let kind = action.kind();
        if !role.can_perform(kind) {
            return Err(IllegalAction::NotCapable { role, action: kind });
        }

        if let Some(target) = action.target() {
            if !self.roster.contains(target) {
                return Err(IllegalAction::UnknownTarget(target));
            }
            let must_be_alive = match kind {
                ActionKind::Eliminate | ActionKind::Inspect | ActionKind::Poison => true,
                ActionKind::Protect | ActionKind::Save => false,
            };
            if must_be_alive && !self.alive.contains(&target) {
                return Err(IllegalAction::DeadTarget(target));
            }
        }

        match action {
            NightAction::Save { uses_antidote: true } if !self.potions.has(Potion::Antidote) => {
                Err(IllegalAction::PotionSpent(Potion::Antidote))
            }
            NightAction::Poison(_) if !self.potions.has(Potion::Poison) => {
                Err(IllegalAction::PotionSpent(Potion::Poison))
            }
            _ => Ok(()),
        }
    }

    /// Record a vote; `false` if it was refused. Last vote wins.
    pub fn record_vote(&mut self, voter: PlayerId, target: impl Into<VoteTarget>) -> bool {
        self.submit_vote(voter, target.into()).is_ok()
    }

    /// Record a vote, explaining refusals.
    ///
    /// # Errors
    ///
    /// The `IllegalAction` describing why the vote was refused.
    #[instrument(skip(self), fields(game_id = self.game_id, round = self.round))]
    pub fn submit_vote(&mut self, voter: PlayerId, target: VoteTarget) -> Result<(), IllegalAction> {
        if let Err(reason) = self.validate_vote(voter, target) {
            warn!(%voter, %target, %reason, "Vote refused");
            return Err(reason);
        }

        let record = self.next_record(voter, Submission::Vote(target));
        self.pending_votes.insert(voter, record);
        debug!(%voter, %target, "Vote recorded");
        Ok(())
    }

    fn validate_vote(&self, voter: PlayerId, target: VoteTarget) -> Result<(), IllegalAction> {
        self.validate_submitter(voter)?;
        if !self.phase.accepts_votes() {
            return Err(IllegalAction::WrongPhase(self.phase));
        }
        if self.marks.votes_processed {
            return Err(IllegalAction::NotOpen);
        }

        match target {
            VoteTarget::Abstain => Ok(()),
            VoteTarget::Player(player) if !self.roster.contains(player) => {
                Err(IllegalAction::UnknownTarget(player))
            }
            VoteTarget::Player(player) if !self.alive.contains(&player) => {
                Err(IllegalAction::DeadTarget(player))
            }
            VoteTarget::Player(_) => Ok(()),
        }
    }

    /// Record a speech; `false` if the speaker is unknown or dead.
    pub fn record_speech(&mut self, player: PlayerId, name: &str, content: &str) -> bool {
        self.submit_speech(player, name, content).is_ok()
    }

    /// Record a speech, explaining refusals.
    ///
    /// # Errors
    ///
    /// `UnknownPlayer`, `DeadPlayer`, or `GameOver`.
    #[instrument(skip(self, content), fields(game_id = self.game_id, round = self.round))]
    pub fn submit_speech(&mut self, player: PlayerId, name: &str, content: &str) -> Result<(), IllegalAction> {
        if let Err(reason) = self.validate_submitter(player) {
            warn!(%player, %reason, "Speech refused");
            return Err(reason);
        }

        let speech = Speech {
            round: self.round,
            phase: self.phase,
            player,
            player_name: name.to_string(),
            content: content.to_string(),
            timestamp: Utc::now(),
        };
        self.log.speak(&speech);
        self.speeches.push_back(speech);

        debug!(%player, "Speech recorded");
        Ok(())
    }

    fn validate_submitter(&self, player: PlayerId) -> Result<(), IllegalAction> {
        if self.winner.is_some() {
            return Err(IllegalAction::GameOver);
        }
        if !self.roster.contains(player) {
            return Err(IllegalAction::UnknownPlayer(player));
        }
        if !self.alive.contains(&player) {
            return Err(IllegalAction::DeadPlayer(player));
        }
        Ok(())
    }

    fn next_record(&mut self, player: PlayerId, submission: Submission) -> ActionRecord {
        let record = ActionRecord::new(player, submission, self.round, self.next_sequence);
        self.next_sequence += 1;
        self.history.push_back(record.clone());
        record
    }

    // === Resolution ===

    /// Resolve this round's night actions and apply deaths.
    ///
    /// The phase stays Night; call `start_day` next.
    ///
    /// # Errors
    ///
    /// `GameOver`, `RoundNotStarted`, `WrongPhase` outside Night, or
    /// `AlreadyProcessed` on a second call in the same round.
    #[instrument(skip(self), fields(game_id = self.game_id, round = self.round))]
    pub fn process_night_actions(&mut self) -> Result<NightOutcome, EngineError> {
        const OPERATION: &str = "process night actions";

        self.ensure_running()?;
        self.ensure_round_started(OPERATION)?;
        if self.phase != Phase::Night {
            return Err(self.wrong_phase(OPERATION));
        }
        if self.marks.night_processed {
            warn!("Night already processed");
            return Err(StateError::AlreadyProcessed {
                operation: OPERATION,
                round: self.round,
            }
            .into());
        }

        let actions: Vec<ActionRecord> = self.pending_actions.values().cloned().collect();
        let outcome = NightResolver::resolve(&NightInput {
            roles: &self.roles,
            alive: &self.alive,
            actions: &actions,
            consensus: self.config.wolf_consensus,
            potions: self.potions,
        });

        for potion in &outcome.potions_spent {
            self.potions.spend(*potion);
        }
        for player in &outcome.killed {
            self.kill(*player);
        }
        self.marks.night_processed = true;

        let summary = match outcome.killed.len() {
            0 => format!("Night {} ends: nobody died", self.round),
            1 => format!("Night {} ends: 1 player died", self.round),
            n => format!("Night {} ends: {} players died", self.round, n),
        };
        self.log.narrate(self.round, self.phase, summary);
        if outcome.protected.is_some() {
            self.log.narrate(self.round, self.phase, "The guard protected a player");
        }
        if outcome.was_saved {
            self.log
                .narrate(self.round, self.phase, "The witch used the antidote to save a player");
        }

        info!(
            killed = ?outcome.killed,
            protected = ?outcome.protected,
            saved = outcome.was_saved,
            "Night resolved"
        );
        Ok(outcome)
    }

    /// Tally this day's votes and apply the elimination, if any.
    ///
    /// The phase is left as is; call `check_winner` next.
    ///
    /// # Errors
    ///
    /// `GameOver`, `RoundNotStarted`, `WrongPhase` outside Day/Voting, or
    /// `AlreadyProcessed` on a second call in the same day.
    #[instrument(skip(self), fields(game_id = self.game_id, round = self.round))]
    pub fn process_voting(&mut self) -> Result<Option<PlayerId>, EngineError> {
        const OPERATION: &str = "process voting";

        self.ensure_running()?;
        self.ensure_round_started(OPERATION)?;
        if !self.phase.accepts_votes() {
            return Err(self.wrong_phase(OPERATION));
        }
        if self.marks.votes_processed {
            warn!("Voting already processed");
            return Err(StateError::AlreadyProcessed {
                operation: OPERATION,
                round: self.round,
            }
            .into());
        }

        let mut ballots: Vec<&ActionRecord> = self.pending_votes.values().collect();
        ballots.sort_by_key(|r| r.sequence);
        let outcome = VoteResolver::resolve(
            ballots
                .iter()
                .filter_map(|r| r.vote().map(|target| (r.player, target))),
            &self.alive,
        );

        let message = match &outcome.decision {
            VoteDecision::Eliminated { player, votes } => {
                format!("Voting ends: {} is eliminated with {} votes", player, votes)
            }
            VoteDecision::Tie { votes, .. } => {
                format!("Voting ends in a tie at {} votes: nobody is eliminated", votes)
            }
            VoteDecision::Abstained { .. } | VoteDecision::NoVotes => {
                "Voting ends: nobody is eliminated".to_string()
            }
        };

        let eliminated = outcome.eliminated();
        if let Some(player) = eliminated {
            self.kill(player);
        }
        self.marks.votes_processed = true;
        self.log.narrate(self.round, self.phase, message);

        info!(eliminated = ?eliminated, decision = ?outcome.decision, "Voting resolved");
        self.last_vote = Some(outcome);
        Ok(eliminated)
    }

    /// Check for a winner. The first time one is found the phase becomes
    /// Result and a terminal narration is written; later calls return the
    /// same winner without logging again.
    #[instrument(skip(self), fields(game_id = self.game_id, round = self.round))]
    pub fn check_winner(&mut self) -> Option<Team> {
        if self.winner.is_some() {
            return self.winner;
        }
        if self.roles.is_empty() {
            return None;
        }

        let winner = WinConditionEvaluator::evaluate(&self.roles, &self.alive)?;
        self.winner = Some(winner);
        self.phase = Phase::Result;
        self.finished_at = Some(Utc::now());
        self.pending_actions.clear();
        self.pending_votes.clear();

        let message = match winner {
            Team::Werewolves => "Game over: the werewolves win",
            Team::Villagers => "Game over: the villagers win",
        };
        self.log.narrate(self.round, self.phase, message);

        info!(%winner, "Game over");
        Some(winner)
    }

    fn kill(&mut self, player: PlayerId) {
        if self.alive.remove(&player).is_some() {
            self.dead.insert(player);
        }
    }

    fn ensure_running(&self) -> Result<(), EngineError> {
        if self.winner.is_some() {
            return Err(EngineError::GameOver);
        }
        Ok(())
    }

    fn ensure_round_started(&self, operation: &'static str) -> Result<(), EngineError> {
        if self.round == 0 {
            return Err(StateError::RoundNotStarted { operation }.into());
        }
        Ok(())
    }

    fn wrong_phase(&self, operation: &'static str) -> EngineError {
        warn!(operation, phase = %self.phase, "Operation in wrong phase");
        StateError::WrongPhase {
            operation,
            phase: self.phase,
        }
        .into()
    }

    // === Queries ===

    /// Game identifier.
    #[must_use]
    pub fn game_id(&self) -> u64 {
        self.game_id
    }

    /// Configuration in effect.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The roster.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Current round (0 before the first night).
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Dealt roles (empty before `assign_roles`).
    #[must_use]
    pub fn roles(&self) -> &RoleMap {
        &self.roles
    }

    /// A player's role.
    #[must_use]
    pub fn player_role(&self, player: PlayerId) -> Option<Role> {
        self.roles.get(player)
    }

    /// Living players.
    #[must_use]
    pub fn alive(&self) -> &OrdSet<PlayerId> {
        &self.alive
    }

    /// Dead players.
    #[must_use]
    pub fn dead(&self) -> &OrdSet<PlayerId> {
        &self.dead
    }

    /// Recorded winner, if `check_winner` found one.
    #[must_use]
    pub fn winner(&self) -> Option<Team> {
        self.winner
    }

    /// Witch potions still available.
    #[must_use]
    pub fn potions(&self) -> PotionStock {
        self.potions
    }

    /// A player's pending night action this round.
    #[must_use]
    pub fn pending_action(&self, player: PlayerId) -> Option<NightAction> {
        self.pending_actions.get(&player).and_then(ActionRecord::night_action)
    }

    /// A player's pending vote this day.
    #[must_use]
    pub fn pending_vote(&self, player: PlayerId) -> Option<VoteTarget> {
        self.pending_votes.get(&player).and_then(ActionRecord::vote)
    }

    /// Result of the most recent `process_voting`.
    #[must_use]
    pub fn last_vote(&self) -> Option<&VoteOutcome> {
        self.last_vote.as_ref()
    }

    /// Public progression snapshot.
    ///
    /// `winner` is evaluated on the spot (without logging), so it is set as
    /// soon as the living counts decide the game, even before `check_winner`.
    #[must_use]
    pub fn state(&self) -> SessionState {
        let winner = self.winner.or_else(|| {
            if self.roles.is_empty() {
                None
            } else {
                WinConditionEvaluator::evaluate(&self.roles, &self.alive)
            }
        });

        SessionState {
            game_id: self.game_id,
            round: self.round,
            phase: self.phase,
            alive: self.alive.clone(),
            dead: self.dead.clone(),
            winner,
        }
    }

    /// The event log.
    #[must_use]
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Every retained log entry, oldest first.
    #[must_use]
    pub fn all_log(&self) -> &Vector<LogEntry> {
        self.log.all()
    }

    /// The last `limit` entries (configured default when `None`).
    #[must_use]
    pub fn recent_log(&self, limit: Option<usize>) -> Vec<LogEntry> {
        self.log.recent(limit.unwrap_or(self.config.recent_log_limit))
    }

    /// Speeches in order.
    #[must_use]
    pub fn speeches(&self) -> &Vector<Speech> {
        &self.speeches
    }

    /// Every accepted submission, in arrival order.
    #[must_use]
    pub fn action_history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// What `player` may see.
    #[must_use]
    pub fn player_view(&self, player: PlayerId) -> Option<PlayerView> {
        if !self.roster.contains(player) {
            return None;
        }

        Some(PlayerView {
            game_id: self.game_id,
            player,
            role: self.roles.get(player),
            is_alive: self.alive.contains(&player),
            round: self.round,
            phase: self.phase,
            alive: self.alive.clone(),
            dead: self.dead.clone(),
            log: self.log.all().iter().cloned().collect(),
        })
    }

    /// Summary for durable storage, once the game has a winner.
    #[must_use]
    pub fn game_record(&self) -> Option<GameRecord> {
        let winner = self.winner?;
        let finished_at = self.finished_at.unwrap_or_else(Utc::now);
        let started_at = self.started_at.unwrap_or(finished_at);

        Some(GameRecord {
            game_id: self.game_id,
            winner,
            rounds: self.round,
            started_at,
            finished_at,
            duration_secs: (finished_at - started_at).num_seconds(),
            roles: self.roles.iter().collect(),
            log: self.log.all().iter().cloned().collect(),
        })
    }

    // === Snapshots ===

    /// Encode the whole session for the caller to persist.
    ///
    /// # Errors
    ///
    /// `Snapshot` if encoding fails.
    pub fn snapshot_bytes(&self) -> Result<Vec<u8>, EngineError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a session written by `snapshot_bytes`.
    ///
    /// # Errors
    ///
    /// `Snapshot` if the bytes are not a valid snapshot.
    pub fn from_snapshot_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: u64) -> PlayerId {
        PlayerId::new(id)
    }

    /// Eight players with fixed roles:
    /// 1,2 werewolves; 3 seer; 4 witch; 5 guard; 6,7 villagers; 8 hunter.
    fn fixed_session() -> Session {
        let seats = [
            (1, Role::Werewolf),
            (2, Role::Werewolf),
            (3, Role::Seer),
            (4, Role::Witch),
            (5, Role::Guard),
            (6, Role::Villager),
            (7, Role::Villager),
            (8, Role::Hunter),
        ]
        .map(|(id, role)| SeatRecord::new(p(id), role));

        Session::restore(1, 0, seats, EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_create_rejects_small_roster() {
        let result = Session::create(1, (1..=5).map(p));
        assert!(matches!(
            result,
            Err(EngineError::NotEnoughPlayers { required: 6, actual: 5 })
        ));
    }

    #[test]
    fn test_create_rejects_large_roster() {
        let config = EngineConfig::default().with_max_players(8);
        let result = Session::with_config(1, (1..=9).map(p), config);
        assert!(matches!(result, Err(EngineError::TooManyPlayers { max: 8, actual: 9 })));
    }

    #[test]
    fn test_assign_roles_once() {
        let mut session = Session::with_config(1, (1..=8).map(p), EngineConfig::default().with_seed(1)).unwrap();
        assert_eq!(session.assign_roles().unwrap().len(), 8);
        assert!(matches!(session.assign_roles(), Err(EngineError::RolesAlreadyAssigned)));
    }

    #[test]
    fn test_start_night_requires_roles() {
        let mut session = Session::create(1, (1..=6).map(p)).unwrap();
        assert!(matches!(session.start_night(), Err(EngineError::RolesNotAssigned)));
        assert_eq!(session.round(), 0);
    }

    #[test]
    fn test_process_before_start_is_state_error() {
        let mut session = fixed_session();
        assert!(matches!(
            session.process_night_actions(),
            Err(EngineError::State(StateError::RoundNotStarted { .. }))
        ));
        assert!(matches!(
            session.process_voting(),
            Err(EngineError::State(StateError::RoundNotStarted { .. }))
        ));
    }

    #[test]
    fn test_night_cannot_be_processed_twice() {
        let mut session = fixed_session();
        session.start_night().unwrap();
        session.process_night_actions().unwrap();

        let log_len = session.all_log().len();
        assert!(matches!(
            session.process_night_actions(),
            Err(EngineError::State(StateError::AlreadyProcessed { round: 1, .. }))
        ));
        assert_eq!(session.all_log().len(), log_len);
    }

    #[test]
    fn test_voting_needs_day() {
        let mut session = fixed_session();
        session.start_night().unwrap();
        assert!(matches!(
            session.process_voting(),
            Err(EngineError::State(StateError::WrongPhase { phase: Phase::Night, .. }))
        ));
    }

    #[test]
    fn test_dead_player_cannot_act() {
        let mut session = fixed_session();
        session.start_night().unwrap();
        session.record_night_action(p(1), NightAction::Eliminate(p(6)));
        session.process_night_actions().unwrap();
        session.start_night().unwrap();

        assert_eq!(
            session.submit_night_action(p(6), NightAction::Eliminate(p(7))),
            Err(IllegalAction::DeadPlayer(p(6)))
        );
    }

    #[test]
    fn test_capability_is_checked() {
        let mut session = fixed_session();
        session.start_night().unwrap();

        assert_eq!(
            session.submit_night_action(p(6), NightAction::Inspect(p(1))),
            Err(IllegalAction::NotCapable {
                role: Role::Villager,
                action: ActionKind::Inspect,
            })
        );
        assert!(!session.record_night_action(p(8), NightAction::Eliminate(p(1))));
    }

    #[test]
    fn test_night_action_overwrite() {
        let mut session = fixed_session();
        session.start_night().unwrap();

        assert!(session.record_night_action(p(1), NightAction::Eliminate(p(6))));
        assert!(session.record_night_action(p(1), NightAction::Eliminate(p(7))));
        assert_eq!(session.pending_action(p(1)), Some(NightAction::Eliminate(p(7))));
        assert_eq!(session.action_history().len(), 2);

        let outcome = session.process_night_actions().unwrap();
        assert_eq!(outcome.killed.as_slice(), &[p(7)]);
    }

    #[test]
    fn test_actions_rejected_during_day() {
        let mut session = fixed_session();
        session.start_night().unwrap();
        session.start_day().unwrap();

        assert_eq!(
            session.submit_night_action(p(1), NightAction::Eliminate(p(6))),
            Err(IllegalAction::WrongPhase(Phase::Day))
        );
    }

    #[test]
    fn test_actions_rejected_after_night_resolved() {
        let mut session = fixed_session();
        session.start_night().unwrap();
        session.process_night_actions().unwrap();

        assert_eq!(
            session.submit_night_action(p(1), NightAction::Eliminate(p(6))),
            Err(IllegalAction::NotOpen)
        );
    }

    #[test]
    fn test_potions_are_single_use() {
        let mut session = fixed_session();
        session.start_night().unwrap();
        session.record_night_action(p(1), NightAction::Eliminate(p(6)));
        session.record_night_action(p(4), NightAction::Save { uses_antidote: true });
        let outcome = session.process_night_actions().unwrap();
        assert!(outcome.was_saved);
        assert!(!session.potions().antidote);

        session.start_night().unwrap();
        assert_eq!(
            session.submit_night_action(p(4), NightAction::Save { uses_antidote: true }),
            Err(IllegalAction::PotionSpent(Potion::Antidote))
        );
        assert!(session.record_night_action(p(4), NightAction::Poison(p(1))));
    }

    #[test]
    fn test_vote_validation() {
        let mut session = fixed_session();
        session.start_night().unwrap();
        session.record_night_action(p(1), NightAction::Eliminate(p(6)));
        session.process_night_actions().unwrap();
        session.start_day().unwrap();

        assert_eq!(session.submit_vote(p(6), VoteTarget::Abstain), Err(IllegalAction::DeadPlayer(p(6))));
        assert_eq!(
            session.submit_vote(p(7), VoteTarget::Player(p(6))),
            Err(IllegalAction::DeadTarget(p(6)))
        );
        assert_eq!(
            session.submit_vote(p(7), VoteTarget::Player(p(99))),
            Err(IllegalAction::UnknownTarget(p(99)))
        );
        assert!(session.record_vote(p(7), VoteTarget::Abstain));
        assert!(session.record_vote(p(7), p(1)));
        assert_eq!(session.pending_vote(p(7)), Some(VoteTarget::Player(p(1))));
    }

    #[test]
    fn test_votes_carry_into_voting_phase() {
        let mut session = fixed_session();
        session.start_night().unwrap();
        session.start_day().unwrap();
        session.record_vote(p(3), p(1));
        session.record_vote(p(4), p(1));
        session.start_voting().unwrap();
        session.record_vote(p(5), p(2));

        assert_eq!(session.process_voting().unwrap(), Some(p(1)));
        assert!(session.dead().contains(&p(1)));
    }

    #[test]
    fn test_check_winner_is_idempotent() {
        let mut session = fixed_session();
        session.start_night().unwrap();
        session.start_day().unwrap();
        session.record_vote(p(3), p(1));
        session.process_voting().unwrap();

        session.start_night().unwrap();
        session.start_day().unwrap();
        session.record_vote(p(3), p(2));
        session.process_voting().unwrap();

        assert_eq!(session.check_winner(), Some(Team::Villagers));
        let log_len = session.all_log().len();
        assert_eq!(session.check_winner(), Some(Team::Villagers));
        assert_eq!(session.all_log().len(), log_len);
        assert_eq!(session.phase(), Phase::Result);
        assert!(matches!(session.start_night(), Err(EngineError::GameOver)));
        assert!(!session.record_speech(p(3), "Seer", "told you"));
    }

    #[test]
    fn test_speech_mirrored_into_log() {
        let mut session = fixed_session();
        session.start_night().unwrap();
        session.start_day().unwrap();

        assert!(session.record_speech(p(3), "Carol", "Player 1 is a wolf"));
        let last = session.recent_log(Some(1));
        assert_eq!(last[0].message, "Carol: Player 1 is a wolf");
        assert_eq!(last[0].phase, Phase::Day);
        assert_eq!(session.speeches().len(), 1);
        assert!(!session.record_speech(p(42), "Nobody", "hello"));
    }

    #[test]
    fn test_state_reports_winner_without_logging() {
        let seats = [
            SeatRecord::new(p(1), Role::Werewolf),
            SeatRecord::new(p(2), Role::Werewolf),
            SeatRecord::new(p(3), Role::Villager).dead(),
            SeatRecord::new(p(4), Role::Villager).dead(),
            SeatRecord::new(p(5), Role::Villager).dead(),
            SeatRecord::new(p(6), Role::Seer),
        ];
        let session = Session::restore(1, 3, seats, EngineConfig::default()).unwrap();
        let log_len = session.all_log().len();

        assert_eq!(session.state().winner, Some(Team::Werewolves));
        assert_eq!(session.winner(), None);
        assert_eq!(session.all_log().len(), log_len);
    }

    #[test]
    fn test_restore_defaults_missing_roles() {
        let mut seats: Vec<SeatRecord> = (1..=6).map(|id| SeatRecord::new(p(id), Role::Villager)).collect();
        seats[0].role = Some(Role::Werewolf);
        seats[5].role = None;

        let session = Session::restore(9, 2, seats, EngineConfig::default()).unwrap();
        assert_eq!(session.player_role(p(6)), Some(Role::Villager));
        assert_eq!(session.round(), 2);
    }

    #[test]
    fn test_player_view() {
        let session = fixed_session();
        let view = session.player_view(p(3)).unwrap();

        assert_eq!(view.role, Some(Role::Seer));
        assert!(view.is_alive);
        assert!(session.player_view(p(100)).is_none());
    }

    #[test]
    fn test_game_record_after_win() {
        let mut session = fixed_session();
        assert!(session.game_record().is_none());

        for wolf in [p(1), p(2)] {
            session.start_night().unwrap();
            session.start_day().unwrap();
            session.record_vote(p(3), wolf);
            session.process_voting().unwrap();
        }
        session.check_winner();

        let record = session.game_record().unwrap();
        assert_eq!(record.winner, Team::Villagers);
        assert_eq!(record.rounds, 2);
        assert_eq!(record.roles.len(), 8);
        assert!(record.duration_secs >= 0);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut session = fixed_session();
        session.start_night().unwrap();
        session.record_night_action(p(1), NightAction::Eliminate(p(7)));

        let bytes = session.snapshot_bytes().unwrap();
        let mut restored = Session::from_snapshot_bytes(&bytes).unwrap();

        assert_eq!(restored.round(), 1);
        assert_eq!(restored.pending_action(p(1)), Some(NightAction::Eliminate(p(7))));
        assert_eq!(restored.all_log().len(), session.all_log().len());

        let outcome = restored.process_night_actions().unwrap();
        assert_eq!(outcome.killed.as_slice(), &[p(7)]);
    }

    #[test]
    fn test_snapshot_rejects_garbage() {
        assert!(matches!(
            Session::from_snapshot_bytes(&[1, 2, 3]),
            Err(EngineError::Snapshot(_))
        ));
    }
}
