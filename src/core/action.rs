//! Night actions, votes, and the submission history.
//!
//! Each living player holds at most one pending night action and one pending
//! vote per round. Every accepted submission is also kept as an
//! `ActionRecord` so downstream consumers can audit a finished game.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// A covert action submitted during the night.
///
/// ## Example
///
/// ```
/// use werewolf_engine::core::{ActionKind, NightAction, PlayerId};
///
/// let bite = NightAction::Eliminate(PlayerId::new(3));
/// assert_eq!(bite.kind(), ActionKind::Eliminate);
/// assert_eq!(bite.target(), Some(PlayerId::new(3)));
///
/// let save = NightAction::Save { uses_antidote: true };
/// assert_eq!(save.target(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NightAction {
    /// Guard shields a player from the werewolf attack.
    Protect(PlayerId),
    /// Werewolf attack.
    Eliminate(PlayerId),
    /// Seer learns whether the target is a werewolf.
    Inspect(PlayerId),
    /// Witch's antidote, aimed at whoever the werewolves attacked.
    Save { uses_antidote: bool },
    /// Witch's poison.
    Poison(PlayerId),
}

impl NightAction {
    /// The action kind, without its target.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            NightAction::Protect(_) => ActionKind::Protect,
            NightAction::Eliminate(_) => ActionKind::Eliminate,
            NightAction::Inspect(_) => ActionKind::Inspect,
            NightAction::Save { .. } => ActionKind::Save,
            NightAction::Poison(_) => ActionKind::Poison,
        }
    }

    /// The explicit target, if the action names one.
    #[must_use]
    pub const fn target(&self) -> Option<PlayerId> {
        match *self {
            NightAction::Protect(p)
            | NightAction::Eliminate(p)
            | NightAction::Inspect(p)
            | NightAction::Poison(p) => Some(p),
            NightAction::Save { .. } => None,
        }
    }
}

/// Night action kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Protect,
    Eliminate,
    Inspect,
    Save,
    Poison,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActionKind::Protect => "protect",
            ActionKind::Eliminate => "eliminate",
            ActionKind::Inspect => "inspect",
            ActionKind::Save => "save",
            ActionKind::Poison => "poison",
        };
        f.write_str(name)
    }
}

/// The value of a day vote.
///
/// `Abstain` is a valid ballot but never eliminates anyone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VoteTarget {
    Player(PlayerId),
    Abstain,
}

impl VoteTarget {
    /// The voted-for player, `None` for an abstention.
    #[must_use]
    pub const fn player(self) -> Option<PlayerId> {
        match self {
            VoteTarget::Player(p) => Some(p),
            VoteTarget::Abstain => None,
        }
    }
}

impl From<PlayerId> for VoteTarget {
    fn from(player: PlayerId) -> Self {
        VoteTarget::Player(player)
    }
}

impl std::fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoteTarget::Player(p) => write!(f, "{}", p),
            VoteTarget::Abstain => f.write_str("abstain"),
        }
    }
}

/// What a player submitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Submission {
    Night(NightAction),
    Vote(VoteTarget),
}

/// A recorded submission with metadata for ordering and auditing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who submitted.
    pub player: PlayerId,

    /// What was submitted.
    pub submission: Submission,

    /// Round number when submitted.
    pub round: u32,

    /// Arrival order across the whole session.
    pub sequence: u64,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: PlayerId, submission: Submission, round: u32, sequence: u64) -> Self {
        Self {
            player,
            submission,
            round,
            sequence,
        }
    }

    /// The night action, if this record holds one.
    #[must_use]
    pub fn night_action(&self) -> Option<NightAction> {
        match self.submission {
            Submission::Night(action) => Some(action),
            Submission::Vote(_) => None,
        }
    }

    /// The vote, if this record holds one.
    #[must_use]
    pub fn vote(&self) -> Option<VoteTarget> {
        match self.submission {
            Submission::Vote(target) => Some(target),
            Submission::Night(_) => None,
        }
    }
}
