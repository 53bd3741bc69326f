//! Night resolution.
//!
//! Covert actions are submitted simultaneously but resolved in a fixed
//! order, because each step reads what the previous one decided:
//!
//! 1. **Guard** picks `protected`.
//! 2. **Werewolves** collapse their picks into one `attacked` target.
//! 3. **Seer** learns whether the inspected player is a werewolf. This reads
//!    the role map only, so it ignores this night's deaths.
//! 4. **Witch** either antidotes the attacked player or poisons someone.
//!
//! Then deaths are applied:
//! - `attacked` dies iff alive, not protected, and not antidoted.
//! - `poisoned` dies iff alive, whatever the guard or antidote did.

use im::OrdSet;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{ActionRecord, NightAction, PlayerId, Potion, PotionStock, Role, WolfConsensus};

use super::roles::RoleMap;

/// Everything the resolver reads. Borrowed from the session.
pub struct NightInput<'a> {
    /// Dealt roles.
    pub roles: &'a RoleMap,

    /// Players alive at the start of resolution.
    pub alive: &'a OrdSet<PlayerId>,

    /// This round's pending actions, one per player.
    pub actions: &'a [ActionRecord],

    /// Werewolf consensus policy.
    pub consensus: WolfConsensus,

    /// Potions the witch still holds.
    pub potions: PotionStock,
}

/// What the seer learned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeerResult {
    pub seer: PlayerId,
    pub target: PlayerId,
    pub is_werewolf: bool,
}

/// Result of one night.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightOutcome {
    /// Players who died, attack victim first. No repeats.
    pub killed: SmallVec<[PlayerId; 2]>,

    /// Guard's pick.
    pub protected: Option<PlayerId>,

    /// The werewolves' collective target.
    pub attacked: Option<PlayerId>,

    /// Witch's poison target.
    pub poisoned: Option<PlayerId>,

    /// Seer's private result.
    pub seer_result: Option<SeerResult>,

    /// True if the witch antidoted the attacked player.
    pub was_saved: bool,

    /// Potions consumed tonight.
    pub potions_spent: SmallVec<[Potion; 2]>,
}

impl NightOutcome {
    /// True if nobody died.
    #[must_use]
    pub fn is_peaceful(&self) -> bool {
        self.killed.is_empty()
    }
}

/// Resolves one night's actions.
pub struct NightResolver;

impl NightResolver {
    /// Resolve `input` into an outcome. Pure: the caller applies deaths.
    #[must_use]
    pub fn resolve(input: &NightInput<'_>) -> NightOutcome {
        let mut ordered: Vec<&ActionRecord> = input.actions.iter().collect();
        ordered.sort_by_key(|r| r.sequence);

        let mut guard_pick: Option<PlayerId> = None;
        let mut wolf_picks: Vec<(PlayerId, u64)> = Vec::new();
        let mut seer_pick: Option<(PlayerId, PlayerId)> = None;
        let mut witch_pick: Option<NightAction> = None;

        for record in ordered {
            if !input.alive.contains(&record.player) {
                continue;
            }
            let (Some(role), Some(action)) = (input.roles.get(record.player), record.night_action())
            else {
                continue;
            };

            match (role, action) {
                (Role::Guard, NightAction::Protect(target)) => {
                    guard_pick.get_or_insert(target);
                }
                (Role::Werewolf, NightAction::Eliminate(target)) => {
                    wolf_picks.push((target, record.sequence));
                }
                (Role::Seer, NightAction::Inspect(target)) => {
                    seer_pick.get_or_insert((record.player, target));
                }
                (Role::Witch, NightAction::Save { .. } | NightAction::Poison(_)) => {
                    witch_pick.get_or_insert(action);
                }
                // Hunter's on-death shot is not resolved here.
                (Role::Villager | Role::Hunter, _) => {}
                // Action kind the role does not own.
                (Role::Guard | Role::Werewolf | Role::Seer | Role::Witch, _) => {}
            }
        }

        let mut outcome = NightOutcome {
            protected: guard_pick,
            attacked: Self::wolf_target(&wolf_picks, input.consensus),
            ..NightOutcome::default()
        };

        outcome.seer_result = seer_pick.map(|(seer, target)| SeerResult {
            seer,
            target,
            is_werewolf: input.roles.is_werewolf(target),
        });

        match witch_pick {
            Some(NightAction::Save { uses_antidote: true }) => {
                if input.potions.antidote && outcome.attacked.is_some() {
                    outcome.was_saved = true;
                    outcome.potions_spent.push(Potion::Antidote);
                }
            }
            Some(NightAction::Poison(target)) => {
                if input.potions.poison && input.alive.contains(&target) {
                    outcome.poisoned = Some(target);
                    outcome.potions_spent.push(Potion::Poison);
                }
            }
            Some(
                NightAction::Save { uses_antidote: false }
                | NightAction::Protect(_)
                | NightAction::Eliminate(_)
                | NightAction::Inspect(_),
            )
            | None => {}
        }

        if let Some(target) = outcome.attacked {
            let dies = input.alive.contains(&target)
                && outcome.protected != Some(target)
                && !outcome.was_saved;
            if dies {
                outcome.killed.push(target);
            }
        }

        if let Some(target) = outcome.poisoned {
            if !outcome.killed.contains(&target) {
                outcome.killed.push(target);
            }
        }

        outcome
    }

    /// Collapse werewolf picks (in arrival order) into one target.
    fn wolf_target(picks: &[(PlayerId, u64)], consensus: WolfConsensus) -> Option<PlayerId> {
        match consensus {
            WolfConsensus::FirstSubmitted => picks.first().map(|(target, _)| *target),
            WolfConsensus::Majority => {
                // target -> (votes, earliest sequence)
                let mut counts: FxHashMap<PlayerId, (usize, u64)> = FxHashMap::default();
                for &(target, sequence) in picks {
                    let entry = counts.entry(target).or_insert((0, sequence));
                    entry.0 += 1;
                    entry.1 = entry.1.min(sequence);
                }

                counts
                    .into_iter()
                    .max_by(|(_, (votes_a, seq_a)), (_, (votes_b, seq_b))| {
                        votes_a.cmp(votes_b).then(seq_b.cmp(seq_a))
                    })
                    .map(|(target, _)| target)
            }
        }
    }
}
