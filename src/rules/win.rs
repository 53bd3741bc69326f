//! Win conditions.

use im::OrdSet;
use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, Role, Team};

use super::roles::RoleMap;

/// Living werewolves against everyone else alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headcount {
    pub werewolves: usize,
    pub others: usize,
}

/// Decides whether the game is over.
pub struct WinConditionEvaluator;

impl WinConditionEvaluator {
    /// Count the living by side.
    #[must_use]
    pub fn headcount(roles: &RoleMap, alive: &OrdSet<PlayerId>) -> Headcount {
        let mut count = Headcount {
            werewolves: 0,
            others: 0,
        };

        for player in alive {
            match roles.get(*player) {
                Some(Role::Werewolf) => count.werewolves += 1,
                Some(Role::Villager | Role::Seer | Role::Witch | Role::Hunter | Role::Guard)
                | None => count.others += 1,
            }
        }

        count
    }

    /// Evaluate in order:
    /// 1. werewolves win when they are at least as many as the rest
    ///    (this includes nobody alive at all);
    /// 2. villagers win when no werewolf is alive;
    /// 3. otherwise the game goes on.
    #[must_use]
    pub fn evaluate(roles: &RoleMap, alive: &OrdSet<PlayerId>) -> Option<Team> {
        Self::decide(Self::headcount(roles, alive))
    }

    /// Decide from a headcount.
    #[must_use]
    pub fn decide(count: Headcount) -> Option<Team> {
        if count.werewolves >= count.others {
            Some(Team::Werewolves)
        } else if count.werewolves == 0 {
            Some(Team::Villagers)
        } else {
            None
        }
    }
}
