//! Hidden roles and the teams they belong to.

use serde::{Deserialize, Serialize};

use super::action::ActionKind;

/// A player's hidden role.
///
/// Every resolver matches all variants, so adding a role (or giving the
/// hunter an on-death ability) has to touch each resolution site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Villager,
    Werewolf,
    Seer,
    Witch,
    /// Carries no resolved ability.
    Hunter,
    Guard,
}

impl Role {
    /// All roles, in table order.
    pub const ALL: [Role; 6] = [
        Role::Werewolf,
        Role::Seer,
        Role::Witch,
        Role::Hunter,
        Role::Guard,
        Role::Villager,
    ];

    /// Lowercase name used in logs and wire formats.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Villager => "villager",
            Role::Werewolf => "werewolf",
            Role::Seer => "seer",
            Role::Witch => "witch",
            Role::Hunter => "hunter",
            Role::Guard => "guard",
        }
    }

    /// The team this role wins with.
    #[must_use]
    pub const fn team(self) -> Team {
        match self {
            Role::Werewolf => Team::Werewolves,
            Role::Villager | Role::Seer | Role::Witch | Role::Hunter | Role::Guard => Team::Villagers,
        }
    }

    /// Check whether this role may submit the given night action.
    #[must_use]
    pub const fn can_perform(self, kind: ActionKind) -> bool {
        match self {
            Role::Werewolf => matches!(kind, ActionKind::Eliminate),
            Role::Seer => matches!(kind, ActionKind::Inspect),
            Role::Witch => matches!(kind, ActionKind::Save | ActionKind::Poison),
            Role::Guard => matches!(kind, ActionKind::Protect),
            Role::Villager | Role::Hunter => false,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of the game. The winning team is reported as a `Team`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Villagers,
    Werewolves,
}

impl Team {
    /// `"villagers"` or `"werewolves"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Team::Villagers => "villagers",
            Team::Werewolves => "werewolves",
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The witch's two single-use potions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Potion {
    Antidote,
    Poison,
}

impl std::fmt::Display for Potion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Potion::Antidote => f.write_str("antidote"),
            Potion::Poison => f.write_str("poison"),
        }
    }
}

/// Which potions the witch still holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotionStock {
    pub antidote: bool,
    pub poison: bool,
}

impl Default for PotionStock {
    fn default() -> Self {
        Self {
            antidote: true,
            poison: true,
        }
    }
}

impl PotionStock {
    /// Check whether a potion is still available.
    #[must_use]
    pub fn has(&self, potion: Potion) -> bool {
        match potion {
            Potion::Antidote => self.antidote,
            Potion::Poison => self.poison,
        }
    }

    /// Mark a potion as spent.
    pub fn spend(&mut self, potion: Potion) {
        match potion {
            Potion::Antidote => self.antidote = false,
            Potion::Poison => self.poison = false,
        }
    }
}
