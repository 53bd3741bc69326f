//! Role dealing.
//!
//! | n     | Werewolf | Seer | Witch | Hunter | Guard | Villager |
//! |-------|----------|------|-------|--------|-------|----------|
//! | 6–7   | 1        | 1    | 0     | 0      | 0     | n-2      |
//! | 8–9   | 2        | 1    | 1     | 0      | 0     | n-4      |
//! | 10–11 | 2        | 1    | 1     | 1      | 0     | n-5      |
//! | ≥12   | 2        | 1    | 1     | 1      | 1     | n-6      |
//!
//! The roster is shuffled, the special roles go to the first seats of the
//! shuffled order, and everyone else is a villager. From 8 players up, one
//! villager chosen uniformly at random is then turned into the second
//! werewolf.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use crate::core::{GameRng, PlayerId, Role, Roster, MIN_PLAYERS};
use crate::error::EngineError;

/// Player → role mapping. Set once per game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleMap {
    roles: OrdMap<PlayerId, Role>,
}

impl RoleMap {
    /// Build from explicit pairs (used when restoring a game).
    pub fn from_pairs(pairs: impl IntoIterator<Item = (PlayerId, Role)>) -> Self {
        Self {
            roles: pairs.into_iter().collect(),
        }
    }

    /// Role of a player.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<Role> {
        self.roles.get(&player).copied()
    }

    /// True if the player is a werewolf.
    #[must_use]
    pub fn is_werewolf(&self, player: PlayerId) -> bool {
        self.get(player) == Some(Role::Werewolf)
    }

    /// Number of players with a role.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// True before roles are dealt.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Iterate (player, role) pairs in player id order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, Role)> + '_ {
        self.roles.iter().map(|(p, r)| (*p, *r))
    }

    /// Players holding `role`.
    pub fn players_with(&self, role: Role) -> impl Iterator<Item = PlayerId> + '_ {
        self.iter().filter(move |(_, r)| *r == role).map(|(p, _)| p)
    }

    /// How many players hold `role`.
    #[must_use]
    pub fn count(&self, role: Role) -> usize {
        self.players_with(role).count()
    }

    /// Per-role counts.
    #[must_use]
    pub fn counts(&self) -> RoleCounts {
        let mut counts = RoleCounts::default();
        for (_, role) in self.iter() {
            counts.add(role);
        }
        counts
    }
}

/// How many seats each role gets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounts {
    pub werewolf: usize,
    pub seer: usize,
    pub witch: usize,
    pub hunter: usize,
    pub guard: usize,
    pub villager: usize,
}

impl RoleCounts {
    fn add(&mut self, role: Role) {
        match role {
            Role::Werewolf => self.werewolf += 1,
            Role::Seer => self.seer += 1,
            Role::Witch => self.witch += 1,
            Role::Hunter => self.hunter += 1,
            Role::Guard => self.guard += 1,
            Role::Villager => self.villager += 1,
        }
    }

    /// Total seats.
    #[must_use]
    pub fn total(&self) -> usize {
        self.werewolf + self.seer + self.witch + self.hunter + self.guard + self.villager
    }
}

/// Deals roles for a roster.
pub struct RoleAssigner;

impl RoleAssigner {
    /// Seat counts for a roster of `n`, or `None` below the minimum.
    ///
    /// ```
    /// use werewolf_engine::rules::RoleAssigner;
    ///
    /// let counts = RoleAssigner::distribution(10).unwrap();
    /// assert_eq!((counts.werewolf, counts.hunter, counts.villager), (2, 1, 5));
    /// assert!(RoleAssigner::distribution(5).is_none());
    /// ```
    #[must_use]
    pub fn distribution(n: usize) -> Option<RoleCounts> {
        if n < MIN_PLAYERS {
            return None;
        }

        let mut counts = RoleCounts::default();
        for role in Self::special_roles(n) {
            counts.add(role);
        }
        counts.villager = n - counts.total();

        if n >= 8 {
            counts.villager -= 1;
            counts.werewolf += 1;
        }

        Some(counts)
    }

    /// Special roles handed out from the front of the shuffled roster.
    fn special_roles(n: usize) -> Vec<Role> {
        let mut roles = vec![Role::Werewolf, Role::Seer];
        if n >= 8 {
            roles.push(Role::Witch);
        }
        if n >= 10 {
            roles.push(Role::Hunter);
        }
        if n >= 12 {
            roles.push(Role::Guard);
        }
        roles
    }

    /// Deal roles to `players`.
    ///
    /// # Errors
    ///
    /// `NotEnoughPlayers` below 6 players, `DuplicatePlayer` if an id repeats.
    pub fn assign(players: &[PlayerId], rng: &mut GameRng) -> Result<RoleMap, EngineError> {
        let roster = Roster::new(players.iter().copied())?;
        let n = roster.len();
        if n < MIN_PLAYERS {
            return Err(EngineError::NotEnoughPlayers {
                required: MIN_PLAYERS,
                actual: n,
            });
        }

        let mut order = roster.as_slice().to_vec();
        rng.shuffle(&mut order);

        let specials = Self::special_roles(n);
        let mut dealt: Vec<(PlayerId, Role)> = order
            .iter()
            .enumerate()
            .map(|(seat, &player)| (player, specials.get(seat).copied().unwrap_or(Role::Villager)))
            .collect();

        if n >= 8 {
            let villagers: Vec<usize> = dealt
                .iter()
                .enumerate()
                .filter(|(_, (_, role))| *role == Role::Villager)
                .map(|(seat, _)| seat)
                .collect();
            if let Some(&seat) = rng.choose(&villagers) {
                dealt[seat].1 = Role::Werewolf;
            }
        }

        Ok(RoleMap::from_pairs(dealt))
    }
}
