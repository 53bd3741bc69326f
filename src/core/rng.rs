//! Seedable randomness for role deals and room codes.
//!
//! A fixed `EngineConfig::seed` makes every deal reproducible; without one
//! the stream is seeded from OS entropy. Each consumer derives its own
//! stream with `for_context`, so drawing a room code never shifts a deal.
//!
//! ```
//! use werewolf_engine::core::GameRng;
//!
//! let mut a = GameRng::new(7).for_context("roles");
//! let mut b = GameRng::new(7).for_context("roles");
//!
//! let mut deal_a = vec![1, 2, 3, 4, 5, 6];
//! let mut deal_b = deal_a.clone();
//! a.shuffle(&mut deal_a);
//! b.shuffle(&mut deal_b);
//! assert_eq!(deal_a, deal_b);
//! ```

use std::hash::{Hash, Hasher};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;

/// ChaCha8 stream that remembers its seed.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Stream seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seeded if `seed` is set, OS entropy otherwise.
    #[must_use]
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        Self::new(seed.unwrap_or_else(rand::random))
    }

    /// The seed this stream started from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Independent stream named `context`, derived from this seed.
    ///
    /// FxHasher has no per-process keys, so a seeded game derives the same
    /// streams on every run and every build.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Uniform index into a collection of `len` items. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    /// Uniform in-place shuffle (seat order for a deal).
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }

    /// Uniform pick; `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.inner)
    }
}
