use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Serializable position of a [`GameRng`]: the seed plus how far the
/// keystream has been consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub word_pos: u128,
}

/// Seeded random number generator for reproducible sessions
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new GameRng with an optional seed
    /// If seed is None, generates a random seed
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            use rand::thread_rng;
            thread_rng().gen()
        });

        let rng = ChaCha8Rng::seed_from_u64(seed);
        GameRng { rng, seed }
    }

    /// Rebuild a generator at an exact keystream position
    pub fn from_state(state: RngState) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(state.seed);
        rng.set_word_pos(state.word_pos);
        GameRng {
            rng,
            seed: state.seed,
        }
    }

    /// Get the seed used for this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> RngState {
        RngState {
            seed: self.seed,
            word_pos: self.rng.get_word_pos(),
        }
    }

    /// Pick an index with probability proportional to its weight.
    /// Returns None when every weight is zero.
    pub fn weighted_index(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        if total == 0 {
            return None;
        }

        let mut roll = self.rng.gen_range(0..total);
        for (index, &weight) in weights.iter().enumerate() {
            let weight = u64::from(weight);
            if roll < weight {
                return Some(index);
            }
            roll -= weight;
        }
        None
    }
}
