//! Random episode selection for shuffle navigation

use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};

/// Source of uniformly random queue positions
///
/// The store only calls this with `len > 0`.
pub trait IndexPicker {
    /// Pick an index in `0..len`
    fn pick(&mut self, len: usize) -> usize;
}

/// Picker backed by the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngPicker;

impl IndexPicker for ThreadRngPicker {
    fn pick(&mut self, len: usize) -> usize {
        thread_rng().gen_range(0..len)
    }
}

/// Deterministic picker for reproducible sessions and tests
#[derive(Debug, Clone)]
pub struct SeededPicker {
    rng: StdRng,
}

impl SeededPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl IndexPicker for SeededPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}
