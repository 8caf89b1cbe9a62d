//! Deterministic pseudo-randomness for seeded algorithms.
//!
//! Community detection and layout must be reproducible: identical input and
//! seed produce identical output. A small LCG is all that is needed — the
//! statistical quality bar here is "uncorrelated enough to shuffle and to
//! scatter initial positions", not cryptography.

/// Linear congruential generator with a fixed multiplier/increment.
#[derive(Debug, Clone)]
pub(crate) struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        // Mix the seed once so small seeds don't start in a low-entropy state.
        let state = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Fisher–Yates shuffle.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = ((self.next_u64() >> 33) as usize) % (i + 1);
            slice.swap(i, j);
        }
    }
}
