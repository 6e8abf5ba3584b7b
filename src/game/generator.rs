use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::utils::letters::{Tier, TierWeights};

/// Weighted letter draws whose tier mix shifts with the level.
///
/// Generic over the random source so tests can replay a seeded sequence.
pub struct LetterGenerator<R = StdRng> {
    rng: R,
}

impl LetterGenerator<StdRng> {
    /// Generator seeded from the operating system
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Generator with a fixed seed, for replays
    #[cfg(test)]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> LetterGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Draw the next letter for `level`: roll a tier against the cumulative
    /// weights, then pick uniformly inside the tier.
    pub fn next(&mut self, level: u32) -> char {
        let weights = TierWeights::for_level(level);
        let tier = Tier::from_roll(weights, self.rng.random::<f64>());
        let letters = tier.letters();
        letters[self.rng.random_range(0..letters.len())]
    }
}
