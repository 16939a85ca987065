//! Random sources
//!
//! Everything random in a match (coin toss, the computer's toss decision,
//! Easy-mode digits and tie-breaks in the predictor) is drawn through
//! [`RandomSource`], so tests can swap in a seeded or scripted source.

use crate::types::{Coin, Digit, TossChoice};

/// Source of uniform randomness for a match
pub trait RandomSource {
    /// Generate a value in range [0, max). Returns 0 when `max == 0`.
    fn next_range(&mut self, max: u32) -> u32;

    /// Each of 1..=6 with equal probability.
    fn uniform_digit(&mut self) -> Digit {
        Digit::from_index(self.next_range(Digit::ALL.len() as u32) as usize)
    }

    fn fair_coin(&mut self) -> Coin {
        if self.next_range(2) == 0 {
            Coin::Heads
        } else {
            Coin::Tails
        }
    }

    fn fair_toss_choice(&mut self) -> TossChoice {
        if self.next_range(2) == 0 {
            TossChoice::Bat
        } else {
            TossChoice::Bowl
        }
    }

    /// Uniform pick from `candidates`, `None` when empty.
    fn pick(&mut self, candidates: &[Digit]) -> Option<Digit> {
        if candidates.is_empty() {
            return None;
        }
        let i = self.next_range(candidates.len() as u32) as usize;
        candidates.get(i).copied()
    }
}

macro_rules! forward_random_source {
    ($($ty:ty),+) => {
        $(
            impl<R: RandomSource + ?Sized> RandomSource for $ty {
                fn next_range(&mut self, max: u32) -> u32 {
                    (**self).next_range(max)
                }
                fn uniform_digit(&mut self) -> Digit {
                    (**self).uniform_digit()
                }
                fn fair_coin(&mut self) -> Coin {
                    (**self).fair_coin()
                }
                fn fair_toss_choice(&mut self) -> TossChoice {
                    (**self).fair_toss_choice()
                }
                fn pick(&mut self, candidates: &[Digit]) -> Option<Digit> {
                    (**self).pick(candidates)
                }
            }
        )+
    };
}

forward_random_source!(Box<R>, &mut R);

/// Seeded random number generator
///
/// Deterministic: same seed = same sequence. Uses xorshift64*.
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        // xorshift has a fixed point at zero
        let state = (seed ^ 0x517cc1b727220a95).max(1);

        // Warm up the generator
        let mut rng = Self { state };
        for _ in 0..8 {
            rng.next_u64();
        }

        rng
    }

    /// Generate next u64
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }

    /// Generate next u32
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }
}

impl RandomSource for SeededRng {
    fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_u32() % max
    }
}

/// OS-seeded generator for interactive play.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Debug)]
pub struct EntropyRng {
    inner: rand::rngs::StdRng,
}

#[cfg(not(target_arch = "wasm32"))]
impl EntropyRng {
    pub fn new() -> Self {
        use rand::SeedableRng;
        Self { inner: rand::rngs::StdRng::from_entropy() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for EntropyRng {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl RandomSource for EntropyRng {
    fn next_range(&mut self, max: u32) -> u32 {
        use rand::Rng;
        if max == 0 {
            return 0;
        }
        self.inner.gen_range(0..max)
    }
}
