//! Entropy adapter.
//!
//! Implements [`RandomPort`] over any `rand` generator.  The firmware
//! seeds a `StdRng` from the platform entropy source (the ESP32 hardware
//! RNG via `getrandom`); tests seed it explicitly for repeatable runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::app::ports::RandomPort;

pub struct RngAdapter<R> {
    rng: R,
}

impl RngAdapter<StdRng> {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomPort for RngAdapter<R> {
    fn coin_flip(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    fn uniform(&mut self, low: u16, high: u16) -> u16 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..=high)
    }
}
