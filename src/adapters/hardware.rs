//! Hardware adapter: bridges node peripherals to domain port traits.
//!
//! Bundles the indicator LEDs and the entropy source behind
//! [`IndicatorPort`] and [`RandomPort`], so the lamp service can take a
//! single `&mut hw` that satisfies both.  Generic over the concrete
//! indicator so the same adapter wraps GPIO LEDs on the device and
//! recording mocks in tests.

use crate::app::ports::{IndicatorPort, RandomPort};
use crate::drivers::indicator::IndicatorPattern;

/// Concrete adapter that combines the node's hardware behind port traits.
pub struct HardwareAdapter<I, R> {
    indicator: I,
    rng: R,
}

impl<I, R> HardwareAdapter<I, R> {
    pub fn new(indicator: I, rng: R) -> Self {
        Self { indicator, rng }
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl<I: IndicatorPort, R> IndicatorPort for HardwareAdapter<I, R> {
    fn show(&mut self, pattern: IndicatorPattern) {
        self.indicator.show(pattern);
    }

    fn set_aux(&mut self, on: bool) {
        self.indicator.set_aux(on);
    }
}

// ── RandomPort implementation ─────────────────────────────────

impl<I, R: RandomPort> RandomPort for HardwareAdapter<I, R> {
    fn coin_flip(&mut self) -> bool {
        self.rng.coin_flip()
    }

    fn uniform(&mut self, low: u16, high: u16) -> u16 {
        self.rng.uniform(low, high)
    }
}
