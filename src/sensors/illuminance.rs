//! Simulated ambient light sensor.
//!
//! Stands in for a photodiode read: each sample is a uniform integer in a
//! fixed lux band.  This is the only writer of `current_lux`; desired lux
//! is left alone until the next threshold-affecting transition.

use crate::app::ports::RandomPort;
use crate::fsm::context::DeviceState;

pub struct IlluminanceSampler {
    min_lux: u16,
    max_lux: u16,
}

impl IlluminanceSampler {
    pub fn new(min_lux: u16, max_lux: u16) -> Self {
        Self {
            min_lux: min_lux.min(max_lux),
            max_lux: max_lux.max(min_lux),
        }
    }

    /// Take one reading and store it in `state`.
    pub fn sample(&self, state: &mut DeviceState, rng: &mut impl RandomPort) -> u16 {
        let lux = rng.uniform(self.min_lux, self.max_lux);
        state.current_lux = lux;
        lux
    }
}
