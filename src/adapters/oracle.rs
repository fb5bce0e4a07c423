//! Linear brightness oracle.
//!
//! Stand-in for the on-device forecasting model: a single linear unit
//! over `[lux, desired_lux]`.  With the default weights the score is the
//! lamp's lux deficit expressed in percent of a 1000 lx lamp, so a lamp
//! that wants 500 lx more than it sees is told to run at 50%.

use crate::app::ports::BrightnessOracle;
use crate::config::PredictorConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearOracle {
    lux_weight: f32,
    desired_weight: f32,
    bias: f32,
}

impl LinearOracle {
    pub fn new(lux_weight: f32, desired_weight: f32, bias: f32) -> Self {
        Self {
            lux_weight,
            desired_weight,
            bias,
        }
    }

    pub fn from_config(config: &PredictorConfig) -> Self {
        Self::new(
            config.oracle_lux_weight,
            config.oracle_desired_weight,
            config.oracle_bias,
        )
    }
}

impl BrightnessOracle for LinearOracle {
    fn predict(&self, features: &[f32; 2]) -> f32 {
        let [lux, desired] = *features;
        lux * self.lux_weight + desired * self.desired_weight + self.bias
    }
}
