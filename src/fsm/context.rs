//! Device state shared by every lamp-side component.
//!
//! `DeviceState` is the lamp's blackboard: the classifier, the presence
//! simulator, the sampler and the negotiator all read from and write to
//! this one struct.  It is owned by the lamp service and handed out by
//! `&mut` to each step function, so no locking is involved.

use crate::control::bands;

/// Simulated occupancy at the desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
    #[default]
    Present,
    Absent,
}

/// Live state of one lamp node.
#[derive(Debug, Clone)]
pub struct DeviceState {
    /// User-set dimming target (0-100%).
    pub threshold: u8,
    /// Latest ambient reading (lux).
    pub current_lux: u16,
    /// Lux the user wants on the desk.
    pub desired_lux: u16,
    /// Last brightness suggestion applied (0-100%).
    pub current_brightness: u8,
    /// True while a held press is overriding automatic negotiation.
    pub manual_mode: bool,
    pub presence: Presence,
    /// Threshold stashed while absent, restored on return.
    pub saved_threshold: u8,
    /// Lux the lamp adds at 100% (from config).
    pub max_lamp_lux: u16,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            threshold: 50,
            current_lux: 400,
            desired_lux: 400,
            current_brightness: 0,
            manual_mode: false,
            presence: Presence::Present,
            saved_threshold: 50,
            max_lamp_lux: 1000,
        }
    }
}

impl DeviceState {
    /// State at power-on for the given boot parameters.
    pub fn new(initial_threshold: u8, initial_lux: u16, max_lamp_lux: u16) -> Self {
        Self {
            threshold: initial_threshold,
            current_lux: initial_lux,
            desired_lux: initial_lux,
            saved_threshold: initial_threshold,
            max_lamp_lux,
            ..Self::default()
        }
    }

    /// Recompute `desired_lux` from the current threshold and ambient reading.
    /// Called once per threshold-affecting transition.
    pub fn recompute_desired_lux(&mut self) {
        self.desired_lux = bands::desired_lux(self.threshold, self.max_lamp_lux, self.current_lux);
    }

    pub fn is_absent(&self) -> bool {
        self.presence == Presence::Absent
    }

    /// Whether the lamp is switched on and should ask for a suggestion.
    pub fn wants_negotiation(&self) -> bool {
        self.threshold > 0
    }
}
