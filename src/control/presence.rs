//! Presence simulator
//!
//! Two timers drive occupancy: a presence check that runs while the user
//! is at the desk, and an absence timer armed only after a departure.
//!
//! ```text
//!  PRESENT ──[presence timer, coin says depart]──▶ ABSENT
//!     ▲  └──[presence timer, coin says stay]──┐      │
//!     │                  (re-arm)  ◀──────────┘      │
//!     └──────────────[absence timer]─────────────────┘
//! ```
//!
//! Departure stashes the threshold and forces it to 0; return restores it
//! and recomputes desired lux.  This is the only writer of `presence`.
//! While absent, button gestures and brightness commands edit the stashed
//! `saved_threshold` instead of the live one.

use core::time::Duration;

use log::info;

use crate::app::ports::RandomPort;
use crate::fsm::context::{DeviceState, Presence};

/// Which presence timer is currently armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceTimer {
    /// Periodic occupancy check (armed while present).
    Check,
    /// Return from an absence (armed while absent).
    Return,
}

/// Result of servicing one timer expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceChange {
    /// Nothing changed; the check timer was re-armed.
    Unchanged,
    /// The user left; threshold forced to 0.
    Departed,
    /// The user came back; threshold restored.
    Returned,
}

pub struct PresenceSimulator {
    check_period: Duration,
    absence_period: Duration,
    armed: PresenceTimer,
}

impl PresenceSimulator {
    pub fn new(check_period: Duration, absence_period: Duration) -> Self {
        Self {
            check_period,
            absence_period,
            armed: PresenceTimer::Check,
        }
    }

    /// The timer to wait on next and its period.
    pub fn next_timer(&self) -> (PresenceTimer, Duration) {
        match self.armed {
            PresenceTimer::Check => (PresenceTimer::Check, self.check_period),
            PresenceTimer::Return => (PresenceTimer::Return, self.absence_period),
        }
    }

    /// Service an expiry of `timer`.  Expiries for a timer that is not
    /// armed are ignored.
    pub fn on_timer(
        &mut self,
        timer: PresenceTimer,
        state: &mut DeviceState,
        rng: &mut impl RandomPort,
    ) -> PresenceChange {
        match (timer, state.presence) {
            (PresenceTimer::Check, Presence::Present) if self.armed == PresenceTimer::Check => {
                if rng.coin_flip() {
                    state.saved_threshold = state.threshold;
                    state.threshold = 0;
                    state.presence = Presence::Absent;
                    self.armed = PresenceTimer::Return;
                    info!(
                        "PRESENCE: user left, threshold {} stashed",
                        state.saved_threshold
                    );
                    PresenceChange::Departed
                } else {
                    PresenceChange::Unchanged
                }
            }
            (PresenceTimer::Return, Presence::Absent) if self.armed == PresenceTimer::Return => {
                state.threshold = state.saved_threshold;
                state.presence = Presence::Present;
                state.recompute_desired_lux();
                self.armed = PresenceTimer::Check;
                info!("PRESENCE: user back, threshold {} restored", state.threshold);
                PresenceChange::Returned
            }
            _ => PresenceChange::Unchanged,
        }
    }
}
