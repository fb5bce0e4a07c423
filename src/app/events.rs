//! Outbound application events.
//!
//! The lamp and predictor services emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial or forward to a
//! collector.

use crate::error::Error;
use crate::fsm::StateId;
use crate::fsm::context::Presence;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Periodic lamp status snapshot.
    Telemetry(TelemetryData),

    /// The button classifier moved between states.
    GestureChanged { from: StateId, to: StateId },

    /// Threshold changed by a gesture or command.
    ThresholdChanged {
        threshold: u8,
        desired_lux: u16,
        manual: bool,
    },

    /// Occupancy changed.
    PresenceChanged(Presence),

    /// A negotiated suggestion was applied.
    BrightnessApplied { suggested: i32, applied: u8 },

    /// A negotiation attempt produced no usable answer.
    NegotiationFailed(Error),

    /// An actuation command was accepted.
    ActuationAccepted(u8),

    /// An actuation command was rejected.
    ActuationRejected,

    /// The predictor answered an autobright request.
    Suggested {
        lux: i32,
        desired_lux: i32,
        brightness: i32,
    },

    /// A broadcast round finished.
    BroadcastCompleted {
        brightness: u8,
        delivered: u8,
        attempted: u8,
        all_off: bool,
    },

    /// The service has started.
    Started,
}

/// A point-in-time lamp snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryData {
    pub lux: u16,
    pub desired_lux: u16,
    pub threshold: u8,
    pub brightness: u8,
    pub presence: Presence,
}

impl TelemetryData {
    /// Estimated lamp draw in watts: 0.5 W standby plus up to 8.5 W at
    /// full brightness.
    pub fn power_watts(&self) -> f32 {
        0.5 + f32::from(self.brightness) / 100.0 * 8.5
    }
}
