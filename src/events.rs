//! Node event types.
//!
//! Every stimulus a lamp node reacts to is one variant of [`LampEvent`],
//! and the lamp service has a single dispatch function over it, so each
//! transition is exhaustively matched.
//!
//! ```text
//! ┌─────────────┐
//! │ Button      │──InputEvent──┐
//! │ Sensor tick │──────────────┤      ┌──────────────────────┐
//! │ Presence ⏱  │──────────────┼─────▶│ LampService::dispatch│
//! │ Negotiation │──outcome─────┘      └──────────────────────┘
//! └─────────────┘
//! ```

use crate::control::presence::PresenceTimer;
use crate::rpc::transport::CallOutcome;

/// Classified button input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Button went down.
    Press,
    /// Button is still held; fires once per hold period.
    HoldTick,
    /// Button came back up.
    Release,
}

/// Everything the lamp node's control loop dispatches.
#[derive(Debug, Clone, PartialEq)]
pub enum LampEvent {
    /// Classified button input.
    Input(InputEvent),
    /// Ambient light sample period elapsed.
    SensorTick,
    /// One of the presence simulator's timers expired.
    Presence(PresenceTimer),
    /// A negotiation call resolved.
    Negotiated(CallOutcome),
}

impl From<InputEvent> for LampEvent {
    fn from(e: InputEvent) -> Self {
        Self::Input(e)
    }
}
