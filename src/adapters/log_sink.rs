//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC on the device, stderr on a host).
//! A collector uplink would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::fsm::context::Presence;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

fn presence_label(p: Presence) -> &'static str {
    match p {
        Presence::Present => "present",
        Presence::Absent => "absent",
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | lux={} des_lux={} | thr={}% | sugg={}% ({:.2} W) | user={}",
                    t.lux,
                    t.desired_lux,
                    t.threshold,
                    t.brightness,
                    t.power_watts(),
                    presence_label(t.presence),
                );
            }
            AppEvent::GestureChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::ThresholdChanged {
                threshold,
                desired_lux,
                manual,
            } => {
                info!(
                    "STATE | threshold={}% des_lux={} manual={}",
                    threshold, desired_lux, manual
                );
            }
            AppEvent::PresenceChanged(p) => {
                info!("PRESENCE | user {}", presence_label(*p));
            }
            AppEvent::BrightnessApplied { suggested, applied } => {
                info!("NEGOTIATE | suggested={}% applied={}%", suggested, applied);
            }
            AppEvent::NegotiationFailed(e) => {
                warn!("NEGOTIATE | failed: {}", e);
            }
            AppEvent::ActuationAccepted(v) => {
                info!("ACTUATE | brightness set to {}%", v);
            }
            AppEvent::ActuationRejected => {
                warn!("ACTUATE | rejected (bad request)");
            }
            AppEvent::Suggested {
                lux,
                desired_lux,
                brightness,
            } => {
                info!(
                    "PREDICT | lux={} des_lux={} -> {}%",
                    lux, desired_lux, brightness
                );
            }
            AppEvent::BroadcastCompleted {
                brightness,
                delivered,
                attempted,
                all_off,
            } => {
                info!(
                    "BROADCAST | value={} delivered={}/{} all_off={}",
                    brightness, delivered, attempted, all_off
                );
            }
            AppEvent::Started => {
                info!("START | node up");
            }
        }
    }
}
