//! Lamp node service: the hexagonal core of the lamp.
//!
//! [`LampService`] owns the device state, the button classifier, the
//! presence simulator and the light sampler.  Every stimulus arrives as
//! one [`LampEvent`] through [`LampService::dispatch`]; inbound requests
//! from the network go through [`LampService::handle_request`].  All I/O
//! flows through port traits injected at call sites.
//!
//! ```text
//!  LampEvent ───────▶ ┌───────────────────────────┐ ──▶ IndicatorPort
//!  Request ─────────▶ │        LampService        │ ──▶ EventSink
//!  RandomPort ──────▶ │ FSM · presence · sampler  │ ──▶ Response
//!                     └───────────────────────────┘
//! ```

use core::time::Duration;

use log::{info, warn};

use crate::config::LampConfig;
use crate::control::presence::{PresenceChange, PresenceSimulator, PresenceTimer};
use crate::drivers::indicator::IndicatorPattern;
use crate::error::{CommsError, Error};
use crate::events::{InputEvent, LampEvent};
use crate::fsm::context::{DeviceState, Presence};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::rpc::protocol::{
    BRIGHTNESS_PATH, Code, Method, PredictionRequest, PredictionResponse, Request, Response,
    STATUS_PATH, StatusReport, parse_int,
};
use crate::rpc::transport::CallOutcome;
use crate::sensors::illuminance::IlluminanceSampler;

use super::events::{AppEvent, TelemetryData};
use super::ports::{EventSink, IndicatorPort, RandomPort};

// ───────────────────────────────────────────────────────────────
// LampService
// ───────────────────────────────────────────────────────────────

pub struct LampService {
    fsm: Fsm,
    state: DeviceState,
    presence: PresenceSimulator,
    sampler: IlluminanceSampler,
}

impl LampService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the classifier; call [`start`](Self::start) next.
    pub fn new(config: &LampConfig) -> Self {
        Self {
            fsm: Fsm::new(build_state_table(), StateId::Idle),
            state: DeviceState::new(
                config.initial_threshold,
                config.initial_lux,
                config.max_lamp_lux,
            ),
            presence: PresenceSimulator::new(
                Duration::from_millis(u64::from(config.presence_interval_ms)),
                Duration::from_millis(u64::from(config.absence_interval_ms)),
            ),
            sampler: IlluminanceSampler::new(config.ambient_lux_min, config.ambient_lux_max),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, hw: &mut impl IndicatorPort, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.state);
        self.refresh_indicator(hw);
        sink.emit(&AppEvent::Started);
        info!(
            "LampService started: threshold={} lux={}",
            self.state.threshold, self.state.current_lux
        );
    }

    // ── Event dispatch ────────────────────────────────────────

    /// Apply one event to the device state, then re-render the indicator.
    ///
    /// `hw` provides both the indicator and the entropy source so the
    /// two ports can be one adapter without a double mutable borrow.
    pub fn dispatch(
        &mut self,
        event: LampEvent,
        hw: &mut (impl IndicatorPort + RandomPort),
        sink: &mut impl EventSink,
    ) {
        match event {
            LampEvent::Input(input) => self.on_input(input, sink),
            LampEvent::SensorTick => {
                self.sampler.sample(&mut self.state, hw);
                sink.emit(&AppEvent::Telemetry(self.telemetry()));
            }
            LampEvent::Presence(timer) => {
                match self.presence.on_timer(timer, &mut self.state, hw) {
                    PresenceChange::Departed | PresenceChange::Returned => {
                        sink.emit(&AppEvent::PresenceChanged(self.state.presence));
                    }
                    PresenceChange::Unchanged => {}
                }
            }
            LampEvent::Negotiated(outcome) => self.on_negotiated(outcome, sink),
        }
        self.refresh_indicator(hw);
    }

    fn on_input(&mut self, input: InputEvent, sink: &mut impl EventSink) {
        let before = self.state.threshold;
        let absent = self.state.is_absent();
        let transition = if absent {
            // Gestures edit the stashed threshold, as commands do; the lamp
            // stays at 0 until the user returns.
            let desired_lux = self.state.desired_lux;
            self.swap_stashed_threshold();
            let t = self.fsm.handle(input, &mut self.state);
            self.swap_stashed_threshold();
            self.state.desired_lux = desired_lux;
            t
        } else {
            self.fsm.handle(input, &mut self.state)
        };
        if let Some(t) = transition {
            sink.emit(&AppEvent::GestureChanged {
                from: t.from,
                to: t.to,
            });
        }
        if input == InputEvent::Release || self.state.threshold != before {
            sink.emit(&AppEvent::ThresholdChanged {
                threshold: self.state.threshold,
                desired_lux: self.state.desired_lux,
                manual: self.state.manual_mode,
            });
        }
    }

    fn swap_stashed_threshold(&mut self) {
        let st = &mut self.state;
        core::mem::swap(&mut st.threshold, &mut st.saved_threshold);
    }

    // ── Negotiation ───────────────────────────────────────────

    /// The request to send this period, or `None` while the lamp is off.
    pub fn negotiation_request(&self) -> Option<PredictionRequest> {
        self.state.wants_negotiation().then(|| PredictionRequest {
            lux: i32::from(self.state.current_lux),
            desired_lux: i32::from(self.state.desired_lux),
        })
    }

    fn on_negotiated(&mut self, outcome: CallOutcome, sink: &mut impl EventSink) {
        let error = match outcome {
            CallOutcome::Success(resp) => match PredictionResponse::from_response(&resp) {
                Ok(suggestion) => {
                    self.apply_suggestion(suggestion.brightness_percent, sink);
                    return;
                }
                Err(e) => Error::Protocol(e),
            },
            CallOutcome::Timeout => Error::Comms(CommsError::Timeout),
            CallOutcome::TransportError(e) => Error::Comms(e),
        };
        warn!(
            "Negotiation failed ({}); keeping brightness {}",
            error, self.state.current_brightness
        );
        sink.emit(&AppEvent::NegotiationFailed(error));
    }

    fn apply_suggestion(&mut self, suggested: i32, sink: &mut impl EventSink) {
        // Switched off while the call was in flight: local state wins.
        let applied = if self.state.threshold == 0 {
            0
        } else {
            suggested.clamp(0, 100) as u8
        };
        self.state.current_brightness = applied;
        sink.emit(&AppEvent::BrightnessApplied { suggested, applied });
    }

    // ── Inbound requests ──────────────────────────────────────

    /// Serve one request addressed to this lamp.
    pub fn handle_request(
        &mut self,
        req: &Request,
        hw: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) -> Response {
        match (req.path.as_str(), req.method) {
            (BRIGHTNESS_PATH, Method::Put | Method::Post) => self.actuate(req, hw, sink),
            (STATUS_PATH, Method::Get) => self.status().to_response().unwrap_or_else(|e| {
                warn!("status: encode failed: {}", e);
                Response::empty(Code::InternalServerError)
            }),
            (BRIGHTNESS_PATH | STATUS_PATH, _) => Response::empty(Code::MethodNotAllowed),
            (path, _) => {
                warn!("No resource at '{}'", path);
                Response::empty(Code::NotFound)
            }
        }
    }

    fn actuate(
        &mut self,
        req: &Request,
        hw: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) -> Response {
        let value = match parse_int(&req.payload) {
            Ok(v @ 0..=100) => v as u8,
            _ => {
                warn!("Brightness command '{}' rejected", req.payload);
                sink.emit(&AppEvent::ActuationRejected);
                return Response::empty(Code::BadRequest);
            }
        };

        self.state.current_brightness = value;
        if self.state.is_absent() {
            // Takes effect when the user returns.
            self.state.saved_threshold = value;
        } else {
            self.state.threshold = value;
        }
        self.state.recompute_desired_lux();
        self.refresh_indicator(hw);

        sink.emit(&AppEvent::ActuationAccepted(value));
        sink.emit(&AppEvent::ThresholdChanged {
            threshold: self.state.threshold,
            desired_lux: self.state.desired_lux,
            manual: self.state.manual_mode,
        });
        Response::empty(Code::Changed)
    }

    // ── Indicator ─────────────────────────────────────────────

    fn refresh_indicator(&mut self, hw: &mut impl IndicatorPort) {
        if self.state.threshold == 0 {
            self.state.current_brightness = 0;
        }
        hw.set_aux(self.state.manual_mode);
        hw.show(IndicatorPattern::for_brightness(i32::from(
            self.state.threshold,
        )));
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn gesture_state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn presence(&self) -> Presence {
        self.state.presence
    }

    /// The presence timer to arm next and its period.
    pub fn next_presence_timer(&self) -> (PresenceTimer, Duration) {
        self.presence.next_timer()
    }

    pub fn status(&self) -> StatusReport {
        StatusReport {
            lux_perceived: i32::from(self.state.current_lux),
            lux_desired: i32::from(self.state.desired_lux),
            brightness_percent: i32::from(self.state.current_brightness),
        }
    }

    pub fn telemetry(&self) -> TelemetryData {
        TelemetryData {
            lux: self.state.current_lux,
            desired_lux: self.state.desired_lux,
            threshold: self.state.threshold,
            brightness: self.state.current_brightness,
            presence: self.state.presence,
        }
    }
}
