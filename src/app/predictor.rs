//! Prediction node service.
//!
//! Two independent pieces of state live on the prediction node:
//!
//! - [`PredictorService`] answers `autobright` requests by feeding the
//!   lamp's observed and desired illuminance to the forecasting oracle.
//! - [`BroadcastDispatcher`] turns each press of the node's own button
//!   into an on/off command sent to every configured lamp in turn.
//!
//! ```text
//!  GET autobright ──▶ PredictorService ──▶ BrightnessOracle
//!        ▲                   │
//!        └──── "42" ◀────────┘
//!
//!  Press ──▶ BroadcastDispatcher ──▶ PUT actuators/brightness × N lamps
//! ```

use core::net::SocketAddr;
use core::time::Duration;

use log::{info, warn};

use crate::drivers::indicator::IndicatorPattern;
use crate::rpc::protocol::{
    AUTOBRIGHT_PATH, Code, CommandMessage, Method, PredictionRequest, PredictionResponse,
    Request, Response,
};
use crate::rpc::transport::{CallOutcome, RpcClient, call_with_timeout};

use super::events::AppEvent;
use super::ports::{BrightnessOracle, EventSink, IndicatorPort};

// ───────────────────────────────────────────────────────────────
// PredictorService
// ───────────────────────────────────────────────────────────────

pub struct PredictorService<O> {
    oracle: O,
}

impl<O: BrightnessOracle> PredictorService<O> {
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }

    /// Score one request.  The oracle output is truncated toward zero;
    /// there is no failure path, even for a 0/0 input.
    pub fn suggest(
        &mut self,
        req: PredictionRequest,
        hw: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) -> i32 {
        let features = [req.lux as f32, req.desired_lux as f32];
        let score = self.oracle.predict(&features);
        let brightness = score as i32;

        hw.show(IndicatorPattern::for_brightness(brightness));

        info!(
            "Predicted {:.2} -> {}% for lux={} des_lux={}",
            score, brightness, req.lux, req.desired_lux
        );
        sink.emit(&AppEvent::Suggested {
            lux: req.lux,
            desired_lux: req.desired_lux,
            brightness,
        });
        brightness
    }

    /// Serve one request addressed to the predictor.
    pub fn handle_request(
        &mut self,
        req: &Request,
        hw: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) -> Response {
        match (req.path.as_str(), req.method) {
            (AUTOBRIGHT_PATH, Method::Get) => {
                let brightness = self.suggest(PredictionRequest::from_request(req), hw, sink);
                PredictionResponse {
                    brightness_percent: brightness,
                }
                .to_response()
                .unwrap_or_else(|e| {
                    warn!("autobright: encode failed: {}", e);
                    Response::empty(Code::InternalServerError)
                })
            }
            (AUTOBRIGHT_PATH, _) => Response::empty(Code::MethodNotAllowed),
            (path, _) => {
                warn!("No resource at '{}'", path);
                Response::empty(Code::NotFound)
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// BroadcastDispatcher
// ───────────────────────────────────────────────────────────────

/// Persistent on/off toggle for the broadcast button.
pub struct BroadcastDispatcher {
    all_off: bool,
    on_brightness: u8,
}

impl BroadcastDispatcher {
    pub fn new(on_brightness: u8) -> Self {
        Self {
            all_off: false,
            on_brightness,
        }
    }

    /// Light the "lamps on" indicator for the initial state.
    pub fn start(&self, hw: &mut impl IndicatorPort) {
        hw.set_aux(!self.all_off);
    }

    pub fn all_off(&self) -> bool {
        self.all_off
    }

    /// Command for the next press: switch everything off, or back on.
    pub fn next_command(&self) -> CommandMessage {
        CommandMessage {
            brightness: if self.all_off { self.on_brightness } else { 0 },
        }
    }

    /// Finish a round: toggle regardless of how many lamps answered.
    pub fn complete(
        &mut self,
        report: BroadcastReport,
        hw: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        self.all_off = !self.all_off;
        hw.set_aux(!self.all_off);
        info!(
            "Broadcast {}: {}/{} lamps acknowledged, all_off={}",
            report.brightness, report.delivered, report.attempted, self.all_off
        );
        sink.emit(&AppEvent::BroadcastCompleted {
            brightness: report.brightness,
            delivered: report.delivered,
            attempted: report.attempted,
            all_off: self.all_off,
        });
    }
}

/// Tally of one broadcast round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    pub brightness: u8,
    pub delivered: u8,
    pub attempted: u8,
}

/// Send `cmd` to every target in order, one bounded call each.
///
/// A failed or silent lamp is logged and skipped; it never stops
/// delivery to the lamps after it.
pub async fn broadcast<C: RpcClient>(
    client: &C,
    targets: &[SocketAddr],
    cmd: CommandMessage,
    timeout: Duration,
) -> BroadcastReport {
    let mut report = BroadcastReport {
        brightness: cmd.brightness,
        delivered: 0,
        attempted: 0,
    };
    let req = match cmd.to_request() {
        Ok(req) => req,
        Err(e) => {
            warn!("Broadcast: cannot build command: {}", e);
            return report;
        }
    };

    for &target in targets {
        report.attempted = report.attempted.saturating_add(1);
        match call_with_timeout(client, target, &req, timeout).await {
            CallOutcome::Success(resp) if resp.code == Code::Changed => {
                report.delivered = report.delivered.saturating_add(1);
            }
            CallOutcome::Success(resp) => {
                warn!("Broadcast: {} answered {}", target, resp.code);
            }
            CallOutcome::Timeout => warn!("Broadcast: {} timed out", target),
            CallOutcome::TransportError(e) => warn!("Broadcast: {} failed: {}", target, e),
        }
    }
    report
}
