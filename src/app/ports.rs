//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ LampService / PredictorService (domain)
//! ```
//!
//! Driven adapters (indicator LEDs, entropy, the forecasting model, event
//! sinks) implement these traits.  The services consume them via generics,
//! so the domain core never touches hardware directly.  The RPC-call
//! primitive lives with the protocol in [`crate::rpc::transport`].

use crate::drivers::indicator::IndicatorPattern;

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → LEDs)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the node's indicator LEDs.
pub trait IndicatorPort {
    /// Show a brightness colour pattern on the RGB indicator.
    fn show(&mut self, pattern: IndicatorPattern);

    /// Drive the secondary single-colour indicator (manual mode on the
    /// lamp, "lamps on" on the predictor).
    fn set_aux(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Random port (driven adapter: entropy → domain)
// ───────────────────────────────────────────────────────────────

/// Source of randomness for the presence and ambient-light simulations.
///
/// Injected rather than global so tests can script exact sequences.
pub trait RandomPort {
    /// One uniform random bit.
    fn coin_flip(&mut self) -> bool;

    /// Uniform integer in `low..=high`.
    fn uniform(&mut self, low: u16, high: u16) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Oracle port (driven adapter: forecasting model → domain)
// ───────────────────────────────────────────────────────────────

/// External forecasting model: numeric features in, numeric score out.
pub trait BrightnessOracle {
    /// Predict a brightness score from `[lux, desired_lux]`.
    fn predict(&self, features: &[f32; 2]) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
