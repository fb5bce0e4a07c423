//! Node configuration parameters
//!
//! All tunable parameters for the lamp and predictor nodes.  Peer endpoints
//! are fixed at build time; there is no discovery.

use core::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Maximum number of lamps the predictor can command.
pub const MAX_LAMPS: usize = 4;

/// Default UDP port for every node's resources.
pub const DEFAULT_PORT: u16 = 5683;

/// Textual `host:port` endpoint, parsed at startup.
pub type Endpoint = heapless::String<64>;

/// Lamp node configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LampConfig {
    // --- Timing ---
    /// Ambient light sample period (milliseconds)
    pub sensor_interval_ms: u32,
    /// Brightness negotiation period (milliseconds)
    pub negotiation_interval_ms: u32,
    /// Deadline for one negotiation call (milliseconds)
    pub negotiation_timeout_ms: u32,
    /// Presence check period while the user is at the desk (milliseconds)
    pub presence_interval_ms: u32,
    /// How long a simulated absence lasts (milliseconds)
    pub absence_interval_ms: u32,
    /// Repeat period of hold ticks while the button is held (milliseconds)
    pub hold_tick_interval_ms: u32,

    // --- Light model ---
    /// Lux the lamp adds at 100% brightness
    pub max_lamp_lux: u16,
    /// Lower bound of simulated ambient readings (lux, inclusive)
    pub ambient_lux_min: u16,
    /// Upper bound of simulated ambient readings (lux, inclusive)
    pub ambient_lux_max: u16,

    // --- Boot state ---
    /// Threshold at power-on (0-100%)
    pub initial_threshold: u8,
    /// Ambient reading assumed before the first sample (lux)
    pub initial_lux: u16,

    // --- Network ---
    /// Port the lamp resources listen on
    pub listen_port: u16,
    /// Auto-brightness predictor endpoint
    pub predictor_endpoint: Endpoint,
}

impl Default for LampConfig {
    fn default() -> Self {
        Self {
            // Timing
            sensor_interval_ms: 1000,
            negotiation_interval_ms: 1000,
            negotiation_timeout_ms: 2000,
            presence_interval_ms: 10_000,
            absence_interval_ms: 5000,
            hold_tick_interval_ms: 1000,

            // Light model
            max_lamp_lux: 1000,
            ambient_lux_min: 350,
            ambient_lux_max: 400,

            // Boot state
            initial_threshold: 50,
            initial_lux: 400,

            // Network
            listen_port: DEFAULT_PORT,
            predictor_endpoint: endpoint("[fe80::f6ce:36fa:60d3:ad0]:5683"),
        }
    }
}

impl LampConfig {
    /// Reject parameter combinations the lamp cannot run with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sensor_interval_ms == 0
            || self.negotiation_interval_ms == 0
            || self.presence_interval_ms == 0
            || self.absence_interval_ms == 0
            || self.hold_tick_interval_ms == 0
        {
            return Err(Error::Config("timer periods must be non-zero"));
        }
        if self.negotiation_timeout_ms == 0 {
            return Err(Error::Config("negotiation timeout must be non-zero"));
        }
        if self.ambient_lux_min > self.ambient_lux_max {
            return Err(Error::Config("ambient lux band is inverted"));
        }
        if self.max_lamp_lux == 0 || self.max_lamp_lux > 10_000 {
            return Err(Error::Config("max_lamp_lux out of range (1-10000)"));
        }
        if u32::from(self.max_lamp_lux) + u32::from(self.ambient_lux_max) > u32::from(u16::MAX) {
            return Err(Error::Config("desired lux would overflow"));
        }
        if self.initial_threshold > 100 {
            return Err(Error::Config("initial_threshold above 100"));
        }
        self.predictor_addr()?;
        Ok(())
    }

    /// Parsed predictor address.
    pub fn predictor_addr(&self) -> Result<SocketAddr, Error> {
        parse_endpoint(&self.predictor_endpoint)
    }
}

/// Predictor node configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Port the autobright resource listens on
    pub listen_port: u16,
    /// Lamps that receive the on/off broadcast, in send order
    pub lamp_endpoints: heapless::Vec<Endpoint, MAX_LAMPS>,
    /// Deadline for each broadcast call (milliseconds)
    pub command_timeout_ms: u32,
    /// Brightness sent when switching every lamp back on (0-100%)
    pub all_on_brightness: u8,

    // --- Oracle (linear forecast) ---
    /// Weight applied to the measured lux feature
    pub oracle_lux_weight: f32,
    /// Weight applied to the desired lux feature
    pub oracle_desired_weight: f32,
    /// Constant term of the forecast
    pub oracle_bias: f32,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        let mut lamp_endpoints = heapless::Vec::new();
        let _ = lamp_endpoints.push(endpoint("[fe80::f6ce:366c:f0fd:f7e5]:5683"));
        let _ = lamp_endpoints.push(endpoint("[fe80::f6ce:3636:5325:98f8]:5683"));

        Self {
            listen_port: DEFAULT_PORT,
            lamp_endpoints,
            command_timeout_ms: 2000,
            all_on_brightness: 20,

            // 1000 lux of headroom maps onto 100% lamp output.
            oracle_lux_weight: -0.1,
            oracle_desired_weight: 0.1,
            oracle_bias: 0.0,
        }
    }
}

impl PredictorConfig {
    /// Reject parameter combinations the predictor cannot run with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.lamp_endpoints.is_empty() {
            return Err(Error::Config("no lamp endpoints configured"));
        }
        if self.command_timeout_ms == 0 {
            return Err(Error::Config("command timeout must be non-zero"));
        }
        if self.all_on_brightness > 100 {
            return Err(Error::Config("all_on_brightness above 100"));
        }
        if !(self.oracle_lux_weight.is_finite()
            && self.oracle_desired_weight.is_finite()
            && self.oracle_bias.is_finite())
        {
            return Err(Error::Config("oracle coefficients must be finite"));
        }
        self.lamp_addrs()?;
        Ok(())
    }

    /// Parsed lamp addresses, in configured order.
    pub fn lamp_addrs(&self) -> Result<heapless::Vec<SocketAddr, MAX_LAMPS>, Error> {
        let mut out = heapless::Vec::new();
        for ep in &self.lamp_endpoints {
            // Capacities match, so the push cannot fail.
            let _ = out.push(parse_endpoint(ep)?);
        }
        Ok(out)
    }
}

fn endpoint(s: &str) -> Endpoint {
    let mut out = Endpoint::new();
    let _ = out.push_str(s);
    out
}

fn parse_endpoint(s: &str) -> Result<SocketAddr, Error> {
    s.parse()
        .map_err(|_| Error::Config("endpoint is not a socket address"))
}
