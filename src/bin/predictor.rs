//! SmartLamp prediction node: firmware entry point.
//!
//! Serves `autobright` suggestions from the on-device oracle and
//! broadcasts on/off commands to the configured lamps on each press of
//! the node's button.  The "lamps on" state is shown on the yellow LED;
//! the RGB LED shows the last suggestion.

use core::cell::RefCell;
use core::net::{Ipv6Addr, SocketAddr};
use std::rc::Rc;

use anyhow::Result;
use esp_idf_hal::gpio::{PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use log::info;

use smartlamp::adapters::log_sink::LogEventSink;
use smartlamp::adapters::oracle::LinearOracle;
use smartlamp::adapters::udp::{UdpRpcClient, UdpServer};
use smartlamp::config::PredictorConfig;
use smartlamp::drivers::button::ButtonDriver;
use smartlamp::drivers::indicator_leds::IndicatorLeds;
use smartlamp::tasks::{self, InputChannel, predictor::PredictorNode};

/// Hold ticks are ignored on this node; any period works.
const HOLD_TICK_MS: u32 = 1000;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("SmartLamp prediction node v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = PredictorConfig::default();
    config.validate()?;

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;
    let leds = IndicatorLeds::new(
        PinDriver::output(pins.gpio4)?, // red
        PinDriver::output(pins.gpio5)?, // green
        PinDriver::output(pins.gpio6)?, // blue
        PinDriver::output(pins.gpio7)?, // yellow (lamps on)
    );
    let mut button_pin = PinDriver::input(pins.gpio9)?;
    button_pin.set_pull(Pull::Up)?;

    // ── 4. Node state + adapters ──────────────────────────────
    let node = Rc::new(RefCell::new(PredictorNode::new(
        &config,
        LinearOracle::from_config(&config),
        leds,
        LogEventSink::new(),
    )));

    let client = UdpRpcClient::bind(SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)))?;
    let server = UdpServer::bind(SocketAddr::from((Ipv6Addr::UNSPECIFIED, config.listen_port)))?;
    info!("Prediction server at {}", server.local_addr()?);

    let inputs = InputChannel::new();
    let button = tasks::button_loop(button_pin, ButtonDriver::new(HOLD_TICK_MS), &inputs);

    // ── 5. Run forever ────────────────────────────────────────
    tasks::predictor::run(&config, node, &client, &server, &inputs, button)?;
    Ok(())
}
