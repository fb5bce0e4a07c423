//! SmartLamp lamp node: firmware entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │  IndicatorLeds   RngAdapter   LogEventSink   UdpRpcClient/Server│
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            LampService (pure logic)                    │    │
//! │  │  Classifier FSM · Presence · Sampler · Negotiation     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │  tasks::lamp (edge-executor + async-io-mini)                   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The IPv6 interface (link-local addressing) is brought up by the
//! platform configuration before `main` binds its sockets.

use core::cell::RefCell;
use core::net::{Ipv6Addr, SocketAddr};
use std::rc::Rc;

use anyhow::Result;
use esp_idf_hal::gpio::{PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use log::info;

use smartlamp::adapters::hardware::HardwareAdapter;
use smartlamp::adapters::log_sink::LogEventSink;
use smartlamp::adapters::rng::RngAdapter;
use smartlamp::adapters::udp::{UdpRpcClient, UdpServer};
use smartlamp::config::LampConfig;
use smartlamp::drivers::button::ButtonDriver;
use smartlamp::drivers::indicator_leds::IndicatorLeds;
use smartlamp::tasks::{self, InputChannel, lamp::LampNode};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("SmartLamp lamp node v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = LampConfig::default();
    config.validate()?;

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;
    let leds = IndicatorLeds::new(
        PinDriver::output(pins.gpio4)?, // red
        PinDriver::output(pins.gpio5)?, // green
        PinDriver::output(pins.gpio6)?, // blue
        PinDriver::output(pins.gpio7)?, // yellow (manual mode)
    );
    let mut button_pin = PinDriver::input(pins.gpio9)?;
    button_pin.set_pull(Pull::Up)?;

    // ── 4. Node state + adapters ──────────────────────────────
    let hw = HardwareAdapter::new(leds, RngAdapter::from_entropy());
    let node = Rc::new(RefCell::new(LampNode::new(
        &config,
        hw,
        LogEventSink::new(),
    )));

    let client = UdpRpcClient::bind(SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)))?;
    let server = UdpServer::bind(SocketAddr::from((Ipv6Addr::UNSPECIFIED, config.listen_port)))?;
    let inputs = InputChannel::new();
    let button = tasks::button_loop(
        button_pin,
        ButtonDriver::new(config.hold_tick_interval_ms),
        &inputs,
    );

    // ── 5. Run forever ────────────────────────────────────────
    tasks::lamp::run(&config, node, &client, &server, &inputs, button)?;
    Ok(())
}
