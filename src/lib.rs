//! SmartLamp firmware library.
//!
//! Exposes the pure-logic modules (gesture classifier, presence
//! simulation, negotiation, prediction, broadcast) for integration
//! testing, plus the portable adapters and task runtime the two node
//! binaries are assembled from.  ESP-IDF-specific code lives only in
//! `src/bin/`, behind the `espidf` feature.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod events;
pub mod fsm;
pub mod rpc;
pub mod sensors;

pub mod adapters;
pub mod drivers;
pub mod tasks;
