//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for both nodes: the lamp's
//! gesture, presence and negotiation handling, and the predictor's
//! suggestion and broadcast logic.  All interaction with hardware and
//! the network happens through **port traits** defined in [`ports`] and
//! [`crate::rpc::transport`], keeping this layer fully testable without
//! real peripherals.

pub mod events;
pub mod lamp;
pub mod ports;
pub mod predictor;
