//! Sensor subsystem.
//!
//! The lamp has a single (simulated) ambient light sensor; its readings
//! are written straight into `DeviceState.current_lux`.

pub mod illuminance;
