//! Button classification and indicator LED drivers.

pub mod button;
pub mod indicator;
pub mod indicator_leds;
