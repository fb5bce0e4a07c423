//! Lamp control rules: brightness bands and the presence simulation.

pub mod bands;
pub mod presence;
