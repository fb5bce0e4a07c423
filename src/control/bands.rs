//! Brightness bands and threshold arithmetic
//!
//! A short press walks the threshold through the canonical bands
//! `0 → 20 → 50 → 80 → 0`; a held press steps it by 5% per hold tick.
//! Both rules, and the desired-lux formula they feed, live here so the
//! classifier and the presence simulator share one definition.

/// The canonical thresholds a short press can land on.
pub const BANDS: [u8; 5] = [0, 20, 50, 80, 100];

/// Threshold increment applied on every hold tick.
pub const HOLD_STEP: u8 = 5;

/// Upper bound of the threshold scale (percent).
pub const MAX_THRESHOLD: u8 = 100;

/// Next band for a short press.
///
/// | input      | band |
/// |------------|------|
/// | 0          | 20   |
/// | (0, 20)    | 20   |
/// | [20, 50)   | 50   |
/// | [50, 80)   | 80   |
/// | ≥ 80       | 0    |
pub fn quantize(threshold: u8) -> u8 {
    match threshold {
        0..20 => 20,
        20..50 => 50,
        50..80 => 80,
        _ => 0,
    }
}

/// One hold tick: add [`HOLD_STEP`], wrapping to 0 once the sum passes 100.
///
/// Values 96–100 are kept as-is; anything above 100 becomes 0, so from 95
/// the sequence is 100, 0, 5.
pub fn hold_step(threshold: u8) -> u8 {
    let next = threshold.saturating_add(HOLD_STEP);
    if next > MAX_THRESHOLD { 0 } else { next }
}

/// Lux the user wants on the desk: the lamp's contribution at `threshold`
/// on top of the ambient reading.
///
/// `floor(threshold * max_lamp_lux / 100) + current_lux`, saturating.
pub fn desired_lux(threshold: u8, max_lamp_lux: u16, current_lux: u16) -> u16 {
    let lamp = u32::from(threshold) * u32::from(max_lamp_lux) / 100;
    let total = lamp + u32::from(current_lux);
    total.min(u32::from(u16::MAX)) as u16
}
