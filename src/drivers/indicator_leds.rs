//! Discrete indicator LEDs.
//!
//! Four GPIO outputs drive separate red, green and blue LEDs plus the
//! yellow auxiliary LED.  Any `embedded-hal` output pin works, so the same
//! driver runs on ESP-IDF `PinDriver`s and on host-side mock pins.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::IndicatorPort;
use crate::drivers::indicator::IndicatorPattern;

pub struct IndicatorLeds<R, G, B, Y> {
    red: R,
    green: G,
    blue: B,
    yellow: Y,
}

impl<R, G, B, Y> IndicatorLeds<R, G, B, Y>
where
    R: OutputPin,
    G: OutputPin,
    B: OutputPin,
    Y: OutputPin,
{
    pub fn new(red: R, green: G, blue: B, yellow: Y) -> Self {
        let mut leds = Self {
            red,
            green,
            blue,
            yellow,
        };
        leds.show(IndicatorPattern::Off);
        leds.set_aux(false);
        leds
    }
}

fn drive<P: OutputPin>(pin: &mut P, on: bool, name: &str) {
    let result = if on { pin.set_high() } else { pin.set_low() };
    if let Err(e) = result {
        warn!("LED {}: GPIO write failed: {:?}", name, e);
    }
}

impl<R, G, B, Y> IndicatorPort for IndicatorLeds<R, G, B, Y>
where
    R: OutputPin,
    G: OutputPin,
    B: OutputPin,
    Y: OutputPin,
{
    fn show(&mut self, pattern: IndicatorPattern) {
        let (r, g, b) = pattern.channels();
        drive(&mut self.red, r, "red");
        drive(&mut self.green, g, "green");
        drive(&mut self.blue, b, "blue");
    }

    fn set_aux(&mut self, on: bool) {
        drive(&mut self.yellow, on, "yellow");
    }
}
