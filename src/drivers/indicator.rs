//! Brightness indicator patterns.
//!
//! Maps a brightness percentage onto the discrete colour shown by the
//! node's RGB indicator.  Both nodes use the same table.
//!
//! | Brightness  | Pattern   | R | G | B |
//! |-------------|-----------|---|---|---|
//! | 0           | Off       |   |   |   |
//! | (0, 20]     | Green     |   | ● |   |
//! | (20, 50]    | Blue      |   |   | ● |
//! | (50, 80]    | RedBlue   | ● |   | ● |
//! | (80, 100]   | Red       | ● |   |   |
//!
//! Anything outside 0–100 (a degenerate oracle score, for instance) shows
//! as off.

/// Discrete indicator pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorPattern {
    #[default]
    Off,
    Green,
    Blue,
    RedBlue,
    Red,
}

impl IndicatorPattern {
    /// Pattern for a brightness percentage.
    pub fn for_brightness(brightness: i32) -> Self {
        match brightness {
            1..=20 => Self::Green,
            21..=50 => Self::Blue,
            51..=80 => Self::RedBlue,
            81..=100 => Self::Red,
            _ => Self::Off,
        }
    }

    /// Which of the red, green and blue LEDs are lit.
    pub fn channels(self) -> (bool, bool, bool) {
        match self {
            Self::Off => (false, false, false),
            Self::Green => (false, true, false),
            Self::Blue => (false, false, true),
            Self::RedBlue => (true, false, true),
            Self::Red => (true, false, false),
        }
    }
}
