//! Debounced button driver with hold-tick generation.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up.  The main loop samples the
//! pin level and calls `tick()` at a fixed rate; the driver runs the
//! debounce and gesture state machine and yields classified
//! [`InputEvent`]s.
//!
//! ## Events
//!
//! | Event      | Condition                                        |
//! |------------|--------------------------------------------------|
//! | `Press`    | Level held down for `DEBOUNCE_MS`                |
//! | `HoldTick` | Every `hold_period_ms` while still held          |
//! | `Release`  | Level back up after a debounced press            |

use crate::events::InputEvent;

const DEBOUNCE_MS: u32 = 50;

/// Internal state machine for gesture detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Idle,
    DebounceWait { since_ms: u32 },
    Held { next_tick_ms: u32 },
}

pub struct ButtonDriver {
    state: GestureState,
    hold_period_ms: u32,
}

impl ButtonDriver {
    pub fn new(hold_period_ms: u32) -> Self {
        Self {
            state: GestureState::Idle,
            hold_period_ms: hold_period_ms.max(1),
        }
    }

    /// Call from the main loop at each sample.
    /// `now_ms` is the current monotonic time in milliseconds and
    /// `pressed` the debounced-or-not raw level (true = down).
    /// Returns a classified input event, if any.
    pub fn tick(&mut self, now_ms: u32, pressed: bool) -> Option<InputEvent> {
        match self.state {
            GestureState::Idle => {
                if pressed {
                    self.state = GestureState::DebounceWait { since_ms: now_ms };
                }
                None
            }

            GestureState::DebounceWait { since_ms } => {
                if !pressed {
                    // Bounce: never became a press.
                    self.state = GestureState::Idle;
                    return None;
                }
                if now_ms.wrapping_sub(since_ms) >= DEBOUNCE_MS {
                    self.state = GestureState::Held {
                        next_tick_ms: now_ms.wrapping_add(self.hold_period_ms),
                    };
                    return Some(InputEvent::Press);
                }
                None
            }

            GestureState::Held { next_tick_ms } => {
                if !pressed {
                    self.state = GestureState::Idle;
                    return Some(InputEvent::Release);
                }
                // Signed distance keeps this correct across u32 wrap.
                if (now_ms.wrapping_sub(next_tick_ms) as i32) >= 0 {
                    self.state = GestureState::Held {
                        next_tick_ms: next_tick_ms.wrapping_add(self.hold_period_ms),
                    };
                    return Some(InputEvent::HoldTick);
                }
                None
            }
        }
    }
}
