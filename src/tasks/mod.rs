//! Cooperative node runtimes.
//!
//! Each node runs one `edge-executor` `LocalExecutor` on one thread,
//! driven by the `async-io-mini` reactor.  Logical tasks (timers, the
//! UDP server, button input) are plain futures; they share the node's
//! state through an `Rc<RefCell<_>>` that is only borrowed between two
//! awaits, so every state mutation runs to completion before the next
//! task gets the CPU.
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────┐
//!  │  futures_lite::block_on                                  │
//!  │  ┌────────────────────────────────────────────────────┐  │
//!  │  │  edge_executor::LocalExecutor                      │  │
//!  │  │   ┌────────┐ ┌──────────┐ ┌────────┐ ┌──────────┐  │  │
//!  │  │   │ timers │ │ UDP serve│ │ button │ │ outbound │  │  │
//!  │  │   └───┬────┘ └────┬─────┘ └───┬────┘ └────┬─────┘  │  │
//!  │  │       └─────── Rc<RefCell<Node>> ─────────┘        │  │
//!  │  └────────────────────────────────────────────────────┘  │
//!  └──────────────────────────────────────────────────────────┘
//! ```

pub mod lamp;
pub mod predictor;

use core::time::Duration;
use std::time::Instant;

use async_io_mini::Timer;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use embedded_hal::digital::InputPin;
use log::warn;

use crate::drivers::button::ButtonDriver;
use crate::events::InputEvent;

/// Depth of the classified-input queue between the button and the node.
pub const INPUT_DEPTH: usize = 8;

/// Queue of classified button events feeding a node's input task.
pub type InputChannel = Channel<NoopRawMutex, InputEvent, INPUT_DEPTH>;

/// Maximum number of tasks per node executor.
pub const MAX_TASKS: usize = 8;

/// Button sampling period.
pub const BUTTON_POLL: Duration = Duration::from_millis(10);

/// Sample an active-low button pin and push classified events.
pub async fn button_loop<P: InputPin>(mut pin: P, mut driver: ButtonDriver, inputs: &InputChannel) {
    let epoch = Instant::now();
    loop {
        let pressed = match pin.is_low() {
            Ok(level) => level,
            Err(e) => {
                warn!("Button: GPIO read failed: {:?}", e);
                false
            }
        };
        let now_ms = epoch.elapsed().as_millis() as u32;
        if let Some(event) = driver.tick(now_ms, pressed) {
            if inputs.try_send(event).is_err() {
                warn!("Button: input queue full, dropping {:?}", event);
            }
        }
        Timer::after(BUTTON_POLL).await;
    }
}

fn millis(ms: u32) -> Duration {
    Duration::from_millis(u64::from(ms))
}
