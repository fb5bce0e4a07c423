//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers, with no closures,
//! dynamic dispatch or heap.
//!
//! ```text
//!          Press / Release(quantize)
//!            ┌────┐
//!            ▼    │
//!          IDLE ──┘──[HoldTick: step]──▶ HELD_OVERRIDE ──┐
//!            ▲                               │   ▲       │ HoldTick: step
//!            │                               │   └───────┘
//!            └──────[Release | Press]────────┘
//! ```
//!
//! A short gesture (Press, Release) snaps the threshold to the next band.
//! A held gesture steps it by 5 on every tick and keeps the stepped value
//! on release.  Either release recomputes desired lux once.

use super::context::DeviceState;
use super::{StateDescriptor, StateId};
use crate::control::bands;
use crate::events::InputEvent;
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: None,
            on_exit: None,
            on_event: idle_event,
        },
        // Index 1: HeldOverride
        StateDescriptor {
            id: StateId::HeldOverride,
            name: "HeldOverride",
            on_enter: Some(held_enter),
            on_exit: None,
            on_event: held_event,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state
// ═══════════════════════════════════════════════════════════════════════════

fn idle_event(st: &mut DeviceState, event: InputEvent) -> Option<StateId> {
    match event {
        InputEvent::Press => {
            st.manual_mode = false;
            None
        }
        InputEvent::HoldTick => {
            step(st);
            Some(StateId::HeldOverride)
        }
        InputEvent::Release => {
            let before = st.threshold;
            st.threshold = bands::quantize(st.threshold);
            st.recompute_desired_lux();
            info!(
                "IDLE: short press, threshold {} -> {} (desired {} lx)",
                before, st.threshold, st.desired_lux
            );
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  HELD_OVERRIDE state: manual dimming while the button stays down
// ═══════════════════════════════════════════════════════════════════════════

fn held_enter(st: &mut DeviceState) {
    st.manual_mode = true;
    info!("HELD: manual override from threshold {}", st.threshold);
}

fn held_event(st: &mut DeviceState, event: InputEvent) -> Option<StateId> {
    match event {
        InputEvent::Press => {
            // Release was missed; start over.
            st.manual_mode = false;
            Some(StateId::Idle)
        }
        InputEvent::HoldTick => {
            step(st);
            None
        }
        InputEvent::Release => {
            st.recompute_desired_lux();
            info!(
                "HELD: released at threshold {} (desired {} lx)",
                st.threshold, st.desired_lux
            );
            Some(StateId::Idle)
        }
    }
}

fn step(st: &mut DeviceState) {
    st.threshold = bands::hold_step(st.threshold);
    debug!("HELD: threshold {}", st.threshold);
}
