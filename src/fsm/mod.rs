//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern, driven by classified button input
//! instead of a periodic tick:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                    │
//! │  ┌──────────────┬──────────┬──────────┬──────────────────────┐ │
//! │  │ StateId      │ on_enter │ on_exit  │ on_event             │ │
//! │  ├──────────────┼──────────┼──────────┼──────────────────────┤ │
//! │  │ Idle         │ fn(st)   │ fn(st)   │ fn(st, ev)->Option<> │ │
//! │  │ HeldOverride │ fn(st)   │ fn(st)   │ fn(st, ev)->Option<> │ │
//! │  └──────────────┴──────────┴──────────┴──────────────────────┘ │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! For each input event the engine calls `on_event` for the **current**
//! state.  If it returns `Some(next_id)`, the engine runs `on_exit` for
//! the current state, then `on_enter` for the next, and updates the
//! current pointer.  All functions receive `&mut DeviceState`.

pub mod context;
pub mod states;

use context::DeviceState;
use log::info;

use crate::events::InputEvent;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of the classifier states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    /// No gesture in progress, or a short press not yet released.
    Idle = 0,
    /// At least one hold tick seen since the last press.
    HeldOverride = 1,
}

impl StateId {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 2;

    /// Convert a table index back to `StateId`.  Panics on out-of-range in
    /// debug builds; returns `Idle` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::HeldOverride,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut DeviceState);

/// Signature for the per-event handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateEventFn = fn(&mut DeviceState, InputEvent) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array, no heap and no `dyn`.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_event: StateEventFn,
}

/// A state change performed while handling one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: StateId,
    pub to: StateId,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table (array of [`StateDescriptor`]); the
/// [`DeviceState`] it mutates is owned by the caller and threaded through
/// every handler call.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `handle()`.
    pub fn start(&mut self, state: &mut DeviceState) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(state);
        }
    }

    /// Feed one input event.
    ///
    /// 1. Call `on_event` for the current state.
    /// 2. If it returns `Some(next)`, execute the transition:
    ///    `on_exit(current)` → update pointer → `on_enter(next)`.
    pub fn handle(&mut self, event: InputEvent, state: &mut DeviceState) -> Option<Transition> {
        let next = (self.table[self.current].on_event)(state, event);

        match next {
            Some(next_id) if next_id as usize != self.current => {
                let from = self.current_state();
                self.transition(next_id, state);
                Some(Transition { from, to: next_id })
            }
            _ => None,
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, state: &mut DeviceState) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(state);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(state);
        }
    }
}
