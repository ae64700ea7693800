//! Engine events and the event bus.
//!
//! States never mutate the state stack directly; they publish transition
//! requests to the bus and the game loop applies them after the frame's
//! update pass. The bus is plain FIFO: events apply in publish order, and
//! draining happens exactly once per frame.

use std::collections::VecDeque;

use crate::state::{Callback, StateTarget};

/// A request from a state to the game loop.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    /// Push a new state on top of the caller.
    CallState(StateTarget),
    /// Pop the top state, delivering the callback to the state below.
    ExitState(Callback),
    /// Drop everything above the root state.
    ResetStack,
    /// Persist the current session to a save slot.
    SaveGame { slot: u8 },
    /// Replace the session from a save slot.
    LoadGame { slot: u8 },
    /// Shut the game down.
    Quit,
}

/// FIFO bus carrying engine events from states to the game loop.
///
/// Injected into every state call through the context, so tests can drive
/// states in isolation and assert on what they published.
#[derive(Debug, Default)]
pub struct EventBus {
    queue: VecDeque<EngineEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, event: EngineEvent) {
        tracing::debug!(?event, "engine event published");
        self.queue.push_back(event);
    }

    /// Removes and returns the oldest event.
    pub fn pop(&mut self) -> Option<EngineEvent> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
