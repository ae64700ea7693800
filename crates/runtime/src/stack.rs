//! The state stack.
//!
//! Invariants:
//! - never empty; the root state placed at construction is permanent;
//! - pushing pauses the previous top, popping resumes the revealed state
//!   and then delivers the departing state's callback to it;
//! - only the game loop mutates the stack, and only between frames.

use crate::state::{Callback, State, StateContext};

pub struct StateStack {
    states: Vec<Box<dyn State>>,
}

impl StateStack {
    pub fn new(root: Box<dyn State>) -> Self {
        Self { states: vec![root] }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn top(&self) -> &dyn State {
        self.states
            .last()
            .expect("stack invariant: never empty")
            .as_ref()
    }

    pub fn top_mut(&mut self) -> &mut dyn State {
        self.states
            .last_mut()
            .expect("stack invariant: never empty")
            .as_mut()
    }

    /// Bottom-to-top iteration, for snapshotting the stack into a save.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &dyn State> {
        self.states.iter().map(|s| s.as_ref())
    }

    /// Pushes a new top state, pausing the previous one.
    pub fn push(&mut self, state: Box<dyn State>) {
        if let Some(top) = self.states.last_mut() {
            top.on_pause();
        }
        tracing::debug!(kind = %state.kind(), depth = self.states.len() + 1, "state pushed");
        self.states.push(state);
    }

    /// Pops the top state and delivers `callback` to the revealed one.
    ///
    /// # Panics
    ///
    /// Panics when called with only the root on the stack; states below the
    /// root do not exist and a transition that tries to go there is a bug.
    pub fn pop(&mut self, callback: Callback, ctx: &mut StateContext<'_>) {
        assert!(self.states.len() > 1, "cannot pop the root state");
        let departed = self.states.pop().expect("stack invariant: never empty");
        tracing::debug!(kind = %departed.kind(), depth = self.states.len(), "state popped");

        let top = self
            .states
            .last_mut()
            .expect("stack invariant: root remains");
        top.on_resume();
        top.on_return(callback, ctx);
    }

    /// Replaces the whole stack with freshly rebuilt states after a load.
    pub fn restore(&mut self, states: Vec<Box<dyn State>>) {
        assert!(!states.is_empty(), "a restored stack needs a root state");
        tracing::debug!(depth = states.len(), "stack restored");
        self.states = states;
    }

    /// Drops everything above the root and resumes it.
    pub fn reset_to_root(&mut self) {
        if self.states.len() > 1 {
            tracing::debug!(dropped = self.states.len() - 1, "stack reset to root");
            self.states.truncate(1);
            if let Some(root) = self.states.last_mut() {
                root.on_resume();
            }
        }
    }
}
