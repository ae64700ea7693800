//! Abstract input events.
//!
//! The embedder translates whatever backend it uses (keyboard, gamepad,
//! scripted test input) into these events before handing them to the game.

/// Logical game buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Cancel,
    Pause,
}

/// One input event delivered to the active state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Press(Button),
    Release(Button),
    /// Window close or equivalent; shuts the game down from any state.
    Quit,
}
