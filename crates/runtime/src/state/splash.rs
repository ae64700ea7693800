//! The splash screen, permanent root of the stack.

use crate::event::EngineEvent;
use crate::input::InputEvent;
use crate::render::Surface;
use crate::state::{State, StateContext, StateKind, StateSnapshot, StateTarget};

/// Title card. Any key advances to the main menu; resetting the stack after
/// a game over lands back here.
#[derive(Debug, Default)]
pub struct SplashState {
    elapsed_ms: u32,
}

impl SplashState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl State for SplashState {
    fn kind(&self) -> StateKind {
        StateKind::Splash
    }

    fn handle_input(&mut self, input: &InputEvent, ctx: &mut StateContext<'_>) {
        match input {
            InputEvent::Quit => ctx.bus.publish(EngineEvent::Quit),
            InputEvent::Press(_) => ctx.bus.publish(EngineEvent::CallState(StateTarget::MainMenu)),
            InputEvent::Release(_) => {}
        }
    }

    fn update(&mut self, dt_ms: u32, _ctx: &mut StateContext<'_>) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.clear("splash");
        surface.draw_text(340, 260, "A JOURNEY BEGINS");
        // Blink once a second.
        if self.elapsed_ms % 1000 < 500 {
            surface.draw_text(330, 320, "Press any key");
        }
    }

    fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::Splash
    }
}
