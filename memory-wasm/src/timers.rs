use memory_core::{Scheduler, Task};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::state::WeakGame;
use crate::utils::log;

/// `setTimeout`-backed scheduler. Every timeout is one-shot and feeds its
/// task back into the game when it fires.
pub struct TimeoutScheduler {
    window: Window,
    game: WeakGame,
    handles: Vec<i32>,
}

impl TimeoutScheduler {
    pub fn new(window: Window, game: WeakGame) -> Self {
        TimeoutScheduler {
            window,
            game,
            handles: Vec::new(),
        }
    }
}

impl Scheduler for TimeoutScheduler {
    fn schedule(&mut self, delay_ms: u32, task: Task) {
        let game = self.game.clone();
        let cb = Closure::once_into_js(move || {
            if let Some(game) = game.upgrade() {
                let mut g = game.borrow_mut();
                g.run_task(task);
                g.surface().sync_phase(g.phase());
            }
        });
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), delay)
        {
            Ok(handle) => self.handles.push(handle),
            Err(e) => log(&format!("Failed to schedule {:?}: {:?}", task.kind, e)),
        }
    }

    fn cancel_all(&mut self) {
        for handle in self.handles.drain(..) {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}
