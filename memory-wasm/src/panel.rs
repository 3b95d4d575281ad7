use std::rc::Rc;

use memory_core::constants::{MAX_PIECES, MIN_PIECES};
use memory_core::{InputPanel, Messages};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, HtmlInputElement, KeyboardEvent};

use crate::state::GameHandle;

/// DOM half of the input panel: label, bounded number field, start button
/// and the status line.
pub struct PanelView {
    input: HtmlInputElement,
    button: HtmlElement,
    pub status: HtmlElement,
}

impl PanelView {
    pub fn render(
        document: &Document,
        root: &HtmlElement,
        messages: &Messages,
    ) -> Result<Self, JsValue> {
        let form: HtmlElement = document.create_element("div")?.dyn_into()?;
        form.set_class_name("panel");

        let label: HtmlElement = document.create_element("label")?.dyn_into()?;
        label.set_attribute("for", "roundSize")?;
        label.set_text_content(Some(&messages.input_label));

        let input: HtmlInputElement = document.create_element("input")?.dyn_into()?;
        input.set_id("roundSize");
        input.set_type("number");
        input.set_min(&MIN_PIECES.to_string());
        input.set_max(&MAX_PIECES.to_string());
        input.set_step("1");
        input.set_value(&MIN_PIECES.to_string());

        let button: HtmlElement = document.create_element("button")?.dyn_into()?;
        button.set_id("start");
        button.set_attribute("type", "button")?;
        button.set_text_content(Some(&messages.start_button));

        let status: HtmlElement = document.create_element("div")?.dyn_into()?;
        status.set_id("status");
        status.set_attribute("role", "status")?;

        form.append_child(&label)?;
        form.append_child(&input)?;
        form.append_child(&button)?;
        form.append_child(&status)?;
        root.append_child(&form)?;

        Ok(PanelView {
            input,
            button,
            status,
        })
    }

    /// Wire the start button (and Enter in the field) to the game.
    pub fn attach(&self, panel: InputPanel, game: &GameHandle) -> Result<(), JsValue> {
        let panel = Rc::new(panel);

        {
            let panel = panel.clone();
            let game = game.clone();
            let input = self.input.clone();
            let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
                activate(&panel, &input, &game);
            }));
            self.button.set_onclick(Some(onclick.as_ref().unchecked_ref()));
            onclick.forget();
        }

        {
            let game = game.clone();
            let input = self.input.clone();
            let keydown =
                Closure::<dyn FnMut(KeyboardEvent)>::wrap(Box::new(move |e: KeyboardEvent| {
                    if e.key() == "Enter" {
                        e.prevent_default();
                        activate(&panel, &input, &game);
                    }
                }));
            self.input
                .set_onkeydown(Some(keydown.as_ref().unchecked_ref()));
            keydown.forget();
        }

        Ok(())
    }
}

fn activate(panel: &InputPanel, input: &HtmlInputElement, game: &GameHandle) {
    let raw = input.value();
    let mut g = game.borrow_mut();
    // rejection is already reported on the status line
    let _ = panel.activate(&raw, &mut *g, |g, n| g.start_game(n));
    g.surface().sync_phase(g.phase());
}
