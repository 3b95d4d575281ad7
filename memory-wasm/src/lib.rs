use std::cell::RefCell;
use std::rc::Rc;

use memory_core::{GameConfig, GameController, InputPanel, Messages};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

mod dom;
mod panel;
mod state;
mod timers;
mod utils;

use crate::dom::{DomSurface, create_board};
use crate::panel::PanelView;
use crate::state::GameHandle;
use crate::timers::TimeoutScheduler;
use crate::utils::{init_tracing, lang_from_query, log, time_unit_from_query};

/// Mount point: `#app` when the host page provides one, else `<body>`.
fn init_root(document: &Document) -> Result<HtmlElement, JsValue> {
    if let Some(el) = document.get_element_by_id("app") {
        return Ok(el.dyn_into::<HtmlElement>()?);
    }
    document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no <body>"))
}

fn random_seed() -> u64 {
    let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (hi << 32) | lo
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    init_tracing();
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    let search = window.location().search().unwrap_or_default();
    let lang = lang_from_query(&search);
    let messages = Messages::for_lang(&lang).unwrap_or_else(|e| {
        log(&format!("Falling back to English messages: {e}"));
        Messages::default()
    });
    let mut config = GameConfig::default();
    if let Some(ms) = time_unit_from_query(&search) {
        config.time_unit_ms = ms;
    }

    let root = init_root(&document)?;
    let view = PanelView::render(&document, &root, &messages)?;
    let board = create_board(&document, &root)?;

    let game: GameHandle = Rc::new_cyclic(|weak| {
        RefCell::new(GameController::new(
            DomSurface::new(
                window.clone(),
                document.clone(),
                board,
                view.status.clone(),
                weak.clone(),
            ),
            TimeoutScheduler::new(window.clone(), weak.clone()),
            SmallRng::seed_from_u64(random_seed()),
            config,
            messages.clone(),
        ))
    });

    view.attach(InputPanel::new(messages), &game)?;
    {
        let g = game.borrow();
        g.surface().sync_phase(g.phase());
    }
    log(&format!(
        "Memory game ready (lang={lang}, unit={}ms)",
        config.time_unit_ms
    ));
    Ok(())
}
