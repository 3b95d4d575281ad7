use std::collections::HashMap;

use memory_core::{Phase, Piece, PieceId, Position, RoundToken, StatusLine, Surface};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, Window};

use crate::state::WeakGame;
use crate::utils::{log, px, viewport_size};

type ClickClosure = Closure<dyn FnMut()>;

/// Create the container the pieces live in.
pub fn create_board(document: &Document, root: &HtmlElement) -> Result<HtmlElement, JsValue> {
    let board: HtmlElement = document.create_element("div")?.dyn_into()?;
    board.set_id("board");
    board.set_class_name("board");
    root.append_child(&board)?;
    Ok(board)
}

/// Render surface backed by one `<button>` per piece inside `#board`.
pub struct DomSurface {
    window: Window,
    document: Document,
    board: HtmlElement,
    status: HtmlElement,
    game: WeakGame,
    elements: HashMap<PieceId, HtmlElement>,
    handlers: HashMap<PieceId, ClickClosure>,
    // Disarmed handlers may still be on the call stack (a piece disarms
    // itself from inside its own click), so they are dropped on `clear`.
    retired: Vec<ClickClosure>,
}

impl DomSurface {
    pub fn new(
        window: Window,
        document: Document,
        board: HtmlElement,
        status: HtmlElement,
        game: WeakGame,
    ) -> Self {
        DomSurface {
            window,
            document,
            board,
            status,
            game,
            elements: HashMap::new(),
            handlers: HashMap::new(),
            retired: Vec::new(),
        }
    }

    /// Mirror the round phase as `data-phase` for styling.
    pub fn sync_phase(&self, phase: Phase) {
        if let Err(e) = self.board.set_attribute("data-phase", phase.as_str()) {
            log(&format!("Failed to set phase {}: {:?}", phase.as_str(), e));
        }
    }

    fn try_mount(&mut self, piece: &Piece) -> Result<(), JsValue> {
        let el: HtmlElement = self.document.create_element("button")?.dyn_into()?;
        el.set_class_name("piece");
        el.set_attribute("type", "button")?;
        el.set_attribute("data-order", &piece.original_order().to_string())?;
        let style = el.style();
        style.set_property("background-color", &piece.color().to_string())?;
        style.set_property("color", piece.color().contrast())?;
        el.set_text_content(piece.label().as_deref());
        self.board.append_child(&el)?;
        self.elements.insert(piece.id(), el);
        Ok(())
    }

    fn try_set_position(&self, id: PieceId, pos: Position) -> Result<(), JsValue> {
        let Some(el) = self.elements.get(&id) else {
            return Ok(());
        };
        let style = el.style();
        // a margin would push the border box past `left`/`top`
        style.set_property("margin", "0")?;
        style.set_property("position", "absolute")?;
        style.set_property("left", &px(pos.x))?;
        style.set_property("top", &px(pos.y))?;
        Ok(())
    }

    fn disarm(&mut self, id: PieceId) {
        if let Some(el) = self.elements.get(&id) {
            el.set_onclick(None);
            if let Err(e) = el.class_list().remove_1("armed") {
                log(&format!("Failed to disarm piece {id}: {:?}", e));
            }
        }
        if let Some(old) = self.handlers.remove(&id) {
            self.retired.push(old);
        }
    }

    fn arm(&mut self, id: PieceId, round: RoundToken) {
        self.disarm(id);
        let Some(el) = self.elements.get(&id) else {
            return;
        };
        let game = self.game.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            if let Some(game) = game.upgrade() {
                let mut g = game.borrow_mut();
                g.handle_button_click(round, id);
                g.surface().sync_phase(g.phase());
            }
        }));
        el.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        if let Err(e) = el.class_list().add_1("armed") {
            log(&format!("Failed to arm piece {id}: {:?}", e));
        }
        self.handlers.insert(id, onclick);
    }
}

impl Surface for DomSurface {
    fn viewport(&self) -> (f64, f64) {
        viewport_size(&self.document, &self.window)
    }

    fn mount(&mut self, piece: &Piece) {
        if let Err(e) = self.try_mount(piece) {
            log(&format!("Failed to mount piece {}: {:?}", piece.id(), e));
        }
    }

    fn set_position(&mut self, id: PieceId, pos: Position) {
        if let Err(e) = self.try_set_position(id, pos) {
            log(&format!("Failed to move piece {id}: {:?}", e));
        }
    }

    fn set_label(&mut self, id: PieceId, label: Option<&str>) {
        if let Some(el) = self.elements.get(&id) {
            el.set_text_content(label);
        }
    }

    fn set_clickable(&mut self, id: PieceId, round: RoundToken, enabled: bool) {
        if enabled {
            self.arm(id, round);
        } else {
            self.disarm(id);
        }
    }

    fn clear(&mut self) {
        for el in self.elements.values() {
            el.set_onclick(None);
            el.remove();
        }
        self.elements.clear();
        self.handlers.clear();
        self.retired.clear();
    }
}

impl StatusLine for DomSurface {
    fn display_status(&mut self, message: &str) {
        self.status.set_text_content(Some(message));
    }
}
