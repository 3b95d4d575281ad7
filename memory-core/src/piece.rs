use crate::color::Color;

/// Absolute board position in CSS pixels, top-left corner of the piece.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl From<(f64, f64)> for Position {
    fn from(v: (f64, f64)) -> Self {
        Position { x: v.0, y: v.1 }
    }
}

/// Stable identifier of a piece within one round.
pub type PieceId = u32;

/// One numbered, colored element of the sequence.
///
/// The model mirrors what the render surface shows; the controller updates
/// both sides together so the two never drift apart.
#[derive(Clone, Debug, PartialEq)]
pub struct Piece {
    id: PieceId,
    color: Color,
    original_order: u32,
    // None while the piece still sits in normal layout flow
    position: Option<Position>,
    label_visible: bool,
    clickable: bool,
}

impl Piece {
    /// A fresh piece: label shown, not clickable, in layout flow.
    pub fn new(id: PieceId, color: Color, original_order: u32) -> Self {
        Piece {
            id,
            color,
            original_order,
            position: None,
            label_visible: true,
            clickable: false,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn original_order(&self) -> u32 {
        self.original_order
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn is_label_visible(&self) -> bool {
        self.label_visible
    }

    pub fn is_clickable(&self) -> bool {
        self.clickable
    }

    /// Text the element should show right now.
    pub fn label(&self) -> Option<String> {
        self.label_visible.then(|| self.original_order.to_string())
    }

    pub(crate) fn set_position(&mut self, pos: Position) {
        self.position = Some(pos);
    }

    pub(crate) fn set_label_visible(&mut self, show: bool) {
        self.label_visible = show;
    }

    pub(crate) fn set_clickable(&mut self, enabled: bool) {
        self.clickable = enabled;
    }
}
