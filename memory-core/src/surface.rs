use crate::piece::{Piece, PieceId, Position};
use crate::schedule::RoundToken;

/// Render capability the controller drives. Implementations own the actual
/// elements; the controller only ever talks to them through these calls.
pub trait Surface {
    /// Visible `(width, height)` of the board in CSS pixels.
    fn viewport(&self) -> (f64, f64);
    /// Create the element for a fresh piece in normal layout flow.
    fn mount(&mut self, piece: &Piece);
    /// Move a piece to absolute coordinates.
    fn set_position(&mut self, id: PieceId, pos: Position);
    /// Show `Some(label)` or blank the element with `None`.
    fn set_label(&mut self, id: PieceId, label: Option<&str>);
    /// Arm or disarm pointer activation. An armed element reports clicks
    /// back as `(round, id)`; arming replaces any previous handler.
    fn set_clickable(&mut self, id: PieceId, round: RoundToken, enabled: bool);
    /// Drop every piece element.
    fn clear(&mut self);
}

/// Feedback text region owned by the input panel.
pub trait StatusLine {
    /// Replace the shown message; an empty string clears it.
    fn display_status(&mut self, message: &str);
}
