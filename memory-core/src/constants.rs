/// Game-wide numeric constants.
/// Lengths are CSS pixels, durations are time units unless noted otherwise.
/// Width of a piece's footprint on the board.
pub const PIECE_WIDTH: f64 = 160.0;
/// Height of a piece's footprint on the board.
pub const PIECE_HEIGHT: f64 = 80.0;
/// Smallest accepted round size.
pub const MIN_PIECES: u32 = 3;
/// Largest accepted round size.
pub const MAX_PIECES: u32 = 7;
/// Length of one time unit in milliseconds.
pub const TIME_UNIT_MS: u32 = 1000;
/// Memorization time granted per piece (time units).
pub const MEMORIZE_UNITS_PER_PIECE: u32 = 1;
/// Pause between two scramble iterations (time units).
pub const SCRAMBLE_DELAY_UNITS: u32 = 2;
