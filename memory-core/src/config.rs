use serde::{Deserialize, Serialize};

use crate::constants::{
    MEMORIZE_UNITS_PER_PIECE, PIECE_HEIGHT, PIECE_WIDTH, SCRAMBLE_DELAY_UNITS, TIME_UNIT_MS,
};

/// Tunables for one controller instance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub piece_width: f64,
    pub piece_height: f64,
    pub time_unit_ms: u32,
    pub memorize_units_per_piece: u32,
    pub scramble_delay_units: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            piece_width: PIECE_WIDTH,
            piece_height: PIECE_HEIGHT,
            time_unit_ms: TIME_UNIT_MS,
            memorize_units_per_piece: MEMORIZE_UNITS_PER_PIECE,
            scramble_delay_units: SCRAMBLE_DELAY_UNITS,
        }
    }
}

impl GameConfig {
    /// Memorization window for an `n`-piece round, in milliseconds.
    pub fn memorize_delay_ms(&self, n: u32) -> u32 {
        n.saturating_mul(self.memorize_units_per_piece)
            .saturating_mul(self.time_unit_ms)
    }

    /// Pause between scramble iterations, in milliseconds.
    pub fn scramble_delay_ms(&self) -> u32 {
        self.scramble_delay_units.saturating_mul(self.time_unit_ms)
    }
}
