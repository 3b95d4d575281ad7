//! Game logic for the sequence memory game: numbered pieces are shown,
//! scrambled across the board, then must be clicked back in order.
//!
//! Nothing here touches a browser. Rendering, timers and the status line are
//! reached through the [`Surface`], [`StatusLine`] and [`Scheduler`] traits.

pub mod color;
pub mod config;
pub mod constants;
pub mod controller;
pub mod messages;
pub mod panel;
pub mod piece;
pub mod schedule;
pub mod surface;

pub use color::Color;
pub use config::GameConfig;
pub use controller::{GameController, Phase, random_position};
pub use messages::{Messages, MessagesError};
pub use panel::{InputPanel, RoundSizeError, parse_round_size};
pub use piece::{Piece, PieceId, Position};
pub use schedule::{RoundToken, Scheduler, Task, TaskKind};
pub use surface::{StatusLine, Surface};
