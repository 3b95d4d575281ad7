use std::cell::RefCell;
use std::rc::{Rc, Weak};

use memory_core::GameController;
use rand::rngs::SmallRng;

use crate::dom::DomSurface;
use crate::timers::TimeoutScheduler;

/// The controller as wired into the page.
pub type Game = GameController<DomSurface, TimeoutScheduler, SmallRng>;

/// Shared handle held by the panel callbacks. Piece and timer callbacks only
/// keep a [`WeakGame`] so they never keep a torn-down game alive.
pub type GameHandle = Rc<RefCell<Game>>;
pub type WeakGame = Weak<RefCell<Game>>;
