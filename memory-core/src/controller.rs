use rand::Rng;
use tracing::{debug, info};

use crate::color::Color;
use crate::config::GameConfig;
use crate::messages::Messages;
use crate::piece::{Piece, PieceId, Position};
use crate::schedule::{RoundToken, Scheduler, Task, TaskKind};
use crate::surface::{StatusLine, Surface};

/// Lifecycle of the current round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Memorizing,
    Scrambling,
    AwaitingInput,
    Won,
    Lost,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Memorizing => "memorizing",
            Phase::Scrambling => "scrambling",
            Phase::AwaitingInput => "awaiting-input",
            Phase::Won => "won",
            Phase::Lost => "lost",
        }
    }
}

/// Uniform position for a `piece`-sized footprint that keeps it inside
/// `viewport`. Each upper bound is clamped at zero, so an undersized
/// viewport pins that axis to 0.
pub fn random_position<R: Rng + ?Sized>(
    rng: &mut R,
    viewport: (f64, f64),
    piece: (f64, f64),
) -> Position {
    let max_x = (viewport.0 - piece.0).max(0.0);
    let max_y = (viewport.1 - piece.1).max(0.0);
    Position {
        x: rng.gen_range(0.0..=max_x),
        y: rng.gen_range(0.0..=max_y),
    }
}

/// Owns one game: its pieces, the round counters and the timer chain.
///
/// Everything runs on the host's single event loop. The host forwards timer
/// expiries to [`run_task`](Self::run_task) and piece clicks to
/// [`handle_button_click`](Self::handle_button_click); both carry the round
/// token they were armed with and are dropped when it no longer matches.
pub struct GameController<S, K, R> {
    surface: S,
    scheduler: K,
    rng: R,
    config: GameConfig,
    messages: Messages,
    pieces: Vec<Piece>,
    round_size: u32,
    expected_order: u32,
    scrambling: bool,
    round: RoundToken,
    phase: Phase,
}

impl<S, K, R> GameController<S, K, R>
where
    S: Surface + StatusLine,
    K: Scheduler,
    R: Rng,
{
    pub fn new(surface: S, scheduler: K, rng: R, config: GameConfig, messages: Messages) -> Self {
        GameController {
            surface,
            scheduler,
            rng,
            config,
            messages,
            pieces: Vec::new(),
            round_size: 0,
            expected_order: 1,
            scrambling: false,
            round: 0,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn round(&self) -> RoundToken {
        self.round
    }

    pub fn round_size(&self) -> u32 {
        self.round_size
    }

    pub fn expected_order(&self) -> u32 {
        self.expected_order
    }

    pub fn is_scrambling(&self) -> bool {
        self.scrambling
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn scheduler(&self) -> &K {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut K {
        &mut self.scheduler
    }

    /// Begin a fresh round of `n` pieces. `n` is expected to be validated
    /// by the input panel already.
    pub fn start_game(&mut self, n: u32) {
        self.reset_game();
        self.round_size = n;
        self.generate_buttons(n);
        self.phase = Phase::Memorizing;
        info!(n, round = self.round, "round started");
        let delay = self.config.memorize_delay_ms(n);
        self.scheduler.schedule(
            delay,
            Task {
                round: self.round,
                kind: TaskKind::BeginScramble,
            },
        );
    }

    /// Drop the current round. Pending tasks and armed click handlers of
    /// the old round become stale.
    pub fn reset_game(&mut self) {
        self.round = self.round.wrapping_add(1);
        self.scheduler.cancel_all();
        self.surface.clear();
        self.pieces.clear();
        self.round_size = 0;
        self.expected_order = 1;
        self.scrambling = false;
        self.phase = Phase::Idle;
    }

    /// Create `n` pieces numbered 1..=n in creation order, each with a
    /// random color, mounted in reading order.
    pub fn generate_buttons(&mut self, n: u32) {
        for i in 0..n {
            let piece = Piece::new(i as PieceId, Color::random(&mut self.rng), i + 1);
            self.surface.mount(&piece);
            self.pieces.push(piece);
        }
    }

    /// Entry point for every timer expiry.
    pub fn run_task(&mut self, task: Task) {
        if task.round != self.round {
            debug!(
                stale = task.round,
                current = self.round,
                kind = ?task.kind,
                "dropped stale task"
            );
            return;
        }
        match task.kind {
            TaskKind::BeginScramble => {
                if self.phase != Phase::Memorizing {
                    return;
                }
                self.scrambling = true;
                self.phase = Phase::Scrambling;
                self.scramble_sequence(self.round_size);
            }
            TaskKind::Scramble { remaining } => {
                if self.phase != Phase::Scrambling {
                    return;
                }
                self.scramble_sequence(remaining);
            }
        }
    }

    /// Run one countdown step: relocate everything and schedule the next
    /// step, or hand over to the player once `remaining` hits zero.
    pub fn scramble_sequence(&mut self, remaining: u32) {
        if remaining == 0 {
            self.prepare_for_user();
            return;
        }
        for i in 0..self.pieces.len() {
            let pos = self.get_random_position();
            let piece = &mut self.pieces[i];
            piece.set_position(pos);
            self.surface.set_position(piece.id(), pos);
        }
        debug!(round = self.round, remaining, "scramble iteration");
        self.scheduler.schedule(
            self.config.scramble_delay_ms(),
            Task {
                round: self.round,
                kind: TaskKind::Scramble {
                    remaining: remaining - 1,
                },
            },
        );
    }

    pub fn get_random_position(&mut self) -> Position {
        let viewport = self.surface.viewport();
        random_position(
            &mut self.rng,
            viewport,
            (self.config.piece_width, self.config.piece_height),
        )
    }

    /// Hide every label and arm every piece for clicking.
    pub fn prepare_for_user(&mut self) {
        self.scrambling = false;
        self.phase = Phase::AwaitingInput;
        for piece in &mut self.pieces {
            piece.set_label_visible(false);
            piece.set_clickable(true);
            self.surface.set_label(piece.id(), None);
            self.surface.set_clickable(piece.id(), self.round, true);
        }
    }

    /// A click on piece `id`, reported by a handler armed during `round`.
    pub fn handle_button_click(&mut self, round: RoundToken, id: PieceId) {
        if self.scrambling || round != self.round || self.phase != Phase::AwaitingInput {
            return;
        }
        let Some(idx) = self.pieces.iter().position(|p| p.id() == id) else {
            return;
        };
        if !self.pieces[idx].is_clickable() {
            return;
        }
        let order = self.pieces[idx].original_order();
        if order == self.expected_order {
            self.reveal(idx);
            self.expected_order += 1;
            if self.expected_order > self.round_size {
                self.phase = Phase::Won;
                info!(round = self.round, "round won");
                self.surface.display_status(&self.messages.win);
            }
        } else {
            info!(
                round = self.round,
                expected = self.expected_order,
                clicked = order,
                "round lost"
            );
            self.phase = Phase::Lost;
            self.surface.display_status(&self.messages.wrong_order);
            self.reveal_all();
        }
    }

    /// Show every label and disarm every piece.
    pub fn reveal_all(&mut self) {
        for idx in 0..self.pieces.len() {
            self.reveal(idx);
        }
    }

    fn reveal(&mut self, idx: usize) {
        let piece = &mut self.pieces[idx];
        piece.set_label_visible(true);
        piece.set_clickable(false);
        let label = piece.label();
        self.surface.set_label(piece.id(), label.as_deref());
        self.surface.set_clickable(piece.id(), self.round, false);
    }
}

impl<S, K, R> StatusLine for GameController<S, K, R>
where
    S: StatusLine,
{
    fn display_status(&mut self, message: &str) {
        self.surface.display_status(message);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::constants::{MAX_PIECES, MIN_PIECES, PIECE_HEIGHT, PIECE_WIDTH};
    use crate::panel::InputPanel;

    const UNIT: u64 = 1000;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Element {
        label: Option<String>,
        color: String,
        pos: Option<Position>,
        armed: Option<RoundToken>,
    }

    #[derive(Default)]
    struct FakeSurface {
        viewport: (f64, f64),
        elements: BTreeMap<PieceId, Element>,
        moves: usize,
        status: Vec<String>,
    }

    impl Surface for FakeSurface {
        fn viewport(&self) -> (f64, f64) {
            self.viewport
        }

        fn mount(&mut self, piece: &Piece) {
            self.elements.insert(
                piece.id(),
                Element {
                    label: piece.label(),
                    color: piece.color().to_string(),
                    ..Element::default()
                },
            );
        }

        fn set_position(&mut self, id: PieceId, pos: Position) {
            self.moves += 1;
            self.elements.get_mut(&id).unwrap().pos = Some(pos);
        }

        fn set_label(&mut self, id: PieceId, label: Option<&str>) {
            self.elements.get_mut(&id).unwrap().label = label.map(str::to_string);
        }

        fn set_clickable(&mut self, id: PieceId, round: RoundToken, enabled: bool) {
            self.elements.get_mut(&id).unwrap().armed = enabled.then_some(round);
        }

        fn clear(&mut self) {
            self.elements.clear();
        }
    }

    impl StatusLine for FakeSurface {
        fn display_status(&mut self, message: &str) {
            self.status.push(message.to_string());
        }
    }

    /// Virtual clock. With `honor_cancel` off, cancelled timers still fire,
    /// like a browser timeout that was already queued.
    #[derive(Default)]
    struct FakeScheduler {
        now: u64,
        pending: Vec<(u64, Task)>,
        honor_cancel: bool,
    }

    impl Scheduler for FakeScheduler {
        fn schedule(&mut self, delay_ms: u32, task: Task) {
            self.pending.push((self.now + delay_ms as u64, task));
        }

        fn cancel_all(&mut self) {
            if self.honor_cancel {
                self.pending.clear();
            }
        }
    }

    type Game = GameController<FakeSurface, FakeScheduler, SmallRng>;

    fn game_with(viewport: (f64, f64), honor_cancel: bool) -> Game {
        let surface = FakeSurface {
            viewport,
            ..FakeSurface::default()
        };
        let scheduler = FakeScheduler {
            honor_cancel,
            ..FakeScheduler::default()
        };
        GameController::new(
            surface,
            scheduler,
            SmallRng::seed_from_u64(42),
            GameConfig::default(),
            Messages::default(),
        )
    }

    fn game() -> Game {
        game_with((1024.0, 768.0), true)
    }

    /// Fire every task due within the next `ms`, in due order.
    fn advance(g: &mut Game, ms: u64) {
        let target = g.scheduler().now + ms;
        loop {
            let next = g
                .scheduler()
                .pending
                .iter()
                .enumerate()
                .filter(|(_, (due, _))| *due <= target)
                .min_by_key(|(_, (due, _))| *due)
                .map(|(i, _)| i);
            let Some(i) = next else { break };
            let (due, task) = g.scheduler_mut().pending.remove(i);
            g.scheduler_mut().now = due;
            g.run_task(task);
        }
        g.scheduler_mut().now = target;
    }

    fn to_input(g: &mut Game) {
        let n = g.round_size() as u64;
        advance(g, n * UNIT + 2 * n * UNIT);
        assert_eq!(g.phase(), Phase::AwaitingInput);
    }

    fn click_order(g: &mut Game, order: u32) {
        let id = g
            .pieces()
            .iter()
            .find(|p| p.original_order() == order)
            .unwrap()
            .id();
        let round = g.round();
        g.handle_button_click(round, id);
    }

    fn labels(g: &Game) -> Vec<Option<String>> {
        g.surface().elements.values().map(|e| e.label.clone()).collect()
    }

    #[test]
    fn start_game_builds_permutation_of_orders() {
        for n in MIN_PIECES..=MAX_PIECES {
            let mut g = game();
            g.start_game(n);
            let mut orders: Vec<u32> = g.pieces().iter().map(|p| p.original_order()).collect();
            orders.sort_unstable();
            assert_eq!(orders, (1..=n).collect::<Vec<_>>());
            assert_eq!(g.surface().elements.len(), n as usize);
            assert_eq!(g.phase(), Phase::Memorizing);
            assert!(g.pieces().iter().all(|p| p.position().is_none()));
        }
    }

    #[test]
    fn pieces_are_numbered_in_creation_order_with_visible_labels() {
        let mut g = game();
        g.start_game(4);
        let orders: Vec<u32> = g.pieces().iter().map(|p| p.original_order()).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
        assert_eq!(
            labels(&g),
            vec![
                Some("1".to_string()),
                Some("2".to_string()),
                Some("3".to_string()),
                Some("4".to_string())
            ]
        );
        assert!(
            g.surface()
                .elements
                .values()
                .all(|e| e.color.starts_with("rgb("))
        );
    }

    #[test]
    fn scramble_runs_exactly_n_iterations() {
        for n in MIN_PIECES..=MAX_PIECES {
            let mut g = game();
            g.start_game(n);
            let n64 = n as u64;

            advance(&mut g, n64 * UNIT - 1);
            assert_eq!(g.phase(), Phase::Memorizing);
            assert_eq!(g.surface().moves, 0);

            advance(&mut g, 1);
            assert_eq!(g.phase(), Phase::Scrambling);
            assert!(g.is_scrambling());

            advance(&mut g, 2 * n64 * UNIT - 1);
            assert_eq!(g.phase(), Phase::Scrambling);

            advance(&mut g, 1);
            assert_eq!(g.phase(), Phase::AwaitingInput);
            assert!(!g.is_scrambling());
            assert_eq!(g.surface().moves, (n * n) as usize);
            assert!(g.scheduler().pending.is_empty());
        }
    }

    #[test]
    fn awaiting_input_hides_labels_and_arms_every_piece() {
        let mut g = game();
        g.start_game(3);
        to_input(&mut g);
        let round = g.round();
        assert!(labels(&g).iter().all(Option::is_none));
        assert!(
            g.surface()
                .elements
                .values()
                .all(|e| e.armed == Some(round))
        );
        assert!(g.pieces().iter().all(|p| p.position().is_some()));
    }

    #[test]
    fn positions_stay_inside_viewport() {
        let mut g = game_with((800.0, 600.0), true);
        for _ in 0..500 {
            let p = g.get_random_position();
            assert!(p.x >= 0.0 && p.x <= 800.0 - PIECE_WIDTH);
            assert!(p.y >= 0.0 && p.y <= 600.0 - PIECE_HEIGHT);
        }
    }

    #[test]
    fn positions_clamp_to_zero_in_tiny_viewport() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..50 {
            let p = random_position(&mut rng, (100.0, 40.0), (PIECE_WIDTH, PIECE_HEIGHT));
            assert_eq!(p, Position { x: 0.0, y: 0.0 });
        }
        for _ in 0..50 {
            let p = random_position(&mut rng, (500.0, 40.0), (PIECE_WIDTH, PIECE_HEIGHT));
            assert!(p.x <= 340.0);
            assert_eq!(p.y, 0.0);
        }
    }

    #[test]
    fn clicking_in_order_wins() {
        let mut g = game();
        g.start_game(3);
        to_input(&mut g);

        for order in 1..=3 {
            click_order(&mut g, order);
            let piece = g
                .pieces()
                .iter()
                .find(|p| p.original_order() == order)
                .unwrap();
            assert!(piece.is_label_visible());
            assert!(!piece.is_clickable());
            assert_eq!(
                g.surface().elements[&piece.id()].label.as_deref(),
                Some(order.to_string().as_str())
            );
            assert_eq!(g.surface().elements[&piece.id()].armed, None);
            assert_eq!(g.expected_order(), order + 1);
        }

        assert_eq!(g.phase(), Phase::Won);
        assert_eq!(g.surface().status, vec![Messages::default().win]);
    }

    #[test]
    fn wrong_click_reveals_everything_and_ends_round() {
        let mut g = game();
        g.start_game(3);
        to_input(&mut g);

        click_order(&mut g, 2);
        assert_eq!(g.phase(), Phase::Lost);
        assert_eq!(
            labels(&g),
            vec![
                Some("1".to_string()),
                Some("2".to_string()),
                Some("3".to_string())
            ]
        );
        assert!(g.pieces().iter().all(|p| !p.is_clickable()));
        assert!(g.surface().elements.values().all(|e| e.armed.is_none()));
        assert_eq!(g.surface().status, vec![Messages::default().wrong_order]);

        click_order(&mut g, 1);
        assert_eq!(g.expected_order(), 1);
        assert_eq!(g.surface().status.len(), 1);
    }

    #[test]
    fn repeat_click_on_solved_piece_is_ignored() {
        let mut g = game();
        g.start_game(4);
        to_input(&mut g);

        click_order(&mut g, 1);
        click_order(&mut g, 1);
        assert_eq!(g.expected_order(), 2);
        assert_eq!(g.phase(), Phase::AwaitingInput);
        assert!(g.surface().status.is_empty());
        let hidden = g.pieces().iter().filter(|p| !p.is_label_visible()).count();
        assert_eq!(hidden, 3);

        click_order(&mut g, 2);
        assert_eq!(g.expected_order(), 3);
    }

    #[test]
    fn wrong_click_after_progress_still_loses() {
        let mut g = game();
        g.start_game(5);
        to_input(&mut g);
        click_order(&mut g, 1);
        click_order(&mut g, 2);
        click_order(&mut g, 4);
        assert_eq!(g.phase(), Phase::Lost);
        assert_eq!(g.expected_order(), 3);
        assert!(g.pieces().iter().all(|p| p.is_label_visible()));
    }

    #[test]
    fn clicks_before_input_phase_are_ignored() {
        let mut g = game();
        g.start_game(3);
        let round = g.round();

        g.handle_button_click(round, 0);
        assert_eq!(g.expected_order(), 1);

        advance(&mut g, 3 * UNIT);
        assert!(g.is_scrambling());
        let before = g.pieces().to_vec();
        for id in 0..3 {
            g.handle_button_click(round, id);
        }
        assert_eq!(g.pieces(), before.as_slice());
        assert_eq!(g.expected_order(), 1);
        assert!(g.surface().status.is_empty());
    }

    #[test]
    fn stale_timers_do_not_touch_the_next_round() {
        let mut g = game_with((1024.0, 768.0), false);
        g.start_game(3);
        advance(&mut g, 4 * UNIT);
        assert_eq!(g.phase(), Phase::Scrambling);
        assert!(!g.scheduler().pending.is_empty());

        g.start_game(5);
        let moves_at_restart = g.surface().moves;

        // old chain keeps firing, the new round is still memorizing
        advance(&mut g, 5 * UNIT - 1);
        assert_eq!(g.phase(), Phase::Memorizing);
        assert_eq!(g.surface().moves, moves_at_restart);
        assert!(g.pieces().iter().all(|p| p.position().is_none()));
        assert!(labels(&g).iter().all(Option::is_some));

        advance(&mut g, 1);
        assert_eq!(g.phase(), Phase::Scrambling);
        advance(&mut g, 10 * UNIT);
        assert_eq!(g.phase(), Phase::AwaitingInput);
        assert_eq!(g.surface().moves, moves_at_restart + 25);
    }

    #[test]
    fn stale_click_handlers_are_ignored() {
        let mut g = game();
        g.start_game(3);
        to_input(&mut g);
        let old_round = g.round();

        g.start_game(3);
        to_input(&mut g);
        g.handle_button_click(old_round, 1);
        assert_eq!(g.phase(), Phase::AwaitingInput);
        assert_eq!(g.expected_order(), 1);
        assert!(g.surface().status.is_empty());
    }

    #[test]
    fn restart_after_win_starts_clean() {
        let mut g = game();
        g.start_game(3);
        to_input(&mut g);
        for order in 1..=3 {
            click_order(&mut g, order);
        }
        assert_eq!(g.phase(), Phase::Won);

        g.start_game(4);
        assert_eq!(g.phase(), Phase::Memorizing);
        assert_eq!(g.expected_order(), 1);
        assert_eq!(g.pieces().len(), 4);
        assert_eq!(g.surface().elements.len(), 4);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut g = game();
        g.start_game(4);
        g.reset_game();
        g.reset_game();
        assert_eq!(g.phase(), Phase::Idle);
        assert!(g.pieces().is_empty());
        assert!(g.surface().elements.is_empty());
        assert_eq!(g.expected_order(), 1);
        assert!(!g.is_scrambling());
        assert!(g.scheduler().pending.is_empty());
    }

    #[test]
    fn panel_drives_controller_end_to_end() {
        let panel = InputPanel::default();
        let mut g = game();

        assert!(panel.activate("9", &mut g, |g, n| g.start_game(n)).is_err());
        assert_eq!(g.phase(), Phase::Idle);
        assert_eq!(
            g.surface().status.last(),
            Some(&Messages::default().invalid_input)
        );

        panel
            .activate("3", &mut g, |g, n| g.start_game(n))
            .unwrap();
        assert_eq!(g.phase(), Phase::Memorizing);
        assert_eq!(g.surface().status.last(), Some(&String::new()));

        advance(&mut g, 3 * UNIT);
        assert_eq!(g.phase(), Phase::Scrambling);
        advance(&mut g, 6 * UNIT);
        assert_eq!(g.phase(), Phase::AwaitingInput);
        for order in 1..=3 {
            click_order(&mut g, order);
        }
        assert_eq!(g.surface().status.last(), Some(&Messages::default().win));
        assert!(
            !g.surface()
                .status
                .contains(&Messages::default().wrong_order)
        );
    }
}
