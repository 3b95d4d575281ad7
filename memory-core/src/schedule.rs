/// Generation counter of a round. Bumped by every `start_game`, carried by
/// every deferred task and click handler so stale ones can be dropped.
pub type RoundToken = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    /// End of the memorization window.
    BeginScramble,
    /// One scramble iteration; `remaining` counts this one.
    Scramble { remaining: u32 },
}

/// A deferred step of the round's timer chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Task {
    pub round: RoundToken,
    pub kind: TaskKind,
}

/// One-shot timer service. The host calls
/// [`GameController::run_task`](crate::GameController::run_task) with the
/// task once `delay_ms` has elapsed.
pub trait Scheduler {
    fn schedule(&mut self, delay_ms: u32, task: Task);
    /// Forget every pending task. Best effort; the round token check in the
    /// controller still applies to anything that fires anyway.
    fn cancel_all(&mut self);
}
