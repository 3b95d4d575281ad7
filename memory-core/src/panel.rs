use thiserror::Error;

use crate::constants::{MAX_PIECES, MIN_PIECES};
use crate::messages::Messages;
use crate::surface::StatusLine;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundSizeError {
    #[error("`{0}` is not a whole number")]
    NotANumber(String),
    #[error("{0} is outside {min}..={max}", min = MIN_PIECES, max = MAX_PIECES)]
    OutOfRange(i64),
}

/// Parse the raw text of the numeric input into a round size.
pub fn parse_round_size(raw: &str) -> Result<u32, RoundSizeError> {
    let s = raw.trim();
    let v: i64 = s
        .parse()
        .map_err(|_| RoundSizeError::NotANumber(s.to_string()))?;
    if v < MIN_PIECES as i64 || v > MAX_PIECES as i64 {
        return Err(RoundSizeError::OutOfRange(v));
    }
    Ok(v as u32)
}

/// Validation half of the input panel; the host renders the widgets and
/// calls [`InputPanel::activate`] whenever the start control fires.
#[derive(Clone, Debug, Default)]
pub struct InputPanel {
    messages: Messages,
}

impl InputPanel {
    pub fn new(messages: Messages) -> Self {
        InputPanel { messages }
    }

    /// Validate `raw`. On success the status is cleared and `on_start` runs
    /// with the round size; otherwise only the invalid-input message shows.
    pub fn activate<T, F>(
        &self,
        raw: &str,
        target: &mut T,
        on_start: F,
    ) -> Result<(), RoundSizeError>
    where
        T: StatusLine + ?Sized,
        F: FnOnce(&mut T, u32),
    {
        match parse_round_size(raw) {
            Ok(n) => {
                target.display_status("");
                on_start(target, n);
                Ok(())
            }
            Err(e) => {
                tracing::debug!(input = raw, error = %e, "rejected round size");
                target.display_status(&self.messages.invalid_input);
                Err(e)
            }
        }
    }
}
