//! Execution state for the result materializer.
//!
//! One command walks through these states exactly once:
//!
//! ```text
//! Idle -> ResultsPending (command submitted)
//! ResultsPending -> RowsPending (engine reports another result set)
//! RowsPending -> ResultsPending (no more rows in the current set)
//! ResultsPending -> AllDone (no more results, or failure)
//! RowsPending -> AllDone (row failure)
//! ```
//!
//! `AllDone` is terminal. A failure on the way there is recorded next to the
//! state, not as a separate state, so tables gathered earlier survive.

/// Where the materializer is in one command's result stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecState {
    /// No command submitted.
    #[default]
    Idle,
    /// Waiting for the engine to report the next result set.
    ResultsPending,
    /// Reading rows of the current result set.
    RowsPending,
    /// Every result set has been consumed.
    AllDone,
}

impl ExecState {
    /// Check whether `next` is a legal successor of `self`.
    #[must_use]
    pub fn can_transition_to(self, next: ExecState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::ResultsPending)
                | (Self::ResultsPending, Self::RowsPending)
                | (Self::ResultsPending, Self::AllDone)
                | (Self::RowsPending, Self::ResultsPending)
                | (Self::RowsPending, Self::AllDone)
        )
    }

    /// Check if this is the terminal state.
    #[must_use]
    pub fn is_done(self) -> bool {
        self == Self::AllDone
    }
}

impl std::fmt::Display for ExecState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ResultsPending => "results pending",
            Self::RowsPending => "rows pending",
            Self::AllDone => "all done",
        };
        f.write_str(name)
    }
}
