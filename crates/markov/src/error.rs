//! Error types for the stepwise-markov crate.

/// Error type for all fallible operations in the stepwise-markov crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarkovError {
    /// Returned when an argument is structurally unusable.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a queried state is not part of the state list.
    #[error("state {state} not found")]
    StateNotFound {
        /// Debug rendering of the missing state.
        state: String,
    },

    /// Returned when an observation contains a value missing from an explicit state list.
    #[error("observed state {state} (sequence {sequence}, position {position}) is not in the state list")]
    UnknownObservedState {
        /// Debug rendering of the unknown value.
        state: String,
        /// Index of the observation sequence.
        sequence: usize,
        /// Position within that sequence.
        position: usize,
    },

    /// Returned when a transition probability is non-finite or outside `[0, 1]`.
    #[error("invalid probability at [{row}][{col}]: {value}")]
    InvalidProbability {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// The invalid value.
        value: f64,
    },

    /// Returned when a row sums to neither ~1.0 nor exactly 0.0.
    #[error("row {row} sums to {sum}, expected ~1.0 or 0.0")]
    RowSumMismatch {
        /// Row index.
        row: usize,
        /// Actual row sum.
        sum: f64,
    },

    /// Returned when a model is queried before `build`.
    #[error("model has not been built")]
    NotBuilt,
}

impl MarkovError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(state: &impl std::fmt::Debug) -> Self {
        Self::StateNotFound {
            state: format!("{state:?}"),
        }
    }
}
