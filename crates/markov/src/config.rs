//! Configuration for transition model construction.

use crate::error::MarkovError;

/// How `build` treats observed values that are missing from an explicit state list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownStatePolicy {
    /// Fail with [`MarkovError::UnknownObservedState`].
    #[default]
    Reject,
    /// Drop every transition that touches the unknown value.
    Skip,
}

/// Configuration for a [`MarkovModel`](crate::MarkovModel).
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use stepwise_markov::{ModelConfig, UnknownStatePolicy};
///
/// let config = ModelConfig::new()
///     .with_unknown_state(UnknownStatePolicy::Skip)
///     .with_row_tolerance(1e-6);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ModelConfig {
    unknown_state: UnknownStatePolicy,
    row_tolerance: f64,
}

impl ModelConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `unknown_state = Reject`, `row_tolerance = 1e-9`.
    pub fn new() -> Self {
        Self {
            unknown_state: UnknownStatePolicy::Reject,
            row_tolerance: 1e-9,
        }
    }

    /// Sets the policy for observed values missing from an explicit state list.
    pub fn with_unknown_state(mut self, policy: UnknownStatePolicy) -> Self {
        self.unknown_state = policy;
        self
    }

    /// Sets the tolerance used when checking that restored rows sum to 1.
    pub fn with_row_tolerance(mut self, tolerance: f64) -> Self {
        self.row_tolerance = tolerance;
        self
    }

    /// Returns the unknown-state policy.
    pub fn unknown_state(&self) -> UnknownStatePolicy {
        self.unknown_state
    }

    /// Returns the row-sum tolerance.
    pub fn row_tolerance(&self) -> f64 {
        self.row_tolerance
    }

    /// Validates this configuration.
    ///
    /// The row tolerance must be finite and positive.
    pub fn validate(&self) -> Result<(), MarkovError> {
        if !self.row_tolerance.is_finite() || self.row_tolerance <= 0.0 {
            return Err(MarkovError::invalid(format!(
                "row_tolerance must be finite and positive, got {}",
                self.row_tolerance
            )));
        }
        Ok(())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::new()
    }
}
