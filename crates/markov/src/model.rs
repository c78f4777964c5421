//! The transition model: fit a chain from observations, then sample successors.

use rand::Rng;
use tracing::{debug, warn};

use crate::config::{ModelConfig, UnknownStatePolicy};
use crate::error::MarkovError;
use crate::state::{State, StateSpace};
use crate::transition::{TransitionMatrix, count_transitions};

#[derive(Debug, Clone)]
struct Fitted<S: State> {
    space: StateSpace<S>,
    chain: TransitionMatrix,
    observations: Vec<Vec<S>>,
}

/// First-order Markov chain over states of type `S`.
///
/// A freshly constructed model is unbuilt: it has no states, no chain, and
/// no observations, and every query fails with [`MarkovError::NotBuilt`].
/// [`build`](Self::build) populates all three at once; calling it again
/// replaces them.
///
/// The model is read-only after `build`, so a shared `&MarkovModel` can be
/// sampled from several threads as long as each brings its own RNG.
#[derive(Debug, Clone)]
pub struct MarkovModel<S: State> {
    config: ModelConfig,
    fitted: Option<Fitted<S>>,
}

impl<S: State> MarkovModel<S> {
    /// Creates an unbuilt model with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ModelConfig::new())
    }

    /// Creates an unbuilt model with the given configuration.
    pub fn with_config(config: ModelConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }

    /// Restores a built model from previously computed parts.
    ///
    /// `chain` must be `states.len()` rows of `states.len()` probabilities,
    /// each row summing to 1 (within the configured tolerance) or to exactly 0.
    /// Under [`UnknownStatePolicy::Reject`], every value in `observations`
    /// must also be one of `states`.
    ///
    /// # Errors
    ///
    /// - [`MarkovError::InvalidArgument`] for duplicate states, a mis-shaped
    ///   chain, or an invalid config.
    /// - [`MarkovError::InvalidProbability`] / [`MarkovError::RowSumMismatch`]
    ///   for bad chain values.
    /// - [`MarkovError::UnknownObservedState`] for an observed value outside
    ///   `states` when the config rejects unknown states.
    pub fn from_parts(
        states: Vec<S>,
        chain: Vec<Vec<f64>>,
        observations: Vec<Vec<S>>,
        config: ModelConfig,
    ) -> Result<Self, MarkovError> {
        config.validate()?;
        let space = StateSpace::from_explicit(states)?;
        let chain = TransitionMatrix::from_rows(chain)?;
        if chain.size() != space.len() {
            return Err(MarkovError::invalid(format!(
                "chain is {0}x{0} but there are {1} states",
                chain.size(),
                space.len()
            )));
        }
        chain.validate(config.row_tolerance())?;
        if config.unknown_state() == UnknownStatePolicy::Reject {
            check_observed(&observations, &space)?;
        }
        debug!(n_states = space.len(), "restored transition model");

        Ok(Self {
            config,
            fitted: Some(Fitted {
                space,
                chain,
                observations,
            }),
        })
    }

    /// Fits the chain from `observations`.
    ///
    /// Without `states`, the state list is every distinct observed value in
    /// first-occurrence order. With `states`, that list is used verbatim and
    /// must be duplicate-free. Each adjacent pair within a sequence counts as
    /// one transition; each row is then divided by its out-degree. Rows with
    /// no outgoing transitions stay all zeros.
    ///
    /// On error the model is left exactly as it was. The row tolerance of the
    /// config is not consulted here; it only applies to
    /// [`from_parts`](Self::from_parts).
    ///
    /// # Errors
    ///
    /// - [`MarkovError::InvalidArgument`] if `states` has duplicates.
    /// - [`MarkovError::UnknownObservedState`] if an observed value is not in
    ///   `states` and the config rejects unknown states.
    #[tracing::instrument(skip_all, fields(n_sequences = observations.len(), explicit_states = states.is_some()))]
    pub fn build(
        &mut self,
        observations: Vec<Vec<S>>,
        states: Option<Vec<S>>,
    ) -> Result<&mut Self, MarkovError> {
        let space = match states {
            Some(states) => StateSpace::from_explicit(states)?,
            None => StateSpace::from_observations(&observations),
        };
        let counts = count_transitions(&observations, &space, self.config.unknown_state())?;
        if counts.skipped() > 0 {
            warn!(
                skipped = counts.skipped(),
                "dropped transitions touching states outside the state list"
            );
        }
        let chain = TransitionMatrix::from_counts(&counts);
        debug!(
            n_states = space.len(),
            n_transitions = counts.total(),
            "built transition model"
        );

        self.fitted = Some(Fitted {
            space,
            chain,
            observations,
        });
        Ok(self)
    }

    /// Samples a successor of `state`.
    ///
    /// A state with no observed outgoing transitions always yields the last
    /// state in the list. Successors with zero probability are never drawn:
    /// if rounding leaves a row's cumulative sum short of the uniform draw,
    /// the last state with non-zero probability is returned rather than the
    /// last state in the list.
    ///
    /// # Errors
    ///
    /// - [`MarkovError::NotBuilt`] before `build`.
    /// - [`MarkovError::StateNotFound`] if `state` is not in the state list.
    pub fn next(&self, state: &S, rng: &mut impl Rng) -> Result<S, MarkovError> {
        let fitted = self.fitted()?;
        let from = fitted.index(state)?;
        let to = fitted.chain.sample_row(from, rng.random());
        Ok(fitted.space.as_slice()[to].clone())
    }

    /// Samples a successor of `state` using the thread-local generator.
    pub fn next_random(&self, state: &S) -> Result<S, MarkovError> {
        self.next(state, &mut rand::rng())
    }

    /// Returns the probability of moving from `from` to `to`.
    pub fn probability(&self, from: &S, to: &S) -> Result<f64, MarkovError> {
        let fitted = self.fitted()?;
        Ok(fitted.chain.prob(fitted.index(from)?, fitted.index(to)?))
    }

    /// Returns the successors of `state` with non-zero probability, in state order.
    pub fn successors(&self, state: &S) -> Result<Vec<(&S, f64)>, MarkovError> {
        let fitted = self.fitted()?;
        let row = fitted.chain.row(fitted.index(state)?);
        Ok(fitted
            .space
            .as_slice()
            .iter()
            .zip(row)
            .filter(|&(_, &p)| p > 0.0)
            .map(|(s, &p)| (s, p))
            .collect())
    }

    /// Returns `true` once `build` (or `from_parts`) has populated the model.
    pub fn is_built(&self) -> bool {
        self.fitted.is_some()
    }

    /// The ordered state list; empty before `build`.
    pub fn states(&self) -> &[S] {
        self.fitted
            .as_ref()
            .map(|f| f.space.as_slice())
            .unwrap_or_default()
    }

    /// The transition matrix, if built.
    pub fn chain(&self) -> Option<&TransitionMatrix> {
        self.fitted.as_ref().map(|f| &f.chain)
    }

    /// The observations last passed to `build`; empty before `build`.
    pub fn observations(&self) -> &[Vec<S>] {
        self.fitted
            .as_ref()
            .map(|f| f.observations.as_slice())
            .unwrap_or_default()
    }

    /// The state space, if built.
    pub fn state_space(&self) -> Option<&StateSpace<S>> {
        self.fitted.as_ref().map(|f| &f.space)
    }

    /// Position of `state` in the state list.
    pub fn index_of(&self, state: &S) -> Option<usize> {
        self.fitted.as_ref()?.space.index_of(state)
    }

    /// The model configuration.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub(crate) fn require_index(&self, state: &S) -> Result<usize, MarkovError> {
        self.fitted()?.index(state)
    }

    fn fitted(&self) -> Result<&Fitted<S>, MarkovError> {
        self.fitted.as_ref().ok_or(MarkovError::NotBuilt)
    }
}

fn check_observed<S: State>(
    observations: &[Vec<S>],
    space: &StateSpace<S>,
) -> Result<(), MarkovError> {
    for (sequence, observed) in observations.iter().enumerate() {
        if let Some(position) = observed.iter().position(|s| !space.contains(s)) {
            return Err(MarkovError::UnknownObservedState {
                state: format!("{:?}", observed[position]),
                sequence,
                position,
            });
        }
    }
    Ok(())
}

impl<S: State> Fitted<S> {
    fn index(&self, state: &S) -> Result<usize, MarkovError> {
        self.space
            .index_of(state)
            .ok_or_else(|| MarkovError::not_found(state))
    }
}

impl<S: State> Default for MarkovModel<S> {
    fn default() -> Self {
        Self::new()
    }
}
