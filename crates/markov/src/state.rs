//! State labels and the ordered state space of a chain.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::MarkovError;

/// A label for one node of the chain.
///
/// States are compared by value only. Any `Clone + Eq + Hash + Debug` type
/// qualifies: strings, integers, or a caller-defined enum.
pub trait State: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> State for T {}

/// Returns the distinct values of `items` in first-occurrence order.
pub fn unique_in_order<S: State>(items: impl IntoIterator<Item = S>) -> Vec<S> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(item.clone()) {
            out.push(item);
        }
    }
    out
}

/// Ordered, duplicate-free list of states.
///
/// Position in the list is the row/column index into the transition matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSpace<S: State> {
    states: Vec<S>,
    index: HashMap<S, usize>,
}

impl<S: State> StateSpace<S> {
    /// Derives the state space from observations, in first-occurrence order
    /// across the flattened sequences.
    pub fn from_observations(observations: &[Vec<S>]) -> Self {
        let states = unique_in_order(observations.iter().flatten().cloned());
        let index = states
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        Self { states, index }
    }

    /// Uses a caller-supplied list verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidArgument`] if `states` contains a duplicate.
    pub fn from_explicit(states: Vec<S>) -> Result<Self, MarkovError> {
        let mut index = HashMap::with_capacity(states.len());
        for (i, s) in states.iter().enumerate() {
            match index.entry(s.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(i);
                }
                Entry::Occupied(first) => {
                    return Err(MarkovError::invalid(format!(
                        "duplicate state {s:?} at positions {} and {i}",
                        first.get()
                    )));
                }
            }
        }
        Ok(Self { states, index })
    }

    /// Returns the position of `state`, if present.
    pub fn index_of(&self, state: &S) -> Option<usize> {
        self.index.get(state).copied()
    }

    /// Returns `true` if `state` is part of this space.
    pub fn contains(&self, state: &S) -> bool {
        self.index.contains_key(state)
    }

    /// Returns the state at position `i`.
    pub fn get(&self, i: usize) -> Option<&S> {
        self.states.get(i)
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if there are no states.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns the states in index order.
    pub fn as_slice(&self) -> &[S] {
        &self.states
    }
}

impl<S: State> Default for StateSpace<S> {
    fn default() -> Self {
        Self {
            states: Vec::new(),
            index: HashMap::new(),
        }
    }
}
