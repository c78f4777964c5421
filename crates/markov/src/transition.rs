//! Transition counting, normalization, and the square probability matrix.

use crate::config::UnknownStatePolicy;
use crate::error::MarkovError;
use crate::state::{State, StateSpace};

/// An N×N transition matrix stored row-major.
///
/// Cell `(i, j)` is the probability of moving from state `i` to state `j`.
/// Rows with observed outgoing transitions sum to 1.0; rows without any are
/// all zeros (degenerate).
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    size: usize,
    probs: Vec<f64>,
}

impl TransitionMatrix {
    /// Allocates an `n`×`n` matrix of zeros.
    pub fn zeros(n: usize) -> Self {
        Self {
            size: n,
            probs: vec![0.0; n * n],
        }
    }

    /// Constructs a matrix from nested rows.
    ///
    /// Only the shape is checked here; call [`validate`](Self::validate) to
    /// check the probabilities themselves.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidArgument`] if any row length differs from
    /// the number of rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MarkovError> {
        let size = rows.len();
        let mut probs = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(MarkovError::invalid(format!(
                    "chain row {i} has {} columns, expected {size}",
                    row.len()
                )));
            }
            probs.extend(row);
        }
        Ok(Self { size, probs })
    }

    /// Normalizes raw transition counts into probabilities.
    ///
    /// Each row is divided by its out-degree. Rows with an out-degree of zero
    /// are left as zeros.
    pub fn from_counts(counts: &TransitionCounts) -> Self {
        let n = counts.size;
        let mut matrix = Self::zeros(n);
        for from in 0..n {
            let total = counts.out_degree[from];
            if total == 0 {
                continue;
            }
            let total = total as f64;
            for to in 0..n {
                matrix.probs[from * n + to] = counts.counts[from * n + to] as f64 / total;
            }
        }
        matrix
    }

    /// Number of states (rows and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the outgoing probabilities of state `from`.
    ///
    /// # Panics
    ///
    /// Panics if `from >= self.size()`.
    pub fn row(&self, from: usize) -> &[f64] {
        assert!(
            from < self.size,
            "row index {from} out of range for size {}",
            self.size
        );
        &self.probs[from * self.size..(from + 1) * self.size]
    }

    /// Returns the probability of moving from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn prob(&self, from: usize, to: usize) -> f64 {
        self.row(from)[to]
    }

    /// Iterates over the rows in state order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.probs.chunks(self.size.max(1))
    }

    /// Copies the matrix into nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    /// Sum of row `from`.
    pub fn row_sum(&self, from: usize) -> f64 {
        self.row(from).iter().sum()
    }

    /// Returns `true` if row `from` has no outgoing probability mass.
    pub fn is_degenerate(&self, from: usize) -> bool {
        self.row(from).iter().all(|&p| p == 0.0)
    }

    /// Validates that every cell is a probability and every row sums to
    /// ~1.0 (within `tolerance`) or exactly 0.0.
    pub fn validate(&self, tolerance: f64) -> Result<(), MarkovError> {
        for (i, row) in self.rows().enumerate() {
            let mut sum = 0.0;
            for (j, &p) in row.iter().enumerate() {
                if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                    return Err(MarkovError::InvalidProbability {
                        row: i,
                        col: j,
                        value: p,
                    });
                }
                sum += p;
            }
            if sum != 0.0 && (sum - 1.0).abs() > tolerance {
                return Err(MarkovError::RowSumMismatch { row: i, sum });
            }
        }
        Ok(())
    }

    /// Picks a successor column of `from` for the uniform draw `u` in `[0, 1)`.
    ///
    /// Walks the row's cumulative distribution and returns the first non-zero
    /// column whose cumulative probability meets or exceeds `u`. If rounding
    /// leaves the walk short of `u`, the last non-zero column is returned. A
    /// degenerate row always yields the last column.
    ///
    /// # Panics
    ///
    /// Panics if `from >= self.size()`.
    pub fn sample_row(&self, from: usize, u: f64) -> usize {
        let row = self.row(from);
        let mut cumulative = 0.0;
        let mut last_nonzero = None;
        for (to, &p) in row.iter().enumerate() {
            if p <= 0.0 {
                continue;
            }
            cumulative += p;
            last_nonzero = Some(to);
            if cumulative >= u {
                return to;
            }
        }
        last_nonzero.unwrap_or(self.size - 1)
    }
}

/// Raw transition tallies collected from observation sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionCounts {
    size: usize,
    counts: Vec<u64>,
    out_degree: Vec<u64>,
    skipped: u64,
}

impl TransitionCounts {
    /// Number of states.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of observed `from -> to` transitions.
    pub fn count(&self, from: usize, to: usize) -> u64 {
        self.counts[from * self.size + to]
    }

    /// Number of observed transitions leaving `from`.
    pub fn out_degree(&self, from: usize) -> u64 {
        self.out_degree[from]
    }

    /// Total number of counted transitions.
    pub fn total(&self) -> u64 {
        self.out_degree.iter().sum()
    }

    /// Number of transitions dropped because they touched an unknown value.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

/// Tallies every adjacent pair of every observation sequence.
///
/// Sequences shorter than two contribute no transitions.
///
/// # Errors
///
/// With [`UnknownStatePolicy::Reject`], returns
/// [`MarkovError::UnknownObservedState`] for the first observed value that is
/// not part of `space`.
pub fn count_transitions<S: State>(
    observations: &[Vec<S>],
    space: &StateSpace<S>,
    policy: UnknownStatePolicy,
) -> Result<TransitionCounts, MarkovError> {
    let n = space.len();
    let mut counts = vec![0u64; n * n];
    let mut out_degree = vec![0u64; n];
    let mut skipped = 0u64;

    for (sequence, observed) in observations.iter().enumerate() {
        let mut prev = None;
        for (position, value) in observed.iter().enumerate() {
            let curr = match (space.index_of(value), policy) {
                (Some(i), _) => Some(i),
                (None, UnknownStatePolicy::Skip) => None,
                (None, UnknownStatePolicy::Reject) => {
                    return Err(MarkovError::UnknownObservedState {
                        state: format!("{value:?}"),
                        sequence,
                        position,
                    });
                }
            };
            if position > 0 {
                match (prev, curr) {
                    (Some(from), Some(to)) => {
                        counts[from * n + to] += 1;
                        out_degree[from] += 1;
                    }
                    _ => skipped += 1,
                }
            }
            prev = curr;
        }
    }

    Ok(TransitionCounts {
        size: n,
        counts,
        out_degree,
        skipped,
    })
}
