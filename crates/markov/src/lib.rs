//! First-order Markov chain fitted from observed state sequences.
//!
//! A [`MarkovModel`] counts the transitions between adjacent states in a set
//! of observation sequences, normalizes each row into a probability
//! distribution, and then samples successor states from it.
//!
//! # Pipeline
//!
//! ```text
//!  ┌──────────────┐     ┌────────────────┐     ┌──────────────────┐
//!  │    state      │────▶│  transition    │────▶│  model/simulate  │
//!  │ (state list)  │     │ (count, norm)  │     │  (draw states)   │
//!  └──────────────┘     └────────────────┘     └──────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use stepwise_markov::MarkovModel;
//!
//! let observations = vec![
//!     vec!["home", "search", "product", "cart"],
//!     vec!["home", "product", "cart", "checkout"],
//! ];
//!
//! let mut model = MarkovModel::new();
//! model.build(observations, None).unwrap();
//! assert_eq!(model.states(), &["home", "search", "product", "cart", "checkout"]);
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let next = model.next(&"product", &mut rng).unwrap();
//! assert_eq!(next, "cart");
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod simulate;
pub mod state;
pub mod transition;

pub use config::{ModelConfig, UnknownStatePolicy};
pub use error::MarkovError;
pub use model::MarkovModel;
pub use simulate::{simulate, simulate_into};
pub use state::{State, StateSpace, unique_in_order};
pub use transition::{TransitionCounts, TransitionMatrix, count_transitions};
