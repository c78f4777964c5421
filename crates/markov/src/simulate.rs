//! Multi-step walks through a built chain.

use crate::error::MarkovError;
use crate::model::MarkovModel;
use crate::state::State;

/// Simulates `steps` successive states starting after `start`.
///
/// `start` itself is not part of the output.
///
/// # Errors
///
/// Returns [`MarkovError::NotBuilt`] or [`MarkovError::StateNotFound`] under
/// the same conditions as [`MarkovModel::next`].
pub fn simulate<S: State>(
    model: &MarkovModel<S>,
    start: &S,
    steps: usize,
    rng: &mut impl rand::Rng,
) -> Result<Vec<S>, MarkovError> {
    let mut out = vec![start.clone(); steps];
    simulate_into(model, start, rng, &mut out)?;
    Ok(out)
}

/// Simulates states into a pre-allocated buffer, one step per slot.
///
/// `start` is validated even when `out` is empty.
///
/// # Errors
///
/// Returns [`MarkovError::NotBuilt`] or [`MarkovError::StateNotFound`] under
/// the same conditions as [`MarkovModel::next`].
#[tracing::instrument(skip_all, fields(steps = out.len()))]
pub fn simulate_into<S: State>(
    model: &MarkovModel<S>,
    start: &S,
    rng: &mut impl rand::Rng,
    out: &mut [S],
) -> Result<(), MarkovError> {
    let mut prev = model.require_index(start)?;
    let (Some(chain), states) = (model.chain(), model.states()) else {
        return Err(MarkovError::NotBuilt);
    };

    for slot in out.iter_mut() {
        let next = chain.sample_row(prev, rng.random());
        slot.clone_from(&states[next]);
        prev = next;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn cycle_model() -> MarkovModel<u8> {
        let mut model = MarkovModel::new();
        model.build(vec![vec![0, 1, 2, 0, 1, 2, 0]], None).unwrap();
        model
    }

    fn mixed_model() -> MarkovModel<char> {
        let mut model = MarkovModel::new();
        model
            .build(
                vec![
                    "aabacbbcaacbcabbacca".chars().collect(),
                    "cbaabccabcab".chars().collect(),
                ],
                None,
            )
            .unwrap();
        model
    }

    // 1. length_correctness
    #[test]
    fn length_correctness() {
        let model = mixed_model();
        let mut rng = StdRng::seed_from_u64(42);
        let result = simulate(&model, &'a', 100, &mut rng).unwrap();
        assert_eq!(result.len(), 100);
        assert!(result.iter().all(|c| model.states().contains(c)));
    }

    // 2. zero_steps
    #[test]
    fn zero_steps() {
        let model = mixed_model();
        let mut rng = StdRng::seed_from_u64(42);
        assert!(simulate(&model, &'a', 0, &mut rng).unwrap().is_empty());
    }

    // 3. deterministic_cycle
    #[test]
    fn deterministic_cycle() {
        let model = cycle_model();
        let mut rng = StdRng::seed_from_u64(1);
        let result = simulate(&model, &2, 6, &mut rng).unwrap();
        assert_eq!(result, vec![0, 1, 2, 0, 1, 2]);
    }

    // 4. deterministic_with_seed
    #[test]
    fn deterministic_with_seed() {
        let model = mixed_model();

        let mut rng1 = StdRng::seed_from_u64(123);
        let result1 = simulate(&model, &'b', 50, &mut rng1).unwrap();

        let mut rng2 = StdRng::seed_from_u64(123);
        let result2 = simulate(&model, &'b', 50, &mut rng2).unwrap();

        assert_eq!(result1, result2);
    }

    // 5. into_matches_allocating
    #[test]
    fn into_matches_allocating() {
        let model = mixed_model();

        let mut rng1 = StdRng::seed_from_u64(999);
        let alloc_result = simulate(&model, &'c', 30, &mut rng1).unwrap();

        let mut rng2 = StdRng::seed_from_u64(999);
        let mut buf = vec!['a'; 30];
        simulate_into(&model, &'c', &mut rng2, buf.as_mut_slice()).unwrap();

        assert_eq!(alloc_result, buf);
    }

    // 6. unknown_start_errors_even_when_empty
    #[test]
    fn unknown_start_errors_even_when_empty() {
        let model = mixed_model();
        let mut rng = StdRng::seed_from_u64(0);
        let mut buf: Vec<char> = Vec::new();
        let result = simulate_into(&model, &'z', &mut rng, buf.as_mut_slice());
        assert!(matches!(result, Err(MarkovError::StateNotFound { .. })));
    }

    // 7. unbuilt_model_errors
    #[test]
    fn unbuilt_model_errors() {
        let model: MarkovModel<char> = MarkovModel::new();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            simulate(&model, &'a', 3, &mut rng),
            Err(MarkovError::NotBuilt)
        );
    }

    // 8. absorbing_in_degenerate_last_state
    #[test]
    fn absorbing_in_degenerate_last_state() {
        // 'z' has no outgoing transitions and is last, so the walk sticks there.
        let mut model = MarkovModel::new();
        model.build(vec![vec!['x', 'y', 'z']], None).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let result = simulate(&model, &'x', 5, &mut rng).unwrap();
        assert_eq!(result, vec!['y', 'z', 'z', 'z', 'z']);
    }
}
