//! Property-based tests for tensor networks
//!
//! These tests use proptest to check the algebraic properties that every
//! network operation must preserve against the materialized dense array.

#[cfg(test)]
mod tests {
    use crate::{KeyEntry, TensorNetwork};
    use proptest::prelude::*;
    use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
    use scirs2_core::random::{rngs::StdRng, Rng, SeedableRng};

    // Orthogonalization and rounding run QR/SVD per core; keep case counts low
    fn proptest_config() -> ProptestConfig {
        ProptestConfig {
            cases: 16,
            max_local_rejects: 1000,
            max_global_rejects: 10000,
            ..ProptestConfig::default()
        }
    }

    fn random_dense(shape: &[usize], seed: u64) -> ArrayD<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        ArrayD::from_shape_fn(IxDyn(shape), |_| rng.random_range(-1.0..1.0))
    }

    fn frobenius(a: &ArrayD<f64>) -> f64 {
        a.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    fn max_abs_diff(a: &ArrayD<f64>, b: &ArrayD<f64>) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }

    fn shape_strategy() -> impl Strategy<Value = Vec<usize>> {
        prop::collection::vec(1usize..5, 1..5)
    }

    // ========================================================================
    // Representation
    // ========================================================================

    proptest! {
        #![proptest_config(proptest_config())]
        #[test]
        fn from_dense_is_lossless(shape in shape_strategy(), seed in any::<u64>()) {
            let dense = random_dense(&shape, seed);
            let t = TensorNetwork::from_dense(&dense).unwrap();
            prop_assert_eq!(t.shape(), shape.clone());
            let ranks = t.ranks_tt();
            prop_assert_eq!(ranks[0], 1);
            prop_assert_eq!(ranks[shape.len()], 1);
            prop_assert!(max_abs_diff(&t.materialize().unwrap(), &dense) < 1e-12);
        }
    }

    // ========================================================================
    // Orthogonalization
    // ========================================================================

    proptest! {
        #![proptest_config(proptest_config())]
        #[test]
        fn orthogonalize_preserves_tensor(
            shape in shape_strategy(),
            seed in any::<u64>(),
            pick in any::<prop::sample::Index>(),
        ) {
            let dense = random_dense(&shape, seed);
            let mut t = TensorNetwork::from_dense(&dense).unwrap();
            let mu = pick.index(shape.len());
            t.orthogonalize(mu).unwrap();

            prop_assert!(max_abs_diff(&t.materialize().unwrap(), &dense) < 1e-10);
            let core_norm = t.tt_core(mu).iter().map(|x| x * x).sum::<f64>().sqrt();
            prop_assert!((core_norm - frobenius(&dense)).abs() < 1e-10);
        }
    }

    // ========================================================================
    // Rounding
    // ========================================================================

    proptest! {
        #![proptest_config(proptest_config())]
        #[test]
        fn round_respects_error_budget(
            shape in prop::collection::vec(2usize..5, 2..5),
            seed in any::<u64>(),
            eps in 1e-3f64..0.5,
        ) {
            let dense = random_dense(&shape, seed);
            let original = TensorNetwork::from_dense(&dense).unwrap();
            let mut rounded = original.clone();
            rounded.round(eps).unwrap();

            let error = original.relative_error(&rounded).unwrap();
            prop_assert!(error <= eps * (1.0 + 1e-6) + 1e-8);
            for (after, before) in rounded.ranks_tt().iter().zip(original.ranks_tt().iter()) {
                prop_assert!(after <= before);
            }
        }
    }

    proptest! {
        #![proptest_config(proptest_config())]
        #[test]
        fn round_zero_keeps_values(shape in shape_strategy(), seed in any::<u64>()) {
            let dense = random_dense(&shape, seed);
            let mut t = TensorNetwork::from_dense(&dense).unwrap();
            t.round(0.0).unwrap();
            prop_assert!(max_abs_diff(&t.materialize().unwrap(), &dense) < 1e-10);
        }
    }

    fn budget_strategy() -> impl Strategy<Value = f64> {
        prop::sample::select(vec![0.0, 1e-3, 1e-2, 0.2])
    }

    fn dense_relative_error(exact: &ArrayD<f64>, approx: &ArrayD<f64>) -> f64 {
        let diff = exact - approx;
        frobenius(&diff) / frobenius(exact)
    }

    proptest! {
        #![proptest_config(proptest_config())]
        #[test]
        fn round_tt_bound_holds_on_dense_error(
            shape in prop::collection::vec(2usize..6, 2..5),
            seed in any::<u64>(),
            eps in budget_strategy(),
        ) {
            let dense = random_dense(&shape, seed);
            let original = TensorNetwork::from_dense(&dense).unwrap();
            let mut rounded = original.clone();
            rounded.round_tt(eps, None).unwrap();

            let error = dense_relative_error(&dense, &rounded.materialize().unwrap());
            prop_assert!(error <= eps * (1.0 + 1e-6) + 1e-10, "error {} for eps {}", error, eps);
            for (after, before) in rounded.ranks_tt().iter().zip(original.ranks_tt().iter()) {
                prop_assert!(after <= before);
            }
        }
    }

    proptest! {
        #![proptest_config(proptest_config())]
        #[test]
        fn round_tucker_bound_holds_on_dense_error(
            shape in prop::collection::vec(2usize..6, 2..5),
            seed in any::<u64>(),
            eps in budget_strategy(),
        ) {
            let dense = random_dense(&shape, seed);
            let mut rounded = TensorNetwork::from_dense(&dense).unwrap();
            rounded.round_tucker(eps, None).unwrap();

            let error = dense_relative_error(&dense, &rounded.materialize().unwrap());
            prop_assert!(error <= eps * (1.0 + 1e-6) + 1e-10, "error {} for eps {}", error, eps);
            for (rank, size) in rounded.ranks_tucker().iter().zip(shape.iter()) {
                prop_assert!(rank <= size);
            }
        }
    }

    proptest! {
        #![proptest_config(proptest_config())]
        #[test]
        fn zero_budget_rounding_is_exact(shape in shape_strategy(), seed in any::<u64>()) {
            let dense = random_dense(&shape, seed);
            let tol = 1e-12 * frobenius(&dense).max(1.0) * 100.0;

            let mut tt = TensorNetwork::from_dense(&dense).unwrap();
            tt.round_tt(0.0, None).unwrap();
            prop_assert!(max_abs_diff(&tt.materialize().unwrap(), &dense) < tol);

            let mut tucker = TensorNetwork::from_dense(&dense).unwrap();
            tucker.round_tucker(0.0, None).unwrap();
            prop_assert!(max_abs_diff(&tucker.materialize().unwrap(), &dense) < tol);
        }
    }

    proptest! {
        #![proptest_config(proptest_config())]
        #[test]
        fn larger_budget_never_grows_leading_rank(
            shape in prop::collection::vec(2usize..6, 2..5),
            seed in any::<u64>(),
        ) {
            let dense = random_dense(&shape, seed);
            let ndim = shape.len();
            let mut previous = usize::MAX;
            for eps in [0.0, 1e-3, 1e-2, 0.2] {
                let mut t = TensorNetwork::from_dense(&dense).unwrap();
                t.round_tt(eps, None).unwrap();
                // The rightmost bond is truncated first, from the same spectrum each time
                let rank = t.ranks_tt()[ndim - 1];
                prop_assert!(rank <= previous);
                previous = rank;
            }
        }
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    proptest! {
        #![proptest_config(proptest_config())]
        #[test]
        fn arithmetic_matches_dense(
            shape in shape_strategy(),
            seed_a in any::<u64>(),
            seed_b in any::<u64>(),
            scalar in -3.0f64..3.0,
        ) {
            let (da, db) = (random_dense(&shape, seed_a), random_dense(&shape, seed_b));
            let a = TensorNetwork::from_dense(&da).unwrap();
            let b = TensorNetwork::from_dense(&db).unwrap();

            let sum = (&a + &b).unwrap().materialize().unwrap();
            prop_assert!(max_abs_diff(&sum, &(&da + &db)) < 1e-10);

            let product = (&a * &b).unwrap().materialize().unwrap();
            prop_assert!(max_abs_diff(&product, &(&da * &db)) < 1e-10);

            let affine = (&(scalar * &a) + 1.0).materialize().unwrap();
            prop_assert!(max_abs_diff(&affine, &da.mapv(|x| scalar * x + 1.0)) < 1e-10);

            let dot: f64 = da.iter().zip(db.iter()).map(|(x, y)| x * y).sum();
            prop_assert!((a.dot(&b).unwrap() - dot).abs() < 1e-10);
        }
    }

    // ========================================================================
    // Indexing
    // ========================================================================

    proptest! {
        #![proptest_config(proptest_config())]
        #[test]
        fn integer_keys_match_dense_entries(
            shape in shape_strategy(),
            seed in any::<u64>(),
            picks in prop::collection::vec(any::<prop::sample::Index>(), 4),
        ) {
            let dense = random_dense(&shape, seed);
            let t = TensorNetwork::from_dense(&dense).unwrap();
            let position: Vec<usize> = shape
                .iter()
                .zip(picks.iter())
                .map(|(&size, pick)| pick.index(size))
                .collect();
            let key: Vec<KeyEntry> = position.iter().map(|&i| KeyEntry::Int(i as isize)).collect();

            let value = t.index(&key).unwrap().into_scalar().unwrap();
            prop_assert!((value - dense[IxDyn(&position)]).abs() < 1e-10);
        }
    }

    proptest! {
        #![proptest_config(proptest_config())]
        #[test]
        fn leading_slice_matches_dense(
            shape in prop::collection::vec(2usize..5, 2..4),
            seed in any::<u64>(),
        ) {
            let dense = random_dense(&shape, seed);
            let t = TensorNetwork::from_dense(&dense).unwrap();
            let sub = t
                .index(&[(1..).into(), KeyEntry::Ellipsis])
                .unwrap()
                .into_network()
                .unwrap()
                .materialize()
                .unwrap();

            let mut expected_shape = shape.clone();
            expected_shape[0] -= 1;
            prop_assert_eq!(sub.shape(), expected_shape.as_slice());
            for (ix, &value) in sub.indexed_iter() {
                let mut source: Vec<usize> = (0..shape.len()).map(|k| ix[k]).collect();
                source[0] += 1;
                prop_assert!((value - dense[IxDyn(&source)]).abs() < 1e-10);
            }
        }
    }
}
