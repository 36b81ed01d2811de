//! Property-based tests for bootstrap significance testing
//!
//! Resample counts are kept small so the suite stays fast; the properties
//! hold for any count.

use bootsig::bootstrap::{BootstrapConfig, BootstrapTester};
use bootsig::metrics::{Accuracy, ConfusionMatrix, F1Macro, Pearson, Spearman, R2};
use bootsig::{Metric, SampleSet};
use proptest::prelude::*;

fn labels(len: std::ops::Range<usize>) -> impl Strategy<Value = (Vec<u8>, Vec<u8>, Vec<u8>)> {
    len.prop_flat_map(|n| {
        (
            prop::collection::vec(0u8..3, n),
            prop::collection::vec(0u8..3, n),
            prop::collection::vec(0u8..3, n),
        )
    })
}

fn tester(resamples: usize, seed: u64, workers: usize) -> BootstrapTester {
    BootstrapTester::new(
        BootstrapConfig::default()
            .with_resamples(resamples)
            .with_seed(seed)
            .with_workers(workers),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_p_value_in_unit_interval(
        (truth, a, b) in labels(1..40),
        seed in any::<u64>(),
        workers in 1usize..4,
    ) {
        let samples = SampleSet::new(truth, a, b).unwrap();
        let report = tester(200, seed, workers).test(&samples, &Accuracy).unwrap();

        prop_assert!((0.0..=1.0).contains(&report.p_value));
        prop_assert!(report.exceed_count <= report.resamples);
        prop_assert_eq!(report.observed_effect, 2.0 * (report.score_a - report.score_b));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_identical_predictions_give_zero(
        (truth, pred, _) in labels(1..40),
        seed in any::<u64>(),
    ) {
        let samples = SampleSet::new(truth, pred.clone(), pred).unwrap();
        let report = tester(200, seed, 1).test(&samples, &F1Macro).unwrap();

        prop_assert_eq!(report.p_value, 0.0);
        prop_assert!(!report.is_significant());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn prop_same_seed_same_report(
        (truth, a, b) in labels(2..30),
        seed in any::<u64>(),
        workers in 1usize..4,
    ) {
        let samples = SampleSet::new(truth, a, b).unwrap();
        let first = tester(300, seed, workers).test(&samples, &Accuracy).unwrap();
        let second = tester(300, seed, workers).test(&samples, &Accuracy).unwrap();
        prop_assert_eq!(first, second);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_single_instance_never_exceeds(
        truth in 0u8..3,
        a in 0u8..3,
        b in 0u8..3,
        seed in any::<u64>(),
    ) {
        // Resamples equal the original, so d_i = d / 2; only a worse A can exceed
        let samples = SampleSet::new(vec![truth], vec![a], vec![b]).unwrap();
        let report = tester(100, seed, 1).test(&samples, &Accuracy).unwrap();

        if report.score_a >= report.score_b {
            prop_assert_eq!(report.p_value, 0.0);
        } else {
            prop_assert_eq!(report.p_value, 1.0);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_classification_scores_bounded((truth, pred, _) in labels(1..50)) {
        let acc = Accuracy.evaluate(&truth, &pred).unwrap();
        let f1 = F1Macro.evaluate(&truth, &pred).unwrap();
        prop_assert!((0.0..=1.0).contains(&acc));
        prop_assert!((0.0..=1.0).contains(&f1));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_confusion_matrix_agrees_with_accuracy((truth, pred, _) in labels(1..50)) {
        let matrix = ConfusionMatrix::from_predictions(&truth, &pred).unwrap();
        let acc = Accuracy.evaluate(&truth, &pred).unwrap();

        prop_assert_eq!(matrix.total(), truth.len());
        prop_assert!((matrix.correct() as f64 / truth.len() as f64 - acc).abs() < 1e-6);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_correlations_bounded(
        pairs in prop::collection::vec((-1e3f64..1e3, -1e3f64..1e3), 2..50),
    ) {
        let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();

        // Undefined for constant input; otherwise within bounds
        if let Ok(r) = Pearson.evaluate(&x, &y) {
            prop_assert!((-1.0..=1.0).contains(&r));
        }
        if let Ok(rho) = Spearman.evaluate(&x, &y) {
            prop_assert!((-1.0..=1.0).contains(&rho));
        }
        if let Ok(r2) = R2.evaluate(&x, &y) {
            prop_assert!(r2 <= 1.0);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_csv_parser_never_panics(input in ".{0,200}") {
        let _ = bootsig::data::parse_csv::<String>(&input);
        let _ = bootsig::data::parse_csv::<f64>(&input);
    }
}
