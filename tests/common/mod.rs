//! Common test utilities for the estimator integration tests.

#![allow(dead_code)]

use gpboost_estimator::testing::MockEngine;
use gpboost_estimator::*;
use ndarray::{Array1, Array2};
use rand::prelude::*;

/// Create uniformly distributed test features
pub fn create_test_features(num_samples: usize, num_features: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((num_samples, num_features), |_| rng.gen_range(-5.0..5.0))
}

/// Create test labels for regression based on features
pub fn create_test_labels_regression(features: &Array2<f64>) -> Array1<f64> {
    features
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(j, x)| x * (j + 1) as f64 * 0.1)
                .sum::<f64>()
        })
        .collect()
}

/// Create test labels for binary classification; the positive class is
/// the majority
pub fn create_test_labels_binary(features: &Array2<f64>) -> Array1<i64> {
    features
        .rows()
        .into_iter()
        .map(|row| if row[0] > -2.5 { 1 } else { 0 })
        .collect()
}

/// Create test labels for multiclass classification; class 0 is the
/// majority
pub fn create_test_labels_multiclass(num_samples: usize, num_classes: usize) -> Array1<i64> {
    (0..num_samples)
        .map(|i| if i % 2 == 0 { 0 } else { (i % num_classes) as i64 })
        .collect()
}

/// Create relevance labels and query sizes for ranking
pub fn create_test_ranking(num_queries: usize, query_size: usize) -> (Array1<f64>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(321);
    let labels = (0..num_queries * query_size)
        .map(|_| rng.gen_range(0..4) as f64)
        .collect();
    (labels, vec![query_size; num_queries])
}

/// Create positive sample weights
pub fn create_test_weights(num_samples: usize) -> Array1<f64> {
    let mut rng = StdRng::seed_from_u64(789);
    (0..num_samples).map(|_| rng.gen_range(0.5..2.0)).collect()
}

/// Small and fast hyperparameters for tests
pub fn create_test_params(n_estimators: usize) -> Params {
    ParamsBuilder::new()
        .n_estimators(n_estimators)
        .learning_rate(0.5)
        .silent(true)
        .build()
        .expect("valid test parameters")
}

/// Regressor over a fresh mock engine
pub fn regressor(n_estimators: usize) -> GPBoostRegressor<MockEngine> {
    GPBoostModel::with_params(MockEngine::new(), create_test_params(n_estimators))
}

/// Classifier over a fresh mock engine
pub fn classifier(n_estimators: usize) -> GPBoostClassifier<MockEngine> {
    GPBoostModel::with_params(MockEngine::new(), create_test_params(n_estimators))
}

/// Ranker over a fresh mock engine
pub fn ranker(n_estimators: usize) -> GPBoostRanker<MockEngine> {
    GPBoostModel::with_params(MockEngine::new(), create_test_params(n_estimators))
}

/// Macro for creating test data more easily
#[macro_export]
macro_rules! create_test_data {
    (regression, $samples:expr, $features:expr) => {{
        let features = common::create_test_features($samples, $features, 42);
        let labels = common::create_test_labels_regression(&features);
        (features, labels)
    }};

    (binary, $samples:expr, $features:expr) => {{
        let features = common::create_test_features($samples, $features, 123);
        let labels = common::create_test_labels_binary(&features);
        (features, labels)
    }};

    (multiclass, $samples:expr, $features:expr, $classes:expr) => {{
        let features = common::create_test_features($samples, $features, 456);
        let labels = common::create_test_labels_multiclass($samples, $classes);
        (features, labels)
    }};
}
