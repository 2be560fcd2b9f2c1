//! DataFrame input through the optional polars feature.

#![cfg(feature = "polars")]

use gpboost_estimator::testing::MockEngine;
use gpboost_estimator::*;
use ndarray::array;
use polars::df;
use polars::prelude::DataFrame;

mod common;
use common::*;

fn frame() -> DataFrame {
    df!(
        "age" => [31.0, 45.0, 22.0, 60.0, 38.0, 27.0],
        "income" => [2.1, 3.4, 1.2, 4.0, 2.9, 1.8],
        "tenure" => [3.0, 10.0, 1.0, 25.0, 7.0, 2.0]
    )
    .unwrap()
}

#[test]
fn test_frame_columns_become_feature_names() {
    let engine = MockEngine::new();
    let mut model: GPBoostRegressor<MockEngine> =
        GPBoostModel::with_params(engine.clone(), create_test_params(3));

    model
        .fit(frame(), array![1.0, 2.0, 0.5, 3.0, 1.5, 0.8], FitOptions::new())
        .unwrap();

    assert_eq!(model.n_features().unwrap(), 3);
    assert_eq!(model.feature_name().unwrap(), vec!["age", "income", "tenure"]);
    assert_eq!(engine.last_record().unwrap().feature_name, FeatureName::Auto);

    let predictions = model.predict(frame(), &PredictOptions::new()).unwrap();
    assert_eq!(predictions.as_values().unwrap().len(), 6);
}

#[test]
fn test_explicit_names_override_frame_columns() {
    let mut model = regressor(2);
    model
        .fit(
            frame(),
            array![1.0, 2.0, 0.5, 3.0, 1.5, 0.8],
            FitOptions::new().with_feature_name(vec!["a", "b", "c"]),
        )
        .unwrap();
    assert_eq!(model.feature_name().unwrap(), vec!["a", "b", "c"]);
}

#[test]
fn test_frame_with_wrong_width_is_rejected_at_predict() {
    let mut model = regressor(2);
    model
        .fit(frame(), array![1.0, 2.0, 0.5, 3.0, 1.5, 0.8], FitOptions::new())
        .unwrap();

    let narrow = df!("age" => [30.0, 40.0]).unwrap();
    let err = model.predict(narrow, &PredictOptions::new()).unwrap_err();
    assert!(matches!(err, GPBoostError::DimensionMismatch { .. }));
}

#[test]
fn test_frame_labels_are_encoded_for_classification() {
    let engine = MockEngine::new();
    let mut model: GPBoostClassifier<MockEngine, &str> =
        GPBoostModel::with_params(engine.clone(), create_test_params(2));
    model
        .fit(
            frame(),
            array!["no", "yes", "no", "yes", "yes", "no"],
            FitOptions::new(),
        )
        .unwrap();

    assert_eq!(model.classes().unwrap(), &["no", "yes"]);
    assert_eq!(
        engine.last_record().unwrap().train_label,
        Some(array![0.0, 1.0, 0.0, 1.0, 1.0, 0.0])
    );
}
