//! Shape and value checks applied to caller data before training.

use crate::core::constants::MIN_TRAINING_SAMPLES;
use crate::core::error::{GPBoostError, Result};
use crate::dataset::label_encoder::ClassLabel;
use ndarray::{Array1, Array2};

/// Check a dense feature matrix against its labels.
///
/// Features are passed to the engine as-is, missing values included;
/// labels must be finite.
pub fn check_xy(features: &Array2<f64>, labels: &Array1<f64>) -> Result<()> {
    if features.nrows() != labels.len() {
        return Err(GPBoostError::dimension_mismatch(
            format!("{} labels", features.nrows()),
            format!("{} labels", labels.len()),
        ));
    }
    if features.nrows() < MIN_TRAINING_SAMPLES {
        return Err(GPBoostError::invalid_parameter(
            "X",
            format!("{} samples", features.nrows()),
            format!("a minimum of {} is required", MIN_TRAINING_SAMPLES),
        ));
    }
    if features.ncols() < 1 {
        return Err(GPBoostError::invalid_parameter(
            "X",
            "0 features",
            "a minimum of 1 is required",
        ));
    }
    if labels.iter().any(|v| !v.is_finite()) {
        return Err(GPBoostError::invalid_parameter(
            "y",
            "non-finite",
            "input contains NaN, infinity or a value too large",
        ));
    }
    Ok(())
}

/// Check sample weights against the number of samples.
pub fn check_sample_weight(weight: &Array1<f64>, num_samples: usize) -> Result<()> {
    if weight.len() != num_samples {
        return Err(GPBoostError::dimension_mismatch(
            format!("{} sample weights", num_samples),
            format!("{} sample weights", weight.len()),
        ));
    }
    if weight.iter().any(|w| !w.is_finite()) {
        return Err(GPBoostError::invalid_parameter(
            "sample_weight",
            "non-finite",
            "input contains NaN, infinity or a value too large",
        ));
    }
    Ok(())
}

/// Check that query group sizes cover exactly `num_samples` rows.
pub fn check_group(group: &[usize], num_samples: usize, name: &str) -> Result<()> {
    let total: usize = group.iter().sum();
    if total != num_samples {
        return Err(GPBoostError::dimension_mismatch(
            format!("sum({}) = {}", name, num_samples),
            format!("sum({}) = {}", name, total),
        ));
    }
    Ok(())
}

/// Reject labels containing NaN or infinity.
pub fn assert_all_finite<L: ClassLabel>(labels: &Array1<L>) -> Result<()> {
    if let Some(bad) = labels.iter().find(|label| !label.is_finite_label()) {
        return Err(GPBoostError::invalid_parameter(
            "y",
            bad.to_string(),
            "input contains NaN, infinity or a value too large",
        ));
    }
    Ok(())
}

/// Reject continuous targets for classification.
pub fn check_classification_targets<L: ClassLabel>(labels: &Array1<L>) -> Result<()> {
    if let Some(bad) = labels.iter().find(|label| !label.is_discrete_label()) {
        return Err(GPBoostError::invalid_parameter(
            "y",
            bad.to_string(),
            "Unknown label type: continuous",
        ));
    }
    Ok(())
}
