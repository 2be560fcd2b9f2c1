//! Prediction options and prediction results.
//!
//! [`PredictOptions`] carries every knob `predict` forwards to the booster,
//! including the inputs needed to predict latent (Gaussian process / random
//! effects) parts. [`Prediction`] is what comes back.

use crate::config::ParamMap;
use ndarray::{Array1, Array2};

/// Group level labels for grouped random effects.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupData {
    /// Numeric group levels, one column per grouping variable
    Numeric(Array2<f64>),
    /// String group levels, one column per grouping variable
    Labels(Array2<String>),
}

/// Inputs for predicting the latent-effects part of a model.
///
/// Only used when the booster has a latent-effects model attached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatentPredictData {
    /// Group levels for grouped random effects
    pub group_data_pred: Option<GroupData>,
    /// Covariates for grouped random coefficients
    pub group_rand_coef_data_pred: Option<Array2<f64>>,
    /// Coordinates for the Gaussian process
    pub gp_coords_pred: Option<Array2<f64>>,
    /// Covariates for Gaussian process random coefficients
    pub gp_rand_coef_data_pred: Option<Array2<f64>>,
    /// Ids of independent process realizations
    pub cluster_ids_pred: Option<Array1<i64>>,
}

impl LatentPredictData {
    /// Whether no latent input was provided.
    pub fn is_empty(&self) -> bool {
        self.group_data_pred.is_none()
            && self.group_rand_coef_data_pred.is_none()
            && self.gp_coords_pred.is_none()
            && self.gp_rand_coef_data_pred.is_none()
            && self.cluster_ids_pred.is_none()
    }
}

/// Options for `predict` and `predict_proba`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictOptions {
    /// Return raw (latent) scores instead of transformed responses
    pub raw_score: bool,
    /// First iteration used; non-positive starts from the first one
    pub start_iteration: i64,
    /// Number of iterations used; `None` uses the best iteration when known
    pub num_iteration: Option<i64>,
    /// Predict leaf indices
    pub pred_leaf: bool,
    /// Predict feature contributions
    pub pred_contrib: bool,
    /// Latent-effects prediction inputs
    pub latent: LatentPredictData,
    /// Compute the predictive covariance matrix
    pub predict_cov_mat: bool,
    /// Compute predictive variances
    pub predict_var: bool,
    /// Additional engine prediction parameters
    pub extra: ParamMap,
}

impl PredictOptions {
    /// Default prediction options
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether raw scores, leaf indices or contributions are requested.
    pub fn wants_raw_output(&self) -> bool {
        self.raw_score || self.pred_leaf || self.pred_contrib
    }

    /// Request raw scores
    pub fn with_raw_score(mut self, raw_score: bool) -> Self {
        self.raw_score = raw_score;
        self
    }

    /// Set the first iteration used
    pub fn with_start_iteration(mut self, start_iteration: i64) -> Self {
        self.start_iteration = start_iteration;
        self
    }

    /// Set the number of iterations used
    pub fn with_num_iteration(mut self, num_iteration: Option<i64>) -> Self {
        self.num_iteration = num_iteration;
        self
    }

    /// Request leaf indices
    pub fn with_pred_leaf(mut self, pred_leaf: bool) -> Self {
        self.pred_leaf = pred_leaf;
        self
    }

    /// Request feature contributions
    pub fn with_pred_contrib(mut self, pred_contrib: bool) -> Self {
        self.pred_contrib = pred_contrib;
        self
    }

    /// Set latent-effects prediction inputs
    pub fn with_latent(mut self, latent: LatentPredictData) -> Self {
        self.latent = latent;
        self
    }

    /// Request the predictive covariance matrix
    pub fn with_predict_cov_mat(mut self, predict_cov_mat: bool) -> Self {
        self.predict_cov_mat = predict_cov_mat;
        self
    }

    /// Request predictive variances
    pub fn with_predict_var(mut self, predict_var: bool) -> Self {
        self.predict_var = predict_var;
        self
    }

    /// Add an engine prediction parameter
    pub fn with_extra<K: Into<String>, V: Into<crate::config::ParamValue>>(mut self, key: K, value: V) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Prediction of a model with a latent-effects part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatentPrediction {
    /// Predictive mean of the response, one column per output
    pub response_mean: Option<Array2<f64>>,
    /// Predictive variance of the response
    pub response_var: Option<Array1<f64>>,
    /// Predictive covariance of the response
    pub response_cov: Option<Array2<f64>>,
    /// Tree ensemble (fixed effect) part
    pub fixed_effect: Option<Array1<f64>>,
    /// Predictive mean of the random effects
    pub random_effect_mean: Option<Array1<f64>>,
    /// Predictive variance of the random effects
    pub random_effect_var: Option<Array1<f64>>,
    /// Predictive covariance of the random effects
    pub random_effect_cov: Option<Array2<f64>>,
}

impl LatentPrediction {
    /// First column of the response mean.
    pub fn response_mean_values(&self) -> Option<Array1<f64>> {
        self.response_mean
            .as_ref()
            .filter(|mean| mean.ncols() > 0)
            .map(|mean| mean.column(0).to_owned())
    }
}

/// Output of a booster prediction.
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    /// One value per sample
    Values(Array1<f64>),
    /// One row per sample (class probabilities, leaves, contributions)
    Matrix(Array2<f64>),
    /// Latent-effects model output
    Latent(LatentPrediction),
}

impl Prediction {
    /// Per-sample values, if this is a vector.
    pub fn as_values(&self) -> Option<&Array1<f64>> {
        match self {
            Prediction::Values(values) => Some(values),
            _ => None,
        }
    }

    /// Matrix, if this is a matrix.
    pub fn as_matrix(&self) -> Option<&Array2<f64>> {
        match self {
            Prediction::Matrix(matrix) => Some(matrix),
            _ => None,
        }
    }

    /// Latent structure, if this is one.
    pub fn as_latent(&self) -> Option<&LatentPrediction> {
        match self {
            Prediction::Latent(latent) => Some(latent),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_options_builder() {
        let options = PredictOptions::new()
            .with_raw_score(true)
            .with_num_iteration(Some(10))
            .with_extra("pred_early_stop", true);
        assert!(options.wants_raw_output());
        assert_eq!(options.num_iteration, Some(10));
        assert_eq!(options.extra.len(), 1);
        assert!(!PredictOptions::new().wants_raw_output());
        assert!(PredictOptions::new().with_pred_contrib(true).wants_raw_output());
    }

    #[test]
    fn test_latent_data_emptiness() {
        assert!(LatentPredictData::default().is_empty());
        let data = LatentPredictData {
            cluster_ids_pred: Some(array![0, 1]),
            ..Default::default()
        };
        assert!(!data.is_empty());
    }

    #[test]
    fn test_response_mean_values() {
        let latent = LatentPrediction {
            response_mean: Some(array![[0.2], [0.7]]),
            ..Default::default()
        };
        assert_eq!(latent.response_mean_values(), Some(array![0.2, 0.7]));
        assert_eq!(LatentPrediction::default().response_mean_values(), None);
    }

    #[test]
    fn test_prediction_accessors() {
        let prediction = Prediction::Values(array![1.0]);
        assert!(prediction.as_values().is_some());
        assert!(prediction.as_matrix().is_none());
        assert!(prediction.as_latent().is_none());
    }
}
