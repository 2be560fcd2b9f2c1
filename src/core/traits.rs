//! Trait seams between the estimator layer and a boosting engine.
//!
//! The estimator never grows trees or estimates covariance parameters
//! itself. It prepares data and parameters, hands them to an [`Engine`],
//! and keeps the [`Booster`] the engine returns.

use crate::boosting::{BestScore, TrainOutput, TrainRequest};
use crate::config::ParamMap;
use crate::core::error::Result;
use crate::core::types::ImportanceType;
use crate::dataset::{DatasetParts, Features};
use crate::prediction::{PredictOptions, Prediction};
use ndarray::{Array1, ArrayView1};
use std::fmt::Debug;

/// Read access to an engine dataset handle.
///
/// The objective and evaluation adapters only need labels, weights and
/// query groups; everything else about the handle stays opaque.
pub trait TrainingData: Send + Sync + Debug {
    /// Number of rows in the dataset.
    fn num_data(&self) -> usize;

    /// Label vector, if one was attached.
    fn label(&self) -> Option<ArrayView1<'_, f64>>;

    /// Per-sample weights, if any.
    fn weight(&self) -> Option<ArrayView1<'_, f64>>;

    /// Sizes of the contiguous query groups, if any.
    fn group(&self) -> Option<&[usize]>;
}

/// A trained model handle.
pub trait Booster: Send + Debug {
    /// Predict for a feature matrix.
    fn predict(&self, features: &Features, options: &PredictOptions) -> Result<Prediction>;

    /// Per-feature importance values.
    fn feature_importance(&self, importance_type: ImportanceType) -> Result<Array1<f64>>;

    /// Names of the features the model was trained on.
    fn feature_name(&self) -> Vec<String>;

    /// Best iteration found by early stopping, if any.
    fn best_iteration(&self) -> Option<usize>;

    /// Best score per validation set and metric.
    fn best_score(&self) -> BestScore;

    /// Whether a latent-effects model is attached to this booster.
    fn has_gp_model(&self) -> bool;

    /// Release the training dataset held by the booster.
    fn free_dataset(&mut self);
}

/// A boosting engine the estimators delegate to.
pub trait Engine: Debug {
    /// Dataset handle built from features and metadata.
    type Dataset: TrainingData + 'static;
    /// Model handle returned by training.
    type Booster: Booster;
    /// Latent-effects (Gaussian process / random effects) model.
    type GpModel: Send + Debug;

    /// Build a dataset handle.
    fn construct_dataset(&self, parts: DatasetParts, params: &ParamMap) -> Result<Self::Dataset>;

    /// Run boosting and return the trained model.
    fn train(&self, request: TrainRequest<Self>) -> Result<TrainOutput<Self::Booster>>
    where
        Self: Sized;
}
