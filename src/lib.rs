//! # GPBoost estimator
//!
//! An estimator interface (`fit` / `predict`, parameter get / set) over a
//! GPBoost-style boosting engine: gradient boosted trees, optionally
//! combined with a latent Gaussian process or grouped random effects
//! model.
//!
//! The crate does not grow trees itself. It validates and prepares data,
//! resolves hyperparameters into the engine parameter map, adapts user
//! objectives and metrics to the engine calling convention, and
//! post-processes predictions. The engine is anything implementing
//! [`Engine`].
//!
//! ## Quick Start
//!
//! ```rust
//! use gpboost_estimator::testing::MockEngine;
//! use gpboost_estimator::{FitOptions, GPBoostModel, GPBoostRegressor, ParamsBuilder, PredictOptions};
//! use ndarray::{array, Array2};
//!
//! # fn main() -> gpboost_estimator::Result<()> {
//! let params = ParamsBuilder::new().n_estimators(20).learning_rate(0.5).build()?;
//! let mut model: GPBoostRegressor<MockEngine> =
//!     GPBoostModel::with_params(MockEngine::new(), params);
//!
//! let x = Array2::from_shape_vec((4, 2), vec![1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0, 5.0]).unwrap();
//! let y = array![3.0, 5.0, 7.0, 9.0];
//! model.fit(x.clone(), y, FitOptions::new())?;
//!
//! let predictions = model.predict(x, &PredictOptions::new())?;
//! assert_eq!(predictions.as_values().map(|p| p.len()), Some(4));
//! # Ok(())
//! # }
//! ```
//!
//! ### Classification
//!
//! ```rust
//! use gpboost_estimator::testing::MockEngine;
//! use gpboost_estimator::{ClassWeight, FitOptions, GPBoostClassifier, GPBoostModel, PredictOptions};
//! use ndarray::{array, Array2};
//!
//! # fn main() -> gpboost_estimator::Result<()> {
//! let mut model: GPBoostClassifier<MockEngine, &str> = GPBoostModel::new(MockEngine::new());
//! model.set_class_weight(Some(ClassWeight::Balanced));
//! let x = Array2::<f64>::zeros((4, 3));
//! model.fit(x.clone(), array!["cat", "dog", "dog", "dog"], FitOptions::new())?;
//!
//! assert_eq!(model.classes()?, &["cat", "dog"]);
//! let proba = model.predict_proba(x, &PredictOptions::new())?;
//! assert_eq!(proba.as_matrix().map(|m| m.ncols()), Some(2));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: shared types, constants, the error type and the engine traits
//! - [`config`]: typed hyperparameters, parameter aliases and config files
//! - [`dataset`]: feature containers, input validation, label encoding and
//!   class weights
//! - [`boosting`]: objective / metric adapters, callbacks and the training
//!   request handed to the engine
//! - [`prediction`]: prediction options and results
//! - [`estimator`]: the regressor, classifier and ranker
//! - [`testing`]: an in-memory engine for tests and documentation

#![doc(html_root_url = "https://docs.rs/gpboost-estimator/")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module - always available
pub mod core;

// Hyperparameters and engine parameter maps
pub mod config;

// Caller-side data containers
pub mod dataset;

// Objective / metric adapters and the training contract
pub mod boosting;

// Prediction options and results
pub mod prediction;

// Regressor, classifier and ranker
pub mod estimator;

// In-memory engine
pub mod testing;

// Re-export core functionality for convenience
pub use core::{
    constants::*,
    error::{GPBoostError, Result},
    traits::{Booster, Engine, TrainingData},
    types::*,
};

// Re-export configuration functionality
pub use config::{
    choose_param_value, ConfigAliases, Objective, ParamMap, ParamValue, Params, ParamsBuilder,
    RandomState,
};

// Re-export dataset functionality
pub use dataset::{
    CategoricalFeature, ClassLabel, ClassWeight, DatasetParts, EvalSet, FeatureName, Features,
    LabelEncoder, PerEval,
};

// Re-export boosting functionality
pub use boosting::{
    callback, BestScore, Callback, CallbackEnv, CustomObjective, EvalFunction, EvalMetric,
    EvalRecord, EvalResult, EvalsResult, InitModel, VerboseEval,
};

// Re-export prediction functionality
pub use prediction::{GroupData, LatentPredictData, LatentPrediction, PredictOptions, Prediction};

// Re-export estimators
pub use estimator::{
    ClassifierOutput, FitOptions, GPBoostClassifier, GPBoostModel, GPBoostRanker,
    GPBoostRegressor, TaskStrategy,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

static_assertions::assert_impl_all!(Params: Send, Sync);
static_assertions::assert_impl_all!(GPBoostError: Send, Sync);

/// Initialize the library.
///
/// Sets up logging through `env_logger`. Calling it more than once is
/// harmless, and skipping it only means log records go nowhere.
///
/// # Examples
///
/// ```rust
/// gpboost_estimator::init();
/// ```
pub fn init() {
    core::initialize_logging()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_and_version() {
        init();
        init();
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_reexports_resolve() {
        let params = ParamsBuilder::new().n_estimators(5).build().unwrap();
        assert_eq!(params.n_estimators, 5);
        assert_eq!(TaskKind::Ranking.default_objective(), "lambdarank");
    }
}
