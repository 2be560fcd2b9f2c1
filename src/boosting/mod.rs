//! Training-side adapters and the engine training contract.
//!
//! This module holds everything that crosses into [`Engine::train`]: the
//! objective and evaluation adapters, callbacks, and the request / output
//! structures themselves.

pub mod callback;
pub mod eval;
pub mod objective;

pub use callback::{callback, Callback, CallbackEnv, EvalRecord};
pub use eval::{EvalArgs, EvalFunction, EvalFunctionWrapper, EvalMetric, EvalOutput, EvalResult};
pub use objective::{
    apply_sample_weights, CustomObjective, GradHess, ObjectiveArgs, ObjectiveFunctionWrapper,
};

use crate::config::ParamMap;
use crate::core::traits::Engine;
use crate::dataset::FeatureName;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Evaluation history: dataset name -> metric name -> value per iteration.
pub type EvalsResult = BTreeMap<String, BTreeMap<String, Vec<f64>>>;

/// Best score: dataset name -> metric name -> value.
pub type BestScore = BTreeMap<String, BTreeMap<String, f64>>;

/// How often evaluation results are logged during training.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerboseEval {
    /// Log every iteration, or never
    Flag(bool),
    /// Log every `n` iterations
    Period(usize),
}

impl Default for VerboseEval {
    fn default() -> Self {
        VerboseEval::Flag(true)
    }
}

impl VerboseEval {
    /// Whether results of `iteration` (zero-based) should be logged.
    pub fn should_log(&self, iteration: usize) -> bool {
        match self {
            VerboseEval::Flag(flag) => *flag,
            VerboseEval::Period(0) => false,
            VerboseEval::Period(n) => (iteration + 1) % n == 0,
        }
    }
}

/// Model to continue training from.
#[derive(Debug)]
pub enum InitModel<B> {
    /// Saved model file
    File(PathBuf),
    /// In-memory model handle
    Booster(B),
}

/// Everything an engine needs for one training run.
pub struct TrainRequest<E: Engine> {
    /// Resolved engine parameter map
    pub params: ParamMap,
    /// Training dataset handle
    pub train_set: Arc<E::Dataset>,
    /// Number of boosting rounds
    pub num_boost_round: usize,
    /// Latent-effects model trained jointly with the trees
    pub gp_model: Option<E::GpModel>,
    /// Whether validation predictions include the latent-effects part
    pub use_gp_model_for_validation: bool,
    /// Whether covariance parameters are estimated during boosting
    pub train_gp_model_cov_pars: bool,
    /// Validation dataset handles; may share the training handle
    pub valid_sets: Vec<Arc<E::Dataset>>,
    /// Names of the validation sets
    pub valid_names: Option<Vec<String>>,
    /// Stop when no validation metric improves for this many rounds
    pub early_stopping_rounds: Option<usize>,
    /// Custom objective adapter
    pub fobj: Option<ObjectiveFunctionWrapper>,
    /// Custom metric adapters
    pub feval: Vec<EvalFunctionWrapper>,
    /// Evaluation logging period
    pub verbose_eval: VerboseEval,
    /// Feature names
    pub feature_name: FeatureName,
    /// Per-iteration callbacks
    pub callbacks: Vec<Callback>,
    /// Model to continue training from
    pub init_model: Option<InitModel<E::Booster>>,
}

impl<E: Engine> fmt::Debug for TrainRequest<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainRequest")
            .field("params", &self.params)
            .field("num_boost_round", &self.num_boost_round)
            .field("has_gp_model", &self.gp_model.is_some())
            .field("num_valid_sets", &self.valid_sets.len())
            .field("valid_names", &self.valid_names)
            .field("early_stopping_rounds", &self.early_stopping_rounds)
            .field("fobj", &self.fobj)
            .field("feval", &self.feval)
            .field("verbose_eval", &self.verbose_eval)
            .field("num_callbacks", &self.callbacks.len())
            .finish_non_exhaustive()
    }
}

/// Result of a training run.
#[derive(Debug)]
pub struct TrainOutput<B> {
    /// Trained model handle
    pub booster: B,
    /// Evaluation history, empty when nothing was evaluated
    pub evals_result: EvalsResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_eval_period() {
        assert!(VerboseEval::default().should_log(0));
        assert!(!VerboseEval::Flag(false).should_log(3));
        let every_third = VerboseEval::Period(3);
        assert!(!every_third.should_log(0));
        assert!(every_third.should_log(2));
        assert!(every_third.should_log(5));
        assert!(!VerboseEval::Period(0).should_log(0));
    }
}
