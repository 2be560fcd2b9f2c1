//! Optional inputs of `fit`.

use crate::boosting::{Callback, EvalMetric, InitModel, VerboseEval};
use crate::core::error::Result;
use crate::core::traits::Engine;
use crate::dataset::{CategoricalFeature, ClassWeight, EvalSet, FeatureName, PerEval};
use crate::estimator::task::TaskStrategy;
use crate::estimator::GPBoostModel;
use ndarray::Array1;
use std::fmt;
use std::path::PathBuf;

/// Everything `fit` accepts besides features and labels.
///
/// `L` is the estimator's label type, used by eval sets and eval class
/// weights.
pub struct FitOptions<E: Engine, L> {
    /// Latent-effects model trained jointly with the trees
    pub gp_model: Option<E::GpModel>,
    /// Include the latent-effects part in validation predictions
    pub use_gp_model_for_validation: bool,
    /// Estimate covariance parameters during boosting
    pub train_gp_model_cov_pars: bool,
    /// Per-sample training weights
    pub sample_weight: Option<Array1<f64>>,
    /// Initial training scores
    pub init_score: Option<Array1<f64>>,
    /// Training query group sizes (ranking only)
    pub group: Option<Vec<usize>>,
    /// Validation sets
    pub eval_set: Vec<EvalSet<L>>,
    /// Names of the validation sets
    pub eval_names: Option<Vec<String>>,
    /// Per-eval-set sample weights
    pub eval_sample_weight: Option<PerEval<Array1<f64>>>,
    /// Per-eval-set class weights (classification only)
    pub eval_class_weight: Option<PerEval<ClassWeight<L>>>,
    /// Per-eval-set initial scores
    pub eval_init_score: Option<PerEval<Array1<f64>>>,
    /// Per-eval-set query group sizes (ranking only)
    pub eval_group: Option<PerEval<Vec<usize>>>,
    /// Additional builtin or custom evaluation metrics
    pub eval_metric: Vec<EvalMetric>,
    /// Stop when no validation metric improves for this many rounds
    pub early_stopping_rounds: Option<usize>,
    /// Evaluation logging period
    pub verbose: VerboseEval,
    /// Feature names
    pub feature_name: FeatureName,
    /// Categorical features
    pub categorical_feature: CategoricalFeature,
    /// Per-iteration callbacks
    pub callbacks: Vec<Callback>,
    /// Model to continue training from
    pub init_model: Option<InitModel<E::Booster>>,
}

impl<E: Engine, L> Default for FitOptions<E, L> {
    fn default() -> Self {
        FitOptions {
            gp_model: None,
            use_gp_model_for_validation: true,
            train_gp_model_cov_pars: true,
            sample_weight: None,
            init_score: None,
            group: None,
            eval_set: Vec::new(),
            eval_names: None,
            eval_sample_weight: None,
            eval_class_weight: None,
            eval_init_score: None,
            eval_group: None,
            eval_metric: Vec::new(),
            early_stopping_rounds: None,
            verbose: VerboseEval::default(),
            feature_name: FeatureName::Auto,
            categorical_feature: CategoricalFeature::Auto,
            callbacks: Vec::new(),
            init_model: None,
        }
    }
}

impl<E: Engine, L> FitOptions<E, L> {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a latent-effects model
    pub fn with_gp_model(mut self, gp_model: E::GpModel) -> Self {
        self.gp_model = Some(gp_model);
        self
    }

    /// Toggle use of the latent-effects model for validation
    pub fn with_use_gp_model_for_validation(mut self, enabled: bool) -> Self {
        self.use_gp_model_for_validation = enabled;
        self
    }

    /// Toggle covariance parameter estimation during boosting
    pub fn with_train_gp_model_cov_pars(mut self, enabled: bool) -> Self {
        self.train_gp_model_cov_pars = enabled;
        self
    }

    /// Set training sample weights
    pub fn with_sample_weight(mut self, weight: Array1<f64>) -> Self {
        self.sample_weight = Some(weight);
        self
    }

    /// Set initial training scores
    pub fn with_init_score(mut self, init_score: Array1<f64>) -> Self {
        self.init_score = Some(init_score);
        self
    }

    /// Set training query group sizes
    pub fn with_group(mut self, group: Vec<usize>) -> Self {
        self.group = Some(group);
        self
    }

    /// Add a validation set
    pub fn with_eval_set(mut self, eval_set: EvalSet<L>) -> Self {
        self.eval_set.push(eval_set);
        self
    }

    /// Name the validation sets
    pub fn with_eval_names<S: Into<String>>(mut self, names: Vec<S>) -> Self {
        self.eval_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set per-eval-set sample weights
    pub fn with_eval_sample_weight<W: Into<PerEval<Array1<f64>>>>(mut self, weights: W) -> Self {
        self.eval_sample_weight = Some(weights.into());
        self
    }

    /// Set per-eval-set class weights
    pub fn with_eval_class_weight<W: Into<PerEval<ClassWeight<L>>>>(mut self, weights: W) -> Self {
        self.eval_class_weight = Some(weights.into());
        self
    }

    /// Set per-eval-set initial scores
    pub fn with_eval_init_score<S: Into<PerEval<Array1<f64>>>>(mut self, scores: S) -> Self {
        self.eval_init_score = Some(scores.into());
        self
    }

    /// Set per-eval-set query group sizes
    pub fn with_eval_group<G: Into<PerEval<Vec<usize>>>>(mut self, groups: G) -> Self {
        self.eval_group = Some(groups.into());
        self
    }

    /// Add an evaluation metric
    pub fn with_eval_metric<M: Into<EvalMetric>>(mut self, metric: M) -> Self {
        self.eval_metric.push(metric.into());
        self
    }

    /// Enable early stopping
    pub fn with_early_stopping_rounds(mut self, rounds: usize) -> Self {
        self.early_stopping_rounds = Some(rounds);
        self
    }

    /// Set the evaluation logging period
    pub fn with_verbose(mut self, verbose: VerboseEval) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set feature names
    pub fn with_feature_name<S: Into<String>>(mut self, names: Vec<S>) -> Self {
        self.feature_name = FeatureName::Names(names.into_iter().map(Into::into).collect());
        self
    }

    /// Select categorical features
    pub fn with_categorical_feature(mut self, categorical: CategoricalFeature) -> Self {
        self.categorical_feature = categorical;
        self
    }

    /// Add a training callback
    pub fn with_callback(mut self, callback: Callback) -> Self {
        self.callbacks.push(callback);
        self
    }

    /// Continue training from an existing model
    pub fn with_init_model(mut self, init_model: InitModel<E::Booster>) -> Self {
        self.init_model = Some(init_model);
        self
    }
}

impl<E: Engine, L: fmt::Debug> fmt::Debug for FitOptions<E, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FitOptions")
            .field("gp_model", &self.gp_model)
            .field("use_gp_model_for_validation", &self.use_gp_model_for_validation)
            .field("train_gp_model_cov_pars", &self.train_gp_model_cov_pars)
            .field("sample_weight", &self.sample_weight)
            .field("group", &self.group)
            .field("eval_set", &self.eval_set)
            .field("eval_names", &self.eval_names)
            .field("eval_metric", &self.eval_metric)
            .field("early_stopping_rounds", &self.early_stopping_rounds)
            .field("verbose", &self.verbose)
            .field("feature_name", &self.feature_name)
            .field("categorical_feature", &self.categorical_feature)
            .field("num_callbacks", &self.callbacks.len())
            .field("init_model", &self.init_model)
            .finish_non_exhaustive()
    }
}

impl<B> InitModel<B> {
    /// Continue from the booster of a fitted estimator.
    pub fn from_estimator<E, T>(estimator: GPBoostModel<E, T>) -> Result<Self>
    where
        E: Engine<Booster = B>,
        T: TaskStrategy,
    {
        estimator.into_booster().map(InitModel::Booster)
    }
}

impl<B> From<PathBuf> for InitModel<B> {
    fn from(path: PathBuf) -> Self {
        InitModel::File(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockEngine;
    use ndarray::array;

    #[test]
    fn test_defaults() {
        let options: FitOptions<MockEngine, f64> = FitOptions::new();
        assert!(options.use_gp_model_for_validation);
        assert!(options.train_gp_model_cov_pars);
        assert!(options.eval_set.is_empty());
        assert_eq!(options.verbose, VerboseEval::Flag(true));
        assert!(options.early_stopping_rounds.is_none());
    }

    #[test]
    fn test_builder_accumulates() {
        let options: FitOptions<MockEngine, f64> = FitOptions::new()
            .with_eval_set(EvalSet::Training)
            .with_eval_set(EvalSet::new(array![[1.0]], array![1.0]))
            .with_eval_names(vec!["train", "valid"])
            .with_eval_metric("l1")
            .with_eval_sample_weight(vec![array![1.0], array![2.0]])
            .with_early_stopping_rounds(5)
            .with_feature_name(vec!["a"]);
        assert_eq!(options.eval_set.len(), 2);
        assert_eq!(options.eval_names.as_ref().map(Vec::len), Some(2));
        assert_eq!(options.eval_metric.len(), 1);
        assert_eq!(options.early_stopping_rounds, Some(5));
        assert_eq!(options.feature_name, FeatureName::Names(vec!["a".into()]));
        assert!(format!("{:?}", options).contains("FitOptions"));
    }
}
