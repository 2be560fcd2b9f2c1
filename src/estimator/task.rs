//! Task strategies composed into the generic estimator.
//!
//! A [`TaskStrategy`] contributes the task-specific steps of fitting and
//! predicting: input checks, label preparation, the default objective, and
//! post-processing of booster output. State a strategy derives from the
//! training labels is handed back as `Pending` and only committed after
//! the engine has trained successfully.

use crate::boosting::EvalMetric;
use crate::config::Objective;
use crate::core::error::Result;
use crate::core::traits::Engine;
use crate::core::types::TaskKind;
use crate::dataset::{ClassLabel, ClassWeight, EvalSet, Features, PerEval};
use crate::estimator::options::FitOptions;
use crate::prediction::{PredictOptions, Prediction};
use ndarray::Array1;
use std::fmt::Debug;

/// An eval set after label preparation.
#[derive(Debug, Clone)]
pub enum PreparedEvalSet {
    /// Reuse the training dataset handle
    Training,
    /// A separate validation sample with encoded labels
    Data {
        /// Validation features
        features: Features,
        /// Encoded labels
        labels: Array1<f64>,
        /// Sample weights derived from this set's class weight
        class_sample_weight: Option<Array1<f64>>,
    },
}

/// Labels and derived state produced by [`TaskStrategy::prepare_labels`].
#[derive(Debug)]
pub struct PreparedFit<P> {
    /// Encoded training labels
    pub labels: Array1<f64>,
    /// Sample weights derived from the estimator's class weight
    pub class_sample_weight: Option<Array1<f64>>,
    /// Prepared eval sets, in caller order
    pub eval_sets: Vec<PreparedEvalSet>,
    /// Number of classes for classification
    pub n_classes: Option<usize>,
    /// Task state committed after a successful fit
    pub pending: P,
}

impl PreparedFit<()> {
    /// Real-valued labels passed through unchanged.
    pub fn passthrough(labels: Array1<f64>, eval_set: Vec<EvalSet<f64>>) -> Self {
        let eval_sets = eval_set
            .into_iter()
            .map(|eval| match eval {
                EvalSet::Training => PreparedEvalSet::Training,
                EvalSet::Data { features, labels } => PreparedEvalSet::Data {
                    features,
                    labels,
                    class_sample_weight: None,
                },
            })
            .collect();
        PreparedFit {
            labels,
            class_sample_weight: None,
            eval_sets,
            n_classes: None,
            pending: (),
        }
    }
}

/// Facts about the fitted model that prediction post-processing needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictContext {
    /// The model was trained with a caller objective
    pub custom_objective: bool,
    /// The booster has a latent-effects model attached
    pub has_gp_model: bool,
}

/// Task-specific behaviour of an estimator.
pub trait TaskStrategy: Debug + Default {
    /// Label type accepted by `fit`.
    type Target: ClassLabel;
    /// State derived from the labels, committed after a successful fit.
    type Pending;
    /// Output of `predict`.
    type Output;

    /// Which task this is.
    const KIND: TaskKind;

    /// Reject inputs that make no sense for this task.
    fn validate_task_inputs<E: Engine>(
        &self,
        labels: &Array1<Self::Target>,
        options: &FitOptions<E, Self::Target>,
    ) -> Result<()>;

    /// Encode labels and derive class weights for training and eval sets.
    fn prepare_labels(
        &self,
        labels: Array1<Self::Target>,
        class_weight: Option<&ClassWeight<Self::Target>>,
        eval_set: Vec<EvalSet<Self::Target>>,
        eval_class_weight: Option<PerEval<ClassWeight<Self::Target>>>,
    ) -> Result<PreparedFit<Self::Pending>>;

    /// Objective used for this fit.
    fn resolve_objective(&self, configured: Option<&Objective>, _n_classes: Option<usize>) -> Objective {
        configured
            .cloned()
            .unwrap_or_else(|| Objective::Builtin(Self::KIND.default_objective().to_string()))
    }

    /// Adjust builtin eval metric names for this fit.
    fn adapt_eval_metric(&self, metrics: Vec<EvalMetric>, _n_classes: Option<usize>) -> Vec<EvalMetric> {
        metrics
    }

    /// Evaluation positions forwarded as `eval_at`, if the task has them.
    fn eval_at(&self) -> Option<&[usize]> {
        None
    }

    /// Store the state derived by `prepare_labels`.
    fn commit(&mut self, pending: Self::Pending);

    /// Turn booster output into the task's prediction.
    fn finish_prediction(
        &self,
        prediction: Prediction,
        options: &PredictOptions,
        context: PredictContext,
    ) -> Result<Self::Output>;
}
