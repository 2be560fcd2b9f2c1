//! Classification task: label encoding, class weights and probability
//! post-processing.

use crate::boosting::EvalMetric;
use crate::config::Objective;
use crate::core::constants::{MULTICLASS_OBJECTIVE, OVA_OBJECTIVES};
use crate::core::error::{GPBoostError, Result};
use crate::core::traits::Engine;
use crate::core::types::TaskKind;
use crate::dataset::{
    assert_all_finite, check_classification_targets, compute_sample_weight, ClassLabel,
    ClassWeight, EvalSet, Features, LabelEncoder, PerEval,
};
use crate::estimator::options::FitOptions;
use crate::estimator::task::{PredictContext, PreparedEvalSet, PreparedFit, TaskStrategy};
use crate::estimator::GPBoostModel;
use crate::prediction::{PredictOptions, Prediction};
use log::warn;
use ndarray::{Array1, Array2, ArrayView1};

/// Output of [`GPBoostModel::predict`] for classifiers.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierOutput<L> {
    /// Predicted class labels
    Labels(Array1<L>),
    /// Raw booster output (raw scores, leaves, contributions, or scores of
    /// a custom objective)
    Raw(Prediction),
}

impl<L> ClassifierOutput<L> {
    /// Predicted labels, if labels were produced.
    pub fn labels(&self) -> Option<&Array1<L>> {
        match self {
            ClassifierOutput::Labels(labels) => Some(labels),
            ClassifierOutput::Raw(_) => None,
        }
    }

    /// Raw booster output, if no labels were produced.
    pub fn raw(&self) -> Option<&Prediction> {
        match self {
            ClassifierOutput::Labels(_) => None,
            ClassifierOutput::Raw(prediction) => Some(prediction),
        }
    }
}

/// Discrete class labels of type `L`.
#[derive(Debug, Clone)]
pub struct ClassificationTask<L> {
    encoder: Option<LabelEncoder<L>>,
}

impl<L> Default for ClassificationTask<L> {
    fn default() -> Self {
        ClassificationTask { encoder: None }
    }
}

/// Columns `[1 - p, p]` for positive-class probabilities `p`.
fn two_class_matrix(p: ArrayView1<'_, f64>) -> Array2<f64> {
    let mut matrix = Array2::zeros((p.len(), 2));
    for (mut row, &value) in matrix.rows_mut().into_iter().zip(p.iter()) {
        row[0] = 1.0 - value;
        row[1] = value;
    }
    matrix
}

/// Index of the largest entry; ties go to the lowest index.
fn argmax(row: ArrayView1<'_, f64>) -> usize {
    let mut best = 0;
    for (index, &value) in row.iter().enumerate() {
        if value > row[best] {
            best = index;
        }
    }
    best
}

fn rename_metric(name: String, n_classes: usize) -> String {
    let multiclass = n_classes > 2;
    match name.as_str() {
        "logloss" | "binary_logloss" if multiclass => "multi_logloss".into(),
        "error" | "binary_error" if multiclass => "multi_error".into(),
        "logloss" | "multi_logloss" if !multiclass => "binary_logloss".into(),
        "error" | "multi_error" if !multiclass => "binary_error".into(),
        _ => name,
    }
}

impl<L: ClassLabel> ClassificationTask<L> {
    fn encoder(&self) -> Result<&LabelEncoder<L>> {
        self.encoder
            .as_ref()
            .ok_or_else(|| GPBoostError::not_fitted("classes"))
    }

    /// Sorted classes seen during fit.
    pub fn classes(&self) -> Result<&[L]> {
        self.encoder().map(LabelEncoder::classes)
    }

    /// Number of classes seen during fit.
    pub fn n_classes(&self) -> Result<usize> {
        self.encoder().map(LabelEncoder::n_classes)
    }

    /// Class probabilities from booster output.
    ///
    /// Raw scores pass through unchanged for custom objectives, raw / leaf /
    /// contribution requests, multi-class models and latent-effects models.
    pub fn probabilities(
        &self,
        prediction: Prediction,
        options: &PredictOptions,
        context: PredictContext,
    ) -> Result<Prediction> {
        if context.custom_objective && !options.wants_raw_output() {
            warn!(
                "Cannot compute class probabilities or labels due to the usage of customized \
                 objective function. Returning raw scores instead."
            );
            return Ok(prediction);
        }
        if self.n_classes()? > 2 || options.wants_raw_output() || context.has_gp_model {
            return Ok(prediction);
        }
        Ok(match prediction {
            Prediction::Values(p) => Prediction::Matrix(two_class_matrix(p.view())),
            other => other,
        })
    }

    fn class_scores(&self, prediction: Prediction) -> Result<Array2<f64>> {
        let multiclass = self.n_classes()? > 2;
        match prediction {
            Prediction::Matrix(matrix) => Ok(matrix),
            Prediction::Values(p) if !multiclass => Ok(two_class_matrix(p.view())),
            Prediction::Values(_) => Err(GPBoostError::prediction(
                "expected one probability column per class",
            )),
            Prediction::Latent(latent) if multiclass => latent
                .response_mean
                .ok_or_else(|| GPBoostError::prediction("latent prediction has no response_mean")),
            Prediction::Latent(latent) => latent
                .response_mean_values()
                .map(|p| two_class_matrix(p.view()))
                .ok_or_else(|| GPBoostError::prediction("latent prediction has no response_mean")),
        }
    }
}

impl<L: ClassLabel> TaskStrategy for ClassificationTask<L> {
    type Target = L;
    type Pending = LabelEncoder<L>;
    type Output = ClassifierOutput<L>;

    const KIND: TaskKind = TaskKind::Classification;

    fn validate_task_inputs<E: Engine>(&self, _labels: &Array1<L>, options: &FitOptions<E, L>) -> Result<()> {
        if options.group.is_some() {
            return Err(GPBoostError::invalid_parameter(
                "group",
                "set",
                "not supported for classification",
            ));
        }
        if options.eval_group.is_some() {
            return Err(GPBoostError::invalid_parameter(
                "eval_group",
                "set",
                "not supported for classification",
            ));
        }
        Ok(())
    }

    fn prepare_labels(
        &self,
        labels: Array1<L>,
        class_weight: Option<&ClassWeight<L>>,
        eval_set: Vec<EvalSet<L>>,
        eval_class_weight: Option<PerEval<ClassWeight<L>>>,
    ) -> Result<PreparedFit<LabelEncoder<L>>> {
        assert_all_finite(&labels)?;
        check_classification_targets(&labels)?;

        let encoder = LabelEncoder::fit(&labels);
        let encoded = encoder.transform(&labels)?;
        let class_sample_weight = class_weight
            .map(|weights| compute_sample_weight(weights, &labels))
            .transpose()?;

        let mut eval_sets = Vec::with_capacity(eval_set.len());
        for (index, eval) in eval_set.into_iter().enumerate() {
            match eval {
                EvalSet::Training => eval_sets.push(PreparedEvalSet::Training),
                EvalSet::Data { features, labels } => {
                    let class_sample_weight = eval_class_weight
                        .as_ref()
                        .and_then(|weights| weights.get(index))
                        .map(|weights| compute_sample_weight(weights, &labels))
                        .transpose()?;
                    eval_sets.push(PreparedEvalSet::Data {
                        features,
                        labels: encoder.transform(&labels)?,
                        class_sample_weight,
                    });
                }
            }
        }

        Ok(PreparedFit {
            labels: encoded,
            class_sample_weight,
            eval_sets,
            n_classes: Some(encoder.n_classes()),
            pending: encoder,
        })
    }

    fn resolve_objective(&self, configured: Option<&Objective>, n_classes: Option<usize>) -> Objective {
        let objective = configured
            .cloned()
            .unwrap_or_else(|| Objective::Builtin(Self::KIND.default_objective().to_string()));
        match (&objective, n_classes) {
            (Objective::Builtin(name), Some(n)) if n > 2 && !OVA_OBJECTIVES.contains(&name.as_str()) => {
                Objective::Builtin(MULTICLASS_OBJECTIVE.to_string())
            }
            _ => objective,
        }
    }

    fn adapt_eval_metric(&self, metrics: Vec<EvalMetric>, n_classes: Option<usize>) -> Vec<EvalMetric> {
        let n_classes = n_classes.unwrap_or(2);
        metrics
            .into_iter()
            .map(|metric| match metric {
                EvalMetric::Builtin(name) => EvalMetric::Builtin(rename_metric(name, n_classes)),
                custom => custom,
            })
            .collect()
    }

    fn commit(&mut self, pending: LabelEncoder<L>) {
        self.encoder = Some(pending);
    }

    fn finish_prediction(
        &self,
        prediction: Prediction,
        options: &PredictOptions,
        context: PredictContext,
    ) -> Result<ClassifierOutput<L>> {
        let result = self.probabilities(prediction, options, context)?;
        if context.custom_objective || options.wants_raw_output() {
            return Ok(ClassifierOutput::Raw(result));
        }
        let scores = self.class_scores(result)?;
        if scores.ncols() == 0 {
            return Err(GPBoostError::prediction("booster returned no class columns"));
        }
        let codes: Vec<usize> = scores.rows().into_iter().map(argmax).collect();
        self.encoder()?
            .inverse_transform(&codes)
            .map(ClassifierOutput::Labels)
    }
}

impl<E: Engine, L: ClassLabel> GPBoostModel<E, ClassificationTask<L>> {
    /// Predicted probability of each class for each sample.
    ///
    /// Binary models return two columns `[1 - p, p]`; multi-class models
    /// one column per class. Raw output is returned unchanged for custom
    /// objectives and for raw / leaf / contribution requests.
    pub fn predict_proba<X: Into<Features>>(&self, features: X, options: &PredictOptions) -> Result<Prediction> {
        let features = features.into();
        let prediction = self.base_predict(&features, options)?;
        self.task
            .probabilities(prediction, options, self.predict_context()?)
    }

    /// Sorted class labels seen during fit.
    pub fn classes(&self) -> Result<&[L]> {
        self.task.classes()
    }

    /// Number of classes seen during fit.
    pub fn n_classes(&self) -> Result<usize> {
        self.task.n_classes()
    }

    /// Set the class weight.
    pub fn with_class_weight(mut self, class_weight: ClassWeight<L>) -> Self {
        self.class_weight = Some(class_weight);
        self
    }

    /// Replace the class weight.
    pub fn set_class_weight(&mut self, class_weight: Option<ClassWeight<L>>) -> &mut Self {
        self.class_weight = class_weight;
        self
    }

    /// Current class weight.
    pub fn class_weight(&self) -> Option<&ClassWeight<L>> {
        self.class_weight.as_ref()
    }
}
