//! In-memory engine for exercising the estimators.
//!
//! [`MockEngine`] implements the engine traits with a constant-per-class
//! model fitted by Newton steps. It honours the parts of the training
//! contract the estimators rely on (parameter map, validation handles,
//! custom objectives and metrics, callbacks, early stopping, latent-effects
//! output) and records every training request for inspection. It does not
//! grow trees.

use crate::boosting::{
    BestScore, CallbackEnv, EvalRecord, EvalResult, EvalsResult, InitModel, TrainOutput,
    TrainRequest,
};
use crate::config::{ParamMap, ParamValue};
use crate::core::constants::{AUTO_FEATURE_PREFIX, CUSTOM_OBJECTIVE_SENTINEL, OVA_OBJECTIVES};
use crate::core::error::{GPBoostError, Result};
use crate::core::traits::{Booster, Engine, TrainingData};
use crate::core::types::ImportanceType;
use crate::dataset::{CategoricalFeature, DatasetParts, FeatureName};
use crate::prediction::{LatentPrediction, PredictOptions, Prediction};
use log::{debug, info};
use ndarray::{Array1, Array2, ArrayView1};
use std::sync::{Arc, Mutex, PoisonError};

const MIN_HESSIAN: f64 = 1e-16;
const PROBABILITY_EPS: f64 = 1e-15;

/// Dataset handle of the [`MockEngine`].
#[derive(Debug, Clone)]
pub struct MockDataset {
    num_data: usize,
    num_features: usize,
    column_names: Option<Vec<String>>,
    label: Option<Array1<f64>>,
    weight: Option<Array1<f64>>,
    group: Option<Vec<usize>>,
    init_score: Option<Array1<f64>>,
    categorical_feature: CategoricalFeature,
    params: ParamMap,
}

impl MockDataset {
    /// Number of feature columns.
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Initial scores attached to the dataset.
    pub fn init_score(&self) -> Option<&Array1<f64>> {
        self.init_score.as_ref()
    }

    /// Categorical feature selection.
    pub fn categorical_feature(&self) -> &CategoricalFeature {
        &self.categorical_feature
    }

    /// Parameter map the dataset was built with.
    pub fn params(&self) -> &ParamMap {
        &self.params
    }
}

impl TrainingData for MockDataset {
    fn num_data(&self) -> usize {
        self.num_data
    }

    fn label(&self) -> Option<ArrayView1<'_, f64>> {
        self.label.as_ref().map(|l| l.view())
    }

    fn weight(&self) -> Option<ArrayView1<'_, f64>> {
        self.weight.as_ref().map(|w| w.view())
    }

    fn group(&self) -> Option<&[usize]> {
        self.group.as_deref()
    }
}

/// Latent-effects model of the [`MockEngine`]: one shared random effect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockGpModel {
    /// Predicted random effect added to every sample
    pub random_effect: f64,
    /// Predictive variance reported for every sample
    pub variance: f64,
}

/// Snapshot of one training request.
#[derive(Debug, Clone)]
pub struct TrainRecord {
    /// Parameter map sent to the engine
    pub params: ParamMap,
    /// Requested number of boosting rounds
    pub num_boost_round: usize,
    /// Training labels
    pub train_label: Option<Array1<f64>>,
    /// Training weights
    pub train_weight: Option<Array1<f64>>,
    /// Training query groups
    pub train_group: Option<Vec<usize>>,
    /// Training initial scores
    pub train_init_score: Option<Array1<f64>>,
    /// Categorical features of the training set
    pub categorical_feature: CategoricalFeature,
    /// Per validation set: whether it is the training handle itself
    pub valid_shares_train: Vec<bool>,
    /// Per validation set labels
    pub valid_labels: Vec<Option<Array1<f64>>>,
    /// Per validation set weights
    pub valid_weights: Vec<Option<Array1<f64>>>,
    /// Per validation set query groups
    pub valid_groups: Vec<Option<Vec<usize>>>,
    /// Per validation set initial scores
    pub valid_init_scores: Vec<Option<Array1<f64>>>,
    /// Validation set names
    pub valid_names: Option<Vec<String>>,
    /// Early stopping rounds
    pub early_stopping_rounds: Option<usize>,
    /// Whether a custom objective was supplied
    pub has_fobj: bool,
    /// Number of custom metrics
    pub num_feval: usize,
    /// Whether a latent-effects model was supplied
    pub has_gp_model: bool,
    /// Latent-effects toggle for validation
    pub use_gp_model_for_validation: bool,
    /// Covariance parameter estimation toggle
    pub train_gp_model_cov_pars: bool,
    /// Feature names
    pub feature_name: FeatureName,
    /// Number of callbacks
    pub num_callbacks: usize,
    /// Whether training continued from an existing model
    pub has_init_model: bool,
}

/// Engine backed by a constant-per-class model.
///
/// Clones share the request log and the failure switch.
#[derive(Debug, Clone, Default)]
pub struct MockEngine {
    log: Arc<Mutex<Vec<TrainRecord>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockEngine {
    /// Engine that trains successfully.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose training always fails with `message`.
    pub fn failing<S: Into<String>>(message: S) -> Self {
        MockEngine {
            log: Arc::default(),
            failure: Arc::new(Mutex::new(Some(message.into()))),
        }
    }

    /// Make subsequent training runs fail, or succeed again with `None`.
    pub fn set_failure(&self, message: Option<String>) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = message;
    }

    /// All recorded training requests.
    pub fn records(&self) -> Vec<TrainRecord> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The most recent training request.
    pub fn last_record(&self) -> Option<TrainRecord> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectiveKind {
    Regression,
    Binary,
    Multiclass,
    MulticlassOva,
    Ranking,
    Custom,
}

impl ObjectiveKind {
    fn from_name(name: &str) -> Self {
        match name {
            CUSTOM_OBJECTIVE_SENTINEL => ObjectiveKind::Custom,
            "binary" | "cross_entropy" | "xentropy" => ObjectiveKind::Binary,
            "multiclass" | "softmax" => ObjectiveKind::Multiclass,
            "lambdarank" | "rank_xendcg" => ObjectiveKind::Ranking,
            other if OVA_OBJECTIVES.contains(&other) => ObjectiveKind::MulticlassOva,
            _ => ObjectiveKind::Regression,
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exp.iter().sum();
    exp.into_iter().map(|e| e / total).collect()
}

/// Per-class response for one constant raw score vector.
fn transform(kind: ObjectiveKind, scores: &[f64]) -> Vec<f64> {
    match kind {
        ObjectiveKind::Binary | ObjectiveKind::MulticlassOva => scores.iter().map(|&s| sigmoid(s)).collect(),
        ObjectiveKind::Multiclass => softmax(scores),
        _ => scores.to_vec(),
    }
}

fn class_probabilities(kind: ObjectiveKind, scores: &[f64]) -> Vec<f64> {
    match kind {
        ObjectiveKind::Multiclass => softmax(scores),
        ObjectiveKind::MulticlassOva => {
            let p: Vec<f64> = scores.iter().map(|&s| sigmoid(s)).collect();
            let total: f64 = p.iter().sum();
            p.into_iter().map(|v| v / total).collect()
        }
        _ => {
            let p = sigmoid(scores.first().copied().unwrap_or(0.0));
            vec![1.0 - p, p]
        }
    }
}

fn weighted_mean<F: Fn(usize, f64) -> f64>(labels: ArrayView1<'_, f64>, weight: Option<ArrayView1<'_, f64>>, f: F) -> f64 {
    let mut total = 0.0;
    let mut weight_sum = 0.0;
    for (i, &y) in labels.iter().enumerate() {
        let w = weight.map_or(1.0, |w| w[i]);
        total += w * f(i, y);
        weight_sum += w;
    }
    if weight_sum > 0.0 {
        total / weight_sum
    } else {
        0.0
    }
}

fn param_list(params: &ParamMap, key: &str) -> Vec<ParamValue> {
    match params.get(key) {
        Some(ParamValue::List(items)) => items.clone(),
        Some(ParamValue::Null) | None => Vec::new(),
        Some(value) => vec![value.clone()],
    }
}

/// Builtin metrics of the mock engine, by canonical name.
fn evaluate_builtin(
    metric: &str,
    kind: ObjectiveKind,
    scores: &[f64],
    data: &MockDataset,
    params: &ParamMap,
) -> Vec<EvalResult> {
    let labels = match data.label() {
        Some(labels) => labels,
        None => return Vec::new(),
    };
    let weight = data.weight();
    let raw = scores.first().copied().unwrap_or(0.0);
    let probs = class_probabilities(kind, scores);
    let prob_of = |y: f64| -> f64 {
        let index = y.max(0.0) as usize;
        probs.get(index).copied().unwrap_or(0.0).clamp(PROBABILITY_EPS, 1.0 - PROBABILITY_EPS)
    };
    let predicted_class = probs
        .iter()
        .enumerate()
        .fold(0, |best, (i, &p)| if p > probs[best] { i } else { best });

    match metric {
        "l2" | "mse" | "mean_squared_error" | "regression" | "regression_l2" => {
            vec![EvalResult::new("l2", weighted_mean(labels, weight, |_, y| (raw - y).powi(2)), false)]
        }
        "l1" | "mae" | "mean_absolute_error" | "regression_l1" => {
            vec![EvalResult::new("l1", weighted_mean(labels, weight, |_, y| (raw - y).abs()), false)]
        }
        "binary_logloss" | "binary" => vec![EvalResult::new(
            "binary_logloss",
            weighted_mean(labels, weight, |_, y| -prob_of(y).ln()),
            false,
        )],
        "binary_error" => vec![EvalResult::new(
            "binary_error",
            weighted_mean(labels, weight, |_, y| if (probs[1] > 0.5) != (y > 0.5) { 1.0 } else { 0.0 }),
            false,
        )],
        "multi_logloss" | "multiclass" | "softmax" | "multiclassova" => vec![EvalResult::new(
            "multi_logloss",
            weighted_mean(labels, weight, |_, y| -prob_of(y).ln()),
            false,
        )],
        "multi_error" => vec![EvalResult::new(
            "multi_error",
            weighted_mean(labels, weight, |_, y| if predicted_class as f64 != y { 1.0 } else { 0.0 }),
            false,
        )],
        "ndcg" | "lambdarank" | "map" => {
            let name = if metric == "map" { "map" } else { "ndcg" };
            let positions = param_list(params, "eval_at");
            if positions.is_empty() {
                vec![EvalResult::new(name, 1.0, true)]
            } else {
                positions
                    .iter()
                    .map(|k| EvalResult::new(format!("{}@{}", name, k), 1.0, true))
                    .collect()
            }
        }
        "auc" => vec![EvalResult::new("auc", 0.5, true)],
        other => {
            debug!("Mock engine ignores metric {}", other);
            Vec::new()
        }
    }
}

/// Sum of weighted gradients and hessians per class for the builtin objectives.
fn builtin_gradients(kind: ObjectiveKind, scores: &[f64], data: &MockDataset) -> Result<(Vec<f64>, Vec<f64>)> {
    let labels = data
        .label()
        .ok_or_else(|| GPBoostError::engine("training data has no label"))?;
    let weight = data.weight();
    let num_class = scores.len();
    let mut grad = vec![0.0; num_class];
    let mut hess = vec![0.0; num_class];
    for (i, &y) in labels.iter().enumerate() {
        let w = weight.map_or(1.0, |w| w[i]);
        match kind {
            ObjectiveKind::Binary => {
                let p = sigmoid(scores[0]);
                grad[0] += w * (p - y);
                hess[0] += w * (p * (1.0 - p)).max(MIN_HESSIAN);
            }
            ObjectiveKind::Multiclass | ObjectiveKind::MulticlassOva => {
                let p = transform(kind, scores);
                for k in 0..num_class {
                    let target = if y as usize == k { 1.0 } else { 0.0 };
                    grad[k] += w * (p[k] - target);
                    hess[k] += w * (p[k] * (1.0 - p[k])).max(MIN_HESSIAN);
                }
            }
            _ => {
                grad[0] += w * (scores[0] - y);
                hess[0] += w;
            }
        }
    }
    Ok((grad, hess))
}

fn validate_dataset(parts: &DatasetParts) -> Result<()> {
    let num_data = parts.features.num_rows();
    if let Some(label) = &parts.label {
        if label.len() != num_data {
            return Err(GPBoostError::dataset(format!(
                "Length of label ({}) is not the same as #data ({})",
                label.len(),
                num_data
            )));
        }
    }
    if let Some(weight) = &parts.weight {
        if weight.len() != num_data {
            return Err(GPBoostError::dimension_mismatch(
                format!("{} weights", num_data),
                format!("{} weights", weight.len()),
            ));
        }
    }
    if let Some(group) = &parts.group {
        let total: usize = group.iter().sum();
        if total != num_data {
            return Err(GPBoostError::dimension_mismatch(
                format!("sum of query counts = {}", num_data),
                format!("sum of query counts = {}", total),
            ));
        }
    }
    if let Some(init_score) = &parts.init_score {
        if num_data == 0 || init_score.len() % num_data != 0 {
            return Err(GPBoostError::dataset(format!(
                "Initial score size ({}) is not a multiple of #data ({})",
                init_score.len(),
                num_data
            )));
        }
    }
    Ok(())
}

impl Engine for MockEngine {
    type Dataset = MockDataset;
    type Booster = MockBooster;
    type GpModel = MockGpModel;

    fn construct_dataset(&self, parts: DatasetParts, params: &ParamMap) -> Result<MockDataset> {
        validate_dataset(&parts)?;
        Ok(MockDataset {
            num_data: parts.features.num_rows(),
            num_features: parts.features.num_columns(),
            column_names: parts.features.column_names(),
            label: parts.label,
            weight: parts.weight,
            group: parts.group,
            init_score: parts.init_score,
            categorical_feature: parts.categorical_feature,
            params: params.clone(),
        })
    }

    fn train(&self, request: TrainRequest<Self>) -> Result<TrainOutput<MockBooster>> {
        let TrainRequest {
            params,
            train_set,
            num_boost_round,
            gp_model,
            use_gp_model_for_validation,
            train_gp_model_cov_pars,
            valid_sets,
            valid_names,
            early_stopping_rounds,
            fobj,
            feval,
            verbose_eval,
            feature_name,
            mut callbacks,
            init_model,
        } = request;

        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(TrainRecord {
                params: params.clone(),
                num_boost_round,
                train_label: train_set.label.clone(),
                train_weight: train_set.weight.clone(),
                train_group: train_set.group.clone(),
                train_init_score: train_set.init_score.clone(),
                categorical_feature: train_set.categorical_feature.clone(),
                valid_shares_train: valid_sets.iter().map(|v| Arc::ptr_eq(v, &train_set)).collect(),
                valid_labels: valid_sets.iter().map(|v| v.label.clone()).collect(),
                valid_weights: valid_sets.iter().map(|v| v.weight.clone()).collect(),
                valid_groups: valid_sets.iter().map(|v| v.group.clone()).collect(),
                valid_init_scores: valid_sets.iter().map(|v| v.init_score.clone()).collect(),
                valid_names: valid_names.clone(),
                early_stopping_rounds,
                has_fobj: fobj.is_some(),
                num_feval: feval.len(),
                has_gp_model: gp_model.is_some(),
                use_gp_model_for_validation,
                train_gp_model_cov_pars,
                feature_name: feature_name.clone(),
                num_callbacks: callbacks.len(),
                has_init_model: init_model.is_some(),
            });

        if let Some(message) = self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(GPBoostError::engine(message));
        }

        let objective = params
            .get("objective")
            .and_then(ParamValue::as_str)
            .unwrap_or("regression");
        let kind = ObjectiveKind::from_name(objective);
        let num_class = params
            .get("num_class")
            .and_then(ParamValue::as_i64)
            .map_or(1, |n| n.max(1) as usize);
        let learning_rate = params
            .get("learning_rate")
            .and_then(ParamValue::as_f64)
            .unwrap_or(0.1);

        let num_data = train_set.num_data;
        if matches!(kind, ObjectiveKind::Multiclass | ObjectiveKind::MulticlassOva) {
            if let Some(label) = train_set.label() {
                if label.iter().any(|&y| y < 0.0 || y as usize >= num_class) {
                    return Err(GPBoostError::engine(format!(
                        "Label must be in [0, {}), but found out of range labels",
                        num_class
                    )));
                }
            }
        }
        if kind == ObjectiveKind::Ranking && train_set.group.is_none() {
            return Err(GPBoostError::engine("Ranking tasks require query information"));
        }

        let feature_names = match feature_name {
            FeatureName::Names(names) => {
                if names.len() != train_set.num_features {
                    return Err(GPBoostError::engine(format!(
                        "Length of feature_name({}) and num_feature({}) don't match",
                        names.len(),
                        train_set.num_features
                    )));
                }
                names
            }
            FeatureName::Auto => train_set.column_names.clone().unwrap_or_else(|| {
                (0..train_set.num_features)
                    .map(|j| format!("{}{}", AUTO_FEATURE_PREFIX, j))
                    .collect()
            }),
        };

        let mut scores = vec![0.0; num_class];
        let mut start_trees = 0;
        match init_model {
            Some(InitModel::Booster(previous)) if previous.scores.len() == num_class => {
                scores = previous.scores;
                start_trees = previous.num_trees;
            }
            Some(InitModel::Booster(_)) => {
                return Err(GPBoostError::engine("init model has a different number of classes"));
            }
            Some(InitModel::File(path)) => {
                debug!("Mock engine ignores init model file {}", path.display());
            }
            None => {}
        }

        let names: Vec<String> = valid_sets
            .iter()
            .enumerate()
            .map(|(i, set)| {
                valid_names
                    .as_ref()
                    .and_then(|names| names.get(i).cloned())
                    .unwrap_or_else(|| {
                        if Arc::ptr_eq(set, &train_set) {
                            "training".to_string()
                        } else {
                            format!("valid_{}", i)
                        }
                    })
            })
            .collect();
        let metrics: Vec<String> = param_list(&params, "metric")
            .iter()
            .filter_map(|m| m.as_str().map(str::to_string))
            .collect();
        let monitored = valid_sets
            .iter()
            .position(|set| !Arc::ptr_eq(set, &train_set));
        let early_stopping = early_stopping_rounds.filter(|&r| r > 0).and(monitored);

        let mut evals_result = EvalsResult::new();
        let mut best: Option<(f64, usize, Vec<EvalRecord>)> = None;
        let mut last_records = Vec::new();
        let mut num_trees = 0;
        let mut best_iteration = None;

        for iteration in 0..num_boost_round {
            let (grad, hess) = match &fobj {
                Some(fobj) => {
                    let mut flat = Array1::zeros(num_class * num_data);
                    for k in 0..num_class {
                        flat.slice_mut(ndarray::s![k * num_data..(k + 1) * num_data])
                            .fill(scores[k]);
                    }
                    let (g, h) = fobj.call(flat.view(), &*train_set)?;
                    if g.len() != num_class * num_data {
                        return Err(GPBoostError::engine(format!(
                            "custom objective returned {} gradients, expected {}",
                            g.len(),
                            num_class * num_data
                        )));
                    }
                    let sum_block = |v: &Array1<f64>, k: usize| -> f64 {
                        v.slice(ndarray::s![k * num_data..(k + 1) * num_data]).sum()
                    };
                    (
                        (0..num_class).map(|k| sum_block(&g, k)).collect::<Vec<_>>(),
                        (0..num_class).map(|k| sum_block(&h, k)).collect::<Vec<_>>(),
                    )
                }
                None => builtin_gradients(kind, &scores, &train_set)?,
            };
            for k in 0..num_class {
                if hess[k] > 0.0 {
                    scores[k] -= learning_rate * grad[k] / hess[k];
                }
            }
            num_trees = iteration + 1;

            let mut records = Vec::new();
            for (set, name) in valid_sets.iter().zip(&names) {
                for metric in &metrics {
                    for result in evaluate_builtin(metric, kind, &scores, set, &params) {
                        records.push(EvalRecord {
                            dataset_name: name.clone(),
                            result,
                        });
                    }
                }
                let mut flat = Array1::zeros(num_class * set.num_data);
                for k in 0..num_class {
                    flat.slice_mut(ndarray::s![k * set.num_data..(k + 1) * set.num_data])
                        .fill(scores[k]);
                }
                for wrapper in &feval {
                    for result in wrapper.call(flat.view(), &**set)? {
                        records.push(EvalRecord {
                            dataset_name: name.clone(),
                            result,
                        });
                    }
                }
            }
            for record in &records {
                evals_result
                    .entry(record.dataset_name.clone())
                    .or_default()
                    .entry(record.result.name.clone())
                    .or_default()
                    .push(record.result.value);
            }
            if verbose_eval.should_log(iteration) && !records.is_empty() {
                let line: Vec<String> = records
                    .iter()
                    .map(|r| format!("{}'s {}: {:.6}", r.dataset_name, r.result.name, r.result.value))
                    .collect();
                info!("[{}]\t{}", iteration + 1, line.join("\t"));
            }

            let mut stop = false;
            for callback in callbacks.iter_mut() {
                let env = CallbackEnv {
                    params: &params,
                    iteration,
                    begin_iteration: 0,
                    end_iteration: num_boost_round,
                    evaluation_result_list: &records,
                };
                match callback(&env) {
                    Ok(()) => {}
                    Err(GPBoostError::EarlyStopping { reason }) => {
                        info!("Training stopped by callback at iteration {}: {}", iteration + 1, reason);
                        best_iteration = Some(iteration + 1);
                        stop = true;
                    }
                    Err(err) => return Err(err),
                }
            }

            if let Some(index) = early_stopping {
                let name = &names[index];
                if let Some(record) = records.iter().find(|r| &r.dataset_name == name) {
                    let value = record.result.value;
                    let improved = match &best {
                        None => true,
                        Some((best_value, _, _)) if record.result.higher_better => value > *best_value,
                        Some((best_value, _, _)) => value < *best_value,
                    };
                    if improved {
                        best = Some((value, iteration, records.clone()));
                    } else if let Some((_, best_iter, _)) = &best {
                        if iteration - best_iter >= early_stopping_rounds.unwrap_or(0) {
                            info!("Early stopping, best iteration is: [{}]", best_iter + 1);
                            stop = true;
                        }
                    }
                }
            }

            last_records = records;
            if stop {
                break;
            }
        }

        let (best_iteration, score_records) = match (early_stopping, best) {
            (Some(_), Some((_, iteration, records))) => (Some(iteration + 1), records),
            _ => (best_iteration, last_records),
        };
        let mut best_score = BestScore::new();
        for record in score_records {
            best_score
                .entry(record.dataset_name)
                .or_default()
                .insert(record.result.name, record.result.value);
        }

        let num_features = train_set.num_features;
        Ok(TrainOutput {
            booster: MockBooster {
                scores,
                kind,
                num_trees: start_trees + num_trees,
                num_features,
                num_train_data: num_data,
                feature_names,
                best_iteration,
                best_score,
                train_set: Some(train_set),
                gp_model,
            },
            evals_result,
        })
    }
}

/// Model handle of the [`MockEngine`].
#[derive(Debug)]
pub struct MockBooster {
    scores: Vec<f64>,
    kind: ObjectiveKind,
    num_trees: usize,
    num_features: usize,
    num_train_data: usize,
    feature_names: Vec<String>,
    best_iteration: Option<usize>,
    best_score: BestScore,
    train_set: Option<Arc<MockDataset>>,
    gp_model: Option<MockGpModel>,
}

impl MockBooster {
    /// Raw score per class.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Number of boosting iterations, including those of an init model.
    pub fn num_trees(&self) -> usize {
        self.num_trees
    }

    /// Whether the training dataset has been released.
    pub fn dataset_released(&self) -> bool {
        self.train_set.is_none()
    }

    /// Attached latent-effects model.
    pub fn gp_model(&self) -> Option<&MockGpModel> {
        self.gp_model.as_ref()
    }

    fn raw_output(&self, n: usize, offset: f64) -> Prediction {
        if self.scores.len() == 1 {
            Prediction::Values(Array1::from_elem(n, self.scores[0] + offset))
        } else {
            let row: Vec<f64> = self.scores.iter().map(|s| s + offset).collect();
            Prediction::Matrix(Array2::from_shape_fn((n, row.len()), |(_, k)| row[k]))
        }
    }

    fn response(&self, n: usize, offset: f64) -> Array2<f64> {
        let shifted: Vec<f64> = self.scores.iter().map(|s| s + offset).collect();
        let row = transform(self.kind, &shifted);
        Array2::from_shape_fn((n, row.len()), |(_, k)| row[k])
    }
}

impl Booster for MockBooster {
    fn predict(&self, features: &crate::dataset::Features, options: &PredictOptions) -> Result<Prediction> {
        let n = features.num_rows();
        let num_class = self.scores.len();

        if options.pred_leaf {
            return Ok(Prediction::Matrix(Array2::zeros((n, self.num_trees * num_class))));
        }
        if options.pred_contrib {
            let width = self.num_features + 1;
            let mut contrib = Array2::zeros((n, width * num_class));
            for k in 0..num_class {
                contrib.column_mut(k * width + self.num_features).fill(self.scores[k]);
            }
            return Ok(Prediction::Matrix(contrib));
        }

        if let Some(gp) = &self.gp_model {
            let variance = options.predict_var.then(|| Array1::from_elem(n, gp.variance));
            let covariance = options
                .predict_cov_mat
                .then(|| Array2::eye(n) * gp.variance);
            let latent = if options.raw_score {
                LatentPrediction {
                    fixed_effect: Some(Array1::from_elem(n, self.scores[0])),
                    random_effect_mean: Some(Array1::from_elem(n, gp.random_effect)),
                    random_effect_var: variance,
                    random_effect_cov: covariance,
                    ..Default::default()
                }
            } else {
                LatentPrediction {
                    response_mean: Some(self.response(n, gp.random_effect)),
                    response_var: variance,
                    response_cov: covariance,
                    ..Default::default()
                }
            };
            return Ok(Prediction::Latent(latent));
        }

        if options.raw_score || self.kind == ObjectiveKind::Custom {
            return Ok(self.raw_output(n, 0.0));
        }
        let response = self.response(n, 0.0);
        if num_class == 1 {
            Ok(Prediction::Values(response.column(0).to_owned()))
        } else {
            Ok(Prediction::Matrix(response))
        }
    }

    fn feature_importance(&self, importance_type: ImportanceType) -> Result<Array1<f64>> {
        let splits = self.num_trees as f64;
        Ok(match importance_type {
            ImportanceType::Split => Array1::from_elem(self.num_features, splits),
            ImportanceType::Gain => Array1::from_elem(self.num_features, splits * self.num_train_data as f64),
        })
    }

    fn feature_name(&self) -> Vec<String> {
        self.feature_names.clone()
    }

    fn best_iteration(&self) -> Option<usize> {
        self.best_iteration
    }

    fn best_score(&self) -> BestScore {
        self.best_score.clone()
    }

    fn has_gp_model(&self) -> bool {
        self.gp_model.is_some()
    }

    fn free_dataset(&mut self) {
        self.train_set = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boosting::VerboseEval;
    use crate::dataset::Features;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn request(engine: &MockEngine, objective: &str, labels: Array1<f64>) -> TrainRequest<MockEngine> {
        let mut params = ParamMap::new();
        params.insert("objective".into(), ParamValue::from(objective));
        params.insert("learning_rate".into(), ParamValue::Float(1.0));
        params.insert("metric".into(), ParamValue::from(vec!["l2"]));
        let n = labels.len();
        let mut parts = DatasetParts::new(Features::Dense(Array2::zeros((n, 2))));
        parts.label = Some(labels);
        let train_set = Arc::new(engine.construct_dataset(parts, &params).unwrap());
        TrainRequest {
            params,
            train_set,
            num_boost_round: 3,
            gp_model: None,
            use_gp_model_for_validation: true,
            train_gp_model_cov_pars: true,
            valid_sets: Vec::new(),
            valid_names: None,
            early_stopping_rounds: None,
            fobj: None,
            feval: Vec::new(),
            verbose_eval: VerboseEval::Flag(false),
            feature_name: FeatureName::Auto,
            callbacks: Vec::new(),
            init_model: None,
        }
    }

    #[test]
    fn test_regression_converges_to_mean() {
        let engine = MockEngine::new();
        let output = engine
            .train(request(&engine, "regression", array![1.0, 2.0, 6.0]))
            .unwrap();
        assert_abs_diff_eq!(output.booster.scores()[0], 3.0, epsilon = 1e-12);
        assert_eq!(output.booster.num_trees(), 3);
        assert_eq!(output.booster.feature_name(), vec!["Column_0", "Column_1"]);
        assert_eq!(engine.records().len(), 1);
    }

    #[test]
    fn test_training_set_is_named_training() {
        let engine = MockEngine::new();
        let mut req = request(&engine, "regression", array![1.0, 3.0]);
        req.valid_sets = vec![Arc::clone(&req.train_set)];
        let output = engine.train(req).unwrap();
        assert_eq!(output.evals_result["training"]["l2"].len(), 3);
        assert!(engine.last_record().unwrap().valid_shares_train[0]);
    }

    #[test]
    fn test_construct_dataset_checks_lengths() {
        let engine = MockEngine::new();
        let mut parts = DatasetParts::new(Features::Dense(Array2::zeros((3, 1))));
        parts.weight = Some(array![1.0]);
        assert!(engine.construct_dataset(parts, &ParamMap::new()).is_err());

        let mut parts = DatasetParts::new(Features::Dense(Array2::zeros((3, 1))));
        parts.group = Some(vec![1, 1]);
        assert!(engine.construct_dataset(parts, &ParamMap::new()).is_err());
    }

    #[test]
    fn test_failing_engine_records_then_fails() {
        let engine = MockEngine::failing("boom");
        let err = engine
            .train(request(&engine, "regression", array![1.0, 2.0]))
            .unwrap_err();
        assert!(matches!(err, GPBoostError::Engine { .. }));
        assert_eq!(engine.records().len(), 1);
    }

    #[test]
    fn test_binary_prediction_is_probability() {
        let engine = MockEngine::new();
        let output = engine
            .train(request(&engine, "binary", array![1.0, 1.0, 1.0, 0.0]))
            .unwrap();
        let features = Features::Dense(Array2::zeros((2, 2)));
        let prediction = output.booster.predict(&features, &PredictOptions::new()).unwrap();
        let p = prediction.as_values().unwrap();
        assert!(p[0] > 0.5 && p[0] < 1.0);
        let raw = output
            .booster
            .predict(&features, &PredictOptions::new().with_raw_score(true))
            .unwrap();
        assert!(raw.as_values().unwrap()[0] > 0.0);
    }
}
