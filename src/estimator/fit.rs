//! Training: parameter map assembly, dataset construction and the call
//! into the engine.

use crate::boosting::{EvalFunctionWrapper, EvalMetric, ObjectiveFunctionWrapper, TrainRequest};
use crate::config::{choose_param_value, ConfigAliases, Objective, ParamMap, ParamValue, Params, RandomState};
use crate::core::constants::{CUSTOM_OBJECTIVE_SENTINEL, SILENT_VERBOSITY};
use crate::core::error::{GPBoostError, Result};
use crate::core::traits::{Booster, Engine};
use crate::core::types::TaskKind;
use crate::dataset::{
    check_sample_weight, check_xy, CategoricalFeature, DatasetParts, Features, PerEval,
};
use crate::estimator::options::FitOptions;
use crate::estimator::task::{PreparedEvalSet, TaskStrategy};
use crate::estimator::{FittedModel, GPBoostModel};
use log::{debug, info};
use ndarray::Array1;
use std::sync::Arc;

/// What the parameter map depends on besides [`Params`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct TrainParamsContext<'a> {
    pub(crate) kind: TaskKind,
    pub(crate) objective: &'a Objective,
    pub(crate) seed: Option<i64>,
    pub(crate) n_classes: Option<usize>,
    pub(crate) eval_at: Option<&'a [usize]>,
    pub(crate) builtin_metrics: &'a [String],
}

/// Translate the hyperparameters into the map sent to the engine.
pub(crate) fn build_train_params(params: &Params, ctx: TrainParamsContext<'_>) -> ParamMap {
    let mut map = params.to_param_map();

    // an explicit verbosity in other_params has priority over `silent`
    if params.silent && !ConfigAliases::any_present("verbosity", &map) {
        map.insert("verbose".into(), ParamValue::Int(SILENT_VERBOSITY));
    }
    for key in ["silent", "importance_type", "n_estimators", "class_weight"] {
        map.remove(key);
    }

    match ctx.seed {
        Some(seed) => {
            map.insert("random_state".into(), ParamValue::Int(seed));
        }
        None => {
            map.remove("random_state");
        }
    }

    map.remove("n_jobs");
    if !ConfigAliases::any_present("num_threads", &map) {
        map.insert(
            "num_threads".into(),
            ParamValue::from(params.effective_num_threads()),
        );
    }

    ConfigAliases::remove_all("objective", &mut map);
    if let Some(n_classes) = ctx.n_classes.filter(|&n| n > 2) {
        ConfigAliases::remove_all("num_class", &mut map);
        map.insert("num_class".into(), ParamValue::from(n_classes));
    }
    if let Some(eval_at) = ctx.eval_at {
        ConfigAliases::remove_all("eval_at", &mut map);
        map.insert("eval_at".into(), ParamValue::from(eval_at.to_vec()));
    }
    map.insert(
        "objective".into(),
        ParamValue::from(ctx.objective.name().unwrap_or(CUSTOM_OBJECTIVE_SENTINEL)),
    );

    let default_metric = ctx
        .objective
        .name()
        .unwrap_or_else(|| ctx.kind.default_metric(ctx.n_classes));
    choose_param_value("metric", &mut map, ParamValue::from(default_metric));
    let configured = match map.remove("metric") {
        Some(ParamValue::List(items)) => items,
        Some(ParamValue::Null) | None => Vec::new(),
        Some(single) => vec![single],
    };
    let mut metrics: Vec<ParamValue> = Vec::new();
    for name in ctx.builtin_metrics {
        let value = ParamValue::from(name.as_str());
        if !configured.contains(&value) && !metrics.contains(&value) {
            metrics.push(value);
        }
    }
    metrics.extend(configured.into_iter().filter(|m| !m.is_null()));
    map.insert("metric".into(), ParamValue::List(metrics));

    map
}

/// Multiply caller weights with class-derived weights.
///
/// An absent or empty caller vector is replaced by the class weights.
pub(crate) fn combine_weights(
    sample_weight: Option<Array1<f64>>,
    class_sample_weight: Option<Array1<f64>>,
) -> Result<Option<Array1<f64>>> {
    match (sample_weight, class_sample_weight) {
        (Some(weight), Some(class_weight)) if !weight.is_empty() => {
            if weight.len() != class_weight.len() {
                return Err(GPBoostError::dimension_mismatch(
                    format!("{} sample weights", class_weight.len()),
                    format!("{} sample weights", weight.len()),
                ));
            }
            Ok(Some(weight * class_weight))
        }
        (_, Some(class_weight)) => Ok(Some(class_weight)),
        (weight, None) => Ok(weight),
    }
}

fn lookup<T: Clone>(values: Option<&PerEval<T>>, index: usize) -> Option<T> {
    values.and_then(|values| values.get(index)).cloned()
}

impl<E: Engine, T: TaskStrategy> GPBoostModel<E, T> {
    /// Fit the estimator.
    ///
    /// On failure the previously fitted state, if any, is left untouched.
    pub fn fit<X: Into<Features>>(
        &mut self,
        features: X,
        labels: Array1<T::Target>,
        options: FitOptions<E, T::Target>,
    ) -> Result<&mut Self> {
        let features = features.into();
        self.task.validate_task_inputs(&labels, &options)?;
        self.params.validate()?;

        let FitOptions {
            gp_model,
            use_gp_model_for_validation,
            train_gp_model_cov_pars,
            sample_weight,
            init_score,
            group,
            eval_set,
            eval_names,
            eval_sample_weight,
            eval_class_weight,
            eval_init_score,
            eval_group,
            eval_metric,
            early_stopping_rounds,
            verbose,
            feature_name,
            categorical_feature,
            callbacks,
            init_model,
        } = options;

        let prepared = self.task.prepare_labels(
            labels,
            self.class_weight.as_ref(),
            eval_set,
            eval_class_weight,
        )?;

        let objective = self
            .task
            .resolve_objective(self.params.objective.as_ref(), prepared.n_classes);
        let fobj = match &objective {
            Objective::Custom(custom) => Some(ObjectiveFunctionWrapper::new(custom.clone())),
            Objective::Builtin(_) => None,
        };

        let mut builtin_metrics = Vec::new();
        let mut feval = Vec::new();
        for metric in self.task.adapt_eval_metric(eval_metric, prepared.n_classes) {
            match metric {
                EvalMetric::Builtin(name) => builtin_metrics.push(name),
                EvalMetric::Custom(function) => feval.push(EvalFunctionWrapper::new(function)),
            }
        }

        // the advanced generator is committed only with a successful fit
        let mut random_state = self.params.random_state.clone();
        let seed = random_state.as_mut().map(RandomState::resolve_seed);
        let train_params = build_train_params(
            &self.params,
            TrainParamsContext {
                kind: T::KIND,
                objective: &objective,
                seed,
                n_classes: prepared.n_classes,
                eval_at: self.task.eval_at(),
                builtin_metrics: &builtin_metrics,
            },
        );
        debug!("Training parameters: {:?}", train_params);

        if let Some(x) = features.as_dense() {
            check_xy(x, &prepared.labels)?;
            if let Some(weight) = &sample_weight {
                check_sample_weight(weight, x.nrows())?;
            }
        }
        let n_features = features.num_columns();
        let num_data = prepared.labels.len();
        let weight = combine_weights(sample_weight, prepared.class_sample_weight)?;

        let train_set = Arc::new(self.engine.construct_dataset(
            DatasetParts {
                features,
                label: Some(prepared.labels),
                weight,
                group,
                init_score,
                categorical_feature,
            },
            &train_params,
        )?);

        let mut valid_sets = Vec::with_capacity(prepared.eval_sets.len());
        for (index, eval) in prepared.eval_sets.into_iter().enumerate() {
            match eval {
                PreparedEvalSet::Training => valid_sets.push(Arc::clone(&train_set)),
                PreparedEvalSet::Data {
                    features,
                    labels,
                    class_sample_weight,
                } => {
                    let weight = combine_weights(
                        lookup(eval_sample_weight.as_ref(), index),
                        class_sample_weight,
                    )?;
                    let dataset = self.engine.construct_dataset(
                        DatasetParts {
                            features,
                            label: Some(labels),
                            weight,
                            group: lookup(eval_group.as_ref(), index),
                            init_score: lookup(eval_init_score.as_ref(), index),
                            categorical_feature: CategoricalFeature::Auto,
                        },
                        &train_params,
                    )?;
                    valid_sets.push(Arc::new(dataset));
                }
            }
        }

        info!(
            "Fitting {} model: {} samples, {} features, {} rounds, {} validation set(s)",
            T::KIND,
            num_data,
            n_features,
            self.params.n_estimators,
            valid_sets.len()
        );

        let has_gp_model = gp_model.is_some();
        let output = self.engine.train(TrainRequest {
            params: train_params,
            train_set,
            num_boost_round: self.params.n_estimators,
            gp_model,
            use_gp_model_for_validation,
            train_gp_model_cov_pars,
            valid_sets,
            valid_names: eval_names,
            early_stopping_rounds,
            fobj,
            feval,
            verbose_eval: verbose,
            feature_name,
            callbacks,
            init_model,
        })?;

        let mut booster = output.booster;
        let best_iteration = match early_stopping_rounds {
            Some(rounds) if rounds > 0 => booster.best_iteration(),
            _ => None,
        };
        let best_score = booster.best_score();
        let evals_result = Some(output.evals_result).filter(|history| !history.is_empty());
        if !has_gp_model {
            booster.free_dataset();
        }

        info!(
            "Finished fitting {} model (best iteration: {:?})",
            T::KIND,
            best_iteration
        );

        self.params.random_state = random_state;
        self.fitted = Some(FittedModel {
            booster,
            n_features,
            n_features_in: n_features,
            best_iteration,
            best_score,
            evals_result,
            objective,
        });
        self.task.commit(prepared.pending);
        Ok(self)
    }
}
