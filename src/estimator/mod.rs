//! Estimator interface over a boosting engine.
//!
//! [`GPBoostModel`] owns the hyperparameters, delegates training to an
//! [`Engine`] and keeps the returned booster together with the metadata of
//! the last successful fit. Task-specific behaviour is supplied by a
//! [`TaskStrategy`]; the public estimators are aliases over the three
//! strategies shipped with the crate.

pub mod classifier;
pub mod fit;
pub mod options;
pub mod ranker;
pub mod regressor;
pub mod task;

pub use classifier::{ClassificationTask, ClassifierOutput};
pub use options::FitOptions;
pub use ranker::RankingTask;
pub use regressor::RegressionTask;
pub use task::{PredictContext, PreparedEvalSet, PreparedFit, TaskStrategy};

use crate::boosting::{BestScore, EvalsResult};
use crate::config::{Objective, ParamMap, ParamValue, Params};
use crate::core::error::{GPBoostError, Result};
use crate::core::traits::{Booster, Engine};
use crate::core::types::TaskKind;
use crate::dataset::{ClassWeight, Features};
use crate::prediction::{PredictOptions, Prediction};
use ndarray::Array1;

/// Regressor over engine `E`.
pub type GPBoostRegressor<E> = GPBoostModel<E, RegressionTask>;

/// Classifier over engine `E` with labels of type `L`.
pub type GPBoostClassifier<E, L = i64> = GPBoostModel<E, ClassificationTask<L>>;

/// Ranker over engine `E`.
pub type GPBoostRanker<E> = GPBoostModel<E, RankingTask>;

/// State recorded by a successful fit.
#[derive(Debug)]
pub struct FittedModel<B> {
    /// Trained model handle
    pub booster: B,
    /// Number of feature columns seen during fit
    pub n_features: usize,
    /// Same as `n_features`
    pub n_features_in: usize,
    /// Best iteration, recorded only when early stopping was requested
    pub best_iteration: Option<usize>,
    /// Best score per validation set and metric
    pub best_score: BestScore,
    /// Evaluation history, when anything was evaluated
    pub evals_result: Option<EvalsResult>,
    /// The concrete objective used
    pub objective: Objective,
}

/// Generic GPBoost estimator.
#[derive(Debug)]
pub struct GPBoostModel<E: Engine, T: TaskStrategy> {
    pub(crate) engine: E,
    pub(crate) params: Params,
    pub(crate) class_weight: Option<ClassWeight<T::Target>>,
    pub(crate) task: T,
    pub(crate) fitted: Option<FittedModel<E::Booster>>,
}

impl<E: Engine, T: TaskStrategy> GPBoostModel<E, T> {
    /// Estimator with default hyperparameters.
    pub fn new(engine: E) -> Self {
        Self::with_params(engine, Params::default())
    }

    /// Estimator with the given hyperparameters.
    pub fn with_params(engine: E, params: Params) -> Self {
        GPBoostModel {
            engine,
            params,
            class_weight: None,
            task: T::default(),
            fitted: None,
        }
    }

    /// The engine this estimator trains with.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Current hyperparameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Mutable access to the hyperparameters.
    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// Task this estimator solves.
    pub fn task_kind(&self) -> TaskKind {
        T::KIND
    }

    /// All hyperparameters by name, `other_params` included.
    pub fn get_params(&self) -> ParamMap {
        let mut map = self.params.to_param_map();
        map.insert(
            "class_weight".into(),
            self.class_weight
                .as_ref()
                .map(ClassWeight::to_param_value)
                .unwrap_or(ParamValue::Null),
        );
        map
    }

    /// Set hyperparameters by name.
    ///
    /// Unknown names are kept and forwarded to the engine at fit time.
    /// Stops at the first invalid entry; entries before it stay applied.
    pub fn set_params<I, K>(&mut self, params: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, ParamValue)>,
        K: AsRef<str>,
    {
        for (key, value) in params {
            match key.as_ref() {
                "class_weight" => self.set_class_weight_value(value)?,
                key => self.params.set(key, value)?,
            }
        }
        Ok(self)
    }

    fn set_class_weight_value(&mut self, value: ParamValue) -> Result<()> {
        match value {
            ParamValue::Null => self.class_weight = None,
            ParamValue::Str(name) if name == "balanced" => {
                if T::KIND != TaskKind::Classification {
                    return Err(GPBoostError::invalid_parameter(
                        "class_weight",
                        name,
                        format!("class weights are not supported for {}", T::KIND),
                    ));
                }
                self.class_weight = Some(ClassWeight::Balanced);
            }
            ParamValue::Str(name) => {
                return Err(GPBoostError::invalid_parameter(
                    "class_weight",
                    name,
                    "expected \"balanced\" or None",
                ))
            }
            other => {
                return Err(GPBoostError::type_mismatch(
                    "class_weight",
                    "\"balanced\" or null; use with_class_weight for explicit weights",
                    other.kind(),
                ))
            }
        }
        Ok(())
    }

    /// Whether `fit` has completed successfully at least once.
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn fitted(&self, attribute: &str) -> Result<&FittedModel<E::Booster>> {
        self.fitted
            .as_ref()
            .ok_or_else(|| GPBoostError::not_fitted(attribute))
    }

    /// Number of features of the fitted model.
    pub fn n_features(&self) -> Result<usize> {
        self.fitted("n_features").map(|f| f.n_features)
    }

    /// Number of features seen during fit.
    pub fn n_features_in(&self) -> Result<usize> {
        self.fitted("n_features_in").map(|f| f.n_features_in)
    }

    /// Best score of the fitted model.
    pub fn best_score(&self) -> Result<&BestScore> {
        self.fitted("best_score").map(|f| &f.best_score)
    }

    /// Best iteration, when fit used early stopping.
    pub fn best_iteration(&self) -> Result<Option<usize>> {
        self.fitted("best_iteration").map(|f| f.best_iteration)
    }

    /// The concrete objective used while fitting.
    pub fn objective(&self) -> Result<&Objective> {
        self.fitted("objective").map(|f| &f.objective)
    }

    /// The underlying booster.
    pub fn booster(&self) -> Result<&E::Booster> {
        self.fitted("booster").map(|f| &f.booster)
    }

    /// Evaluation history of the last fit, if anything was evaluated.
    pub fn evals_result(&self) -> Result<Option<&EvalsResult>> {
        self.fitted("evals_result").map(|f| f.evals_result.as_ref())
    }

    /// Feature importances of the configured `importance_type`.
    pub fn feature_importances(&self) -> Result<Array1<f64>> {
        self.fitted("feature_importances")?
            .booster
            .feature_importance(self.params.importance_type)
    }

    /// Names of the features.
    pub fn feature_name(&self) -> Result<Vec<String>> {
        self.fitted("feature_name").map(|f| f.booster.feature_name())
    }

    /// Give up the estimator and keep its booster.
    pub fn into_booster(self) -> Result<E::Booster> {
        self.fitted
            .map(|f| f.booster)
            .ok_or_else(|| GPBoostError::not_fitted("booster"))
    }

    /// Booster output for `features`, before task post-processing.
    pub(crate) fn base_predict(&self, features: &Features, options: &PredictOptions) -> Result<Prediction> {
        let fitted = self.fitted("booster")?;
        let n_features = features.num_columns();
        if fitted.n_features != n_features {
            return Err(GPBoostError::dimension_mismatch(
                format!("model n_features_ = {}", fitted.n_features),
                format!("input n_features = {}", n_features),
            ));
        }
        fitted.booster.predict(features, options)
    }

    pub(crate) fn predict_context(&self) -> Result<PredictContext> {
        let fitted = self.fitted("booster")?;
        Ok(PredictContext {
            custom_objective: fitted.objective.is_custom(),
            has_gp_model: fitted.booster.has_gp_model(),
        })
    }

    /// Predict for `features`.
    ///
    /// Requires a fitted model whose feature count matches the input.
    pub fn predict<X: Into<Features>>(&self, features: X, options: &PredictOptions) -> Result<T::Output> {
        let features = features.into();
        let prediction = self.base_predict(&features, options)?;
        self.task
            .finish_prediction(prediction, options, self.predict_context()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockEngine;
    use ndarray::array;

    #[test]
    fn test_accessors_before_fit() {
        let model: GPBoostRegressor<MockEngine> = GPBoostModel::new(MockEngine::new());
        assert!(!model.is_fitted());
        let err = model.n_features().unwrap_err();
        assert!(matches!(err, GPBoostError::NotFitted { ref attribute } if attribute == "n_features"));
        assert!(model.best_score().is_err());
        assert!(model.best_iteration().is_err());
        assert!(model.objective().is_err());
        assert!(model.booster().is_err());
        assert!(model.evals_result().is_err());
        assert!(model.feature_importances().is_err());
        assert!(model.feature_name().is_err());
        assert!(model.n_features_in().is_err());
        let err = model
            .predict(array![[1.0, 2.0]], &PredictOptions::new())
            .unwrap_err();
        assert!(matches!(err, GPBoostError::NotFitted { .. }));
    }

    #[test]
    fn test_get_params_includes_class_weight_and_extras() {
        let mut model: GPBoostRegressor<MockEngine> = GPBoostModel::new(MockEngine::new());
        model
            .set_params([("max_bin", ParamValue::Int(63)), ("num_leaves", ParamValue::Int(7))])
            .unwrap();
        let params = model.get_params();
        assert_eq!(params.get("class_weight"), Some(&ParamValue::Null));
        assert_eq!(params.get("max_bin"), Some(&ParamValue::Int(63)));
        assert_eq!(params.get("num_leaves"), Some(&ParamValue::Int(7)));
        assert_eq!(model.task_kind(), TaskKind::Regression);
    }

    #[test]
    fn test_set_params_rejects_wrong_types() {
        let mut model: GPBoostRegressor<MockEngine> = GPBoostModel::new(MockEngine::new());
        let err = model
            .set_params([("num_leaves", ParamValue::from("abc"))])
            .unwrap_err();
        assert!(matches!(err, GPBoostError::TypeMismatch { .. }));
    }

    #[test]
    fn test_class_weight_is_classification_only() {
        let mut regressor: GPBoostRegressor<MockEngine> = GPBoostModel::new(MockEngine::new());
        assert!(regressor
            .set_params([("class_weight", ParamValue::from("balanced"))])
            .is_err());
        regressor
            .set_params([("class_weight", ParamValue::Null)])
            .unwrap();

        let mut classifier: GPBoostClassifier<MockEngine> = GPBoostModel::new(MockEngine::new());
        classifier
            .set_params([("class_weight", ParamValue::from("balanced"))])
            .unwrap();
        assert_eq!(
            classifier.get_params().get("class_weight"),
            Some(&ParamValue::from("balanced"))
        );
        let err = classifier
            .set_params([("class_weight", ParamValue::Int(3))])
            .unwrap_err();
        assert!(matches!(err, GPBoostError::TypeMismatch { .. }));
        assert!(classifier
            .set_params([("class_weight", ParamValue::from("inverse"))])
            .is_err());
    }
}
