//! Caller-supplied evaluation metrics.

use crate::core::error::{GPBoostError, Result};
use crate::core::traits::TrainingData;
use crate::dataset_error;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One evaluation value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalResult {
    /// Metric name, without whitespace
    pub name: String,
    /// Metric value
    pub value: f64,
    /// Whether larger values are better
    pub higher_better: bool,
}

impl EvalResult {
    /// Create an evaluation result.
    pub fn new<S: Into<String>>(name: S, value: f64, higher_better: bool) -> Self {
        EvalResult {
            name: name.into(),
            value,
            higher_better,
        }
    }
}

/// What a user metric returns: one result or several.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalOutput {
    /// A single metric
    Single(EvalResult),
    /// Several metrics
    Multiple(Vec<EvalResult>),
}

impl EvalOutput {
    /// Flatten into a list.
    pub fn into_vec(self) -> Vec<EvalResult> {
        match self {
            EvalOutput::Single(result) => vec![result],
            EvalOutput::Multiple(results) => results,
        }
    }
}

impl From<EvalResult> for EvalOutput {
    fn from(result: EvalResult) -> Self {
        EvalOutput::Single(result)
    }
}

impl From<Vec<EvalResult>> for EvalOutput {
    fn from(results: Vec<EvalResult>) -> Self {
        EvalOutput::Multiple(results)
    }
}

impl<S: Into<String>> From<(S, f64, bool)> for EvalOutput {
    fn from((name, value, higher_better): (S, f64, bool)) -> Self {
        EvalOutput::Single(EvalResult::new(name, value, higher_better))
    }
}

/// Arguments handed to a metric registered through [`EvalFunction::from_arity`].
#[derive(Debug, Clone, Copy)]
pub struct EvalArgs<'a> {
    /// Labels of the evaluated dataset
    pub labels: ArrayView1<'a, f64>,
    /// Predictions for the evaluated dataset
    pub predictions: ArrayView1<'a, f64>,
    /// Sample weights; set for three- and four-argument metrics
    pub weight: Option<ArrayView1<'a, f64>>,
    /// Query groups; set for four-argument metrics
    pub group: Option<&'a [usize]>,
}

type BasicEvalFn = dyn Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> Result<EvalOutput> + Send + Sync;
type WeightedEvalFn = dyn Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>, Option<ArrayView1<'_, f64>>) -> Result<EvalOutput>
    + Send
    + Sync;
type GroupedEvalFn = dyn Fn(
        ArrayView1<'_, f64>,
        ArrayView1<'_, f64>,
        Option<ArrayView1<'_, f64>>,
        Option<&[usize]>,
    ) -> Result<EvalOutput>
    + Send
    + Sync;

/// A user evaluation metric.
#[derive(Clone)]
pub enum EvalFunction {
    /// `(labels, predictions)`
    Basic(Arc<BasicEvalFn>),
    /// `(labels, predictions, weight)`
    Weighted(Arc<WeightedEvalFn>),
    /// `(labels, predictions, weight, group)`
    Grouped(Arc<GroupedEvalFn>),
}

impl EvalFunction {
    /// Metric taking labels and predictions.
    pub fn basic<F>(f: F) -> Self
    where
        F: Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> Result<EvalOutput> + Send + Sync + 'static,
    {
        EvalFunction::Basic(Arc::new(f))
    }

    /// Metric that also receives sample weights.
    pub fn weighted<F>(f: F) -> Self
    where
        F: Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>, Option<ArrayView1<'_, f64>>) -> Result<EvalOutput>
            + Send
            + Sync
            + 'static,
    {
        EvalFunction::Weighted(Arc::new(f))
    }

    /// Metric that also receives sample weights and query groups.
    pub fn grouped<F>(f: F) -> Self
    where
        F: Fn(
                ArrayView1<'_, f64>,
                ArrayView1<'_, f64>,
                Option<ArrayView1<'_, f64>>,
                Option<&[usize]>,
            ) -> Result<EvalOutput>
            + Send
            + Sync
            + 'static,
    {
        EvalFunction::Grouped(Arc::new(f))
    }

    /// Register a uniform callable with a declared argument count.
    ///
    /// Fails with an invalid-parameter error for any arity other than 2, 3 or 4.
    pub fn from_arity<F>(arity: usize, f: F) -> Result<Self>
    where
        F: Fn(EvalArgs<'_>) -> Result<EvalOutput> + Send + Sync + 'static,
    {
        match arity {
            2 => Ok(Self::basic(move |labels, predictions| {
                f(EvalArgs {
                    labels: labels.reborrow(),
                    predictions: predictions.reborrow(),
                    weight: None,
                    group: None,
                })
            })),
            3 => Ok(Self::weighted(move |labels, predictions, weight| {
                f(EvalArgs {
                    labels: labels.reborrow(),
                    predictions: predictions.reborrow(),
                    weight: weight.map(|w| w.reborrow()),
                    group: None,
                })
            })),
            4 => Ok(Self::grouped(move |labels, predictions, weight, group| {
                f(EvalArgs {
                    labels: labels.reborrow(),
                    predictions: predictions.reborrow(),
                    weight: weight.map(|w| w.reborrow()),
                    group,
                })
            })),
            n => Err(GPBoostError::invalid_parameter(
                "eval_metric",
                n.to_string(),
                format!(
                    "Self-defined eval function should have 2, 3 or 4 arguments, got {}",
                    n
                ),
            )),
        }
    }

    /// Declared number of arguments.
    pub fn arity(&self) -> usize {
        match self {
            EvalFunction::Basic(_) => 2,
            EvalFunction::Weighted(_) => 3,
            EvalFunction::Grouped(_) => 4,
        }
    }
}

impl fmt::Debug for EvalFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EvalFunction({} arguments)", self.arity())
    }
}

/// Adapts an [`EvalFunction`] to the engine calling convention.
#[derive(Debug, Clone)]
pub struct EvalFunctionWrapper {
    function: EvalFunction,
}

impl EvalFunctionWrapper {
    /// Wrap a user metric.
    pub fn new(function: EvalFunction) -> Self {
        EvalFunctionWrapper { function }
    }

    /// Evaluate predictions on a dataset.
    pub fn call<D: TrainingData + ?Sized>(
        &self,
        predictions: ArrayView1<'_, f64>,
        dataset: &D,
    ) -> Result<Vec<EvalResult>> {
        let labels = dataset
            .label()
            .ok_or_else(|| dataset_error!("custom eval metric requires a dataset with labels"))?;

        let output = match &self.function {
            EvalFunction::Basic(f) => f(labels, predictions)?,
            EvalFunction::Weighted(f) => f(labels, predictions, dataset.weight())?,
            EvalFunction::Grouped(f) => f(labels, predictions, dataset.weight(), dataset.group())?,
        };
        Ok(output.into_vec())
    }
}

/// An entry of `eval_metric`: builtin name or user function.
#[derive(Debug, Clone)]
pub enum EvalMetric {
    /// Metric computed by the engine
    Builtin(String),
    /// Metric computed by a user function
    Custom(EvalFunction),
}

impl From<&str> for EvalMetric {
    fn from(name: &str) -> Self {
        EvalMetric::Builtin(name.to_string())
    }
}

impl From<String> for EvalMetric {
    fn from(name: String) -> Self {
        EvalMetric::Builtin(name)
    }
}

impl From<EvalFunction> for EvalMetric {
    fn from(function: EvalFunction) -> Self {
        EvalMetric::Custom(function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[derive(Debug)]
    struct Data {
        label: Array1<f64>,
        weight: Option<Array1<f64>>,
    }

    impl TrainingData for Data {
        fn num_data(&self) -> usize {
            self.label.len()
        }
        fn label(&self) -> Option<ArrayView1<'_, f64>> {
            Some(self.label.view())
        }
        fn weight(&self) -> Option<ArrayView1<'_, f64>> {
            self.weight.as_ref().map(|w| w.view())
        }
        fn group(&self) -> Option<&[usize]> {
            None
        }
    }

    #[test]
    fn test_basic_metric_returns_single_result() {
        let mae = EvalFunction::basic(|labels, preds| {
            let value = (&preds - &labels).mapv(f64::abs).mean().unwrap_or(0.0);
            Ok(("mae", value, false).into())
        });
        let data = Data {
            label: array![1.0, 3.0],
            weight: None,
        };
        let results = EvalFunctionWrapper::new(mae)
            .call(array![2.0, 2.0].view(), &data)
            .unwrap();
        assert_eq!(results, vec![EvalResult::new("mae", 1.0, false)]);
    }

    #[test]
    fn test_weighted_metric_sees_weights() {
        let metric = EvalFunction::from_arity(3, |args| {
            let total = args.weight.map(|w| w.sum()).unwrap_or(-1.0);
            Ok(EvalOutput::Multiple(vec![
                EvalResult::new("weight_sum", total, true),
                EvalResult::new("n", args.labels.len() as f64, true),
            ]))
        })
        .unwrap();
        let data = Data {
            label: array![0.0, 1.0],
            weight: Some(array![0.5, 2.0]),
        };
        let results = EvalFunctionWrapper::new(metric)
            .call(array![0.0, 0.0].view(), &data)
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].value, 2.5);
    }

    #[test]
    fn test_uniform_metric_receives_only_declared_arguments() {
        let data = Data {
            label: array![1.0, 2.0],
            weight: Some(array![1.0, 1.0]),
        };
        for arity in [2, 4] {
            let metric = EvalFunction::from_arity(arity, move |args| {
                assert_eq!(args.weight.is_some(), arity == 4);
                let diff = (&args.predictions - &args.labels).mapv(f64::abs).sum();
                Ok(("abs_diff", diff, false).into())
            })
            .unwrap();
            let results = EvalFunctionWrapper::new(metric)
                .call(array![1.5, 2.5].view(), &data)
                .unwrap();
            assert_eq!(results, vec![EvalResult::new("abs_diff", 1.0, false)]);
        }
    }

    #[test]
    fn test_invalid_arity() {
        for arity in [1, 5] {
            let err = EvalFunction::from_arity(arity, |_| Ok(("x", 0.0, true).into())).unwrap_err();
            assert!(matches!(err, GPBoostError::InvalidParameter { .. }));
            assert!(err.to_string().contains(&format!("got {}", arity)));
        }
        assert_eq!(
            EvalFunction::from_arity(4, |_| Ok(("x", 0.0, true).into()))
                .unwrap()
                .arity(),
            4
        );
    }
}
