//! Caller-supplied objective functions.
//!
//! A [`CustomObjective`] computes gradient and hessian from labels and
//! current predictions. [`ObjectiveFunctionWrapper`] adapts it to the
//! `(predictions, dataset)` convention of the engine and applies the
//! dataset's sample weights to the result.

use crate::core::error::{GPBoostError, Result};
use crate::core::traits::TrainingData;
use crate::dataset_error;
use ndarray::{Array1, ArrayView1};
use std::fmt;
use std::sync::Arc;

/// Gradient and hessian, one entry per sample (class-major for
/// multi-class problems).
pub type GradHess = (Array1<f64>, Array1<f64>);

type BasicObjectiveFn =
    dyn Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> Result<GradHess> + Send + Sync;
type GroupedObjectiveFn = dyn Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>, Option<&[usize]>) -> Result<GradHess>
    + Send
    + Sync;

/// Arguments handed to an objective registered through
/// [`CustomObjective::from_arity`].
#[derive(Debug, Clone, Copy)]
pub struct ObjectiveArgs<'a> {
    /// Training labels
    pub labels: ArrayView1<'a, f64>,
    /// Current raw predictions
    pub predictions: ArrayView1<'a, f64>,
    /// Query group sizes; only set for three-argument objectives
    pub group: Option<&'a [usize]>,
}

/// A user objective function.
#[derive(Clone)]
pub enum CustomObjective {
    /// `(labels, predictions) -> (grad, hess)`
    Basic(Arc<BasicObjectiveFn>),
    /// `(labels, predictions, group) -> (grad, hess)`
    Grouped(Arc<GroupedObjectiveFn>),
}

impl CustomObjective {
    /// Objective taking labels and predictions.
    pub fn basic<F>(f: F) -> Self
    where
        F: Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> Result<GradHess> + Send + Sync + 'static,
    {
        CustomObjective::Basic(Arc::new(f))
    }

    /// Objective that also receives the query groups.
    pub fn grouped<F>(f: F) -> Self
    where
        F: Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>, Option<&[usize]>) -> Result<GradHess>
            + Send
            + Sync
            + 'static,
    {
        CustomObjective::Grouped(Arc::new(f))
    }

    /// Register a uniform callable with a declared argument count.
    ///
    /// Fails with an invalid-parameter error for any arity other than 2 or 3.
    pub fn from_arity<F>(arity: usize, f: F) -> Result<Self>
    where
        F: Fn(ObjectiveArgs<'_>) -> Result<GradHess> + Send + Sync + 'static,
    {
        match arity {
            2 => Ok(Self::basic(move |labels, predictions| {
                f(ObjectiveArgs {
                    labels: labels.reborrow(),
                    predictions: predictions.reborrow(),
                    group: None,
                })
            })),
            3 => Ok(Self::grouped(move |labels, predictions, group| {
                f(ObjectiveArgs {
                    labels: labels.reborrow(),
                    predictions: predictions.reborrow(),
                    group,
                })
            })),
            n => Err(GPBoostError::invalid_parameter(
                "objective",
                n.to_string(),
                format!(
                    "Self-defined objective function should have 2 or 3 arguments, got {}",
                    n
                ),
            )),
        }
    }

    /// Declared number of arguments.
    pub fn arity(&self) -> usize {
        match self {
            CustomObjective::Basic(_) => 2,
            CustomObjective::Grouped(_) => 3,
        }
    }
}

impl fmt::Debug for CustomObjective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomObjective::Basic(_) => write!(f, "CustomObjective::Basic(..)"),
            CustomObjective::Grouped(_) => write!(f, "CustomObjective::Grouped(..)"),
        }
    }
}

/// Scale gradient and hessian by per-sample weights.
///
/// With one entry per sample the scaling is element-wise. Otherwise the
/// vectors are class-major (`num_class * num_data` entries) and entry
/// `k * num_data + i` is scaled by `weight[i]`.
pub fn apply_sample_weights(
    grad: &mut Array1<f64>,
    hess: &mut Array1<f64>,
    weight: ArrayView1<'_, f64>,
) -> Result<()> {
    let num_data = weight.len();
    if grad.len() == num_data {
        *grad *= &weight;
        *hess *= &weight;
        return Ok(());
    }

    if num_data == 0 || grad.len() % num_data != 0 {
        return Err(GPBoostError::dimension_mismatch(
            format!("num_class * {} gradient entries", num_data),
            format!(
                "{} (Length of grad and hess should equal to num_class * num_data)",
                grad.len()
            ),
        ));
    }

    let num_class = grad.len() / num_data;
    for k in 0..num_class {
        for i in 0..num_data {
            let idx = k * num_data + i;
            grad[idx] *= weight[i];
            hess[idx] *= weight[i];
        }
    }
    Ok(())
}

/// Adapts a [`CustomObjective`] to the engine calling convention.
#[derive(Debug, Clone)]
pub struct ObjectiveFunctionWrapper {
    objective: CustomObjective,
}

impl ObjectiveFunctionWrapper {
    /// Wrap a user objective.
    pub fn new(objective: CustomObjective) -> Self {
        ObjectiveFunctionWrapper { objective }
    }

    /// The wrapped objective.
    pub fn objective(&self) -> &CustomObjective {
        &self.objective
    }

    /// Compute weighted gradient and hessian for the current predictions.
    pub fn call<D: TrainingData + ?Sized>(
        &self,
        predictions: ArrayView1<'_, f64>,
        dataset: &D,
    ) -> Result<GradHess> {
        let labels = dataset
            .label()
            .ok_or_else(|| dataset_error!("custom objective requires a dataset with labels"))?;

        let (mut grad, mut hess) = match &self.objective {
            CustomObjective::Basic(f) => f(labels, predictions)?,
            CustomObjective::Grouped(f) => f(labels, predictions, dataset.group())?,
        };

        if grad.len() != hess.len() {
            return Err(GPBoostError::dimension_mismatch(
                format!("{} hessian entries", grad.len()),
                format!("{} hessian entries", hess.len()),
            ));
        }

        if let Some(weight) = dataset.weight() {
            apply_sample_weights(&mut grad, &mut hess, weight)?;
        }
        Ok((grad, hess))
    }
}
