//! Regression task.

use crate::core::error::{GPBoostError, Result};
use crate::core::traits::Engine;
use crate::core::types::TaskKind;
use crate::dataset::{ClassWeight, EvalSet, PerEval};
use crate::estimator::options::FitOptions;
use crate::estimator::task::{PredictContext, PreparedFit, TaskStrategy};
use crate::prediction::{PredictOptions, Prediction};
use ndarray::Array1;

/// Real-valued targets, passed to the engine unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegressionTask;

impl TaskStrategy for RegressionTask {
    type Target = f64;
    type Pending = ();
    type Output = Prediction;

    const KIND: TaskKind = TaskKind::Regression;

    fn validate_task_inputs<E: Engine>(
        &self,
        _labels: &Array1<f64>,
        options: &FitOptions<E, f64>,
    ) -> Result<()> {
        let rejected = [
            ("group", options.group.is_some()),
            ("eval_group", options.eval_group.is_some()),
            ("eval_class_weight", options.eval_class_weight.is_some()),
        ];
        for (name, present) in rejected {
            if present {
                return Err(GPBoostError::invalid_parameter(
                    name,
                    "set",
                    "not supported for regression",
                ));
            }
        }
        Ok(())
    }

    fn prepare_labels(
        &self,
        labels: Array1<f64>,
        _class_weight: Option<&ClassWeight<f64>>,
        eval_set: Vec<EvalSet<f64>>,
        _eval_class_weight: Option<PerEval<ClassWeight<f64>>>,
    ) -> Result<PreparedFit<()>> {
        Ok(PreparedFit::passthrough(labels, eval_set))
    }

    fn commit(&mut self, _pending: ()) {}

    fn finish_prediction(
        &self,
        prediction: Prediction,
        _options: &PredictOptions,
        _context: PredictContext,
    ) -> Result<Prediction> {
        Ok(prediction)
    }
}
