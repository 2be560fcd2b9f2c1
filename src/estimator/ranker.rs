//! Learning-to-rank task.

use crate::core::constants::DEFAULT_EVAL_AT;
use crate::core::error::{GPBoostError, Result};
use crate::core::traits::Engine;
use crate::core::types::TaskKind;
use crate::dataset::{check_group, ClassWeight, EvalSet, PerEval};
use crate::estimator::options::FitOptions;
use crate::estimator::task::{PredictContext, PreparedFit, TaskStrategy};
use crate::estimator::GPBoostModel;
use crate::prediction::{PredictOptions, Prediction};
use ndarray::Array1;

/// Relevance labels within contiguous query groups.
#[derive(Debug, Clone)]
pub struct RankingTask {
    eval_at: Vec<usize>,
}

impl Default for RankingTask {
    fn default() -> Self {
        RankingTask {
            eval_at: DEFAULT_EVAL_AT.to_vec(),
        }
    }
}

impl RankingTask {
    /// Evaluation positions of the ranking metrics.
    pub fn eval_at_positions(&self) -> &[usize] {
        &self.eval_at
    }
}

impl TaskStrategy for RankingTask {
    type Target = f64;
    type Pending = ();
    type Output = Prediction;

    const KIND: TaskKind = TaskKind::Ranking;

    fn validate_task_inputs<E: Engine>(&self, labels: &Array1<f64>, options: &FitOptions<E, f64>) -> Result<()> {
        if options.gp_model.is_some() {
            return Err(GPBoostError::invalid_parameter(
                "gp_model",
                "set",
                "not supported for ranking",
            ));
        }
        if options.eval_class_weight.is_some() {
            return Err(GPBoostError::invalid_parameter(
                "eval_class_weight",
                "set",
                "not supported for ranking",
            ));
        }

        let group = options.group.as_ref().ok_or_else(|| {
            GPBoostError::invalid_parameter("group", "None", "Should set group for ranking task")
        })?;
        check_group(group, labels.len(), "group")?;

        if options.eval_set.is_empty() {
            return Ok(());
        }
        let eval_group = options.eval_group.as_ref().ok_or_else(|| {
            GPBoostError::invalid_parameter(
                "eval_group",
                "None",
                "Eval_group cannot be None when eval_set is not None",
            )
        })?;
        if eval_group.len() != options.eval_set.len() {
            return Err(GPBoostError::invalid_parameter(
                "eval_group",
                eval_group.len().to_string(),
                "Length of eval_group should be equal to eval_set",
            ));
        }
        for (index, eval) in options.eval_set.iter().enumerate() {
            let group = eval_group.get(index).ok_or_else(|| {
                GPBoostError::invalid_parameter(
                    "eval_group",
                    format!("index {}", index),
                    "Should set group for all eval datasets for ranking task; \
                     if you use dict, the index should start from 0",
                )
            })?;
            let num_samples = match eval {
                EvalSet::Training => labels.len(),
                EvalSet::Data { labels, .. } => labels.len(),
            };
            check_group(group, num_samples, &format!("eval_group[{}]", index))?;
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

    fn eval_at(&self) -> Option<&[usize]> {
        Some(&self.eval_at)
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

impl<E: Engine> GPBoostModel<E, RankingTask> {
    /// Set the evaluation positions forwarded as `eval_at`.
    pub fn with_eval_at(mut self, eval_at: Vec<usize>) -> Self {
        self.task.eval_at = eval_at;
        self
    }

    /// Evaluation positions forwarded as `eval_at`.
    pub fn eval_at(&self) -> &[usize] {
        self.task.eval_at_positions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockEngine, MockGpModel};
    use ndarray::{array, Array2};
    use std::collections::BTreeMap;

    fn eval(n: usize) -> EvalSet<f64> {
        EvalSet::new(Array2::<f64>::zeros((n, 1)), Array1::zeros(n))
    }

    #[test]
    fn test_group_is_required_and_checked() {
        let task = RankingTask::default();
        let labels = Array1::zeros(4);
        let missing: FitOptions<MockEngine, f64> = FitOptions::new();
        let err = task.validate_task_inputs(&labels, &missing).unwrap_err();
        assert!(err.to_string().contains("Should set group for ranking task"));

        let wrong_sum: FitOptions<MockEngine, f64> = FitOptions::new().with_group(vec![1, 2]);
        assert!(matches!(
            task.validate_task_inputs(&labels, &wrong_sum).unwrap_err(),
            GPBoostError::DimensionMismatch { .. }
        ));

        let ok: FitOptions<MockEngine, f64> = FitOptions::new().with_group(vec![1, 3]);
        assert!(task.validate_task_inputs(&labels, &ok).is_ok());
    }

    #[test]
    fn test_eval_group_rules() {
        let task = RankingTask::default();
        let labels = Array1::zeros(4);

        let missing: FitOptions<MockEngine, f64> =
            FitOptions::new().with_group(vec![4]).with_eval_set(eval(2));
        let err = task.validate_task_inputs(&labels, &missing).unwrap_err();
        assert!(err.to_string().contains("Eval_group cannot be None"));

        let short: FitOptions<MockEngine, f64> = FitOptions::new()
            .with_group(vec![4])
            .with_eval_set(eval(2))
            .with_eval_set(EvalSet::Training)
            .with_eval_group(vec![vec![2usize]]);
        let err = task.validate_task_inputs(&labels, &short).unwrap_err();
        assert!(matches!(err, GPBoostError::InvalidParameter { .. }));
        assert!(err.to_string().contains("Length of eval_group"));

        let gap: FitOptions<MockEngine, f64> = FitOptions::new()
            .with_group(vec![4])
            .with_eval_set(eval(2))
            .with_eval_group(BTreeMap::from([(1usize, vec![2usize])]));
        let err = task.validate_task_inputs(&labels, &gap).unwrap_err();
        assert!(err.to_string().contains("index should start from 0"));

        let good: FitOptions<MockEngine, f64> = FitOptions::new()
            .with_group(vec![4])
            .with_eval_set(eval(2))
            .with_eval_set(EvalSet::Training)
            .with_eval_group(vec![vec![1usize, 1], vec![2, 2]]);
        assert!(task.validate_task_inputs(&labels, &good).is_ok());

        let bad_sum: FitOptions<MockEngine, f64> = FitOptions::new()
            .with_group(vec![4])
            .with_eval_set(eval(2))
            .with_eval_group(vec![vec![3usize]]);
        assert!(task.validate_task_inputs(&labels, &bad_sum).is_err());
    }

    #[test]
    fn test_rejects_gp_model() {
        let task = RankingTask::default();
        let options: FitOptions<MockEngine, f64> = FitOptions::new()
            .with_group(vec![2])
            .with_gp_model(MockGpModel::default());
        let err = task.validate_task_inputs(&array![0.0, 1.0], &options).unwrap_err();
        assert!(err.to_string().contains("gp_model"));
    }

    #[test]
    fn test_default_eval_at_and_objective() {
        let task = RankingTask::default();
        assert_eq!(task.eval_at(), Some(&[1usize, 2, 3, 4, 5][..]));
        assert_eq!(task.resolve_objective(None, None).name(), Some("lambdarank"));
    }
}
