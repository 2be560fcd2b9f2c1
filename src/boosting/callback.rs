//! Per-iteration training callbacks.

use crate::boosting::eval::EvalResult;
use crate::config::ParamMap;
use crate::core::error::Result;

/// Evaluation of one metric on one named dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalRecord {
    /// Validation set name
    pub dataset_name: String,
    /// Metric result
    pub result: EvalResult,
}

/// State visible to a callback after an iteration.
#[derive(Debug, Clone, Copy)]
pub struct CallbackEnv<'a> {
    /// Parameter map used for training
    pub params: &'a ParamMap,
    /// Zero-based index of the finished iteration
    pub iteration: usize,
    /// First iteration of this training run
    pub begin_iteration: usize,
    /// One past the last scheduled iteration
    pub end_iteration: usize,
    /// Evaluation results of this iteration
    pub evaluation_result_list: &'a [EvalRecord],
}

/// A training callback. Returning `GPBoostError::EarlyStopping` stops
/// boosting after the current iteration; any other error aborts training.
pub type Callback = Box<dyn FnMut(&CallbackEnv<'_>) -> Result<()> + Send>;

/// Box a closure as a [`Callback`].
pub fn callback<F>(f: F) -> Callback
where
    F: FnMut(&CallbackEnv<'_>) -> Result<()> + Send + 'static,
{
    Box::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::GPBoostError;

    #[test]
    fn test_callback_can_request_stop() {
        let mut cb = callback(|env| {
            if env.iteration >= 2 {
                Err(GPBoostError::early_stopping("enough"))
            } else {
                Ok(())
            }
        });
        let params = ParamMap::new();
        let records = vec![EvalRecord {
            dataset_name: "valid_0".into(),
            result: EvalResult::new("l2", 0.5, false),
        }];
        let mut env = CallbackEnv {
            params: &params,
            iteration: 0,
            begin_iteration: 0,
            end_iteration: 10,
            evaluation_result_list: &records,
        };
        assert!(cb(&env).is_ok());
        env.iteration = 2;
        assert!(matches!(cb(&env), Err(GPBoostError::EarlyStopping { .. })));
    }
}
