//! Default hyperparameter values and fixed engine vocabulary.

/// Default number of leaves for each tree.
pub const DEFAULT_NUM_LEAVES: usize = 31;

/// Default maximum tree depth. Negative value means no limit.
pub const DEFAULT_MAX_DEPTH: i32 = -1;

/// Default learning rate (shrinkage) for gradient boosting.
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Default number of boosting rounds.
pub const DEFAULT_N_ESTIMATORS: usize = 100;

/// Default number of samples used to construct feature bins.
pub const DEFAULT_SUBSAMPLE_FOR_BIN: usize = 200_000;

/// Default minimum loss reduction required to split a leaf.
pub const DEFAULT_MIN_SPLIT_GAIN: f64 = 0.0;

/// Default minimum sum of hessian values required in a leaf.
pub const DEFAULT_MIN_CHILD_WEIGHT: f64 = 1e-3;

/// Default minimum number of data points required in a leaf.
pub const DEFAULT_MIN_CHILD_SAMPLES: usize = 20;

/// Default bagging fraction.
pub const DEFAULT_SUBSAMPLE: f64 = 1.0;

/// Default bagging frequency (0 disables bagging).
pub const DEFAULT_SUBSAMPLE_FREQ: usize = 0;

/// Default fraction of features sampled per tree.
pub const DEFAULT_COLSAMPLE_BYTREE: f64 = 1.0;

/// Default L1 regularization.
pub const DEFAULT_REG_ALPHA: f64 = 0.0;

/// Default L2 regularization.
pub const DEFAULT_REG_LAMBDA: f64 = 0.0;

/// Default thread count. Non-positive means all cores.
pub const DEFAULT_N_JOBS: i32 = -1;

/// Minimum number of samples accepted by `fit`.
pub const MIN_TRAINING_SAMPLES: usize = 2;

/// Exclusive upper bound for seeds drawn from a random generator.
pub const MAX_DRAWN_SEED: i64 = i32::MAX as i64;

/// Objective value telling the engine that gradients come from the caller.
pub const CUSTOM_OBJECTIVE_SENTINEL: &str = "None";

/// Verbosity sent to the engine for silent estimators.
pub const SILENT_VERBOSITY: i64 = -1;

/// Default evaluation positions for ranking metrics.
pub const DEFAULT_EVAL_AT: [usize; 5] = [1, 2, 3, 4, 5];

/// One-vs-rest objective names that keep their objective on multi-class data.
pub const OVA_OBJECTIVES: [&str; 4] = ["multiclassova", "multiclass_ova", "ova", "ovr"];

/// Objective forced on classification problems with more than two classes.
pub const MULTICLASS_OBJECTIVE: &str = "multiclass";

/// Prefix of engine-generated feature names.
pub const AUTO_FEATURE_PREFIX: &str = "Column_";
