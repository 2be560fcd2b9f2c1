//! Hyperparameter configuration.
//!
//! [`Params`] is the typed hyperparameter set owned by every estimator;
//! [`ParamMap`] is the loosely typed map handed to the engine. The
//! [`aliases`] module knows which engine names refer to the same option.

pub mod aliases;
pub mod params;

pub use aliases::{choose_param_value, ConfigAliases};
pub use params::{Objective, ParamMap, ParamValue, Params, ParamsBuilder, RandomState};

/// File name used by [`Params::load_from_file`] callers by convention.
pub const DEFAULT_CONFIG_FILE: &str = "gpboost.toml";
