//! Hyperparameter set and parameter values.
//!
//! [`Params`] holds one typed field per recognised hyperparameter plus
//! `other_params`, a side map of everything else. Unknown keys are kept
//! verbatim and merged into the engine parameter map at fit time.

use crate::boosting::CustomObjective;
use crate::core::constants::*;
use crate::core::error::{GPBoostError, Result};
use crate::core::types::{BoostingType, ImportanceType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// A single parameter value as exchanged with the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Absent / null value
    Null,
    /// Boolean flag
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    Str(String),
    /// Ordered list of values
    List(Vec<ParamValue>),
    /// Nested map of values
    Map(BTreeMap<String, ParamValue>),
}

/// Parameter map handed to the engine.
pub type ParamMap = BTreeMap<String, ParamValue>;

impl ParamValue {
    /// Name of the value's kind, used in type mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::Null => "null",
            ParamValue::Bool(_) => "bool",
            ParamValue::Int(_) => "integer",
            ParamValue::Float(_) => "float",
            ParamValue::Str(_) => "string",
            ParamValue::List(_) => "list",
            ParamValue::Map(_) => "map",
        }
    }

    /// Whether this is [`ParamValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }

    /// Integer value, if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value; integers widen to floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean value, if this is a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// String slice, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(v) => Some(v),
            _ => None,
        }
    }

    /// List slice, if this is a list.
    pub fn as_list(&self) -> Option<&[ParamValue]> {
        match self {
            ParamValue::List(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Null => write!(f, "None"),
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Str(v) => write!(f, "{}", v),
            ParamValue::List(items) => {
                let parts: Vec<String> = items.iter().map(|item| item.to_string()).collect();
                write!(f, "[{}]", parts.join(","))
            }
            ParamValue::Map(entries) => {
                let parts: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| format!("{}:{}", key, value))
                    .collect();
                write!(f, "{{{}}}", parts.join(","))
            }
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        ParamValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(ParamValue::Null)
    }
}

/// Source of the random seed sent to the engine.
#[derive(Debug, Clone)]
pub enum RandomState {
    /// Fixed seed passed through as an integer
    Seed(u64),
    /// Generator that draws a fresh seed on every fit
    Generator(StdRng),
}

impl RandomState {
    /// Seeded generator variant.
    pub fn generator_from_seed(seed: u64) -> Self {
        RandomState::Generator(StdRng::seed_from_u64(seed))
    }

    /// Seed to send to the engine. Generators advance on every call.
    pub fn resolve_seed(&mut self) -> i64 {
        match self {
            RandomState::Seed(seed) => *seed as i64,
            RandomState::Generator(rng) => rng.gen_range(0..MAX_DRAWN_SEED),
        }
    }
}

impl Serialize for RandomState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            RandomState::Seed(seed) => serializer.serialize_u64(*seed),
            RandomState::Generator(_) => Err(serde::ser::Error::custom(
                "a random generator cannot be serialized; use an integer seed",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for RandomState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        u64::deserialize(deserializer).map(RandomState::Seed)
    }
}

/// Objective configured on an estimator.
#[derive(Clone)]
pub enum Objective {
    /// Objective implemented by the engine, by name
    Builtin(String),
    /// Gradients and hessians computed by a caller function
    Custom(CustomObjective),
}

impl Objective {
    /// Builtin objective name, if this is one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Objective::Builtin(name) => Some(name),
            Objective::Custom(_) => None,
        }
    }

    /// Whether the objective is a caller function.
    pub fn is_custom(&self) -> bool {
        matches!(self, Objective::Custom(_))
    }

    /// Value reported by `get_params`; custom objectives report null.
    pub fn to_param_value(&self) -> ParamValue {
        match self {
            Objective::Builtin(name) => ParamValue::Str(name.clone()),
            Objective::Custom(_) => ParamValue::Null,
        }
    }
}

impl fmt::Debug for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Objective::Builtin(name) => f.debug_tuple("Builtin").field(name).finish(),
            Objective::Custom(custom) => f.debug_tuple("Custom").field(custom).finish(),
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Objective::Builtin(name) => write!(f, "{}", name),
            Objective::Custom(custom) => write!(f, "<custom objective: {} arguments>", custom.arity()),
        }
    }
}

impl From<&str> for Objective {
    fn from(name: &str) -> Self {
        Objective::Builtin(name.to_string())
    }
}

impl From<String> for Objective {
    fn from(name: String) -> Self {
        Objective::Builtin(name)
    }
}

impl From<CustomObjective> for Objective {
    fn from(custom: CustomObjective) -> Self {
        Objective::Custom(custom)
    }
}

impl Serialize for Objective {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Objective::Builtin(name) => serializer.serialize_str(name),
            Objective::Custom(_) => Err(serde::ser::Error::custom(
                "custom objective functions cannot be serialized",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Objective {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(Objective::Builtin)
    }
}

/// Hyperparameters of a GPBoost estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Boosting strategy
    pub boosting_type: BoostingType,
    /// Maximum tree leaves for base learners
    pub num_leaves: usize,
    /// Maximum tree depth, non-positive means no limit
    pub max_depth: i32,
    /// Boosting learning rate
    pub learning_rate: f64,
    /// Number of boosting rounds
    pub n_estimators: usize,
    /// Number of samples for constructing bins
    pub subsample_for_bin: usize,
    /// Learning objective; `None` selects the task default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<Objective>,
    /// Minimum loss reduction required to make a split
    pub min_split_gain: f64,
    /// Minimum sum of instance weight (hessian) in a child
    pub min_child_weight: f64,
    /// Minimum number of data needed in a child
    pub min_child_samples: usize,
    /// Subsample ratio of the training instances
    pub subsample: f64,
    /// Frequency of subsampling, 0 disables it
    pub subsample_freq: usize,
    /// Subsample ratio of columns when constructing each tree
    pub colsample_bytree: f64,
    /// L1 regularization term on weights
    pub reg_alpha: f64,
    /// L2 regularization term on weights
    pub reg_lambda: f64,
    /// Random number seed or generator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_state: Option<RandomState>,
    /// Number of threads, non-positive means all cores
    pub n_jobs: i32,
    /// Whether to silence engine messages while running boosting
    pub silent: bool,
    /// Type of feature importance reported by `feature_importances`
    pub importance_type: ImportanceType,
    /// Unrecognised parameters, forwarded to the engine unchanged
    pub other_params: ParamMap,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            boosting_type: BoostingType::default(),
            num_leaves: DEFAULT_NUM_LEAVES,
            max_depth: DEFAULT_MAX_DEPTH,
            learning_rate: DEFAULT_LEARNING_RATE,
            n_estimators: DEFAULT_N_ESTIMATORS,
            subsample_for_bin: DEFAULT_SUBSAMPLE_FOR_BIN,
            objective: None,
            min_split_gain: DEFAULT_MIN_SPLIT_GAIN,
            min_child_weight: DEFAULT_MIN_CHILD_WEIGHT,
            min_child_samples: DEFAULT_MIN_CHILD_SAMPLES,
            subsample: DEFAULT_SUBSAMPLE,
            subsample_freq: DEFAULT_SUBSAMPLE_FREQ,
            colsample_bytree: DEFAULT_COLSAMPLE_BYTREE,
            reg_alpha: DEFAULT_REG_ALPHA,
            reg_lambda: DEFAULT_REG_LAMBDA,
            random_state: None,
            n_jobs: DEFAULT_N_JOBS,
            silent: true,
            importance_type: ImportanceType::default(),
            other_params: ParamMap::new(),
        }
    }
}

impl Params {
    /// Create a parameter set with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate parameter ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0) {
            return Err(GPBoostError::invalid_parameter(
                "learning_rate",
                self.learning_rate.to_string(),
                "must be greater than 0",
            ));
        }

        if self.num_leaves < 2 {
            return Err(GPBoostError::invalid_parameter(
                "num_leaves",
                self.num_leaves.to_string(),
                "must be at least 2",
            ));
        }

        for (name, value) in [
            ("subsample", self.subsample),
            ("colsample_bytree", self.colsample_bytree),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(GPBoostError::invalid_parameter(
                    name,
                    value.to_string(),
                    "must be in range (0.0, 1.0]",
                ));
            }
        }

        for (name, value) in [
            ("reg_alpha", self.reg_alpha),
            ("reg_lambda", self.reg_lambda),
            ("min_split_gain", self.min_split_gain),
            ("min_child_weight", self.min_child_weight),
        ] {
            if !(value >= 0.0) {
                return Err(GPBoostError::invalid_parameter(
                    name,
                    value.to_string(),
                    "must be non-negative",
                ));
            }
        }

        Ok(())
    }

    /// All parameters as a map, recognised fields first, then `other_params`.
    ///
    /// Custom objectives and random generators are reported as null.
    pub fn to_param_map(&self) -> ParamMap {
        let mut map = ParamMap::new();
        map.insert("boosting_type".into(), self.boosting_type.to_string().into());
        map.insert("num_leaves".into(), self.num_leaves.into());
        map.insert("max_depth".into(), self.max_depth.into());
        map.insert("learning_rate".into(), self.learning_rate.into());
        map.insert("n_estimators".into(), self.n_estimators.into());
        map.insert("subsample_for_bin".into(), self.subsample_for_bin.into());
        map.insert(
            "objective".into(),
            self.objective
                .as_ref()
                .map(Objective::to_param_value)
                .unwrap_or(ParamValue::Null),
        );
        map.insert("min_split_gain".into(), self.min_split_gain.into());
        map.insert("min_child_weight".into(), self.min_child_weight.into());
        map.insert("min_child_samples".into(), self.min_child_samples.into());
        map.insert("subsample".into(), self.subsample.into());
        map.insert("subsample_freq".into(), self.subsample_freq.into());
        map.insert("colsample_bytree".into(), self.colsample_bytree.into());
        map.insert("reg_alpha".into(), self.reg_alpha.into());
        map.insert("reg_lambda".into(), self.reg_lambda.into());
        map.insert(
            "random_state".into(),
            match &self.random_state {
                Some(RandomState::Seed(seed)) => ParamValue::Int(*seed as i64),
                _ => ParamValue::Null,
            },
        );
        map.insert("n_jobs".into(), self.n_jobs.into());
        map.insert("silent".into(), self.silent.into());
        map.insert("importance_type".into(), self.importance_type.to_string().into());
        for (key, value) in &self.other_params {
            map.insert(key.clone(), value.clone());
        }
        map
    }

    /// Set a single parameter by name.
    ///
    /// Recognised names are converted into their field type; a value of the
    /// wrong kind is a type mismatch. Any other name goes to `other_params`.
    pub fn set(&mut self, key: &str, value: ParamValue) -> Result<()> {
        match key {
            "boosting_type" => self.boosting_type = expect_str(key, &value)?.parse()?,
            "num_leaves" => self.num_leaves = expect_usize(key, &value)?,
            "max_depth" => self.max_depth = expect_i32(key, &value)?,
            "learning_rate" => self.learning_rate = expect_f64(key, &value)?,
            "n_estimators" => self.n_estimators = expect_usize(key, &value)?,
            "subsample_for_bin" => self.subsample_for_bin = expect_usize(key, &value)?,
            "objective" => {
                self.objective = match value {
                    ParamValue::Null => None,
                    ParamValue::Str(name) => Some(Objective::Builtin(name)),
                    other => return Err(GPBoostError::type_mismatch(key, "string or null", other.kind())),
                }
            }
            "min_split_gain" => self.min_split_gain = expect_f64(key, &value)?,
            "min_child_weight" => self.min_child_weight = expect_f64(key, &value)?,
            "min_child_samples" => self.min_child_samples = expect_usize(key, &value)?,
            "subsample" => self.subsample = expect_f64(key, &value)?,
            "subsample_freq" => self.subsample_freq = expect_usize(key, &value)?,
            "colsample_bytree" => self.colsample_bytree = expect_f64(key, &value)?,
            "reg_alpha" => self.reg_alpha = expect_f64(key, &value)?,
            "reg_lambda" => self.reg_lambda = expect_f64(key, &value)?,
            "random_state" => {
                self.random_state = match value {
                    ParamValue::Null => None,
                    ParamValue::Int(seed) if seed >= 0 => Some(RandomState::Seed(seed as u64)),
                    ParamValue::Int(seed) => {
                        return Err(GPBoostError::invalid_parameter(
                            key,
                            seed.to_string(),
                            "seed must be non-negative",
                        ))
                    }
                    other => return Err(GPBoostError::type_mismatch(key, "integer or null", other.kind())),
                }
            }
            "n_jobs" => self.n_jobs = expect_i32(key, &value)?,
            "silent" => {
                self.silent = value
                    .as_bool()
                    .ok_or_else(|| GPBoostError::type_mismatch(key, "bool", value.kind()))?
            }
            "importance_type" => self.importance_type = expect_str(key, &value)?.parse()?,
            _ => {
                self.other_params.insert(key.to_string(), value);
            }
        }
        Ok(())
    }

    /// Set several parameters; stops at the first failure.
    pub fn set_params<I, K>(&mut self, params: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, ParamValue)>,
        K: AsRef<str>,
    {
        for (key, value) in params {
            self.set(key.as_ref(), value)?;
        }
        Ok(())
    }

    /// Thread count sent to the engine for `n_jobs`.
    pub fn effective_num_threads(&self) -> usize {
        if self.n_jobs <= 0 {
            num_cpus::get()
        } else {
            self.n_jobs as usize
        }
    }

    /// Load parameters from a `.json` or `.toml` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| GPBoostError::config(format!("Failed to read config file: {}", e)))?;

        let params: Params = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| GPBoostError::config(format!("Failed to parse JSON config: {}", e)))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| GPBoostError::config(format!("Failed to parse TOML config: {}", e)))?,
            _ => {
                return Err(GPBoostError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        params.validate()?;
        Ok(params)
    }

    /// Save parameters to a `.json` or `.toml` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            _ => {
                return Err(GPBoostError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `GPBOOST_*` environment variable overrides
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("GPBOOST_N_ESTIMATORS") {
            self.n_estimators = val
                .parse()
                .map_err(|_| GPBoostError::config("Invalid GPBOOST_N_ESTIMATORS"))?;
        }

        if let Some(val) = lookup("GPBOOST_LEARNING_RATE") {
            self.learning_rate = val
                .parse()
                .map_err(|_| GPBoostError::config("Invalid GPBOOST_LEARNING_RATE"))?;
        }

        if let Some(val) = lookup("GPBOOST_NUM_LEAVES") {
            self.num_leaves = val
                .parse()
                .map_err(|_| GPBoostError::config("Invalid GPBOOST_NUM_LEAVES"))?;
        }

        if let Some(val) = lookup("GPBOOST_OBJECTIVE") {
            if val.is_empty() {
                return Err(GPBoostError::config("Invalid GPBOOST_OBJECTIVE"));
            }
            self.objective = Some(Objective::Builtin(val));
        }

        if let Some(val) = lookup("GPBOOST_N_JOBS") {
            self.n_jobs = val
                .parse()
                .map_err(|_| GPBoostError::config("Invalid GPBOOST_N_JOBS"))?;
        }

        if let Some(val) = lookup("GPBOOST_RANDOM_STATE") {
            let seed = val
                .parse()
                .map_err(|_| GPBoostError::config("Invalid GPBOOST_RANDOM_STATE"))?;
            self.random_state = Some(RandomState::Seed(seed));
        }

        self.validate()
    }
}

fn expect_f64(key: &str, value: &ParamValue) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| GPBoostError::type_mismatch(key, "number", value.kind()))
}

fn expect_i32(key: &str, value: &ParamValue) -> Result<i32> {
    let v = value
        .as_i64()
        .ok_or_else(|| GPBoostError::type_mismatch(key, "integer", value.kind()))?;
    i32::try_from(v).map_err(|_| GPBoostError::invalid_parameter(key, v.to_string(), "out of range"))
}

fn expect_usize(key: &str, value: &ParamValue) -> Result<usize> {
    let v = value
        .as_i64()
        .ok_or_else(|| GPBoostError::type_mismatch(key, "integer", value.kind()))?;
    usize::try_from(v)
        .map_err(|_| GPBoostError::invalid_parameter(key, v.to_string(), "must be non-negative"))
}

fn expect_str<'a>(key: &str, value: &'a ParamValue) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| GPBoostError::type_mismatch(key, "string", value.kind()))
}

/// Fluent builder for [`Params`]
#[derive(Debug, Clone)]
pub struct ParamsBuilder {
    params: Params,
    validation_errors: Vec<String>,
}

impl ParamsBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        ParamsBuilder {
            params: Params::default(),
            validation_errors: Vec::new(),
        }
    }

    /// Set the boosting type
    pub fn boosting_type(mut self, boosting_type: BoostingType) -> Self {
        self.params.boosting_type = boosting_type;
        self
    }

    /// Set the number of leaves
    pub fn num_leaves(mut self, leaves: usize) -> Self {
        if leaves < 2 {
            self.validation_errors
                .push("num_leaves must be at least 2".to_string());
        }
        self.params.num_leaves = leaves;
        self
    }

    /// Set the maximum tree depth
    pub fn max_depth(mut self, depth: i32) -> Self {
        self.params.max_depth = depth;
        self
    }

    /// Set the learning rate
    pub fn learning_rate(mut self, rate: f64) -> Self {
        if !(rate > 0.0) {
            self.validation_errors
                .push("learning_rate must be greater than 0".to_string());
        }
        self.params.learning_rate = rate;
        self
    }

    /// Set the number of boosting rounds
    pub fn n_estimators(mut self, rounds: usize) -> Self {
        self.params.n_estimators = rounds;
        self
    }

    /// Set a builtin objective by name
    pub fn objective<S: Into<String>>(mut self, name: S) -> Self {
        self.params.objective = Some(Objective::Builtin(name.into()));
        self
    }

    /// Set a caller-supplied objective
    pub fn custom_objective(mut self, objective: CustomObjective) -> Self {
        self.params.objective = Some(Objective::Custom(objective));
        self
    }

    /// Set the minimum split gain
    pub fn min_split_gain(mut self, gain: f64) -> Self {
        self.params.min_split_gain = gain;
        self
    }

    /// Set the minimum child weight
    pub fn min_child_weight(mut self, weight: f64) -> Self {
        self.params.min_child_weight = weight;
        self
    }

    /// Set the minimum number of samples per leaf
    pub fn min_child_samples(mut self, samples: usize) -> Self {
        self.params.min_child_samples = samples;
        self
    }

    /// Set the row subsample ratio and frequency
    pub fn subsample(mut self, ratio: f64, freq: usize) -> Self {
        if !(ratio > 0.0 && ratio <= 1.0) {
            self.validation_errors
                .push("subsample must be in range (0.0, 1.0]".to_string());
        }
        self.params.subsample = ratio;
        self.params.subsample_freq = freq;
        self
    }

    /// Set the column subsample ratio
    pub fn colsample_bytree(mut self, ratio: f64) -> Self {
        if !(ratio > 0.0 && ratio <= 1.0) {
            self.validation_errors
                .push("colsample_bytree must be in range (0.0, 1.0]".to_string());
        }
        self.params.colsample_bytree = ratio;
        self
    }

    /// Set L1 and L2 regularization
    pub fn regularization(mut self, alpha: f64, lambda: f64) -> Self {
        self.params.reg_alpha = alpha;
        self.params.reg_lambda = lambda;
        self
    }

    /// Use a fixed random seed
    pub fn random_state(mut self, seed: u64) -> Self {
        self.params.random_state = Some(RandomState::Seed(seed));
        self
    }

    /// Draw a fresh seed from `rng` on every fit
    pub fn random_generator(mut self, rng: StdRng) -> Self {
        self.params.random_state = Some(RandomState::Generator(rng));
        self
    }

    /// Set the thread count
    pub fn n_jobs(mut self, n_jobs: i32) -> Self {
        self.params.n_jobs = n_jobs;
        self
    }

    /// Enable or disable engine output
    pub fn silent(mut self, silent: bool) -> Self {
        self.params.silent = silent;
        self
    }

    /// Set the importance type
    pub fn importance_type(mut self, importance_type: ImportanceType) -> Self {
        self.params.importance_type = importance_type;
        self
    }

    /// Add an engine parameter that has no dedicated field
    pub fn other_param<K: Into<String>, V: Into<ParamValue>>(mut self, key: K, value: V) -> Self {
        let key = key.into();
        let value = value.into();
        if let Err(e) = self.params.set(&key, value) {
            self.validation_errors.push(e.to_string());
        }
        self
    }

    /// Build the parameter set
    pub fn build(self) -> Result<Params> {
        if !self.validation_errors.is_empty() {
            return Err(GPBoostError::config(format!(
                "Parameter validation failed: {}",
                self.validation_errors.join(", ")
            )));
        }

        self.params.validate()?;
        Ok(self.params)
    }
}

impl Default for ParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_params_default() {
        let params = Params::default();
        assert_eq!(params.boosting_type, BoostingType::GBDT);
        assert_eq!(params.num_leaves, 31);
        assert_eq!(params.max_depth, -1);
        assert_eq!(params.learning_rate, 0.1);
        assert_eq!(params.n_estimators, 100);
        assert_eq!(params.subsample_for_bin, 200_000);
        assert!(params.objective.is_none());
        assert_eq!(params.min_child_weight, 1e-3);
        assert_eq!(params.min_child_samples, 20);
        assert_eq!(params.n_jobs, -1);
        assert!(params.silent);
        assert_eq!(params.importance_type, ImportanceType::Split);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_params_validation() {
        let mut params = Params::default();
        params.learning_rate = 0.0;
        assert!(params.validate().is_err());

        let mut params = Params::default();
        params.num_leaves = 1;
        assert!(params.validate().is_err());

        let mut params = Params::default();
        params.subsample = 1.5;
        assert!(params.validate().is_err());

        let mut params = Params::default();
        params.reg_lambda = -1.0;
        assert!(params.validate().is_err());

        let mut params = Params::default();
        params.colsample_bytree = f64::NAN;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_set_recognised_and_unknown_keys() {
        let mut params = Params::default();
        params.set("num_leaves", ParamValue::Int(63)).unwrap();
        params.set("learning_rate", ParamValue::Int(1)).unwrap();
        params.set("max_bin", ParamValue::Int(127)).unwrap();
        assert_eq!(params.num_leaves, 63);
        assert_eq!(params.learning_rate, 1.0);
        assert_eq!(params.other_params.get("max_bin"), Some(&ParamValue::Int(127)));

        let map = params.to_param_map();
        assert_eq!(map.get("max_bin"), Some(&ParamValue::Int(127)));
        assert_eq!(map.get("num_leaves"), Some(&ParamValue::Int(63)));
    }

    #[test]
    fn test_set_type_mismatch() {
        let mut params = Params::default();
        let err = params.set("num_leaves", ParamValue::from("abc")).unwrap_err();
        assert!(matches!(err, GPBoostError::TypeMismatch { .. }));
        assert_eq!(params.num_leaves, 31);

        let err = params.set("silent", ParamValue::Int(1)).unwrap_err();
        assert!(matches!(err, GPBoostError::TypeMismatch { .. }));

        let err = params.set("objective", ParamValue::Int(1)).unwrap_err();
        assert!(matches!(err, GPBoostError::TypeMismatch { .. }));
    }

    #[test]
    fn test_set_objective_and_random_state() {
        let mut params = Params::default();
        params.set("objective", ParamValue::from("huber")).unwrap();
        assert_eq!(params.objective.as_ref().and_then(Objective::name), Some("huber"));
        params.set("objective", ParamValue::Null).unwrap();
        assert!(params.objective.is_none());

        params.set("random_state", ParamValue::Int(7)).unwrap();
        assert!(matches!(params.random_state, Some(RandomState::Seed(7))));
        assert!(params.set("random_state", ParamValue::Int(-3)).is_err());
    }

    #[test]
    fn test_generator_draws_in_range_and_advances() {
        let mut state = RandomState::generator_from_seed(42);
        let first = state.resolve_seed();
        let second = state.resolve_seed();
        assert!((0..MAX_DRAWN_SEED).contains(&first));
        assert!((0..MAX_DRAWN_SEED).contains(&second));

        let mut replay = RandomState::generator_from_seed(42);
        assert_eq!(replay.resolve_seed(), first);

        let mut fixed = RandomState::Seed(9);
        assert_eq!(fixed.resolve_seed(), 9);
        assert_eq!(fixed.resolve_seed(), 9);
    }

    #[test]
    fn test_param_map_reports_custom_parts_as_null() {
        let params = ParamsBuilder::new()
            .custom_objective(CustomObjective::basic(|labels, preds| {
                Ok((&preds - &labels, ndarray::Array1::ones(labels.len())))
            }))
            .random_generator(StdRng::seed_from_u64(1))
            .build()
            .unwrap();
        let map = params.to_param_map();
        assert_eq!(map.get("objective"), Some(&ParamValue::Null));
        assert_eq!(map.get("random_state"), Some(&ParamValue::Null));
    }

    #[test]
    fn test_builder() {
        let params = ParamsBuilder::new()
            .n_estimators(10)
            .learning_rate(0.05)
            .num_leaves(15)
            .objective("binary")
            .other_param("max_bin", 63)
            .build()
            .unwrap();
        assert_eq!(params.n_estimators, 10);
        assert_eq!(params.num_leaves, 15);
        assert_eq!(params.other_params.get("max_bin"), Some(&ParamValue::Int(63)));

        assert!(ParamsBuilder::new().learning_rate(-0.1).build().is_err());
        assert!(ParamsBuilder::new().num_leaves(1).build().is_err());
        assert!(ParamsBuilder::new().other_param("num_leaves", "x").build().is_err());
    }

    #[test]
    fn test_environment_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GPBOOST_N_ESTIMATORS", "25"),
            ("GPBOOST_OBJECTIVE", "poisson"),
            ("GPBOOST_RANDOM_STATE", "3"),
        ]
        .into_iter()
        .collect();
        let mut params = Params::default();
        params
            .apply_overrides_from(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(params.n_estimators, 25);
        assert_eq!(params.objective.as_ref().and_then(Objective::name), Some("poisson"));
        assert!(matches!(params.random_state, Some(RandomState::Seed(3))));

        let mut params = Params::default();
        let result = params.apply_overrides_from(|name| {
            (name == "GPBOOST_LEARNING_RATE").then(|| "fast".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_effective_num_threads() {
        let mut params = Params::default();
        assert_eq!(params.effective_num_threads(), num_cpus::get());
        params.n_jobs = 3;
        assert_eq!(params.effective_num_threads(), 3);
    }

    #[test]
    fn test_param_value_display() {
        let value = ParamValue::from(vec!["l2", "l1"]);
        assert_eq!(value.to_string(), "[l2,l1]");
        assert_eq!(ParamValue::Null.to_string(), "None");
        assert_eq!(ParamValue::from(Some(3)).as_i64(), Some(3));
    }
}
