//! Core data types for the GPBoost estimator layer.
//!
//! Small closed enumerations shared by configuration, the estimator and the
//! engine traits. Each one renders to the string the engine expects in its
//! parameter map.

use crate::core::error::{GPBoostError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prediction and gradient value type used across the engine boundary.
pub type Score = f64;

/// Boosting strategy types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoostingType {
    /// Gradient Boosting Decision Tree
    #[serde(rename = "gbdt")]
    GBDT,
    /// Dropouts meet Multiple Additive Regression Trees
    #[serde(rename = "dart")]
    DART,
    /// Gradient One-Side Sampling
    #[serde(rename = "goss")]
    GOSS,
    /// Random Forest
    #[serde(rename = "rf")]
    RandomForest,
}

impl Default for BoostingType {
    fn default() -> Self {
        BoostingType::GBDT
    }
}

impl fmt::Display for BoostingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoostingType::GBDT => write!(f, "gbdt"),
            BoostingType::DART => write!(f, "dart"),
            BoostingType::GOSS => write!(f, "goss"),
            BoostingType::RandomForest => write!(f, "rf"),
        }
    }
}

impl FromStr for BoostingType {
    type Err = GPBoostError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gbdt" | "gbrt" => Ok(BoostingType::GBDT),
            "dart" => Ok(BoostingType::DART),
            "goss" => Ok(BoostingType::GOSS),
            "rf" | "random_forest" => Ok(BoostingType::RandomForest),
            other => Err(GPBoostError::invalid_parameter(
                "boosting_type",
                other,
                "expected one of gbdt, dart, goss, rf",
            )),
        }
    }
}

/// Feature importance calculation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportanceType {
    /// Number of times a feature is used in a split
    #[serde(rename = "split")]
    Split,
    /// Total gain of the splits using the feature
    #[serde(rename = "gain")]
    Gain,
}

impl Default for ImportanceType {
    fn default() -> Self {
        ImportanceType::Split
    }
}

impl fmt::Display for ImportanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportanceType::Split => write!(f, "split"),
            ImportanceType::Gain => write!(f, "gain"),
        }
    }
}

impl FromStr for ImportanceType {
    type Err = GPBoostError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "split" => Ok(ImportanceType::Split),
            "gain" => Ok(ImportanceType::Gain),
            other => Err(GPBoostError::invalid_parameter(
                "importance_type",
                other,
                "expected split or gain",
            )),
        }
    }
}

/// The learning task an estimator is specialised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    /// Continuous targets
    Regression,
    /// Discrete class labels
    Classification,
    /// Relevance labels within query groups
    Ranking,
}

impl TaskKind {
    /// Objective used when none is configured.
    pub fn default_objective(&self) -> &'static str {
        match self {
            TaskKind::Regression => "regression",
            TaskKind::Classification => "binary",
            TaskKind::Ranking => "lambdarank",
        }
    }

    /// Metric registered when the objective is not a builtin name.
    pub fn default_metric(&self, n_classes: Option<usize>) -> &'static str {
        match self {
            TaskKind::Regression => "l2",
            TaskKind::Classification => match n_classes {
                Some(n) if n > 2 => "multi_logloss",
                _ => "binary_logloss",
            },
            TaskKind::Ranking => "ndcg",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Regression => write!(f, "regression"),
            TaskKind::Classification => write!(f, "classification"),
            TaskKind::Ranking => write!(f, "ranking"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boosting_type_round_trips_through_str() {
        for kind in [
            BoostingType::GBDT,
            BoostingType::DART,
            BoostingType::GOSS,
            BoostingType::RandomForest,
        ] {
            assert_eq!(kind.to_string().parse::<BoostingType>().unwrap(), kind);
        }
        assert!("xgboost".parse::<BoostingType>().is_err());
    }

    #[test]
    fn test_importance_type_parse() {
        assert_eq!("gain".parse::<ImportanceType>().unwrap(), ImportanceType::Gain);
        assert_eq!(ImportanceType::default(), ImportanceType::Split);
        assert!("cover".parse::<ImportanceType>().is_err());
    }

    #[test]
    fn test_task_defaults() {
        assert_eq!(TaskKind::Regression.default_objective(), "regression");
        assert_eq!(TaskKind::Classification.default_objective(), "binary");
        assert_eq!(TaskKind::Ranking.default_objective(), "lambdarank");

        assert_eq!(TaskKind::Regression.default_metric(None), "l2");
        assert_eq!(TaskKind::Classification.default_metric(Some(2)), "binary_logloss");
        assert_eq!(TaskKind::Classification.default_metric(Some(3)), "multi_logloss");
        assert_eq!(TaskKind::Ranking.default_metric(None), "ndcg");
    }

    #[test]
    fn test_serde_names_match_display() {
        let json = serde_json::to_string(&BoostingType::RandomForest).unwrap();
        assert_eq!(json, "\"rf\"");
        let parsed: ImportanceType = serde_json::from_str("\"gain\"").unwrap();
        assert_eq!(parsed, ImportanceType::Gain);
    }
}
