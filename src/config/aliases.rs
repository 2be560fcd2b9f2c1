//! Parameter alias tables and alias resolution.

use crate::config::{ParamMap, ParamValue};

/// Known aliases of engine parameters, main name first.
#[derive(Debug, Clone, Copy)]
pub struct ConfigAliases;

const VERBOSITY: &[&str] = &["verbosity", "verbose"];
const OBJECTIVE: &[&str] = &["objective", "objective_type", "app", "application"];
const NUM_CLASS: &[&str] = &["num_class", "num_classes"];
const EVAL_AT: &[&str] = &["eval_at", "ndcg_eval_at", "ndcg_at", "map_eval_at", "map_at"];
const METRIC: &[&str] = &["metric", "metrics", "metric_types"];
const NUM_THREADS: &[&str] = &["num_threads", "num_thread", "nthread", "nthreads", "n_jobs"];

impl ConfigAliases {
    /// All names for a parameter, including the main name.
    ///
    /// Unknown names have no aliases and resolve to themselves.
    pub fn get(name: &str) -> Vec<&str> {
        let table = [VERBOSITY, OBJECTIVE, NUM_CLASS, EVAL_AT, METRIC, NUM_THREADS];
        table
            .iter()
            .find(|aliases| aliases.contains(&name))
            .map(|aliases| aliases.to_vec())
            .unwrap_or_else(|| vec![name])
    }

    /// Whether any alias of `name` is set in `params`.
    pub fn any_present(name: &str, params: &ParamMap) -> bool {
        Self::get(name).iter().any(|alias| params.contains_key(*alias))
    }

    /// Remove every alias of `name` from `params`.
    pub fn remove_all(name: &str, params: &mut ParamMap) {
        for alias in Self::get(name) {
            params.remove(alias);
        }
    }
}

/// Fold all aliases of `main` into a single entry.
///
/// The main key wins when set and non-null; otherwise the first non-null
/// alias in table order; otherwise `default`. All aliases are removed.
pub fn choose_param_value(main: &str, params: &mut ParamMap, default: ParamValue) {
    let mut found = params
        .get(main)
        .filter(|value| !value.is_null())
        .cloned();
    for alias in ConfigAliases::get(main) {
        if let Some(value) = params.remove(alias) {
            if found.is_none() && !value.is_null() {
                found = Some(value);
            }
        }
    }
    params.insert(main.to_string(), found.unwrap_or(default));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_include_main_name() {
        assert!(ConfigAliases::get("metric").contains(&"metric"));
        assert!(ConfigAliases::get("nthread").contains(&"num_threads"));
        assert_eq!(ConfigAliases::get("max_bin"), vec!["max_bin"]);
    }

    #[test]
    fn test_choose_param_value_prefers_main_key() {
        let mut params = ParamMap::new();
        params.insert("metrics".into(), ParamValue::from("l1"));
        params.insert("metric".into(), ParamValue::from("l2"));
        choose_param_value("metric", &mut params, ParamValue::from("huber"));
        assert_eq!(params.get("metric"), Some(&ParamValue::from("l2")));
        assert!(!params.contains_key("metrics"));
    }

    #[test]
    fn test_choose_param_value_falls_back_to_alias_then_default() {
        let mut params = ParamMap::new();
        params.insert("metric_types".into(), ParamValue::from("auc"));
        choose_param_value("metric", &mut params, ParamValue::from("l2"));
        assert_eq!(params.get("metric"), Some(&ParamValue::from("auc")));

        let mut params = ParamMap::new();
        params.insert("metrics".into(), ParamValue::Null);
        choose_param_value("metric", &mut params, ParamValue::from("l2"));
        assert_eq!(params.get("metric"), Some(&ParamValue::from("l2")));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_any_present_and_remove_all() {
        let mut params = ParamMap::new();
        params.insert("application".into(), ParamValue::from("binary"));
        assert!(ConfigAliases::any_present("objective", &params));
        ConfigAliases::remove_all("objective", &mut params);
        assert!(params.is_empty());
    }
}
