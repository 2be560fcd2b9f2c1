//! Caller-side data containers and their validation.
//!
//! Features arrive either as a dense `ndarray` matrix or, with the `polars`
//! feature, as a `DataFrame`. Everything handed to the engine for one
//! dataset handle is bundled in [`DatasetParts`].

pub mod class_weight;
pub mod label_encoder;
pub mod validation;

pub use class_weight::{compute_sample_weight, ClassWeight};
pub use label_encoder::{ClassLabel, LabelEncoder};
pub use validation::{
    assert_all_finite, check_classification_targets, check_group, check_sample_weight, check_xy,
};

use ndarray::{Array1, Array2};
use std::collections::BTreeMap;

#[cfg(feature = "polars")]
use polars::prelude::DataFrame;

/// Feature matrix in one of the supported layouts.
#[derive(Debug, Clone)]
pub enum Features {
    /// Dense row-major samples by features matrix
    Dense(Array2<f64>),
    /// Framework-native frame; shape and finiteness checks are skipped
    #[cfg(feature = "polars")]
    Frame(DataFrame),
}

impl Features {
    /// Number of samples.
    pub fn num_rows(&self) -> usize {
        match self {
            Features::Dense(x) => x.nrows(),
            #[cfg(feature = "polars")]
            Features::Frame(df) => df.height(),
        }
    }

    /// Number of feature columns.
    pub fn num_columns(&self) -> usize {
        match self {
            Features::Dense(x) => x.ncols(),
            #[cfg(feature = "polars")]
            Features::Frame(df) => df.width(),
        }
    }

    /// Dense matrix, if the features are dense.
    pub fn as_dense(&self) -> Option<&Array2<f64>> {
        match self {
            Features::Dense(x) => Some(x),
            #[cfg(feature = "polars")]
            Features::Frame(_) => None,
        }
    }

    /// Column names carried by the container itself.
    pub fn column_names(&self) -> Option<Vec<String>> {
        match self {
            Features::Dense(_) => None,
            #[cfg(feature = "polars")]
            Features::Frame(df) => Some(
                df.get_column_names()
                    .into_iter()
                    .map(|name| name.to_string())
                    .collect(),
            ),
        }
    }
}

impl From<Array2<f64>> for Features {
    fn from(x: Array2<f64>) -> Self {
        Features::Dense(x)
    }
}

#[cfg(feature = "polars")]
impl From<DataFrame> for Features {
    fn from(df: DataFrame) -> Self {
        Features::Frame(df)
    }
}

/// Feature names for the training dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeatureName {
    /// Use the container's column names, or generated names
    #[default]
    Auto,
    /// Explicit names, one per column
    Names(Vec<String>),
}

/// Which features the engine should treat as categorical.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoricalFeature {
    /// Infer from the container (categorical frame columns)
    #[default]
    Auto,
    /// Column indices
    Indices(Vec<usize>),
    /// Column names
    Names(Vec<String>),
}

/// One validation set passed to `fit`.
#[derive(Debug, Clone)]
pub enum EvalSet<L> {
    /// Evaluate on the training data itself, reusing its dataset handle
    Training,
    /// A separate validation sample
    Data {
        /// Validation features
        features: Features,
        /// Validation labels
        labels: Array1<L>,
    },
}

impl<L> EvalSet<L> {
    /// Separate validation data.
    pub fn new<X: Into<Features>>(features: X, labels: Array1<L>) -> Self {
        EvalSet::Data {
            features: features.into(),
            labels,
        }
    }
}

/// Per-eval-set values, looked up by eval set index.
#[derive(Debug, Clone, PartialEq)]
pub enum PerEval<T> {
    /// Positional values; missing trailing entries mean none
    List(Vec<Option<T>>),
    /// Values keyed by eval set index
    Map(BTreeMap<usize, Option<T>>),
}

impl<T> PerEval<T> {
    /// Value for eval set `index`, if any.
    pub fn get(&self, index: usize) -> Option<&T> {
        match self {
            PerEval::List(values) => values.get(index).and_then(Option::as_ref),
            PerEval::Map(values) => values.get(&index).and_then(Option::as_ref),
        }
    }

    /// Number of entries, including null ones.
    pub fn len(&self) -> usize {
        match self {
            PerEval::List(values) => values.len(),
            PerEval::Map(values) => values.len(),
        }
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Transform every present value.
    pub fn try_map<U, F>(self, mut f: F) -> crate::core::Result<PerEval<U>>
    where
        F: FnMut(T) -> crate::core::Result<U>,
    {
        Ok(match self {
            PerEval::List(values) => PerEval::List(
                values
                    .into_iter()
                    .map(|value| value.map(&mut f).transpose())
                    .collect::<crate::core::Result<_>>()?,
            ),
            PerEval::Map(values) => PerEval::Map(
                values
                    .into_iter()
                    .map(|(index, value)| Ok((index, value.map(&mut f).transpose()?)))
                    .collect::<crate::core::Result<_>>()?,
            ),
        })
    }
}

impl<T> From<Vec<T>> for PerEval<T> {
    fn from(values: Vec<T>) -> Self {
        PerEval::List(values.into_iter().map(Some).collect())
    }
}

impl<T> From<BTreeMap<usize, T>> for PerEval<T> {
    fn from(values: BTreeMap<usize, T>) -> Self {
        PerEval::Map(values.into_iter().map(|(k, v)| (k, Some(v))).collect())
    }
}

/// Everything needed to build one engine dataset handle.
#[derive(Debug, Clone)]
pub struct DatasetParts {
    /// Feature matrix
    pub features: Features,
    /// Encoded labels
    pub label: Option<Array1<f64>>,
    /// Per-sample weights
    pub weight: Option<Array1<f64>>,
    /// Query group sizes
    pub group: Option<Vec<usize>>,
    /// Initial scores, class-major for multi-class problems
    pub init_score: Option<Array1<f64>>,
    /// Categorical feature selection
    pub categorical_feature: CategoricalFeature,
}

impl DatasetParts {
    /// Parts with features only.
    pub fn new(features: Features) -> Self {
        DatasetParts {
            features,
            label: None,
            weight: None,
            group: None,
            init_score: None,
            categorical_feature: CategoricalFeature::Auto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_features_shape() {
        let features = Features::from(Array2::<f64>::zeros((4, 3)));
        assert_eq!(features.num_rows(), 4);
        assert_eq!(features.num_columns(), 3);
        assert!(features.as_dense().is_some());
        assert!(features.column_names().is_none());
    }

    #[test]
    fn test_per_eval_lookup() {
        let list: PerEval<i32> = PerEval::List(vec![Some(1), None]);
        assert_eq!(list.get(0), Some(&1));
        assert_eq!(list.get(1), None);
        assert_eq!(list.get(5), None);
        assert_eq!(list.len(), 2);

        let map: PerEval<i32> = BTreeMap::from([(1, 7)]).into();
        assert_eq!(map.get(0), None);
        assert_eq!(map.get(1), Some(&7));
    }

    #[test]
    fn test_per_eval_try_map() {
        let list: PerEval<i32> = vec![1, 2].into();
        let doubled = list.try_map(|v| Ok(v * 2)).unwrap();
        assert_eq!(doubled.get(1), Some(&4));

        let failing: PerEval<i32> = vec![1].into();
        assert!(failing
            .try_map(|_| Err::<i32, _>(crate::core::GPBoostError::internal("boom")))
            .is_err());
    }

    #[test]
    fn test_eval_set_constructor() {
        let set = EvalSet::new(array![[1.0], [2.0]], array![0.0, 1.0]);
        match set {
            EvalSet::Data { features, labels } => {
                assert_eq!(features.num_rows(), 2);
                assert_eq!(labels.len(), 2);
            }
            EvalSet::Training => panic!("expected data"),
        }
    }
}
