//! Class label types and the label encoder.

use crate::core::error::{GPBoostError, Result};
use ndarray::Array1;
use std::cmp::Ordering;
use std::fmt::{Debug, Display};

/// A type usable as a classification label.
///
/// Labels need a total order so the encoder can sort the distinct classes.
/// Floating point labels are accepted when finite and integral.
pub trait ClassLabel: Clone + Debug + Display + Send + Sync + 'static {
    /// Total order between labels.
    fn label_cmp(&self, other: &Self) -> Ordering;

    /// Whether the label is finite.
    fn is_finite_label(&self) -> bool {
        true
    }

    /// Whether the label is a discrete class rather than a continuous value.
    fn is_discrete_label(&self) -> bool {
        true
    }
}

macro_rules! impl_ordered_class_label {
    ($($t:ty),*) => {
        $(
            impl ClassLabel for $t {
                fn label_cmp(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }
            }
        )*
    };
}

impl_ordered_class_label!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, bool, char, String, &'static str);

macro_rules! impl_float_class_label {
    ($($t:ty),*) => {
        $(
            impl ClassLabel for $t {
                fn label_cmp(&self, other: &Self) -> Ordering {
                    self.total_cmp(other)
                }

                fn is_finite_label(&self) -> bool {
                    num_traits::Float::is_finite(*self)
                }

                fn is_discrete_label(&self) -> bool {
                    num_traits::Float::fract(*self) == 0.0
                }
            }
        )*
    };
}

impl_float_class_label!(f32, f64);

/// Bijection between the sorted distinct labels and codes `0..n_classes`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEncoder<L> {
    classes: Vec<L>,
}

impl<L: ClassLabel> LabelEncoder<L> {
    /// Fit the encoder on the observed labels.
    pub fn fit(labels: &Array1<L>) -> Self {
        let mut classes: Vec<L> = labels.iter().cloned().collect();
        classes.sort_by(|a, b| a.label_cmp(b));
        classes.dedup_by(|a, b| a.label_cmp(b) == Ordering::Equal);
        LabelEncoder { classes }
    }

    /// Sorted distinct classes.
    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    /// Number of classes.
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Code of a single label.
    pub fn encode(&self, label: &L) -> Option<usize> {
        self.classes.binary_search_by(|c| c.label_cmp(label)).ok()
    }

    /// Encode labels as `f64` codes.
    pub fn transform(&self, labels: &Array1<L>) -> Result<Array1<f64>> {
        let mut codes = Vec::with_capacity(labels.len());
        for label in labels.iter() {
            let code = self.encode(label).ok_or_else(|| {
                GPBoostError::invalid_parameter("y", label.to_string(), "y contains previously unseen labels")
            })?;
            codes.push(code as f64);
        }
        Ok(Array1::from_vec(codes))
    }

    /// Decode class indices back to labels.
    pub fn inverse_transform(&self, codes: &[usize]) -> Result<Array1<L>> {
        codes
            .iter()
            .map(|&code| {
                self.classes.get(code).cloned().ok_or_else(|| {
                    GPBoostError::invalid_parameter(
                        "class index",
                        code.to_string(),
                        format!("must be below {}", self.classes.len()),
                    )
                })
            })
            .collect::<Result<Vec<L>>>()
            .map(Array1::from_vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_encoder_sorts_and_deduplicates() {
        let encoder = LabelEncoder::fit(&array!["b".to_string(), "a".to_string(), "b".to_string()]);
        assert_eq!(encoder.classes(), &["a".to_string(), "b".to_string()]);
        assert_eq!(encoder.n_classes(), 2);
        let codes = encoder
            .transform(&array!["b".to_string(), "a".to_string()])
            .unwrap();
        assert_eq!(codes, array![1.0, 0.0]);
    }

    #[test]
    fn test_encoder_round_trip() {
        let labels = array![5, -1, 3, 5];
        let encoder = LabelEncoder::fit(&labels);
        let codes: Vec<usize> = encoder
            .transform(&labels)
            .unwrap()
            .iter()
            .map(|&c| c as usize)
            .collect();
        assert_eq!(encoder.inverse_transform(&codes).unwrap(), labels);
    }

    #[test]
    fn test_unseen_labels_are_rejected() {
        let encoder = LabelEncoder::fit(&array![0, 1]);
        assert!(encoder.transform(&array![2]).is_err());
        assert!(encoder.inverse_transform(&[2]).is_err());
    }

    #[test]
    fn test_float_labels() {
        let encoder = LabelEncoder::fit(&array![2.0, 0.0, 1.0, 0.0]);
        assert_eq!(encoder.classes(), &[0.0, 1.0, 2.0]);
        assert!(!f64::NAN.is_finite_label());
        assert!(!0.5f64.is_discrete_label());
        assert!(3.0f32.is_discrete_label());
    }
}
