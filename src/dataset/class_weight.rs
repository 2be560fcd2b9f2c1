//! Class weighting for imbalanced classification.

use crate::config::ParamValue;
use crate::core::error::{GPBoostError, Result};
use crate::dataset::label_encoder::{ClassLabel, LabelEncoder};
use ndarray::Array1;

/// Weights associated with classes.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassWeight<L> {
    /// Weights inversely proportional to class frequencies:
    /// `n_samples / (n_classes * count(class))`
    Balanced,
    /// Explicit `label -> weight` pairs; unlisted classes weigh 1
    Explicit(Vec<(L, f64)>),
}

impl<L: ClassLabel> ClassWeight<L> {
    /// Explicit weights from `(label, weight)` pairs.
    pub fn explicit<I: IntoIterator<Item = (L, f64)>>(weights: I) -> Self {
        ClassWeight::Explicit(weights.into_iter().collect())
    }

    /// Value reported by `get_params`.
    pub fn to_param_value(&self) -> ParamValue {
        match self {
            ClassWeight::Balanced => ParamValue::from("balanced"),
            ClassWeight::Explicit(weights) => ParamValue::Map(
                weights
                    .iter()
                    .map(|(label, weight)| (label.to_string(), ParamValue::Float(*weight)))
                    .collect(),
            ),
        }
    }
}

/// Per-sample weights derived from class weights.
pub fn compute_sample_weight<L: ClassLabel>(
    class_weight: &ClassWeight<L>,
    labels: &Array1<L>,
) -> Result<Array1<f64>> {
    let encoder = LabelEncoder::fit(labels);
    let n_classes = encoder.n_classes();
    let mut per_class = vec![1.0; n_classes];

    match class_weight {
        ClassWeight::Balanced => {
            let mut counts = vec![0usize; n_classes];
            for label in labels.iter() {
                if let Some(code) = encoder.encode(label) {
                    counts[code] += 1;
                }
            }
            let n_samples = labels.len() as f64;
            for (weight, count) in per_class.iter_mut().zip(&counts) {
                *weight = n_samples / (n_classes as f64 * *count as f64);
            }
        }
        ClassWeight::Explicit(weights) => {
            for (label, weight) in weights {
                let code = encoder.encode(label).ok_or_else(|| {
                    GPBoostError::invalid_parameter(
                        "class_weight",
                        label.to_string(),
                        "class label not present in y",
                    )
                })?;
                per_class[code] = *weight;
            }
        }
    }

    let mut sample_weight = Array1::zeros(labels.len());
    for (out, label) in sample_weight.iter_mut().zip(labels.iter()) {
        if let Some(code) = encoder.encode(label) {
            *out = per_class[code];
        }
    }
    Ok(sample_weight)
}
