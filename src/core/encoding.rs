//! Categorical encoding at the classifier boundary
//!
//! The classifier was fit on integer-coded categories: each categorical
//! column's distinct values sorted, code = position. Columns that had empty
//! cells in training carry one extra trailing class for "missing", so an
//! absent value encodes to `classes.len()`. The encoders here are registered
//! once from the [`TrainingSummary`] and reused for every row so codes never
//! drift with request data.

use serde::Serialize;

use crate::core::summary::TrainingSummary;
use crate::entities::row::FeatureRow;

/// Code emitted for a category the training data never produced
pub const MISSING_CODE: f64 = -1.0;

/// Sorted-vocabulary label encoder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
    /// Missing values form a class after the sorted ones
    missing_class: bool,
}

impl LabelEncoder {
    /// Register the distinct values of a column
    pub fn fit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = values.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self {
            classes,
            missing_class: false,
        }
    }

    /// Register a trailing class for missing values
    pub fn with_missing_class(mut self) -> Self {
        self.missing_class = true;
        self
    }

    /// Code of the missing class, when one is registered
    pub fn missing_code(&self) -> Option<usize> {
        self.missing_class.then_some(self.classes.len())
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn encode(&self, value: &str) -> Option<usize> {
        self.classes.binary_search_by(|c| c.as_str().cmp(value)).ok()
    }

    pub fn decode(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    fn encode_or_missing(&self, value: Option<&str>) -> f64 {
        let code = match value {
            Some(v) => self.encode(v),
            None => self.missing_code(),
        };
        code.map(|code| code as f64).unwrap_or(MISSING_CODE)
    }
}

/// Turns feature rows into the numeric vector the classifier expects
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureEncoder {
    manufacturing_location: LabelEncoder,
    use_location: LabelEncoder,
}

impl FeatureEncoder {
    pub fn new(manufacturing_location: LabelEncoder, use_location: LabelEncoder) -> Self {
        Self {
            manufacturing_location,
            use_location,
        }
    }

    /// Register encoders from the training vocabularies
    pub fn from_summary(summary: &TrainingSummary) -> Self {
        let fit = |values: &[String], has_missing: bool| {
            let encoder = LabelEncoder::fit(values.iter().cloned());
            if has_missing {
                encoder.with_missing_class()
            } else {
                encoder
            }
        };
        Self::new(
            fit(
                summary.manufacturing_locations(),
                summary.manufacturing_location_has_missing(),
            ),
            fit(summary.use_locations(), summary.use_location_has_missing()),
        )
    }

    pub fn manufacturing_location(&self) -> &LabelEncoder {
        &self.manufacturing_location
    }

    pub fn use_location(&self) -> &LabelEncoder {
        &self.use_location
    }

    /// Encode a row in column order
    pub fn encode(&self, row: &FeatureRow) -> Vec<f64> {
        let mut features: Vec<f64> = row.materials().map(|(_, f)| f).collect();

        let manufacturing = row.manufacturing_location.map(|c| c.as_str());
        if let Some(value) = manufacturing {
            if self.manufacturing_location.encode(value).is_none() {
                tracing::warn!(value, "manufacturing location not in training vocabulary");
            }
        }
        features.push(self.manufacturing_location.encode_or_missing(manufacturing));
        features.push(self.use_location.encode_or_missing(Some(&row.use_location)));
        features.push(row.transportation_distance);
        features
    }
}
