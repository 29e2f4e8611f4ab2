//! Constants derived once from the training dataset
//!
//! The row builder never sees the dataset itself. It only needs the set of
//! observed use locations (for sampling), the mean transportation distance,
//! and the category vocabularies the classifier was encoded against.

use miette::Diagnostic;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::material::CanonicalMaterial;
use crate::core::origin::Continent;
use crate::entities::row::{MANUFACTURING_LOCATION, TRANSPORTATION_DISTANCE, USE_LOCATION};

/// Mean transportation distance used when no training data is configured
pub const DEFAULT_MEAN_TRANSPORTATION_DISTANCE: f64 = 5000.0;

/// Errors loading a training summary
#[derive(Debug, Error, Diagnostic)]
pub enum SummaryError {
    #[error("failed to open training data {path}: {source}")]
    #[diagnostic(code(ecotag::summary::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed training CSV: {0}")]
    #[diagnostic(code(ecotag::summary::csv))]
    Csv(#[from] csv::Error),

    #[error("training data has no '{0}' column")]
    #[diagnostic(
        code(ecotag::summary::missing_column),
        help("the header row must name Use_location, Transportation_distance and Manufacturing_location")
    )]
    MissingColumn(&'static str),

    #[error("invalid transportation distance '{value}' on data row {row}")]
    #[diagnostic(code(ecotag::summary::distance))]
    InvalidDistance { row: usize, value: String },

    #[error("training data has no usable rows")]
    #[diagnostic(code(ecotag::summary::empty))]
    Empty,
}

/// Where a summary's constants came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarySource {
    /// Compiled-in continent vocabulary and default distance
    Builtin,
    /// Values handed to [`TrainingSummary::new`]
    Provided,
    /// Computed from training CSV data (path known when loaded from a file)
    Dataset { path: Option<PathBuf> },
}

/// Read-only constants the row builder and encoder depend on
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingSummary {
    /// Distinct use locations, sorted
    use_locations: Vec<String>,
    mean_transportation_distance: f64,
    /// Distinct manufacturing locations, sorted
    manufacturing_locations: Vec<String>,
    /// Training rows left Use_location empty
    use_location_has_missing: bool,
    /// Training rows left Manufacturing_location empty
    manufacturing_location_has_missing: bool,
    /// Number of data rows the summary was computed from
    rows: usize,
    source: SummarySource,
}

impl Default for TrainingSummary {
    fn default() -> Self {
        let mut continents: Vec<String> = Continent::all().iter().map(|c| c.to_string()).collect();
        continents.sort();
        Self {
            use_locations: continents.clone(),
            mean_transportation_distance: DEFAULT_MEAN_TRANSPORTATION_DISTANCE,
            manufacturing_locations: continents,
            use_location_has_missing: false,
            manufacturing_location_has_missing: false,
            rows: 0,
            source: SummarySource::Builtin,
        }
    }
}

impl TrainingSummary {
    /// Build a summary from explicit values
    ///
    /// Returns `None` when there is nothing to sample use locations from.
    pub fn new<I, J, S, T>(
        use_locations: I,
        mean_transportation_distance: f64,
        manufacturing_locations: J,
    ) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let use_locations: BTreeSet<String> = use_locations.into_iter().map(Into::into).collect();
        if use_locations.is_empty() {
            return None;
        }
        let manufacturing_locations: BTreeSet<String> =
            manufacturing_locations.into_iter().map(Into::into).collect();

        Some(Self {
            use_locations: use_locations.into_iter().collect(),
            mean_transportation_distance,
            manufacturing_locations: manufacturing_locations.into_iter().collect(),
            use_location_has_missing: false,
            manufacturing_location_has_missing: false,
            rows: 0,
            source: SummarySource::Provided,
        })
    }

    /// Record that the training data had empty manufacturing locations
    ///
    /// The classifier then saw missing values as their own trailing class.
    pub fn with_missing_manufacturing_location(mut self) -> Self {
        self.manufacturing_location_has_missing = true;
        self
    }

    /// Load a summary from a training CSV file
    pub fn from_path(path: &Path) -> Result<Self, SummaryError> {
        let file = File::open(path).map_err(|e| SummaryError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut summary = Self::from_reader(file)?;
        summary.source = SummarySource::Dataset {
            path: Some(path.to_path_buf()),
        };
        tracing::info!(
            path = %path.display(),
            rows = summary.rows,
            use_locations = summary.use_locations.len(),
            mean_distance = summary.mean_transportation_distance,
            missing_manufacturing = summary.manufacturing_location_has_missing,
            "loaded training summary"
        );
        Ok(summary)
    }

    /// Compute a summary from training CSV data with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SummaryError> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv.headers()?.clone();
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(SummaryError::MissingColumn(name))
        };
        let use_col = column(USE_LOCATION)?;
        let distance_col = column(TRANSPORTATION_DISTANCE)?;
        let manufacturing_col = column(MANUFACTURING_LOCATION)?;

        for material in CanonicalMaterial::all() {
            if !headers.iter().any(|h| h == material.as_str()) {
                tracing::warn!(column = material.as_str(), "training data lacks material column");
            }
        }

        let mut use_locations = BTreeSet::new();
        let mut manufacturing_locations = BTreeSet::new();
        let mut use_location_has_missing = false;
        let mut manufacturing_location_has_missing = false;
        let mut distance_sum = 0.0;
        let mut distance_count = 0usize;
        let mut rows = 0usize;

        for (i, record) in csv.records().enumerate() {
            let record = record?;
            rows += 1;

            match record.get(use_col).filter(|v| !v.is_empty()) {
                Some(value) => {
                    use_locations.insert(value.to_string());
                }
                None => use_location_has_missing = true,
            }
            match record.get(manufacturing_col).filter(|v| !v.is_empty()) {
                Some(value) => {
                    manufacturing_locations.insert(value.to_string());
                }
                None => manufacturing_location_has_missing = true,
            }
            if let Some(value) = record.get(distance_col).filter(|v| !v.is_empty()) {
                let distance: f64 = value.parse().map_err(|_| SummaryError::InvalidDistance {
                    row: i + 1,
                    value: value.to_string(),
                })?;
                distance_sum += distance;
                distance_count += 1;
            }
        }

        if use_locations.is_empty() || distance_count == 0 {
            return Err(SummaryError::Empty);
        }

        Ok(Self {
            use_locations: use_locations.into_iter().collect(),
            mean_transportation_distance: distance_sum / distance_count as f64,
            manufacturing_locations: manufacturing_locations.into_iter().collect(),
            use_location_has_missing,
            manufacturing_location_has_missing,
            rows,
            source: SummarySource::Dataset { path: None },
        })
    }

    /// Load from a path when given, otherwise use the built-in summary
    pub fn load(path: Option<&Path>) -> Result<Self, SummaryError> {
        match path {
            Some(path) => Self::from_path(path),
            None => {
                tracing::debug!("no training data configured, using built-in summary");
                Ok(Self::default())
            }
        }
    }

    pub fn use_locations(&self) -> &[String] {
        &self.use_locations
    }

    pub fn mean_transportation_distance(&self) -> f64 {
        self.mean_transportation_distance
    }

    pub fn manufacturing_locations(&self) -> &[String] {
        &self.manufacturing_locations
    }

    pub fn use_location_has_missing(&self) -> bool {
        self.use_location_has_missing
    }

    pub fn manufacturing_location_has_missing(&self) -> bool {
        self.manufacturing_location_has_missing
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn source(&self) -> &SummarySource {
        &self.source
    }

    /// True for the compiled-in defaults
    pub fn is_builtin(&self) -> bool {
        self.source == SummarySource::Builtin
    }
}
