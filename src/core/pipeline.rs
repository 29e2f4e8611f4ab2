//! Request-scoped pipeline context and the classifier seam

use miette::Diagnostic;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::core::builder::{BuildError, RowBuilder};
use crate::core::encoding::FeatureEncoder;
use crate::core::store::{AccumulationStore, StoredRow};
use crate::core::summary::TrainingSummary;
use crate::entities::product::Product;
use crate::entities::row::FeatureRow;

/// Failure reported by a classifier implementation
#[derive(Debug, Error, Diagnostic)]
#[error("classifier failed: {0}")]
#[diagnostic(code(ecotag::classifier))]
pub struct ClassifierError(pub String);

/// A trained model, treated as a black box over encoded feature vectors
pub trait Classifier {
    /// Predict a sustainability label for one encoded row
    fn predict(&self, features: &[f64]) -> Result<String, ClassifierError>;
}

impl<F> Classifier for F
where
    F: Fn(&[f64]) -> Result<String, ClassifierError>,
{
    fn predict(&self, features: &[f64]) -> Result<String, ClassifierError> {
        self(features)
    }
}

/// Scoring failures
#[derive(Debug, Error, Diagnostic)]
pub enum ScoreError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Classifier(#[from] ClassifierError),
}

/// Result of scoring one product
#[derive(Debug, Clone)]
pub struct Scored {
    pub row: FeatureRow,
    pub features: Vec<f64>,
    pub label: String,
}

/// Owns the row builder, the registered encoders and the accumulation store
#[derive(Debug)]
pub struct Pipeline<R = StdRng> {
    builder: RowBuilder<R>,
    encoder: FeatureEncoder,
    store: AccumulationStore,
}

/// Pipeline shared between request handlers
pub type SharedPipeline = Arc<Mutex<Pipeline>>;

impl Pipeline<StdRng> {
    pub fn new(summary: TrainingSummary) -> Self {
        let encoder = FeatureEncoder::from_summary(&summary);
        Self::from_parts(RowBuilder::new(summary), encoder)
    }

    /// Pipeline with seeded use-location sampling (`None` seeds from the OS)
    pub fn with_seed(summary: TrainingSummary, seed: Option<u64>) -> Self {
        let encoder = FeatureEncoder::from_summary(&summary);
        let builder = match seed {
            Some(seed) => RowBuilder::seeded(summary, seed),
            None => RowBuilder::new(summary),
        };
        Self::from_parts(builder, encoder)
    }

    /// Wrap into a mutex-guarded handle for concurrent hosts
    pub fn shared(self) -> SharedPipeline {
        Arc::new(Mutex::new(self))
    }
}

impl<R: Rng> Pipeline<R> {
    pub fn with_rng(summary: TrainingSummary, rng: R) -> Self {
        let encoder = FeatureEncoder::from_summary(&summary);
        Self::from_parts(RowBuilder::with_rng(summary, rng), encoder)
    }

    fn from_parts(builder: RowBuilder<R>, encoder: FeatureEncoder) -> Self {
        Self {
            builder,
            encoder,
            store: AccumulationStore::new(),
        }
    }

    /// Build a row for `product` and append it to the store
    ///
    /// Nothing is appended when the build fails.
    pub fn extract(&mut self, product: &Product) -> Result<&StoredRow, BuildError> {
        let row = self.builder.build(product)?;
        Ok(self.store.push(product, row))
    }

    /// Extract, encode and classify one product
    ///
    /// The row stays in the store even if the classifier fails.
    pub fn score<C>(&mut self, product: &Product, classifier: &C) -> Result<Scored, ScoreError>
    where
        C: Classifier + ?Sized,
    {
        let row = self.extract(product)?.row.clone();
        let features = self.encoder.encode(&row);
        let label = classifier.predict(&features)?;
        tracing::debug!(product = product.display_name(), %label, "scored product");
        Ok(Scored {
            row,
            features,
            label,
        })
    }

    pub fn store(&self) -> &AccumulationStore {
        &self.store
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn summary(&self) -> &TrainingSummary {
        self.builder.summary()
    }

    pub fn into_store(self) -> AccumulationStore {
        self.store
    }
}
