//! Core module - the label-to-feature pipeline

pub mod builder;
pub mod composition;
pub mod config;
pub mod encoding;
pub mod material;
pub mod origin;
pub mod pipeline;
pub mod store;
pub mod summary;

pub use builder::{BuildError, RowBuilder};
pub use composition::{average, parse, AveragedComposition, PartComposition, SplitMode};
pub use config::Config;
pub use encoding::{FeatureEncoder, LabelEncoder, MISSING_CODE};
pub use material::{normalize, CanonicalMaterial, MATERIAL_COUNT};
pub use origin::{resolve_continent, Continent};
pub use pipeline::{Classifier, ClassifierError, Pipeline, ScoreError, Scored, SharedPipeline};
pub use store::{AccumulationStore, StoredRow};
pub use summary::{SummaryError, SummarySource, TrainingSummary};
