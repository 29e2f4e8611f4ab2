//! Entity types - product facts in, feature rows out

pub mod product;
pub mod row;

pub use product::{FactValue, Facts, InputError, Product};
pub use row::FeatureRow;
