//! Ecotag: garment-label feature extraction
//!
//! Turns scraped product facts (fabric composition text, country of origin)
//! into fixed-schema numeric rows for a sustainability classifier.

pub mod cli;
pub mod core;
pub mod entities;
