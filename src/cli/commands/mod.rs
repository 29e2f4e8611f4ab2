//! CLI command implementations

pub mod batch;
pub mod completions;
pub mod config;
pub mod origin;
pub mod parse;
pub mod row;
pub mod schema;
