//! Shared helper functions for CLI commands
//!
//! Pipeline setup and row rendering used by more than one command.

use miette::{IntoDiagnostic, Result};
use std::io::Write;
use tabled::{builder::Builder, settings::Style};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{AccumulationStore, Config, Pipeline, TrainingSummary};
use crate::entities::row::{columns, FeatureRow};

/// Load the training summary from flags or config
pub fn load_summary(global: &GlobalOpts, config: &Config) -> Result<TrainingSummary> {
    let path = global
        .training_data
        .as_deref()
        .or(config.training_data.as_deref());
    Ok(TrainingSummary::load(path)?)
}

/// Build the pipeline context for one invocation
pub fn load_pipeline(global: &GlobalOpts, config: &Config) -> Result<Pipeline> {
    let summary = load_summary(global, config)?;
    Ok(Pipeline::with_seed(summary, global.seed.or(config.seed)))
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Fixed-precision fraction for human-readable output
pub fn format_fraction(fraction: f64) -> String {
    format!("{:.3}", fraction)
}

/// Markdown table of rows with the schema header
fn rows_markdown<'a>(rows: impl Iterator<Item = &'a FeatureRow>) -> String {
    let mut builder = Builder::default();
    builder.push_record(columns());
    for row in rows {
        builder.push_record(row.cells());
    }
    builder.build().with(Style::markdown()).to_string()
}

/// Write the store's rows in the given format
pub fn write_rows<W: Write>(out: &mut W, store: &AccumulationStore, format: OutputFormat) -> Result<()> {
    let rows: Vec<&FeatureRow> = store.rows().collect();
    match format {
        OutputFormat::Csv => store.write_csv(&mut *out).into_diagnostic()?,
        OutputFormat::Tsv => store.write_delimited(&mut *out, b'\t').into_diagnostic()?,
        OutputFormat::Json => {
            let json = if rows.len() == 1 {
                serde_json::to_string_pretty(rows[0])
            } else {
                serde_json::to_string_pretty(&rows)
            }
            .into_diagnostic()?;
            writeln!(out, "{}", json).into_diagnostic()?;
        }
        OutputFormat::Md => {
            writeln!(out, "{}", rows_markdown(rows.into_iter())).into_diagnostic()?;
        }
        OutputFormat::Yaml | OutputFormat::Auto => {
            let yaml = if rows.len() == 1 {
                serde_yml::to_string(rows[0])
            } else {
                serde_yml::to_string(&rows)
            }
            .into_diagnostic()?;
            write!(out, "{}", yaml).into_diagnostic()?;
        }
    }
    Ok(())
}

/// Write encoded classifier inputs in the given format
pub fn write_encoded<W: Write>(out: &mut W, vectors: &[Vec<f64>], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv | OutputFormat::Tsv => {
            let delimiter = if format == OutputFormat::Tsv { b'\t' } else { b',' };
            let mut wtr = csv::WriterBuilder::new()
                .delimiter(delimiter)
                .from_writer(&mut *out);
            wtr.write_record(columns()).into_diagnostic()?;
            for vector in vectors {
                wtr.write_record(vector.iter().map(|v| v.to_string())).into_diagnostic()?;
            }
            wtr.flush().into_diagnostic()?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string(vectors).into_diagnostic()?;
            writeln!(out, "{}", json).into_diagnostic()?;
        }
        OutputFormat::Md => {
            let mut builder = Builder::default();
            builder.push_record(columns());
            for vector in vectors {
                builder.push_record(vector.iter().map(|v| v.to_string()));
            }
            writeln!(out, "{}", builder.build().with(Style::markdown())).into_diagnostic()?;
        }
        OutputFormat::Yaml | OutputFormat::Auto => {
            let yaml = serde_yml::to_string(vectors).into_diagnostic()?;
            write!(out, "{}", yaml).into_diagnostic()?;
        }
    }
    Ok(())
}
