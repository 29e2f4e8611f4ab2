//! `ecotag schema` command - Show feature columns and registered encodings

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::load_summary;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::encoding::{LabelEncoder, MISSING_CODE};
use crate::core::{Config, FeatureEncoder, SummarySource, TrainingSummary};
use crate::entities::row::{columns, MANUFACTURING_LOCATION, TRANSPORTATION_DISTANCE, USE_LOCATION};

#[derive(clap::Args, Debug)]
pub struct SchemaArgs {
    /// Also list every registered category code
    #[arg(long)]
    pub codes: bool,
}

#[derive(Serialize)]
struct SchemaReport<'a> {
    columns: Vec<&'static str>,
    summary: &'a TrainingSummary,
    encoder: &'a FeatureEncoder,
    missing_code: f64,
}

pub fn run(args: SchemaArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let summary = load_summary(global, &config)?;
    let encoder = FeatureEncoder::from_summary(&summary);

    match global.format {
        OutputFormat::Json => {
            let report = SchemaReport {
                columns: columns(),
                summary: &summary,
                encoder: &encoder,
                missing_code: MISSING_CODE,
            };
            println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
            return Ok(());
        }
        OutputFormat::Yaml => {
            let report = SchemaReport {
                columns: columns(),
                summary: &summary,
                encoder: &encoder,
                missing_code: MISSING_CODE,
            };
            print!("{}", serde_yml::to_string(&report).into_diagnostic()?);
            return Ok(());
        }
        _ => {}
    }

    let mut builder = Builder::default();
    builder.push_record(["#", "Column", "Kind", "Encoding"]);
    for (i, column) in columns().into_iter().enumerate() {
        let (kind, encoding) = match column {
            MANUFACTURING_LOCATION => ("category", describe(encoder.manufacturing_location())),
            USE_LOCATION => ("category", describe(encoder.use_location())),
            TRANSPORTATION_DISTANCE => (
                "numeric",
                format!("mean {}", summary.mean_transportation_distance()),
            ),
            _ => ("fraction", "0.0 - 1.0".to_string()),
        };
        builder.push_record([i.to_string(), column.to_string(), kind.to_string(), encoding]);
    }

    let mut table = builder.build();
    if global.format == OutputFormat::Md {
        table.with(Style::markdown());
    } else {
        table.with(Style::sharp());
    }
    println!("{}", table);

    if args.codes {
        for (name, label_encoder) in [
            (MANUFACTURING_LOCATION, encoder.manufacturing_location()),
            (USE_LOCATION, encoder.use_location()),
        ] {
            println!();
            println!("{}", style(name).bold());
            for (code, class) in label_encoder.classes().iter().enumerate() {
                println!("  {:>3}  {}", code, class);
            }
            match label_encoder.missing_code() {
                Some(code) => {
                    println!("  {:>3}  {}", code, style("(missing)").dim());
                    println!("  {:>3}  {}", MISSING_CODE, style("(unregistered)").dim());
                }
                None => {
                    println!("  {:>3}  {}", MISSING_CODE, style("(missing or unregistered)").dim())
                }
            }
        }
    }

    if !global.quiet {
        println!();
        let source = match summary.source() {
            SummarySource::Builtin => "Training data: built-in defaults".to_string(),
            SummarySource::Provided => "Training data: provided values".to_string(),
            SummarySource::Dataset { path: Some(path) } => {
                format!("Training data: {} ({} row(s))", path.display(), summary.rows())
            }
            SummarySource::Dataset { path: None } => {
                format!("Training data: {} row(s)", summary.rows())
            }
        };
        println!("{}", style(source).dim());
    }

    Ok(())
}

fn describe(encoder: &LabelEncoder) -> String {
    let missing = encoder
        .missing_code()
        .map(|code| code as f64)
        .unwrap_or(MISSING_CODE);
    format!("{} classes, missing = {}", encoder.classes().len(), missing)
}
