//! `ecotag parse` command - Inspect composition parsing

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::helpers::format_fraction;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::composition::{average, parse, AveragedComposition, PartComposition};
use crate::core::material::normalize;
use crate::entities::product::FactValue;

#[derive(clap::Args, Debug)]
pub struct ParseArgs {
    /// Composition text; several values are parsed as a bullet list
    #[arg(required = true)]
    pub text: Vec<String>,
}

#[derive(Serialize)]
struct ParseReport<'a> {
    parts: &'a [PartComposition],
    averaged: &'a AveragedComposition,
}

pub fn run(args: ParseArgs, global: &GlobalOpts) -> Result<()> {
    let value = match args.text.as_slice() {
        [single] => FactValue::Text(single.clone()),
        _ => FactValue::List(args.text.clone()),
    };

    let parts = parse(&value);
    let averaged = average(&parts);
    let report = ParseReport {
        parts: &parts,
        averaged: &averaged,
    };

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&report).into_diagnostic()?);
        }
        _ => print_human(&parts, &averaged),
    }

    Ok(())
}

fn print_human(parts: &[PartComposition], averaged: &AveragedComposition) {
    if parts.is_empty() {
        println!("{}", style("No materials found").dim());
        return;
    }

    for part in parts {
        println!("{}", style(&part.part).bold());
        for (token, fraction) in &part.fractions {
            println!(
                "  {:<24} {}  {}",
                token,
                style(format_fraction(*fraction)).cyan(),
                style(format!("→ {}", normalize(token))).dim()
            );
        }
    }

    println!();
    println!("{}", style("Averaged").bold().underlined());
    for (material, fraction) in averaged {
        println!(
            "  {:<24} {}",
            material.as_str(),
            style(format_fraction(*fraction)).green()
        );
    }
}
