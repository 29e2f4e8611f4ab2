//! `ecotag origin` command - Resolve country-of-origin text

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::origin::{resolve_continent, Continent};
use crate::entities::product::{FactValue, Facts, Product, ORIGIN};

#[derive(clap::Args, Debug)]
pub struct OriginArgs {
    /// Country text as found on the product page (e.g. "Made in Vietnam")
    #[arg(required = true)]
    pub country: Vec<String>,
}

#[derive(Serialize)]
struct Resolution<'a> {
    input: &'a str,
    continent: Option<Continent>,
}

pub fn run(args: OriginArgs, global: &GlobalOpts) -> Result<()> {
    let resolutions: Vec<Resolution> = args
        .country
        .iter()
        .map(|input| {
            let mut facts = Facts::new();
            facts.insert(ORIGIN.to_string(), FactValue::from(input.as_str()));
            Resolution {
                input: input.as_str(),
                continent: resolve_continent(&Product::new("origin", facts)),
            }
        })
        .collect();

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&resolutions).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&resolutions).into_diagnostic()?);
        }
        _ => {
            for resolution in &resolutions {
                let continent = match resolution.continent {
                    Some(c) => style(c.to_string()).green(),
                    None => style("(unresolved)".to_string()).dim(),
                };
                println!("{} {} {}", resolution.input, style("→").dim(), continent);
            }
        }
    }

    Ok(())
}
