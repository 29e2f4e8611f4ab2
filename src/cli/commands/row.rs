//! `ecotag row` command - Build feature rows for products

use miette::Result;
use std::io;
use std::path::PathBuf;

use crate::cli::helpers::{load_pipeline, write_encoded, write_rows};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::entities::product::read_products;

#[derive(clap::Args, Debug)]
pub struct RowArgs {
    /// Product JSON file ("-" for stdin)
    pub file: PathBuf,

    /// Print the encoded classifier input instead of the raw row
    #[arg(long)]
    pub encoded: bool,
}

pub fn run(args: RowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut pipeline = load_pipeline(global, &config)?;

    let products = read_products(&args.file)?;
    if products.is_empty() {
        return Err(miette::miette!(
            "No products found in {}",
            args.file.display()
        ));
    }

    for product in &products {
        pipeline.extract(product)?;
    }

    let format = global
        .format
        .resolve(config.default_format.as_deref(), OutputFormat::Yaml);
    let mut out = io::stdout().lock();

    if args.encoded {
        let vectors: Vec<Vec<f64>> = pipeline
            .store()
            .rows()
            .map(|row| pipeline.encoder().encode(row))
            .collect();
        write_encoded(&mut out, &vectors, format)
    } else {
        write_rows(&mut out, pipeline.store(), format)
    }
}
