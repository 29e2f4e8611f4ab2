//! `ecotag batch` command - Build rows for many products and export the table

use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::cli::helpers::{load_pipeline, truncate_str, write_encoded, write_rows};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::entities::product::read_products;

#[derive(clap::Args, Debug)]
pub struct BatchArgs {
    /// Products file: JSON array or JSON Lines ("-" for stdin)
    pub file: PathBuf,

    /// Write the accumulated table here instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Continue past products without fabric data (default: stop on first error)
    #[arg(long)]
    pub skip_errors: bool,

    /// Export encoded classifier inputs instead of raw rows
    #[arg(long)]
    pub encoded: bool,
}

/// Batch statistics
#[derive(Debug, Default)]
struct BatchStats {
    processed: usize,
    built: usize,
    failed: usize,
}

pub fn run(args: BatchArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut pipeline = load_pipeline(global, &config)?;
    let products = read_products(&args.file)?;

    if !global.quiet {
        eprintln!(
            "{} Building rows for {} product(s) from {}",
            style("→").blue(),
            style(products.len()).cyan(),
            style(args.file.display()).yellow(),
        );
    }

    let mut stats = BatchStats::default();
    for product in &products {
        stats.processed += 1;
        match pipeline.extract(product) {
            Ok(_) => stats.built += 1,
            Err(e) => {
                stats.failed += 1;
                eprintln!(
                    "{} {}: {}",
                    style("✗").red(),
                    truncate_str(product.display_name(), 40),
                    e
                );
                if !args.skip_errors {
                    return Err(e.into());
                }
            }
        }
    }

    let format = global
        .format
        .resolve(config.default_format.as_deref(), OutputFormat::Csv);

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).into_diagnostic()?)),
        None => Box::new(io::stdout().lock()),
    };
    if args.encoded {
        let vectors: Vec<Vec<f64>> = pipeline
            .store()
            .rows()
            .map(|row| pipeline.encoder().encode(row))
            .collect();
        write_encoded(&mut out, &vectors, format)?;
    } else {
        write_rows(&mut out, pipeline.store(), format)?;
    }
    out.flush().into_diagnostic()?;

    if !global.quiet {
        print_summary(&stats, args.output.as_ref());
    }

    Ok(())
}

fn print_summary(stats: &BatchStats, output: Option<&PathBuf>) {
    eprintln!();
    eprintln!("{}", style("─".repeat(50)).dim());
    eprintln!("{}", style("Batch Summary").bold());
    eprintln!("{}", style("─".repeat(50)).dim());
    eprintln!("  Products processed: {}", style(stats.processed).cyan());
    eprintln!("  Rows built:         {}", style(stats.built).green());
    if stats.failed > 0 {
        eprintln!("  Skipped (no fabric): {}", style(stats.failed).red());
    }
    if let Some(path) = output {
        eprintln!("  Written to:         {}", style(path.display()).yellow());
    }
}
