use clap::Parser;
use ecotag::cli::commands::{batch, completions, config, origin, parse, row, schema};
use ecotag::cli::{Cli, Commands, GlobalOpts};
use miette::Result;

fn main() -> Result<()> {
    // Terminate quietly on broken pipes (`ecotag batch ... | head`).
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_tracing(&global);

    match cli.command {
        Commands::Row(args) => row::run(args, &global),
        Commands::Batch(args) => batch::run(args, &global),
        Commands::Parse(args) => parse::run(args, &global),
        Commands::Origin(args) => origin::run(args, &global),
        Commands::Schema(args) => schema::run(args, &global),
        Commands::Config(cmd) => config::run(cmd, &global),
        Commands::Completions(args) => completions::run(args),
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the flag-derived level
fn init_tracing(global: &GlobalOpts) {
    let level = if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
