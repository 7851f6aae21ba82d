mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use context::Context;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = Context::new(cli.config.as_deref(), cli.verbose).and_then(|ctx| match cli.command {
        Commands::Expand {
            files,
            stdout,
            watch,
        } => commands::expand::run(files, stdout, watch, &ctx),
        Commands::Check { files, json } => commands::check::run(files, json, &ctx),
        Commands::Inspect { file, json } => commands::inspect::run(file, json, &ctx),
    });

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` overrides the default filter
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}
