use clap::Parser;
use tracing_subscriber::EnvFilter;

mod catalog;
mod cli;
mod core;
mod engine;
mod parsing;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("amr_caller=debug,info")
    } else {
        EnvFilter::new("amr_caller=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Call(args) => {
            cli::call::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Tables(args) => {
            cli::tables::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
