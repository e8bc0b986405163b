use std::process;

use clap::Parser;
use ream_withdrawals::cli::{Cli, Commands, expected::run_expected, process::run_process};
use serde::Serialize;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.verbosity.directive()))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Expected(config) => run_expected(config).and_then(|report| print_json(&report)),
        Commands::Process(config) => run_process(config).and_then(|report| print_json(&report)),
    };

    if let Err(err) = result {
        error!("{err:#}");
        process::exit(1);
    }
}
