pub mod constants;
pub mod expected;
pub mod process;
pub mod verbosity;

use clap::{Parser, Subcommand};

use crate::cli::{
    constants::DEFAULT_VERBOSITY,
    expected::ExpectedConfig,
    process::ProcessConfig,
    verbosity::{Verbosity, verbosity_parser},
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (1=error, 2=warn, 3=info, 4=debug, 5=trace)
    #[arg(
        short,
        long,
        global = true,
        default_value = DEFAULT_VERBOSITY,
        value_parser = verbosity_parser
    )]
    pub verbosity: Verbosity,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the withdrawals the next payload must carry
    #[command(name = "expected")]
    Expected(ExpectedConfig),

    /// Verify a payload's withdrawals against a state and apply them
    #[command(name = "process")]
    Process(ProcessConfig),
}
