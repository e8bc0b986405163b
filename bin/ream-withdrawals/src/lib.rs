pub mod cli;
pub mod snapshot;
