pub mod cli;
pub mod presets;
