//! CLI command handlers

pub mod commands;

pub use commands::{collect_inputs, manufactured, sales, OutputOptions};
