//! CLI layer - Command-line interface

pub mod commands;
pub mod output;

pub use commands::{Cli, Commands};
pub use output::{
    format_config, format_outcome, format_preview, format_report, format_report_json,
};
