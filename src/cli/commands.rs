//! CLI command definitions

use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "estreia")]
#[command(about = "Movie release reminders", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: $ESTREIA_CONFIG or ./estreia.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Evaluate as of this instant instead of the current time (RFC 3339)
    #[arg(long, global = true, value_name = "INSTANT", value_parser = parse_instant)]
    pub now: Option<DateTime<FixedOffset>>,

    /// Time zone to evaluate in (IANA name, e.g. America/Sao_Paulo)
    #[arg(long, global = true, value_name = "ZONE")]
    pub tz: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the reminder decision for a release date
    Check {
        /// Release date (YYYY-MM-DD or RFC 3339)
        date: String,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the reminder delay in milliseconds
    Delay {
        /// Release date (YYYY-MM-DD or RFC 3339)
        date: String,
    },

    /// Print a release date in long Portuguese form
    Format {
        /// Release date (YYYY-MM-DD or RFC 3339)
        date: String,
    },

    /// Send or schedule a release reminder email
    Remind {
        /// Release date (YYYY-MM-DD or RFC 3339)
        date: String,

        /// Movie title
        #[arg(long)]
        title: String,

        /// Recipient address (default: configured recipient)
        #[arg(long)]
        to: Option<String>,

        /// Poster URL to include in the email
        #[arg(long)]
        image: Option<String>,

        /// Print the email instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Fetch a movie from the API and send or schedule its reminder
    RemindMovie {
        /// Movie id
        id: u64,

        /// Recipient address (default: configured recipient)
        #[arg(long)]
        to: Option<String>,

        /// Print the email instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// View or modify configuration
    Config {
        /// Config key to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },
}

fn parse_instant(value: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|e| format!("expected an RFC 3339 instant like 2025-06-10T14:30:00-03:00 ({})", e))
}
