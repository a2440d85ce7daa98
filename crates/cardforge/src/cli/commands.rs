//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::profile::ProfileField;
use crate::session::parse_assignment;

/// Interactive session arguments.
#[derive(Debug, Args)]
pub struct SessionCommand {
    /// Directory that `download` writes into (defaults to the current directory)
    #[arg(short, long, value_name = "DIR")]
    pub download_dir: Option<PathBuf>,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Fields to change, e.g. `bio="Tools and more"`
    #[arg(value_name = "FIELD=VALUE", required = true, value_parser = parse_assignment_arg)]
    pub assignments: Vec<(ProfileField, String)>,

    /// Turn cloud sync on or off
    #[arg(long, value_name = "BOOL")]
    pub sync: Option<bool>,
}

/// Avatar command arguments.
#[derive(Debug, Args)]
pub struct AvatarCommand {
    /// Image file (PNG, JPEG)
    pub path: PathBuf,
}

/// Scan code export arguments.
#[derive(Debug, Args)]
pub struct QrCommand {
    /// Where to write the PNG (defaults to `<slug>-qr.png`)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn parse_assignment_arg(input: &str) -> Result<(ProfileField, String), String> {
    parse_assignment(input).map_err(|e| e.to_string())
}
