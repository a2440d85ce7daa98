//! Command-line interface for cardforge.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    AvatarCommand, ConfigCommand, EditCommand, QrCommand, SessionCommand, StatusCommand,
};

/// cardforge - build a digital business card
///
/// Walks you through a short intake wizard, keeps the card on this machine,
/// and gives you a public link with a scannable code.
#[derive(Debug, Parser)]
#[command(name = "cardforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive card builder
    Session(SessionCommand),

    /// Show whether the card is complete and where it is shared
    Status(StatusCommand),

    /// Print the public card
    Card,

    /// Change fields; saved only if the card stays complete
    Edit(EditCommand),

    /// Set the card photo
    Avatar(AvatarCommand),

    /// Write the scan code as PNG
    Qr(QrCommand),

    /// Copy the public link to the clipboard
    CopyUrl,

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}
