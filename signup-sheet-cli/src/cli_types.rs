//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use signup_sheet_core::Location;

#[derive(Parser)]
#[command(name = "signup-sheet")]
#[command(about = "Keep the match signup sheet for community center play", long_about = None)]
pub(crate) struct Cli {
    /// Match store file (defaults to the saved store path, then the data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Location to work with (e.g., borchard, dos-vientos); overrides the saved selection
    #[arg(short, long, global = true)]
    pub location: Option<Location>,

    /// Settings file to use instead of the default
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Identifies one match at the selected location.
#[derive(Args, Clone)]
pub(crate) struct MatchRef {
    /// Match number shown in the list
    pub number: u32,

    /// Day the match belongs to (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List the known locations
    Locations,

    /// Remember a location for later commands
    Select {
        /// Location name or alias
        #[arg(value_name = "LOCATION")]
        venue: Location,
    },

    /// Show active matches at the selected location
    List {
        /// Show active matches at every location
        #[arg(long)]
        everywhere: bool,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a new match at the selected location
    Add {
        /// Day for the match (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Set the player names of a match (up to four; omitted names are cleared)
    Players {
        #[command(flatten)]
        target: MatchRef,

        /// Player names in slot order
        #[arg(value_name = "NAME")]
        names: Vec<String>,
    },

    /// Mark a match as played (freezes its player names)
    Played {
        #[command(flatten)]
        target: MatchRef,
    },

    /// Clear all active matches at the selected location
    Clear {
        /// Clear active matches at every location
        #[arg(long)]
        everywhere: bool,
    },

    /// Clear played matches at every location
    ClearPlayed,

    /// Show cleared matches, most recent first
    Archive {
        /// Include every location
        #[arg(long)]
        everywhere: bool,

        /// Maximum number of matches to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Show match counts per location
    Stats,

    /// Show the store's schema version and column layout
    Schema,

    /// Delete the match store (all matches, including cleared ones)
    Reset {
        /// Actually delete the store
        #[arg(long)]
        confirm: bool,
    },

    /// Inspect settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show resolved settings and where each value came from
    Show,

    /// Print the settings file path
    Path,
}
