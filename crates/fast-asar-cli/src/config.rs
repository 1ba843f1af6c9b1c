//! Command-line configuration
//!
//! Arguments are parsed with `clap`. A few settings fall back to environment
//! variables:
//!
//! - `FAST_ASAR_DEBUG`: numeric log level (0 warn, 1 info, 2 debug, 3+ trace)
//! - `FAST_ASAR_NO_SORT`: pack entries in filesystem order
//! - `NO_COLOR`: disable colored output
//! - `RUST_LOG`: full `tracing` filter, overriding everything above

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level arguments for the `asar` binary
#[derive(Debug, Clone, Parser)]
#[command(
    name = "asar",
    about = "Pack, extract and inspect Electron ASAR archives",
    version
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Numeric debug level
    #[arg(long, env = "FAST_ASAR_DEBUG", global = true)]
    pub debug: Option<u8>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Pack a directory into an archive
    Pack {
        /// Directory to pack
        input: PathBuf,
        /// Archive to write
        output: PathBuf,
        /// Keep filesystem order instead of sorting entries by path
        #[arg(long, env = "FAST_ASAR_NO_SORT")]
        no_sort: bool,
    },

    /// Extract an archive into a directory
    Extract {
        /// Archive to read
        archive: PathBuf,
        /// Directory to extract into
        output: PathBuf,
    },

    /// List every path in an archive
    List {
        /// Archive to read
        archive: PathBuf,
    },

    /// Show the header of an archive
    Inspect {
        /// Archive to read
        archive: PathBuf,
        /// Write the header JSON here instead of printing it
        raw_header_dest: Option<PathBuf>,
    },
}
