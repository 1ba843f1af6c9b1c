//! Command-line front end for ASAR archives
//!
//! The `asar` binary is a thin wrapper around [`run`]; the pieces are exposed
//! here so they can be tested without spawning a process.

#![warn(missing_docs)]

pub mod commands;
pub mod config;
pub mod logging;
pub mod output;

pub use config::{Cli, Command};
pub use output::OutputStyle;

use anyhow::Result;
use std::io::Write;

/// Output style for a parsed command line
pub fn style_for(cli: &Cli) -> OutputStyle {
    let style = OutputStyle::new();
    if cli.no_color { style.no_color() } else { style }
}

/// Execute the parsed command, writing normal output to `out`
pub fn run(cli: &Cli, style: OutputStyle, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Command::Pack {
            input,
            output,
            no_sort,
        } => commands::pack(input, output, !no_sort, out),
        Command::Extract { archive, output } => commands::extract(archive, output),
        Command::List { archive } => commands::list(archive, out),
        Command::Inspect {
            archive,
            raw_header_dest,
        } => commands::inspect(archive, raw_header_dest.as_deref(), style, out),
    }
}
