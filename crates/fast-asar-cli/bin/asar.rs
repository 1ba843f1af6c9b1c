//! `asar` binary entry point
//!
//! Parses arguments, installs logging and dispatches to the library. Errors
//! are printed as `error: <message>` and exit with status 1.

use clap::Parser;
use fast_asar_cli::{Cli, logging, output::format_error, run, style_for};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let style = style_for(&cli);
    logging::init(logging::level_for(cli.debug, cli.verbose), style.use_color);

    let stdout = std::io::stdout();
    match run(&cli, style, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", format_error(&format!("{error:#}"), style));
            ExitCode::FAILURE
        }
    }
}
