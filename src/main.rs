//! provdeps CLI entry point
//!
//! Parses arguments, runs the command and turns failures into a user-friendly
//! message on stderr with exit code 1.

use anyhow::Result;
use clap::Parser;
use provdeps::cli;
use provdeps::core::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
