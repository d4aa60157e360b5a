//! `compilejsx` entry point
//!
//! Parses arguments, installs logging, runs the compiler and turns failures into a
//! user-friendly message with a non-zero exit code.

use anyhow::Result;
use clap::Parser;
use tera_jsx::cli;
use tera_jsx::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
