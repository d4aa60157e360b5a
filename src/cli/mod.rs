//! Command-line interface for `compilejsx`.
//!
//! The command scans every configured template directory for JSX blocks and writes
//! the JavaScript registry that hydrates them in the browser:
//!
//! ```bash
//! compilejsx                                # registry on stdout
//! compilejsx --output static/jsx_registry.jsx
//! ```
//!
//! Template directories and the missing-value string come from `jsx.toml` (see
//! [`crate::config`]). Logging goes to stderr and is controlled with `RUST_LOG`
//! (default `warn`), so stdout only ever carries the registry.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::compiler::RegistryCompiler;
use crate::config::JsxConfig;
use crate::discovery::{list_template_files, read_sources};

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Compile JSX blocks found in templates into a client-side registry.
#[derive(Parser, Debug)]
#[command(
    name = "compilejsx",
    about = "Compile JSX blocks in templates into a JavaScript registry",
    version,
    long_about = "Scans the configured template directories for {% jsx %} blocks and emits a \
                  JavaScript module mapping each block fingerprint to a render function, \
                  plus the bootstrap code that hydrates rendered pages."
)]
pub struct Cli {
    /// Write the registry to this file instead of stdout.
    ///
    /// Parent directories are created as needed.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

impl Cli {
    /// Output file, if one was given.
    #[must_use]
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// Load configuration and run the command.
    pub async fn execute(self) -> Result<()> {
        let config = JsxConfig::load().await?;
        self.execute_with_config(config).await
    }

    /// Run the command with an already loaded configuration.
    pub async fn execute_with_config(self, config: JsxConfig) -> Result<()> {
        let files = list_template_files(&config.template_dirs);
        tracing::info!(
            "Scanning {} template file(s) in {} director{}",
            files.len(),
            config.template_dirs.len(),
            if config.template_dirs.len() == 1 { "y" } else { "ies" }
        );

        let sources = read_sources(&files).await;
        let registry = RegistryCompiler::compile(&sources)?;

        match self.output {
            Some(path) => write_registry(&path, &registry).await?,
            None => print!("{registry}"),
        }
        Ok(())
    }
}

async fn write_registry(path: &Path, registry: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    tokio::fs::write(path, registry)
        .await
        .with_context(|| format!("Failed to write registry to {}", path.display()))?;
    tracing::info!("Wrote registry to {}", path.display());
    Ok(())
}

/// Install the stderr log subscriber.
///
/// Honours `RUST_LOG`; falls back to `warn`. Calling it twice is harmless.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
