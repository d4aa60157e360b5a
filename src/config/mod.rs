//! Configuration for tera-jsx.
//!
//! Configuration lives in a small TOML file, `jsx.toml`, next to the project:
//!
//! ```toml
//! # Directories scanned by `compilejsx` (relative paths resolve against this file)
//! template_dirs = ["templates", "app/templates"]
//!
//! # Value written for context paths that cannot be resolved.
//! # A `%s` placeholder is replaced by the dotted path.
//! string_if_invalid = ""
//! ```
//!
//! The file is located through the `COMPILEJSX_CONFIG` environment variable, falling
//! back to `jsx.toml` in the current directory. A missing file is not an error: the
//! defaults are used instead.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::core::JsxError;
use crate::templating::projection::ProjectionConfig;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "COMPILEJSX_CONFIG";

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "jsx.toml";

fn default_template_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("templates")]
}

/// Project-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsxConfig {
    /// Directories searched recursively for template sources.
    #[serde(default = "default_template_dirs")]
    pub template_dirs: Vec<PathBuf>,

    /// Fallback for unresolvable context paths (`%s` is replaced by the path).
    #[serde(default)]
    pub string_if_invalid: String,
}

impl Default for JsxConfig {
    fn default() -> Self {
        Self {
            template_dirs: default_template_dirs(),
            string_if_invalid: String::new(),
        }
    }
}

impl JsxConfig {
    /// Load configuration from `COMPILEJSX_CONFIG` or `./jsx.toml`.
    ///
    /// Falls back to [`JsxConfig::default`] when no file exists. An explicitly named
    /// file that does not exist is an error.
    pub async fn load() -> Result<Self> {
        if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(explicit);
            if !path.exists() {
                return Err(JsxError::Config {
                    message: format!(
                        "{} points to {}, which does not exist",
                        CONFIG_ENV_VAR,
                        path.display()
                    ),
                }
                .into());
            }
            return Self::load_from(&path).await;
        }

        let path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No {} found, using default configuration", DEFAULT_CONFIG_FILE);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    ///
    /// Relative `template_dirs` are resolved against the file's parent directory.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config = Self::parse(&content).map_err(|e| JsxError::Config {
            message: format!("{}: {}", path.display(), e),
        })?;

        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }

        tracing::debug!(
            "Loaded config from {} ({} template dir(s))",
            path.display(),
            config.template_dirs.len()
        );
        Ok(config)
    }

    /// Parse configuration from TOML text without touching the file system.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Make relative template directories absolute with respect to `base`.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        for dir in &mut self.template_dirs {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }

    /// Projection settings derived from this configuration.
    #[must_use]
    pub fn projection(&self) -> ProjectionConfig {
        ProjectionConfig::new(self.string_if_invalid.clone())
    }
}
