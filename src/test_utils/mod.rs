//! Test utilities for tera-jsx
//!
//! Helpers shared by unit and integration tests: one-time logging setup and a
//! temporary template tree for building corpora on disk.
//!
//! # Example
//!
//! ```rust,no_run
//! use tera_jsx::test_utils::TemplateTree;
//!
//! let tree = TemplateTree::new().unwrap();
//! tree.write("templates/page.html", "{% jsx %}<Page/>{% endjsx %}").unwrap();
//! assert!(tree.path().join("templates/page.html").exists());
//! ```

use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. With `level` set, that level is used;
/// otherwise logging is enabled only when `RUST_LOG` is set.
///
/// ```bash
/// RUST_LOG=tera_jsx=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// A temporary directory holding template files.
///
/// The directory is removed when the tree is dropped.
#[derive(Debug)]
pub struct TemplateTree {
    dir: TempDir,
}

impl TemplateTree {
    /// Create an empty tree.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Root of the tree.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` at `relative`, creating parent directories.
    pub fn write(&self, relative: impl AsRef<Path>, content: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Write a template whose whole content is a single block with `body`.
    pub fn write_block(&self, relative: impl AsRef<Path>, body: &str) -> std::io::Result<PathBuf> {
        self.write(relative, &format!("{{% jsx %}}{body}{{% endjsx %}}"))
    }
}
