//! Template corpus discovery.
//!
//! Every regular file under the configured template directories is a candidate,
//! whatever its extension: templates can render HTML, text or anything else. Files
//! that cannot be read as UTF-8 are skipped with a warning when their contents are
//! loaded.

use futures::future::join_all;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::compiler::TemplateSource;
use crate::core::JsxError;

/// All regular files below `dirs`, following symlinks, sorted and de-duplicated.
///
/// Directories that do not exist are ignored.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::PathBuf;
/// use tera_jsx::discovery::list_template_files;
///
/// let files = list_template_files(&[PathBuf::from("templates")]);
/// for file in &files {
///     println!("{}", file.display());
/// }
/// ```
#[must_use]
pub fn list_template_files<P: AsRef<Path>>(dirs: &[P]) -> Vec<PathBuf> {
    let mut files = BTreeSet::new();

    for dir in dirs {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            tracing::debug!("Template directory {} does not exist, skipping", dir.display());
            continue;
        }

        for entry in walkdir::WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(std::result::Result::ok)
        {
            if entry.file_type().is_file() {
                files.insert(entry.into_path());
            }
        }
    }

    tracing::debug!("Found {} template file(s)", files.len());
    files.into_iter().collect()
}

/// Read one template as UTF-8.
///
/// # Errors
///
/// Returns [`JsxError::UnreadableSource`] if the file cannot be opened or is not
/// valid UTF-8.
pub async fn read_source(path: &Path) -> Result<TemplateSource, JsxError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| JsxError::UnreadableSource {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let content = String::from_utf8(bytes).map_err(|e| JsxError::UnreadableSource {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(TemplateSource::new(path, content))
}

/// Read all `paths` concurrently, skipping the ones that cannot be read.
///
/// The result keeps the order of `paths`.
pub async fn read_sources(paths: &[PathBuf]) -> Vec<TemplateSource> {
    let results = join_all(paths.iter().map(|path| read_source(path))).await;

    results
        .into_iter()
        .filter_map(|result| match result {
            Ok(source) => Some(source),
            Err(e) => {
                tracing::warn!("Skipping template: {}", e);
                None
            }
        })
        .collect()
}
