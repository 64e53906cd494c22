//! Template directory discovery.

use std::path::{Path, PathBuf};

use crate::error::CoreError;

/// File extension recognised as a workflow template.
pub const TEMPLATE_EXTENSION: &str = "json";

/// List the `*.json` files in `dir`, sorted by file name.
///
/// Subdirectories, hidden files (leading `.`, e.g. macOS `._a.json`
/// resource forks) and files with other extensions are ignored. The
/// extension match is case-sensitive. An empty directory yields an empty
/// list; callers decide whether that is an error.
pub async fn discover_templates(dir: &Path) -> Result<Vec<PathBuf>, CoreError> {
    let mut templates = Vec::new();

    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !is_template_name(&path) {
            continue;
        }
        // Follows symlinks, like `Path::is_file`.
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => templates.push(path),
            _ => {}
        }
    }

    templates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(templates)
}

fn is_template_name(path: &Path) -> bool {
    let visible = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| !n.starts_with('.'));
    visible && path.extension().and_then(|e| e.to_str()) == Some(TEMPLATE_EXTENSION)
}

/// Display name of a template (its file name), used in reports and errors.
pub fn template_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
