//! Source unit discovery.

use std::path::{Path, PathBuf};

use globset::GlobSet;
use walkdir::WalkDir;

use super::ProviderError;
use crate::config::Config;

/// Project file extension searched for by [`find_project_dir`].
const PROJECT_FILE_EXTENSION: &str = "csproj";

/// Locate the directory of `<project>.csproj` below `root`.
///
/// An empty `project` means `root` itself is the project.
pub fn find_project_dir(root: &Path, project: &str) -> Result<PathBuf, ProviderError> {
    if project.is_empty() {
        return Ok(root.to_path_buf());
    }

    let wanted = format!("{}.{}", project, PROJECT_FILE_EXTENSION);
    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
    {
        let entry = entry?;
        if entry.file_type().is_file() && entry.file_name().to_string_lossy() == wanted {
            if let Some(parent) = entry.path().parent() {
                return Ok(parent.to_path_buf());
            }
        }
    }

    Err(ProviderError::ProjectNotFound(project.to_string()))
}

/// Collect the source units of a project, sorted by path.
///
/// `excluded` is matched against paths relative to `project_dir`.
pub fn collect_source_units(
    project_dir: &Path,
    config: &Config,
    excluded: &GlobSet,
) -> Result<Vec<PathBuf>, ProviderError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(project_dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !config.handles_extension(ext) {
            continue;
        }

        let relative = path.strip_prefix(project_dir).unwrap_or(path);
        if excluded.is_match(relative) {
            tracing::debug!("skipping scaffolding {}", relative.display());
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

fn is_skipped_dir(entry: &walkdir::DirEntry) -> bool {
    // Hidden directories (.git, .vs) never hold project sources
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_string_lossy().starts_with('.')
}
