//! Symbol providers: resolve source units into [`ClassSymbol`]s.
//!
//! This module provides:
//! - `SymbolProvider` trait: the only interface the report builder consumes
//! - `SnapshotProvider`: reads a serialized symbol snapshot (YAML or JSON)
//! - `CSharpProvider`: resolves C# source trees with tree-sitter
//!
//! Providers may resolve concurrently, but always return a fully
//! materialized list.

mod files;
mod snapshot;

#[cfg(feature = "tree-sitter")]
mod csharp;

pub use files::{collect_source_units, find_project_dir};
pub use snapshot::{ProjectSnapshot, Snapshot, SnapshotProvider};

#[cfg(feature = "tree-sitter")]
pub use csharp::CSharpProvider;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::Config;
use crate::model::ClassSymbol;

/// Errors that can occur while resolving symbols.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("project {0:?} not found")]
    ProjectNotFound(String),
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid snapshot {path}: {message}")]
    InvalidSnapshot { path: PathBuf, message: String },
    #[error("walking source tree: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("parser unavailable: {0}")]
    Parser(String),
}

/// Resolves the classes of one project.
pub trait SymbolProvider: Send + Sync {
    /// List every class declared in `project`, in deterministic order.
    ///
    /// An empty `project` selects the provider's default project.
    fn list_classes(&self, project: &str) -> Result<Vec<ClassSymbol>, ProviderError>;

    /// Short provider name for diagnostics (e.g., "snapshot", "csharp").
    fn name(&self) -> &'static str;
}

/// File extensions recognized as symbol snapshots.
pub const SNAPSHOT_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Whether `path` names a snapshot file rather than a source tree.
pub fn is_snapshot_path(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| SNAPSHOT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
}

/// Pick the provider for `path`: snapshot files are loaded directly,
/// directories are resolved as C# source trees.
pub fn open(path: &Path, config: &Config) -> anyhow::Result<Box<dyn SymbolProvider>> {
    if is_snapshot_path(path) {
        return Ok(Box::new(SnapshotProvider::from_file(path)?));
    }

    if !path.is_dir() {
        anyhow::bail!(
            "{} is neither a source directory nor a snapshot ({})",
            path.display(),
            SNAPSHOT_EXTENSIONS.join(", ")
        );
    }

    open_source_tree(path, config)
}

#[cfg(feature = "tree-sitter")]
fn open_source_tree(path: &Path, config: &Config) -> anyhow::Result<Box<dyn SymbolProvider>> {
    Ok(Box::new(CSharpProvider::new(path, config.clone())))
}

#[cfg(not(feature = "tree-sitter"))]
fn open_source_tree(path: &Path, _config: &Config) -> anyhow::Result<Box<dyn SymbolProvider>> {
    Err(ProviderError::Parser(format!(
        "cannot resolve {} without the tree-sitter feature; pass a snapshot instead",
        path.display()
    ))
    .into())
}
