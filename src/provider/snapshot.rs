//! Serialized symbol snapshots.
//!
//! A snapshot is the provider output of an earlier run (or of an external
//! semantic backend) written as YAML or JSON.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{ProviderError, SymbolProvider};
use crate::model::ClassSymbol;

/// Top-level snapshot document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Snapshot {
    #[serde(default)]
    pub projects: Vec<ProjectSnapshot>,
}

/// The classes of one project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProjectSnapshot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub classes: Vec<ClassSymbol>,
}

impl Snapshot {
    /// A snapshot holding a single project.
    pub fn single(name: impl Into<String>, classes: Vec<ClassSymbol>) -> Self {
        Self {
            projects: vec![ProjectSnapshot {
                name: name.into(),
                classes,
            }],
        }
    }

    /// Parse a snapshot, choosing the format from the file extension.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ProviderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let parsed: Result<Snapshot, String> = if is_json {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| ProviderError::InvalidSnapshot {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Find a project by name. An empty name selects the only project.
    pub fn project(&self, name: &str) -> Option<&ProjectSnapshot> {
        if name.is_empty() && self.projects.len() == 1 {
            return self.projects.first();
        }
        self.projects.iter().find(|p| p.name == name)
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Provider backed by a snapshot file.
pub struct SnapshotProvider {
    path: PathBuf,
    snapshot: Snapshot,
}

impl SnapshotProvider {
    /// Load the snapshot at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ProviderError> {
        let path = path.as_ref().to_path_buf();
        let snapshot = Snapshot::parse_file(&path)?;
        tracing::debug!(
            "loaded snapshot {} ({} projects)",
            path.display(),
            snapshot.projects.len()
        );
        Ok(Self { path, snapshot })
    }

    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            path: PathBuf::new(),
            snapshot,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SymbolProvider for SnapshotProvider {
    fn list_classes(&self, project: &str) -> Result<Vec<ClassSymbol>, ProviderError> {
        self.snapshot
            .project(project)
            .map(|p| p.classes.clone())
            .ok_or_else(|| ProviderError::ProjectNotFound(project.to_string()))
    }

    fn name(&self) -> &'static str {
        "snapshot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TWO_PROJECTS: &str = r#"
projects:
  - name: Shop.Api
    classes:
      - name: OrdersController
  - name: Shop.Admin
    classes:
      - name: UsersController
      - name: RolesController
"#;

    #[test]
    fn test_select_project_by_name() {
        let snapshot: Snapshot = serde_yaml::from_str(TWO_PROJECTS).unwrap();
        let provider = SnapshotProvider::new(snapshot);

        let classes = provider.list_classes("Shop.Admin").unwrap();
        let names: Vec<_> = classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["UsersController", "RolesController"]);
    }

    #[test]
    fn test_empty_name_is_ambiguous_with_two_projects() {
        let snapshot: Snapshot = serde_yaml::from_str(TWO_PROJECTS).unwrap();
        let provider = SnapshotProvider::new(snapshot);

        assert!(matches!(
            provider.list_classes(""),
            Err(ProviderError::ProjectNotFound(_))
        ));
    }

    #[test]
    fn test_empty_name_selects_single_project() {
        let provider = SnapshotProvider::new(Snapshot::single(
            "Api",
            vec![ClassSymbol::new("HomeController")],
        ));
        assert_eq!(provider.list_classes("").unwrap().len(), 1);
    }

    #[test]
    fn test_parse_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = SnapshotProvider::from_file(&path).err().unwrap();
        assert!(matches!(err, ProviderError::InvalidSnapshot { .. }));
    }

    #[test]
    fn test_yaml_json_agree() {
        let temp = TempDir::new().unwrap();
        let snapshot: Snapshot = serde_yaml::from_str(TWO_PROJECTS).unwrap();

        let json_path = temp.path().join("s.json");
        std::fs::write(&json_path, snapshot.to_json().unwrap()).unwrap();
        let yaml_path = temp.path().join("s.yaml");
        std::fs::write(&yaml_path, snapshot.to_yaml().unwrap()).unwrap();

        assert_eq!(Snapshot::parse_file(&json_path).unwrap(), snapshot);
        assert_eq!(Snapshot::parse_file(&yaml_path).unwrap(), snapshot);
    }
}
