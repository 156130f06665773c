//! Configuration schema for apiskel.
//!
//! The configuration controls which source units a provider reads.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["apiskel.yaml", ".apiskel.yaml"];

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub name: String,
    /// Glob patterns for scaffolding paths that are never read
    /// (e.g., "**/App_Start/**", "**/obj/**")
    #[serde(default = "default_excluded_paths")]
    pub excluded_paths: Vec<String>,
    /// Source file extensions to read, without the dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_excluded_paths() -> Vec<String> {
    vec![
        "**/App_Start/**".to_string(),
        "**/bin/**".to_string(),
        "**/obj/**".to_string(),
    ]
}

fn default_extensions() -> Vec<String> {
    vec!["cs".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: String::new(),
            name: String::new(),
            excluded_paths: default_excluded_paths(),
            extensions: default_extensions(),
        }
    }
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load the configuration at `path`, or discover one in `dir`.
    ///
    /// Falls back to defaults when nothing is found.
    pub fn load(path: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        if let Some(p) = path {
            return Self::parse_file(p)
                .map_err(|e| anyhow::anyhow!("parsing config {}: {}", p.display(), e));
        }

        for name in DEFAULT_CONFIG_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                tracing::debug!("using config {}", candidate.display());
                return Self::parse_file(&candidate)
                    .map_err(|e| anyhow::anyhow!("parsing config {}: {}", candidate.display(), e));
            }
        }

        Ok(Self::default())
    }

    /// Build a matcher for `excluded_paths`.
    ///
    /// Uses globset, which supports `**` for recursive directory matching.
    pub fn exclusion_matcher(&self) -> anyhow::Result<globset::GlobSet> {
        let mut builder = globset::GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            let glob = globset::Glob::new(pattern)
                .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    /// Check whether a file extension is read.
    pub fn handles_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Validate a configuration for correctness.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    if config.extensions.is_empty() {
        anyhow::bail!("extensions must list at least one file extension");
    }

    for ext in &config.extensions {
        if ext.is_empty() || ext.starts_with('.') {
            anyhow::bail!("invalid extension {:?}, expected e.g. \"cs\"", ext);
        }
    }

    config.exclusion_matcher()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
version: "1.0"
name: "Shop"
excluded_paths:
  - "**/Migrations/**"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "Shop");
        assert_eq!(config.excluded_paths, vec!["**/Migrations/**"]);
        assert_eq!(config.extensions, vec!["cs"]);
    }

    #[test]
    fn test_defaults_exclude_scaffolding() {
        let config = Config::default();
        let matcher = config.exclusion_matcher().unwrap();

        assert!(matcher.is_match("Web/App_Start/RouteConfig.cs"));
        assert!(matcher.is_match("Web/obj/Debug/AssemblyInfo.cs"));
        assert!(!matcher.is_match("Web/Controllers/OrdersController.cs"));
    }

    #[test]
    fn test_validate_rejects_bad_glob() {
        let config = Config {
            excluded_paths: vec!["[".to_string()],
            ..Config::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_dotted_extension() {
        let config = Config {
            extensions: vec![".cs".to_string()],
            ..Config::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_load_discovers_config() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".apiskel.yaml"), "name: found\n").unwrap();

        let config = Config::load(None, temp.path()).unwrap();
        assert_eq!(config.name, "found");
    }

    #[test]
    fn test_load_without_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(None, temp.path()).unwrap();
        assert!(config.handles_extension("CS"));
        assert_eq!(config.excluded_paths.len(), 3);
    }
}
