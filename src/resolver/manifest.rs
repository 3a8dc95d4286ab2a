//! package.json reading
//!
//! Only the fields the engine consumes are modeled: dependency names for the
//! package-manifest search, and the `main` entry for goto on a package.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ImportError, ImportResult};

#[derive(Debug, Default, Deserialize)]
struct RawManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,

    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, String>,

    main: Option<String>,
}

/// Parsed view of a package.json
#[derive(Debug, Default)]
pub struct PackageManifest {
    pub dependencies: Vec<String>,
    pub dev_dependencies: Vec<String>,
    pub main: Option<String>,
}

impl PackageManifest {
    pub fn read(path: &Path) -> ImportResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ImportError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let raw: RawManifest =
            serde_json::from_str(&content).map_err(|e| ImportError::ManifestError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            dependencies: raw.dependencies.into_keys().collect(),
            dev_dependencies: raw.dev_dependencies.into_keys().collect(),
            main: raw.main,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("package.json");
        std::fs::write(
            &path,
            r#"{
  "name": "fixture",
  "main": "lib/index.js",
  "dependencies": { "b-dep": "1.0.0", "a-dep": "2.0.0" }
}"#,
        )
        .unwrap();

        let manifest = PackageManifest::read(&path).unwrap();
        // BTreeMap keys come out sorted
        assert_eq!(manifest.dependencies, vec!["a-dep", "b-dep"]);
        assert!(manifest.dev_dependencies.is_empty());
        assert_eq!(manifest.main.as_deref(), Some("lib/index.js"));
    }

    #[test]
    fn test_read_manifest_rejects_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("package.json");
        std::fs::write(&path, "{ not json").unwrap();

        let error = PackageManifest::read(&path).unwrap_err();
        assert_eq!(error.status_code(), "MANIFEST_ERROR");
    }
}
