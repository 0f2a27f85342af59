//! Package manifest model consumed by C8 (§4.8) and the fixer contract (§6.5).
//!
//! Generalizes the teacher's package.json-only `summarize_manifests` shape
//! into a small `ManifestKind` so the dependency analyzer isn't hard-wired
//! to one ecosystem's file name, while still only shipping the one concrete
//! reader (`package.json`) the spec's examples actually exercise.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;

/// Which manifest section a dependency is listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Production,
    Development,
    Peer,
}

impl Section {
    pub fn key(&self) -> &'static str {
        match self {
            Section::Production => "dependencies",
            Section::Development => "devDependencies",
            Section::Peer => "peerDependencies",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Manifest {
    pub path: PathBuf,
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
    pub peer_dependencies: BTreeMap<String, String>,
    pub scripts: BTreeMap<String, String>,
}

impl Manifest {
    /// Load `package.json` from `root`. Returns `None` if absent or
    /// unparseable; an I/O or parse failure here is fatal for the dependency
    /// analyzer specifically but not for the rest of the engine (§7).
    pub fn load(root: &Path) -> Option<Self> {
        let path = root.join("package.json");
        let content = std::fs::read_to_string(&path).ok()?;
        let json: JsonValue = serde_json::from_str(&content).ok()?;
        Some(Self {
            path,
            dependencies: string_map(&json, "dependencies"),
            dev_dependencies: string_map(&json, "devDependencies"),
            peer_dependencies: string_map(&json, "peerDependencies"),
            scripts: string_map(&json, "scripts"),
        })
    }

    /// Every section (in declaration order) that lists `name`. A package
    /// present in more than one section is listed once per section, per
    /// §8.3 ("counted as listed once; placement checks use the stricter
    /// classification" — callers fold this list themselves).
    pub fn sections_listing(&self, name: &str) -> Vec<Section> {
        let mut sections = Vec::new();
        if self.dependencies.contains_key(name) {
            sections.push(Section::Production);
        }
        if self.dev_dependencies.contains_key(name) {
            sections.push(Section::Development);
        }
        if self.peer_dependencies.contains_key(name) {
            sections.push(Section::Peer);
        }
        sections
    }

    pub fn is_listed(&self, name: &str) -> bool {
        !self.sections_listing(name).is_empty()
    }

    pub fn all_listed_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .dependencies
            .keys()
            .chain(self.dev_dependencies.keys())
            .chain(self.peer_dependencies.keys())
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

fn string_map(json: &JsonValue, key: &str) -> BTreeMap<String, String> {
    json.get(key)
        .and_then(|v| v.as_object())
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_dependency_sections() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("package.json"),
            r#"{"dependencies": {"react": "^18.0.0"}, "devDependencies": {"vitest": "^1.0.0"}}"#,
        )
        .unwrap();

        let manifest = Manifest::load(tmp.path()).unwrap();
        assert!(manifest.dependencies.contains_key("react"));
        assert!(manifest.dev_dependencies.contains_key("vitest"));
    }

    #[test]
    fn missing_manifest_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(Manifest::load(tmp.path()).is_none());
    }

    #[test]
    fn dependency_listed_in_both_sections_reports_both() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("package.json"),
            r#"{"dependencies": {"left-pad": "1.0.0"}, "devDependencies": {"left-pad": "1.0.0"}}"#,
        )
        .unwrap();
        let manifest = Manifest::load(tmp.path()).unwrap();
        assert_eq!(manifest.sections_listing("left-pad").len(), 2);
    }
}
