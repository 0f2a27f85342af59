//! Configuration surface (§6.3) — consumed, not defined here: the engine trusts
//! whatever a caller already parsed and merged across workspace prefixes.
//!
//! Loads `.sweepa/config.toml` from a project root, the same dotfolder-TOML
//! layout and graceful-default-on-parse-failure behaviour used throughout this
//! crate's persistence layer.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Gate for C7 (Module-Boundary Export Analysis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnusedExportedMode {
    Off,
    Barrels,
    All,
}

impl Default for UnusedExportedMode {
    fn default() -> Self {
        UnusedExportedMode::Barrels
    }
}

/// Root configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// `glob -> [issue kind strings]`.
    #[serde(default)]
    pub ignore_issues: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub ignore_dependencies: Vec<String>,
    #[serde(default)]
    pub ignore_unresolved: Vec<String>,
    #[serde(default)]
    pub unused_exported: UnusedExportedMode,
    #[serde(default)]
    pub unused_exported_ignore_generated: bool,
    /// Extra decorator names to retain beyond what detected frameworks contribute.
    #[serde(default)]
    pub retain_decorators: Vec<String>,
    /// When set, every decorated class/method/property is retained regardless
    /// of which decorator it carries.
    #[serde(default)]
    pub retain_all_decorated: bool,
    /// `relative workspace path -> nested config`, merged in order of increasing specificity.
    #[serde(default)]
    pub workspaces: HashMap<String, Box<Configuration>>,
    /// Fail fast instead of falling back to defaults on a malformed config file.
    #[serde(default)]
    pub strict_config: bool,
}

impl Configuration {
    /// Load config from `.sweepa/config.toml` in the given project root.
    /// Returns the default configuration if the file doesn't exist; if it exists
    /// but fails to parse, warns and falls back unless `strict_config` can't be
    /// known yet (pre-parse), in which case the fallback itself is non-strict.
    pub fn load(root: &Path) -> Self {
        let path = root.join(".sweepa").join("config.toml");
        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    crate::error::warn(format!("failed to parse {}: {}", path.display(), e));
                    Self::default()
                }
            },
            Err(e) => {
                crate::error::warn(format!("failed to read {}: {}", path.display(), e));
                Self::default()
            }
        }
    }

    /// Merge a nested workspace override on top of this configuration. Lists are
    /// concatenated; scalars are overridden when the nested config sets them.
    pub fn merged_for_workspace(&self, workspace_relative: &str) -> Configuration {
        let mut merged = self.clone();
        if let Some(nested) = self.workspaces.get(workspace_relative) {
            merged.ignore_dependencies.extend(nested.ignore_dependencies.iter().cloned());
            merged.ignore_unresolved.extend(nested.ignore_unresolved.iter().cloned());
            for (glob, kinds) in &nested.ignore_issues {
                merged
                    .ignore_issues
                    .entry(glob.clone())
                    .or_default()
                    .extend(kinds.iter().cloned());
            }
            merged.unused_exported = nested.unused_exported;
            merged.unused_exported_ignore_generated = nested.unused_exported_ignore_generated;
            merged.retain_decorators.extend(nested.retain_decorators.iter().cloned());
            merged.retain_all_decorated = merged.retain_all_decorated || nested.retain_all_decorated;
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn default_config_gates_on_barrels() {
        let config = Configuration::default();
        assert_eq!(config.unused_exported, UnusedExportedMode::Barrels);
        assert!(config.ignore_dependencies.is_empty());
    }

    #[test]
    fn load_missing_file_is_default() {
        let temp = TempDir::new().expect("temp dir");
        let config = Configuration::load(temp.path());
        assert_eq!(config.unused_exported, UnusedExportedMode::Barrels);
    }

    #[test]
    fn load_valid_config() {
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join(".sweepa");
        std::fs::create_dir_all(&dir).expect("create .sweepa");
        let path = dir.join("config.toml");
        let mut file = std::fs::File::create(&path).expect("create config");
        writeln!(
            file,
            r#"
unused_exported = "all"
ignore_dependencies = ["left-pad"]

[ignore_issues]
"src/generated/**" = ["unused-export", "unused-import"]
"#
        )
        .expect("write config");

        let config = Configuration::load(temp.path());
        assert_eq!(config.unused_exported, UnusedExportedMode::All);
        assert!(config.ignore_dependencies.contains(&"left-pad".to_string()));
        assert_eq!(
            config.ignore_issues.get("src/generated/**").map(|v| v.len()),
            Some(2)
        );
    }

    #[test]
    fn load_malformed_config_falls_back_to_default() {
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join(".sweepa");
        std::fs::create_dir_all(&dir).expect("create .sweepa");
        let path = dir.join("config.toml");
        std::fs::write(&path, "unused_exported = [not valid toml").expect("write");

        let config = Configuration::load(temp.path());
        assert_eq!(config.unused_exported, UnusedExportedMode::Barrels);
    }

    #[test]
    fn workspace_override_concatenates_lists() {
        let mut base = Configuration::default();
        base.ignore_dependencies = vec!["a".into()];
        let mut nested = Configuration::default();
        nested.ignore_dependencies = vec!["b".into()];
        base.workspaces.insert("packages/ui".into(), Box::new(nested));

        let merged = base.merged_for_workspace("packages/ui");
        assert_eq!(merged.ignore_dependencies, vec!["a".to_string(), "b".to_string()]);
    }
}
