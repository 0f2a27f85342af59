//! Module Resolver (C1, §4.1).
//!
//! `resolve(specifier, containing_file) -> absolute_path?` must reproduce the
//! compiler's own resolution rules. The trait leaves that to the compiler
//! facade's implementation; this module provides the pure relative/extension/
//! index-resolution fallback (grounded on the teacher's `resolve_js_relative` /
//! `resolve_with_extensions`) plus the caching layer the contract prescribes.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::classify::{self, SpecifierKind};

/// A path-alias table (`tsconfig`-style `compilerOptions.paths`), consulted
/// before falling back to relative resolution.
#[derive(Debug, Clone, Default)]
pub struct PathAliasTable {
    /// Alias prefix (without trailing `/*`) -> candidate base directories, each
    /// without trailing `/*`, in the order they should be tried.
    entries: Vec<(String, Vec<PathBuf>)>,
}

impl PathAliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, alias_prefix: impl Into<String>, bases: Vec<PathBuf>) {
        self.entries.push((alias_prefix.into(), bases));
    }

    fn resolve(&self, specifier: &str, extensions: &HashSet<String>) -> Option<PathBuf> {
        for (prefix, bases) in &self.entries {
            if let Some(rest) = specifier.strip_prefix(prefix.as_str()) {
                let rest = rest.trim_start_matches('/');
                for base in bases {
                    let candidate = if rest.is_empty() { base.clone() } else { base.join(rest) };
                    if let Some(found) = resolve_with_extensions(candidate, extensions) {
                        return Some(found);
                    }
                }
            }
        }
        None
    }
}

/// Trait any compiler facade's resolution must satisfy (§6.1 `resolve_module`).
pub trait ModuleResolver {
    fn resolve(&self, specifier: &str, containing_file: &Path) -> Option<PathBuf>;
}

/// Layered resolver: runtime-builtin short-circuit -> path aliases -> relative
/// resolution with extension/index probing -> absent. Caches by
/// `(specifier, containing_directory)` as the contract prescribes.
pub struct LayeredResolver {
    pub aliases: PathAliasTable,
    pub extensions: HashSet<String>,
    cache: RefCell<HashMap<(String, PathBuf), Option<PathBuf>>>,
}

impl LayeredResolver {
    pub fn new(extensions: HashSet<String>) -> Self {
        Self {
            aliases: PathAliasTable::new(),
            extensions,
            cache: RefCell::new(HashMap::new()),
        }
    }
}

impl ModuleResolver for LayeredResolver {
    fn resolve(&self, specifier: &str, containing_file: &Path) -> Option<PathBuf> {
        let containing_dir = containing_file.parent().unwrap_or(containing_file).to_path_buf();
        let cache_key = (specifier.to_string(), containing_dir.clone());
        if let Some(hit) = self.cache.borrow().get(&cache_key) {
            return hit.clone();
        }

        let resolved = match classify::classify(specifier) {
            SpecifierKind::RuntimeBuiltin => None,
            SpecifierKind::Path => {
                let candidate = containing_dir.join(specifier);
                resolve_with_extensions(candidate, &self.extensions)
            }
            SpecifierKind::Package(_) => self.aliases.resolve(specifier, &self.extensions),
        };

        self.cache.borrow_mut().insert(cache_key, resolved.clone());
        resolved
    }
}

/// Probe a candidate path for an existing file, trying each known extension
/// when the candidate itself has none, then trying `<candidate>/index.<ext>`.
fn resolve_with_extensions(candidate: PathBuf, extensions: &HashSet<String>) -> Option<PathBuf> {
    if candidate.is_file() {
        return Some(candidate);
    }
    if candidate.extension().is_none() {
        for ext in extensions {
            let with_ext = candidate.with_extension(ext);
            if with_ext.is_file() {
                return Some(with_ext);
            }
        }
    }
    if candidate.is_dir() {
        for ext in extensions {
            let index = candidate.join(format!("index.{}", ext));
            if index.is_file() {
                return Some(index);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn exts() -> HashSet<String> {
        ["ts", "tsx", "js"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolves_relative_specifier_with_missing_extension() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("util.ts"), "export const x = 1;").unwrap();
        let entry = tmp.path().join("entry.ts");
        fs::write(&entry, "import './util';").unwrap();

        let resolver = LayeredResolver::new(exts());
        let resolved = resolver.resolve("./util", &entry);
        assert_eq!(resolved, Some(tmp.path().join("util.ts")));
    }

    #[test]
    fn resolves_directory_index() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("widgets")).unwrap();
        fs::write(tmp.path().join("widgets/index.ts"), "export const W = 1;").unwrap();
        let entry = tmp.path().join("entry.ts");
        fs::write(&entry, "import './widgets';").unwrap();

        let resolver = LayeredResolver::new(exts());
        let resolved = resolver.resolve("./widgets", &entry);
        assert_eq!(resolved, Some(tmp.path().join("widgets/index.ts")));
    }

    #[test]
    fn runtime_builtin_never_resolves() {
        let tmp = TempDir::new().unwrap();
        let entry = tmp.path().join("entry.ts");
        fs::write(&entry, "import 'fs';").unwrap();
        let resolver = LayeredResolver::new(exts());
        assert_eq!(resolver.resolve("fs", &entry), None);
    }

    #[test]
    fn cache_returns_same_result_without_refiling() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("util.ts"), "export const x = 1;").unwrap();
        let entry = tmp.path().join("entry.ts");
        fs::write(&entry, "import './util';").unwrap();

        let resolver = LayeredResolver::new(exts());
        let first = resolver.resolve("./util", &entry);
        fs::remove_file(tmp.path().join("util.ts")).unwrap();
        let second = resolver.resolve("./util", &entry);
        assert_eq!(first, second);
    }

    #[test]
    fn alias_table_resolves_before_relative_fallback() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src/components")).unwrap();
        fs::write(tmp.path().join("src/components/Button.tsx"), "export const Button = 1;").unwrap();
        let entry = tmp.path().join("src/app.tsx");
        fs::write(&entry, "import '@/components/Button';").unwrap();

        let mut resolver = LayeredResolver::new(exts());
        resolver
            .aliases
            .add("@/", vec![tmp.path().join("src")]);
        let resolved = resolver.resolve("@/components/Button", &entry);
        assert_eq!(resolved, Some(tmp.path().join("src/components/Button.tsx")));
    }
}
