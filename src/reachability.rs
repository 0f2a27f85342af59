//! File Reachability (C4, §4.4).
//!
//! Computes the set of source files reachable from entry files by following
//! imports/re-exports through C1. Reachability is deliberately a superset of
//! "files the runtime will load": any false inclusion is strictly better than
//! a false exclusion.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSetBuilder};

use crate::frameworks::{ExportNames, FrameworkRegistry};
use crate::resolver::ModuleResolver;

/// Basenames (without extension) that are always entries by convention,
/// independent of any detected framework.
const ROOT_ENTRY_BASENAMES: &[&str] = &["index", "main", "app", "server", "worker"];

/// Config-file basenames that are always entries because the runtime loads
/// them directly rather than through project imports.
const CONFIG_ENTRY_BASENAMES: &[&str] = &[
    "vite.config", "webpack.config", "rollup.config", "jest.config", "vitest.config",
    "tsconfig", "babel.config", "eslint.config",
];

/// `file_stem` strips only the final extension, so "vite.config.ts" yields
/// "vite.config" — `CONFIG_ENTRY_BASENAMES`'s `starts_with` match relies on
/// that; `ROOT_ENTRY_BASENAMES`'s exact match only ever sees single-segment
/// stems like "index" or "main".
fn basename_stem(path: &Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(|s| s.to_string())
}

fn looks_generated(relative: &Path) -> bool {
    let as_str = relative.to_string_lossy();
    as_str.contains("/generated/")
        || as_str.ends_with(".gen.ts")
        || as_str.ends_with(".gen.js")
        || as_str.ends_with(".generated.ts")
        || as_str.ends_with(".generated.js")
}

fn is_declaration_only(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".d.ts")
}

fn under_excluded_dir(relative: &Path) -> bool {
    relative.components().any(|c| {
        matches!(
            c.as_os_str().to_str(),
            Some("node_modules") | Some("dist") | Some("build") | Some(".git")
        )
    })
}

/// Result of C4: the candidate set, the entry set, and the reachable set.
pub struct ReachabilityResult {
    pub candidates: HashSet<PathBuf>,
    pub entries: HashSet<PathBuf>,
    pub reachable: HashSet<PathBuf>,
}

/// Build the candidate set from every listed source file (step 1 of §4.4).
pub fn build_candidates(files: &[PathBuf], root: &Path, ignore_generated: bool) -> HashSet<PathBuf> {
    files
        .iter()
        .filter(|path| {
            let relative = path.strip_prefix(root).unwrap_or(path);
            if under_excluded_dir(relative) || is_declaration_only(path) {
                return false;
            }
            if ignore_generated && looks_generated(relative) {
                return false;
            }
            true
        })
        .cloned()
        .collect()
}

/// Build the entry set from the candidate set (step 2 of §4.4).
pub fn build_entries(candidates: &HashSet<PathBuf>, root: &Path, registry: &FrameworkRegistry) -> HashSet<PathBuf> {
    let mut entry_globs = GlobSetBuilder::new();
    for pattern in &registry.entry_patterns {
        if let Ok(glob) = Glob::new(&pattern.glob) {
            entry_globs.add(glob);
        }
    }
    let entry_globs = entry_globs.build().unwrap_or_else(|_| GlobSetBuilder::new().build().unwrap());

    candidates
        .iter()
        .filter(|path| {
            let relative = path.strip_prefix(root).unwrap_or(path);
            if entry_globs.is_match(relative) {
                return true;
            }
            let Some(stem) = basename_stem(path) else { return false };
            if ROOT_ENTRY_BASENAMES.contains(&stem.as_str()) {
                return true;
            }
            CONFIG_ENTRY_BASENAMES.iter().any(|base| stem.starts_with(base))
        })
        .cloned()
        .collect()
}

/// Whether the entry pattern matching `path` marks every export as used by
/// convention (vs. only a specific named set).
pub fn entry_exports_all(path: &Path, root: &Path, registry: &FrameworkRegistry) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    for pattern in &registry.entry_patterns {
        if let Ok(glob) = Glob::new(&pattern.glob) {
            if glob.compile_matcher().is_match(relative) {
                return matches!(pattern.exports, ExportNames::All);
            }
        }
    }
    false
}

/// DFS from the entry set through every resolvable import specifier
/// (step 3-4 of §4.4). `imports_of` returns the raw specifiers a file contains;
/// non-resolving specifiers and specifiers outside the candidate set are
/// ignored, per the contract.
pub fn compute_reachable(
    candidates: &HashSet<PathBuf>,
    entries: &HashSet<PathBuf>,
    resolver: &dyn ModuleResolver,
    imports_of: impl Fn(&Path) -> Vec<String>,
) -> HashSet<PathBuf> {
    let mut reachable: HashSet<PathBuf> = entries.clone();
    let mut queue: VecDeque<PathBuf> = entries.iter().cloned().collect();

    while let Some(file) = queue.pop_front() {
        for specifier in imports_of(&file) {
            let Some(target) = resolver.resolve(&specifier, &file) else { continue };
            if !candidates.contains(&target) {
                continue;
            }
            if reachable.insert(target.clone()) {
                queue.push_back(target);
            }
        }
    }

    reachable
}

pub fn run(
    files: &[PathBuf],
    root: &Path,
    registry: &FrameworkRegistry,
    ignore_generated: bool,
    resolver: &dyn ModuleResolver,
    imports_of: impl Fn(&Path) -> Vec<String>,
) -> ReachabilityResult {
    let candidates = build_candidates(files, root, ignore_generated);
    let entries = build_entries(&candidates, root, registry);
    let reachable = compute_reachable(&candidates, &entries, resolver, imports_of);
    ReachabilityResult { candidates, entries, reachable }
}
