//! Dependency Analyzer (C8, §4.8).
//!
//! Classifies each package listed in the nearest manifest as
//! used-in-production, used-in-development, unlisted, unused, or misplaced,
//! and reports unresolved relative imports. Grounded on the teacher's
//! package.json summarizer (`manifests.rs`) generalized to a small
//! `ManifestKind`-shaped reader, and on the production/development file
//! classification already coded as `classify::is_dev_file`.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::classify::{self, SpecifierKind};
use crate::facade::CompilerFacade;
use crate::manifest::{Manifest, Section};
use crate::resolver::ModuleResolver;
use crate::types::{Confidence, Issue, IssueKind, SymbolKind};

/// Per-package usage record accumulated across every using file (§4.8).
#[derive(Debug, Clone, Default)]
pub struct PackageUsage {
    pub used_in_production: bool,
    pub used_in_development: bool,
    pub by_files: HashSet<PathBuf>,
}

/// `tsc -> typescript`-style aliases between a script's invoked tool name and
/// the package that provides it (§4.8 "Additional usage sources").
const SCRIPT_TOOL_ALIASES: &[(&str, &str)] = &[
    ("tsc", "typescript"),
    ("eslint", "eslint"),
    ("vitest", "vitest"),
    ("jest", "jest"),
    ("vite", "vite"),
    ("webpack", "webpack"),
    ("rollup", "rollup"),
    ("prettier", "prettier"),
];

/// Command-runner tokens dropped during script tokenization since they name
/// the shell, not a package.
const KNOWN_RUNNERS: &[&str] = &["npx", "node", "npm", "pnpm", "yarn", "run", "exec"];

/// Well-known indirect dependencies: "if package A is used and package B is
/// listed as a type-definitions package for A, B is used in development."
/// Each entry is explicit and enumerated; no global guessing (§4.8).
const TYPES_PACKAGE_HEURISTICS: &[(&str, &str)] = &[
    ("react", "@types/react"),
    ("react-dom", "@types/react-dom"),
    ("express", "@types/express"),
    ("node", "@types/node"),
];

/// A file's basename matches `*.config.*`, or its path contains
/// `/scripts/`, `/bin/`, `/__tests__/`, `/tests/`, or its basename ends with
/// `.test.*`/`.spec.*` (§4.8 "Classification of a using file").
pub fn is_development_file(relative: &Path) -> bool {
    let as_str = relative.to_string_lossy().replace('\\', "/");
    let stem_has_config = relative
        .file_name()
        .and_then(|n| n.to_str())
        .map(|name| name.contains(".config."))
        .unwrap_or(false);

    stem_has_config
        || as_str.contains("/scripts/")
        || as_str.starts_with("scripts/")
        || as_str.contains("/bin/")
        || as_str.starts_with("bin/")
        || as_str.contains("/__tests__/")
        || as_str.contains("/tests/")
        || as_str.starts_with("tests/")
        || classify::is_test_basename(relative)
}

fn record_usage(
    usages: &mut BTreeMap<String, PackageUsage>,
    package: &str,
    file: &Path,
    is_dev_file: bool,
) {
    let entry = usages.entry(package.to_string()).or_default();
    entry.by_files.insert(file.to_path_buf());
    if is_dev_file {
        entry.used_in_development = true;
    } else {
        entry.used_in_production = true;
    }
}

/// Tokenize a package-manager script command and resolve it to a listed
/// package name via `SCRIPT_TOOL_ALIASES`, dropping environment assignments
/// (`FOO=bar`) and known runners.
fn script_tool_package(command: &str) -> Option<&'static str> {
    for token in command.split_whitespace() {
        if token.contains('=') {
            continue;
        }
        let bare = token.trim_start_matches("./").rsplit('/').next().unwrap_or(token);
        if KNOWN_RUNNERS.contains(&bare) {
            continue;
        }
        if let Some((_, pkg)) = SCRIPT_TOOL_ALIASES.iter().find(|(tool, _)| *tool == bare) {
            return Some(pkg);
        }
        // First non-runner, non-assignment token is the tool; stop scanning
        // once we've passed it even if unrecognized.
        break;
    }
    None
}

/// Scan a stylesheet's text for `@import "pkg";` lines and resolve each
/// non-relative import's package name (§4.8 "Style-sheet imports").
pub fn stylesheet_package_imports(content: &str) -> Vec<String> {
    let mut packages = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix("@import") else { continue };
        let rest = rest.trim();
        let quote = rest.find(['"', '\'']);
        let Some(start) = quote else { continue };
        let quote_char = rest.as_bytes()[start] as char;
        let Some(end) = rest[start + 1..].find(quote_char) else { continue };
        let specifier = &rest[start + 1..start + 1 + end];
        if !classify::is_path_specifier(specifier) {
            packages.push(classify::package_name(specifier));
        }
    }
    packages
}

/// Result of C8: usage per listed-or-unlisted package, plus the list of
/// `unresolved-import` issues discovered along the way.
pub struct DependencyAnalysis {
    pub usages: BTreeMap<String, PackageUsage>,
    pub issues: Vec<Issue>,
}

/// Run the dependency analyzer over every reachable file plus the small set
/// of development-entry files (test files, scripts, tool configuration).
pub fn run(
    root: &Path,
    files: &HashSet<PathBuf>,
    manifest: Option<&Manifest>,
    facade: &dyn CompilerFacade,
    resolver: &dyn ModuleResolver,
    read_stylesheet: impl Fn(&Path) -> Option<String>,
) -> DependencyAnalysis {
    let mut usages: BTreeMap<String, PackageUsage> = BTreeMap::new();
    let mut issues = Vec::new();

    for file in files {
        let relative = file.strip_prefix(root).unwrap_or(file);
        let is_dev_file = is_development_file(relative);

        for import in facade.imports_of(file) {
            match classify::classify(&import.specifier) {
                SpecifierKind::RuntimeBuiltin => {}
                SpecifierKind::Path => {
                    if resolver.resolve(&import.specifier, file).is_none() {
                        issues.push(Issue {
                            kind: IssueKind::UnresolvedImport,
                            confidence: Confidence::High,
                            name: import.specifier.clone(),
                            symbol_kind: None,
                            file: file.clone(),
                            line: import.line,
                            column: 1,
                            message: format!("'{}' does not resolve to a file", import.specifier),
                            parent: None,
                            context: None,
                        });
                    }
                }
                SpecifierKind::Package(package) => {
                    let resolved = resolver.resolve(&import.specifier, file);
                    let is_local = resolved.map(|p| !p.starts_with(root) || is_outside_dependency_root(&p, root)).unwrap_or(false);
                    if !is_local {
                        record_usage(&mut usages, &package, file, is_dev_file);
                        if let Some(heuristic) = TYPES_PACKAGE_HEURISTICS.iter().find(|(dep, _)| *dep == package) {
                            let types_pkg = heuristic.1;
                            usages.entry(types_pkg.to_string()).or_default().used_in_development = true;
                        }
                    }
                }
            }
        }

        if let Some(content) = read_stylesheet(file) {
            for package in stylesheet_package_imports(&content) {
                record_usage(&mut usages, &package, file, is_dev_file);
            }
        }
    }

    if let Some(manifest) = manifest {
        for (script_name, command) in &manifest.scripts {
            if let Some(package) = script_tool_package(command) {
                if manifest.is_listed(package) {
                    usages.entry(package.to_string()).or_default().used_in_development = true;
                }
            }
            let _ = script_name;
        }
    }

    DependencyAnalysis { usages, issues }
}

/// Beyond the plain `!starts_with(root)` check at the call site, no resolver
/// in this crate ever returns a path outside the project root for a
/// package-qualified specifier (`OxcFacade::resolve_module` only resolves
/// into the project tree), so there is no second case to detect here yet.
fn is_outside_dependency_root(_resolved: &Path, _root: &Path) -> bool {
    false
}

/// Derive the closed `unlisted-dependency` / `unused-dependency` /
/// `misplaced-dependency` issue set from a completed usage map (§4.8
/// "Issues"). Separated from `run` so tests can feed a hand-built usage map.
pub fn derive_issues(manifest: &Manifest, usages: &BTreeMap<String, PackageUsage>) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (package, usage) in usages {
        if manifest.is_listed(package) {
            continue;
        }
        issues.push(Issue {
            kind: IssueKind::UnlistedDependency,
            confidence: Confidence::High,
            name: package.clone(),
            symbol_kind: None,
            file: manifest.path.clone(),
            line: 1,
            column: 1,
            message: format!("'{}' is used but not listed in package.json", package),
            parent: None,
            context: None,
        });
    }

    for name in manifest.all_listed_names() {
        let sections = manifest.sections_listing(&name);
        let usage = usages.get(&name);

        let used_in_production = usage.map(|u| u.used_in_production).unwrap_or(false);
        let used_in_development = usage.map(|u| u.used_in_development).unwrap_or(false);

        if !used_in_production && !used_in_development {
            issues.push(Issue {
                kind: IssueKind::UnusedDependency,
                confidence: Confidence::Medium,
                name: name.clone(),
                symbol_kind: None,
                file: manifest.path.clone(),
                line: 1,
                column: 1,
                message: format!("'{}' is listed but never used", name),
                parent: None,
                context: None,
            });
            continue;
        }

        let only_in_dev_section = sections == vec![Section::Development];
        let only_in_prod_section = sections == vec![Section::Production];

        if used_in_production && only_in_dev_section {
            issues.push(misplaced(&manifest.path, &name, "development", "production"));
        } else if used_in_development && !used_in_production && only_in_prod_section {
            issues.push(misplaced(&manifest.path, &name, "production", "development"));
        }
    }

    issues
}

fn misplaced(manifest_path: &Path, name: &str, current: &str, recommended: &str) -> Issue {
    Issue {
        kind: IssueKind::MisplacedDependency,
        confidence: Confidence::Medium,
        name: name.to_string(),
        symbol_kind: None,
        file: manifest_path.to_path_buf(),
        line: 1,
        column: 1,
        message: format!("'{}' is used in {} but listed only in {}", name, recommended, current),
        parent: None,
        context: Some(serde_json::json!({
            "current_section": current,
            "recommended_section": recommended,
        })),
    }
}
