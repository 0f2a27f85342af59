//! Core data model: symbols, reference edges, export provenance, usage, and issues.
//!
//! Mirrors the shared model every component in this crate depends on. Identity is
//! `(absolute_file_path, qualified_name)` so cross-component code never produces
//! divergent keys for the same declaration.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Kind of a declaration enumerated as a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Class,
    Method,
    Property,
    Variable,
    Type,
    Interface,
    Enum,
    EnumMember,
    Namespace,
    Module,
    Parameter,
}

/// Identity of a `Symbol`: `(absolute_file_path, qualified_name)`.
///
/// `qualified_name` is either `<module>` (the synthetic per-file root), a bare
/// name, or `Parent.Child` for methods/properties/enum members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct SymbolId {
    pub file: PathBuf,
    pub qualified_name: String,
}

impl SymbolId {
    pub fn new(file: impl Into<PathBuf>, qualified_name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            qualified_name: qualified_name.into(),
        }
    }

    /// The synthetic module-root node for `file`.
    pub fn module_root(file: impl Into<PathBuf>) -> Self {
        Self::new(file, "<module>")
    }

    pub fn is_module_root(&self) -> bool {
        self.qualified_name == "<module>"
    }

    /// A stable string key suitable for map lookups and serialization.
    pub fn as_key(&self) -> String {
        format!("{}::{}", self.file.display(), self.qualified_name)
    }

    /// Build the child id `Parent.Child` for a method/property/enum member.
    pub fn child(&self, child_name: &str) -> Self {
        Self::new(self.file.clone(), format!("{}.{}", self.qualified_name, child_name))
    }
}

/// A declaration node in the symbol graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub kind: SymbolKind,
    pub line: usize,
    pub column: usize,
    pub exported: bool,
    pub is_entry_point: bool,
    pub entry_point_reason: Option<String>,
    pub retained_by: Option<String>,
    pub is_used: bool,
    pub parent: Option<SymbolId>,
}

impl Symbol {
    pub fn new(id: SymbolId, kind: SymbolKind, line: usize, column: usize) -> Self {
        Self {
            id,
            kind,
            line,
            column,
            exported: false,
            is_entry_point: false,
            entry_point_reason: None,
            retained_by: None,
            is_used: false,
            parent: None,
        }
    }

    pub fn mark_entry(&mut self, reason: impl Into<String>) {
        self.is_entry_point = true;
        self.entry_point_reason = Some(reason.into());
    }

    pub fn mark_retained(&mut self, reason: impl Into<String>) {
        self.retained_by = Some(reason.into());
        self.is_used = true;
    }
}

/// Edge kind, inferred at build time. Default when nothing more specific applies is `Call`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Call,
    PropertyRead,
    PropertyWrite,
    TypeReference,
    Import,
    ReExport,
    Instantiation,
    Decorator,
    JsxElement,
    InterfaceImplementation,
}

/// A reference edge `from -> to`. Edges are set-semantics: at most one per ordered pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub from: SymbolId,
    pub to: SymbolId,
    pub kind: EdgeKind,
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
}

/// Export provenance for one reachable file (§3.4).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportProvenance {
    pub value_exports: HashSet<String>,
    pub type_exports: HashSet<String>,
    pub value_origins: HashMap<String, Vec<(PathBuf, String)>>,
    pub type_origins: HashMap<String, Vec<(PathBuf, String)>>,
    pub star_reexport_targets: HashSet<PathBuf>,
    pub skip_reporting: bool,
}

/// Per-file usage record (§3.5).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileUsage {
    pub used_values: HashSet<String>,
    pub used_types: HashSet<String>,
    pub uses_all: bool,
}

/// Closed issue-kind taxonomy (§6.2). Order here is the tie-break order for display,
/// not for sorting (sorting is `(file, line, column, kind, name)`, see `engine::sort_issues`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    UnusedFile,
    UnusedDependency,
    MisplacedDependency,
    UnlistedDependency,
    UnresolvedImport,
    UnusedExported,
    UnusedExportedType,
    UnusedExport,
    UnusedMethod,
    UnusedParam,
    UnusedProperty,
    UnusedImport,
    UnusedEnumCase,
    AssignOnlyProperty,
    UnusedVariable,
    UnusedType,
    RedundantExport,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::UnusedFile => "unused-file",
            IssueKind::UnusedDependency => "unused-dependency",
            IssueKind::MisplacedDependency => "misplaced-dependency",
            IssueKind::UnlistedDependency => "unlisted-dependency",
            IssueKind::UnresolvedImport => "unresolved-import",
            IssueKind::UnusedExported => "unused-exported",
            IssueKind::UnusedExportedType => "unused-exported-type",
            IssueKind::UnusedExport => "unused-export",
            IssueKind::UnusedMethod => "unused-method",
            IssueKind::UnusedParam => "unused-param",
            IssueKind::UnusedProperty => "unused-property",
            IssueKind::UnusedImport => "unused-import",
            IssueKind::UnusedEnumCase => "unused-enum-case",
            IssueKind::AssignOnlyProperty => "assign-only-property",
            IssueKind::UnusedVariable => "unused-variable",
            IssueKind::UnusedType => "unused-type",
            IssueKind::RedundantExport => "redundant-export",
        }
    }
}

/// Confidence level assigned by a detector (§4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// A reported issue (§3.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub confidence: Confidence,
    pub name: String,
    pub symbol_kind: Option<SymbolKind>,
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub parent: Option<String>,
    pub context: Option<serde_json::Value>,
}

impl Issue {
    /// Hash used for baseline diffing (§3.6, §6.4). Deliberately excludes line/column
    /// so a baseline survives edits that merely move a declaration.
    pub fn stable_hash(&self, project_root: &Path) -> String {
        use sha2::{Digest, Sha256};
        let relative = self
            .file
            .strip_prefix(project_root)
            .unwrap_or(&self.file)
            .to_string_lossy();
        let parent = self.parent.as_deref().unwrap_or("");
        let canonical = format!("{}|{}|{}|{}", self.kind.as_str(), self.name, parent, relative);
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        let digest = hasher.finalize();
        hex_encode(&digest)
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{:02x}", b));
    }
    s
}
