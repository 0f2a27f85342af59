//! In-memory `CompilerFacade` used by the engine's own unit and integration
//! tests so pipeline-level tests don't need real source parsing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{CompilerFacade, DeclarationSite, ExportDecl, ImportDecl, ReferenceSite};

#[derive(Debug, Clone, Default)]
pub struct MockFile {
    pub imports: Vec<ImportDecl>,
    pub exports: Vec<ExportDecl>,
    pub declarations: Vec<DeclarationSite>,
}

/// A hand-built project: `file -> (imports, exports, declarations)`, plus a
/// static specifier-resolution table, set up directly by a test rather than
/// parsed from source text.
#[derive(Debug, Default)]
pub struct MockFacade {
    pub files: HashMap<PathBuf, MockFile>,
    pub resolutions: HashMap<(String, PathBuf), PathBuf>,
}

impl MockFacade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>, contents: MockFile) -> Self {
        self.files.insert(file.into(), contents);
        self
    }

    /// Register that `specifier`, written inside `containing_file`, resolves to `target`.
    pub fn with_resolution(
        mut self,
        specifier: impl Into<String>,
        containing_file: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
    ) -> Self {
        self.resolutions.insert((specifier.into(), containing_file.into()), target.into());
        self
    }
}

impl CompilerFacade for MockFacade {
    fn list_source_files(&self) -> Vec<PathBuf> {
        self.files.keys().cloned().collect()
    }

    fn imports_of(&self, file: &Path) -> Vec<ImportDecl> {
        self.files.get(file).map(|f| f.imports.clone()).unwrap_or_default()
    }

    fn exports_of(&self, file: &Path) -> Vec<ExportDecl> {
        self.files.get(file).map(|f| f.exports.clone()).unwrap_or_default()
    }

    fn declarations_of(&self, file: &Path) -> Vec<DeclarationSite> {
        self.files.get(file).map(|f| f.declarations.clone()).unwrap_or_default()
    }

    fn find_references(&self, file: &Path, qualified_name: &str) -> Option<Vec<ReferenceSite>> {
        let declaration = self.files.get(file)?.declarations.iter().find(|d| d.qualified_name == qualified_name)?;

        let mut sites = vec![ReferenceSite {
            file: file.to_path_buf(),
            line: declaration.line,
            column: declaration.column,
            is_definition: true,
            containing_declaration: None,
        }];

        for (other_file, other) in &self.files {
            for decl in &other.declarations {
                if other_file == file && decl.qualified_name == qualified_name {
                    continue;
                }
                for ident in &decl.referenced_identifiers {
                    if ident.name == qualified_name {
                        sites.push(ReferenceSite {
                            file: other_file.clone(),
                            line: ident.line,
                            column: ident.column,
                            is_definition: false,
                            containing_declaration: Some(decl.qualified_name.clone()),
                        });
                    }
                }
            }
        }
        Some(sites)
    }

    fn resolve_module(&self, specifier: &str, containing_file: &Path) -> Option<PathBuf> {
        self.resolutions.get(&(specifier.to_string(), containing_file.to_path_buf())).cloned()
    }
}
