//! Concrete `CompilerFacade` backed by OXC (`oxc_allocator`/`oxc_parser`/`oxc_ast`/
//! `oxc_ast_visit`/`oxc_semantic`), the exact parser stack used elsewhere in this
//! crate's TypeScript/JavaScript ancestry for AST analysis.
//!
//! Each file is parsed independently into its own `Allocator` arena (OXC's AST
//! nodes borrow from it) and walked once to collect imports, exports, and
//! declaration sites. `find_references` is answered from a project-wide index
//! built once at construction time rather than per query, since OXC's
//! `find_references` is a single-file concept and cross-file reference lookup
//! needs the whole project's identifier usage anyway.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::Visit;
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};
use walkdir::WalkDir;

use super::{DeclarationSite, ExportDecl, IdentifierRef, ImportDecl, ImportedName, ParameterSite, ReferenceSite};
use crate::types::SymbolKind;

const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

fn under_excluded_dir(path: &Path) -> bool {
    path.components().any(|c| {
        matches!(
            c.as_os_str().to_str(),
            Some("node_modules") | Some("dist") | Some("build") | Some(".git")
        )
    })
}

fn list_project_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_source_file(path) && !under_excluded_dir(path))
        .collect()
}

fn line_of(source: &str, span: Span) -> usize {
    let end = (span.start as usize).min(source.len());
    source[..end].bytes().filter(|b| *b == b'\n').count() + 1
}

/// A declaration's identity while its body is being walked: the parent name
/// (`None` for top-level declarations) plus its own bare qualified name.
/// Needed because method/property names (e.g. `render`) are only unique
/// within their owning class, not within the whole file.
type DeclKey = (Option<String>, String);

/// Parsed view of one file: raw text plus the extracted facts a `Visit` pass
/// collected from its AST. Kept instead of the OXC arena itself, since the
/// arena's lifetime cannot outlive the parse call.
struct ParsedFile {
    source: String,
    imports: Vec<ImportDecl>,
    exports: Vec<ExportDecl>,
    declarations: Vec<DeclarationSite>,
}

fn parse_file(path: &Path) -> Option<ParsedFile> {
    let source = std::fs::read_to_string(path).ok()?;
    let allocator = Allocator::default();
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let is_jsx = ext == "tsx" || ext == "jsx";
    let source_type = SourceType::from_path(path)
        .unwrap_or_default()
        .with_typescript(true)
        .with_jsx(is_jsx);

    let ret = Parser::new(&allocator, &source, source_type).parse();
    if !ret.errors.is_empty() {
        crate::error::debug(format!("parser errors in {}: {} errors", path.display(), ret.errors.len()));
    }

    let mut visitor = FactVisitor::new(&source);
    visitor.visit_program(&ret.program);

    Some(ParsedFile {
        source,
        imports: visitor.imports,
        exports: visitor.exports,
        declarations: visitor.declarations,
    })
}

/// Collects imports, exports, and declaration sites (module-, class-, and
/// enum-level) in one AST walk, in the same spirit as this crate's
/// `JsVisitor`: a mutable accumulator struct driven by `oxc_ast_visit::Visit`
/// with span-to-line helpers.
struct FactVisitor<'a> {
    source: &'a str,
    imports: Vec<ImportDecl>,
    exports: Vec<ExportDecl>,
    declarations: Vec<DeclarationSite>,
    /// The declaration whose body is currently being walked, identified by
    /// `(parent, qualified_name)`; identifiers seen while this is set are
    /// attributed to it as `referenced_identifiers`.
    current_function: Option<DeclKey>,
    /// The class whose member list is currently being walked, for `parent`
    /// linkage on methods/properties.
    current_class: Option<String>,
    /// Set for the duration of visiting a declaration directly named by an
    /// `export` (or `export default`) statement, so the pushed declaration's
    /// `exported` bit reflects export syntax in its own source (§3.2).
    pending_export: bool,
}

impl<'a> FactVisitor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            imports: Vec::new(),
            exports: Vec::new(),
            declarations: Vec::new(),
            current_function: None,
            current_class: None,
            pending_export: false,
        }
    }

    fn push_declaration(&mut self, qualified_name: String, kind: SymbolKind, span: Span, exported: bool) {
        self.push_declaration_full(qualified_name, kind, span, exported, None, Vec::new(), Vec::new());
    }

    #[allow(clippy::too_many_arguments)]
    fn push_declaration_full(
        &mut self,
        qualified_name: String,
        kind: SymbolKind,
        span: Span,
        exported: bool,
        parent: Option<String>,
        decorators: Vec<String>,
        parameters: Vec<ParameterSite>,
    ) {
        self.declarations.push(DeclarationSite {
            qualified_name,
            kind,
            line: line_of(self.source, span),
            column: 1,
            exported,
            parent,
            decorators,
            referenced_identifiers: Vec::new(),
            parameters,
        });
    }

    fn find_declaration_mut(&mut self, key: &DeclKey) -> Option<&mut DeclarationSite> {
        self.declarations
            .iter_mut()
            .find(|d| d.parent == key.0 && d.qualified_name == key.1)
    }

    /// Finish a declaration's `parameters.is_used` bits once its body has been
    /// walked and `referenced_identifiers` is fully populated (§4.9
    /// `UnusedParameter`: a parameter counts as used if its name occurs
    /// anywhere in the body, conservatively — this crate doesn't do per-scope
    /// shadowing analysis).
    fn finish_parameter_usage(&mut self, key: &DeclKey) {
        let Some(decl) = self.find_declaration_mut(key) else { return };
        let used_names: std::collections::HashSet<&str> =
            decl.referenced_identifiers.iter().map(|r| r.name.as_str()).collect();
        for param in &mut decl.parameters {
            if used_names.contains(param.name.as_str()) {
                param.is_used = true;
            }
        }
    }

    /// Build the parameter list for a function-shaped declaration (§4.9).
    /// Destructured and rest parameters are recorded but never flagged.
    fn collect_parameters(&self, params: &FormalParameters<'a>) -> Vec<ParameterSite> {
        params
            .items
            .iter()
            .map(|param| match &param.pattern.kind {
                BindingPatternKind::BindingIdentifier(id) => ParameterSite {
                    name: id.name.to_string(),
                    line: line_of(self.source, id.span),
                    column: 1,
                    is_rest_or_destructured: false,
                    is_used: false,
                },
                _ => ParameterSite {
                    name: String::new(),
                    line: line_of(self.source, param.span),
                    column: 1,
                    is_rest_or_destructured: true,
                    is_used: true,
                },
            })
            .chain(params.rest.as_ref().map(|rest| ParameterSite {
                name: String::new(),
                line: line_of(self.source, rest.span),
                column: 1,
                is_rest_or_destructured: true,
                is_used: true,
            }))
            .collect()
    }

    /// Extract a usable declared name from a (non-computed) property key.
    /// Computed keys (`[expr]: ...`) are skipped: the facade never guesses.
    fn property_key_name(&self, key: &PropertyKey<'a>) -> Option<String> {
        match key {
            PropertyKey::Identifier(id) => Some(id.name.to_string()),
            PropertyKey::PrivateIdentifier(id) => Some(format!("#{}", id.name)),
            _ => None,
        }
    }

    /// Extract a decorator's bare name: `@Column` and `@Column({...})` both
    /// resolve to `"Column"`; decorators with a non-identifier callee/target
    /// (e.g. a member expression) are skipped rather than guessed.
    fn decorator_name(&self, expr: &Expression<'a>) -> Option<String> {
        match expr {
            Expression::Identifier(id) => Some(id.name.to_string()),
            Expression::CallExpression(call) => match &call.callee {
                Expression::Identifier(id) => Some(id.name.to_string()),
                _ => None,
            },
            _ => None,
        }
    }

    fn decorator_names(&self, decorators: &[Decorator<'a>]) -> Vec<String> {
        decorators.iter().filter_map(|d| self.decorator_name(&d.expression)).collect()
    }

    /// Recursively collect the bound identifier names in a binding pattern,
    /// so module-scope destructuring (`const { a, b } = cfg;`) enumerates
    /// one node per sub-binding (§4.5 "Nodes").
    fn bound_names(&self, pattern: &BindingPattern<'a>, out: &mut Vec<(String, Span)>) {
        match &pattern.kind {
            BindingPatternKind::BindingIdentifier(id) => out.push((id.name.to_string(), id.span)),
            BindingPatternKind::ObjectPattern(obj) => {
                for prop in &obj.properties {
                    self.bound_names(&prop.value, out);
                }
                if let Some(rest) = &obj.rest {
                    self.bound_names(&rest.argument, out);
                }
            }
            BindingPatternKind::ArrayPattern(arr) => {
                for element in arr.elements.iter().flatten() {
                    self.bound_names(element, out);
                }
                if let Some(rest) = &arr.rest {
                    self.bound_names(&rest.argument, out);
                }
            }
            BindingPatternKind::AssignmentPattern(assign) => self.bound_names(&assign.left, out),
        }
    }

    fn is_function_like(expr: &Expression<'a>) -> bool {
        matches!(expr, Expression::FunctionExpression(_) | Expression::ArrowFunctionExpression(_))
    }

    fn params_of(expr: &Expression<'a>) -> Option<&FormalParameters<'a>> {
        match expr {
            Expression::FunctionExpression(f) => Some(&f.params),
            Expression::ArrowFunctionExpression(f) => Some(&f.params),
            _ => None,
        }
    }
}

impl<'a> Visit<'a> for FactVisitor<'a> {
    fn visit_import_declaration(&mut self, decl: &ImportDeclaration<'a>) {
        let specifier = decl.source.value.to_string();
        let type_only = decl.import_kind.is_type();
        let mut named = Vec::new();
        let mut default = None;
        let mut namespace = None;

        if let Some(specifiers) = &decl.specifiers {
            for spec in specifiers {
                match spec {
                    ImportDeclarationSpecifier::ImportSpecifier(s) => {
                        named.push(ImportedName {
                            imported: s.imported.name().to_string(),
                            local: s.local.name.to_string(),
                            type_only: s.import_kind.is_type(),
                        });
                    }
                    ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                        default = Some(s.local.name.to_string());
                    }
                    ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                        namespace = Some(s.local.name.to_string());
                    }
                }
            }
        }

        self.imports.push(ImportDecl {
            specifier,
            named,
            default,
            namespace,
            type_only,
            line: line_of(self.source, decl.span),
        });
    }

    fn visit_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'a>) {
        let reexport_from = decl.source.as_ref().map(|s| s.value.to_string());
        for spec in &decl.specifiers {
            self.exports.push(ExportDecl {
                name: spec.exported.name().to_string(),
                is_type: spec.export_kind.is_type(),
                line: line_of(self.source, spec.span),
                reexport_from: reexport_from.clone(),
                is_star: false,
                star_alias: None,
            });
        }
        if let Some(declaration) = &decl.declaration {
            let previous = self.pending_export;
            self.pending_export = true;
            self.visit_declaration(declaration);
            self.pending_export = previous;
        }
    }

    fn visit_export_all_declaration(&mut self, decl: &ExportAllDeclaration<'a>) {
        self.exports.push(ExportDecl {
            name: decl.exported.as_ref().map(|n| n.name().to_string()).unwrap_or_else(|| "*".to_string()),
            is_type: decl.export_kind.is_type(),
            line: line_of(self.source, decl.span),
            reexport_from: Some(decl.source.value.to_string()),
            is_star: true,
            star_alias: decl.exported.as_ref().map(|n| n.name().to_string()),
        });
    }

    fn visit_export_default_declaration(&mut self, decl: &ExportDefaultDeclaration<'a>) {
        let line = line_of(self.source, decl.span);
        match &decl.declaration {
            ExportDefaultDeclarationKind::FunctionDeclaration(f) => {
                self.exports.push(ExportDecl {
                    name: "default".to_string(),
                    is_type: false,
                    line,
                    reexport_from: None,
                    is_star: false,
                    star_alias: None,
                });
                let parameters = self.collect_parameters(&f.params);
                self.push_declaration_full("default".to_string(), SymbolKind::Function, f.span, true, None, Vec::new(), parameters);
                let key: DeclKey = (None, "default".to_string());
                let previous = self.current_function.replace(key.clone());
                if let Some(body) = &f.body {
                    self.visit_function_body(body);
                }
                self.current_function = previous;
                self.finish_parameter_usage(&key);
            }
            ExportDefaultDeclarationKind::ClassDeclaration(c) => {
                self.exports.push(ExportDecl {
                    name: "default".to_string(),
                    is_type: false,
                    line,
                    reexport_from: None,
                    is_star: false,
                    star_alias: None,
                });
                self.push_declaration("default".to_string(), SymbolKind::Class, c.span, true);
                self.visit_class(c);
            }
            ExportDefaultDeclarationKind::TSInterfaceDeclaration(i) => {
                self.exports.push(ExportDecl {
                    name: "default".to_string(),
                    is_type: true,
                    line,
                    reexport_from: None,
                    is_star: false,
                    star_alias: None,
                });
                self.push_declaration("default".to_string(), SymbolKind::Interface, i.span, true);
            }
            _ => {
                self.exports.push(ExportDecl {
                    name: "default".to_string(),
                    is_type: false,
                    line,
                    reexport_from: None,
                    is_star: false,
                    star_alias: None,
                });
            }
        }
    }

    fn visit_function(&mut self, func: &Function<'a>, flags: oxc_ast_visit::scope::ScopeFlags) {
        let name = func.id.as_ref().map(|id| id.name.to_string());
        if let Some(name) = &name {
            let parameters = self.collect_parameters(&func.params);
            let exported = self.pending_export;
            self.push_declaration_full(name.clone(), SymbolKind::Function, func.span, exported, None, Vec::new(), parameters);
            let key: DeclKey = (None, name.clone());
            let previous = self.current_function.replace(key.clone());
            oxc_ast_visit::walk::walk_function(self, func, flags);
            self.current_function = previous;
            self.finish_parameter_usage(&key);
        } else {
            oxc_ast_visit::walk::walk_function(self, func, flags);
        }
    }

    fn visit_class(&mut self, class: &Class<'a>) {
        let name = class.id.as_ref().map(|id| id.name.to_string());
        let exported = self.pending_export;
        if let Some(name) = &name {
            self.push_declaration_full(
                name.clone(),
                SymbolKind::Class,
                class.span,
                exported,
                None,
                self.decorator_names(&class.decorators),
                Vec::new(),
            );
        }
        let previous_class = self.current_class.take();
        self.current_class = name;
        // A class's member export status never comes from `pending_export`
        // (methods/properties don't carry export syntax of their own);
        // suppress it for the duration of the member walk.
        let previous_export = self.pending_export;
        self.pending_export = false;
        oxc_ast_visit::walk::walk_class(self, class);
        self.pending_export = previous_export;
        self.current_class = previous_class;
    }

    fn visit_method_definition(&mut self, node: &MethodDefinition<'a>) {
        let Some(name) = self.property_key_name(&node.key) else {
            oxc_ast_visit::walk::walk_method_definition(self, node);
            return;
        };
        let parent = self.current_class.clone();
        let parameters = self.collect_parameters(&node.value.params);
        let decorators = self.decorator_names(&node.decorators);
        self.push_declaration_full(name.clone(), SymbolKind::Method, node.span, false, parent.clone(), decorators, parameters);

        let key: DeclKey = (parent, name);
        let previous = self.current_function.replace(key.clone());
        oxc_ast_visit::walk::walk_method_definition(self, node);
        self.current_function = previous;
        self.finish_parameter_usage(&key);
    }

    fn visit_property_definition(&mut self, node: &PropertyDefinition<'a>) {
        let Some(name) = self.property_key_name(&node.key) else {
            oxc_ast_visit::walk::walk_property_definition(self, node);
            return;
        };
        let parent = self.current_class.clone();
        let decorators = self.decorator_names(&node.decorators);
        self.push_declaration_full(name.clone(), SymbolKind::Property, node.span, false, parent.clone(), decorators, Vec::new());

        let key: DeclKey = (parent, name);
        let previous = self.current_function.replace(key.clone());
        oxc_ast_visit::walk::walk_property_definition(self, node);
        self.current_function = previous;
    }

    fn visit_ts_interface_declaration(&mut self, decl: &TSInterfaceDeclaration<'a>) {
        self.push_declaration(decl.id.name.to_string(), SymbolKind::Interface, decl.span, self.pending_export);
    }

    fn visit_ts_type_alias_declaration(&mut self, decl: &TSTypeAliasDeclaration<'a>) {
        self.push_declaration(decl.id.name.to_string(), SymbolKind::Type, decl.span, self.pending_export);
    }

    fn visit_ts_enum_declaration(&mut self, decl: &TSEnumDeclaration<'a>) {
        let name = decl.id.name.to_string();
        self.push_declaration(name.clone(), SymbolKind::Enum, decl.span, self.pending_export);
        for member in &decl.body.members {
            let member_name = match &member.id {
                TSEnumMemberName::Identifier(id) => id.name.to_string(),
                TSEnumMemberName::String(s) => s.value.to_string(),
                _ => continue,
            };
            self.push_declaration_full(member_name, SymbolKind::EnumMember, member.span, false, Some(name.clone()), Vec::new(), Vec::new());
        }
    }

    fn visit_variable_declarator(&mut self, declarator: &VariableDeclarator<'a>) {
        if self.current_function.is_some() || self.current_class.is_some() {
            oxc_ast_visit::walk::walk_variable_declarator(self, declarator);
            return;
        }

        let mut names = Vec::new();
        self.bound_names(&declarator.id, &mut names);
        if names.is_empty() {
            oxc_ast_visit::walk::walk_variable_declarator(self, declarator);
            return;
        }

        let exported = self.pending_export;
        let function_like = declarator.init.as_ref().map(Self::is_function_like).unwrap_or(false);

        // A single identifier bound to a function/arrow initializer is tracked
        // as a `Function`-shaped node (§4.5: "arrow in an initializer" has an
        // implementation body); destructured or non-callable bindings are
        // plain `Variable` nodes with no parameter list.
        if names.len() == 1 && function_like {
            let (name, span) = names.into_iter().next().unwrap();
            let params = declarator.init.as_ref().and_then(Self::params_of).map(|p| self.collect_parameters(p)).unwrap_or_default();
            self.push_declaration_full(name.clone(), SymbolKind::Function, span, exported, None, Vec::new(), params);
            let key: DeclKey = (None, name);
            let previous = self.current_function.replace(key.clone());
            oxc_ast_visit::walk::walk_variable_declarator(self, declarator);
            self.current_function = previous;
            self.finish_parameter_usage(&key);
            return;
        }

        for (name, span) in &names {
            self.push_declaration(name.clone(), SymbolKind::Variable, *span, exported);
        }
        // Track the first binding while walking the initializer so identifiers
        // referenced there (e.g. `const a = compute();`) attribute correctly;
        // destructured multi-bindings share the initializer's identifier set.
        let key: DeclKey = (None, names[0].0.clone());
        let previous = self.current_function.replace(key.clone());
        oxc_ast_visit::walk::walk_variable_declarator(self, declarator);
        self.current_function = previous;
    }

    fn visit_jsx_opening_element(&mut self, elem: &JSXOpeningElement<'a>) {
        let tag = match &elem.name {
            JSXElementName::Identifier(id) => Some((id.name.to_string(), id.span)),
            JSXElementName::IdentifierReference(id) => Some((id.name.to_string(), id.span)),
            _ => None,
        };
        if let (Some((name, span)), Some(key)) = (tag, self.current_function.clone()) {
            if let Some(decl) = self.find_declaration_mut(&key) {
                decl.referenced_identifiers.push(IdentifierRef {
                    name,
                    line: line_of(self.source, span),
                    column: 1,
                    in_jsx_tag_position: true,
                });
            }
        }
        oxc_ast_visit::walk::walk_jsx_opening_element(self, elem);
    }

    fn visit_identifier_reference(&mut self, ident: &IdentifierReference<'a>) {
        if let Some(key) = self.current_function.clone() {
            if let Some(decl) = self.find_declaration_mut(&key) {
                decl.referenced_identifiers.push(IdentifierRef {
                    name: ident.name.to_string(),
                    line: line_of(self.source, ident.span),
                    column: 1,
                    in_jsx_tag_position: false,
                });
            }
        }
    }

    /// `this.<name>` reads/writes never reach `visit_identifier_reference`
    /// (the property is an `IdentifierName`, not a binding reference), but
    /// `assign_only_property` needs them to tell a read-through-`this` apart
    /// from a write-only property. Recorded the same way as any other
    /// reference so the detector's existing name lookup picks it up.
    fn visit_static_member_expression(&mut self, expr: &StaticMemberExpression<'a>) {
        if matches!(expr.object, Expression::ThisExpression(_)) {
            if let Some(key) = self.current_function.clone() {
                if let Some(decl) = self.find_declaration_mut(&key) {
                    decl.referenced_identifiers.push(IdentifierRef {
                        name: expr.property.name.to_string(),
                        line: line_of(self.source, expr.property.span),
                        column: 1,
                        in_jsx_tag_position: false,
                    });
                }
            }
        }
        oxc_ast_visit::walk::walk_static_member_expression(self, expr);
    }
}

/// Project-wide OXC-backed facade. Parses the project once at construction and
/// answers every trait method from that snapshot, matching §3.8 ("all
/// structures are constructed per invocation and discarded").
pub struct OxcFacade {
    root: PathBuf,
    files: Vec<PathBuf>,
    parsed: HashMap<PathBuf, ParsedFile>,
}

impl OxcFacade {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let files = list_project_files(&root);
        let mut parsed = HashMap::new();
        for file in &files {
            if let Some(p) = parse_file(file) {
                parsed.insert(file.clone(), p);
            }
        }
        Self { root, files, parsed }
    }
}

impl super::CompilerFacade for OxcFacade {
    fn list_source_files(&self) -> Vec<PathBuf> {
        self.files.clone()
    }

    fn imports_of(&self, file: &Path) -> Vec<ImportDecl> {
        self.parsed.get(file).map(|p| p.imports.clone()).unwrap_or_default()
    }

    fn exports_of(&self, file: &Path) -> Vec<ExportDecl> {
        self.parsed.get(file).map(|p| p.exports.clone()).unwrap_or_default()
    }

    fn declarations_of(&self, file: &Path) -> Vec<DeclarationSite> {
        self.parsed.get(file).map(|p| p.declarations.clone()).unwrap_or_default()
    }

    fn find_references(&self, file: &Path, qualified_name: &str) -> Option<Vec<ReferenceSite>> {
        let declaration = self
            .parsed
            .get(file)?
            .declarations
            .iter()
            .find(|d| d.qualified_name == qualified_name)?;

        let mut sites = vec![ReferenceSite {
            file: file.to_path_buf(),
            line: declaration.line,
            column: declaration.column,
            is_definition: true,
            containing_declaration: None,
        }];

        for (other_file, other) in &self.parsed {
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
        let resolver = crate::resolver::LayeredResolver::new(
            SOURCE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        );
        crate::resolver::ModuleResolver::resolve(&resolver, specifier, containing_file)
            .filter(|p| p.starts_with(&self.root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::CompilerFacade;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn parses_imports_and_exports_of_a_small_project() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("util.ts"), "export function helper() { return 1; }\n").unwrap();
        fs::write(
            tmp.path().join("index.ts"),
            "import { helper } from './util';\nexport function main() { return helper(); }\n",
        )
        .unwrap();

        let facade = OxcFacade::new(tmp.path());
        let index = tmp.path().join("index.ts");
        let imports = facade.imports_of(&index);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].specifier, "./util");

        let util = tmp.path().join("util.ts");
        let decls = facade.declarations_of(&util);
        assert!(decls.iter().any(|d| d.qualified_name == "helper"));
        let helper = decls.iter().find(|d| d.qualified_name == "helper").unwrap();
        assert!(helper.exported, "top-level `export function` should set exported");
    }

    #[test]
    fn class_methods_and_properties_become_nodes_with_parent_link() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("widget.ts"),
            "export class Widget {\n  count = 0;\n  @Input()\n  render() { return this.count; }\n}\n",
        )
        .unwrap();

        let facade = OxcFacade::new(tmp.path());
        let file = tmp.path().join("widget.ts");
        let decls = facade.declarations_of(&file);

        let class = decls.iter().find(|d| d.qualified_name == "Widget").unwrap();
        assert!(class.exported);

        let render = decls.iter().find(|d| d.qualified_name == "render").unwrap();
        assert_eq!(render.parent.as_deref(), Some("Widget"));
        assert_eq!(render.decorators, vec!["Input".to_string()]);

        let count = decls.iter().find(|d| d.qualified_name == "count").unwrap();
        assert_eq!(count.parent.as_deref(), Some("Widget"));
        assert_eq!(count.kind, SymbolKind::Property);
    }

    #[test]
    fn enum_members_are_nested_declarations() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("colors.ts"), "export enum Color {\n  Red,\n  Blue,\n}\n").unwrap();

        let facade = OxcFacade::new(tmp.path());
        let file = tmp.path().join("colors.ts");
        let decls = facade.declarations_of(&file);

        let red = decls.iter().find(|d| d.qualified_name == "Red").unwrap();
        assert_eq!(red.parent.as_deref(), Some("Color"));
        assert_eq!(red.kind, SymbolKind::EnumMember);
    }

    #[test]
    fn jsx_tag_identifier_is_marked_in_tag_position() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("home.tsx"),
            "import { Hero } from './hero';\nexport function Home() { return <Hero/>; }\n",
        )
        .unwrap();

        let facade = OxcFacade::new(tmp.path());
        let file = tmp.path().join("home.tsx");
        let decls = facade.declarations_of(&file);
        let home = decls.iter().find(|d| d.qualified_name == "Home").unwrap();
        assert!(home.referenced_identifiers.iter().any(|r| r.name == "Hero" && r.in_jsx_tag_position));
    }

    #[test]
    fn default_export_function_is_keyed_as_default() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("main.ts"), "export default function run() { return 1; }\n").unwrap();

        let facade = OxcFacade::new(tmp.path());
        let file = tmp.path().join("main.ts");
        let decls = facade.declarations_of(&file);
        assert!(decls.iter().any(|d| d.qualified_name == "default" && d.exported));
    }

    #[test]
    fn top_level_const_arrow_is_a_function_shaped_node() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("handler.ts"),
            "import { helper } from './util';\nexport const handle = (req) => helper(req);\n",
        )
        .unwrap();

        let facade = OxcFacade::new(tmp.path());
        let file = tmp.path().join("handler.ts");
        let decls = facade.declarations_of(&file);
        let handle = decls.iter().find(|d| d.qualified_name == "handle").unwrap();
        assert_eq!(handle.kind, SymbolKind::Function);
        assert!(handle.exported);
        assert!(handle.referenced_identifiers.iter().any(|r| r.name == "helper"));
    }

    #[test]
    fn this_property_read_is_recorded_as_a_reference() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("widget.ts"),
            "export class Widget {\n  count = 0;\n  show() { return this.count; }\n}\n",
        )
        .unwrap();

        let facade = OxcFacade::new(tmp.path());
        let file = tmp.path().join("widget.ts");
        let decls = facade.declarations_of(&file);
        let show = decls.iter().find(|d| d.qualified_name == "show" && d.parent.as_deref() == Some("Widget")).unwrap();
        assert!(show.referenced_identifiers.iter().any(|r| r.name == "count"));
    }
}
