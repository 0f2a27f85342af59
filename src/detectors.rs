//! Detector Suite (C9, §4.9).
//!
//! Each detector is a pure function from the built engine context to a `Vec<Issue>`,
//! grounded on the accumulate-candidates / skip-list / push-with-reason shape of
//! `find_dead_exports` in the teacher's dead parrots module.

use std::collections::HashSet;
use std::path::Path;

use crate::engine::EngineContext;
use crate::types::{Confidence, Issue, IssueKind, Symbol, SymbolKind};

/// Life-cycle method names excluded from `UnusedMethod` regardless of call
/// sites (§4.9 "excludes known life-cycle names").
const LIFECYCLE_METHOD_NAMES: &[&str] = &[
    "constructor", "render", "componentDidMount", "componentDidUpdate", "componentWillUnmount",
    "ngOnInit", "ngOnDestroy", "connectedCallback", "disconnectedCallback",
];

fn relative<'a>(root: &Path, file: &'a Path) -> &'a Path {
    file.strip_prefix(root).unwrap_or(file)
}

fn issue(
    kind: IssueKind,
    confidence: Confidence,
    name: impl Into<String>,
    symbol_kind: Option<SymbolKind>,
    file: impl Into<std::path::PathBuf>,
    line: usize,
    column: usize,
    message: impl Into<String>,
    parent: Option<String>,
) -> Issue {
    Issue {
        kind,
        confidence,
        name: name.into(),
        symbol_kind,
        file: file.into(),
        line,
        column,
        message: message.into(),
        parent,
        context: None,
    }
}

/// *UnusedFile* — a candidate file that is neither reachable nor itself an entry.
pub fn unused_file(ctx: &EngineContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut files: Vec<_> = ctx.candidates.difference(&ctx.reachable).collect();
    files.sort();
    for file in files.drain(..) {
        if ctx.entries.contains(file) {
            continue;
        }
        issues.push(issue(
            IssueKind::UnusedFile,
            Confidence::High,
            relative(&ctx.root, file).to_string_lossy(),
            None,
            file.clone(),
            1,
            1,
            format!("'{}' is never reached from an entry point", relative(&ctx.root, file).display()),
            None,
        ));
    }
    issues
}

fn is_exported_symbol(symbol: &Symbol) -> bool {
    symbol.exported && !symbol.id.is_module_root()
}

/// *UnusedExport* (call-graph mode) — an exported node with `is_used == false`
/// after C6, restricted to files actually in the reachable set (a symbol in an
/// unreachable file is already covered by `UnusedFile`).
pub fn unused_export(ctx: &EngineContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut nodes: Vec<&Symbol> = ctx
        .graph
        .nodes()
        .filter(|n| is_exported_symbol(n) && !n.is_used && ctx.reachable.contains(&n.id.file))
        .collect();
    nodes.sort_by(|a, b| (&a.id.file, a.line, &a.id.qualified_name).cmp(&(&b.id.file, b.line, &b.id.qualified_name)));

    for node in nodes {
        issues.push(issue(
            IssueKind::UnusedExport,
            Confidence::Medium,
            &node.id.qualified_name,
            Some(node.kind),
            node.id.file.clone(),
            node.line,
            node.column,
            format!("'{}' is exported but never referenced", node.id.qualified_name),
            node.parent.as_ref().map(|p| p.qualified_name.clone()),
        ));
    }
    issues
}

/// *UnusedExported* / *UnusedExportedType* — from C7's provenance/usage tables.
/// A name counts as unused when its file's provenance lists it but neither the
/// usage table nor `skip_reporting` clears it.
pub fn unused_exported(ctx: &EngineContext) -> Vec<Issue> {
    let Some(analysis) = &ctx.export_analysis else { return Vec::new() };
    let mut issues = Vec::new();

    let mut files: Vec<_> = analysis.provenance.keys().collect();
    files.sort();

    for file in files {
        let prov = &analysis.provenance[file];
        if prov.skip_reporting {
            continue;
        }
        let empty = Default::default();
        let usage = analysis.usage.get(file).unwrap_or(&empty);
        if usage.uses_all {
            continue;
        }

        let mut value_names: Vec<&String> = prov.value_exports.iter().collect();
        value_names.sort();
        for name in value_names {
            if usage.used_values.contains(name) {
                continue;
            }
            issues.push(issue(
                IssueKind::UnusedExported,
                Confidence::Medium,
                name.clone(),
                None,
                file.clone(),
                1,
                1,
                format!("'{}' is exported from this module but never imported elsewhere", name),
                None,
            ));
        }

        let mut type_names: Vec<&String> = prov.type_exports.iter().collect();
        type_names.sort();
        for name in type_names {
            if usage.used_types.contains(name) {
                continue;
            }
            issues.push(issue(
                IssueKind::UnusedExportedType,
                Confidence::Medium,
                name.clone(),
                None,
                file.clone(),
                1,
                1,
                format!("type '{}' is exported from this module but never imported elsewhere", name),
                None,
            ));
        }
    }
    issues
}

/// *UnusedType* — an exported interface or type alias whose `find_references`
/// over the whole project returns no non-definition reference.
pub fn unused_type(ctx: &EngineContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut nodes: Vec<&Symbol> = ctx
        .graph
        .nodes()
        .filter(|n| matches!(n.kind, SymbolKind::Interface | SymbolKind::Type) && is_exported_symbol(n))
        .collect();
    nodes.sort_by(|a, b| (&a.id.file, a.line).cmp(&(&b.id.file, b.line)));

    for node in nodes {
        let references = ctx.facade.find_references(&node.id.file, &node.id.qualified_name);
        let has_external_use = match references {
            Some(sites) => sites.iter().any(|r| !r.is_definition),
            None => {
                crate::error::debug(format!(
                    "find_references unavailable for {}, skipping UnusedType",
                    node.id.as_key()
                ));
                continue;
            }
        };
        if has_external_use {
            continue;
        }
        issues.push(issue(
            IssueKind::UnusedType,
            Confidence::High,
            &node.id.qualified_name,
            Some(node.kind),
            node.id.file.clone(),
            node.line,
            node.column,
            format!("type '{}' has no references", node.id.qualified_name),
            None,
        ));
    }
    issues
}

/// Interface method names declared anywhere in the project: a crude
/// whole-project signature index (§4.9 "methods required by an implemented
/// interface... skipped"). The facade doesn't expose interface membership
/// directly, so this treats any interface's own declared members (nested
/// `Parent.Child` declarations) as potential interface requirements.
fn interface_required_names(ctx: &EngineContext) -> HashSet<String> {
    let mut names = HashSet::new();
    for file in ctx.facade.list_source_files() {
        for decl in ctx.facade.declarations_of(&file) {
            let Some(parent) = &decl.parent else { continue };
            let is_interface_member = ctx
                .facade
                .declarations_of(&file)
                .iter()
                .any(|d| &d.qualified_name == parent && d.kind == SymbolKind::Interface);
            if is_interface_member {
                names.insert(decl.qualified_name.clone());
            }
        }
    }
    names
}

/// *UnusedMethod* — a class method with zero external call sites; excludes
/// known life-cycle names, override declarations (`parent.exported` classes
/// implementing a base the facade can't see are out of scope), and methods
/// required by an implemented interface.
pub fn unused_method(ctx: &EngineContext) -> Vec<Issue> {
    let required = interface_required_names(ctx);
    let mut issues = Vec::new();

    let mut nodes: Vec<&Symbol> = ctx
        .graph
        .nodes()
        .filter(|n| n.kind == SymbolKind::Method && !n.is_used)
        .collect();
    nodes.sort_by(|a, b| (&a.id.file, a.line).cmp(&(&b.id.file, b.line)));

    for node in nodes {
        let bare_name = node.id.qualified_name.rsplit('.').next().unwrap_or(&node.id.qualified_name);
        if LIFECYCLE_METHOD_NAMES.contains(&bare_name) {
            continue;
        }
        if required.contains(bare_name) {
            continue;
        }
        issues.push(issue(
            IssueKind::UnusedMethod,
            Confidence::Medium,
            &node.id.qualified_name,
            Some(SymbolKind::Method),
            node.id.file.clone(),
            node.line,
            node.column,
            format!("method '{}' has no call sites", node.id.qualified_name),
            node.parent.as_ref().map(|p| p.qualified_name.clone()),
        ));
    }
    issues
}

/// *UnusedParameter* — a parameter whose name is never read inside the body.
/// Destructured and rest parameters are skipped at the facade layer
/// (`ParameterSite::is_rest_or_destructured`); a function that is itself
/// unreferenced is left to `UnusedExport`/`UnusedMethod` instead.
pub fn unused_parameter(ctx: &EngineContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    for file in &ctx.reachable {
        let mut decls = ctx.facade.declarations_of(file);
        decls.sort_by(|a, b| a.line.cmp(&b.line));
        for decl in decls {
            for param in &decl.parameters {
                if param.is_rest_or_destructured || param.is_used || param.name.is_empty() {
                    continue;
                }
                issues.push(issue(
                    IssueKind::UnusedParam,
                    Confidence::Medium,
                    &param.name,
                    None,
                    file.clone(),
                    param.line,
                    param.column,
                    format!("parameter '{}' of '{}' is never read", param.name, decl.qualified_name),
                    decl.parent.clone().or_else(|| Some(decl.qualified_name.clone())),
                ));
            }
        }
    }
    issues
}

/// *UnusedImport* — an import specifier whose imported binding has no
/// non-import, non-export-forwarding use in the file; type-only imports are
/// excluded (type bindings are covered by `UnusedExportedType`/`UnusedType`).
pub fn unused_import(ctx: &EngineContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut files: Vec<_> = ctx.reachable.iter().collect();
    files.sort();

    for file in files {
        let declarations = ctx.facade.declarations_of(file);
        let exports = ctx.facade.exports_of(file);
        let referenced: HashSet<&str> = declarations
            .iter()
            .flat_map(|d| d.referenced_identifiers.iter().map(|r| r.name.as_str()))
            .collect();
        let forwarded: HashSet<&str> = exports.iter().map(|e| e.name.as_str()).collect();

        for import in ctx.facade.imports_of(file) {
            if import.type_only {
                continue;
            }
            let mut bindings: Vec<(String, bool)> = Vec::new();
            if let Some(default) = &import.default {
                bindings.push((default.clone(), false));
            }
            if let Some(namespace) = &import.namespace {
                bindings.push((namespace.clone(), false));
            }
            for named in &import.named {
                bindings.push((named.local.clone(), named.type_only));
            }

            for (local, type_only) in bindings {
                if type_only {
                    continue;
                }
                if referenced.contains(local.as_str()) || forwarded.contains(local.as_str()) {
                    continue;
                }
                issues.push(issue(
                    IssueKind::UnusedImport,
                    Confidence::High,
                    &local,
                    None,
                    file.clone(),
                    import.line,
                    1,
                    format!("'{}' is imported from '{}' but never used", local, import.specifier),
                    None,
                ));
            }
        }
    }
    issues
}

/// *UnusedEnumCase* — an enum member with zero external references; other
/// members of the same declaration are not external, so the facade's
/// `find_references` on the member's bare name (declarations are stored bare,
/// like `unused_method`'s `bare_name` handling) is sufficient without a
/// same-enum exclusion pass. A `None` result means the facade couldn't
/// answer, so the member is skipped rather than flagged (§7 "facade
/// failure... skips that node; no silent crash").
pub fn unused_enum_case(ctx: &EngineContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut nodes: Vec<&Symbol> = ctx.graph.nodes().filter(|n| n.kind == SymbolKind::EnumMember).collect();
    nodes.sort_by(|a, b| (&a.id.file, a.line).cmp(&(&b.id.file, b.line)));

    for node in nodes {
        let bare_name = node.id.qualified_name.rsplit('.').next().unwrap_or(&node.id.qualified_name);
        let references = ctx.facade.find_references(&node.id.file, bare_name);
        let has_external_use = match references {
            Some(sites) => sites.iter().any(|r| !r.is_definition),
            None => {
                crate::error::debug(format!(
                    "find_references unavailable for {}, skipping UnusedEnumCase",
                    node.id.as_key()
                ));
                continue;
            }
        };
        if has_external_use || node.is_used {
            continue;
        }
        issues.push(issue(
            IssueKind::UnusedEnumCase,
            Confidence::Medium,
            &node.id.qualified_name,
            Some(SymbolKind::EnumMember),
            node.id.file.clone(),
            node.line,
            node.column,
            format!("enum case '{}' has no references", node.id.qualified_name),
            node.parent.as_ref().map(|p| p.qualified_name.clone()),
        ));
    }
    issues
}

/// *AssignOnlyProperty* — an instance property that is written but never
/// read. Reads/writes are derived from `this.<name>` walks the facade already
/// surfaces as identifier references on the owning class's declaration sites;
/// a property is "read" the moment any sibling method's `referenced_identifiers`
/// names it outside of the property's own declaration.
pub fn assign_only_property(ctx: &EngineContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    for file in &ctx.reachable {
        let declarations = ctx.facade.declarations_of(file);
        for decl in &declarations {
            if decl.kind != SymbolKind::Property {
                continue;
            }
            let Some(parent) = &decl.parent else { continue };
            let read_elsewhere = declarations.iter().any(|other| {
                other.parent.as_deref() == Some(parent.as_str())
                    && other.qualified_name != decl.qualified_name
                    && other.referenced_identifiers.iter().any(|r| r.name == decl.qualified_name)
            });
            if read_elsewhere {
                continue;
            }
            issues.push(issue(
                IssueKind::AssignOnlyProperty,
                Confidence::Low,
                &decl.qualified_name,
                Some(SymbolKind::Property),
                file.clone(),
                decl.line,
                decl.column,
                format!("'{}' is assigned but never read", decl.qualified_name),
                Some(parent.clone()),
            ));
        }
    }
    issues
}

/// *RedundantExport* — an exported symbol referenced only inside the same
/// file (*make-private*) or only inside the same package (*make-internal*).
/// Package boundary is the nearest ancestor directory containing a manifest;
/// this crate's project has exactly one manifest at the root, so "same
/// package" degenerates to "anywhere under `ctx.root`" when a single-manifest
/// project is all the facade can see.
pub fn redundant_export(ctx: &EngineContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut nodes: Vec<&Symbol> = ctx.graph.nodes().filter(|n| is_exported_symbol(n) && n.is_used).collect();
    nodes.sort_by(|a, b| (&a.id.file, a.line).cmp(&(&b.id.file, b.line)));

    for node in nodes {
        let Some(sites) = ctx.facade.find_references(&node.id.file, &node.id.qualified_name) else { continue };
        let external_sites: Vec<_> = sites.iter().filter(|r| !r.is_definition).collect();
        if external_sites.is_empty() {
            continue;
        }
        let only_same_file = external_sites.iter().all(|r| r.file == node.id.file);
        if only_same_file {
            issues.push(issue(
                IssueKind::RedundantExport,
                Confidence::Low,
                &node.id.qualified_name,
                Some(node.kind),
                node.id.file.clone(),
                node.line,
                node.column,
                format!("'{}' is only used in this file; consider make-private", node.id.qualified_name),
                node.parent.as_ref().map(|p| p.qualified_name.clone()),
            ));
            continue;
        }
        let only_same_package = external_sites.iter().all(|r| r.file.starts_with(&ctx.root));
        if only_same_package && ctx.manifest.is_some() {
            issues.push(issue(
                IssueKind::RedundantExport,
                Confidence::Low,
                &node.id.qualified_name,
                Some(node.kind),
                node.id.file.clone(),
                node.line,
                node.column,
                format!("'{}' is only used inside this package; consider make-internal", node.id.qualified_name),
                node.parent.as_ref().map(|p| p.qualified_name.clone()),
            ));
        }
    }
    issues
}

/// *UnusedVariable* — a top-level (module-scope) variable declaration that is
/// never read anywhere, including its own file. Function/class/type bindings
/// are covered by their own detectors; this only covers `SymbolKind::Variable`.
pub fn unused_variable(ctx: &EngineContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut nodes: Vec<&Symbol> = ctx
        .graph
        .nodes()
        .filter(|n| n.kind == SymbolKind::Variable && n.parent.is_none() && !n.exported)
        .collect();
    nodes.sort_by(|a, b| (&a.id.file, a.line).cmp(&(&b.id.file, b.line)));

    for node in nodes {
        let has_use = ctx
            .facade
            .find_references(&node.id.file, &node.id.qualified_name)
            .map(|sites| sites.iter().any(|r| !r.is_definition))
            .unwrap_or(false);
        if has_use {
            continue;
        }
        issues.push(issue(
            IssueKind::UnusedVariable,
            Confidence::High,
            &node.id.qualified_name,
            Some(SymbolKind::Variable),
            node.id.file.clone(),
            node.line,
            node.column,
            format!("'{}' is never read", node.id.qualified_name),
            None,
        ));
    }
    issues
}

/// Run every detector and concatenate their output (unordered; `engine::sort_issues`
/// imposes the final deterministic order).
pub fn run_all(ctx: &EngineContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    issues.extend(unused_file(ctx));
    issues.extend(unused_export(ctx));
    issues.extend(unused_exported(ctx));
    issues.extend(unused_type(ctx));
    issues.extend(unused_method(ctx));
    issues.extend(unused_parameter(ctx));
    issues.extend(unused_import(ctx));
    issues.extend(unused_enum_case(ctx));
    issues.extend(assign_only_property(ctx));
    issues.extend(redundant_export(ctx));
    issues.extend(unused_variable(ctx));
    issues.extend(ctx.dependency_issues.clone());
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::mock::{MockFacade, MockFile};
    use crate::facade::{DeclarationSite, ExportDecl, IdentifierRef, ImportDecl, ImportedName, ParameterSite};
    use crate::types::EdgeKind;
    use std::path::PathBuf;

    fn declaration(name: &str, kind: SymbolKind, exported: bool) -> DeclarationSite {
        DeclarationSite {
            qualified_name: name.to_string(),
            kind,
            line: 1,
            column: 1,
            exported,
            parent: None,
            decorators: vec![],
            referenced_identifiers: vec![],
            parameters: vec![],
        }
    }

    #[test]
    fn unused_file_skips_entries_and_reachable_files() {
        let dead = PathBuf::from("/p/src/dead.ts");
        let entry = PathBuf::from("/p/src/index.ts");
        let facade = MockFacade::new();
        let mut ctx = EngineContext::for_test(Path::new("/p"), &facade);
        ctx.candidates = [dead.clone(), entry.clone()].into_iter().collect();
        ctx.entries = [entry.clone()].into_iter().collect();
        ctx.reachable = [entry].into_iter().collect();

        let issues = unused_file(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].file, dead);
    }

    #[test]
    fn unused_export_reports_unreferenced_exported_symbol() {
        let file = PathBuf::from("/p/src/util.ts");
        let facade = MockFacade::new();
        let mut ctx = EngineContext::for_test(Path::new("/p"), &facade);
        ctx.reachable = [file.clone()].into_iter().collect();
        let id = crate::types::SymbolId::new(file.clone(), "helper");
        ctx.graph.upsert_node(id.clone(), SymbolKind::Function, 3, 1).exported = true;

        let issues = unused_export(&ctx);
        assert!(issues.iter().any(|i| i.kind == IssueKind::UnusedExport && i.name == "helper"));
    }

    #[test]
    fn unused_parameter_skips_rest_and_used_params() {
        let file = PathBuf::from("/p/src/handler.ts");
        let mut decl = declaration("handle", SymbolKind::Function, true);
        decl.parameters = vec![
            ParameterSite { name: "req".into(), line: 1, column: 1, is_rest_or_destructured: false, is_used: false },
            ParameterSite { name: "res".into(), line: 1, column: 1, is_rest_or_destructured: false, is_used: true },
            ParameterSite { name: String::new(), line: 1, column: 1, is_rest_or_destructured: true, is_used: true },
        ];
        let facade = MockFacade::new().with_file(&file, MockFile { declarations: vec![decl], ..Default::default() });
        let mut ctx = EngineContext::for_test(Path::new("/p"), &facade);
        ctx.reachable = [file.clone()].into_iter().collect();

        let issues = unused_parameter(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].name, "req");
    }

    #[test]
    fn unused_import_skips_type_only_and_forwarded_bindings() {
        let file = PathBuf::from("/p/src/index.ts");
        let facade = MockFacade::new().with_file(
            &file,
            MockFile {
                imports: vec![
                    ImportDecl {
                        specifier: "./types".into(),
                        named: vec![ImportedName { imported: "Foo".into(), local: "Foo".into(), type_only: true }],
                        default: None,
                        namespace: None,
                        type_only: false,
                        line: 1,
                    },
                    ImportDecl {
                        specifier: "./util".into(),
                        named: vec![ImportedName { imported: "helper".into(), local: "helper".into(), type_only: false }],
                        default: None,
                        namespace: None,
                        type_only: false,
                        line: 2,
                    },
                    ImportDecl {
                        specifier: "./barrel".into(),
                        named: vec![ImportedName { imported: "reexported".into(), local: "reexported".into(), type_only: false }],
                        default: None,
                        namespace: None,
                        type_only: false,
                        line: 3,
                    },
                ],
                exports: vec![ExportDecl {
                    name: "reexported".into(),
                    is_type: false,
                    line: 3,
                    reexport_from: None,
                    is_star: false,
                    star_alias: None,
                }],
                declarations: vec![],
            },
        );
        let mut ctx = EngineContext::for_test(Path::new("/p"), &facade);
        ctx.reachable = [file.clone()].into_iter().collect();

        let issues = unused_import(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].name, "helper");
    }

    #[test]
    fn assign_only_property_flags_write_without_sibling_read() {
        let file = PathBuf::from("/p/src/widget.ts");
        let prop = declaration("Widget.count", SymbolKind::Property, false);
        let mut method_reads = declaration("Widget.show", SymbolKind::Method, false);
        method_reads.parent = Some("Widget".into());
        let mut prop_with_parent = prop;
        prop_with_parent.parent = Some("Widget".into());

        let facade = MockFacade::new().with_file(
            &file,
            MockFile { declarations: vec![prop_with_parent, method_reads], ..Default::default() },
        );
        let mut ctx = EngineContext::for_test(Path::new("/p"), &facade);
        ctx.reachable = [file.clone()].into_iter().collect();

        let issues = assign_only_property(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].name, "Widget.count");
    }

    #[test]
    fn redundant_export_flags_same_file_only_usage() {
        let file = PathBuf::from("/p/src/util.ts");
        let facade = MockFacade::new();
        let mut ctx = EngineContext::for_test(Path::new("/p"), &facade);
        let id = crate::types::SymbolId::new(file.clone(), "helper");
        ctx.graph.upsert_node(id.clone(), SymbolKind::Function, 1, 1);
        ctx.graph.node_mut(&id).unwrap().exported = true;
        ctx.graph.node_mut(&id).unwrap().is_used = true;
        // find_references needs the mock facade's declaration + a same-file reference.
        let referencing = declaration("main", SymbolKind::Function, false);
        let mut referencing = referencing;
        referencing.referenced_identifiers = vec![IdentifierRef { name: "helper".into(), line: 2, column: 1, in_jsx_tag_position: false }];
        let decl = declaration("helper", SymbolKind::Function, true);
        let facade = MockFacade::new().with_file(
            &file,
            MockFile { declarations: vec![decl, referencing], ..Default::default() },
        );
        ctx.facade = &facade;

        let issues = redundant_export(&ctx);
        assert!(issues.iter().any(|i| i.kind == IssueKind::RedundantExport && i.name == "helper"));
    }

    #[test]
    fn unused_variable_reports_module_scope_binding_with_no_reads() {
        let file = PathBuf::from("/p/src/constants.ts");
        let facade = MockFacade::new();
        let mut ctx = EngineContext::for_test(Path::new("/p"), &facade);
        let id = crate::types::SymbolId::new(file.clone(), "UNUSED");
        ctx.graph.upsert_node(id, SymbolKind::Variable, 1, 1);

        let issues = unused_variable(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].name, "UNUSED");
    }

    #[test]
    fn unused_enum_case_matches_bare_declaration_name() {
        let file = PathBuf::from("/p/src/color.ts");
        let red = declaration("Red", SymbolKind::EnumMember, false);
        let mut blue = declaration("Blue", SymbolKind::EnumMember, false);
        blue.parent = Some("Color".into());
        let mut red = red;
        red.parent = Some("Color".into());
        let mut user = declaration("paint", SymbolKind::Function, false);
        user.referenced_identifiers = vec![IdentifierRef { name: "Blue".into(), line: 3, column: 1, in_jsx_tag_position: false }];

        let facade = MockFacade::new().with_file(
            &file,
            MockFile { declarations: vec![red, blue, user], ..Default::default() },
        );
        let mut ctx = EngineContext::for_test(Path::new("/p"), &facade);
        let color = crate::types::SymbolId::new(file.clone(), "Color");
        ctx.graph.upsert_node(color.clone(), SymbolKind::Enum, 1, 1);
        ctx.graph.upsert_node(color.child("Red"), SymbolKind::EnumMember, 2, 1);
        ctx.graph.upsert_node(color.child("Blue"), SymbolKind::EnumMember, 3, 1);

        let issues = unused_enum_case(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].name, "Color.Red");
    }

    #[test]
    fn unused_enum_case_skips_when_facade_cannot_answer() {
        let file = PathBuf::from("/p/src/missing.ts");
        let facade = MockFacade::new();
        let mut ctx = EngineContext::for_test(Path::new("/p"), &facade);
        let color = crate::types::SymbolId::new(file.clone(), "Color");
        ctx.graph.upsert_node(color.child("Red"), SymbolKind::EnumMember, 2, 1);

        let issues = unused_enum_case(&ctx);
        assert!(issues.is_empty());
    }

    #[test]
    fn lifecycle_method_is_excluded() {
        let file = PathBuf::from("/p/src/widget.ts");
        let facade = MockFacade::new();
        let mut ctx = EngineContext::for_test(Path::new("/p"), &facade);
        let class = crate::types::SymbolId::new(file.clone(), "Widget");
        let method = class.child("render");
        ctx.graph.upsert_node(class, SymbolKind::Class, 1, 1);
        ctx.graph.upsert_node(method, SymbolKind::Method, 2, 1);

        let issues = unused_method(&ctx);
        assert!(issues.is_empty());
    }

    #[test]
    fn edge_marked_used_is_excluded_from_unused_method() {
        let file = PathBuf::from("/p/src/widget.ts");
        let facade = MockFacade::new();
        let mut ctx = EngineContext::for_test(Path::new("/p"), &facade);
        let class = crate::types::SymbolId::new(file.clone(), "Widget");
        let method = class.child("save");
        ctx.graph.upsert_node(class.clone(), SymbolKind::Class, 1, 1);
        let node = ctx.graph.upsert_node(method.clone(), SymbolKind::Method, 2, 1);
        node.is_used = true;
        ctx.graph.add_edge(class, method, EdgeKind::Call, file, 1, 1);

        let issues = unused_method(&ctx);
        assert!(issues.is_empty());
    }
}
