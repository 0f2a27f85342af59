//! Symbol Graph Builder (C5, §4.5).
//!
//! Builds nodes, then edges, over the reachable file set. Grounded on the
//! oxc-based `Visit`-accumulator idiom already used for the facade itself
//! (`facade/oxc.rs`) and on `oxc_semantic::SemanticBuilder`'s reference
//! resolution, which stands in for the spec's "find references" facade
//! primitive — here consumed rather than reimplemented, through the
//! `CompilerFacade` trait.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::facade::{CompilerFacade, DeclarationSite};
use crate::graph::SymbolGraph;
use crate::resolver::ModuleResolver;
use crate::types::{EdgeKind, SymbolId};

/// The `(file, qualified_name)` id a declaration site occupies in the graph:
/// `Parent.Child` when the site names a parent, a bare name otherwise.
pub(crate) fn declaration_id(file: &Path, decl: &DeclarationSite) -> SymbolId {
    match &decl.parent {
        Some(parent) => SymbolId::new(file.to_path_buf(), parent.clone()).child(&decl.qualified_name),
        None => SymbolId::new(file.to_path_buf(), decl.qualified_name.clone()),
    }
}

/// Step 1: enumerate every declaration in every file as a node (§4.5 "Nodes").
fn build_nodes(facade: &dyn CompilerFacade, files: &HashSet<PathBuf>, graph: &mut SymbolGraph) {
    for file in files {
        graph.ensure_module_root(file);
        for decl in facade.declarations_of(file) {
            let id = declaration_id(file, &decl);
            let node = graph.upsert_node(id.clone(), decl.kind, decl.line, decl.column);
            node.exported = decl.exported;
            if let Some(parent) = &decl.parent {
                node.parent = Some(SymbolId::new(file.to_path_buf(), parent.clone()));
            }
        }
    }
}

/// Resolve a bare identifier to a local declaration in `file`, if one exists
/// with that bare qualified name (top-level functions/classes/etc. — methods
/// are addressed as `Parent.Child` and aren't reachable by a bare identifier
/// walk).
fn local_declaration(facade: &dyn CompilerFacade, file: &Path, name: &str) -> Option<SymbolId> {
    facade
        .declarations_of(file)
        .iter()
        .find(|d| d.parent.is_none() && d.qualified_name == name)
        .map(|_| SymbolId::new(file.to_path_buf(), name.to_string()))
}

/// Resolve a bare identifier through `file`'s import declarations: follow one
/// hop through re-export indirection to the origin module (§4.5 "follow one
/// hop through re-export indirection").
fn import_declaration(
    facade: &dyn CompilerFacade,
    resolver: &dyn ModuleResolver,
    file: &Path,
    name: &str,
) -> Option<SymbolId> {
    for import in facade.imports_of(file) {
        let exported_name = if import.default.as_deref() == Some(name) {
            "default".to_string()
        } else if let Some(named) = import.named.iter().find(|n| n.local == name) {
            named.imported.clone()
        } else {
            continue;
        };
        let Some(origin) = resolver.resolve(&import.specifier, file) else { continue };
        return Some(SymbolId::new(origin, exported_name));
    }
    None
}

/// Infer the edge kind for a reference. The default, absent a more specific
/// signal the facade doesn't expose at this layer, is `Call` (§4.5
/// "Edge-type inference").
fn infer_edge_kind(decl_kind: crate::types::SymbolKind) -> EdgeKind {
    use crate::types::SymbolKind::*;
    match decl_kind {
        Interface | Type => EdgeKind::TypeReference,
        _ => EdgeKind::Call,
    }
}

/// Step 2: walk every declaration's referenced identifiers and add an edge
/// from the declaration to whatever it references, locally or through one
/// import hop (§4.5 "Outgoing edges"). JSX tag positions are left to the
/// dedicated `JsxReferenceBuilder` mutator (§4.6 Phase 2).
fn build_outgoing_edges(
    facade: &dyn CompilerFacade,
    resolver: &dyn ModuleResolver,
    files: &HashSet<PathBuf>,
    graph: &mut SymbolGraph,
) {
    for file in files {
        for decl in facade.declarations_of(file) {
            let from_id = declaration_id(file, &decl);
            let kind = infer_edge_kind(decl.kind);

            for ident in &decl.referenced_identifiers {
                if ident.in_jsx_tag_position {
                    continue;
                }
                let target = local_declaration(facade, file, &ident.name)
                    .or_else(|| import_declaration(facade, resolver, file, &ident.name));
                let Some(target) = target else { continue };
                graph.add_edge(from_id.clone(), target, kind, file.clone(), ident.line, ident.column);
            }
        }
    }
}

/// Step 3: supplement with incoming edges from `find_references`, for the
/// (comparatively rare) reference sites a local body-walk can't reconstruct
/// — e.g. a reference inside a module's top-level scope rather than any
/// declaration. Falls back to the reference's containing file's `<module>`
/// node when no containing declaration is named (§4.5 "Incoming edges").
fn build_incoming_edges(
    facade: &dyn CompilerFacade,
    files: &HashSet<PathBuf>,
    graph: &mut SymbolGraph,
) {
    for file in files {
        for decl in facade.declarations_of(file) {
            if decl.parent.is_some() {
                continue;
            }
            let to_id = SymbolId::new(file.to_path_buf(), decl.qualified_name.clone());
            let Some(references) = facade.find_references(file, &decl.qualified_name) else { continue };

            for reference in references {
                if reference.is_definition {
                    continue;
                }
                let from_id = match &reference.containing_declaration {
                    Some(name) => SymbolId::new(reference.file.clone(), name.clone()),
                    None => graph.ensure_module_root(&reference.file),
                };
                graph.add_edge(from_id, to_id.clone(), EdgeKind::Call, reference.file.clone(), reference.line, reference.column);
            }
        }
    }
}

/// Build the full symbol graph for the given file set (§4.5).
pub fn build_graph(
    facade: &dyn CompilerFacade,
    resolver: &dyn ModuleResolver,
    files: &HashSet<PathBuf>,
) -> SymbolGraph {
    let mut graph = SymbolGraph::new();
    build_nodes(facade, files, &mut graph);
    build_outgoing_edges(facade, resolver, files, &mut graph);
    build_incoming_edges(facade, files, &mut graph);
    graph
}
