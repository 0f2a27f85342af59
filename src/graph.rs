//! Symbol Graph Builder (C5, §4.5).
//!
//! Builds nodes then edges. The compiler facade supplies identifier resolution
//! and reference enumeration; this module owns the graph data structure, node
//! creation, and edge insertion, and enforces the correctness rules from §4.5:
//! no self-edges, no duplicate edges, lazy creation of missing endpoints.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::types::{Edge, EdgeKind, Symbol, SymbolId, SymbolKind};

/// The symbol graph: every declaration site is a node; edges are set-semantics
/// (§3.3), so a duplicate insertion for the same ordered pair is a no-op.
#[derive(Debug, Default)]
pub struct SymbolGraph {
    nodes: HashMap<SymbolId, Symbol>,
    /// Adjacency by `from`, holding `(to, edge index)` for iteration; the edge
    /// payloads live in `edges` keyed by the ordered pair for set semantics.
    outgoing: HashMap<SymbolId, Vec<SymbolId>>,
    edges: HashMap<(SymbolId, SymbolId), Edge>,
}

impl SymbolGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node if absent; return a mutable reference either way.
    pub fn upsert_node(&mut self, id: SymbolId, kind: SymbolKind, line: usize, column: usize) -> &mut Symbol {
        self.nodes.entry(id.clone()).or_insert_with(|| Symbol::new(id, kind, line, column))
    }

    /// Lazily create the synthetic `<module>` node for `file` if it doesn't exist.
    pub fn ensure_module_root(&mut self, file: &Path) -> SymbolId {
        let id = SymbolId::module_root(file.to_path_buf());
        self.nodes
            .entry(id.clone())
            .or_insert_with(|| Symbol::new(id.clone(), SymbolKind::Module, 0, 0));
        id
    }

    pub fn node(&self, id: &SymbolId) -> Option<&Symbol> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &SymbolId) -> Option<&mut Symbol> {
        self.nodes.get_mut(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Symbol> {
        self.nodes.values()
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Symbol> {
        self.nodes.values_mut()
    }

    /// Add an edge `from -> to`. Self-edges are dropped. Duplicate ordered
    /// pairs are dropped (last-write on `kind`/location is not observed since
    /// the first insertion wins, matching "at most one edge per ordered pair").
    /// Missing endpoints are created on demand with inferred, minimal attributes
    /// (§7 "graph inconsistency... non-fatal").
    pub fn add_edge(&mut self, from: SymbolId, to: SymbolId, kind: EdgeKind, file: PathBuf, line: usize, column: usize) {
        if from == to {
            return;
        }
        if self.edges.contains_key(&(from.clone(), to.clone())) {
            return;
        }
        if !self.nodes.contains_key(&from) {
            self.upsert_node(from.clone(), SymbolKind::Module, line, column);
        }
        if !self.nodes.contains_key(&to) {
            self.upsert_node(to.clone(), SymbolKind::Variable, 0, 0);
        }
        self.outgoing.entry(from.clone()).or_default().push(to.clone());
        self.edges.insert(
            (from.clone(), to.clone()),
            Edge { from, to, kind, file, line, column },
        );
    }

    pub fn outgoing(&self, from: &SymbolId) -> impl Iterator<Item = &SymbolId> {
        self.outgoing.get(from).into_iter().flatten()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every edge endpoint exists as a node (invariant 1, §8.1). Used by tests
    /// and by the engine's self-check after building.
    pub fn is_sound(&self) -> bool {
        self.edges
            .keys()
            .all(|(from, to)| self.nodes.contains_key(from) && self.nodes.contains_key(to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(file: &str, name: &str) -> SymbolId {
        SymbolId::new(file, name)
    }

    #[test]
    fn self_edges_are_dropped() {
        let mut graph = SymbolGraph::new();
        let a = sym("a.ts", "foo");
        graph.upsert_node(a.clone(), SymbolKind::Function, 1, 1);
        graph.add_edge(a.clone(), a.clone(), EdgeKind::Call, PathBuf::from("a.ts"), 1, 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn duplicate_ordered_pairs_collapse_to_one_edge() {
        let mut graph = SymbolGraph::new();
        let a = sym("a.ts", "foo");
        let b = sym("a.ts", "bar");
        graph.add_edge(a.clone(), b.clone(), EdgeKind::Call, PathBuf::from("a.ts"), 1, 1);
        graph.add_edge(a.clone(), b.clone(), EdgeKind::Call, PathBuf::from("a.ts"), 2, 1);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn missing_endpoints_are_created_lazily() {
        let mut graph = SymbolGraph::new();
        let a = sym("a.ts", "foo");
        let b = sym("b.ts", "bar");
        graph.add_edge(a.clone(), b.clone(), EdgeKind::Call, PathBuf::from("a.ts"), 1, 1);
        assert!(graph.node(&a).is_some());
        assert!(graph.node(&b).is_some());
        assert!(graph.is_sound());
    }

    #[test]
    fn module_root_is_created_once() {
        let mut graph = SymbolGraph::new();
        let first = graph.ensure_module_root(Path::new("a.ts"));
        let second = graph.ensure_module_root(Path::new("a.ts"));
        assert_eq!(first, second);
        assert_eq!(graph.node_count(), 1);
    }
}
