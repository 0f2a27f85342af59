//! Phase 4 — *UsedDeclarationMarker* (§4.6).
//!
//! The final DFS: from each entry point, traverse outgoing edges
//! transitively; visiting a symbol also visits its `parent` (marking a
//! method implies marking its class). After the DFS, every retained symbol
//! not already reached is visited too. At completion, `is_used` is set iff
//! the symbol was visited — invariant 2 in §8.1.

use std::collections::HashSet;

use crate::types::SymbolId;

use super::{Mutator, MutatorContext, Phase};

pub struct UsedDeclarationMarker;

impl Mutator for UsedDeclarationMarker {
    fn phase(&self) -> Phase {
        Phase::Marking
    }

    fn name(&self) -> &'static str {
        "UsedDeclarationMarker"
    }

    fn run(&self, ctx: &mut MutatorContext<'_>) {
        let entry_points: Vec<SymbolId> = ctx
            .graph
            .nodes()
            .filter(|n| n.is_entry_point)
            .map(|n| n.id.clone())
            .collect();
        let retained: Vec<SymbolId> = ctx
            .graph
            .nodes()
            .filter(|n| n.retained_by.is_some())
            .map(|n| n.id.clone())
            .collect();

        let mut visited: HashSet<SymbolId> = HashSet::new();
        for start in entry_points.into_iter().chain(retained) {
            dfs(ctx, start, &mut visited);
        }

        for id in &visited {
            if let Some(symbol) = ctx.graph.node_mut(id) {
                symbol.is_used = true;
            }
        }
    }
}

/// Stack-based DFS with an explicit visited set, per §9 ("all traversals...
/// use a visited set; cycles terminate without special-casing").
fn dfs(ctx: &mut MutatorContext<'_>, start: SymbolId, visited: &mut HashSet<SymbolId>) {
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        if !visited.insert(id.clone()) {
            continue;
        }
        if let Some(parent) = ctx.graph.node(&id).and_then(|n| n.parent.clone()) {
            if !visited.contains(&parent) {
                stack.push(parent);
            }
        }
        for next in ctx.graph.outgoing(&id).cloned().collect::<Vec<_>>() {
            if !visited.contains(&next) {
                stack.push(next);
            }
        }
    }
}
