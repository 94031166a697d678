//! Read-only invariant audit.
//!
//! [`audit`] walks a graph and reports every broken invariant instead of
//! stopping at the first one. The editor does not call it on every edit;
//! it maintains the path and ordering invariants by construction. The
//! document gateway uses the structural subset on import, and tests use
//! the full report.
//!
//! Cycle detection and reachability run on a petgraph `DiGraphMap` view
//! keyed by node id.

use std::collections::HashSet;

use petgraph::algo::is_cyclic_directed;
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::{Dfs, Reversed};
use thiserror::Error;

use crate::edge::Edge;
use crate::graph::ApprovalGraph;
use crate::id::{NodeId, END_ID, START_ID};

/// One broken invariant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("reserved node {0} is missing")]
    MissingTerminal(NodeId),

    #[error("edge {0} references a missing node")]
    DanglingEdge(Edge),

    #[error("edge {0} is a self-loop")]
    SelfLoop(Edge),

    #[error("edge {0} appears more than once")]
    DuplicateEdge(Edge),

    #[error("graph contains a cycle")]
    Cycle,

    #[error("node {0} is not reachable from startNode")]
    Unreachable(NodeId),

    #[error("node {0} does not lead to endNode")]
    DeadEnd(NodeId),

    /// `source.x >= target.x`.
    #[error("edge {0} does not flow left to right")]
    Backward(Edge),
}

impl Violation {
    /// Structural violations make a graph unusable for editing. The rest
    /// (reachability, ordering) are editor goals that raw edge deletion or
    /// hand-made documents may legitimately break.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Violation::MissingTerminal(_)
                | Violation::DanglingEdge(_)
                | Violation::SelfLoop(_)
                | Violation::DuplicateEdge(_)
                | Violation::Cycle
        )
    }
}

/// Reports every violated invariant, in a stable order.
pub fn audit(graph: &ApprovalGraph) -> Vec<Violation> {
    let mut violations = Vec::new();

    for terminal in [NodeId::start(), NodeId::end()] {
        if !graph.contains(terminal.as_str()) {
            violations.push(Violation::MissingTerminal(terminal));
        }
    }

    let mut seen: HashSet<&Edge> = HashSet::new();
    let mut view: DiGraphMap<&str, ()> = DiGraphMap::new();
    for node in graph.nodes() {
        view.add_node(node.id.as_str());
    }

    for edge in graph.edges() {
        let source = graph.node(edge.source.as_str());
        let target = graph.node(edge.target.as_str());
        let (Some(source), Some(target)) = (source, target) else {
            violations.push(Violation::DanglingEdge(edge.clone()));
            continue;
        };
        if edge.is_self_loop() {
            violations.push(Violation::SelfLoop(edge.clone()));
        }
        if !seen.insert(edge) {
            violations.push(Violation::DuplicateEdge(edge.clone()));
        }
        if source.x >= target.x {
            violations.push(Violation::Backward(edge.clone()));
        }
        view.add_edge(source.id.as_str(), target.id.as_str(), ());
    }

    if is_cyclic_directed(&view) {
        violations.push(Violation::Cycle);
    }

    if graph.contains(START_ID) && graph.contains(END_ID) {
        let forward = reachable(&view, START_ID, false);
        let backward = reachable(&view, END_ID, true);
        for node in graph.nodes() {
            let id = node.id.as_str();
            if !forward.contains(id) {
                violations.push(Violation::Unreachable(node.id.clone()));
            }
            if !backward.contains(id) {
                violations.push(Violation::DeadEnd(node.id.clone()));
            }
        }
    }

    violations
}

/// Returns the first structural violation, if any.
pub fn first_structural(graph: &ApprovalGraph) -> Option<Violation> {
    audit(graph).into_iter().find(Violation::is_structural)
}

fn reachable<'a>(
    view: &DiGraphMap<&'a str, ()>,
    from: &'a str,
    reversed: bool,
) -> HashSet<&'a str> {
    let mut found = HashSet::new();
    if reversed {
        let graph = Reversed(view);
        let mut dfs = Dfs::new(graph, from);
        while let Some(id) = dfs.next(graph) {
            found.insert(id);
        }
    } else {
        let mut dfs = Dfs::new(view, from);
        while let Some(id) = dfs.next(view) {
            found.insert(id);
        }
    }
    found
}
