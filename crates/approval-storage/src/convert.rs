//! Export/import between [`ApprovalGraph`] and [`Document`].
//!
//! [`export`] writes nodes in graph order with their dependency lists
//! recomputed from the edges, edges as id pairs, the canvas extent and the
//! id counter. [`import`] rebuilds a graph from a document, resolving edge
//! endpoints against the document's own node set and rejecting anything the
//! editor could not work with. It either returns a complete graph or an
//! error; nothing is half-built.

use std::collections::HashSet;

use approval_core::audit;
use approval_core::{ApprovalGraph, Canvas, CoreError, Edge, LayoutConfig, Node, NodeId};

use crate::document::{Document, DocumentEdge, DocumentNode, Endpoint};
use crate::error::StorageError;

/// Converts a graph to its portable document form.
pub fn export(graph: &ApprovalGraph) -> Document {
    let nodes = graph
        .nodes()
        .map(|node| DocumentNode {
            id: node.id.clone(),
            title: node.title.clone(),
            x: node.x,
            y: node.y,
            dep: graph.dependencies(&node.id),
        })
        .collect();

    let edges = graph
        .edges()
        .iter()
        .map(|edge| DocumentEdge {
            source: Endpoint::from(edge.source.clone()),
            target: Endpoint::from(edge.target.clone()),
        })
        .collect();

    let canvas = graph.canvas();
    Document {
        nodes,
        edges: Some(edges),
        svg_width: Some(canvas.width),
        svg_height: Some(canvas.height),
        next_id: Some(graph.next_id()),
    }
}

/// Builds a graph from a document.
///
/// Edges come from the `edges` list; a document without one falls back to
/// the nodes' `dep` lists. Canvas extent and id counter are taken from the
/// document when present and derived from the nodes otherwise.
pub fn import(document: Document, config: LayoutConfig) -> Result<ApprovalGraph, StorageError> {
    let mut ids: HashSet<&NodeId> = HashSet::with_capacity(document.nodes.len());
    for node in &document.nodes {
        if !ids.insert(&node.id) {
            return Err(StorageError::DuplicateNode {
                id: node.id.clone(),
            });
        }
    }
    for reserved in [NodeId::start(), NodeId::end()] {
        if !ids.contains(&reserved) {
            return Err(StorageError::MissingReserved { id: reserved });
        }
    }

    let edges = match &document.edges {
        Some(edges) => resolve_edges(edges, &ids)?,
        None => edges_from_dependencies(&document.nodes, &ids)?,
    };

    let next_id = next_free_id(&document)?;
    let canvas = canvas_for(&document, &config);
    let nodes: Vec<Node> = document
        .nodes
        .into_iter()
        .map(|n| Node::new(n.id, n.title, n.x, n.y))
        .collect();
    let edge_count = edges.len();

    let graph = ApprovalGraph::from_parts(nodes, edges, next_id, canvas, config)?;
    if let Some(violation) = audit::first_structural(&graph) {
        return Err(StorageError::Structure(CoreError::StructuralError {
            reason: violation.to_string(),
        }));
    }

    tracing::info!(
        nodes = graph.node_count(),
        edges = edge_count,
        next_id,
        "imported document"
    );
    Ok(graph)
}

/// Serializes a graph to compact document JSON.
pub fn to_json(graph: &ApprovalGraph) -> Result<String, StorageError> {
    Ok(export(graph).to_json()?)
}

/// Parses document JSON and builds a graph from it.
pub fn from_json(text: &str, config: LayoutConfig) -> Result<ApprovalGraph, StorageError> {
    let document = Document::from_json(text)?;
    import(document, config)
}

fn resolve_edges(
    edges: &[DocumentEdge],
    ids: &HashSet<&NodeId>,
) -> Result<Vec<Edge>, StorageError> {
    edges
        .iter()
        .enumerate()
        .map(|(index, edge)| {
            let source = resolve(edge.source.id(), index, ids)?;
            let target = resolve(edge.target.id(), index, ids)?;
            Ok(Edge::new(source, target))
        })
        .collect()
}

fn edges_from_dependencies(
    nodes: &[DocumentNode],
    ids: &HashSet<&NodeId>,
) -> Result<Vec<Edge>, StorageError> {
    let mut edges = Vec::new();
    for node in nodes {
        for (index, dep) in node.dep.iter().enumerate() {
            if !ids.contains(dep) {
                return Err(StorageError::DanglingDependency {
                    node: node.id.clone(),
                    index,
                    id: dep.clone(),
                });
            }
            edges.push(Edge::new(dep.clone(), node.id.clone()));
        }
    }
    Ok(edges)
}

fn resolve(id: &NodeId, edge: usize, ids: &HashSet<&NodeId>) -> Result<NodeId, StorageError> {
    if ids.contains(id) {
        Ok(id.clone())
    } else {
        Err(StorageError::DanglingReference {
            edge,
            id: id.clone(),
        })
    }
}

/// One past the highest counter ever issued, so imported documents never
/// hand out an id that is already in use. A counter that could not advance
/// past the result is rejected.
fn next_free_id(document: &Document) -> Result<u64, StorageError> {
    let largest = document
        .nodes
        .iter()
        .filter_map(|n| n.id.sequence_number())
        .max();
    let from_ids = match largest {
        Some(n) => n.checked_add(1).ok_or(StorageError::CounterOverflow(n))?,
        None => 1,
    };
    let next_id = document.next_id.unwrap_or(1).max(from_ids);
    if next_id == u64::MAX {
        return Err(StorageError::CounterOverflow(next_id));
    }
    Ok(next_id)
}

fn canvas_for(document: &Document, config: &LayoutConfig) -> Canvas {
    let right = document.nodes.iter().map(|n| n.x).fold(0.0, f64::max);
    let bottom = document.nodes.iter().map(|n| n.y).fold(0.0, f64::max);
    Canvas {
        width: document
            .svg_width
            .unwrap_or_else(|| config.initial_width.max(right + config.stage_width())),
        height: document
            .svg_height
            .unwrap_or_else(|| config.initial_height.max(bottom + config.row_height())),
    }
}
