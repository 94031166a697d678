//! Export/import round trips over randomly edited graphs.

use proptest::prelude::*;

use approval_core::{ApprovalGraph, Edge, LayoutConfig, NodeId};
use approval_storage::{export, from_json, import, to_json, Document, DocumentStore, InMemoryStore};

#[derive(Debug, Clone)]
enum Edit {
    Serial(usize, bool),
    Parallel(usize),
    DeleteNode(usize),
    DeleteEdge(usize),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        3 => (any::<usize>(), any::<bool>()).prop_map(|(p, b)| Edit::Serial(p, b)),
        2 => any::<usize>().prop_map(Edit::Parallel),
        2 => any::<usize>().prop_map(Edit::DeleteNode),
        1 => any::<usize>().prop_map(Edit::DeleteEdge),
    ]
}

fn apply(graph: &mut ApprovalGraph, edit: &Edit) {
    let ids: Vec<NodeId> = graph.nodes().map(|n| n.id.clone()).collect();
    let pick = |p: usize| ids[p % ids.len()].clone();
    match edit {
        Edit::Serial(p, before_end) => {
            let _ = graph.insert_serial(&pick(*p), *before_end);
        }
        Edit::Parallel(p) => {
            let _ = graph.insert_parallel(&pick(*p));
        }
        Edit::DeleteNode(p) => {
            let _ = graph.delete_node(&pick(*p));
        }
        Edit::DeleteEdge(p) => {
            if !graph.edges().is_empty() {
                let edge = graph.edges()[p % graph.edges().len()].clone();
                graph.delete_edge(&edge);
            }
        }
    }
}

fn edited(edits: &[Edit]) -> ApprovalGraph {
    let mut graph = ApprovalGraph::new(LayoutConfig::default());
    for edit in edits {
        apply(&mut graph, edit);
    }
    graph
}

fn sorted_edges(graph: &ApprovalGraph) -> Vec<Edge> {
    let mut edges = graph.edges().to_vec();
    edges.sort_by_key(|e| (e.source.clone(), e.target.clone()));
    edges
}

proptest! {
    #[test]
    fn round_trip_preserves_ids_and_edges(edits in prop::collection::vec(edit_strategy(), 0..30)) {
        let graph = edited(&edits);
        let json = to_json(&graph).unwrap();
        let back = from_json(&json, LayoutConfig::default()).unwrap();

        let ids: Vec<&NodeId> = graph.nodes().map(|n| &n.id).collect();
        let back_ids: Vec<&NodeId> = back.nodes().map(|n| &n.id).collect();
        prop_assert_eq!(ids, back_ids);
        prop_assert_eq!(sorted_edges(&graph), sorted_edges(&back));
        prop_assert_eq!(graph.canvas(), back.canvas());
        prop_assert_eq!(graph.next_id(), back.next_id());
        prop_assert_eq!(export(&back), export(&graph));
    }

    #[test]
    fn dependency_lists_alone_rebuild_the_edge_set(edits in prop::collection::vec(edit_strategy(), 0..30)) {
        let graph = edited(&edits);
        let mut document = export(&graph);
        document.edges = None;

        let back = import(document, LayoutConfig::default()).unwrap();
        prop_assert_eq!(sorted_edges(&graph), sorted_edges(&back));
    }

    #[test]
    fn imported_graph_keeps_issuing_fresh_ids(edits in prop::collection::vec(edit_strategy(), 0..20)) {
        let graph = edited(&edits);
        let json = to_json(&graph).unwrap();
        let mut back = from_json(&json, LayoutConfig::default()).unwrap();
        if let Ok(node) = back.insert_serial(&NodeId::start(), false) {
            prop_assert!(graph.node(node.id.as_str()).is_none());
        }
    }
}

#[test]
fn seeded_document_snapshot() {
    let graph = ApprovalGraph::seeded(LayoutConfig::default(), "supervisor");
    insta::assert_snapshot!(to_json(&graph).unwrap(), @r#"{"nodes":[{"id":"startNode","title":"start","x":100.0,"y":100.0,"dep":[]},{"id":"endNode","title":"end","x":790.0,"y":100.0,"dep":["node1"]},{"id":"node1","title":"supervisor","x":445.0,"y":100.0,"dep":["startNode"]}],"edges":[{"source":"startNode","target":"node1"},{"source":"node1","target":"endNode"}],"svgWidth":900.0,"svgHeight":400.0,"nextId":2}"#);
}

#[test]
fn legacy_document_with_embedded_endpoints_and_no_counter() {
    let text = r#"{
        "nodes": [
            {"id": "startNode", "title": "start", "x": 100, "y": 100, "dep": []},
            {"id": "node2", "title": "manager", "x": 445, "y": 100, "dep": ["startNode"]},
            {"id": "node3", "title": "hr", "x": 445, "y": 250, "dep": ["startNode"]},
            {"id": "endNode", "title": "end", "x": 790, "y": 100, "dep": ["node2", "node3"]}
        ],
        "edges": [
            {"source": {"id": "startNode", "title": "start", "x": 100, "y": 100}, "target": {"id": "node2", "title": "manager", "x": 445, "y": 100}},
            {"source": {"id": "startNode", "title": "start", "x": 100, "y": 100}, "target": {"id": "node3", "title": "hr", "x": 445, "y": 250}},
            {"source": {"id": "node2", "title": "manager", "x": 445, "y": 100}, "target": {"id": "endNode", "title": "end", "x": 790, "y": 100}},
            {"source": {"id": "node3", "title": "hr", "x": 445, "y": 250}, "target": {"id": "endNode", "title": "end", "x": 790, "y": 100}}
        ],
        "svgWidth": 900,
        "svgHeight": 400
    }"#;
    let mut graph = from_json(text, LayoutConfig::default()).unwrap();
    assert_eq!(graph.edge_count(), 4);
    assert_eq!(graph.next_id(), 4);

    let node = graph.insert_parallel(&NodeId::numbered(3)).unwrap();
    assert_eq!(node.id, NodeId::numbered(4));
    assert!(approval_core::audit(&graph).is_empty());
}

#[test]
fn store_round_trip_through_document_type() {
    let mut store = InMemoryStore::new();
    let graph = ApprovalGraph::seeded(LayoutConfig::default(), "supervisor");
    store.save_graph("leave", &graph).unwrap();

    let document = Document::from_json(&store.load("leave").unwrap()).unwrap();
    assert_eq!(document, export(&graph));
}
