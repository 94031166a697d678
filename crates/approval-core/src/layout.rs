//! Incremental layout: opening and closing stages and rows.
//!
//! The layout engine never re-solves the whole diagram. Each structural edit
//! asks it to make room at one spot, and it shifts whatever sits at or beyond
//! that spot by one stage width (horizontally) or one row height
//! (vertically), growing the canvas when nodes are pushed past its edge.
//!
//! Everything here looks at node coordinates only. Edges never enter into
//! it; the editor decides *where* to open or close space, these functions
//! decide *who moves*.

use indexmap::IndexMap;

use crate::config::{Canvas, LayoutConfig};
use crate::id::NodeId;
use crate::node::Node;

/// Tolerance for comparing canvas coordinates.
pub const COORD_EPSILON: f64 = 1e-6;

/// Returns `true` if two coordinates name the same stage or row.
pub fn same_coord(a: f64, b: f64) -> bool {
    (a - b).abs() < COORD_EPSILON
}

/// Where a serial insertion wants to put its new node.
#[derive(Debug, Clone)]
pub struct SerialSlot<'a> {
    /// The freshly added node (already placed at `x`, `y`).
    pub inserted: &'a NodeId,
    /// Stage of the node the new one follows.
    pub anchor_x: f64,
    /// Intended position of the new node.
    pub x: f64,
    pub y: f64,
    /// Stage of the node the new one will feed into.
    pub downstream_x: f64,
}

/// Makes horizontal room for a serially inserted node.
///
/// Room exists when the downstream node and every node to the right of the
/// anchor on the same row already sit strictly beyond the new node. If not,
/// every other node at or beyond the pivot (the leftmost blocker) moves
/// right, far enough that the pivot lands one stage past the new node, and
/// the canvas widens by the same amount. On a regular grid the pivot is the
/// new node's own stage and the shift is exactly one stage width.
///
/// Returns the shift applied, `0.0` when there was room.
pub fn open_stage(
    config: &LayoutConfig,
    nodes: &mut IndexMap<NodeId, Node>,
    canvas: &mut Canvas,
    slot: &SerialSlot<'_>,
) -> f64 {
    let blocked = |x: f64| x < slot.x + COORD_EPSILON;

    let mut pivot = slot.x;
    let mut room = true;
    if blocked(slot.downstream_x) {
        room = false;
        pivot = pivot.min(slot.downstream_x);
    }
    for node in nodes.values() {
        if &node.id == slot.inserted || !same_coord(node.y, slot.y) {
            continue;
        }
        if node.x > slot.anchor_x + COORD_EPSILON && blocked(node.x) {
            room = false;
            pivot = pivot.min(node.x);
        }
    }
    if room {
        return 0.0;
    }

    let delta = config.stage_width() + (slot.x - pivot);
    for node in nodes.values_mut() {
        if &node.id != slot.inserted && node.x > pivot - COORD_EPSILON {
            node.x += delta;
        }
    }
    canvas.width += delta;
    delta
}

/// Makes vertical room for a parallel sibling.
///
/// Every node other than `inserted` whose row is at or below the new node's
/// row moves down one row height. Each node that then reaches the bottom of
/// the canvas grows it by one row height. Returns `true` if the canvas grew.
pub fn open_row(
    config: &LayoutConfig,
    nodes: &mut IndexMap<NodeId, Node>,
    canvas: &mut Canvas,
    inserted: &NodeId,
) -> bool {
    let Some(row_y) = nodes.get(inserted).map(|n| n.y) else {
        return false;
    };
    let row = config.row_height();
    let mut grew = false;
    for node in nodes.values_mut() {
        if &node.id != inserted && node.y > row_y - COORD_EPSILON {
            node.y += row;
        }
        if node.y >= canvas.height {
            canvas.height += row;
            grew = true;
        }
    }
    grew
}

/// Returns `true` if no node other than `except` lies strictly between the
/// two stages.
pub fn stage_is_vacant(
    nodes: &IndexMap<NodeId, Node>,
    lo_x: f64,
    hi_x: f64,
    except: &NodeId,
) -> bool {
    !nodes.values().any(|n| {
        &n.id != except && n.x > lo_x + COORD_EPSILON && n.x < hi_x - COORD_EPSILON
    })
}

/// Moves every node at or beyond `from_x` one stage to the left.
///
/// Returns how many nodes moved.
pub fn close_stage(
    config: &LayoutConfig,
    nodes: &mut IndexMap<NodeId, Node>,
    from_x: f64,
) -> usize {
    let stage = config.stage_width();
    let mut moved = 0;
    for node in nodes.values_mut() {
        if node.x > from_x - COORD_EPSILON {
            node.x -= stage;
            moved += 1;
        }
    }
    moved
}

/// The orthogonal polyline a renderer draws for an edge.
///
/// Runs along the source row to half a stage before the target, drops (or
/// climbs) to the target row, then runs into the target.
pub fn step_route(config: &LayoutConfig, source: &Node, target: &Node) -> [(f64, f64); 4] {
    let elbow_x = target.x - config.stage_width() / 2.0;
    [
        (source.x, source.y),
        (elbow_x, source.y),
        (elbow_x, target.y),
        (target.x, target.y),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(nodes: &[(&str, f64, f64)]) -> IndexMap<NodeId, Node> {
        nodes
            .iter()
            .map(|&(name, x, y)| {
                let node = Node::new(NodeId::new(name), name, x, y);
                (node.id.clone(), node)
            })
            .collect()
    }

    fn x_of(nodes: &IndexMap<NodeId, Node>, id: &str) -> f64 {
        nodes.get(id).unwrap().x
    }

    fn y_of(nodes: &IndexMap<NodeId, Node>, id: &str) -> f64 {
        nodes.get(id).unwrap().y
    }

    #[test]
    fn open_stage_with_room_moves_nothing() {
        let config = LayoutConfig::default();
        let mut nodes = index(&[
            ("startNode", 100.0, 100.0),
            ("node1", 445.0, 100.0),
            ("endNode", 790.0, 100.0),
        ]);
        let mut canvas = config.initial_canvas();
        let inserted = NodeId::new("node1");
        let slot = SerialSlot {
            inserted: &inserted,
            anchor_x: 100.0,
            x: 445.0,
            y: 100.0,
            downstream_x: 790.0,
        };
        assert_eq!(open_stage(&config, &mut nodes, &mut canvas, &slot), 0.0);
        assert_eq!(x_of(&nodes, "endNode"), 790.0);
        assert_eq!(canvas.width, 900.0);
    }

    #[test]
    fn open_stage_without_room_shifts_every_row() {
        let config = LayoutConfig::default();
        let mut nodes = index(&[
            ("startNode", 100.0, 100.0),
            ("node1", 445.0, 100.0),
            ("node3", 790.0, 250.0),
            ("node2", 790.0, 100.0),
            ("endNode", 790.0, 100.0),
        ]);
        let mut canvas = config.initial_canvas();
        let inserted = NodeId::new("node2");
        let slot = SerialSlot {
            inserted: &inserted,
            anchor_x: 445.0,
            x: 790.0,
            y: 100.0,
            downstream_x: 790.0,
        };
        let delta = open_stage(&config, &mut nodes, &mut canvas, &slot);
        assert_eq!(delta, 345.0);
        assert_eq!(x_of(&nodes, "node2"), 790.0);
        assert_eq!(x_of(&nodes, "endNode"), 1135.0);
        assert_eq!(x_of(&nodes, "node3"), 1135.0);
        assert_eq!(x_of(&nodes, "node1"), 445.0);
        assert_eq!(canvas.width, 1245.0);
    }

    #[test]
    fn open_stage_blocked_by_same_row_neighbor() {
        let config = LayoutConfig::default();
        // Downstream is far away but another node already occupies the slot.
        let mut nodes = index(&[
            ("startNode", 100.0, 100.0),
            ("node5", 445.0, 100.0),
            ("node6", 445.0, 100.0),
            ("endNode", 1135.0, 100.0),
        ]);
        let mut canvas = config.initial_canvas();
        let inserted = NodeId::new("node6");
        let slot = SerialSlot {
            inserted: &inserted,
            anchor_x: 100.0,
            x: 445.0,
            y: 100.0,
            downstream_x: 1135.0,
        };
        let delta = open_stage(&config, &mut nodes, &mut canvas, &slot);
        assert_eq!(delta, 345.0);
        assert_eq!(x_of(&nodes, "node5"), 790.0);
        assert_eq!(x_of(&nodes, "endNode"), 1480.0);
    }

    #[test]
    fn open_stage_cramped_downstream_lands_one_stage_past() {
        let config = LayoutConfig::default();
        let mut nodes = index(&[
            ("startNode", 100.0, 100.0),
            ("node2", 445.0, 100.0),
            ("endNode", 300.0, 100.0),
        ]);
        let mut canvas = config.initial_canvas();
        let inserted = NodeId::new("node2");
        let slot = SerialSlot {
            inserted: &inserted,
            anchor_x: 100.0,
            x: 445.0,
            y: 100.0,
            downstream_x: 300.0,
        };
        open_stage(&config, &mut nodes, &mut canvas, &slot);
        assert_eq!(x_of(&nodes, "endNode"), 790.0);
    }

    #[test]
    fn open_row_pushes_lower_rows_down() {
        let config = LayoutConfig::default();
        let mut nodes = index(&[
            ("startNode", 100.0, 100.0),
            ("node1", 445.0, 100.0),
            ("node2", 445.0, 250.0),
            ("node3", 445.0, 250.0),
            ("endNode", 790.0, 100.0),
        ]);
        let mut canvas = config.initial_canvas();
        let grew = open_row(&config, &mut nodes, &mut canvas, &NodeId::new("node3"));
        assert_eq!(y_of(&nodes, "node3"), 250.0);
        assert_eq!(y_of(&nodes, "node2"), 400.0);
        assert_eq!(y_of(&nodes, "node1"), 100.0);
        assert!(grew);
        assert_eq!(canvas.height, 550.0);
    }

    #[test]
    fn open_row_without_lower_rows_keeps_canvas() {
        let config = LayoutConfig::default();
        let mut nodes = index(&[("node1", 445.0, 100.0), ("node2", 445.0, 250.0)]);
        let mut canvas = config.initial_canvas();
        let grew = open_row(&config, &mut nodes, &mut canvas, &NodeId::new("node2"));
        assert!(!grew);
        assert_eq!(canvas.height, 400.0);
    }

    #[test]
    fn vacancy_ignores_the_excluded_node() {
        let nodes = index(&[
            ("startNode", 100.0, 100.0),
            ("node1", 445.0, 100.0),
            ("endNode", 790.0, 100.0),
        ]);
        let missing = NodeId::new("node9");
        assert!(!stage_is_vacant(&nodes, 100.0, 790.0, &missing));
        assert!(stage_is_vacant(&nodes, 100.0, 790.0, &NodeId::new("node1")));
    }

    #[test]
    fn close_stage_moves_nodes_at_or_beyond() {
        let config = LayoutConfig::default();
        let mut nodes = index(&[
            ("startNode", 100.0, 100.0),
            ("node2", 790.0, 250.0),
            ("endNode", 790.0, 100.0),
        ]);
        assert_eq!(close_stage(&config, &mut nodes, 790.0), 2);
        assert_eq!(x_of(&nodes, "endNode"), 445.0);
        assert_eq!(x_of(&nodes, "node2"), 445.0);
        assert_eq!(x_of(&nodes, "startNode"), 100.0);
    }

    #[test]
    fn step_route_elbows_half_a_stage_before_target() {
        let config = LayoutConfig::default();
        let source = Node::new(NodeId::new("a"), "a", 100.0, 100.0);
        let target = Node::new(NodeId::new("b"), "b", 445.0, 250.0);
        assert_eq!(
            step_route(&config, &source, &target),
            [(100.0, 100.0), (272.5, 100.0), (272.5, 250.0), (445.0, 250.0)]
        );
    }
}
