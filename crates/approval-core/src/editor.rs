//! Structural edits: the operations a user action maps onto.
//!
//! Each edit is a composite of graph mutation and layout adjustment. All of
//! them validate first and mutate second, so an edit that returns an error
//! has not touched the graph. Serial and parallel insertion and node
//! deletion keep every node on a `startNode -> endNode` path and keep edges
//! flowing left to right; raw edge deletion does not try to.

use smallvec::SmallVec;

use crate::config::CompactionPolicy;
use crate::edge::{Direction, Edge};
use crate::error::CoreError;
use crate::graph::ApprovalGraph;
use crate::id::NodeId;
use crate::layout::{self, SerialSlot, COORD_EPSILON};
use crate::node::{Node, DEFAULT_TITLE};

type IdList = SmallVec<[NodeId; 4]>;

fn push_unique(list: &mut IdList, id: &NodeId) {
    if !list.contains(id) {
        list.push(id.clone());
    }
}

fn plan(planned: &mut Vec<Edge>, source: &NodeId, target: &NodeId) {
    let edge = Edge::new(source.clone(), target.clone());
    if !planned.contains(&edge) {
        planned.push(edge);
    }
}

impl ApprovalGraph {
    /// Inserts a new approver in series.
    ///
    /// With `before_end == false` the new node follows `after`: the first
    /// edge leaving `after` is retargeted to the new node and the new node
    /// takes over its old target. With `before_end == true` the edge
    /// `after -> endNode` is split instead (the first edge into `endNode`
    /// when `after` is `endNode` itself) and the new node takes the end
    /// node's stage, pushing the end node right.
    ///
    /// Only one edge is rewired. Serial insertion assumes `after` has a
    /// single canonical successor; on a fan-out the first edge in edge order
    /// is the one split.
    ///
    /// Returns the new node, ready for its title to be edited.
    pub fn insert_serial(&mut self, after: &NodeId, before_end: bool) -> Result<Node, CoreError> {
        let anchor = self
            .node(after.as_str())
            .ok_or_else(|| CoreError::NotFound { id: after.clone() })?;
        let end = self
            .end()
            .ok_or_else(|| CoreError::NotFound { id: NodeId::end() })?;
        let stage = self.config().stage_width();

        let split = if before_end {
            self.edges().iter().position(|e| {
                e.target.is_end() && (after.is_end() || &e.source == after)
            })
        } else {
            self.edges().iter().position(|e| &e.source == after)
        };
        let Some(split) = split else {
            let reason = if before_end {
                format!("no edge from {after} into {}", NodeId::end())
            } else {
                format!("{after} has no outgoing edge to split")
            };
            return Err(CoreError::StructuralError { reason });
        };

        let edge = &self.edges()[split];
        let upstream = self
            .node(edge.source.as_str())
            .ok_or_else(|| CoreError::NotFound {
                id: edge.source.clone(),
            })?;
        let downstream = self
            .node(edge.target.as_str())
            .ok_or_else(|| CoreError::NotFound {
                id: edge.target.clone(),
            })?;

        let (x, y) = if before_end {
            let row = if after.is_end() { end.y } else { anchor.y };
            (end.x, row)
        } else {
            (anchor.x + stage, anchor.y)
        };
        let anchor_x = upstream.x;
        let downstream_x = downstream.x;
        let downstream_id = downstream.id.clone();

        // Validated; from here on nothing fails.
        let id = self.add_node(DEFAULT_TITLE, x, y);
        self.edges_mut()[split].target = id.clone();
        let tail = Edge::new(id.clone(), downstream_id.clone());
        self.edges_mut().push(tail);

        let (config, nodes, canvas) = self.layout_parts();
        let shift = layout::open_stage(
            config,
            nodes,
            canvas,
            &SerialSlot {
                inserted: &id,
                anchor_x,
                x,
                y,
                downstream_x,
            },
        );

        tracing::debug!(
            node = %id,
            after = %after,
            downstream = %downstream_id,
            before_end,
            shift,
            "inserted serial node"
        );
        self.inserted(&id)
    }

    /// Inserts a new approver parallel to `beside`.
    ///
    /// The new node sits on the same stage one row below. Every edge into
    /// `beside` is cloned to end at the new node and every edge out of it is
    /// cloned to start at the new node, so both branches share predecessors
    /// and successors. The original edges are left alone.
    pub fn insert_parallel(&mut self, beside: &NodeId) -> Result<Node, CoreError> {
        if beside.is_reserved() {
            return Err(CoreError::ReservedNode {
                id: beside.clone(),
                action: "branched",
            });
        }
        let sibling = self
            .node(beside.as_str())
            .ok_or_else(|| CoreError::NotFound { id: beside.clone() })?;
        let x = sibling.x;
        let y = sibling.y + self.config().row_height();

        let id = self.add_node(DEFAULT_TITLE, x, y);
        let (config, nodes, canvas) = self.layout_parts();
        let grew = layout::open_row(config, nodes, canvas, &id);

        let clones: Vec<Edge> = self
            .edges()
            .iter()
            .filter_map(|e| match e.direction(beside)? {
                Direction::Incoming => Some(Edge::new(e.source.clone(), id.clone())),
                Direction::Outgoing => Some(Edge::new(id.clone(), e.target.clone())),
            })
            .collect();
        let cloned = clones.len();
        self.edges_mut().extend(clones);

        tracing::debug!(node = %id, beside = %beside, cloned, grew, "inserted parallel node");
        self.inserted(&id)
    }

    /// Deletes an approver and reconnects around it.
    ///
    /// Predecessors are reconnected to the node's canonical downstream (the
    /// target of its first outgoing edge) when they share a row with the
    /// deleted node or with the downstream node. A predecessor that would be
    /// left without any outgoing edge, or a successor left without any
    /// incoming edge, is reconnected regardless so every node keeps a path
    /// from start to end. With [`CompactionPolicy::FreedStage`] the stage the
    /// node vacated is reclaimed when that is safe.
    pub fn delete_node(&mut self, id: &NodeId) -> Result<Node, CoreError> {
        if id.is_reserved() {
            return Err(CoreError::ReservedNode {
                id: id.clone(),
                action: "deleted",
            });
        }
        let removed = self
            .node(id.as_str())
            .cloned()
            .ok_or_else(|| CoreError::NotFound { id: id.clone() })?;

        let mut predecessors = IdList::new();
        let mut successors = IdList::new();
        for edge in self.edges() {
            match edge.direction(id) {
                Some(Direction::Incoming) => push_unique(&mut predecessors, &edge.source),
                Some(Direction::Outgoing) => push_unique(&mut successors, &edge.target),
                None => {}
            }
        }
        let downstream = successors
            .first()
            .cloned()
            .ok_or_else(|| CoreError::StructuralError {
                reason: format!("{id} has no outgoing edge; cannot find its downstream node"),
            })?;

        self.edges_mut().retain(|e| !e.touches(id));

        let planned = self.plan_reconnection(&removed, &predecessors, &successors);

        let compact_from = match self.config().compaction {
            CompactionPolicy::FreedStage => {
                self.compaction_start(&removed, &predecessors, &downstream, &planned)
            }
            CompactionPolicy::Never => None,
        };
        let mut compacted = 0;
        if let Some(from_x) = compact_from {
            let (config, nodes, _) = self.layout_parts();
            compacted = layout::close_stage(config, nodes, from_x);
        }

        let mut reconnected = 0;
        for edge in planned {
            if self.check_new_edge(&edge).is_ok() {
                self.edges_mut().push(edge);
                reconnected += 1;
            }
        }

        self.nodes_mut().shift_remove(id);

        tracing::debug!(
            node = %id,
            downstream = %downstream,
            reconnected,
            compacted,
            "deleted node"
        );
        Ok(removed)
    }

    /// Deletes one edge. Returns `false` if it was not present.
    ///
    /// No reconnection happens, so this may disconnect part of the graph.
    pub fn delete_edge(&mut self, edge: &Edge) -> bool {
        let removed = self.remove_edge(&edge.source, &edge.target);
        tracing::debug!(edge = %edge, removed, "deleted edge");
        removed
    }

    /// Commits a title edit.
    pub fn rename_node(&mut self, id: &NodeId, title: impl Into<String>) -> Result<(), CoreError> {
        let title = title.into();
        tracing::debug!(node = %id, title = %title, "renamed node");
        self.set_title(id, title)
    }

    /// Replaces the graph with the canonical two-node graph, keeping the
    /// layout configuration.
    pub fn reset(&mut self) {
        *self = ApprovalGraph::new(self.config().clone());
        tracing::debug!("reset graph");
    }

    fn inserted(&self, id: &NodeId) -> Result<Node, CoreError> {
        self.node(id.as_str())
            .cloned()
            .ok_or_else(|| CoreError::NotFound { id: id.clone() })
    }

    /// Edges to add once `removed` is gone. Touching edges must already have
    /// been dropped.
    fn plan_reconnection(
        &self,
        removed: &Node,
        predecessors: &IdList,
        successors: &IdList,
    ) -> Vec<Edge> {
        let mut planned: Vec<Edge> = Vec::new();
        let Some(downstream) = successors.first() else {
            return Vec::new();
        };
        let downstream_y = self.node(downstream.as_str()).map(|n| n.y);

        for pred in predecessors {
            let Some(pred_node) = self.node(pred.as_str()) else {
                continue;
            };
            let on_row = |y: f64| layout::same_coord(pred_node.y, y);
            let same_row = on_row(removed.y) || downstream_y.is_some_and(on_row);
            let stranded = !self.edges().iter().any(|e| &e.source == pred);
            if same_row || stranded {
                plan(&mut planned, pred, downstream);
            }
        }

        for succ in successors {
            let fed = self.edges().iter().any(|e| &e.target == succ)
                || planned.iter().any(|e| &e.target == succ);
            if !fed {
                for pred in predecessors {
                    plan(&mut planned, pred, succ);
                }
            }
        }
        planned
    }

    /// Returns the stage to close from, if reclaiming the deleted node's
    /// stage keeps the layout valid.
    ///
    /// The stage strictly between the predecessors and the downstream node
    /// must hold no other node, and every edge that crosses the shift
    /// boundary (including the planned reconnections) must stay at least one
    /// stage long after the shift.
    fn compaction_start(
        &self,
        removed: &Node,
        predecessors: &IdList,
        downstream: &NodeId,
        planned: &[Edge],
    ) -> Option<f64> {
        let stage = self.config().stage_width();
        let from_x = self.node(downstream.as_str())?.x;
        let lo_x = predecessors
            .iter()
            .filter_map(|p| self.node(p.as_str()).map(|n| n.x))
            .fold(removed.x - stage, f64::max);

        if !layout::stage_is_vacant(self.node_index(), lo_x, from_x, &removed.id) {
            return None;
        }

        for edge in self.edges().iter().chain(planned) {
            let source = self.node(edge.source.as_str());
            let target = self.node(edge.target.as_str());
            let (Some(u), Some(v)) = (source, target) else {
                continue;
            };
            let u_moves = u.x > from_x - COORD_EPSILON;
            let v_moves = v.x > from_x - COORD_EPSILON;
            if v_moves && !u_moves && v.x - stage < u.x + stage - COORD_EPSILON {
                return None;
            }
        }
        Some(from_x)
    }
}
