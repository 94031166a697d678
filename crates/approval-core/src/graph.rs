//! ApprovalGraph: the node and edge store behind the editor.
//!
//! [`ApprovalGraph`] owns the node index, the edge list, the id counter and
//! the canvas extent. Its public mutation primitives keep the hard
//! invariants (reserved terminals present, no dangling, self-loop or
//! duplicate edge). Path and ordering invariants are the editor's job; see
//! [`crate::editor`].
//!
//! Nodes live in an `IndexMap` keyed by id so lookups are direct while the
//! insertion order stays stable for export. Edges are a plain `Vec`: their
//! order decides which edge is "first" when the editor needs a canonical
//! successor.

use indexmap::IndexMap;

use crate::config::{Canvas, LayoutConfig};
use crate::edge::Edge;
use crate::error::CoreError;
use crate::id::NodeId;
use crate::node::{Node, END_TITLE, START_TITLE};

/// The approval flow graph of one document.
#[derive(Debug, Clone)]
pub struct ApprovalGraph {
    nodes: IndexMap<NodeId, Node>,
    edges: Vec<Edge>,
    /// Next counter value handed out by `add_node`.
    next_id: u64,
    canvas: Canvas,
    config: LayoutConfig,
}

impl ApprovalGraph {
    /// Creates the canonical two-node graph: `startNode -> endNode`, two
    /// stages apart.
    pub fn new(config: LayoutConfig) -> Self {
        let mut nodes = IndexMap::new();
        let start = Node::new(NodeId::start(), START_TITLE, config.start_x, config.start_y);
        let end = Node::new(
            NodeId::end(),
            END_TITLE,
            config.start_x + config.stage_width() * 2.0,
            config.start_y,
        );
        nodes.insert(start.id.clone(), start);
        nodes.insert(end.id.clone(), end);

        ApprovalGraph {
            nodes,
            edges: vec![Edge::new(NodeId::start(), NodeId::end())],
            next_id: 1,
            canvas: config.initial_canvas(),
            config,
        }
    }

    /// Creates the two-node graph with one approver between the terminals.
    pub fn seeded(config: LayoutConfig, approver_title: impl Into<String>) -> Self {
        let mut graph = ApprovalGraph::new(config);
        let x = graph.config.start_x + graph.config.stage_width();
        let y = graph.config.start_y;
        let approver = graph.add_node(approver_title, x, y);
        graph.edges = vec![
            Edge::new(NodeId::start(), approver.clone()),
            Edge::new(approver, NodeId::end()),
        ];
        graph
    }

    /// Constructs a graph from already-loaded parts.
    ///
    /// Used by the document gateway. Checks the hard invariants: unique node
    /// ids, both terminals present, and every edge valid against the node
    /// set. Edges are checked in order, so the first offending edge is the
    /// one reported. `next_id` must lie past every `node<N>` suffix and below
    /// `u64::MAX`, so the counter can always advance without reissuing an id.
    pub fn from_parts(
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        next_id: u64,
        canvas: Canvas,
        config: LayoutConfig,
    ) -> Result<Self, CoreError> {
        let mut index = IndexMap::with_capacity(nodes.len());
        for node in nodes {
            let id = node.id.clone();
            if index.insert(id.clone(), node).is_some() {
                return Err(CoreError::StructuralError {
                    reason: format!("duplicate node id: {id}"),
                });
            }
        }
        for reserved in [NodeId::start(), NodeId::end()] {
            if !index.contains_key(&reserved) {
                return Err(CoreError::NotFound { id: reserved });
            }
        }
        if next_id == u64::MAX {
            return Err(CoreError::StructuralError {
                reason: format!("id counter {next_id} cannot advance"),
            });
        }
        if let Some(id) = index
            .keys()
            .find(|id| id.sequence_number().is_some_and(|n| n >= next_id))
        {
            return Err(CoreError::StructuralError {
                reason: format!("id counter {next_id} would reissue {id}"),
            });
        }

        let mut graph = ApprovalGraph {
            nodes: index,
            edges: Vec::with_capacity(edges.len()),
            next_id,
            canvas,
            config,
        };
        for edge in edges {
            graph.add_edge(edge.source, edge.target)?;
        }
        Ok(graph)
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    /// Iterates nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Returns all edges in edge order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn start(&self) -> Option<&Node> {
        self.nodes.get(crate::id::START_ID)
    }

    pub fn end(&self) -> Option<&Node> {
        self.nodes.get(crate::id::END_ID)
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Returns the counter value the next inserted node will use.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.edges
            .iter()
            .any(|e| e.source.as_str() == source && e.target.as_str() == target)
    }

    /// Returns every edge with `id` as source or target, in edge order.
    pub fn edges_touching(&self, id: &NodeId) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.touches(id)).collect()
    }

    /// The node's dependency list: sources of all edges that target it.
    pub fn dependencies(&self, id: &NodeId) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter(|e| &e.target == id)
            .map(|e| e.source.clone())
            .collect()
    }

    /// Targets of all edges leaving `id`, in edge order.
    pub fn successors(&self, id: &NodeId) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter(|e| &e.source == id)
            .map(|e| e.target.clone())
            .collect()
    }

    // -----------------------------------------------------------------------
    // Mutation primitives
    // -----------------------------------------------------------------------

    /// Appends a node with a freshly allocated `node<N>` id.
    pub fn add_node(&mut self, title: impl Into<String>, x: f64, y: f64) -> NodeId {
        let id = self.allocate_id();
        let node = Node::new(id.clone(), title, x, y);
        self.nodes.insert(id.clone(), node);
        id
    }

    /// Removes a node together with every edge touching it.
    ///
    /// Reserved terminals are rejected. Node order of the survivors is kept.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<Node, CoreError> {
        if id.is_reserved() {
            return Err(CoreError::ReservedNode {
                id: id.clone(),
                action: "removed",
            });
        }
        let node = self
            .nodes
            .shift_remove(id)
            .ok_or_else(|| CoreError::NotFound { id: id.clone() })?;
        self.edges.retain(|e| !e.touches(id));
        Ok(node)
    }

    /// Adds `source -> target`.
    ///
    /// Fails with `InvalidEdge` when either endpoint is missing, the edge is
    /// a self-loop, or the same ordered pair already exists.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> Result<(), CoreError> {
        let edge = Edge { source, target };
        self.check_new_edge(&edge)?;
        self.edges.push(edge);
        Ok(())
    }

    /// Removes `source -> target`. Returns `false` if there was no such edge.
    pub fn remove_edge(&mut self, source: &NodeId, target: &NodeId) -> bool {
        match self
            .edges
            .iter()
            .position(|e| &e.source == source && &e.target == target)
        {
            Some(pos) => {
                self.edges.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Replaces a node's title.
    pub fn set_title(&mut self, id: &NodeId, title: impl Into<String>) -> Result<(), CoreError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| CoreError::NotFound { id: id.clone() })?;
        node.title = title.into();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Crate-internal access for the editor and layout engine
    // -----------------------------------------------------------------------

    pub(crate) fn check_new_edge(&self, edge: &Edge) -> Result<(), CoreError> {
        for endpoint in [&edge.source, &edge.target] {
            if !self.nodes.contains_key(endpoint) {
                return Err(CoreError::InvalidEdge {
                    reason: format!("{edge}: endpoint {endpoint} does not exist"),
                });
            }
        }
        if edge.is_self_loop() {
            return Err(CoreError::InvalidEdge {
                reason: format!("{edge}: self-loop"),
            });
        }
        if self.edges.contains(edge) {
            return Err(CoreError::InvalidEdge {
                reason: format!("{edge}: duplicate"),
            });
        }
        Ok(())
    }

    pub(crate) fn allocate_id(&mut self) -> NodeId {
        let id = NodeId::numbered(self.next_id);
        // from_parts never admits a saturated counter.
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    pub(crate) fn node_index(&self) -> &IndexMap<NodeId, Node> {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut IndexMap<NodeId, Node> {
        &mut self.nodes
    }

    pub(crate) fn edges_mut(&mut self) -> &mut Vec<Edge> {
        &mut self.edges
    }

    /// Splits the borrow so layout code can move nodes while reading config.
    pub(crate) fn layout_parts(
        &mut self,
    ) -> (&LayoutConfig, &mut IndexMap<NodeId, Node>, &mut Canvas) {
        (&self.config, &mut self.nodes, &mut self.canvas)
    }
}
