// Copyright (c) The bungee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::Error;
use crate::handle::{Edge, Handle, NodeId};
use indexmap::IndexMap;
use petgraph::prelude::*;
use petgraph::stable_graph::StableUnGraph;
use petgraph::visit::EdgeRef;

/// A node of a bidirected graph: an id plus an opaque sequence payload.
///
/// The algorithms in this crate only look at topology; the sequence rides
/// along so that a reduced graph can still be related to its input.
#[derive(Clone, Debug)]
pub struct Node {
    id: NodeId,
    sequence: String,
}

impl Node {
    /// The id of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The sequence payload attached to this node, possibly empty.
    pub fn sequence(&self) -> &str {
        &self.sequence
    }
}

/// A bidirected multigraph.
///
/// Edges attach to a *side* of each endpoint rather than to the node itself,
/// which is how double-stranded sequence graphs connect: an edge is a pair of
/// [`Handle`]s `(a, b)` such that reading outward from `a` continues onto
/// `b`. The graph stores each edge once in canonical form and never stores
/// two copies of the same canonical edge.
///
/// Storage is a `petgraph` stable graph (node removal must not shuffle
/// indices mid-reduction) plus a map from node ids to petgraph indices.
#[derive(Clone, Debug, Default)]
pub struct BidirectedGraph {
    graph: StableUnGraph<Node, Edge>,
    ids: IndexMap<NodeId, NodeIndex>,
}

impl BidirectedGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a node with this id exists.
    pub fn has_node(&self, nid: NodeId) -> bool {
        self.ids.contains_key(&nid)
    }

    /// Looks up the handle for the node with the given id in the given
    /// orientation.
    pub fn get_handle(&self, nid: NodeId, is_reverse: bool) -> Result<Handle, Error> {
        if !self.has_node(nid) {
            return Err(Error::UnknownNodeId(nid));
        }
        Ok(Handle::new(nid, is_reverse))
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Returns the number of stored edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the smallest live node id, or `None` if the graph is empty.
    pub fn min_node_id(&self) -> Option<NodeId> {
        self.ids.keys().min().copied()
    }

    /// Returns the largest live node id, or `None` if the graph is empty.
    pub fn max_node_id(&self) -> Option<NodeId> {
        self.ids.keys().max().copied()
    }

    /// Iterates over all node ids, in a stable order for a fixed graph state.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids.keys().copied()
    }

    /// Iterates over the forward handle of every node.
    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.node_ids().map(Handle::forward)
    }

    /// Iterates over every stored edge in canonical form.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.graph
            .edge_indices()
            .filter_map(move |ix| self.graph.edge_weight(ix).copied())
    }

    /// Iterates over the neighbors seen from one side of a handle.
    ///
    /// With `go_left` false, yields each handle `b` such that `(h, b)` is an
    /// edge; with `go_left` true, each `b` such that `(b, h)` is an edge.
    /// The order is stable for a fixed graph state but otherwise unspecified.
    pub fn follow_edges(&self, handle: Handle, go_left: bool) -> impl Iterator<Item = Handle> + '_ {
        let from = if go_left { handle.flip() } else { handle };
        self.ids
            .get(&handle.id())
            .copied()
            .into_iter()
            .flat_map(move |ix| self.graph.edges(ix))
            .filter_map(move |er| er.weight().traverse_from(from))
            .map(move |h| if go_left { h.flip() } else { h })
    }

    /// Counts the edges incident to one side of a handle.
    pub fn get_degree(&self, handle: Handle, go_left: bool) -> usize {
        self.follow_edges(handle, go_left).count()
    }

    /// Returns true if the edge `(a, b)` (in either representation) exists.
    pub fn has_edge(&self, a: Handle, b: Handle) -> bool {
        self.find_edge_ix(&Edge::new(a, b)).is_some()
    }

    /// The sequence payload of the node under this handle.
    pub fn get_sequence(&self, handle: Handle) -> Result<&str, Error> {
        Ok(self.node_payload(handle.id())?.sequence())
    }

    /// The length of the sequence payload of the node under this handle.
    pub fn get_length(&self, handle: Handle) -> Result<usize, Error> {
        Ok(self.node_payload(handle.id())?.sequence().len())
    }

    // ---
    // Mutations
    // ---

    /// Adds a node with the given id. Returns false if the id was already
    /// present.
    pub fn add_vertex(&mut self, nid: NodeId) -> bool {
        self.add_vertex_with_sequence(nid, String::new())
    }

    /// Adds a node with the given id and sequence payload.
    pub fn add_vertex_with_sequence(&mut self, nid: NodeId, sequence: String) -> bool {
        if self.has_node(nid) {
            return false;
        }
        let ix = self.graph.add_node(Node { id: nid, sequence });
        self.ids.insert(nid, ix);
        true
    }

    /// Creates a fresh node with an id strictly greater than any live one.
    pub fn create_node(&mut self, sequence: String) -> NodeId {
        let nid = self.max_node_id().map_or(1, |max| max + 1);
        self.add_vertex_with_sequence(nid, sequence);
        nid
    }

    /// Connects a side of `id1` to a side of `id2`.
    ///
    /// `from_left` selects the incident side of `id1` and `to_right` the
    /// incident side of `id2`. Duplicates of an existing edge are ignored.
    pub fn add_edge(
        &mut self,
        id1: NodeId,
        id2: NodeId,
        from_left: bool,
        to_right: bool,
    ) -> Result<bool, Error> {
        self.create_edge(Handle::new(id1, from_left), Handle::new(id2, to_right))
    }

    /// Inserts the canonical form of the edge `(a, b)` if absent. Returns
    /// true if the edge was newly inserted.
    pub fn create_edge(&mut self, a: Handle, b: Handle) -> Result<bool, Error> {
        let edge = Edge::new(a, b);
        let ia = self.index_of(edge.left().id())?;
        let ib = self.index_of(edge.right().id())?;
        if self.find_edge_ix(&edge).is_some() {
            return Ok(false);
        }
        self.graph.add_edge(ia, ib, edge);
        Ok(true)
    }

    /// Removes the edge `(a, b)` by canonical form. Returns true if an edge
    /// was removed.
    pub fn destroy_edge(&mut self, a: Handle, b: Handle) -> Result<bool, Error> {
        let edge = Edge::new(a, b);
        self.index_of(edge.left().id())?;
        self.index_of(edge.right().id())?;
        match self.find_edge_ix(&edge) {
            Some(ix) => {
                self.graph.remove_edge(ix);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes a node along with all of its incident edges.
    pub fn destroy_node(&mut self, nid: NodeId) -> Result<(), Error> {
        let ix = self.index_of(nid)?;
        let incident: Vec<EdgeIndex> = self.graph.edges(ix).map(|er| er.id()).collect();
        for edge_ix in incident {
            self.graph.remove_edge(edge_ix);
        }
        self.graph.remove_node(ix);
        self.ids.shift_remove(&nid);
        Ok(())
    }

    /// Verifies internal invariants on this graph. Not part of the documented
    /// API.
    #[doc(hidden)]
    pub fn verify(&self) -> Result<(), Error> {
        if self.graph.node_count() != self.ids.len() {
            return Err(Error::GraphInternalError(format!(
                "number of stored nodes = {} different from indexed ids = {}",
                self.graph.node_count(),
                self.ids.len(),
            )));
        }
        for (&nid, &ix) in &self.ids {
            match self.graph.node_weight(ix) {
                Some(node) if node.id() == nid => {}
                _ => {
                    return Err(Error::GraphInternalError(format!(
                        "node id {} maps to a missing or mismatched graph entry",
                        nid,
                    )))
                }
            }
        }
        for edge in self.edges() {
            if Edge::new(edge.left(), edge.right()) != edge {
                return Err(Error::GraphInternalError(format!(
                    "edge {} is not stored in canonical form",
                    edge,
                )));
            }
            for handle in [edge.left(), edge.right()] {
                if !self.has_node(handle.id()) {
                    return Err(Error::GraphInternalError(format!(
                        "edge {} refers to missing node {}",
                        edge,
                        handle.id(),
                    )));
                }
            }
        }
        Ok(())
    }

    // ---
    // Helper methods
    // ---

    fn index_of(&self, nid: NodeId) -> Result<NodeIndex, Error> {
        self.ids.get(&nid).copied().ok_or(Error::UnknownNodeId(nid))
    }

    fn node_payload(&self, nid: NodeId) -> Result<&Node, Error> {
        let ix = self.index_of(nid)?;
        self.graph
            .node_weight(ix)
            .ok_or(Error::UnknownNodeId(nid))
    }

    fn find_edge_ix(&self, edge: &Edge) -> Option<EdgeIndex> {
        let ix = self.ids.get(&edge.left().id()).copied()?;
        self.graph
            .edges(ix)
            .find(|er| er.weight() == edge)
            .map(|er| er.id())
    }
}
