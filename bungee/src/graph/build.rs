// Copyright (c) The bungee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::Error;
use crate::graph::BidirectedGraph;
use crate::handle::NodeId;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// JSON document describing a bidirected graph.
#[derive(Debug, Deserialize)]
struct GraphDoc {
    #[serde(default)]
    nodes: Vec<NodeDoc>,
    #[serde(default)]
    edges: Vec<EdgeDoc>,
}

#[derive(Debug, Deserialize)]
struct NodeDoc {
    id: NodeId,
    #[serde(default)]
    sequence: String,
}

#[derive(Debug, Deserialize)]
struct EdgeDoc {
    id1: NodeId,
    id2: NodeId,
    #[serde(default)]
    from_left: bool,
    #[serde(default)]
    to_right: bool,
}

impl BidirectedGraph {
    /// Constructs a bidirected graph from its JSON description.
    ///
    /// Nodes are added before any edge referencing them; duplicate edges in
    /// the document collapse onto one stored edge.
    pub fn from_json(json: impl AsRef<str>) -> Result<Self, Error> {
        let doc: GraphDoc = serde_json::from_str(json.as_ref()).map_err(Error::GraphParse)?;
        let mut graph = BidirectedGraph::new();
        for node in doc.nodes {
            graph.add_vertex_with_sequence(node.id, node.sequence);
        }
        for edge in doc.edges {
            graph.add_edge(edge.id1, edge.id2, edge.from_left, edge.to_right)?;
        }
        Ok(graph)
    }

    /// Reads and constructs a bidirected graph from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = fs::read_to_string(path).map_err(Error::GraphIo)?;
        Self::from_json(json)
    }
}
