// Copyright (c) The bungee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contains types that describe errors that `bungee` methods can return.

use crate::handle::{Edge, Handle, NodeId};
use std::error;
use std::fmt;
use std::io;

use Error::*;

/// Error type describing the sorts of errors `bungee` can return.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// A node id was not present in the graph.
    UnknownNodeId(NodeId),
    /// An operation was invoked on a bundle whose state does not support it.
    InvalidBundleOp(&'static str),
    /// An edge was traversed from a handle that does not participate in it.
    MalformedEdge {
        /// The edge that was being traversed.
        edge: Edge,
        /// The handle the traversal started from.
        from: Handle,
    },
    /// An error occurred while reading a graph file.
    GraphIo(io::Error),
    /// An error occurred while parsing graph JSON.
    GraphParse(serde_json::Error),
    /// An internal invariant of the graph or the reduction engine was violated.
    GraphInternalError(String),
    /// A reduction rule is recognized but not implemented.
    Unimplemented(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownNodeId(nid) => write!(f, "Unknown node id: {}", nid),
            InvalidBundleOp(msg) => write!(f, "Invalid bundle operation: {}", msg),
            MalformedEdge { edge, from } => write!(
                f,
                "Cannot view edge {} from non-participant handle {}",
                edge, from
            ),
            GraphIo(err) => write!(f, "Error while reading graph file: {}", err),
            GraphParse(err) => write!(f, "Error while parsing graph JSON: {}", err),
            GraphInternalError(msg) => write!(f, "Internal error in graph: {}", msg),
            Unimplemented(what) => write!(f, "Not implemented: {}", what),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            GraphIo(err) => Some(err),
            GraphParse(err) => Some(err),
            UnknownNodeId(_) => None,
            InvalidBundleOp(_) => None,
            MalformedEdge { .. } => None,
            GraphInternalError(_) => None,
            Unimplemented(_) => None,
        }
    }
}
