// Copyright (c) The bungee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The decomposition tree: a record of how a reduced graph was built.
//!
//! Every node that survives reduction maps to a subtree whose leaves are
//! nodes of the original input graph. The tree is an arena of tagged
//! records: `Chain` children are ordered on an intrusive sibling list with
//! head and tail pointers, `Split` children are an unordered list, and
//! `Source`/`Epsilon` are leaves. The arena owns every record and frees the
//! whole run's tree as one unit when dropped.

use crate::handle::NodeId;
use smallvec::SmallVec;
use std::collections::HashSet;
use std::fmt;

/// Index of a node in a [`DecompositionTree`] arena.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DecompIx(u32);

impl fmt::Display for DecompIx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The variants of a decomposition-tree node.
#[derive(Clone, Debug)]
pub enum DecompKind {
    /// A leaf corresponding to a node of the original input graph.
    Source,
    /// A zero-length sentinel carrying a collapsed edge with no intermediate
    /// sequence.
    Epsilon,
    /// A derived node whose children are ordered as a sibling chain.
    Chain {
        /// First child in the chain.
        head: Option<DecompIx>,
        /// Last child in the chain.
        tail: Option<DecompIx>,
    },
    /// A derived node whose children are mutually independent.
    Split {
        /// The unordered children.
        children: SmallVec<[DecompIx; 4]>,
    },
}

/// One record in the decomposition tree.
#[derive(Clone, Debug)]
pub struct DecompNode {
    /// Id of the source or derived graph node this record represents.
    pub nid: NodeId,
    /// Orientation this record is currently read in.
    pub is_reverse: bool,
    /// Set when the collapse that produced this node swallowed a self-cycle.
    pub scycle: bool,
    /// Self-inversions swallowed on the relative left and right.
    pub sinv: [bool; 2],
    parent: Option<DecompIx>,
    sibling: Option<DecompIx>,
    kind: DecompKind,
}

impl DecompNode {
    fn new(nid: NodeId, kind: DecompKind) -> Self {
        DecompNode {
            nid,
            is_reverse: false,
            scycle: false,
            sinv: [false, false],
            parent: None,
            sibling: None,
            kind,
        }
    }

    /// The parent of this node, if it has been attached to one.
    pub fn parent(&self) -> Option<DecompIx> {
        self.parent
    }

    /// The next sibling on a chain, if any.
    pub fn sibling(&self) -> Option<DecompIx> {
        self.sibling
    }

    /// The variant of this node.
    pub fn kind(&self) -> &DecompKind {
        &self.kind
    }
}

/// An arena of decomposition-tree nodes.
#[derive(Clone, Debug, Default)]
pub struct DecompositionTree {
    nodes: Vec<Option<DecompNode>>,
    free: Vec<DecompIx>,
}

impl DecompositionTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of live nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Returns true if the arena holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrows a node.
    ///
    /// # Panics
    ///
    /// Panics if the index refers to a released record.
    pub fn node(&self, ix: DecompIx) -> &DecompNode {
        self.nodes[ix.0 as usize]
            .as_ref()
            .expect("stale decomposition index")
    }

    fn node_mut(&mut self, ix: DecompIx) -> &mut DecompNode {
        self.nodes[ix.0 as usize]
            .as_mut()
            .expect("stale decomposition index")
    }

    /// Creates a leaf for a node of the original graph.
    pub fn make_source(&mut self, nid: NodeId) -> DecompIx {
        self.alloc(DecompNode::new(nid, DecompKind::Source))
    }

    /// Creates a zero-length sentinel for a collapsed edge.
    pub fn make_epsilon(&mut self, nid: NodeId) -> DecompIx {
        self.alloc(DecompNode::new(nid, DecompKind::Epsilon))
    }

    /// Creates a chain over `first` then `second`.
    ///
    /// An argument that is itself a chain donates its children in order and
    /// its emptied shell is released, so nested chains stay flat.
    pub fn make_chain(&mut self, nid: NodeId, first: DecompIx, second: DecompIx) -> DecompIx {
        let chain = self.alloc(DecompNode::new(
            nid,
            DecompKind::Chain {
                head: None,
                tail: None,
            },
        ));
        for part in [first, second] {
            let donated_head = match self.node(part).kind() {
                DecompKind::Chain { head, .. } => Some(*head),
                _ => None,
            };
            if let Some(head) = donated_head {
                let mut cursor = head;
                while let Some(child) = cursor {
                    let next = self.node(child).sibling;
                    self.push_back(chain, child);
                    cursor = next;
                }
                self.release(part);
            } else {
                self.push_back(chain, part);
            }
        }
        chain
    }

    /// Creates a split over an unordered set of children.
    pub fn make_split(&mut self, nid: NodeId, children: Vec<DecompIx>) -> DecompIx {
        let split = self.alloc(DecompNode::new(
            nid,
            DecompKind::Split {
                children: SmallVec::from_vec(children.clone()),
            },
        ));
        for child in children {
            self.node_mut(child).parent = Some(split);
        }
        split
    }

    /// Appends a child at the tail of a chain.
    pub fn push_back(&mut self, chain: DecompIx, child: DecompIx) {
        let (head, tail) = self.chain_ends(chain);
        self.node_mut(child).parent = Some(chain);
        self.node_mut(child).sibling = None;
        match tail {
            Some(tail) => {
                self.node_mut(tail).sibling = Some(child);
                self.set_chain_ends(chain, head, Some(child));
            }
            None => self.set_chain_ends(chain, Some(child), Some(child)),
        }
    }

    /// Prepends a child at the head of a chain.
    pub fn push_front(&mut self, chain: DecompIx, child: DecompIx) {
        let (head, tail) = self.chain_ends(chain);
        self.node_mut(child).parent = Some(chain);
        self.node_mut(child).sibling = None;
        match head {
            Some(head) => {
                self.node_mut(child).sibling = Some(head);
                self.set_chain_ends(chain, Some(child), tail);
            }
            None => self.set_chain_ends(chain, Some(child), Some(child)),
        }
    }

    /// Reverses the subtree rooted at `ix` in place.
    ///
    /// Chains reverse their sibling list and swap head and tail; every
    /// descendant toggles its orientation. Self-relation flags are left
    /// untouched. Applying this twice restores the original structure.
    pub fn reverse(&mut self, ix: DecompIx) {
        let mut stack = vec![ix];
        while let Some(current) = stack.pop() {
            match self.node(current).kind.clone() {
                DecompKind::Chain { head, tail } => {
                    // In-place linked-list reversal of the sibling chain.
                    let mut previous = None;
                    let mut cursor = head;
                    while let Some(child) = cursor {
                        let next = self.node(child).sibling;
                        self.node_mut(child).sibling = previous;
                        previous = Some(child);
                        stack.push(child);
                        cursor = next;
                    }
                    self.node_mut(current).kind = DecompKind::Chain {
                        head: tail,
                        tail: head,
                    };
                }
                DecompKind::Split { children } => {
                    stack.extend(children);
                }
                DecompKind::Source | DecompKind::Epsilon => {}
            }
            let node = self.node_mut(current);
            node.is_reverse = !node.is_reverse;
        }
    }

    /// Finds the closest common ancestor of two nodes, if they share one.
    pub fn find_lca(&self, a: DecompIx, b: DecompIx) -> Option<DecompIx> {
        let mut seen = HashSet::new();
        let mut cursor = Some(a);
        while let Some(ix) = cursor {
            seen.insert(ix);
            cursor = self.node(ix).parent;
        }
        let mut cursor = Some(b);
        while let Some(ix) = cursor {
            if seen.contains(&ix) {
                return Some(ix);
            }
            cursor = self.node(ix).parent;
        }
        None
    }

    /// Marks the node as having swallowed a self-cycle.
    pub fn set_self_cycle(&mut self, ix: DecompIx) {
        self.node_mut(ix).scycle = true;
    }

    /// Marks the node as having swallowed a self-inversion on its relative
    /// left or right.
    pub fn set_self_inversion(&mut self, ix: DecompIx, right: bool) {
        self.node_mut(ix).sinv[right as usize] = true;
    }

    /// Iterates over the children of a chain, head to tail. Empty for other
    /// node kinds.
    pub fn chain_children(&self, ix: DecompIx) -> ChainChildren<'_> {
        let cursor = match self.node(ix).kind() {
            DecompKind::Chain { head, .. } => *head,
            _ => None,
        };
        ChainChildren { tree: self, cursor }
    }

    /// The children of a split. Empty for other node kinds.
    pub fn split_children(&self, ix: DecompIx) -> &[DecompIx] {
        match self.node(ix).kind() {
            DecompKind::Split { children } => &children[..],
            _ => &[],
        }
    }

    fn chain_ends(&self, chain: DecompIx) -> (Option<DecompIx>, Option<DecompIx>) {
        match self.node(chain).kind() {
            DecompKind::Chain { head, tail } => (*head, *tail),
            _ => panic!("chain operation on a non-chain node"),
        }
    }

    fn set_chain_ends(&mut self, chain: DecompIx, head: Option<DecompIx>, tail: Option<DecompIx>) {
        self.node_mut(chain).kind = DecompKind::Chain { head, tail };
    }

    fn alloc(&mut self, node: DecompNode) -> DecompIx {
        match self.free.pop() {
            Some(ix) => {
                self.nodes[ix.0 as usize] = Some(node);
                ix
            }
            None => {
                let ix = DecompIx(self.nodes.len() as u32);
                self.nodes.push(Some(node));
                ix
            }
        }
    }

    fn release(&mut self, ix: DecompIx) {
        self.nodes[ix.0 as usize] = None;
        self.free.push(ix);
    }
}

/// Iterator over the sibling chain of a `Chain` node.
pub struct ChainChildren<'a> {
    tree: &'a DecompositionTree,
    cursor: Option<DecompIx>,
}

impl<'a> Iterator for ChainChildren<'a> {
    type Item = DecompIx;

    fn next(&mut self) -> Option<DecompIx> {
        let current = self.cursor?;
        self.cursor = self.tree.node(current).sibling;
        Some(current)
    }
}
