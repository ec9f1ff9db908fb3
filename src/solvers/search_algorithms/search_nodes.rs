//! Search nodes for state space search.

mod closed_table;
mod node_order;

pub use closed_table::ClosedTable;
pub use node_order::{FrontierKey, NodeOrder};

use std::collections::TryReserveError;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Stable index of a node in a `NodeArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Search node.
///
/// `P` is the packed fingerprint of the state and `O` is the operator type.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchNode<P, O> {
    /// Cost of the best known path from the initial state.
    pub g: f64,
    /// Heuristic estimate of the cost to a goal.
    pub h: f64,
    /// Estimate of the number of operators to a goal.
    pub d: f64,
    /// Fingerprint of the state.
    pub packed: P,
    /// Operator generating the node.
    pub op: Option<O>,
    /// Reverse of the generating operator.
    pub reverse_op: Option<O>,
    /// Parent node.
    pub parent: Option<NodeId>,
    heap_index: Option<usize>,
}

impl<P, O> SearchNode<P, O> {
    /// Creates a root node.
    pub fn root(h: f64, d: f64, packed: P) -> Self {
        Self {
            g: 0.0,
            h,
            d,
            packed,
            op: None,
            reverse_op: None,
            parent: None,
            heap_index: None,
        }
    }

    /// Creates a node generated from `parent` by `op`.
    pub fn child(
        g: f64,
        h: f64,
        d: f64,
        packed: P,
        op: O,
        reverse_op: Option<O>,
        parent: NodeId,
    ) -> Self {
        Self {
            g,
            h,
            d,
            packed,
            op: Some(op),
            reverse_op,
            parent: Some(parent),
            heap_index: None,
        }
    }

    /// Returns g + h.
    #[inline]
    pub fn f(&self) -> f64 {
        self.g + self.h
    }

    /// Returns whether the node is in a frontier.
    #[inline]
    pub fn is_in_frontier(&self) -> bool {
        self.heap_index.is_some()
    }

    /// Replaces the path to the node by a cheaper one through `parent`.
    pub fn splice(&mut self, g: f64, op: O, reverse_op: Option<O>, parent: NodeId) {
        self.g = g;
        self.op = Some(op);
        self.reverse_op = reverse_op;
        self.parent = Some(parent);
    }
}

/// Failure to store a node in the arena, the frontier, or the closed table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaFull {
    /// The configured node limit is reached.
    NodeLimit(usize),
    /// The allocator refused to grow the storage.
    Allocation,
}

impl From<TryReserveError> for ArenaFull {
    fn from(_: TryReserveError) -> Self {
        Self::Allocation
    }
}

/// Storage of search nodes addressed by `NodeId`.
pub struct NodeArena<P, O> {
    nodes: Vec<SearchNode<P, O>>,
    node_limit: Option<usize>,
}

impl<P, O> Default for NodeArena<P, O> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            node_limit: None,
        }
    }
}

impl<P, O> NodeArena<P, O> {
    /// Creates an arena holding at most `node_limit` nodes.
    pub fn with_node_limit(node_limit: Option<usize>) -> Self {
        Self {
            nodes: Vec::new(),
            node_limit,
        }
    }

    /// Adds a node and returns its id.
    pub fn push(&mut self, node: SearchNode<P, O>) -> Result<NodeId, ArenaFull> {
        if let Some(limit) = self.node_limit {
            if self.nodes.len() >= limit {
                return Err(ArenaFull::NodeLimit(limit));
            }
        }

        self.nodes.try_reserve(1)?;
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);

        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&SearchNode<P, O>> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Returns the ids of the nodes from the root to the given node.
    pub fn get_path(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = self[id].parent;

        while let Some(parent) = current {
            path.push(parent);
            current = self[parent].parent;
        }

        path.reverse();

        path
    }

    pub(crate) fn heap_index(&self, id: NodeId) -> Option<usize> {
        self.nodes[id.0].heap_index
    }

    pub(crate) fn set_heap_index(&mut self, id: NodeId, index: Option<usize>) {
        self.nodes[id.0].heap_index = index;
    }
}

impl<P, O> Index<NodeId> for NodeArena<P, O> {
    type Output = SearchNode<P, O>;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

impl<P, O> IndexMut<NodeId> for NodeArena<P, O> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.nodes[id.0]
    }
}
