//! Search-tree nodes and the per-episode arena.

use warren_core::{Dir, Point};

/// One discovered state in the search tree.
///
/// Immutable once pushed into the arena. The parent link is an arena index,
/// so ancestry is shared structurally and cycles are impossible by
/// construction: a node can only point at nodes pushed before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// Grid cell this node stands on.
    pub pos: Point,
    /// Arena index of the generating node; `None` for a search root.
    pub parent: Option<usize>,
    /// Action taken from the parent to reach this cell; `None` for a root.
    pub action: Option<Dir>,
    /// Accumulated unit-step cost from the root (g).
    pub g: i32,
    /// Heuristic estimate of remaining cost (h); `0.0` when the algorithm
    /// does not consult a heuristic.
    pub h: f64,
}

impl Node {
    /// A search root at `pos` with the given heuristic estimate.
    pub fn root(pos: Point, h: f64) -> Self {
        Self {
            pos,
            parent: None,
            action: None,
            g: 0,
            h,
        }
    }

    /// Total estimated cost through this node (f = g + h), the A* ordering
    /// key.
    #[inline]
    pub fn f(&self) -> f64 {
        f64::from(self.g) + self.h
    }
}

/// Arena owning every node discovered during one solve episode.
///
/// Nodes are addressed by the index returned from [`push`](Self::push) and
/// are dropped together when the episode ends.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node, returning its index.
    pub fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Borrow the node at `id`.
    ///
    /// # Panics
    /// If `id` was not returned by this arena's [`push`](Self::push).
    #[inline]
    pub fn get(&self, id: usize) -> &Node {
        &self.nodes[id]
    }

    /// Number of nodes created so far this episode.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node has been created yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
