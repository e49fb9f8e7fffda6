//! Episode results: the solution path, statistics, and captured frames.

use std::collections::HashSet;

use warren_core::{Dir, Point};

/// A start-to-goal path.
///
/// `cells` includes both endpoints, so `cells.len() == actions.len() + 1`
/// and a zero-length solution (start equals goal) is `actions: []`,
/// `cells: [start]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Actions taken, in order, from start to goal.
    pub actions: Vec<Dir>,
    /// Cells visited, start and goal inclusive.
    pub cells: Vec<Point>,
}

impl Solution {
    /// Number of steps (the path cost).
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether start and goal coincide.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Snapshot taken after one frontier removal, for renderers and exporters.
///
/// Walls, start, and goal come from the [`Grid`](warren_core::Grid) itself;
/// a frame only carries what changes during the episode. `explored` is
/// sorted row-major so identical searches produce identical frame streams.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    /// Cell whose node was just removed from the frontier.
    pub current: Point,
    /// Every cell explored so far, sorted row-major.
    pub explored: Vec<Point>,
    /// The solution overlay; only present on the final frame.
    pub solution: Option<Vec<Point>>,
}

/// Everything one solve episode produced.
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// The path found.
    pub solution: Solution,
    /// Steps in `solution` (`solution.len()`).
    pub path_cost: usize,
    /// Frontier removals performed during the episode.
    pub states_expanded: usize,
    /// Cells whose neighbors were examined.
    pub explored: HashSet<Point>,
    /// Per-expansion snapshots; empty unless frame capture was requested.
    pub frames: Vec<Frame>,
}
