//! Bidirectional breadth-first search.
//!
//! Two FIFO waves, one rooted at the start and one at the goal, expanded
//! alternately one node at a time. The first cell discovered by both sides
//! ends the search and the two half-paths are spliced there.
//!
//! First-meeting-wins is not guaranteed to be length-optimal (a proper
//! optimal stopping rule would compare frontier depths before returning);
//! the behavior is kept as-is because the returned paths are documented
//! output. Paths are always valid, just not always shortest.

use std::collections::HashMap;

use warren_core::{Dir, Grid, Point};

use crate::frontier::{Frontier, Policy};
use crate::node::{Node, NodeArena};
use crate::report::{SearchReport, Solution};
use crate::solve::{Algorithm, Episode, SearchError, SolveOptions};

/// One search wave: its frontier plus the discovered-cell map.
///
/// The map holds every discovered cell (frontier included), pointing at the
/// arena node that first reached it, so ancestry can be recovered from a
/// meeting cell on either side.
struct Wave {
    frontier: Frontier,
    seen: HashMap<Point, usize>,
}

impl Wave {
    fn rooted_at(pos: Point, arena: &mut NodeArena) -> Self {
        let root = arena.push(Node::root(pos, 0.0));
        let mut frontier = Frontier::new(Policy::Fifo);
        frontier.insert(root, arena.get(root));
        let mut seen = HashMap::new();
        seen.insert(pos, root);
        Self { frontier, seen }
    }
}

pub(crate) fn solve(grid: &Grid, opts: SolveOptions) -> Result<SearchReport, SearchError> {
    let mut episode = Episode::new(opts.capture_frames);
    let mut forward = Wave::rooted_at(grid.start(), &mut episode.arena);
    let mut backward = Wave::rooted_at(grid.goal(), &mut episode.arena);
    episode.snapshot(grid.start());

    let mut nbuf: Vec<(Dir, Point)> = Vec::with_capacity(4);
    while !forward.frontier.is_empty() && !backward.frontier.is_empty() {
        // One step of the start-rooted wave, checked against the goal side.
        if let Some((fwd, bwd)) =
            advance(grid, &mut episode, &mut forward, &backward, &mut nbuf)?
        {
            let solution = join(&episode.arena, fwd, bwd, grid.start());
            return Ok(episode.finish(solution));
        }
        // And one step of the goal-rooted wave.
        if let Some((bwd, fwd)) =
            advance(grid, &mut episode, &mut backward, &forward, &mut nbuf)?
        {
            let solution = join(&episode.arena, fwd, bwd, grid.start());
            return Ok(episode.finish(solution));
        }
    }
    Err(episode.no_solution(grid, Algorithm::Bidirectional, None))
}

/// Expand one node from `wave`. Returns `(own, other)` node ids when the
/// expanded cell was already discovered by the other wave.
fn advance(
    grid: &Grid,
    episode: &mut Episode,
    wave: &mut Wave,
    other: &Wave,
    nbuf: &mut Vec<(Dir, Point)>,
) -> Result<Option<(usize, usize)>, SearchError> {
    let id = wave.frontier.remove_next()?;
    let pos = episode.arena.get(id).pos;
    episode.explored.insert(pos);
    episode.expanded(pos);

    if let Some(&other_id) = other.seen.get(&pos) {
        return Ok(Some((id, other_id)));
    }

    let g = episode.arena.get(id).g;
    nbuf.clear();
    grid.neighbors(pos, nbuf);
    for &(action, next) in nbuf.iter() {
        if wave.seen.contains_key(&next) {
            continue;
        }
        let child = episode.arena.push(Node {
            pos: next,
            parent: Some(id),
            action: Some(action),
            g: g + 1,
            h: 0.0,
        });
        wave.seen.insert(next, child);
        wave.frontier.insert(child, episode.arena.get(child));
    }
    Ok(None)
}

/// Splice the two half-paths at the meeting cell into one start→goal path.
///
/// The goal-rooted chain was grown backwards, so each of its actions is
/// inverted while walking from the meeting cell down to the goal root.
/// Cells are then replayed from the start so both endpoints are included.
fn join(arena: &NodeArena, start_side: usize, goal_side: usize, start: Point) -> Solution {
    let mut actions = Vec::new();
    let mut cur = start_side;
    while let (Some(parent), Some(action)) = (arena.get(cur).parent, arena.get(cur).action) {
        actions.push(action);
        cur = parent;
    }
    actions.reverse();

    let mut cur = goal_side;
    while let (Some(parent), Some(action)) = (arena.get(cur).parent, arena.get(cur).action) {
        actions.push(action.opposite());
        cur = parent;
    }

    let mut cells = Vec::with_capacity(actions.len() + 1);
    let mut pos = start;
    cells.push(pos);
    for &action in &actions {
        pos = pos.step(action);
        cells.push(pos);
    }
    Solution { actions, cells }
}
