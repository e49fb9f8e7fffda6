//! The search engine: one skeleton, five frontier policies.

use std::collections::HashSet;
use std::fmt;

use warren_core::{Dir, Grid, Point};

use crate::bidirectional;
use crate::distance::Heuristic;
use crate::frontier::{EmptyFrontierError, Frontier, Policy};
use crate::node::{Node, NodeArena};
use crate::report::{Frame, SearchReport, Solution};

// ---------------------------------------------------------------------------
// Algorithm
// ---------------------------------------------------------------------------

/// Search strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// Breadth-first search (FIFO frontier, minimal path cost).
    Bfs,
    /// Depth-first search (LIFO frontier, first path found).
    Dfs,
    /// Uniform-cost search (frontier ordered by g).
    Uniform,
    /// Greedy best-first search (frontier ordered by h).
    Greedy,
    /// A* (frontier ordered by f = g + h).
    AStar,
    /// Two breadth-first waves, one per endpoint, meeting in the middle.
    Bidirectional,
}

impl Algorithm {
    /// All algorithms, in presentation order.
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Uniform,
        Algorithm::Greedy,
        Algorithm::AStar,
        Algorithm::Bidirectional,
    ];

    /// Lowercase name, as accepted by [`from_name`](Self::from_name).
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Uniform => "uniform",
            Algorithm::Greedy => "greedy",
            Algorithm::AStar => "a*",
            Algorithm::Bidirectional => "bidirectional",
        }
    }

    /// Look an algorithm up by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    /// Whether this algorithm consults the heuristic parameter.
    pub const fn uses_heuristic(self) -> bool {
        matches!(self, Algorithm::Greedy | Algorithm::AStar)
    }

    /// Frontier removal policy driving this algorithm.
    pub(crate) const fn policy(self) -> Policy {
        match self {
            Algorithm::Bfs | Algorithm::Bidirectional => Policy::Fifo,
            Algorithm::Dfs => Policy::Lifo,
            Algorithm::Uniform => Policy::MinG,
            Algorithm::Greedy => Policy::MinH,
            Algorithm::AStar => Policy::MinF,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-solve knobs. The heuristic is consulted only by greedy and A*.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveOptions {
    pub heuristic: Heuristic,
    /// Record a [`Frame`] after every frontier removal.
    pub capture_frames: bool,
}

// ---------------------------------------------------------------------------
// SearchError
// ---------------------------------------------------------------------------

/// Errors from [`solve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// The frontier was exhausted without reaching the goal. A normal,
    /// recoverable outcome: the grid simply has no start→goal path.
    NoSolution {
        algorithm: Algorithm,
        /// The heuristic in effect, for algorithms that consult one.
        heuristic: Option<Heuristic>,
        width: i32,
        height: i32,
        states_expanded: usize,
    },
    /// Internal contract violation; correct engine code never produces it.
    EmptyFrontier(EmptyFrontierError),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSolution {
                algorithm,
                heuristic,
                width,
                height,
                states_expanded,
            } => {
                write!(f, "no path from start to goal: {algorithm}")?;
                if let Some(h) = heuristic {
                    write!(f, " ({h})")?;
                }
                write!(
                    f,
                    " on {width}x{height} grid, {states_expanded} states expanded"
                )
            }
            Self::EmptyFrontier(e) => write!(f, "search engine bug: {e}"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EmptyFrontier(e) => Some(e),
            Self::NoSolution { .. } => None,
        }
    }
}

impl From<EmptyFrontierError> for SearchError {
    fn from(e: EmptyFrontierError) -> Self {
        Self::EmptyFrontier(e)
    }
}

// ---------------------------------------------------------------------------
// Episode
// ---------------------------------------------------------------------------

/// Transient state of one solve call, constructed fresh every time so no
/// exploration state can leak between runs.
pub(crate) struct Episode {
    pub(crate) arena: NodeArena,
    pub(crate) explored: HashSet<Point>,
    pub(crate) states_expanded: usize,
    pub(crate) frames: Vec<Frame>,
    capture: bool,
}

impl Episode {
    pub(crate) fn new(capture: bool) -> Self {
        Self {
            arena: NodeArena::new(),
            explored: HashSet::new(),
            states_expanded: 0,
            frames: Vec::new(),
            capture,
        }
    }

    fn sorted_explored(&self) -> Vec<Point> {
        let mut cells: Vec<Point> = self.explored.iter().copied().collect();
        cells.sort();
        cells
    }

    /// Record a frame without counting an expansion (the pre-search state).
    pub(crate) fn snapshot(&mut self, current: Point) {
        if !self.capture {
            return;
        }
        self.frames.push(Frame {
            current,
            explored: self.sorted_explored(),
            solution: None,
        });
    }

    /// Count one frontier removal and record its frame.
    pub(crate) fn expanded(&mut self, current: Point) {
        self.states_expanded += 1;
        self.snapshot(current);
    }

    /// Seal the episode into a report, appending the solution frame.
    pub(crate) fn finish(mut self, solution: Solution) -> SearchReport {
        if self.capture {
            self.frames.push(Frame {
                current: solution.cells.last().copied().unwrap_or_default(),
                explored: self.sorted_explored(),
                solution: Some(solution.cells.clone()),
            });
        }
        SearchReport {
            path_cost: solution.len(),
            states_expanded: self.states_expanded,
            explored: self.explored,
            frames: self.frames,
            solution,
        }
    }

    pub(crate) fn no_solution(
        &self,
        grid: &Grid,
        algorithm: Algorithm,
        heuristic: Option<Heuristic>,
    ) -> SearchError {
        SearchError::NoSolution {
            algorithm,
            heuristic,
            width: grid.width(),
            height: grid.height(),
            states_expanded: self.states_expanded,
        }
    }
}

// ---------------------------------------------------------------------------
// solve
// ---------------------------------------------------------------------------

/// Solve `grid` with the given algorithm.
///
/// Returns the path plus exploration statistics, or
/// [`SearchError::NoSolution`] when no start→goal path exists. Each call is
/// an independent episode: repeated solves of the same grid with the same
/// options are deterministic.
pub fn solve(
    grid: &Grid,
    algorithm: Algorithm,
    opts: SolveOptions,
) -> Result<SearchReport, SearchError> {
    if algorithm == Algorithm::Bidirectional {
        return bidirectional::solve(grid, opts);
    }

    let heuristic = algorithm.uses_heuristic().then_some(opts.heuristic);
    let estimate =
        |p: Point| heuristic.map_or(0.0, |h| h.estimate(p, grid.goal()));

    let mut episode = Episode::new(opts.capture_frames);
    let mut frontier = Frontier::new(algorithm.policy());
    let root = episode
        .arena
        .push(Node::root(grid.start(), estimate(grid.start())));
    frontier.insert(root, episode.arena.get(root));
    episode.snapshot(grid.start());

    let mut nbuf: Vec<(Dir, Point)> = Vec::with_capacity(4);
    loop {
        if frontier.is_empty() {
            return Err(episode.no_solution(grid, algorithm, heuristic));
        }

        let id = frontier.remove_next()?;
        let pos = episode.arena.get(id).pos;
        episode.expanded(pos);

        if pos == grid.goal() {
            let solution = reconstruct(&episode.arena, id, grid.start());
            log::debug!(
                "{algorithm} found a {}-step path after {} expansions",
                solution.len(),
                episode.states_expanded
            );
            return Ok(episode.finish(solution));
        }

        episode.explored.insert(pos);

        let g = episode.arena.get(id).g;
        nbuf.clear();
        grid.neighbors(pos, &mut nbuf);
        for &(action, next) in &nbuf {
            if frontier.contains(next) || episode.explored.contains(&next) {
                continue;
            }
            let child = episode.arena.push(Node {
                pos: next,
                parent: Some(id),
                action: Some(action),
                g: g + 1,
                h: estimate(next),
            });
            frontier.insert(child, episode.arena.get(child));
        }
    }
}

/// Walk the parent chain from `id` back to the root and reverse it into a
/// start→goal path. `cells` spans both endpoints.
fn reconstruct(arena: &NodeArena, id: usize, start: Point) -> Solution {
    let mut actions = Vec::new();
    let mut cells = Vec::new();
    let mut cur = id;
    while let (Some(parent), Some(action)) =
        (arena.get(cur).parent, arena.get(cur).action)
    {
        actions.push(action);
        cells.push(arena.get(cur).pos);
        cur = parent;
    }
    cells.push(start);
    actions.reverse();
    cells.reverse();
    Solution { actions, cells }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use warren_core::Grid;

    pub(crate) fn grid(text: &str) -> Grid {
        Grid::parse(text).unwrap()
    }

    /// 5×5 fully open grid, start top-left, goal bottom-right.
    pub(crate) const OPEN5: &str = "A    \n     \n     \n     \n    B";

    /// Two routes of different length between A and B.
    pub(crate) const TWO_ROUTES: &str = "\
####
#A #
#  #
# B#
####";

    /// Assert a report is internally consistent and its path is walkable.
    pub(crate) fn assert_valid(g: &Grid, report: &SearchReport) {
        let s = &report.solution;
        assert_eq!(s.cells.len(), s.actions.len() + 1);
        assert_eq!(report.path_cost, s.actions.len());
        assert_eq!(s.cells.first().copied(), Some(g.start()));
        assert_eq!(s.cells.last().copied(), Some(g.goal()));
        for (i, &action) in s.actions.iter().enumerate() {
            assert_eq!(s.cells[i].step(action), s.cells[i + 1]);
            assert!(g.is_open(s.cells[i + 1]));
        }
        assert!(report.states_expanded >= report.path_cost + 1);
    }

    #[test]
    fn every_algorithm_solves_the_open_grid() {
        let g = grid(OPEN5);
        for algorithm in Algorithm::ALL {
            let report = solve(&g, algorithm, SolveOptions::default()).unwrap();
            assert_valid(&g, &report);
        }
    }

    #[test]
    fn astar_manhattan_is_optimal_on_the_open_grid() {
        let g = grid(OPEN5);
        let report = solve(&g, Algorithm::AStar, SolveOptions::default()).unwrap();
        assert_eq!(report.path_cost, 8);
        assert_valid(&g, &report);
    }

    #[test]
    fn optimal_algorithms_agree_on_minimal_cost() {
        let g = grid(TWO_ROUTES);
        let mut optimal = Vec::new();
        for algorithm in [Algorithm::Bfs, Algorithm::Uniform, Algorithm::AStar] {
            for heuristic in Heuristic::ALL {
                let opts = SolveOptions {
                    heuristic,
                    ..SolveOptions::default()
                };
                let report = solve(&g, algorithm, opts).unwrap();
                assert_valid(&g, &report);
                optimal.push(report.path_cost);
            }
        }
        assert!(optimal.iter().all(|&c| c == 3));

        // DFS and greedy must still return valid paths, just not
        // necessarily minimal ones.
        for algorithm in [Algorithm::Dfs, Algorithm::Greedy] {
            let report = solve(&g, algorithm, SolveOptions::default()).unwrap();
            assert_valid(&g, &report);
            assert!(report.path_cost >= 3);
        }
    }

    #[test]
    fn unsolvable_grid_reports_no_solution() {
        let g = grid("A#B");
        for algorithm in Algorithm::ALL {
            let err = solve(&g, algorithm, SolveOptions::default()).unwrap_err();
            match err {
                SearchError::NoSolution {
                    algorithm: a,
                    width,
                    height,
                    ..
                } => {
                    assert_eq!(a, algorithm);
                    assert_eq!((width, height), (3, 1));
                }
                other => panic!("expected NoSolution, got {other:?}"),
            }
        }
    }

    #[test]
    fn repeated_solves_are_deterministic() {
        let g = grid(TWO_ROUTES);
        for algorithm in Algorithm::ALL {
            let a = solve(&g, algorithm, SolveOptions::default()).unwrap();
            let b = solve(&g, algorithm, SolveOptions::default()).unwrap();
            assert_eq!(a.solution, b.solution, "{algorithm}");
            assert_eq!(a.states_expanded, b.states_expanded, "{algorithm}");
        }
    }

    #[test]
    fn start_equals_goal_yields_zero_length_solution() {
        // Only a generator can produce this shape; a parsed grid always has
        // distinct markers.
        let g = Grid::from_parts(1, 1, vec![false], Point::ZERO, Point::ZERO).unwrap();
        for algorithm in Algorithm::ALL {
            let report = solve(&g, algorithm, SolveOptions::default()).unwrap();
            assert!(report.solution.is_empty());
            assert_eq!(report.path_cost, 0);
            assert_eq!(report.solution.cells, vec![Point::ZERO]);
            assert!(report.states_expanded >= 1);
        }
    }

    #[test]
    fn corridor_expansion_count_is_tight() {
        // Straight corridor: BFS expands exactly the cells on the path.
        let g = grid("A  B");
        let report = solve(&g, Algorithm::Bfs, SolveOptions::default()).unwrap();
        assert_eq!(report.path_cost, 3);
        assert_eq!(report.states_expanded, 4);
        assert_eq!(
            report.solution.actions,
            vec![Dir::Right, Dir::Right, Dir::Right]
        );
    }

    #[test]
    fn frames_track_each_expansion() {
        let g = grid("A  B");
        let opts = SolveOptions {
            capture_frames: true,
            ..SolveOptions::default()
        };
        let report = solve(&g, Algorithm::Bfs, opts).unwrap();
        // One pre-search frame, one per removal, one solution frame.
        assert_eq!(report.frames.len(), report.states_expanded + 2);
        let first = &report.frames[0];
        assert!(first.explored.is_empty());
        assert_eq!(first.current, g.start());
        let last = report.frames.last().unwrap();
        assert_eq!(last.solution.as_deref(), Some(&report.solution.cells[..]));

        let silent = solve(&g, Algorithm::Bfs, SolveOptions::default()).unwrap();
        assert!(silent.frames.is_empty());
    }

    #[test]
    fn explored_set_matches_frames() {
        let g = grid(TWO_ROUTES);
        let opts = SolveOptions {
            capture_frames: true,
            ..SolveOptions::default()
        };
        let report = solve(&g, Algorithm::Bfs, opts).unwrap();
        let last = report.frames.last().unwrap();
        let mut expected: Vec<Point> = report.explored.iter().copied().collect();
        expected.sort();
        assert_eq!(last.explored, expected);
    }

    #[test]
    fn algorithm_names_round_trip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(Algorithm::from_name(algorithm.name()), Some(algorithm));
        }
        assert_eq!(Algorithm::from_name("dijkstra"), None);
    }
}
