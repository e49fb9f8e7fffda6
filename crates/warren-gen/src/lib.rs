//! Random maze generation for the warren maze toolkit.
//!
//! Carves a perfect maze with randomized depth-first backtracking on a
//! half-resolution room grid (cells at even coordinates are rooms, odd
//! cells the walls between them), then knocks out a fraction of the
//! remaining interior walls so that several distinct routes exist between
//! most cell pairs. The carve guarantees every room is reachable from the
//! origin, and wall removal only ever adds edges, so every generated grid
//! is solvable.

use std::fmt;

use rand::Rng;
use warren_core::{Grid, GridError, Point};

/// Probability that an eligible interior wall is removed after carving,
/// checked independently for the horizontal and vertical pairings.
const EXTRA_PATH_CHANCE: f64 = 0.10;

// ---------------------------------------------------------------------------
// GenError
// ---------------------------------------------------------------------------

/// Errors from maze generation. Generation aborts entirely; no partially
/// carved grid is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenError {
    /// The half-resolution carve needs odd dimensions of at least 3.
    InvalidDimensions { width: i32, height: i32 },
    /// Carving produced no open cells. Unreachable with validated
    /// dimensions, checked anyway since dimensions come from outside.
    EmptyGrid { width: i32, height: i32 },
    /// The carved layout failed grid validation.
    Grid(GridError),
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => write!(
                f,
                "maze dimensions must be odd and at least 3, got {width}x{height}"
            ),
            Self::EmptyGrid { width, height } => {
                write!(f, "carving a {width}x{height} maze left no open cells")
            }
            Self::Grid(e) => write!(f, "generated grid failed validation: {e}"),
        }
    }
}

impl std::error::Error for GenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for GenError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

// ---------------------------------------------------------------------------
// MazeGen
// ---------------------------------------------------------------------------

/// Maze generator over a random source.
pub struct MazeGen<R: Rng> {
    pub rng: R,
}

impl<R: Rng> MazeGen<R> {
    /// Create a generator drawing from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate a solvable `width` × `height` maze with random start and
    /// goal cells.
    ///
    /// Dimensions must be odd and ≥ 3. When only a single open cell exists
    /// the goal coincides with the start (degenerate zero-length maze);
    /// otherwise start and goal are distinct.
    pub fn generate(&mut self, width: i32, height: i32) -> Result<Grid, GenError> {
        if width < 3 || height < 3 || width % 2 == 0 || height % 2 == 0 {
            return Err(GenError::InvalidDimensions { width, height });
        }
        let w = width as usize;
        let idx = |p: Point| p.y as usize * w + p.x as usize;

        let mut walls = vec![true; w * height as usize];
        let mut visited = vec![false; walls.len()];

        // Randomized depth-first carve over the even-indexed rooms, with an
        // explicit stack so depth stays bounded on large grids.
        let origin = Point::new(
            2 * self.rng.random_range(0..(width + 1) / 2),
            2 * self.rng.random_range(0..(height + 1) / 2),
        );
        walls[idx(origin)] = false;
        visited[idx(origin)] = true;
        let mut stack = vec![origin];
        let mut rooms: Vec<(Point, Point)> = Vec::with_capacity(4);

        while let Some(&cur) = stack.last() {
            rooms.clear();
            for (dx, dy) in [(2, 0), (-2, 0), (0, 2), (0, -2)] {
                let room = cur.shift(dx, dy);
                if room.x >= 0
                    && room.x < width
                    && room.y >= 0
                    && room.y < height
                    && !visited[idx(room)]
                {
                    // The odd cell between `cur` and `room`.
                    rooms.push((room, cur.shift(dx / 2, dy / 2)));
                }
            }
            if rooms.is_empty() {
                stack.pop();
                continue;
            }
            let (room, wall) = rooms[self.rng.random_range(0..rooms.len())];
            walls[idx(wall)] = false;
            walls[idx(room)] = false;
            visited[idx(room)] = true;
            stack.push(room);
        }

        // Break the perfect-maze property: open interior walls whose two
        // opposite neighbors are already open, with independent chances for
        // the horizontal and the vertical pairing.
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let p = Point::new(x, y);
                if !walls[idx(p)] {
                    continue;
                }
                if !walls[idx(p.shift(-1, 0))]
                    && !walls[idx(p.shift(1, 0))]
                    && self.rng.random::<f64>() < EXTRA_PATH_CHANCE
                {
                    walls[idx(p)] = false;
                }
                if !walls[idx(p.shift(0, -1))]
                    && !walls[idx(p.shift(0, 1))]
                    && self.rng.random::<f64>() < EXTRA_PATH_CHANCE
                {
                    walls[idx(p)] = false;
                }
            }
        }

        // Start and goal, uniform over the open cells.
        let mut open = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let p = Point::new(x, y);
                if !walls[idx(p)] {
                    open.push(p);
                }
            }
        }
        if open.is_empty() {
            return Err(GenError::EmptyGrid { width, height });
        }
        let start = open[self.rng.random_range(0..open.len())];
        let goal = if open.len() > 1 {
            loop {
                let candidate = open[self.rng.random_range(0..open.len())];
                if candidate != start {
                    break candidate;
                }
            }
        } else {
            start
        };

        log::debug!(
            "generated {width}x{height} maze: {} open cells, start {start}, goal {goal}",
            open.len()
        );
        Grid::from_parts(width, height, walls, start, goal).map_err(GenError::from)
    }
}

/// Generate a maze with the thread-local RNG.
pub fn generate(width: i32, height: i32) -> Result<Grid, GenError> {
    MazeGen::new(rand::rng()).generate(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use warren_search::{solve, Algorithm, SolveOptions};

    #[test]
    fn rejects_bad_dimensions() {
        for (w, h) in [(0, 9), (9, 0), (-3, 9), (4, 9), (9, 10), (1, 1), (2, 3)] {
            assert_eq!(
                generate(w, h),
                Err(GenError::InvalidDimensions {
                    width: w,
                    height: h
                })
            );
        }
    }

    #[test]
    fn smallest_maze_is_valid() {
        for _ in 0..20 {
            let g = generate(3, 3).unwrap();
            assert_eq!((g.width(), g.height()), (3, 3));
            assert!(g.is_open(g.start()));
            assert!(g.is_open(g.goal()));
        }
    }

    #[test]
    fn generated_mazes_are_solvable_with_distinct_endpoints() {
        // Connectivity must survive the wall-removal pass: every carve of a
        // 21×21 grid has a BFS path and distinct start/goal.
        let mut gen = MazeGen::new(rand::rng());
        for _ in 0..100 {
            let g = gen.generate(21, 21).unwrap();
            assert_ne!(g.start(), g.goal());
            let report = solve(&g, Algorithm::Bfs, SolveOptions::default())
                .expect("generated maze must be solvable");
            assert_eq!(report.solution.cells.first().copied(), Some(g.start()));
            assert_eq!(report.solution.cells.last().copied(), Some(g.goal()));
        }
    }

    #[test]
    fn every_open_cell_is_reachable_from_start() {
        // The perfect-maze carve reaches every room; extra openings only
        // add edges. BFS from the start must therefore cover all open cells.
        use std::collections::HashSet;
        use warren_core::{Dir, Point};

        let g = generate(15, 15).unwrap();
        let mut seen: HashSet<Point> = HashSet::new();
        let mut queue = vec![g.start()];
        seen.insert(g.start());
        let mut buf: Vec<(Dir, Point)> = Vec::with_capacity(4);
        while let Some(p) = queue.pop() {
            buf.clear();
            g.neighbors(p, &mut buf);
            for &(_, q) in &buf {
                if seen.insert(q) {
                    queue.push(q);
                }
            }
        }
        for cell in g.open_cells() {
            assert!(seen.contains(&cell), "unreachable open cell {cell}");
        }
    }
}
