//! The maze grid: wall layout, start and goal cells, neighbor enumeration.

use std::fmt;

use crate::geom::{Dir, Point};

/// A rectangular grid of open and blocked cells with one start and one goal.
///
/// Immutable after construction: a grid is built in one shot by [`parse`]
/// (from the text format) or [`from_parts`] (from a generator), validated,
/// and never mutated afterwards. Search episodes keep their own transient
/// state and only read the grid.
///
/// [`parse`]: Grid::parse
/// [`from_parts`]: Grid::from_parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    /// Row-major wall flags, `true` = blocked.
    walls: Vec<bool>,
    start: Point,
    goal: Point,
}

impl Grid {
    /// Parse a grid from its text serialization.
    ///
    /// One row per line: `'A'` marks the start, `'B'` the goal, `' '` an open
    /// cell, and any other character a wall. Rows shorter than the longest
    /// row are padded with open cells on the right. (That padding mirrors
    /// the historical format: a ragged file silently treats missing trailing
    /// cells as passable. Documented, deliberately not "fixed".)
    ///
    /// Fails unless the text contains exactly one `'A'` and exactly one `'B'`.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let rows: Vec<Vec<char>> = text.lines().map(|line| line.chars().collect()).collect();
        let height = rows.len() as i32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as i32;
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }

        let mut walls = Vec::with_capacity((width * height) as usize);
        let mut start = None;
        let mut goal = None;
        for (y, row) in rows.iter().enumerate() {
            for x in 0..width {
                let p = Point::new(x, y as i32);
                match row.get(x as usize).copied() {
                    Some('A') => {
                        if let Some(first) = start {
                            return Err(GridError::DuplicateStart { first, second: p });
                        }
                        start = Some(p);
                        walls.push(false);
                    }
                    Some('B') => {
                        if let Some(first) = goal {
                            return Err(GridError::DuplicateGoal { first, second: p });
                        }
                        goal = Some(p);
                        walls.push(false);
                    }
                    Some(' ') | None => walls.push(false),
                    Some(_) => walls.push(true),
                }
            }
        }

        let start = start.ok_or(GridError::NoStart)?;
        let goal = goal.ok_or(GridError::NoGoal)?;
        Self::from_parts(width, height, walls, start, goal)
    }

    /// Assemble a grid from raw parts, validating every invariant.
    ///
    /// `walls` is row-major and must hold exactly `width * height` flags;
    /// `start` and `goal` must be in bounds and open. No partially valid
    /// grid is ever returned.
    pub fn from_parts(
        width: i32,
        height: i32,
        walls: Vec<bool>,
        start: Point,
        goal: Point,
    ) -> Result<Self, GridError> {
        if width < 1 || height < 1 || walls.len() != (width as usize) * (height as usize) {
            return Err(GridError::BadDimensions { width, height });
        }
        let grid = Self {
            width,
            height,
            walls,
            start,
            goal,
        };
        for endpoint in [start, goal] {
            if !grid.contains(endpoint) {
                return Err(GridError::OutOfBounds {
                    pos: endpoint,
                    width,
                    height,
                });
            }
            if grid.walls[grid.idx(endpoint)] {
                return Err(GridError::Blocked { pos: endpoint });
            }
        }
        Ok(grid)
    }

    #[inline]
    fn idx(&self, p: Point) -> usize {
        (p.y * self.width + p.x) as usize
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The start cell.
    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    /// The goal cell.
    #[inline]
    pub fn goal(&self) -> Point {
        self.goal
    }

    /// Whether `p` lies within the grid bounds.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    /// Whether `p` is an in-bounds, unblocked cell.
    #[inline]
    pub fn is_open(&self, p: Point) -> bool {
        self.contains(p) && !self.walls[self.idx(p)]
    }

    /// Append the open neighbors of `p` to `buf` as `(action, position)`
    /// pairs, in the fixed order up, down, left, right. Out-of-bounds and
    /// walled cells are skipped. The caller clears `buf` between queries.
    pub fn neighbors(&self, p: Point, buf: &mut Vec<(Dir, Point)>) {
        for dir in Dir::ALL {
            let q = p.step(dir);
            if self.is_open(q) {
                buf.push((dir, q));
            }
        }
    }

    /// All open cells in row-major order.
    pub fn open_cells(&self) -> Vec<Point> {
        let mut cells = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let p = Point::new(x, y);
                if !self.walls[self.idx(p)] {
                    cells.push(p);
                }
            }
        }
        cells
    }

    /// Serialize back to the text format parsed by [`Grid::parse`].
    ///
    /// Walls are written as `'#'`; the result always round-trips.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let p = Point::new(x, y);
                let ch = if p == self.start {
                    'A'
                } else if p == self.goal {
                    'B'
                } else if self.walls[self.idx(p)] {
                    '#'
                } else {
                    ' '
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

// Serialize through the text format so deserialization runs the same
// validation as parsing; a hand-edited payload cannot smuggle in a grid
// that violates the construction invariants.
#[cfg(feature = "serde")]
impl serde::Serialize for Grid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Grid {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Grid::parse(&text).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// GridError
// ---------------------------------------------------------------------------

/// Errors from grid construction. Construction aborts entirely on the first
/// violation; no partially valid grid escapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// The serialized text had no rows or no columns.
    Empty,
    /// No `'A'` start marker.
    NoStart,
    /// No `'B'` goal marker.
    NoGoal,
    /// More than one `'A'` start marker.
    DuplicateStart { first: Point, second: Point },
    /// More than one `'B'` goal marker.
    DuplicateGoal { first: Point, second: Point },
    /// Dimensions not positive, or the wall buffer does not match them.
    BadDimensions { width: i32, height: i32 },
    /// A start or goal cell outside the grid.
    OutOfBounds { pos: Point, width: i32, height: i32 },
    /// A start or goal cell placed on a wall.
    Blocked { pos: Point },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "grid text has no cells"),
            Self::NoStart => write!(f, "grid must have exactly one start marker 'A', found none"),
            Self::NoGoal => write!(f, "grid must have exactly one goal marker 'B', found none"),
            Self::DuplicateStart { first, second } => {
                write!(f, "duplicate start marker 'A' at {second} (first at {first})")
            }
            Self::DuplicateGoal { first, second } => {
                write!(f, "duplicate goal marker 'B' at {second} (first at {first})")
            }
            Self::BadDimensions { width, height } => {
                write!(f, "invalid grid dimensions {width}x{height}")
            }
            Self::OutOfBounds { pos, width, height } => {
                write!(f, "cell {pos} outside {width}x{height} grid")
            }
            Self::Blocked { pos } => write!(f, "start/goal cell {pos} is a wall"),
        }
    }
}

impl std::error::Error for GridError {}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "\
#####
#A  #
# # #
#  B#
#####";

    #[test]
    fn parse_small_grid() {
        let g = Grid::parse(SMALL).unwrap();
        assert_eq!(g.width(), 5);
        assert_eq!(g.height(), 5);
        assert_eq!(g.start(), Point::new(1, 1));
        assert_eq!(g.goal(), Point::new(3, 3));
        assert!(g.is_open(Point::new(2, 1)));
        assert!(!g.is_open(Point::new(2, 2)));
        assert!(!g.is_open(Point::new(-1, 0)));
    }

    #[test]
    fn short_lines_pad_as_open_cells() {
        // Second row is two characters short of the longest; the missing
        // trailing cells are read as open space.
        let g = Grid::parse("A#\n#\n##B").unwrap();
        assert_eq!(g.width(), 3);
        assert_eq!(g.height(), 3);
        assert!(g.is_open(Point::new(1, 1)));
        assert!(g.is_open(Point::new(2, 0)));
        assert!(g.is_open(Point::new(2, 1)));
        assert!(!g.is_open(Point::new(1, 0)));
    }

    #[test]
    fn missing_markers_are_rejected() {
        assert_eq!(Grid::parse("# #\n#B#"), Err(GridError::NoStart));
        assert_eq!(Grid::parse("#A#\n# #"), Err(GridError::NoGoal));
        assert_eq!(Grid::parse(""), Err(GridError::Empty));
    }

    #[test]
    fn duplicate_markers_are_rejected() {
        assert_eq!(
            Grid::parse("AAB"),
            Err(GridError::DuplicateStart {
                first: Point::new(0, 0),
                second: Point::new(1, 0),
            })
        );
        assert_eq!(
            Grid::parse("AB\nB#"),
            Err(GridError::DuplicateGoal {
                first: Point::new(1, 0),
                second: Point::new(0, 1),
            })
        );
    }

    #[test]
    fn neighbors_in_fixed_order() {
        // Open cross around (2, 2): all four neighbors open.
        let g = Grid::parse("#####\n#A  #\n#   #\n#  B#\n#####").unwrap();
        let mut buf = Vec::new();
        g.neighbors(Point::new(2, 2), &mut buf);
        assert_eq!(
            buf,
            vec![
                (Dir::Up, Point::new(2, 1)),
                (Dir::Down, Point::new(2, 3)),
                (Dir::Left, Point::new(1, 2)),
                (Dir::Right, Point::new(3, 2)),
            ]
        );
    }

    #[test]
    fn neighbors_skip_walls_and_bounds() {
        let g = Grid::parse(SMALL).unwrap();
        let mut buf = Vec::new();
        // Corner start: up and left are walls.
        g.neighbors(g.start(), &mut buf);
        assert_eq!(
            buf,
            vec![
                (Dir::Down, Point::new(1, 2)),
                (Dir::Right, Point::new(2, 1)),
            ]
        );
    }

    #[test]
    fn from_parts_validates_endpoints() {
        let walls = vec![false, true, false, false];
        let err = Grid::from_parts(2, 2, walls.clone(), Point::new(1, 0), Point::new(0, 1));
        assert_eq!(
            err,
            Err(GridError::Blocked {
                pos: Point::new(1, 0)
            })
        );
        let err = Grid::from_parts(2, 2, walls.clone(), Point::new(0, 0), Point::new(2, 1));
        assert_eq!(
            err,
            Err(GridError::OutOfBounds {
                pos: Point::new(2, 1),
                width: 2,
                height: 2,
            })
        );
        assert_eq!(
            Grid::from_parts(2, 0, Vec::new(), Point::ZERO, Point::ZERO),
            Err(GridError::BadDimensions {
                width: 2,
                height: 0
            })
        );
    }

    #[test]
    fn text_round_trip() {
        let g = Grid::parse(SMALL).unwrap();
        let back = Grid::parse(&g.to_text()).unwrap();
        assert_eq!(g, back);
    }
}
