//! ASCII rendering of grids with exploration overlays.

use std::collections::HashSet;

use warren_core::{Grid, Point};
use warren_search::SearchReport;

/// Render `grid` as text: `█` walls, `A`/`B` endpoints, and, when a report
/// is given, `*` for solution cells and `.` for explored cells.
pub fn render(grid: &Grid, report: Option<&SearchReport>) -> String {
    let solution: Option<HashSet<Point>> =
        report.map(|r| r.solution.cells.iter().copied().collect());
    let mut out = String::new();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let p = Point::new(x, y);
            let ch = if !grid.is_open(p) {
                '█'
            } else if p == grid.start() {
                'A'
            } else if p == grid.goal() {
                'B'
            } else if solution.as_ref().is_some_and(|s| s.contains(&p)) {
                '*'
            } else if report.is_some_and(|r| r.explored.contains(&p)) {
                '.'
            } else {
                ' '
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use warren_search::{solve, Algorithm, SolveOptions};

    #[test]
    fn bare_grid_renders_walls_and_endpoints() {
        let grid = Grid::parse("#A#\n# #\n#B#").unwrap();
        assert_eq!(render(&grid, None), "█A█\n█ █\n█B█\n");
    }

    #[test]
    fn report_overlays_solution_cells() {
        let grid = Grid::parse("A  B").unwrap();
        let report = solve(&grid, Algorithm::Bfs, SolveOptions::default()).unwrap();
        assert_eq!(render(&grid, Some(&report)), "A**B\n");
    }
}
