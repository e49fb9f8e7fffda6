//! Batch comparison of every algorithm/heuristic pairing over a set of
//! maze files.

use std::error::Error;
use std::fs;
use std::time::Instant;

use warren_core::Grid;
use warren_search::{solve, Algorithm, Heuristic, SearchError, SolveOptions};

/// One measured solve.
struct Row {
    maze: String,
    algorithm: Algorithm,
    heuristic: Option<Heuristic>,
    seconds: f64,
    states_expanded: usize,
    /// `None` when the maze had no solution.
    path_cost: Option<usize>,
}

/// Run every algorithm (and, for greedy/A*, every heuristic) over each maze
/// file, print a summary table, and optionally write it as CSV.
pub fn run(paths: &[String], csv_out: Option<&str>) -> Result<(), Box<dyn Error>> {
    let mut rows = Vec::new();
    for path in paths {
        let text = fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
        let grid = Grid::parse(&text).map_err(|e| format!("{path}: {e}"))?;
        log::info!("comparing algorithms on {path}");
        for algorithm in Algorithm::ALL {
            let heuristics: &[Option<Heuristic>] = if algorithm.uses_heuristic() {
                &[
                    Some(Heuristic::Manhattan),
                    Some(Heuristic::Euclidean),
                    Some(Heuristic::Chebyshev),
                ]
            } else {
                &[None]
            };
            for &heuristic in heuristics {
                let opts = SolveOptions {
                    heuristic: heuristic.unwrap_or_default(),
                    capture_frames: false,
                };
                let started = Instant::now();
                let outcome = solve(&grid, algorithm, opts);
                let seconds = started.elapsed().as_secs_f64();
                let (states_expanded, path_cost) = match outcome {
                    Ok(report) => (report.states_expanded, Some(report.path_cost)),
                    Err(SearchError::NoSolution {
                        states_expanded, ..
                    }) => (states_expanded, None),
                    Err(e) => return Err(e.into()),
                };
                rows.push(Row {
                    maze: path.clone(),
                    algorithm,
                    heuristic,
                    seconds,
                    states_expanded,
                    path_cost,
                });
            }
        }
    }

    print!("{}", table(&rows));
    if let Some(out) = csv_out {
        fs::write(out, csv(&rows)).map_err(|e| format!("{out}: {e}"))?;
        println!("comparison data saved to {out}");
    }
    Ok(())
}

fn heuristic_name(h: Option<Heuristic>) -> &'static str {
    h.map_or("-", Heuristic::name)
}

fn table(rows: &[Row]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<24} {:<14} {:<10} {:>10} {:>9} {:>6}\n",
        "maze", "algorithm", "heuristic", "time (s)", "expanded", "cost"
    ));
    for row in rows {
        let cost = row
            .path_cost
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        out.push_str(&format!(
            "{:<24} {:<14} {:<10} {:>10.6} {:>9} {:>6}\n",
            row.maze,
            row.algorithm.name(),
            heuristic_name(row.heuristic),
            row.seconds,
            row.states_expanded,
            cost
        ));
    }
    out
}

fn csv(rows: &[Row]) -> String {
    let mut out = String::from("maze,algorithm,heuristic,time_s,states_expanded,path_cost\n");
    for row in rows {
        let cost = row
            .path_cost
            .map_or_else(|| "no solution".to_string(), |c| c.to_string());
        out.push_str(&format!(
            "{},{},{},{:.6},{},{}\n",
            row.maze,
            row.algorithm.name(),
            heuristic_name(row.heuristic),
            row.seconds,
            row.states_expanded,
            cost
        ));
    }
    out
}
