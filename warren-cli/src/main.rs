//! warren — solve, generate, and compare mazes from the command line.

mod compare;
mod render;

use std::env;
use std::error::Error;
use std::fs;
use std::process::ExitCode;
use std::time::Instant;

use warren_core::Grid;
use warren_search::{solve, Algorithm, Heuristic, SearchError, SolveOptions};

const USAGE: &str = "\
usage:
  warren solve <algorithm> [<heuristic>] <maze.txt>...
  warren gen <width> <height> [<out.txt>]
  warren compare [--csv <out.csv>] <maze.txt>...

algorithms: bfs dfs uniform greedy a* bidirectional
heuristics: manhattan euclidean chebyshev (greedy and a* only)";

fn usage() -> Box<dyn Error> {
    USAGE.into()
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("warren: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    match args.first().map(String::as_str) {
        Some("solve") => cmd_solve(&args[1..]),
        Some("gen") => cmd_gen(&args[1..]),
        Some("compare") => cmd_compare(&args[1..]),
        _ => Err(usage()),
    }
}

fn cmd_solve(args: &[String]) -> Result<(), Box<dyn Error>> {
    let mut rest = args.iter();
    let name = rest.next().ok_or_else(usage)?;
    let algorithm =
        Algorithm::from_name(name).ok_or_else(|| format!("unknown algorithm '{name}'\n{USAGE}"))?;
    let heuristic = if algorithm.uses_heuristic() {
        let name = rest.next().ok_or_else(usage)?;
        Heuristic::from_name(name)
            .ok_or_else(|| format!("unknown heuristic '{name}'\n{USAGE}"))?
    } else {
        Heuristic::default()
    };
    let paths: Vec<&String> = rest.collect();
    if paths.is_empty() {
        return Err(usage());
    }

    for path in paths {
        let text = fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
        let grid = Grid::parse(&text).map_err(|e| format!("{path}: {e}"))?;
        println!("{path}:");
        print!("{}", render::render(&grid, None));
        let opts = SolveOptions {
            heuristic,
            capture_frames: false,
        };
        let started = Instant::now();
        match solve(&grid, algorithm, opts) {
            Ok(report) => {
                println!("time: {:.6}s", started.elapsed().as_secs_f64());
                println!("states expanded: {}", report.states_expanded);
                println!("path cost: {}", report.path_cost);
                print!("{}", render::render(&grid, Some(&report)));
            }
            // An unsolvable maze is an answer, not a failure.
            Err(e @ SearchError::NoSolution { .. }) => println!("{e}"),
            Err(e) => return Err(e.into()),
        }
        println!();
    }
    Ok(())
}

fn cmd_gen(args: &[String]) -> Result<(), Box<dyn Error>> {
    let width: i32 = args
        .first()
        .ok_or_else(usage)?
        .parse()
        .map_err(|_| usage())?;
    let height: i32 = args.get(1).ok_or_else(usage)?.parse().map_err(|_| usage())?;
    let grid = warren_gen::generate(width, height)?;
    print!("{}", render::render(&grid, None));
    if let Some(path) = args.get(2) {
        fs::write(path, grid.to_text()).map_err(|e| format!("{path}: {e}"))?;
        println!("maze saved to {path}");
    }
    Ok(())
}

fn cmd_compare(args: &[String]) -> Result<(), Box<dyn Error>> {
    let mut csv_out = None;
    let mut paths = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--csv" {
            csv_out = Some(iter.next().ok_or_else(usage)?.as_str());
        } else {
            paths.push(arg.clone());
        }
    }
    if paths.is_empty() {
        return Err(usage());
    }
    compare::run(&paths, csv_out)
}
