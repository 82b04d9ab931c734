mod astar;
mod bfs;
mod dfs;
mod dijkstra;
mod gol;

use std::str::FromStr;

use crate::error::{Error, Invariant, Result};
use crate::grid::Grid;

use astar::{Ranking, solve_best_first};
use bfs::solve_bfs;
use dfs::solve_dfs;
use dijkstra::solve_dijkstra;
use gol::solve_gol;

/// One cell whose wall state flips between two Game of Life generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GolChange {
    pub index: usize,
    pub becomes_wall: bool,
}

/// One atomic, replayable visualization event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Cell entered the closed set.
    Visited { index: usize },
    /// Cell's tentative cost or parent changed.
    Updated { index: usize },
    /// Reconstructed path from start to finish, empty if unreachable.
    Finish { path: Vec<usize> },
    /// Wall changes of one simulated generation.
    GolGeneration { changes: Vec<GolChange> },
}

impl Step {
    /// Every cell index the step touches.
    pub fn indices(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        match self {
            Step::Visited { index } | Step::Updated { index } => {
                Box::new(std::iter::once(*index))
            }
            Step::Finish { path } => Box::new(path.iter().copied()),
            Step::GolGeneration { changes } => Box::new(changes.iter().map(|c| c.index)),
        }
    }
}

/// The complete, ordered output of one algorithm run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepTrace {
    steps: Vec<Step>,
}

impl StepTrace {
    pub fn new(steps: Vec<Step>) -> Self {
        StepTrace { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Step> {
        self.steps.get(position)
    }

    /// The path carried by the terminal `Finish` step, if the trace has one.
    pub fn path(&self) -> Option<&[usize]> {
        self.steps.iter().rev().find_map(|step| match step {
            Step::Finish { path } => Some(path.as_slice()),
            _ => None,
        })
    }

    /// Whether the search ended without reaching the finish.
    /// A path of a single cell (start == finish) counts as reached.
    pub fn is_unreachable(&self) -> bool {
        matches!(self.path(), Some([]))
    }

    /// Cells in the order they entered the closed set.
    pub fn visited(&self) -> Vec<usize> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::Visited { index } => Some(*index),
                _ => None,
            })
            .collect()
    }

    fn push(&mut self, step: Step) {
        self.steps.push(step);
    }
}

impl IntoIterator for StepTrace {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

/// Tunables shared by the search algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOptions {
    /// Scale applied to the Manhattan heuristic in A*. Values above 1 trade
    /// optimality for a greedier search.
    pub heuristic_weight: f64,
    /// Number of generations simulated by the Game of Life variant.
    pub gol_generations: usize,
}

impl SolveOptions {
    /// The A* weight actually used: at least 1, and 1 when not finite.
    pub fn heuristic_weight(&self) -> f64 {
        if self.heuristic_weight.is_finite() {
            self.heuristic_weight.max(1.0)
        } else {
            1.0
        }
    }
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            heuristic_weight: 1.0,
            gol_generations: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Dijkstra,
    AStar,
    Bfs,
    Dfs,
    Greedy,
    Jps,
    Gol,
}

impl Algorithm {
    pub const ALL: [Algorithm; 7] = [
        Algorithm::Dijkstra,
        Algorithm::AStar,
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Greedy,
        Algorithm::Jps,
        Algorithm::Gol,
    ];

    /// Selector name used on the command line and in configuration.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::AStar => "astar",
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Greedy => "greedy",
            Algorithm::Jps => "jps",
            Algorithm::Gol => "gol",
        }
    }

    /// Whether the algorithm searches between start and finish.
    pub fn is_pathfinder(self) -> bool {
        !matches!(self, Algorithm::Gol)
    }

    /// Run the algorithm on `grid` and return its trace.
    ///
    /// Pathfinders validate the start/finish invariants before touching the
    /// grid and leave every transient field reset when they return.
    pub fn solve(self, grid: &mut Grid, options: &SolveOptions) -> Result<StepTrace> {
        let trace = match self {
            Algorithm::Dijkstra => solve_dijkstra(grid)?,
            Algorithm::AStar => solve_best_first(
                grid,
                Ranking::Score {
                    weight: options.heuristic_weight(),
                    prefer_closer: true,
                },
            )?,
            Algorithm::Greedy => solve_best_first(grid, Ranking::Heuristic)?,
            Algorithm::Jps => solve_best_first(
                grid,
                Ranking::Score {
                    weight: 1.0,
                    prefer_closer: false,
                },
            )?,
            Algorithm::Bfs => solve_bfs(grid)?,
            Algorithm::Dfs => solve_dfs(grid)?,
            Algorithm::Gol => solve_gol(grid, options.gol_generations),
        };
        tracing::debug!("{} produced {} steps", self, trace.len());
        Ok(trace)
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Dijkstra => write!(f, "Dijkstra's Algorithm"),
            Algorithm::AStar => write!(f, "A* Search"),
            Algorithm::Bfs => write!(f, "Breadth-First Search (BFS)"),
            Algorithm::Dfs => write!(f, "Depth-First Search (DFS)"),
            Algorithm::Greedy => write!(f, "Greedy Best-First Search"),
            Algorithm::Jps => write!(f, "Jump Point Search (simplified)"),
            Algorithm::Gol => write!(f, "Conway's Game of Life"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == s)
            .ok_or(Error::UnknownSelector {
                kind: "algorithm",
                value: s,
            })
    }
}

/// Walk `previous` links from `finish` back to `start`.
///
/// Returns `[start, ..., finish]`, `[start]` when both are the same cell, or
/// an empty path when the finish was never reached.
pub fn get_path(grid: &Grid, start: usize, finish: usize) -> Result<Vec<usize>> {
    if start == finish {
        return Ok(vec![start]);
    }
    if grid[finish].previous.is_none() {
        return Ok(Vec::new());
    }
    let mut seen = vec![false; grid.len()];
    let mut path = Vec::new();
    let mut current = Some(finish);
    while let Some(index) = current {
        if seen[index] {
            return Err(Invariant::CyclicPath { index }.into());
        }
        seen[index] = true;
        path.push(index);
        current = grid[index].previous;
    }
    path.reverse();
    if path.first() != Some(&start) {
        // Chain ended somewhere other than the start; treat as unreached.
        return Ok(Vec::new());
    }
    Ok(path)
}

/// Validates the grid, clears transient fields, runs `search`, and clears them again.
/// The search returns the closing path; the finish step is appended here.
fn run_search(
    grid: &mut Grid,
    search: impl FnOnce(&mut Grid, usize, usize, &mut StepTrace),
) -> Result<StepTrace> {
    let (start, finish) = grid.endpoints()?;
    grid.reset();
    let mut trace = StepTrace::default();
    search(grid, start, finish, &mut trace);
    let path = get_path(grid, start, finish);
    grid.reset();
    trace.push(Step::Finish { path: path? });
    Ok(trace)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Shortest unweighted distance by plain BFS, used as an oracle.
    pub(crate) fn oracle_distance(grid: &Grid, start: usize, finish: usize) -> Option<usize> {
        let mut dist = vec![usize::MAX; grid.len()];
        let mut queue = std::collections::VecDeque::from([start]);
        dist[start] = 0;
        while let Some(index) = queue.pop_front() {
            if index == finish {
                return Some(dist[index]);
            }
            for n in grid.neighbors(index, crate::grid::NeighborOrder::Vertical) {
                if !grid[n].is_wall && dist[n] == usize::MAX {
                    dist[n] = dist[index] + 1;
                    queue.push_back(n);
                }
            }
        }
        None
    }

    /// Asserts the path is contiguous, wall-free and runs from start to finish.
    pub(crate) fn assert_valid_path(grid: &Grid, path: &[usize]) {
        let (start, finish) = grid.endpoints().unwrap();
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&finish));
        for pair in path.windows(2) {
            assert_eq!(grid.manhattan(pair[0], pair[1]), 1, "gap in {path:?}");
        }
        assert!(path.iter().all(|&i| !grid[i].is_wall));
    }

    fn three_by_three() -> Grid {
        Grid::with_endpoints(3, 3, (1, 0), (1, 2)).unwrap()
    }

    #[test]
    fn test_parse_selectors() {
        assert_eq!("astar".parse::<Algorithm>().unwrap(), Algorithm::AStar);
        assert_eq!(" JPS ".parse::<Algorithm>().unwrap(), Algorithm::Jps);
        assert_eq!(
            "prim".parse::<Algorithm>().unwrap_err(),
            Error::UnknownSelector {
                kind: "algorithm",
                value: "prim".to_string()
            }
        );
    }

    #[test]
    fn test_get_path_unreached_and_trivial() {
        let grid = three_by_three();
        assert_eq!(get_path(&grid, 3, 5).unwrap(), Vec::<usize>::new());
        assert_eq!(get_path(&grid, 3, 3).unwrap(), vec![3]);
    }

    #[test]
    fn test_get_path_detects_cycles() {
        let mut grid = three_by_three();
        grid[5].previous = Some(4);
        grid[4].previous = Some(5);
        assert_eq!(
            get_path(&grid, 3, 5).unwrap_err(),
            Error::InvariantViolation(Invariant::CyclicPath { index: 5 })
        );
    }

    #[test]
    fn test_every_pathfinder_crosses_open_grid() {
        for algorithm in Algorithm::ALL.into_iter().filter(|a| a.is_pathfinder()) {
            let mut grid = three_by_three();
            let trace = algorithm.solve(&mut grid, &SolveOptions::default()).unwrap();
            let path = trace.path().unwrap();
            if algorithm == Algorithm::Dfs {
                // Depth-first wanders: 3 -> 6 -> 7 -> 4 -> 1 -> 2 -> 5.
                assert_eq!(path, [3, 6, 7, 4, 1, 2, 5]);
            } else {
                assert_eq!(path, [3, 4, 5], "{algorithm}");
            }
            assert_valid_path(&grid, path);
            assert!(grid.is_clean(), "{algorithm} left search state behind");
        }
    }

    #[test]
    fn test_astar_ignores_non_finite_weight() {
        for heuristic_weight in [f64::NAN, f64::INFINITY, 0.5] {
            let options = SolveOptions {
                heuristic_weight,
                ..SolveOptions::default()
            };
            assert_eq!(options.heuristic_weight(), 1.0);
            let trace = Algorithm::AStar.solve(&mut three_by_three(), &options).unwrap();
            assert_eq!(trace.path(), Some([3, 4, 5].as_slice()));
        }
    }

    #[test]
    fn test_center_wall_forces_detour() {
        for algorithm in [
            Algorithm::Dijkstra,
            Algorithm::AStar,
            Algorithm::Bfs,
            Algorithm::Jps,
        ] {
            let mut grid = three_by_three();
            grid[4].is_wall = true;
            let trace = algorithm.solve(&mut grid, &SolveOptions::default()).unwrap();
            let path = trace.path().unwrap();
            assert_eq!(path.len(), 5, "{algorithm}");
            assert!(path.contains(&1) || path.contains(&7), "{algorithm}");
            assert_valid_path(&grid, path);
        }
    }

    #[test]
    fn test_blocked_finish_is_unreachable() {
        for algorithm in Algorithm::ALL.into_iter().filter(|a| a.is_pathfinder()) {
            let mut grid = three_by_three();
            for index in [1, 4, 7] {
                grid[index].is_wall = true;
            }
            let trace = algorithm.solve(&mut grid, &SolveOptions::default()).unwrap();
            assert!(trace.is_unreachable(), "{algorithm}");
            assert!(matches!(trace.steps().last(), Some(Step::Finish { .. })));
            assert!(grid.is_clean());
        }
    }

    #[test]
    fn test_missing_start_fails_before_mutation() {
        let mut grid = three_by_three();
        grid[3].is_start = false;
        grid[0].distance = 7;
        let err = Algorithm::Bfs
            .solve(&mut grid, &SolveOptions::default())
            .unwrap_err();
        assert_eq!(err, Error::InvariantViolation(Invariant::MissingStart));
        // Fails fast: the grid was not reset either.
        assert_eq!(grid[0].distance, 7);
    }

    #[test]
    fn test_traces_are_deterministic() {
        for algorithm in Algorithm::ALL {
            let mut grid = Grid::new(9, 11).unwrap();
            for index in [14, 25, 36, 47, 58, 60, 61] {
                grid.set_wall(index, true).unwrap();
            }
            let options = SolveOptions::default();
            let first = algorithm.solve(&mut grid, &options).unwrap();
            let second = algorithm.solve(&mut grid, &options).unwrap();
            assert_eq!(first, second, "{algorithm}");
        }
    }
}
