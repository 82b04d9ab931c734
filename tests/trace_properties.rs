//! Property-based invariant tests for search traces, replay and generators.
//!
//! 1. Shortest-path algorithms return a contiguous path of minimal length.
//! 2. Disconnected endpoints never yield a path claiming connectivity.
//! 3. Dijkstra, BFS and DFS traces are deterministic.
//! 4. Resetting a grid twice equals resetting it once.
//! 5. Replaying a trace forward then backward restores the canvas.
//! 6. Backtracking and Kruskal generators produce perfect mazes.
//! 7. Their mazes keep the default endpoints reachable at any size.

use std::collections::VecDeque;

use gridtrace::{
    generators::{GenerateOptions, Generator, generate_walls},
    grid::{Grid, NeighborOrder},
    replay::{Canvas, ReplayController, Speed},
    solvers::{Algorithm, SolveOptions, Step},
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Grid with random walls and two distinct endpoints.
fn grid_strategy() -> impl Strategy<Value = Grid> {
    (2usize..9, 2usize..9)
        .prop_flat_map(|(rows, cols)| {
            let len = rows * cols;
            (
                Just((rows, cols)),
                0..len,
                1..len,
                proptest::collection::vec(proptest::bool::weighted(0.3), len),
            )
        })
        .prop_map(|((rows, cols), start, offset, walls)| {
            let len = rows * cols;
            let finish = (start + offset) % len;
            let mut grid =
                Grid::with_endpoints(rows, cols, (start / cols, start % cols), (finish / cols, finish % cols))
                    .expect("endpoints are distinct and in range");
            for (index, is_wall) in walls.into_iter().enumerate() {
                grid.set_wall(index, is_wall).expect("index in range");
            }
            grid
        })
}

/// Shortest unweighted distance by plain BFS.
fn oracle_distance(grid: &Grid, start: usize, finish: usize) -> Option<usize> {
    let mut dist = vec![usize::MAX; grid.len()];
    let mut queue = VecDeque::from([start]);
    dist[start] = 0;
    while let Some(index) = queue.pop_front() {
        if index == finish {
            return Some(dist[index]);
        }
        for n in grid.neighbors(index, NeighborOrder::Vertical) {
            if !grid[n].is_wall && dist[n] == usize::MAX {
                dist[n] = dist[index] + 1;
                queue.push_back(n);
            }
        }
    }
    None
}

fn is_contiguous(grid: &Grid, path: &[usize]) -> bool {
    path.windows(2)
        .all(|pair| grid.manhattan(pair[0], pair[1]) == 1)
        && path.iter().all(|&index| !grid[index].is_wall)
}

const SHORTEST: [Algorithm; 4] = [
    Algorithm::Dijkstra,
    Algorithm::AStar,
    Algorithm::Bfs,
    Algorithm::Jps,
];

// ═════════════════════════════════════════════════════════════════════════
// 1. Minimal paths
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn shortest_path_is_minimal(mut grid in grid_strategy()) {
        let (start, finish) = grid.endpoints().unwrap();
        let expected = oracle_distance(&grid, start, finish);
        for algorithm in SHORTEST {
            let trace = algorithm.solve(&mut grid, &SolveOptions::default()).unwrap();
            let path = trace.path().unwrap();
            match expected {
                Some(distance) => {
                    prop_assert_eq!(path.len(), distance + 1, "{} on {:?}", algorithm, grid.wall_indices());
                    prop_assert_eq!(path.first(), Some(&start));
                    prop_assert_eq!(path.last(), Some(&finish));
                    prop_assert!(is_contiguous(&grid, path));
                }
                None => prop_assert!(path.is_empty()),
            }
            prop_assert!(grid.is_clean(), "{} left search state behind", algorithm);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Disconnected endpoints
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn disconnected_finish_has_no_path(mut grid in grid_strategy()) {
        let (start, finish) = grid.endpoints().unwrap();
        // Wall in the finish completely
        for n in grid.neighbors(finish, NeighborOrder::Vertical).collect::<Vec<_>>() {
            if n != start {
                grid.set_wall(n, true).unwrap();
            }
        }
        prop_assume!(oracle_distance(&grid, start, finish).is_none());

        for algorithm in Algorithm::ALL.into_iter().filter(|a| a.is_pathfinder()) {
            let trace = algorithm.solve(&mut grid, &SolveOptions::default()).unwrap();
            prop_assert!(trace.is_unreachable(), "{} claimed a path", algorithm);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Deterministic traces
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn traces_are_deterministic(grid in grid_strategy()) {
        for algorithm in [Algorithm::Dijkstra, Algorithm::Bfs, Algorithm::Dfs] {
            let first = algorithm.solve(&mut grid.clone(), &SolveOptions::default()).unwrap();
            let second = algorithm.solve(&mut grid.clone(), &SolveOptions::default()).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Reset idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reset_is_idempotent(mut grid in grid_strategy(), touched in proptest::collection::vec(any::<usize>(), 0..10)) {
        for index in touched {
            let index = index % grid.len();
            grid[index].is_visited = true;
            grid[index].distance = 3;
            grid[index].previous = Some(0);
        }
        let walls = grid.wall_indices();
        grid.reset();
        let once = grid.clone();
        grid.reset();
        prop_assert_eq!(once.cells(), grid.cells());
        prop_assert!(grid.is_clean());
        prop_assert_eq!(grid.wall_indices(), walls);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Replay round-trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn replay_round_trip_restores_canvas(mut grid in grid_strategy()) {
        for algorithm in Algorithm::ALL {
            let trace = algorithm.solve(&mut grid, &SolveOptions::default()).unwrap();
            let mut canvas = Canvas::from_grid(&grid);
            let baseline = canvas.clone();

            let mut replay = ReplayController::new(Speed::Fast);
            replay.load(trace, grid.len()).unwrap();
            let mut applied = 0;
            while replay.step_forward(&mut canvas) {
                applied += 1;
            }
            prop_assert_eq!(applied, replay.len());
            while replay.step_back(&mut canvas) {}
            prop_assert_eq!(&canvas, &baseline, "{} did not round-trip", algorithm);
        }
    }
}

proptest! {
    #[test]
    fn finish_is_last_step(mut grid in grid_strategy()) {
        for algorithm in Algorithm::ALL.into_iter().filter(|a| a.is_pathfinder()) {
            let trace = algorithm.solve(&mut grid, &SolveOptions::default()).unwrap();
            let finishes = trace
                .steps()
                .iter()
                .filter(|step| matches!(step, Step::Finish { .. }))
                .count();
            prop_assert_eq!(finishes, 1);
            let ends_with_finish = matches!(trace.steps().last(), Some(Step::Finish { .. }));
            prop_assert!(ends_with_finish);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Perfect mazes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn spanning_generators_make_perfect_mazes(half_rows in 2usize..8, half_cols in 2usize..8, seed in any::<u64>()) {
        // Odd dimensions with endpoints on the border next to lattice cells
        let (rows, cols) = (2 * half_rows + 1, 2 * half_cols + 1);
        for generator in [Generator::RecurBacktrack, Generator::Kruskal] {
            let mut grid = Grid::with_endpoints(rows, cols, (0, 1), (rows - 1, cols - 2)).unwrap();
            let options = GenerateOptions { seed: Some(seed), ..GenerateOptions::default() };
            generate_walls(&mut grid, generator, &options).unwrap();

            let open = (0..grid.len()).filter(|&i| !grid[i].is_wall).collect::<Vec<_>>();
            let edges = open
                .iter()
                .flat_map(|&i| grid.neighbors(i, NeighborOrder::Vertical).filter(move |&n| n > i))
                .filter(|&n| !grid[n].is_wall)
                .count();
            prop_assert_eq!(edges, open.len() - 1, "{} made a cycle or split", generator);

            let (start, finish) = grid.endpoints().unwrap();
            prop_assert!(oracle_distance(&grid, start, finish).is_some());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Reachable default endpoints
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn spanning_generators_keep_default_endpoints_reachable(rows in 3usize..30, cols in 3usize..40, seed in any::<u64>()) {
        for generator in [Generator::RecurBacktrack, Generator::Kruskal] {
            let mut grid = Grid::new(rows, cols).unwrap();
            let options = GenerateOptions { seed: Some(seed), ..GenerateOptions::default() };
            generate_walls(&mut grid, generator, &options).unwrap();

            let (start, finish) = grid.endpoints().unwrap();
            prop_assert!(
                oracle_distance(&grid, start, finish).is_some(),
                "{} boxed in {:?} or {:?}", generator, grid.coord_of(start), grid.coord_of(finish)
            );
        }
    }
}
