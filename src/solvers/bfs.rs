use std::collections::VecDeque;

use super::{Step, StepTrace, run_search};
use crate::error::Result;
use crate::grid::{Grid, NeighborOrder};

/// Distance written to discovered cells. Breadth-first order alone keeps the
/// path shortest, so the value only needs to differ from `UNREACHED`.
const DISCOVERED: u32 = 0;

pub fn solve_bfs(grid: &mut Grid) -> Result<StepTrace> {
    run_search(grid, |grid, start, finish, trace| {
        grid[start].in_open_set = true;
        grid[start].distance = DISCOVERED;
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            if current == finish {
                break;
            }
            let cell = &mut grid[current];
            if cell.is_visited || cell.is_wall {
                continue;
            }
            cell.is_visited = true;
            trace.push(Step::Visited { index: current });

            for neighbor in grid.neighbors(current, NeighborOrder::Vertical) {
                let cell = &mut grid[neighbor];
                // Each cell is queued at most once
                if cell.is_visited || cell.is_wall || cell.in_open_set {
                    continue;
                }
                cell.in_open_set = true;
                cell.previous = Some(current);
                cell.distance = DISCOVERED;
                trace.push(Step::Updated { index: neighbor });
                queue.push_back(neighbor);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::tests::{assert_valid_path, oracle_distance};

    #[test]
    fn test_bfs_trace_on_open_grid() {
        let mut grid = Grid::with_endpoints(3, 3, (1, 0), (1, 2)).unwrap();
        let trace = solve_bfs(&mut grid).unwrap();
        assert_eq!(trace.visited(), vec![3, 0, 6, 4, 1, 7]);
        let updated = trace
            .steps()
            .iter()
            .filter(|step| matches!(step, Step::Updated { .. }))
            .count();
        // Every cell except the start is discovered exactly once.
        assert_eq!(updated, 8);
        assert_eq!(trace.path(), Some([3, 4, 5].as_slice()));
    }

    #[test]
    fn test_bfs_path_is_shortest_around_obstacles() {
        let mut grid = Grid::with_endpoints(6, 6, (0, 0), (5, 5)).unwrap();
        for index in [1, 7, 13, 19, 26, 27, 28, 29] {
            grid[index].is_wall = true;
        }
        let trace = solve_bfs(&mut grid).unwrap();
        let path = trace.path().unwrap();
        assert_valid_path(&grid, path);
        assert_eq!(path.len() - 1, oracle_distance(&grid, 0, 35).unwrap());
    }
}
