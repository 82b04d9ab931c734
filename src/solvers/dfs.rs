use super::{Step, StepTrace, run_search};
use crate::error::Result;
use crate::grid::{Grid, NeighborOrder};

/// Marker distance for cells pushed on the stack.
const DISCOVERED: u32 = 0;

/// Depth-first search. The returned path is valid but not necessarily shortest.
///
/// A cell may be pushed several times before it is visited; the latest push
/// decides its `previous` link.
pub fn solve_dfs(grid: &mut Grid) -> Result<StepTrace> {
    run_search(grid, |grid, start, finish, trace| {
        let mut stack = vec![start];

        while let Some(current) = stack.pop() {
            if current == finish {
                break;
            }
            let cell = &mut grid[current];
            if cell.is_visited || cell.is_wall {
                continue;
            }
            cell.is_visited = true;
            cell.in_open_set = false;
            trace.push(Step::Visited { index: current });

            for neighbor in grid.neighbors(current, NeighborOrder::Horizontal) {
                let cell = &mut grid[neighbor];
                if cell.is_visited || cell.is_wall {
                    continue;
                }
                cell.previous = Some(current);
                cell.distance = DISCOVERED;
                cell.in_open_set = true;
                trace.push(Step::Updated { index: neighbor });
                stack.push(neighbor);
            }
        }
    })
}
