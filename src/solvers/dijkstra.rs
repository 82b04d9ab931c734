use std::{cmp::Reverse, collections::BinaryHeap};

use super::{Step, StepTrace, run_search};
use crate::error::Result;
use crate::grid::{Grid, NeighborOrder};

/// Frontier key: distance, then the expansion that assigned that distance,
/// then the cell index. Equal distances therefore go to the cell discovered first.
type FrontierKey = (u32, usize, usize);

/// Uniform-cost search with unit edge weights.
pub fn solve_dijkstra(grid: &mut Grid) -> Result<StepTrace> {
    run_search(grid, |grid, start, finish, trace| {
        grid[start].distance = 0;
        grid[start].in_open_set = true;

        // Using Reverse to turn the max-heap into a min-heap
        let mut pq: BinaryHeap<Reverse<FrontierKey>> = BinaryHeap::new();
        pq.push(Reverse((0, 0, start)));
        let mut expansion = 0;

        while let Some(Reverse((distance, _, current))) = pq.pop() {
            // Skip entries superseded by a shorter distance
            if grid[current].is_visited || grid[current].distance != distance {
                continue;
            }

            let cell = &mut grid[current];
            cell.is_visited = true;
            cell.in_open_set = false;
            trace.push(Step::Visited { index: current });

            if current == finish {
                break;
            }

            expansion += 1;
            let new_distance = distance + 1; // Uniform cost for each step
            for neighbor in grid.neighbors(current, NeighborOrder::Vertical) {
                let cell = &mut grid[neighbor];
                if cell.is_visited || cell.is_wall || new_distance >= cell.distance {
                    continue;
                }
                cell.distance = new_distance;
                cell.previous = Some(current);
                cell.in_open_set = true;
                trace.push(Step::Updated { index: neighbor });
                pq.push(Reverse((new_distance, expansion, neighbor)));
            }
        }
    })
}
