use super::{GolChange, Step, StepTrace};
use crate::grid::Grid;

/// Conway's Game of Life over the wall flags, on a torus.
///
/// Works on a snapshot; the grid itself is left untouched. Start and finish
/// cells are pinned dead so they never turn into walls.
pub fn solve_gol(grid: &Grid, generations: usize) -> StepTrace {
    let mut alive = grid.cells().iter().map(|cell| cell.is_wall).collect::<Vec<_>>();
    let mut trace = StepTrace::default();

    for _ in 0..generations {
        let next = (0..grid.len())
            .map(|index| {
                if grid[index].is_endpoint() {
                    return false;
                }
                let neighbors = count_alive_neighbors(grid, &alive, index);
                if alive[index] {
                    neighbors == 2 || neighbors == 3
                } else {
                    neighbors == 3
                }
            })
            .collect::<Vec<_>>();

        let changes = alive
            .iter()
            .zip(&next)
            .enumerate()
            .filter(|(_, (before, after))| before != after)
            .map(|(index, (_, &becomes_wall))| GolChange {
                index,
                becomes_wall,
            })
            .collect();
        trace.push(Step::GolGeneration { changes });
        alive = next;
    }
    trace
}

/// Count live cells in the 8-neighborhood, wrapping around the edges.
fn count_alive_neighbors(grid: &Grid, alive: &[bool], index: usize) -> usize {
    let (rows, cols) = (grid.rows(), grid.cols());
    let (row, col) = grid.coord_of(index);
    // Offsets of -1, 0 and +1 expressed modulo the dimension to stay unsigned
    let row_offsets = [rows - 1, 0, 1];
    let col_offsets = [cols - 1, 0, 1];
    row_offsets
        .iter()
        .flat_map(|&dr| col_offsets.iter().map(move |&dc| (dr, dc)))
        .filter(|&(dr, dc)| (dr, dc) != (0, 0))
        .filter(|&(dr, dc)| {
            let r = (row + dr) % rows;
            let c = (col + dc) % cols;
            alive[grid.index_of(r, c)]
        })
        .count()
}
