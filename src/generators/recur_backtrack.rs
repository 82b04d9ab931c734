use rand::{Rng, rngs::StdRng};

use super::{WallSet, add_border_walls, connect_endpoints, fill_interior};
use crate::grid::Grid;

/// Randomized depth-first carving over the odd lattice (step 2).
///
/// Starts from a fully walled interior, opens a random odd cell, and keeps
/// knocking through to an unvisited lattice cell two steps away, popping
/// back when a cell runs out of unvisited neighbors. Produces a perfect maze.
/// Endpoints on the lattice are carved through like any other cell; they are
/// just never walled.
pub fn recursive_backtrack(grid: &Grid, rng: &mut StdRng) -> WallSet {
    let mut walls = WallSet::new(grid);
    add_border_walls(grid, &mut walls);
    if grid.rows() < 3 || grid.cols() < 3 {
        return walls;
    }
    fill_interior(grid, &mut walls);

    let (rows, cols) = (grid.rows(), grid.cols());
    let start = (
        1 + 2 * rng.random_range(0..(rows - 1) / 2),
        1 + 2 * rng.random_range(0..(cols - 1) / 2),
    );

    let mut visited = vec![false; grid.len()];
    visited[grid.index_of(start.0, start.1)] = true;
    walls.remove(grid.index_of(start.0, start.1));

    // The stack will keep only carved lattice cells
    let mut stack = vec![start];

    while let Some(&(r, c)) = stack.last() {
        let neighbors = lattice_neighbors(grid, (r, c))
            .filter(|&(nr, nc)| !visited[grid.index_of(nr, nc)])
            .collect::<Vec<_>>();

        if neighbors.is_empty() {
            stack.pop();
            continue;
        }
        let (nr, nc) = neighbors[rng.random_range(0..neighbors.len())];
        visited[grid.index_of(nr, nc)] = true;
        walls.remove(grid.index_of(nr, nc));
        // Knock out the wall cell between current and neighbor
        walls.remove(grid.index_of((r + nr) / 2, (c + nc) / 2));
        stack.push((nr, nc));
    }
    connect_endpoints(grid, &mut walls);
    walls
}

/// Interior cells two steps away in the cardinal directions: up, down, left, right.
fn lattice_neighbors(grid: &Grid, (r, c): (usize, usize)) -> impl Iterator<Item = (usize, usize)> {
    let (rows, cols) = (grid.rows(), grid.cols());
    [
        r.checked_sub(2).map(|nr| (nr, c)),
        Some((r + 2, c)),
        c.checked_sub(2).map(|nc| (r, nc)),
        Some((r, c + 2)),
    ]
    .into_iter()
    .flatten()
    .filter(move |&(nr, nc)| nr > 0 && nr < rows - 1 && nc > 0 && nc < cols - 1)
}
