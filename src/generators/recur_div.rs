use rand::{Rng, rngs::StdRng};

use super::{Orientation, WallSet, add_border_walls};
use crate::grid::Grid;

/// Recursive division inside a walled frame.
///
/// Each chamber is split by a wall on an even row or column with a single
/// passage at an odd offset, until a side is shorter than three cells.
pub fn recursive_division(grid: &Grid, rng: &mut StdRng) -> WallSet {
    let mut walls = WallSet::new(grid);
    add_border_walls(grid, &mut walls);
    if grid.rows() < 3 || grid.cols() < 3 {
        return walls;
    }

    // Start the recursive division on the interior
    divide(grid, &mut walls, (1, 1), (grid.cols() - 2, grid.rows() - 2), rng);
    walls
}

/// `top_left` and `bottom_right` are inclusive `(x, y)` corners.
fn divide(
    grid: &Grid,
    walls: &mut WallSet,
    top_left: (usize, usize),
    bottom_right: (usize, usize),
    rng: &mut StdRng,
) {
    let (x1, y1) = top_left;
    let (x2, y2) = bottom_right;
    let width = x2 - x1 + 1;
    let height = y2 - y1 + 1;
    if width < 3 || height < 3 {
        return;
    }

    let orientation = match width.cmp(&height) {
        std::cmp::Ordering::Less => Orientation::Horizontal,
        std::cmp::Ordering::Greater => Orientation::Vertical,
        std::cmp::Ordering::Equal => {
            if rng.random_bool(0.5) {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            }
        }
    };

    match orientation {
        Orientation::Horizontal => {
            // Chambers start on odd coordinates, so y1 + 1 is always an even candidate
            let y_wall = pick_with_parity(y1 + 1, y2 - 1, 0, rng);
            (x1..=x2).for_each(|x| {
                walls.insert(grid.index_of(y_wall, x));
            });
            let x_hole = pick_with_parity(x1, x2, 1, rng);
            walls.remove(grid.index_of(y_wall, x_hole));

            divide(grid, walls, (x1, y1), (x2, y_wall - 1), rng);
            divide(grid, walls, (x1, y_wall + 1), (x2, y2), rng);
        }
        Orientation::Vertical => {
            let x_wall = pick_with_parity(x1 + 1, x2 - 1, 0, rng);
            (y1..=y2).for_each(|y| {
                walls.insert(grid.index_of(y, x_wall));
            });
            let y_hole = pick_with_parity(y1, y2, 1, rng);
            walls.remove(grid.index_of(y_hole, x_wall));

            divide(grid, walls, (x1, y1), (x_wall - 1, y2), rng);
            divide(grid, walls, (x_wall + 1, y1), (x2, y2), rng);
        }
    }
}

/// Pick a random value in `low..=high` whose remainder mod 2 is `parity`.
/// The caller guarantees at least one such value exists.
fn pick_with_parity(low: usize, high: usize, parity: usize, rng: &mut StdRng) -> usize {
    let first = if low % 2 == parity { low } else { low + 1 };
    let choices = (high.saturating_sub(first)) / 2 + 1;
    first + 2 * rng.random_range(0..choices)
}
