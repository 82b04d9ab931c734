pub mod cell;

pub use cell::{Cell, UNREACHED};

use crate::error::{Error, Invariant, Result};

/// Order in which [`Grid::neighbors`] yields the orthogonal neighbors of a cell.
/// The order is observable in every trace, so each algorithm picks one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborOrder {
    /// Up, down, left, right.
    Vertical,
    /// Left, right, up, down (depth-first search).
    Horizontal,
}

/// Orthogonal neighbors of a cell, bounds-checked.
pub type Neighbors = std::iter::Flatten<std::array::IntoIter<Option<usize>, 4>>;

/// Rectangular grid of cells stored row-major in a flat arena.
/// `Cell::previous` links are plain indices into this arena.
#[derive(Debug, Clone)]
pub struct Grid {
    data: Box<[Cell]>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Creates an open grid with the start at `(rows / 2, cols / 4)` and the
    /// finish at `(rows / 2, 2 * cols / 3)`.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let middle = rows / 2;
        Grid::with_endpoints(rows, cols, (middle, cols / 4), (middle, cols * 2 / 3))
    }

    /// Creates an open grid with explicit `(row, col)` endpoints.
    pub fn with_endpoints(
        rows: usize,
        cols: usize,
        start: (usize, usize),
        finish: (usize, usize),
    ) -> Result<Self> {
        if rows == 0 || cols < 2 {
            return Err(Error::InvalidDimensions { rows, cols });
        }
        let data = (0..rows * cols)
            .map(|index| Cell::new(index / cols, index % cols))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        let mut grid = Grid { data, rows, cols };

        let start = grid.checked_index(start.0, start.1)?;
        let finish = grid.checked_index(finish.0, finish.1)?;
        if start == finish {
            return Err(Invariant::EndpointCollision { index: finish }.into());
        }
        grid.data[start].is_start = true;
        grid.data[finish].is_finish = true;
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.data
    }

    pub fn index_of(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn coord_of(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.data.len()
    }

    fn checked_index(&self, row: usize, col: usize) -> Result<usize> {
        if row < self.rows && col < self.cols {
            Ok(self.index_of(row, col))
        } else {
            Err(Error::OutOfRange {
                index: row.saturating_mul(self.cols).saturating_add(col),
                len: self.len(),
            })
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if self.contains(index) {
            Ok(())
        } else {
            Err(Error::OutOfRange {
                index,
                len: self.len(),
            })
        }
    }

    /// Whether the cell lies on the outer frame of the grid.
    pub fn is_boundary(&self, index: usize) -> bool {
        let (row, col) = self.coord_of(index);
        row == 0 || col == 0 || row == self.rows - 1 || col == self.cols - 1
    }

    /// Clears the transient search fields of every cell.
    pub fn reset(&mut self) {
        self.data.iter_mut().for_each(Cell::reset_transient);
    }

    /// Whether no cell carries search state.
    pub fn is_clean(&self) -> bool {
        self.data.iter().all(Cell::is_clean)
    }

    pub fn find_start(&self) -> Result<usize> {
        self.find_unique(|cell| cell.is_start).map_err(|count| match count {
            0 => Invariant::MissingStart.into(),
            count => Invariant::MultipleStarts { count }.into(),
        })
    }

    pub fn find_finish(&self) -> Result<usize> {
        self.find_unique(|cell| cell.is_finish).map_err(|count| match count {
            0 => Invariant::MissingFinish.into(),
            count => Invariant::MultipleFinishes { count }.into(),
        })
    }

    /// Returns `(start, finish)` after checking both are unique and not walls.
    pub fn endpoints(&self) -> Result<(usize, usize)> {
        let start = self.find_start()?;
        let finish = self.find_finish()?;
        for index in [start, finish] {
            if self.data[index].is_wall {
                return Err(Invariant::WallOnEndpoint { index }.into());
            }
        }
        Ok((start, finish))
    }

    /// Returns the single matching index, or the number of matches otherwise.
    fn find_unique(&self, predicate: impl Fn(&Cell) -> bool) -> std::result::Result<usize, usize> {
        let mut matches = self
            .data
            .iter()
            .enumerate()
            .filter(|(_, cell)| predicate(cell))
            .map(|(index, _)| index);
        match (matches.next(), matches.count()) {
            (Some(index), 0) => Ok(index),
            (Some(_), rest) => Err(rest + 1),
            (None, _) => Err(0),
        }
    }

    /// Get the orthogonal neighbors of a cell in the requested order.
    /// Out-of-range indices have no neighbors.
    pub fn neighbors(&self, index: usize, order: NeighborOrder) -> Neighbors {
        let candidates = if self.contains(index) {
            let (row, col) = self.coord_of(index);
            let up = (row > 0).then(|| index - self.cols);
            let down = (row + 1 < self.rows).then(|| index + self.cols);
            let left = (col > 0).then(|| index - 1);
            let right = (col + 1 < self.cols).then(|| index + 1);
            match order {
                NeighborOrder::Vertical => [up, down, left, right],
                NeighborOrder::Horizontal => [left, right, up, down],
            }
        } else {
            [None; 4]
        };
        candidates.into_iter().flatten()
    }

    /// Manhattan distance between two cells.
    pub fn manhattan(&self, a: usize, b: usize) -> u32 {
        let (ar, ac) = self.coord_of(a);
        let (br, bc) = self.coord_of(b);
        (ar.abs_diff(br) + ac.abs_diff(bc)) as u32
    }

    /// Sets the wall flag of a cell. Endpoints never become walls.
    /// Returns whether the flag changed.
    pub fn set_wall(&mut self, index: usize, is_wall: bool) -> Result<bool> {
        self.check_index(index)?;
        let cell = &mut self.data[index];
        if cell.is_endpoint() || cell.is_wall == is_wall {
            return Ok(false);
        }
        cell.is_wall = is_wall;
        Ok(true)
    }

    /// Clears every wall on the grid.
    pub fn clear_walls(&mut self) {
        self.data.iter_mut().for_each(|cell| cell.is_wall = false);
    }

    /// Indices of all wall cells in row-major order.
    pub fn wall_indices(&self) -> Vec<usize> {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_wall)
            .map(|(index, _)| index)
            .collect()
    }

    /// Moves the start marker. A wall under the new position is removed.
    pub fn move_start(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if self.data[index].is_finish {
            return Err(Invariant::EndpointCollision { index }.into());
        }
        let old = self.find_start()?;
        self.data[old].is_start = false;
        let cell = &mut self.data[index];
        cell.is_wall = false;
        cell.is_start = true;
        Ok(())
    }

    /// Moves the finish marker. A wall under the new position is removed.
    pub fn move_finish(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if self.data[index].is_start {
            return Err(Invariant::EndpointCollision { index }.into());
        }
        let old = self.find_finish()?;
        self.data[old].is_finish = false;
        let cell = &mut self.data[index];
        cell.is_wall = false;
        cell.is_finish = true;
        Ok(())
    }
}

impl std::ops::Index<usize> for Grid {
    type Output = Cell;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl std::ops::IndexMut<usize> for Grid {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl std::ops::Index<(usize, usize)> for Grid {
    type Output = Cell;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[self.index_of(row, col)]
    }
}

impl std::ops::IndexMut<(usize, usize)> for Grid {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        let index = self.index_of(row, col);
        &mut self.data[index]
    }
}
