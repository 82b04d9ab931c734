use std::{fmt, io};

use crossterm::style::{Color, Stylize};

use super::Renderer;
use crate::grid::Grid;
use crate::solvers::Step;

/// What a single cell currently shows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    #[default]
    Empty,
    Wall,
    Start,
    Finish,
    /// Cell entered the closed set.
    Visited,
    /// Cell's tentative cost changed.
    Frontier,
    Path,
}

impl Tile {
    /// The width of each tile when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;

    /// Whether the tile carries a search marking that clearing removes.
    pub fn is_marking(self) -> bool {
        matches!(self, Tile::Visited | Tile::Frontier | Tile::Path)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Tile::Empty => "  ".with(Color::Reset),
            Tile::Wall => "⬜".with(Color::White),
            Tile::Start => "🟩".with(Color::Green),
            Tile::Finish => "🟥".with(Color::Red),
            Tile::Visited => "* ".with(Color::Blue),
            Tile::Frontier => "+ ".with(Color::Cyan),
            Tile::Path => "🟨".with(Color::Yellow),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Tile::CELL_WIDTH as usize,
                "Each tile must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// In-memory rendering surface: one `Tile` per grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    tiles: Vec<Tile>,
    cols: usize,
    start: Option<usize>,
    finish: Option<usize>,
}

impl Canvas {
    /// Baseline picture of the grid: walls and endpoints, nothing else.
    pub fn from_grid(grid: &Grid) -> Self {
        let tiles = grid
            .cells()
            .iter()
            .map(|cell| {
                if cell.is_start {
                    Tile::Start
                } else if cell.is_finish {
                    Tile::Finish
                } else if cell.is_wall {
                    Tile::Wall
                } else {
                    Tile::Empty
                }
            })
            .collect::<Vec<_>>();
        Canvas {
            start: tiles.iter().position(|&tile| tile == Tile::Start),
            finish: tiles.iter().position(|&tile| tile == Tile::Finish),
            tiles,
            cols: grid.cols(),
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, index: usize) -> Option<Tile> {
        self.tiles.get(index).copied()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.tiles.len().checked_div(self.cols).unwrap_or(0)
    }

    /// Draw a wall tile; used for the animated reveal of generated walls.
    pub fn reveal_wall(&mut self, index: usize) {
        if let Some(tile) = self.tiles.get_mut(index) {
            if !matches!(tile, Tile::Start | Tile::Finish) {
                *tile = Tile::Wall;
            }
        }
    }

    /// Endpoints and walls keep their tile so clearing restores them.
    fn mark(&mut self, index: usize, marking: Tile) {
        if let Some(tile) = self.tiles.get_mut(index) {
            if !matches!(tile, Tile::Start | Tile::Finish | Tile::Wall) {
                *tile = marking;
            }
        }
    }

    fn clear(&mut self, index: usize) {
        if let Some(tile) = self.tiles.get_mut(index) {
            if tile.is_marking() {
                *tile = Tile::Empty;
            }
        }
    }

    fn set_wall(&mut self, index: usize, is_wall: bool) {
        if let Some(tile) = self.tiles.get_mut(index) {
            match (*tile, is_wall) {
                (Tile::Start | Tile::Finish, _) => {}
                (_, true) => *tile = Tile::Wall,
                (Tile::Wall, false) => *tile = Tile::Empty,
                _ => {}
            }
        }
    }

    fn restore_endpoints(&mut self) {
        if let Some(tile) = self.start.and_then(|index| self.tiles.get_mut(index)) {
            *tile = Tile::Start;
        }
        if let Some(tile) = self.finish.and_then(|index| self.tiles.get_mut(index)) {
            *tile = Tile::Finish;
        }
    }
}

impl Renderer for Canvas {
    fn apply(&mut self, step: &Step) -> io::Result<()> {
        match step {
            Step::Visited { index } => self.mark(*index, Tile::Visited),
            Step::Updated { index } => self.mark(*index, Tile::Frontier),
            Step::Finish { path } => {
                // The path covers the endpoints too
                for &index in path {
                    if let Some(tile) = self.tiles.get_mut(index) {
                        *tile = Tile::Path;
                    }
                }
            }
            Step::GolGeneration { changes } => {
                for change in changes {
                    self.set_wall(change.index, change.becomes_wall);
                }
            }
        }
        Ok(())
    }

    fn revert(&mut self, step: &Step) -> io::Result<()> {
        match step {
            Step::Visited { index } | Step::Updated { index } => self.clear(*index),
            Step::Finish { path } => {
                for &index in path.iter().rev() {
                    self.clear(index);
                }
                self.restore_endpoints();
            }
            Step::GolGeneration { changes } => {
                for change in changes.iter().rev() {
                    self.set_wall(change.index, !change.becomes_wall);
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.cols.max(1)) {
            for tile in row {
                write!(f, "{tile}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::GolChange;

    fn open_canvas() -> (Grid, Canvas) {
        let mut grid = Grid::with_endpoints(3, 3, (1, 0), (1, 2)).unwrap();
        grid[1].is_wall = true;
        let canvas = Canvas::from_grid(&grid);
        (grid, canvas)
    }

    #[test]
    fn test_baseline_from_grid() {
        let (_, canvas) = open_canvas();
        assert_eq!(canvas.tile(3), Some(Tile::Start));
        assert_eq!(canvas.tile(5), Some(Tile::Finish));
        assert_eq!(canvas.tile(1), Some(Tile::Wall));
        assert_eq!(canvas.tile(4), Some(Tile::Empty));
        assert_eq!(canvas.tile(9), None);
        assert_eq!((canvas.rows(), canvas.cols()), (3, 3));
    }

    #[test]
    fn test_markings_skip_endpoints_and_walls() {
        let (_, mut canvas) = open_canvas();
        canvas.apply(&Step::Visited { index: 3 }).unwrap();
        canvas.apply(&Step::Updated { index: 1 }).unwrap();
        canvas.apply(&Step::Updated { index: 4 }).unwrap();
        assert_eq!(canvas.tile(3), Some(Tile::Start));
        assert_eq!(canvas.tile(1), Some(Tile::Wall));
        assert_eq!(canvas.tile(4), Some(Tile::Frontier));

        canvas.revert(&Step::Updated { index: 4 }).unwrap();
        // Clearing twice is a no-op
        canvas.revert(&Step::Updated { index: 4 }).unwrap();
        assert_eq!(canvas.tile(4), Some(Tile::Empty));
    }

    #[test]
    fn test_finish_revert_restores_endpoints() {
        let (_, mut canvas) = open_canvas();
        let baseline = canvas.clone();
        let finish = Step::Finish {
            path: vec![3, 4, 5],
        };
        canvas.apply(&finish).unwrap();
        assert!(canvas.tiles()[3..6].iter().all(|&tile| tile == Tile::Path));
        canvas.revert(&finish).unwrap();
        assert_eq!(canvas, baseline);
    }

    #[test]
    fn test_gol_generation_and_inverse() {
        let (_, mut canvas) = open_canvas();
        let baseline = canvas.clone();
        let generation = Step::GolGeneration {
            changes: vec![
                GolChange {
                    index: 1,
                    becomes_wall: false,
                },
                GolChange {
                    index: 7,
                    becomes_wall: true,
                },
            ],
        };
        canvas.apply(&generation).unwrap();
        assert_eq!(canvas.tile(1), Some(Tile::Empty));
        assert_eq!(canvas.tile(7), Some(Tile::Wall));
        canvas.revert(&generation).unwrap();
        assert_eq!(canvas, baseline);
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let (_, mut canvas) = open_canvas();
        let baseline = canvas.clone();
        canvas.apply(&Step::Visited { index: 42 }).unwrap();
        canvas.revert(&Step::Finish { path: vec![42] }).unwrap();
        assert_eq!(canvas, baseline);
    }

    #[test]
    fn test_every_tile_renders() {
        for tile in [
            Tile::Empty,
            Tile::Wall,
            Tile::Start,
            Tile::Finish,
            Tile::Visited,
            Tile::Frontier,
            Tile::Path,
        ] {
            // Display asserts the two-column width in debug builds
            assert!(!tile.to_string().is_empty());
        }
    }
}
