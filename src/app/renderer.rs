use std::io::{self, Stdout, Write};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    grid::Grid,
    replay::{Canvas, Renderer, Tile},
    solvers::Step,
};

/// Draws a [`Canvas`] onto the terminal, redrawing only the cells each step
/// touches.
pub struct TerminalRenderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
    canvas: Canvas,
}

impl TerminalRenderer {
    /// Rows reserved below the grid for the status line
    pub const NUM_STATUS_ROWS: u16 = 1;

    pub fn new(grid: &Grid) -> Self {
        Self {
            stdout: io::stdout(),
            canvas: Canvas::from_grid(grid),
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Start over from the grid's current walls and endpoints.
    pub fn reset(&mut self, grid: &Grid) -> io::Result<()> {
        self.canvas = Canvas::from_grid(grid);
        self.draw_all()
    }

    /// Largest `(rows, cols)` grid that fits the terminal of the given size.
    pub fn grid_size_for(term_width: u16, term_height: u16) -> (usize, usize) {
        (
            term_height.saturating_sub(Self::NUM_STATUS_ROWS) as usize,
            (term_width / Tile::CELL_WIDTH) as usize,
        )
    }

    /// Whether the terminal is still large enough for the canvas.
    pub fn fits(&self) -> io::Result<bool> {
        let (term_width, term_height) = terminal::size()?;
        let (rows, cols) = Self::grid_size_for(term_width, term_height);
        Ok(rows >= self.canvas.rows() && cols >= self.canvas.cols())
    }

    /// Tell the user the terminal got too small for the grid.
    pub fn show_too_small(&mut self) -> io::Result<()> {
        let msg = format!(
            "Terminal size is too small for the grid dimensions ({}x{}). Please resize the terminal.\r\n",
            self.canvas.cols(),
            self.canvas.rows()
        );
        queue!(
            self.stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            style::PrintStyledContent(msg.with(Color::Yellow).attribute(Attribute::Bold)),
            style::PrintStyledContent(
                "Press Esc to exit...\r\n"
                    .with(Color::Blue)
                    .attribute(Attribute::Bold)
            )
        )?;
        self.stdout.flush()
    }

    pub fn draw_all(&mut self) -> io::Result<()> {
        queue!(self.stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        for row in self.canvas.tiles().chunks(self.canvas.cols().max(1)) {
            for tile in row {
                self.stdout.queue(style::Print(tile))?;
            }
            self.stdout.queue(style::Print("\r\n"))?;
        }
        self.stdout.flush()
    }

    fn draw_cells(&mut self, indices: impl Iterator<Item = usize>) -> io::Result<()> {
        let cols = self.canvas.cols().max(1);
        for index in indices {
            let Some(tile) = self.canvas.tile(index) else {
                continue;
            };
            let (row, col) = (index / cols, index % cols);
            queue!(
                self.stdout,
                cursor::MoveTo(col as u16 * Tile::CELL_WIDTH, row as u16),
                style::Print(tile)
            )?;
        }
        self.stdout.flush()
    }

    /// Draw a freshly generated wall.
    pub fn reveal_wall(&mut self, index: usize) -> io::Result<()> {
        self.canvas.reveal_wall(index);
        self.draw_cells(std::iter::once(index))
    }

    /// Replace the status line below the grid.
    pub fn draw_status(&mut self, status: &str, color: Color) -> io::Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(0, self.canvas.rows() as u16),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(status.with(color).attribute(Attribute::Bold))
        )?;
        self.stdout.flush()
    }
}

impl Renderer for TerminalRenderer {
    fn apply(&mut self, step: &Step) -> io::Result<()> {
        self.canvas.apply(step)?;
        self.draw_cells(step.indices())
    }

    fn revert(&mut self, step: &Step) -> io::Result<()> {
        self.canvas.revert(step)?;
        self.draw_cells(step.indices())
    }
}
