use std::io;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::generators::{self, Generator};
use crate::grid::Grid;
use crate::replay::{ReplayController, ReplayState, Renderer};
use crate::solvers::{Algorithm, GolChange, Step};

/// Explicit context tying one grid to its configuration and replay.
///
/// Edits, generators and algorithm runs are refused with [`Error::Busy`]
/// while a replay is running or paused. A completed replay is discarded by
/// the next edit.
#[derive(Debug)]
pub struct Session {
    grid: Grid,
    config: Config,
    replay: ReplayController,
}

impl Session {
    pub fn new(rows: usize, cols: usize, config: Config) -> Result<Self> {
        Ok(Session {
            grid: Grid::new(rows, cols)?,
            replay: ReplayController::new(config.speed),
            config,
        })
    }

    /// Session around an existing grid.
    pub fn with_grid(grid: Grid, config: Config) -> Self {
        Session {
            grid,
            replay: ReplayController::new(config.speed),
            config,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn replay(&self) -> &ReplayController {
        &self.replay
    }

    pub fn replay_mut(&mut self) -> &mut ReplayController {
        &mut self.replay
    }

    /// Whether the grid is owned by an in-progress replay.
    pub fn is_busy(&self) -> bool {
        self.replay.is_active()
    }

    fn claim_grid(&mut self) -> Result<()> {
        match self.replay.state() {
            ReplayState::Running | ReplayState::Paused => Err(Error::Busy),
            ReplayState::Completed => {
                self.replay.stop();
                Ok(())
            }
            ReplayState::Idle => Ok(()),
        }
    }

    /// Returns whether the cell changed.
    pub fn set_wall(&mut self, index: usize, is_wall: bool) -> Result<bool> {
        self.claim_grid()?;
        self.grid.set_wall(index, is_wall)
    }

    /// Flips the wall flag of a cell. Returns the new flag.
    pub fn toggle_wall(&mut self, index: usize) -> Result<bool> {
        self.claim_grid()?;
        let is_wall = !self.grid.cells().get(index).is_some_and(|cell| cell.is_wall);
        self.grid.set_wall(index, is_wall)?;
        Ok(self.grid[index].is_wall)
    }

    pub fn move_start(&mut self, index: usize) -> Result<()> {
        self.claim_grid()?;
        self.grid.move_start(index)
    }

    pub fn move_finish(&mut self, index: usize) -> Result<()> {
        self.claim_grid()?;
        self.grid.move_finish(index)
    }

    pub fn clear_walls(&mut self) -> Result<()> {
        self.claim_grid()?;
        self.grid.clear_walls();
        Ok(())
    }

    /// Replace the grid with a fresh one. Any replay is stopped, whatever its
    /// state, since its steps refer to the old layout.
    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<()> {
        let grid = Grid::new(rows, cols)?;
        self.replay.stop();
        self.replay.resize(grid.len());
        self.grid = grid;
        tracing::info!("Resized grid to {}x{}", rows, cols);
        Ok(())
    }

    /// Run `algorithm` and load its trace for playback. Returns the number of
    /// steps; the replay is left paused at the first step.
    pub fn visualize(&mut self, algorithm: Algorithm) -> Result<usize> {
        self.claim_grid()?;
        let trace = algorithm.solve(&mut self.grid, &self.config.solve_options())?;
        let len = trace.len();
        match trace.path() {
            Some([]) => tracing::info!("{}: no path found ({} steps)", algorithm, len),
            Some(path) => tracing::info!("{}: path of {} cells ({} steps)", algorithm, path.len(), len),
            None => tracing::info!("{}: {} steps", algorithm, len),
        }
        self.replay.load(trace, self.grid.len())?;
        Ok(len)
    }

    /// Lay out walls with `generator`. Returns the wall indices in reveal order.
    pub fn generate_walls(&mut self, generator: Generator) -> Result<Vec<usize>> {
        self.claim_grid()?;
        let walls =
            generators::generate_walls(&mut self.grid, generator, &self.config.generate_options())?;
        tracing::info!("{}: {} walls", generator, walls.len());
        Ok(walls)
    }

    pub fn tick<R: Renderer>(&mut self, renderer: &mut R) -> bool {
        let mut mirror = WallMirror {
            grid: &mut self.grid,
            inner: renderer,
        };
        self.replay.tick(&mut mirror)
    }

    pub fn step_forward<R: Renderer>(&mut self, renderer: &mut R) -> bool {
        let mut mirror = WallMirror {
            grid: &mut self.grid,
            inner: renderer,
        };
        self.replay.step_forward(&mut mirror)
    }

    pub fn step_back<R: Renderer>(&mut self, renderer: &mut R) -> bool {
        let mut mirror = WallMirror {
            grid: &mut self.grid,
            inner: renderer,
        };
        self.replay.step_back(&mut mirror)
    }

    pub fn run_to_end<R: Renderer>(&mut self, renderer: &mut R) -> ReplayState {
        let mut mirror = WallMirror {
            grid: &mut self.grid,
            inner: renderer,
        };
        self.replay.run_to_end(&mut mirror)
    }
}

/// Forwards steps to the renderer and writes Game of Life generations onto
/// the grid's wall flags, so the grid follows what is on screen.
struct WallMirror<'a, R> {
    grid: &'a mut Grid,
    inner: &'a mut R,
}

impl<R: Renderer> WallMirror<'_, R> {
    fn write_walls(&mut self, step: &Step, forward: bool) -> io::Result<()> {
        let Step::GolGeneration { changes } = step else {
            return Ok(());
        };
        let grid = &mut *self.grid;
        let mut write = |change: &GolChange| {
            grid.set_wall(change.index, change.becomes_wall == forward)
                .map(drop)
                .map_err(io::Error::other)
        };
        if forward {
            changes.iter().try_for_each(&mut write)
        } else {
            changes.iter().rev().try_for_each(&mut write)
        }
    }
}

impl<R: Renderer> Renderer for WallMirror<'_, R> {
    fn apply(&mut self, step: &Step) -> io::Result<()> {
        self.write_walls(step, true)?;
        self.inner.apply(step)
    }

    fn revert(&mut self, step: &Step) -> io::Result<()> {
        self.write_walls(step, false)?;
        self.inner.revert(step)
    }
}
