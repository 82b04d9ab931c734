mod canvas;
mod scheduler;

use std::{io, time::Instant};

pub use canvas::{Canvas, Tile};
pub use scheduler::{Scheduler, Speed};

use crate::error::{Error, Result};
use crate::solvers::{Step, StepTrace};

/// Rendering collaborator driven by the replay controller.
///
/// `revert` undoes what `apply` drew for the same step. Clearing a marking
/// that is not there must be a no-op.
pub trait Renderer {
    fn apply(&mut self, step: &Step) -> io::Result<()>;
    fn revert(&mut self, step: &Step) -> io::Result<()>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn apply(&mut self, step: &Step) -> io::Result<()> {
        (**self).apply(step)
    }

    fn revert(&mut self, step: &Step) -> io::Result<()> {
        (**self).revert(step)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayState {
    /// No trace loaded
    Idle,
    /// Auto-advancing on the scheduler cadence
    Running,
    /// Trace loaded, auto-advance suspended
    Paused,
    /// Cursor at the end of the trace
    Completed,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

/// Plays a `StepTrace` through a `Renderer`, one step per tick, with manual
/// stepping in both directions.
///
/// The cursor counts the steps applied so far and stays within
/// `0..=trace.len()`.
#[derive(Debug)]
pub struct ReplayController {
    trace: Option<StepTrace>,
    cursor: usize,
    state: ReplayState,
    scheduler: Scheduler,
    speed: Speed,
    /// Cells on the grid the trace is drawn on; steps touching indices past
    /// it are skipped.
    cell_count: usize,
}

impl Default for ReplayController {
    fn default() -> Self {
        ReplayController::new(Speed::default())
    }
}

impl ReplayController {
    pub fn new(speed: Speed) -> Self {
        ReplayController {
            trace: None,
            cursor: 0,
            state: ReplayState::Idle,
            scheduler: Scheduler::new(speed.interval()),
            speed,
            cell_count: 0,
        }
    }

    pub fn state(&self) -> ReplayState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn trace(&self) -> Option<&StepTrace> {
        self.trace.as_ref()
    }

    pub fn len(&self) -> usize {
        self.trace.as_ref().map_or(0, StepTrace::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a trace is loaded and not yet finished or stopped.
    pub fn is_active(&self) -> bool {
        matches!(self.state, ReplayState::Running | ReplayState::Paused)
    }

    /// Fraction of the trace applied so far, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        match self.len() {
            0 if self.state == ReplayState::Completed => 1.0,
            0 => 0.0,
            len => self.cursor as f64 / len as f64,
        }
    }

    pub fn can_step(&self) -> bool {
        self.state != ReplayState::Idle && self.cursor < self.len()
    }

    pub fn can_step_back(&self) -> bool {
        self.state != ReplayState::Idle && self.cursor > 0
    }

    /// Deadline of the pending tick, if the replay is running.
    pub fn next_tick(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    /// Load a trace for a grid of `cell_count` cells. Allowed from `Idle`
    /// and `Completed`; an empty trace loads straight into `Completed`.
    pub fn load(&mut self, trace: StepTrace, cell_count: usize) -> Result<()> {
        if self.is_active() {
            return Err(Error::Busy);
        }
        self.scheduler.cancel();
        self.cursor = 0;
        self.cell_count = cell_count;
        self.state = if trace.is_empty() {
            ReplayState::Completed
        } else {
            ReplayState::Paused
        };
        tracing::debug!("Loaded trace of {} steps", trace.len());
        self.trace = Some(trace);
        Ok(())
    }

    /// Start auto-advancing. Only valid from `Paused`.
    pub fn play(&mut self) -> bool {
        self.play_at(Instant::now())
    }

    pub fn play_at(&mut self, now: Instant) -> bool {
        if self.state != ReplayState::Paused {
            return false;
        }
        self.state = ReplayState::Running;
        self.scheduler.arm(now);
        true
    }

    /// Suspend auto-advance. Only valid from `Running`.
    pub fn pause(&mut self) -> bool {
        if self.state != ReplayState::Running {
            return false;
        }
        self.scheduler.cancel();
        self.state = ReplayState::Paused;
        true
    }

    /// Hard reset to `Idle`. The pending tick is cancelled before this
    /// returns, and nothing drawn so far is undone.
    pub fn stop(&mut self) {
        self.scheduler.cancel();
        if self.state != ReplayState::Idle {
            tracing::debug!("Replay stopped at step {}/{}", self.cursor, self.len());
        }
        self.trace = None;
        self.cursor = 0;
        self.state = ReplayState::Idle;
    }

    /// Grid was reallocated; steps past the new size become no-ops.
    pub fn resize(&mut self, cell_count: usize) {
        self.cell_count = cell_count;
    }

    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
        self.scheduler.set_interval(speed.interval());
    }

    pub fn speed_up(&mut self) -> Speed {
        self.set_speed(self.speed.faster());
        self.speed
    }

    pub fn slow_down(&mut self) -> Speed {
        self.set_speed(self.speed.slower());
        self.speed
    }

    /// Apply the step at the cursor and pause. Returns whether a step was
    /// consumed.
    pub fn step_forward<R: Renderer>(&mut self, renderer: &mut R) -> bool {
        if !self.can_step() {
            return false;
        }
        self.scheduler.cancel();
        self.state = ReplayState::Paused;
        self.advance(renderer)
    }

    /// Move the cursor back one step and revert that step.
    pub fn step_back<R: Renderer>(&mut self, renderer: &mut R) -> bool {
        if !self.can_step_back() {
            return false;
        }
        self.scheduler.cancel();
        self.cursor -= 1;
        self.state = ReplayState::Paused;
        self.render(self.cursor, Direction::Backward, renderer)
    }

    pub fn tick<R: Renderer>(&mut self, renderer: &mut R) -> bool {
        self.tick_at(Instant::now(), renderer)
    }

    /// Apply one step if the replay is running and the pending tick is due
    /// at `now`. Returns whether a step was applied.
    pub fn tick_at<R: Renderer>(&mut self, now: Instant, renderer: &mut R) -> bool {
        if self.state != ReplayState::Running || !self.scheduler.poll(now) {
            return false;
        }
        let applied = self.advance(renderer);
        if self.state == ReplayState::Running {
            self.scheduler.arm(now);
        }
        applied
    }

    /// Play from the cursor to the end of the trace, sleeping between ticks.
    pub fn run_to_end<R: Renderer>(&mut self, renderer: &mut R) -> ReplayState {
        self.play();
        while self.state == ReplayState::Running {
            if let Some(wait) = self.scheduler.time_until_due(Instant::now()) {
                std::thread::sleep(wait);
            }
            self.tick(renderer);
        }
        self.state
    }

    fn advance<R: Renderer>(&mut self, renderer: &mut R) -> bool {
        let position = self.cursor;
        self.cursor += 1;
        if self.cursor == self.len() {
            self.scheduler.cancel();
            self.state = ReplayState::Completed;
        }
        self.render(position, Direction::Forward, renderer)
    }

    /// Hand the step at `position` to the renderer. Out-of-range steps are
    /// skipped; a renderer fault stops the replay.
    fn render<R: Renderer>(&mut self, position: usize, direction: Direction, renderer: &mut R) -> bool {
        let Some(step) = self.trace.as_ref().and_then(|trace| trace.get(position)) else {
            return false;
        };
        if let Some(index) = step.indices().find(|&index| index >= self.cell_count) {
            tracing::warn!(
                "Skipping step {} touching cell {} on a grid of {} cells",
                position,
                index,
                self.cell_count
            );
            return true;
        }
        let result = match direction {
            Direction::Forward => renderer.apply(step),
            Direction::Backward => renderer.revert(step),
        };
        if let Err(error) = result {
            tracing::warn!("Renderer failed on step {}: {}; stopping replay", position, error);
            self.stop();
            return false;
        }
        true
    }
}
