mod renderer;
mod setup;

use std::{
    io::{self, Stdout, Write},
    str::FromStr,
    time::{Duration, Instant},
};

use crossterm::{
    QueueableCommand, cursor,
    event::{self, KeyCode},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

pub use renderer::TerminalRenderer;

use crate::{
    config::Config,
    error::{Error, Result},
    generators::Generator,
    replay::{ReplayState, Speed},
    session::Session,
    solvers::Algorithm,
};

/// Wall layout chosen before the search runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Open,
    Generated(Generator),
}

impl Layout {
    const ALL: [Layout; 5] = [
        Layout::Open,
        Layout::Generated(Generator::Random),
        Layout::Generated(Generator::RecurDiv),
        Layout::Generated(Generator::RecurBacktrack),
        Layout::Generated(Generator::Kruskal),
    ];
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::Open => write!(f, "Open Grid"),
            Layout::Generated(generator) => write!(f, "{generator}"),
        }
    }
}

impl FromStr for Layout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" | "none" => Ok(Layout::Open),
            other => other.parse().map(Layout::Generated),
        }
    }
}

/// Positional command line arguments: `[algorithm] [layout] [speed]`.
/// Anything left out is asked for interactively or taken from the config.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Args {
    pub algorithm: Option<Algorithm>,
    pub layout: Option<Layout>,
    pub speed: Option<Speed>,
}

impl Args {
    pub fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let algorithm = args.next().map(|s| s.parse()).transpose()?;
        let layout = args.next().map(|s| s.parse()).transpose()?;
        let speed = args.next().map(|s| s.parse()).transpose()?;
        Ok(Args {
            algorithm,
            layout,
            speed,
        })
    }
}

pub struct App {
    /// How long to wait for input when no replay tick is pending
    input_poll_timeout: Duration,
}

impl Default for App {
    fn default() -> Self {
        Self {
            input_poll_timeout: Duration::from_millis(100),
        }
    }
}

impl App {
    /// Enter raw mode on the alternate screen. A panic hook puts the
    /// terminal back before the default hook prints the message.
    pub fn setup_terminal(stdout: &mut Stdout) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = App::restore_terminal(&mut io::stdout());
            default_hook(info);
        }));
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()
    }

    pub fn restore_terminal(stdout: &mut Stdout) -> io::Result<()> {
        queue!(stdout, cursor::Show, terminal::LeaveAlternateScreen)?;
        stdout.flush()?;
        terminal::disable_raw_mode()
    }

    /// Main application loop
    pub fn run(&self, stdout: &mut Stdout, mut config: Config, args: Args) -> io::Result<()> {
        let (algorithm, layout) = match (args.algorithm, args.layout) {
            (Some(algorithm), Some(layout)) => {
                if let Some(speed) = args.speed {
                    config.speed = speed;
                }
                (algorithm, layout)
            }
            _ => match setup::choose_run(stdout, &args, args.speed.unwrap_or(config.speed))? {
                Some((algorithm, layout, speed)) => {
                    config.speed = speed;
                    (algorithm, layout)
                }
                None => return Ok(()),
            },
        };

        let (term_width, term_height) = terminal::size()?;
        let (rows, cols) = TerminalRenderer::grid_size_for(term_width, term_height);
        let mut session = match Session::new(rows, cols, config) {
            Ok(session) => session,
            Err(error) => {
                stdout.queue(style::PrintStyledContent(
                    format!("Cannot build a grid here: {error}\r\nPress Esc to exit...\r\n")
                        .with(Color::Yellow)
                        .attribute(Attribute::Bold),
                ))?;
                stdout.flush()?;
                return App::wait_for_esc();
            }
        };
        tracing::info!("Starting {} on a {}x{} grid ({})", algorithm, rows, cols, layout);

        let mut renderer = TerminalRenderer::new(session.grid());
        renderer.draw_all()?;

        if let Layout::Generated(generator) = layout {
            let walls = session.generate_walls(generator).map_err(io::Error::other)?;
            if !self.reveal_walls(&mut renderer, &walls, session.config().speed)? {
                return Ok(());
            }
            renderer.reset(session.grid())?;
        }

        session.visualize(algorithm).map_err(io::Error::other)?;
        session.replay_mut().play();
        self.replay_loop(&mut session, &mut renderer, algorithm)
    }

    /// Animate generated walls one by one. Esc skips to the final layout.
    /// Returns false if the terminal became too small and the user exited.
    fn reveal_walls(
        &self,
        renderer: &mut TerminalRenderer,
        walls: &[usize],
        speed: Speed,
    ) -> io::Result<bool> {
        let mut interval = speed.interval();
        for &index in walls {
            renderer.reveal_wall(index)?;
            if !event::poll(interval)? {
                continue;
            }
            match event::read()? {
                event::Event::Key(event::KeyEvent {
                    code,
                    kind: event::KeyEventKind::Press,
                    ..
                }) => match code {
                    KeyCode::Esc => return Ok(true),
                    KeyCode::Up => interval = (interval / 2).max(Speed::Fast.interval()),
                    KeyCode::Down => interval = (interval * 2).min(Speed::Slow.interval()),
                    _ => {}
                },
                event::Event::Resize(_, _) if !renderer.fits()? => {
                    renderer.show_too_small()?;
                    App::wait_for_esc()?;
                    return Ok(false);
                }
                _ => {}
            }
        }
        Ok(true)
    }

    /// Drive the replay until the user presses Esc.
    fn replay_loop(
        &self,
        session: &mut Session,
        renderer: &mut TerminalRenderer,
        algorithm: Algorithm,
    ) -> io::Result<()> {
        tracing::info!("Started replay loop");
        loop {
            App::draw_status(session, renderer, algorithm)?;

            let timeout = session
                .replay()
                .next_tick()
                .map(|deadline| deadline.saturating_duration_since(Instant::now()))
                .unwrap_or(self.input_poll_timeout);

            if event::poll(timeout)? {
                match event::read()? {
                    event::Event::Key(event::KeyEvent {
                        code,
                        kind: event::KeyEventKind::Press,
                        ..
                    }) => {
                        let running = session.replay().state() == ReplayState::Running;
                        match code {
                            KeyCode::Esc => {
                                tracing::debug!("[replay loop] Esc key pressed, exiting");
                                session.replay_mut().stop();
                                break;
                            }
                            KeyCode::Enter => {
                                // Toggle pause/resume
                                let replay = session.replay_mut();
                                if !replay.pause() {
                                    replay.play();
                                }
                            }
                            KeyCode::Left if !running => {
                                session.step_back(renderer);
                            }
                            KeyCode::Right if !running => {
                                session.step_forward(renderer);
                            }
                            KeyCode::Up => {
                                session.replay_mut().speed_up();
                            }
                            KeyCode::Down => {
                                session.replay_mut().slow_down();
                            }
                            _ => {} // Ignore other keys
                        }
                    }
                    event::Event::Resize(_, _) => {
                        if !renderer.fits()? {
                            session.replay_mut().stop();
                            renderer.show_too_small()?;
                            return App::wait_for_esc();
                        }
                        renderer.draw_all()?;
                    }
                    _ => {}
                }
            }

            let was_active = session.is_busy();
            session.tick(renderer);
            if was_active && session.replay().state() == ReplayState::Idle {
                // The renderer failed and the replay stopped itself
                tracing::warn!("Replay stopped after a rendering fault");
                break;
            }
        }
        tracing::info!("Exiting replay loop");
        Ok(())
    }

    fn draw_status(
        session: &Session,
        renderer: &mut TerminalRenderer,
        algorithm: Algorithm,
    ) -> io::Result<()> {
        let replay = session.replay();
        let (outcome, color) = match replay.state() {
            ReplayState::Completed => match replay.trace().and_then(|trace| trace.path()) {
                Some([]) => ("No path found.".to_string(), Color::Red),
                Some(path) => (format!("Path found! {} cells.", path.len()), Color::Green),
                None => ("Done.".to_string(), Color::Green),
            },
            state => (format!("{state:?}"), Color::Cyan),
        };
        let status = format!(
            "{} | {} | step {}/{} | {} | Enter: pause/resume  ←/→: step  ↑/↓: speed  Esc: exit",
            algorithm,
            outcome,
            replay.cursor(),
            replay.len(),
            replay.speed(),
        );
        renderer.draw_status(&status, color)
    }

    /// Block until Esc is pressed.
    fn wait_for_esc() -> io::Result<()> {
        while !matches!(
            event::read()?,
            event::Event::Key(event::KeyEvent {
                code: KeyCode::Esc,
                kind: event::KeyEventKind::Press,
                ..
            })
        ) {}
        Ok(())
    }
}
