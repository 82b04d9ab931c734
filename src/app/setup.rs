use std::io::{self, Stdout, Write};

use crossterm::{
    QueueableCommand, cursor,
    event::{self, KeyCode, KeyEventKind},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use unicode_width::UnicodeWidthStr;

use super::{Args, Layout};
use crate::{replay::Speed, solvers::Algorithm};

const TITLES: [&str; 3] = ["Algorithm", "Layout", "Speed"];
const HINT: &str = "←/→: column  ↑/↓: choose  Enter: start  Esc: exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MenuOutcome {
    Pending,
    Start,
    Cancel,
}

/// Setup screen with one column per run choice. The focused column is
/// changed with Left/Right and its selection with Up/Down, both wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct SetupMenu {
    selected: [usize; 3],
    focus: usize,
}

impl SetupMenu {
    /// Preselects whatever the command line already chose.
    pub(super) fn new(args: &Args, speed: Speed) -> Self {
        let position = |found: Option<usize>| found.unwrap_or(0);
        let algorithm = position(
            args.algorithm
                .and_then(|a| Algorithm::ALL.iter().position(|&x| x == a)),
        );
        let layout = position(args.layout.and_then(|l| Layout::ALL.iter().position(|&x| x == l)));
        let speed = position(Speed::ALL.iter().position(|&s| s == speed));
        // Start on the first column the command line left open
        let focus = match (args.algorithm, args.layout) {
            (Some(_), None) => 1,
            _ => 0,
        };
        SetupMenu {
            selected: [algorithm, layout, speed],
            focus,
        }
    }

    fn column_len(column: usize) -> usize {
        match column {
            0 => Algorithm::ALL.len(),
            1 => Layout::ALL.len(),
            _ => Speed::ALL.len(),
        }
    }

    pub(super) fn handle(&mut self, code: KeyCode) -> MenuOutcome {
        let len = SetupMenu::column_len(self.focus);
        let selected = &mut self.selected[self.focus];
        match code {
            KeyCode::Left | KeyCode::BackTab => self.focus = (self.focus + TITLES.len() - 1) % TITLES.len(),
            KeyCode::Right | KeyCode::Tab => self.focus = (self.focus + 1) % TITLES.len(),
            KeyCode::Up => *selected = (*selected + len - 1) % len,
            KeyCode::Down => *selected = (*selected + 1) % len,
            KeyCode::Enter => return MenuOutcome::Start,
            KeyCode::Esc => return MenuOutcome::Cancel,
            _ => {}
        }
        MenuOutcome::Pending
    }

    pub(super) fn choice(&self) -> (Algorithm, Layout, Speed) {
        let [algorithm, layout, speed] = self.selected;
        (Algorithm::ALL[algorithm], Layout::ALL[layout], Speed::ALL[speed])
    }

    fn labels(column: usize) -> Vec<String> {
        match column {
            0 => Algorithm::ALL.iter().map(|a| a.to_string()).collect(),
            1 => Layout::ALL.iter().map(|l| l.to_string()).collect(),
            _ => Speed::ALL.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn draw(&self, stdout: &mut Stdout) -> io::Result<()> {
        queue!(stdout, cursor::MoveTo(0, 0), terminal::Clear(ClearType::All))?;
        stdout.queue(style::PrintStyledContent(HINT.with(Color::Yellow)))?;

        let mut x = 0u16;
        for (column, title) in TITLES.into_iter().enumerate() {
            let labels = SetupMenu::labels(column);
            let width = labels
                .iter()
                .map(|label| label.width())
                .chain([title.width()])
                .max()
                .unwrap_or(0);

            let heading = if column == self.focus {
                title.with(Color::Yellow).attribute(Attribute::Bold)
            } else {
                title.with(Color::DarkGrey)
            };
            queue!(stdout, cursor::MoveTo(x, 2), style::PrintStyledContent(heading))?;
            for (row, label) in labels.iter().enumerate() {
                stdout.queue(cursor::MoveTo(x, 3 + row as u16))?;
                if row == self.selected[column] {
                    stdout.queue(style::SetAttribute(Attribute::Reverse))?;
                }
                stdout.queue(style::Print(label))?;
                stdout.queue(style::SetAttribute(Attribute::NoReverse))?;
            }
            x = x.saturating_add(width as u16 + 3);
        }
        stdout.flush()
    }
}

/// Let the user pick the run on the setup screen. Returns `None` on Esc.
pub(super) fn choose_run(
    stdout: &mut Stdout,
    args: &Args,
    speed: Speed,
) -> io::Result<Option<(Algorithm, Layout, Speed)>> {
    let mut menu = SetupMenu::new(args, speed);
    let choice = loop {
        menu.draw(stdout)?;
        if let event::Event::Key(event::KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event::read()?
        {
            match menu.handle(code) {
                MenuOutcome::Pending => {}
                MenuOutcome::Start => break Some(menu.choice()),
                MenuOutcome::Cancel => break None,
            }
        }
    };
    queue!(stdout, cursor::MoveTo(0, 0), terminal::Clear(ClearType::All))?;
    stdout.flush()?;
    Ok(choice)
}
