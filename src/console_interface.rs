use crate::core::{Direction, Grid, Theme, ROBOT_FLAG};
use crate::driver::Session;
use crate::models::{ConsoleRenderState, UserAction};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};
use std::io;
use thiserror::Error;

pub const ROBOT_GLYPH: char = '@';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelParseError {
    #[error("level has no rows")]
    Empty,

    #[error("unknown glyph '{glyph}' at line {line}, column {column} for theme '{theme}'")]
    UnknownGlyph {
        glyph: char,
        line: usize,
        column: usize,
        theme: String,
    },
}

/// Parses a text level into a type matrix, one line per row with row 0 first.
///
/// Blank lines are skipped and surrounding whitespace is trimmed. Error positions count from 1. `@` places the robot
/// on the theme's base type (code 0).
pub fn parse_level(theme: &Theme, s: &str) -> Result<Vec<Vec<u8>>, LevelParseError> {
    let mut matrix = Vec::new();
    for (line_no, line) in s.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut row = Vec::with_capacity(line.len());
        for (column, ch) in line.chars().enumerate() {
            let value = if ch == ROBOT_GLYPH {
                ROBOT_FLAG
            } else {
                theme
                    .type_for_glyph(ch)
                    .ok_or_else(|| LevelParseError::UnknownGlyph {
                        glyph: ch,
                        line: line_no + 1,
                        column: column + 1,
                        theme: theme.name.clone(),
                    })?
                    .0
            };
            row.push(value);
        }
        matrix.push(row);
    }

    if matrix.is_empty() {
        return Err(LevelParseError::Empty);
    }
    Ok(matrix)
}

/// One line per row, y ascending, robot drawn over whatever it stands on
pub fn render_grid_to_string(grid: &Grid) -> String {
    let mut result = String::new();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let ch = match grid.get(x, y) {
                Some(cell) if cell.occupied => ROBOT_GLYPH,
                Some(cell) => grid.theme().glyph(cell.kind),
                None => ' ',
            };
            result.push(ch);
        }
        result.push('\n');
    }
    result
}

/// Same as [`render_grid_to_string`] but with the far row on top, so `forward` points up
pub fn render_grid_north_up(grid: &Grid) -> String {
    let text = render_grid_to_string(grid);
    let mut rows: Vec<&str> = text.lines().collect();
    rows.reverse();
    rows.join("\n")
}

pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, Box<dyn std::error::Error>>
{
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

pub fn cleanup_terminal() -> Result<(), Box<dyn std::error::Error>> {
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
    Ok(())
}

pub fn render_session(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &Session,
    state: &ConsoleRenderState,
) -> Result<(), Box<dyn std::error::Error>> {
    let legend = legend_line(session.theme());
    let status = status_line(session, state);

    terminal.draw(|f| {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3), Constraint::Length(4)])
            .split(f.area());

        let title = format!("Robot maze ({})", session.theme().name);
        let grid_paragraph = Paragraph::new(render_grid_north_up(session.grid()))
            .block(Block::default().borders(Borders::ALL).title(title))
            .style(Style::default().fg(Color::White))
            .alignment(Alignment::Center);
        f.render_widget(grid_paragraph, chunks[0]);

        let legend_paragraph = Paragraph::new(legend)
            .block(Block::default().borders(Borders::ALL).title("Legend"))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        f.render_widget(legend_paragraph, chunks[1]);

        let status_paragraph = Paragraph::new(status)
            .block(Block::default().borders(Borders::ALL).title("Status"))
            .style(Style::default().fg(if state.done { Color::Green } else { Color::Cyan }))
            .alignment(Alignment::Center);
        f.render_widget(status_paragraph, chunks[2]);
    })?;
    Ok(())
}

fn legend_line(theme: &Theme) -> String {
    let mut parts: Vec<String> = theme
        .cell_types
        .iter()
        .map(|info| format!("{} {}", info.glyph, info.name))
        .collect();
    parts.push(format!("{} Robot", ROBOT_GLYPH));
    parts.join("  ")
}

fn status_line(session: &Session, state: &ConsoleRenderState) -> String {
    let position = session.robot_position();
    let here = session.grid()[position].kind;
    let stats = session.stats();

    let controls = if state.auto_run {
        "Auto-running | P pause, R reset, Esc quit"
    } else {
        "WASD move, Q/C diagonals, Space work, Enter step, P auto, R reset, Esc quit"
    };
    let mut line = format!(
        "{}\nRobot at {} on {} | moves {} rejected {} worked {}",
        controls,
        position,
        session.theme().type_name(here),
        stats.moves,
        stats.rejected_moves,
        stats.cells_worked
    );
    if let Some(message) = &state.message {
        line.push_str(" | ");
        line.push_str(message);
    }
    line
}

pub enum ConsoleInput {
    UserAction(UserAction),
    Quit,
    Timeout,
    Unknown,
}

pub fn handle_input(poll: std::time::Duration) -> Result<ConsoleInput, Box<dyn std::error::Error>> {
    if event::poll(poll)? {
        if let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event::read()?
        {
            return Ok(match code {
                KeyCode::Esc => ConsoleInput::Quit,
                KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => {
                    ConsoleInput::UserAction(UserAction::Move(Direction::Forward))
                }
                KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => {
                    ConsoleInput::UserAction(UserAction::Move(Direction::Back))
                }
                KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                    ConsoleInput::UserAction(UserAction::Move(Direction::Left))
                }
                KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                    ConsoleInput::UserAction(UserAction::Move(Direction::Right))
                }
                KeyCode::Char('q') | KeyCode::Char('Q') => {
                    ConsoleInput::UserAction(UserAction::Move(Direction::DiagUpLeft))
                }
                KeyCode::Char('c') | KeyCode::Char('C') => {
                    ConsoleInput::UserAction(UserAction::Move(Direction::DiagDownRight))
                }
                KeyCode::Char(' ') => ConsoleInput::UserAction(UserAction::ApplyRule),
                KeyCode::Enter => ConsoleInput::UserAction(UserAction::AutoStep),
                KeyCode::Char('p') | KeyCode::Char('P') => {
                    ConsoleInput::UserAction(UserAction::ToggleAutoRun)
                }
                KeyCode::Char('r') | KeyCode::Char('R') => ConsoleInput::UserAction(UserAction::Reset),
                _ => ConsoleInput::Unknown,
            });
        }
    }
    Ok(ConsoleInput::Timeout)
}
