// Terminal robot maze.
// Controls: W/A/S/D or arrows move, Q/C diagonals, Space works the cell, Enter takes one
// auto step, P toggles auto-run, R resets, Esc quits.

use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use RobotMaze::config::{resolve_theme, LevelConfig};
use RobotMaze::console_interface::{
    cleanup_terminal, handle_input, render_grid_to_string, render_session, setup_terminal,
    ConsoleInput,
};
use RobotMaze::core::{random_matrix, CellSnapshot, CellType, Theme, Vec2, ROBOT_FLAG};
use RobotMaze::driver::{RunOutcome, Session, TickOutcome};
use RobotMaze::models::{ConsoleRenderState, UserAction};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Drive the robot from the keyboard
    Interactive,
    /// Run the work loop headless and print the final grid
    Auto,
    /// Run the work loop headless and print the final state as JSON
    Snapshot,
}

/// Robot in a grid maze
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(value_enum, default_value = "interactive")]
    mode: Mode,

    /// JSON level file (theme plus matrix or text level)
    #[arg(short, long)]
    level: Option<PathBuf>,

    /// Built-in theme used when no level file is given
    #[arg(short, long, default_value = "panel")]
    theme: String,

    /// Generate a random maze of the given size, e.g. 12x8
    #[arg(long, value_parser = parse_size)]
    random: Option<(usize, usize)>,

    /// Seed for --random
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Share of random cells that are impassable
    #[arg(long, default_value = "0.2")]
    obstacles: f64,

    /// Tick limit for the work loop
    #[arg(long, default_value = "10000")]
    max_ticks: usize,

    /// Delay between auto-run ticks in interactive mode
    #[arg(long, default_value = "200")]
    tick_ms: u64,

    /// Log destination while the terminal UI is active
    #[arg(long, default_value = "robot_maze.log")]
    log_file: PathBuf,
}

fn parse_size(s: &str) -> Result<(usize, usize), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let w = w.trim().parse::<usize>().map_err(|e| e.to_string())?;
    let h = h.trim().parse::<usize>().map_err(|e| e.to_string())?;
    if w == 0 || h == 0 {
        return Err("width and height must be positive".to_string());
    }
    Ok((w, h))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    init_logging(match args.mode {
        Mode::Interactive => Some(&args.log_file),
        Mode::Auto | Mode::Snapshot => None,
    })?;

    let mut session = load_session(&args)?;

    match args.mode {
        Mode::Interactive => {
            let mut terminal = setup_terminal()?;
            let result = run_interactive(&mut session, &mut terminal, Duration::from_millis(args.tick_ms));
            cleanup_terminal()?;
            result?;
        }
        Mode::Auto => {
            let outcome = session.run(args.max_ticks, &mut |_: &[Vec<CellSnapshot>], _: Vec2| {});
            print!("{}", render_grid_to_string(session.grid()));
            println!("{}", describe_run(&outcome));
            println!("{:?}", session.stats());
        }
        Mode::Snapshot => {
            session.run(args.max_ticks, &mut |_: &[Vec<CellSnapshot>], _: Vec2| {});
            println!("{}", serde_json::to_string_pretty(&session.state())?);
        }
    }

    Ok(())
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn load_session(args: &Args) -> Result<Session, Box<dyn std::error::Error>> {
    if let Some(path) = &args.level {
        return Ok(LevelConfig::load(path)?.into_session()?);
    }

    let theme = resolve_theme(&args.theme)?;
    let matrix = match args.random {
        Some((width, height)) => {
            let mut rng = StdRng::seed_from_u64(args.seed);
            random_matrix(&theme, width, height, &mut rng, args.obstacles)
        }
        None => demo_matrix(&theme, 7, 5),
    };
    Ok(Session::new(theme, matrix)?)
}

/// The classroom layout: robot in one corner, finish in the other, a few obstacles between.
fn demo_matrix(theme: &Theme, width: usize, height: usize) -> Vec<Vec<u8>> {
    let base = CellType(0);
    let wall = theme.impassable.first().copied().unwrap_or(base);
    let block = theme.impassable.last().copied().unwrap_or(base);
    let alternate = theme.workable.iter().copied().find(|&kind| kind != base).unwrap_or(base);

    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| match (x, y) {
                    (0, 0) => base.0 | ROBOT_FLAG,
                    _ if x == width - 1 && y == height - 1 => theme.finish.0,
                    (2, 1) | (3, 2) => wall.0,
                    (1, 2) => block.0,
                    _ if (x + y) % 3 == 0 => alternate.0,
                    _ => base.0,
                })
                .collect()
        })
        .collect()
}

fn describe_run(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::Finished { ticks } => format!("Work complete after {} ticks", ticks),
        RunOutcome::Stalled { ticks, reason } => {
            format!("Stopped after {} ticks: {:?}", ticks, reason)
        }
        RunOutcome::TickLimit { ticks } => format!("Tick limit {} reached", ticks),
    }
}

fn describe_tick(session: &Session, outcome: &TickOutcome) -> String {
    let theme = session.theme();
    match outcome {
        TickOutcome::Finished(cell) => format!("Work complete at {}", cell.position()),
        TickOutcome::Worked(cell) => {
            format!("Worked {} into {}", cell.position(), theme.type_name(cell.kind))
        }
        TickOutcome::Moved(cell) => format!("Moving to {}", cell.position()),
        TickOutcome::Stalled(reason) => format!("No way forward: {:?}", reason),
    }
}

fn run_interactive(
    session: &mut Session,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    tick: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = ConsoleRenderState { auto_run: false, message: None, done: false };
    render_session(terminal, session, &state)?;

    loop {
        let poll = if state.auto_run { tick } else { Duration::from_millis(50) };
        match handle_input(poll)? {
            ConsoleInput::Quit => break,
            ConsoleInput::UserAction(action) => {
                let message = apply_action(session, &mut state, action)?;
                state.message = Some(message);
                render_session(terminal, session, &state)?;
            }
            ConsoleInput::Timeout if state.auto_run => {
                let outcome = session.tick();
                state.message = Some(describe_tick(session, &outcome));
                if outcome.is_terminal() {
                    state.auto_run = false;
                    state.done = matches!(outcome, TickOutcome::Finished(_));
                }
                render_session(terminal, session, &state)?;
            }
            ConsoleInput::Timeout | ConsoleInput::Unknown => {}
        }
    }

    Ok(())
}

fn apply_action(
    session: &mut Session,
    state: &mut ConsoleRenderState,
    action: UserAction,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match action {
        UserAction::Move(direction) => {
            let report = session.step(direction);
            if report.success {
                format!("Moved {} to {}", direction.name(), report.cell.position())
            } else {
                format!("Cannot move {}", direction.name())
            }
        }
        UserAction::ApplyRule => {
            if session.apply_cell_rule() {
                "Cell worked".to_string()
            } else {
                "Nothing to do here".to_string()
            }
        }
        UserAction::AutoStep => {
            let report = session.auto_step();
            match report.reason {
                None => format!("Moving to {}", report.cell.position()),
                Some(reason) => format!("No way forward: {:?}", reason),
            }
        }
        UserAction::ToggleAutoRun => {
            state.auto_run = !state.auto_run;
            if state.auto_run { "Auto-run on" } else { "Auto-run paused" }.to_string()
        }
        UserAction::Reset => {
            session.reset()?;
            state.auto_run = false;
            state.done = false;
            "Reset".to_string()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_layout_mixes_in_a_second_workable_type() {
        for theme in [Theme::panel(), Theme::plumbing(), Theme::hydro()] {
            let matrix = demo_matrix(&theme, 7, 5);
            let second = theme.workable.iter().copied().find(|&kind| kind != CellType(0)).unwrap();
            assert!(
                matrix.iter().flatten().any(|&value| value == second.0),
                "theme {} has no {}",
                theme.name,
                theme.type_name(second)
            );
            assert!(Session::new(theme, matrix).is_ok());
        }
    }
}
