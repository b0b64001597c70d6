use log::{info, warn};
use serde::Serialize;

use crate::core::{
    build_grid, AutoStepFailure, AutoStepReport, CellSnapshot, CellView, Direction, Grid,
    GridError, Robot, StepReport, Theme, Vec2,
};

/// Receives the grid after every tick of [`Session::run`]
pub trait Renderer {
    fn render(&mut self, snapshot: &[Vec<CellSnapshot>], robot: Vec2);
}

impl<F> Renderer for F
where
    F: FnMut(&[Vec<CellSnapshot>], Vec2),
{
    fn render(&mut self, snapshot: &[Vec<CellSnapshot>], robot: Vec2) {
        self(snapshot, robot)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub ticks: usize,
    pub moves: usize,
    pub rejected_moves: usize,
    pub cells_worked: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Finished(CellView),
    Worked(CellView),
    Moved(CellView),
    Stalled(AutoStepFailure),
}

impl TickOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TickOutcome::Finished(_) | TickOutcome::Stalled(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Finished { ticks: usize },
    Stalled { ticks: usize, reason: AutoStepFailure },
    TickLimit { ticks: usize },
}

/// Everything a driver loop needs between calls: the source layout, the live grid and counters.
///
/// Owned by the caller and passed by reference; reset rebuilds from the source matrix.
#[derive(Clone, Debug)]
pub struct Session {
    source: Vec<Vec<u8>>,
    grid: Grid,
    stats: SessionStats,
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionState {
    pub theme: String,
    pub robot_position: Vec2,
    pub cell_type: String,
    pub cells: Vec<Vec<CellSnapshot>>,
    pub stats: SessionStats,
}

impl Session {
    pub fn new(theme: Theme, matrix: Vec<Vec<u8>>) -> Result<Session, GridError> {
        let mut grid = build_grid(theme, &matrix)?;
        let start = Robot::new(&mut grid).position();
        info!(
            "[session] theme '{}' {}x{} robot at {}",
            grid.theme().name,
            grid.width(),
            grid.height(),
            start
        );
        Ok(Session { source: matrix, grid, stats: SessionStats::default() })
    }

    pub fn reset(&mut self) -> Result<(), GridError> {
        let mut grid = build_grid(self.grid.theme().clone(), &self.source)?;
        Robot::new(&mut grid);
        self.grid = grid;
        self.stats = SessionStats::default();
        info!("[session] reset");
        Ok(())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn theme(&self) -> &Theme {
        self.grid.theme()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn robot(&mut self) -> Robot<'_> {
        Robot::new(&mut self.grid)
    }

    pub fn robot_position(&self) -> Vec2 {
        // Session::new always places the robot
        self.grid.robot_position().unwrap_or_default()
    }

    pub fn step(&mut self, direction: Direction) -> StepReport {
        let report = self.robot().step(direction);
        self.count_move(report.success);
        report
    }

    pub fn auto_step(&mut self) -> AutoStepReport {
        let report = self.robot().auto_step();
        if report.success {
            self.stats.moves += 1;
        }
        report
    }

    pub fn apply_cell_rule(&mut self) -> bool {
        let worked = self.robot().apply_cell_rule();
        if worked {
            self.stats.cells_worked += 1;
        }
        worked
    }

    pub fn snapshot(&self) -> Vec<Vec<CellSnapshot>> {
        self.grid.snapshot()
    }

    pub fn state(&self) -> SessionState {
        let position = self.robot_position();
        let kind = self.grid[position].kind;
        SessionState {
            theme: self.theme().name.clone(),
            robot_position: position,
            cell_type: self.theme().type_name(kind).to_string(),
            cells: self.snapshot(),
            stats: self.stats,
        }
    }

    /// One unit of automatic work: stop on finish, else work the current cell, else move on.
    pub fn tick(&mut self) -> TickOutcome {
        self.stats.ticks += 1;
        let mut robot = Robot::new(&mut self.grid);
        let here = robot.current_view();

        if robot.grid().theme().is_finish(here.kind) {
            return TickOutcome::Finished(here);
        }
        if robot.apply_cell_rule() {
            let worked = robot.current_view();
            self.stats.cells_worked += 1;
            return TickOutcome::Worked(worked);
        }

        let report = robot.auto_step();
        match report.reason {
            None => {
                self.stats.moves += 1;
                TickOutcome::Moved(report.cell)
            }
            Some(reason) => TickOutcome::Stalled(reason),
        }
    }

    /// Ticks until the robot finishes, stalls, or `max_ticks` run out.
    pub fn run<R: Renderer + ?Sized>(&mut self, max_ticks: usize, renderer: &mut R) -> RunOutcome {
        for done in 1..=max_ticks {
            let outcome = self.tick();
            renderer.render(&self.snapshot(), self.robot_position());
            match outcome {
                TickOutcome::Finished(cell) => {
                    info!("[session] finished at {} after {} ticks", cell.position(), done);
                    return RunOutcome::Finished { ticks: done };
                }
                TickOutcome::Stalled(reason) => {
                    warn!("[session] stalled after {} ticks: {:?}", done, reason);
                    return RunOutcome::Stalled { ticks: done, reason };
                }
                TickOutcome::Worked(_) | TickOutcome::Moved(_) => {}
            }
        }
        RunOutcome::TickLimit { ticks: max_ticks }
    }

    fn count_move(&mut self, success: bool) {
        if success {
            self.stats.moves += 1;
        } else {
            self.stats.rejected_moves += 1;
        }
    }
}
