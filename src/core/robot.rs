use log::{debug, trace};

use crate::core::consts::DEFAULT_START;
use crate::core::grid::Grid;
use crate::core::path_finder::first_hop;
use crate::core::{
    AutoStepFailure, AutoStepReport, Cell, CellType, CellView, Direction, MoveRejection,
    MoveUpdate, PathStep, StepReport, Vec2,
};

/// A robot standing on one cell of a grid it borrows.
///
/// The grid owns the occupancy flags; the robot only ever moves them through
/// [`Robot::move_to`], so exactly one cell is occupied while a robot is attached.
pub struct Robot<'g> {
    grid: &'g mut Grid,
    position: Vec2,
}

impl<'g> Robot<'g> {
    /// Attaches to the flagged cell, or places the robot at the default corner.
    pub fn new(grid: &'g mut Grid) -> Robot<'g> {
        let position = grid.robot_position().unwrap_or(DEFAULT_START);
        grid.place_robot(position);
        Robot { grid, position }
    }

    pub fn grid(&self) -> &Grid {
        &*self.grid
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn current_cell(&self) -> &Cell {
        &self.grid[self.position]
    }

    pub fn current_view(&self) -> CellView {
        self.current_cell().view()
    }

    pub fn move_to(&mut self, target: Vec2) -> MoveUpdate {
        if !self.grid.contains(&target) {
            trace!("[robot] move to {} rejected: out of bounds", target);
            return MoveUpdate::Rejected(MoveRejection::OutOfBounds);
        }
        if !self.grid.is_passable_at(target) {
            trace!("[robot] move to {} rejected: impassable", target);
            return MoveUpdate::Rejected(MoveRejection::Impassable);
        }
        self.grid.place_robot(target);
        self.position = target;
        MoveUpdate::Moved(self.current_view())
    }

    pub fn move_in(&mut self, direction: Direction) -> MoveUpdate {
        self.move_to(self.position + direction.offset())
    }

    pub fn step(&mut self, direction: Direction) -> StepReport {
        let success = self.move_in(direction).is_moved();
        StepReport { success, cell: self.current_view() }
    }

    pub fn forward(&mut self) -> MoveUpdate {
        self.move_in(Direction::Forward)
    }

    pub fn back(&mut self) -> MoveUpdate {
        self.move_in(Direction::Back)
    }

    pub fn left(&mut self) -> MoveUpdate {
        self.move_in(Direction::Left)
    }

    pub fn right(&mut self) -> MoveUpdate {
        self.move_in(Direction::Right)
    }

    pub fn diag_up_left(&mut self) -> MoveUpdate {
        self.move_in(Direction::DiagUpLeft)
    }

    pub fn diag_down_right(&mut self) -> MoveUpdate {
        self.move_in(Direction::DiagDownRight)
    }

    /// Applies the rule starting at `from`, only if the current cell is of that type.
    pub fn apply_rule(&mut self, from: CellType) -> bool {
        if self.current_cell().kind != from {
            return false;
        }
        let Some(rule) = self.grid.theme().rule_for(from) else {
            return false;
        };
        self.grid.set_kind(self.position, rule.to);
        true
    }

    /// Advances the current cell one stage along the theme's progression, if any rule matches.
    pub fn apply_cell_rule(&mut self) -> bool {
        let kind = self.current_cell().kind;
        self.apply_rule(kind)
    }

    /// Workable cells in row-major order, else every finish cell, else nothing
    pub fn find_goal_cells(&self) -> Vec<Vec2> {
        let theme = self.grid.theme();
        let workable: Vec<Vec2> = self
            .grid
            .cells()
            .filter(|cell| theme.is_workable(cell.kind))
            .map(Cell::position)
            .collect();
        if !workable.is_empty() {
            return workable;
        }

        self.grid
            .cells()
            .filter(|cell| theme.is_finish(cell.kind))
            .map(Cell::position)
            .collect()
    }

    /// One move along the shortest path to the nearest goal other than the current cell
    pub fn step_toward_goal(&mut self) -> Result<CellView, AutoStepFailure> {
        let goals = self.find_goal_cells();
        if goals.is_empty() {
            return Err(AutoStepFailure::NoGoal);
        }

        let start = self.position;
        let elsewhere: Vec<Vec2> = goals.into_iter().filter(|&g| g != start).collect();
        if elsewhere.is_empty() {
            return Err(AutoStepFailure::AtGoal);
        }

        match first_hop(self.grid(), start, &elsewhere) {
            PathStep::Next(next) => match self.move_to(next) {
                MoveUpdate::Moved(cell) => Ok(cell),
                MoveUpdate::Rejected(rejection) => {
                    debug!("[robot] path step {} rejected: {:?}", next, rejection);
                    Err(AutoStepFailure::NoPath)
                }
            },
            PathStep::AlreadyAtGoal => Err(AutoStepFailure::AtGoal),
            PathStep::Unreachable => Err(AutoStepFailure::NoPath),
        }
    }

    pub fn auto_step(&mut self) -> AutoStepReport {
        match self.step_toward_goal() {
            Ok(cell) => AutoStepReport { success: true, cell, reason: None },
            Err(reason) => AutoStepReport {
                success: false,
                cell: self.current_view(),
                reason: Some(reason),
            },
        }
    }
}
