use crate::core::bounded_grid::BoundedGrid;
use crate::core::bounds::BoundsOriginRoot;
use std::collections::VecDeque;

use crate::core::consts::{FLOOD_OFFSETS, ROBOT_FLAG, TYPE_MASK};
use crate::core::error::GridError;
use crate::core::theme::Theme;
use crate::core::{Cell, CellSnapshot, CellType, Vec2};

/// Fixed-shape cell grid. Only per-cell type and occupancy change after construction.
#[derive(Clone, Debug)]
pub struct Grid {
    theme: Theme,
    cells: BoundedGrid<Cell>,
    robot: Option<Vec2>,
}

/// Row order for [`Grid::serpentine`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sweep {
    /// Starts at (0,0), row 0 first
    FromOrigin,
    /// Starts at (0, height-1), last row first
    FromFarRow,
}

/// Builds a grid from a matrix of cell codes indexed `[y][x]`.
///
/// The low three bits of each value select the cell type, bit `0x8` marks the robot.
pub fn build_grid(theme: Theme, matrix: &[Vec<u8>]) -> Result<Grid, GridError> {
    let height = matrix.len();
    if height == 0 {
        return Err(GridError::NoRows);
    }
    let width = matrix[0].len();
    if width == 0 {
        return Err(GridError::NoColumns);
    }
    if width.checked_mul(height).is_none_or(|area| area > i32::MAX as usize) {
        return Err(GridError::TooLarge { width, height });
    }

    let mut cells = Vec::with_capacity(width * height);
    let mut robot: Option<Vec2> = None;
    for (y, row) in matrix.iter().enumerate() {
        if row.len() != width {
            return Err(GridError::Ragged { row: y, expected: width, found: row.len() });
        }
        for (x, &value) in row.iter().enumerate() {
            let position = Vec2 { x: x as i32, y: y as i32 };
            let kind = CellType(value & TYPE_MASK);
            if value & !(TYPE_MASK | ROBOT_FLAG) != 0 || !theme.is_defined(kind) {
                return Err(GridError::UnknownCellType {
                    position,
                    code: value,
                    theme: theme.name.clone(),
                });
            }
            let occupied = value & ROBOT_FLAG != 0;
            if occupied {
                if let Some(first) = robot {
                    return Err(GridError::MultipleRobots { first, second: position });
                }
                robot = Some(position);
            }
            cells.push(Cell { x: position.x, y: position.y, kind, occupied });
        }
    }

    let bounds = BoundsOriginRoot::new(width as i32, height as i32);
    Ok(Grid {
        theme,
        cells: BoundedGrid::from_row_major(bounds, cells),
        robot,
    })
}

impl Grid {
    /// A `width` x `height` grid with every cell set to `kind` and no robot
    pub fn filled(theme: Theme, width: usize, height: usize, kind: CellType) -> Result<Grid, GridError> {
        let row = vec![kind.0; width];
        build_grid(theme, &vec![row; height])
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn width(&self) -> i32 {
        self.cells.size().width()
    }

    pub fn height(&self) -> i32 {
        self.cells.size().height()
    }

    pub fn bounds(&self) -> BoundsOriginRoot {
        self.cells.size()
    }

    pub fn contains(&self, pos: &Vec2) -> bool {
        self.cells.contains(pos)
    }

    /// The cell at (x, y), or `None` when out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.cells.get(&Vec2 { x, y })
    }

    /// The single predicate for whether a robot may stand at (x, y)
    pub fn is_passable(&self, x: i32, y: i32) -> bool {
        match self.get(x, y) {
            Some(cell) => !self.theme.is_impassable(cell.kind),
            None => false,
        }
    }

    pub fn is_passable_at(&self, pos: Vec2) -> bool {
        self.is_passable(pos.x, pos.y)
    }

    pub fn robot_position(&self) -> Option<Vec2> {
        self.robot
    }

    /// Moves the occupied flag to `pos`, clearing it everywhere else
    pub(crate) fn place_robot(&mut self, pos: Vec2) {
        if let Some(old) = self.robot.take() {
            if let Some(cell) = self.cells.get_mut(&old) {
                cell.occupied = false;
            }
        }
        if let Some(cell) = self.cells.get_mut(&pos) {
            cell.occupied = true;
            self.robot = Some(pos);
        }
    }

    pub(crate) fn set_kind(&mut self, pos: Vec2, kind: CellType) {
        if let Some(cell) = self.cells.get_mut(&pos) {
            cell.kind = kind;
        }
    }

    /// Every cell, y ascending then x ascending
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn snapshot(&self) -> Vec<Vec<CellSnapshot>> {
        self.cells
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| CellSnapshot { kind: cell.kind, occupied: cell.occupied })
                    .collect()
            })
            .collect()
    }

    /// Inverse of [`build_grid`]: type codes with the robot flag on the occupied cell
    pub fn to_matrix(&self) -> Vec<Vec<u8>> {
        self.cells
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| if cell.occupied { cell.kind.0 | ROBOT_FLAG } else { cell.kind.0 })
                    .collect()
            })
            .collect()
    }

    /// Passable cells in boustrophedon order: each row reverses the previous row's direction.
    pub fn serpentine(&self, sweep: Sweep) -> impl Iterator<Item = &Cell> + '_ {
        let width = self.width();
        let height = self.height();
        (0..height)
            .flat_map(move |row| {
                let y = match sweep {
                    Sweep::FromOrigin => row,
                    Sweep::FromFarRow => height - 1 - row,
                };
                let left_to_right = row % 2 == 0;
                (0..width).map(move |i| {
                    let x = if left_to_right { i } else { width - 1 - i };
                    Vec2 { x, y }
                })
            })
            .filter(|pos| self.is_passable_at(*pos))
            .filter_map(|pos| self.cells.get(&pos))
    }

    /// Passable cells connected to `start` through orthogonal steps, in breadth-first order.
    ///
    /// Empty when `start` is outside the grid or impassable.
    pub fn reachable_from(&self, start: Vec2) -> impl Iterator<Item = &Cell> + '_ {
        let mut order = Vec::new();
        if self.is_passable_at(start) {
            let mut visited = BoundedGrid::new(self.bounds(), false);
            visited[&start] = true;
            let mut frontier = VecDeque::from([start]);
            while let Some(current) = frontier.pop_front() {
                order.push(current);
                for offset in FLOOD_OFFSETS {
                    let next = current + offset;
                    if !self.is_passable_at(next) || visited[&next] {
                        continue;
                    }
                    visited[&next] = true;
                    frontier.push_back(next);
                }
            }
        }
        order.into_iter().map(move |pos| &self.cells[&pos])
    }
}

impl std::ops::Index<Vec2> for Grid {
    type Output = Cell;

    fn index(&self, index: Vec2) -> &Self::Output {
        &self.cells[&index]
    }
}
