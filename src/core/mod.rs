mod bounded_grid;
mod bounds;
mod consts;
mod error;
mod generate;
mod grid;
mod models;
mod path_finder;
mod robot;
mod theme;

pub use bounds::BoundsOriginRoot;
pub use consts::*;
pub use error::{GridError, ThemeError};
pub use generate::random_matrix;
pub use grid::{build_grid, Grid, Sweep};
pub use models::{
    AutoStepFailure, AutoStepReport, Cell, CellSnapshot, CellType, CellView, Direction,
    MoveRejection, MoveUpdate, PathStep, StepReport, Vec2,
};
pub use path_finder::first_hop;
pub use robot::Robot;
pub use theme::{CellRule, CellTypeInfo, Theme, BUILTIN_THEMES};
