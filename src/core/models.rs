use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const fn new(x: i32, y: i32) -> Vec2 {
        Vec2 { x, y }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2 { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cell type code, meaningful only together with the grid's theme
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellType(pub u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub kind: CellType,
    pub occupied: bool,
}

impl Cell {
    pub fn position(&self) -> Vec2 {
        Vec2 { x: self.x, y: self.y }
    }

    pub fn view(&self) -> CellView {
        CellView { x: self.x, y: self.y, kind: self.kind }
    }
}

/// The part of a cell reported back to callers after a step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "type")]
    pub kind: CellType,
}

impl CellView {
    pub fn position(&self) -> Vec2 {
        Vec2 { x: self.x, y: self.y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    #[serde(rename = "type")]
    pub kind: CellType,
    pub occupied: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Forward,
    Back,
    Left,
    Right,
    DiagUpLeft,
    DiagDownRight,
}

impl Direction {
    pub fn all() -> [Direction; 6] {
        [
            Direction::Forward,
            Direction::Back,
            Direction::Left,
            Direction::Right,
            Direction::DiagUpLeft,
            Direction::DiagDownRight,
        ]
    }

    pub fn offset(self) -> Vec2 {
        match self {
            Direction::Forward => Vec2 { x: 0, y: 1 },
            Direction::Back => Vec2 { x: 0, y: -1 },
            Direction::Left => Vec2 { x: -1, y: 0 },
            Direction::Right => Vec2 { x: 1, y: 0 },
            Direction::DiagUpLeft => Vec2 { x: -1, y: 1 },
            Direction::DiagDownRight => Vec2 { x: 1, y: -1 },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Back => "back",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::DiagUpLeft => "diag-up-left",
            Direction::DiagDownRight => "diag-down-right",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::all()
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| format!("unknown direction '{}'", s))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveRejection {
    OutOfBounds,
    Impassable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveUpdate {
    Moved(CellView),
    Rejected(MoveRejection),
}

impl MoveUpdate {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveUpdate::Moved(_))
    }
}

/// First hop of a shortest path, as computed by the path finder
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathStep {
    Next(Vec2),
    AlreadyAtGoal,
    Unreachable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub success: bool,
    pub cell: CellView,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutoStepFailure {
    NoGoal,
    NoPath,
    AtGoal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoStepReport {
    pub success: bool,
    pub cell: CellView,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<AutoStepFailure>,
}
