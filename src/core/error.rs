use thiserror::Error;

use crate::core::Vec2;

/// Reasons a type matrix cannot become a grid. No partial grid is ever produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("malformed grid: matrix has no rows")]
    NoRows,

    #[error("malformed grid: rows have no columns")]
    NoColumns,

    #[error("malformed grid: row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("malformed grid: unknown cell type code {code} at {position} for theme '{theme}'")]
    UnknownCellType {
        position: Vec2,
        code: u8,
        theme: String,
    },

    #[error("malformed grid: robot flagged at both {first} and {second}")]
    MultipleRobots { first: Vec2, second: Vec2 },

    #[error("malformed grid: dimensions {width}x{height} are too large")]
    TooLarge { width: usize, height: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThemeError {
    #[error("theme '{0}' defines no cell types")]
    NoCellTypes(String),

    #[error("theme '{theme}' defines {count} cell types, at most {max} fit in a cell code")]
    TooManyCellTypes {
        theme: String,
        count: usize,
        max: usize,
    },

    #[error("theme '{theme}' refers to undefined cell type code {code}")]
    UndefinedCode { theme: String, code: u8 },

    #[error("theme '{theme}' uses glyph '{glyph}' for more than one cell type")]
    DuplicateGlyph { theme: String, glyph: char },

    #[error("theme '{theme}' has more than one rule starting from code {code}")]
    DuplicateRule { theme: String, code: u8 },

    #[error("theme '{theme}' progression cycles back through code {code}")]
    CyclicProgression { theme: String, code: u8 },

    #[error("theme '{theme}' marks code {code} workable but has no rule for it")]
    UnworkableType { theme: String, code: u8 },

    #[error("theme '{theme}' finish type must be passable and not workable")]
    InvalidFinish { theme: String },
}
