use crate::core::Vec2;

/// Low bits of a matrix value carry the cell type code
pub const TYPE_MASK: u8 = 0x7;
/// Set on the one matrix value whose cell holds the robot
pub const ROBOT_FLAG: u8 = 0x8;
pub const MAX_CELL_TYPES: usize = (TYPE_MASK as usize) + 1;

/// Where a robot is placed when no cell carries the robot flag
pub const DEFAULT_START: Vec2 = Vec2 { x: 0, y: 0 };

/// Search adjacency, without (+1,+1) and (-1,-1). Order is the BFS tie-break.
pub const NEIGHBOR_OFFSETS: [Vec2; 6] = [
    Vec2 { x: 1, y: 0 },
    Vec2 { x: -1, y: 0 },
    Vec2 { x: 0, y: 1 },
    Vec2 { x: 0, y: -1 },
    Vec2 { x: -1, y: 1 },
    Vec2 { x: 1, y: -1 },
];

/// Orthogonal steps for [`Grid::reachable_from`](crate::core::Grid::reachable_from), in visit order
pub const FLOOD_OFFSETS: [Vec2; 4] = [
    Vec2 { x: 0, y: 1 },
    Vec2 { x: 0, y: -1 },
    Vec2 { x: -1, y: 0 },
    Vec2 { x: 1, y: 0 },
];
