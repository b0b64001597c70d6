use rand::prelude::*;

use crate::core::bounds::BoundsOriginRoot;
use crate::core::consts::{DEFAULT_START, ROBOT_FLAG};
use crate::core::theme::Theme;
use crate::core::{CellType, Vec2};

/// Random type matrix: robot on the base type at the default corner, one finish elsewhere,
/// every other cell impassable with probability `obstacle_ratio` or otherwise workable.
///
/// Themes without impassable or workable types fall back to the base type for those cells.
pub fn random_matrix<R: Rng + ?Sized>(
    theme: &Theme,
    width: usize,
    height: usize,
    rng: &mut R,
    obstacle_ratio: f64,
) -> Vec<Vec<u8>> {
    let base = CellType(0);
    let ratio = if obstacle_ratio.is_nan() { 0.0 } else { obstacle_ratio.clamp(0.0, 1.0) };
    let mut matrix = vec![vec![base.0; width]; height];

    for (y, row) in matrix.iter_mut().enumerate() {
        for (x, value) in row.iter_mut().enumerate() {
            let kind = if rng.random_bool(ratio) {
                theme.impassable.choose(rng)
            } else {
                theme.workable.choose(rng)
            };
            *value = kind.copied().unwrap_or(base).0;
            if x == DEFAULT_START.x as usize && y == DEFAULT_START.y as usize {
                *value = base.0 | ROBOT_FLAG;
            }
        }
    }

    let finish_spots: Vec<Vec2> = BoundsOriginRoot::new(width as i32, height as i32)
        .iter_row_major()
        .filter(|&pos| pos != DEFAULT_START)
        .collect();
    if let Some(pos) = finish_spots.choose(rng) {
        matrix[pos.y as usize][pos.x as usize] = theme.finish.0;
    }

    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::build_grid;
    use rand::rngs::StdRng;

    #[test]
    fn same_seed_same_maze() {
        let theme = Theme::panel();
        let a = random_matrix(&theme, 12, 9, &mut StdRng::seed_from_u64(7), 0.25);
        let b = random_matrix(&theme, 12, 9, &mut StdRng::seed_from_u64(7), 0.25);
        assert_eq!(a, b);
    }

    #[test]
    fn generated_maze_builds_with_robot_at_origin_and_one_finish() {
        for theme in [Theme::panel(), Theme::plumbing(), Theme::hydro()] {
            let mut rng = StdRng::seed_from_u64(42);
            let matrix = random_matrix(&theme, 10, 6, &mut rng, 0.3);
            let grid = build_grid(theme.clone(), &matrix).expect("generated maze builds");

            assert_eq!(grid.robot_position(), Some(DEFAULT_START));
            let finishes = grid.cells().filter(|c| theme.is_finish(c.kind)).count();
            assert_eq!(finishes, 1, "theme {}", theme.name);
        }
    }

    #[test]
    fn zero_ratio_places_no_obstacles() {
        let theme = Theme::hydro();
        let matrix = random_matrix(&theme, 8, 8, &mut StdRng::seed_from_u64(3), 0.0);
        let grid = build_grid(theme.clone(), &matrix).unwrap();
        assert!(grid.cells().all(|c| !theme.is_impassable(c.kind)));
    }
}
