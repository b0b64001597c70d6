use std::collections::{HashSet, VecDeque};

use log::{debug, trace};

use crate::core::bounded_grid::BoundedGrid;
use crate::core::consts::NEIGHBOR_OFFSETS;
use crate::core::grid::Grid;
use crate::core::{PathStep, Vec2};

/// Breadth-first search from `start` toward the nearest of `goals`, returning only the first hop.
///
/// Callers re-run the search after every move, so the full path is never materialised.
/// Expansion follows [`NEIGHBOR_OFFSETS`] order, which makes ties between equally distant
/// goals resolve the same way on every call.
pub fn first_hop(grid: &Grid, start: Vec2, goals: &[Vec2]) -> PathStep {
    if goals.is_empty() || !grid.contains(&start) {
        return PathStep::Unreachable;
    }
    let goal_set: HashSet<Vec2> = goals.iter().copied().collect();

    // predecessor per cell; start maps to itself so it reads as visited
    let mut came_from: BoundedGrid<Option<Vec2>> = BoundedGrid::new(grid.bounds(), None);
    if let Some(slot) = came_from.get_mut(&start) {
        *slot = Some(start);
    }

    let mut frontier = VecDeque::from([start]);
    let mut expanded = 0usize;

    while let Some(current) = frontier.pop_front() {
        expanded += 1;

        if goal_set.contains(&current) {
            let step = walk_back(&came_from, start, current);
            debug!(
                "[bfs] start={} goal={} step={:?} expanded={}",
                start, current, step, expanded
            );
            return step;
        }

        for offset in NEIGHBOR_OFFSETS {
            let next = current + offset;
            if !grid.is_passable_at(next) {
                continue;
            }
            let slot = &mut came_from[&next];
            if slot.is_some() {
                continue;
            }
            *slot = Some(current);
            frontier.push_back(next);
        }
    }

    debug!("[bfs] start={} unreachable after expanding {} cells", start, expanded);
    PathStep::Unreachable
}

/// Follows predecessors from `goal` back to `start` and reports the cell entered first
fn walk_back(came_from: &BoundedGrid<Option<Vec2>>, start: Vec2, goal: Vec2) -> PathStep {
    if goal == start {
        return PathStep::AlreadyAtGoal;
    }

    let mut current = goal;
    loop {
        match came_from.get(&current).copied().flatten() {
            Some(previous) if previous == start => return PathStep::Next(current),
            Some(previous) if previous != current => current = previous,
            _ => {
                trace!("[bfs] broken predecessor chain at {}", current);
                return PathStep::Unreachable;
            }
        }
    }
}
