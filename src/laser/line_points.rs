//! Polyline geometry for drawing a laser route.
//!
//! Start and end steps sit at cell centres, deflections turn at the centre of
//! the deflecting cell, and pass-through cells contribute the point where the
//! beam leaves them.

use crate::game_state::board_types::Direction;
use crate::laser::laser_route::{LaserAction, LaserEvent, LaserPathStep};

pub fn line_points(route: &[LaserPathStep], cell_size: f32) -> Vec<(f32, f32)> {
    route
        .iter()
        .map(|step| {
            let left = f32::from(step.location.col) * cell_size;
            let top = f32::from(step.location.row) * cell_size;
            let half = cell_size / 2.0;
            let centre = (left + half, top + half);

            match (step.event, step.action, step.direction) {
                (LaserEvent::Central, LaserAction::Nothing, Some(direction)) => match direction {
                    Direction::Top => (left + half, top),
                    Direction::Right => (left + cell_size, top + half),
                    Direction::Bottom => (left + half, top + cell_size),
                    Direction::Left => (left, top + half),
                },
                _ => centre,
            }
        })
        .collect()
}
