//! Laser beam tracing.
//!
//! A beam starts at the firing color's emitter and advances one cell at a
//! time. Empty cells are crossed, occupied cells are resolved through the
//! [`HitTable`], and the trace stops on a kill, on an absorbing hit, or when
//! the beam leaves the grid. The resulting route is pure data: it drives the
//! renderer and its final step decides whether a piece is removed.

use std::sync::Arc;

use crate::game_state::board::Board;
use crate::game_state::board_rules::laser_home;
use crate::game_state::board_types::{Color, Direction, Location, PieceKind, BOARD_COLS, BOARD_ROWS};
use crate::game_state::errors::{LaserChessError, LaserChessResult};
use crate::laser::hit_table::{HitOutcome, HitTable};

/// A beam can enter each cell from each direction at most once, plus the
/// start step and the step past the edge.
pub const MAX_ROUTE_STEPS: usize = BOARD_COLS * BOARD_ROWS * 4 + 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaserEvent {
    Start,
    Central,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaserAction {
    Nothing,
    Deflect,
    Kill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LaserPathStep {
    pub event: LaserEvent,
    /// Travel direction leaving this step; `None` once the beam is past the edge.
    pub direction: Option<Direction>,
    pub action: LaserAction,
    pub location: Location,
}

impl LaserPathStep {
    #[inline]
    const fn new(
        event: LaserEvent,
        direction: Option<Direction>,
        action: LaserAction,
        location: Location,
    ) -> Self {
        Self {
            event,
            direction,
            action,
            location,
        }
    }
}

pub type LaserRoute = Vec<LaserPathStep>;

/// Tracer bound to one immutable hit table for its whole lifetime.
#[derive(Debug, Clone)]
pub struct LaserEngine {
    hit_table: Arc<HitTable>,
}

impl LaserEngine {
    pub fn new(hit_table: Arc<HitTable>) -> Self {
        Self { hit_table }
    }

    pub fn official() -> LaserChessResult<Self> {
        Ok(Self::new(Arc::new(HitTable::official()?)))
    }

    #[inline]
    pub fn hit_table(&self) -> &Arc<HitTable> {
        &self.hit_table
    }

    pub fn trace_route(&self, board: &Board, firing: Color) -> LaserChessResult<LaserRoute> {
        trace_laser_route(board, firing, &self.hit_table)
    }
}

pub fn trace_laser_route(
    board: &Board,
    firing: Color,
    hit_table: &HitTable,
) -> LaserChessResult<LaserRoute> {
    let home = laser_home(firing);
    let emitter = board
        .piece_at(home)
        .filter(|piece| piece.kind == PieceKind::Laser && piece.color == firing);

    let Some(emitter) = emitter else {
        // No emitter on its home square: a harmless single-step route.
        return Ok(vec![LaserPathStep::new(
            LaserEvent::End,
            None,
            LaserAction::Nothing,
            home,
        )]);
    };

    let mut direction = Direction::Top.rotated_by(emitter.orientation);
    let mut location = home;
    let mut action = LaserAction::Nothing;
    let mut route = Vec::with_capacity(16);
    route.push(LaserPathStep::new(
        LaserEvent::Start,
        Some(direction),
        action,
        location,
    ));

    loop {
        if route.len() >= MAX_ROUTE_STEPS {
            return Err(LaserChessError::RouteOverflow {
                limit: MAX_ROUTE_STEPS,
            });
        }

        location = location.step(direction);

        if !location.is_on_board() {
            route.push(LaserPathStep::new(LaserEvent::End, None, action, location));
            return Ok(route);
        }

        let Some(piece) = board.piece_at(location) else {
            action = LaserAction::Nothing;
            route.push(LaserPathStep::new(
                LaserEvent::Central,
                Some(direction),
                action,
                location,
            ));
            continue;
        };

        match hit_table.outcome(direction, piece.kind, piece.orientation) {
            HitOutcome::Kill => {
                route.push(LaserPathStep::new(
                    LaserEvent::End,
                    Some(direction),
                    LaserAction::Kill,
                    location,
                ));
                return Ok(route);
            }
            HitOutcome::Nothing => {
                route.push(LaserPathStep::new(
                    LaserEvent::End,
                    Some(direction),
                    LaserAction::Nothing,
                    location,
                ));
                return Ok(route);
            }
            HitOutcome::Deflect(new_direction) => {
                direction = new_direction;
                action = LaserAction::Deflect;
                route.push(LaserPathStep::new(
                    LaserEvent::Central,
                    Some(direction),
                    action,
                    location,
                ));
            }
        }
    }
}
