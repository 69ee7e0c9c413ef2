//! Pluggable opponent capability for the game session.
//!
//! A single operation covers every kind of opponent: an engine answers with
//! a movement at once, while a human or remote player signals that the
//! movement will arrive later through the session's external entry points.

use tracing::debug;

use crate::engines::engine_trait::{Engine, SearchParams};
use crate::game_state::board::Board;
use crate::game_state::board_types::Color;
use crate::game_state::errors::{LaserChessError, LaserChessResult};
use crate::game_state::movement::Movement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpponentReply {
    Move(Movement),
    AwaitExternal,
}

pub trait OpponentStrategy: Send {
    fn next_move(&mut self, board: &Board, color: Color) -> LaserChessResult<OpponentReply>;
}

/// Opponent backed by a search engine.
pub struct EngineOpponent {
    engine: Box<dyn Engine>,
    params: SearchParams,
}

impl EngineOpponent {
    pub fn new(engine: Box<dyn Engine>, params: SearchParams) -> Self {
        Self { engine, params }
    }

    pub fn engine_mut(&mut self) -> &mut dyn Engine {
        self.engine.as_mut()
    }
}

impl OpponentStrategy for EngineOpponent {
    fn next_move(&mut self, board: &Board, color: Color) -> LaserChessResult<OpponentReply> {
        let out = self.engine.choose_move(board, color, &self.params)?;
        for line in &out.info_lines {
            debug!(engine = self.engine.name(), "{line}");
        }
        out.best_move
            .map(OpponentReply::Move)
            .ok_or_else(|| LaserChessError::NoMovesAvailable {
                color: color.name().to_owned(),
            })
    }
}

/// Human or networked opponent: movements come in from outside.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExternalOpponent;

impl OpponentStrategy for ExternalOpponent {
    fn next_move(&mut self, _board: &Board, _color: Color) -> LaserChessResult<OpponentReply> {
        Ok(OpponentReply::AwaitExternal)
    }
}
