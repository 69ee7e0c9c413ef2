//! Engine abstraction used by the console front-end and the opponent strategy.
//!
//! Defines common input parameters and output payloads so different engine
//! strategies can be selected at runtime behind a single trait interface.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::game_state::board::Board;
use crate::game_state::board_types::Color;
use crate::game_state::errors::LaserChessResult;
use crate::game_state::movement::Movement;

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchParams {
    pub depth: Option<u8>,
    pub movetime_ms: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    pub best_move: Option<Movement>,
    pub score: Option<i32>,
    pub nodes: u64,
    pub info_lines: Vec<String>,
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn new_game(&mut self) {}

    fn set_option(&mut self, _name: &str, _value: &str) -> LaserChessResult<()> {
        Ok(())
    }

    fn set_stop_signal(&mut self, _stop_signal: Option<Arc<AtomicBool>>) {}

    /// Pick a movement for `color`. The board is only read; engines explore
    /// on their own copies.
    fn choose_move(
        &mut self,
        board: &Board,
        color: Color,
        params: &SearchParams,
    ) -> LaserChessResult<EngineOutput>;
}
