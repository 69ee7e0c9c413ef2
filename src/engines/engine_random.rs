//! Random-move engine.
//!
//! Selects uniformly from every candidate movement and is primarily used for
//! diagnostics and low-strength play.

use rand::prelude::IndexedRandom;

use crate::engines::engine_trait::{Engine, EngineOutput, SearchParams};
use crate::game_state::board::Board;
use crate::game_state::board_rules::RulesConfig;
use crate::game_state::board_types::Color;
use crate::game_state::errors::{LaserChessError, LaserChessResult};
use crate::move_generation::movement_validator::candidate_moves;

#[derive(Debug, Default)]
pub struct RandomEngine {
    rules: RulesConfig,
}

impl RandomEngine {
    pub fn new(rules: RulesConfig) -> Self {
        Self { rules }
    }
}

impl Engine for RandomEngine {
    fn name(&self) -> &str {
        "Laser Chess Random"
    }

    fn choose_move(
        &mut self,
        board: &Board,
        color: Color,
        params: &SearchParams,
    ) -> LaserChessResult<EngineOutput> {
        let moves = candidate_moves(board, color, &self.rules);

        let mut out = EngineOutput::default();
        out.info_lines.push(format!(
            "info string random_engine candidate_moves {}",
            moves.len()
        ));
        if let Some(depth) = params.depth {
            out.info_lines
                .push(format!("info string random_engine requested_depth {}", depth));
        }

        let mut rng = rand::rng();
        let picked = moves
            .as_slice()
            .choose(&mut rng)
            .ok_or_else(|| LaserChessError::NoMovesAvailable {
                color: color.name().to_owned(),
            })?;

        out.best_move = Some(*picked);
        out.nodes = 1;
        Ok(out)
    }
}
