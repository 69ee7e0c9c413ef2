//! Alpha-beta engine over material balance.
//!
//! Wraps the search core with per-engine defaults (depth, hit table, rules)
//! and reports the decision through `EngineOutput` info lines and tracing.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing::debug;

use crate::engines::engine_trait::{Engine, EngineOutput, SearchParams};
use crate::game_state::board::Board;
use crate::game_state::board_rules::RulesConfig;
use crate::game_state::board_types::Color;
use crate::game_state::errors::{LaserChessError, LaserChessResult};
use crate::laser::hit_table::HitTable;
use crate::search::board_scoring::MaterialScorer;
use crate::search::minimax::{search_best_move, SearchConfig, SearchContext};

pub const DEFAULT_SEARCH_DEPTH: u8 = 1;
pub const MAX_SEARCH_DEPTH: u8 = 8;

pub struct MinimaxEngine {
    hit_table: Arc<HitTable>,
    rules: RulesConfig,
    default_depth: u8,
    default_movetime_ms: Option<u64>,
    stop_signal: Option<Arc<AtomicBool>>,
}

impl MinimaxEngine {
    pub fn new(hit_table: Arc<HitTable>, rules: RulesConfig) -> Self {
        Self {
            hit_table,
            rules,
            default_depth: DEFAULT_SEARCH_DEPTH,
            default_movetime_ms: None,
            stop_signal: None,
        }
    }

    pub fn with_depth(mut self, depth: u8) -> Self {
        self.default_depth = depth.clamp(1, MAX_SEARCH_DEPTH);
        self
    }

    #[inline]
    pub fn default_depth(&self) -> u8 {
        self.default_depth
    }

    #[inline]
    pub fn rules(&self) -> RulesConfig {
        self.rules
    }
}

impl Engine for MinimaxEngine {
    fn name(&self) -> &str {
        "Laser Chess Minimax"
    }

    fn set_option(&mut self, name: &str, value: &str) -> LaserChessResult<()> {
        let invalid = |reason: &str| LaserChessError::InvalidOption {
            name: name.to_owned(),
            reason: format!("{reason} '{value}'"),
        };

        if name.eq_ignore_ascii_case("Depth") {
            let depth = value
                .parse::<u8>()
                .map_err(|_| invalid("expected a depth"))?;
            if depth == 0 || depth > MAX_SEARCH_DEPTH {
                return Err(invalid("depth out of range"));
            }
            self.default_depth = depth;
        } else if name.eq_ignore_ascii_case("MoveTime") {
            let ms = value
                .parse::<u64>()
                .map_err(|_| invalid("expected milliseconds"))?;
            self.default_movetime_ms = (ms > 0).then_some(ms);
        } else if name.eq_ignore_ascii_case("KingRotation") {
            self.rules.allow_king_rotation =
                parse_bool(value).ok_or_else(|| invalid("expected true or false"))?;
        }
        Ok(())
    }

    fn set_stop_signal(&mut self, stop_signal: Option<Arc<AtomicBool>>) {
        self.stop_signal = stop_signal;
    }

    fn choose_move(
        &mut self,
        board: &Board,
        color: Color,
        params: &SearchParams,
    ) -> LaserChessResult<EngineOutput> {
        let config = SearchConfig {
            max_depth: params
                .depth
                .unwrap_or(self.default_depth)
                .clamp(1, MAX_SEARCH_DEPTH),
            movetime_ms: params.movetime_ms.or(self.default_movetime_ms),
        };
        let ctx = SearchContext {
            hit_table: &self.hit_table,
            rules: &self.rules,
            scorer: &MaterialScorer,
            cancel: self.stop_signal.as_deref(),
        };

        let result = search_best_move(board, color, &ctx, config)?;

        let mut out = EngineOutput {
            best_move: result.best_move,
            score: Some(result.best_score),
            nodes: result.nodes,
            info_lines: Vec::new(),
        };
        out.info_lines.push(format!(
            "info depth {} score {} nodes {} time {}",
            result.reached_depth, result.best_score, result.nodes, result.elapsed_ms
        ));

        if let Some(movement) = result.best_move {
            debug!(
                color = color.name(),
                movement = %movement.describe(),
                score = result.best_score,
                depth = result.reached_depth,
                nodes = result.nodes,
                elapsed_ms = result.elapsed_ms,
                "minimax engine chose movement"
            );
        }

        Ok(out)
    }
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Some(true),
        "false" | "off" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::MinimaxEngine;
    use crate::engines::engine_trait::{Engine, SearchParams};
    use crate::game_state::board::Board;
    use crate::game_state::board_rules::RulesConfig;
    use crate::game_state::board_types::Color;
    use crate::laser::hit_table::HitTable;
    use crate::move_generation::movement_validator::is_legal;

    fn engine() -> MinimaxEngine {
        MinimaxEngine::new(
            Arc::new(HitTable::official().expect("shipped table")),
            RulesConfig::default(),
        )
    }

    #[test]
    fn chooses_a_legal_movement_from_the_opening() {
        let board = Board::new();
        let mut engine = engine();
        let out = engine
            .choose_move(&board, Color::Red, &SearchParams::default())
            .expect("engine should choose a move");
        let movement = out.best_move.expect("a movement");
        assert!(is_legal(&board, &movement, &RulesConfig::default()));
        assert!(out.info_lines.iter().any(|l| l.starts_with("info depth 1")));
        assert!(out.nodes > 0);
    }

    #[test]
    fn options_are_validated() {
        let mut engine = engine();
        engine.set_option("Depth", "3").expect("valid depth");
        assert_eq!(engine.default_depth(), 3);
        assert!(engine.set_option("Depth", "0").is_err());
        assert!(engine.set_option("Depth", "deep").is_err());
        engine
            .set_option("KingRotation", "true")
            .expect("valid flag");
        assert!(engine.rules().allow_king_rotation);
        assert!(engine.set_option("KingRotation", "maybe").is_err());
    }
}
