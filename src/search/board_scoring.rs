//! Static board evaluation for search.

use crate::game_state::board::Board;
use crate::game_state::board_types::Color;

pub trait BoardScorer: Send + Sync {
    /// Score from `perspective`'s side; higher is better for that side.
    fn score(&self, board: &Board, perspective: Color) -> i32;
}

/// Material advantage: own weighted pieces minus the opponent's. A lost King
/// contributes the -1000 sentinel, so a won position dominates any material.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl BoardScorer for MaterialScorer {
    #[inline]
    fn score(&self, board: &Board, perspective: Color) -> i32 {
        board.player_score(perspective) - board.player_score(perspective.opposite())
    }
}
