//! Board model: the 10x8 grid of squares and the mutation primitives used by
//! a turn (apply a movement, apply the laser's result).
//!
//! A `Board` is a plain value. `Clone` yields an independent deep copy, which
//! is what the session and the search rely on for speculative play.

use rand::Rng;
use tracing::debug;

use crate::game_state::board_rules::{piece_weight, Layout, KING_LOST_SCORE};
use crate::game_state::board_types::{
    Color, Location, Piece, PieceKind, Square, BOARD_COLS, BOARD_ROWS,
};
use crate::game_state::errors::{LaserChessError, LaserChessResult};
use crate::game_state::movement::{Movement, MovementKind};
use crate::laser::hit_table::HitTable;
use crate::laser::laser_route::{trace_laser_route, LaserAction, LaserPathStep, LaserRoute};
use crate::utils::sn_generator::generate_setup_notation;
use crate::utils::sn_parser::parse_setup_notation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Square; BOARD_COLS]; BOARD_ROWS],
    winner: Option<Color>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The Ace layout.
    pub fn new() -> Self {
        Self::from_layout(Layout::Ace)
    }

    /// A board with no pieces; square kinds follow the static reserved geometry.
    pub fn empty() -> Self {
        let squares = std::array::from_fn(|row| {
            std::array::from_fn(|col| Square::empty(Location::new(col as i8, row as i8)))
        });
        Self {
            squares,
            winner: None,
        }
    }

    pub fn from_layout(layout: Layout) -> Self {
        parse_setup_notation(layout.setup_notation()).expect("canonical layouts should always parse")
    }

    pub fn from_notation(sn: &str) -> LaserChessResult<Self> {
        parse_setup_notation(sn)
    }

    /// One of the canonical layouts, chosen uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_layout(Layout::random(rng))
    }

    /// `None` when the location is outside the grid.
    #[inline]
    pub fn square(&self, location: Location) -> Option<&Square> {
        if !location.is_on_board() {
            return None;
        }
        Some(&self.squares[location.row as usize][location.col as usize])
    }

    #[inline]
    fn square_mut(&mut self, location: Location) -> Option<&mut Square> {
        if !location.is_on_board() {
            return None;
        }
        Some(&mut self.squares[location.row as usize][location.col as usize])
    }

    #[inline]
    pub fn piece_at(&self, location: Location) -> Option<Piece> {
        self.square(location).and_then(|square| square.piece)
    }

    /// Put `piece` on `location`, replacing whatever stood there.
    pub fn place_piece(&mut self, location: Location, piece: Piece) -> LaserChessResult<()> {
        let square = self
            .square_mut(location)
            .ok_or_else(|| off_board(location))?;
        square.piece = Some(piece);
        Ok(())
    }

    pub fn remove_piece(&mut self, location: Location) -> Option<Piece> {
        self.square_mut(location).and_then(|square| square.piece.take())
    }

    /// All squares in row-major order.
    pub fn squares(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter().flat_map(|row| row.iter())
    }

    /// Occupied squares holding `color`'s pieces, in row-major order.
    pub fn player_squares(&self, color: Color) -> Vec<Square> {
        self.squares()
            .filter(|square| square.piece.is_some_and(|piece| piece.color == color))
            .copied()
            .collect()
    }

    pub fn has_king(&self, color: Color) -> bool {
        self.squares().any(|square| {
            square
                .piece
                .is_some_and(|piece| piece.color == color && piece.kind == PieceKind::King)
        })
    }

    /// Material for `color`, or [`KING_LOST_SCORE`] once that King is gone.
    pub fn player_score(&self, color: Color) -> i32 {
        let mut score = 0;
        let mut king_present = false;

        for square in self.player_squares(color) {
            let Some(piece) = square.piece else { continue };
            if piece.kind == PieceKind::King {
                king_present = true;
            } else {
                score += piece_weight(piece.kind);
            }
        }

        if king_present {
            score
        } else {
            KING_LOST_SCORE
        }
    }

    #[inline]
    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    /// Record the winner implied by the pieces alone: when exactly one color
    /// still has its King, that color has won. Notation carries no winner, so
    /// boards resumed from it need this.
    pub fn settle_winner(&mut self) -> Option<Color> {
        if self.winner.is_none() {
            self.winner = match (self.has_king(Color::Blue), self.has_king(Color::Red)) {
                (true, false) => Some(Color::Blue),
                (false, true) => Some(Color::Red),
                _ => None,
            };
        }
        self.winner
    }

    /// Commit a movement. Legality is the validator's job; this only checks
    /// that the squares involved exist and that the source holds a piece.
    /// On error the board is left untouched.
    pub fn apply_movement(&mut self, movement: &Movement) -> LaserChessResult<()> {
        if movement.kind == MovementKind::Invalid {
            return Ok(());
        }

        let src_piece = self
            .square(movement.src)
            .ok_or_else(|| off_board(movement.src))?
            .piece
            .ok_or(LaserChessError::EmptySource {
                location: movement.src,
            })?;

        match movement.kind {
            MovementKind::Normal => {
                if !movement.dest.is_on_board() {
                    return Err(off_board(movement.dest));
                }
                // Lift before placing so `src == dest` leaves the piece in place.
                self.remove_piece(movement.src);
                self.place_piece(movement.dest, src_piece)?;
            }
            MovementKind::RotateClockwise | MovementKind::RotateCounterClockwise => {
                let clockwise = movement.kind == MovementKind::RotateClockwise;
                if let Some(square) = self.square_mut(movement.src) {
                    if let Some(piece) = square.piece.as_mut() {
                        piece.rotate(clockwise);
                    }
                }
            }
            MovementKind::Special => {
                let dest = self
                    .square_mut(movement.dest)
                    .ok_or_else(|| off_board(movement.dest))?;
                let displaced = dest.piece.replace(src_piece);
                if let Some(src) = self.square_mut(movement.src) {
                    src.piece = displaced;
                }
            }
            MovementKind::Invalid => {}
        }

        Ok(())
    }

    /// Apply the final step of a laser route. Returns the removed piece, if any.
    /// Killing a King records the opposite color as winner.
    pub fn apply_laser_result(&mut self, final_step: &LaserPathStep) -> Option<Piece> {
        if final_step.action != LaserAction::Kill {
            return None;
        }

        let killed = self.remove_piece(final_step.location)?;
        debug!(
            kind = ?killed.kind,
            color = ?killed.color,
            col = final_step.location.col,
            row = final_step.location.row,
            "laser removed piece"
        );
        if killed.kind == PieceKind::King {
            self.winner = Some(killed.color.opposite());
        }
        Some(killed)
    }

    /// A copy of this board after `color` plays `movement` and fires.
    pub fn successor(
        &self,
        movement: &Movement,
        color: Color,
        hit_table: &HitTable,
    ) -> LaserChessResult<(Board, LaserRoute)> {
        let mut next = self.clone();
        next.apply_movement(movement)?;
        let route = trace_laser_route(&next, color, hit_table)?;
        if let Some(final_step) = route.last() {
            next.apply_laser_result(final_step);
        }
        Ok((next, route))
    }

    pub fn to_notation(&self) -> String {
        generate_setup_notation(self)
    }
}

fn off_board(location: Location) -> LaserChessError {
    LaserChessError::InvalidLocation {
        name: format!("({}, {})", location.col, location.row),
    }
}

#[cfg(test)]
mod tests {
    use super::Board;
    use crate::game_state::board_rules::{Layout, KING_LOST_SCORE};
    use crate::game_state::board_types::{Color, Location, Orientation, Piece, PieceKind};
    use crate::game_state::errors::LaserChessError;
    use crate::game_state::movement::{Movement, MovementKind};
    use crate::laser::laser_route::{LaserAction, LaserEvent, LaserPathStep};

    fn piece(kind: PieceKind, color: Color) -> Piece {
        Piece::new(kind, color, Orientation::Deg0)
    }

    #[test]
    fn square_lookup_never_panics_off_board() {
        let board = Board::new();
        assert!(board.square(Location::new(-1, 0)).is_none());
        assert!(board.square(Location::new(10, 0)).is_none());
        assert!(board.square(Location::new(0, 8)).is_none());
        assert!(board.square(Location::new(9, 7)).is_some());
    }

    #[test]
    fn player_squares_follow_row_major_order() {
        let board = Board::new();
        let blue = board.player_squares(Color::Blue);
        assert_eq!(blue.len(), 13);
        for pair in blue.windows(2) {
            let a = pair[0].location;
            let b = pair[1].location;
            assert!((a.row, a.col) < (b.row, b.col));
        }
        assert_eq!(blue.last().map(|s| s.location), Some(Location::new(9, 7)));
    }

    #[test]
    fn starting_material_is_symmetric() {
        for layout in Layout::ALL {
            let board = Board::from_layout(layout);
            assert_eq!(
                board.player_score(Color::Blue),
                board.player_score(Color::Red),
                "{}",
                layout.name()
            );
        }
        assert_eq!(Board::new().player_score(Color::Blue), 11);
    }

    #[test]
    fn score_sentinel_iff_king_missing() {
        let mut board = Board::empty();
        assert_eq!(board.player_score(Color::Blue), KING_LOST_SCORE);
        board
            .place_piece(Location::new(4, 7), piece(PieceKind::King, Color::Blue))
            .expect("on board");
        board
            .place_piece(Location::new(3, 7), piece(PieceKind::Defender, Color::Blue))
            .expect("on board");
        assert_eq!(board.player_score(Color::Blue), 2);
        assert_eq!(board.player_score(Color::Red), KING_LOST_SCORE);
    }

    #[test]
    fn normal_movement_relocates_piece() {
        let mut board = Board::new();
        let src = Location::new(3, 2);
        let dest = Location::new(3, 1);
        let moving = board.piece_at(src).expect("blue deflector on d6");
        board
            .apply_movement(&Movement::new(MovementKind::Normal, src, dest))
            .expect("movement applies");
        assert_eq!(board.piece_at(src), None);
        assert_eq!(board.piece_at(dest), Some(moving));
    }

    #[test]
    fn normal_movement_onto_its_own_square_keeps_the_piece() {
        let mut board = Board::new();
        let src = Location::new(3, 2);
        let before = board.clone();
        board
            .apply_movement(&Movement::new(MovementKind::Normal, src, src))
            .expect("movement applies");
        assert_eq!(board, before);
    }

    #[test]
    fn normal_movement_off_board_fails_without_mutation() {
        let mut board = Board::new();
        let before = board.clone();
        let err = board
            .apply_movement(&Movement::new(
                MovementKind::Normal,
                Location::new(9, 7),
                Location::new(10, 7),
            ))
            .expect_err("off-board destination must be rejected");
        assert!(matches!(err, LaserChessError::InvalidLocation { .. }));
        assert_eq!(board, before);
    }

    #[test]
    fn every_layout_builds_with_both_kings() {
        for layout in Layout::ALL {
            let board = Board::from_layout(layout);
            assert!(board.has_king(Color::Blue), "{}", layout.name());
            assert!(board.has_king(Color::Red), "{}", layout.name());
            assert_eq!(board.winner(), None);
        }
    }

    #[test]
    fn settled_winner_follows_the_remaining_king() {
        let mut board = Board::new();
        assert_eq!(board.settle_winner(), None);

        board.remove_piece(Location::new(5, 0));
        assert_eq!(board.settle_winner(), Some(Color::Blue));
        assert_eq!(board.winner(), Some(Color::Blue));

        let mut bare = Board::empty();
        assert_eq!(bare.settle_winner(), None);
    }

    #[test]
    fn rotations_wrap_orientation() {
        let mut board = Board::new();
        let loc = Location::new(7, 0);
        board
            .apply_movement(&Movement::rotation(loc, true))
            .expect("rotation applies");
        assert_eq!(
            board.piece_at(loc).map(|p| p.orientation),
            Some(Orientation::Deg0)
        );
        board
            .apply_movement(&Movement::rotation(loc, false))
            .expect("rotation applies");
        assert_eq!(
            board.piece_at(loc).map(|p| p.orientation),
            Some(Orientation::Deg270)
        );
    }

    #[test]
    fn applying_from_empty_square_fails_without_mutation() {
        let mut board = Board::new();
        let before = board.clone();
        let err = board
            .apply_movement(&Movement::new(
                MovementKind::Normal,
                Location::new(1, 1),
                Location::new(1, 2),
            ))
            .expect_err("empty source must be rejected");
        assert!(matches!(err, LaserChessError::EmptySource { .. }));
        assert_eq!(board, before);
    }

    #[test]
    fn invalid_movement_is_a_no_op() {
        let mut board = Board::new();
        let before = board.clone();
        board
            .apply_movement(&Movement::new(
                MovementKind::Invalid,
                Location::new(1, 1),
                Location::new(1, 2),
            ))
            .expect("invalid is accepted as no-op");
        assert_eq!(board, before);
    }

    #[test]
    fn killing_a_king_records_the_winner() {
        let mut board = Board::new();
        let red_king = Location::new(5, 0);
        let removed = board.apply_laser_result(&LaserPathStep {
            event: LaserEvent::End,
            direction: None,
            action: LaserAction::Kill,
            location: red_king,
        });
        assert_eq!(removed.map(|p| p.kind), Some(PieceKind::King));
        assert_eq!(board.winner(), Some(Color::Blue));
        assert_eq!(board.player_score(Color::Red), KING_LOST_SCORE);
    }

    #[test]
    fn clones_are_independent() {
        let board = Board::new();
        let mut copy = board.clone();
        copy.remove_piece(Location::new(5, 0));
        assert!(board.has_king(Color::Red));
        assert!(!copy.has_king(Color::Red));
    }
}
