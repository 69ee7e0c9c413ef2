//! Legal movement enumeration.
//!
//! A movable piece may step to any of its eight neighbours that is on the
//! board, empty and not reserved for the other color. A Switch may instead
//! swap with a neighbouring Deflector or Defender of either color. Lasers
//! never move. Rotations are offered separately because they have no
//! destination constraint.

use crate::game_state::board::Board;
use crate::game_state::board_rules::RulesConfig;
use crate::game_state::board_types::{Color, Location, PieceKind};
use crate::game_state::movement::{Movement, MovementKind};

/// Classify a single step from `src` to `dest`. Never fails: anything the
/// rules forbid comes back as [`MovementKind::Invalid`].
pub fn check_move_possibility(board: &Board, src: Location, dest: Location) -> Movement {
    let invalid = Movement::new(MovementKind::Invalid, src, dest);

    let (Some(src_square), Some(dest_square)) = (board.square(src), board.square(dest)) else {
        return invalid;
    };
    let Some(mover) = src_square.piece else {
        return invalid;
    };
    if mover.kind == PieceKind::Laser || src == dest {
        return invalid;
    }
    if !dest_square.kind.admits(mover.color) {
        return invalid;
    }

    match dest_square.piece {
        Some(target)
            if mover.kind == PieceKind::Switch
                && matches!(target.kind, PieceKind::Deflector | PieceKind::Defender) =>
        {
            // The displaced piece lands on the Switch's square.
            if !src_square.kind.admits(target.color) {
                return invalid;
            }
            Movement::new(MovementKind::Special, src, dest)
        }
        Some(_) => invalid,
        None => Movement::new(MovementKind::Normal, src, dest),
    }
}

/// Step and swap movements for the piece at `location`, in neighbour order.
pub fn legal_moves_from(board: &Board, location: Location) -> Vec<Movement> {
    let Some(piece) = board.piece_at(location) else {
        return Vec::new();
    };
    if piece.kind == PieceKind::Laser {
        return Vec::new();
    }

    location
        .neighbors()
        .into_iter()
        .filter(|dest| dest.is_on_board())
        .map(|dest| check_move_possibility(board, location, dest))
        .filter(|movement| movement.kind != MovementKind::Invalid)
        .collect()
}

/// Step and swap movements for every piece of `color`, in row-major order.
pub fn legal_moves_for_player(board: &Board, color: Color) -> Vec<Movement> {
    board
        .player_squares(color)
        .into_iter()
        .flat_map(|square| legal_moves_from(board, square.location))
        .collect()
}

/// Clockwise then counter-clockwise rotation of the piece at `location`, if it may rotate.
pub fn rotation_moves(board: &Board, location: Location, rules: &RulesConfig) -> Vec<Movement> {
    match board.piece_at(location) {
        Some(piece) if rules.can_rotate(piece.kind) => vec![
            Movement::rotation(location, true),
            Movement::rotation(location, false),
        ],
        _ => Vec::new(),
    }
}

/// Every movement `color` may play: steps and swaps first, then rotations,
/// each group in row-major order of the moving piece.
pub fn candidate_moves(board: &Board, color: Color, rules: &RulesConfig) -> Vec<Movement> {
    let squares = board.player_squares(color);
    let mut moves = legal_moves_for_player(board, color);
    moves.extend(
        squares
            .iter()
            .flat_map(|square| rotation_moves(board, square.location, rules)),
    );
    moves
}

/// Whether `movement` is playable on `board` by the owner of its source piece.
pub fn is_legal(board: &Board, movement: &Movement, rules: &RulesConfig) -> bool {
    match movement.kind {
        MovementKind::Invalid => false,
        MovementKind::RotateClockwise | MovementKind::RotateCounterClockwise => {
            movement.src == movement.dest
                && board
                    .piece_at(movement.src)
                    .is_some_and(|piece| rules.can_rotate(piece.kind))
        }
        MovementKind::Normal | MovementKind::Special => {
            legal_moves_from(board, movement.src).contains(movement)
        }
    }
}
