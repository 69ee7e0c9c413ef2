//! Terminal-oriented board renderer.
//!
//! Creates a human-readable board view for debugging, tests, and diagnostics
//! in text environments. Pieces use their notation letter (upper case for
//! Blue, lower case for Red) followed by one `+` per quarter turn.

use crate::game_state::board::Board;
use crate::game_state::board_types::{
    Color, Location, Piece, SquareKind, BOARD_COLS, BOARD_ROWS,
};

const CELL_WIDTH: usize = 4;

/// Render the board with `a..j` across the top and `8..1` down the side.
/// Empty reserved squares show the owner's initial (`·b` or `·r`).
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();
    push_file_labels(&mut out);

    for row in 0..BOARD_ROWS {
        let rank = BOARD_ROWS - row;
        out.push_str(&format!("{rank} "));

        for col in 0..BOARD_COLS {
            let location = Location::new(col as i8, row as i8);
            let cell = match board.square(location) {
                Some(square) => match square.piece {
                    Some(piece) => piece_label(piece),
                    None => match square.kind {
                        SquareKind::Normal => "·".to_owned(),
                        SquareKind::ReservedBlue => "·b".to_owned(),
                        SquareKind::ReservedRed => "·r".to_owned(),
                    },
                },
                None => "?".to_owned(),
            };
            out.push_str(&format!("{cell:<CELL_WIDTH$}"));
        }

        out.push_str(&format!("{rank}\n"));
    }

    push_file_labels(&mut out);
    if let Some(winner) = board.winner() {
        out.push_str(&format!("winner: {}\n", winner.name()));
    }
    out
}

fn push_file_labels(out: &mut String) {
    out.push_str("  ");
    for col in 0..BOARD_COLS {
        let file = char::from(b'a' + col as u8);
        out.push_str(&format!("{file:<CELL_WIDTH$}"));
    }
    out.push('\n');
}

fn piece_label(piece: Piece) -> String {
    let letter = match piece.color {
        Color::Blue => piece.kind.letter().to_ascii_uppercase(),
        Color::Red => piece.kind.letter(),
    };
    let mut label = String::with_capacity(CELL_WIDTH);
    label.push(letter);
    for _ in 0..piece.orientation.quarter_turns() {
        label.push('+');
    }
    label
}

#[cfg(test)]
mod tests {
    use super::render_board;
    use crate::game_state::board::Board;

    #[test]
    fn renders_ace_layout() {
        let text = render_board(&Board::new());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines[0].starts_with("  a   b"));
        assert!(lines[1].starts_with("8 l++ "));
        assert!(lines[1].contains("k "));
        assert!(lines[8].starts_with("1 ·r  ·b  B+  D   K   D"));
        assert!(lines[8].trim_end().ends_with("L   1"));
    }

    #[test]
    fn empty_board_shows_reserved_columns() {
        let text = render_board(&Board::empty());
        let row = text.lines().nth(4).expect("row 5");
        assert!(row.starts_with("5 ·r  · "));
        assert!(row.trim_end().ends_with("·b  5"));
    }
}
