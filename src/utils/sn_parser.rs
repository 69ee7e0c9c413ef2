//! Setup Notation (SN) to `Board` parser.
//!
//! Rows are listed top to bottom and separated by `/`. Pieces are single
//! letters (uppercase Blue, lowercase Red) followed by one `+` per clockwise
//! quarter turn. Runs of empty squares are single digits, and `*` stands for a
//! whole empty row. A malformed string yields an error and no board.

use crate::game_state::board::Board;
use crate::game_state::board_types::{
    Color, Location, Orientation, Piece, PieceKind, BOARD_COLS, BOARD_ROWS,
};
use crate::game_state::errors::{LaserChessError, LaserChessResult};

const MAX_ROTATION_MARKS: usize = 3;

pub fn parse_setup_notation(sn: &str) -> LaserChessResult<Board> {
    let rows: Vec<&str> = sn.trim().split('/').collect();
    if rows.len() != BOARD_ROWS {
        return Err(invalid(format!(
            "expected {BOARD_ROWS} rows, found {}",
            rows.len()
        )));
    }

    let mut board = Board::empty();
    for (row_idx, row_str) in rows.iter().enumerate() {
        parse_row(row_idx, row_str, &mut board)?;
    }

    Ok(board)
}

fn parse_row(row_idx: usize, row_str: &str, board: &mut Board) -> LaserChessResult<()> {
    let mut col = 0usize;
    let mut chars = row_str.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '*' {
            col += BOARD_COLS;
        } else if let Some(run) = ch.to_digit(10) {
            if run == 0 {
                return Err(invalid(format!("zero-length run in row {}", row_idx + 1)));
            }
            col += run as usize;
        } else if let Some(kind) = PieceKind::from_letter(ch) {
            let mut marks = 0usize;
            while chars.next_if_eq(&'+').is_some() {
                marks += 1;
            }
            if marks > MAX_ROTATION_MARKS {
                return Err(invalid(format!(
                    "{marks} rotation marks after '{ch}' in row {}",
                    row_idx + 1
                )));
            }
            if col >= BOARD_COLS {
                return Err(invalid(format!("row {} has too many columns", row_idx + 1)));
            }

            let color = if ch.is_ascii_uppercase() {
                Color::Blue
            } else {
                Color::Red
            };
            let piece = Piece::new(kind, color, Orientation::from_quarter_turns(marks as u8));
            board.place_piece(Location::new(col as i8, row_idx as i8), piece)?;
            col += 1;
        } else if ch == '+' {
            return Err(invalid(format!(
                "rotation mark without a piece in row {}",
                row_idx + 1
            )));
        } else {
            return Err(invalid(format!("unrecognized character '{ch}'")));
        }

        if col > BOARD_COLS {
            return Err(invalid(format!("row {} has too many columns", row_idx + 1)));
        }
    }

    if col != BOARD_COLS {
        return Err(invalid(format!(
            "row {} has {col} columns, expected {BOARD_COLS}",
            row_idx + 1
        )));
    }

    Ok(())
}

fn invalid(reason: String) -> LaserChessError {
    LaserChessError::InvalidNotation { reason }
}
