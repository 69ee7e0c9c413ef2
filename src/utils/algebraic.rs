//! Location conversions for alphanumeric square names.
//!
//! Columns are lettered `a`..`j` from left to right and rows are numbered
//! `8`..`1` from top to bottom, so Red's emitter is `a8` and Blue's is `j1`.

use crate::game_state::board_types::{Location, BOARD_COLS, BOARD_ROWS};
use crate::game_state::errors::{LaserChessError, LaserChessResult};

/// Convert a square name (for example: "j1") to a board location.
#[inline]
pub fn algebraic_to_location(name: &str) -> LaserChessResult<Location> {
    let invalid = || LaserChessError::InvalidLocation {
        name: name.to_owned(),
    };

    let bytes = name.as_bytes();
    if bytes.len() != 2 {
        return Err(invalid());
    }

    let file = bytes[0].to_ascii_lowercase();
    let rank = bytes[1];

    if !(b'a'..b'a' + BOARD_COLS as u8).contains(&file) {
        return Err(invalid());
    }
    if !(b'1'..b'1' + BOARD_ROWS as u8).contains(&rank) {
        return Err(invalid());
    }

    let col = (file - b'a') as i8;
    let row = (BOARD_ROWS as u8 - (rank - b'0')) as i8;
    Ok(Location::new(col, row))
}

/// Convert an on-board location to its square name (for example: "a8").
#[inline]
pub fn location_to_algebraic(location: Location) -> LaserChessResult<String> {
    if !location.is_on_board() {
        return Err(LaserChessError::InvalidLocation {
            name: format!("({}, {})", location.col, location.row),
        });
    }

    let file_char = char::from(b'a' + location.col as u8);
    let rank_char = char::from(b'0' + (BOARD_ROWS as u8 - location.row as u8));

    Ok(format!("{file_char}{rank_char}"))
}

#[cfg(test)]
mod tests {
    use super::{algebraic_to_location, location_to_algebraic};
    use crate::game_state::board_types::Location;

    #[test]
    fn emitter_homes_convert_both_ways() {
        assert_eq!(
            algebraic_to_location("j1").expect("j1 should parse"),
            Location::new(9, 7)
        );
        assert_eq!(
            algebraic_to_location("a8").expect("a8 should parse"),
            Location::new(0, 0)
        );
        assert_eq!(location_to_algebraic(Location::new(9, 7)).expect("on board"), "j1");
        assert_eq!(location_to_algebraic(Location::new(0, 0)).expect("on board"), "a8");
    }

    #[test]
    fn every_square_round_trips() {
        for location in Location::all() {
            let name = location_to_algebraic(location).expect("on-board location");
            assert_eq!(algebraic_to_location(&name).expect("name parses"), location);
        }
    }

    #[test]
    fn rejects_off_board_names() {
        assert!(algebraic_to_location("k1").is_err());
        assert!(algebraic_to_location("a9").is_err());
        assert!(algebraic_to_location("a0").is_err());
        assert!(algebraic_to_location("a10").is_err());
        assert!(location_to_algebraic(Location::new(9, -1)).is_err());
    }
}
