//! Core value types shared by every subsystem: colors, piece kinds,
//! orientations, beam directions, board locations and squares.

use serde::{Deserialize, Serialize};

use crate::game_state::board_rules::reserved_kind_for;

/// Number of columns on the board (`a`..`j`).
pub const BOARD_COLS: usize = 10;
/// Number of rows on the board (`8`..`1` from top to bottom).
pub const BOARD_ROWS: usize = 8;

/// Player color. Blue moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Blue,
    Red,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Blue => 0,
            Color::Red => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Blue => Color::Red,
            Color::Red => Color::Blue,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("blue") {
            Some(Color::Blue)
        } else if name.eq_ignore_ascii_case("red") {
            Some(Color::Red)
        } else {
            None
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Red => "red",
        }
    }
}

/// Piece kind (color and orientation are stored separately on [`Piece`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Laser,
    King,
    Deflector,
    Defender,
    Switch,
}

impl PieceKind {
    pub const ALL: [PieceKind; 5] = [
        PieceKind::Laser,
        PieceKind::King,
        PieceKind::Deflector,
        PieceKind::Defender,
        PieceKind::Switch,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Laser => 0,
            PieceKind::King => 1,
            PieceKind::Deflector => 2,
            PieceKind::Defender => 3,
            PieceKind::Switch => 4,
        }
    }

    /// Lowercase notation letter.
    #[inline]
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Laser => 'l',
            PieceKind::King => 'k',
            PieceKind::Deflector => 'b',
            PieceKind::Defender => 'd',
            PieceKind::Switch => 's',
        }
    }

    /// Resolve a notation letter in either case.
    pub fn from_letter(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'l' => Some(PieceKind::Laser),
            'k' => Some(PieceKind::King),
            'b' => Some(PieceKind::Deflector),
            'd' => Some(PieceKind::Defender),
            's' => Some(PieceKind::Switch),
            _ => None,
        }
    }
}

/// Clockwise rotation of a piece, in quarter turns from its notation default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Deg0,
        Orientation::Deg90,
        Orientation::Deg180,
        Orientation::Deg270,
    ];

    #[inline]
    pub const fn quarter_turns(self) -> u8 {
        match self {
            Orientation::Deg0 => 0,
            Orientation::Deg90 => 1,
            Orientation::Deg180 => 2,
            Orientation::Deg270 => 3,
        }
    }

    /// Wraps modulo four quarter turns.
    #[inline]
    pub const fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Orientation::Deg0,
            1 => Orientation::Deg90,
            2 => Orientation::Deg180,
            _ => Orientation::Deg270,
        }
    }

    #[inline]
    pub const fn degrees(self) -> u16 {
        self.quarter_turns() as u16 * 90
    }

    /// Accepts any multiple of 90, normalised modulo 360.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        let turns = degrees.rem_euclid(360) / 90;
        Some(Self::from_quarter_turns(turns as u8))
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.quarter_turns() as usize
    }

    #[inline]
    pub const fn rotated(self, clockwise: bool) -> Self {
        let delta = if clockwise { 1 } else { 3 };
        Self::from_quarter_turns(self.quarter_turns() + delta)
    }
}

/// Travel direction of a laser beam. `Top` points toward row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Right,
        Direction::Bottom,
        Direction::Left,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Direction::Top => 0,
            Direction::Right => 1,
            Direction::Bottom => 2,
            Direction::Left => 3,
        }
    }

    /// Column and row delta of one step.
    #[inline]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::Top => (0, -1),
            Direction::Right => (1, 0),
            Direction::Bottom => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// Rotate clockwise by the given orientation.
    #[inline]
    pub const fn rotated_by(self, orientation: Orientation) -> Self {
        Self::ALL[(self.index() + orientation.index()) % 4]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Direction::Top => "top",
            Direction::Right => "right",
            Direction::Bottom => "bottom",
            Direction::Left => "left",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name))
    }
}

/// A board coordinate. Signed so a beam may report the cell just past an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub col: i8,
    pub row: i8,
}

impl Location {
    #[inline]
    pub const fn new(col: i8, row: i8) -> Self {
        Self { col, row }
    }

    #[inline]
    pub const fn is_on_board(self) -> bool {
        self.col >= 0
            && (self.col as usize) < BOARD_COLS
            && self.row >= 0
            && (self.row as usize) < BOARD_ROWS
    }

    #[inline]
    pub const fn offset(self, d_col: i8, d_row: i8) -> Self {
        Self::new(self.col + d_col, self.row + d_row)
    }

    #[inline]
    pub const fn step(self, direction: Direction) -> Self {
        let (d_col, d_row) = direction.delta();
        self.offset(d_col, d_row)
    }

    /// The eight surrounding cells, clockwise from top-left. May include off-board cells.
    pub fn neighbors(self) -> [Location; 8] {
        [
            self.offset(-1, -1),
            self.offset(0, -1),
            self.offset(1, -1),
            self.offset(1, 0),
            self.offset(1, 1),
            self.offset(0, 1),
            self.offset(-1, 1),
            self.offset(-1, 0),
        ]
    }

    /// Every on-board location in row-major order.
    pub fn all() -> impl Iterator<Item = Location> {
        (0..BOARD_ROWS as i8)
            .flat_map(|row| (0..BOARD_COLS as i8).map(move |col| Location::new(col, row)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub orientation: Orientation,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color, orientation: Orientation) -> Self {
        Self {
            kind,
            color,
            orientation,
        }
    }

    #[inline]
    pub fn rotate(&mut self, clockwise: bool) {
        self.orientation = self.orientation.rotated(clockwise);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareKind {
    Normal,
    ReservedBlue,
    ReservedRed,
}

impl SquareKind {
    pub fn for_location(location: Location) -> Self {
        reserved_kind_for(location)
    }

    /// Whether a piece of `color` may stand on a square of this kind.
    #[inline]
    pub const fn admits(self, color: Color) -> bool {
        match self {
            SquareKind::Normal => true,
            SquareKind::ReservedBlue => matches!(color, Color::Blue),
            SquareKind::ReservedRed => matches!(color, Color::Red),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub location: Location,
    pub kind: SquareKind,
    pub piece: Option<Piece>,
}

impl Square {
    pub fn empty(location: Location) -> Self {
        Self {
            location,
            kind: SquareKind::for_location(location),
            piece: None,
        }
    }

    #[inline]
    pub const fn has_piece(&self) -> bool {
        self.piece.is_some()
    }
}
