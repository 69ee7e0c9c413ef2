//! Static rule data: canonical layouts, emitter homes, reserved squares and
//! material weights, plus the rule switches a host may configure.

use rand::Rng;

use crate::game_state::board_types::{Color, Location, PieceKind, SquareKind};

pub const ACE_SN: &str =
    "l++3d++kd++b+++2/2b7/3B+6/b++1B1ss+1b+++1B+/b+++1B+1S+S1b++1B/6b+++3/7B++2/2B+DKD3L";
pub const CURIOSITY_SN: &str =
    "l++3d++kd++s+++2/19/3B+2b++3/b++B2B+++s+2b+++B+/b+++B+2S+b+2b++B/3B2b+++3/19/2S+DKD3L";
pub const GRAIL_SN: &str =
    "l++3bd++b+++3/5k4/b++3bd++s+3/b+++1s1B+1B+++3/3b+1b+++1S1B+/3S+DB++3B/4K5/3B+DB++3L";
pub const MERCURY_SN: &str =
    "l+3bkb+++2S+/5d++b+++3/b+++2s+1d++4/b++3B+3B1/1b++3b+++3B/4D1S+2B+/3B+D5/s+2B+KB++3L+++";
pub const SOPHIE_SN: &str =
    "l++3kB+b+++3/3d++1d+3B/b++3bb+++1S+1B+/7s2/2S7/b+++1s+1B+B++3B/b++3D+++1D3/3B+b+++K3L";

/// Score reported for a color whose King is gone.
pub const KING_LOST_SCORE: i32 = -1000;

/// Blue's emitter sits on `j1`.
pub const BLUE_LASER_HOME: Location = Location::new(9, 7);
/// Red's emitter sits on `a8`.
pub const RED_LASER_HOME: Location = Location::new(0, 0);

#[inline]
pub const fn laser_home(color: Color) -> Location {
    match color {
        Color::Blue => BLUE_LASER_HOME,
        Color::Red => RED_LASER_HOME,
    }
}

/// Material weight of a non-King piece.
#[inline]
pub const fn piece_weight(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Defender => 2,
        PieceKind::Deflector => 1,
        PieceKind::Switch | PieceKind::Laser | PieceKind::King => 0,
    }
}

/// Red owns column `a` plus `i8`/`i1`; Blue owns column `j` plus `b8`/`b1`.
///
/// That is ten reserved squares per color rather than four: a whole edge
/// column plus the two far-row squares beside the opponent's column. Every
/// canonical layout keeps its pieces inside this assignment.
pub fn reserved_kind_for(location: Location) -> SquareKind {
    let top_or_bottom = location.row == 0 || location.row == 7;
    if location.col == 0 || (location.col == 8 && top_or_bottom) {
        SquareKind::ReservedRed
    } else if location.col == 9 || (location.col == 1 && top_or_bottom) {
        SquareKind::ReservedBlue
    } else {
        SquareKind::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Ace,
    Curiosity,
    Grail,
    Mercury,
    Sophie,
}

impl Layout {
    pub const ALL: [Layout; 5] = [
        Layout::Ace,
        Layout::Curiosity,
        Layout::Grail,
        Layout::Mercury,
        Layout::Sophie,
    ];

    pub const fn setup_notation(self) -> &'static str {
        match self {
            Layout::Ace => ACE_SN,
            Layout::Curiosity => CURIOSITY_SN,
            Layout::Grail => GRAIL_SN,
            Layout::Mercury => MERCURY_SN,
            Layout::Sophie => SOPHIE_SN,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Layout::Ace => "Ace",
            Layout::Curiosity => "Curiosity",
            Layout::Grail => "Grail",
            Layout::Mercury => "Mercury",
            Layout::Sophie => "Sophie",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|layout| layout.name().eq_ignore_ascii_case(name))
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Rule switches that differ between editions of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RulesConfig {
    /// Whether a King may spend its turn rotating in place.
    pub allow_king_rotation: bool,
}

impl RulesConfig {
    /// Lasers never rotate; Kings only when enabled.
    #[inline]
    pub const fn can_rotate(&self, kind: PieceKind) -> bool {
        match kind {
            PieceKind::Laser => false,
            PieceKind::King => self.allow_king_rotation,
            PieceKind::Deflector | PieceKind::Defender | PieceKind::Switch => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_zones_are_mirror_images() {
        for location in Location::all() {
            let mirrored = Location::new(9 - location.col, 7 - location.row);
            let expected = match reserved_kind_for(location) {
                SquareKind::Normal => SquareKind::Normal,
                SquareKind::ReservedBlue => SquareKind::ReservedRed,
                SquareKind::ReservedRed => SquareKind::ReservedBlue,
            };
            assert_eq!(reserved_kind_for(mirrored), expected, "at {location:?}");
        }
    }

    #[test]
    fn each_color_reserves_ten_squares() {
        let count = |kind: SquareKind| {
            Location::all()
                .filter(|&location| reserved_kind_for(location) == kind)
                .count()
        };
        assert_eq!(count(SquareKind::ReservedRed), 10);
        assert_eq!(count(SquareKind::ReservedBlue), 10);
        assert_eq!(reserved_kind_for(Location::new(8, 0)), SquareKind::ReservedRed);
        assert_eq!(reserved_kind_for(Location::new(1, 7)), SquareKind::ReservedBlue);
    }

    #[test]
    fn layouts_resolve_by_name() {
        assert_eq!(Layout::from_name("mercury"), Some(Layout::Mercury));
        assert_eq!(Layout::from_name("Nope"), None);
    }

    #[test]
    fn king_rotation_is_a_named_switch() {
        assert!(!RulesConfig::default().can_rotate(PieceKind::King));
        let rules = RulesConfig {
            allow_king_rotation: true,
        };
        assert!(rules.can_rotate(PieceKind::King));
        assert!(!rules.can_rotate(PieceKind::Laser));
    }
}
