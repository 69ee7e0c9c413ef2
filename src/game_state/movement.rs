use serde::{Deserialize, Serialize};

use crate::game_state::board_types::Location;
use crate::utils::algebraic::location_to_algebraic;

/// Movement classification. Wire names match the networked payload format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "normal")]
    Normal,
    /// A Switch swapping places with an adjacent Deflector or Defender.
    #[serde(rename = "special")]
    Special,
    #[serde(rename = "clockwise_rotation")]
    RotateClockwise,
    #[serde(rename = "c_clockwise_rotation")]
    RotateCounterClockwise,
    #[serde(rename = "invalid")]
    Invalid,
}

impl MovementKind {
    #[inline]
    pub const fn is_rotation(self) -> bool {
        matches!(
            self,
            MovementKind::RotateClockwise | MovementKind::RotateCounterClockwise
        )
    }

    /// Short console token.
    pub const fn token(self) -> &'static str {
        match self {
            MovementKind::Normal => "normal",
            MovementKind::Special => "special",
            MovementKind::RotateClockwise => "cw",
            MovementKind::RotateCounterClockwise => "ccw",
            MovementKind::Invalid => "invalid",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "normal" => Some(MovementKind::Normal),
            "special" | "swap" => Some(MovementKind::Special),
            "cw" | "clockwise_rotation" => Some(MovementKind::RotateClockwise),
            "ccw" | "c_clockwise_rotation" => Some(MovementKind::RotateCounterClockwise),
            _ => None,
        }
    }
}

/// A single turn's action. Rotations carry `src == dest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Movement {
    pub kind: MovementKind,
    pub src: Location,
    pub dest: Location,
}

impl Movement {
    #[inline]
    pub const fn new(kind: MovementKind, src: Location, dest: Location) -> Self {
        Self { kind, src, dest }
    }

    #[inline]
    pub const fn rotation(location: Location, clockwise: bool) -> Self {
        let kind = if clockwise {
            MovementKind::RotateClockwise
        } else {
            MovementKind::RotateCounterClockwise
        };
        Self::new(kind, location, location)
    }

    /// Human-readable form such as `normal e4 e5` or `cw c3`.
    pub fn describe(&self) -> String {
        let src = location_to_algebraic(self.src).unwrap_or_else(|_| "??".to_owned());
        if self.kind.is_rotation() {
            return format!("{} {}", self.kind.token(), src);
        }
        let dest = location_to_algebraic(self.dest).unwrap_or_else(|_| "??".to_owned());
        format!("{} {} {}", self.kind.token(), src, dest)
    }
}
