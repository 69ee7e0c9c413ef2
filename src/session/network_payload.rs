//! Wire shapes exchanged with a remote opponent.
//!
//! A movement travels as `{ "type", "srcLocation", "destLocation" }` and a
//! session as its Setup Notation plus turn metadata. Laser routes are never
//! transmitted; the receiver traces them itself.

use serde::{Deserialize, Serialize};

use crate::game_state::board_types::{Color, Location};
use crate::game_state::errors::{LaserChessError, LaserChessResult};
use crate::game_state::movement::{Movement, MovementKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementPayload {
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub src_location: Location,
    pub dest_location: Location,
}

impl MovementPayload {
    pub fn from_json(json: &str) -> LaserChessResult<Self> {
        serde_json::from_str(json).map_err(|err| LaserChessError::InvalidPayload {
            reason: err.to_string(),
        })
    }

    pub fn to_json(&self) -> LaserChessResult<String> {
        serde_json::to_string(self).map_err(|err| LaserChessError::InvalidPayload {
            reason: err.to_string(),
        })
    }

    /// Rebuild the movement, rejecting shapes no legal turn can have.
    pub fn to_movement(&self) -> LaserChessResult<Movement> {
        let invalid = |reason: &str| LaserChessError::InvalidPayload {
            reason: reason.to_owned(),
        };

        if self.kind == MovementKind::Invalid {
            return Err(invalid("movement type is invalid"));
        }
        if !self.src_location.is_on_board() || !self.dest_location.is_on_board() {
            return Err(invalid("location outside the board"));
        }
        if self.kind.is_rotation() && self.src_location != self.dest_location {
            return Err(invalid("rotation must keep source and destination equal"));
        }

        Ok(Movement::new(self.kind, self.src_location, self.dest_location))
    }
}

impl From<Movement> for MovementPayload {
    fn from(movement: Movement) -> Self {
        Self {
            kind: movement.kind,
            src_location: movement.src,
            dest_location: movement.dest,
        }
    }
}

/// Everything needed to resume a session on another host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub sn: String,
    pub current_player: Color,
    pub number_of_moves: u32,
    pub user_color: Color,
    pub opponent_color: Color,
}

impl SessionSnapshot {
    pub fn from_json(json: &str) -> LaserChessResult<Self> {
        serde_json::from_str(json).map_err(|err| LaserChessError::InvalidPayload {
            reason: err.to_string(),
        })
    }

    pub fn to_json(&self) -> LaserChessResult<String> {
        serde_json::to_string(self).map_err(|err| LaserChessError::InvalidPayload {
            reason: err.to_string(),
        })
    }
}

/// The more recent of the local and remote records. On equal move counts the
/// record written by the Blue side wins.
pub fn latest_snapshot<'a>(
    mine: Option<&'a SessionSnapshot>,
    theirs: Option<&'a SessionSnapshot>,
) -> Option<&'a SessionSnapshot> {
    match (mine, theirs) {
        (Some(mine), Some(theirs)) => {
            if mine.number_of_moves > theirs.number_of_moves
                || (mine.number_of_moves == theirs.number_of_moves
                    && mine.user_color == Color::Blue)
            {
                Some(mine)
            } else {
                Some(theirs)
            }
        }
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}
