//! Laser hit outcomes keyed by (beam direction, piece kind, orientation).
//!
//! The table is external configuration: a JSON document of the form
//! `{ "top": { "k": { "0": "kill", ... }, ... }, ... }` where each leaf is
//! `"kill"`, `"nothing"` or the new travel direction of a deflected beam.
//! Directions are the beam's travel direction when it enters the square.
//! Loading rejects unknown keys and values, and any missing combination.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::game_state::board_types::{Direction, Orientation, PieceKind};
use crate::game_state::errors::{LaserChessError, LaserChessResult};

/// Table shipped with the crate, following the official piece geometry.
pub const OFFICIAL_HIT_TABLE_JSON: &str = include_str!("../../assets/laser_hits.json");

const ENTRY_COUNT: usize = 4 * 5 * 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitOutcome {
    Kill,
    /// The beam is absorbed without harming the piece.
    Nothing,
    Deflect(Direction),
}

impl HitOutcome {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "kill" => Some(HitOutcome::Kill),
            "nothing" => Some(HitOutcome::Nothing),
            other => Direction::from_name(other).map(HitOutcome::Deflect),
        }
    }
}

type RawTable = BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitTable {
    // [direction][piece kind][orientation]
    outcomes: [[[HitOutcome; 4]; 5]; 4],
}

impl HitTable {
    pub fn official() -> LaserChessResult<Self> {
        Self::from_json(OFFICIAL_HIT_TABLE_JSON)
    }

    pub fn from_path(path: impl AsRef<Path>) -> LaserChessResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LaserChessError::HitTableIo {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_json(&text)?;
        info!(path = %path.display(), "loaded laser hit table");
        Ok(table)
    }

    pub fn from_json(json: &str) -> LaserChessResult<Self> {
        let raw: RawTable =
            serde_json::from_str(json).map_err(|e| LaserChessError::InvalidHitTable {
                reason: e.to_string(),
            })?;

        let mut slots: [[[Option<HitOutcome>; 4]; 5]; 4] = [[[None; 4]; 5]; 4];
        let mut filled = 0usize;

        for (direction_key, pieces) in &raw {
            let direction = Direction::from_name(direction_key)
                .ok_or_else(|| invalid(format!("unknown direction '{direction_key}'")))?;

            for (piece_key, orientations) in pieces {
                let kind = single_char(piece_key)
                    .filter(|ch| ch.is_ascii_lowercase())
                    .and_then(PieceKind::from_letter)
                    .ok_or_else(|| invalid(format!("unknown piece '{piece_key}'")))?;

                for (orientation_key, token) in orientations {
                    let orientation = orientation_key
                        .parse::<i32>()
                        .ok()
                        .filter(|deg| (0..360).contains(deg))
                        .and_then(Orientation::from_degrees)
                        .ok_or_else(|| {
                            invalid(format!("unknown orientation '{orientation_key}'"))
                        })?;
                    let outcome = HitOutcome::from_token(token).ok_or_else(|| {
                        invalid(format!(
                            "unknown outcome '{token}' at {direction_key}/{piece_key}/{orientation_key}"
                        ))
                    })?;

                    let slot =
                        &mut slots[direction.index()][kind.index()][orientation.index()];
                    if slot.replace(outcome).is_none() {
                        filled += 1;
                    }
                }
            }
        }

        let mut outcomes = [[[HitOutcome::Nothing; 4]; 5]; 4];
        for direction in Direction::ALL {
            for kind in PieceKind::ALL {
                for orientation in Orientation::ALL {
                    let outcome = slots[direction.index()][kind.index()][orientation.index()]
                        .ok_or_else(|| LaserChessError::IncompleteHitTable {
                            direction: direction.name().to_owned(),
                            piece: kind.letter().to_string(),
                            orientation: orientation.degrees().to_string(),
                        })?;
                    outcomes[direction.index()][kind.index()][orientation.index()] = outcome;
                }
            }
        }
        debug_assert_eq!(filled, ENTRY_COUNT);

        Ok(Self { outcomes })
    }

    /// Outcome of a beam travelling `direction` into a piece.
    #[inline]
    pub fn outcome(
        &self,
        direction: Direction,
        kind: PieceKind,
        orientation: Orientation,
    ) -> HitOutcome {
        self.outcomes[direction.index()][kind.index()][orientation.index()]
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let ch = chars.next()?;
    chars.next().is_none().then_some(ch)
}

fn invalid(reason: String) -> LaserChessError {
    LaserChessError::InvalidHitTable { reason }
}
