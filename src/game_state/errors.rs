//! Error types used throughout the rules engine.
//!
//! `LaserChessError` is the single error type returned by parsing, board
//! mutation, laser tracing, configuration loading and search. Validation
//! outcomes (an illegal destination, a rejected selection) are not errors and
//! never appear here; they are reported as empty lists or `false`.
//!
//! Variant families:
//! - notation and payload variants describe bad external input and are safe
//!   to show to a user;
//! - precondition variants (`EmptySource`, `InvalidLocation`) mean a caller
//!   skipped validation;
//! - configuration variants (`IncompleteHitTable`, `NoMovesAvailable`, ...)
//!   point at a broken setup rather than a bad move.

use std::path::PathBuf;

use thiserror::Error;

use crate::game_state::board_types::Location;

#[derive(Error, Debug)]
pub enum LaserChessError {
    /// Malformed Setup Notation. No partial board is produced.
    #[error("Invalid setup notation: {reason}")]
    InvalidNotation { reason: String },

    /// A location outside the 10x8 grid, or an unparsable square name.
    #[error("Invalid location: {name}")]
    InvalidLocation { name: String },

    /// A movement was applied to a square without a piece.
    #[error("No piece at source square ({}, {})", .location.col, .location.row)]
    EmptySource { location: Location },

    /// The hit table does not cover every (direction, piece, orientation).
    #[error("Laser hit table has no entry for {direction}/{piece}/{orientation}")]
    IncompleteHitTable {
        direction: String,
        piece: String,
        orientation: String,
    },

    /// The hit table contains a key or value outside the known vocabulary.
    #[error("Invalid laser hit table: {reason}")]
    InvalidHitTable { reason: String },

    #[error("Failed to read laser hit table from {}", .path.display())]
    HitTableIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Search was asked for a move on a board where the side has none.
    #[error("No moves available for {color}")]
    NoMovesAvailable { color: String },

    /// A movement exchange payload could not be decoded.
    #[error("Invalid movement payload: {reason}")]
    InvalidPayload { reason: String },

    /// The beam tracer exceeded the number of distinct (cell, direction) states.
    #[error("Laser route exceeded {limit} steps")]
    RouteOverflow { limit: usize },

    /// A console or engine option name or value was not understood.
    #[error("Invalid option {name}: {reason}")]
    InvalidOption { name: String, reason: String },

    #[error("Console I/O failed")]
    ConsoleIo {
        #[source]
        source: std::io::Error,
    },

    /// An opponent strategy produced a movement the rules reject.
    #[error("Opponent produced an illegal movement: {description}")]
    IllegalOpponentMove { description: String },
}

/// Result type alias for rules engine operations.
pub type LaserChessResult<T> = Result<T, LaserChessError>;
