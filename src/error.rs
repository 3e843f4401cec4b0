// src/error.rs
use std::error::Error;
use std::fmt;
use std::io;

use crate::types::{Color, Coordinate, Move};

// --- Custom Error Types ---

/// A row or column outside [1,8]. Always a programming error on the caller's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateError {
    OutOfRange { row: i16, column: i16 },
}
impl fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateError::OutOfRange { row, column } =>
                write!(f, "Coordinate ({}, {}) is off the board; rows and columns run 1..=8", row, column),
        }
    }
}
impl Error for CoordinateError {}

/// The single "invalid move" failure raised by `Game::make_move`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    NoPiece(Coordinate),
    WrongTurn { piece: Color, turn: Color },
    Illegal(Move),
}
impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::NoPiece(sq) => write!(f, "Invalid move: no piece at {}", sq),
            MoveError::WrongTurn { piece, turn } => write!(f, "Invalid move: it is {}'s turn, not {}'s", turn, piece),
            MoveError::Illegal(mv) => write!(f, "Invalid move: {} is not legal for this piece", mv),
        }
    }
}
impl Error for MoveError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    BadLength(String),
    BadFile(char),
    BadRank(char),
    BadPromotion(char),
}
impl fmt::Display for NotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotationError::BadLength(input) => write!(f, "Invalid move format: '{}'. Use format like 'e2e4' or 'a7a8q'.", input),
            NotationError::BadFile(c) => write!(f, "Invalid file '{}': expected a-h", c),
            NotationError::BadRank(c) => write!(f, "Invalid rank '{}': expected 1-8", c),
            NotationError::BadPromotion(c) => write!(f, "Invalid promotion character: '{}'. Use q, r, b, or n.", c),
        }
    }
}
impl Error for NotationError {}

#[derive(Debug)]
pub enum StoreError {
    NotFound(u32),
    AlreadyExists(u32),
    Serialization(serde_json::Error),
    Io(String, io::Error),
}
impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "Game not found: {}", id),
            StoreError::AlreadyExists(id) => write!(f, "Game already exists: {}", id),
            StoreError::Serialization(e) => write!(f, "Serialization error: {}", e),
            StoreError::Io(file, e) => write!(f, "I/O error with file '{}': {}", file, e),
        }
    }
}
impl Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self { StoreError::Serialization(e) }
}

#[derive(Debug)]
pub enum ServiceError {
    Unauthorized,
    BadRequest(String),
    UsernameTaken(String),
    SeatTaken(Color),
    NotYourTurn,
    GameOver(u32),
    Move(MoveError),
    Store(StoreError),
}
impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Unauthorized => write!(f, "Error: unauthorized"),
            ServiceError::BadRequest(reason) => write!(f, "Error: bad request: {}", reason),
            ServiceError::UsernameTaken(name) => write!(f, "Error: username {} is already taken", name),
            ServiceError::SeatTaken(color) => write!(f, "Error: {} is already taken", color),
            ServiceError::NotYourTurn => write!(f, "Error: not your turn or you're an observer"),
            ServiceError::GameOver(id) => write!(f, "Error: game {} is over", id),
            ServiceError::Move(e) => write!(f, "Error: {}", e),
            ServiceError::Store(e) => write!(f, "Error: {}", e),
        }
    }
}
impl Error for ServiceError {}

// Automatic conversions for convenience
impl From<MoveError> for ServiceError {
    fn from(e: MoveError) -> Self { ServiceError::Move(e) }
}
impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self { ServiceError::Store(e) }
}
impl From<NotationError> for ServiceError {
    fn from(e: NotationError) -> Self { ServiceError::BadRequest(e.to_string()) }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(String, io::Error),
    Parse(String, serde_yaml::Error),
}
impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(file, e) => write!(f, "Failed to read config '{}': {}", file, e),
            ConfigError::Parse(file, e) => write!(f, "Failed to parse config '{}': {}", file, e),
        }
    }
}
impl Error for ConfigError {}
