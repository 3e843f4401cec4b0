//! Rules engine and match service for a networked two-player chess game.
//!
//! The engine (`types`, `board`, `movegen`, `game`, `notation`) is synchronous and free of
//! global state. `store`, `protocol` and `service` wrap it for persistence and client traffic.

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod movegen;
pub mod notation;
pub mod protocol;
pub mod service;
pub mod store;
pub mod types;

pub use board::Board;
pub use error::{MoveError, NotationError, ServiceError, StoreError};
pub use game::{Game, GameStatus};
pub use types::{Color, Coordinate, Move, Piece, PieceType};
