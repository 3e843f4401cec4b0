// src/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoordinateError;

// --- Enums and Basic Structs ---
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color { White, Black }

impl Color {
    pub fn opponent(&self) -> Color {
        match self { Color::White => Color::Black, Color::Black => Color::White }
    }

    /// Row delta a pawn of this color advances by.
    pub fn pawn_direction(&self) -> i8 {
        match self { Color::White => 1, Color::Black => -1 }
    }

    pub fn pawn_start_row(&self) -> u8 {
        match self { Color::White => 2, Color::Black => 7 }
    }

    /// The far rank, where pawns of this color promote.
    pub fn promotion_row(&self) -> u8 {
        match self { Color::White => 8, Color::Black => 1 }
    }

    pub fn home_row(&self) -> u8 {
        match self { Color::White => 1, Color::Black => 8 }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "WHITE"),
            Color::Black => write!(f, "BLACK"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum PieceType { King, Queen, Rook, Bishop, Knight, Pawn }

impl PieceType {
    /// Piece types a pawn may promote to, in the order promotion moves are emitted.
    pub const PROMOTIONS: [PieceType; 4] = [PieceType::Queen, PieceType::Rook, PieceType::Bishop, PieceType::Knight];

    /// Lower-case letter used in move notation and board display.
    pub fn letter(&self) -> char {
        match self {
            PieceType::King => 'k', PieceType::Queen => 'q', PieceType::Rook => 'r',
            PieceType::Bishop => 'b', PieceType::Knight => 'n', PieceType::Pawn => 'p',
        }
    }

    pub fn from_letter(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'k' => Some(PieceType::King), 'q' => Some(PieceType::Queen), 'r' => Some(PieceType::Rook),
            'b' => Some(PieceType::Bishop), 'n' => Some(PieceType::Knight), 'p' => Some(PieceType::Pawn),
            _ => None,
        }
    }
}

/// A piece has no identity beyond its color and type.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
}

impl Piece {
    pub fn new(color: Color, kind: PieceType) -> Self { Piece { color, kind } }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.letter();
        let symbol = match self.color {
            Color::White => symbol.to_ascii_uppercase(),
            Color::Black => symbol,
        };
        write!(f, "{}", symbol)
    }
}

// --- Coordinates ---

/// A square on the board. Rows and columns are 1-indexed; row 1 is White's home rank
/// and column 1 is the a-file.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    row: u8,
    column: u8,
}

// Unvalidated wire shape; every deserialized coordinate goes through `Coordinate::new`.
#[derive(Deserialize)]
struct RawCoordinate {
    row: u8,
    column: u8,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;
    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.row, raw.column)
    }
}

impl Coordinate {
    pub fn new(row: u8, column: u8) -> Result<Self, CoordinateError> {
        if !(1..=8).contains(&row) || !(1..=8).contains(&column) {
            return Err(CoordinateError::OutOfRange { row: row as i16, column: column as i16 });
        }
        Ok(Coordinate { row, column })
    }

    pub fn row(&self) -> u8 { self.row }
    pub fn column(&self) -> u8 { self.column }

    /// The square `(row_step, col_step)` away, or `None` if that falls off the board.
    pub fn offset(&self, row_step: i8, col_step: i8) -> Option<Coordinate> {
        let row = self.row as i8 + row_step;
        let column = self.column as i8 + col_step;
        if crate::movegen::on_board(row, column) {
            Some(Coordinate { row: row as u8, column: column as u8 })
        } else {
            None
        }
    }

    /// Iterates all 64 squares, row 1 first.
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (1..=8u8).flat_map(|row| (1..=8u8).map(move |column| Coordinate { row, column }))
    }

    /// Zero-based (row, column) pair for array indexing.
    pub(crate) fn index(&self) -> (usize, usize) {
        (self.row as usize - 1, self.column as usize - 1)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file_char = (b'a' + self.column - 1) as char;
        write!(f, "{}{}", file_char, self.row)
    }
}

// --- Move Representation ---

/// A move from `start` to `end`. `promotion` is only meaningful for a pawn reaching the far rank.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub start: Coordinate,
    pub end: Coordinate,
    #[serde(default)]
    pub promotion: Option<PieceType>,
}

impl Move {
    pub fn new(start: Coordinate, end: Coordinate, promotion: Option<PieceType>) -> Self {
        Move { start, end, promotion }
    }

    pub fn simple(start: Coordinate, end: Coordinate) -> Self {
        Move { start, end, promotion: None }
    }
}

/// Wire notation: "e2e4", or "e7e8q" for a promotion.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start, self.end)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.letter())?;
        }
        Ok(())
    }
}
