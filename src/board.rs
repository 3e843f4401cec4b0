// src/board.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Color, Coordinate, Piece, PieceType};

// Back-rank order, a-file to h-file.
const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook, PieceType::Knight, PieceType::Bishop, PieceType::Queen,
    PieceType::King, PieceType::Bishop, PieceType::Knight, PieceType::Rook,
];

/// 8x8 grid, `squares[row - 1][column - 1]`. At most one piece per cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// An empty board.
    pub fn new() -> Self { Board::default() }

    /// A board holding the standard opening position.
    pub fn initial() -> Self {
        let mut board = Board::new();
        board.reset();
        board
    }

    /// Sets the square, overwriting any occupant. `None` clears it.
    pub fn place(&mut self, at: Coordinate, piece: Option<Piece>) {
        let (r, c) = at.index();
        self.squares[r][c] = piece;
    }

    pub fn piece_at(&self, at: Coordinate) -> Option<Piece> {
        let (r, c) = at.index();
        self.squares[r][c]
    }

    /// Clears all 64 squares, then sets up the standard 32-piece opening position.
    pub fn reset(&mut self) {
        self.squares = [[None; 8]; 8];
        for color in [Color::White, Color::Black] {
            let home = color.home_row() as usize - 1;
            let pawns = color.pawn_start_row() as usize - 1;
            for (file, kind) in BACK_RANK.iter().enumerate() {
                self.squares[home][file] = Some(Piece::new(color, *kind));
                self.squares[pawns][file] = Some(Piece::new(color, PieceType::Pawn));
            }
        }
    }

    /// Every occupied square with its piece, row 1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Coordinate, Piece)> + '_ {
        Coordinate::all().filter_map(move |at| self.piece_at(at).map(|p| (at, p)))
    }

    /// Scans for `color`'s king. `None` only for malformed positions.
    pub fn find_king(&self, color: Color) -> Option<Coordinate> {
        self.pieces()
            .find(|(_, p)| p.color == color && p.kind == PieceType::King)
            .map(|(at, _)| at)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  +-----------------+")?;
        for row in (0..8).rev() {
            write!(f, "{} | ", row + 1)?;
            for column in 0..8 {
                match self.squares[row][column] {
                    Some(piece) => write!(f, "{} ", piece)?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "  +-----------------+")?;
        write!(f, "    a b c d e f g h")
    }
}
