// src/game.rs
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::board::Board;
use crate::error::MoveError;
use crate::movegen::piece_moves;
use crate::types::{Color, Coordinate, Move, Piece};

/// Terminal-state report for one side. The engine only reports; acting on it is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Ongoing,
    Check(Color),
    Checkmate(Color),
    Stalemate(Color),
}

// --- Game State ---

/// One board plus the side to move. Mutated only through `make_move`.
///
/// Not synchronized: callers sharing a game between threads must serialize access
/// (one writer per match), and readers must not overlap a `make_move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    turn: Color,
}

impl Default for Game {
    fn default() -> Self { Game::new() }
}

impl Game {
    /// A freshly reset board with White to move.
    pub fn new() -> Self {
        Game { board: Board::initial(), turn: Color::White }
    }

    pub fn with_board(board: Board, turn: Color) -> Self {
        Game { board, turn }
    }

    pub fn turn(&self) -> Color { self.turn }
    pub fn set_turn(&mut self, turn: Color) { self.turn = turn; }
    pub fn board(&self) -> &Board { &self.board }
    pub fn set_board(&mut self, board: Board) { self.board = board; }

    // --- Legal Move Generation ---

    /// Legal moves for the piece on `at`, regardless of whose turn it is.
    /// `None` if the square is empty.
    pub fn valid_moves(&self, at: Coordinate) -> Option<HashSet<Move>> {
        let piece = self.board.piece_at(at)?;
        let moves = piece_moves(&self.board, at)
            .into_iter()
            .filter(|mv| !leaves_king_attacked(&self.board, mv, piece))
            .collect();
        Some(moves)
    }

    /// Union of `valid_moves` over every square holding a piece of `color`.
    pub fn legal_moves(&self, color: Color) -> HashSet<Move> {
        self.board
            .pieces()
            .filter(|(_, p)| p.color == color)
            .filter_map(|(at, _)| self.valid_moves(at))
            .flatten()
            .collect()
    }

    // --- Move Execution ---

    /// Validates `mv` against the legal set for the side to move, applies it and passes the turn.
    /// A rejected move leaves the game untouched.
    pub fn make_move(&mut self, mv: &Move) -> Result<(), MoveError> {
        let piece = self.board.piece_at(mv.start).ok_or(MoveError::NoPiece(mv.start))?;
        if piece.color != self.turn {
            return Err(MoveError::WrongTurn { piece: piece.color, turn: self.turn });
        }
        let legal = self.valid_moves(mv.start).unwrap_or_default();
        if !legal.contains(mv) {
            return Err(MoveError::Illegal(*mv));
        }

        apply_move(&mut self.board, mv, piece);
        self.turn = self.turn.opponent();
        Ok(())
    }

    // --- Terminal-State Detection ---

    /// A side without a king on the board is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        in_check_on(&self.board, color)
    }

    pub fn is_in_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && self.legal_moves(color).is_empty()
    }

    pub fn is_in_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && self.legal_moves(color).is_empty()
    }

    /// Status of the side to move.
    pub fn status(&self) -> GameStatus {
        let color = self.turn;
        let in_check = self.is_in_check(color);
        let has_moves = !self.legal_moves(color).is_empty();
        match (in_check, has_moves) {
            (true, false) => GameStatus::Checkmate(color),
            (false, false) => GameStatus::Stalemate(color),
            (true, true) => GameStatus::Check(color),
            (false, true) => GameStatus::Ongoing,
        }
    }

    // --- Serialization ---

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        write!(f, "Turn: {}", self.turn)
    }
}

// Clears the start square and lands the (possibly promoted) piece on the end square.
fn apply_move(board: &mut Board, mv: &Move, mover: Piece) {
    let landed = match mv.promotion {
        Some(kind) => Piece::new(mover.color, kind),
        None => mover,
    };
    board.place(mv.start, None);
    board.place(mv.end, Some(landed));
}

/// Plays `mv` on a scratch copy and asks whether the mover's king is then attacked.
fn leaves_king_attacked(board: &Board, mv: &Move, mover: Piece) -> bool {
    let mut scratch = board.clone();
    apply_move(&mut scratch, mv, mover);
    in_check_on(&scratch, mover.color)
}

fn in_check_on(board: &Board, color: Color) -> bool {
    match board.find_king(color) {
        Some(king) => is_attacked_by(board, king, color.opponent()),
        None => false,
    }
}

/// True if any `attacker` piece has a pseudo-legal move ending on `target`.
fn is_attacked_by(board: &Board, target: Coordinate, attacker: Color) -> bool {
    board
        .pieces()
        .filter(|(_, p)| p.color == attacker)
        .any(|(at, _)| piece_moves(board, at).iter().any(|mv| mv.end == target))
}
