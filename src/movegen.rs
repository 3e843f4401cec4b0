// src/movegen.rs
//! Pseudo-legal move generation: board edges, blocking and capture rules, but no
//! regard for whether the move leaves the mover's own king attacked.
use std::collections::HashSet;

use crate::board::Board;
use crate::types::{Coordinate, Move, PieceType};

// --- Direction Tables ---
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1), (2, -1), (-2, 1), (-2, -1),
    (1, 2), (1, -2), (-1, 2), (-1, -2),
];
const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0), (-1, 0), (0, 1), (0, -1),
    (1, 1), (1, -1), (-1, 1), (-1, -1),
];

// --- Shared Helpers ---

#[inline]
pub fn on_board(row: i8, column: i8) -> bool {
    (1..=8).contains(&row) && (1..=8).contains(&column)
}

#[inline]
pub fn occupied(board: &Board, at: Coordinate) -> bool {
    board.piece_at(at).is_some()
}

/// Both squares occupied, by different colors.
pub fn can_capture(board: &Board, from: Coordinate, to: Coordinate) -> bool {
    match (board.piece_at(from), board.piece_at(to)) {
        (Some(mover), Some(target)) => mover.color != target.color,
        _ => false,
    }
}

/// Slides from `origin` by `(row_step, col_step)` until the edge or the first occupied
/// square; an enemy there is included as a capture, a friendly piece is not.
pub fn walk(board: &Board, origin: Coordinate, row_step: i8, col_step: i8, moves: &mut HashSet<Move>) {
    let mut current = origin;
    while let Some(next) = current.offset(row_step, col_step) {
        if occupied(board, next) {
            if can_capture(board, origin, next) {
                moves.insert(Move::simple(origin, next));
            }
            break;
        }
        moves.insert(Move::simple(origin, next));
        current = next;
    }
}

/// Single jumps for knights and kings: each target must be empty or capturable.
fn step(board: &Board, origin: Coordinate, offsets: &[(i8, i8)], moves: &mut HashSet<Move>) {
    for &(dr, dc) in offsets {
        if let Some(target) = origin.offset(dr, dc) {
            if !occupied(board, target) || can_capture(board, origin, target) {
                moves.insert(Move::simple(origin, target));
            }
        }
    }
}

// --- Per-Type Generators ---

pub fn rook_moves(board: &Board, from: Coordinate) -> HashSet<Move> {
    let mut moves = HashSet::new();
    for (dr, dc) in ORTHOGONALS {
        walk(board, from, dr, dc, &mut moves);
    }
    moves
}

pub fn bishop_moves(board: &Board, from: Coordinate) -> HashSet<Move> {
    let mut moves = HashSet::new();
    for (dr, dc) in DIAGONALS {
        walk(board, from, dr, dc, &mut moves);
    }
    moves
}

pub fn queen_moves(board: &Board, from: Coordinate) -> HashSet<Move> {
    let mut moves = rook_moves(board, from);
    moves.extend(bishop_moves(board, from));
    moves
}

pub fn knight_moves(board: &Board, from: Coordinate) -> HashSet<Move> {
    let mut moves = HashSet::new();
    step(board, from, &KNIGHT_OFFSETS, &mut moves);
    moves
}

pub fn king_moves(board: &Board, from: Coordinate) -> HashSet<Move> {
    let mut moves = HashSet::new();
    step(board, from, &KING_OFFSETS, &mut moves);
    moves
}

/// Pushes, double pushes from the starting rank, and diagonal captures. Any move onto
/// the far rank is expanded into the four promotion choices. No en passant.
pub fn pawn_moves(board: &Board, from: Coordinate) -> HashSet<Move> {
    let mut moves = HashSet::new();
    let Some(pawn) = board.piece_at(from) else { return moves; };
    let color = pawn.color;
    let dir = color.pawn_direction();

    // 1. Single push, then double push through an empty square
    if let Some(one_ahead) = from.offset(dir, 0) {
        if !occupied(board, one_ahead) {
            add_pawn_move(from, one_ahead, color.promotion_row(), &mut moves);

            if from.row() == color.pawn_start_row() {
                if let Some(two_ahead) = one_ahead.offset(dir, 0) {
                    if !occupied(board, two_ahead) {
                        moves.insert(Move::simple(from, two_ahead));
                    }
                }
            }
        }
    }

    // 2. Diagonal captures
    for dc in [-1, 1] {
        if let Some(target) = from.offset(dir, dc) {
            if can_capture(board, from, target) {
                add_pawn_move(from, target, color.promotion_row(), &mut moves);
            }
        }
    }

    moves
}

#[inline]
fn add_pawn_move(from: Coordinate, to: Coordinate, promotion_row: u8, moves: &mut HashSet<Move>) {
    if to.row() == promotion_row {
        for kind in PieceType::PROMOTIONS {
            moves.insert(Move::new(from, to, Some(kind)));
        }
    } else {
        moves.insert(Move::simple(from, to));
    }
}

/// Pseudo-legal moves for whatever piece stands on `from`; empty if the square is empty.
pub fn piece_moves(board: &Board, from: Coordinate) -> HashSet<Move> {
    let Some(piece) = board.piece_at(from) else { return HashSet::new(); };
    match piece.kind {
        PieceType::King => king_moves(board, from),
        PieceType::Queen => queen_moves(board, from),
        PieceType::Rook => rook_moves(board, from),
        PieceType::Bishop => bishop_moves(board, from),
        PieceType::Knight => knight_moves(board, from),
        PieceType::Pawn => pawn_moves(board, from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, Piece};

    fn sq(row: u8, column: u8) -> Coordinate { Coordinate::new(row, column).unwrap() }

    fn with(pieces: &[(u8, u8, Color, PieceType)]) -> Board {
        let mut board = Board::new();
        for &(r, c, color, kind) in pieces {
            board.place(sq(r, c), Some(Piece::new(color, kind)));
        }
        board
    }

    fn ends(moves: &HashSet<Move>) -> HashSet<Coordinate> {
        moves.iter().map(|m| m.end).collect()
    }

    #[test]
    fn bishop_on_empty_board_reaches_thirteen_squares() {
        let board = with(&[(4, 4, Color::White, PieceType::Bishop)]);
        let moves = bishop_moves(&board, sq(4, 4));
        assert_eq!(moves.len(), 13);
        assert!(moves.contains(&Move::simple(sq(4, 4), sq(1, 1))));
        assert!(moves.contains(&Move::simple(sq(4, 4), sq(8, 8))));
        assert!(moves.contains(&Move::simple(sq(4, 4), sq(1, 7))));
        assert!(moves.contains(&Move::simple(sq(4, 4), sq(7, 1))));
    }

    #[test]
    fn rook_walk_stops_at_first_enemy() {
        let board = with(&[
            (4, 4, Color::White, PieceType::Rook),
            (4, 6, Color::Black, PieceType::Knight),
        ]);
        let targets = ends(&rook_moves(&board, sq(4, 4)));
        assert!(targets.contains(&sq(4, 5)));
        assert!(targets.contains(&sq(4, 6)));
        assert!(!targets.contains(&sq(4, 7)));
        assert!(!targets.contains(&sq(4, 8)));
        assert_eq!(targets.len(), 7 + 3 + 2);
    }

    #[test]
    fn rook_does_not_capture_own_piece() {
        let board = with(&[
            (1, 1, Color::White, PieceType::Rook),
            (1, 3, Color::White, PieceType::Knight),
            (3, 1, Color::Black, PieceType::Pawn),
        ]);
        let targets = ends(&rook_moves(&board, sq(1, 1)));
        assert_eq!(targets, [sq(1, 2), sq(2, 1), sq(3, 1)].into_iter().collect());
    }

    #[test]
    fn queen_is_rook_plus_bishop() {
        let board = with(&[(4, 4, Color::Black, PieceType::Queen)]);
        assert_eq!(queen_moves(&board, sq(4, 4)).len(), 14 + 13);
    }

    #[test]
    fn knight_jumps_over_pieces() {
        let mut board = Board::initial();
        let moves = knight_moves(&board, sq(1, 2));
        assert_eq!(ends(&moves), [sq(3, 1), sq(3, 3)].into_iter().collect());

        board.place(sq(3, 3), Some(Piece::new(Color::Black, PieceType::Pawn)));
        board.place(sq(3, 1), Some(Piece::new(Color::White, PieceType::Pawn)));
        assert_eq!(ends(&knight_moves(&board, sq(1, 2))), [sq(3, 3)].into_iter().collect());
    }

    #[test]
    fn knight_in_corner() {
        let board = with(&[(8, 8, Color::White, PieceType::Knight)]);
        assert_eq!(ends(&knight_moves(&board, sq(8, 8))), [sq(6, 7), sq(7, 6)].into_iter().collect());
    }

    #[test]
    fn king_steps_one_square() {
        let board = with(&[
            (1, 5, Color::White, PieceType::King),
            (2, 5, Color::White, PieceType::Pawn),
            (2, 4, Color::Black, PieceType::Pawn),
        ]);
        let targets = ends(&king_moves(&board, sq(1, 5)));
        assert_eq!(targets, [sq(1, 4), sq(1, 6), sq(2, 4), sq(2, 6)].into_iter().collect());
    }

    #[test]
    fn pawn_double_push_from_start() {
        let board = with(&[(2, 3, Color::White, PieceType::Pawn)]);
        let moves = pawn_moves(&board, sq(2, 3));
        assert_eq!(moves, [Move::simple(sq(2, 3), sq(3, 3)), Move::simple(sq(2, 3), sq(4, 3))].into_iter().collect());
    }

    #[test]
    fn blocked_pawn_has_no_forward_moves() {
        let board = with(&[
            (2, 3, Color::White, PieceType::Pawn),
            (3, 3, Color::Black, PieceType::Knight),
        ]);
        assert!(pawn_moves(&board, sq(2, 3)).is_empty());

        // Only the far square blocked: single push still allowed
        let board = with(&[
            (2, 3, Color::White, PieceType::Pawn),
            (4, 3, Color::Black, PieceType::Knight),
        ]);
        assert_eq!(ends(&pawn_moves(&board, sq(2, 3))), [sq(3, 3)].into_iter().collect());
    }

    #[test]
    fn black_pawn_moves_down_the_board() {
        let board = with(&[
            (7, 5, Color::Black, PieceType::Pawn),
            (6, 4, Color::White, PieceType::Bishop),
            (6, 6, Color::Black, PieceType::Bishop),
        ]);
        let targets = ends(&pawn_moves(&board, sq(7, 5)));
        assert_eq!(targets, [sq(6, 5), sq(5, 5), sq(6, 4)].into_iter().collect());
    }

    #[test]
    fn pawn_off_start_rank_moves_once() {
        let board = with(&[(3, 1, Color::White, PieceType::Pawn)]);
        assert_eq!(ends(&pawn_moves(&board, sq(3, 1))), [sq(4, 1)].into_iter().collect());
    }

    #[test]
    fn pawn_promotes_into_four_moves() {
        let board = with(&[(7, 3, Color::White, PieceType::Pawn)]);
        let moves = pawn_moves(&board, sq(7, 3));
        assert_eq!(moves.len(), 4);
        for kind in PieceType::PROMOTIONS {
            assert!(moves.contains(&Move::new(sq(7, 3), sq(8, 3), Some(kind))));
        }
    }

    #[test]
    fn pawn_capture_promotion() {
        let board = with(&[
            (2, 2, Color::Black, PieceType::Pawn),
            (1, 2, Color::White, PieceType::Rook),
            (1, 1, Color::White, PieceType::Knight),
        ]);
        let moves = pawn_moves(&board, sq(2, 2));
        assert_eq!(moves.len(), 4);
        assert!(moves.iter().all(|m| m.end == sq(1, 1) && m.promotion.is_some()));
    }

    #[test]
    fn empty_square_generates_nothing() {
        assert!(piece_moves(&Board::initial(), sq(4, 4)).is_empty());
    }

    #[test]
    fn opening_position_has_twenty_moves_per_side() {
        let board = Board::initial();
        for color in [Color::White, Color::Black] {
            let total: usize = board.pieces()
                .filter(|(_, p)| p.color == color)
                .map(|(at, _)| piece_moves(&board, at).len())
                .sum();
            assert_eq!(total, 20);
        }
    }
}
