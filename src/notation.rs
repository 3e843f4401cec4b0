// src/notation.rs
//! Wire encoding for squares ("e4") and moves ("e2e4", "a7a8q").
use crate::error::NotationError;
use crate::types::{Coordinate, Move, PieceType};

/// Parses a two-character square: file a-h maps to column 1-8, the rank digit to the row.
pub fn parse_square(s: &str) -> Result<Coordinate, NotationError> {
    let mut chars = s.chars();
    let (Some(file_char), Some(rank_char), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(NotationError::BadLength(s.to_string()));
    };
    let column = match file_char.to_ascii_lowercase() {
        c @ 'a'..='h' => c as u8 - b'a' + 1,
        _ => return Err(NotationError::BadFile(file_char)),
    };
    let row = match rank_char {
        '1'..='8' => rank_char as u8 - b'0',
        _ => return Err(NotationError::BadRank(rank_char)),
    };
    // Both components were range-checked above
    Coordinate::new(row, column).map_err(|_| NotationError::BadLength(s.to_string()))
}

/// Parses a four-character square pair with an optional fifth promotion letter (q, r, b, n).
/// Checks format only, not legality.
pub fn parse_move(input: &str) -> Result<Move, NotationError> {
    let trimmed = input.trim();
    let chars: Vec<char> = trimmed.chars().collect();
    if !(4..=5).contains(&chars.len()) {
        return Err(NotationError::BadLength(trimmed.to_string()));
    }

    let start = parse_square(&chars[0..2].iter().collect::<String>())?;
    let end = parse_square(&chars[2..4].iter().collect::<String>())?;

    let promotion = match chars.get(4) {
        None => None,
        Some(&c) => match PieceType::from_letter(c) {
            Some(kind) if PieceType::PROMOTIONS.contains(&kind) => Some(kind),
            _ => return Err(NotationError::BadPromotion(c)),
        },
    };

    Ok(Move::new(start, end, promotion))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, column: u8) -> Coordinate { Coordinate::new(row, column).unwrap() }

    #[test]
    fn parses_plain_move() {
        assert_eq!(parse_move("e2e4"), Ok(Move::simple(sq(2, 5), sq(4, 5))));
        assert_eq!(parse_move(" a1h8 "), Ok(Move::simple(sq(1, 1), sq(8, 8))));
    }

    #[test]
    fn parses_promotion_suffix() {
        assert_eq!(parse_move("b7b8q"), Ok(Move::new(sq(7, 2), sq(8, 2), Some(PieceType::Queen))));
        assert_eq!(parse_move("g2g1N"), Ok(Move::new(sq(2, 7), sq(1, 7), Some(PieceType::Knight))));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse_move("e2e"), Err(NotationError::BadLength("e2e".to_string())));
        assert_eq!(parse_move("e2e4qq"), Err(NotationError::BadLength("e2e4qq".to_string())));
        assert_eq!(parse_move("i2e4"), Err(NotationError::BadFile('i')));
        assert_eq!(parse_move("e0e4"), Err(NotationError::BadRank('0')));
        assert_eq!(parse_move("e2e9"), Err(NotationError::BadRank('9')));
        assert_eq!(parse_move("e7e8k"), Err(NotationError::BadPromotion('k')));
        assert_eq!(parse_move("e7e8x"), Err(NotationError::BadPromotion('x')));
    }

    #[test]
    fn square_round_trips_through_display() {
        for at in Coordinate::all() {
            assert_eq!(parse_square(&at.to_string()), Ok(at));
        }
    }
}
