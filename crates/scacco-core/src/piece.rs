//! Piece kinds and colored pieces.

use std::fmt;

use crate::color::Color;

/// The kind of a chess piece, without color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceType {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceType {
    /// Total number of piece kinds.
    pub const COUNT: usize = 6;

    /// All piece kinds in index order.
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// Return the index (0..5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Return the lowercase FEN character for this kind.
    pub const fn fen_char(self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }

    /// Parse a FEN character (either case) into a piece kind.
    pub fn from_fen_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }
}

/// A piece with its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceType,
    pub color: Color,
}

impl Piece {
    /// Create a piece.
    #[inline]
    pub const fn new(kind: PieceType, color: Color) -> Piece {
        Piece { kind, color }
    }

    /// Index in 0..12: White P,N,B,R,Q,K then Black P,N,B,R,Q,K.
    ///
    /// Used to address the Zobrist piece-square table.
    #[inline]
    pub const fn index(self) -> usize {
        self.color.index() * PieceType::COUNT + self.kind.index()
    }

    /// FEN character: uppercase for White, lowercase for Black.
    pub fn fen_char(self) -> char {
        match self.color {
            Color::White => self.kind.fen_char().to_ascii_uppercase(),
            Color::Black => self.kind.fen_char(),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen_char())
    }
}

#[cfg(test)]
mod tests {
    use super::{Piece, PieceType};
    use crate::color::Color;

    #[test]
    fn fen_char_roundtrip() {
        for kind in PieceType::ALL {
            let c = kind.fen_char();
            assert_eq!(PieceType::from_fen_char(c), Some(kind));
            assert_eq!(PieceType::from_fen_char(c.to_ascii_uppercase()), Some(kind));
        }
        assert_eq!(PieceType::from_fen_char('x'), None);
    }

    #[test]
    fn piece_indices_are_distinct() {
        let mut seen = [false; 12];
        for color in Color::ALL {
            for kind in PieceType::ALL {
                let idx = Piece::new(kind, color).index();
                assert!(!seen[idx]);
                seen[idx] = true;
            }
        }
    }

    #[test]
    fn display_uses_case_for_color() {
        assert_eq!(Piece::new(PieceType::Knight, Color::White).to_string(), "N");
        assert_eq!(Piece::new(PieceType::Knight, Color::Black).to_string(), "n");
    }
}
