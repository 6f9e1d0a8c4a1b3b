//! FEN string parsing for [`Board`].

use std::str::FromStr;

use crate::board::Board;
use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::FenError;
use crate::piece::{Piece, PieceType};
use crate::position::Position;

/// The FEN string for the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl FromStr for Board {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Board, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::WrongFieldCount {
                found: fields.len(),
            });
        }

        // Piece placement: ranks from 8 down to 1.
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }

        let mut squares = [None; 64];
        for (rank_index, rank_str) in ranks.iter().enumerate() {
            let row = 7 - rank_index as i8;
            let mut col: i8 = 0;

            for c in rank_str.chars() {
                if let Some(digit) = c.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(FenError::InvalidPieceChar { character: c });
                    }
                    col += digit as i8;
                } else {
                    let kind = PieceType::from_fen_char(c)
                        .ok_or(FenError::InvalidPieceChar { character: c })?;
                    let color = if c.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    if col >= 8 {
                        return Err(FenError::BadRankLength {
                            rank_index,
                            length: col as usize + 1,
                        });
                    }
                    squares[Position::new(row, col).index()] = Some(Piece::new(kind, color));
                    col += 1;
                }
            }

            if col != 8 {
                return Err(FenError::BadRankLength {
                    rank_index,
                    length: col as usize,
                });
            }
        }

        for color in Color::ALL {
            let kings = squares
                .iter()
                .flatten()
                .filter(|p| p.kind == PieceType::King && p.color == color)
                .count();
            if kings != 1 {
                return Err(FenError::InvalidKingCount {
                    color: match color {
                        Color::White => "white",
                        Color::Black => "black",
                    },
                    count: kings,
                });
            }
        }

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidColor {
                    found: other.to_string(),
                });
            }
        };

        let mut castling = CastleRights::NONE;
        if fields[2] != "-" {
            for c in fields[2].chars() {
                castling = match c {
                    'K' => castling.with(CastleRights::WHITE_KING),
                    'Q' => castling.with(CastleRights::WHITE_QUEEN),
                    'k' => castling.with(CastleRights::BLACK_KING),
                    'q' => castling.with(CastleRights::BLACK_QUEEN),
                    _ => return Err(FenError::InvalidCastlingChar { character: c }),
                };
            }
        }

        let en_passant = match fields[3] {
            "-" => None,
            square => Some(Position::from_algebraic(square).ok_or_else(|| {
                FenError::InvalidEnPassant {
                    found: square.to_string(),
                }
            })?),
        };

        let halfmove_clock: u16 =
            fields[4]
                .parse()
                .map_err(|_| FenError::InvalidMoveCounter {
                    field: "halfmove clock",
                    found: fields[4].to_string(),
                })?;
        let fullmove_number: u16 =
            fields[5]
                .parse()
                .map_err(|_| FenError::InvalidMoveCounter {
                    field: "fullmove number",
                    found: fields[5].to_string(),
                })?;

        Ok(Board::from_raw(
            squares,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        ))
    }
}
