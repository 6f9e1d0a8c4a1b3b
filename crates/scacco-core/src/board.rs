//! The chess board: mailbox piece placement, game state, and make/unmake.

use std::fmt;

use crate::castle_rights::CastleRights;
use crate::chess_move::Move;
use crate::color::Color;
use crate::movegen::generate_legal_moves;
use crate::piece::{Piece, PieceType};
use crate::position::Position;
use crate::zobrist;

/// Castling rights revoked when a square is the source or destination of a
/// move: the king squares drop both wings, the rook squares their own wing.
const RIGHTS_REVOKED: [CastleRights; 64] = {
    let mut table = [CastleRights::NONE; 64];
    table[4] = CastleRights::WHITE_BOTH; // e1
    table[0] = CastleRights::WHITE_QUEEN; // a1
    table[7] = CastleRights::WHITE_KING; // h1
    table[60] = CastleRights::BLACK_BOTH; // e8
    table[56] = CastleRights::BLACK_QUEEN; // a8
    table[63] = CastleRights::BLACK_KING; // h8
    table
};

/// Complete position state.
///
/// The board is a value: `Copy` and comparable with `==`, so make/unmake
/// balance can be asserted directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    side_to_move: Color,
    castling: CastleRights,
    en_passant: Option<Position>,
    halfmove_clock: u16,
    fullmove_number: u16,
    hash: u64,
}

/// Undo token produced by [`Board::make_move`] and consumed by
/// [`Board::unmake_move`]. Snapshots the state a move destroys.
#[derive(Debug, Clone, Copy)]
pub struct Undo {
    captured: Option<Piece>,
    castling: CastleRights,
    en_passant: Option<Position>,
    halfmove_clock: u16,
    hash: u64,
    promoted: bool,
    en_passant_capture: bool,
    castled: bool,
}

impl Board {
    /// Return the standard starting position.
    pub fn starting_position() -> Board {
        const BACK_RANK: [PieceType; 8] = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        let mut squares = [None; 64];
        for col in 0..8 {
            squares[Position::new(0, col).index()] = Some(Piece::new(BACK_RANK[col as usize], Color::White));
            squares[Position::new(1, col).index()] = Some(Piece::new(PieceType::Pawn, Color::White));
            squares[Position::new(6, col).index()] = Some(Piece::new(PieceType::Pawn, Color::Black));
            squares[Position::new(7, col).index()] = Some(Piece::new(BACK_RANK[col as usize], Color::Black));
        }

        let mut board = Board {
            squares,
            side_to_move: Color::White,
            castling: CastleRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
        };
        board.hash = zobrist::hash_from_scratch(&board);
        board
    }

    /// Construct a board from raw components. Used by FEN parsing.
    pub(crate) fn from_raw(
        squares: [Option<Piece>; 64],
        side_to_move: Color,
        castling: CastleRights,
        en_passant: Option<Position>,
        halfmove_clock: u16,
        fullmove_number: u16,
    ) -> Board {
        let mut board = Board {
            squares,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            hash: 0,
        };
        board.hash = zobrist::hash_from_scratch(&board);
        board
    }

    /// Return the piece on the given square, or `None` if the square is
    /// empty or the position is off the board.
    #[inline]
    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        if !pos.is_valid() {
            return None;
        }
        self.squares[pos.index()]
    }

    /// Return the side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Return the current castling rights.
    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    /// Return the en-passant target square, if the last move was a double
    /// pawn push.
    #[inline]
    pub fn en_passant(&self) -> Option<Position> {
        self.en_passant
    }

    /// Return the halfmove clock (plies since the last capture or pawn move).
    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// Return the fullmove number.
    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Return the Zobrist hash of the position, maintained incrementally.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Return the square of the given side's king.
    ///
    /// # Panics
    ///
    /// Panics if the board has no king of that color (corrupt state).
    pub fn king_position(&self, color: Color) -> Position {
        Position::all()
            .find(|&pos| {
                self.squares[pos.index()]
                    == Some(Piece::new(PieceType::King, color))
            })
            .expect("board must have a king for each side")
    }

    /// Return `true` if the side to move is in check.
    pub fn is_in_check(&self) -> bool {
        let king = self.king_position(self.side_to_move);
        self.is_attacked(king, !self.side_to_move)
    }

    /// Return `true` if the side to move is checkmated.
    pub fn is_checkmate(&self) -> bool {
        self.is_in_check() && generate_legal_moves(self).is_empty()
    }

    /// Return `true` if the side to move is stalemated.
    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check() && generate_legal_moves(self).is_empty()
    }

    /// Remove the piece on a square, XORing it out of the hash.
    fn lift(&mut self, pos: Position) -> Option<Piece> {
        let piece = self.squares[pos.index()].take();
        if let Some(piece) = piece {
            self.hash ^= zobrist::PIECE_SQUARE[piece.index()][pos.index()];
        }
        piece
    }

    /// Place a piece on an empty square, XORing it into the hash.
    fn put(&mut self, pos: Position, piece: Piece) {
        debug_assert!(self.squares[pos.index()].is_none());
        self.squares[pos.index()] = Some(piece);
        self.hash ^= zobrist::PIECE_SQUARE[piece.index()][pos.index()];
    }

    /// Teleport the piece on `from` onto `to`, discarding any occupant.
    ///
    /// Skips legality, clocks, and hash upkeep. Exchange-evaluation primitive
    /// for scratch copies — never call this on live game state.
    pub fn displace(&mut self, from: Position, to: Position) {
        self.squares[to.index()] = self.squares[from.index()].take();
    }

    /// Apply a move. Returns the undo token, or `None` — with the board
    /// unchanged — when the move would leave the mover's own king in check.
    ///
    /// Promotions auto-queen when a pawn reaches the last row. A king moving
    /// two files castles (the rook is moved as well). A pawn moving
    /// diagonally onto the en-passant target captures en passant.
    pub fn make_move(&mut self, mv: Move) -> Option<Undo> {
        if mv.is_null() {
            return None;
        }
        let piece = self.squares[mv.from.index()]?;
        if piece.color != self.side_to_move {
            return None;
        }
        if let Some(target) = self.squares[mv.to.index()] {
            if target.color == piece.color {
                return None;
            }
        }

        let us = self.side_to_move;
        let mut undo = Undo {
            captured: None,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
            promoted: false,
            en_passant_capture: false,
            castled: false,
        };

        let is_en_passant = piece.kind == PieceType::Pawn
            && self.en_passant == Some(mv.to)
            && mv.from.col != mv.to.col;
        let is_castle =
            piece.kind == PieceType::King && (mv.to.col - mv.from.col).abs() == 2;

        // Retire the old en-passant file and castling configuration from the
        // hash before they change.
        if let Some(ep) = self.en_passant {
            self.hash ^= zobrist::EN_PASSANT_FILE[ep.col as usize];
        }
        self.hash ^= zobrist::CASTLING[self.castling.bits() as usize];
        self.en_passant = None;

        if is_en_passant {
            let captured_square = Position::new(mv.from.row, mv.to.col);
            undo.captured = self.lift(captured_square);
            undo.en_passant_capture = true;
        } else if self.squares[mv.to.index()].is_some() {
            undo.captured = self.lift(mv.to);
        }

        self.lift(mv.from);
        let placed = if piece.kind == PieceType::Pawn && (mv.to.row == 7 || mv.to.row == 0) {
            undo.promoted = true;
            Piece::new(PieceType::Queen, us)
        } else {
            piece
        };
        self.put(mv.to, placed);

        if is_castle {
            undo.castled = true;
            let (rook_from, rook_to) = Self::castle_rook_squares(mv);
            if let Some(rook) = self.lift(rook_from) {
                self.put(rook_to, rook);
            }
        }

        if piece.kind == PieceType::Pawn && (mv.to.row - mv.from.row).abs() == 2 {
            let ep = Position::new((mv.from.row + mv.to.row) / 2, mv.from.col);
            self.en_passant = Some(ep);
            self.hash ^= zobrist::EN_PASSANT_FILE[ep.col as usize];
        }

        self.castling = self
            .castling
            .without(RIGHTS_REVOKED[mv.from.index()])
            .without(RIGHTS_REVOKED[mv.to.index()]);
        self.hash ^= zobrist::CASTLING[self.castling.bits() as usize];

        if piece.kind == PieceType::Pawn || undo.captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }

        self.side_to_move = !us;
        self.hash ^= zobrist::SIDE_TO_MOVE;

        if self.is_attacked(self.king_position(us), self.side_to_move) {
            self.unmake_move(mv, undo);
            return None;
        }
        Some(undo)
    }

    /// Revert a move made by [`Board::make_move`].
    ///
    /// Must be called with the same move and the token that make returned;
    /// restores the board bit for bit, hash included.
    pub fn unmake_move(&mut self, mv: Move, undo: Undo) {
        let us = !self.side_to_move;

        let placed = self.squares[mv.to.index()].take();
        self.squares[mv.from.index()] = if undo.promoted {
            Some(Piece::new(PieceType::Pawn, us))
        } else {
            placed
        };

        if undo.en_passant_capture {
            let captured_square = Position::new(mv.from.row, mv.to.col);
            self.squares[captured_square.index()] = undo.captured;
        } else if undo.captured.is_some() {
            self.squares[mv.to.index()] = undo.captured;
        }

        if undo.castled {
            let (rook_from, rook_to) = Self::castle_rook_squares(mv);
            self.squares[rook_from.index()] = self.squares[rook_to.index()].take();
        }

        self.side_to_move = us;
        if us == Color::Black {
            self.fullmove_number -= 1;
        }
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.hash = undo.hash;
    }

    /// Rook source and destination for a castling king move.
    fn castle_rook_squares(mv: Move) -> (Position, Position) {
        if mv.to.col > mv.from.col {
            (Position::new(mv.from.row, 7), Position::new(mv.from.row, 5))
        } else {
            (Position::new(mv.from.row, 0), Position::new(mv.from.row, 3))
        }
    }
}

impl fmt::Display for Board {
    /// Render the board as text, rank 8 at the top.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..8).rev() {
            write!(f, "{} ", row + 1)?;
            for col in 0..8 {
                match self.squares[Position::new(row, col).index()] {
                    Some(piece) => write!(f, "{piece} ")?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zobrist::hash_from_scratch;

    fn mv(s: &str) -> Move {
        Move::from_coords(s).unwrap()
    }

    #[test]
    fn make_unmake_restores_the_board() {
        let mut board = Board::starting_position();
        let snapshot = board;
        for coords in ["e2e4", "g1f3", "b1c3"] {
            let m = mv(coords);
            let undo = board.make_move(m).unwrap();
            assert_ne!(board, snapshot);
            board.unmake_move(m, undo);
            assert_eq!(board, snapshot);
        }
    }

    #[test]
    fn make_keeps_hash_incremental() {
        let mut board = Board::starting_position();
        let line = ["e2e4", "c7c5", "g1f3", "d7d6", "d2d4", "c5d4"];
        let mut undos = Vec::new();
        for coords in line {
            let m = mv(coords);
            undos.push(board.make_move(m).unwrap());
            assert_eq!(board.hash(), hash_from_scratch(&board));
        }
        for coords in line.iter().rev() {
            let m = mv(coords);
            board.unmake_move(m, undos.pop().unwrap());
            assert_eq!(board.hash(), hash_from_scratch(&board));
        }
        assert_eq!(board, Board::starting_position());
    }

    #[test]
    fn capture_is_restored_on_unmake() {
        let mut board: Board = "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1".parse().unwrap();
        let snapshot = board;
        let m = mv("e4d5");
        let undo = board.make_move(m).unwrap();
        assert_eq!(
            board.piece_at(Position::from_algebraic("d5").unwrap()),
            Some(Piece::new(PieceType::Pawn, Color::White))
        );
        board.unmake_move(m, undo);
        assert_eq!(board, snapshot);
    }

    #[test]
    fn en_passant_capture_removes_the_passed_pawn() {
        let mut board: Board = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2".parse().unwrap();
        let snapshot = board;
        let m = mv("e5d6");
        let undo = board.make_move(m).unwrap();
        assert_eq!(board.piece_at(Position::from_algebraic("d5").unwrap()), None);
        assert_eq!(
            board.piece_at(Position::from_algebraic("d6").unwrap()),
            Some(Piece::new(PieceType::Pawn, Color::White))
        );
        board.unmake_move(m, undo);
        assert_eq!(board, snapshot);
    }

    #[test]
    fn castling_moves_the_rook_and_back() {
        let mut board: Board = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        let snapshot = board;
        let m = mv("e1g1");
        let undo = board.make_move(m).unwrap();
        assert_eq!(
            board.piece_at(Position::from_algebraic("f1").unwrap()),
            Some(Piece::new(PieceType::Rook, Color::White))
        );
        assert_eq!(board.piece_at(Position::from_algebraic("h1").unwrap()), None);
        assert!(!board.castling().contains(CastleRights::WHITE_KING));
        board.unmake_move(m, undo);
        assert_eq!(board, snapshot);
    }

    #[test]
    fn promotion_auto_queens_and_unmakes() {
        let mut board: Board = "8/4P3/8/8/8/k7/8/4K3 w - - 0 1".parse().unwrap();
        let snapshot = board;
        let m = mv("e7e8");
        let undo = board.make_move(m).unwrap();
        assert_eq!(
            board.piece_at(Position::from_algebraic("e8").unwrap()),
            Some(Piece::new(PieceType::Queen, Color::White))
        );
        board.unmake_move(m, undo);
        assert_eq!(board, snapshot);
    }

    #[test]
    fn illegal_move_leaves_board_unchanged() {
        // The e-file rook pins nothing, but the white king is in check from
        // the black rook; a quiet knight move must be rejected.
        let mut board: Board = "4k3/8/8/8/4r3/8/8/N3K3 w - - 0 1".parse().unwrap();
        let snapshot = board;
        assert!(board.make_move(mv("a1b3")).is_none());
        assert_eq!(board, snapshot);
    }

    #[test]
    fn moving_the_wrong_color_is_rejected() {
        let mut board = Board::starting_position();
        assert!(board.make_move(mv("e7e5")).is_none());
    }

    #[test]
    fn rook_capture_revokes_castling_rights() {
        let mut board: Board = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        let m = mv("a1a8");
        board.make_move(m).unwrap();
        assert!(!board.castling().contains(CastleRights::BLACK_QUEEN));
        assert!(!board.castling().contains(CastleRights::WHITE_QUEEN));
    }

    #[test]
    fn checkmate_and_stalemate_predicates() {
        let mated: Board = "7k/6Q1/5K2/8/8/8/8/8 b - - 0 1".parse().unwrap();
        assert!(mated.is_checkmate());
        assert!(!mated.is_stalemate());

        let stalemated: Board = "7k/8/6Q1/8/8/8/8/7K b - - 0 1".parse().unwrap();
        assert!(stalemated.is_stalemate());
        assert!(!stalemated.is_checkmate());

        assert!(!Board::starting_position().is_checkmate());
        assert!(!Board::starting_position().is_stalemate());
    }
}
