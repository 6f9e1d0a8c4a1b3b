//! Core chess types: mailbox board representation, move generation, and
//! make/unmake with incremental Zobrist hashing.

mod board;
mod castle_rights;
mod chess_move;
mod color;
mod error;
mod fen;
mod movegen;
mod perft;
mod piece;
mod position;
mod zobrist;

pub use board::{Board, Undo};
pub use castle_rights::CastleRights;
pub use chess_move::Move;
pub use color::Color;
pub use error::FenError;
pub use fen::STARTING_FEN;
pub use movegen::generate_legal_moves;
pub use perft::{divide, perft};
pub use piece::{Piece, PieceType};
pub use position::Position;
