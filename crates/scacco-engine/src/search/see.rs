//! Static Exchange Evaluation (SEE).
//!
//! Estimates the material outcome of a capture sequence on one square,
//! assuming each side recaptures with its least valuable attacker and may
//! stand pat at any point. Pins are not modeled.

use scacco_core::{Board, Color, Move, PieceType, Position};

use crate::eval::piece_value;

/// Material delta of initiating the capture `mv`, from the mover's side.
///
/// Returns 0 when the destination square is empty (not a capture).
pub fn see_capture(board: &Board, mv: Move) -> i32 {
    let Some(victim) = board.piece_at(mv.to) else {
        return 0;
    };
    let Some(attacker) = board.piece_at(mv.from) else {
        return 0;
    };

    // Play the first capture on a scratch copy, then let the defenders answer.
    let mut exchange = *board;
    exchange.displace(mv.from, mv.to);

    piece_value(victim.kind) - see(&mut exchange, mv.to, attacker.color, piece_value(attacker.kind))
}

/// Best material the side answering on `square` can gain, clamped at zero.
///
/// `side` is the color that just captured; `capture_value` the value of its
/// piece now sitting on the square. Each step picks the least valuable
/// attacker of the other color (row-major scan order breaks ties), plays the
/// recapture on the scratch board, and recurses with the sides swapped.
fn see(exchange: &mut Board, square: Position, side: Color, capture_value: i32) -> i32 {
    let mut attacker: Option<(Position, PieceType)> = None;
    for pos in Position::all() {
        let Some(piece) = exchange.piece_at(pos) else {
            continue;
        };
        if piece.color == side || !exchange.piece_attacks(pos, square) {
            continue;
        }
        let better = match attacker {
            Some((_, kind)) => piece_value(piece.kind) < piece_value(kind),
            None => true,
        };
        if better {
            attacker = Some((pos, piece.kind));
        }
    }

    // No recapture available: the exchange ends here.
    let Some((pos, kind)) = attacker else {
        return 0;
    };

    exchange.displace(pos, square);
    let score = capture_value - see(exchange, square, !side, piece_value(kind));

    // Standing pat is always an option.
    score.max(0)
}
