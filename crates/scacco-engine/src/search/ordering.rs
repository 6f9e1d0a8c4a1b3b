//! Move ordering.
//!
//! Every legal move gets a score and the list is searched in descending
//! order. The tiers, top to bottom:
//!
//! - hash move:                     10,000,000
//! - previous-iteration PV move:     9,000,000 + 1,000 per iteration depth
//! - good captures (SEE >= 0):       4,000,000 + SEE
//! - bad captures (SEE < 0):         3,000,000 + MVV-LVA
//! - counter-move:                   2,500,000
//! - killer moves:                   2,000,100 / 2,000,000
//! - quiet moves:                    history score

use scacco_core::{Board, Move, PieceType};

use crate::search::heuristics::{CounterMoveTable, HistoryTable, KillerTable, PvTable};
use crate::search::see::see_capture;

/// MVV-LVA scores indexed by `[attacker][victim]`, both in
/// pawn/knight/bishop/rook/queen/king order: capturing a more valuable
/// victim with a less valuable attacker scores higher.
#[rustfmt::skip]
const MVV_LVA: [[i32; 6]; 6] = [
    [105, 205, 305, 405, 505, 605], // pawn attacker
    [104, 204, 304, 404, 504, 604], // knight
    [103, 203, 303, 403, 503, 603], // bishop
    [102, 202, 302, 402, 502, 602], // rook
    [101, 201, 301, 401, 501, 601], // queen
    [100, 200, 300, 400, 500, 600], // king
];

/// MVV-LVA score for an attacker/victim pair.
#[inline]
pub fn mvv_lva(attacker: PieceType, victim: PieceType) -> i32 {
    MVV_LVA[attacker.index()][victim.index()]
}

/// Ordering score of one legal move at the given ply.
#[allow(clippy::too_many_arguments)]
pub fn score_move(
    board: &Board,
    mv: Move,
    tt_move: Move,
    pv_table: &PvTable,
    killers: &KillerTable,
    counters: &CounterMoveTable,
    history: &HistoryTable,
    ply: usize,
    last_move: Move,
) -> i32 {
    if !tt_move.is_null() && mv == tt_move {
        return 10_000_000;
    }

    if let Some(depth) = pv_table.deepest_with(mv, ply) {
        return 9_000_000 + depth as i32 * 1_000;
    }

    if let Some(victim) = board.piece_at(mv.to) {
        let see = see_capture(board, mv);
        if see >= 0 {
            return 4_000_000 + see;
        }
        let attacker = board
            .piece_at(mv.from)
            .map(|p| p.kind)
            .unwrap_or(PieceType::Pawn);
        return 3_000_000 + mvv_lva(attacker, victim.kind);
    }

    if counters.lookup(board, last_move) == Some(mv) {
        return 2_500_000;
    }

    match killers.slot_of(ply, mv) {
        Some(0) => return 2_000_100,
        Some(_) => return 2_000_000,
        None => {}
    }

    history.score(board.side_to_move(), mv)
}
