//! Perft node counting for move-generation verification.

use crate::board::Board;
use crate::movegen::generate_legal_moves;

/// Count leaf nodes at the given depth.
///
/// Depth 0 is 1 (the position itself); depth 1 is bulk-counted from the move
/// list without recursing.
pub fn perft(board: &Board, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_legal_moves(board);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut probe = *board;
    let mut nodes = 0u64;
    for mv in moves {
        if let Some(undo) = probe.make_move(mv) {
            nodes += perft(&probe, depth - 1);
            probe.unmake_move(mv, undo);
        }
    }
    nodes
}

/// Perft with a per-move breakdown, sorted by coordinate notation.
pub fn divide(board: &Board, depth: usize) -> Vec<(String, u64)> {
    let mut probe = *board;
    let mut results: Vec<(String, u64)> = Vec::new();
    for mv in generate_legal_moves(board) {
        if let Some(undo) = probe.make_move(mv) {
            let count = if depth <= 1 { 1 } else { perft(&probe, depth - 1) };
            probe.unmake_move(mv, undo);
            results.push((mv.to_string(), count));
        }
    }
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perft_startpos_shallow() {
        let board = Board::starting_position();
        assert_eq!(perft(&board, 1), 20);
        assert_eq!(perft(&board, 2), 400);
        assert_eq!(perft(&board, 3), 8_902);
    }

    #[test]
    #[ignore] // slow
    fn perft_startpos_depth_4() {
        let board = Board::starting_position();
        assert_eq!(perft(&board, 4), 197_281);
    }

    #[test]
    fn perft_kiwipete_shallow() {
        // Position 2 from the chessprogramming wiki.
        let board: Board =
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
                .parse()
                .unwrap();
        assert_eq!(perft(&board, 1), 48);
        assert_eq!(perft(&board, 2), 2_039);
    }

    #[test]
    fn perft_en_passant_position() {
        // Position 3 from the chessprogramming wiki.
        let board: Board = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1".parse().unwrap();
        assert_eq!(perft(&board, 1), 14);
        assert_eq!(perft(&board, 2), 191);
        assert_eq!(perft(&board, 3), 2_812);
    }

    #[test]
    fn divide_sums_to_perft() {
        let board = Board::starting_position();
        let breakdown = divide(&board, 3);
        let total: u64 = breakdown.iter().map(|(_, n)| n).sum();
        assert_eq!(total, perft(&board, 3));
        assert_eq!(breakdown.len(), 20);
    }
}
