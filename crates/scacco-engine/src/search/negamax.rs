//! Principal-variation negamax and quiescence search.
//!
//! One search path serves both sides: every recursive call negates the
//! window and the returned score, so a score is always from the perspective
//! of the side to move. Mate is `-(MATE_SCORE - ply)` for the side being
//! mated, which makes shallower mates score higher for the winner.

use scacco_core::{Board, Color, Move, PieceType, generate_legal_moves};

use crate::eval::{MATE_SCORE, PAWN_VALUE, QUEEN_VALUE, evaluate, piece_value};
use crate::search::ordering::{mvv_lva, score_move};
use crate::search::see::see_capture;
use crate::search::tt::Bound;
use crate::search::{INF, MAX_PLY, Searcher};

/// Safety margin added to the victim's value in delta pruning.
const DELTA_MARGIN: i32 = 200;

impl Searcher {
    /// Search a node. Fills `pv` with the best line found below it.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn pv_search(
        &mut self,
        board: &mut Board,
        depth: i32,
        mut alpha: i32,
        beta: i32,
        pv: &mut Vec<Move>,
        ply: usize,
        last_move: Move,
    ) -> i32 {
        self.nodes += 1;
        pv.clear();
        let original_alpha = alpha;

        // The root is never answered from the table: the driver must always
        // receive a freshly computed move.
        let mut tt_move = Move::NULL;
        if ply > 0 {
            let probe = self.tt.probe(board.hash(), depth, alpha, beta, ply);
            tt_move = probe.best_move;
            if let Some(score) = probe.score {
                return score;
            }
        }

        if ply >= MAX_PLY - 1 {
            return evaluate(board);
        }

        if depth <= 0 {
            return self.quiescence(board, alpha, beta, ply, 0);
        }

        let legal = generate_legal_moves(board);
        if legal.is_empty() {
            return if board.is_in_check() {
                -(MATE_SCORE - ply as i32)
            } else {
                0
            };
        }

        let mut extension = 0;
        if board.is_in_check() {
            extension = 1;
        }
        if legal.len() == 1 && depth >= 2 {
            extension = extension.max(1);
        }

        let scored = self.order_moves(board, legal, depth, tt_move, ply, last_move);

        let mut best_score = -INF;
        let mut best_move = scored[0].1;
        let mut bound = Bound::Upper;
        let mut found_pv = false;
        let mut child_pv = Vec::new();

        for (index, &(_, mv)) in scored.iter().enumerate() {
            let move_extension = extension.max(self.move_extension(board, mv, last_move));

            // Reductions only apply once a PV move is established for this
            // node, i.e. on the null-window probes of the later moves.
            let mut reduction = 0;
            if found_pv && index >= 1 {
                reduction = self.reduction(board, mv, index, ply);
            }

            let Some(undo) = board.make_move(mv) else {
                continue;
            };

            child_pv.clear();
            let score = if found_pv {
                // Null-window probe at the (possibly reduced) depth; a score
                // inside the window forces a full re-search without the
                // reduction.
                let reduced = (depth - 1 + move_extension - reduction).max(0);
                let mut score =
                    -self.pv_search(board, reduced, -alpha - 1, -alpha, &mut child_pv, ply + 1, mv);
                if score > alpha && score < beta {
                    child_pv.clear();
                    score = -self.pv_search(
                        board,
                        depth - 1 + move_extension,
                        -beta,
                        -alpha,
                        &mut child_pv,
                        ply + 1,
                        mv,
                    );
                }
                score
            } else {
                -self.pv_search(
                    board,
                    (depth - 1 + move_extension).max(0),
                    -beta,
                    -alpha,
                    &mut child_pv,
                    ply + 1,
                    mv,
                )
            };

            board.unmake_move(mv, undo);

            if score > best_score {
                best_score = score;
                best_move = mv;
                pv.clear();
                pv.push(mv);
                pv.extend_from_slice(&child_pv);
                found_pv = true;
            }

            alpha = alpha.max(score);
            if alpha >= beta {
                if board.piece_at(mv.to).is_none() {
                    self.killers.store(ply, mv);
                    self.history.update(board.side_to_move(), mv, depth);
                    self.counters.store(board, last_move, mv);
                }
                bound = Bound::Lower;
                break;
            }
        }

        if best_score > original_alpha && best_score < beta {
            bound = Bound::Exact;
        }
        self.tt
            .store(board.hash(), depth, best_score, bound, best_move, ply);

        best_score
    }

    /// Score and sort the move list, dropping clearly losing captures at
    /// depth 3 and beyond.
    fn order_moves(
        &self,
        board: &Board,
        legal: Vec<Move>,
        depth: i32,
        tt_move: Move,
        ply: usize,
        last_move: Move,
    ) -> Vec<(i32, Move)> {
        let mut scored: Vec<(i32, Move)> = Vec::with_capacity(legal.len());
        for &mv in &legal {
            if depth >= 3
                && board.piece_at(mv.to).is_some()
                && see_capture(board, mv) < -2 * PAWN_VALUE
            {
                continue;
            }
            let score = score_move(
                board,
                mv,
                tt_move,
                &self.pv_table,
                &self.killers,
                &self.counters,
                &self.history,
                ply,
                last_move,
            );
            scored.push((score, mv));
        }

        // A node must search something even if every move was a hopeless
        // capture.
        if scored.is_empty() {
            for mv in legal {
                scored.push((0, mv));
            }
        }

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
    }

    /// Per-move depth extension: recaptures on the previous move's square
    /// and pawn pushes to the seventh rank each earn one ply.
    fn move_extension(&self, board: &Board, mv: Move, last_move: Move) -> i32 {
        if !last_move.is_null() && mv.to == last_move.to {
            return 1;
        }
        if board.piece_at(mv.from).map(|p| p.kind) == Some(PieceType::Pawn) {
            let seventh = match board.side_to_move() {
                Color::White => 6,
                Color::Black => 1,
            };
            if mv.to.row == seventh {
                return 1;
            }
        }
        0
    }

    /// Late-move reduction schedule. Moves on the previous iteration's PV
    /// are never reduced; losing captures lose one ply; later quiet moves
    /// lose up to two.
    fn reduction(&self, board: &Board, mv: Move, index: usize, ply: usize) -> i32 {
        if self.pv_table.latest().get(ply) == Some(&mv) {
            return 0;
        }
        if board.piece_at(mv.to).is_some() && see_capture(board, mv) < 0 {
            return 1;
        }
        match index {
            0..=2 => 0,
            3..=5 => 1,
            _ => 2,
        }
    }

    /// Quiescence search: explore captures (and every move while in check)
    /// until the position is quiet enough for the static evaluation to hold.
    pub(crate) fn quiescence(
        &mut self,
        board: &mut Board,
        mut alpha: i32,
        beta: i32,
        ply: usize,
        qdepth: i32,
    ) -> i32 {
        self.nodes += 1;

        if ply >= MAX_PLY - 1 {
            return evaluate(board);
        }

        let in_check = board.is_in_check();
        let legal = generate_legal_moves(board);
        if legal.is_empty() {
            return if in_check {
                -(MATE_SCORE - ply as i32)
            } else {
                0
            };
        }

        let stand_pat = evaluate(board);
        if stand_pat >= beta {
            return beta;
        }
        alpha = alpha.max(stand_pat);

        let mut scored: Vec<(i32, Move)> = Vec::new();
        for mv in legal {
            let is_en_passant = board.piece_at(mv.from).map(|p| p.kind)
                == Some(PieceType::Pawn)
                && board.en_passant() == Some(mv.to);
            let victim = board.piece_at(mv.to);

            if victim.is_none() && !is_en_passant {
                // Quiet moves only count as check evasions.
                if in_check {
                    scored.push((0, mv));
                }
                continue;
            }

            let victim_value = victim.map(|p| piece_value(p.kind)).unwrap_or(PAWN_VALUE);

            // Delta pruning: skip a capture whose best conceivable gain
            // cannot lift alpha.
            if !in_check && qdepth > 0 {
                let mover = board.piece_at(mv.from).map(|p| p.kind);
                let promotion_bonus = if mover == Some(PieceType::Pawn)
                    && (mv.to.row == 0 || mv.to.row == 7)
                {
                    QUEEN_VALUE - PAWN_VALUE
                } else {
                    0
                };
                if stand_pat + victim_value + promotion_bonus + DELTA_MARGIN <= alpha {
                    continue;
                }
            }

            let attacker = board
                .piece_at(mv.from)
                .map(|p| p.kind)
                .unwrap_or(PieceType::Pawn);
            let victim_kind = victim.map(|p| p.kind).unwrap_or(PieceType::Pawn);
            let mut score = mvv_lva(attacker, victim_kind);

            if victim.is_some() {
                let see = see_capture(board, mv);
                if see < 0 {
                    // Deep in the capture tree, losing captures are noise.
                    if !in_check && qdepth > 2 {
                        continue;
                    }
                    score += see;
                }
            }

            scored.push((score, mv));
        }

        scored.sort_by(|a, b| b.0.cmp(&a.0));

        for &(_, mv) in &scored {
            let Some(undo) = board.make_move(mv) else {
                continue;
            };
            let score = -self.quiescence(board, -beta, -alpha, ply + 1, qdepth + 1);
            board.unmake_move(mv, undo);

            if score >= beta {
                return beta;
            }
            alpha = alpha.max(score);
        }

        alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiescence_stands_pat_on_quiet_positions() {
        let mut board = Board::starting_position();
        let mut searcher = Searcher::new(1);
        let score = searcher.quiescence(&mut board, -INF, INF, 0, 0);
        assert_eq!(score, evaluate(&board));
    }

    #[test]
    fn quiescence_resolves_a_hanging_queen() {
        // White to move wins the undefended d5 queen; the static eval alone
        // would miss it.
        let mut board: Board = "4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1".parse().unwrap();
        let mut searcher = Searcher::new(1);
        let score = searcher.quiescence(&mut board, -INF, INF, 0, 0);
        assert!(score > evaluate(&board) + QUEEN_VALUE / 2);
    }

    #[test]
    fn quiescence_detects_mate() {
        let mut board: Board = "7k/6Q1/5K2/8/8/8/8/8 b - - 0 1".parse().unwrap();
        let mut searcher = Searcher::new(1);
        let score = searcher.quiescence(&mut board, -INF, INF, 5, 0);
        assert_eq!(score, -(MATE_SCORE - 5));
    }

    #[test]
    fn pv_search_balances_make_and_unmake() {
        let mut board: Board = "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4"
            .parse()
            .unwrap();
        let snapshot = board;
        let mut searcher = Searcher::new(3);
        let mut pv = Vec::new();
        searcher.pv_search(&mut board, 3, -INF, INF, &mut pv, 0, Move::NULL);
        assert_eq!(board, snapshot);
    }

    #[test]
    fn deeper_mate_scores_below_shallower_mate() {
        assert!(MATE_SCORE - 1 > MATE_SCORE - 3);
    }

    #[test]
    fn stalemate_search_scores_zero() {
        let mut board: Board = "7k/8/6Q1/8/8/8/8/7K b - - 0 1".parse().unwrap();
        let mut searcher = Searcher::new(2);
        let mut pv = Vec::new();
        let score = searcher.pv_search(&mut board, 2, -INF, INF, &mut pv, 0, Move::NULL);
        assert_eq!(score, 0);
        assert!(pv.is_empty());
    }
}
