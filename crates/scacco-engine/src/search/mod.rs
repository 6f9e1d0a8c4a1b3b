//! Iterative-deepening search with a transposition table.

pub mod heuristics;
pub mod negamax;
pub mod ordering;
pub mod see;
pub mod tt;

use std::time::Instant;

use tracing::debug;

use scacco_core::{Board, Move};

use heuristics::{CounterMoveTable, HistoryTable, KillerTable, PvTable};
use tt::TranspositionTable;

/// Hard ceiling on search depth in plies.
pub const MAX_PLY: usize = 128;

/// A bound no reachable score ever attains.
pub const INF: i32 = 1_000_000;

/// The searcher: owns the transposition table, the move-ordering heuristics,
/// and the node counter. One instance searches one position at a time.
pub struct Searcher {
    max_depth: i32,
    tt: TranspositionTable,
    killers: KillerTable,
    counters: CounterMoveTable,
    history: HistoryTable,
    pv_table: PvTable,
    pv: Vec<Move>,
    score: i32,
    nodes: u64,
}

impl Searcher {
    /// Create a searcher that deepens up to `max_depth` plies, with a 16 MB
    /// transposition table.
    pub fn new(max_depth: i32) -> Self {
        Self {
            max_depth,
            tt: TranspositionTable::new(16),
            killers: KillerTable::new(),
            counters: CounterMoveTable::new(),
            history: HistoryTable::new(),
            pv_table: PvTable::new(),
            pv: Vec::new(),
            score: 0,
            nodes: 0,
        }
    }

    /// Run iterative deepening on a snapshot of `board` and return the best
    /// move of the deepest completed iteration.
    ///
    /// Prints one progress line and one PV line per iteration. On a position
    /// with no legal moves the null move is returned; callers that need to
    /// distinguish mate from stalemate check the board themselves.
    pub fn best_move(&mut self, board: &Board) -> Move {
        let start = Instant::now();
        let mut board = *board;

        self.nodes = 0;
        self.score = 0;
        self.tt.new_search();
        self.killers = KillerTable::new();
        self.counters = CounterMoveTable::new();
        self.history = HistoryTable::new();
        self.pv_table = PvTable::new();
        self.pv.clear();

        debug!(max_depth = self.max_depth, hash = board.hash(), "search started");

        let mut best = Move::NULL;
        for depth in 1..=self.max_depth {
            let mut pv = Vec::new();
            let score = self.pv_search(&mut board, depth, -INF, INF, &mut pv, 0, Move::NULL);

            if !pv.is_empty() {
                best = pv[0];
                self.score = score;
                self.pv = pv.clone();
                self.pv_table.store(depth as usize, pv);
                println!("PV at depth {depth}: {}", self.pv_string());
            }

            let elapsed = start.elapsed().as_millis().max(1);
            let nps = self.nodes as u128 * 1000 / elapsed;
            println!(
                "Depth: {depth}, Score: {score}, Nodes: {}, Time: {elapsed} ms, NPS: {nps}",
                self.nodes
            );
        }

        debug!(nodes = self.nodes, best = %best, score = self.score, "search finished");
        best
    }

    /// The latest principal variation as space-separated coordinate moves.
    pub fn pv_string(&self) -> String {
        self.pv
            .iter()
            .map(Move::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The latest principal variation.
    pub fn pv(&self) -> &[Move] {
        &self.pv
    }

    /// Score of the deepest completed iteration, from the root side to move.
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Nodes visited by the last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }
}
