use anyhow::{Context, Result};
use tracing::info;

use scacco_core::Board;
use scacco_engine::Searcher;

/// Search a position from the command line: `scacco [FEN] [depth]`.
fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let board: Board = match args.first() {
        Some(fen) => fen.parse().context("invalid FEN")?,
        None => Board::starting_position(),
    };
    let depth: i32 = match args.get(1) {
        Some(depth) => depth.parse().context("depth must be a number")?,
        None => 6,
    };

    info!(depth, side = %board.side_to_move(), "scacco searching");
    println!("{board}");

    let mut searcher = Searcher::new(depth);
    let best = searcher.best_move(&board);
    println!("bestmove {best}");

    Ok(())
}
