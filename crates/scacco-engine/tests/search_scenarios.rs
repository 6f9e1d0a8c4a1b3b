//! Whole-search scenarios exercising the driver, the table-driven move
//! ordering, and the mate-score plumbing together.

use scacco_core::{Board, Move, generate_legal_moves};
use scacco_engine::{MATE_SCORE, Searcher, evaluate};

#[test]
fn startpos_depth_1_sanity() {
    let board = Board::starting_position();
    let mut searcher = Searcher::new(1);
    let best = searcher.best_move(&board);

    assert!(generate_legal_moves(&board).contains(&best));
    assert!(searcher.nodes() > 20, "searched {} nodes", searcher.nodes());
    assert!(
        searcher.score().abs() <= 50,
        "startpos score {} strays from equality",
        searcher.score()
    );
}

#[test]
fn back_rank_mate_in_one() {
    let board: Board = "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1".parse().unwrap();
    let mut searcher = Searcher::new(2);
    let best = searcher.best_move(&board);

    assert_eq!(best, Move::from_coords("a1a8").unwrap());
    assert_eq!(searcher.score(), MATE_SCORE - 1);

    let mut played = board;
    played.make_move(best).unwrap();
    assert!(played.is_checkmate());
}

#[test]
fn rook_ladder_mate_in_two() {
    let board: Board = "3k4/8/6R1/8/8/8/8/7R w - - 0 1".parse().unwrap();
    let mut searcher = Searcher::new(5);
    let best = searcher.best_move(&board);
    assert_eq!(searcher.score(), MATE_SCORE - 3);

    let mut played = board;
    for mv in searcher.pv().to_vec() {
        played.make_move(mv).unwrap();
    }
    assert!(played.is_checkmate(), "PV starting {best} does not mate");
}

#[test]
fn stalemated_defender_evaluates_to_zero() {
    let board: Board = "7k/8/6Q1/8/8/8/8/7K b - - 0 1".parse().unwrap();
    assert!(generate_legal_moves(&board).is_empty());
    assert_eq!(evaluate(&board), 0);
}

#[test]
fn search_leaves_the_board_untouched() {
    let board: Board = "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4"
        .parse()
        .unwrap();
    let snapshot = board;
    Searcher::new(3).best_move(&board);
    assert_eq!(board, snapshot);
}

#[test]
fn scholars_mate_is_delivered() {
    // White mates with Qxf7: the f7 pawn is defended only by the king, and
    // the c4 bishop covers the queen.
    let board: Board = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4"
        .parse()
        .unwrap();
    let mut searcher = Searcher::new(2);
    let best = searcher.best_move(&board);
    assert_eq!(best, Move::from_coords("h5f7").unwrap());
    assert_eq!(searcher.score(), MATE_SCORE - 1);
}

#[test]
fn pv_string_lists_space_separated_moves() {
    let board = Board::starting_position();
    let mut searcher = Searcher::new(2);
    searcher.best_move(&board);

    let pv_string = searcher.pv_string();
    let words: Vec<&str> = pv_string.split_whitespace().collect();
    assert_eq!(words.len(), searcher.pv().len());
    assert!(words.iter().all(|w| Move::from_coords(w).is_some()));
}
