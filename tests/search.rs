use std::time::Duration;

use salmon_search::search::INFINITY;
use salmon_search::transposition::MATE;
use salmon_search::{Position, Search, SearchConfig};

fn without_caches(depth: u32) -> SearchConfig {
    SearchConfig {
        max_depth: depth,
        use_quiescence: false,
        use_transposition: false,
        ..SearchConfig::default()
    }
}

#[test]
fn pruning_never_changes_the_value() {
    let fens = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    ];
    for fen in fens {
        for depth in 1..=3 {
            let mut position = Position::from_fen(fen).unwrap();
            let pruned = Search::with_config(without_caches(depth)).alpha_beta(&mut position, depth);
            let full = Search::with_config(without_caches(depth)).minimax(&mut position, depth);
            assert_eq!(pruned, full, "{fen} depth {depth}");
            assert!(pruned.abs() < INFINITY);
        }
    }
}

#[test]
fn finds_scholars_mate() {
    let mut position =
        Position::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4")
            .unwrap();
    let mut search = Search::with_config(SearchConfig {
        max_depth: 3,
        max_time: Duration::from_secs(60),
        ..SearchConfig::default()
    });
    let result = search.select_move(&mut position).unwrap();
    assert_eq!(result.best_move.long_algebraic(), "h5f7");
    assert_eq!(result.score, MATE - 1);
}

#[test]
fn prefers_mate_in_one_over_material() {
    // Taking the knight on b1 wins material; Rd8 mates.
    let mut position = Position::from_fen("6k1/5ppp/8/8/8/8/q4PPP/1n1R2K1 w - - 0 1").unwrap();
    let mut search = Search::with_config(SearchConfig {
        max_depth: 2,
        ..SearchConfig::default()
    });
    let result = search.select_move(&mut position).unwrap();
    assert_eq!(result.best_move.long_algebraic(), "d1d8");
}

#[test]
fn session_clear_resets_state() {
    let mut position = Position::new();
    let mut search = Search::with_config(SearchConfig {
        max_depth: 2,
        ..SearchConfig::default()
    });
    let first = search.select_move(&mut position).unwrap();
    search.clear();
    let second = search.select_move(&mut position).unwrap();
    assert_eq!(first.best_move, second.best_move);
    assert_eq!(first.score, second.score);
}
