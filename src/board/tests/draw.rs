//! Draw detection tests.

use crate::board::Board;
use crate::tree::{GameTree, NodeId, TerminalReason};

fn play_line(tree: &mut GameTree, moves: &[&str]) -> NodeId {
    let mut id = tree.root();
    for uci in moves {
        id = tree.play(id, uci).expect("uci move not legal");
    }
    id
}

#[test]
fn test_fen_halfmove_parsing() {
    let board = Board::from_fen("8/8/8/8/8/8/8/K1k5 w - - 57 1").unwrap();
    assert_eq!(board.halfmove(), 57);
}

#[test]
fn test_fifty_move_rule_draw() {
    let board = Board::from_fen("4k3/8/8/8/8/8/4P3/K7 w - - 99 60").unwrap();
    let mut tree = GameTree::with_board(board);
    let root = tree.root();
    assert_eq!(tree.terminal_reason(root), None);

    let king_move = tree.play(root, "a1a2").unwrap();
    assert_eq!(tree.board(king_move).unwrap().halfmove(), 100);
    assert_eq!(
        tree.terminal_reason(king_move),
        Some(TerminalReason::FiftyMoveRule)
    );
}

#[test]
fn test_halfmove_resets_on_pawn_move() {
    let board = Board::from_fen("4k3/8/8/8/8/8/4P3/K7 w - - 99 60").unwrap();
    let after = board.play_uci("e2e4").unwrap();
    assert_eq!(after.halfmove(), 0);

    let mut tree = GameTree::with_board(board);
    let id = tree.play(tree.root(), "e2e4").unwrap();
    assert_eq!(tree.terminal_reason(id), None);
}

#[test]
fn test_halfmove_resets_on_capture() {
    let board = Board::from_fen("4k3/8/8/3r4/8/8/8/K2R4 w - - 40 30").unwrap();
    let after = board.play_uci("d1d5").unwrap();
    assert_eq!(after.halfmove(), 0);
}

#[test]
fn test_insufficient_material() {
    let cases = [
        ("8/8/8/8/8/8/8/K1k5 w - - 0 1", true),
        ("8/8/8/8/8/8/8/KBk5 w - - 0 1", true),
        ("8/8/8/8/8/8/8/KNk5 b - - 0 1", true),
        ("8/8/8/8/8/8/8/KNkn4 w - - 0 1", false),
        ("8/8/8/8/8/8/8/KBkb4 w - - 0 1", false),
        ("8/8/8/8/8/8/P7/K1k5 w - - 0 1", false),
        ("8/8/8/8/8/8/8/KRk5 b - - 0 1", false),
    ];
    for (fen, expected) in cases {
        let board = Board::from_fen(fen).unwrap();
        assert_eq!(board.insufficient_material(), expected, "{fen}");
    }
}

#[test]
fn test_threefold_repetition_by_king_shuffle() {
    let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 0 1").unwrap();
    let mut tree = GameTree::with_board(board);
    let shuffle = ["e1d1", "e8d8", "d1e1", "d8e8"];

    let once = play_line(&mut tree, &shuffle);
    assert!(tree.board(once).unwrap().same_position(&board));
    assert_eq!(tree.terminal_reason(once), None);

    let mut id = once;
    for (i, uci) in shuffle.iter().enumerate() {
        id = tree.play(id, uci).unwrap();
        if i < 3 {
            assert_eq!(tree.terminal_reason(id), None, "after {uci}");
        }
    }
    assert_eq!(tree.terminal_reason(id), Some(TerminalReason::TripleRepetition));
}

#[test]
fn test_repetition_by_rook_shuffle() {
    let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 0 1").unwrap();
    let mut tree = GameTree::with_board(board);
    let id = play_line(
        &mut tree,
        &["h1h2", "e8d8", "h2h1", "d8e8", "h1h2", "e8d8", "h2h1", "d8e8"],
    );
    assert_eq!(tree.terminal_reason(id), Some(TerminalReason::TripleRepetition));

    let before = tree.node(id).unwrap().parent().unwrap();
    assert!(!tree.is_triple_rep(before));
}
