use std::env;
use std::fs;
use std::process::ExitCode;

use chess_core::board::{Board, Color};
use chess_core::options::PgnOptions;
use chess_core::pgn::{load_record, split_games, write_pgn, PgnRecord};
use chess_core::polyglot::key_from_board;
use chess_core::tree::GameTree;

const USAGE: &str = "usage: position_status [--fen <FEN>] <move1> <move2> ...\n       position_status --pgn <file>";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("--help") {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let result = match args.first().map(String::as_str) {
        Some("--pgn") => match args.get(1) {
            Some(path) => from_pgn(path),
            None => Err(USAGE.to_string()),
        },
        Some("--fen") => match args.get(1) {
            Some(fen) => from_moves(fen, &args[2..]),
            None => Err(USAGE.to_string()),
        },
        _ => from_moves(&Board::new().fen(true), &args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn from_moves(fen: &str, moves: &[String]) -> Result<(), String> {
    let board = Board::from_fen(fen).map_err(|e| e.to_string())?;
    let mut tree = GameTree::with_board(board);
    let mut node = tree.root();
    for mv in moves {
        node = tree
            .play(node, mv)
            .or_else(|_| tree.play_san(node, mv))
            .map_err(|e| format!("{mv}: {e}"))?;
    }
    report(&tree, node);
    Ok(())
}

fn from_pgn(path: &str) -> Result<(), String> {
    let buf = fs::read(path).map_err(|e| format!("{path}: {e}"))?;
    let games = split_games(&buf);
    let first = games.first().ok_or_else(|| format!("{path}: no games"))?;
    let mut tree =
        load_record(&PgnRecord::from_bytes(&buf[first.clone()])).map_err(|e| e.to_string())?;
    println!("games: {}", games.len());
    let end = tree.get_end(tree.root());
    report(&tree, end);
    print!("{}", write_pgn(&mut tree, &PgnOptions::default()));
    Ok(())
}

fn report(tree: &GameTree, node: chess_core::NodeId) {
    let Some(board) = tree.board(node) else {
        return;
    };
    let legal = board.legal_moves();
    println!("fen: {}", board.fen(true));
    println!(
        "side_to_move: {}",
        if board.active() == Color::White { "white" } else { "black" }
    );
    println!("legal_moves: {}", legal.len());
    println!("check: {}", board.king_in_check());
    println!("checkmate: {}", board.is_checkmate());
    println!("stalemate: {}", board.is_stalemate());
    match tree.terminal_reason(node) {
        Some(reason) => println!("terminal: {reason} ({})", reason.result_string()),
        None => println!("terminal: none"),
    }
    println!("polyglot_key: {:016x}", key_from_board(board));
    for mv in legal.iter() {
        println!("{mv} {}", board.move_to_san(*mv));
    }
}
