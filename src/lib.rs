pub mod board;
pub mod options;
pub mod pgn;
pub mod polyglot;
pub mod tree;

pub use board::{Board, Color, Move, Piece, Square};
pub use options::PgnOptions;
pub use pgn::{load_pgn, write_pgn, PgnError};
pub use polyglot::{key_from_board, Book};
pub use tree::{GameTree, NodeId};
