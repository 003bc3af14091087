//! Chess board representation and rules.
//!
//! A mailbox board with Chess960-aware castling, legal move generation,
//! FEN and SAN notation.
//!
//! # Example
//! ```
//! use chess_core::board::Board;
//!
//! let board = Board::new();
//! let moves = board.legal_moves();
//! println!("Starting position has {} legal moves", moves.len());
//! ```

mod attack_tables;
mod chess960;
mod error;
mod fen;
mod make_move;
mod movegen;
pub mod prelude;
mod san;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use chess960::{chess960_arrangement, chess960_fen, CHESS960_POSITIONS};
pub use error::{FenError, MoveError, SanError, SquareError};
pub use state::{Board, Cell};
pub use types::{CastlingRights, Color, Move, MoveList, MoveListIntoIter, Piece, Square};

pub(crate) use state::START_FEN;
pub(crate) use types::{cell_from_fen_char, PROMOTION_PIECES};
