//! Prelude module for convenient imports.
//!
//! # Example
//! ```
//! use chess_core::board::prelude::*;
//!
//! let board = Board::new();
//! assert_eq!(board.active(), Color::White);
//! ```

pub use super::{
    Board, CastlingRights, Color, FenError, Move, MoveError, MoveList, Piece, SanError, Square,
    SquareError,
};
