//! Polyglot position keys and opening books.
//!
//! ```
//! use chess_core::board::Board;
//! use chess_core::polyglot::key_from_board;
//!
//! assert_eq!(key_from_board(&Board::new()), 0x463b96181691fc9c);
//! ```

mod book;
mod keys;

use crate::board::{Board, Color, Square};

pub use book::{book_from_tree, Book, BookEntry, BookError, RECORD_SIZE};

use keys::{CASTLE_KEYS, EN_PASSANT_KEYS, PIECE_KEYS, WHITE_TO_MOVE_KEY};

// (color, rook file) for CASTLE_KEYS[0..4]
const CASTLE_KEY_RIGHTS: [(Color, usize); 4] = [
    (Color::White, 7),
    (Color::White, 0),
    (Color::Black, 7),
    (Color::Black, 0),
];

/// Polyglot piece kind: black pawn 0, white pawn 1, black knight 2, ...
#[inline]
fn piece_kind(color: Color, piece: crate::board::Piece) -> usize {
    piece.index() * 2 + usize::from(color == Color::White)
}

/// The Polyglot hash of a position.
///
/// Castling rights on inner files have no Polyglot constant and add nothing.
/// The en passant file is only mixed in when a legal en passant capture
/// exists, which is exactly when the board records an en passant square.
#[must_use]
pub fn key_from_board(board: &Board) -> u64 {
    let mut key = 0u64;

    for idx in 0..64 {
        let sq = Square::from_index(idx);
        if let Some((color, piece)) = board.get(sq) {
            key ^= PIECE_KEYS[64 * piece_kind(color, piece) + 8 * sq.rank() + sq.file()];
        }
    }

    let rights = board.castling();
    for (n, &(color, file)) in CASTLE_KEY_RIGHTS.iter().enumerate() {
        if rights.has(color, file) {
            key ^= CASTLE_KEYS[n];
        }
    }

    if let Some(ep) = board.en_passant() {
        key ^= EN_PASSANT_KEYS[ep.file()];
    }

    if board.active() == Color::White {
        key ^= WHITE_TO_MOVE_KEY;
    }

    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn after(moves: &[&str]) -> Board {
        moves
            .iter()
            .fold(Board::new(), |b, uci| b.play_uci(uci).unwrap())
    }

    #[test]
    fn test_reference_keys() {
        assert_eq!(key_from_board(&Board::new()), 0x463b96181691fc9c);
        assert_eq!(key_from_board(&after(&["e2e4"])), 0x823c9b50fd114196);
        assert_eq!(key_from_board(&after(&["e2e4", "d7d5"])), 0x0756b94461c50fb0);
        assert_eq!(
            key_from_board(&after(&["e2e4", "d7d5", "e4e5", "f7f5"])),
            0x22a48b5a8e47ff78
        );
    }

    #[test]
    fn test_en_passant_only_when_capturable() {
        // After e2e4 no black pawn can take, so no ep key even though the
        // pawn just double-stepped
        let board = after(&["e2e4"]);
        assert_eq!(board.en_passant(), None);

        let board = after(&["e2e4", "d7d5", "e4e5", "f7f5"]);
        assert!(board.en_passant().is_some());
        let mut no_ep = board;
        no_ep.en_passant = None;
        assert_eq!(
            key_from_board(&board) ^ key_from_board(&no_ep),
            EN_PASSANT_KEYS[5]
        );
    }

    #[test]
    fn test_inner_file_rights_ignored() {
        let inner = Board::from_fen("1r2k1r1/8/8/8/8/8/8/1R2K1R1 w BGbg - 0 1").unwrap();
        let none = Board::from_fen("1r2k1r1/8/8/8/8/8/8/1R2K1R1 w - - 0 1").unwrap();
        assert_ne!(inner.castling(), none.castling());
        assert_eq!(key_from_board(&inner), key_from_board(&none));
    }

    #[test]
    fn test_transpositions_share_keys() {
        let a = after(&["g1f3", "g8f6", "b1c3"]);
        let b = after(&["b1c3", "g8f6", "g1f3"]);
        assert_eq!(key_from_board(&a), key_from_board(&b));
        assert_ne!(key_from_board(&a), key_from_board(&after(&["g1f3", "g8f6"])));
    }
}
