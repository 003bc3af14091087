//! Chess960 starting positions in Scharnagl numbering.

use rand::Rng;

use super::error::FenError;
use super::fen::is_normal_chess;
use super::{Board, Color, Piece, Square};

/// Number of distinct Chess960 starting arrangements.
pub const CHESS960_POSITIONS: u32 = 960;

// Knight placements among the five squares left after bishops and queen
const KNIGHT_SLOTS: [(usize, usize); 10] = [
    (0, 1),
    (0, 2),
    (0, 3),
    (0, 4),
    (1, 2),
    (1, 3),
    (1, 4),
    (2, 3),
    (2, 4),
    (3, 4),
];

/// Put `piece` on the `nth` still-empty square.
fn place(row: &mut [Option<Piece>; 8], nth: usize, piece: Piece) {
    if let Some(slot) = row.iter_mut().filter(|cell| cell.is_none()).nth(nth) {
        *slot = Some(piece);
    }
}

/// White's back rank for position `n`, file a first. `n` is taken modulo
/// 960; position 518 is the standard arrangement.
#[must_use]
pub fn chess960_arrangement(n: u32) -> [Piece; 8] {
    let n = (n % CHESS960_POSITIONS) as usize;
    let mut row: [Option<Piece>; 8] = [None; 8];

    row[(n / 4 % 4) * 2] = Some(Piece::Bishop);
    row[(n % 4) * 2 + 1] = Some(Piece::Bishop);

    place(&mut row, n / 16 % 6, Piece::Queen);

    // Place the later knight first so the earlier index stays valid
    let (first, second) = KNIGHT_SLOTS[n / 96];
    place(&mut row, second, Piece::Knight);
    place(&mut row, first, Piece::Knight);

    place(&mut row, 0, Piece::Rook);
    place(&mut row, 0, Piece::King);
    place(&mut row, 0, Piece::Rook);

    row.map(|cell| cell.unwrap_or(Piece::Rook))
}

/// Full starting FEN for position `n`, with file-letter castling rights on
/// both rooks.
#[must_use]
pub fn chess960_fen(n: u32) -> String {
    let pieces: String = chess960_arrangement(n)
        .iter()
        .map(|p| p.san_char())
        .collect();
    let rights: String = pieces
        .char_indices()
        .filter(|&(_, c)| c == 'R')
        .map(|(i, _)| (b'A' + i as u8) as char)
        .collect();
    format!(
        "{}/pppppppp/8/8/8/8/PPPPPPPP/{} w {}{} - 0 1",
        pieces.to_ascii_lowercase(),
        pieces,
        rights,
        rights.to_ascii_lowercase()
    )
}

impl Board {
    /// Chess960 starting position number `n`.
    pub fn chess960(n: u32) -> Result<Board, FenError> {
        Board::from_fen(&chess960_fen(n))
    }

    /// A uniformly random Chess960 starting position.
    pub fn random_chess960<R: Rng + ?Sized>(rng: &mut R) -> Board {
        let n = rng.gen_range(0..CHESS960_POSITIONS);
        let mut board = Board::empty();
        let row = chess960_arrangement(n);
        for (file, &piece) in row.iter().enumerate() {
            board.set(Square(0, file), Some((Color::White, piece)));
            board.set(Square(7, file), Some((Color::Black, piece)));
            board.set(Square(1, file), Some((Color::White, Piece::Pawn)));
            board.set(Square(6, file), Some((Color::Black, Piece::Pawn)));
            if piece == Piece::Rook {
                board.castling.set(Color::White, file);
                board.castling.set(Color::Black, file);
            }
        }
        board.normal_chess = is_normal_chess(&board);
        board
    }
}
