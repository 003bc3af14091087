use std::str::FromStr;

use super::error::{FenError, MoveError};
use super::{cell_from_fen_char, Board, CastlingRights, Color, Move, Piece, Square};

const MAX_FEN_LEN: usize = 200;

impl Board {
    /// Parse a board position from FEN notation.
    ///
    /// Missing trailing fields default to `w - - 0 1`. Castling accepts both
    /// `KQkq` and Chess960 file letters. The en passant field is kept only
    /// when a legal capture onto it exists.
    ///
    /// # Example
    /// ```
    /// use chess_core::board::Board;
    ///
    /// let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
    /// assert_eq!(board.fen(false), "4k3/8/8/8/8/8/8/4K2R w H - 0 1");
    /// assert_eq!(board.fen(true), "4k3/8/8/8/8/8/8/4K2R w K - 0 1");
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        if fen.len() > MAX_FEN_LEN {
            return Err(FenError::TooLong { len: fen.len() });
        }

        let mut tokens: Vec<&str> = fen.split_whitespace().collect();
        for default in ["w", "-", "-", "0", "1"] {
            if (1..6).contains(&tokens.len()) {
                tokens.push(default);
            } else {
                break;
            }
        }
        if tokens.len() != 6 {
            return Err(FenError::TooManyTokens {
                found: tokens.len(),
            });
        }

        let mut board = Board::empty();

        // Some writers leave a trailing slash
        let placement = tokens[0].strip_suffix('/').unwrap_or(tokens[0]);
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() > 8 {
            return Err(FenError::TooManyRanks { found: rows.len() });
        }

        let mut white_kings = 0;
        let mut black_kings = 0;
        for (row, text) in rows.iter().enumerate() {
            let rank = 7 - row;
            let mut file = 0;
            for c in text.chars() {
                if file > 7 {
                    return Err(FenError::TooManyFiles { rank: rank + 1 });
                }
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += skip as usize;
                    continue;
                }
                let (color, piece) = cell_from_fen_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                if piece == Piece::Pawn && (rank == 0 || rank == 7) {
                    return Err(FenError::PawnOnBackRank);
                }
                if piece == Piece::King {
                    match color {
                        Color::White => white_kings += 1,
                        Color::Black => black_kings += 1,
                    }
                }
                board.set(Square(rank, file), Some((color, piece)));
                file += 1;
            }
            if file > 8 {
                return Err(FenError::TooManyFiles { rank: rank + 1 });
            }
        }

        board.active = match tokens[1] {
            "w" | "W" => Color::White,
            "b" | "B" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        board.halfmove = tokens[4].parse().map_err(|_| FenError::InvalidHalfmove {
            found: tokens[4].to_string(),
        })?;
        board.fullmove = tokens[5].parse().map_err(|_| FenError::InvalidFullmove {
            found: tokens[5].to_string(),
        })?;

        if white_kings != 1 || black_kings != 1 {
            return Err(FenError::KingCount {
                white: white_kings,
                black: black_kings,
            });
        }

        if board.can_capture_king() {
            return Err(FenError::InactiveKingInCheck);
        }

        // Order matters: en passant needs `active`, normal_chess needs castling
        board.castling = parse_castling(&board, tokens[2]);
        board.maybe_set_en_passant(tokens[3].parse::<Square>().ok());
        board.normal_chess = is_normal_chess(&board);

        Ok(board)
    }

    /// FEN for this position.
    ///
    /// Castling is written with file letters (`AHah`) unless `friendly` is
    /// set and the position is normal chess, in which case `KQkq` is used.
    #[must_use]
    pub fn fen(&self, friendly: bool) -> String {
        format!("{} {} {}", self.book_fen_with(friendly), self.halfmove, self.fullmove)
    }

    /// FEN without the move counters, as used for book and repetition keys.
    #[must_use]
    pub fn book_fen(&self) -> String {
        self.book_fen_with(false)
    }

    fn book_fen_with(&self, friendly: bool) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                match self.get(Square(rank, file)) {
                    Some((color, piece)) => {
                        if empty > 0 {
                            row.push_str(&empty.to_string());
                            empty = 0;
                        }
                        row.push(piece.to_fen_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let castling = if friendly && self.normal_chess {
            self.castling.to_classic_string()
        } else {
            self.castling.to_string()
        };
        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {}",
            rows.join("/"),
            self.active.fen_char(),
            castling,
            ep
        )
    }

    /// Parse a UCI move and check that it is legal here.
    ///
    /// Legacy castling input such as `e1g1` is converted to king-onto-rook
    /// first.
    ///
    /// # Example
    /// ```
    /// use chess_core::board::Board;
    ///
    /// let board = Board::new();
    /// let mv = board.parse_move("e2e4").unwrap();
    /// assert_eq!(mv.to_string(), "e2e4");
    /// assert!(board.parse_move("e2e5").is_err());
    /// ```
    pub fn parse_move(&self, uci: &str) -> Result<Move, MoveError> {
        let mv: Move = uci.parse()?;
        let mv = self.c960_castling_converter(mv);
        match self.illegal_move(mv) {
            Some(reason) => Err(reason),
            None => Ok(mv),
        }
    }

    /// Parse a UCI move and return the resulting position.
    pub fn play_uci(&self, uci: &str) -> Result<Board, MoveError> {
        let mv = self.parse_move(uci)?;
        Ok(self.make_move(mv))
    }
}

/// Resolve a FEN castling field against the pieces actually on the board.
///
/// `K`/`Q` name the h/a rook if one is there, otherwise every rook found
/// scanning inwards from that edge before meeting the king. File letters only
/// count when a rook of that color stands on that file. Nothing counts unless
/// the king is on its back rank.
fn parse_castling(board: &Board, field: &str) -> CastlingRights {
    let mut rights = CastlingRights::none();

    for color in Color::BOTH {
        let rank = color.back_rank();
        if board.king_square(color).rank() != rank {
            continue;
        }
        let has_rook = |file: usize| board.get(Square(rank, file)) == Some((color, Piece::Rook));

        for c in field.chars() {
            let (side, lower) = match color {
                Color::White if c.is_ascii_uppercase() => (c, c.to_ascii_lowercase()),
                Color::Black if c.is_ascii_lowercase() => (c.to_ascii_uppercase(), c),
                _ => continue,
            };
            match side {
                'Q' => {
                    if has_rook(0) {
                        rights.set(color, 0);
                    } else {
                        scan_for_rooks(board, color, 0..8, &mut rights);
                    }
                }
                'K' => {
                    if has_rook(7) {
                        rights.set(color, 7);
                    } else {
                        scan_for_rooks(board, color, (0..8).rev(), &mut rights);
                    }
                }
                'A'..='H' => {
                    let file = (lower as u8 - b'a') as usize;
                    if has_rook(file) {
                        rights.set(color, file);
                    }
                }
                _ => {}
            }
        }
    }

    rights
}

/// Grant a right for every rook met before the king.
fn scan_for_rooks(
    board: &Board,
    color: Color,
    files: impl Iterator<Item = usize>,
    rights: &mut CastlingRights,
) {
    let rank = color.back_rank();
    for file in files {
        match board.get(Square(rank, file)) {
            Some((c, Piece::King)) if c == color => break,
            Some((c, Piece::Rook)) if c == color => rights.set(color, file),
            _ => {}
        }
    }
}

/// Standard chess castling: rights only on the a and h files, with the king
/// on its e-file home square.
pub(crate) fn is_normal_chess(board: &Board) -> bool {
    for color in Color::BOTH {
        if (1..7).any(|file| board.castling.has(color, file)) {
            return false;
        }
        let outer = board.castling.has(color, 0) || board.castling.has(color, 7);
        if outer && board.get(Square(color.back_rank(), 4)) != Some((color, Piece::King)) {
            return false;
        }
    }
    true
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_fen(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::state::START_FEN;

    #[test]
    fn test_fen_round_trip() {
        let fens = [
            START_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2",
        ];
        for fen in fens {
            let board = Board::from_fen(fen).unwrap();
            assert_eq!(board.fen(true), fen);
        }
    }

    #[test]
    fn test_missing_fields_default() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3").unwrap();
        assert_eq!(board.fen(true), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 b").unwrap();
        assert_eq!(board.active(), Color::Black);
    }

    #[test]
    fn test_whitespace_variants() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3\tw\n-  - 3 9").unwrap();
        assert_eq!(board.halfmove(), 3);
        assert_eq!(board.fullmove(), 9);
    }

    #[test]
    fn test_trailing_slash_tolerated() {
        assert!(Board::from_fen("4k3/8/8/8/8/8/8/4K3/ w - - 0 1").is_ok());
    }

    #[test]
    fn test_fen_errors() {
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1 extra"),
            Err(FenError::TooManyTokens { found: 7 })
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::TooManyRanks { found: 9 })
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3pp w - - 0 1"),
            Err(FenError::TooManyFiles { .. })
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K2x w - - 0 1"),
            Err(FenError::InvalidPiece { char: 'x' })
        ));
        assert!(matches!(
            Board::from_fen("4k2p/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::PawnOnBackRank)
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 x - - 0 1"),
            Err(FenError::InvalidSideToMove { .. })
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - z 1"),
            Err(FenError::InvalidHalfmove { .. })
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 z"),
            Err(FenError::InvalidFullmove { .. })
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4KK2 w - - 0 1"),
            Err(FenError::KingCount { white: 2, black: 1 })
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1"),
            Err(FenError::InactiveKingInCheck)
        ));
        let long = format!("{} {}", START_FEN, " ".repeat(200));
        assert!(matches!(Board::from_fen(&long), Err(FenError::TooLong { .. })));
    }

    #[test]
    fn test_castling_needs_rook_and_king_on_back_rank() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w KQkq - 0 1").unwrap();
        assert!(board.castling().is_empty());
        let board = Board::from_fen("r3k2r/8/8/8/8/8/4K3/R6R w KQkq - 0 1").unwrap();
        assert_eq!(board.castling().to_string(), "ah");
    }

    #[test]
    fn test_chess960_castling_letters() {
        let board = Board::from_fen("1r2k1r1/8/8/8/8/8/8/1R2K1R1 w KQkq - 0 1").unwrap();
        assert_eq!(board.castling().to_string(), "BGbg");
        assert!(!board.normal_chess());
        let board = Board::from_fen("1r2k1r1/8/8/8/8/8/8/1R2K1R1 w BGbg - 0 1").unwrap();
        assert_eq!(board.castling().to_string(), "BGbg");
        assert_eq!(board.fen(true), board.fen(false));
    }

    #[test]
    fn test_normal_chess_requires_e_file_king() {
        let board = Board::from_fen("r5kr/8/8/8/8/8/8/R5KR w HAha - 0 1").unwrap();
        assert!(!board.normal_chess());
        assert!(Board::new().normal_chess());
    }

    #[test]
    fn test_en_passant_field_is_gated() {
        let board =
            Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        assert_eq!(board.en_passant(), None);
        let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        assert_eq!(board.en_passant(), Some("d6".parse().unwrap()));
    }

    #[test]
    fn test_book_fen_omits_counters() {
        assert_eq!(
            Board::new().book_fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w AHah -"
        );
    }

    #[test]
    fn test_parse_move_converts_legacy_castling() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(board.parse_move("e1g1").unwrap().to_string(), "e1h1");
        assert!(matches!(
            board.parse_move("e1e3"),
            Err(MoveError::NotPseudoLegal { .. })
        ));
    }

    #[test]
    fn test_from_str_trait() {
        let board: Board = START_FEN.parse().unwrap();
        assert_eq!(board, Board::new());
    }
}
