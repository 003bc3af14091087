//! Standard Algebraic Notation (SAN) support.
//!
//! Writing follows the usual scoresheet form: "e4", "Nf3", "Bxc6+", "O-O",
//! "e8=Q#". Reading is lenient and accepts the sloppier forms found in real
//! PGN files, such as "0-0", "e8Q", "Ng1-f3" or "1...e5".
//!
//! # Examples
//! ```
//! use chess_core::board::Board;
//!
//! let board = Board::new();
//! let mv = board.parse_san("Nf3").unwrap();
//! assert_eq!(mv.to_string(), "g1f3");
//! assert_eq!(board.move_to_san(mv), "Nf3");
//! ```

use super::error::SanError;
use super::{Board, Move, Piece, Square};

/// Unicode hyphens and dashes that show up in pasted castling notation.
const DASHES: [char; 6] = ['\u{2010}', '\u{2012}', '\u{2013}', '\u{2014}', '\u{2015}', '\u{2212}'];

impl Board {
    /// Format a move in Standard Algebraic Notation.
    ///
    /// The move is assumed legal. Castling must be king-onto-rook.
    #[must_use]
    pub fn move_to_san(&self, mv: Move) -> String {
        let from = mv.from();
        let to = mv.to();
        let Some((color, piece)) = self.get(from) else {
            return "??".to_string();
        };
        let target = self.get(to);
        let check = self.check_suffix(mv);

        if piece == Piece::King && target == Some((color, Piece::Rook)) {
            let castle = if from.file() < to.file() { "O-O" } else { "O-O-O" };
            return format!("{castle}{check}");
        }

        let capture = if target.is_some() { "x" } else { "" };

        if piece == Piece::Pawn {
            let mut san = if from.file() == to.file() {
                to.to_string()
            } else {
                format!("{}x{}", from.file_char(), to)
            };
            if let Some(promo) = mv.promotion() {
                san.push('=');
                san.push(promo.san_char());
            }
            san.push_str(check);
            return san;
        }

        // Every same-type piece that could legally reach the destination,
        // the moving one included
        let rivals: Vec<Square> = self
            .find(color, piece, 0..=7, 0..=7)
            .into_iter()
            .filter(|&sq| self.is_legal(Move::new(sq, to)))
            .collect();

        let disambiguator = match rivals.len() {
            0 | 1 => String::new(),
            2 => {
                if rivals[0].file() == rivals[1].file() {
                    from.rank_char().to_string()
                } else {
                    from.file_char().to_string()
                }
            }
            _ => from.to_string(),
        };

        format!("{}{disambiguator}{capture}{to}{check}", piece.san_char())
    }

    fn check_suffix(&self, mv: Move) -> &'static str {
        let next = self.make_move(mv);
        if !next.king_in_check() {
            ""
        } else if next.no_moves() {
            "#"
        } else {
            "+"
        }
    }

    /// SAN for a UCI move string, or `"??"` if the string does not describe
    /// a move of some piece on the board.
    #[must_use]
    pub fn nice_string(&self, uci: &str) -> String {
        match uci.parse::<Move>() {
            Ok(mv) if self.get(mv.from()).is_some() => self.move_to_san(mv),
            _ => "??".to_string(),
        }
    }

    /// SAN for every legal move, in generation order.
    #[must_use]
    pub fn nice_moves(&self) -> Vec<String> {
        self.legal_moves()
            .iter()
            .map(|&mv| self.move_to_san(mv))
            .collect()
    }

    /// Resolve a SAN string to the single legal move it names.
    ///
    /// Move numbers, check marks, annotation glyphs and capture marks are
    /// ignored. More than one matching legal move is an error rather than a
    /// guess.
    pub fn parse_san(&self, san: &str) -> Result<Move, SanError> {
        let mut s: String = san
            .chars()
            .map(|c| if DASHES.contains(&c) { '-' } else { c })
            .filter(|c| !matches!(c, 'x' | '+' | '#' | '!' | '?'))
            .collect();

        if let Some(dot) = s.rfind('.') {
            s = s[dot + 1..].to_string();
        }
        let s = s.replace("0-0-0", "O-O-O").replace("0-0", "O-O");

        if s.is_empty() {
            return Err(SanError::Empty);
        }

        let upper = s.to_ascii_uppercase();
        if upper == "O-O" || upper == "O-O-O" {
            return self
                .propose_castling_move(upper == "O-O-O")
                .filter(|&mv| self.is_legal(mv))
                .ok_or_else(|| SanError::IllegalCastling {
                    san: san.to_string(),
                });
        }

        let mut chars: Vec<char> = s.chars().filter(|&c| c != '-').collect();

        let mut promotion: Option<char> = None;
        if chars.len() >= 2 && chars[chars.len() - 2] == '=' {
            promotion = chars.pop();
            chars.pop();
        } else if matches!(chars.last(), Some('Q' | 'R' | 'B' | 'N' | 'q' | 'r' | 'b' | 'n')) {
            promotion = chars.pop();
        }

        let piece = match chars.first().copied() {
            Some(c @ ('K' | 'Q' | 'R' | 'B' | 'N' | 'P')) => {
                chars.remove(0);
                Piece::from_char(c).unwrap_or(Piece::Pawn)
            }
            _ => Piece::Pawn,
        };

        let invalid_destination = || SanError::InvalidDestination {
            san: san.to_string(),
        };
        if chars.len() < 2 {
            return Err(invalid_destination());
        }
        let dest_text: String = chars[chars.len() - 2..].iter().collect();
        let dest: Square = dest_text.parse().map_err(|_| invalid_destination())?;
        let disambiguators = &chars[..chars.len() - 2];

        let mut files = 0..=7;
        let mut ranks = 0..=7;
        for &c in disambiguators {
            if ('a'..='h').contains(&c) {
                let file = (c as u8 - b'a') as usize;
                files = file..=file;
            }
            if ('1'..='8').contains(&c) {
                let rank = (c as u8 - b'1') as usize;
                ranks = rank..=rank;
            }
        }
        // A bare pawn move stays on its file
        if piece == Piece::Pawn && disambiguators.is_empty() {
            files = dest.file()..=dest.file();
        }

        let sources = self.find(self.active, piece, files, ranks);
        if sources.is_empty() {
            return Err(SanError::PieceNotFound {
                san: san.to_string(),
            });
        }

        let promote_to = match promotion {
            None => None,
            Some(c) => match Piece::from_char(c) {
                Some(p @ (Piece::Queen | Piece::Rook | Piece::Bishop | Piece::Knight)) => Some(p),
                _ => {
                    return Err(SanError::IllegalMove {
                        san: san.to_string(),
                    })
                }
            },
        };

        let candidates: Vec<Move> = sources
            .into_iter()
            .map(|from| match promote_to {
                Some(p) => Move::new_promotion(from, dest, p),
                None => Move::new(from, dest),
            })
            .filter(|&mv| self.is_legal(mv))
            .collect();

        match candidates.len() {
            1 => Ok(candidates[0]),
            0 => Err(SanError::IllegalMove {
                san: san.to_string(),
            }),
            _ => Err(SanError::AmbiguousMove {
                san: san.to_string(),
                candidates,
            }),
        }
    }

    /// Parse SAN and return the resulting position.
    pub fn make_move_san(&self, san: &str) -> Result<Board, SanError> {
        let mv = self.parse_san(san)?;
        Ok(self.make_move(mv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    #[test]
    fn test_pawn_moves() {
        let b = Board::new();
        assert_eq!(b.parse_san("e4").unwrap().to_string(), "e2e4");
        assert_eq!(b.parse_san("e3").unwrap().to_string(), "e2e3");
        assert_eq!(b.move_to_san("e2e4".parse().unwrap()), "e4");
    }

    #[test]
    fn test_nice_moves_and_make_move_san() {
        let b = Board::new();
        let sans = b.nice_moves();
        assert_eq!(sans.len(), 20);
        assert!(sans.iter().any(|s| s == "Nf3"));
        assert!(sans.iter().any(|s| s == "e4"));

        let after = b.make_move_san("Nf3").unwrap();
        assert_eq!(
            after.fen(true),
            "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 1 1"
        );
        assert!(b.make_move_san("Nf4").is_err());
    }

    #[test]
    fn test_knight_moves() {
        let b = Board::new();
        assert_eq!(b.parse_san("Nf3").unwrap().to_string(), "g1f3");
        assert_eq!(b.parse_san("Ng1-f3").unwrap().to_string(), "g1f3");
        assert!(matches!(
            b.parse_san("Nd4"),
            Err(SanError::IllegalMove { .. })
        ));
    }

    #[test]
    fn test_castling() {
        let b = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert_eq!(b.parse_san("O-O").unwrap().to_string(), "e1h1");
        assert_eq!(b.parse_san("0-0-0").unwrap().to_string(), "e1a1");
        assert_eq!(b.parse_san("O\u{2013}O").unwrap().to_string(), "e1h1");
        assert_eq!(b.move_to_san("e1h1".parse().unwrap()), "O-O");
        assert_eq!(b.move_to_san("e1a1".parse().unwrap()), "O-O-O");

        let no_rights = board("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1");
        assert!(matches!(
            no_rights.parse_san("O-O"),
            Err(SanError::IllegalCastling { .. })
        ));
    }

    #[test]
    fn test_captures() {
        let b = board("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1");
        assert_eq!(b.parse_san("exd5").unwrap().to_string(), "e4d5");
        assert_eq!(b.move_to_san("e4d5".parse().unwrap()), "exd5");
    }

    #[test]
    fn test_promotion() {
        let b = board("8/P3k3/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(b.parse_san("a8=Q").unwrap().to_string(), "a7a8q");
        assert_eq!(b.parse_san("a8N").unwrap().to_string(), "a7a8n");
        assert_eq!(b.move_to_san("a7a8q".parse().unwrap()), "a8=Q");
        assert!(b.parse_san("a8").is_err());
    }

    #[test]
    fn test_disambiguation() {
        let b = board("4k3/8/8/8/8/8/8/RN2K1NR w - - 0 1");
        assert_eq!(b.move_to_san("a1a3".parse().unwrap()), "Ra3");
        let b = board("4k3/8/8/8/8/8/8/2N1K1N1 w - - 0 1");
        let err = b.parse_san("Ne2").unwrap_err();
        assert!(matches!(err, SanError::AmbiguousMove { ref candidates, .. } if candidates.len() == 2));
        assert_eq!(b.parse_san("Nge2").unwrap().to_string(), "g1e2");
        assert_eq!(b.move_to_san("g1e2".parse().unwrap()), "Nge2");

        // Same file: rank disambiguates
        let b = board("4k3/8/8/8/R7/8/8/R3K3 w - - 0 1");
        assert_eq!(b.move_to_san("a1a2".parse().unwrap()), "R1a2");

        // Three knights reach d4: full source square
        let b = board("4k3/8/2N1N3/8/8/8/2N5/4K3 w - - 0 1");
        assert_eq!(b.move_to_san("c6d4".parse().unwrap()), "Nc6d4");
    }

    #[test]
    fn test_check_and_mate_suffix() {
        let b = board("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        assert_eq!(b.move_to_san("a1a8".parse().unwrap()), "Ra8+");
        let b = board("6k1/5ppp/8/8/8/8/8/R3K3 w - - 0 1");
        assert_eq!(b.move_to_san("a1a8".parse().unwrap()), "Ra8#");
    }

    #[test]
    fn test_annotations_and_move_numbers_stripped() {
        let b = Board::new();
        assert_eq!(b.parse_san("1.e4!?").unwrap().to_string(), "e2e4");
        let b = b.make_move("e2e4".parse().unwrap());
        assert_eq!(b.parse_san("1...e5").unwrap().to_string(), "e7e5");
    }

    #[test]
    fn test_errors() {
        let b = Board::new();
        assert!(matches!(b.parse_san(""), Err(SanError::Empty)));
        assert!(matches!(
            b.parse_san("Qz9"),
            Err(SanError::InvalidDestination { .. })
        ));
        assert!(matches!(
            b.parse_san("a5"),
            Err(SanError::IllegalMove { .. })
        ));
        let bare = board("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert!(matches!(
            bare.parse_san("Nf3"),
            Err(SanError::PieceNotFound { .. })
        ));
    }

    #[test]
    fn test_nice_string_rejects_garbage() {
        let b = Board::new();
        assert_eq!(b.nice_string("e3e4"), "??");
        assert_eq!(b.nice_string("zz"), "??");
        assert_eq!(b.nice_string("g1f3"), "Nf3");
    }

    #[test]
    fn test_every_legal_move_round_trips() {
        let b = board("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        for &mv in b.legal_moves().iter() {
            let san = b.move_to_san(mv);
            assert_eq!(b.parse_san(&san).unwrap(), mv, "{san}");
        }
    }
}
