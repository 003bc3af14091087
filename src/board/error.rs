//! Error types for chess board operations.

use std::fmt;

use super::Move;

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string is unreasonably long
    TooLong { len: usize },
    /// More than six whitespace-separated fields
    TooManyTokens { found: usize },
    /// More than eight ranks in the placement field
    TooManyRanks { found: usize },
    /// A rank describes more than eight files
    TooManyFiles { rank: usize },
    /// Invalid piece character in position string
    InvalidPiece { char: char },
    /// A pawn stands on the first or eighth rank
    PawnOnBackRank,
    /// Invalid side to move (must be 'w' or 'b')
    InvalidSideToMove { found: String },
    /// Halfmove clock is not a number
    InvalidHalfmove { found: String },
    /// Fullmove number is not a number
    InvalidFullmove { found: String },
    /// Each side needs exactly one king
    KingCount { white: usize, black: usize },
    /// The side that just moved is in check
    InactiveKingInCheck,
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooLong { len } => write!(f, "Invalid FEN - length was {len}"),
            FenError::TooManyTokens { found } => {
                write!(f, "Invalid FEN - token count was {found}")
            }
            FenError::TooManyRanks { found } => {
                write!(f, "Invalid FEN - too many rows ({found})")
            }
            FenError::TooManyFiles { rank } => {
                write!(f, "Invalid FEN - too many columns in row {rank}")
            }
            FenError::InvalidPiece { char } => {
                write!(f, "Invalid FEN - unknown piece '{char}'")
            }
            FenError::PawnOnBackRank => write!(f, "Invalid FEN - pawn on back rank"),
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid FEN - side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidHalfmove { found } => {
                write!(f, "Invalid FEN - halfmoves was {found}")
            }
            FenError::InvalidFullmove { found } => {
                write!(f, "Invalid FEN - fullmoves was {found}")
            }
            FenError::KingCount { white, black } => {
                write!(f, "Invalid FEN - number of kings ({white} white, {black} black)")
            }
            FenError::InactiveKingInCheck => {
                write!(f, "Invalid FEN - non-mover's king in check")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Reason a UCI move string was rejected.
///
/// Returned as a value by `Board::illegal`; asking whether a move is legal is
/// routine and not exceptional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// Move string must be 4-5 ASCII characters
    WrongLength { notation: String },
    /// Source square is not a valid coordinate
    InvalidSource { notation: String },
    /// Destination square is not a valid coordinate
    InvalidTarget { notation: String },
    /// Promotion suffix is not one of n, b, r, q
    InvalidPromotion { notation: String },
    /// The piece on the source square cannot make this move at all
    NotPseudoLegal { notation: String },
    /// The move would leave the mover's king attacked
    LeavesKingInCheck { notation: String },
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::WrongLength { notation } => write!(f, "{notation} had wrong string length"),
            MoveError::InvalidSource { notation } => {
                write!(f, "{notation} had invalid starting coordinate")
            }
            MoveError::InvalidTarget { notation } => {
                write!(f, "{notation} had invalid target coordinate")
            }
            MoveError::InvalidPromotion { notation } => {
                write!(f, "{notation} had invalid promotion piece")
            }
            MoveError::NotPseudoLegal { notation } => {
                write!(f, "{notation} not even pseudolegal")
            }
            MoveError::LeavesKingInCheck { notation } => {
                write!(f, "{notation} leaves king in check")
            }
        }
    }
}

impl std::error::Error for MoveError {}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Rank out of bounds (must be 0-7)
    RankOutOfBounds { rank: usize },
    /// File out of bounds (must be 0-7)
    FileOutOfBounds { file: usize },
    /// Invalid algebraic notation
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::RankOutOfBounds { rank } => {
                write!(f, "Rank {rank} out of bounds (must be 0-7)")
            }
            SquareError::FileOutOfBounds { file } => {
                write!(f, "File {file} out of bounds (must be 0-7)")
            }
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

/// Error type for SAN (Standard Algebraic Notation) parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanError {
    /// Nothing left after stripping annotations
    Empty,
    /// The last two characters are not a square
    InvalidDestination { san: String },
    /// No piece of the named kind can be found in the search area
    PieceNotFound { san: String },
    /// Pieces were found but none of them can legally make the move
    IllegalMove { san: String },
    /// Castling is not available on that side
    IllegalCastling { san: String },
    /// More than one legal move matches
    AmbiguousMove { san: String, candidates: Vec<Move> },
}

impl fmt::Display for SanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanError::Empty => write!(f, "Empty SAN string"),
            SanError::InvalidDestination { san } => {
                write!(f, "invalid destination in '{san}'")
            }
            SanError::PieceNotFound { san } => write!(f, "piece not found for '{san}'"),
            SanError::IllegalMove { san } => {
                write!(f, "piece found but move illegal for '{san}'")
            }
            SanError::IllegalCastling { san } => write!(f, "illegal castling '{san}'"),
            SanError::AmbiguousMove { san, candidates } => {
                let list: Vec<String> = candidates.iter().map(ToString::to_string).collect();
                write!(f, "ambiguous move '{san}': [{}]", list.join(","))
            }
        }
    }
}

impl std::error::Error for SanError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fen_error_messages() {
        let err = FenError::TooManyTokens { found: 7 };
        assert!(err.to_string().contains('7'));
        let err = FenError::InvalidPiece { char: 'z' };
        assert!(err.to_string().contains("'z'"));
        let err = FenError::KingCount { white: 2, black: 1 };
        assert!(err.to_string().contains("2 white"));
    }

    #[test]
    fn test_move_error_messages() {
        let err = MoveError::NotPseudoLegal {
            notation: "e2e5".to_string(),
        };
        assert_eq!(err.to_string(), "e2e5 not even pseudolegal");
        let err = MoveError::LeavesKingInCheck {
            notation: "e1f1".to_string(),
        };
        assert_eq!(err.to_string(), "e1f1 leaves king in check");
    }

    #[test]
    fn test_square_error_invalid_notation() {
        let err = SquareError::InvalidNotation {
            notation: "xyz".to_string(),
        };
        assert!(err.to_string().contains("xyz"));
    }

    #[test]
    fn test_san_error_ambiguous_lists_candidates() {
        let err = SanError::AmbiguousMove {
            san: "Nd2".to_string(),
            candidates: vec!["b1d2".parse().unwrap(), "f3d2".parse().unwrap()],
        };
        assert_eq!(err.to_string(), "ambiguous move 'Nd2': [b1d2,f3d2]");
    }

    #[test]
    fn test_error_clone() {
        let err = FenError::InvalidPiece { char: 'x' };
        let cloned = err.clone();
        assert_eq!(err, cloned);
    }
}
