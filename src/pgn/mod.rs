//! PGN import and export.
//!
//! A PGN file is first cut into games with [`split_games`], each game is
//! pre-parsed into tags and movetext lines ([`PgnRecord`]), and the movetext
//! is then scanned into a [`GameTree`](crate::tree::GameTree) by
//! [`load_record`]. [`write_pgn`] goes the other way.
//!
//! ```
//! use chess_core::options::PgnOptions;
//! use chess_core::pgn::{load_pgn, write_pgn};
//!
//! let mut tree = load_pgn("1. e4 e5 (1... c5 2. Nf3) 2. Nf3 *").unwrap();
//! let text = write_pgn(&mut tree, &PgnOptions::default());
//! assert!(text.ends_with("1. e4 e5 (1... c5 2. Nf3) 2. Nf3 *\n"));
//! ```

mod reader;
mod record;
mod writer;

use std::fmt;
use std::ops::Range;

use log::debug;

use crate::board::{FenError, SanError};
use crate::tree::{GameTree, TreeError};

pub use reader::{load_record, load_record_with};
pub use record::PgnRecord;
pub use writer::{movetext, ordered_tokens, write_pgn, Token};

/// Error type for PGN loading failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PgnError {
    /// The FEN tag does not describe a valid position
    BadFen(FenError),
    /// A movetext token is not a legal move
    BadMove { token: String, reason: SanError },
    /// `(` before any move has been played
    VariationAtRoot,
    /// `)` with no open variation
    UnmatchedClose,
    /// The tree rejected an edit
    Tree(TreeError),
}

impl fmt::Display for PgnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PgnError::BadFen(err) => write!(f, "bad FEN tag: {err}"),
            PgnError::BadMove { token, reason } => write!(f, "\"{token}\" -- {reason}"),
            PgnError::VariationAtRoot => write!(f, "variation opened before the first move"),
            PgnError::UnmatchedClose => write!(f, "unmatched closing parenthesis"),
            PgnError::Tree(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for PgnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PgnError::BadFen(err) => Some(err),
            PgnError::BadMove { reason, .. } => Some(reason),
            PgnError::Tree(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FenError> for PgnError {
    fn from(err: FenError) -> Self {
        PgnError::BadFen(err)
    }
}

impl From<TreeError> for PgnError {
    fn from(err: TreeError) -> Self {
        PgnError::Tree(err)
    }
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Byte ranges of the individual games in a PGN file.
///
/// A new game starts wherever a blank line is followed by a `[` tag line.
/// Both `\n\n[` and `\n\r\n[` line endings are recognised.
#[must_use]
pub fn split_games(buf: &[u8]) -> Vec<Range<usize>> {
    let mut starts = Vec::new();
    if !buf.is_empty() {
        starts.push(0);
    }
    for (pattern, fix) in [(&b"\n\n["[..], 2), (&b"\n\r\n["[..], 3)] {
        starts.extend(
            buf.windows(pattern.len())
                .enumerate()
                .filter(|(_, w)| *w == pattern)
                .map(|(i, _)| i + fix),
        );
    }
    starts.sort_unstable();
    starts.dedup();

    let games: Vec<Range<usize>> = starts
        .iter()
        .enumerate()
        .map(|(n, &start)| start..starts.get(n + 1).copied().unwrap_or(buf.len()))
        .collect();
    debug!("split {} bytes into {} games", buf.len(), games.len());
    games
}

/// Load the first game in `text`.
pub fn load_pgn(text: &str) -> Result<GameTree, PgnError> {
    let buf = text.as_bytes();
    let range = split_games(buf).into_iter().next().unwrap_or(0..0);
    load_record(&PgnRecord::from_bytes(&buf[range]))
}

/// Load every game in `buf`, each with its own result.
#[must_use]
pub fn load_all(buf: &[u8]) -> Vec<Result<GameTree, PgnError>> {
    split_games(buf)
        .into_iter()
        .map(|range| load_record(&PgnRecord::from_bytes(&buf[range])))
        .collect()
}
