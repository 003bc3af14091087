//! Polyglot `.bin` books: sorted 16-byte big-endian records.

use std::fmt;

use log::{debug, warn};
use rand::Rng;

use super::key_from_board;
use crate::board::{Board, Move, Square};
use crate::tree::GameTree;

/// Size of one book record in bytes.
pub const RECORD_SIZE: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    /// A record must be exactly 16 bytes
    RecordLength { len: usize },
}

impl fmt::Display for BookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookError::RecordLength { len } => {
                write!(f, "book record was {len} bytes, expected {RECORD_SIZE}")
            }
        }
    }
}

impl std::error::Error for BookError {}

/// One book move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BookEntry {
    pub key: u64,
    pub mv: Move,
    pub weight: u16,
    pub learn: u32,
}

/// Our move to Polyglot's packing: to file in bits 0-2, to rank 3-5, from
/// file 6-8, from rank 9-11, promotion 12-14. Castling is king onto rook in
/// both.
fn pack_move(mv: Move) -> u16 {
    let to = mv.to().as_index() as u16;
    let from = mv.from().as_index() as u16;
    to | (from << 6) | (mv.promotion_code() << 12)
}

fn unpack_move(raw: u16) -> Move {
    let to = Square::from_index(usize::from(raw & 0x3F));
    let from = Square::from_index(usize::from((raw >> 6) & 0x3F));
    match (raw >> 12) & 0x7 {
        1..=4 => Move::from_u16(Move::new(from, to).as_u16() | ((raw >> 12) & 0x7) << 12),
        // 5-7 are unused
        _ => Move::new(from, to),
    }
}

impl BookEntry {
    pub fn from_bytes(record: &[u8]) -> Result<Self, BookError> {
        let bytes: &[u8; RECORD_SIZE] = record
            .try_into()
            .map_err(|_| BookError::RecordLength { len: record.len() })?;
        let mut key = [0u8; 8];
        key.copy_from_slice(&bytes[0..8]);
        let mut learn = [0u8; 4];
        learn.copy_from_slice(&bytes[12..16]);
        Ok(BookEntry {
            key: u64::from_be_bytes(key),
            mv: unpack_move(u16::from_be_bytes([bytes[8], bytes[9]])),
            weight: u16::from_be_bytes([bytes[10], bytes[11]]),
            learn: u32::from_be_bytes(learn),
        })
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut out = [0u8; RECORD_SIZE];
        out[0..8].copy_from_slice(&self.key.to_be_bytes());
        out[8..10].copy_from_slice(&pack_move(self.mv).to_be_bytes());
        out[10..12].copy_from_slice(&self.weight.to_be_bytes());
        out[12..16].copy_from_slice(&self.learn.to_be_bytes());
        out
    }

    // Sort key matching the byte order of the record
    fn sort_key(&self) -> (u64, u16, u16, u32) {
        (self.key, pack_move(self.mv), self.weight, self.learn)
    }
}

/// An opening book, kept sorted by key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Book {
    entries: Vec<BookEntry>,
}

impl Book {
    /// Build a book from entries in any order.
    #[must_use]
    pub fn new(mut entries: Vec<BookEntry>) -> Self {
        entries.sort_by_key(BookEntry::sort_key);
        Book { entries }
    }

    /// Read a `.bin` file. A trailing partial record is ignored.
    #[must_use]
    pub fn from_bytes(buf: &[u8]) -> Self {
        let chunks = buf.chunks_exact(RECORD_SIZE);
        if !chunks.remainder().is_empty() {
            warn!(
                "ignoring {} trailing bytes in book",
                chunks.remainder().len()
            );
        }
        let mut entries: Vec<BookEntry> = chunks
            .filter_map(|chunk| BookEntry::from_bytes(chunk).ok())
            .collect();
        // Files should already be sorted; keep their order within a key
        entries.sort_by_key(|e| e.key);
        debug!("loaded book with {} entries", entries.len());
        Book { entries }
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.entries.iter().flat_map(BookEntry::to_bytes).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[BookEntry] {
        &self.entries
    }

    /// All entries for `board`'s position.
    #[must_use]
    pub fn probe(&self, board: &Board) -> &[BookEntry] {
        self.probe_key(key_from_board(board))
    }

    #[must_use]
    pub fn probe_key(&self, key: u64) -> &[BookEntry] {
        let Ok(hit) = self.entries.binary_search_by_key(&key, |e| e.key) else {
            return &[];
        };
        let mut left = hit;
        while left > 0 && self.entries[left - 1].key == key {
            left -= 1;
        }
        let mut right = hit;
        while right + 1 < self.entries.len() && self.entries[right + 1].key == key {
            right += 1;
        }
        &self.entries[left..=right]
    }

    /// A book move for `board`, chosen with probability proportional to its
    /// weight. Uniform among the entries if all weights are zero.
    pub fn pick_weighted<R: Rng + ?Sized>(&self, board: &Board, rng: &mut R) -> Option<Move> {
        let entries = self.probe(board);
        if entries.is_empty() {
            return None;
        }
        let total: u32 = entries.iter().map(|e| u32::from(e.weight)).sum();
        if total == 0 {
            return Some(entries[rng.gen_range(0..entries.len())].mv);
        }
        let mut roll = rng.gen_range(0..total);
        for entry in entries {
            let w = u32::from(entry.weight);
            if roll < w {
                return Some(entry.mv);
            }
            roll -= w;
        }
        entries.last().map(|e| e.mv)
    }
}

/// A book with one weight-1 entry for every move in `tree`, variations
/// included.
#[must_use]
pub fn book_from_tree(tree: &GameTree) -> Book {
    let mut entries = Vec::new();
    for id in tree.preorder(tree.root()) {
        let Some(node) = tree.node(id) else {
            continue;
        };
        let key = key_from_board(node.board());
        for &child in node.children() {
            if let Some(mv) = tree.node(child).and_then(|c| c.mv()) {
                entries.push(BookEntry {
                    key,
                    mv,
                    weight: 1,
                    learn: 0,
                });
            }
        }
    }
    Book::new(entries)
}
