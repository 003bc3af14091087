//! Movetext scanner.
//!
//! Works a byte at a time with two pieces of state: whether we are inside a
//! `{...}` comment (braces do not nest) and a stack of nodes to return to when
//! a `(...)` variation closes.

use log::{trace, warn};

use super::{PgnError, PgnRecord};
use crate::board::Board;
use crate::options::PgnOptions;
use crate::tree::{GameTree, NodeId, TreeError};

const RESULT_TOKENS: [&str; 4] = ["1/2-1/2", "1-0", "0-1", "*"];

// DGT boards signal the result by putting the kings in the centre
const DGT_KING_MOVES: [&str; 8] = ["Kd4", "Ke4", "Kd5", "Ke5", "Kxd4", "Kxe4", "Kxd5", "Kxe5"];

/// Build a game tree from a pre-parsed record, using default options.
pub fn load_record(record: &PgnRecord) -> Result<GameTree, PgnError> {
    load_record_with(record, &PgnOptions::default())
}

/// Build a game tree from a pre-parsed record.
///
/// The game starts from the `FEN` tag if there is one. Every move becomes a
/// new node even if its parent already has a child with the same move, so the
/// move order of the text is preserved exactly. On error nothing is returned
/// and the partial tree is dropped.
pub fn load_record_with(record: &PgnRecord, options: &PgnOptions) -> Result<GameTree, PgnError> {
    let start = match record.tags.get("FEN") {
        Some(fen) => Board::from_fen(fen)?,
        None => Board::new(),
    };

    let mut tree = GameTree::with_board(start);
    tree.tags = options.default_tags.clone();

    let mut scanner = Scanner {
        node: tree.root(),
        callstack: Vec::new(),
        inside_brace: false,
    };

    for line in &record.movetext {
        if line.starts_with('%') {
            continue;
        }
        if scanner.scan_line(&mut tree, line)? == Flow::Finished {
            break;
        }
    }

    for (key, value) in record.tags.iter() {
        tree.tags.set(key, value);
    }
    Ok(tree)
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Finished,
}

struct Scanner {
    node: NodeId,
    callstack: Vec<NodeId>,
    inside_brace: bool,
}

impl Scanner {
    fn scan_line(&mut self, tree: &mut GameTree, line: &str) -> Result<Flow, PgnError> {
        let bytes = line.as_bytes();
        let mut token_start: Option<usize> = None;

        for (i, &c) in bytes.iter().enumerate() {
            if c == b'{' {
                self.inside_brace = true;
                continue;
            }
            if self.inside_brace {
                if c == b'}' {
                    self.inside_brace = false;
                }
                continue;
            }
            match c {
                b'(' => {
                    let parent = tree
                        .node(self.node)
                        .and_then(|n| n.parent())
                        .ok_or(PgnError::VariationAtRoot)?;
                    self.callstack.push(self.node);
                    self.node = parent;
                    continue;
                }
                b')' => {
                    self.node = self.callstack.pop().ok_or(PgnError::UnmatchedClose)?;
                    continue;
                }
                _ => {}
            }

            let start = *token_start.get_or_insert(i);

            let ends_token = match bytes.get(i + 1) {
                None => true,
                Some(&peek) => peek <= 32 || matches!(peek, b'(' | b')' | b'.' | b'{'),
            };
            if !ends_token {
                continue;
            }
            token_start = None;

            let raw = line[start..=i].trim();
            // "." can only ever be the first character of a token
            let token = raw.strip_prefix('.').unwrap_or(raw);

            if is_noise(token) {
                continue;
            }
            if RESULT_TOKENS.contains(&token) {
                trace!("result token {token}");
                return Ok(Flow::Finished);
            }
            if self.play(tree, token)? == Flow::Finished {
                return Ok(Flow::Finished);
            }
        }
        Ok(Flow::Continue)
    }

    fn play(&mut self, tree: &mut GameTree, token: &str) -> Result<Flow, PgnError> {
        let board = *tree
            .board(self.node)
            .ok_or(TreeError::StaleNode(self.node))?;
        match board.parse_san(token) {
            Ok(mv) => {
                trace!("{token} -> {mv}");
                self.node = tree.append(self.node, mv)?;
                Ok(Flow::Continue)
            }
            Err(_) if DGT_KING_MOVES.iter().any(|k| token.contains(k)) => {
                warn!("treating {token} as a DGT result marker");
                Ok(Flow::Finished)
            }
            Err(reason) => Err(PgnError::BadMove {
                token: token.to_string(),
                reason,
            }),
        }
    }
}

/// Move numbers, NAGs and stray check marks.
fn is_noise(token: &str) -> bool {
    token.is_empty()
        || token == "+"
        || token.starts_with('$')
        || token.bytes().all(|b| b.is_ascii_digit())
}
