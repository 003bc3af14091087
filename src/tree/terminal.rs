//! Game-over detection on tree nodes.

use std::fmt;

use super::{GameTree, NodeId};
use crate::board::Color;

/// Why a position ends the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerminalReason {
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
    TripleRepetition,
}

impl TerminalReason {
    /// The PGN result string for this ending.
    #[must_use]
    pub fn result_string(self) -> &'static str {
        match self {
            TerminalReason::Checkmate { winner: Color::White } => "1-0",
            TerminalReason::Checkmate { winner: Color::Black } => "0-1",
            _ => "1/2-1/2",
        }
    }
}

impl fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TerminalReason::Checkmate { .. } => "Checkmate",
            TerminalReason::Stalemate => "Stalemate",
            TerminalReason::InsufficientMaterial => "Insufficient Material",
            TerminalReason::FiftyMoveRule => "50 Move Rule",
            TerminalReason::TripleRepetition => "Triple Repetition",
        };
        f.write_str(text)
    }
}

impl GameTree {
    /// Why the game is over at `id`, or `None` if play can continue.
    /// Cached per node.
    #[must_use]
    pub fn terminal_reason(&self, id: NodeId) -> Option<TerminalReason> {
        let node = self.node(id)?;
        *node.terminal.get_or_init(|| {
            let board = &node.board;
            if board.no_moves() {
                if board.king_in_check() {
                    Some(TerminalReason::Checkmate {
                        winner: board.inactive(),
                    })
                } else {
                    Some(TerminalReason::Stalemate)
                }
            } else if board.insufficient_material() {
                Some(TerminalReason::InsufficientMaterial)
            } else if board.halfmove() >= 100 {
                Some(TerminalReason::FiftyMoveRule)
            } else if self.is_triple_rep(id) {
                Some(TerminalReason::TripleRepetition)
            } else {
                None
            }
        })
    }

    /// True when the position at `id` has occurred twice before among its
    /// same-side-to-move ancestors, without crossing a pawn move or capture.
    #[must_use]
    pub fn is_triple_rep(&self, id: NodeId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        // Fewer than eight reversible plies cannot hold three occurrences
        if node.board.halfmove() < 8 {
            return false;
        }

        let mut hits = 0;
        let mut current = node;
        while let Some(ancestor) = current
            .parent
            .and_then(|p| self.node(p))
            .and_then(|p| p.parent)
            .and_then(|gp| self.node(gp))
        {
            if ancestor.board.same_position(&node.board) {
                hits += 1;
                if hits >= 2 {
                    return true;
                }
            }
            // Everything further back is on the far side of an irreversible move
            if ancestor.board.halfmove() < 2 {
                return false;
            }
            current = ancestor;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn play_line(tree: &mut GameTree, moves: &[&str]) -> NodeId {
        let mut id = tree.root();
        for uci in moves {
            id = tree.play(id, uci).unwrap();
        }
        id
    }

    #[test]
    fn test_fools_mate() {
        let mut tree = GameTree::new();
        let end = play_line(&mut tree, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        let board = tree.node(end).unwrap().board();
        assert!(board.no_moves() && board.king_in_check());
        assert_eq!(
            tree.terminal_reason(end),
            Some(TerminalReason::Checkmate { winner: Color::Black })
        );
        assert_eq!(tree.terminal_reason(end).unwrap().result_string(), "0-1");
        assert_eq!(tree.terminal_reason(tree.root()), None);
    }

    #[test]
    fn test_knight_shuffle_repetition() {
        let mut tree = GameTree::new();
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        let once = play_line(&mut tree, &shuffle);
        assert!(!tree.is_triple_rep(once));

        let mut id = once;
        for uci in shuffle {
            id = tree.play(id, uci).unwrap();
        }
        assert!(tree.is_triple_rep(id));
        assert_eq!(tree.terminal_reason(id), Some(TerminalReason::TripleRepetition));
    }

    #[test]
    fn test_repetition_broken_by_pawn_move() {
        let mut tree = GameTree::new();
        let id = play_line(
            &mut tree,
            &[
                "g1f3", "g8f6", "f3g1", "f6g8", "e2e3", "e7e6", "g1f3", "g8f6", "f3g1", "f6g8",
            ],
        );
        assert!(!tree.is_triple_rep(id));
    }

    #[test]
    fn test_other_endings() {
        let stalemate = GameTree::with_board(Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap());
        assert_eq!(
            stalemate.terminal_reason(stalemate.root()),
            Some(TerminalReason::Stalemate)
        );

        let bare = GameTree::with_board(Board::from_fen("8/8/4k3/8/8/3NK3/8/8 w - - 0 1").unwrap());
        assert_eq!(
            bare.terminal_reason(bare.root()),
            Some(TerminalReason::InsufficientMaterial)
        );

        let fifty = GameTree::with_board(Board::from_fen("8/8/4k3/8/8/3RK3/8/8 w - - 100 80").unwrap());
        let reason = fifty.terminal_reason(fifty.root());
        assert_eq!(reason, Some(TerminalReason::FiftyMoveRule));
        assert_eq!(reason.unwrap().to_string(), "50 Move Rule");
        assert_eq!(reason.unwrap().result_string(), "1/2-1/2");
    }
}
