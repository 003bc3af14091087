//! Game tree of positions reached by moves.
//!
//! Nodes live in an arena owned by [`GameTree`] and are addressed by
//! [`NodeId`] handles. The first child of a node is its main line; later
//! children are variations. Detaching a node frees its whole subtree, and any
//! handle into that subtree is rejected from then on.
//!
//! ```
//! use chess_core::tree::GameTree;
//!
//! let mut tree = GameTree::new();
//! let e4 = tree.play(tree.root(), "e2e4").unwrap();
//! let e5 = tree.play(e4, "e7e5").unwrap();
//! let c5 = tree.play(e4, "c7c5").unwrap();
//! assert!(tree.is_main_line(e5));
//! assert!(!tree.is_main_line(c5));
//! assert_eq!(tree.nice_move(c5), "c5");
//! ```

pub mod analysis;
mod node;
pub mod tags;
mod terminal;

use std::fmt;

use log::debug;

use crate::board::{Board, Color, Move, MoveError, Piece, SanError, Square};

pub use analysis::{AnalysisTable, MoveInfo};
pub use node::{Node, NodeId};
pub use tags::Tags;
pub use terminal::TerminalReason;

use node::Slot;

/// Errors from editing a [`GameTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The handle refers to a node that has been detached
    StaleNode(NodeId),
    /// The move is not legal in the node's position
    IllegalMove(MoveError),
    /// The SAN string does not name a legal move
    BadSan(SanError),
    /// The root cannot be detached from anything
    DetachRoot,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::StaleNode(id) => write!(f, "{id:?} no longer exists"),
            TreeError::IllegalMove(err) => write!(f, "illegal move: {err}"),
            TreeError::BadSan(err) => write!(f, "bad SAN: {err}"),
            TreeError::DetachRoot => write!(f, "cannot detach the root node"),
        }
    }
}

impl std::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TreeError::IllegalMove(err) => Some(err),
            TreeError::BadSan(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MoveError> for TreeError {
    fn from(err: MoveError) -> Self {
        TreeError::IllegalMove(err)
    }
}

impl From<SanError> for TreeError {
    fn from(err: SanError) -> Self {
        TreeError::BadSan(err)
    }
}

/// A game with its variations, plus the PGN tags that describe it.
#[derive(Clone, Debug)]
pub struct GameTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    pub tags: Tags,
}

impl Default for GameTree {
    fn default() -> Self {
        GameTree::new()
    }
}

impl GameTree {
    /// A tree rooted at the standard starting position.
    #[must_use]
    pub fn new() -> Self {
        GameTree::with_board(Board::new())
    }

    /// A tree rooted at `board`, with the default tag roster.
    #[must_use]
    pub fn with_board(board: Board) -> Self {
        let root = NodeId {
            index: 0,
            generation: 0,
        };
        GameTree {
            slots: vec![Slot {
                generation: 0,
                node: Some(Node::new(board, None, None, 0)),
            }],
            free: Vec::new(),
            root,
            tags: Tags::seven_tag_roster(),
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The node behind `id`, or `None` if it has been detached.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn get(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.node(id).ok_or(TreeError::StaleNode(id))
    }

    /// Board at `id`.
    #[must_use]
    pub fn board(&self, id: NodeId) -> Option<&Board> {
        self.node(id).map(Node::board)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Always false; a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Append `mv` as a new last child of `parent`. The move must already be
    /// known to be legal.
    pub(crate) fn append(&mut self, parent: NodeId, mv: Move) -> Result<NodeId, TreeError> {
        let (board, depth) = {
            let p = self.get(parent)?;
            (p.board.make_move(mv), p.depth + 1)
        };
        let id = self.alloc(Node::new(board, Some(parent), Some(mv), depth));
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        Ok(id)
    }

    /// Play `mv` from `parent`. Unless `force_new` is set, an existing child
    /// with the same move is returned instead of creating a sibling.
    pub fn make_move(
        &mut self,
        parent: NodeId,
        mv: Move,
        force_new: bool,
    ) -> Result<NodeId, TreeError> {
        let p = self.get(parent)?;
        if let Some(reason) = p.board.illegal_move(mv) {
            return Err(TreeError::IllegalMove(reason));
        }
        if !force_new {
            if let Some(&existing) = p
                .children
                .iter()
                .find(|&&c| self.node(c).and_then(Node::mv) == Some(mv))
            {
                return Ok(existing);
            }
        }
        self.append(parent, mv)
    }

    /// Play a UCI move string from `parent`, reusing a matching child.
    pub fn play(&mut self, parent: NodeId, uci: &str) -> Result<NodeId, TreeError> {
        let mv = self.get(parent)?.board.parse_move(uci)?;
        self.make_move(parent, mv, false)
    }

    /// Play a SAN move from `parent`, reusing a matching child.
    pub fn play_san(&mut self, parent: NodeId, san: &str) -> Result<NodeId, TreeError> {
        let mv = self.get(parent)?.board.parse_san(san)?;
        self.make_move(parent, mv, false)
    }

    /// Remove `id` and everything below it. Returns the parent, which is
    /// where a cursor on the removed node should move to.
    pub fn detach(&mut self, id: NodeId) -> Result<NodeId, TreeError> {
        let parent = self.get(id)?.parent.ok_or(TreeError::DetachRoot)?;
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != id);
        }

        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index as usize];
            if slot.generation != current.generation {
                continue;
            }
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
            }
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(current.index);
            freed += 1;
        }
        debug!("detached {freed} nodes");
        Ok(parent)
    }

    /// Drop all engine analysis and searchmove selections.
    pub fn clean(&mut self) {
        for node in self.slots.iter_mut().filter_map(|s| s.node.as_mut()) {
            node.table.clear();
            node.searchmoves.clear();
        }
    }

    /// Moves from the root to `id`.
    #[must_use]
    pub fn history(&self, id: NodeId) -> Vec<Move> {
        self.node_history(id)
            .into_iter()
            .filter_map(|n| self.node(n).and_then(Node::mv))
            .collect()
    }

    /// Like [`history`](Self::history), but with standard-chess castling
    /// written as the king's two-square step, for engines that only know
    /// that form.
    #[must_use]
    pub fn history_old_format(&self, id: NodeId) -> Vec<String> {
        self.node_history(id)
            .into_iter()
            .filter_map(|n| self.move_old_format(n))
            .collect()
    }

    /// The move into `id` in legacy castling notation when it is a castle
    /// from e1/e8 onto a corner rook, otherwise its usual UCI form.
    #[must_use]
    pub fn move_old_format(&self, id: NodeId) -> Option<String> {
        let node = self.node(id)?;
        let mv = node.mv?;
        let parent = self.node(node.parent?)?;
        let from = mv.from();
        let to = mv.to();
        let king_moves = parent.board.piece_on(from) == Some(Piece::King)
            && parent.board.color_at(from) == parent.board.color_at(to)
            && from.file() == 4
            && from.rank() == to.rank()
            && (from.rank() == 0 || from.rank() == 7);
        if king_moves {
            match to.file() {
                7 => return Some(Move::new(from, Square(from.rank(), 6)).to_string()),
                0 => return Some(Move::new(from, Square(from.rank(), 2)).to_string()),
                _ => {}
            }
        }
        Some(mv.to_string())
    }

    /// Nodes from the root to `id`, inclusive.
    #[must_use]
    pub fn node_history(&self, id: NodeId) -> Vec<NodeId> {
        let mut ret = Vec::new();
        let mut current = Some(id);
        while let Some(cid) = current {
            let Some(node) = self.node(cid) else {
                break;
            };
            ret.push(cid);
            current = node.parent;
        }
        ret.reverse();
        ret
    }

    /// Moves from the root to the end of the line `id` is on.
    #[must_use]
    pub fn future_history(&self, id: NodeId) -> Vec<Move> {
        self.history(self.get_end(id))
    }

    #[must_use]
    pub fn future_node_history(&self, id: NodeId) -> Vec<NodeId> {
        self.node_history(self.get_end(id))
    }

    /// Follow first children from `id` to a leaf.
    #[must_use]
    pub fn get_end(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(&first) = self.node(current).and_then(|n| n.children.first()) {
            current = first;
        }
        current
    }

    /// True when every node from the root to `id` is a first child.
    #[must_use]
    pub fn is_main_line(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            let Some(node) = self.node(current) else {
                return false;
            };
            let Some(parent) = node.parent else {
                return true;
            };
            if self.node(parent).and_then(|p| p.children.first()) != Some(&current) {
                return false;
            }
            current = parent;
        }
    }

    /// The deepest node on the main line that `id` descends from, or `id`
    /// itself when it is already on the main line.
    #[must_use]
    pub fn return_to_main_line(&self, id: NodeId) -> NodeId {
        let mut target = id;
        let mut current = id;
        while let Some(parent) = self.node(current).and_then(|n| n.parent) {
            if self.node(parent).and_then(|p| p.children.first()) != Some(&current) {
                target = parent;
            }
            current = parent;
        }
        target
    }

    /// Whether the main continuations of `a` and `b` end at the same leaf.
    #[must_use]
    pub fn is_same_line(&self, a: NodeId, b: NodeId) -> bool {
        let (Some(na), Some(nb)) = (self.node(a), self.node(b)) else {
            return false;
        };
        if na.parent == Some(b) {
            return nb.children.first() == Some(&a);
        }
        if nb.parent == Some(a) {
            return na.children.first() == Some(&b);
        }
        self.get_end(a) == self.get_end(b)
    }

    /// Every leaf under `id`, main line first.
    #[must_use]
    pub fn end_nodes(&self, id: NodeId) -> Vec<NodeId> {
        let mut ends = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.node(current) else {
                continue;
            };
            if node.children.is_empty() {
                ends.push(current);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        ends
    }

    /// SAN of the move into `id`, `"??"` at the root. Cached per node.
    #[must_use]
    pub fn nice_move(&self, id: NodeId) -> &str {
        let Some(node) = self.node(id) else {
            return "??";
        };
        node.nice_move.get_or_init(|| {
            match (node.mv, node.parent.and_then(|p| self.node(p))) {
                (Some(mv), Some(parent)) => parent.board.move_to_san(mv),
                _ => "??".to_string(),
            }
        })
    }

    /// Engine stats for the move into `id`, as recorded in the parent's table.
    #[must_use]
    pub fn stats(&self, id: NodeId) -> String {
        match self.node(id).and_then(|n| Some((n.mv?, self.node(n.parent?)?))) {
            Some((mv, parent)) => parent.table.stats_string(mv),
            None => String::new(),
        }
    }

    /// The movetext token for the move into `id`: a move number when one is
    /// needed, the SAN, and optionally a `{stats}` comment.
    ///
    /// A number is written for White's moves, the first move of the game, a
    /// move that starts a variation, or whenever `force_number` is set.
    #[must_use]
    pub fn token(&self, id: NodeId, include_stats: bool, force_number: bool) -> String {
        let Some(node) = self.node(id) else {
            return String::new();
        };
        let Some(parent) = node.parent.and_then(|p| self.node(p)) else {
            return String::new();
        };

        let needs_number = force_number
            || parent.is_root()
            || parent.board.active() == Color::White
            || parent.children.first() != Some(&id);

        let mut s = String::new();
        if needs_number {
            s.push_str(&parent.board.next_number_string());
            s.push(' ');
        }
        s.push_str(self.nice_move(id));

        if include_stats {
            let stats = self.stats(id);
            if !stats.is_empty() {
                s.push_str(" {");
                s.push_str(&stats);
                s.push('}');
            }
        }
        s
    }

    /// The subset of `moves` that are legal at `id`, in canonical form.
    #[must_use]
    pub fn validate_searchmoves<I, S>(&self, id: NodeId, moves: I) -> Vec<Move>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(node) = self.node(id) else {
            return Vec::new();
        };
        moves
            .into_iter()
            .filter_map(|s| node.board.parse_move(s.as_ref()).ok())
            .collect()
    }

    /// All live node ids in depth-first order, main line first.
    #[must_use]
    pub fn preorder(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.node(current) {
                order.push(current);
                stack.extend(node.children.iter().rev());
            }
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_reuses_children() {
        let mut tree = GameTree::new();
        let root = tree.root();
        let a = tree.play(root, "e2e4").unwrap();
        let b = tree.play(root, "e2e4").unwrap();
        assert_eq!(a, b);
        assert_eq!(tree.len(), 2);

        let mv = tree.board(root).unwrap().parse_move("e2e4").unwrap();
        let forced = tree.make_move(root, mv, true).unwrap();
        assert_ne!(forced, a);
        assert_eq!(tree.node(root).unwrap().children(), &[a, forced]);
    }

    #[test]
    fn test_return_to_main_line() {
        let mut tree = GameTree::new();
        let root = tree.root();
        let e4 = tree.play(root, "e2e4").unwrap();
        let e5 = tree.play(e4, "e7e5").unwrap();
        let c5 = tree.play(e4, "c7c5").unwrap();
        let nf3 = tree.play(c5, "g1f3").unwrap();
        let c3 = tree.play(c5, "c2c3").unwrap();
        let d5 = tree.play(c3, "d7d5").unwrap();
        let d4 = tree.play(root, "d2d4").unwrap();

        assert_eq!(tree.return_to_main_line(e5), e5);
        assert_eq!(tree.return_to_main_line(root), root);
        assert_eq!(tree.return_to_main_line(c5), e4);
        assert_eq!(tree.return_to_main_line(nf3), e4);
        assert_eq!(tree.return_to_main_line(d5), e4);
        assert_eq!(tree.return_to_main_line(d4), root);
        assert!(tree.is_main_line(tree.return_to_main_line(d5)));
    }

    #[test]
    fn test_child_board_matches_parent_move() {
        let mut tree = GameTree::new();
        let e4 = tree.play(tree.root(), "e2e4").unwrap();
        let c5 = tree.play_san(e4, "c5").unwrap();
        for id in [e4, c5] {
            let node = tree.node(id).unwrap();
            let parent = tree.node(node.parent().unwrap()).unwrap();
            assert_eq!(*node.board(), parent.board().make_move(node.mv().unwrap()));
        }
        assert_eq!(tree.node(c5).unwrap().depth(), 2);
    }

    #[test]
    fn test_illegal_move_rejected() {
        let mut tree = GameTree::new();
        let err = tree.play(tree.root(), "e2e5").unwrap_err();
        assert!(matches!(err, TreeError::IllegalMove(MoveError::NotPseudoLegal { .. })));
        assert!(matches!(tree.play_san(tree.root(), "Ke2"), Err(TreeError::BadSan(_))));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_history_and_lines() {
        let mut tree = GameTree::new();
        let root = tree.root();
        let e4 = tree.play(root, "e2e4").unwrap();
        let e5 = tree.play(e4, "e7e5").unwrap();
        let nf3 = tree.play(e5, "g1f3").unwrap();
        let c5 = tree.play(e4, "c7c5").unwrap();

        let line: Vec<String> = tree.history(nf3).iter().map(ToString::to_string).collect();
        assert_eq!(line, ["e2e4", "e7e5", "g1f3"]);
        assert_eq!(tree.node_history(nf3), vec![root, e4, e5, nf3]);
        assert_eq!(tree.get_end(root), nf3);
        assert_eq!(tree.future_history(e4).len(), 3);
        assert_eq!(tree.end_nodes(root), vec![nf3, c5]);
        assert!(tree.is_same_line(e4, e5));
        assert!(tree.is_same_line(root, nf3));
        assert!(!tree.is_same_line(e4, c5));
        assert_eq!(tree.preorder(root), vec![root, e4, e5, nf3, c5]);
    }

    #[test]
    fn test_detach_frees_subtree() {
        let mut tree = GameTree::new();
        let root = tree.root();
        let e4 = tree.play(root, "e2e4").unwrap();
        let e5 = tree.play(e4, "e7e5").unwrap();
        let d4 = tree.play(root, "d2d4").unwrap();

        assert_eq!(tree.detach(e4).unwrap(), root);
        assert_eq!(tree.len(), 2);
        assert!(tree.node(e4).is_none());
        assert!(tree.node(e5).is_none());
        assert_eq!(tree.node(root).unwrap().children(), &[d4]);
        assert!(matches!(tree.play(e5, "g1f3"), Err(TreeError::StaleNode(_))));

        // Reused slots get fresh handles
        let c4 = tree.play(root, "c2c4").unwrap();
        assert_ne!(c4, e4);
        assert_ne!(c4, e5);
        assert!(tree.node(e4).is_none());
        assert_eq!(tree.detach(root), Err(TreeError::DetachRoot));
    }

    #[test]
    fn test_tokens_and_numbers() {
        let mut tree = GameTree::new();
        let root = tree.root();
        let e4 = tree.play(root, "e2e4").unwrap();
        let e5 = tree.play(e4, "e7e5").unwrap();
        let c5 = tree.play(e4, "c7c5").unwrap();
        let nf3 = tree.play(e5, "g1f3").unwrap();

        assert_eq!(tree.token(e4, false, false), "1. e4");
        assert_eq!(tree.token(e5, false, false), "e5");
        assert_eq!(tree.token(c5, false, false), "1... c5");
        assert_eq!(tree.token(e5, false, true), "1... e5");
        assert_eq!(tree.token(nf3, false, false), "2. Nf3");
        assert_eq!(tree.token(root, false, false), "");
        assert_eq!(tree.nice_move(root), "??");
    }

    #[test]
    fn test_token_stats_from_parent_table() {
        let mut tree = GameTree::new();
        let root = tree.root();
        let e4 = tree.play(root, "e2e4").unwrap();
        let mv = tree.node(e4).unwrap().mv().unwrap();
        {
            let table = &mut tree.node_mut(root).unwrap().table;
            table.nodes = 100;
            let info = table.entry(mv);
            info.cp = Some(30);
            info.nodes = 50;
        }
        assert_eq!(tree.token(e4, true, false), "1. e4 {+0.30, N 50.0%}");
        assert_eq!(tree.token(e4, false, false), "1. e4");
        tree.clean();
        assert_eq!(tree.token(e4, true, false), "1. e4");
    }

    #[test]
    fn test_old_format_castling() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let mut tree = GameTree::with_board(board);
        let oo = tree.play(tree.root(), "e1g1").unwrap();
        assert_eq!(tree.node(oo).unwrap().mv().unwrap().to_string(), "e1h1");
        let ooo = tree.play(oo, "e8a8").unwrap();
        assert_eq!(tree.history_old_format(ooo), ["e1g1", "e8c8"]);
        assert_eq!(tree.nice_move(ooo), "O-O-O");
    }

    #[test]
    fn test_validate_searchmoves() {
        let tree = GameTree::new();
        let valid = tree.validate_searchmoves(tree.root(), ["e2e4", "e2e5", "zz", "g1f3"]);
        let text: Vec<String> = valid.iter().map(ToString::to_string).collect();
        assert_eq!(text, ["e2e4", "g1f3"]);
    }
}
