//! Arena entries and their handles.

use std::fmt;

use once_cell::unsync::OnceCell;

use super::analysis::AnalysisTable;
use super::terminal::TerminalReason;
use crate::board::{Board, Move};

/// Handle to a node in a [`GameTree`](super::GameTree).
///
/// Carries the generation of the slot it was issued for, so a handle to a
/// node that has since been detached is rejected instead of silently pointing
/// at whatever reused the slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.index, self.generation)
    }
}

/// One position in the game tree: the board after `mv` was played from the
/// parent. The first child continues the main line.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) board: Board,
    pub(crate) parent: Option<NodeId>,
    pub(crate) mv: Option<Move>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) depth: u32,
    /// Engine output for the moves available from this position.
    pub table: AnalysisTable,
    /// Moves the engine should restrict its search to; empty means all.
    pub searchmoves: Vec<Move>,
    pub(crate) nice_move: OnceCell<String>,
    pub(crate) terminal: OnceCell<Option<TerminalReason>>,
}

impl Node {
    pub(crate) fn new(board: Board, parent: Option<NodeId>, mv: Option<Move>, depth: u32) -> Self {
        Node {
            board,
            parent,
            mv,
            children: Vec::new(),
            depth,
            table: AnalysisTable::new(),
            searchmoves: Vec::new(),
            nice_move: OnceCell::new(),
            terminal: OnceCell::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The move that led here; `None` only at the root.
    #[inline]
    #[must_use]
    pub fn mv(&self) -> Option<Move> {
        self.mv
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Plies from the root.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Arena slot. The generation is bumped every time the slot is freed.
#[derive(Clone, Debug)]
pub(crate) struct Slot {
    pub(crate) generation: u32,
    pub(crate) node: Option<Node>,
}
