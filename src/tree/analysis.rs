//! Per-node engine analysis.

use std::collections::HashMap;

use crate::board::{Board, Move};

/// What the engine has said about one candidate move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveInfo {
    /// Centipawns from the mover's point of view.
    pub cp: Option<i32>,
    /// Moves to mate, negative when the mover is being mated.
    pub mate: Option<i32>,
    pub depth: u32,
    /// Visits or nodes spent on this move.
    pub nodes: u64,
    /// Principal variation starting with the move itself.
    pub pv: Vec<Move>,
}

impl MoveInfo {
    /// Short stat strings for PGN comments, e.g. `["+0.35", "d 12", "N 41.2%"]`.
    /// Empty when the engine never reported on the move.
    #[must_use]
    pub fn stats_list(&self, total_nodes: u64) -> Vec<String> {
        let mut stats = Vec::new();
        if let Some(mate) = self.mate {
            stats.push(format!("M{mate}"));
        } else if let Some(cp) = self.cp {
            stats.push(format!("{:+.2}", f64::from(cp) / 100.0));
        }
        if self.depth > 0 {
            stats.push(format!("d {}", self.depth));
        }
        if self.nodes > 0 && total_nodes > 0 {
            let share = self.nodes as f64 * 100.0 / total_nodes as f64;
            stats.push(format!("N {share:.1}%"));
        }
        stats
    }
}

/// Engine output attached to a tree node, keyed by the move it concerns.
#[derive(Clone, Debug, Default)]
pub struct AnalysisTable {
    moveinfo: HashMap<Move, MoveInfo>,
    /// Total nodes reported for the position.
    pub nodes: u64,
}

impl AnalysisTable {
    #[must_use]
    pub fn new() -> Self {
        AnalysisTable::default()
    }

    pub fn clear(&mut self) {
        self.moveinfo.clear();
        self.nodes = 0;
    }

    #[must_use]
    pub fn get(&self, mv: Move) -> Option<&MoveInfo> {
        self.moveinfo.get(&mv)
    }

    /// Entry for `mv`, created empty if absent.
    pub fn entry(&mut self, mv: Move) -> &mut MoveInfo {
        self.moveinfo.entry(mv).or_insert_with(|| MoveInfo {
            pv: vec![mv],
            ..MoveInfo::default()
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moveinfo.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moveinfo.is_empty()
    }

    /// Create an empty entry for every legal move of `board`.
    pub fn autopopulate(&mut self, board: &Board) {
        for &mv in board.legal_moves().iter() {
            self.entry(mv);
        }
    }

    /// The comment text written after a move in PGN output.
    #[must_use]
    pub fn stats_string(&self, mv: Move) -> String {
        self.get(mv)
            .map(|info| info.stats_list(self.nodes).join(", "))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_formatting() {
        let info = MoveInfo {
            cp: Some(35),
            depth: 12,
            nodes: 250,
            ..MoveInfo::default()
        };
        assert_eq!(info.stats_list(1000), vec!["+0.35", "d 12", "N 25.0%"]);
        let mate = MoveInfo {
            mate: Some(-3),
            cp: Some(-900),
            ..MoveInfo::default()
        };
        assert_eq!(mate.stats_list(0), vec!["M-3"]);
    }

    #[test]
    fn test_autopopulate_and_clear() {
        let mut table = AnalysisTable::new();
        table.autopopulate(&Board::new());
        assert_eq!(table.len(), 20);
        let e4: Move = "e2e4".parse().unwrap();
        assert_eq!(table.get(e4).unwrap().pv, vec![e4]);
        assert_eq!(table.stats_string(e4), "");
        table.clear();
        assert!(table.is_empty());
    }
}
