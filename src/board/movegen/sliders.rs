use std::ops::Range;

use super::super::attack_tables::ray;
use super::super::{Board, Move, MoveList, Square};

impl Board {
    /// Walk each ray in `dirs` until the edge, a friendly piece (excluded)
    /// or an enemy piece (included).
    pub(super) fn generate_sliding_moves(
        &self,
        from: Square,
        dirs: Range<usize>,
        moves: &mut MoveList,
    ) {
        for dir in dirs {
            for &to in ray(from, dir) {
                match self.color_at(to) {
                    None => moves.push(Move::new(from, to)),
                    Some(color) => {
                        if color != self.active {
                            moves.push(Move::new(from, to));
                        }
                        break;
                    }
                }
            }
        }
    }

    /// One step in every direction. Castling is generated separately.
    pub(super) fn generate_king_steps(&self, from: Square, moves: &mut MoveList) {
        for dir in 0..8 {
            if let Some(&to) = ray(from, dir).first() {
                if self.color_at(to) != Some(self.active) {
                    moves.push(Move::new(from, to));
                }
            }
        }
    }
}
