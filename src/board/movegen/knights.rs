use super::super::attack_tables::knight_targets;
use super::super::{Board, Move, MoveList, Square};

impl Board {
    pub(super) fn generate_knight_moves(&self, from: Square, moves: &mut MoveList) {
        for &to in knight_targets(from) {
            if self.color_at(to) != Some(self.active) {
                moves.push(Move::new(from, to));
            }
        }
    }
}
