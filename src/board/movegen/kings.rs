use super::super::{Board, Move, MoveList, Square};

/// Inclusive run of files from `a` to `b`, in either direction.
fn files_between(a: usize, b: usize) -> impl Iterator<Item = usize> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    lo..=hi
}

impl Board {
    /// Files of the rooks the side to move still has castling rights with.
    pub(crate) fn castling_target_files(&self) -> impl Iterator<Item = usize> {
        self.castling.files(self.active)
    }

    /// King-onto-rook castling moves for the side to move.
    ///
    /// Every square the king crosses, both ends included, must be safe, and
    /// both the king's and the rook's paths must be empty apart from the king
    /// and rook themselves.
    pub(super) fn generate_castling_moves(&self, moves: &mut MoveList) {
        let color = self.active;
        let king = self.king_square(color);
        let rank = king.rank();
        let king_file = king.file();

        for rook_file in self.castling_target_files() {
            let (king_dest, rook_dest) = if king_file < rook_file { (6, 5) } else { (2, 3) };

            let king_path_ok = files_between(king_file, king_dest).all(|file| {
                let sq = Square(rank, file);
                !self.attacked(color, sq)
                    && (file == king_file || file == rook_file || self.get(sq).is_none())
            });
            if !king_path_ok {
                continue;
            }

            let rook_path_ok = files_between(rook_file, rook_dest).all(|file| {
                file == king_file || file == rook_file || self.get(Square(rank, file)).is_none()
            });
            if rook_path_ok {
                moves.push(Move::new(king, Square(rank, rook_file)));
            }
        }
    }

    /// The nearest rights-permitted castling move on one side of the king.
    /// Only the rights and the king's position are consulted, so the result
    /// may still be illegal.
    pub(crate) fn propose_castling_move(&self, queenside: bool) -> Option<Move> {
        let king = self.king_square(self.active);
        let king_file = king.file();
        self.castling_target_files()
            .filter(|&file| {
                if queenside {
                    file < king_file
                } else {
                    file > king_file
                }
            })
            .min_by_key(|&file| file.abs_diff(king_file))
            .map(|file| Move::new(king, Square(king.rank(), file)))
    }
}
