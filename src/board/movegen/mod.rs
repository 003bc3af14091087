mod kings;
mod knights;
mod pawns;
mod sliders;

use super::attack_tables::{knight_targets, ray, DIAGONAL, DIRECTIONS, STRAIGHT};
use super::{Board, Color, Move, MoveError, MoveList, Piece, Square};

impl Board {
    /// Pseudo-legal moves for whatever stands on `from`. Empty unless it is a
    /// piece of the side to move. Castling is included for kings.
    #[must_use]
    pub fn pseudolegals(&self, from: Square) -> MoveList {
        let mut moves = MoveList::new();
        self.add_pseudolegals(from, &mut moves);
        moves
    }

    fn add_pseudolegals(&self, from: Square, moves: &mut MoveList) {
        let piece = match self.get(from) {
            Some((color, piece)) if color == self.active => piece,
            _ => return,
        };
        match piece {
            Piece::Pawn => self.generate_pawn_moves(from, moves),
            Piece::Knight => self.generate_knight_moves(from, moves),
            Piece::Bishop => self.generate_sliding_moves(from, DIAGONAL, moves),
            Piece::Rook => self.generate_sliding_moves(from, STRAIGHT, moves),
            Piece::Queen => self.generate_sliding_moves(from, 0..8, moves),
            Piece::King => {
                self.generate_king_steps(from, moves);
                self.generate_castling_moves(moves);
            }
        }
    }

    fn generate_pseudo_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        for idx in 0..64 {
            self.add_pseudolegals(Square::from_index(idx), &mut moves);
        }
        moves
    }

    /// All legal moves for the side to move.
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        let mut legal = MoveList::new();
        for mv in self.generate_pseudo_moves() {
            if !self.make_move(mv).can_capture_king() {
                legal.push(mv);
            }
        }
        legal
    }

    /// True when the side to move has no legal move (mate or stalemate).
    #[must_use]
    pub fn no_moves(&self) -> bool {
        !self
            .generate_pseudo_moves()
            .iter()
            .any(|&mv| !self.make_move(mv).can_capture_king())
    }

    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.king_in_check() && self.no_moves()
    }

    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        !self.king_in_check() && self.no_moves()
    }

    /// Why the UCI move string cannot be played here, or `None` if it can.
    ///
    /// Checks the string shape, then membership in the source square's
    /// pseudo-legal list, then king safety after the move.
    #[must_use]
    pub fn illegal(&self, notation: &str) -> Option<MoveError> {
        if !notation.is_ascii() || notation.len() < 4 || notation.len() > 5 {
            return Some(MoveError::WrongLength {
                notation: notation.to_string(),
            });
        }
        if notation[0..2].parse::<Square>().is_err() {
            return Some(MoveError::InvalidSource {
                notation: notation.to_string(),
            });
        }
        // A bad target or promotion letter can never be in the pseudo-legal list
        match notation.parse::<Move>() {
            Ok(mv) => self.illegal_move(mv),
            Err(_) => Some(MoveError::NotPseudoLegal {
                notation: notation.to_string(),
            }),
        }
    }

    /// Same as [`Board::illegal`] for an already parsed move.
    #[must_use]
    pub fn illegal_move(&self, mv: Move) -> Option<MoveError> {
        if !self.pseudolegals(mv.from()).contains(mv) {
            return Some(MoveError::NotPseudoLegal {
                notation: mv.to_string(),
            });
        }
        if self.make_move(mv).can_capture_king() {
            return Some(MoveError::LeavesKingInCheck {
                notation: mv.to_string(),
            });
        }
        None
    }

    #[inline]
    #[must_use]
    pub fn is_legal(&self, mv: Move) -> bool {
        self.illegal_move(mv).is_none()
    }

    /// Play a sequence of UCI strings from this position and report the first
    /// one that fails.
    pub fn sequence_illegal<I, S>(&self, moves: I) -> Option<MoveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut pos = *self;
        for s in moves {
            let s = s.as_ref();
            if let Some(reason) = pos.illegal(s) {
                return Some(reason);
            }
            match s.parse::<Move>() {
                Ok(mv) => pos = pos.make_move(mv),
                Err(e) => return Some(e),
            }
        }
        None
    }

    /// Is `sq` attacked by the opponent of `defender`?
    ///
    /// Takes the defending color explicitly so that empty squares on a
    /// castling king's path can be tested.
    #[must_use]
    pub fn attacked(&self, defender: Color, sq: Square) -> bool {
        let attacker = defender.opponent();

        for dir in STRAIGHT {
            for (dist, &target) in ray(sq, dir).iter().enumerate() {
                if let Some((color, piece)) = self.get(target) {
                    if color == attacker
                        && (piece.attacks_straight() || (piece == Piece::King && dist == 0))
                    {
                        return true;
                    }
                    break;
                }
            }
        }

        for dir in DIAGONAL {
            for (dist, &target) in ray(sq, dir).iter().enumerate() {
                if let Some((color, piece)) = self.get(target) {
                    if color == attacker {
                        if piece.attacks_diagonally() {
                            return true;
                        }
                        if dist == 0 {
                            if piece == Piece::King {
                                return true;
                            }
                            // A pawn only attacks forwards, so it must sit
                            // behind `sq` from its own point of view.
                            if piece == Piece::Pawn
                                && DIRECTIONS[dir].0 == -attacker.pawn_direction()
                            {
                                return true;
                            }
                        }
                    }
                    break;
                }
            }
        }

        knight_targets(sq)
            .iter()
            .any(|&target| self.get(target) == Some((attacker, Piece::Knight)))
    }

    #[inline]
    #[must_use]
    pub fn king_in_check(&self) -> bool {
        self.attacked(self.active, self.king_square(self.active))
    }

    /// The side to move could take the enemy king, i.e. the previous move was
    /// illegal.
    #[inline]
    pub(crate) fn can_capture_king(&self) -> bool {
        let inactive = self.inactive();
        self.attacked(inactive, self.king_square(inactive))
    }

    /// Leaf count of the legal move tree to `depth`.
    #[must_use]
    pub fn perft(&self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        moves
            .iter()
            .map(|&mv| self.make_move(mv).perft(depth - 1))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    #[test]
    fn test_start_position_has_twenty_moves() {
        assert_eq!(Board::new().legal_moves().len(), 20);
    }

    #[test]
    fn test_pawn_attacks_forward_only() {
        // White pawn on e4 attacks d5 and f5, not d3
        let b = board("4k3/8/8/8/4P3/8/8/4K3 b - - 0 1");
        assert!(b.attacked(Color::Black, "d5".parse().unwrap()));
        assert!(b.attacked(Color::Black, "f5".parse().unwrap()));
        assert!(!b.attacked(Color::Black, "d3".parse().unwrap()));
        assert!(!b.attacked(Color::Black, "e5".parse().unwrap()));
    }

    #[test]
    fn test_slider_blocked() {
        let b = board("4k3/8/8/8/8/8/8/R2nK3 w - - 0 1");
        assert!(b.attacked(Color::Black, "d1".parse().unwrap()));
        assert!(!b.attacked(Color::Black, "f1".parse().unwrap()));
        assert!(b.attacked(Color::Black, "a8".parse().unwrap()));
    }

    #[test]
    fn test_illegal_reasons() {
        let b = Board::new();
        assert_eq!(b.illegal("e2e4"), None);
        assert!(matches!(b.illegal("e2"), Some(MoveError::WrongLength { .. })));
        assert!(matches!(b.illegal("z2e4"), Some(MoveError::InvalidSource { .. })));
        assert!(matches!(b.illegal("e2e5"), Some(MoveError::NotPseudoLegal { .. })));
        assert!(matches!(b.illegal("e7e5"), Some(MoveError::NotPseudoLegal { .. })));

        let pinned = board("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1");
        assert!(matches!(
            pinned.illegal("e2d3"),
            Some(MoveError::LeavesKingInCheck { .. })
        ));
    }

    #[test]
    fn test_sequence_illegal() {
        let b = Board::new();
        assert_eq!(b.sequence_illegal(["e2e4", "e7e5", "g1f3"]), None);
        let err = b.sequence_illegal(["e2e4", "e2e4"]).unwrap();
        assert_eq!(err.to_string(), "e2e4 not even pseudolegal");
    }

    #[test]
    fn test_fools_mate_is_checkmate() {
        let mut b = Board::new();
        for s in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            b = b.make_move(s.parse().unwrap());
        }
        assert!(b.king_in_check());
        assert!(b.no_moves());
        assert!(b.is_checkmate());
        assert!(!b.is_stalemate());
    }

    #[test]
    fn test_stalemate() {
        let b = board("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(b.is_stalemate());
    }

    #[test]
    fn test_promotion_requires_suffix() {
        let b = board("8/P3k3/8/8/8/8/8/4K3 w - - 0 1");
        assert!(matches!(b.illegal("a7a8"), Some(MoveError::NotPseudoLegal { .. })));
        assert_eq!(b.illegal("a7a8q"), None);
        assert_eq!(b.illegal("a7a8n"), None);
        let promos = b.pseudolegals("a7".parse().unwrap());
        assert_eq!(promos.len(), 4);
    }
}
