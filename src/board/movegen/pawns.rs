use super::super::{Board, Move, MoveList, Square, PROMOTION_PIECES};

fn push_promotions(moves: &mut MoveList, from: Square, to: Square) {
    for piece in PROMOTION_PIECES {
        moves.push(Move::new_promotion(from, to, piece));
    }
}

impl Board {
    pub(super) fn generate_pawn_moves(&self, from: Square, moves: &mut MoveList) {
        let color = self.active;
        let dir = color.pawn_direction();
        // Pawns never stand on either back rank, so one step ahead exists
        let Some(ahead) = from.offset(dir, 0) else {
            return;
        };
        let promotes = ahead.rank() == color.pawn_promotion_rank();

        if self.get(ahead).is_none() {
            if promotes {
                push_promotions(moves, from, ahead);
            } else {
                moves.push(Move::new(from, ahead));
                if from.rank() == color.pawn_start_rank() {
                    if let Some(two) = ahead.offset(dir, 0) {
                        if self.get(two).is_none() {
                            moves.push(Move::new(from, two));
                        }
                    }
                }
            }
        }

        for df in [-1, 1] {
            let Some(target) = from.offset(dir, df) else {
                continue;
            };
            if Some(target) == self.en_passant {
                moves.push(Move::new(from, target));
            } else if self.color_at(target) == Some(color.opponent()) {
                if promotes {
                    push_promotions(moves, from, target);
                } else {
                    moves.push(Move::new(from, target));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_push_from_start_only() {
        let board = Board::new();
        let moves = board.pseudolegals("e2".parse().unwrap());
        assert_eq!(moves.len(), 2);
        let board = Board::from_fen("4k3/8/8/8/8/4P3/8/4K3 w - - 0 1").unwrap();
        assert_eq!(board.pseudolegals("e3".parse().unwrap()).len(), 1);
    }

    #[test]
    fn test_blocked_pawn_has_no_push() {
        let board = Board::from_fen("4k3/8/8/8/4p3/4P3/8/4K3 w - - 0 1").unwrap();
        assert!(board.pseudolegals("e3".parse().unwrap()).is_empty());
    }

    #[test]
    fn test_capture_promotions() {
        let board = Board::from_fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = board.pseudolegals("a7".parse().unwrap());
        // four pushes, four captures on b8
        assert_eq!(moves.len(), 8);
        assert!(moves.contains("a7b8n".parse().unwrap()));
    }

    #[test]
    fn test_en_passant_capture_generated() {
        let board =
            Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert!(board
            .pseudolegals("e5".parse().unwrap())
            .contains("e5d6".parse().unwrap()));
    }
}
