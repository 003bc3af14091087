use super::{Board, Color, Move, Piece, Square};

impl Board {
    /// Return the position after `mv`.
    ///
    /// The move is trusted: callers validate with [`Board::illegal`] or take
    /// it from [`Board::legal_moves`]. Castling must be given king-onto-rook.
    #[must_use]
    pub fn make_move(&self, mv: Move) -> Board {
        let mut next = *self;
        next.apply_move(mv);
        next
    }

    pub(crate) fn apply_move(&mut self, mv: Move) {
        let from = mv.from();
        let to = mv.to();
        let mover = self.get(from);
        let target = self.get(to);

        let is_pawn = matches!(mover, Some((_, Piece::Pawn)));
        let is_castle = matches!(
            (mover, target),
            (Some((c1, Piece::King)), Some((c2, Piece::Rook))) if c1 == c2
        );
        // Diagonal pawn moves onto an empty square are en passant captures
        let is_capture = (!is_castle && target.is_some()) || (is_pawn && from.file() != to.file());

        self.update_castling_rights(from, to, mover, target);

        if self.active == Color::Black {
            self.fullmove += 1;
        }
        if is_pawn || is_capture {
            self.halfmove = 0;
        } else {
            self.halfmove += 1;
        }

        if is_castle {
            let rank = from.rank();
            let (king_file, rook_file) = if to.file() > from.file() { (6, 5) } else { (2, 3) };
            self.set(from, None);
            self.set(to, None);
            self.set(Square(rank, king_file), mover);
            self.set(Square(rank, rook_file), target);
        } else {
            if is_pawn && is_capture && target.is_none() {
                self.set(Square(from.rank(), to.file()), None);
            }
            self.set(to, mover);
            self.set(from, None);
        }

        if is_pawn && (to.rank() == 0 || to.rank() == 7) {
            let promoted = mv.promotion().unwrap_or(Piece::Queen);
            let color = if to.rank() == 7 { Color::White } else { Color::Black };
            self.set(to, Some((color, promoted)));
        }

        self.active = self.active.opponent();

        if is_pawn && from.rank().abs_diff(to.rank()) == 2 {
            let passed = Square((from.rank() + to.rank()) / 2, from.file());
            self.maybe_set_en_passant(Some(passed));
        } else {
            self.en_passant = None;
        }
    }

    fn update_castling_rights(
        &mut self,
        from: Square,
        to: Square,
        mover: Option<(Color, Piece)>,
        target: Option<(Color, Piece)>,
    ) {
        match mover {
            Some((color, Piece::King)) if from.rank() == color.back_rank() => {
                self.castling.clear(color);
            }
            Some((color, Piece::Rook)) if from.rank() == color.back_rank() => {
                self.castling.remove(color, from.file());
            }
            _ => {}
        }
        if let Some((color, Piece::Rook)) = target {
            if to.rank() == color.back_rank() {
                self.castling.remove(color, to.file());
            }
        }
    }

    /// Set the en passant square only if some pawn of the side to move can
    /// capture there without exposing its own king. Expects `active` to be
    /// the capturing side already.
    pub(crate) fn maybe_set_en_passant(&mut self, square: Option<Square>) {
        self.en_passant = None;
        let Some(sq) = square else {
            return;
        };

        let capturer = self.active;
        let expected_rank = match capturer {
            Color::White => 5,
            Color::Black => 2,
        };
        if sq.rank() != expected_rank {
            return;
        }

        let back = -capturer.pawn_direction();
        for df in [-1, 1] {
            let Some(source) = sq.offset(back, df) else {
                continue;
            };
            if self.get(source) != Some((capturer, Piece::Pawn)) {
                continue;
            }
            // make_move does not read en_passant, so testing from self is sound
            let test = self.make_move(Move::new(source, sq));
            if !test.can_capture_king() {
                self.en_passant = Some(sq);
                return;
            }
        }
    }

    /// Convert a legacy king-two-squares castling move (`e1g1`) into the
    /// king-onto-rook form, unless the target file carries a right of its own.
    #[must_use]
    pub fn c960_castling_converter(&self, mv: Move) -> Move {
        if mv.is_promotion() {
            return mv;
        }
        for color in Color::BOTH {
            let rank = color.back_rank();
            let king_home = Square(rank, 4);
            if mv.from() != king_home || self.get(king_home) != Some((color, Piece::King)) {
                continue;
            }
            for (legacy_file, rook_file) in [(6, 7), (2, 0)] {
                if mv.to() == Square(rank, legacy_file) && !self.castling.has(color, legacy_file) {
                    return Move::new(king_home, Square(rank, rook_file));
                }
            }
        }
        mv
    }
}
