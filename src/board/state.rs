use std::fmt;

use super::{CastlingRights, Color, Piece, Square};

/// Contents of one square.
pub type Cell = Option<(Color, Piece)>;

/// A chess position.
///
/// `Board` is a small `Copy` value: a flat 64-cell array plus a handful of
/// scalars. Moving produces a new board, so earlier positions stay valid.
///
/// The cached king squares must match `squares`; all writes go through
/// [`Board::set`], which keeps them in step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    pub(crate) squares: [Cell; 64],
    pub(crate) active: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove: u32,
    pub(crate) fullmove: u32,
    pub(crate) normal_chess: bool,
    pub(crate) king_white: Square,
    pub(crate) king_black: Square,
}

pub(crate) const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub(crate) const BACK_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

impl Board {
    /// The standard starting position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Board::empty();
        for (file, piece) in BACK_RANK.iter().enumerate() {
            board.set(Square(0, file), Some((Color::White, *piece)));
            board.set(Square(7, file), Some((Color::Black, *piece)));
            board.set(Square(1, file), Some((Color::White, Piece::Pawn)));
            board.set(Square(6, file), Some((Color::Black, Piece::Pawn)));
        }
        board.castling = CastlingRights::standard();
        board.normal_chess = true;
        board
    }

    pub(crate) fn empty() -> Self {
        Board {
            squares: [None; 64],
            active: Color::White,
            castling: CastlingRights::none(),
            en_passant: None,
            halfmove: 0,
            fullmove: 1,
            normal_chess: false,
            king_white: Square(0, 4),
            king_black: Square(7, 4),
        }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, sq: Square) -> Cell {
        self.squares[sq.as_index()]
    }

    /// Write a cell. Writing a king also moves the cached king square.
    #[inline]
    pub fn set(&mut self, sq: Square, cell: Cell) {
        self.squares[sq.as_index()] = cell;
        match cell {
            Some((Color::White, Piece::King)) => self.king_white = sq,
            Some((Color::Black, Piece::King)) => self.king_black = sq,
            _ => {}
        }
    }

    #[inline]
    #[must_use]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        self.get(sq).map(|(color, _)| color)
    }

    #[inline]
    #[must_use]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.get(sq).map(|(_, piece)| piece)
    }

    #[inline]
    #[must_use]
    pub fn active(&self) -> Color {
        self.active
    }

    #[inline]
    #[must_use]
    pub fn inactive(&self) -> Color {
        self.active.opponent()
    }

    #[must_use]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[must_use]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[must_use]
    pub fn halfmove(&self) -> u32 {
        self.halfmove
    }

    #[must_use]
    pub fn fullmove(&self) -> u32 {
        self.fullmove
    }

    /// True when the castling rights and king placement fit standard chess.
    #[must_use]
    pub fn normal_chess(&self) -> bool {
        self.normal_chess
    }

    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        match color {
            Color::White => self.king_white,
            Color::Black => self.king_black,
        }
    }

    /// Squares holding `piece` of `color` inside the inclusive file and rank
    /// ranges. Out-of-range bounds are clamped to the board.
    #[must_use]
    pub fn find(
        &self,
        color: Color,
        piece: Piece,
        files: std::ops::RangeInclusive<usize>,
        ranks: std::ops::RangeInclusive<usize>,
    ) -> Vec<Square> {
        let (f0, f1) = ((*files.start()).min(7), (*files.end()).min(7));
        let (r0, r1) = ((*ranks.start()).min(7), (*ranks.end()).min(7));
        let mut found = Vec::new();
        for file in f0..=f1 {
            for rank in r0..=r1 {
                let sq = Square(rank, file);
                if self.get(sq) == Some((color, piece)) {
                    found.push(sq);
                }
            }
        }
        found
    }

    /// Same placement, side to move, castling rights and en passant square.
    /// Move counters are ignored.
    #[must_use]
    pub fn same_position(&self, other: &Board) -> bool {
        self.active == other.active
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.squares == other.squares
    }

    /// `"12."` when White is to move, `"12..."` otherwise.
    #[must_use]
    pub fn next_number_string(&self) -> String {
        match self.active {
            Color::White => format!("{}.", self.fullmove),
            Color::Black => format!("{}...", self.fullmove),
        }
    }

    /// True when neither side can possibly mate: no queens, rooks or pawns,
    /// and at most one minor piece on the whole board.
    #[must_use]
    pub fn insufficient_material(&self) -> bool {
        let mut minors = 0;
        for cell in self.squares.iter().flatten() {
            match cell.1 {
                Piece::Queen | Piece::Rook | Piece::Pawn => return false,
                Piece::Bishop | Piece::Knight => {
                    minors += 1;
                    if minors >= 2 {
                        return false;
                    }
                }
                Piece::King => {}
            }
        }
        true
    }

    /// Text diagram, rank 8 first, followed by the FEN.
    #[must_use]
    pub fn graphic(&self) -> String {
        let mut out = String::new();
        for rank in (0..8).rev() {
            let row: Vec<String> = (0..8)
                .map(|file| match self.get(Square(rank, file)) {
                    Some((color, piece)) => piece.to_fen_char(color).to_string(),
                    None => ".".to_string(),
                })
                .collect();
            out.push_str(&row.join(" "));
            if rank == 0 {
                out.push_str("  ");
                out.push_str(&self.fen(false));
            }
            out.push('\n');
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen(true))
    }
}
