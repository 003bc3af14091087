use once_cell::sync::Lazy;

use super::Square;

/// Rank/file deltas. The first four are orthogonal, the last four diagonal.
pub(crate) const DIRECTIONS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

pub(crate) const STRAIGHT: std::ops::Range<usize> = 0..4;
pub(crate) const DIAGONAL: std::ops::Range<usize> = 4..8;

const KNIGHT_DELTAS: [(isize, isize); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

/// `RAYS[sq][dir]` lists the squares from `sq` outwards in direction `dir`,
/// nearest first, stopping at the board edge.
pub(crate) static RAYS: Lazy<Vec<[Vec<Square>; 8]>> = Lazy::new(|| {
    (0..64)
        .map(|idx| {
            let origin = Square::from_index(idx);
            std::array::from_fn(|dir| {
                let (dr, df) = DIRECTIONS[dir];
                let mut ray = Vec::with_capacity(7);
                let mut cur = origin;
                while let Some(next) = cur.offset(dr, df) {
                    ray.push(next);
                    cur = next;
                }
                ray
            })
        })
        .collect()
});

pub(crate) static KNIGHT_TARGETS: Lazy<Vec<Vec<Square>>> = Lazy::new(|| {
    (0..64)
        .map(|idx| {
            let origin = Square::from_index(idx);
            KNIGHT_DELTAS
                .iter()
                .filter_map(|&(dr, df)| origin.offset(dr, df))
                .collect()
        })
        .collect()
});

#[inline]
pub(crate) fn ray(sq: Square, dir: usize) -> &'static [Square] {
    &RAYS[sq.as_index()][dir]
}

#[inline]
pub(crate) fn knight_targets(sq: Square) -> &'static [Square] {
    &KNIGHT_TARGETS[sq.as_index()]
}
