//! Castling rights type.
//!
//! Rights are tracked per rook origin file rather than per side, which covers
//! Chess960 starting positions as well as the standard one. Bits 0-7 are the
//! white files A-H, bits 8-15 the black files a-h.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;

const WHITE_MASK: u16 = 0x00FF;
const BLACK_MASK: u16 = 0xFF00;

/// Castling rights represented as a bitmask
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u16);

impl CastlingRights {
    /// No castling rights
    #[must_use]
    pub const fn none() -> Self {
        CastlingRights(0)
    }

    /// Rights on the a- and h-files for both colors
    #[must_use]
    pub const fn standard() -> Self {
        CastlingRights(0x8181)
    }

    #[inline]
    const fn bit_for(color: Color, file: usize) -> u16 {
        match color {
            Color::White => 1 << file,
            Color::Black => 1 << (8 + file),
        }
    }

    /// Check whether the rook on `file` of `color`'s back rank carries a right
    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, file: usize) -> bool {
        self.0 & Self::bit_for(color, file) != 0
    }

    /// Set a specific castling right
    #[inline]
    pub fn set(&mut self, color: Color, file: usize) {
        self.0 |= Self::bit_for(color, file);
    }

    /// Remove a specific castling right
    #[inline]
    pub fn remove(&mut self, color: Color, file: usize) {
        self.0 &= !Self::bit_for(color, file);
    }

    /// Remove every right belonging to `color`
    #[inline]
    pub fn clear(&mut self, color: Color) {
        self.0 &= match color {
            Color::White => BLACK_MASK,
            Color::Black => WHITE_MASK,
        };
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Files (0-7) with a right for `color`, in ascending order
    pub fn files(self, color: Color) -> impl Iterator<Item = usize> {
        (0..8).filter(move |&file| self.has(color, file))
    }

    /// Classic `KQkq` rendering. Only meaningful when every right is on an
    /// a- or h-file rook; inner-file rights are dropped.
    #[must_use]
    pub fn to_classic_string(self) -> String {
        let mut s = String::new();
        if self.has(Color::White, 7) {
            s.push('K');
        }
        if self.has(Color::White, 0) {
            s.push('Q');
        }
        if self.has(Color::Black, 7) {
            s.push('k');
        }
        if self.has(Color::Black, 0) {
            s.push('q');
        }
        if s.is_empty() {
            s.push('-');
        }
        s
    }
}

/// Shredder-style rendering in `ABCDEFGHabcdefgh` order, `-` when empty.
impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for file in self.files(Color::White) {
            write!(f, "{}", (b'A' + file as u8) as char)?;
        }
        for file in self.files(Color::Black) {
            write!(f, "{}", (b'a' + file as u8) as char)?;
        }
        Ok(())
    }
}
