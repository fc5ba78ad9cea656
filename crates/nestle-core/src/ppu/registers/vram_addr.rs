//! The 15-bit `v`/`t` address used by the "loopy" scroll model.
//!
//! ```text
//! yyy NN YYYYY XXXXX
//! ||| || ||||| +++++-- coarse X
//! ||| || +++++-------- coarse Y
//! ||| ++-------------- nametable select
//! +++----------------- fine Y
//! ```

use core::fmt;

use crate::memory::ppu as ppu_mem;

const COARSE_X: u16 = 0x001F;
const COARSE_Y: u16 = 0x03E0;
const NAMETABLE_X: u16 = 0x0400;
const NAMETABLE_Y: u16 = 0x0800;
const NAMETABLE: u16 = NAMETABLE_X | NAMETABLE_Y;
const FINE_Y: u16 = 0x7000;
const ADDR_BITS: u16 = 0x7FFF;

/// Bits copied from `t` at dot 257.
const HORIZONTAL: u16 = NAMETABLE_X | COARSE_X;
/// Bits copied from `t` during dots 280-304 of the pre-render line.
const VERTICAL: u16 = FINE_Y | NAMETABLE_Y | COARSE_Y;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct VramAddr(u16);

impl VramAddr {
    pub(crate) fn raw(self) -> u16 {
        self.0
    }

    pub(crate) fn set_raw(&mut self, value: u16) {
        self.0 = value & ADDR_BITS;
    }

    pub(crate) fn coarse_x(self) -> u16 {
        self.0 & COARSE_X
    }

    pub(crate) fn coarse_y(self) -> u16 {
        (self.0 & COARSE_Y) >> 5
    }

    pub(crate) fn fine_y(self) -> u16 {
        (self.0 & FINE_Y) >> 12
    }

    pub(crate) fn set_nametable(&mut self, index: u8) {
        self.0 = (self.0 & !NAMETABLE) | ((u16::from(index) & 0x03) << 10);
    }

    pub(crate) fn set_coarse_x(&mut self, value: u8) {
        self.0 = (self.0 & !COARSE_X) | (u16::from(value) & 0x1F);
    }

    pub(crate) fn set_coarse_y(&mut self, value: u8) {
        self.0 = (self.0 & !COARSE_Y) | ((u16::from(value) & 0x1F) << 5);
    }

    pub(crate) fn set_fine_y(&mut self, value: u8) {
        self.0 = (self.0 & !FINE_Y) | ((u16::from(value) & 0x07) << 12);
    }

    /// Writes the high six bits of the address through `$2006`; bit 14 is
    /// cleared.
    pub(crate) fn set_high_byte(&mut self, value: u8) {
        self.0 = (self.0 & 0x00FF) | ((u16::from(value) & 0x3F) << 8);
    }

    pub(crate) fn set_low_byte(&mut self, value: u8) {
        self.0 = (self.0 & 0x7F00) | u16::from(value);
    }

    /// Post-access step of a `$2007` access.
    pub(crate) fn advance(&mut self, step: u16) {
        self.0 = self.0.wrapping_add(step) & ADDR_BITS;
    }

    /// Moves to the next tile column, switching horizontal nametable at 31.
    pub(crate) fn increment_coarse_x(&mut self) {
        if self.coarse_x() == 31 {
            self.0 &= !COARSE_X;
            self.0 ^= NAMETABLE_X;
        } else {
            self.0 += 1;
        }
    }

    /// Moves to the next pixel row.
    ///
    /// Row 29 is the last tile row of a nametable and flips the vertical
    /// nametable. Rows 30 and 31 are attribute memory; leaving 31 wraps to 0
    /// without the flip.
    pub(crate) fn increment_y(&mut self) {
        if self.fine_y() < 7 {
            self.0 += 0x1000;
            return;
        }
        self.0 &= !FINE_Y;
        match self.coarse_y() {
            29 => {
                self.set_coarse_y(0);
                self.0 ^= NAMETABLE_Y;
            }
            31 => self.set_coarse_y(0),
            y => self.set_coarse_y((y + 1) as u8),
        }
    }

    pub(crate) fn copy_horizontal(&mut self, t: VramAddr) {
        self.0 = (self.0 & !HORIZONTAL) | (t.0 & HORIZONTAL);
    }

    pub(crate) fn copy_vertical(&mut self, t: VramAddr) {
        self.0 = (self.0 & !VERTICAL) | (t.0 & VERTICAL);
    }

    pub(crate) fn tile_addr(self) -> u16 {
        ppu_mem::NAMETABLE_BASE | (self.0 & 0x0FFF)
    }

    pub(crate) fn attribute_addr(self) -> u16 {
        ppu_mem::NAMETABLE_BASE
            | ppu_mem::ATTRIBUTE_OFFSET
            | (self.0 & NAMETABLE)
            | ((self.0 >> 4) & 0x38)
            | ((self.0 >> 2) & 0x07)
    }

    /// Shift that selects this tile's quadrant within an attribute byte.
    pub(crate) fn attribute_shift(self) -> u8 {
        (((self.coarse_y() & 0x02) << 1) | (self.coarse_x() & 0x02)) as u8
    }
}

impl fmt::Debug for VramAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VramAddr")
            .field("raw", &format_args!("{:#06X}", self.0))
            .field("coarse_x", &self.coarse_x())
            .field("coarse_y", &self.coarse_y())
            .field("nametable", &((self.0 & NAMETABLE) >> 10))
            .field("fine_y", &self.fine_y())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(raw: u16) -> VramAddr {
        let mut v = VramAddr::default();
        v.set_raw(raw);
        v
    }

    #[test]
    fn coarse_x_wraps_into_next_nametable() {
        let mut v = addr(0x001F);
        v.increment_coarse_x();
        assert_eq!(v.raw(), 0x0400);
        v.set_raw(0x041F);
        v.increment_coarse_x();
        assert_eq!(v.raw(), 0x0000);
    }

    #[test]
    fn increment_y_walks_fine_then_coarse() {
        let mut v = addr(0x0000);
        v.increment_y();
        assert_eq!(v.fine_y(), 1);
        v.set_raw(0x7000);
        v.increment_y();
        assert_eq!(v.fine_y(), 0);
        assert_eq!(v.coarse_y(), 1);
    }

    #[test]
    fn increment_y_flips_nametable_only_from_row_29() {
        let mut v = addr(0x7000 | (29 << 5));
        v.increment_y();
        assert_eq!(v.coarse_y(), 0);
        assert_eq!(v.raw() & NAMETABLE_Y, NAMETABLE_Y);

        let mut v = addr(0x7000 | (31 << 5));
        v.increment_y();
        assert_eq!(v.coarse_y(), 0);
        assert_eq!(v.raw() & NAMETABLE_Y, 0);
    }

    #[test]
    fn attribute_address_and_shift() {
        // coarse x 5, coarse y 10, nametable 1
        let v = addr(0x0400 | (10 << 5) | 5);
        assert_eq!(v.attribute_addr(), 0x27C0 | (2 << 3) | 1);
        assert_eq!(v.attribute_shift(), 4);
        assert_eq!(v.tile_addr(), 0x2400 | (10 << 5) | 5);
    }

    #[test]
    fn copies_take_only_their_bits() {
        let t = addr(0x7FFF);
        let mut v = addr(0);
        v.copy_horizontal(t);
        assert_eq!(v.raw(), 0x041F);
        let mut v = addr(0);
        v.copy_vertical(t);
        assert_eq!(v.raw(), 0x7BE0);
    }
}
