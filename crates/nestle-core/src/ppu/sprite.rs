use bitflags::bitflags;

use crate::memory::ppu as ppu_mem;

bitflags! {
    /// Attribute byte (OAM byte 2).
    ///
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// V H P . . . p p
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub(crate) struct SpriteAttributes: u8 {
        const PALETTE = 0b0000_0011;
        /// Drawn behind opaque background pixels.
        const BEHIND_BACKGROUND = 0b0010_0000;
        const FLIP_HORIZONTAL = 0b0100_0000;
        const FLIP_VERTICAL = 0b1000_0000;
    }
}

impl SpriteAttributes {
    pub(crate) fn palette(self) -> u8 {
        (self & SpriteAttributes::PALETTE).bits()
    }
}

pub(crate) const BYTES_PER_SPRITE: usize = 4;
const MAX_SPRITES_PER_LINE: usize = ppu_mem::SECONDARY_OAM_SIZE / BYTES_PER_SPRITE;
const SPRITE_COUNT: usize = ppu_mem::OAM_SIZE / BYTES_PER_SPRITE;

/// One decoded OAM entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Sprite {
    pub(crate) y: u8,
    pub(crate) tile: u8,
    pub(crate) attributes: SpriteAttributes,
    pub(crate) x: u8,
}

impl Sprite {
    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            y: bytes[0],
            tile: bytes[1],
            attributes: SpriteAttributes::from_bits_retain(bytes[2]),
            x: bytes[3],
        }
    }

    /// Pattern address of the low bitplane for `row` (0-based, before
    /// vertical flip) within a sprite of the given height.
    ///
    /// 8x16 sprites ignore PPUCTRL's table select: bit 0 of the tile number
    /// picks the table and the top half uses the even tile.
    pub(crate) fn pattern_addr(self, row: u8, height: u8, table_8x8: u16) -> u16 {
        let row = if self.attributes.contains(SpriteAttributes::FLIP_VERTICAL) {
            height - 1 - row
        } else {
            row
        };
        if height == 16 {
            let table = if self.tile & 1 != 0 {
                ppu_mem::PATTERN_TABLE_1
            } else {
                ppu_mem::PATTERN_TABLE_0
            };
            let tile = u16::from(self.tile & 0xFE) + u16::from(row >> 3);
            table | (tile << 4) | u16::from(row & 0x07)
        } else {
            table_8x8 | (u16::from(self.tile) << 4) | u16::from(row)
        }
    }
}

/// Row of `sprite_y` covering `scanline`, if any.
pub(crate) fn row_on_line(sprite_y: u8, scanline: u16, height: u8) -> Option<u8> {
    let row = scanline.checked_sub(u16::from(sprite_y))?;
    (row < u16::from(height)).then_some(row as u8)
}

/// Sprites picked for the next scanline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SecondaryOam {
    bytes: [u8; ppu_mem::SECONDARY_OAM_SIZE],
    count: u8,
    /// OAM entry 0 occupies slot 0.
    sprite_zero: bool,
}

impl Default for SecondaryOam {
    fn default() -> Self {
        Self {
            bytes: [0xFF; ppu_mem::SECONDARY_OAM_SIZE],
            count: 0,
            sprite_zero: false,
        }
    }
}

impl SecondaryOam {
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn count(&self) -> u8 {
        self.count
    }

    pub(crate) fn has_sprite_zero(&self) -> bool {
        self.sprite_zero
    }

    pub(crate) fn sprite(&self, slot: usize) -> Sprite {
        Sprite::from_bytes(&self.bytes[slot * BYTES_PER_SPRITE..][..BYTES_PER_SPRITE])
    }

    /// Clears the buffer, scans primary OAM in order and returns whether the
    /// overflow flag would be raised.
    ///
    /// Once eight sprites are found the hardware keeps scanning, but it
    /// advances the byte offset along with the sprite index. The byte it
    /// compares against the scanline is therefore a tile, attribute or X
    /// value for most entries, giving both false positives and misses.
    pub(crate) fn evaluate(&mut self, oam: &[u8; ppu_mem::OAM_SIZE], scanline: u16, height: u8) -> bool {
        self.clear();
        let mut n = 0;
        while n < SPRITE_COUNT {
            let base = n * BYTES_PER_SPRITE;
            if row_on_line(oam[base], scanline, height).is_some() {
                let slot = usize::from(self.count) * BYTES_PER_SPRITE;
                self.bytes[slot..slot + BYTES_PER_SPRITE]
                    .copy_from_slice(&oam[base..base + BYTES_PER_SPRITE]);
                self.sprite_zero |= n == 0;
                self.count += 1;
            }
            n += 1;
            if usize::from(self.count) == MAX_SPRITES_PER_LINE {
                break;
            }
        }

        let mut m = 0;
        while n < SPRITE_COUNT {
            if row_on_line(oam[n * BYTES_PER_SPRITE + m], scanline, height).is_some() {
                return true;
            }
            n += 1;
            m = (m + 1) % BYTES_PER_SPRITE;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oam_with(entries: &[(usize, [u8; 4])]) -> [u8; ppu_mem::OAM_SIZE] {
        let mut oam = [0xF0; ppu_mem::OAM_SIZE];
        for (index, bytes) in entries {
            oam[index * 4..index * 4 + 4].copy_from_slice(bytes);
        }
        oam
    }

    #[test]
    fn picks_sprites_in_range_in_oam_order() {
        let oam = oam_with(&[(0, [10, 1, 0, 5]), (3, [20, 2, 0, 6]), (7, [14, 3, 0x40, 7])]);
        let mut secondary = SecondaryOam::default();
        assert!(!secondary.evaluate(&oam, 15, 8));
        assert_eq!(secondary.count(), 2);
        assert!(secondary.has_sprite_zero());
        assert_eq!(secondary.sprite(1).tile, 3);
        assert!(secondary.sprite(1).attributes.contains(SpriteAttributes::FLIP_HORIZONTAL));
    }

    #[test]
    fn tall_sprites_cover_sixteen_rows() {
        let oam = oam_with(&[(1, [100, 0, 0, 0])]);
        let mut secondary = SecondaryOam::default();
        secondary.evaluate(&oam, 115, 8);
        assert_eq!(secondary.count(), 0);
        secondary.evaluate(&oam, 115, 16);
        assert_eq!(secondary.count(), 1);
        assert!(!secondary.has_sprite_zero());
    }

    #[test]
    fn ninth_sprite_on_the_line_sets_overflow() {
        let entries: Vec<_> = (0..9).map(|i| (i, [50, 0, 0, 0])).collect();
        let oam = oam_with(&entries);
        let mut secondary = SecondaryOam::default();
        assert!(secondary.evaluate(&oam, 52, 8));
        assert_eq!(secondary.count(), 8);
    }

    #[test]
    fn overflow_scan_reads_the_wrong_byte() {
        // Entry 8 is checked through its Y byte, entry 9 through its tile
        // byte and entry 10 through its attribute byte.
        let mut entries: Vec<_> = (0..8).map(|i| (i, [50, 0, 0, 0])).collect();
        entries.push((9, [50, 0xF0, 0xF0, 0xF0]));
        let oam = oam_with(&entries);
        let mut secondary = SecondaryOam::default();
        assert!(!secondary.evaluate(&oam, 52, 8));

        entries.push((10, [0xF0, 0xF0, 48, 0xF0]));
        let oam = oam_with(&entries);
        assert!(secondary.evaluate(&oam, 52, 8));
    }

    #[test]
    fn pattern_address_handles_flips_and_tall_sprites() {
        let sprite = Sprite {
            y: 0,
            tile: 0x21,
            attributes: SpriteAttributes::empty(),
            x: 0,
        };
        assert_eq!(sprite.pattern_addr(3, 8, 0x1000), 0x1213);
        assert_eq!(sprite.pattern_addr(3, 16, 0x0000), 0x1203);
        assert_eq!(sprite.pattern_addr(9, 16, 0x0000), 0x1211);

        let flipped = Sprite {
            attributes: SpriteAttributes::FLIP_VERTICAL,
            ..sprite
        };
        assert_eq!(flipped.pattern_addr(0, 8, 0x0000), 0x0217);
        assert_eq!(flipped.pattern_addr(0, 16, 0x0000), 0x1217);
    }
}
