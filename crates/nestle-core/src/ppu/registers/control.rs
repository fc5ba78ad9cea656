use bitflags::bitflags;

use crate::memory::ppu as ppu_mem;

bitflags! {
    /// PPUCTRL (`$2000`).
    ///
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// V P H B S I N N
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub(crate) struct Control: u8 {
        /// Base nametable: `$2000`, `$2400`, `$2800`, `$2C00`.
        const NAMETABLE        = 0b0000_0011;
        /// VRAM address step after a `$2007` access: 1 (across) or 32 (down).
        const INCREMENT_32     = 0b0000_0100;
        /// 8x8 sprite pattern table at `$1000`.
        const SPRITE_TABLE     = 0b0000_1000;
        /// Background pattern table at `$1000`.
        const BACKGROUND_TABLE = 0b0001_0000;
        const SPRITE_SIZE_16   = 0b0010_0000;
        /// EXT pin direction; unused on a stock console.
        const MASTER_SLAVE     = 0b0100_0000;
        /// Raise NMI when vblank starts.
        const NMI_ON_VBLANK    = 0b1000_0000;
    }
}

impl Control {
    pub(crate) fn nametable_index(self) -> u8 {
        (self & Control::NAMETABLE).bits()
    }

    pub(crate) fn vram_increment(self) -> u16 {
        if self.contains(Control::INCREMENT_32) {
            32
        } else {
            1
        }
    }

    pub(crate) fn background_table(self) -> u16 {
        if self.contains(Control::BACKGROUND_TABLE) {
            ppu_mem::PATTERN_TABLE_1
        } else {
            ppu_mem::PATTERN_TABLE_0
        }
    }

    /// Pattern table for 8x8 sprites. 8x16 sprites pick theirs per tile.
    pub(crate) fn sprite_table(self) -> u16 {
        if self.contains(Control::SPRITE_TABLE) {
            ppu_mem::PATTERN_TABLE_1
        } else {
            ppu_mem::PATTERN_TABLE_0
        }
    }

    pub(crate) fn sprite_height(self) -> u8 {
        if self.contains(Control::SPRITE_SIZE_16) {
            16
        } else {
            8
        }
    }

    pub(crate) fn nmi_enabled(self) -> bool {
        self.contains(Control::NMI_ON_VBLANK)
    }
}
