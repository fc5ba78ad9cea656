//! PPU-side address space (`$0000-$3FFF`).
//!
//! | Range         | Target                                              |
//! |---------------|-----------------------------------------------------|
//! | `$0000-$1FFF` | pattern tables, through the mapper                  |
//! | `$2000-$3EFF` | nametables, folded by [`Cartridge::map_ciram`]      |
//! | `$3F00-$3FFF` | 32 bytes of palette RAM, mirrored                   |

use crate::{
    cartridge::{Cartridge, mapper::CiramTarget},
    memory::ppu as ppu_mem,
};

/// Console-side video memory: the 2 KiB CIRAM and palette RAM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMemory {
    /// Two 1 KiB nametables; cartridges choose how the four logical
    /// nametables fold onto them.
    ciram: [u8; ppu_mem::CIRAM_SIZE],
    /// Backdrop, 4 background palettes and 4 sprite palettes.
    palette: [u8; ppu_mem::PALETTE_RAM_SIZE],
}

impl Default for VideoMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoMemory {
    /// Zero-filled CIRAM and palette RAM.
    pub fn new() -> Self {
        Self {
            ciram: [0; ppu_mem::CIRAM_SIZE],
            palette: [0; ppu_mem::PALETTE_RAM_SIZE],
        }
    }

    /// Raw CIRAM, for nametable viewers.
    pub fn ciram(&self) -> &[u8] {
        &self.ciram
    }

    /// Raw palette RAM. Entries are 6-bit color indices.
    pub fn palette(&self) -> &[u8] {
        &self.palette
    }
}

/// Folds a palette address onto the 32-byte palette RAM.
///
/// Entries `$3F10/$3F14/$3F18/$3F1C` are the sprite-side aliases of the
/// background backdrop slots, so every index that is a multiple of four drops
/// bit 4.
pub(crate) fn palette_index(addr: u16) -> usize {
    let mut addr = addr;
    if addr & 0x03 == 0 {
        addr &= 0x0F;
    }
    (addr & 0x1F) as usize
}

/// Borrowed view over everything the PPU can address.
///
/// Built fresh for each PPU dot or `$2007` access so the console can lend the
/// same cartridge to the CPU side in between.
#[derive(Debug)]
pub struct PpuBus<'a> {
    vram: &'a mut VideoMemory,
    /// Pattern tables, plus nametable RAM on four-screen boards.
    cartridge: &'a mut Cartridge,
}

impl<'a> PpuBus<'a> {
    pub fn new(vram: &'a mut VideoMemory, cartridge: &'a mut Cartridge) -> Self {
        Self { vram, cartridge }
    }

    /// Reads one byte. Addresses above `$3FFF` mirror down.
    pub fn read(&mut self, addr: u16) -> u8 {
        let addr = addr & ppu_mem::ADDR_MASK;
        match addr {
            0..=ppu_mem::PATTERN_TABLE_END => self.cartridge.ppu_read(addr),
            ppu_mem::NAMETABLE_BASE..=ppu_mem::NAMETABLE_END => {
                match self.cartridge.map_ciram(addr) {
                    CiramTarget::Internal(offset) => self.vram.ciram[offset as usize],
                    CiramTarget::Cartridge(offset) => self.cartridge.nametable_read(offset),
                }
            }
            _ => self.vram.palette[palette_index(addr)],
        }
    }

    /// Writes one byte. Pattern-table writes only stick on CHR RAM.
    pub fn write(&mut self, addr: u16, data: u8) {
        let addr = addr & ppu_mem::ADDR_MASK;
        match addr {
            0..=ppu_mem::PATTERN_TABLE_END => self.cartridge.ppu_write(addr, data),
            ppu_mem::NAMETABLE_BASE..=ppu_mem::NAMETABLE_END => {
                match self.cartridge.map_ciram(addr) {
                    CiramTarget::Internal(offset) => self.vram.ciram[offset as usize] = data,
                    CiramTarget::Cartridge(offset) => {
                        self.cartridge.nametable_write(offset, data)
                    }
                }
            }
            _ => self.vram.palette[palette_index(addr)] = data,
        }
    }
}
