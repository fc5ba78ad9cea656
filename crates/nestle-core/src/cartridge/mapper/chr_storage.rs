//! Pattern-table memory on the cartridge side of the PPU bus.
//!
//! Boards expose either CHR ROM from the image or, when the header reports
//! zero CHR banks, 8 KiB of writable CHR RAM. Mappers address it through
//! absolute offsets that already include their bank selection.

use crate::memory::rom::CHR_BANK_SIZE;

/// CHR ROM or CHR RAM; writes only stick on RAM.
#[derive(Debug, Clone)]
pub enum ChrStorage {
    Rom(Box<[u8]>),
    Ram(Box<[u8]>),
}

impl ChrStorage {
    /// ROM when the image carries CHR data, otherwise a zeroed 8 KiB RAM.
    pub fn from_image(chr_rom: Box<[u8]>) -> Self {
        if chr_rom.is_empty() {
            ChrStorage::Ram(vec![0; CHR_BANK_SIZE].into_boxed_slice())
        } else {
            ChrStorage::Rom(chr_rom)
        }
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    pub fn is_ram(&self) -> bool {
        matches!(self, ChrStorage::Ram(_))
    }

    fn bytes(&self) -> &[u8] {
        match self {
            ChrStorage::Rom(rom) => rom,
            ChrStorage::Ram(ram) => ram,
        }
    }

    /// Reads an absolute offset, wrapped to the storage size.
    pub fn read(&self, offset: usize) -> u8 {
        let bytes = self.bytes();
        if bytes.is_empty() {
            return 0;
        }
        bytes[offset % bytes.len()]
    }

    /// Writes land only in CHR RAM.
    pub fn write(&mut self, offset: usize, data: u8) {
        if let ChrStorage::Ram(ram) = self {
            let len = ram.len();
            if len != 0 {
                ram[offset % len] = data;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rom_ignores_writes() {
        let mut chr = ChrStorage::from_image(vec![0x11; CHR_BANK_SIZE].into_boxed_slice());
        chr.write(0x10, 0xFF);
        assert_eq!(chr.read(0x10), 0x11);
        assert!(!chr.is_ram());
    }

    #[test]
    fn missing_chr_allocates_writable_ram() {
        let mut chr = ChrStorage::from_image(Box::new([]));
        assert!(chr.is_ram());
        assert_eq!(chr.len(), CHR_BANK_SIZE);
        chr.write(0x1FFF, 0x42);
        assert_eq!(chr.read(0x1FFF), 0x42);
        assert_eq!(chr.read(0x1FFF + CHR_BANK_SIZE), 0x42);
    }
}
