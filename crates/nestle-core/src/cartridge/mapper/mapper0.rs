use tracing::warn;

use crate::{
    cartridge::{
        RomSections,
        header::{Header, Mirroring},
        mapper::{ChrStorage, allocate_prg_ram, prg_ram_offset},
    },
    memory::cpu as cpu_mem,
};

/// Mapper 0: no bank switching.
///
/// | Area | Address range | Behaviour                                  |
/// |------|---------------|--------------------------------------------|
/// | CPU  | `$6000-$7FFF` | PRG RAM                                    |
/// | CPU  | `$8000-$FFFF` | 16 KiB PRG mirrored twice, or 32 KiB PRG   |
/// | PPU  | `$0000-$1FFF` | 8 KiB CHR ROM (or RAM)                     |
#[derive(Debug, Clone)]
pub struct Nrom {
    prg_rom: Box<[u8]>,
    prg_ram: Box<[u8]>,
    chr: ChrStorage,
    mirroring: Mirroring,
}

impl Nrom {
    pub fn new(header: &Header, sections: RomSections) -> Self {
        Self {
            prg_ram: allocate_prg_ram(header, sections.trainer.as_deref()),
            prg_rom: sections.prg_rom,
            chr: ChrStorage::from_image(sections.chr_rom),
            mirroring: header.mirroring,
        }
    }

    pub fn cpu_read(&self, addr: u16) -> u8 {
        match addr {
            cpu_mem::PRG_RAM_START..=cpu_mem::PRG_RAM_END => {
                self.prg_ram[prg_ram_offset(&self.prg_ram, addr)]
            }
            cpu_mem::PRG_ROM_START..=u16::MAX if !self.prg_rom.is_empty() => {
                let offset = (addr - cpu_mem::PRG_ROM_START) as usize;
                self.prg_rom[offset % self.prg_rom.len()]
            }
            _ => 0,
        }
    }

    pub fn cpu_write(&mut self, addr: u16, data: u8) {
        match addr {
            cpu_mem::PRG_RAM_START..=cpu_mem::PRG_RAM_END => {
                let offset = prg_ram_offset(&self.prg_ram, addr);
                self.prg_ram[offset] = data;
            }
            cpu_mem::PRG_ROM_START..=u16::MAX => {
                warn!("NROM ignores write ${:02X} to PRG ROM at ${:04X}", data, addr);
            }
            _ => {}
        }
    }

    pub fn ppu_read(&self, addr: u16) -> u8 {
        self.chr.read(addr as usize & 0x1FFF)
    }

    pub fn ppu_write(&mut self, addr: u16, data: u8) {
        self.chr.write(addr as usize & 0x1FFF, data);
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::test_support::header;

    fn nrom(prg: Vec<u8>, chr: Vec<u8>) -> Nrom {
        let header = header(0, prg.len(), chr.len());
        Nrom::new(
            &header,
            RomSections {
                prg_rom: prg.into_boxed_slice(),
                chr_rom: chr.into_boxed_slice(),
                trainer: None,
            },
        )
    }

    #[test]
    fn mirrors_prg_rom_when_16k() {
        let mut prg = vec![0; 0x4000];
        prg[0] = 0xAA;
        prg[0x3FFF] = 0x55;
        let cart = nrom(prg, vec![0; 0x2000]);

        assert_eq!(cart.cpu_read(0x8000), 0xAA);
        assert_eq!(cart.cpu_read(0xC000), 0xAA);
        assert_eq!(cart.cpu_read(0xBFFF), 0x55);
        assert_eq!(cart.cpu_read(0xFFFF), 0x55);
    }

    #[test]
    fn prg_ram_is_read_write() {
        let mut cart = nrom(vec![0; 0x8000], vec![0; 0x2000]);
        cart.cpu_write(0x6123, 0x77);
        assert_eq!(cart.cpu_read(0x6123), 0x77);
        // ROM writes are dropped.
        cart.cpu_write(0x8000, 0x99);
        assert_eq!(cart.cpu_read(0x8000), 0x00);
    }

    #[test]
    fn chr_ram_accepts_writes_when_no_chr_rom() {
        let mut cart = nrom(vec![0; 0x4000], Vec::new());
        cart.ppu_write(0x0010, 0x3C);
        assert_eq!(cart.ppu_read(0x0010), 0x3C);
    }
}
