use crate::{
    cartridge::{
        RomSections,
        header::{Header, Mirroring},
        mapper::{ChrStorage, allocate_prg_ram, prg_ram_offset},
    },
    memory::{cpu as cpu_mem, rom::CHR_BANK_SIZE},
};

/// Mapper 3: CNROM, fixed PRG and four switchable 8 KiB CHR banks.
///
/// | Area | Address range | Behaviour                                   |
/// |------|---------------|---------------------------------------------|
/// | CPU  | `$8000-$FFFF` | 16 or 32 KiB PRG ROM, 16 KiB mirrored        |
/// | CPU  | `$8000-$FFFF` | write: CHR bank = value & 3                  |
/// | PPU  | `$0000-$1FFF` | selected 8 KiB CHR bank                      |
#[derive(Debug, Clone)]
pub struct Cnrom {
    prg_rom: Box<[u8]>,
    prg_ram: Box<[u8]>,
    chr: ChrStorage,
    chr_bank: usize,
    mirroring: Mirroring,
}

impl Cnrom {
    pub fn new(header: &Header, sections: RomSections) -> Self {
        Self {
            prg_ram: allocate_prg_ram(header, sections.trainer.as_deref()),
            prg_rom: sections.prg_rom,
            chr: ChrStorage::from_image(sections.chr_rom),
            chr_bank: 0,
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
            cpu_mem::PRG_ROM_START..=u16::MAX => self.chr_bank = (data & 0x03) as usize,
            _ => {}
        }
    }

    fn chr_offset(&self, addr: u16) -> usize {
        self.chr_bank * CHR_BANK_SIZE + (addr as usize & (CHR_BANK_SIZE - 1))
    }

    pub fn ppu_read(&self, addr: u16) -> u8 {
        self.chr.read(self.chr_offset(addr))
    }

    pub fn ppu_write(&mut self, addr: u16, data: u8) {
        let offset = self.chr_offset(addr);
        self.chr.write(offset, data);
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}
