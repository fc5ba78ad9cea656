use crate::{
    cartridge::{
        RomSections,
        header::{Header, Mirroring},
        mapper::{ChrStorage, allocate_prg_ram, prg_ram_offset},
    },
    memory::{cpu as cpu_mem, rom::PRG_BANK_SIZE},
};

/// Mapper 2: UxROM, switchable 16 KiB PRG with the last bank fixed.
///
/// | Area | Address range | Behaviour                               |
/// |------|---------------|-----------------------------------------|
/// | CPU  | `$6000-$7FFF` | PRG RAM                                 |
/// | CPU  | `$8000-$BFFF` | 16 KiB switchable PRG bank              |
/// | CPU  | `$C000-$FFFF` | 16 KiB fixed to the last PRG bank       |
/// | CPU  | `$8000-$FFFF` | write: select bank for `$8000-$BFFF`    |
/// | PPU  | `$0000-$1FFF` | 8 KiB CHR, usually RAM                  |
#[derive(Debug, Clone)]
pub struct Uxrom {
    prg_rom: Box<[u8]>,
    prg_ram: Box<[u8]>,
    chr: ChrStorage,
    bank_count: usize,
    selected_bank: usize,
    mirroring: Mirroring,
}

impl Uxrom {
    pub fn new(header: &Header, sections: RomSections) -> Self {
        Self {
            prg_ram: allocate_prg_ram(header, sections.trainer.as_deref()),
            bank_count: (sections.prg_rom.len() / PRG_BANK_SIZE).max(1),
            prg_rom: sections.prg_rom,
            chr: ChrStorage::from_image(sections.chr_rom),
            selected_bank: 0,
            mirroring: header.mirroring,
        }
    }

    fn read_prg_rom(&self, addr: u16) -> u8 {
        if self.prg_rom.is_empty() {
            return 0;
        }
        let bank = if addr < cpu_mem::PRG_ROM_HIGH_START {
            self.selected_bank
        } else {
            self.bank_count - 1
        };
        let offset = bank * PRG_BANK_SIZE + (addr as usize & (PRG_BANK_SIZE - 1));
        self.prg_rom[offset % self.prg_rom.len()]
    }

    pub fn cpu_read(&self, addr: u16) -> u8 {
        match addr {
            cpu_mem::PRG_RAM_START..=cpu_mem::PRG_RAM_END => {
                self.prg_ram[prg_ram_offset(&self.prg_ram, addr)]
            }
            cpu_mem::PRG_ROM_START..=u16::MAX => self.read_prg_rom(addr),
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
                self.selected_bank = data as usize % self.bank_count;
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
