use crate::{
    cartridge::{
        RomSections,
        header::{Header, Mirroring},
        mapper::{ChrStorage, allocate_prg_ram, prg_ram_offset},
    },
    memory::{cpu as cpu_mem, rom::PRG_BANK_SIZE},
};

const CHR_WINDOW_SIZE: usize = 0x1000;

/// Control register value after power-on or a bit-7 reset write:
/// PRG mode 3 (fix last bank at `$C000`).
const CONTROL_RESET: u8 = 0x0C;

/// Mapper 1: MMC1 (SxROM).
///
/// Registers are loaded serially: five writes to `$8000-$FFFF` shift bit 0
/// in LSB first, and the fifth write commits the value to the register
/// chosen by address bits 13-14. Writing a value with bit 7 set aborts the
/// sequence and forces PRG mode 3.
///
/// | Target        | Address       | Contents                                        |
/// |---------------|---------------|-------------------------------------------------|
/// | Control       | `$8000-$9FFF` | `CPPMM`: CHR mode, PRG mode, mirroring          |
/// | CHR bank 0    | `$A000-$BFFF` | 4 KiB bank at PPU `$0000` (8 KiB in CHR mode 0) |
/// | CHR bank 1    | `$C000-$DFFF` | 4 KiB bank at PPU `$1000` (ignored in mode 0)   |
/// | PRG bank      | `$E000-$FFFF` | 16 KiB bank number (low 4 bits)                 |
#[derive(Debug, Clone)]
pub struct Mmc1 {
    prg_rom: Box<[u8]>,
    prg_ram: Box<[u8]>,
    chr: ChrStorage,
    prg_bank_count: usize,

    control: u8,
    chr_bank0: u8,
    chr_bank1: u8,
    prg_bank: u8,

    shift: u8,
    shift_count: u8,
}

impl Mmc1 {
    pub fn new(header: &Header, sections: RomSections) -> Self {
        Self {
            prg_ram: allocate_prg_ram(header, sections.trainer.as_deref()),
            prg_bank_count: (sections.prg_rom.len() / PRG_BANK_SIZE).max(1),
            prg_rom: sections.prg_rom,
            chr: ChrStorage::from_image(sections.chr_rom),
            control: CONTROL_RESET,
            chr_bank0: 0,
            chr_bank1: 0,
            prg_bank: 0,
            shift: 0,
            shift_count: 0,
        }
    }

    fn prg_bank_for(&self, addr: u16) -> usize {
        let bank = (self.prg_bank & 0x0F) as usize;
        let last = self.prg_bank_count - 1;
        let low_half = addr < cpu_mem::PRG_ROM_HIGH_START;
        match (self.control >> 2) & 0b11 {
            // 32 KiB switching, low bit of the bank number ignored.
            0 | 1 => (bank & !1) + usize::from(!low_half),
            // First bank fixed at $8000.
            2 => {
                if low_half {
                    0
                } else {
                    bank
                }
            }
            // Last bank fixed at $C000.
            _ => {
                if low_half {
                    bank
                } else {
                    last
                }
            }
        }
    }

    fn chr_offset(&self, addr: u16) -> usize {
        let addr = addr as usize & 0x1FFF;
        let four_k_mode = self.control & 0x10 != 0;
        let bank = if !four_k_mode {
            (self.chr_bank0 & !1) as usize + addr / CHR_WINDOW_SIZE
        } else if addr < CHR_WINDOW_SIZE {
            self.chr_bank0 as usize
        } else {
            self.chr_bank1 as usize
        };
        bank * CHR_WINDOW_SIZE + (addr & (CHR_WINDOW_SIZE - 1))
    }

    fn write_serial(&mut self, addr: u16, data: u8) {
        if data & 0x80 != 0 {
            self.shift = 0;
            self.shift_count = 0;
            self.control |= CONTROL_RESET;
            return;
        }

        self.shift = (self.shift >> 1) | ((data & 1) << 4);
        self.shift_count += 1;
        if self.shift_count < 5 {
            return;
        }

        let value = self.shift & 0x1F;
        match (addr >> 13) & 0b11 {
            0 => self.control = value,
            1 => self.chr_bank0 = value,
            2 => self.chr_bank1 = value,
            _ => self.prg_bank = value,
        }
        self.shift = 0;
        self.shift_count = 0;
    }

    pub fn cpu_read(&self, addr: u16) -> u8 {
        match addr {
            cpu_mem::PRG_RAM_START..=cpu_mem::PRG_RAM_END => {
                self.prg_ram[prg_ram_offset(&self.prg_ram, addr)]
            }
            cpu_mem::PRG_ROM_START..=u16::MAX if !self.prg_rom.is_empty() => {
                let bank = self.prg_bank_for(addr);
                let offset = bank * PRG_BANK_SIZE + (addr as usize & (PRG_BANK_SIZE - 1));
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
            cpu_mem::PRG_ROM_START..=u16::MAX => self.write_serial(addr, data),
            _ => {}
        }
    }

    pub fn ppu_read(&self, addr: u16) -> u8 {
        self.chr.read(self.chr_offset(addr))
    }

    pub fn ppu_write(&mut self, addr: u16, data: u8) {
        let offset = self.chr_offset(addr);
        self.chr.write(offset, data);
    }

    pub fn mirroring(&self) -> Mirroring {
        match self.control & 0b11 {
            0 => Mirroring::SingleScreenLower,
            1 => Mirroring::SingleScreenUpper,
            2 => Mirroring::Vertical,
            _ => Mirroring::Horizontal,
        }
    }
}
