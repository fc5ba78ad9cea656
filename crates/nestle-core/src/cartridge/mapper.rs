//! Bank-switching boards.
//!
//! The set of supported boards is closed, so [`Mapper`] is an enum rather than
//! a trait object. Every variant answers the same questions: what the CPU sees
//! in `$4020-$FFFF`, what the PPU sees in `$0000-$1FFF`, and where a
//! nametable address ends up.

mod chr_storage;
mod mapper0;
mod mapper1;
mod mapper2;
mod mapper3;

pub use chr_storage::ChrStorage;
pub use mapper0::Nrom;
pub use mapper1::Mmc1;
pub use mapper2::Uxrom;
pub use mapper3::Cnrom;

use crate::{
    cartridge::{
        RomSections,
        header::{Header, Mirroring},
    },
    error::{Error, Result},
    memory::{cpu as cpu_mem, ppu as ppu_mem},
};

/// Where a nametable access lands after the board applies its mirroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CiramTarget {
    /// Offset into the console's 2 KiB CIRAM.
    Internal(u16),
    /// Offset into nametable RAM on the cartridge (four-screen boards).
    Cartridge(u16),
}

/// A supported board, with its banking state.
#[derive(Debug, Clone)]
pub enum Mapper {
    /// Mapper 0: no banking.
    Nrom(Nrom),
    /// Mapper 1: serial-loaded PRG/CHR banking and mirroring control.
    Mmc1(Mmc1),
    /// Mapper 2: switchable 16 KiB PRG bank at `$8000`.
    Uxrom(Uxrom),
    /// Mapper 3: switchable 8 KiB CHR bank.
    Cnrom(Cnrom),
}

impl Mapper {
    /// Builds the board named by `header.mapper`.
    ///
    /// Any id outside the supported set rejects the image.
    pub fn new(header: &Header, sections: RomSections) -> Result<Self> {
        let mapper = match header.mapper {
            0 => Mapper::Nrom(Nrom::new(header, sections)),
            1 => Mapper::Mmc1(Mmc1::new(header, sections)),
            2 => Mapper::Uxrom(Uxrom::new(header, sections)),
            3 => Mapper::Cnrom(Cnrom::new(header, sections)),
            other => return Err(Error::UnsupportedMapper(other)),
        };
        Ok(mapper)
    }

    /// iNES mapper number.
    pub fn mapper_id(&self) -> u16 {
        match self {
            Mapper::Nrom(_) => 0,
            Mapper::Mmc1(_) => 1,
            Mapper::Uxrom(_) => 2,
            Mapper::Cnrom(_) => 3,
        }
    }

    /// Board name for log messages.
    pub fn name(&self) -> &'static str {
        match self {
            Mapper::Nrom(_) => "NROM",
            Mapper::Mmc1(_) => "MMC1",
            Mapper::Uxrom(_) => "UxROM",
            Mapper::Cnrom(_) => "CNROM",
        }
    }

    /// CPU read of `$4020-$FFFF`. Unmapped ranges read as zero.
    pub fn cpu_read(&self, addr: u16) -> u8 {
        match self {
            Mapper::Nrom(m) => m.cpu_read(addr),
            Mapper::Mmc1(m) => m.cpu_read(addr),
            Mapper::Uxrom(m) => m.cpu_read(addr),
            Mapper::Cnrom(m) => m.cpu_read(addr),
        }
    }

    /// CPU write: PRG RAM, or a bank register on boards that have them.
    pub fn cpu_write(&mut self, addr: u16, data: u8) {
        match self {
            Mapper::Nrom(m) => m.cpu_write(addr, data),
            Mapper::Mmc1(m) => m.cpu_write(addr, data),
            Mapper::Uxrom(m) => m.cpu_write(addr, data),
            Mapper::Cnrom(m) => m.cpu_write(addr, data),
        }
    }

    /// Pattern-table read, `$0000-$1FFF`.
    pub fn ppu_read(&self, addr: u16) -> u8 {
        match self {
            Mapper::Nrom(m) => m.ppu_read(addr),
            Mapper::Mmc1(m) => m.ppu_read(addr),
            Mapper::Uxrom(m) => m.ppu_read(addr),
            Mapper::Cnrom(m) => m.ppu_read(addr),
        }
    }

    /// Pattern-table write. Ignored unless the board has CHR RAM.
    pub fn ppu_write(&mut self, addr: u16, data: u8) {
        match self {
            Mapper::Nrom(m) => m.ppu_write(addr, data),
            Mapper::Mmc1(m) => m.ppu_write(addr, data),
            Mapper::Uxrom(m) => m.ppu_write(addr, data),
            Mapper::Cnrom(m) => m.ppu_write(addr, data),
        }
    }

    /// Current nametable arrangement. Fixed by the header except on MMC1,
    /// where the control register drives it.
    pub fn mirroring(&self) -> Mirroring {
        match self {
            Mapper::Nrom(m) => m.mirroring(),
            Mapper::Mmc1(m) => m.mirroring(),
            Mapper::Uxrom(m) => m.mirroring(),
            Mapper::Cnrom(m) => m.mirroring(),
        }
    }

    /// Debugger read of CPU cartridge space. Board reads carry no side
    /// effects, so this is the plain CPU read path behind a shared borrow.
    pub fn peek(&self, addr: u16) -> u8 {
        self.cpu_read(addr)
    }

    /// Folds a PPU nametable address (`$2000-$3EFF`) onto physical RAM.
    pub fn map_ciram(&self, addr: u16) -> CiramTarget {
        fold_nametable(self.mirroring(), addr)
    }
}

pub(crate) fn fold_nametable(mirroring: Mirroring, addr: u16) -> CiramTarget {
    let page = ppu_mem::NAMETABLE_SIZE;
    let offset = addr & (page - 1);
    match mirroring {
        Mirroring::FourScreen => CiramTarget::Cartridge(addr & 0x0FFF),
        // Bit 11 selects the physical page.
        Mirroring::Horizontal => CiramTarget::Internal(((addr >> 1) & page) | offset),
        // Bit 10 selects the physical page.
        Mirroring::Vertical => CiramTarget::Internal(addr & (2 * page - 1)),
        Mirroring::SingleScreenLower => CiramTarget::Internal(offset),
        Mirroring::SingleScreenUpper => CiramTarget::Internal(page | offset),
    }
}

/// 8 KiB of work RAM at `$6000-$7FFF`, seeded with the trainer when present.
pub(crate) fn allocate_prg_ram(header: &Header, trainer: Option<&[u8]>) -> Box<[u8]> {
    let size = header.prg_ram_size.max(cpu_mem::PRG_RAM_SIZE);
    let mut ram = vec![0; size].into_boxed_slice();
    if let Some(trainer) = trainer {
        let start = (cpu_mem::TRAINER_START - cpu_mem::PRG_RAM_START) as usize;
        let end = start + trainer.len();
        if let Some(dst) = ram.get_mut(start..end) {
            dst.copy_from_slice(trainer);
        }
    }
    ram
}

pub(crate) fn prg_ram_offset(ram: &[u8], addr: u16) -> usize {
    (addr - cpu_mem::PRG_RAM_START) as usize % ram.len().max(1)
}
