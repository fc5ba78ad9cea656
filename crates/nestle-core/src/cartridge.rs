use std::{fs, path::Path};

use tracing::info;

use crate::{
    cartridge::{
        header::{HEADER_LEN, Header, Mirroring},
        mapper::{CiramTarget, Mapper},
    },
    error::{Error, Result},
    memory::{ppu as ppu_mem, rom::TRAINER_SIZE},
};

pub mod header;
pub mod mapper;

/// Raw sections sliced out of an image, handed to the mapper constructor.
#[derive(Debug, Clone)]
pub struct RomSections {
    pub prg_rom: Box<[u8]>,
    /// Empty when the board uses CHR RAM.
    pub chr_rom: Box<[u8]>,
    /// 512 bytes destined for `$7000`.
    pub trainer: Option<Box<[u8]>>,
}

/// A loaded cartridge: parsed header, bank-switching board, and the extra
/// nametable RAM carried by four-screen boards.
#[derive(Debug, Clone)]
pub struct Cartridge {
    header: Header,
    mapper: Mapper,
    /// 4 KiB on four-screen boards, empty otherwise.
    nametable_ram: Box<[u8]>,
}

impl Cartridge {
    /// Parses an in-memory `.nes` image.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header = Header::parse(bytes)?;
        let sections = slice_sections(bytes, &header)?;
        let mapper = Mapper::new(&header, sections)?;
        let nametable_ram = if header.mirroring == Mirroring::FourScreen {
            vec![0; ppu_mem::FOUR_SCREEN_RAM_SIZE].into_boxed_slice()
        } else {
            Box::new([])
        };

        info!(
            "loaded cartridge: mapper {} ({}), {} PRG x 16 KiB, {} CHR x 8 KiB, {:?} mirroring",
            mapper.mapper_id(),
            mapper.name(),
            header.prg_banks(),
            header.chr_banks(),
            header.mirroring,
        );

        Ok(Self {
            header,
            mapper,
            nametable_ram,
        })
    }

    /// Reads and parses a `.nes` file.
    pub fn from_file<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    pub fn cpu_read(&self, addr: u16) -> u8 {
        self.mapper.cpu_read(addr)
    }

    pub fn cpu_write(&mut self, addr: u16, data: u8) {
        self.mapper.cpu_write(addr, data);
    }

    pub fn ppu_read(&self, addr: u16) -> u8 {
        self.mapper.ppu_read(addr)
    }

    pub fn ppu_write(&mut self, addr: u16, data: u8) {
        self.mapper.ppu_write(addr, data);
    }

    /// Where the board routes a nametable address.
    pub fn map_ciram(&self, addr: u16) -> CiramTarget {
        self.mapper.map_ciram(addr)
    }

    /// Reads the board's own nametable RAM. Returns 0 when the board has none.
    pub fn nametable_read(&self, offset: u16) -> u8 {
        self.nametable_ram
            .get(offset as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Writes the board's own nametable RAM; dropped when the board has none.
    pub fn nametable_write(&mut self, offset: u16, data: u8) {
        if let Some(slot) = self.nametable_ram.get_mut(offset as usize) {
            *slot = data;
        }
    }
}

fn slice_sections(bytes: &[u8], header: &Header) -> Result<RomSections> {
    let mut cursor = HEADER_LEN;
    let trainer = if header.trainer_present {
        Some(section(bytes, &mut cursor, TRAINER_SIZE, "trainer")?)
    } else {
        None
    };
    let prg_rom = section(bytes, &mut cursor, header.prg_rom_size, "PRG ROM")?;
    let chr_rom = section(bytes, &mut cursor, header.chr_rom_size, "CHR ROM")?;

    Ok(RomSections {
        prg_rom,
        chr_rom,
        trainer,
    })
}

fn section(
    bytes: &[u8],
    cursor: &mut usize,
    len: usize,
    name: &'static str,
) -> Result<Box<[u8]>> {
    let too_short = || Error::SectionTooShort {
        section: name,
        expected: len,
        actual: bytes.len().saturating_sub(*cursor),
    };
    let end = cursor.checked_add(len).ok_or_else(too_short)?;
    let slice = bytes.get(*cursor..end).ok_or_else(too_short)?;
    *cursor = end;
    Ok(slice.into())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{
        cartridge::{
            Cartridge,
            header::{HEADER_LEN, Header, Mirroring, TvSystem},
        },
        memory::rom::PRG_BANK_SIZE,
    };

    /// One-bank NROM with CHR RAM and horizontal mirroring. `program` sits at
    /// `$8000`, which is also where the reset vector points.
    pub(crate) fn nrom_with_program(program: &[u8]) -> Cartridge {
        let mut image = vec![b'N', b'E', b'S', 0x1A, 1, 0, 0, 0];
        image.resize(HEADER_LEN, 0);
        let mut prg = vec![0xEA; PRG_BANK_SIZE];
        prg[..program.len()].copy_from_slice(program);
        prg[0x3FFC] = 0x00;
        prg[0x3FFD] = 0x80;
        image.extend(prg);
        Cartridge::from_bytes(&image).expect("test image is well formed")
    }

    pub(crate) fn header(mapper: u16, prg_rom_size: usize, chr_rom_size: usize) -> Header {
        Header {
            mapper,
            mirroring: Mirroring::Vertical,
            battery_backed_ram: false,
            trainer_present: false,
            prg_rom_size,
            chr_rom_size,
            prg_ram_size: 8 * 1024,
            vs_unisystem: false,
            playchoice_10: false,
            tv_system: TvSystem::Ntsc,
        }
    }

    /// PRG ROM where every byte of bank `n` holds `n`.
    pub(crate) fn banked_prg(banks: usize) -> Box<[u8]> {
        let mut prg = vec![0u8; banks * PRG_BANK_SIZE];
        for (bank, chunk) in prg.chunks_mut(PRG_BANK_SIZE).enumerate() {
            chunk.fill(bank as u8);
        }
        prg.into_boxed_slice()
    }
}
