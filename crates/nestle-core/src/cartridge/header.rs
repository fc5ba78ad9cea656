//! The 16-byte iNES header that prefixes every `.nes` image.
//!
//! Layout:
//!
//! | Offset | Meaning                                                   |
//! |--------|-----------------------------------------------------------|
//! | 0-3    | Signature `NES\x1A`                                       |
//! | 4      | PRG ROM size in 16 KiB units                              |
//! | 5      | CHR ROM size in 8 KiB units (0 = board carries CHR RAM)   |
//! | 6      | [`Flags6`]: mirroring, battery, trainer, four-screen, mapper low nibble |
//! | 7      | [`Flags7`]: console variant, mapper high nibble           |
//! | 8      | PRG RAM size in 8 KiB units (0 = assume 8 KiB)            |
//! | 9-10   | TV system                                                 |
//! | 11-15  | Padding                                                   |

use bitflags::bitflags;

use crate::{
    error::{Error, Result},
    memory::rom::{CHR_BANK_SIZE, PRG_BANK_SIZE},
};

/// File signature at offset 0.
pub const MAGIC: &[u8; 4] = b"NES\x1A";

/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 16;

bitflags! {
    /// Header byte 6.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags6: u8 {
        /// 0 = horizontal, 1 = vertical.
        const MIRRORING   = 0b0000_0001;
        /// PRG RAM at `$6000-$7FFF` is battery backed.
        const BATTERY     = 0b0000_0010;
        /// A 512-byte trainer sits between the header and PRG ROM.
        const TRAINER     = 0b0000_0100;
        /// Ignore the mirroring bit; the board supplies its own nametable RAM.
        const FOUR_SCREEN = 0b0000_1000;
        const MAPPER_LOW  = 0b1111_0000;
    }
}

bitflags! {
    /// Header byte 7.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags7: u8 {
        const VS_UNISYSTEM  = 0b0000_0001;
        const PLAYCHOICE_10 = 0b0000_0010;
        const MAPPER_HIGH   = 0b1111_0000;
    }
}

/// How the four logical nametables fold onto physical nametable RAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mirroring {
    /// `$2000 = $2400`, `$2800 = $2C00`.
    Horizontal,
    /// `$2000 = $2800`, `$2400 = $2C00`.
    Vertical,
    /// Cartridge supplies all four nametables.
    FourScreen,
    /// Every nametable shows the first physical page. Only set by mappers.
    SingleScreenLower,
    /// Every nametable shows the second physical page. Only set by mappers.
    SingleScreenUpper,
}

/// Video standard the image was built for. Only NTSC timing is emulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TvSystem {
    Ntsc,
    Pal,
}

/// Decoded iNES header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
    /// Mapper number, `(flags7 & 0xF0) | (flags6 >> 4)`.
    pub mapper: u16,
    /// Nametable layout from the header. MMC1 overrides it at run time.
    pub mirroring: Mirroring,
    pub battery_backed_ram: bool,
    /// The image carries a 512-byte trainer, loaded at `$7000`.
    pub trainer_present: bool,
    /// PRG ROM size in bytes.
    pub prg_rom_size: usize,
    /// CHR ROM size in bytes; zero when the board uses CHR RAM instead.
    pub chr_rom_size: usize,
    /// PRG RAM size in bytes, never less than 8 KiB.
    pub prg_ram_size: usize,
    pub vs_unisystem: bool,
    pub playchoice_10: bool,
    pub tv_system: TvSystem,
}

impl Header {
    /// Decodes the first 16 bytes of `bytes`.
    ///
    /// Fails on a short buffer or a missing signature. Section lengths are
    /// not checked here.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::TooShort {
                actual: bytes.len(),
            });
        }
        if &bytes[0..4] != MAGIC {
            return Err(Error::InvalidMagic);
        }

        let flags6 = Flags6::from_bits_truncate(bytes[6]);
        let flags7 = Flags7::from_bits_truncate(bytes[7]);
        let prg_ram_units = bytes[8].max(1) as usize;

        Ok(Self {
            mapper: combine_mapper(flags6, flags7),
            mirroring: resolve_mirroring(flags6),
            battery_backed_ram: flags6.contains(Flags6::BATTERY),
            trainer_present: flags6.contains(Flags6::TRAINER),
            prg_rom_size: bytes[4] as usize * PRG_BANK_SIZE,
            chr_rom_size: bytes[5] as usize * CHR_BANK_SIZE,
            prg_ram_size: prg_ram_units * 8 * 1024,
            vs_unisystem: flags7.contains(Flags7::VS_UNISYSTEM),
            playchoice_10: flags7.contains(Flags7::PLAYCHOICE_10),
            tv_system: if bytes[9] & 0b1 == 0 {
                TvSystem::Ntsc
            } else {
                TvSystem::Pal
            },
        })
    }

    /// Number of 16 KiB PRG banks.
    pub fn prg_banks(&self) -> usize {
        self.prg_rom_size / PRG_BANK_SIZE
    }

    /// Number of 8 KiB CHR banks (0 for CHR RAM boards).
    pub fn chr_banks(&self) -> usize {
        self.chr_rom_size / CHR_BANK_SIZE
    }
}

fn resolve_mirroring(flags6: Flags6) -> Mirroring {
    if flags6.contains(Flags6::FOUR_SCREEN) {
        Mirroring::FourScreen
    } else if flags6.contains(Flags6::MIRRORING) {
        Mirroring::Vertical
    } else {
        Mirroring::Horizontal
    }
}

fn combine_mapper(flags6: Flags6, flags7: Flags7) -> u16 {
    let low = (flags6 & Flags6::MAPPER_LOW).bits() >> 4;
    let high = (flags7 & Flags7::MAPPER_HIGH).bits();
    (high | low) as u16
}
