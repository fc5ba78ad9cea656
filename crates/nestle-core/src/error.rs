use thiserror::Error;

use crate::cartridge::header::HEADER_LEN;

/// Failures surfaced by the emulation core.
///
/// Cartridge variants abort loading entirely. [`Error::UnknownOpcode`] is
/// raised from inside instruction dispatch and is turned into a sticky CPU
/// halt by the driving loop in [`crate::Nes`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("image expected at least {HEADER_LEN} header bytes, got {actual}")]
    TooShort { actual: usize },

    #[error("missing iNES signature")]
    InvalidMagic,

    #[error("{section} section expected {expected} bytes, got {actual}")]
    SectionTooShort {
        section: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported mapper id {0}")]
    UnsupportedMapper(u16),

    #[error("unknown opcode ${opcode:02X} at ${addr:04X}")]
    UnknownOpcode { opcode: u8, addr: u16 },

    #[error("i/o error while reading cartridge: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
