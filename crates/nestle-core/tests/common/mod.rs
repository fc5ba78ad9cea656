#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use anyhow::{Context, Result, bail};
use ctor::ctor;
use nestle_core::{Nes, cartridge::Cartridge, ppu::FrameBuffer};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub const PRG_BANK_SIZE: usize = 0x4000;
pub const CHR_BANK_SIZE: usize = 0x2000;
pub const PRG_START: u16 = 0x8000;
pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Upper bound for run helpers, a little over two frames of CPU cycles.
pub const CYCLE_BUDGET: u64 = 70_000;

#[ctor]
fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_file(true)
        .with_line_number(true)
        .with_max_level(Level::DEBUG)
        .pretty()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");
}

/// Builds iNES images for mapper 0 (one PRG bank, one CHR bank by default).
#[derive(Debug, Clone)]
pub struct RomBuilder {
    prg: Vec<u8>,
    chr: Vec<u8>,
    flags6: u8,
}

impl Default for RomBuilder {
    fn default() -> Self {
        Self::nrom()
    }
}

impl RomBuilder {
    /// NOP-filled PRG with every vector pointing at `$8000`.
    pub fn nrom() -> Self {
        let builder = Self {
            prg: vec![0xEA; PRG_BANK_SIZE],
            chr: vec![0; CHR_BANK_SIZE],
            flags6: 0,
        };
        builder
            .vector(NMI_VECTOR, PRG_START)
            .vector(RESET_VECTOR, PRG_START)
            .vector(IRQ_VECTOR, PRG_START)
    }

    /// Places `bytes` at CPU address `addr` (mirrored into the 16 KiB bank).
    pub fn code(mut self, addr: u16, bytes: &[u8]) -> Self {
        let offset = usize::from(addr - PRG_START) % self.prg.len();
        self.prg[offset..offset + bytes.len()].copy_from_slice(bytes);
        self
    }

    pub fn vector(self, vector: u16, target: u16) -> Self {
        self.code(vector, &target.to_le_bytes())
    }

    pub fn chr(mut self, addr: u16, bytes: &[u8]) -> Self {
        let offset = usize::from(addr);
        self.chr[offset..offset + bytes.len()].copy_from_slice(bytes);
        self
    }

    pub fn vertical_mirroring(mut self) -> Self {
        self.flags6 |= 0x01;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut image = vec![b'N', b'E', b'S', 0x1A];
        image.push((self.prg.len() / PRG_BANK_SIZE) as u8);
        image.push((self.chr.len() / CHR_BANK_SIZE) as u8);
        image.push(self.flags6);
        image.resize(16, 0);
        image.extend_from_slice(&self.prg);
        image.extend_from_slice(&self.chr);
        image
    }

    pub fn cartridge(&self) -> Result<Cartridge> {
        Cartridge::from_bytes(&self.build()).context("building test cartridge")
    }

    pub fn console(&self) -> Result<Nes> {
        Ok(Nes::new(self.cartridge()?))
    }
}

/// Attaches a frame buffer the test can keep reading after handing it over.
pub fn attach_frame(nes: &mut Nes) -> Rc<RefCell<FrameBuffer>> {
    let frame = Rc::new(RefCell::new(FrameBuffer::new()));
    nes.set_pixel_sink(Box::new(Rc::clone(&frame)));
    frame
}

/// Ticks until `done` holds, failing after [`CYCLE_BUDGET`] cycles.
pub fn run_until<F>(nes: &mut Nes, mut done: F) -> Result<u64>
where
    F: FnMut(&mut Nes) -> bool,
{
    let start = nes.cycles();
    while !done(nes) {
        if nes.cycles() - start > CYCLE_BUDGET {
            bail!("condition not reached within {CYCLE_BUDGET} cycles");
        }
        nes.tick();
    }
    Ok(nes.cycles() - start)
}

pub fn run_frames(nes: &mut Nes, frames: usize) {
    for _ in 0..frames {
        nes.run_frame();
    }
}
