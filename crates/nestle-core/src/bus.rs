use std::fmt::Debug;

pub mod cpu;
pub mod dma;
#[cfg(test)]
pub mod mock;
pub mod ppu;

pub use cpu::CpuBus;
pub use dma::OamDma;
pub use ppu::{PpuBus, VideoMemory};

/// CPU-side address space as seen by the 6502 core.
///
/// Reads take `&mut self` because several registers (PPU status, `$2007`,
/// the controller shift registers, APU status) change state when read.
/// Unmapped addresses read back as zero.
pub trait Bus: Debug {
    fn read(&mut self, addr: u16) -> u8;

    fn write(&mut self, addr: u16, data: u8);
}

// Lets `&mut impl Bus` be handed on wherever a Bus is expected.
impl<T: Bus + ?Sized> Bus for &mut T {
    fn read(&mut self, addr: u16) -> u8 {
        (**self).read(addr)
    }

    fn write(&mut self, addr: u16, data: u8) {
        (**self).write(addr, data)
    }
}
