mod control;
mod mask;
mod status;
mod vram_addr;
mod vram_registers;

pub(crate) use control::Control;
pub(crate) use mask::Mask;
pub(crate) use status::Status;
pub(crate) use vram_addr::VramAddr;
pub(crate) use vram_registers::VramRegisters;

/// CPU-visible register file plus the latches behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Registers {
    pub(crate) control: Control,
    pub(crate) mask: Mask,
    pub(crate) status: Status,
    pub(crate) oam_addr: u8,
    pub(crate) vram: VramRegisters,
    /// `$2007` read buffer.
    pub(crate) read_buffer: u8,
    /// Value last driven onto the PPU data bus by the CPU.
    pub(crate) io_latch: u8,
}

impl Registers {
    pub(crate) fn power_up() -> Self {
        Self {
            status: Status::POWER_ON,
            ..Self::default()
        }
    }

    /// Reset leaves OAMADDR and the VRAM address alone.
    pub(crate) fn reset(&mut self) {
        self.control = Control::empty();
        self.mask = Mask::empty();
        self.vram.w = false;
        self.vram.x = 0;
        self.vram.scroll_x = 0;
        self.vram.scroll_y = 0;
        self.read_buffer = 0;
    }
}
