use tracing::warn;

use crate::{
    apu::Apu,
    bus::{Bus, PpuBus, VideoMemory},
    cartridge::Cartridge,
    controller::ControllerPort,
    memory::{cpu as cpu_mem, ppu::Register},
    ppu::Ppu,
};

/// CPU-visible bus that routes each address to RAM, the PPU registers, the
/// APU/IO block or the cartridge. It borrows the hardware from the owning
/// [`Nes`](crate::Nes) for the duration of one step.
///
/// | Range           | Target                                   |
/// |-----------------|------------------------------------------|
/// | `$0000-$1FFF`   | 2 KiB work RAM, mirrored every `$0800`   |
/// | `$2000-$3FFF`   | PPU registers, mirrored every 8 bytes    |
/// | `$4000-$4017`   | APU, OAM DMA and controller ports        |
/// | `$4018-$401F`   | CPU test mode, unmapped                  |
/// | `$4020-$FFFF`   | cartridge                                |
#[derive(Debug)]
pub struct CpuBus<'a> {
    ram: &'a mut [u8; cpu_mem::WORK_RAM_SIZE],
    ppu: &'a mut Ppu,
    /// Lent to the PPU for `$2007` accesses.
    vram: &'a mut VideoMemory,
    cartridge: &'a mut Cartridge,
    apu: &'a mut Apu,
    controllers: &'a mut ControllerPort,
    /// Page written to `$4014`. The console starts the transfer once the
    /// current CPU cycle has finished.
    oam_dma_request: &'a mut Option<u8>,
}

impl<'a> CpuBus<'a> {
    pub(crate) fn new(
        ram: &'a mut [u8; cpu_mem::WORK_RAM_SIZE],
        ppu: &'a mut Ppu,
        vram: &'a mut VideoMemory,
        cartridge: &'a mut Cartridge,
        apu: &'a mut Apu,
        controllers: &'a mut ControllerPort,
        oam_dma_request: &'a mut Option<u8>,
    ) -> Self {
        Self {
            ram,
            ppu,
            vram,
            cartridge,
            apu,
            controllers,
            oam_dma_request,
        }
    }

    /// Side-effect-free read for debuggers. Registers read back as zero.
    pub fn peek(&self, addr: u16) -> u8 {
        match addr {
            0..=cpu_mem::WORK_RAM_END => self.ram[(addr & cpu_mem::WORK_RAM_MASK) as usize],
            cpu_mem::CARTRIDGE_SPACE_BASE..=u16::MAX => self.cartridge.mapper().peek(addr),
            _ => 0,
        }
    }

    fn ppu_bus(&mut self) -> (&mut Ppu, PpuBus<'_>) {
        (
            &mut *self.ppu,
            PpuBus::new(&mut *self.vram, &mut *self.cartridge),
        )
    }
}

impl Bus for CpuBus<'_> {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0..=cpu_mem::WORK_RAM_END => self.ram[(addr & cpu_mem::WORK_RAM_MASK) as usize],
            cpu_mem::PPU_REGISTER_BASE..=cpu_mem::PPU_REGISTER_END => {
                let (ppu, mut bus) = self.ppu_bus();
                ppu.cpu_read(Register::from_cpu_addr(addr), &mut bus)
            }
            cpu_mem::APU_STATUS => self.apu.read_status(),
            cpu_mem::CONTROLLER_PORT_1 => self.controllers.read(0),
            cpu_mem::CONTROLLER_PORT_2 => self.controllers.read(1),
            // APU channel registers, OAMDMA and the test-mode block are write-only.
            cpu_mem::APU_REGISTER_BASE..=cpu_mem::TEST_MODE_END => 0,
            cpu_mem::CARTRIDGE_SPACE_BASE..=u16::MAX => self.cartridge.cpu_read(addr),
        }
    }

    fn write(&mut self, addr: u16, data: u8) {
        match addr {
            0..=cpu_mem::WORK_RAM_END => {
                self.ram[(addr & cpu_mem::WORK_RAM_MASK) as usize] = data;
            }
            cpu_mem::PPU_REGISTER_BASE..=cpu_mem::PPU_REGISTER_END => {
                let (ppu, mut bus) = self.ppu_bus();
                ppu.cpu_write(Register::from_cpu_addr(addr), data, &mut bus);
            }
            cpu_mem::OAM_DMA => *self.oam_dma_request = Some(data),
            cpu_mem::CONTROLLER_PORT_1 => self.controllers.write(data),
            cpu_mem::APU_REGISTER_BASE..=cpu_mem::APU_REGISTER_END
            | cpu_mem::APU_STATUS
            | cpu_mem::CONTROLLER_PORT_2 => self.apu.cpu_write(addr, data),
            cpu_mem::TEST_MODE_BASE..=cpu_mem::TEST_MODE_END => {
                warn!("write ${:02X} to unmapped I/O ${:04X}", data, addr);
            }
            cpu_mem::CARTRIDGE_SPACE_BASE..=u16::MAX => self.cartridge.cpu_write(addr, data),
        }
    }
}

/// Address of `reg` in the first PPU register mirror.
#[cfg(test)]
pub(crate) const fn ppu_register_addr(reg: Register) -> u16 {
    cpu_mem::PPU_REGISTER_BASE + reg as u16
}
