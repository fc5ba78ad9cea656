use tracing::{error, info};

use crate::{
    apu::Apu,
    bus::{CpuBus, OamDma, PpuBus, VideoMemory},
    cartridge::Cartridge,
    controller::{ControllerPort, InputSource},
    cpu::Cpu,
    error::Error,
    memory::cpu as cpu_mem,
    ppu::{NullSink, PixelSink, Ppu, PpuSnapshot},
};

pub mod apu;
pub mod bus;
pub mod cartridge;
pub mod controller;
pub mod cpu;
pub mod error;
pub mod memory;
pub mod ppu;

pub use cpu::CpuSnapshot;

/// PPU dots per CPU cycle on NTSC hardware.
const DOTS_PER_CPU_CYCLE: usize = 3;

/// The whole console: CPU, PPU, APU frame counter, RAM, controller port and
/// the inserted cartridge, stepped in lockstep one CPU cycle at a time.
pub struct Nes {
    cpu: Cpu,
    ppu: Ppu,
    apu: Apu,
    ram: [u8; cpu_mem::WORK_RAM_SIZE],
    vram: VideoMemory,
    controllers: ControllerPort,
    dma: OamDma,
    /// Page written to `$4014`, picked up at the end of the current cycle.
    oam_dma_request: Option<u8>,
    cartridge: Cartridge,
    sink: Box<dyn PixelSink>,
    /// CPU cycles since power-on, DMA stalls included.
    cycles: u64,
    /// Fault that halted the CPU, if any.
    fault: Option<Error>,
}

impl std::fmt::Debug for Nes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Nes")
            .field("cpu", &self.cpu)
            .field("ppu", &self.ppu)
            .field("apu", &self.apu)
            .field("controllers", &self.controllers)
            .field("dma", &self.dma)
            .field("cycles", &self.cycles)
            .field("fault", &self.fault)
            .finish_non_exhaustive()
    }
}

impl Nes {
    /// Builds a console around `cartridge` and powers it on. Pixels are
    /// discarded until a sink is attached with [`Nes::set_pixel_sink`].
    pub fn new(cartridge: Cartridge) -> Self {
        let mut nes = Self {
            cpu: Cpu::new(),
            ppu: Ppu::new(),
            apu: Apu::new(),
            ram: [0; cpu_mem::WORK_RAM_SIZE],
            vram: VideoMemory::new(),
            controllers: ControllerPort::new(),
            dma: OamDma::new(),
            oam_dma_request: None,
            cartridge,
            sink: Box::new(NullSink),
            cycles: 0,
            fault: None,
        };
        nes.power_on();
        nes
    }

    pub fn set_pixel_sink(&mut self, sink: Box<dyn PixelSink>) {
        self.sink = sink;
    }

    /// Plugs an input device into controller port 0 or 1.
    pub fn connect_controller(&mut self, port: usize, source: Box<dyn InputSource>) {
        self.controllers.connect(port, source);
    }

    /// Cold boot: clears RAM and video memory, powers up every component.
    pub fn power_on(&mut self) {
        self.ram.fill(0);
        self.vram = VideoMemory::new();
        self.ppu.power_up();
        self.apu.power_up();
        self.dma = OamDma::new();
        self.oam_dma_request = None;
        self.cycles = 0;
        self.fault = None;

        let (cpu, _, mut bus) = self.split();
        cpu.power_up(&mut bus);
        info!(
            mapper = self.cartridge.header().mapper,
            pc = format_args!("${:04X}", self.cpu.snapshot().pc),
            "power on"
        );
    }

    /// Reset button: RAM and video memory survive.
    pub fn reset(&mut self) {
        self.ppu.reset();
        self.apu.reset();
        self.dma = OamDma::new();
        self.oam_dma_request = None;
        self.fault = None;

        let (cpu, _, mut bus) = self.split();
        cpu.reset(&mut bus);
        info!(pc = format_args!("${:04X}", self.cpu.snapshot().pc), "reset");
    }

    /// Advances one CPU cycle and three PPU dots.
    ///
    /// Returns the CPU's remaining-cycle count, or the bytes left to copy
    /// while an OAM DMA transfer holds the bus.
    pub fn tick(&mut self) -> u16 {
        self.controllers.tick();

        let owed = self.cpu_cycle();
        if let Some(page) = self.oam_dma_request.take() {
            self.dma.start(page, self.cycles);
        }

        for _ in 0..DOTS_PER_CPU_CYCLE {
            if self.ppu_dot() {
                let (cpu, _, mut bus) = self.split();
                cpu.nmi(&mut bus);
            }
        }

        if self.apu.tick() {
            let (cpu, _, mut bus) = self.split();
            cpu.irq(&mut bus);
        }

        self.cycles += 1;
        owed
    }

    /// Runs until the current instruction (or the power-on/reset sequence,
    /// or a DMA transfer) has used up all its cycles. Returns immediately
    /// once the CPU is halted.
    pub fn step_instruction(&mut self) {
        loop {
            self.tick();
            if self.cpu.is_halted() || (self.cpu.remaining_cycles() == 0 && !self.dma.is_active()) {
                break;
            }
        }
    }

    /// Runs until the PPU reaches the start of vblank. A halted CPU does not
    /// stop the PPU, so frames keep completing after a fault.
    pub fn run_frame(&mut self) {
        loop {
            self.tick();
            if self.ppu.take_frame_done() {
                break;
            }
        }
    }

    /// Side-effect-free read of the CPU address space for debuggers.
    pub fn peek_cpu(&mut self, addr: u16) -> u8 {
        let (_, _, bus) = self.split();
        bus.peek(addr)
    }

    pub fn cpu_snapshot(&self) -> CpuSnapshot {
        self.cpu.snapshot()
    }

    pub fn ppu_snapshot(&self) -> PpuSnapshot {
        self.ppu.snapshot()
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    pub fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }

    pub fn is_halted(&self) -> bool {
        self.cpu.is_halted()
    }

    /// The error that halted the CPU, kept until the next power-on or reset.
    pub fn fault(&self) -> Option<&Error> {
        self.fault.as_ref()
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    fn split(&mut self) -> (&mut Cpu, &mut OamDma, CpuBus<'_>) {
        let Self {
            cpu,
            ppu,
            apu,
            ram,
            vram,
            controllers,
            dma,
            oam_dma_request,
            cartridge,
            ..
        } = self;
        let bus = CpuBus::new(ram, ppu, vram, cartridge, apu, controllers, oam_dma_request);
        (cpu, dma, bus)
    }

    /// One CPU-side cycle: a DMA step if a transfer is running, otherwise a
    /// CPU tick. Fatal CPU errors halt the CPU here.
    fn cpu_cycle(&mut self) -> u16 {
        let (cpu, dma, mut bus) = self.split();
        if dma.is_active() {
            return dma.step(&mut bus);
        }
        match cpu.tick(&mut bus) {
            Ok(owed) => u16::from(owed),
            Err(err) => {
                self.halt_on(err);
                0
            }
        }
    }

    fn halt_on(&mut self, err: Error) {
        error!(cycle = self.cycles, "{err}; CPU halted");
        for entry in self.cpu.history() {
            error!("  ${:04X}  {}", entry.addr, entry.instruction);
        }
        self.cpu.halt();
        self.fault = Some(err);
    }

    fn ppu_dot(&mut self) -> bool {
        let mut bus = PpuBus::new(&mut self.vram, &mut self.cartridge);
        self.ppu.tick(&mut bus, self.sink.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use ctor::ctor;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    use super::*;
    use crate::cartridge::test_support::nrom_with_program;

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

    #[test]
    fn power_on_owes_the_reset_sequence() {
        let mut nes = Nes::new(nrom_with_program(&[0xEA]));
        assert_eq!(nes.cpu_snapshot().remaining_cycles, 7);
        nes.step_instruction();
        assert_eq!(nes.cycles(), 7);
        assert_eq!(nes.cpu_snapshot().pc, 0x8000);
        nes.step_instruction();
        assert_eq!(nes.cycles(), 9);
        assert_eq!(nes.cpu_snapshot().pc, 0x8001);
    }

    #[test]
    fn three_dots_per_cpu_cycle() {
        let mut nes = Nes::new(nrom_with_program(&[]));
        for _ in 0..10 {
            nes.tick();
        }
        let ppu = nes.ppu_snapshot();
        // First dot lands on (0, 0).
        assert_eq!((ppu.scanline, ppu.dot), (0, 29));
    }

    #[test]
    fn dma_stalls_the_cpu() {
        // LDA #$02; STA $4014; NOP
        let mut nes = Nes::new(nrom_with_program(&[0xA9, 0x02, 0x8D, 0x14, 0x40, 0xEA]));
        nes.step_instruction();
        nes.step_instruction();
        let before = nes.cycles();
        nes.step_instruction();
        assert!(!nes.dma.is_active());
        let spent = nes.cycles() - before;
        assert!(spent == 4 + 513 || spent == 4 + 514, "spent {spent}");
        assert_eq!(nes.cpu_snapshot().pc, 0x8005);
    }

    #[test]
    fn unknown_opcode_halts_and_keeps_ppu_running() {
        let mut nes = Nes::new(nrom_with_program(&[0xEA, 0x02]));
        for _ in 0..4 {
            nes.step_instruction();
        }
        assert!(nes.is_halted());
        assert!(matches!(
            nes.fault(),
            Some(Error::UnknownOpcode {
                opcode: 0x02,
                addr: 0x8001
            })
        ));
        let frames = nes.ppu().frame_count();
        nes.run_frame();
        assert_eq!(nes.ppu().frame_count(), frames + 1);
        assert!(nes.is_halted());

        nes.reset();
        assert!(!nes.is_halted());
        assert!(nes.fault().is_none());
    }

    #[test]
    fn peek_has_no_side_effects() {
        let mut nes = Nes::new(nrom_with_program(&[0xA9, 0x42]));
        assert_eq!(nes.peek_cpu(0x8001), 0x42);
        assert_eq!(nes.peek_cpu(0x2002), 0);
        assert_eq!(nes.ppu_snapshot().status, 0xA0);
    }
}
