use tracing::debug;

use crate::{bus::Bus, memory::cpu as cpu_mem};

/// Destination register of every OAM DMA byte.
const OAM_DATA: u16 = cpu_mem::PPU_REGISTER_BASE + 4;
const TRANSFER_LEN: u16 = 0x100;

/// Sprite DMA engine triggered by a `$4014` write.
///
/// While a transfer runs the CPU is stalled. After a one or two cycle
/// alignment delay the engine alternates between reading a byte from the
/// source page and writing it to OAMDATA, so 256 bytes take 512 cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OamDma {
    /// Source page, the high byte of every read address.
    page: u8,
    /// Bytes not yet written to OAMDATA; zero when idle.
    bytes_left: u16,
    /// Dummy cycles still to burn before the first read.
    alignment: u8,
    /// `false` on read cycles, `true` on write cycles.
    write_phase: bool,
    /// Byte read on the last read cycle.
    data: u8,
}

impl OamDma {
    /// An idle engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a transfer from `page << 8`. Odd CPU cycles add one alignment cycle.
    pub fn start(&mut self, page: u8, cpu_cycle: u64) {
        self.page = page;
        self.bytes_left = TRANSFER_LEN;
        self.alignment = 1 + (cpu_cycle % 2) as u8;
        self.write_phase = false;
        debug!("OAM DMA from ${:02X}00 at cycle {}", page, cpu_cycle);
    }

    /// Whether a transfer is holding the bus.
    pub fn is_active(&self) -> bool {
        self.bytes_left > 0
    }

    /// Bytes still to be copied.
    pub fn bytes_left(&self) -> u16 {
        self.bytes_left
    }

    /// Runs one CPU cycle of the transfer and returns the bytes left.
    pub fn step(&mut self, bus: &mut impl Bus) -> u16 {
        if !self.is_active() {
            return 0;
        }
        if self.alignment > 0 {
            self.alignment -= 1;
            return self.bytes_left;
        }

        if self.write_phase {
            bus.write(OAM_DATA, self.data);
            self.bytes_left -= 1;
        } else {
            let offset = TRANSFER_LEN - self.bytes_left;
            let addr = u16::from_le_bytes([0, self.page]) | offset;
            self.data = bus.read(addr);
        }
        self.write_phase = !self.write_phase;
        self.bytes_left
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::mock::MockBus;

    fn run_to_completion(dma: &mut OamDma, bus: &mut MockBus) -> u32 {
        let mut cycles = 0;
        while dma.is_active() {
            dma.step(bus);
            cycles += 1;
        }
        cycles
    }

    #[test]
    fn transfer_length_depends_on_cycle_parity() {
        let mut bus = MockBus::default();

        let mut dma = OamDma::new();
        dma.start(0x02, 100);
        assert_eq!(dma.bytes_left(), 256);
        assert_eq!(dma.step(&mut bus), 256);
        assert_eq!(run_to_completion(&mut dma, &mut bus), 512);
        assert_eq!(dma.bytes_left(), 0);

        dma.start(0x02, 101);
        assert_eq!(run_to_completion(&mut dma, &mut bus), 514);
    }

    #[test]
    fn copies_the_whole_page_in_order() {
        let mut bus = MockBus::default();
        for i in 0..=0xFF_u16 {
            bus.write(0x0300 + i, i as u8);
        }

        let mut dma = OamDma::new();
        dma.start(0x03, 0);
        run_to_completion(&mut dma, &mut bus);

        // The mock has no PPU; OAMDATA just holds the last byte written.
        assert_eq!(bus.read(OAM_DATA), 0xFF);
    }

    #[test]
    fn idle_engine_does_nothing() {
        let mut bus = MockBus::default();
        let mut dma = OamDma::new();
        assert!(!dma.is_active());
        assert_eq!(dma.step(&mut bus), 0);
    }
}
