//! Audio processing unit, reduced to the frame sequencer.
//!
//! Sound channels are not synthesized. The frame sequencer is kept because
//! its interrupt is visible to software: in 4-step mode it raises the CPU
//! IRQ line near the end of every sequence unless inhibited via `$4017`.

use tracing::trace;

use crate::memory::cpu as cpu_mem;

/// Sequencer steps (one per two CPU cycles) that assert the frame IRQ.
const IRQ_STEPS: [u16; 2] = [14914, 14915];
/// Last sequencer step before wrapping.
const SEQUENCE_END: u16 = 14915;

/// Frame sequencer timing mode, selected by `$4017` bit 7.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrameCounterMode {
    #[default]
    FourStep,
    FiveStep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Apu {
    mode: FrameCounterMode,
    irq_inhibit: bool,
    frame_irq: bool,
    sequencer: u16,
    /// CPU cycles until a `$4017` write resets the sequencer.
    reset_delay: Option<u8>,
    /// The sequencer acts on every other CPU cycle.
    action_latch: bool,
}

impl Default for Apu {
    fn default() -> Self {
        Self::new()
    }
}

impl Apu {
    pub fn new() -> Self {
        Self {
            mode: FrameCounterMode::FourStep,
            irq_inhibit: false,
            frame_irq: false,
            sequencer: 0,
            reset_delay: None,
            action_latch: true,
        }
    }

    pub fn power_up(&mut self) {
        *self = Self::new();
    }

    /// Reset leaves the mode bits alone and silences a pending interrupt.
    pub fn reset(&mut self) {
        self.frame_irq = false;
        self.sequencer = 0;
        self.reset_delay = None;
    }

    pub fn mode(&self) -> FrameCounterMode {
        self.mode
    }

    pub fn irq_pending(&self) -> bool {
        self.frame_irq
    }

    /// Advances one CPU cycle. Returns `true` while the frame IRQ is being
    /// asserted on this cycle.
    pub fn tick(&mut self) -> bool {
        if let Some(delay) = self.reset_delay {
            if delay <= 1 {
                self.sequencer = 0;
                self.reset_delay = None;
            } else {
                self.reset_delay = Some(delay - 1);
            }
        }

        self.action_latch = !self.action_latch;
        if self.action_latch {
            return false;
        }

        let mut assert_irq = false;
        if IRQ_STEPS.contains(&self.sequencer)
            && self.mode == FrameCounterMode::FourStep
            && !self.irq_inhibit
        {
            self.frame_irq = true;
            assert_irq = true;
        }

        self.sequencer = if self.sequencer == SEQUENCE_END {
            0
        } else {
            self.sequencer + 1
        };
        assert_irq
    }

    /// `$4015` read: bit 6 reports the frame interrupt, which the read clears.
    pub fn read_status(&mut self) -> u8 {
        let status = if self.frame_irq { 0x40 } else { 0x00 };
        self.frame_irq = false;
        status
    }

    /// `$4000-$4013`, `$4015`, `$4017` writes.
    pub fn cpu_write(&mut self, addr: u16, data: u8) {
        match addr {
            cpu_mem::CONTROLLER_PORT_2 => {
                self.mode = if data & 0x80 != 0 {
                    FrameCounterMode::FiveStep
                } else {
                    FrameCounterMode::FourStep
                };
                self.irq_inhibit = data & 0x40 != 0;
                if self.irq_inhibit {
                    self.frame_irq = false;
                }
                // Three cycles when the next cycle is an acting one, four otherwise.
                self.reset_delay = Some(if self.action_latch { 3 } else { 4 });
                trace!(
                    "frame counter: {:?}, irq inhibit {}",
                    self.mode, self.irq_inhibit
                );
            }
            _ => trace!("APU write ${:02X} -> ${:04X} ignored", data, addr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs until the first asserted IRQ, returning the CPU cycle it landed on.
    fn first_irq_cycle(apu: &mut Apu, limit: u32) -> Option<u32> {
        (1..=limit).find(|_| apu.tick())
    }

    #[test]
    fn four_step_mode_raises_irq_near_end_of_sequence() {
        let mut apu = Apu::new();
        let cycle = first_irq_cycle(&mut apu, 40_000).expect("irq should fire");
        assert_eq!(cycle, 2 * 14914 + 1);
        assert!(apu.irq_pending());
        assert_eq!(apu.read_status(), 0x40);
        assert_eq!(apu.read_status(), 0x00);
    }

    #[test]
    fn inhibit_bit_blocks_and_clears_irq() {
        let mut apu = Apu::new();
        first_irq_cycle(&mut apu, 40_000).expect("irq should fire");
        apu.cpu_write(cpu_mem::CONTROLLER_PORT_2, 0x40);
        assert!(!apu.irq_pending());
        assert_eq!(first_irq_cycle(&mut apu, 100_000), None);
    }

    #[test]
    fn five_step_mode_never_raises_irq() {
        let mut apu = Apu::new();
        apu.cpu_write(cpu_mem::CONTROLLER_PORT_2, 0x80);
        assert_eq!(apu.mode(), FrameCounterMode::FiveStep);
        assert_eq!(first_irq_cycle(&mut apu, 100_000), None);
    }

    #[test]
    fn frame_counter_write_restarts_sequence_after_delay() {
        let mut apu = Apu::new();
        for _ in 0..20_000 {
            apu.tick();
        }
        apu.cpu_write(cpu_mem::CONTROLLER_PORT_2, 0x00);
        let cycle = first_irq_cycle(&mut apu, 40_000).expect("irq should fire");
        // The restart lands 3 or 4 cycles after the write, then the full
        // 14914 acting steps elapse again.
        assert!((2 * 14914..=2 * 14914 + 5).contains(&cycle), "cycle {cycle}");
    }
}
