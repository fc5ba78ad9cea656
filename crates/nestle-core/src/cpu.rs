use std::{collections::VecDeque, fmt::Display};

use tracing::trace;

use crate::{
    bus::Bus,
    cpu::{instruction::Instruction, lookup::lookup, status::Status},
    error::{Error, Result},
    memory::cpu as cpu_mem,
};

pub mod addressing;
pub mod instruction;
pub mod lookup;
pub mod mnemonic;
pub mod status;

/// Number of executed instructions kept for post-mortem inspection.
pub const HISTORY_CAPACITY: usize = 50;

/// Cycles consumed by the reset and interrupt entry sequences.
const INTERRUPT_CYCLES: u8 = 7;

/// One entry of the trailing instruction history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub addr: u16,
    pub instruction: Instruction,
}

/// Read-only view of the register file.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CpuSnapshot {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub s: u8,
    pub p: u8,
    pub pc: u16,
    pub total_cycles: u64,
    pub remaining_cycles: u8,
    pub halted: bool,
}

/// The 2A03's 6502 core.
///
/// Instructions execute atomically on the first cycle they are fetched; the
/// following cycles of the instruction only count down `remaining_cycles`.
#[derive(Debug, Clone)]
pub struct Cpu {
    pub(crate) a: u8,
    pub(crate) x: u8,
    pub(crate) y: u8,
    pub(crate) s: u8,
    pub(crate) p: Status,
    pub(crate) pc: u16,

    // Operand latch, rewritten by every addressing-mode resolution.
    pub(crate) effective_addr: u16,
    pub(crate) base_addr: u16,
    pub(crate) fetched: u8,
    pub(crate) page_crossed: bool,
    pub(crate) accumulator_mode: bool,
    pub(crate) branch_offset: i8,

    extra_cycles: u8,
    remaining_cycles: u8,
    total_cycles: u64,
    halted: bool,
    history: VecDeque<HistoryEntry>,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            s: 0xFD,
            p: Status::POWER_ON,
            pc: 0,
            effective_addr: 0,
            base_addr: 0,
            fetched: 0,
            page_crossed: false,
            accumulator_mode: false,
            branch_offset: 0,
            extra_cycles: 0,
            remaining_cycles: 0,
            total_cycles: 0,
            halted: false,
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Cold boot: clears registers, silences the APU, loads the reset vector.
    pub fn power_up(&mut self, bus: &mut impl Bus) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.s = 0xFD;
        self.p = Status::POWER_ON;

        bus.write(cpu_mem::CONTROLLER_PORT_2, 0x00);
        bus.write(cpu_mem::APU_STATUS, 0x00);

        self.pc = self.read_word(bus, cpu_mem::RESET_VECTOR);
        self.remaining_cycles = INTERRUPT_CYCLES;
        self.extra_cycles = 0;
        self.total_cycles = 0;
        self.halted = false;
        self.history.clear();
    }

    /// Warm reset: A/X/Y survive, S drops by three, I is set.
    pub fn reset(&mut self, bus: &mut impl Bus) {
        self.s = self.s.wrapping_sub(3);
        self.p.insert(Status::INTERRUPT);
        self.pc = self.read_word(bus, cpu_mem::RESET_VECTOR);
        self.remaining_cycles = INTERRUPT_CYCLES;
        self.extra_cycles = 0;
        self.halted = false;
    }

    /// Stops instruction dispatch until the next power-up or reset.
    pub fn halt(&mut self) {
        self.halted = true;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Maskable interrupt. Ignored entirely while I is set or the CPU is
    /// halted.
    pub fn irq(&mut self, bus: &mut impl Bus) {
        if self.halted || self.p.contains(Status::INTERRUPT) {
            return;
        }
        self.enter_interrupt(bus, cpu_mem::IRQ_VECTOR);
    }

    /// Non-maskable interrupt. A halted CPU stays inert until reset.
    pub fn nmi(&mut self, bus: &mut impl Bus) {
        if self.halted {
            return;
        }
        self.enter_interrupt(bus, cpu_mem::NMI_VECTOR);
    }

    fn enter_interrupt(&mut self, bus: &mut impl Bus, vector: u16) {
        self.push_word(bus, self.pc);
        self.push(bus, self.p.to_stack_hardware());
        self.p.insert(Status::INTERRUPT);
        self.pc = self.read_word(bus, vector);
        self.remaining_cycles = self.remaining_cycles.saturating_add(INTERRUPT_CYCLES);
    }

    /// Advances one CPU cycle.
    ///
    /// Returns the cycles still owed by the current instruction before this
    /// tick, or 0 when this tick dispatched a new instruction (or the CPU is
    /// halted). An unassigned opcode is reported as [`Error::UnknownOpcode`]
    /// with PC left pointing past it.
    pub fn tick(&mut self, bus: &mut impl Bus) -> Result<u8> {
        if self.halted {
            return Ok(0);
        }
        self.total_cycles += 1;

        if self.remaining_cycles > 0 {
            let owed = self.remaining_cycles;
            self.remaining_cycles -= 1;
            return Ok(owed);
        }

        let addr = self.pc;
        let opcode = self.fetch_byte(bus);
        let instr = *lookup(opcode).ok_or(Error::UnknownOpcode { opcode, addr })?;

        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(HistoryEntry {
            addr,
            instruction: instr,
        });
        trace!("{:04X}  {:02X}  {:<8} {}", addr, opcode, instr.to_string(), self);

        self.extra_cycles = 0;
        self.resolve_addressing(instr.addressing, bus);
        self.execute(instr.mnemonic, bus);
        if self.page_crossed && instr.mnemonic.pays_page_cross() {
            self.extra_cycles += 1;
        }

        self.remaining_cycles = instr.cycles + self.extra_cycles - 1;
        Ok(0)
    }

    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            a: self.a,
            x: self.x,
            y: self.y,
            s: self.s,
            p: self.p.bits(),
            pc: self.pc,
            total_cycles: self.total_cycles,
            remaining_cycles: self.remaining_cycles,
            halted: self.halted,
        }
    }

    /// Most recent instructions, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    pub fn remaining_cycles(&self) -> u8 {
        self.remaining_cycles
    }

    pub(crate) fn fetch_byte(&mut self, bus: &mut impl Bus) -> u8 {
        let value = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    pub(crate) fn fetch_word(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = self.fetch_byte(bus);
        let hi = self.fetch_byte(bus);
        u16::from_le_bytes([lo, hi])
    }

    fn read_word(&self, bus: &mut impl Bus, addr: u16) -> u16 {
        let lo = bus.read(addr);
        let hi = bus.read(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Operand value: A in accumulator mode, otherwise memory.
    pub(crate) fn fetch_operand(&mut self, bus: &mut impl Bus) -> u8 {
        self.fetched = if self.accumulator_mode {
            self.a
        } else {
            bus.read(self.effective_addr)
        };
        self.fetched
    }

    /// Writes a read-modify-write result back to where the operand came from.
    pub(crate) fn store_operand(&mut self, bus: &mut impl Bus, value: u8) {
        if self.accumulator_mode {
            self.a = value;
        } else {
            bus.write(self.effective_addr, value);
        }
    }

    pub(crate) fn push(&mut self, bus: &mut impl Bus, value: u8) {
        bus.write(cpu_mem::STACK_PAGE | self.s as u16, value);
        self.s = self.s.wrapping_sub(1);
    }

    pub(crate) fn pop(&mut self, bus: &mut impl Bus) -> u8 {
        self.s = self.s.wrapping_add(1);
        bus.read(cpu_mem::STACK_PAGE | self.s as u16)
    }

    pub(crate) fn push_word(&mut self, bus: &mut impl Bus, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push(bus, hi);
        self.push(bus, lo);
    }

    pub(crate) fn pop_word(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = self.pop(bus);
        let hi = self.pop(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Taken branch: one extra cycle, two when the target is on another page.
    pub(crate) fn branch_if(&mut self, condition: bool) {
        if !condition {
            return;
        }
        let target = self.pc.wrapping_add(self.branch_offset as i16 as u16);
        self.extra_cycles += 1;
        if (target & 0xFF00) != (self.pc & 0xFF00) {
            self.extra_cycles += 1;
        }
        self.pc = target;
    }
}

impl Display for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
            self.a,
            self.x,
            self.y,
            self.p.bits(),
            self.s,
            self.total_cycles
        )
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::mock::MockBus;

    fn boot(program: &[u8]) -> (Cpu, MockBus) {
        let mut bus = MockBus::with_program(0x8000, program);
        bus.write(cpu_mem::RESET_VECTOR, 0x00);
        bus.write(cpu_mem::RESET_VECTOR + 1, 0x80);
        let mut cpu = Cpu::new();
        cpu.power_up(&mut bus);
        (cpu, bus)
    }

    fn run_ticks(cpu: &mut Cpu, bus: &mut MockBus, ticks: usize) {
        for _ in 0..ticks {
            cpu.tick(bus).expect("program only uses defined opcodes");
        }
    }

    #[test]
    fn power_up_loads_reset_vector_and_owes_seven_cycles() {
        let (cpu, _) = boot(&[]);
        let snap = cpu.snapshot();
        assert_eq!(snap.pc, 0x8000);
        assert_eq!(snap.s, 0xFD);
        assert_eq!(snap.p, 0x24);
        assert_eq!(snap.remaining_cycles, 7);
    }

    #[test]
    fn tick_counts_down_owed_cycles_before_dispatch() {
        // LDA #$01 (2 cycles), LDA #$02
        let (mut cpu, mut bus) = boot(&[0xA9, 0x01, 0xA9, 0x02]);
        for owed in (1..=7).rev() {
            assert_eq!(cpu.tick(&mut bus).ok(), Some(owed));
        }
        assert_eq!(cpu.tick(&mut bus).ok(), Some(0));
        assert_eq!(cpu.a, 0x01);
        assert_eq!(cpu.tick(&mut bus).ok(), Some(1));
        assert_eq!(cpu.tick(&mut bus).ok(), Some(0));
        assert_eq!(cpu.a, 0x02);
        assert_eq!(cpu.total_cycles(), 10);
    }

    #[test]
    fn unknown_opcode_is_reported_with_its_address() {
        let (mut cpu, mut bus) = boot(&[0xEA, 0x02]);
        run_ticks(&mut cpu, &mut bus, 7 + 2);
        let err = cpu.tick(&mut bus).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownOpcode {
                opcode: 0x02,
                addr: 0x8001
            }
        ));
    }

    #[test]
    fn halted_cpu_stops_counting() {
        let (mut cpu, mut bus) = boot(&[0xEA]);
        cpu.halt();
        assert_eq!(cpu.tick(&mut bus).ok(), Some(0));
        assert_eq!(cpu.total_cycles(), 0);
        assert!(cpu.is_halted());
    }

    #[test]
    fn irq_is_masked_by_interrupt_flag_but_nmi_is_not() {
        let (mut cpu, mut bus) = boot(&[0xEA]);
        bus.write(cpu_mem::IRQ_VECTOR, 0x00);
        bus.write(cpu_mem::IRQ_VECTOR + 1, 0x90);
        bus.write(cpu_mem::NMI_VECTOR, 0x00);
        bus.write(cpu_mem::NMI_VECTOR + 1, 0xA0);

        cpu.irq(&mut bus);
        assert_eq!(cpu.pc, 0x8000);

        cpu.nmi(&mut bus);
        assert_eq!(cpu.pc, 0xA000);
        assert_eq!(cpu.remaining_cycles(), 14);
        // Hardware interrupts push B clear, U set.
        assert_eq!(bus.read(0x01FB), 0x24);

        cpu.p.remove(Status::INTERRUPT);
        cpu.irq(&mut bus);
        assert_eq!(cpu.pc, 0x9000);
    }

    #[test]
    fn halted_cpu_ignores_interrupts() {
        let (mut cpu, mut bus) = boot(&[0xEA]);
        bus.write(cpu_mem::NMI_VECTOR + 1, 0xA0);
        cpu.p.remove(Status::INTERRUPT);
        cpu.halt();
        let before = cpu.snapshot();

        cpu.nmi(&mut bus);
        cpu.irq(&mut bus);
        assert_eq!(cpu.snapshot(), before);
        assert_eq!(bus.read(0x01FD), 0);

        cpu.reset(&mut bus);
        cpu.nmi(&mut bus);
        assert_eq!(cpu.pc, 0xA000);
    }

    #[test]
    fn reset_keeps_registers_and_drops_stack_pointer() {
        let (mut cpu, mut bus) = boot(&[0xA9, 0x33]);
        run_ticks(&mut cpu, &mut bus, 8);
        cpu.reset(&mut bus);
        assert_eq!(cpu.a, 0x33);
        assert_eq!(cpu.s, 0xFA);
        assert_eq!(cpu.pc, 0x8000);
        assert!(cpu.p.contains(Status::INTERRUPT));
    }

    #[test]
    fn history_keeps_only_the_most_recent_instructions() {
        let program = [0xEA; 80];
        let (mut cpu, mut bus) = boot(&program);
        run_ticks(&mut cpu, &mut bus, 7 + 60 * 2);
        let entries: Vec<_> = cpu.history().collect();
        assert_eq!(entries.len(), HISTORY_CAPACITY);
        assert_eq!(entries[0].addr, 0x8000 + 10);
        assert_eq!(entries[HISTORY_CAPACITY - 1].addr, 0x8000 + 59);
        assert_eq!(entries[0].instruction.to_string(), "nop imp");
    }
}
