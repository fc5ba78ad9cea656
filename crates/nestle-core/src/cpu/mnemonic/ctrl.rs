use crate::{
    bus::Bus,
    cpu::{Cpu, status::Status},
    memory::cpu as cpu_mem,
};

impl Cpu {
    /// NV-BDIZC
    /// -----1--
    ///
    /// BRK - Force Break
    ///
    /// Pushes PC + 2 (the padding byte is skipped) and P with B and U set,
    /// then jumps through the IRQ vector.
    pub(crate) fn brk(&mut self, bus: &mut impl Bus) {
        let ret = self.pc.wrapping_add(1);
        self.push_word(bus, ret);
        self.push(bus, self.p.to_stack_software());
        self.p.insert(Status::INTERRUPT);
        let lo = bus.read(cpu_mem::IRQ_VECTOR);
        let hi = bus.read(cpu_mem::IRQ_VECTOR.wrapping_add(1));
        self.pc = u16::from_le_bytes([lo, hi]);
    }

    pub(crate) fn jmp(&mut self) {
        self.pc = self.effective_addr;
    }

    /// JSR - Jump to New Location Saving Return Address
    ///
    /// The pushed address is the last byte of the JSR itself; RTS adds one.
    pub(crate) fn jsr(&mut self, bus: &mut impl Bus) {
        let ret = self.pc.wrapping_sub(1);
        self.push_word(bus, ret);
        self.pc = self.effective_addr;
    }

    /// RTI - Return from Interrupt. B and U are not restored from the stack.
    pub(crate) fn rti(&mut self, bus: &mut impl Bus) {
        let pulled = self.pop(bus);
        self.p.restore_from_stack(pulled);
        self.pc = self.pop_word(bus);
    }

    pub(crate) fn rts(&mut self, bus: &mut impl Bus) {
        self.pc = self.pop_word(bus).wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        bus::mock::MockBus,
        cpu::{Cpu, status::Status, test_support::step},
    };

    #[test]
    fn jsr_then_rts_resumes_after_call() {
        let mut bus = MockBus::with_program(0x8000, &[0x20, 0x00, 0x90]);
        bus.write(0x9000, 0x60);
        let mut cpu = Cpu::new();
        cpu.pc = 0x8000;

        assert_eq!(step(&mut cpu, &mut bus), 6);
        assert_eq!(cpu.pc, 0x9000);
        assert_eq!(bus.read(0x01FD), 0x80);
        assert_eq!(bus.read(0x01FC), 0x02);

        assert_eq!(step(&mut cpu, &mut bus), 6);
        assert_eq!(cpu.pc, 0x8003);
        assert_eq!(cpu.s, 0xFD);
    }

    #[test]
    fn brk_and_rti_round_trip() {
        let mut bus = MockBus::with_program(0x8000, &[0x00, 0xEA]);
        bus.write(0xFFFE, 0x00);
        bus.write(0xFFFF, 0x90);
        bus.write(0x9000, 0x40);
        let mut cpu = Cpu::new();
        cpu.pc = 0x8000;
        cpu.p = Status::UNUSED | Status::CARRY;

        assert_eq!(step(&mut cpu, &mut bus), 7);
        assert_eq!(cpu.pc, 0x9000);
        assert!(cpu.p.contains(Status::INTERRUPT));
        assert_eq!(bus.read(0x01FB), 0x31);

        assert_eq!(step(&mut cpu, &mut bus), 6);
        assert_eq!(cpu.pc, 0x8002);
        assert_eq!(cpu.p, Status::UNUSED | Status::CARRY);
    }

    #[test]
    fn jmp_indirect_uses_page_wrap_quirk() {
        let mut bus = MockBus::with_program(0x8000, &[0x6C, 0xFF, 0x02]);
        bus.write(0x02FF, 0x34);
        bus.write(0x0200, 0x12);
        bus.write(0x0300, 0x56);
        let mut cpu = Cpu::new();
        cpu.pc = 0x8000;
        assert_eq!(step(&mut cpu, &mut bus), 5);
        assert_eq!(cpu.pc, 0x1234);
    }
}
