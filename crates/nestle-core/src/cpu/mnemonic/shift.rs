use crate::{
    bus::Bus,
    cpu::{Cpu, status::Status},
};

impl Cpu {
    /// NV-BDIZC
    /// ✓-----✓✓
    ///
    /// ASL - Arithmetic Shift Left
    /// Operation: C ← /M7...M0/ ← 0
    pub(crate) fn asl(&mut self, bus: &mut impl Bus) {
        let m = self.fetch_operand(bus);
        let result = self.shift_left(m);
        self.store_operand(bus, result);
    }

    /// NV-BDIZC
    /// 0-----✓✓
    ///
    /// LSR - Logical Shift Right
    /// Operation: 0 → /M7...M0/ → C
    pub(crate) fn lsr(&mut self, bus: &mut impl Bus) {
        let m = self.fetch_operand(bus);
        let result = self.shift_right(m);
        self.store_operand(bus, result);
    }

    /// NV-BDIZC
    /// ✓-----✓✓
    ///
    /// ROL - Rotate Left
    /// Operation: C ← /M7...M0/ ← C
    pub(crate) fn rol(&mut self, bus: &mut impl Bus) {
        let m = self.fetch_operand(bus);
        let result = self.rotate_left(m);
        self.store_operand(bus, result);
    }

    /// NV-BDIZC
    /// ✓-----✓✓
    ///
    /// ROR - Rotate Right
    /// Operation: C → /M7...M0/ → C
    pub(crate) fn ror(&mut self, bus: &mut impl Bus) {
        let m = self.fetch_operand(bus);
        let result = self.rotate_right(m);
        self.store_operand(bus, result);
    }

    pub(crate) fn shift_left(&mut self, value: u8) -> u8 {
        let result = value << 1;
        self.p.set(Status::CARRY, value & 0x80 != 0);
        self.p.set_zn(result);
        result
    }

    pub(crate) fn shift_right(&mut self, value: u8) -> u8 {
        let result = value >> 1;
        self.p.set(Status::CARRY, value & 0x01 != 0);
        self.p.set_zn(result);
        result
    }

    pub(crate) fn rotate_left(&mut self, value: u8) -> u8 {
        let result = (value << 1) | self.p.c() as u8;
        self.p.set(Status::CARRY, value & 0x80 != 0);
        self.p.set_zn(result);
        result
    }

    pub(crate) fn rotate_right(&mut self, value: u8) -> u8 {
        let result = (value >> 1) | ((self.p.c() as u8) << 7);
        self.p.set(Status::CARRY, value & 0x01 != 0);
        self.p.set_zn(result);
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        bus::mock::MockBus,
        cpu::{Cpu, status::Status, test_support::step},
    };

    #[test]
    fn ror_accumulator_rotates_carry_in() {
        let mut bus = MockBus::with_program(0x8000, &[0x6A]);
        let mut cpu = Cpu::new();
        cpu.pc = 0x8000;
        cpu.a = 0x01;
        cpu.p.insert(Status::CARRY);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.p.contains(Status::CARRY));
        assert!(cpu.p.contains(Status::NEGATIVE));
    }

    #[test]
    fn asl_memory_writes_back() {
        let mut bus = MockBus::with_program(0x8000, &[0x06, 0x40]);
        bus.write(0x0040, 0xC0);
        let mut cpu = Cpu::new();
        cpu.pc = 0x8000;
        let cycles = step(&mut cpu, &mut bus);
        assert_eq!(bus.read(0x0040), 0x80);
        assert!(cpu.p.contains(Status::CARRY));
        assert_eq!(cycles, 5);
    }
}
