use crate::{
    bus::Bus,
    cpu::{Cpu, status::Status},
};

impl Cpu {
    /// NV-BDIZC
    /// ✓✓----✓✓
    ///
    /// ADC - Add Memory to Accumulator with Carry
    /// Operation: A + M + C → A, C
    ///
    /// Decimal mode is not wired on the 2A03; D is stored but ignored.
    pub(crate) fn adc(&mut self, bus: &mut impl Bus) {
        let m = self.fetch_operand(bus);
        self.add_with_carry(m);
    }

    /// NV-BDIZC
    /// ✓✓----✓✓
    ///
    /// SBC - Subtract Memory from Accumulator with Borrow
    /// Operation: A - M - ~C → A
    pub(crate) fn sbc(&mut self, bus: &mut impl Bus) {
        let m = self.fetch_operand(bus);
        self.add_with_carry(!m);
    }

    /// NV-BDIZC
    /// ✓-----✓✓
    ///
    /// CMP - Compare Memory with Accumulator
    /// Operation: A - M
    pub(crate) fn cmp(&mut self, bus: &mut impl Bus) {
        let m = self.fetch_operand(bus);
        self.compare(self.a, m);
    }

    /// CPX - Compare Index Register X to Memory. Same flags as CMP.
    pub(crate) fn cpx(&mut self, bus: &mut impl Bus) {
        let m = self.fetch_operand(bus);
        self.compare(self.x, m);
    }

    /// CPY - Compare Index Register Y to Memory. Same flags as CMP.
    pub(crate) fn cpy(&mut self, bus: &mut impl Bus) {
        let m = self.fetch_operand(bus);
        self.compare(self.y, m);
    }

    /// NV-BDIZC
    /// ✓-----✓✓
    ///
    /// ALR (ASR) - AND then Logical Shift Right (undocumented)
    /// Operation: (A ∧ M) / 2 → A
    pub(crate) fn alr(&mut self, bus: &mut impl Bus) {
        let m = self.fetch_operand(bus);
        self.a = self.shift_right(self.a & m);
    }

    /// NV-BDIZC
    /// ✓-----✓✓
    ///
    /// ANC - AND Memory with Accumulator then copy N to C (undocumented)
    pub(crate) fn anc(&mut self, bus: &mut impl Bus) {
        self.a &= self.fetch_operand(bus);
        self.p.set_zn(self.a);
        self.p.set(Status::CARRY, self.a & 0x80 != 0);
    }

    /// ANE (XAA) - X AND Memory → A (undocumented, unstable on hardware)
    ///
    /// Modeled without the analog "magic" constant: A = X ∧ M.
    pub(crate) fn ane(&mut self, bus: &mut impl Bus) {
        self.a = self.x & self.fetch_operand(bus);
        self.p.set_zn(self.a);
    }

    /// NV-BDIZC
    /// ✓✓----✓✓
    ///
    /// ARR - AND then Rotate Right (undocumented)
    /// Operation: (A ∧ M) / 2 → A, C ← A6, V ← A6 ⊕ A5
    pub(crate) fn arr(&mut self, bus: &mut impl Bus) {
        let m = self.fetch_operand(bus);
        let carry_in = (self.p.c() as u8) << 7;
        self.a = ((self.a & m) >> 1) | carry_in;
        self.p.set_zn(self.a);
        let bit6 = self.a & 0x40 != 0;
        let bit5 = self.a & 0x20 != 0;
        self.p.set(Status::CARRY, bit6);
        self.p.set(Status::OVERFLOW, bit6 ^ bit5);
    }

    /// LXA (LAX immediate) - Memory → A → X (undocumented, unstable)
    pub(crate) fn lxa(&mut self, bus: &mut impl Bus) {
        let m = self.fetch_operand(bus);
        self.a = m;
        self.x = m;
        self.p.set_zn(m);
    }

    /// NV-BDIZC
    /// ✓-----✓✓
    ///
    /// SBX (AXS) - (A ∧ X) - M → X, without borrow (undocumented)
    pub(crate) fn sbx(&mut self, bus: &mut impl Bus) {
        let m = self.fetch_operand(bus);
        let ax = self.a & self.x;
        self.x = ax.wrapping_sub(m);
        self.p.set(Status::CARRY, ax >= m);
        self.p.set_zn(self.x);
    }

    /// DCP (DCM) - DEC then CMP (undocumented)
    pub(crate) fn dcp(&mut self, bus: &mut impl Bus) {
        let result = self.fetch_operand(bus).wrapping_sub(1);
        self.store_operand(bus, result);
        self.compare(self.a, result);
    }

    /// ISC (ISB) - INC then SBC (undocumented)
    pub(crate) fn isc(&mut self, bus: &mut impl Bus) {
        let result = self.fetch_operand(bus).wrapping_add(1);
        self.store_operand(bus, result);
        self.add_with_carry(!result);
    }

    /// RLA - ROL then AND (undocumented)
    pub(crate) fn rla(&mut self, bus: &mut impl Bus) {
        let m = self.fetch_operand(bus);
        let result = self.rotate_left(m);
        self.store_operand(bus, result);
        self.a &= result;
        self.p.set_zn(self.a);
    }

    /// RRA - ROR then ADC (undocumented)
    pub(crate) fn rra(&mut self, bus: &mut impl Bus) {
        let m = self.fetch_operand(bus);
        let result = self.rotate_right(m);
        self.store_operand(bus, result);
        self.add_with_carry(result);
    }

    /// SLO (ASO) - ASL then ORA (undocumented)
    pub(crate) fn slo(&mut self, bus: &mut impl Bus) {
        let m = self.fetch_operand(bus);
        let result = self.shift_left(m);
        self.store_operand(bus, result);
        self.a |= result;
        self.p.set_zn(self.a);
    }

    /// SRE (LSE) - LSR then EOR (undocumented)
    pub(crate) fn sre(&mut self, bus: &mut impl Bus) {
        let m = self.fetch_operand(bus);
        let result = self.shift_right(m);
        self.store_operand(bus, result);
        self.a ^= result;
        self.p.set_zn(self.a);
    }

    fn add_with_carry(&mut self, m: u8) {
        let a = self.a;
        let sum = a as u16 + m as u16 + self.p.c() as u16;
        let result = sum as u8;
        self.p.set(Status::CARRY, sum > 0xFF);
        self.p
            .set(Status::OVERFLOW, (!(a ^ m) & (a ^ result) & 0x80) != 0);
        self.a = result;
        self.p.set_zn(result);
    }

    fn compare(&mut self, register: u8, m: u8) {
        self.p.set(Status::CARRY, register >= m);
        self.p.set_zn(register.wrapping_sub(m));
    }
}
