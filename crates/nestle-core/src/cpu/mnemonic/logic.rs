use crate::{
    bus::Bus,
    cpu::{Cpu, status::Status},
};

impl Cpu {
    /// AND - "AND" Memory with Accumulator. Sets N, Z.
    pub(crate) fn and(&mut self, bus: &mut impl Bus) {
        self.a &= self.fetch_operand(bus);
        self.p.set_zn(self.a);
    }

    /// EOR - "Exclusive OR" Memory with Accumulator. Sets N, Z.
    pub(crate) fn eor(&mut self, bus: &mut impl Bus) {
        self.a ^= self.fetch_operand(bus);
        self.p.set_zn(self.a);
    }

    /// ORA - "OR" Memory with Accumulator. Sets N, Z.
    pub(crate) fn ora(&mut self, bus: &mut impl Bus) {
        self.a |= self.fetch_operand(bus);
        self.p.set_zn(self.a);
    }

    /// NV-BDIZC
    /// ✓✓----✓-
    ///
    /// BIT - Test Bits in Memory with Accumulator
    /// Operation: A ∧ M, M7 → N, M6 → V
    pub(crate) fn bit(&mut self, bus: &mut impl Bus) {
        let m = self.fetch_operand(bus);
        self.p.set(Status::ZERO, self.a & m == 0);
        self.p.set(Status::NEGATIVE, m & 0x80 != 0);
        self.p.set(Status::OVERFLOW, m & 0x40 != 0);
    }
}
