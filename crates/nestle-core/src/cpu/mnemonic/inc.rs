use crate::{bus::Bus, cpu::Cpu};

impl Cpu {
    /// DEC - Decrement Memory by One. Sets N, Z.
    pub(crate) fn dec(&mut self, bus: &mut impl Bus) {
        let result = self.fetch_operand(bus).wrapping_sub(1);
        self.p.set_zn(result);
        self.store_operand(bus, result);
    }

    /// INC - Increment Memory by One. Sets N, Z.
    pub(crate) fn inc(&mut self, bus: &mut impl Bus) {
        let result = self.fetch_operand(bus).wrapping_add(1);
        self.p.set_zn(result);
        self.store_operand(bus, result);
    }

    pub(crate) fn dex(&mut self) {
        self.x = self.x.wrapping_sub(1);
        self.p.set_zn(self.x);
    }

    pub(crate) fn dey(&mut self) {
        self.y = self.y.wrapping_sub(1);
        self.p.set_zn(self.y);
    }

    pub(crate) fn inx(&mut self) {
        self.x = self.x.wrapping_add(1);
        self.p.set_zn(self.x);
    }

    pub(crate) fn iny(&mut self) {
        self.y = self.y.wrapping_add(1);
        self.p.set_zn(self.y);
    }
}
