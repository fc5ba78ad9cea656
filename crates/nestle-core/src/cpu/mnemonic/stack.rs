use crate::{bus::Bus, cpu::Cpu};

impl Cpu {
    /// PHA - Push Accumulator on Stack.
    pub(crate) fn pha(&mut self, bus: &mut impl Bus) {
        self.push(bus, self.a);
    }

    /// PHP - Push Processor Status on Stack, with B and U forced set.
    pub(crate) fn php(&mut self, bus: &mut impl Bus) {
        self.push(bus, self.p.to_stack_software());
    }

    /// PLA - Pull Accumulator from Stack. Sets N, Z.
    pub(crate) fn pla(&mut self, bus: &mut impl Bus) {
        self.a = self.pop(bus);
        self.p.set_zn(self.a);
    }

    /// PLP - Pull Processor Status from Stack. Bits 4 and 5 of the pulled
    /// byte are ignored.
    pub(crate) fn plp(&mut self, bus: &mut impl Bus) {
        let pulled = self.pop(bus);
        self.p.restore_from_stack(pulled);
    }
}
