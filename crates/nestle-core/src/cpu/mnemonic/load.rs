use crate::{bus::Bus, cpu::Cpu};

impl Cpu {
    /// NV-BDIZC
    /// ✓-----✓-
    ///
    /// LDA - Load Accumulator with Memory
    /// Operation: M → A
    pub(crate) fn lda(&mut self, bus: &mut impl Bus) {
        self.a = self.fetch_operand(bus);
        self.p.set_zn(self.a);
    }

    /// NV-BDIZC
    /// ✓-----✓-
    ///
    /// LDX - Load Index Register X from Memory
    /// Operation: M → X
    pub(crate) fn ldx(&mut self, bus: &mut impl Bus) {
        self.x = self.fetch_operand(bus);
        self.p.set_zn(self.x);
    }

    /// NV-BDIZC
    /// ✓-----✓-
    ///
    /// LDY - Load Index Register Y from Memory
    /// Operation: M → Y
    pub(crate) fn ldy(&mut self, bus: &mut impl Bus) {
        self.y = self.fetch_operand(bus);
        self.p.set_zn(self.y);
    }

    /// NV-BDIZC
    /// ✓-----✓-
    ///
    /// LAX - Load Accumulator and Index Register X from Memory (undocumented)
    /// Operation: M → A, X
    pub(crate) fn lax(&mut self, bus: &mut impl Bus) {
        let m = self.fetch_operand(bus);
        self.a = m;
        self.x = m;
        self.p.set_zn(m);
    }

    /// STA - Store Accumulator in Memory. No flags.
    pub(crate) fn sta(&mut self, bus: &mut impl Bus) {
        bus.write(self.effective_addr, self.a);
    }

    /// STX - Store Index Register X in Memory. No flags.
    pub(crate) fn stx(&mut self, bus: &mut impl Bus) {
        bus.write(self.effective_addr, self.x);
    }

    /// STY - Store Index Register Y in Memory. No flags.
    pub(crate) fn sty(&mut self, bus: &mut impl Bus) {
        bus.write(self.effective_addr, self.y);
    }

    /// SAX - Store Accumulator "AND" Index Register X (undocumented).
    /// Operation: A ∧ X → M
    pub(crate) fn sax(&mut self, bus: &mut impl Bus) {
        bus.write(self.effective_addr, self.a & self.x);
    }

    /// SHX - Store X "AND" (high byte of base address + 1) (undocumented).
    ///
    /// When the indexed address crosses a page, the stored value also
    /// replaces the high byte of the target address.
    pub(crate) fn shx(&mut self, bus: &mut impl Bus) {
        self.store_high_and(bus, self.x);
    }

    /// SHY - Store Y "AND" (high byte of base address + 1) (undocumented).
    pub(crate) fn shy(&mut self, bus: &mut impl Bus) {
        self.store_high_and(bus, self.y);
    }

    fn store_high_and(&mut self, bus: &mut impl Bus, register: u8) {
        let [_, base_hi] = self.base_addr.to_le_bytes();
        let value = register & base_hi.wrapping_add(1);
        let addr = if self.page_crossed {
            (self.effective_addr & 0x00FF) | ((value as u16) << 8)
        } else {
            self.effective_addr
        };
        bus.write(addr, value);
    }
}
