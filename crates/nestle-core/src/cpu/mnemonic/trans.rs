use crate::cpu::Cpu;

impl Cpu {
    /// TAX - Transfer Accumulator to Index X. Sets N, Z.
    pub(crate) fn tax(&mut self) {
        self.x = self.a;
        self.p.set_zn(self.x);
    }

    /// TAY - Transfer Accumulator to Index Y. Sets N, Z.
    pub(crate) fn tay(&mut self) {
        self.y = self.a;
        self.p.set_zn(self.y);
    }

    /// TSX - Transfer Stack Pointer to Index X. Sets N, Z.
    pub(crate) fn tsx(&mut self) {
        self.x = self.s;
        self.p.set_zn(self.x);
    }

    /// TXA - Transfer Index X to Accumulator. Sets N, Z.
    pub(crate) fn txa(&mut self) {
        self.a = self.x;
        self.p.set_zn(self.a);
    }

    /// TXS - Transfer Index X to Stack Pointer. The only transfer that
    /// leaves the flags alone.
    pub(crate) fn txs(&mut self) {
        self.s = self.x;
    }

    /// TYA - Transfer Index Y to Accumulator. Sets N, Z.
    pub(crate) fn tya(&mut self) {
        self.a = self.y;
        self.p.set_zn(self.a);
    }
}
