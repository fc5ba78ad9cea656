use crate::cpu::{Cpu, status::Status};

impl Cpu {
    // ================================================================
    //  Conditional branches. All share the relative addressing mode;
    //  `branch_if` applies the taken / page-cross cycle penalties.
    // ================================================================

    /// BCC - Branch on Carry Clear
    pub(crate) fn bcc(&mut self) {
        self.branch_if(!self.p.contains(Status::CARRY));
    }

    /// BCS - Branch on Carry Set
    pub(crate) fn bcs(&mut self) {
        self.branch_if(self.p.contains(Status::CARRY));
    }

    /// BEQ - Branch on Result Zero
    pub(crate) fn beq(&mut self) {
        self.branch_if(self.p.contains(Status::ZERO));
    }

    /// BMI - Branch on Result Minus
    pub(crate) fn bmi(&mut self) {
        self.branch_if(self.p.contains(Status::NEGATIVE));
    }

    /// BNE - Branch on Result Not Zero
    pub(crate) fn bne(&mut self) {
        self.branch_if(!self.p.contains(Status::ZERO));
    }

    /// BPL - Branch on Result Plus
    pub(crate) fn bpl(&mut self) {
        self.branch_if(!self.p.contains(Status::NEGATIVE));
    }

    /// BVC - Branch on Overflow Clear
    pub(crate) fn bvc(&mut self) {
        self.branch_if(!self.p.contains(Status::OVERFLOW));
    }

    /// BVS - Branch on Overflow Set
    pub(crate) fn bvs(&mut self) {
        self.branch_if(self.p.contains(Status::OVERFLOW));
    }
}
