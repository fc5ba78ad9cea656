use std::fmt::Display;

use crate::cpu::{addressing::Addressing, mnemonic::Mnemonic};

/// Immutable descriptor for one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub opcode: u8,
    pub mnemonic: Mnemonic,
    pub addressing: Addressing,
    /// Length in bytes, opcode included.
    pub size: u8,
    /// Base cycle count before page-cross and branch penalties.
    pub cycles: u8,
}

impl Instruction {
    pub(crate) const fn new(
        opcode: u8,
        mnemonic: Mnemonic,
        addressing: Addressing,
        cycles: u8,
    ) -> Self {
        Self {
            opcode,
            mnemonic,
            addressing,
            size: addressing.size(),
            cycles,
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.mnemonic, self.addressing)
    }
}
