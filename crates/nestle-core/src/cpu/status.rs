use bitflags::bitflags;

bitflags! {
    /// Processor status register (P).
    ///
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// N V U B D I Z C
    /// ```
    ///
    /// `B` and `U` have no storage on real hardware; they only exist in the
    /// byte pushed to the stack. BRK and PHP push both set, IRQ and NMI push
    /// `U` set with `B` clear, and PLP/RTI leave the live register's copy of
    /// both bits untouched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Status: u8 {
        const CARRY     = 0b0000_0001;
        const ZERO      = 0b0000_0010;
        /// When set, IRQs are ignored. NMI is never masked.
        const INTERRUPT = 0b0000_0100;
        /// Settable, but the 2A03 has no BCD arithmetic.
        const DECIMAL   = 0b0000_1000;
        const BREAK     = 0b0001_0000;
        const UNUSED    = 0b0010_0000;
        const OVERFLOW  = 0b0100_0000;
        const NEGATIVE  = 0b1000_0000;
    }
}

impl Status {
    /// Bits that only exist on the stack copy.
    pub const STACK_ONLY: Status = Status::BREAK.union(Status::UNUSED);

    /// Value after power-up: `I` and `U` set.
    pub const POWER_ON: Status = Status::INTERRUPT.union(Status::UNUSED);

    /// Updates Z and N from a result byte.
    pub fn set_zn(&mut self, value: u8) {
        self.set(Status::ZERO, value == 0);
        self.set(Status::NEGATIVE, value & 0x80 != 0);
    }

    pub fn c(&self) -> bool {
        self.contains(Status::CARRY)
    }

    /// Byte pushed by BRK and PHP.
    pub fn to_stack_software(self) -> u8 {
        (self | Status::STACK_ONLY).bits()
    }

    /// Byte pushed by IRQ and NMI.
    pub fn to_stack_hardware(self) -> u8 {
        ((self | Status::UNUSED) - Status::BREAK).bits()
    }

    /// Merges a byte popped by PLP or RTI, keeping the current B/U bits.
    pub fn restore_from_stack(&mut self, pulled: u8) {
        let kept = *self & Status::STACK_ONLY;
        *self = (Status::from_bits_retain(pulled) - Status::STACK_ONLY) | kept;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_images_force_documented_bits() {
        let p = Status::CARRY | Status::NEGATIVE;
        assert_eq!(p.to_stack_software(), 0b1011_0001);
        assert_eq!((p | Status::BREAK).to_stack_hardware(), 0b1010_0001);
    }

    #[test]
    fn restore_keeps_live_break_and_unused_bits() {
        let mut p = Status::UNUSED;
        p.restore_from_stack(0xFF);
        assert_eq!(p.bits(), 0xEF);

        let mut p = Status::empty();
        p.restore_from_stack(0x30);
        assert_eq!(p.bits(), 0x00);
    }

    #[test]
    fn set_zn_tracks_result() {
        let mut p = Status::empty();
        p.set_zn(0);
        assert_eq!(p, Status::ZERO);
        p.set_zn(0x80);
        assert_eq!(p, Status::NEGATIVE);
        p.set_zn(0x01);
        assert!(p.is_empty());
    }
}
