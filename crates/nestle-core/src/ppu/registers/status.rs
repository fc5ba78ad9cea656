use bitflags::bitflags;

bitflags! {
    /// PPUSTATUS (`$2002`). The low five bits are not driven by the PPU and
    /// read back whatever sits in the I/O latch.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub(crate) struct Status: u8 {
        const SPRITE_OVERFLOW = 0b0010_0000;
        const SPRITE_ZERO_HIT = 0b0100_0000;
        /// Cleared by reading `$2002` and at dot 1 of the pre-render line.
        const VBLANK          = 0b1000_0000;
    }
}

impl Status {
    /// Power-on value observed on hardware: vblank and overflow set.
    pub(crate) const POWER_ON: Status = Status::VBLANK.union(Status::SPRITE_OVERFLOW);
}
