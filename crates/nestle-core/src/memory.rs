//! Address map of the console.
//!
//! Both address spaces (CPU and PPU) are decoded with the constants below so
//! range checks read the same in the bus, the PPU and the mappers.

/// CPU-side address space.
pub mod cpu {
    /// Base of the fixed 256-byte stack window.
    pub const STACK_PAGE: u16 = 0x0100;

    pub const NMI_VECTOR: u16 = 0xFFFA;
    pub const RESET_VECTOR: u16 = 0xFFFC;
    /// Shared by IRQ and BRK.
    pub const IRQ_VECTOR: u16 = 0xFFFE;

    /// Work RAM size; `$0000-$1FFF` mirrors it every 2 KiB.
    pub const WORK_RAM_SIZE: usize = 0x0800;
    pub const WORK_RAM_MASK: u16 = (WORK_RAM_SIZE as u16) - 1;
    pub const WORK_RAM_END: u16 = 0x1FFF;

    /// `$2000-$3FFF` mirrors the eight PPU registers.
    pub const PPU_REGISTER_BASE: u16 = 0x2000;
    pub const PPU_REGISTER_END: u16 = 0x3FFF;

    pub const APU_REGISTER_BASE: u16 = 0x4000;
    pub const APU_REGISTER_END: u16 = 0x4013;
    pub const OAM_DMA: u16 = 0x4014;
    pub const APU_STATUS: u16 = 0x4015;
    /// Strobe on write, pad 1 on read.
    pub const CONTROLLER_PORT_1: u16 = 0x4016;
    /// Frame counter on write, pad 2 on read.
    pub const CONTROLLER_PORT_2: u16 = 0x4017;
    /// `$4018-$401F`: CPU test mode registers, disabled on retail units.
    pub const TEST_MODE_BASE: u16 = 0x4018;
    pub const TEST_MODE_END: u16 = 0x401F;
    /// Everything from here up is decoded by the cartridge.
    pub const CARTRIDGE_SPACE_BASE: u16 = 0x4020;

    pub const PRG_RAM_START: u16 = 0x6000;
    pub const PRG_RAM_END: u16 = 0x7FFF;
    pub const PRG_RAM_SIZE: usize = 0x2000;
    /// Trainer payload lands here when present.
    pub const TRAINER_START: u16 = 0x7000;
    pub const PRG_ROM_START: u16 = 0x8000;
    /// Upper fixed window used by UxROM and MMC1 mode 3.
    pub const PRG_ROM_HIGH_START: u16 = 0xC000;
}

/// PPU-side address space and register window.
pub mod ppu {
    /// The PPU only decodes 14 address lines.
    pub const ADDR_MASK: u16 = 0x3FFF;

    pub const PATTERN_TABLE_END: u16 = 0x1FFF;
    pub const PATTERN_TABLE_0: u16 = 0x0000;
    pub const PATTERN_TABLE_1: u16 = 0x1000;

    pub const NAMETABLE_BASE: u16 = 0x2000;
    pub const NAMETABLE_SIZE: u16 = 0x0400;
    /// Offset of the attribute table within a nametable.
    pub const ATTRIBUTE_OFFSET: u16 = 0x03C0;
    /// Console VRAM (CIRAM) holding two physical nametables.
    pub const CIRAM_SIZE: usize = 0x0800;
    /// Four-screen boards carry a full 4 KiB of nametable RAM.
    pub const FOUR_SCREEN_RAM_SIZE: usize = 0x1000;

    /// Nametable mirrors end where palette RAM begins.
    pub const NAMETABLE_END: u16 = 0x3EFF;
    pub const PALETTE_BASE: u16 = 0x3F00;
    pub const PALETTE_RAM_SIZE: usize = 0x20;

    pub const OAM_SIZE: usize = 0x100;
    /// Eight sprite slots of four bytes each.
    pub const SECONDARY_OAM_SIZE: usize = 0x20;

    pub const REGISTER_SELECT_MASK: u16 = 0x0007;

    /// The eight CPU-visible PPU registers, identified by `addr & 7`.
    #[repr(u8)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Register {
        /// PPUCTRL
        Control = 0,
        /// PPUMASK
        Mask = 1,
        /// PPUSTATUS
        Status = 2,
        /// OAMADDR
        OamAddr = 3,
        /// OAMDATA
        OamData = 4,
        /// PPUSCROLL
        Scroll = 5,
        /// PPUADDR
        Addr = 6,
        /// PPUDATA
        Data = 7,
    }

    impl Register {
        /// Decodes any address in the `$2000-$3FFF` mirror window.
        pub const fn from_cpu_addr(addr: u16) -> Self {
            match addr & REGISTER_SELECT_MASK {
                0 => Self::Control,
                1 => Self::Mask,
                2 => Self::Status,
                3 => Self::OamAddr,
                4 => Self::OamData,
                5 => Self::Scroll,
                6 => Self::Addr,
                _ => Self::Data,
            }
        }
    }
}

/// Sizes of the ROM image sections.
pub mod rom {
    pub const PRG_BANK_SIZE: usize = 0x4000;
    pub const CHR_BANK_SIZE: usize = 0x2000;
    pub const TRAINER_SIZE: usize = 0x200;
}
