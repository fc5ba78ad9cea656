use super::vram_addr::VramAddr;

/// Internal scroll state shared by `$2000`, `$2005` and `$2006`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct VramRegisters {
    /// Current VRAM address.
    pub(crate) v: VramAddr,
    /// Temporary address; top-left of the screen during rendering.
    pub(crate) t: VramAddr,
    /// Fine X scroll, 0-7.
    pub(crate) x: u8,
    /// First/second write toggle shared by `$2005` and `$2006`.
    pub(crate) w: bool,
    /// Last values written through `$2005`, kept for inspection.
    pub(crate) scroll_x: u8,
    pub(crate) scroll_y: u8,
}

impl VramRegisters {
    pub(crate) fn write_scroll(&mut self, value: u8) {
        if self.w {
            self.scroll_y = value;
            self.t.set_fine_y(value & 0x07);
            self.t.set_coarse_y(value >> 3);
        } else {
            self.scroll_x = value;
            self.x = value & 0x07;
            self.t.set_coarse_x(value >> 3);
        }
        self.w = !self.w;
    }

    pub(crate) fn write_addr(&mut self, value: u8) {
        if self.w {
            self.t.set_low_byte(value);
            self.v = self.t;
        } else {
            self.t.set_high_byte(value);
        }
        self.w = !self.w;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_writes_split_into_coarse_and_fine() {
        let mut regs = VramRegisters::default();
        regs.write_scroll(0x7D);
        assert_eq!(regs.x, 5);
        assert_eq!(regs.t.coarse_x(), 15);
        assert!(regs.w);
        regs.write_scroll(0x5E);
        assert_eq!(regs.t.fine_y(), 6);
        assert_eq!(regs.t.coarse_y(), 11);
        assert!(!regs.w);
        assert_eq!((regs.scroll_x, regs.scroll_y), (0x7D, 0x5E));
    }

    #[test]
    fn second_addr_write_commits_to_v() {
        let mut regs = VramRegisters::default();
        regs.write_addr(0xFF);
        assert_eq!(regs.v.raw(), 0);
        assert_eq!(regs.t.raw(), 0x3F00);
        regs.write_addr(0x10);
        assert_eq!(regs.v.raw(), 0x3F10);
    }
}
