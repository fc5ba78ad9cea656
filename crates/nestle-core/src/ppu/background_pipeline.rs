/// 16-bit left-shifting register: the high byte is on its way to the screen,
/// the low byte holds the next tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Shift16(u16);

impl Shift16 {
    fn reload(&mut self, byte: u8) {
        self.0 = (self.0 & 0xFF00) | u16::from(byte);
    }

    /// Bit `15 - fine_x`; fine X picks the tap instead of delaying shifts.
    fn tap(self, fine_x: u8) -> u8 {
        ((self.0 >> (15 - (fine_x & 0x07))) & 1) as u8
    }

    fn shift(&mut self) {
        self.0 <<= 1;
    }
}

/// Bytes collected by the fetch steps of the tile currently being fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct TileLatch {
    pub(crate) tile: u8,
    /// Two-bit palette select already extracted from the attribute byte.
    pub(crate) palette: u8,
    pub(crate) pattern_low: u8,
    pub(crate) pattern_high: u8,
}

/// The four background shifters: two pattern bitplanes and two palette bits
/// broadcast across the eight pixels of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct BgPipeline {
    pattern: [Shift16; 2],
    palette: [Shift16; 2],
    pub(crate) latch: TileLatch,
}

impl BgPipeline {
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Moves the latched tile into the low bytes of the shifters.
    pub(crate) fn reload(&mut self) {
        let latch = self.latch;
        self.pattern[0].reload(latch.pattern_low);
        self.pattern[1].reload(latch.pattern_high);
        for (bit, shifter) in self.palette.iter_mut().enumerate() {
            shifter.reload(if latch.palette >> bit & 1 != 0 { 0xFF } else { 0x00 });
        }
    }

    pub(crate) fn shift(&mut self) {
        for shifter in self.pattern.iter_mut().chain(self.palette.iter_mut()) {
            shifter.shift();
        }
    }

    /// Returns `(palette, color)` for the current dot; color 0 is transparent.
    pub(crate) fn sample(&self, fine_x: u8) -> (u8, u8) {
        let color = (self.pattern[1].tap(fine_x) << 1) | self.pattern[0].tap(fine_x);
        let palette = (self.palette[1].tap(fine_x) << 1) | self.palette[0].tap(fine_x);
        (palette, color)
    }
}
