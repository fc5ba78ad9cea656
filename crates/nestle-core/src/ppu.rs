//! Picture Processing Unit (2C02).
//!
//! The PPU is advanced one dot at a time by [`Ppu::tick`]. Each call runs the
//! work the hardware does on that dot: background fetches through the
//! "loopy" scroll registers, sprite evaluation and fetches for the next line,
//! and pixel composition for the visible area. Pixels go straight to a
//! [`PixelSink`]; the PPU keeps no frame buffer of its own.
//!
//! Everything the PPU addresses (pattern tables, nametables, palette RAM) is
//! reached through a borrowed [`PpuBus`], so the cartridge mapper sees every
//! fetch in order.

mod background_pipeline;
pub mod frame;
pub mod palette;
mod registers;
mod sprite;
mod sprite_pipeline;
mod timing;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::{
    bus::PpuBus,
    memory::ppu::{self as ppu_mem, Register},
};
use background_pipeline::BgPipeline;
pub use frame::{FrameBuffer, NullSink, PixelSink, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use palette::Rgb;
use registers::{Control, Mask, Registers, Status};
use sprite::{SecondaryOam, row_on_line};
use sprite_pipeline::{FetchedSprite, SpritePipeline, SpritePixel};
use timing::{DotKind, FetchPhase, ScanlineKind};

/// Read-only view of the PPU for debuggers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PpuSnapshot {
    /// Current scanline, `0..=261`; 261 is the pre-render line.
    pub scanline: u16,
    /// Current dot within the scanline, `0..=340`.
    pub dot: u16,
    /// Frames completed since power-up.
    pub frame: u64,
    /// PPUCTRL (`$2000`).
    pub ctrl: u8,
    /// PPUMASK (`$2001`).
    pub mask: u8,
    /// Top three bits of PPUSTATUS (`$2002`), without the open-bus bits.
    pub status: u8,
    /// Current VRAM address (15 bits).
    pub v: u16,
    /// Temporary VRAM address; the top-left corner of the next frame.
    pub t: u16,
    /// Fine X scroll (3 bits).
    pub fine_x: u8,
    /// Shared `$2005`/`$2006` write toggle. `true` after the first write.
    pub w: bool,
    /// OAMADDR (`$2003`).
    pub oam_addr: u8,
    /// Raw bytes last written through `$2005`.
    pub scroll_x: u8,
    pub scroll_y: u8,
}

/// The 2C02 picture processor.
#[derive(Debug, Clone)]
pub struct Ppu {
    /// CPU-visible register file, loopy scroll state and I/O latch.
    registers: Registers,
    /// Primary OAM: 64 sprites of 4 bytes each.
    oam: [u8; ppu_mem::OAM_SIZE],
    /// Up to 8 sprites picked for the next scanline.
    secondary_oam: SecondaryOam,
    /// Pattern bytes fetched on dots 257..=320 for the next scanline.
    fetched_sprites: [FetchedSprite; 8],
    background: BgPipeline,
    sprites: SpritePipeline,
    /// Step of the 8-dot background fetch cycle.
    fetch_phase: FetchPhase,
    /// Each fetch step spends one dot driving the address and one reading.
    fetch_latch: bool,
    dot: u16,
    scanline: u16,
    frame: u64,
    /// Set when vblank starts, cleared by [`Ppu::take_frame_done`].
    frame_done: bool,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    /// Creates a PPU in its power-up state. The counters sit on the last dot
    /// of the pre-render line so the first tick lands on dot 0 of line 0.
    pub fn new() -> Self {
        Self {
            registers: Registers::power_up(),
            oam: [0xFF; ppu_mem::OAM_SIZE],
            secondary_oam: SecondaryOam::default(),
            fetched_sprites: [FetchedSprite::default(); 8],
            background: BgPipeline::default(),
            sprites: SpritePipeline::default(),
            fetch_phase: FetchPhase::default(),
            fetch_latch: false,
            dot: timing::LAST_DOT,
            scanline: timing::PRE_RENDER_SCANLINE,
            frame: 0,
            frame_done: false,
        }
    }

    /// Cold boot: every register, OAM and the dot counters return to their
    /// power-up values.
    pub fn power_up(&mut self) {
        *self = Self::new();
    }

    /// Reset line: clears PPUCTRL/PPUMASK and the write toggle, restarts the
    /// frame. OAM and the VRAM address survive.
    pub fn reset(&mut self) {
        self.registers.reset();
        self.background.clear();
        self.sprites.clear();
        self.secondary_oam.clear();
        self.fetch_phase = FetchPhase::default();
        self.fetch_latch = false;
        self.dot = timing::LAST_DOT;
        self.scanline = timing::PRE_RENDER_SCANLINE;
        self.frame_done = false;
    }

    /// Returns whether the frame completed since the last call, clearing the
    /// flag.
    pub fn take_frame_done(&mut self) -> bool {
        std::mem::take(&mut self.frame_done)
    }

    /// Frames completed since power-up.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Primary OAM contents, read without touching OAMADDR.
    pub fn peek_oam(&self) -> &[u8; ppu_mem::OAM_SIZE] {
        &self.oam
    }

    /// Captures registers and counters for debuggers.
    pub fn snapshot(&self) -> PpuSnapshot {
        let regs = &self.registers;
        PpuSnapshot {
            scanline: self.scanline,
            dot: self.dot,
            frame: self.frame,
            ctrl: regs.control.bits(),
            mask: regs.mask.bits(),
            status: regs.status.bits(),
            v: regs.vram.v.raw(),
            t: regs.vram.t.raw(),
            fine_x: regs.vram.x,
            w: regs.vram.w,
            oam_addr: regs.oam_addr,
            scroll_x: regs.vram.scroll_x,
            scroll_y: regs.vram.scroll_y,
        }
    }

    /// CPU read of a PPU register.
    pub fn cpu_read(&mut self, register: Register, bus: &mut PpuBus<'_>) -> u8 {
        let value = match register {
            Register::Status => {
                let value = self.registers.status.bits() | (self.registers.io_latch & 0x1F);
                self.registers.status.remove(Status::VBLANK);
                self.registers.vram.w = false;
                value
            }
            Register::OamData => {
                let value = self.oam[usize::from(self.registers.oam_addr)];
                self.registers.oam_addr = self.registers.oam_addr.wrapping_add(1);
                value
            }
            Register::Data => self.read_data(bus),
            _ => {
                warn!(?register, "read of write-only PPU register returns the I/O latch");
                self.registers.io_latch
            }
        };
        self.registers.io_latch = value;
        value
    }

    /// CPU write to a PPU register.
    pub fn cpu_write(&mut self, register: Register, value: u8, bus: &mut PpuBus<'_>) {
        self.registers.io_latch = value;
        match register {
            Register::Control => {
                let control = Control::from_bits_retain(value);
                self.registers.vram.t.set_nametable(control.nametable_index());
                self.registers.control = control;
            }
            Register::Mask => self.registers.mask = Mask::from_bits_retain(value),
            Register::Status => warn!(value, "write to read-only PPUSTATUS ignored"),
            Register::OamAddr => self.registers.oam_addr = value,
            Register::OamData => {
                self.oam[usize::from(self.registers.oam_addr)] = value;
                self.registers.oam_addr = self.registers.oam_addr.wrapping_add(1);
            }
            Register::Scroll => self.registers.vram.write_scroll(value),
            Register::Addr => self.registers.vram.write_addr(value),
            Register::Data => {
                bus.write(self.registers.vram.v.raw(), value);
                self.advance_vram_addr();
            }
        }
    }

    /// Advances one dot. Returns `true` when an NMI should be delivered to
    /// the CPU.
    pub fn tick(&mut self, bus: &mut PpuBus<'_>, sink: &mut dyn PixelSink) -> bool {
        self.advance_counters();

        let mut nmi = false;
        if self.dot == timing::FLAG_DOT {
            match self.scanline {
                timing::VBLANK_SCANLINE => {
                    self.registers.status.insert(Status::VBLANK);
                    self.frame += 1;
                    self.frame_done = true;
                    sink.present();
                    nmi = self.registers.control.nmi_enabled();
                    trace!(frame = self.frame, nmi, "vblank");
                }
                timing::PRE_RENDER_SCANLINE => self.registers.status.remove(
                    Status::VBLANK | Status::SPRITE_ZERO_HIT | Status::SPRITE_OVERFLOW,
                ),
                _ => {}
            }
        }

        let line = ScanlineKind::of(self.scanline);
        if line.renders() {
            if self.registers.mask.rendering_enabled() {
                self.render_dot(line, bus, sink);
            } else if line == ScanlineKind::Visible && DotKind::of(self.dot) == DotKind::Visible {
                self.emit(self.dot - 1, 0, bus, sink);
            }
        }
        nmi
    }

    fn advance_counters(&mut self) {
        self.dot += 1;
        if self.dot > timing::LAST_DOT {
            self.dot = 0;
            self.scanline += 1;
            if self.scanline == timing::SCANLINES_PER_FRAME {
                self.scanline = 0;
            }
        }
    }

    fn advance_vram_addr(&mut self) {
        let step = self.registers.control.vram_increment();
        self.registers.vram.v.advance(step);
    }

    fn read_data(&mut self, bus: &mut PpuBus<'_>) -> u8 {
        let addr = self.registers.vram.v.raw() & ppu_mem::ADDR_MASK;
        let value = if addr >= ppu_mem::PALETTE_BASE {
            // Palette data bypasses the buffer; the buffer picks up the
            // nametable byte hidden underneath instead.
            self.registers.read_buffer = bus.read(addr - 0x1000);
            bus.read(addr)
        } else {
            std::mem::replace(&mut self.registers.read_buffer, bus.read(addr))
        };
        self.advance_vram_addr();
        value
    }

    /// One dot of a visible or pre-render line with rendering enabled.
    fn render_dot(&mut self, line: ScanlineKind, bus: &mut PpuBus<'_>, sink: &mut dyn PixelSink) {
        let dot = self.dot;
        let kind = DotKind::of(dot);

        if line == ScanlineKind::Visible {
            if dot == timing::SPRITE_EVALUATION_DOT {
                self.evaluate_sprites();
            }
            if kind == DotKind::Visible {
                self.compose_pixel(bus, sink);
            }
        }

        if kind.shifts_background() {
            self.background.shift();
        }

        match kind {
            DotKind::Idle => {
                self.fetch_phase = FetchPhase::default();
                self.fetch_latch = false;
            }
            DotKind::Visible | DotKind::Prefetch => self.fetch_background(bus),
            DotKind::SpriteFetch => {
                if dot == timing::SPRITE_FETCH_START {
                    let t = self.registers.vram.t;
                    self.registers.vram.v.copy_horizontal(t);
                    if line == ScanlineKind::PreRender {
                        self.secondary_oam.clear();
                    }
                }
                self.fetch_sprites(bus);
            }
            DotKind::Dummy => {
                if dot % 2 == 0 {
                    bus.read(self.registers.vram.v.tile_addr());
                }
            }
        }

        if dot == timing::Y_INCREMENT_DOT {
            self.registers.vram.v.increment_y();
        }
        if line == ScanlineKind::PreRender && timing::VERTICAL_COPY.contains(&dot) {
            let t = self.registers.vram.t;
            self.registers.vram.v.copy_vertical(t);
        }
    }

    fn fetch_background(&mut self, bus: &mut PpuBus<'_>) {
        self.fetch_latch = !self.fetch_latch;
        if self.fetch_latch {
            return;
        }

        let v = self.registers.vram.v;
        let pattern_addr = self.background_pattern_addr();
        let latch = &mut self.background.latch;
        match self.fetch_phase {
            FetchPhase::Nametable => latch.tile = bus.read(v.tile_addr()),
            FetchPhase::Attribute => {
                latch.palette = (bus.read(v.attribute_addr()) >> v.attribute_shift()) & 0x03;
            }
            FetchPhase::PatternLow => latch.pattern_low = bus.read(pattern_addr),
            FetchPhase::PatternHigh => {
                latch.pattern_high = bus.read(pattern_addr + 8);
                self.background.reload();
                self.registers.vram.v.increment_coarse_x();
            }
        }
        self.fetch_phase = self.fetch_phase.next();
    }

    fn background_pattern_addr(&self) -> u16 {
        self.registers.control.background_table()
            | (u16::from(self.background.latch.tile) << 4)
            | self.registers.vram.v.fine_y()
    }

    fn evaluate_sprites(&mut self) {
        let height = self.registers.control.sprite_height();
        if self.secondary_oam.evaluate(&self.oam, self.scanline, height) {
            self.registers.status.insert(Status::SPRITE_OVERFLOW);
        }
    }

    /// Dots 257-320: one secondary OAM slot every 8 dots, pattern bytes on
    /// the 6th and 8th dot of each slot.
    fn fetch_sprites(&mut self, bus: &mut PpuBus<'_>) {
        let offset = self.dot - timing::SPRITE_FETCH_START;
        let slot = usize::from(offset / 8);
        let count = usize::from(self.secondary_oam.count());

        if slot < count {
            let sprite = self.secondary_oam.sprite(slot);
            let height = self.registers.control.sprite_height();
            let row = row_on_line(sprite.y, self.scanline, height).unwrap_or(0);
            let addr = sprite.pattern_addr(row, height, self.registers.control.sprite_table());
            match offset % 8 {
                5 => {
                    self.fetched_sprites[slot] = FetchedSprite {
                        attributes: sprite.attributes,
                        x: sprite.x,
                        pattern_low: bus.read(addr),
                        pattern_high: 0,
                    };
                }
                7 => self.fetched_sprites[slot].pattern_high = bus.read(addr + 8),
                _ => {}
            }
        }

        if self.dot == timing::SPRITE_FETCH_END {
            self.sprites
                .load(&self.fetched_sprites[..count], self.secondary_oam.has_sprite_zero());
        }
    }

    fn compose_pixel(&mut self, bus: &mut PpuBus<'_>, sink: &mut dyn PixelSink) {
        let x = self.dot - 1;
        let mask = self.registers.mask;

        let (bg_palette, bg_color) = if mask.background_visible_at(x) {
            self.background.sample(self.registers.vram.x)
        } else {
            (0, 0)
        };
        let sprite = self.sprites.sample_and_shift();
        let sprite = if mask.sprites_visible_at(x) {
            sprite
        } else {
            SpritePixel::default()
        };

        if sprite.sprite_zero && sprite.color != 0 && bg_color != 0 && x != 255 {
            self.registers.status.insert(Status::SPRITE_ZERO_HIT);
        }

        let background = (bg_palette << 2) | bg_color;
        let foreground = 0x10 | (sprite.palette << 2) | sprite.color;
        let index = match (bg_color, sprite.color) {
            (0, 0) => 0,
            (0, _) => foreground,
            (_, 0) => background,
            _ if sprite.behind_background => background,
            _ => foreground,
        };
        self.emit(x, index, bus, sink);
    }

    fn emit(&self, x: u16, index: u8, bus: &mut PpuBus<'_>, sink: &mut dyn PixelSink) {
        let value = bus.read(ppu_mem::PALETTE_BASE + u16::from(index)) & self.registers.mask.color_mask();
        sink.set_pixel(usize::from(x), usize::from(self.scanline), palette::color(value));
    }
}
