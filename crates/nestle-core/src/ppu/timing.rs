//! Dot and scanline bookkeeping for the NTSC 2C02.

pub(crate) const DOTS_PER_SCANLINE: u16 = 341;
pub(crate) const SCANLINES_PER_FRAME: u16 = 262;

pub(crate) const LAST_DOT: u16 = DOTS_PER_SCANLINE - 1;
pub(crate) const VISIBLE_SCANLINES: u16 = 240;
pub(crate) const VBLANK_SCANLINE: u16 = 241;
pub(crate) const PRE_RENDER_SCANLINE: u16 = SCANLINES_PER_FRAME - 1;

/// Dot on which vblank starts and clears.
pub(crate) const FLAG_DOT: u16 = 1;
pub(crate) const SPRITE_EVALUATION_DOT: u16 = 65;
pub(crate) const Y_INCREMENT_DOT: u16 = 256;
pub(crate) const SPRITE_FETCH_START: u16 = 257;
pub(crate) const SPRITE_FETCH_END: u16 = 320;
pub(crate) const VERTICAL_COPY: core::ops::RangeInclusive<u16> = 280..=304;
pub(crate) const PREFETCH_START: u16 = 321;
pub(crate) const PREFETCH_END: u16 = 336;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanlineKind {
    Visible,
    PostRender,
    VBlank,
    PreRender,
}

impl ScanlineKind {
    pub(crate) fn of(scanline: u16) -> Self {
        match scanline {
            0..VISIBLE_SCANLINES => ScanlineKind::Visible,
            VISIBLE_SCANLINES => ScanlineKind::PostRender,
            PRE_RENDER_SCANLINE => ScanlineKind::PreRender,
            _ => ScanlineKind::VBlank,
        }
    }

    /// Lines on which the fetch pipelines run.
    pub(crate) fn renders(self) -> bool {
        matches!(self, ScanlineKind::Visible | ScanlineKind::PreRender)
    }
}

/// What the rendering pipeline does on a given dot of a rendering line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DotKind {
    Idle,
    /// Dots 1-256: output a pixel and fetch the tile two ahead.
    Visible,
    /// Dots 257-320: fetch the sprites for the next line.
    SpriteFetch,
    /// Dots 321-336: fetch the first two tiles of the next line.
    Prefetch,
    /// Dots 337-340: two nametable fetches whose data is dropped.
    Dummy,
}

impl DotKind {
    pub(crate) fn of(dot: u16) -> Self {
        match dot {
            0 => DotKind::Idle,
            1..=256 => DotKind::Visible,
            SPRITE_FETCH_START..=SPRITE_FETCH_END => DotKind::SpriteFetch,
            PREFETCH_START..=PREFETCH_END => DotKind::Prefetch,
            _ => DotKind::Dummy,
        }
    }

    /// Dots on which the background shifters advance.
    pub(crate) fn shifts_background(self) -> bool {
        matches!(self, DotKind::Visible | DotKind::Prefetch)
    }
}

/// Background fetch step. Each takes two dots: one to drive the address and
/// one to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum FetchPhase {
    #[default]
    Nametable,
    Attribute,
    PatternLow,
    PatternHigh,
}

impl FetchPhase {
    pub(crate) fn next(self) -> Self {
        match self {
            FetchPhase::Nametable => FetchPhase::Attribute,
            FetchPhase::Attribute => FetchPhase::PatternLow,
            FetchPhase::PatternLow => FetchPhase::PatternHigh,
            FetchPhase::PatternHigh => FetchPhase::Nametable,
        }
    }
}
