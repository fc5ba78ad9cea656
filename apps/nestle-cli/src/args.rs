use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use nestle_core::controller::Button;
use tracing::Level;

/// Nestle headless runner
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the iNES ROM file
    #[arg(required = true)]
    pub rom: PathBuf,

    /// Number of frames to run
    #[arg(short, long, default_value_t = 60)]
    pub frames: u32,

    /// Write the last frame to this PNG file
    #[arg(long)]
    pub png: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: Level,

    /// Buttons held on controller 1 for the whole run, comma separated
    #[arg(long, value_delimiter = ',')]
    pub hold: Vec<HeldButton>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HeldButton {
    A,
    B,
    Select,
    Start,
    Up,
    Down,
    Left,
    Right,
}

impl From<HeldButton> for Button {
    fn from(button: HeldButton) -> Self {
        match button {
            HeldButton::A => Button::A,
            HeldButton::B => Button::B,
            HeldButton::Select => Button::Select,
            HeldButton::Start => Button::Start,
            HeldButton::Up => Button::Up,
            HeldButton::Down => Button::Down,
            HeldButton::Left => Button::Left,
            HeldButton::Right => Button::Right,
        }
    }
}
