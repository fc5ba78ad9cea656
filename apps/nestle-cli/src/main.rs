mod args;
mod capture;

use std::{cell::RefCell, rc::Rc};

use anyhow::{Context, Result};
use clap::Parser;
use nestle_core::{
    Nes,
    cartridge::Cartridge,
    controller::{Buttons, FixedInput},
    ppu::FrameBuffer,
};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::args::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cartridge = Cartridge::from_file(&args.rom)
        .with_context(|| format!("loading {}", args.rom.display()))?;
    let mut nes = Nes::new(cartridge);

    let frame = Rc::new(RefCell::new(FrameBuffer::new()));
    nes.set_pixel_sink(Box::new(Rc::clone(&frame)));

    let mut input = FixedInput(Buttons::empty());
    for &button in &args.hold {
        input.set_button(button.into(), true);
    }
    nes.connect_controller(0, Box::new(input));

    for _ in 0..args.frames {
        nes.run_frame();
    }

    let cpu = nes.cpu_snapshot();
    info!(
        frames = nes.ppu().frame_count(),
        cycles = nes.cycles(),
        halted = nes.is_halted(),
        "run finished"
    );
    info!(
        "A=${:02X} X=${:02X} Y=${:02X} S=${:02X} P=${:02X} PC=${:04X}",
        cpu.a, cpu.x, cpu.y, cpu.s, cpu.p, cpu.pc
    );
    if let Some(fault) = nes.fault() {
        warn!("emulation stopped early: {fault}");
    }

    if let Some(path) = &args.png {
        capture::save_png(&frame.borrow(), path)?;
        info!("wrote {}", path.display());
    }
    Ok(())
}
