mod common;

use anyhow::Result;
use common::{IRQ_VECTOR, NMI_VECTOR, RomBuilder, run_frames, run_until};
use nestle_core::error::Error;

const N: u8 = 0x80;
const Z: u8 = 0x02;
const I: u8 = 0x04;

#[test]
fn load_store_increment_then_break() -> Result<()> {
    // LDA #$05; STA $10; LDX $10; INX; BRK
    let rom = RomBuilder::nrom()
        .code(0x8000, &[0xA9, 0x05, 0x85, 0x10, 0xA6, 0x10, 0xE8, 0x00])
        .vector(IRQ_VECTOR, 0x9000);
    let mut nes = rom.console()?;

    // Reset sequence, then the five instructions.
    for _ in 0..6 {
        nes.step_instruction();
    }

    let cpu = nes.cpu_snapshot();
    assert_eq!(cpu.a, 0x05);
    assert_eq!(cpu.x, 0x06);
    assert_eq!(cpu.p & (Z | N), 0);
    assert_eq!(nes.peek_cpu(0x0010), 0x05);

    // BRK went through the IRQ vector with B and U set on the stack.
    assert_eq!(cpu.pc, 0x9000);
    assert_ne!(cpu.p & I, 0);
    assert_eq!(cpu.s, 0xFA);
    assert_eq!(nes.peek_cpu(0x01FB), 0x34);
    assert_eq!(nes.peek_cpu(0x01FC), 0x09);
    assert_eq!(nes.peek_cpu(0x01FD), 0x80);
    Ok(())
}

#[test]
fn ram_is_mirrored_every_two_kilobytes() -> Result<()> {
    // LDA #$5A; STA $0803; LDX $1803
    let rom = RomBuilder::nrom().code(0x8000, &[0xA9, 0x5A, 0x8D, 0x03, 0x08, 0xAE, 0x03, 0x18]);
    let mut nes = rom.console()?;
    for _ in 0..4 {
        nes.step_instruction();
    }
    assert_eq!(nes.cpu_snapshot().x, 0x5A);
    assert_eq!(nes.peek_cpu(0x0003), 0x5A);
    Ok(())
}

#[test]
fn unknown_opcode_halts_without_stopping_video() -> Result<()> {
    // LDA #$01; .byte $02
    let rom = RomBuilder::nrom().code(0x8000, &[0xA9, 0x01, 0x02]);
    let mut nes = rom.console()?;
    run_frames(&mut nes, 2);

    assert!(nes.is_halted());
    match nes.fault() {
        Some(Error::UnknownOpcode { opcode, addr }) => {
            assert_eq!((*opcode, *addr), (0x02, 0x8002));
        }
        other => panic!("unexpected fault {other:?}"),
    }
    assert_eq!(nes.ppu().frame_count(), 2);

    let halted_at = nes.cpu_snapshot();
    nes.step_instruction();
    assert_eq!(nes.cpu_snapshot().pc, halted_at.pc);
    assert_eq!(nes.cpu().history().last().map(|entry| entry.addr), Some(0x8000));
    Ok(())
}

#[test]
fn halted_cpu_stays_inert_through_vblank_nmis() -> Result<()> {
    // LDA #$80; STA $2000; .byte $02
    let rom = RomBuilder::nrom()
        .code(0x8000, &[0xA9, 0x80, 0x8D, 0x00, 0x20, 0x02])
        .vector(NMI_VECTOR, 0x9000);
    let mut nes = rom.console()?;
    run_until(&mut nes, |nes| nes.is_halted())?;
    let halted_at = nes.cpu_snapshot();

    run_frames(&mut nes, 3);
    assert_eq!(nes.cpu_snapshot(), halted_at);
    assert_eq!(nes.peek_cpu(0x01FD), 0);
    Ok(())
}

#[test]
fn vblank_nmi_runs_the_handler_once_per_frame() -> Result<()> {
    // LDA #$80; STA $2000; loop: JMP loop
    // nmi: INC $00; RTI
    let rom = RomBuilder::nrom()
        .code(0x8000, &[0xA9, 0x80, 0x8D, 0x00, 0x20, 0x4C, 0x05, 0x80])
        .code(0x9000, &[0xE6, 0x00, 0x40])
        .vector(NMI_VECTOR, 0x9000);
    let mut nes = rom.console()?;

    run_frames(&mut nes, 3);
    // The third NMI has been taken but its handler has not run yet.
    assert_eq!(nes.peek_cpu(0x0000), 2);
    assert_eq!(nes.cpu_snapshot().pc, 0x9000);

    run_until(&mut nes, |nes| nes.cpu_snapshot().pc == 0x8005)?;
    assert_eq!(nes.peek_cpu(0x0000), 3);
    Ok(())
}

#[test]
fn frame_irq_is_delivered_once_interrupts_are_enabled() -> Result<()> {
    // CLI; loop: JMP loop
    // irq: LDA $4015; STA $00; loop: JMP loop
    let rom = RomBuilder::nrom()
        .code(0x8000, &[0x58, 0x4C, 0x01, 0x80])
        .code(0x9000, &[0xAD, 0x15, 0x40, 0x85, 0x00, 0x4C, 0x05, 0x90])
        .vector(IRQ_VECTOR, 0x9000);
    let mut nes = rom.console()?;

    let cycles = run_until(&mut nes, |nes| nes.cpu_snapshot().pc >= 0x9000)?;
    assert!((29_820..29_840).contains(&cycles), "IRQ after {cycles} cycles");

    run_until(&mut nes, |nes| nes.cpu_snapshot().pc == 0x9005)?;
    assert_eq!(nes.peek_cpu(0x0000), 0x40);
    Ok(())
}
