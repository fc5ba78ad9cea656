use std::fmt::Display;

use crate::{bus::Bus, cpu::Cpu};

/// The thirteen 6502 addressing modes.
///
/// Resolution happens once per instruction, before the operation runs, and
/// leaves its result in the CPU's operand latch (`effective_addr`,
/// `base_addr`, `page_crossed`, `accumulator_mode`, `branch_offset`).
/// Operand bytes are fetched lazily by the operation, so write-only
/// instructions never touch the target address with a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Addressing {
    /// No operand (`CLC`, `RTS`).
    Implied,
    /// Operates on A (`ASL A`).
    Accumulator,
    /// The byte after the opcode (`LDA #$42`).
    Immediate,
    /// 16-bit address (`LDA $1234`).
    Absolute,
    /// `addr + X`; a page crossing may cost a cycle.
    AbsoluteX,
    /// `addr + Y`; a page crossing may cost a cycle.
    AbsoluteY,
    /// `JMP ($1234)`. The pointer's high byte is read from the same page as
    /// its low byte: `JMP ($10FF)` reads `$10FF` and `$1000`.
    Indirect,
    /// `$00nn`.
    ZeroPage,
    /// `(nn + X) & $FF`, never leaves page zero.
    ZeroPageX,
    /// `(nn + Y) & $FF`, never leaves page zero.
    ZeroPageY,
    /// `(nn,X)`: index first, then dereference a zero-page pointer.
    IndirectX,
    /// `(nn),Y`: dereference a zero-page pointer, then index.
    IndirectY,
    /// Signed 8-bit branch displacement from the next instruction.
    Relative,
}

impl Addressing {
    /// Instruction length in bytes, opcode included.
    pub const fn size(self) -> u8 {
        match self {
            Addressing::Implied | Addressing::Accumulator => 1,
            Addressing::Immediate
            | Addressing::ZeroPage
            | Addressing::ZeroPageX
            | Addressing::ZeroPageY
            | Addressing::IndirectX
            | Addressing::IndirectY
            | Addressing::Relative => 2,
            Addressing::Absolute
            | Addressing::AbsoluteX
            | Addressing::AbsoluteY
            | Addressing::Indirect => 3,
        }
    }
}

impl Display for Addressing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Addressing::Implied => "imp",
            Addressing::Accumulator => "acc",
            Addressing::Immediate => "imm",
            Addressing::Absolute => "abs",
            Addressing::AbsoluteX => "abx",
            Addressing::AbsoluteY => "aby",
            Addressing::Indirect => "ind",
            Addressing::ZeroPage => "zp",
            Addressing::ZeroPageX => "zpx",
            Addressing::ZeroPageY => "zpy",
            Addressing::IndirectX => "inx",
            Addressing::IndirectY => "iny",
            Addressing::Relative => "rel",
        };
        f.write_str(name)
    }
}

impl Cpu {
    /// Runs the resolver for `mode`, consuming operand bytes at PC.
    pub(crate) fn resolve_addressing(&mut self, mode: Addressing, bus: &mut impl Bus) {
        self.accumulator_mode = false;
        self.page_crossed = false;

        match mode {
            Addressing::Implied => {}
            Addressing::Accumulator => self.accumulator_mode = true,
            Addressing::Immediate => {
                self.effective_addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
            }
            Addressing::ZeroPage => {
                self.effective_addr = self.fetch_byte(bus) as u16;
            }
            Addressing::ZeroPageX => {
                self.effective_addr = self.fetch_byte(bus).wrapping_add(self.x) as u16;
            }
            Addressing::ZeroPageY => {
                self.effective_addr = self.fetch_byte(bus).wrapping_add(self.y) as u16;
            }
            Addressing::Absolute => {
                self.effective_addr = self.fetch_word(bus);
            }
            Addressing::AbsoluteX => {
                let base = self.fetch_word(bus);
                self.index(base, self.x);
            }
            Addressing::AbsoluteY => {
                let base = self.fetch_word(bus);
                self.index(base, self.y);
            }
            Addressing::Indirect => {
                let ptr = self.fetch_word(bus);
                let lo = bus.read(ptr);
                let hi = bus.read((ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF));
                self.effective_addr = u16::from_le_bytes([lo, hi]);
            }
            Addressing::IndirectX => {
                let zp = self.fetch_byte(bus).wrapping_add(self.x);
                self.effective_addr = read_zero_page_pointer(bus, zp);
            }
            Addressing::IndirectY => {
                let zp = self.fetch_byte(bus);
                let base = read_zero_page_pointer(bus, zp);
                self.index(base, self.y);
            }
            Addressing::Relative => {
                self.branch_offset = self.fetch_byte(bus) as i8;
            }
        }
    }

    fn index(&mut self, base: u16, index: u8) {
        let addr = base.wrapping_add(index as u16);
        self.base_addr = base;
        self.effective_addr = addr;
        self.page_crossed = (base & 0xFF00) != (addr & 0xFF00);
    }
}

fn read_zero_page_pointer(bus: &mut impl Bus, zp: u8) -> u16 {
    let lo = bus.read(zp as u16);
    let hi = bus.read(zp.wrapping_add(1) as u16);
    u16::from_le_bytes([lo, hi])
}
