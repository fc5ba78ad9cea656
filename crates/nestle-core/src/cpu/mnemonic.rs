use std::fmt::Display;

use crate::{bus::Bus, cpu::Cpu};

mod arith;
mod bra;
mod ctrl;
mod flags;
mod inc;
mod load;
mod logic;
mod shift;
mod stack;
mod trans;

/// Operation tag of an opcode descriptor.
///
/// Unofficial names follow the NESdev wiki (`ALR` rather than `ASR`,
/// `ISC` rather than `ISB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    //Load/Store
    LAX,
    LDA,
    LDX,
    LDY,
    SAX,
    SHX,
    SHY,
    STA,
    STX,
    STY,
    //Transfer
    TAX,
    TAY,
    TSX,
    TXA,
    TXS,
    TYA,
    //Stack
    PHA,
    PHP,
    PLA,
    PLP,
    //Shift
    ASL,
    LSR,
    ROL,
    ROR,
    //Logic
    AND,
    BIT,
    EOR,
    ORA,
    //Arithmetic
    ADC,
    ALR,
    ANC,
    ANE,
    ARR,
    CMP,
    CPX,
    CPY,
    DCP,
    ISC,
    LXA,
    RLA,
    RRA,
    SBC,
    SBX,
    SLO,
    SRE,
    //Inc/Dec
    DEC,
    DEX,
    DEY,
    INC,
    INX,
    INY,
    //Control Flow
    BRK,
    JMP,
    JSR,
    RTI,
    RTS,
    //Branch
    BCC,
    BCS,
    BEQ,
    BMI,
    BNE,
    BPL,
    BVC,
    BVS,
    //Flags
    CLC,
    CLD,
    CLI,
    CLV,
    SEC,
    SED,
    SEI,
    //NOP
    NOP,
}

impl Mnemonic {
    /// Whether an indexed access that crosses a page costs one more cycle.
    ///
    /// Only read-class operations pay it at run time. Stores and
    /// read-modify-write operations always spend the extra cycle, so it is
    /// already part of their base count in the opcode table.
    pub const fn pays_page_cross(self) -> bool {
        matches!(
            self,
            Mnemonic::LDA
                | Mnemonic::LDX
                | Mnemonic::LDY
                | Mnemonic::LAX
                | Mnemonic::ADC
                | Mnemonic::SBC
                | Mnemonic::AND
                | Mnemonic::ORA
                | Mnemonic::EOR
                | Mnemonic::CMP
                | Mnemonic::NOP
        )
    }
}

impl Display for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format!("{:?}", self).to_lowercase())
    }
}

impl Cpu {
    /// Runs the operation after its addressing mode has been resolved.
    pub(crate) fn execute(&mut self, mnemonic: Mnemonic, bus: &mut impl Bus) {
        match mnemonic {
            Mnemonic::LAX => self.lax(bus),
            Mnemonic::LDA => self.lda(bus),
            Mnemonic::LDX => self.ldx(bus),
            Mnemonic::LDY => self.ldy(bus),
            Mnemonic::SAX => self.sax(bus),
            Mnemonic::SHX => self.shx(bus),
            Mnemonic::SHY => self.shy(bus),
            Mnemonic::STA => self.sta(bus),
            Mnemonic::STX => self.stx(bus),
            Mnemonic::STY => self.sty(bus),

            Mnemonic::TAX => self.tax(),
            Mnemonic::TAY => self.tay(),
            Mnemonic::TSX => self.tsx(),
            Mnemonic::TXA => self.txa(),
            Mnemonic::TXS => self.txs(),
            Mnemonic::TYA => self.tya(),

            Mnemonic::PHA => self.pha(bus),
            Mnemonic::PHP => self.php(bus),
            Mnemonic::PLA => self.pla(bus),
            Mnemonic::PLP => self.plp(bus),

            Mnemonic::ASL => self.asl(bus),
            Mnemonic::LSR => self.lsr(bus),
            Mnemonic::ROL => self.rol(bus),
            Mnemonic::ROR => self.ror(bus),

            Mnemonic::AND => self.and(bus),
            Mnemonic::BIT => self.bit(bus),
            Mnemonic::EOR => self.eor(bus),
            Mnemonic::ORA => self.ora(bus),

            Mnemonic::ADC => self.adc(bus),
            Mnemonic::ALR => self.alr(bus),
            Mnemonic::ANC => self.anc(bus),
            Mnemonic::ANE => self.ane(bus),
            Mnemonic::ARR => self.arr(bus),
            Mnemonic::CMP => self.cmp(bus),
            Mnemonic::CPX => self.cpx(bus),
            Mnemonic::CPY => self.cpy(bus),
            Mnemonic::DCP => self.dcp(bus),
            Mnemonic::ISC => self.isc(bus),
            Mnemonic::LXA => self.lxa(bus),
            Mnemonic::RLA => self.rla(bus),
            Mnemonic::RRA => self.rra(bus),
            Mnemonic::SBC => self.sbc(bus),
            Mnemonic::SBX => self.sbx(bus),
            Mnemonic::SLO => self.slo(bus),
            Mnemonic::SRE => self.sre(bus),

            Mnemonic::DEC => self.dec(bus),
            Mnemonic::DEX => self.dex(),
            Mnemonic::DEY => self.dey(),
            Mnemonic::INC => self.inc(bus),
            Mnemonic::INX => self.inx(),
            Mnemonic::INY => self.iny(),

            Mnemonic::BRK => self.brk(bus),
            Mnemonic::JMP => self.jmp(),
            Mnemonic::JSR => self.jsr(bus),
            Mnemonic::RTI => self.rti(bus),
            Mnemonic::RTS => self.rts(bus),

            Mnemonic::BCC => self.bcc(),
            Mnemonic::BCS => self.bcs(),
            Mnemonic::BEQ => self.beq(),
            Mnemonic::BMI => self.bmi(),
            Mnemonic::BNE => self.bne(),
            Mnemonic::BPL => self.bpl(),
            Mnemonic::BVC => self.bvc(),
            Mnemonic::BVS => self.bvs(),

            Mnemonic::CLC => self.clc(),
            Mnemonic::CLD => self.cld(),
            Mnemonic::CLI => self.cli(),
            Mnemonic::CLV => self.clv(),
            Mnemonic::SEC => self.sec(),
            Mnemonic::SED => self.sed(),
            Mnemonic::SEI => self.sei(),

            // Operand bytes are consumed but never read.
            Mnemonic::NOP => {}
        }
    }
}
