//! # Opcode Metadata Table
//!
//! The 256-entry table is the single source of truth for decoding: every
//! opcode byte maps to its mnemonic, the operation to dispatch, its addressing
//! mode, base cycle cost and encoded size.
//!
//! - **151 documented instructions**: the official NMOS 6502 set.
//! - **105 undocumented opcodes**: `"???"` entries decoded as a one-byte,
//!   two-cycle NOP. Emulation never halts on them.

use crate::addressing::AddressingMode;

/// The operation an opcode performs, independent of its addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    /// Undocumented opcode, executed as a NOP.
    Illegal,
}

/// Static information about one opcode.
///
/// ```
/// use mos6502_core::{AddressingMode, OPCODE_TABLE};
///
/// let lda_imm = &OPCODE_TABLE[0xA9];
/// assert_eq!(lda_imm.mnemonic, "LDA");
/// assert_eq!(lda_imm.addressing_mode, AddressingMode::Immediate);
/// assert_eq!(lda_imm.base_cycles, 2);
/// assert_eq!(lda_imm.size_bytes, 2);
/// assert!(lda_imm.implemented);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeMetadata {
    /// Three-letter mnemonic, `"???"` for undocumented opcodes.
    pub mnemonic: &'static str,

    /// Operation dispatched by the CPU.
    pub operation: Operation,

    /// How the operand bytes are interpreted.
    pub addressing_mode: AddressingMode,

    /// Cycle cost before page-crossing and branch-taken penalties.
    pub base_cycles: u8,

    /// Opcode plus operand bytes (1-3).
    pub size_bytes: u8,

    /// `false` only for undocumented opcodes.
    pub implemented: bool,
}

const fn op(
    mnemonic: &'static str,
    operation: Operation,
    addressing_mode: AddressingMode,
    base_cycles: u8,
    size_bytes: u8,
) -> OpcodeMetadata {
    OpcodeMetadata {
        mnemonic,
        operation,
        addressing_mode,
        base_cycles,
        size_bytes,
        implemented: true,
    }
}

const ILLEGAL: OpcodeMetadata = OpcodeMetadata {
    mnemonic: "???",
    operation: Operation::Illegal,
    addressing_mode: AddressingMode::Implicit,
    base_cycles: 2,
    size_bytes: 1,
    implemented: false,
};

/// Complete opcode table indexed by opcode byte.
pub const OPCODE_TABLE: [OpcodeMetadata; 256] = [
    /* 0x00 */ op("BRK", Operation::Brk, AddressingMode::Implicit, 7, 1),
    /* 0x01 */ op("ORA", Operation::Ora, AddressingMode::IndirectX, 6, 2),
    /* 0x02 */ ILLEGAL,
    /* 0x03 */ ILLEGAL,
    /* 0x04 */ ILLEGAL,
    /* 0x05 */ op("ORA", Operation::Ora, AddressingMode::ZeroPage, 3, 2),
    /* 0x06 */ op("ASL", Operation::Asl, AddressingMode::ZeroPage, 5, 2),
    /* 0x07 */ ILLEGAL,
    /* 0x08 */ op("PHP", Operation::Php, AddressingMode::Implicit, 3, 1),
    /* 0x09 */ op("ORA", Operation::Ora, AddressingMode::Immediate, 2, 2),
    /* 0x0A */ op("ASL", Operation::Asl, AddressingMode::Accumulator, 2, 1),
    /* 0x0B */ ILLEGAL,
    /* 0x0C */ ILLEGAL,
    /* 0x0D */ op("ORA", Operation::Ora, AddressingMode::Absolute, 4, 3),
    /* 0x0E */ op("ASL", Operation::Asl, AddressingMode::Absolute, 6, 3),
    /* 0x0F */ ILLEGAL,
    /* 0x10 */ op("BPL", Operation::Bpl, AddressingMode::Relative, 2, 2),
    /* 0x11 */ op("ORA", Operation::Ora, AddressingMode::IndirectY, 5, 2),
    /* 0x12 */ ILLEGAL,
    /* 0x13 */ ILLEGAL,
    /* 0x14 */ ILLEGAL,
    /* 0x15 */ op("ORA", Operation::Ora, AddressingMode::ZeroPageX, 4, 2),
    /* 0x16 */ op("ASL", Operation::Asl, AddressingMode::ZeroPageX, 6, 2),
    /* 0x17 */ ILLEGAL,
    /* 0x18 */ op("CLC", Operation::Clc, AddressingMode::Implicit, 2, 1),
    /* 0x19 */ op("ORA", Operation::Ora, AddressingMode::AbsoluteY, 4, 3),
    /* 0x1A */ ILLEGAL,
    /* 0x1B */ ILLEGAL,
    /* 0x1C */ ILLEGAL,
    /* 0x1D */ op("ORA", Operation::Ora, AddressingMode::AbsoluteX, 4, 3),
    /* 0x1E */ op("ASL", Operation::Asl, AddressingMode::AbsoluteX, 7, 3),
    /* 0x1F */ ILLEGAL,
    /* 0x20 */ op("JSR", Operation::Jsr, AddressingMode::Absolute, 6, 3),
    /* 0x21 */ op("AND", Operation::And, AddressingMode::IndirectX, 6, 2),
    /* 0x22 */ ILLEGAL,
    /* 0x23 */ ILLEGAL,
    /* 0x24 */ op("BIT", Operation::Bit, AddressingMode::ZeroPage, 3, 2),
    /* 0x25 */ op("AND", Operation::And, AddressingMode::ZeroPage, 3, 2),
    /* 0x26 */ op("ROL", Operation::Rol, AddressingMode::ZeroPage, 5, 2),
    /* 0x27 */ ILLEGAL,
    /* 0x28 */ op("PLP", Operation::Plp, AddressingMode::Implicit, 4, 1),
    /* 0x29 */ op("AND", Operation::And, AddressingMode::Immediate, 2, 2),
    /* 0x2A */ op("ROL", Operation::Rol, AddressingMode::Accumulator, 2, 1),
    /* 0x2B */ ILLEGAL,
    /* 0x2C */ op("BIT", Operation::Bit, AddressingMode::Absolute, 4, 3),
    /* 0x2D */ op("AND", Operation::And, AddressingMode::Absolute, 4, 3),
    /* 0x2E */ op("ROL", Operation::Rol, AddressingMode::Absolute, 6, 3),
    /* 0x2F */ ILLEGAL,
    /* 0x30 */ op("BMI", Operation::Bmi, AddressingMode::Relative, 2, 2),
    /* 0x31 */ op("AND", Operation::And, AddressingMode::IndirectY, 5, 2),
    /* 0x32 */ ILLEGAL,
    /* 0x33 */ ILLEGAL,
    /* 0x34 */ ILLEGAL,
    /* 0x35 */ op("AND", Operation::And, AddressingMode::ZeroPageX, 4, 2),
    /* 0x36 */ op("ROL", Operation::Rol, AddressingMode::ZeroPageX, 6, 2),
    /* 0x37 */ ILLEGAL,
    /* 0x38 */ op("SEC", Operation::Sec, AddressingMode::Implicit, 2, 1),
    /* 0x39 */ op("AND", Operation::And, AddressingMode::AbsoluteY, 4, 3),
    /* 0x3A */ ILLEGAL,
    /* 0x3B */ ILLEGAL,
    /* 0x3C */ ILLEGAL,
    /* 0x3D */ op("AND", Operation::And, AddressingMode::AbsoluteX, 4, 3),
    /* 0x3E */ op("ROL", Operation::Rol, AddressingMode::AbsoluteX, 7, 3),
    /* 0x3F */ ILLEGAL,
    /* 0x40 */ op("RTI", Operation::Rti, AddressingMode::Implicit, 6, 1),
    /* 0x41 */ op("EOR", Operation::Eor, AddressingMode::IndirectX, 6, 2),
    /* 0x42 */ ILLEGAL,
    /* 0x43 */ ILLEGAL,
    /* 0x44 */ ILLEGAL,
    /* 0x45 */ op("EOR", Operation::Eor, AddressingMode::ZeroPage, 3, 2),
    /* 0x46 */ op("LSR", Operation::Lsr, AddressingMode::ZeroPage, 5, 2),
    /* 0x47 */ ILLEGAL,
    /* 0x48 */ op("PHA", Operation::Pha, AddressingMode::Implicit, 3, 1),
    /* 0x49 */ op("EOR", Operation::Eor, AddressingMode::Immediate, 2, 2),
    /* 0x4A */ op("LSR", Operation::Lsr, AddressingMode::Accumulator, 2, 1),
    /* 0x4B */ ILLEGAL,
    /* 0x4C */ op("JMP", Operation::Jmp, AddressingMode::Absolute, 3, 3),
    /* 0x4D */ op("EOR", Operation::Eor, AddressingMode::Absolute, 4, 3),
    /* 0x4E */ op("LSR", Operation::Lsr, AddressingMode::Absolute, 6, 3),
    /* 0x4F */ ILLEGAL,
    /* 0x50 */ op("BVC", Operation::Bvc, AddressingMode::Relative, 2, 2),
    /* 0x51 */ op("EOR", Operation::Eor, AddressingMode::IndirectY, 5, 2),
    /* 0x52 */ ILLEGAL,
    /* 0x53 */ ILLEGAL,
    /* 0x54 */ ILLEGAL,
    /* 0x55 */ op("EOR", Operation::Eor, AddressingMode::ZeroPageX, 4, 2),
    /* 0x56 */ op("LSR", Operation::Lsr, AddressingMode::ZeroPageX, 6, 2),
    /* 0x57 */ ILLEGAL,
    /* 0x58 */ op("CLI", Operation::Cli, AddressingMode::Implicit, 2, 1),
    /* 0x59 */ op("EOR", Operation::Eor, AddressingMode::AbsoluteY, 4, 3),
    /* 0x5A */ ILLEGAL,
    /* 0x5B */ ILLEGAL,
    /* 0x5C */ ILLEGAL,
    /* 0x5D */ op("EOR", Operation::Eor, AddressingMode::AbsoluteX, 4, 3),
    /* 0x5E */ op("LSR", Operation::Lsr, AddressingMode::AbsoluteX, 7, 3),
    /* 0x5F */ ILLEGAL,
    /* 0x60 */ op("RTS", Operation::Rts, AddressingMode::Implicit, 6, 1),
    /* 0x61 */ op("ADC", Operation::Adc, AddressingMode::IndirectX, 6, 2),
    /* 0x62 */ ILLEGAL,
    /* 0x63 */ ILLEGAL,
    /* 0x64 */ ILLEGAL,
    /* 0x65 */ op("ADC", Operation::Adc, AddressingMode::ZeroPage, 3, 2),
    /* 0x66 */ op("ROR", Operation::Ror, AddressingMode::ZeroPage, 5, 2),
    /* 0x67 */ ILLEGAL,
    /* 0x68 */ op("PLA", Operation::Pla, AddressingMode::Implicit, 4, 1),
    /* 0x69 */ op("ADC", Operation::Adc, AddressingMode::Immediate, 2, 2),
    /* 0x6A */ op("ROR", Operation::Ror, AddressingMode::Accumulator, 2, 1),
    /* 0x6B */ ILLEGAL,
    /* 0x6C */ op("JMP", Operation::Jmp, AddressingMode::Indirect, 5, 3),
    /* 0x6D */ op("ADC", Operation::Adc, AddressingMode::Absolute, 4, 3),
    /* 0x6E */ op("ROR", Operation::Ror, AddressingMode::Absolute, 6, 3),
    /* 0x6F */ ILLEGAL,
    /* 0x70 */ op("BVS", Operation::Bvs, AddressingMode::Relative, 2, 2),
    /* 0x71 */ op("ADC", Operation::Adc, AddressingMode::IndirectY, 5, 2),
    /* 0x72 */ ILLEGAL,
    /* 0x73 */ ILLEGAL,
    /* 0x74 */ ILLEGAL,
    /* 0x75 */ op("ADC", Operation::Adc, AddressingMode::ZeroPageX, 4, 2),
    /* 0x76 */ op("ROR", Operation::Ror, AddressingMode::ZeroPageX, 6, 2),
    /* 0x77 */ ILLEGAL,
    /* 0x78 */ op("SEI", Operation::Sei, AddressingMode::Implicit, 2, 1),
    /* 0x79 */ op("ADC", Operation::Adc, AddressingMode::AbsoluteY, 4, 3),
    /* 0x7A */ ILLEGAL,
    /* 0x7B */ ILLEGAL,
    /* 0x7C */ ILLEGAL,
    /* 0x7D */ op("ADC", Operation::Adc, AddressingMode::AbsoluteX, 4, 3),
    /* 0x7E */ op("ROR", Operation::Ror, AddressingMode::AbsoluteX, 7, 3),
    /* 0x7F */ ILLEGAL,
    /* 0x80 */ ILLEGAL,
    /* 0x81 */ op("STA", Operation::Sta, AddressingMode::IndirectX, 6, 2),
    /* 0x82 */ ILLEGAL,
    /* 0x83 */ ILLEGAL,
    /* 0x84 */ op("STY", Operation::Sty, AddressingMode::ZeroPage, 3, 2),
    /* 0x85 */ op("STA", Operation::Sta, AddressingMode::ZeroPage, 3, 2),
    /* 0x86 */ op("STX", Operation::Stx, AddressingMode::ZeroPage, 3, 2),
    /* 0x87 */ ILLEGAL,
    /* 0x88 */ op("DEY", Operation::Dey, AddressingMode::Implicit, 2, 1),
    /* 0x89 */ ILLEGAL,
    /* 0x8A */ op("TXA", Operation::Txa, AddressingMode::Implicit, 2, 1),
    /* 0x8B */ ILLEGAL,
    /* 0x8C */ op("STY", Operation::Sty, AddressingMode::Absolute, 4, 3),
    /* 0x8D */ op("STA", Operation::Sta, AddressingMode::Absolute, 4, 3),
    /* 0x8E */ op("STX", Operation::Stx, AddressingMode::Absolute, 4, 3),
    /* 0x8F */ ILLEGAL,
    /* 0x90 */ op("BCC", Operation::Bcc, AddressingMode::Relative, 2, 2),
    /* 0x91 */ op("STA", Operation::Sta, AddressingMode::IndirectY, 6, 2),
    /* 0x92 */ ILLEGAL,
    /* 0x93 */ ILLEGAL,
    /* 0x94 */ op("STY", Operation::Sty, AddressingMode::ZeroPageX, 4, 2),
    /* 0x95 */ op("STA", Operation::Sta, AddressingMode::ZeroPageX, 4, 2),
    /* 0x96 */ op("STX", Operation::Stx, AddressingMode::ZeroPageY, 4, 2),
    /* 0x97 */ ILLEGAL,
    /* 0x98 */ op("TYA", Operation::Tya, AddressingMode::Implicit, 2, 1),
    /* 0x99 */ op("STA", Operation::Sta, AddressingMode::AbsoluteY, 5, 3),
    /* 0x9A */ op("TXS", Operation::Txs, AddressingMode::Implicit, 2, 1),
    /* 0x9B */ ILLEGAL,
    /* 0x9C */ ILLEGAL,
    /* 0x9D */ op("STA", Operation::Sta, AddressingMode::AbsoluteX, 5, 3),
    /* 0x9E */ ILLEGAL,
    /* 0x9F */ ILLEGAL,
    /* 0xA0 */ op("LDY", Operation::Ldy, AddressingMode::Immediate, 2, 2),
    /* 0xA1 */ op("LDA", Operation::Lda, AddressingMode::IndirectX, 6, 2),
    /* 0xA2 */ op("LDX", Operation::Ldx, AddressingMode::Immediate, 2, 2),
    /* 0xA3 */ ILLEGAL,
    /* 0xA4 */ op("LDY", Operation::Ldy, AddressingMode::ZeroPage, 3, 2),
    /* 0xA5 */ op("LDA", Operation::Lda, AddressingMode::ZeroPage, 3, 2),
    /* 0xA6 */ op("LDX", Operation::Ldx, AddressingMode::ZeroPage, 3, 2),
    /* 0xA7 */ ILLEGAL,
    /* 0xA8 */ op("TAY", Operation::Tay, AddressingMode::Implicit, 2, 1),
    /* 0xA9 */ op("LDA", Operation::Lda, AddressingMode::Immediate, 2, 2),
    /* 0xAA */ op("TAX", Operation::Tax, AddressingMode::Implicit, 2, 1),
    /* 0xAB */ ILLEGAL,
    /* 0xAC */ op("LDY", Operation::Ldy, AddressingMode::Absolute, 4, 3),
    /* 0xAD */ op("LDA", Operation::Lda, AddressingMode::Absolute, 4, 3),
    /* 0xAE */ op("LDX", Operation::Ldx, AddressingMode::Absolute, 4, 3),
    /* 0xAF */ ILLEGAL,
    /* 0xB0 */ op("BCS", Operation::Bcs, AddressingMode::Relative, 2, 2),
    /* 0xB1 */ op("LDA", Operation::Lda, AddressingMode::IndirectY, 5, 2),
    /* 0xB2 */ ILLEGAL,
    /* 0xB3 */ ILLEGAL,
    /* 0xB4 */ op("LDY", Operation::Ldy, AddressingMode::ZeroPageX, 4, 2),
    /* 0xB5 */ op("LDA", Operation::Lda, AddressingMode::ZeroPageX, 4, 2),
    /* 0xB6 */ op("LDX", Operation::Ldx, AddressingMode::ZeroPageY, 4, 2),
    /* 0xB7 */ ILLEGAL,
    /* 0xB8 */ op("CLV", Operation::Clv, AddressingMode::Implicit, 2, 1),
    /* 0xB9 */ op("LDA", Operation::Lda, AddressingMode::AbsoluteY, 4, 3),
    /* 0xBA */ op("TSX", Operation::Tsx, AddressingMode::Implicit, 2, 1),
    /* 0xBB */ ILLEGAL,
    /* 0xBC */ op("LDY", Operation::Ldy, AddressingMode::AbsoluteX, 4, 3),
    /* 0xBD */ op("LDA", Operation::Lda, AddressingMode::AbsoluteX, 4, 3),
    /* 0xBE */ op("LDX", Operation::Ldx, AddressingMode::AbsoluteY, 4, 3),
    /* 0xBF */ ILLEGAL,
    /* 0xC0 */ op("CPY", Operation::Cpy, AddressingMode::Immediate, 2, 2),
    /* 0xC1 */ op("CMP", Operation::Cmp, AddressingMode::IndirectX, 6, 2),
    /* 0xC2 */ ILLEGAL,
    /* 0xC3 */ ILLEGAL,
    /* 0xC4 */ op("CPY", Operation::Cpy, AddressingMode::ZeroPage, 3, 2),
    /* 0xC5 */ op("CMP", Operation::Cmp, AddressingMode::ZeroPage, 3, 2),
    /* 0xC6 */ op("DEC", Operation::Dec, AddressingMode::ZeroPage, 5, 2),
    /* 0xC7 */ ILLEGAL,
    /* 0xC8 */ op("INY", Operation::Iny, AddressingMode::Implicit, 2, 1),
    /* 0xC9 */ op("CMP", Operation::Cmp, AddressingMode::Immediate, 2, 2),
    /* 0xCA */ op("DEX", Operation::Dex, AddressingMode::Implicit, 2, 1),
    /* 0xCB */ ILLEGAL,
    /* 0xCC */ op("CPY", Operation::Cpy, AddressingMode::Absolute, 4, 3),
    /* 0xCD */ op("CMP", Operation::Cmp, AddressingMode::Absolute, 4, 3),
    /* 0xCE */ op("DEC", Operation::Dec, AddressingMode::Absolute, 6, 3),
    /* 0xCF */ ILLEGAL,
    /* 0xD0 */ op("BNE", Operation::Bne, AddressingMode::Relative, 2, 2),
    /* 0xD1 */ op("CMP", Operation::Cmp, AddressingMode::IndirectY, 5, 2),
    /* 0xD2 */ ILLEGAL,
    /* 0xD3 */ ILLEGAL,
    /* 0xD4 */ ILLEGAL,
    /* 0xD5 */ op("CMP", Operation::Cmp, AddressingMode::ZeroPageX, 4, 2),
    /* 0xD6 */ op("DEC", Operation::Dec, AddressingMode::ZeroPageX, 6, 2),
    /* 0xD7 */ ILLEGAL,
    /* 0xD8 */ op("CLD", Operation::Cld, AddressingMode::Implicit, 2, 1),
    /* 0xD9 */ op("CMP", Operation::Cmp, AddressingMode::AbsoluteY, 4, 3),
    /* 0xDA */ ILLEGAL,
    /* 0xDB */ ILLEGAL,
    /* 0xDC */ ILLEGAL,
    /* 0xDD */ op("CMP", Operation::Cmp, AddressingMode::AbsoluteX, 4, 3),
    /* 0xDE */ op("DEC", Operation::Dec, AddressingMode::AbsoluteX, 7, 3),
    /* 0xDF */ ILLEGAL,
    /* 0xE0 */ op("CPX", Operation::Cpx, AddressingMode::Immediate, 2, 2),
    /* 0xE1 */ op("SBC", Operation::Sbc, AddressingMode::IndirectX, 6, 2),
    /* 0xE2 */ ILLEGAL,
    /* 0xE3 */ ILLEGAL,
    /* 0xE4 */ op("CPX", Operation::Cpx, AddressingMode::ZeroPage, 3, 2),
    /* 0xE5 */ op("SBC", Operation::Sbc, AddressingMode::ZeroPage, 3, 2),
    /* 0xE6 */ op("INC", Operation::Inc, AddressingMode::ZeroPage, 5, 2),
    /* 0xE7 */ ILLEGAL,
    /* 0xE8 */ op("INX", Operation::Inx, AddressingMode::Implicit, 2, 1),
    /* 0xE9 */ op("SBC", Operation::Sbc, AddressingMode::Immediate, 2, 2),
    /* 0xEA */ op("NOP", Operation::Nop, AddressingMode::Implicit, 2, 1),
    /* 0xEB */ ILLEGAL,
    /* 0xEC */ op("CPX", Operation::Cpx, AddressingMode::Absolute, 4, 3),
    /* 0xED */ op("SBC", Operation::Sbc, AddressingMode::Absolute, 4, 3),
    /* 0xEE */ op("INC", Operation::Inc, AddressingMode::Absolute, 6, 3),
    /* 0xEF */ ILLEGAL,
    /* 0xF0 */ op("BEQ", Operation::Beq, AddressingMode::Relative, 2, 2),
    /* 0xF1 */ op("SBC", Operation::Sbc, AddressingMode::IndirectY, 5, 2),
    /* 0xF2 */ ILLEGAL,
    /* 0xF3 */ ILLEGAL,
    /* 0xF4 */ ILLEGAL,
    /* 0xF5 */ op("SBC", Operation::Sbc, AddressingMode::ZeroPageX, 4, 2),
    /* 0xF6 */ op("INC", Operation::Inc, AddressingMode::ZeroPageX, 6, 2),
    /* 0xF7 */ ILLEGAL,
    /* 0xF8 */ op("SED", Operation::Sed, AddressingMode::Implicit, 2, 1),
    /* 0xF9 */ op("SBC", Operation::Sbc, AddressingMode::AbsoluteY, 4, 3),
    /* 0xFA */ ILLEGAL,
    /* 0xFB */ ILLEGAL,
    /* 0xFC */ ILLEGAL,
    /* 0xFD */ op("SBC", Operation::Sbc, AddressingMode::AbsoluteX, 4, 3),
    /* 0xFE */ op("INC", Operation::Inc, AddressingMode::AbsoluteX, 7, 3),
    /* 0xFF */ ILLEGAL,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_opcode_count() {
        let documented = OPCODE_TABLE.iter().filter(|m| m.implemented).count();
        assert_eq!(documented, 151);
    }

    #[test]
    fn test_sizes_match_addressing_modes() {
        for (opcode, meta) in OPCODE_TABLE.iter().enumerate() {
            assert_eq!(
                meta.size_bytes,
                1 + meta.addressing_mode.operand_size(),
                "size mismatch for opcode 0x{:02X}",
                opcode
            );
        }
    }

    #[test]
    fn test_illegal_opcodes_are_two_cycle_nops() {
        for meta in OPCODE_TABLE.iter().filter(|m| !m.implemented) {
            assert_eq!(meta.mnemonic, "???");
            assert_eq!(meta.operation, Operation::Illegal);
            assert_eq!(meta.base_cycles, 2);
            assert_eq!(meta.size_bytes, 1);
        }
    }
}
