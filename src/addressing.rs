//! # Addressing Modes
//!
//! The 13 NMOS 6502 addressing modes. The mode decides how many operand bytes
//! follow the opcode and how the CPU turns them into an effective address.
//!
//! Operand sizes:
//!
//! - **0 bytes**: Implicit, Accumulator
//! - **1 byte**: Immediate, ZeroPage, ZeroPageX, ZeroPageY, Relative, IndirectX, IndirectY
//! - **2 bytes**: Absolute, AbsoluteX, AbsoluteY, Indirect

use serde::Serialize;

/// 6502 addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AddressingMode {
    /// No operand (CLC, RTS, NOP).
    Implicit,

    /// Operates on the accumulator (ASL A, ROR A).
    Accumulator,

    /// 8-bit constant (LDA #$10).
    Immediate,

    /// Address in page zero (LDA $80).
    ZeroPage,

    /// Page-zero address plus X, wrapping inside page zero.
    ZeroPageX,

    /// Page-zero address plus Y, wrapping inside page zero. Only LDX/STX.
    ZeroPageY,

    /// Signed 8-bit branch offset, relative to the next instruction.
    Relative,

    /// Full 16-bit address.
    Absolute,

    /// 16-bit address plus X. Reads pay +1 cycle on a page cross.
    AbsoluteX,

    /// 16-bit address plus Y. Reads pay +1 cycle on a page cross.
    AbsoluteY,

    /// JMP ($xxxx). The high byte is fetched from the same page when the
    /// pointer sits at $xxFF (NMOS bug).
    Indirect,

    /// ($zz,X): pointer read from page zero at zz+X.
    IndirectX,

    /// ($zz),Y: pointer read from page zero at zz, then Y added.
    /// Reads pay +1 cycle on a page cross.
    IndirectY,
}

impl AddressingMode {
    /// Number of operand bytes following the opcode.
    pub const fn operand_size(self) -> u8 {
        match self {
            AddressingMode::Implicit | AddressingMode::Accumulator => 0,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
            _ => 1,
        }
    }

    /// Formats an operand in conventional assembler syntax.
    ///
    /// `pc` is the address of the opcode; it is only used to resolve the
    /// target of relative branches.
    pub fn format_operand(self, pc: u16, lo: u8, hi: u8) -> String {
        let word = u16::from_le_bytes([lo, hi]);
        match self {
            AddressingMode::Implicit => String::new(),
            AddressingMode::Accumulator => "A".to_string(),
            AddressingMode::Immediate => format!("#${:02X}", lo),
            AddressingMode::ZeroPage => format!("${:02X}", lo),
            AddressingMode::ZeroPageX => format!("${:02X},X", lo),
            AddressingMode::ZeroPageY => format!("${:02X},Y", lo),
            AddressingMode::Relative => {
                let target = pc.wrapping_add(2).wrapping_add_signed(lo as i8 as i16);
                format!("${:04X}", target)
            }
            AddressingMode::Absolute => format!("${:04X}", word),
            AddressingMode::AbsoluteX => format!("${:04X},X", word),
            AddressingMode::AbsoluteY => format!("${:04X},Y", word),
            AddressingMode::Indirect => format!("(${:04X})", word),
            AddressingMode::IndirectX => format!("(${:02X},X)", lo),
            AddressingMode::IndirectY => format!("(${:02X}),Y", lo),
        }
    }
}
