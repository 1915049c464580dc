//! # Status Flag Instructions
//!
//! CLC, SEC, CLI, SEI, CLD, SED, CLV. Each is implied-mode, one byte and
//! two cycles, and changes exactly one flag.

use crate::{MemoryBus, CPU, OPCODE_TABLE};

fn finish<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    cpu.finish(metadata.base_cycles, metadata.size_bytes);
}

/// Executes the CLC (Clear Carry Flag) instruction.
pub(crate) fn execute_clc<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    cpu.flag_c = false;
    finish(cpu, opcode);
}

/// Executes the SEC (Set Carry Flag) instruction.
pub(crate) fn execute_sec<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    cpu.flag_c = true;
    finish(cpu, opcode);
}

/// Executes the CLI (Clear Interrupt Disable) instruction.
///
/// A latched IRQ is serviced before the next instruction.
pub(crate) fn execute_cli<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    cpu.flag_i = false;
    finish(cpu, opcode);
}

/// Executes the SEI (Set Interrupt Disable) instruction.
pub(crate) fn execute_sei<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    cpu.flag_i = true;
    finish(cpu, opcode);
}

/// Executes the CLD (Clear Decimal Mode) instruction.
pub(crate) fn execute_cld<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    cpu.flag_d = false;
    finish(cpu, opcode);
}

/// Executes the SED (Set Decimal Mode) instruction.
pub(crate) fn execute_sed<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    cpu.flag_d = true;
    finish(cpu, opcode);
}

/// Executes the CLV (Clear Overflow Flag) instruction.
pub(crate) fn execute_clv<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    cpu.flag_v = false;
    finish(cpu, opcode);
}
