//! # Load and Store Instructions
//!
//! This module implements register/memory transfers:
//! - LDA, LDX, LDY: load a register, updating Z and N. Indexed reads pay one
//!   extra cycle when the index crosses a page.
//! - STA, STX, STY: store a register. No flags change and no page-cross
//!   penalty applies (the base cycle count already includes it).

use crate::{MemoryBus, CPU, OPCODE_TABLE};

fn load<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) -> u8 {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (value, page_crossed) = cpu.get_operand_value(metadata.addressing_mode);

    let mut cycles = metadata.base_cycles;
    if page_crossed {
        cycles += 1;
    }
    cpu.finish(cycles, metadata.size_bytes);

    cpu.set_nz(value);
    value
}

fn store<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8, value: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (addr, _) = cpu.get_effective_address(metadata.addressing_mode);
    cpu.memory.write(addr, value);
    cpu.finish(metadata.base_cycles, metadata.size_bytes);
}

/// Executes the LDA (Load Accumulator) instruction.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU
/// * `opcode` - The opcode byte for this LDA instruction
pub(crate) fn execute_lda<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    cpu.a = load(cpu, opcode);
}

/// Executes the LDX (Load X Register) instruction.
pub(crate) fn execute_ldx<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    cpu.x = load(cpu, opcode);
}

/// Executes the LDY (Load Y Register) instruction.
pub(crate) fn execute_ldy<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    cpu.y = load(cpu, opcode);
}

/// Executes the STA (Store Accumulator) instruction.
pub(crate) fn execute_sta<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let value = cpu.a;
    store(cpu, opcode, value);
}

/// Executes the STX (Store X Register) instruction.
pub(crate) fn execute_stx<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let value = cpu.x;
    store(cpu, opcode, value);
}

/// Executes the STY (Store Y Register) instruction.
pub(crate) fn execute_sty<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let value = cpu.y;
    store(cpu, opcode, value);
}
