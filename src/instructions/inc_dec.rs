//! # Increment and Decrement Instructions
//!
//! INC/DEC modify memory; INX/INY/DEX/DEY modify index registers.
//! All wrap at 8 bits and update Z and N only.

use crate::{MemoryBus, CPU, OPCODE_TABLE};

/// Executes the INC (Increment Memory) instruction.
pub(crate) fn execute_inc<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    cpu.read_modify_write(metadata.addressing_mode, |cpu, value| {
        let result = value.wrapping_add(1);
        cpu.set_nz(result);
        result
    });
    cpu.finish(metadata.base_cycles, metadata.size_bytes);
}

/// Executes the DEC (Decrement Memory) instruction.
pub(crate) fn execute_dec<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    cpu.read_modify_write(metadata.addressing_mode, |cpu, value| {
        let result = value.wrapping_sub(1);
        cpu.set_nz(result);
        result
    });
    cpu.finish(metadata.base_cycles, metadata.size_bytes);
}

/// Executes the INX (Increment X) instruction.
pub(crate) fn execute_inx<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    cpu.x = cpu.x.wrapping_add(1);
    cpu.set_nz(cpu.x);
    cpu.finish(metadata.base_cycles, metadata.size_bytes);
}

/// Executes the INY (Increment Y) instruction.
pub(crate) fn execute_iny<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    cpu.y = cpu.y.wrapping_add(1);
    cpu.set_nz(cpu.y);
    cpu.finish(metadata.base_cycles, metadata.size_bytes);
}

/// Executes the DEX (Decrement X) instruction.
pub(crate) fn execute_dex<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    cpu.x = cpu.x.wrapping_sub(1);
    cpu.set_nz(cpu.x);
    cpu.finish(metadata.base_cycles, metadata.size_bytes);
}

/// Executes the DEY (Decrement Y) instruction.
pub(crate) fn execute_dey<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    cpu.y = cpu.y.wrapping_sub(1);
    cpu.set_nz(cpu.y);
    cpu.finish(metadata.base_cycles, metadata.size_bytes);
}
