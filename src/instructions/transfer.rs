//! # Register Transfer Instructions
//!
//! TAX, TAY, TXA, TYA, TSX update Z and N from the copied value.
//! TXS does not touch any flag.

use crate::{MemoryBus, CPU, OPCODE_TABLE};

fn finish<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    cpu.finish(metadata.base_cycles, metadata.size_bytes);
}

/// Executes the TAX (Transfer Accumulator to X) instruction.
pub(crate) fn execute_tax<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    cpu.x = cpu.a;
    cpu.set_nz(cpu.x);
    finish(cpu, opcode);
}

/// Executes the TAY (Transfer Accumulator to Y) instruction.
pub(crate) fn execute_tay<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    cpu.y = cpu.a;
    cpu.set_nz(cpu.y);
    finish(cpu, opcode);
}

/// Executes the TXA (Transfer X to Accumulator) instruction.
pub(crate) fn execute_txa<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    cpu.a = cpu.x;
    cpu.set_nz(cpu.a);
    finish(cpu, opcode);
}

/// Executes the TYA (Transfer Y to Accumulator) instruction.
pub(crate) fn execute_tya<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    cpu.a = cpu.y;
    cpu.set_nz(cpu.a);
    finish(cpu, opcode);
}

/// Executes the TSX (Transfer Stack Pointer to X) instruction.
pub(crate) fn execute_tsx<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    cpu.x = cpu.sp;
    cpu.set_nz(cpu.x);
    finish(cpu, opcode);
}

/// Executes the TXS (Transfer X to Stack Pointer) instruction.
pub(crate) fn execute_txs<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    cpu.sp = cpu.x;
    finish(cpu, opcode);
}
