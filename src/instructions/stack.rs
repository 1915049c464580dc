//! # Stack Instructions
//!
//! PHA, PHP, PLA, PLP. The stack lives in page one and grows downward;
//! SP wraps within the page.

use crate::{MemoryBus, CPU, OPCODE_TABLE};

/// Executes the PHA (Push Accumulator) instruction.
pub(crate) fn execute_pha<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    cpu.push(cpu.a);
    cpu.finish(metadata.base_cycles, metadata.size_bytes);
}

/// Executes the PHP (Push Processor Status) instruction.
///
/// The pushed copy has B and bit 5 set.
pub(crate) fn execute_php<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let status = cpu.status() | 0b0011_0000;
    cpu.push(status);
    cpu.finish(metadata.base_cycles, metadata.size_bytes);
}

/// Executes the PLA (Pull Accumulator) instruction. Updates Z and N.
pub(crate) fn execute_pla<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    cpu.a = cpu.pull();
    cpu.set_nz(cpu.a);
    cpu.finish(metadata.base_cycles, metadata.size_bytes);
}

/// Executes the PLP (Pull Processor Status) instruction.
///
/// B and bit 5 of the pulled byte are ignored.
pub(crate) fn execute_plp<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let status = cpu.pull();
    cpu.set_status(status);
    cpu.finish(metadata.base_cycles, metadata.size_bytes);
}
