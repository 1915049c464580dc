//! # Shift and Rotate Instructions
//!
//! ASL, LSR, ROL, ROR on the accumulator or memory. C receives the bit
//! shifted out; Z and N are set from the result.

use crate::{MemoryBus, CPU, OPCODE_TABLE};

fn shift<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8, op: fn(u8, bool) -> (u8, bool)) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    cpu.read_modify_write(metadata.addressing_mode, |cpu, value| {
        let (result, carry) = op(value, cpu.flag_c);
        cpu.flag_c = carry;
        cpu.set_nz(result);
        result
    });
    cpu.finish(metadata.base_cycles, metadata.size_bytes);
}

/// Executes the ASL (Arithmetic Shift Left) instruction.
pub(crate) fn execute_asl<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    shift(cpu, opcode, |value, _| (value << 1, value & 0x80 != 0));
}

/// Executes the LSR (Logical Shift Right) instruction. N is always cleared.
pub(crate) fn execute_lsr<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    shift(cpu, opcode, |value, _| (value >> 1, value & 0x01 != 0));
}

/// Executes the ROL (Rotate Left) instruction. The old carry enters bit 0.
pub(crate) fn execute_rol<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    shift(cpu, opcode, |value, carry| {
        ((value << 1) | carry as u8, value & 0x80 != 0)
    });
}

/// Executes the ROR (Rotate Right) instruction. The old carry enters bit 7.
pub(crate) fn execute_ror<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    shift(cpu, opcode, |value, carry| {
        ((value >> 1) | ((carry as u8) << 7), value & 0x01 != 0)
    });
}
