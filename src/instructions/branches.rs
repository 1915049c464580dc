//! # Branch Instructions
//!
//! This module implements conditional branch operations:
//! BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS.
//!
//! All branch instructions use relative addressing with a signed 8-bit offset.
//! Cycle timing varies based on whether the branch is taken and whether a page boundary is crossed.

use crate::opcodes::Operation;
use crate::{MemoryBus, CPU, OPCODE_TABLE};

/// Executes any conditional branch.
///
/// Cycle timing:
/// - 2 cycles if branch not taken
/// - 3 cycles if branch taken to same page
/// - 4 cycles if branch taken to different page
///
/// No flags are affected.
pub(crate) fn execute_branch<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];

    let taken = match metadata.operation {
        Operation::Bcc => !cpu.flag_c,
        Operation::Bcs => cpu.flag_c,
        Operation::Beq => cpu.flag_z,
        Operation::Bne => !cpu.flag_z,
        Operation::Bmi => cpu.flag_n,
        Operation::Bpl => !cpu.flag_n,
        Operation::Bvc => !cpu.flag_v,
        Operation::Bvs => cpu.flag_v,
        _ => false,
    };

    // Read the signed 8-bit offset from PC+1
    let offset = cpu.memory.read(cpu.pc.wrapping_add(1)) as i8;

    let mut cycles = metadata.base_cycles as u64;

    // Offsets are relative to the instruction that follows the branch
    let pc_after_instruction = cpu.pc.wrapping_add(metadata.size_bytes as u16);

    if taken {
        let target_pc = pc_after_instruction.wrapping_add_signed(offset as i16);

        cycles += 1;
        if (pc_after_instruction & 0xFF00) != (target_pc & 0xFF00) {
            cycles += 1;
        }

        cpu.pc = target_pc;
    } else {
        cpu.pc = pc_after_instruction;
    }

    cpu.cycles += cycles;
}
