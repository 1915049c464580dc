//! # Control Flow Instructions
//!
//! This module implements control flow operations:
//! - BRK: Force Interrupt
//! - JMP: Jump to address
//! - JSR, RTS: subroutine call and return
//! - RTI: return from interrupt
//! - NOP: no operation
//!
//! BRK is a software interrupt that:
//! 1. Pushes PC+2 to the stack (high byte first, then low byte)
//! 2. Pushes processor status to stack with B flag set
//! 3. Sets the I (interrupt disable) flag
//! 4. Loads PC from IRQ vector at $FFFE/F

use crate::cpu::IRQ_VECTOR;
use crate::{MemoryBus, CPU, OPCODE_TABLE};

/// Executes the BRK (Force Interrupt) instruction.
///
/// Cycle timing: 7 cycles (fixed)
///
/// Flags affected:
/// - B: Set to 1 (in the pushed status byte, not in the actual flag)
/// - I: Set to 1
pub(crate) fn execute_brk<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];

    // BRK pushes PC+2 even though it is a one-byte instruction; the byte
    // after it is a padding/signature byte skipped on return
    let return_address = cpu.pc.wrapping_add(2);
    cpu.push_word(return_address);

    // B and bit 5 set in the pushed copy only
    let status = cpu.status() | 0b0011_0000;
    cpu.push(status);

    cpu.flag_i = true;
    cpu.pc = cpu.read_word(IRQ_VECTOR);

    cpu.cycles += metadata.base_cycles as u64;
}

/// Executes the JMP (Jump) instruction.
///
/// Absolute and indirect forms. The indirect form keeps the NMOS page-wrap
/// bug: `JMP ($10FF)` takes its high byte from $1000.
pub(crate) fn execute_jmp<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (target, _) = cpu.get_effective_address(metadata.addressing_mode);

    cpu.pc = target;
    cpu.cycles += metadata.base_cycles as u64;
}

/// Executes the JSR (Jump to Subroutine) instruction.
///
/// Pushes the address of the last byte of the JSR (return address - 1),
/// high byte first, then jumps. 6 cycles.
pub(crate) fn execute_jsr<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let target = cpu.read_word(cpu.pc.wrapping_add(1));

    let return_address = cpu.pc.wrapping_add(2);
    cpu.push_word(return_address);

    cpu.pc = target;
    cpu.cycles += metadata.base_cycles as u64;
}

/// Executes the RTS (Return from Subroutine) instruction.
///
/// Pulls the return address and adds one. 6 cycles.
pub(crate) fn execute_rts<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];

    cpu.pc = cpu.pull_word().wrapping_add(1);
    cpu.cycles += metadata.base_cycles as u64;
}

/// Executes the RTI (Return from Interrupt) instruction.
///
/// Pulls the status register (B and bit 5 ignored), then PC. Unlike RTS
/// the pulled address is used as-is. 6 cycles.
pub(crate) fn execute_rti<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];

    let status = cpu.pull();
    cpu.set_status(status);
    cpu.pc = cpu.pull_word();

    cpu.cycles += metadata.base_cycles as u64;
}

/// Executes the NOP (No Operation) instruction.
pub(crate) fn execute_nop<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let metadata = &OPCODE_TABLE[opcode as usize];
    cpu.finish(metadata.base_cycles, metadata.size_bytes);
}
