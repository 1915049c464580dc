//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! This module implements arithmetic and logical operations:
//! - ADC, SBC: add/subtract with carry, binary or BCD depending on D
//! - AND, ORA, EOR: bitwise logic into the accumulator
//! - CMP, CPX, CPY: compare a register with memory
//! - BIT: test accumulator bits against memory
//!
//! Decimal mode follows NMOS behavior: for ADC, N and V come from the
//! intermediate result before the high-nibble correction and Z from the
//! binary sum; for SBC every flag comes from the binary difference and only
//! the accumulator is BCD-corrected.

use crate::{MemoryBus, CPU, OPCODE_TABLE};

/// Reads the operand, charges base cycles plus the page-cross penalty and
/// advances PC. Shared by every read-only ALU instruction.
fn fetch_operand<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) -> u8 {
    let metadata = &OPCODE_TABLE[opcode as usize];
    let (value, page_crossed) = cpu.get_operand_value(metadata.addressing_mode);

    let mut cycles = metadata.base_cycles;
    if page_crossed {
        cycles += 1;
    }
    cpu.finish(cycles, metadata.size_bytes);

    value
}

/// Executes the ADC (Add with Carry) instruction.
///
/// Adds the operand plus the carry flag to the accumulator.
/// Updates C, Z, V and N.
pub(crate) fn execute_adc<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let value = fetch_operand(cpu, opcode);
    let a = cpu.a;
    let carry_in = cpu.flag_c as u16;

    if cpu.flag_d {
        let mut low = (a & 0x0F) as u16 + (value & 0x0F) as u16 + carry_in;
        if low >= 0x0A {
            low = ((low + 0x06) & 0x0F) + 0x10;
        }
        let mut sum = (a as u16 & 0xF0) + (value as u16 & 0xF0) + low;

        // N and V from the intermediate sum
        cpu.flag_n = sum & 0x80 != 0;
        cpu.flag_v = (!(a as u16 ^ value as u16) & (a as u16 ^ sum)) & 0x80 != 0;

        if sum >= 0xA0 {
            sum += 0x60;
        }
        cpu.flag_c = sum >= 0x100;

        // Z from the binary sum
        let binary = a as u16 + value as u16 + carry_in;
        cpu.flag_z = binary & 0xFF == 0;

        cpu.a = sum as u8;
    } else {
        let result16 = a as u16 + value as u16 + carry_in;
        let result = result16 as u8;

        cpu.flag_c = result16 > 0xFF;
        // Both operands share a sign the result does not have
        cpu.flag_v = ((a ^ result) & (value ^ result) & 0x80) != 0;
        cpu.a = result;
        cpu.set_nz(result);
    }
}

/// Executes the SBC (Subtract with Carry) instruction.
///
/// Computes A - M - (1 - C). C is set when no borrow occurred.
pub(crate) fn execute_sbc<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let value = fetch_operand(cpu, opcode);
    let a = cpu.a;
    let carry_in = cpu.flag_c as u16;

    let diff = a as u16 + (value ^ 0xFF) as u16 + carry_in;
    let result = diff as u8;

    cpu.flag_c = diff > 0xFF;
    cpu.flag_v = ((a ^ value) & (a ^ result) & 0x80) != 0;
    cpu.set_nz(result);

    if cpu.flag_d {
        let borrow = 1 - carry_in as i16;
        let mut low = (a & 0x0F) as i16 - (value & 0x0F) as i16 - borrow;
        let low_borrow = low < 0;
        if low_borrow {
            low -= 6;
        }
        let mut high = (a >> 4) as i16 - (value >> 4) as i16 - low_borrow as i16;
        if high < 0 {
            high -= 6;
        }
        cpu.a = ((high as u8 & 0x0F) << 4) | (low as u8 & 0x0F);
    } else {
        cpu.a = result;
    }
}

/// Executes the AND (Logical AND) instruction. Updates Z and N.
pub(crate) fn execute_and<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let value = fetch_operand(cpu, opcode);
    cpu.a &= value;
    cpu.set_nz(cpu.a);
}

/// Executes the ORA (Logical Inclusive OR) instruction. Updates Z and N.
pub(crate) fn execute_ora<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let value = fetch_operand(cpu, opcode);
    cpu.a |= value;
    cpu.set_nz(cpu.a);
}

/// Executes the EOR (Exclusive OR) instruction. Updates Z and N.
pub(crate) fn execute_eor<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let value = fetch_operand(cpu, opcode);
    cpu.a ^= value;
    cpu.set_nz(cpu.a);
}

fn compare<M: MemoryBus>(cpu: &mut CPU<M>, register: u8, value: u8) {
    cpu.flag_c = register >= value;
    cpu.set_nz(register.wrapping_sub(value));
}

/// Executes the CMP (Compare Accumulator) instruction.
///
/// Sets C if A >= M, Z if A == M, N from bit 7 of A - M.
pub(crate) fn execute_cmp<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let value = fetch_operand(cpu, opcode);
    let register = cpu.a;
    compare(cpu, register, value);
}

/// Executes the CPX (Compare X Register) instruction.
pub(crate) fn execute_cpx<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let value = fetch_operand(cpu, opcode);
    let register = cpu.x;
    compare(cpu, register, value);
}

/// Executes the CPY (Compare Y Register) instruction.
pub(crate) fn execute_cpy<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let value = fetch_operand(cpu, opcode);
    let register = cpu.y;
    compare(cpu, register, value);
}

/// Executes the BIT (Bit Test) instruction.
///
/// N and V are copied from bits 7 and 6 of the operand; Z is set when
/// A & M is zero. The accumulator is not modified.
pub(crate) fn execute_bit<M: MemoryBus>(cpu: &mut CPU<M>, opcode: u8) {
    let value = fetch_operand(cpu, opcode);
    cpu.flag_n = value & 0x80 != 0;
    cpu.flag_v = value & 0x40 != 0;
    cpu.flag_z = cpu.a & value == 0;
}
