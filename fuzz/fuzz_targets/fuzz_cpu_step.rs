//! Fuzz target for CPU step execution.
//!
//! This target creates arbitrary CPU states and memory contents,
//! then executes a few steps to find edge cases and crashes.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mos6502_core::{FlatMemory, Logger, MemoryBus, StepOutcome, CPU, OPCODE_TABLE};

/// Arbitrary CPU initial state for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzCpuState {
    a: u8,
    x: u8,
    y: u8,
    sp: u8,
    /// Packed NV-BDIZC
    status: u8,
    pending_irq: bool,
    pending_nmi: bool,
}

/// Memory region for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzMemory {
    /// Bytes at the PC location
    instruction_bytes: [u8; 8],
    zero_page: [u8; 256],
    stack_page: [u8; 256],
    /// Region at $4000 for absolute addressing
    main_memory: [u8; 256],
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    cpu_state: FuzzCpuState,
    memory: FuzzMemory,
    steps: u8,
}

fuzz_target!(|input: FuzzInput| {
    let mut memory = FlatMemory::new();

    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    memory.write(0xFFFA, 0x00);
    memory.write(0xFFFB, 0xA0);
    memory.write(0xFFFE, 0x00);
    memory.write(0xFFFF, 0x90);

    memory.load(0x8000, &input.memory.instruction_bytes);
    memory.load(0x0000, &input.memory.zero_page);
    memory.load(0x0100, &input.memory.stack_page);
    memory.load(0x4000, &input.memory.main_memory);

    let mut cpu = CPU::new(memory, Logger::detached("cpu"));

    cpu.set_a(input.cpu_state.a);
    cpu.set_x(input.cpu_state.x);
    cpu.set_y(input.cpu_state.y);
    cpu.set_sp(input.cpu_state.sp);
    cpu.set_status(input.cpu_state.status);
    if input.cpu_state.pending_irq {
        cpu.trigger_irq();
    }
    if input.cpu_state.pending_nmi {
        cpu.trigger_nmi();
    }

    for _ in 0..(input.steps % 16) {
        let opcode = cpu.memory().peek(cpu.pc());
        let before = cpu.cycles();

        // Never blocked without a hook, and never zero cycles
        let outcome = cpu.step();
        assert!(matches!(outcome, StepOutcome::Executed { .. }));
        assert!(cpu.cycles() > before);

        // Bounded by the slowest instruction plus both penalties
        assert!(outcome.cycles() <= OPCODE_TABLE[opcode as usize].base_cycles.max(7) + 2);

        // Status bit 5 always reads as set, B never does
        assert_eq!(cpu.status() & 0b0011_0000, 0b0010_0000);
    }
});
