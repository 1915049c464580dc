//! # 6502 CPU Emulator Core
//!
//! An instruction-accurate NMOS 6502 CPU with cycle counting, a mapped memory
//! bus and bounds-checked RAM/ROM banks.
//!
//! ## Quick Start
//!
//! ```rust
//! use mos6502_core::{CPU, FlatMemory, Logger, MemoryBus, StepOutcome};
//!
//! let mut memory = FlatMemory::new();
//! memory.write(0xFFFC, 0x00);
//! memory.write(0xFFFD, 0x80);
//! memory.load(0x8000, &[0xA9, 0x42]); // LDA #$42
//!
//! let mut cpu = CPU::new(memory, Logger::detached("cpu"));
//! assert_eq!(cpu.step(), StepOutcome::Executed { cycles: 2 });
//! assert_eq!(cpu.a(), 0x42);
//! ```
//!
//! ## Architecture
//!
//! - **Table-driven decoding**: every opcode's mnemonic, operation, addressing
//!   mode, cycle cost and size live in [`OPCODE_TABLE`].
//! - **Trait-based memory**: the CPU is generic over [`MemoryBus`]. [`Bus`]
//!   dispatches to [`BusComponent`]s by address range.
//! - **Execution hook**: an optional pre-instruction callback lets a debugger
//!   stop the CPU before an instruction retires without the CPU knowing
//!   about breakpoints.
//! - **Injected logging**: components receive a [`Logger`] at construction;
//!   repeated faults are folded into one entry with a counter.
//!
//! ## Modules
//!
//! - `cpu` - CPU state and execution logic
//! - `memory` - MemoryBus trait and FlatMemory
//! - `devices` - Bus, BusComponent, RAM and ROM banks
//! - `opcodes` - Opcode metadata table
//! - `addressing` - Addressing mode enumerations
//! - `logging` - De-duplicating log sink

pub mod addressing;
pub mod cpu;
pub mod devices;
pub mod logging;
pub mod memory;
pub mod opcodes;

// Internal instruction implementations (not part of public API)
mod instructions;

// Re-export public API
pub use addressing::AddressingMode;
pub use cpu::{CpuDebug, CpuRegisters, ExecutionHook, OpcodeCount, StepOutcome, CPU};
pub use devices::{
    BankData, Bus, BusAccess, BusComponent, BusDebug, BusError, FlashError, MappingInfo, RamBank,
    RomBank,
};
pub use logging::{Fault, LogEntry, LogLevel, LogSink, Logger, SharedLogSink};
pub use memory::{FlatMemory, MemoryBus};
pub use opcodes::{OpcodeMetadata, Operation, OPCODE_TABLE};
