//! # Memory Bus Abstraction
//!
//! The `MemoryBus` trait decouples the CPU from the memory behind it. The
//! CPU only ever sees one bus: a flat 64 KiB array in tests, or the mapped
//! [`Bus`](crate::Bus) that routes addresses to RAM, ROM and I/O components.
//!
//! ## Design Principles
//!
//! The trait follows 6502 hardware behavior:
//! - No bus errors: reads and writes always succeed
//! - Unmapped reads return a defined default
//! - Writes to ROM or unmapped regions are dropped
//!
//! Reads take `&mut self` because reading an I/O register can have side
//! effects (the PIA clears its interrupt flags when a data register is read).
//! Debug viewers use [`MemoryBus::peek`], which never disturbs device state.

/// Memory bus trait for the CPU to read and write bytes.
///
/// # Examples
///
/// ```
/// use mos6502_core::{FlatMemory, MemoryBus};
///
/// let mut mem = FlatMemory::new();
/// mem.write(0x1234, 0x42);
/// assert_eq!(mem.read(0x1234), 0x42);
/// assert_eq!(mem.peek(0x1234), 0x42);
/// ```
pub trait MemoryBus {
    /// Reads a byte from the specified 16-bit address.
    ///
    /// This method must never panic. Unmapped addresses return a
    /// default value.
    fn read(&mut self, addr: u16) -> u8;

    /// Writes a byte to the specified 16-bit address.
    ///
    /// This method must never panic. Writes to read-only or unmapped
    /// addresses are ignored.
    fn write(&mut self, addr: u16, value: u8);

    /// Reads a byte without triggering device side effects.
    fn peek(&self, addr: u16) -> u8;
}

/// Simple 64KB flat memory implementation.
///
/// All 65536 addresses are writable RAM initialized to 0x00. Useful for
/// CPU tests that do not need a mapped bus.
///
/// # Examples
///
/// ```
/// use mos6502_core::{CPU, FlatMemory, Logger, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.write(0xFFFC, 0x00);
/// memory.write(0xFFFD, 0x80);
///
/// let cpu = CPU::new(memory, Logger::detached("cpu"));
/// assert_eq!(cpu.pc(), 0x8000);
/// ```
pub struct FlatMemory {
    data: Box<[u8; 65536]>,
}

impl FlatMemory {
    /// Creates a new FlatMemory instance with all bytes initialized to zero.
    pub fn new() -> Self {
        Self {
            data: Box::new([0; 65536]),
        }
    }

    /// Copies `bytes` into memory starting at `start`, wrapping at $FFFF.
    pub fn load(&mut self, start: u16, bytes: &[u8]) {
        let mut addr = start;
        for &byte in bytes {
            self.data[addr as usize] = byte;
            addr = addr.wrapping_add(1);
        }
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for FlatMemory {
    fn read(&mut self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }

    fn peek(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }
}
