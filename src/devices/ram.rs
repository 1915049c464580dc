//! RAM bank.
//!
//! Readable and writable storage mapped on the [`Bus`](super::Bus) as a
//! [`BusComponent`].

use super::bank::BankData;
use super::BusComponent;
use crate::logging::Logger;

/// Read/write memory bank.
///
/// # Examples
///
/// ```rust
/// use mos6502_core::{BusComponent, Logger, RamBank};
///
/// let mut ram = RamBank::new("ram", 0x0000, 4, Logger::detached("ram"));
///
/// ram.write(3, 0xAB);
/// assert_eq!(ram.read(3), 0xAB);
///
/// // Offset 4 is outside the bank: the write is dropped
/// ram.write(4, 0xAB);
/// assert_eq!(ram.read(4), 0x00);
/// ```
#[derive(Debug)]
pub struct RamBank {
    bank: BankData,
}

impl RamBank {
    /// Creates a zero-filled RAM bank of `size` bytes mapped at `origin`.
    pub fn new(id: &str, origin: u16, size: usize, logger: Logger) -> Self {
        Self {
            bank: BankData::new(id, origin, size, logger),
        }
    }

    /// Stores a value that may be wider than a byte. Bits above bit 7 are
    /// dropped and the truncation is logged.
    pub fn write_value(&mut self, offset: u16, value: u32) {
        let byte = self.bank.mask_value(value);
        self.bank.store(offset, byte);
    }

    /// Clears every byte to zero.
    pub fn clear(&mut self) {
        let size = self.bank.len();
        self.bank.load_image(&vec![0; size]);
    }
}

impl BusComponent for RamBank {
    fn read(&mut self, offset: u16) -> u8 {
        self.bank.read(offset)
    }

    fn write(&mut self, offset: u16, value: u8) {
        self.bank.store(offset, value);
    }

    fn peek(&self, offset: u16) -> u8 {
        self.bank.peek(offset)
    }

    /// RAM contents survive a reset, as on the real board.
    fn reset(&mut self) {}

    fn bank(&self) -> Option<&BankData> {
        Some(&self.bank)
    }

    fn bank_mut(&mut self) -> Option<&mut BankData> {
        Some(&mut self.bank)
    }
}
