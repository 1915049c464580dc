//! ROM bank.
//!
//! Read-only storage. Bus writes are dropped and logged as
//! [`Fault::ReadOnlyViolation`]; the only way to change the contents is to
//! flash the bank through [`BankData::flash`].

use super::bank::BankData;
use super::BusComponent;
use crate::logging::{Fault, Logger};

/// Read-only memory bank.
///
/// # Examples
///
/// ```rust
/// use mos6502_core::{BusComponent, Logger, RomBank};
///
/// let mut rom = RomBank::with_data("rom", 0xFF00, vec![0xEA; 256], Logger::detached("rom"));
///
/// assert_eq!(rom.read(0), 0xEA);
///
/// // Writes are ignored
/// rom.write(0, 0xFF);
/// assert_eq!(rom.read(0), 0xEA);
/// ```
#[derive(Debug)]
pub struct RomBank {
    bank: BankData,
}

impl RomBank {
    /// Creates a zero-filled ROM bank, to be flashed afterwards.
    pub fn new(id: &str, origin: u16, size: usize, logger: Logger) -> Self {
        Self {
            bank: BankData::new(id, origin, size, logger),
        }
    }

    /// Creates a ROM bank holding `data`.
    pub fn with_data(id: &str, origin: u16, data: Vec<u8>, logger: Logger) -> Self {
        Self {
            bank: BankData::with_data(id, origin, data, logger),
        }
    }

    /// ROM rejects every write, whatever the value.
    pub fn write_value(&mut self, offset: u16, value: u32) {
        self.reject(offset, value);
    }

    fn reject(&self, offset: u16, value: u32) {
        self.bank.logger().fault(
            Fault::ReadOnlyViolation,
            format_args!(
                "write of 0x{:02X} to offset 0x{:04X} of '{}' ignored",
                value,
                offset,
                self.bank.id()
            ),
        );
    }
}

impl BusComponent for RomBank {
    fn read(&mut self, offset: u16) -> u8 {
        self.bank.read(offset)
    }

    fn write(&mut self, offset: u16, value: u8) {
        self.reject(offset, value as u32);
    }

    fn peek(&self, offset: u16) -> u8 {
        self.bank.peek(offset)
    }

    fn bank(&self) -> Option<&BankData> {
        Some(&self.bank)
    }

    fn bank_mut(&mut self) -> Option<&mut BankData> {
        Some(&mut self.bank)
    }
}
