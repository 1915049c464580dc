//! Memory-mapped component support.
//!
//! The [`Bus`] holds an ordered list of address ranges, each serviced by a
//! [`BusComponent`]. It implements [`MemoryBus`], so a `CPU<Bus>` sees one
//! flat 16-bit address space.
//!
//! # Dispatch
//!
//! - Mappings are searched in registration order and the first range that
//!   contains the address wins. Overlapping ranges are allowed; the earlier
//!   registration shadows the later one.
//! - The component receives an offset (`addr - start`), never the absolute
//!   address.
//! - Unmapped reads return 0 and unmapped writes are ignored.
//!
//! # Example
//!
//! ```rust
//! use mos6502_core::{Bus, Logger, MemoryBus, RamBank, RomBank};
//!
//! let log = Logger::detached("bus");
//! let mut bus = Bus::new(log.clone());
//!
//! bus.map(0x0000, 0x0FFF, "ram", Box::new(RamBank::new("ram", 0x0000, 0x1000, log.named("ram"))))
//!     .unwrap();
//! bus.map(0xFF00, 0xFFFF, "rom", Box::new(RomBank::new("rom", 0xFF00, 0x100, log.named("rom"))))
//!     .unwrap();
//!
//! bus.write(0x0200, 0x42);
//! assert_eq!(bus.read(0x0200), 0x42);
//!
//! // Nothing mapped at $8000
//! assert_eq!(bus.read(0x8000), 0x00);
//! ```

use crate::logging::Logger;
use crate::MemoryBus;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod bank;
pub mod ram;
pub mod rom;

pub use bank::{BankData, FlashError};
pub use ram::RamBank;
pub use rom::RomBank;

/// Hardware component attached to the bus.
///
/// All methods take offsets relative to the start of the component's mapped
/// range.
///
/// # Examples
///
/// ```rust
/// use mos6502_core::BusComponent;
///
/// struct Latch {
///     value: u8,
/// }
///
/// impl BusComponent for Latch {
///     fn read(&mut self, _offset: u16) -> u8 {
///         self.value
///     }
///
///     fn write(&mut self, _offset: u16, value: u8) {
///         self.value = value;
///     }
///
///     fn peek(&self, _offset: u16) -> u8 {
///         self.value
///     }
///
///     fn reset(&mut self) {
///         self.value = 0;
///     }
/// }
/// ```
pub trait BusComponent {
    /// Reads a byte. May have side effects (clearing status flags).
    fn read(&mut self, offset: u16) -> u8;

    /// Writes a byte.
    fn write(&mut self, offset: u16, value: u8);

    /// Reads a byte without side effects.
    fn peek(&self, offset: u16) -> u8;

    /// Returns the component to its power-on register state.
    fn reset(&mut self) {}

    /// Backing storage, for components that are plain memory banks.
    fn bank(&self) -> Option<&BankData> {
        None
    }

    /// Mutable backing storage, for components that are plain memory banks.
    fn bank_mut(&mut self) -> Option<&mut BankData> {
        None
    }
}

/// Error returned when a mapping cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// The range ends before it starts.
    InvalidRange {
        /// First address of the rejected range
        start: u16,
        /// Last address of the rejected range
        end: u16,
    },
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BusError::InvalidRange { start, end } => write!(
                f,
                "Invalid bus range 0x{:04X}-0x{:04X}: end precedes start",
                start, end
            ),
        }
    }
}

impl std::error::Error for BusError {}

/// One address/value pair seen on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusAccess {
    pub addr: u16,
    pub value: u8,
}

/// Name and inclusive range of a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingInfo {
    pub name: String,
    pub start: u16,
    pub end: u16,
}

/// Diagnostic view of the bus. Purely observational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusDebug {
    pub last_read: Option<BusAccess>,
    pub last_write: Option<BusAccess>,
    pub mappings: Vec<MappingInfo>,
}

struct Mapping {
    start: u16,
    end: u16,
    name: String,
    component: Box<dyn BusComponent>,
}

impl Mapping {
    fn contains(&self, addr: u16) -> bool {
        addr >= self.start && addr <= self.end
    }
}

/// Largest span `peek_range` will return.
pub const MAX_RANGE_LEN: usize = 0x10000;

/// Address-range dispatcher.
pub struct Bus {
    mappings: Vec<Mapping>,
    last_read: Option<BusAccess>,
    last_write: Option<BusAccess>,
    logger: Logger,
}

impl Bus {
    /// Creates an empty bus.
    pub fn new(logger: Logger) -> Self {
        Self {
            mappings: Vec::new(),
            last_read: None,
            last_write: None,
            logger,
        }
    }

    /// Registers `component` for the inclusive range `start..=end`.
    ///
    /// Ranges may overlap; earlier mappings take precedence.
    pub fn map(
        &mut self,
        start: u16,
        end: u16,
        name: &str,
        component: Box<dyn BusComponent>,
    ) -> Result<(), BusError> {
        if end < start {
            return Err(BusError::InvalidRange { start, end });
        }
        if let Some(other) = self
            .mappings
            .iter()
            .find(|m| start <= m.end && end >= m.start)
        {
            self.logger.info(format!(
                "'{}' at 0x{:04X}-0x{:04X} is shadowed by '{}' where they overlap",
                name, start, end, other.name
            ));
        }
        self.mappings.push(Mapping {
            start,
            end,
            name: name.to_string(),
            component,
        });
        Ok(())
    }

    fn find(&self, addr: u16) -> Option<&Mapping> {
        self.mappings.iter().find(|m| m.contains(addr))
    }

    fn find_mut(&mut self, addr: u16) -> Option<&mut Mapping> {
        self.mappings.iter_mut().find(|m| m.contains(addr))
    }

    /// Copies `length` bytes starting at `start` without side effects.
    ///
    /// Never fails: bytes at negative addresses or past $FFFF read as 0 and
    /// `length` is capped at [`MAX_RANGE_LEN`].
    pub fn peek_range(&self, start: i64, length: usize) -> Vec<u8> {
        (0..length.min(MAX_RANGE_LEN))
            .map(|i| {
                let addr = start.saturating_add(i as i64);
                if (0..=0xFFFF).contains(&addr) {
                    self.peek(addr as u16)
                } else {
                    0
                }
            })
            .collect()
    }

    /// Resets every mapped component.
    pub fn reset(&mut self) {
        for mapping in &mut self.mappings {
            mapping.component.reset();
        }
        self.last_read = None;
        self.last_write = None;
    }

    /// Memory banks on the bus, in mapping order.
    pub fn banks(&self) -> impl Iterator<Item = &BankData> {
        self.mappings.iter().filter_map(|m| m.component.bank())
    }

    /// Bank with the given id.
    pub fn bank_mut(&mut self, id: &str) -> Option<&mut BankData> {
        self.mappings
            .iter_mut()
            .filter_map(|m| m.component.bank_mut())
            .find(|bank| bank.id() == id)
    }

    /// Names and ranges of every mapping, in dispatch order.
    pub fn mappings(&self) -> Vec<MappingInfo> {
        self.mappings
            .iter()
            .map(|m| MappingInfo {
                name: m.name.clone(),
                start: m.start,
                end: m.end,
            })
            .collect()
    }

    pub fn to_debug(&self) -> BusDebug {
        BusDebug {
            last_read: self.last_read,
            last_write: self.last_write,
            mappings: self.mappings(),
        }
    }
}

impl MemoryBus for Bus {
    fn read(&mut self, addr: u16) -> u8 {
        let value = match self.find_mut(addr) {
            Some(mapping) => {
                let offset = addr - mapping.start;
                mapping.component.read(offset)
            }
            None => 0,
        };
        self.last_read = Some(BusAccess { addr, value });
        value
    }

    fn write(&mut self, addr: u16, value: u8) {
        if let Some(mapping) = self.find_mut(addr) {
            let offset = addr - mapping.start;
            mapping.component.write(offset, value);
        }
        self.last_write = Some(BusAccess { addr, value });
    }

    fn peek(&self, addr: u16) -> u8 {
        match self.find(addr) {
            Some(mapping) => mapping.component.peek(addr - mapping.start),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestDevice {
        data: Vec<u8>,
    }

    impl TestDevice {
        fn new(size: usize) -> Self {
            Self {
                data: vec![0; size],
            }
        }
    }

    impl BusComponent for TestDevice {
        fn read(&mut self, offset: u16) -> u8 {
            self.data[offset as usize]
        }

        fn write(&mut self, offset: u16, value: u8) {
            self.data[offset as usize] = value;
        }

        fn peek(&self, offset: u16) -> u8 {
            self.data[offset as usize]
        }
    }

    fn bus() -> Bus {
        Bus::new(Logger::detached("bus"))
    }

    #[test]
    fn test_empty_bus_reads_zero() {
        let mut bus = bus();
        assert_eq!(bus.read(0x0000), 0x00);
        assert_eq!(bus.read(0xFFFF), 0x00);
    }

    #[test]
    fn test_single_device_offsets() {
        let mut bus = bus();
        bus.map(0x1000, 0x10FF, "dev", Box::new(TestDevice::new(256)))
            .unwrap();

        bus.write(0x1000, 0x42);
        bus.write(0x10FF, 0x99);
        assert_eq!(bus.read(0x1000), 0x42);
        assert_eq!(bus.read(0x10FF), 0x99);
        assert_eq!(bus.read(0x0FFF), 0x00);
        assert_eq!(bus.read(0x1100), 0x00);
    }

    #[test]
    fn test_first_registered_mapping_wins() {
        let mut bus = bus();
        bus.map(0x0000, 0x00FF, "first", Box::new(TestDevice::new(256)))
            .unwrap();
        bus.map(0x0080, 0x017F, "second", Box::new(TestDevice::new(256)))
            .unwrap();

        bus.write(0x0090, 0xAA);
        bus.write(0x0100, 0xBB);

        assert_eq!(bus.read(0x0090), 0xAA);
        assert_eq!(bus.read(0x0100), 0xBB);
        // "second" never saw the write at 0x0090 (its offset 0x10)
        assert_eq!(bus.read(0x0090), 0xAA);
    }

    #[test]
    fn test_invalid_range_rejected() {
        let mut bus = bus();
        let result = bus.map(0x2000, 0x1FFF, "bad", Box::new(TestDevice::new(1)));
        assert_eq!(
            result,
            Err(BusError::InvalidRange {
                start: 0x2000,
                end: 0x1FFF
            })
        );
    }

    #[test]
    fn test_to_debug_tracks_last_access_only() {
        let mut bus = bus();
        bus.map(0x0000, 0x00FF, "ram", Box::new(TestDevice::new(256)))
            .unwrap();

        bus.write(0x0010, 0x55);
        bus.read(0x0010);
        let _ = bus.peek(0x0020);

        let debug = bus.to_debug();
        assert_eq!(debug.last_write, Some(BusAccess { addr: 0x0010, value: 0x55 }));
        assert_eq!(debug.last_read, Some(BusAccess { addr: 0x0010, value: 0x55 }));
        assert_eq!(debug.mappings.len(), 1);
        assert_eq!(debug.mappings[0].name, "ram");
    }

    #[test]
    fn test_peek_range_clamps() {
        let mut bus = bus();
        bus.map(0xFF00, 0xFFFF, "top", Box::new(TestDevice::new(256)))
            .unwrap();
        bus.write(0xFFFE, 1);
        bus.write(0xFFFF, 2);

        assert_eq!(bus.peek_range(-100, 5), vec![0; 5]);
        assert_eq!(bus.peek_range(0xFFFE, 5), vec![1, 2, 0, 0, 0]);
        assert_eq!(bus.peek_range(0, 0x20000).len(), MAX_RANGE_LEN);
    }

    #[test]
    fn test_reset_clears_access_history() {
        let mut bus = bus();
        bus.map(0x0000, 0x00FF, "dev", Box::new(TestDevice::new(256)))
            .unwrap();
        bus.write(0x0001, 0x01);
        bus.reset();

        assert_eq!(bus.to_debug().last_write, None);
        // Reset does not touch the device's data
        assert_eq!(bus.peek(0x0001), 0x01);
    }

    #[test]
    fn test_bank_lookup_by_id() {
        let log = Logger::detached("bus");
        let mut bus = Bus::new(log.clone());
        bus.map(0x0000, 0x0FFF, "ram", Box::new(RamBank::new("ram", 0, 0x1000, log.clone())))
            .unwrap();
        bus.map(0xFF00, 0xFFFF, "rom", Box::new(RomBank::new("rom", 0xFF00, 0x100, log)))
            .unwrap();

        let ids: Vec<&str> = bus.banks().map(BankData::id).collect();
        assert_eq!(ids, vec!["ram", "rom"]);
        assert!(bus.bank_mut("rom").is_some());
        assert!(bus.bank_mut("missing").is_none());
    }
}
