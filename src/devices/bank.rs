//! Backing store shared by RAM and ROM banks.
//!
//! A bank is a fixed-size byte array addressed by offset. Every access is
//! bounds-checked: out-of-range reads return 0 and out-of-range writes are
//! dropped, both reported as [`Fault::OutOfBounds`].
//!
//! Banks can be bulk-loaded ("flashed") from a payload of the form
//! `[lo, hi, b0, b1, ...]`, which places `b0` at absolute address
//! `(hi << 8) | lo`. The bank's `origin` (the address it is mapped at)
//! converts that absolute address into an offset.

use crate::logging::{Fault, Logger};
use serde_json::Value;
use std::fmt;

/// Error returned when a flash payload cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlashError {
    /// The payload has no room for the two address bytes plus one data byte.
    TooShort {
        /// Number of entries received
        len: usize,
    },
    /// No bank with this id is mapped.
    UnknownBank {
        /// Requested bank id
        id: String,
    },
}

impl fmt::Display for FlashError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FlashError::TooShort { len } => write!(
                f,
                "Flash payload of {} entries is too short (need address low, address high and at least one byte)",
                len
            ),
            FlashError::UnknownBank { id } => write!(f, "No bank with id '{}' is mapped", id),
        }
    }
}

impl std::error::Error for FlashError {}

/// Fixed-size, bounds-checked byte storage with an identity.
///
/// The `id` is what the state serializer matches on when a snapshot is
/// reloaded, so two banks on the same bus must not share an id.
#[derive(Debug)]
pub struct BankData {
    id: String,
    origin: u16,
    data: Vec<u8>,
    logger: Logger,
}

impl BankData {
    /// Creates a zero-filled bank of `size` bytes.
    pub fn new(id: impl Into<String>, origin: u16, size: usize, logger: Logger) -> Self {
        Self::with_data(id, origin, vec![0; size], logger)
    }

    /// Creates a bank holding `data`.
    pub fn with_data(id: impl Into<String>, origin: u16, data: Vec<u8>, logger: Logger) -> Self {
        Self {
            id: id.into(),
            origin,
            data,
            logger,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Absolute address of offset 0.
    pub fn origin(&self) -> u16 {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Bounds-checked read. Out-of-range offsets return 0 and are logged.
    pub fn read(&self, offset: u16) -> u8 {
        match self.data.get(offset as usize) {
            Some(&value) => value,
            None => {
                self.logger.fault(
                    Fault::OutOfBounds,
                    format_args!(
                        "read at offset 0x{:04X} outside bank of {} bytes",
                        offset,
                        self.data.len()
                    ),
                );
                0
            }
        }
    }

    /// Read without logging.
    pub fn peek(&self, offset: u16) -> u8 {
        self.data.get(offset as usize).copied().unwrap_or(0)
    }

    /// Bounds-checked store. Returns `false` (and logs) when `offset` is
    /// outside the bank.
    pub fn store(&mut self, offset: u16, value: u8) -> bool {
        match self.data.get_mut(offset as usize) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => {
                self.logger.fault(
                    Fault::OutOfBounds,
                    format_args!(
                        "write at offset 0x{:04X} outside bank of {} bytes",
                        offset,
                        self.data.len()
                    ),
                );
                false
            }
        }
    }

    /// Narrows `value` to a byte, logging when bits above bit 7 are lost.
    pub fn mask_value(&self, value: u32) -> u8 {
        if value > 0xFF {
            self.logger.fault(
                Fault::MaskedValue,
                format_args!("0x{:X} stored as 0x{:02X}", value, value & 0xFF),
            );
        }
        (value & 0xFF) as u8
    }

    /// Replaces the contents with `image`, as when restoring a snapshot.
    ///
    /// The bank keeps its size: a shorter image leaves the tail zeroed and
    /// a longer one is truncated, with a warning in both cases.
    pub fn load_image(&mut self, image: &[u8]) {
        if image.len() != self.data.len() {
            self.logger.warn(format!(
                "image for bank '{}' has {} bytes, bank holds {}",
                self.id,
                image.len(),
                self.data.len()
            ));
        }
        self.data.fill(0);
        let count = image.len().min(self.data.len());
        self.data[..count].copy_from_slice(&image[..count]);
    }

    /// Flashes a byte payload `[lo, hi, b0, b1, ...]`.
    ///
    /// Returns the number of data bytes stored. Bytes that land outside the
    /// bank are dropped and reported once. Flashing ignores ROM write
    /// protection.
    pub fn flash(&mut self, payload: &[u8]) -> Result<usize, FlashError> {
        if payload.len() < 3 {
            return Err(self.reject(payload.len()));
        }
        let address = u16::from_le_bytes([payload[0], payload[1]]);
        Ok(self.place(address, &payload[2..]))
    }

    /// Flashes a loosely-typed payload, as received from a JSON host.
    ///
    /// Non-numeric entries are coerced to 0 with a warning. Numbers wider
    /// than a byte are masked.
    pub fn flash_values(&mut self, payload: &[Value]) -> Result<usize, FlashError> {
        if payload.len() < 3 {
            return Err(self.reject(payload.len()));
        }

        let mut coerced = 0usize;
        let bytes: Vec<u8> = payload
            .iter()
            .map(|entry| match numeric(entry) {
                Some(n) => self.mask_value(n as u32),
                None => {
                    coerced += 1;
                    0
                }
            })
            .collect();

        if coerced > 0 {
            self.logger.warn(format!(
                "{}: {} non-numeric entries in flash payload for '{}' coerced to 0",
                Fault::InvalidFlashData,
                coerced,
                self.id
            ));
        }

        let address = u16::from_le_bytes([bytes[0], bytes[1]]);
        Ok(self.place(address, &bytes[2..]))
    }

    fn reject(&self, len: usize) -> FlashError {
        let err = FlashError::TooShort { len };
        self.logger
            .fault(Fault::InvalidFlashData, format_args!("bank '{}': {}", self.id, err));
        err
    }

    fn place(&mut self, address: u16, bytes: &[u8]) -> usize {
        let base = address as i64 - self.origin as i64;
        let mut stored = 0;
        for (i, &byte) in bytes.iter().enumerate() {
            let offset = base + i as i64;
            if offset >= 0 && (offset as usize) < self.data.len() {
                self.data[offset as usize] = byte;
                stored += 1;
            }
        }

        let dropped = bytes.len() - stored;
        if dropped > 0 {
            self.logger.fault(
                Fault::OutOfBounds,
                format_args!(
                    "{} flashed bytes from 0x{:04X} fall outside bank '{}'",
                    dropped, address, self.id
                ),
            );
        }
        stored
    }
}

/// Integer value of a JSON entry. Floats are truncated; negative numbers
/// keep their two's-complement low byte once masked.
fn numeric(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    number
        .as_i64()
        .or_else(|| number.as_u64().map(|n| n as i64))
        .or_else(|| number.as_f64().map(|n| n as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use serde_json::json;

    fn bank(origin: u16, size: usize) -> BankData {
        BankData::new("test", origin, size, Logger::detached("test"))
    }

    #[test]
    fn test_out_of_bounds_read_is_zero_and_logged() {
        let b = bank(0, 4);
        assert_eq!(b.read(4), 0);

        let entries = b.logger().sink().borrow_mut().drain();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Warn);
        assert!(entries[0].message.starts_with("OutOfBounds"));
    }

    #[test]
    fn test_flash_places_bytes_relative_to_origin() {
        let mut b = bank(0xFF00, 0x100);
        let stored = b.flash(&[0x00, 0xFF, 0xD8, 0x58]).unwrap();

        assert_eq!(stored, 2);
        assert_eq!(b.peek(0x00), 0xD8);
        assert_eq!(b.peek(0x01), 0x58);
    }

    #[test]
    fn test_flash_too_short_is_rejected() {
        let mut b = bank(0, 16);
        assert_eq!(b.flash(&[0x00, 0x00]), Err(FlashError::TooShort { len: 2 }));

        let entries = b.logger().sink().borrow_mut().drain();
        assert_eq!(entries[0].level, LogLevel::Error);
    }

    #[test]
    fn test_flash_drops_bytes_past_the_end() {
        let mut b = bank(0, 4);
        let stored = b.flash(&[0x02, 0x00, 1, 2, 3, 4]).unwrap();
        assert_eq!(stored, 2);
        assert_eq!(b.as_slice(), &[0, 0, 1, 2]);
    }

    #[test]
    fn test_flash_values_coerces_and_masks() {
        let mut b = bank(0x0300, 8);
        let payload = vec![json!(0x00), json!(0x03), json!("x"), json!(0x1AB), json!(7)];
        let stored = b.flash_values(&payload).unwrap();

        assert_eq!(stored, 3);
        assert_eq!(&b.as_slice()[..3], &[0x00, 0xAB, 0x07]);

        let levels: Vec<LogLevel> = b
            .logger()
            .sink()
            .borrow_mut()
            .drain()
            .into_iter()
            .map(|e| e.level)
            .collect();
        assert_eq!(levels, vec![LogLevel::Info, LogLevel::Warn]);
    }

    #[test]
    fn test_load_image_keeps_size() {
        let mut b = bank(0, 4);
        b.load_image(&[9, 8]);
        assert_eq!(b.as_slice(), &[9, 8, 0, 0]);

        b.load_image(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(b.as_slice(), &[1, 2, 3, 4]);
    }
}
