//! Save state serialization.
//!
//! A snapshot captures everything needed to resume the machine: the CPU
//! register file, the PIA registers with their control-line history, the
//! contents of every memory bank and, optionally, the terminal screen.
//!
//! Banks are stored by id and raw bytes. Loading refills the banks already
//! mapped on the bus by matching ids, so the bus layout always comes from
//! the live machine, never from the document.
//!
//! ## File Format
//!
//! A save file is a JSON document:
//!
//! ```text
//! { "version": 1, "timestamp": <unix seconds>, "state": { "ram": [...], "cpu": {...}, "pia": {...}, "video": {...} } }
//! ```
//!
//! The version is checked on the raw document before the body is decoded,
//! so a file from an incompatible format is rejected with
//! [`StateError::VersionMismatch`] rather than a confusing decode error.

use crate::devices::PiaState;
use crate::system::video::VideoState;
use mos6502_core::{BankData, CpuRegisters};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Current save state format version.
///
/// Increment this when making breaking changes to the format.
pub const SAVESTATE_VERSION: u32 = 1;

/// Error returned when a save file cannot be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The document was written by an incompatible format version.
    VersionMismatch {
        /// Version this build reads
        expected: u32,
        /// Version found in the document
        found: u64,
    },
    /// The document has no numeric `version` field.
    MissingVersion,
    /// The document is not valid JSON or does not match the format.
    Malformed(String),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StateError::VersionMismatch { expected, found } => write!(
                f,
                "Save state version mismatch: expected {}, found {}",
                expected, found
            ),
            StateError::MissingVersion => write!(f, "Save state has no version field"),
            StateError::Malformed(reason) => write!(f, "Malformed save state: {}", reason),
        }
    }
}

impl std::error::Error for StateError {}

impl From<serde_json::Error> for StateError {
    fn from(err: serde_json::Error) -> Self {
        StateError::Malformed(err.to_string())
    }
}

/// Raw contents of one memory bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankImage {
    pub id: String,
    pub data: Vec<u8>,
}

impl From<&BankData> for BankImage {
    fn from(bank: &BankData) -> Self {
        BankImage {
            id: bank.id().to_string(),
            data: bank.as_slice().to_vec(),
        }
    }
}

/// Complete machine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmulatorSnapshot {
    pub ram: Vec<BankImage>,
    pub cpu: CpuRegisters,
    pub pia: PiaState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoState>,
}

/// Versioned, timestamped snapshot as written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    /// Unix seconds when the state was captured.
    pub timestamp: u64,
    pub state: EmulatorSnapshot,
}

impl SaveFile {
    /// Wraps `state` with the current version and time.
    pub fn new(state: EmulatorSnapshot) -> Self {
        Self::with_timestamp(state, crate::system::time::unix_timestamp())
    }

    pub fn with_timestamp(state: EmulatorSnapshot, timestamp: u64) -> Self {
        SaveFile {
            version: SAVESTATE_VERSION,
            timestamp,
            state,
        }
    }

    pub fn to_json(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_value(&self) -> Result<Value, StateError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parses and validates a save file.
    pub fn from_json(json: &str) -> Result<Self, StateError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Validates the version of an already-parsed document, then decodes
    /// it. No coercion is attempted across versions.
    pub fn from_value(value: Value) -> Result<Self, StateError> {
        let found = value
            .get("version")
            .and_then(Value::as_u64)
            .ok_or(StateError::MissingVersion)?;
        if found != SAVESTATE_VERSION as u64 {
            return Err(StateError::VersionMismatch {
                expected: SAVESTATE_VERSION,
                found,
            });
        }
        Ok(serde_json::from_value(value)?)
    }
}
