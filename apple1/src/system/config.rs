//! Emulator configuration.
//!
//! Every field has a default, so a host only spells out what it changes:
//!
//! ```
//! use apple1::EmulatorConfig;
//!
//! let config = EmulatorConfig::from_json(r#"{ "ram_size": 8192, "cycle_accurate": true }"#).unwrap();
//! assert_eq!(config.ram_size, 0x2000);
//! assert_eq!(config.cpu_hz, 1_000_000);
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Apple 1 CPU clock in Hz.
pub const DEFAULT_CPU_HZ: u64 = 1_000_000;

/// Highest address main RAM may reach. The PIA lives at $D010.
pub const MAX_RAM_SIZE: u32 = 0xD000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    /// CPU clock used by cycle-accurate pacing.
    pub cpu_hz: u64,
    /// Start in cycle-accurate mode instead of free-run.
    pub cycle_accurate: bool,
    /// Instructions per free-run slice.
    pub instructions_per_batch: u32,
    /// Wall-clock length of one cycle-accurate slice.
    pub max_slice_ms: u64,
    /// How far cycle-accurate pacing may fall behind before it gives up
    /// catching up and re-synchronizes.
    pub max_catch_up_ms: u64,
    /// Bytes of main RAM mapped from $0000.
    pub ram_size: u32,
    /// Map 4 KiB of RAM at $E000 for Integer BASIC.
    pub basic_ram: bool,
    /// Terminal erases on `_` and BS.
    pub crt_bs_support: bool,
    /// Debug snapshot push interval while running.
    pub debug_push_ms: u64,
    /// Debug snapshot push interval while paused.
    pub debug_push_paused_ms: u64,
    /// Entries kept by the log sink.
    pub log_capacity: usize,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            cpu_hz: DEFAULT_CPU_HZ,
            cycle_accurate: false,
            instructions_per_batch: 20_000,
            max_slice_ms: 16,
            max_catch_up_ms: 100,
            ram_size: 0x1000,
            basic_ram: true,
            crt_bs_support: true,
            debug_push_ms: 250,
            debug_push_paused_ms: 100,
            log_capacity: mos6502_core::logging::DEFAULT_LOG_CAPACITY,
        }
    }
}

impl EmulatorConfig {
    /// Parses a JSON object. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn max_slice(&self) -> Duration {
        Duration::from_millis(self.max_slice_ms.max(1))
    }

    pub fn max_catch_up(&self) -> Duration {
        Duration::from_millis(self.max_catch_up_ms)
    }

    pub fn debug_push_interval(&self, paused: bool) -> Duration {
        Duration::from_millis(if paused {
            self.debug_push_paused_ms
        } else {
            self.debug_push_ms
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(EmulatorConfig::from_json("{}").unwrap(), EmulatorConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EmulatorConfig::from_json(r#"{"basic_ram": false, "debug_push_ms": 500}"#).unwrap();
        assert!(!config.basic_ram);
        assert_eq!(config.debug_push_interval(false), Duration::from_millis(500));
        assert_eq!(config.debug_push_interval(true), Duration::from_millis(100));
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        assert!(EmulatorConfig::from_json(r#"{"cpu_hz": "fast"}"#).is_err());
    }
}
