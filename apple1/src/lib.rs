//! # Apple 1 Emulator
//!
//! An Apple 1 built on the mos6502-core CPU: a 6820 PIA wired to the
//! keyboard and the terminal, RAM and ROM banks on a mapped bus, a pacing
//! clock, a breakpoint debugger and versioned save states.
//!
//! ## Quick Start
//!
//! ```rust
//! use apple1::{Apple1, Command, EmulatorConfig};
//!
//! let mut apple = Apple1::new(EmulatorConfig::default()).unwrap();
//!
//! // Firmware is flashed as [lo, hi, bytes...]; here just a reset vector
//! // pointing at an infinite loop in RAM.
//! apple.flash("ram", &[0x00, 0x03, 0x4C, 0x00, 0x03]).unwrap();
//! apple.load_firmware(&[0xFC, 0xFF, 0x00, 0x03]).unwrap();
//!
//! apple.handle(Command::Start);
//! apple.run_slice();
//! assert_eq!(apple.cpu().pc(), 0x0300);
//! ```
//!
//! ## Module Organization
//!
//! - `devices`: the 6820 PIA
//! - `system`: machine wiring, keyboard, video, clock, debugger, save states
//! - `wasm`: browser bindings (feature `wasm`)

pub mod devices;
pub mod system;

// WASM bindings (optional, enabled with "wasm" feature)
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use devices::{Pia6820, PiaState};
pub use system::{
    Apple1, Clock, Command, DebugEvent, Debugger, EmulatorConfig, EmulatorSnapshot, Event,
    PacingMode, Response, RunMode, SaveFile, StateError, Video, VideoState, SAVESTATE_VERSION,
};
