//! Apple 1 system integration, pacing, debugging and persistence.
//!
//! This module provides the top-level [`Apple1`] that wires the CPU, bus,
//! PIA, keyboard and terminal together and drives them through a
//! command/response API.

pub mod clock;
pub mod config;
pub mod debugger;
pub mod keyboard;
mod machine;
pub mod protocol;
pub mod savestate;
mod time;
pub mod video;

pub use clock::{Clock, ClockDebug, CycleAccurate, FreeRun, Pacer, PacingMode, SliceBudget, SliceOutcome};
pub use config::EmulatorConfig;
pub use debugger::{DebugEvent, Debugger, DebuggerDebug, RunMode};
pub use keyboard::map_host_key;
pub use machine::{
    Apple1, BASIC_RAM_END, BASIC_RAM_ID, BASIC_RAM_START, PIA_END, PIA_START, RAM_ID, ROM_END,
    ROM_ID, ROM_START,
};
pub use protocol::{Command, DebugSnapshot, Event, Response};
pub use savestate::{BankImage, EmulatorSnapshot, SaveFile, StateError, SAVESTATE_VERSION};
pub use video::{Video, VideoState};
