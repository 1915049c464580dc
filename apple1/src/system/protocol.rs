//! Command/response contract between a host and the machine.
//!
//! The machine is driven synchronously: a host turns whatever transport it
//! has (worker messages, channels, RPC) into [`Command`] values, passes
//! them to `Apple1::handle` between slices, and forwards the [`Response`]
//! and the [`Event`]s returned by `Apple1::run_slice`.
//!
//! All three types serialize as `{"type": ..., "payload": ...}` objects.
//!
//! ```
//! use apple1::Command;
//!
//! let cmd: Command = serde_json::from_str(r#"{"type":"SET_BREAKPOINT","payload":65280}"#).unwrap();
//! assert_eq!(cmd, Command::SetBreakpoint(0xFF00));
//! ```

use super::clock::{ClockDebug, SliceOutcome};
use super::debugger::{DebugEvent, DebuggerDebug};
use super::savestate::SaveFile;
use super::video::VideoState;
use crate::devices::PiaDebug;
use mos6502_core::{BusDebug, CpuDebug, LogEntry, OpcodeCount};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Host key name, e.g. `"a"` or `"Enter"`.
    KeyDown(String),
    Step,
    PauseEmulation,
    ResumeEmulation,
    SetBreakpoint(u16),
    ClearBreakpoint(u16),
    ClearAllBreakpoints,
    GetBreakpoints,
    RunToAddress(u16),
    /// `start` may be negative and the range may run past $FFFF; those
    /// bytes read as 0.
    GetMemoryRange { start: i64, length: usize },
    SaveState,
    /// A save file document.
    LoadState(Value),
    SetCrtBsSupportFlag(bool),
    SetCpuProfiling(bool),
    SetCycleAccurateTiming(bool),
    SetDebuggerActive(bool),
    DebugInfo,
    Reset,
    GetLogs,
    Start,
}

/// Reply to one [`Command`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Response {
    Ok,
    /// `"paused"` or `"running"`.
    Status(String),
    Breakpoints(Vec<u16>),
    /// The target, or `None` when PC was already there.
    RunToAddress(Option<u16>),
    Memory(Vec<u8>),
    SaveState(Box<SaveFile>),
    Debug(Box<DebugSnapshot>),
    Logs(Vec<LogEntry>),
    Error(String),
}

/// Something that happened while running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Event {
    BreakpointHit(u16),
    CursorReached(u16),
    VideoUpdated(VideoState),
    DebugSnapshot(Box<DebugSnapshot>),
    Log(Vec<LogEntry>),
}

impl From<DebugEvent> for Event {
    fn from(event: DebugEvent) -> Self {
        match event {
            DebugEvent::BreakpointHit(pc) => Event::BreakpointHit(pc),
            DebugEvent::CursorReached(pc) => Event::CursorReached(pc),
        }
    }
}

/// Point-in-time view of every component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugSnapshot {
    pub cpu: CpuDebug,
    pub pia: PiaDebug,
    pub bus: BusDebug,
    pub clock: ClockDebug,
    pub debugger: DebuggerDebug,
    pub last_slice: SliceOutcome,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profile: Vec<OpcodeCount>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_names() {
        let cases = [
            (json!({"type": "KEY_DOWN", "payload": "a"}), Command::KeyDown("a".into())),
            (json!({"type": "STEP"}), Command::Step),
            (json!({"type": "PAUSE_EMULATION"}), Command::PauseEmulation),
            (json!({"type": "CLEAR_ALL_BREAKPOINTS"}), Command::ClearAllBreakpoints),
            (json!({"type": "SET_CRT_BS_SUPPORT_FLAG", "payload": false}), Command::SetCrtBsSupportFlag(false)),
            (json!({"type": "DEBUG_INFO"}), Command::DebugInfo),
            (
                json!({"type": "GET_MEMORY_RANGE", "payload": {"start": -100, "length": 5}}),
                Command::GetMemoryRange { start: -100, length: 5 },
            ),
        ];
        for (doc, expected) in cases {
            assert_eq!(serde_json::from_value::<Command>(doc).unwrap(), expected);
        }
    }

    #[test]
    fn test_out_of_range_address_is_rejected() {
        let doc = json!({"type": "SET_BREAKPOINT", "payload": 70000});
        assert!(serde_json::from_value::<Command>(doc).is_err());
    }

    #[test]
    fn test_response_shape() {
        let value = serde_json::to_value(Response::Status("paused".into())).unwrap();
        assert_eq!(value, json!({"type": "status", "payload": "paused"}));
        let value = serde_json::to_value(Response::RunToAddress(None)).unwrap();
        assert_eq!(value, json!({"type": "run_to_address", "payload": null}));
    }
}
