//! WebAssembly bindings for the Apple 1 emulator.
//!
//! A thin adapter: commands arrive as JSON strings in the protocol format,
//! responses and events leave as JSON strings. The page owns the worker,
//! the message transport and the UI.
//!
//! ```javascript
//! const emu = new Apple1Emulator("{}");
//! emu.load_firmware(wozMonitor);           // [0x00, 0xFF, ...256 bytes]
//! emu.handle_message('{"type":"START"}');
//! function frame() {
//!   for (const event of JSON.parse(emu.run_slice())) post(event);
//!   setTimeout(frame, 0);
//! }
//! ```

use wasm_bindgen::prelude::*;

use crate::system::{Apple1, Command, EmulatorConfig, Response};

/// WASM wrapper for the Apple 1 machine.
#[wasm_bindgen]
pub struct Apple1Emulator {
    machine: Apple1,
}

#[wasm_bindgen]
impl Apple1Emulator {
    /// Create an emulator from a JSON configuration object.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<Apple1Emulator, JsValue> {
        let config = EmulatorConfig::from_json(config_json)
            .map_err(|err| JsValue::from_str(&format!("invalid config: {}", err)))?;
        let machine = Apple1::new(config).map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(Self { machine })
    }

    /// Flash the monitor ROM and reset. Returns the number of bytes stored.
    #[wasm_bindgen]
    pub fn load_firmware(&mut self, payload: &[u8]) -> Result<usize, JsValue> {
        self.machine
            .load_firmware(payload)
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Flash a JSON array payload (`[lo, hi, b0, ...]`) into a bank.
    #[wasm_bindgen]
    pub fn flash(&mut self, bank_id: &str, payload_json: &str) -> Result<usize, JsValue> {
        let payload: Vec<serde_json::Value> = serde_json::from_str(payload_json)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        self.machine
            .flash_values(bank_id, &payload)
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Handle one command message and return the response message.
    ///
    /// Malformed messages produce an `error` response rather than a throw.
    #[wasm_bindgen]
    pub fn handle_message(&mut self, message: &str) -> String {
        let response = match serde_json::from_str::<Command>(message) {
            Ok(command) => self.machine.handle(command),
            Err(err) => Response::Error(format!("unrecognized command: {}", err)),
        };
        to_json(&response)
    }

    /// Run one slice. Returns a JSON array of events.
    #[wasm_bindgen]
    pub fn run_slice(&mut self) -> String {
        to_json(&self.machine.run_slice())
    }

    /// Current screen text, rows separated by newlines.
    #[wasm_bindgen]
    pub fn screen_text(&self) -> String {
        self.machine.video().text()
    }

    /// Screen change counter.
    #[wasm_bindgen]
    pub fn video_version(&self) -> f64 {
        self.machine.video().version() as f64
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        format!(
            r#"{{"type":"error","payload":{}}}"#,
            serde_json::Value::String(err.to_string())
        )
    })
}
