//! Apple 1 hardware devices implementing the mos6502-core BusComponent trait.
//!
//! - [`Pia6820`]: MOS 6820 Peripheral Interface Adapter (keyboard, display)
//!
//! RAM and ROM come straight from the core crate's banks.

mod pia6820;

pub use pia6820::{ControlLines, Pia6820, PiaDebug, PiaState, SharedPia, PIA_REGISTER_COUNT};
