//! MOS 6820 Peripheral Interface Adapter.
//!
//! The Apple 1 has one PIA at $D010-$D013:
//! - Port A ($D010, KBD) with control register CRA ($D011, KBDCR): keyboard
//!   input. A key press latches the character on the port A pins and pulses
//!   CA1, which sets the IRQA1 flag the monitor polls.
//! - Port B ($D012, DSP) with control register CRB ($D013, DSPCR): display
//!   output. Writing the data register strobes a character to the terminal.
//!   PB7 is an input the terminal holds high while busy.
//!
//! ## Register Selection
//!
//! | Offset | CRx bit 2 = 0 | CRx bit 2 = 1 |
//! |--------|---------------|---------------|
//! | 0      | DDRA          | ORA / port A  |
//! | 1      | CRA           | CRA           |
//! | 2      | DDRB          | ORB / port B  |
//! | 3      | CRB           | CRB           |
//!
//! ## Control Register Layout
//!
//! - Bit 7: IRQ1 flag (C1 active transition), read-only
//! - Bit 6: IRQ2 flag (C2 active transition when C2 is an input), read-only
//! - Bit 5: C2 direction (0 = input, 1 = output)
//! - Bit 4: C2 active edge when input (0 = falling, 1 = rising)
//! - Bit 3: C2 interrupt enable when input
//! - Bit 2: data register select (0 = DDR, 1 = data)
//! - Bit 1: C1 active edge (0 = falling, 1 = rising)
//! - Bit 0: C1 interrupt enable
//!
//! ## Edge Detection
//!
//! Control line inputs only record levels. [`Pia6820::tick`] compares each
//! line against its level at the previous tick, raises the flags for active
//! transitions and then copies the current levels into the `prev_*` history.
//! A pulse therefore sets its flag one tick after the line moves.

use mos6502_core::{BusComponent, Logger};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Number of addressable registers.
pub const PIA_REGISTER_COUNT: u16 = 4;

const IRQ1_FLAG: u8 = 0x80;
const IRQ2_FLAG: u8 = 0x40;
const FLAG_BITS: u8 = IRQ1_FLAG | IRQ2_FLAG;
const C2_OUTPUT: u8 = 0x20;
const C2_RISING: u8 = 0x10;
const C2_IRQ_ENABLE: u8 = 0x08;
const DATA_SELECT: u8 = 0x04;
const C1_RISING: u8 = 0x02;
const C1_IRQ_ENABLE: u8 = 0x01;

/// Levels of the four control lines, now and at the previous tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlLines {
    pub ca1: bool,
    pub ca2: bool,
    pub cb1: bool,
    pub cb2: bool,
    pub prev_ca1: bool,
    pub prev_ca2: bool,
    pub prev_cb1: bool,
    pub prev_cb2: bool,
}

/// Serializable register file and line history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiaState {
    pub ora: u8,
    pub orb: u8,
    pub ddra: u8,
    pub ddrb: u8,
    pub cra: u8,
    pub crb: u8,
    /// External level on the port A pins.
    #[serde(default)]
    pub input_a: u8,
    /// External level on the port B pins.
    #[serde(default)]
    pub input_b: u8,
    pub control_lines: ControlLines,
}

/// PIA registers plus interrupt outputs, for debug views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiaDebug {
    pub state: PiaState,
    pub irq_a: bool,
    pub irq_b: bool,
}

/// MOS 6820 PIA.
#[derive(Debug)]
pub struct Pia6820 {
    /// Output register A.
    ora: u8,
    /// Output register B.
    orb: u8,
    /// Data direction register A (1 = output).
    ddra: u8,
    /// Data direction register B (1 = output).
    ddrb: u8,
    /// Control register A. Bits 7/6 hold the interrupt flags.
    cra: u8,
    /// Control register B. Bits 7/6 hold the interrupt flags.
    crb: u8,

    /// External input on port A (keyboard).
    input_a: u8,
    /// External input on port B (display ready on PB7).
    input_b: u8,

    lines: ControlLines,

    /// Set by a write to ORB, cleared by [`Pia6820::take_port_b_written`].
    port_b_written: bool,

    logger: Logger,
}

impl Pia6820 {
    /// Creates a PIA in its power-on state.
    pub fn new(logger: Logger) -> Self {
        Self {
            ora: 0,
            orb: 0,
            ddra: 0,
            ddrb: 0,
            cra: 0,
            crb: 0,
            input_a: 0,
            input_b: 0,
            lines: ControlLines::default(),
            port_b_written: false,
            logger,
        }
    }

    /// Clears every register, latch and line. Registers read as zero after
    /// reset, so both ports start out addressing their DDRs.
    pub fn reset(&mut self) {
        self.ora = 0;
        self.orb = 0;
        self.ddra = 0;
        self.ddrb = 0;
        self.cra = 0;
        self.crb = 0;
        self.input_a = 0;
        self.input_b = 0;
        self.lines = ControlLines::default();
        self.port_b_written = false;
        self.logger.info("reset");
    }

    // =========================================================================
    // Register Access
    // =========================================================================

    /// Reads a register. Reading a data register clears that side's
    /// interrupt flags.
    pub fn read(&mut self, offset: u16) -> u8 {
        match offset % PIA_REGISTER_COUNT {
            0 if self.cra & DATA_SELECT != 0 => {
                self.cra &= !FLAG_BITS;
                self.port_a()
            }
            2 if self.crb & DATA_SELECT != 0 => {
                self.crb &= !FLAG_BITS;
                self.port_b()
            }
            _ => self.peek(offset),
        }
    }

    /// Reads a register without clearing any flags.
    pub fn peek(&self, offset: u16) -> u8 {
        match offset % PIA_REGISTER_COUNT {
            0 if self.cra & DATA_SELECT != 0 => self.port_a(),
            0 => self.ddra,
            1 => self.cra,
            2 if self.crb & DATA_SELECT != 0 => self.port_b(),
            2 => self.ddrb,
            _ => self.crb,
        }
    }

    /// Writes a register. The flag bits of a control register are
    /// read-only and survive the write.
    pub fn write(&mut self, offset: u16, value: u8) {
        match offset % PIA_REGISTER_COUNT {
            0 if self.cra & DATA_SELECT != 0 => self.ora = value,
            0 => self.ddra = value,
            1 => self.cra = (self.cra & FLAG_BITS) | (value & !FLAG_BITS),
            2 if self.crb & DATA_SELECT != 0 => {
                self.orb = value;
                self.port_b_written = true;
            }
            2 => self.ddrb = value,
            _ => self.crb = (self.crb & FLAG_BITS) | (value & !FLAG_BITS),
        }
    }

    /// Pin levels on port A: outputs from ORA, inputs from the outside.
    fn port_a(&self) -> u8 {
        (self.input_a & !self.ddra) | (self.ora & self.ddra)
    }

    /// Pin levels on port B: outputs from ORB, inputs from the outside.
    fn port_b(&self) -> u8 {
        (self.input_b & !self.ddrb) | (self.orb & self.ddrb)
    }

    // =========================================================================
    // External Pins
    // =========================================================================

    pub fn set_input_a(&mut self, value: u8) {
        self.input_a = value;
    }

    pub fn set_input_b(&mut self, value: u8) {
        self.input_b = value;
    }

    pub fn input_a(&self) -> u8 {
        self.input_a
    }

    pub fn input_b(&self) -> u8 {
        self.input_b
    }

    pub fn set_ca1(&mut self, level: bool) {
        self.lines.ca1 = level;
    }

    pub fn set_ca2(&mut self, level: bool) {
        self.lines.ca2 = level;
    }

    pub fn set_cb1(&mut self, level: bool) {
        self.lines.cb1 = level;
    }

    pub fn set_cb2(&mut self, level: bool) {
        self.lines.cb2 = level;
    }

    /// Runs edge detection for all four control lines, then records the
    /// current levels as the previous ones.
    pub fn tick(&mut self) {
        let lines = self.lines;

        if active_edge(lines.prev_ca1, lines.ca1, self.cra & C1_RISING != 0) {
            self.cra |= IRQ1_FLAG;
        }
        if self.cra & C2_OUTPUT == 0
            && active_edge(lines.prev_ca2, lines.ca2, self.cra & C2_RISING != 0)
        {
            self.cra |= IRQ2_FLAG;
        }
        if active_edge(lines.prev_cb1, lines.cb1, self.crb & C1_RISING != 0) {
            self.crb |= IRQ1_FLAG;
        }
        if self.crb & C2_OUTPUT == 0
            && active_edge(lines.prev_cb2, lines.cb2, self.crb & C2_RISING != 0)
        {
            self.crb |= IRQ2_FLAG;
        }

        self.lines.prev_ca1 = lines.ca1;
        self.lines.prev_ca2 = lines.ca2;
        self.lines.prev_cb1 = lines.cb1;
        self.lines.prev_cb2 = lines.cb2;
    }

    /// IRQA output: a raised flag whose interrupt is enabled.
    pub fn irq_a(&self) -> bool {
        irq_output(self.cra)
    }

    /// IRQB output.
    pub fn irq_b(&self) -> bool {
        irq_output(self.crb)
    }

    /// Returns whether ORB was written since the last call, and clears the
    /// latch. This is the display strobe.
    pub fn take_port_b_written(&mut self) -> bool {
        std::mem::take(&mut self.port_b_written)
    }

    pub fn ora(&self) -> u8 {
        self.ora
    }

    pub fn orb(&self) -> u8 {
        self.orb
    }

    pub fn cra(&self) -> u8 {
        self.cra
    }

    pub fn crb(&self) -> u8 {
        self.crb
    }

    pub fn control_lines(&self) -> ControlLines {
        self.lines
    }

    // =========================================================================
    // Save State Accessors
    // =========================================================================

    pub fn snapshot(&self) -> PiaState {
        PiaState {
            ora: self.ora,
            orb: self.orb,
            ddra: self.ddra,
            ddrb: self.ddrb,
            cra: self.cra,
            crb: self.crb,
            input_a: self.input_a,
            input_b: self.input_b,
            control_lines: self.lines,
        }
    }

    /// Restores registers and line history verbatim. A pending display
    /// strobe is dropped.
    pub fn restore(&mut self, state: &PiaState) {
        self.ora = state.ora;
        self.orb = state.orb;
        self.ddra = state.ddra;
        self.ddrb = state.ddrb;
        self.cra = state.cra;
        self.crb = state.crb;
        self.input_a = state.input_a;
        self.input_b = state.input_b;
        self.lines = state.control_lines;
        self.port_b_written = false;
    }

    pub fn to_debug(&self) -> PiaDebug {
        PiaDebug {
            state: self.snapshot(),
            irq_a: self.irq_a(),
            irq_b: self.irq_b(),
        }
    }
}

fn active_edge(prev: bool, current: bool, rising: bool) -> bool {
    if rising {
        !prev && current
    } else {
        prev && !current
    }
}

fn irq_output(cr: u8) -> bool {
    let irq1 = cr & IRQ1_FLAG != 0 && cr & C1_IRQ_ENABLE != 0;
    let irq2 = cr & IRQ2_FLAG != 0 && cr & C2_OUTPUT == 0 && cr & C2_IRQ_ENABLE != 0;
    irq1 || irq2
}

/// Shared PIA wrapper that implements BusComponent.
///
/// The bus owns the wrapper while the machine keeps its own handle for the
/// keyboard, the display strobe and save states.
pub struct SharedPia {
    pia: Rc<RefCell<Pia6820>>,
}

impl SharedPia {
    pub fn new(pia: Rc<RefCell<Pia6820>>) -> Self {
        SharedPia { pia }
    }
}

impl BusComponent for SharedPia {
    fn read(&mut self, offset: u16) -> u8 {
        self.pia.borrow_mut().read(offset)
    }

    fn write(&mut self, offset: u16, value: u8) {
        self.pia.borrow_mut().write(offset, value);
    }

    fn peek(&self, offset: u16) -> u8 {
        self.pia.borrow().peek(offset)
    }

    fn reset(&mut self) {
        self.pia.borrow_mut().reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pia() -> Pia6820 {
        Pia6820::new(Logger::detached("pia"))
    }

    /// Monitor setup: DDRB = $7F, then CRA = CRB = $A7.
    fn configured() -> Pia6820 {
        let mut pia = pia();
        pia.write(2, 0x7F);
        pia.write(1, 0xA7);
        pia.write(3, 0xA7);
        pia
    }

    #[test]
    fn test_ddr_selected_until_cr_bit2_set() {
        let mut pia = pia();
        pia.write(0, 0xFF);
        assert_eq!(pia.read(0), 0xFF);
        assert_eq!(pia.ora(), 0x00);

        pia.write(1, DATA_SELECT);
        pia.write(0, 0x55);
        assert_eq!(pia.ora(), 0x55);
        assert_eq!(pia.read(0), 0x55);
    }

    #[test]
    fn test_port_read_mixes_input_and_output_pins() {
        let mut pia = configured();
        pia.set_input_b(0x80);
        pia.write(2, 0x41);

        // PB7 comes from the input, PB0-6 from ORB
        assert_eq!(pia.read(2), 0xC1);
    }

    #[test]
    fn test_rising_edge_sets_flag_one_tick_later() {
        let mut pia = configured();

        pia.set_ca1(true);
        assert_eq!(pia.cra() & IRQ1_FLAG, 0);
        pia.tick();
        assert_ne!(pia.cra() & IRQ1_FLAG, 0);

        // Falling edge is not active with CRA bit 1 set
        pia.write(0x01, 0xA7);
        pia.read(0);
        pia.set_ca1(false);
        pia.tick();
        assert_eq!(pia.cra() & IRQ1_FLAG, 0);
    }

    #[test]
    fn test_falling_edge_when_configured() {
        let mut pia = pia();
        pia.write(1, DATA_SELECT);
        pia.set_ca1(true);
        pia.tick();
        assert_eq!(pia.cra() & IRQ1_FLAG, 0);

        pia.set_ca1(false);
        pia.tick();
        assert_ne!(pia.cra() & IRQ1_FLAG, 0);
    }

    #[test]
    fn test_prev_updated_every_tick() {
        let mut pia = configured();
        pia.set_cb1(true);
        pia.tick();
        let lines = pia.control_lines();
        assert!(lines.prev_cb1);

        // Level held high: no new edge
        pia.read(2);
        pia.tick();
        assert_eq!(pia.crb() & IRQ1_FLAG, 0);
    }

    #[test]
    fn test_data_read_clears_flags_peek_does_not() {
        let mut pia = configured();
        pia.set_ca1(true);
        pia.tick();

        assert_ne!(pia.peek(1) & IRQ1_FLAG, 0);
        pia.peek(0);
        assert_ne!(pia.peek(1) & IRQ1_FLAG, 0);
        pia.read(0);
        assert_eq!(pia.peek(1) & IRQ1_FLAG, 0);
    }

    #[test]
    fn test_cr_write_keeps_flags() {
        let mut pia = configured();
        pia.set_ca1(true);
        pia.tick();
        pia.write(1, 0x27);
        assert_eq!(pia.cra(), 0xA7);
    }

    #[test]
    fn test_ca2_output_mode_ignores_edges() {
        let mut pia = pia();
        pia.write(1, C2_OUTPUT | C2_RISING | DATA_SELECT);
        pia.set_ca2(true);
        pia.tick();
        assert_eq!(pia.cra() & IRQ2_FLAG, 0);

        pia.write(1, C2_RISING | C2_IRQ_ENABLE | DATA_SELECT);
        pia.set_ca2(false);
        pia.tick();
        pia.set_ca2(true);
        pia.tick();
        assert_ne!(pia.cra() & IRQ2_FLAG, 0);
        assert!(pia.irq_a());
    }

    #[test]
    fn test_irq_output_requires_enable() {
        let mut pia = pia();
        pia.write(1, C1_RISING | DATA_SELECT);
        pia.set_ca1(true);
        pia.tick();
        assert!(!pia.irq_a());

        pia.write(1, C1_RISING | DATA_SELECT | C1_IRQ_ENABLE);
        assert!(pia.irq_a());
        assert!(!pia.irq_b());
    }

    #[test]
    fn test_port_b_strobe_is_one_shot() {
        let mut pia = configured();
        assert!(!pia.take_port_b_written());
        pia.write(2, 0xC1);
        assert!(pia.take_port_b_written());
        assert!(!pia.take_port_b_written());
        assert_eq!(pia.orb(), 0xC1);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut pia = configured();
        pia.set_input_a(0xC1);
        pia.set_ca1(true);
        pia.tick();
        let state = pia.snapshot();

        let mut other = self::pia();
        other.restore(&state);
        assert_eq!(other.snapshot(), state);
        assert_eq!(other.peek(0), 0xC1);
    }

    #[test]
    fn test_shared_pia_dispatches_to_inner() {
        let inner = Rc::new(RefCell::new(pia()));
        let mut shared = SharedPia::new(Rc::clone(&inner));

        BusComponent::write(&mut shared, 1, 0x04);
        BusComponent::write(&mut shared, 0, 0x12);
        assert_eq!(inner.borrow().ora(), 0x12);

        BusComponent::reset(&mut shared);
        assert_eq!(inner.borrow().cra(), 0);
    }
}
