//! Apple 1 system integration.
//!
//! ## Memory Map
//!
//! | Range         | Component                          |
//! |---------------|------------------------------------|
//! | $0000-...     | Main RAM (`ram_size` bytes)        |
//! | $D010-$D013   | 6820 PIA (keyboard and display)    |
//! | $E000-$EFFF   | BASIC RAM (optional)               |
//! | $FF00-$FFFF   | ROM (Woz Monitor)                  |
//!
//! The ROM image is supplied by the host in flash format
//! (`[lo, hi, bytes...]`), normally `[0x00, 0xFF, <256 bytes>]`.
//!
//! ## Run Loop
//!
//! The host alternates [`Apple1::run_slice`] with [`Apple1::handle`]. Each
//! instruction is followed by servicing the display strobe and a PIA tick.
//! The PIA interrupt outputs are not wired to the CPU, as on the real
//! board.

use super::clock::{Clock, PacingMode, SliceOutcome};
use super::config::{EmulatorConfig, MAX_RAM_SIZE};
use super::debugger::Debugger;
use super::keyboard;
use super::protocol::{Command, DebugSnapshot, Event, Response};
use super::savestate::{BankImage, EmulatorSnapshot, SaveFile, StateError};
use super::time::Instant;
use super::video::Video;
use crate::devices::{Pia6820, SharedPia};
use mos6502_core::{
    Bus, BusError, FlashError, LogEntry, LogSink, Logger, MemoryBus, RamBank, RomBank,
    SharedLogSink, CPU,
};
use serde_json::Value;
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// PIA register window.
pub const PIA_START: u16 = 0xD010;
pub const PIA_END: u16 = 0xD013;

/// Integer BASIC workspace.
pub const BASIC_RAM_START: u16 = 0xE000;
pub const BASIC_RAM_END: u16 = 0xEFFF;

/// Monitor ROM.
pub const ROM_START: u16 = 0xFF00;
pub const ROM_END: u16 = 0xFFFF;

/// Bank ids, as they appear in save files.
pub const RAM_ID: &str = "ram";
pub const BASIC_RAM_ID: &str = "basic_ram";
pub const ROM_ID: &str = "rom";

/// PB7: high while the terminal is busy.
const DISPLAY_BUSY: u8 = 0x80;

/// Recurring debug snapshot timer. Replaced wholesale on every run-state
/// transition so an old interval never keeps firing.
struct DebugPush {
    interval: Duration,
    last: Instant,
}

impl DebugPush {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Instant::now(),
        }
    }

    /// True once per elapsed interval.
    fn due(&mut self) -> bool {
        if self.last.elapsed() >= self.interval {
            self.last = Instant::now();
            true
        } else {
            false
        }
    }
}

/// Apple 1 emulator.
pub struct Apple1 {
    cpu: CPU<Bus>,
    pia: Rc<RefCell<Pia6820>>,
    video: Video,
    clock: Clock,
    debugger: Debugger,
    config: EmulatorConfig,

    debugger_active: bool,
    debug_push: Option<DebugPush>,
    last_video_version: u64,
    last_slice: SliceOutcome,

    sink: SharedLogSink,
    logger: Logger,
}

impl Apple1 {
    /// Builds the machine with an empty ROM. Load firmware with
    /// [`Apple1::load_firmware`] before starting.
    pub fn new(config: EmulatorConfig) -> Result<Self, BusError> {
        let sink = LogSink::shared(config.log_capacity);
        let logger = Logger::new("apple1", Rc::clone(&sink));
        let mut bus = Bus::new(logger.named("bus"));

        let ram_size = config.ram_size.min(MAX_RAM_SIZE);
        if ram_size != config.ram_size {
            logger.warn(format!(
                "ram_size 0x{:X} overlaps I/O, clamped to 0x{:X}",
                config.ram_size, ram_size
            ));
        }
        if ram_size > 0 {
            let ram = RamBank::new(RAM_ID, 0x0000, ram_size as usize, logger.named("ram"));
            bus.map(0x0000, (ram_size - 1) as u16, RAM_ID, Box::new(ram))?;
        }

        let pia = Rc::new(RefCell::new(Pia6820::new(logger.named("pia"))));
        bus.map(PIA_START, PIA_END, "pia", Box::new(SharedPia::new(Rc::clone(&pia))))?;

        if config.basic_ram {
            let size = (BASIC_RAM_END - BASIC_RAM_START) as usize + 1;
            let ram = RamBank::new(BASIC_RAM_ID, BASIC_RAM_START, size, logger.named("basic_ram"));
            bus.map(BASIC_RAM_START, BASIC_RAM_END, BASIC_RAM_ID, Box::new(ram))?;
        }

        let rom_size = (ROM_END - ROM_START) as usize + 1;
        let rom = RomBank::new(ROM_ID, ROM_START, rom_size, logger.named("rom"));
        bus.map(ROM_START, ROM_END, ROM_ID, Box::new(rom))?;

        let cpu = CPU::new(bus, logger.named("cpu"));
        let clock = Clock::new(&config, logger.named("clock"));
        let debugger = Debugger::new(logger.named("debugger"));
        let video = Video::new(config.crt_bs_support);

        Ok(Self {
            cpu,
            pia,
            video,
            clock,
            debugger,
            config,
            debugger_active: false,
            debug_push: None,
            last_video_version: 0,
            last_slice: SliceOutcome::default(),
            sink,
            logger,
        })
    }

    /// Flashes the monitor ROM and resets so the CPU picks up its reset
    /// vector.
    pub fn load_firmware(&mut self, payload: &[u8]) -> Result<usize, FlashError> {
        let stored = self.flash(ROM_ID, payload)?;
        self.reset();
        Ok(stored)
    }

    /// Flashes `[lo, hi, bytes...]` into the bank `bank_id`, bypassing ROM
    /// write protection.
    pub fn flash(&mut self, bank_id: &str, payload: &[u8]) -> Result<usize, FlashError> {
        self.bank_mut(bank_id)?.flash(payload)
    }

    /// Like [`Apple1::flash`] for a loosely-typed JSON payload.
    pub fn flash_values(&mut self, bank_id: &str, payload: &[Value]) -> Result<usize, FlashError> {
        self.bank_mut(bank_id)?.flash_values(payload)
    }

    fn bank_mut(&mut self, bank_id: &str) -> Result<&mut mos6502_core::BankData, FlashError> {
        match self.cpu.memory_mut().bank_mut(bank_id) {
            Some(bank) => Ok(bank),
            None => {
                let err = FlashError::UnknownBank {
                    id: bank_id.to_string(),
                };
                self.logger.error(err.to_string());
                Err(err)
            }
        }
    }

    /// Presses the reset button: the PIA returns to power-on state, the CPU
    /// reloads its reset vector, memory and screen are kept.
    pub fn reset(&mut self) {
        self.cpu.memory_mut().reset();
        self.cpu.reset();
        self.clock.reset_timing();
        self.debugger.forget_stop();
    }

    // =========================================================================
    // Run Loop
    // =========================================================================

    /// Runs one clock slice and reports what happened.
    pub fn run_slice(&mut self) -> Vec<Event> {
        let cpu = &mut self.cpu;
        let pia = &self.pia;
        let video = &mut self.video;
        self.last_slice = self.clock.run_slice(|| {
            let outcome = cpu.step();
            if !outcome.is_blocked() {
                service_display(pia, video);
                pia.borrow_mut().tick();
            }
            outcome
        });

        let mut events = Vec::new();
        if let Some(hit) = self.debugger.take_hit(&mut self.cpu, &mut self.clock) {
            events.push(hit.into());
            self.rearm_debug_push();
        }
        self.collect_updates(&mut events);
        events
    }

    fn collect_updates(&mut self, events: &mut Vec<Event>) {
        if self.video.version() != self.last_video_version {
            self.last_video_version = self.video.version();
            events.push(Event::VideoUpdated(self.video.snapshot()));
        }

        let push_due = self.debug_push.as_mut().is_some_and(DebugPush::due);
        if push_due {
            events.push(Event::DebugSnapshot(Box::new(self.debug_snapshot())));
        }

        let logs = self.take_logs();
        if !logs.is_empty() {
            events.push(Event::Log(logs));
        }
    }

    /// Starts or stops the periodic debug push. Any existing timer is
    /// dropped first.
    fn rearm_debug_push(&mut self) {
        self.debug_push = None;
        if self.debugger_active {
            let paused = !self.clock.is_running();
            self.debug_push = Some(DebugPush::new(self.config.debug_push_interval(paused)));
        }
    }

    // =========================================================================
    // Command Handling
    // =========================================================================

    /// Executes one host command between slices.
    pub fn handle(&mut self, command: Command) -> Response {
        match command {
            Command::KeyDown(key) => {
                let mut pia = self.pia.borrow_mut();
                if !keyboard::key_down(&mut pia, &key) {
                    self.logger.info(format!("ignored key '{}'", key));
                }
                Response::Ok
            }
            Command::Step => {
                self.debugger.step(&mut self.cpu, &mut self.clock);
                service_display(&self.pia, &mut self.video);
                self.pia.borrow_mut().tick();
                self.rearm_debug_push();
                Response::Debug(Box::new(self.debug_snapshot()))
            }
            Command::PauseEmulation => {
                self.debugger.pause(&mut self.clock);
                self.rearm_debug_push();
                Response::Status("paused".to_string())
            }
            Command::ResumeEmulation | Command::Start => {
                if !self.clock.is_started() {
                    self.clock.start();
                }
                self.debugger.resume(&mut self.cpu, &mut self.clock);
                self.rearm_debug_push();
                Response::Status("running".to_string())
            }
            Command::SetBreakpoint(addr) => {
                Response::Breakpoints(self.debugger.set_breakpoint(&mut self.cpu, addr))
            }
            Command::ClearBreakpoint(addr) => {
                Response::Breakpoints(self.debugger.clear_breakpoint(&mut self.cpu, addr))
            }
            Command::ClearAllBreakpoints => {
                Response::Breakpoints(self.debugger.clear_all_breakpoints(&mut self.cpu))
            }
            Command::GetBreakpoints => Response::Breakpoints(self.debugger.breakpoints()),
            Command::RunToAddress(target) => {
                let result = self
                    .debugger
                    .run_to_address(&mut self.cpu, &mut self.clock, target);
                if result.is_some() {
                    self.rearm_debug_push();
                }
                Response::RunToAddress(result)
            }
            Command::GetMemoryRange { start, length } => {
                Response::Memory(self.memory_range(start, length))
            }
            Command::SaveState => Response::SaveState(Box::new(self.save_state())),
            Command::LoadState(document) => match self.load_state_value(document) {
                Ok(()) => Response::Ok,
                Err(err) => Response::Error(err.to_string()),
            },
            Command::SetCrtBsSupportFlag(enabled) => {
                self.video.set_crt_bs_support(enabled);
                Response::Ok
            }
            Command::SetCpuProfiling(enabled) => {
                self.cpu.set_profiling(enabled);
                Response::Ok
            }
            Command::SetCycleAccurateTiming(enabled) => {
                self.clock.set_pacing(if enabled {
                    PacingMode::CycleAccurate
                } else {
                    PacingMode::FreeRun
                });
                Response::Ok
            }
            Command::SetDebuggerActive(active) => {
                self.debugger_active = active;
                self.rearm_debug_push();
                Response::Ok
            }
            Command::DebugInfo => Response::Debug(Box::new(self.debug_snapshot())),
            Command::Reset => {
                self.reset();
                Response::Ok
            }
            Command::GetLogs => Response::Logs(self.take_logs()),
        }
    }

    /// Side-effect-free copy of `length` bytes from `start`. Never fails.
    pub fn memory_range(&self, start: i64, length: usize) -> Vec<u8> {
        self.cpu.memory().peek_range(start, length)
    }

    // =========================================================================
    // Save States
    // =========================================================================

    pub fn snapshot(&self) -> EmulatorSnapshot {
        EmulatorSnapshot {
            ram: self.cpu.memory().banks().map(BankImage::from).collect(),
            cpu: self.cpu.registers(),
            pia: self.pia.borrow().snapshot(),
            video: Some(self.video.snapshot()),
        }
    }

    pub fn save_state(&self) -> SaveFile {
        SaveFile::new(self.snapshot())
    }

    /// Restores a snapshot. Banks are matched by id; images for banks this
    /// machine does not have are skipped with a warning. Execution is not
    /// resumed; pacing is re-synchronized.
    pub fn restore(&mut self, snapshot: &EmulatorSnapshot) {
        for image in &snapshot.ram {
            match self.cpu.memory_mut().bank_mut(&image.id) {
                Some(bank) => bank.load_image(&image.data),
                None => self
                    .logger
                    .warn(format!("save state bank '{}' is not mapped, skipped", image.id)),
            }
        }
        self.cpu.restore_registers(&snapshot.cpu);
        self.debugger.forget_stop();
        self.pia.borrow_mut().restore(&snapshot.pia);
        if let Some(video) = &snapshot.video {
            self.video.restore(video);
        }
        self.clock.reset_timing();
    }

    /// Validates and restores a save file document. On error the running
    /// state is left untouched.
    pub fn load_state_value(&mut self, document: Value) -> Result<(), StateError> {
        let file = SaveFile::from_value(document).map_err(|err| {
            self.logger.error(format!("load state failed: {}", err));
            err
        })?;
        self.restore(&file.state);
        self.logger.info(format!(
            "state loaded (version {}, saved at {})",
            file.version, file.timestamp
        ));
        Ok(())
    }

    pub fn load_state_json(&mut self, json: &str) -> Result<(), StateError> {
        let document: Value = serde_json::from_str(json).map_err(StateError::from)?;
        self.load_state_value(document)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn debug_snapshot(&self) -> DebugSnapshot {
        DebugSnapshot {
            cpu: self.cpu.to_debug(),
            pia: self.pia.borrow().to_debug(),
            bus: self.cpu.memory().to_debug(),
            clock: self.clock.to_debug(),
            debugger: self.debugger.to_debug(),
            last_slice: self.last_slice,
            profile: if self.cpu.profiling() {
                self.cpu.profile()
            } else {
                Vec::new()
            },
        }
    }

    /// Drains the log sink.
    pub fn take_logs(&mut self) -> Vec<LogEntry> {
        self.sink.borrow_mut().drain()
    }

    pub fn cpu(&self) -> &CPU<Bus> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut CPU<Bus> {
        &mut self.cpu
    }

    pub fn pia(&self) -> Ref<'_, Pia6820> {
        self.pia.borrow()
    }

    pub fn video(&self) -> &Video {
        &self.video
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn debugger(&self) -> &Debugger {
        &self.debugger
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Reads a byte without side effects.
    pub fn peek(&self, addr: u16) -> u8 {
        self.cpu.memory().peek(addr)
    }

    /// Writes a byte through the bus, as the CPU would.
    pub fn poke(&mut self, addr: u16, value: u8) {
        self.cpu.memory_mut().write(addr, value);
    }
}

/// Moves a strobed character from port B to the terminal and reports the
/// terminal ready again.
fn service_display(pia: &RefCell<Pia6820>, video: &mut Video) -> bool {
    let mut pia = pia.borrow_mut();
    if !pia.take_port_b_written() {
        return false;
    }
    let ch = pia.orb() & 0x7F;
    let input = pia.input_b();
    pia.set_input_b(input & !DISPLAY_BUSY);
    video.write(ch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake_clock::FakeClock;

    /// Echo loop at $FF00: configure the PIA, copy each key to the display.
    const ECHO_ROM: [u8; 40] = [
        0xA0, 0x7F, // LDY #$7F
        0x8C, 0x12, 0xD0, // STY DSP (DDRB)
        0xA9, 0xA7, // LDA #$A7
        0x8D, 0x11, 0xD0, // STA KBDCR
        0x8D, 0x13, 0xD0, // STA DSPCR
        0xAD, 0x11, 0xD0, // $FF0D: LDA KBDCR
        0x10, 0xFB, // BPL $FF0D
        0xAD, 0x10, 0xD0, // LDA KBD
        0x2C, 0x12, 0xD0, // $FF15: BIT DSP
        0x30, 0xFB, // BMI $FF15
        0x8D, 0x12, 0xD0, // STA DSP
        0x4C, 0x0D, 0xFF, // JMP $FF0D
        0xEA, 0xEA, 0xEA, 0xEA, 0xEA, 0xEA, 0xEA, 0xEA,
    ];

    fn machine() -> Apple1 {
        let config = EmulatorConfig {
            instructions_per_batch: 500,
            ..EmulatorConfig::default()
        };
        let mut apple = Apple1::new(config).unwrap();
        let mut payload = vec![0x00, 0xFF];
        payload.extend_from_slice(&ECHO_ROM);
        apple.load_firmware(&payload).unwrap();
        apple.flash(ROM_ID, &[0xFC, 0xFF, 0x00, 0xFF]).unwrap();
        apple.reset();
        apple
    }

    #[test]
    fn test_memory_map() {
        let apple = machine();
        let names: Vec<String> = apple
            .cpu()
            .memory()
            .mappings()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["ram", "pia", "basic_ram", "rom"]);
        assert_eq!(apple.cpu().pc(), 0xFF00);
    }

    #[test]
    fn test_echo_key_to_screen() {
        let mut apple = machine();
        apple.handle(Command::Start);
        apple.run_slice();

        apple.handle(Command::KeyDown("h".into()));
        let events = apple.run_slice();
        assert!(events.iter().any(|e| matches!(e, Event::VideoUpdated(_))));
        assert_eq!(apple.video().row_text(0).unwrap().trim_end(), "H");
    }

    #[test]
    fn test_typed_line_appears() {
        let mut apple = machine();
        apple.handle(Command::Start);
        for key in ["a", "1", "Enter", "b"] {
            apple.handle(Command::KeyDown(key.into()));
            apple.run_slice();
        }
        assert_eq!(apple.video().row_text(0).unwrap().trim_end(), "A1");
        assert_eq!(apple.video().row_text(1).unwrap().trim_end(), "B");
    }

    #[test]
    fn test_unknown_bank_flash() {
        let mut apple = machine();
        assert_eq!(
            apple.flash("cassette", &[0, 0, 1]),
            Err(FlashError::UnknownBank {
                id: "cassette".to_string()
            })
        );
    }

    #[test]
    fn test_debug_push_only_when_active_and_due() {
        let mut apple = machine();
        let count = |events: &[Event]| {
            events
                .iter()
                .filter(|e| matches!(e, Event::DebugSnapshot(_)))
                .count()
        };

        FakeClock::advance_time(1_000);
        assert_eq!(count(&apple.run_slice()), 0);

        apple.handle(Command::SetDebuggerActive(true));
        FakeClock::advance_time(150);
        assert_eq!(count(&apple.run_slice()), 1);
        // Re-armed after firing
        assert_eq!(count(&apple.run_slice()), 0);

        apple.handle(Command::SetDebuggerActive(false));
        FakeClock::advance_time(1_000);
        assert_eq!(count(&apple.run_slice()), 0);
    }

    #[test]
    fn test_debug_push_interval_follows_run_state() {
        let mut apple = machine();
        let pushes = |events: Vec<Event>| {
            events
                .iter()
                .filter(|e| matches!(e, Event::DebugSnapshot(_)))
                .count()
        };

        apple.handle(Command::SetDebuggerActive(true));
        apple.handle(Command::Start);
        FakeClock::advance_time(150);
        assert_eq!(pushes(apple.run_slice()), 0);
        FakeClock::advance_time(150);
        assert_eq!(pushes(apple.run_slice()), 1);

        apple.handle(Command::PauseEmulation);
        FakeClock::advance_time(50);
        assert_eq!(pushes(apple.run_slice()), 0);
        FakeClock::advance_time(60);
        assert_eq!(pushes(apple.run_slice()), 1);

        // Resuming re-arms at the running interval
        apple.handle(Command::ResumeEmulation);
        FakeClock::advance_time(150);
        assert_eq!(pushes(apple.run_slice()), 0);
    }

    #[test]
    fn test_resume_and_pause_status() {
        let mut apple = machine();
        assert_eq!(
            apple.handle(Command::ResumeEmulation),
            Response::Status("running".into())
        );
        assert!(apple.clock().is_running());
        assert_eq!(
            apple.handle(Command::PauseEmulation),
            Response::Status("paused".into())
        );
        assert!(apple.clock().is_paused());
    }
}
