//! Run-loop pacing.
//!
//! The [`Clock`] is the only thing that drives `CPU::step`. The host calls
//! [`Clock::run_slice`] repeatedly; each call runs a batch of instructions
//! sized by the active [`Pacer`] and then returns so the host can service
//! commands. Pausing is therefore observed at slice boundaries and, for
//! breakpoints, at the exact instruction the hook refused.
//!
//! Two pacing strategies are provided:
//!
//! - [`FreeRun`]: a fixed number of instructions per slice, as fast as the
//!   host calls.
//! - [`CycleAccurate`]: keeps a reference instant and the number of cycles
//!   emitted since. When emulation is ahead of the wall clock it sleeps off
//!   the difference; when it has fallen more than `max_catch_up` behind it
//!   re-synchronizes instead of bursting.

use super::config::EmulatorConfig;
use super::time::{self, Instant};
use mos6502_core::{Logger, StepOutcome};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pacing strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacingMode {
    FreeRun,
    CycleAccurate,
}

/// Upper bounds for one slice. Whichever is reached first ends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceBudget {
    pub max_instructions: u32,
    pub max_cycles: u64,
}

impl SliceBudget {
    /// A budget that runs nothing.
    pub const EMPTY: SliceBudget = SliceBudget {
        max_instructions: 0,
        max_cycles: 0,
    };
}

/// Pluggable pacing policy.
pub trait Pacer {
    fn mode(&self) -> PacingMode;

    /// Budget for the next slice. May block to hold emulation back to real
    /// time.
    fn slice_budget(&mut self) -> SliceBudget;

    /// Reports the cycles a slice actually ran.
    fn record(&mut self, cycles: u64);

    /// Drops accumulated timing history so the next slice starts from
    /// "now" without catching up.
    fn reset_timing(&mut self);
}

/// Fixed instruction batches, no wall-clock correlation.
#[derive(Debug, Clone)]
pub struct FreeRun {
    batch: u32,
}

impl FreeRun {
    pub fn new(batch: u32) -> Self {
        Self { batch: batch.max(1) }
    }
}

impl Pacer for FreeRun {
    fn mode(&self) -> PacingMode {
        PacingMode::FreeRun
    }

    fn slice_budget(&mut self) -> SliceBudget {
        SliceBudget {
            max_instructions: self.batch,
            max_cycles: u64::MAX,
        }
    }

    fn record(&mut self, _cycles: u64) {}

    fn reset_timing(&mut self) {}
}

/// Real-time correlated pacing at `cpu_hz`.
pub struct CycleAccurate {
    cpu_hz: u64,
    max_slice: Duration,
    max_catch_up: Duration,
    reference: Instant,
    emitted: u64,
    resyncs: u64,
}

impl CycleAccurate {
    pub fn new(cpu_hz: u64, max_slice: Duration, max_catch_up: Duration) -> Self {
        Self {
            cpu_hz: cpu_hz.max(1),
            max_slice,
            max_catch_up,
            reference: Instant::now(),
            emitted: 0,
            resyncs: 0,
        }
    }

    /// Cycles in one slice.
    pub fn slice_cycles(&self) -> u64 {
        ((self.max_slice.as_micros() as u64).saturating_mul(self.cpu_hz) / 1_000_000).max(1)
    }

    /// Wall-clock time the emitted cycles represent.
    fn emitted_time(&self) -> Duration {
        Duration::from_micros(self.emitted.saturating_mul(1_000_000) / self.cpu_hz)
    }

    /// Times pacing gave up catching up.
    pub fn resyncs(&self) -> u64 {
        self.resyncs
    }
}

impl Pacer for CycleAccurate {
    fn mode(&self) -> PacingMode {
        PacingMode::CycleAccurate
    }

    fn slice_budget(&mut self) -> SliceBudget {
        let elapsed = self.reference.elapsed();
        let emitted = self.emitted_time();

        if emitted > elapsed {
            if !time::sleep(emitted - elapsed) {
                return SliceBudget::EMPTY;
            }
        } else if elapsed - emitted > self.max_catch_up {
            self.reset_timing();
            self.resyncs += 1;
        }

        SliceBudget {
            max_instructions: u32::MAX,
            max_cycles: self.slice_cycles(),
        }
    }

    fn record(&mut self, cycles: u64) {
        self.emitted = self.emitted.saturating_add(cycles);
    }

    fn reset_timing(&mut self) {
        self.reference = Instant::now();
        self.emitted = 0;
    }
}

/// What one slice did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceOutcome {
    pub instructions: u32,
    pub cycles: u64,
    /// PC at which the execution hook stopped the slice.
    pub halted_at: Option<u16>,
}

/// Clock state for debug views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockDebug {
    pub paused: bool,
    pub started: bool,
    pub mode: PacingMode,
    pub cpu_hz: u64,
    pub total_cycles: u64,
    pub total_instructions: u64,
    pub slices: u64,
}

/// Drives the CPU at the pace of the active strategy.
pub struct Clock {
    pacer: Box<dyn Pacer>,
    started: bool,
    paused: bool,
    cpu_hz: u64,
    instructions_per_batch: u32,
    max_slice: Duration,
    max_catch_up: Duration,
    total_cycles: u64,
    total_instructions: u64,
    slices: u64,
    logger: Logger,
}

impl Clock {
    /// Creates a stopped clock with the configured pacing mode.
    pub fn new(config: &EmulatorConfig, logger: Logger) -> Self {
        let mut clock = Self {
            pacer: Box::new(FreeRun::new(config.instructions_per_batch)),
            started: false,
            paused: false,
            cpu_hz: config.cpu_hz,
            instructions_per_batch: config.instructions_per_batch,
            max_slice: config.max_slice(),
            max_catch_up: config.max_catch_up(),
            total_cycles: 0,
            total_instructions: 0,
            slices: 0,
            logger,
        };
        if config.cycle_accurate {
            clock.set_pacing(PacingMode::CycleAccurate);
        }
        clock
    }

    /// Begins running. Until then slices do nothing.
    pub fn start(&mut self) {
        self.started = true;
        self.paused = false;
        self.pacer.reset_timing();
        self.logger.info("started");
    }

    /// Stops at the next instruction boundary.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Continues from a pause without catching up on the time spent paused.
    pub fn resume(&mut self) {
        self.started = true;
        self.paused = false;
        self.pacer.reset_timing();
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// True when slices will execute instructions.
    pub fn is_running(&self) -> bool {
        self.started && !self.paused
    }

    /// Re-synchronizes the pacing reference. CPU state is untouched.
    pub fn reset_timing(&mut self) {
        self.pacer.reset_timing();
    }

    pub fn mode(&self) -> PacingMode {
        self.pacer.mode()
    }

    /// Swaps the pacing strategy.
    pub fn set_pacing(&mut self, mode: PacingMode) {
        if mode == self.pacer.mode() {
            return;
        }
        self.pacer = match mode {
            PacingMode::FreeRun => Box::new(FreeRun::new(self.instructions_per_batch)),
            PacingMode::CycleAccurate => Box::new(CycleAccurate::new(
                self.cpu_hz,
                self.max_slice,
                self.max_catch_up,
            )),
        };
        self.logger.info(format!("pacing set to {:?}", mode));
    }

    /// Runs one slice, calling `step` once per instruction.
    ///
    /// A [`StepOutcome::Blocked`] result pauses the clock and ends the
    /// slice with `halted_at` set. Nothing runs while stopped or paused.
    pub fn run_slice<F>(&mut self, mut step: F) -> SliceOutcome
    where
        F: FnMut() -> StepOutcome,
    {
        let mut outcome = SliceOutcome::default();
        if !self.is_running() {
            return outcome;
        }

        let budget = self.pacer.slice_budget();
        while outcome.instructions < budget.max_instructions && outcome.cycles < budget.max_cycles
        {
            match step() {
                StepOutcome::Executed { cycles } => {
                    outcome.instructions += 1;
                    outcome.cycles += cycles as u64;
                }
                StepOutcome::Blocked { pc } => {
                    self.pause();
                    outcome.halted_at = Some(pc);
                    break;
                }
            }
        }

        self.pacer.record(outcome.cycles);
        self.total_cycles += outcome.cycles;
        self.total_instructions += outcome.instructions as u64;
        self.slices += 1;
        outcome
    }

    pub fn to_debug(&self) -> ClockDebug {
        ClockDebug {
            paused: self.paused,
            started: self.started,
            mode: self.pacer.mode(),
            cpu_hz: self.cpu_hz,
            total_cycles: self.total_cycles,
            total_instructions: self.total_instructions,
            slices: self.slices,
        }
    }
}
