//! Breakpoint engine.
//!
//! The debugger owns the breakpoint set and the run-to-address target. The
//! CPU never sees either: whenever they change, the debugger composes a
//! single execution hook from a copy of the current state and installs it,
//! or removes the hook when there is nothing to stop for.
//!
//! The hook records why it refused a PC in a shared cell. After each clock
//! slice the machine calls [`Debugger::take_hit`] to turn that record into
//! a [`DebugEvent`] and settle the run mode.
//!
//! Resuming only steps over a breakpoint the CPU is actually stopped on,
//! i.e. one the hook refused and nothing has executed since. A PC that
//! merely sits on a breakpoint address (after reset, a pause or a load)
//! still reports the hit before that instruction retires.

use super::clock::Clock;
use mos6502_core::{Logger, MemoryBus, StepOutcome, CPU};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Debugger run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "target", rename_all = "snake_case")]
pub enum RunMode {
    Running,
    Paused,
    SteppingOnce,
    RunToAddress(u16),
}

/// Why execution stopped. Both pause the clock, but a host tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "pc", rename_all = "snake_case")]
pub enum DebugEvent {
    BreakpointHit(u16),
    CursorReached(u16),
}

/// Debugger state for debug views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebuggerDebug {
    pub mode: RunMode,
    pub breakpoints: Vec<u16>,
    pub run_to: Option<u16>,
}

pub struct Debugger {
    breakpoints: BTreeSet<u16>,
    run_to: Option<u16>,
    mode: RunMode,
    hit: Rc<Cell<Option<DebugEvent>>>,
    /// PC the hook last refused, until execution moves on.
    stopped_at: Option<u16>,
    logger: Logger,
}

impl Debugger {
    pub fn new(logger: Logger) -> Self {
        Self {
            breakpoints: BTreeSet::new(),
            run_to: None,
            mode: RunMode::Paused,
            hit: Rc::new(Cell::new(None)),
            stopped_at: None,
            logger,
        }
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// Breakpoints in ascending order.
    pub fn breakpoints(&self) -> Vec<u16> {
        self.breakpoints.iter().copied().collect()
    }

    pub fn run_to(&self) -> Option<u16> {
        self.run_to
    }

    pub fn has_breakpoint(&self, addr: u16) -> bool {
        self.breakpoints.contains(&addr)
    }

    // =========================================================================
    // Breakpoint Set
    // =========================================================================

    pub fn set_breakpoint<M: MemoryBus>(&mut self, cpu: &mut CPU<M>, addr: u16) -> Vec<u16> {
        if self.breakpoints.insert(addr) {
            self.install_hook(cpu);
        }
        self.breakpoints()
    }

    pub fn clear_breakpoint<M: MemoryBus>(&mut self, cpu: &mut CPU<M>, addr: u16) -> Vec<u16> {
        if self.breakpoints.remove(&addr) {
            self.install_hook(cpu);
        }
        self.breakpoints()
    }

    pub fn clear_all_breakpoints<M: MemoryBus>(&mut self, cpu: &mut CPU<M>) -> Vec<u16> {
        self.breakpoints.clear();
        self.install_hook(cpu);
        Vec::new()
    }

    /// Composes the hook from the current breakpoints and run-to target.
    fn install_hook<M: MemoryBus>(&self, cpu: &mut CPU<M>) {
        if self.breakpoints.is_empty() && self.run_to.is_none() {
            cpu.clear_execution_hook();
            return;
        }

        let breakpoints = self.breakpoints.clone();
        let target = self.run_to;
        let hit = Rc::clone(&self.hit);
        cpu.set_execution_hook(Box::new(move |pc| {
            if target == Some(pc) {
                hit.set(Some(DebugEvent::CursorReached(pc)));
                false
            } else if breakpoints.contains(&pc) {
                hit.set(Some(DebugEvent::BreakpointHit(pc)));
                false
            } else {
                true
            }
        }));
    }

    // =========================================================================
    // Run Control
    // =========================================================================

    /// Executes exactly one instruction from a paused state, ignoring any
    /// breakpoint at the current PC, and stays paused.
    pub fn step<M: MemoryBus>(&mut self, cpu: &mut CPU<M>, clock: &mut Clock) -> StepOutcome {
        clock.pause();
        self.stopped_at = None;
        self.mode = RunMode::SteppingOnce;
        let outcome = cpu.perform_single_step();
        self.mode = RunMode::Paused;
        outcome
    }

    pub fn pause(&mut self, clock: &mut Clock) {
        clock.pause();
        self.mode = RunMode::Paused;
    }

    /// Resumes execution. A breakpoint the CPU is stopped on is stepped off
    /// rather than hit again.
    pub fn resume<M: MemoryBus>(&mut self, cpu: &mut CPU<M>, clock: &mut Clock) {
        self.step_off(cpu);
        clock.resume();
        self.mode = match self.run_to {
            Some(target) => RunMode::RunToAddress(target),
            None => RunMode::Running,
        };
    }

    /// Runs until PC reaches `target`.
    ///
    /// Returns `None` without touching the clock when PC is already there.
    pub fn run_to_address<M: MemoryBus>(
        &mut self,
        cpu: &mut CPU<M>,
        clock: &mut Clock,
        target: u16,
    ) -> Option<u16> {
        if cpu.pc() == target {
            self.logger
                .info(format!("already at target 0x{:04X}", target));
            return None;
        }

        self.run_to = Some(target);
        self.install_hook(cpu);
        self.step_off(cpu);
        clock.resume();
        self.mode = RunMode::RunToAddress(target);
        Some(target)
    }

    fn step_off<M: MemoryBus>(&mut self, cpu: &mut CPU<M>) {
        let pc = cpu.pc();
        if self.stopped_at.take() == Some(pc) && self.breakpoints.contains(&pc) {
            cpu.bypass_hook_once();
        }
    }

    /// Forgets the last stop. Called when PC is moved from outside (reset,
    /// load) so the next resume checks the new PC.
    pub fn forget_stop(&mut self) {
        self.stopped_at = None;
    }

    /// Collects the event recorded by the hook, if any.
    ///
    /// Any stop pauses the clock. A stop of either kind ends a pending
    /// run-to-address, whose one-shot hook is then removed.
    pub fn take_hit<M: MemoryBus>(
        &mut self,
        cpu: &mut CPU<M>,
        clock: &mut Clock,
    ) -> Option<DebugEvent> {
        let event = self.hit.take()?;
        clock.pause();
        self.mode = RunMode::Paused;
        self.stopped_at = Some(match event {
            DebugEvent::BreakpointHit(pc) | DebugEvent::CursorReached(pc) => pc,
        });

        if self.run_to.take().is_some() {
            self.install_hook(cpu);
        }
        match event {
            DebugEvent::BreakpointHit(pc) => {
                self.logger.info(format!("breakpoint hit at 0x{:04X}", pc))
            }
            DebugEvent::CursorReached(pc) => {
                self.logger.info(format!("run-to reached 0x{:04X}", pc))
            }
        }
        Some(event)
    }

    pub fn to_debug(&self) -> DebuggerDebug {
        DebuggerDebug {
            mode: self.mode,
            breakpoints: self.breakpoints(),
            run_to: self.run_to,
        }
    }
}
