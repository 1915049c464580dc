//! Tests for the pre-instruction execution hook.

use mos6502_core::{FlatMemory, Logger, MemoryBus, StepOutcome, CPU};
use std::cell::RefCell;
use std::rc::Rc;

fn setup_cpu() -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    // LDA #$01 ; LDA #$02 ; LDA #$03 ; JMP $8000
    memory.load(0x8000, &[0xA9, 0x01, 0xA9, 0x02, 0xA9, 0x03, 0x4C, 0x00, 0x80]);
    CPU::new(memory, Logger::detached("cpu"))
}

#[test]
fn test_hook_sees_every_pc_in_order() {
    let mut cpu = setup_cpu();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    cpu.set_execution_hook(Box::new(move |pc| {
        log.borrow_mut().push(pc);
        true
    }));

    for _ in 0..5 {
        cpu.step();
    }

    assert_eq!(*seen.borrow(), vec![0x8000, 0x8002, 0x8004, 0x8006, 0x8000]);
}

#[test]
fn test_blocked_step_is_repeatable() {
    let mut cpu = setup_cpu();
    cpu.set_execution_hook(Box::new(|pc| pc != 0x8002));

    cpu.step();
    for _ in 0..3 {
        assert_eq!(cpu.step(), StepOutcome::Blocked { pc: 0x8002 });
    }
    assert_eq!(cpu.a(), 0x01);
    assert_eq!(cpu.cycles(), 2);
}

#[test]
fn test_single_step_off_a_breakpoint() {
    let mut cpu = setup_cpu();
    cpu.set_execution_hook(Box::new(|pc| pc != 0x8000));

    assert!(cpu.step().is_blocked());
    assert_eq!(cpu.perform_single_step(), StepOutcome::Executed { cycles: 2 });
    assert_eq!(cpu.a(), 0x01);

    // Hook checking is back for the following instructions
    cpu.step();
    cpu.step();
    cpu.step(); // JMP $8000
    assert!(cpu.step().is_blocked());
}

#[test]
fn test_new_hook_replaces_old() {
    let mut cpu = setup_cpu();
    cpu.set_execution_hook(Box::new(|_| false));
    cpu.set_execution_hook(Box::new(|_| true));

    assert!(!cpu.step().is_blocked());

    cpu.clear_execution_hook();
    assert!(!cpu.has_execution_hook());
}

#[test]
fn test_hook_blocks_before_pending_interrupt() {
    let mut cpu = setup_cpu();
    cpu.trigger_nmi();
    cpu.set_execution_hook(Box::new(|_| false));

    assert!(cpu.step().is_blocked());
    assert!(cpu.pending_nmi());
}
