//! Tests for branches, subroutines, BRK/RTI and the stack instructions,
//! plus a small looping program.

use mos6502_core::{FlatMemory, Logger, MemoryBus, StepOutcome, CPU};

fn setup_cpu(program: &[u8]) -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    memory.load(0x8000, program);
    CPU::new(memory, Logger::detached("cpu"))
}

// ========== Branches ==========

#[test]
fn test_branch_not_taken() {
    let mut cpu = setup_cpu(&[0xF0, 0x10]); // BEQ +16
    cpu.set_flag_z(false);

    assert_eq!(cpu.step(), StepOutcome::Executed { cycles: 2 });
    assert_eq!(cpu.pc(), 0x8002);
}

#[test]
fn test_branch_taken_same_page() {
    let mut cpu = setup_cpu(&[0xD0, 0x10]); // BNE +16
    cpu.set_flag_z(false);

    assert_eq!(cpu.step(), StepOutcome::Executed { cycles: 3 });
    assert_eq!(cpu.pc(), 0x8012);
}

#[test]
fn test_branch_taken_backwards_across_page() {
    let mut cpu = setup_cpu(&[0x90, 0xFC]); // BCC -4
    cpu.set_flag_c(false);

    assert_eq!(cpu.step(), StepOutcome::Executed { cycles: 4 });
    assert_eq!(cpu.pc(), 0x7FFE);
}

#[test]
fn test_every_branch_condition() {
    // (opcode, flag setter, flag value that takes the branch)
    let cases: [(u8, fn(&mut CPU<FlatMemory>, bool), bool); 8] = [
        (0x90, CPU::set_flag_c, false),
        (0xB0, CPU::set_flag_c, true),
        (0xF0, CPU::set_flag_z, true),
        (0xD0, CPU::set_flag_z, false),
        (0x30, CPU::set_flag_n, true),
        (0x10, CPU::set_flag_n, false),
        (0x70, CPU::set_flag_v, true),
        (0x50, CPU::set_flag_v, false),
    ];

    for (opcode, set_flag, taken_when) in cases {
        let mut cpu = setup_cpu(&[opcode, 0x02]);
        set_flag(&mut cpu, taken_when);
        cpu.step();
        assert_eq!(cpu.pc(), 0x8004, "opcode 0x{:02X} should branch", opcode);

        let mut cpu = setup_cpu(&[opcode, 0x02]);
        set_flag(&mut cpu, !taken_when);
        cpu.step();
        assert_eq!(cpu.pc(), 0x8002, "opcode 0x{:02X} should fall through", opcode);
    }
}

// ========== Subroutines ==========

#[test]
fn test_jsr_rts_round_trip() {
    // JSR $8010 ; ... ; $8010: RTS
    let mut cpu = setup_cpu(&[0x20, 0x10, 0x80]);
    cpu.memory_mut().write(0x8010, 0x60);

    assert_eq!(cpu.step(), StepOutcome::Executed { cycles: 6 });
    assert_eq!(cpu.pc(), 0x8010);
    assert_eq!(cpu.sp(), 0xFB);
    // Return address - 1 pushed high byte first
    assert_eq!(cpu.memory().peek(0x01FD), 0x80);
    assert_eq!(cpu.memory().peek(0x01FC), 0x02);

    assert_eq!(cpu.step(), StepOutcome::Executed { cycles: 6 });
    assert_eq!(cpu.pc(), 0x8003);
    assert_eq!(cpu.sp(), 0xFD);
}

#[test]
fn test_brk_and_rti() {
    let mut cpu = setup_cpu(&[0x00, 0xEA, 0xEA]);
    cpu.memory_mut().write(0xFFFE, 0x00);
    cpu.memory_mut().write(0xFFFF, 0x90);
    cpu.memory_mut().write(0x9000, 0x40); // RTI
    cpu.set_flag_i(false);
    cpu.set_flag_c(true);

    assert_eq!(cpu.step(), StepOutcome::Executed { cycles: 7 });
    assert_eq!(cpu.pc(), 0x9000);
    assert!(cpu.flag_i());
    // Pushed status has B and bit 5 set
    assert_eq!(cpu.memory().peek(0x01FB), 0b0011_0001);

    assert_eq!(cpu.step(), StepOutcome::Executed { cycles: 6 });
    assert_eq!(cpu.pc(), 0x8002);
    assert!(!cpu.flag_i());
    assert!(cpu.flag_c());
}

// ========== Stack ==========

#[test]
fn test_pha_pla() {
    let mut cpu = setup_cpu(&[0x48, 0xA9, 0x00, 0x68]); // PHA, LDA #0, PLA
    cpu.set_a(0x80);

    cpu.step();
    assert_eq!(cpu.sp(), 0xFC);
    cpu.step();
    assert!(cpu.flag_z());
    cpu.step();

    assert_eq!(cpu.a(), 0x80);
    assert!(cpu.flag_n());
    assert!(!cpu.flag_z());
    assert_eq!(cpu.cycles(), 3 + 2 + 4);
}

#[test]
fn test_php_plp() {
    let mut cpu = setup_cpu(&[0x08, 0x18, 0x28]); // PHP, CLC, PLP
    cpu.set_flag_c(true);

    cpu.step();
    assert_eq!(cpu.memory().peek(0x01FD) & 0b0011_0000, 0b0011_0000);
    cpu.step();
    assert!(!cpu.flag_c());
    cpu.step();
    assert!(cpu.flag_c());
}

#[test]
fn test_stack_pointer_wraps_in_page_one() {
    let mut cpu = setup_cpu(&[0x48]);
    cpu.set_sp(0x00);
    cpu.set_a(0x5A);

    cpu.step();

    assert_eq!(cpu.sp(), 0xFF);
    assert_eq!(cpu.memory().peek(0x0100), 0x5A);
}

// ========== Transfers ==========

#[test]
fn test_txs_leaves_flags_alone() {
    let mut cpu = setup_cpu(&[0x9A, 0xBA]); // TXS, TSX
    cpu.set_x(0x00);
    cpu.set_flag_z(false);

    cpu.step();
    assert_eq!(cpu.sp(), 0x00);
    assert!(!cpu.flag_z());

    cpu.step();
    assert!(cpu.flag_z());
}

// ========== Programs ==========

#[test]
fn test_counting_loop() {
    // LDX #$05 ; LDA #$00 ; loop: CLC ; ADC #$03 ; DEX ; BNE loop ; STA $0200
    let mut cpu = setup_cpu(&[
        0xA2, 0x05, 0xA9, 0x00, 0x18, 0x69, 0x03, 0xCA, 0xD0, 0xFA, 0x8D, 0x00, 0x02,
    ]);

    while cpu.pc() != 0x800D {
        cpu.step();
    }

    assert_eq!(cpu.memory().peek(0x0200), 15);
    assert_eq!(cpu.x(), 0);
}
