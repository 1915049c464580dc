//! Tests for effective-address computation and its cycle penalties.

use mos6502_core::{FlatMemory, Logger, MemoryBus, CPU};

fn setup_cpu(program: &[u8]) -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    memory.load(0x8000, program);
    CPU::new(memory, Logger::detached("cpu"))
}

#[test]
fn test_zero_page_x_wraps_within_page_zero() {
    let mut cpu = setup_cpu(&[0xB5, 0xF0]); // LDA $F0,X
    cpu.set_x(0x20);
    cpu.memory_mut().write(0x0010, 0x77);
    cpu.memory_mut().write(0x0110, 0x11);

    cpu.step();

    assert_eq!(cpu.a(), 0x77);
    assert_eq!(cpu.cycles(), 4);
}

#[test]
fn test_zero_page_y_for_ldx() {
    let mut cpu = setup_cpu(&[0xB6, 0x10]); // LDX $10,Y
    cpu.set_y(0x05);
    cpu.memory_mut().write(0x0015, 0x99);

    cpu.step();

    assert_eq!(cpu.x(), 0x99);
    assert!(cpu.flag_n());
}

#[test]
fn test_absolute_x_page_cross_penalty() {
    let mut cpu = setup_cpu(&[0xBD, 0xFF, 0x12, 0xBD, 0x00, 0x12]);
    cpu.set_x(0x01);
    cpu.memory_mut().write(0x1300, 0xAA);
    cpu.memory_mut().write(0x1201, 0xBB);

    cpu.step(); // LDA $12FF,X crosses into $13xx
    assert_eq!(cpu.a(), 0xAA);
    assert_eq!(cpu.cycles(), 5);

    cpu.step(); // LDA $1200,X stays in page
    assert_eq!(cpu.a(), 0xBB);
    assert_eq!(cpu.cycles(), 9);
}

#[test]
fn test_store_has_no_page_cross_penalty() {
    let mut cpu = setup_cpu(&[0x9D, 0xFF, 0x12]); // STA $12FF,X
    cpu.set_x(0x01);
    cpu.set_a(0x42);

    cpu.step();

    assert_eq!(cpu.memory_mut().read(0x1300), 0x42);
    assert_eq!(cpu.cycles(), 5);
}

#[test]
fn test_indirect_x() {
    let mut cpu = setup_cpu(&[0xA1, 0x20]); // LDA ($20,X)
    cpu.set_x(0x04);
    cpu.memory_mut().write(0x0024, 0x74);
    cpu.memory_mut().write(0x0025, 0x20);
    cpu.memory_mut().write(0x2074, 0x5A);

    cpu.step();

    assert_eq!(cpu.a(), 0x5A);
    assert_eq!(cpu.cycles(), 6);
}

#[test]
fn test_indirect_x_pointer_wraps_in_page_zero() {
    let mut cpu = setup_cpu(&[0xA1, 0xFF]); // LDA ($FF,X)
    cpu.set_x(0x00);
    cpu.memory_mut().write(0x00FF, 0x34);
    cpu.memory_mut().write(0x0000, 0x12);
    cpu.memory_mut().write(0x1234, 0x66);

    cpu.step();

    assert_eq!(cpu.a(), 0x66);
}

#[test]
fn test_indirect_y_page_cross_penalty() {
    let mut cpu = setup_cpu(&[0xB1, 0x40]); // LDA ($40),Y
    cpu.set_y(0x10);
    cpu.memory_mut().write(0x0040, 0xF8);
    cpu.memory_mut().write(0x0041, 0x20);
    cpu.memory_mut().write(0x2108, 0x3C);

    cpu.step();

    assert_eq!(cpu.a(), 0x3C);
    assert_eq!(cpu.cycles(), 6);
}

#[test]
fn test_jmp_indirect_page_wrap_bug() {
    let mut cpu = setup_cpu(&[0x6C, 0xFF, 0x10]); // JMP ($10FF)
    cpu.memory_mut().write(0x10FF, 0x00);
    cpu.memory_mut().write(0x1000, 0x30);
    cpu.memory_mut().write(0x1100, 0x40);

    cpu.step();

    assert_eq!(cpu.pc(), 0x3000);
    assert_eq!(cpu.cycles(), 5);
}

#[test]
fn test_read_modify_write_memory_and_accumulator() {
    let mut cpu = setup_cpu(&[0x0E, 0x00, 0x03, 0x0A]); // ASL $0300, ASL A
    cpu.memory_mut().write(0x0300, 0x81);
    cpu.set_a(0x40);

    cpu.step();
    assert_eq!(cpu.memory_mut().read(0x0300), 0x02);
    assert!(cpu.flag_c());
    assert_eq!(cpu.cycles(), 6);

    cpu.step();
    assert_eq!(cpu.a(), 0x80);
    assert!(!cpu.flag_c());
    assert!(cpu.flag_n());
    assert_eq!(cpu.cycles(), 8);
}
