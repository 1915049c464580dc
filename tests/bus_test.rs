//! Tests for bus dispatch with RAM and ROM banks, and a CPU running on
//! the mapped bus.

use mos6502_core::{
    BankData, Bus, BusComponent, Fault, LogLevel, LogSink, Logger, MemoryBus, RamBank, RomBank,
    StepOutcome, CPU,
};

fn logger() -> Logger {
    Logger::new("bus", LogSink::shared(64))
}

/// 4 KiB RAM at $0000 and a 256-byte ROM at $FF00 with the reset vector
/// pointing at $FF00.
fn small_system(log: &Logger) -> Bus {
    let mut bus = Bus::new(log.clone());
    bus.map(
        0x0000,
        0x0FFF,
        "ram",
        Box::new(RamBank::new("ram", 0x0000, 0x1000, log.named("ram"))),
    )
    .unwrap();

    let mut rom = RomBank::new("rom", 0xFF00, 0x100, log.named("rom"));
    rom.bank_mut()
        .unwrap()
        .flash(&[0x00, 0xFF, 0xA9, 0x42, 0x8D, 0x00, 0x02, 0x4C, 0x00, 0xFF])
        .unwrap();
    rom.bank_mut().unwrap().flash(&[0xFC, 0xFF, 0x00, 0xFF]).unwrap();
    bus.map(0xFF00, 0xFFFF, "rom", Box::new(rom)).unwrap();
    bus
}

#[test]
fn test_ram_size_four_scenario() {
    let mut ram = RamBank::new("ram", 0, 4, logger());

    ram.write(4, 0xAB);
    assert_eq!(ram.read(4), 0);

    ram.write(3, 0xAB);
    assert_eq!(ram.read(3), 0xAB);
}

#[test]
fn test_rom_write_through_bus_is_ignored() {
    let log = logger();
    let mut bus = small_system(&log);

    bus.write(0xFF00, 0x00);
    assert_eq!(bus.read(0xFF00), 0xA9);

    let entries = log.sink().borrow_mut().drain();
    let violation = entries
        .iter()
        .find(|e| e.source == "rom")
        .expect("rom logged the write");
    assert_eq!(violation.level, LogLevel::Warn);
    assert!(violation
        .message
        .starts_with(&Fault::ReadOnlyViolation.to_string()));
}

#[test]
fn test_unmapped_gap_reads_zero() {
    let log = logger();
    let mut bus = small_system(&log);

    bus.write(0x5000, 0x77);
    assert_eq!(bus.read(0x5000), 0x00);
    assert_eq!(bus.peek(0x1000), 0x00);
}

#[test]
fn test_repeated_out_of_bounds_reads_fold() {
    let log = logger();
    let mut bus = Bus::new(log.clone());
    // Mapping wider than the bank behind it
    bus.map(
        0x0000,
        0x00FF,
        "ram",
        Box::new(RamBank::new("ram", 0, 0x10, log.named("ram"))),
    )
    .unwrap();

    for _ in 0..100 {
        bus.read(0x0080);
    }

    let entries = log.sink().borrow_mut().drain();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].count, 100);
}

#[test]
fn test_cpu_runs_from_rom() {
    let log = logger();
    let bus = small_system(&log);
    let mut cpu = CPU::new(bus, log.named("cpu"));

    assert_eq!(cpu.pc(), 0xFF00);
    cpu.step(); // LDA #$42
    cpu.step(); // STA $0200
    assert_eq!(cpu.step(), StepOutcome::Executed { cycles: 3 }); // JMP $FF00

    assert_eq!(cpu.pc(), 0xFF00);
    assert_eq!(cpu.memory().peek(0x0200), 0x42);

    let debug = cpu.memory().to_debug();
    assert_eq!(debug.last_write.map(|w| w.addr), Some(0x0200));
}

#[test]
fn test_banks_visible_by_id() {
    let log = logger();
    let mut bus = small_system(&log);
    bus.write(0x0010, 0x99);

    let images: Vec<(String, usize)> = bus
        .banks()
        .map(|b| (b.id().to_string(), b.len()))
        .collect();
    assert_eq!(
        images,
        vec![("ram".to_string(), 0x1000), ("rom".to_string(), 0x100)]
    );

    let ram: &mut BankData = bus.bank_mut("ram").unwrap();
    assert_eq!(ram.as_slice()[0x10], 0x99);
}
