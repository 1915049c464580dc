//! Fuzz target for bus dispatch and bank flashing.
//!
//! Maps RAM and ROM banks at arbitrary (possibly overlapping) ranges, then
//! replays arbitrary reads, writes, flashes and range peeks. Nothing may
//! panic, and ROM contents must only change through flashing.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mos6502_core::{Bus, Logger, MemoryBus, RamBank, RomBank};

#[derive(Debug, Arbitrary)]
struct FuzzMapping {
    start: u16,
    len: u16,
    rom: bool,
}

#[derive(Debug, Arbitrary)]
enum FuzzOp {
    Read(u16),
    Write(u16, u8),
    Flash { bank: u8, payload: Vec<u8> },
    PeekRange { start: i32, length: u16 },
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    mappings: Vec<FuzzMapping>,
    ops: Vec<FuzzOp>,
}

fuzz_target!(|input: FuzzInput| {
    let log = Logger::detached("fuzz");
    let mut bus = Bus::new(log.clone());
    let mut ids = Vec::new();

    for (i, mapping) in input.mappings.iter().take(8).enumerate() {
        let end = mapping.start.saturating_add(mapping.len);
        let id = format!("bank{}", i);
        // Bank size is independent of the mapped range so out-of-bounds
        // offsets are exercised too
        let size = (mapping.len as usize / 2) + 1;
        let result = if mapping.rom {
            bus.map(mapping.start, end, &id, Box::new(RomBank::new(&id, mapping.start, size, log.clone())))
        } else {
            bus.map(mapping.start, end, &id, Box::new(RamBank::new(&id, mapping.start, size, log.clone())))
        };
        assert!(result.is_ok());
        ids.push(id);
    }

    for op in input.ops.iter().take(256) {
        match op {
            FuzzOp::Read(addr) => {
                bus.read(*addr);
            }
            FuzzOp::Write(addr, value) => bus.write(*addr, *value),
            FuzzOp::Flash { bank, payload } => {
                if ids.is_empty() {
                    continue;
                }
                let id = &ids[*bank as usize % ids.len()];
                if let Some(bank) = bus.bank_mut(id) {
                    let _ = bank.flash(payload);
                }
            }
            FuzzOp::PeekRange { start, length } => {
                let bytes = bus.peek_range(*start as i64, *length as usize);
                assert_eq!(bytes.len(), *length as usize);
            }
        }
    }

    assert!(log.sink().borrow().len() <= mos6502_core::logging::DEFAULT_LOG_CAPACITY);
});
