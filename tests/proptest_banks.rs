//! Property-based tests for RAM/ROM banks and bus dispatch.

use mos6502_core::{Bus, BusComponent, Logger, MemoryBus, RamBank, RomBank};
use proptest::prelude::*;

fn quiet() -> Logger {
    Logger::detached("bank")
}

proptest! {
    /// In-bounds writes read back, masked to 8 bits
    #[test]
    fn prop_ram_round_trip(size in 1usize..=512, offset in any::<u16>(), value in any::<u32>()) {
        let mut ram = RamBank::new("ram", 0, size, quiet());
        let offset = offset % size as u16;

        ram.write_value(offset, value);

        prop_assert_eq!(ram.read(offset), (value & 0xFF) as u8);
    }

    /// Out-of-bounds writes read as 0 and leave every in-bounds byte alone
    #[test]
    fn prop_ram_out_of_bounds(size in 1usize..=256, fill in any::<u8>(), extra in 0u16..1024, value in any::<u8>()) {
        let mut ram = RamBank::new("ram", 0, size, quiet());
        for offset in 0..size as u16 {
            ram.write(offset, fill);
        }
        let outside = size as u16 + extra;

        ram.write(outside, value);

        prop_assert_eq!(ram.read(outside), 0);
        for offset in 0..size as u16 {
            prop_assert_eq!(ram.peek(offset), fill);
        }
    }

    /// ROM writes never change what ROM reads
    #[test]
    fn prop_rom_is_immutable(data in prop::collection::vec(any::<u8>(), 1..256), offset in any::<u16>(), value in any::<u8>()) {
        let mut rom = RomBank::with_data("rom", 0, data, quiet());
        let before = rom.peek(offset);

        rom.write(offset, value);
        rom.write_value(offset, value as u32 | 0x100);

        prop_assert_eq!(rom.peek(offset), before);
    }

    /// Flashing [lo, hi, b0, ...] puts b0 at (hi << 8) | lo, sequentially
    #[test]
    fn prop_flash_places_at_address(addr in 0x0000u16..0x0F00, bytes in prop::collection::vec(any::<u8>(), 1..64)) {
        let log = quiet();
        let mut bus = Bus::new(log.clone());
        bus.map(0x0000, 0x0FFF, "ram", Box::new(RamBank::new("ram", 0, 0x1000, log))).unwrap();

        let mut payload = addr.to_le_bytes().to_vec();
        payload.extend_from_slice(&bytes);
        let stored = bus.bank_mut("ram").unwrap().flash(&payload).unwrap();

        prop_assert_eq!(stored, bytes.len());
        for (i, &b) in bytes.iter().enumerate() {
            prop_assert_eq!(bus.read(addr + i as u16), b);
        }
    }

    /// Memory-range reads never panic and always return the requested length (capped)
    #[test]
    fn prop_peek_range_total(start in -0x20000i64..0x20000, length in 0usize..0x400) {
        let log = quiet();
        let mut bus = Bus::new(log.clone());
        bus.map(0x0000, 0xFFFF, "ram", Box::new(RamBank::new("ram", 0, 0x10000, log))).unwrap();
        bus.write(0xFFFF, 0xEE);

        let bytes = bus.peek_range(start, length);

        prop_assert_eq!(bytes.len(), length);
        for (i, &b) in bytes.iter().enumerate() {
            let addr = start + i as i64;
            if !(0..=0xFFFF).contains(&addr) {
                prop_assert_eq!(b, 0);
            } else if addr == 0xFFFF {
                prop_assert_eq!(b, 0xEE);
            }
        }
    }
}
