use zx_z80_core::prelude::*;

mod common;
use common::TestBus;

#[test]
fn ldi_copies_one_byte_and_decrements_bc() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    cpu.set_hl(0x8000);
    cpu.set_de(0x9000);
    cpu.set_bc(0x0002);
    bus.memory[0x8000] = 0x77;
    bus.load(0, &[0xED, 0xA0]); // LDI

    let cost = cpu.step(&mut bus);

    assert_eq!(bus.memory[0x9000], 0x77);
    assert_eq!(cpu.get_hl(), 0x8001);
    assert_eq!(cpu.get_de(), 0x9001);
    assert_eq!(cpu.get_bc(), 0x0001);
    assert!(cpu.flag(Flag::PV));
    assert_eq!(cost, 16);
}

#[test]
fn ldir_repeats_until_bc_exhausted() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    cpu.set_hl(0x8000);
    cpu.set_de(0x9000);
    cpu.set_bc(0x0003);
    bus.load(0x8000, &[0x11, 0x22, 0x33]);
    bus.load(0, &[0xED, 0xB0]); // LDIR

    let mut total = 0;
    for _ in 0..3 {
        total += cpu.step(&mut bus);
    }

    assert_eq!(bus.memory[0x9000..0x9003], [0x11, 0x22, 0x33]);
    assert_eq!(cpu.get_bc(), 0);
    assert!(!cpu.flag(Flag::PV));
    assert_eq!(total, 21 + 21 + 16);
    assert_eq!(cpu.pc, 2); // terminating iteration does not rewind
}

#[test]
fn cpir_stops_on_match_and_clears_pv() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    cpu.a = 0x42;
    cpu.set_hl(0x8000);
    cpu.set_bc(0x0003);
    bus.load(0x8000, &[0x00, 0x42, 0x00]);
    bus.load(0, &[0xED, 0xB1]); // CPIR

    let mut total = 0;
    for _ in 0..2 {
        total += cpu.step(&mut bus);
    }

    assert!(cpu.flag(Flag::Z));
    assert!(!cpu.flag(Flag::PV));
    assert_eq!(cpu.get_bc(), 1);
    assert_eq!(total, 21 + 16);
}

#[test]
fn ini_reads_port_writes_memory_and_decrements_b() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    cpu.b = 0x01;
    cpu.c = 0x10;
    cpu.set_hl(0x8000);
    bus.ports[0x10] = 0x99;
    bus.load(0, &[0xED, 0xA2]); // INI

    cpu.step(&mut bus);

    assert_eq!(bus.memory[0x8000], 0x99);
    assert_eq!(cpu.b, 0);
    assert!(cpu.flag(Flag::Z));
}

#[test]
fn outi_decrements_b_before_reading_memory_and_writes_port() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    cpu.b = 0x01;
    cpu.c = 0x20;
    cpu.set_hl(0x8000);
    bus.memory[0x8000] = 0xAB;
    bus.load(0, &[0xED, 0xA3]); // OUTI

    cpu.step(&mut bus);

    assert_eq!(bus.port_writes.last(), Some(&(0x0020u16, 0xAB)));
    assert_eq!(cpu.b, 0);
    assert!(cpu.flag(Flag::Z));
}
