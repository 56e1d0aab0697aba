use zx_z80_core::prelude::*;
use zx_z80_core::RestoreError;

mod common;
use common::TestBus;

#[test]
fn ld_a_i_reflects_iff2_in_parity_flag() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    cpu.i = 0x7F;
    cpu.iff2 = true;
    bus.load(0, &[0xED, 0x57]); // LD A,I

    cpu.step(&mut bus);

    assert_eq!(cpu.a, 0x7F);
    assert!(cpu.flag(Flag::PV));
}

#[test]
fn out_c_r_writes_the_given_register_to_the_bc_port() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    cpu.set_bc(0x1234);
    cpu.b = 0x12;
    cpu.c = 0x34;
    cpu.d = 0xAA;
    bus.load(0, &[0xED, 0x51]); // OUT (C),D

    cpu.step(&mut bus);

    assert_eq!(bus.port_writes.last(), Some(&(0x1234u16, 0xAA)));
}

#[test]
fn in_r_c_sets_parity_flag_from_port_value() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    cpu.set_bc(0x1234);
    bus.ports[0x34] = 0x03; // two bits set, even parity
    bus.load(0, &[0xED, 0x40]); // IN B,(C)

    cpu.step(&mut bus);

    assert_eq!(cpu.b, 0x03);
    assert!(cpu.flag(Flag::PV));
}

#[test]
fn snapshot_restore_roundtrips_full_state() {
    let mut cpu = Z80::new();
    cpu.a = 0x11;
    cpu.set_bc(0x2233);
    cpu.ix = 0x4455;
    cpu.iy = 0x6677;
    cpu.sp = 0x8899;
    cpu.pc = 0xAABB;
    cpu.i = 0x01;
    cpu.r = 0x02;
    cpu.iff1 = true;
    cpu.iff2 = false;
    cpu.im = 2;
    cpu.halted = true;
    cpu.cycles = 12345;

    let snap = cpu.snapshot();
    let mut restored = Z80::new();
    restored.restore(snap).unwrap();

    assert_eq!(restored.a, cpu.a);
    assert_eq!(restored.get_bc(), cpu.get_bc());
    assert_eq!(restored.ix, cpu.ix);
    assert_eq!(restored.iy, cpu.iy);
    assert_eq!(restored.sp, cpu.sp);
    assert_eq!(restored.pc, cpu.pc);
    assert_eq!(restored.i, cpu.i);
    assert_eq!(restored.r, cpu.r);
    assert_eq!(restored.iff1, cpu.iff1);
    assert_eq!(restored.iff2, cpu.iff2);
    assert_eq!(restored.im, cpu.im);
    assert_eq!(restored.halted, cpu.halted);
    assert_eq!(restored.cycles, cpu.cycles);
}

#[test]
fn restore_rejects_an_invalid_interrupt_mode() {
    let mut cpu = Z80::new();
    let mut snap = cpu.snapshot();
    snap.im = 3;

    let err = cpu.restore(snap).unwrap_err();

    assert_eq!(err, RestoreError::InvalidInterruptMode(3));
}
