//! Jumps, calls, returns, RST, DI/EI, RETN/RETI and IM.

use super::{Flag, Z80};
use crate::bus::Bus;

fn eval_condition(cpu: &Z80, cc: u8) -> bool {
    match cc {
        0 => !cpu.flag(Flag::Z),
        1 => cpu.flag(Flag::Z),
        2 => !cpu.flag(Flag::C),
        3 => cpu.flag(Flag::C),
        4 => !cpu.flag(Flag::PV),
        5 => cpu.flag(Flag::PV),
        6 => !cpu.flag(Flag::S),
        7 => cpu.flag(Flag::S),
        _ => unreachable!("condition code out of range: {cc}"),
    }
}

/// `JP nn` — opcode 0xC3.
pub(crate) fn op_jp_nn(cpu: &mut Z80, _opcode: u8, bus: &mut dyn Bus) -> u8 {
    let nn = cpu.fetch_word(bus);
    cpu.pc = nn;
    10
}

/// `JP cc[y],nn` — opcode bits 11yyy010.
pub(crate) fn op_jp_cc_nn(cpu: &mut Z80, opcode: u8, bus: &mut dyn Bus) -> u8 {
    let cc = (opcode >> 3) & 7;
    let nn = cpu.fetch_word(bus);
    if eval_condition(cpu, cc) {
        cpu.pc = nn;
    }
    10
}

/// `JR e` — opcode 0x18.
pub(crate) fn op_jr_e(cpu: &mut Z80, _opcode: u8, bus: &mut dyn Bus) -> u8 {
    let e = cpu.fetch_byte(bus) as i8;
    cpu.pc = cpu.pc.wrapping_add(e as i16 as u16);
    12
}

/// `JR cc,e` for NZ/Z/NC/C — opcodes 0x20/0x28/0x30/0x38.
pub(crate) fn op_jr_cc_e(cpu: &mut Z80, opcode: u8, bus: &mut dyn Bus) -> u8 {
    let cc = ((opcode >> 3) & 7) - 4;
    let e = cpu.fetch_byte(bus) as i8;
    if eval_condition(cpu, cc) {
        cpu.pc = cpu.pc.wrapping_add(e as i16 as u16);
        12
    } else {
        7
    }
}

/// `JP (HL)` / `JP (IX)` / `JP (IY)` — opcode 0xE9.
pub(crate) fn op_jp_hl(cpu: &mut Z80, _opcode: u8, _bus: &mut dyn Bus) -> u8 {
    cpu.pc = cpu.get_rp(2);
    4
}

/// `DJNZ e` — opcode 0x10.
pub(crate) fn op_djnz(cpu: &mut Z80, _opcode: u8, bus: &mut dyn Bus) -> u8 {
    let e = cpu.fetch_byte(bus) as i8;
    cpu.b = cpu.b.wrapping_sub(1);
    if cpu.b != 0 {
        cpu.pc = cpu.pc.wrapping_add(e as i16 as u16);
        13
    } else {
        8
    }
}

/// `CALL nn` — opcode 0xCD.
pub(crate) fn op_call_nn(cpu: &mut Z80, _opcode: u8, bus: &mut dyn Bus) -> u8 {
    let nn = cpu.fetch_word(bus);
    cpu.push_word(bus, cpu.pc);
    cpu.pc = nn;
    17
}

/// `CALL cc[y],nn` — opcode bits 11yyy100.
pub(crate) fn op_call_cc_nn(
    cpu: &mut Z80,
    opcode: u8,
    bus: &mut dyn Bus,
) -> u8 {
    let cc = (opcode >> 3) & 7;
    let nn = cpu.fetch_word(bus);
    if eval_condition(cpu, cc) {
        cpu.push_word(bus, cpu.pc);
        cpu.pc = nn;
        17
    } else {
        10
    }
}

/// `RET` — opcode 0xC9.
pub(crate) fn op_ret(cpu: &mut Z80, _opcode: u8, bus: &mut dyn Bus) -> u8 {
    cpu.pc = cpu.pop_word(bus);
    10
}

/// `RET cc[y]` — opcode bits 11yyy000.
pub(crate) fn op_ret_cc(cpu: &mut Z80, opcode: u8, bus: &mut dyn Bus) -> u8 {
    let cc = (opcode >> 3) & 7;
    if eval_condition(cpu, cc) {
        cpu.pc = cpu.pop_word(bus);
        11
    } else {
        5
    }
}

/// `RST y*8` — opcode bits 11yyy111.
pub(crate) fn op_rst(cpu: &mut Z80, opcode: u8, bus: &mut dyn Bus) -> u8 {
    let y = (opcode >> 3) & 7;
    cpu.push_word(bus, cpu.pc);
    cpu.pc = (y as u16) * 8;
    11
}

/// `DI` — opcode 0xF3.
pub(crate) fn op_di(cpu: &mut Z80, _opcode: u8, _bus: &mut dyn Bus) -> u8 {
    cpu.iff1 = false;
    cpu.iff2 = false;
    4
}

/// `EI` — opcode 0xFB. Interrupts stay masked through the following
/// instruction (`ei_delay`), matching real hardware's one-instruction delay.
pub(crate) fn op_ei(cpu: &mut Z80, _opcode: u8, _bus: &mut dyn Bus) -> u8 {
    cpu.iff1 = true;
    cpu.iff2 = true;
    cpu.ei_delay = true;
    4
}

/// `RETN` / `RETI` — ED-prefixed (0x45/0x4D and their undocumented mirrors).
/// Both restore IFF1 from IFF2 and pop PC; this core does not distinguish
/// them further (no interrupt controller acknowledgement to signal).
pub(crate) fn op_retn(cpu: &mut Z80, _opcode: u8, bus: &mut dyn Bus) -> u8 {
    cpu.iff1 = cpu.iff2;
    cpu.pc = cpu.pop_word(bus);
    10
}

/// `IM 0`/`IM 1`/`IM 2` — ED-prefixed, opcode bits 01yyy110.
pub(crate) fn op_im(cpu: &mut Z80, opcode: u8, _bus: &mut dyn Bus) -> u8 {
    let y = (opcode >> 3) & 7;
    cpu.im = match y & 3 {
        0 | 1 => 0,
        2 => 1,
        3 => 2,
        _ => unreachable!(),
    };
    4
}
