//! CB-prefixed rotate/shift/BIT/SET/RES, the DD-CB/FD-CB indexed forms, and
//! the ED-prefixed 4-bit rotates RLD/RRD.

use super::alu::parity;
use super::{Flag, Z80};
use crate::bus::Bus;

#[derive(Clone, Copy)]
enum RotOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Sll,
    Srl,
}

impl RotOp {
    fn decode(y: u8) -> Self {
        match y {
            0 => RotOp::Rlc,
            1 => RotOp::Rrc,
            2 => RotOp::Rl,
            3 => RotOp::Rr,
            4 => RotOp::Sla,
            5 => RotOp::Sra,
            6 => RotOp::Sll,
            7 => RotOp::Srl,
            _ => unreachable!("rotate/shift selector out of range: {y}"),
        }
    }

    fn apply(self, input: u8, old_c: bool) -> (u8, bool) {
        match self {
            RotOp::Rlc => (input.rotate_left(1), input & 0x80 != 0),
            RotOp::Rrc => (input.rotate_right(1), input & 0x01 != 0),
            RotOp::Rl => ((input << 1) | old_c as u8, input & 0x80 != 0),
            RotOp::Rr => ((input >> 1) | ((old_c as u8) << 7), input & 0x01 != 0),
            RotOp::Sla => (input << 1, input & 0x80 != 0),
            RotOp::Sra => (((input as i8) >> 1) as u8, input & 0x01 != 0),
            RotOp::Sll => ((input << 1) | 0x01, input & 0x80 != 0),
            RotOp::Srl => (input >> 1, input & 0x01 != 0),
        }
    }
}

fn rot_flags(result: u8, carry: bool) -> u8 {
    let mut f = 0u8;
    if result & 0x80 != 0 {
        f |= Flag::S as u8;
    }
    if result == 0 {
        f |= Flag::Z as u8;
    }
    if parity(result) {
        f |= Flag::PV as u8;
    }
    if carry {
        f |= Flag::C as u8;
    }
    f |= result & (Flag::X as u8 | Flag::Y as u8);
    f
}

/// CB xx on a plain register (z != 6) — opcode bits 00yyyzzz under the CB
/// prefix. Covers rotate/shift (family 00), BIT/RES/SET share this table too
/// via `op_cb_bit_set_res_r`.
pub(crate) fn op_cb_rotate_shift_r(
    cpu: &mut Z80,
    opcode: u8,
    _bus: &mut dyn Bus,
) -> u8 {
    let y = (opcode >> 3) & 7;
    let z = opcode & 7;
    let op = RotOp::decode(y);
    let input = cpu.get_reg8(z);
    let (result, carry) = op.apply(input, cpu.flag(Flag::C));
    cpu.set_reg8(z, result);
    cpu.f = rot_flags(result, carry);
    4
}

/// CB xx on `(HL)` — opcode bits 00yyy110 under the CB prefix.
pub(crate) fn op_cb_rotate_shift_hl(
    cpu: &mut Z80,
    opcode: u8,
    bus: &mut dyn Bus,
) -> u8 {
    let y = (opcode >> 3) & 7;
    let op = RotOp::decode(y);
    let addr = cpu.get_hl();
    let input = bus.read_byte(addr);
    let (result, carry) = op.apply(input, cpu.flag(Flag::C));
    bus.write_byte(addr, result);
    cpu.f = rot_flags(result, carry);
    11
}

/// `BIT b,r[z]` — CB bits 01bbbzzz, z != 6.
pub(crate) fn op_cb_bit_r(cpu: &mut Z80, opcode: u8, _bus: &mut dyn Bus) -> u8 {
    let b = (opcode >> 3) & 7;
    let z = opcode & 7;
    let value = cpu.get_reg8(z);
    apply_bit_flags(cpu, b, value, value);
    4
}

/// `BIT b,(HL)` — CB bits 01bbb110.
pub(crate) fn op_cb_bit_hl(cpu: &mut Z80, opcode: u8, bus: &mut dyn Bus) -> u8 {
    let b = (opcode >> 3) & 7;
    let value = bus.read_byte(cpu.get_hl());
    apply_bit_flags(cpu, b, value, value);
    8
}

/// BIT's flag contract is identical for every addressing form; F3/F5 come
/// from `f35_source` — the operand byte, since this core tracks no MEMPTR.
fn apply_bit_flags(cpu: &mut Z80, bit: u8, value: u8, f35_source: u8) {
    let set = value & (1 << bit) != 0;
    let mut f = cpu.f & (Flag::C as u8);
    f |= Flag::H as u8;
    if !set {
        f |= Flag::Z as u8 | Flag::PV as u8;
    }
    if bit == 7 && set {
        f |= Flag::S as u8;
    }
    f |= f35_source & (Flag::X as u8 | Flag::Y as u8);
    cpu.f = f;
}

/// `SET b,r[z]` / `RES b,r[z]` — CB bits 1xbbbzzz, z != 6. No flags change.
pub(crate) fn op_cb_set_res_r(
    cpu: &mut Z80,
    opcode: u8,
    _bus: &mut dyn Bus,
) -> u8 {
    let is_set = opcode & 0x40 != 0;
    let b = (opcode >> 3) & 7;
    let z = opcode & 7;
    let value = cpu.get_reg8(z);
    let result = if is_set { value | (1 << b) } else { value & !(1 << b) };
    cpu.set_reg8(z, result);
    4
}

/// `SET b,(HL)` / `RES b,(HL)` — CB bits 1xbbb110. No flags change.
pub(crate) fn op_cb_set_res_hl(
    cpu: &mut Z80,
    opcode: u8,
    bus: &mut dyn Bus,
) -> u8 {
    let is_set = opcode & 0x40 != 0;
    let b = (opcode >> 3) & 7;
    let addr = cpu.get_hl();
    let value = bus.read_byte(addr);
    let result = if is_set { value | (1 << b) } else { value & !(1 << b) };
    bus.write_byte(addr, result);
    11
}

/// DD-CB/FD-CB indexed rotate/shift: reads `(IX+d)`/`(IY+d)` (displacement
/// already latched in `cpu.displacement` by the decoder), writes back the
/// result, and — per the undocumented "result also to register" behaviour —
/// copies it into the register named by the low 3 bits, unless those bits
/// are 110 (memory-only).
pub(crate) fn op_ddfd_cb_rotate_shift(
    cpu: &mut Z80,
    opcode: u8,
    bus: &mut dyn Bus,
) -> u8 {
    let y = (opcode >> 3) & 7;
    let z = opcode & 7;
    let op = RotOp::decode(y);
    let addr = cpu.get_index_addr();
    let input = bus.read_byte(addr);
    let (result, carry) = op.apply(input, cpu.flag(Flag::C));
    bus.write_byte(addr, result);
    if z != 6 {
        cpu.set_reg8(z, result);
    }
    cpu.f = rot_flags(result, carry);
    15
}

/// DD-CB/FD-CB indexed `BIT b,(IX+d)`/`(IY+d)`. Never writes anywhere.
pub(crate) fn op_ddfd_cb_bit(cpu: &mut Z80, opcode: u8, bus: &mut dyn Bus) -> u8 {
    let b = (opcode >> 3) & 7;
    let addr = cpu.get_index_addr();
    let value = bus.read_byte(addr);
    apply_bit_flags(cpu, b, value, value);
    12
}

/// DD-CB/FD-CB indexed `SET b,(IX+d)` / `RES b,(IX+d)`, also copied into the
/// named register unless the low 3 bits are 110.
pub(crate) fn op_ddfd_cb_set_res(
    cpu: &mut Z80,
    opcode: u8,
    bus: &mut dyn Bus,
) -> u8 {
    let is_set = opcode & 0x40 != 0;
    let b = (opcode >> 3) & 7;
    let z = opcode & 7;
    let addr = cpu.get_index_addr();
    let value = bus.read_byte(addr);
    let result = if is_set { value | (1 << b) } else { value & !(1 << b) };
    bus.write_byte(addr, result);
    if z != 6 {
        cpu.set_reg8(z, result);
    }
    15
}

/// `RLD` — ED-prefixed, opcode 0x6F. 4-bit rotate through A and `(HL)`.
pub(crate) fn op_rld(cpu: &mut Z80, _opcode: u8, bus: &mut dyn Bus) -> u8 {
    let addr = cpu.get_hl();
    let m = bus.read_byte(addr);
    let a = cpu.a;
    let new_mem = ((m << 4) | (a & 0x0F)) & 0xFF;
    let new_a = (a & 0xF0) | (m >> 4);
    bus.write_byte(addr, new_mem);
    cpu.a = new_a;
    apply_rld_rrd_flags(cpu, new_a);
    14
}

/// `RRD` — ED-prefixed, opcode 0x67.
pub(crate) fn op_rrd(cpu: &mut Z80, _opcode: u8, bus: &mut dyn Bus) -> u8 {
    let addr = cpu.get_hl();
    let m = bus.read_byte(addr);
    let a = cpu.a;
    let new_mem = ((a << 4) | (m >> 4)) & 0xFF;
    let new_a = (a & 0xF0) | (m & 0x0F);
    bus.write_byte(addr, new_mem);
    cpu.a = new_a;
    apply_rld_rrd_flags(cpu, new_a);
    14
}

fn apply_rld_rrd_flags(cpu: &mut Z80, new_a: u8) {
    let mut f = cpu.f & (Flag::C as u8);
    if new_a & 0x80 != 0 {
        f |= Flag::S as u8;
    }
    if new_a == 0 {
        f |= Flag::Z as u8;
    }
    if parity(new_a) {
        f |= Flag::PV as u8;
    }
    f |= new_a & (Flag::X as u8 | Flag::Y as u8);
    cpu.f = f;
}
