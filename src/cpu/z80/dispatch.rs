//! Fixed-size function-pointer dispatch tables for the root, CB, ED and
//! DD-CB/FD-CB opcode spaces, built once behind a `OnceLock`.
//!
//! DD/FD do not get their own 256-entry tables: every opcode whose register
//! field does not touch H, L, (HL) or the HL pair is dispatched straight out
//! of the root table, with `index_mode` simply unconsumed by that handler.
//! That is also the entire mechanism behind "a DD/FD prefix not followed by
//! a recognised opcode executes the following byte as a root opcode" — it
//! falls out of this routing rather than being special-cased.

use std::sync::OnceLock;

use super::{IndexMode, Z80};
use crate::bus::Bus;
use super::{alu, bit, block, branch, load_store, stack};

pub(crate) type Handler = fn(&mut Z80, u8, &mut dyn Bus) -> u8;

fn op_nop(_cpu: &mut Z80, _opcode: u8, _bus: &mut dyn Bus) -> u8 {
    4
}

/// Fallback for an ED opcode with no defined effect: consumes 8 T-states
/// total and otherwise does nothing. The ED prefix itself supplies 4 of
/// those T-states, this handler supplies the other 4.
fn op_ed_unmapped(_cpu: &mut Z80, opcode: u8, _bus: &mut dyn Bus) -> u8 {
    #[cfg(debug_assertions)]
    eprintln!("z80: unmapped ED opcode {opcode:#04x}, treated as timed NOP");
    4
}

fn classify_root(op: u8) -> Handler {
    let x = op >> 6;
    let y = (op >> 3) & 7;
    let z = op & 7;
    let q = y & 1;

    match x {
        0 => match z {
            0 => match y {
                0 => op_nop,
                1 => load_store::op_ex_af_af,
                2 => branch::op_djnz,
                3 => branch::op_jr_e,
                4..=7 => branch::op_jr_cc_e,
                _ => unreachable!(),
            },
            1 => {
                if q == 0 {
                    load_store::op_ld_rp_nn
                } else {
                    alu::op_add_hl_rr
                }
            }
            2 => load_store::op_ld_mem_a_group,
            3 => alu::op_inc_dec_rp,
            4 | 5 => alu::op_inc_dec_r,
            6 => load_store::op_ld_r_n,
            7 => match y {
                0..=3 => alu::op_rotate_a,
                4 => alu::op_daa,
                5 => alu::op_cpl,
                6 => alu::op_scf,
                7 => alu::op_ccf,
                _ => unreachable!(),
            },
            _ => unreachable!(),
        },
        1 => load_store::op_ld_r_r,
        2 => alu::op_alu_r,
        3 => match z {
            0 => branch::op_ret_cc,
            1 => {
                if q == 0 {
                    stack::op_pop
                } else {
                    match y >> 1 {
                        0 => branch::op_ret,
                        1 => load_store::op_exx,
                        2 => branch::op_jp_hl,
                        3 => load_store::op_ld_sp_hl,
                        _ => unreachable!(),
                    }
                }
            }
            2 => branch::op_jp_cc_nn,
            3 => match y {
                0 => branch::op_jp_nn,
                1 => op_nop, // 0xCB — intercepted by the outer decoder, never reached
                2 => load_store::op_out_n_a,
                3 => load_store::op_in_a_n,
                4 => load_store::op_ex_sp_hl,
                5 => load_store::op_ex_de_hl,
                6 => branch::op_di,
                7 => branch::op_ei,
                _ => unreachable!(),
            },
            4 => branch::op_call_cc_nn,
            5 => {
                if q == 0 {
                    stack::op_push
                } else {
                    match y >> 1 {
                        0 => branch::op_call_nn,
                        // 0xDD / 0xED / 0xFD — intercepted by the outer decoder.
                        1 | 2 | 3 => op_nop,
                        _ => unreachable!(),
                    }
                }
            }
            6 => alu::op_alu_n,
            7 => branch::op_rst,
            _ => unreachable!(),
        },
        _ => unreachable!(),
    }
}

fn classify_cb(op: u8) -> Handler {
    let x = op >> 6;
    let z = op & 7;
    match x {
        0 => {
            if z == 6 {
                bit::op_cb_rotate_shift_hl
            } else {
                bit::op_cb_rotate_shift_r
            }
        }
        1 => {
            if z == 6 {
                bit::op_cb_bit_hl
            } else {
                bit::op_cb_bit_r
            }
        }
        _ => {
            if z == 6 {
                bit::op_cb_set_res_hl
            } else {
                bit::op_cb_set_res_r
            }
        }
    }
}

fn classify_ed(op: u8) -> Handler {
    let x = op >> 6;
    let y = (op >> 3) & 7;
    let z = op & 7;

    if x == 2 {
        return if (4..=7).contains(&y) && z <= 3 {
            match z {
                0 => block::op_ldi_ldd,
                1 => block::op_cpi_cpd,
                2 => block::op_ini_ind,
                3 => block::op_outi_outd,
                _ => unreachable!(),
            }
        } else {
            op_ed_unmapped
        };
    }

    if x != 1 {
        return op_ed_unmapped;
    }

    match z {
        0 => load_store::op_in_r_c,
        1 => load_store::op_out_c_r,
        2 => {
            if y & 1 == 0 {
                alu::op_sbc_hl_rr
            } else {
                alu::op_adc_hl_rr
            }
        }
        3 => load_store::op_ld_rp_nn_ed,
        4 => alu::op_neg,
        5 => branch::op_retn,
        6 => branch::op_im,
        7 => match y {
            0 => load_store::op_ld_ir_a,
            1 => load_store::op_ld_ir_a,
            2 => load_store::op_ld_a_ir,
            3 => load_store::op_ld_a_ir,
            4 => bit::op_rrd,
            5 => bit::op_rld,
            _ => op_ed_unmapped,
        },
        _ => unreachable!(),
    }
}

fn classify_ddfd_cb(op: u8) -> Handler {
    match op >> 6 {
        0 => bit::op_ddfd_cb_rotate_shift,
        1 => bit::op_ddfd_cb_bit,
        _ => bit::op_ddfd_cb_set_res,
    }
}

fn build_table(classify: fn(u8) -> Handler) -> [Handler; 256] {
    let mut table: [Handler; 256] = [op_nop; 256];
    for (op, slot) in table.iter_mut().enumerate() {
        *slot = classify(op as u8);
    }
    table
}

fn root_table() -> &'static [Handler; 256] {
    static TABLE: OnceLock<[Handler; 256]> = OnceLock::new();
    TABLE.get_or_init(|| build_table(classify_root))
}

fn cb_table() -> &'static [Handler; 256] {
    static TABLE: OnceLock<[Handler; 256]> = OnceLock::new();
    TABLE.get_or_init(|| build_table(classify_cb))
}

fn ed_table() -> &'static [Handler; 256] {
    static TABLE: OnceLock<[Handler; 256]> = OnceLock::new();
    TABLE.get_or_init(|| build_table(classify_ed))
}

fn ddfd_cb_table() -> &'static [Handler; 256] {
    static TABLE: OnceLock<[Handler; 256]> = OnceLock::new();
    TABLE.get_or_init(|| build_table(classify_ddfd_cb))
}

/// Execute exactly one instruction, including any prefix chain, starting
/// from `cpu.pc`. R is bumped once per prefix byte and once for the final
/// opcode; the DD-CB/FD-CB displacement byte is the one fetch that does
/// not bump it.
pub(crate) fn dispatch(cpu: &mut Z80, bus: &mut dyn Bus) -> u32 {
    let mut total = 0u32;
    loop {
        let op = cpu.fetch_opcode(bus);
        match op {
            0xDD => {
                cpu.index_mode = IndexMode::Ix;
                total += 4;
            }
            0xFD => {
                cpu.index_mode = IndexMode::Iy;
                total += 4;
            }
            0xCB => {
                if cpu.index_mode == IndexMode::Hl {
                    let sub = cpu.fetch_opcode(bus);
                    total += 4 + cb_table()[sub as usize](cpu, sub, bus) as u32;
                } else {
                    let d = bus.read_byte(cpu.pc);
                    cpu.pc = cpu.pc.wrapping_add(1);
                    cpu.displacement = d as i8;
                    let sub = bus.read_byte(cpu.pc);
                    cpu.pc = cpu.pc.wrapping_add(1);
                    // The DD/FD prefix byte's own 4 T-states were already
                    // added when it was consumed above; this adds the CB
                    // byte's 4, leaving the handler to cover the rest.
                    total += 4 + ddfd_cb_table()[sub as usize](cpu, sub, bus) as u32;
                }
                break;
            }
            0xED => {
                let sub = cpu.fetch_opcode(bus);
                total += 4 + ed_table()[sub as usize](cpu, sub, bus) as u32;
                break;
            }
            _ => {
                total += root_table()[op as usize](cpu, op, bus) as u32;
                break;
            }
        }
    }
    total
}
