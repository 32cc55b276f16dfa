//! Brainfuck IR → `x86-64` machine code emitter, built on the generic
//! encoder in [`crate::asm`].
//!
//! The whole compiled program is a single function. The tape pointer
//! arrives in the platform's first integer argument register and is moved
//! into `rbx` for the function's entire body: `rbx` is callee-saved under
//! both the System V and Windows x64 conventions, so it survives the
//! `bf_put`/`bf_get` calls untouched without any extra save/restore
//! around the call sites.

use std::collections::{HashMap, HashSet};

use crate::bridge;
use crate::error::Error;
use crate::ir::Inst;
use crate::prelude::*;

/// Register the compiled function's tape-pointer argument arrives in.
#[cfg(windows)]
const ARG0: Reg64 = Reg64::rcx;
#[cfg(not(windows))]
const ARG0: Reg64 = Reg64::rdi;

/// Low byte of the register `bf_put`'s single `u8` argument is passed in.
#[cfg(windows)]
const ARG0_8: Reg8 = Reg8::cl;
#[cfg(not(windows))]
const ARG0_8: Reg8 = Reg8::dil;

/// Register pinned as the tape pointer for the whole compiled function.
/// Callee-saved under both ABIs this crate targets, so a single `push`/`pop`
/// pair around the body is all the prologue/epilogue needs.
const TAPE: Reg64 = Reg64::rbx;

fn cell() -> MemOp8 {
    MemOp8::from(MemOp::Indirect(TAPE))
}

/// Emit native code for `prog`, returning the finished code buffer.
pub fn emit(prog: &[Inst]) -> Result<Vec<u8>, Error> {
    validate_labels(prog)?;

    let mut asm = Asm::new();
    let mut labels: HashMap<u32, Label> = HashMap::new();

    asm.push(TAPE);
    asm.mov(TAPE, ARG0);

    for inst in prog {
        match *inst {
            Inst::AddPtr(step) => emit_add_ptr(&mut asm, step),
            Inst::AddVal(delta) => emit_add_val(&mut asm, delta),
            Inst::Output => emit_output(&mut asm),
            Inst::Input => emit_input(&mut asm),
            Inst::Label(id) => {
                let lbl = labels.entry(id).or_insert_with(Label::new);
                asm.bind(lbl);
            }
            Inst::Jz(id) => {
                asm.cmp(cell(), Imm8::from(0u8));
                let lbl = labels.entry(id).or_insert_with(Label::new);
                asm.jz(lbl);
            }
            Inst::Jnz(id) => {
                asm.cmp(cell(), Imm8::from(0u8));
                let lbl = labels.entry(id).or_insert_with(Label::new);
                asm.jnz(lbl);
            }
        }
    }

    asm.pop(TAPE);
    asm.ret();

    Ok(asm.into_code())
}

/// Every `Jz`/`Jnz` target must resolve to a `Label` present in the same
/// program; catching this ahead of emission turns what would otherwise be a
/// panic in `Label::drop` (an unbound or unresolved label) into a regular
/// `Error::Emitter` the driver can report and exit on.
fn validate_labels(prog: &[Inst]) -> Result<(), Error> {
    let defined: HashSet<u32> = prog
        .iter()
        .filter_map(|inst| match inst {
            Inst::Label(id) => Some(*id),
            _ => None,
        })
        .collect();

    for inst in prog {
        if let Inst::Jz(target) | Inst::Jnz(target) = inst {
            if !defined.contains(target) {
                return Err(Error::Emitter {
                    message: format!("jump to undefined label {target}"),
                });
            }
        }
    }

    Ok(())
}

fn emit_add_ptr(asm: &mut Asm, step: i32) {
    match step {
        1 => asm.inc(TAPE),
        -1 => asm.dec(TAPE),
        _ => asm.add(TAPE, Imm32::from(step)),
    }
}

/// Brainfuck cells wrap modulo 256; fold an arbitrarily large fused delta
/// down into the signed byte range before picking an opcode.
fn emit_add_val(asm: &mut Asm, delta: i32) {
    let wrapped = delta.rem_euclid(256);
    let signed = if wrapped > 127 {
        wrapped - 256
    } else {
        wrapped
    } as i8;

    match signed {
        0 => {}
        1 => asm.inc(cell()),
        -1 => asm.dec(cell()),
        v => asm.add(cell(), Imm8::from(v)),
    }
}

fn emit_output(asm: &mut Asm) {
    asm.mov(ARG0_8, cell());
    asm.call_extern(bridge::bf_put as usize);
}

fn emit_input(asm: &mut Asm) {
    asm.call_extern(bridge::bf_get as usize);
    asm.mov(cell(), Reg8::al);
}
