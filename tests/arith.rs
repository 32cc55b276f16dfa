use bfjit::insn::{Add, Cmp, Dec, Inc, Movzx, Sub};
use bfjit::MemOp;
use bfjit::MemOp8;
use bfjit::{Asm, Imm32, Imm8};
use bfjit::{Reg32::*, Reg64::*};

macro_rules! emit {
    ($op:ident ( $($arg:expr),+ )) => {{
        let mut asm = Asm::new();
        asm.$op($($arg),+);
        asm.into_code()
    }};
}

#[test]
fn add_reg_reg() {
    assert_eq!(emit!(add(rdi, rsi)), [0x48, 0x01, 0xf7]);
}

#[test]
fn add_reg_imm32() {
    assert_eq!(
        emit!(add(rbx, Imm32::from(3i32))),
        [0x48, 0x81, 0xc3, 0x03, 0x00, 0x00, 0x00]
    );
}

#[test]
fn add_mem8_imm8() {
    let cell = MemOp8::from(MemOp::Indirect(rbx));
    assert_eq!(emit!(add(cell, Imm8::from(5u8))), [0x80, 0x03, 0x05]);
}

#[test]
fn sub_reg_reg() {
    assert_eq!(emit!(sub(rdi, rsi)), [0x48, 0x29, 0xf7]);
}

#[test]
fn sub_mem8_imm8() {
    let cell = MemOp8::from(MemOp::Indirect(rbx));
    assert_eq!(emit!(sub(cell, Imm8::from(2u8))), [0x80, 0x2b, 0x02]);
}

#[test]
fn cmp_mem8_imm8() {
    let cell = MemOp8::from(MemOp::Indirect(rbx));
    assert_eq!(emit!(cmp(cell, Imm8::from(0u8))), [0x80, 0x3b, 0x00]);
}

#[test]
fn inc_mem8() {
    let cell = MemOp8::from(MemOp::Indirect(rbx));
    assert_eq!(emit!(inc(cell)), [0xfe, 0x03]);
}

#[test]
fn dec_mem8() {
    let cell = MemOp8::from(MemOp::Indirect(rbx));
    assert_eq!(emit!(dec(cell)), [0xfe, 0x0b]);
}

#[test]
fn movzx_reg32_mem8() {
    let cell = MemOp8::from(MemOp::Indirect(rbx));
    assert_eq!(emit!(movzx(eax, cell)), [0x0f, 0xb6, 0x03]);
}

#[test]
fn movzx_reg32_mem8_extended_reg() {
    let cell = MemOp8::from(MemOp::Indirect(rbx));
    assert_eq!(emit!(movzx(r12d, cell)), [0x44, 0x0f, 0xb6, 0x23]);
}

