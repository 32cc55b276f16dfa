//! Crate prelude: the most commonly needed encoder types in one `use`.

pub use crate::asm::Asm;
pub use crate::imm::{Imm16, Imm32, Imm64, Imm8};
pub use crate::label::Label;
pub use crate::mem::{MemOp, MemOp8};
pub use crate::reg::{Reg16, Reg32, Reg64, Reg8};

pub use crate::insn::{
    Add, Call, Cmovnz, Cmovz, Cmp, Dec, Inc, Jmp, Jnz, Jz, Mov, Movzx, Pop, Push, Sub, Test, Xor,
};
