use super::Movzx;
use crate::{Asm, MemOp8, Reg32};

impl Movzx<Reg32, MemOp8> for Asm {
    fn movzx(&mut self, op1: Reg32, op2: MemOp8) {
        self.encode_rm(&[0x0f, 0xb6], op1, op2.inner());
    }
}
