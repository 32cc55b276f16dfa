use crate::prelude::*;

impl Cmp<MemOp8, Imm8> for Asm {
    fn cmp(&mut self, op1: MemOp8, op2: Imm8) {
        self.encode_mi(0x80, 0x7, op1.inner(), op2);
    }
}
