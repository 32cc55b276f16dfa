use crate::prelude::*;

impl Add<Reg64, Reg64> for Asm {
    fn add(&mut self, op1: Reg64, op2: Reg64) {
        self.encode_rr(&[0x01], op1, op2);
    }
}

impl Add<Reg64, Imm32> for Asm {
    fn add(&mut self, op1: Reg64, op2: Imm32) {
        self.encode_ri(0x81, 0x0, op1, op2);
    }
}

impl Add<MemOp8, Imm8> for Asm {
    fn add(&mut self, op1: MemOp8, op2: Imm8) {
        self.encode_mi(0x80, 0x0, op1.inner(), op2);
    }
}
