//! The `x86-64` jit assembler: a small, reusable instruction encoder built
//! around `REX`/`ModR/M`/`SIB` byte construction and two-pass label/jump
//! patching. The Brainfuck-specific emitter (`crate::codegen`) is built on
//! top of this layer instead of hand-emitting byte sequences.

use crate::imm::{Imm, Imm16, Imm32, Imm8};
use crate::label::Label;
use crate::mem::MemOp;
use crate::reg::Reg;
use crate::{Reg16, Reg32, Reg64, Reg8};

/// Encode the `REX` byte.
const fn rex(w: bool, r: u8, x: u8, b: u8) -> u8 {
    let w = if w { 1 } else { 0 };
    let r = (r >> 3) & 1;
    let x = (x >> 3) & 1;
    let b = (b >> 3) & 1;
    0b0100_0000 | ((w & 1) << 3) | (r << 2) | (x << 1) | b
}

/// Encode the `ModR/M` byte.
const fn modrm(mod_: u8, reg: u8, rm: u8) -> u8 {
    ((mod_ & 0b11) << 6) | ((reg & 0b111) << 3) | (rm & 0b111)
}

/// Encode the `SIB` byte.
const fn sib(scale: u8, index: u8, base: u8) -> u8 {
    ((scale & 0b11) << 6) | ((index & 0b111) << 3) | (base & 0b111)
}

/// Resolve a [`MemOp`] to its `ModR/M` addressing mode bits and `rm` field,
/// asserting the encoding constraints that mode implies.
fn mem_mode_rm(op: &MemOp) -> (u8, u8) {
    match *op {
        MemOp::Indirect(base) => {
            assert!(!base.need_sib() && !base.is_pc_rel());
            (0b00, base.idx())
        }
        MemOp::IndirectDisp(base, _) => {
            assert!(!base.need_sib());
            (0b10, base.idx())
        }
        MemOp::IndirectBaseIndex(..) => {
            assert!(!op.base().is_pc_rel());
            // Using rsp as the index register is interpreted as "no index";
            // disallow it as a guard against an easy-to-misuse encoding.
            //   https://wiki.osdev.org/X86-64_Instruction_Encoding#32.2F64-bit_addressing_2
            assert!(!matches!(op.index(), Reg64::rsp));
            (0b00, 0b100)
        }
    }
}

/// Emit the trailing disp32/SIB bytes (if any) that follow a `ModR/M` byte
/// for a given [`MemOp`].
fn emit_mem_tail(asm: &mut Asm, op: MemOp) {
    match op {
        MemOp::Indirect(..) => {}
        MemOp::IndirectDisp(_, disp) => asm.emit(&disp.to_ne_bytes()),
        MemOp::IndirectBaseIndex(base, index) => asm.emit(&[sib(0, index.idx(), base.idx())]),
    }
}

/// `x86-64` jit assembler: a growable code buffer plus label-relocation
/// bookkeeping.
pub struct Asm {
    buf: Vec<u8>,
}

impl Default for Asm {
    fn default() -> Self {
        Self::new()
    }
}

impl Asm {
    /// Create a new, empty `x86-64` assembler.
    pub fn new() -> Asm {
        // Some random default capacity.
        Asm {
            buf: Vec::with_capacity(1024),
        }
    }

    /// Consume the assembler and get the emitted code.
    pub fn into_code(self) -> Vec<u8> {
        self.buf
    }

    /// Emit a slice of bytes.
    pub(crate) fn emit(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Emit a slice of optional bytes, skipping the `None`s.
    fn emit_optional(&mut self, bytes: &[Option<u8>]) {
        for byte in bytes.iter().filter_map(|&b| b) {
            self.buf.push(byte);
        }
    }

    /// Emit a slice of bytes at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `[pos..pos+len)` indexes out of bounds of the code buffer.
    fn emit_at(&mut self, pos: usize, bytes: &[u8]) {
        let buf = self
            .buf
            .get_mut(pos..pos + bytes.len())
            .expect("relocation offset out of bounds of the code buffer");
        buf.copy_from_slice(bytes);
    }

    /// Bind the [`Label`] to the current location, patching any jumps that
    /// already reference it.
    pub fn bind(&mut self, label: &mut Label) {
        label.bind(self.buf.len());
        self.resolve(label);
    }

    /// If the [`Label`] is bound, patch every pending relocation for it.
    fn resolve(&mut self, label: &mut Label) {
        if let Some(loc) = label.location() {
            let loc = i32::try_from(loc).expect("label location did not fit into i32");

            for off in label.offsets_mut().drain() {
                // Displacement is relative to the next instruction following
                // the jump; the recorded offset is the first byte of the
                // disp32, so account for its 4 bytes in the computation.
                let disp32 =
                    loc - i32::try_from(off).expect("label offset did not fit into i32") - 4;
                self.emit_at(off, &disp32.to_ne_bytes());
            }
        }
    }

    // -- Encode utilities.

    /// Encode a register-register instruction (`MR` form: op1 -> `rm`,
    /// op2 -> `reg`).
    pub(crate) fn encode_rr<T: Reg>(&mut self, opc: &[u8], op1: T, op2: T)
    where
        Self: EncodeRR<T>,
    {
        let modrm = modrm(0b11, op2.idx(), op1.idx());
        let prefix = <Self as EncodeRR<T>>::legacy_prefix();
        let rex = <Self as EncodeRR<T>>::rex(op1, op2);

        self.emit_optional(&[prefix, rex]);
        self.emit(opc);
        self.emit(&[modrm]);
    }

    /// Encode an opcode+register (`OI` form) instruction; the register index
    /// is folded into the low 3 bits of the opcode.
    pub(crate) fn encode_oi<T: Reg, U: Imm>(&mut self, opc: u8, op1: T, op2: U)
    where
        Self: EncodeR<T>,
    {
        let opc = opc + (op1.idx() & 0b111);
        let prefix = <Self as EncodeR<T>>::legacy_prefix();
        let rex = <Self as EncodeR<T>>::rex(op1);

        self.emit_optional(&[prefix, rex]);
        self.emit(&[opc]);
        self.emit(op2.bytes());
    }

    /// Encode a register instruction (`M` form: op1 -> `rm`, the opcode
    /// extension goes in `reg`).
    pub(crate) fn encode_r<T: Reg>(&mut self, opc: u8, opc_ext: u8, op1: T)
    where
        Self: EncodeR<T>,
    {
        let modrm = modrm(0b11, opc_ext, op1.idx());
        let prefix = <Self as EncodeR<T>>::legacy_prefix();
        let rex = <Self as EncodeR<T>>::rex(op1);

        self.emit_optional(&[prefix, rex]);
        self.emit(&[opc, modrm]);
    }

    /// Encode a register-immediate instruction (`MI` form with a register
    /// `rm`: the opcode extension goes in `reg`, the immediate follows).
    pub(crate) fn encode_ri<T: Reg, U: Imm>(&mut self, opc: u8, opc_ext: u8, op1: T, op2: U)
    where
        Self: EncodeR<T>,
    {
        let modrm = modrm(0b11, opc_ext, op1.idx());
        let prefix = <Self as EncodeR<T>>::legacy_prefix();
        let rex = <Self as EncodeR<T>>::rex(op1);

        self.emit_optional(&[prefix, rex]);
        self.emit(&[opc, modrm]);
        self.emit(op2.bytes());
    }

    /// Encode a memory instruction with an opcode-extension `reg` field and
    /// no register/immediate operand (used by `inc`/`dec` on a memory
    /// operand).
    pub(crate) fn encode_m(&mut self, opc: u8, opc_ext: u8, op1: MemOp) {
        let (mode, rm) = mem_mode_rm(&op1);
        let modrm = modrm(mode, opc_ext, rm);

        let rex = if op1.base().is_ext() {
            Some(rex(false, 0, op1.index().idx(), op1.base().idx()))
        } else {
            None
        };

        self.emit_optional(&[rex]);
        self.emit(&[opc, modrm]);
        emit_mem_tail(self, op1);
    }

    /// Encode a memory-immediate instruction.
    pub(crate) fn encode_mi<T: Imm>(&mut self, opc: u8, opc_ext: u8, op1: MemOp, op2: T)
    where
        Self: EncodeMI<T>,
    {
        let (mode, rm) = mem_mode_rm(&op1);
        let modrm = modrm(mode, opc_ext, rm);

        let prefix = <Self as EncodeMI<T>>::legacy_prefix();
        let rex = <Self as EncodeMI<T>>::rex(&op1);

        self.emit_optional(&[prefix, rex]);
        self.emit(&[opc, modrm]);
        emit_mem_tail(self, op1);
        self.emit(op2.bytes());
    }

    /// Encode a memory-register instruction (`MR` form: op1 -> `rm`,
    /// op2 -> `reg`). `opc` may be a multi-byte opcode (e.g. `0F B6` for
    /// `movzx`).
    pub(crate) fn encode_mr<T: Reg>(&mut self, opc: &[u8], op1: MemOp, op2: T)
    where
        Self: EncodeMR<T>,
    {
        let (mode, rm) = mem_mode_rm(&op1);
        let modrm = modrm(mode, op2.idx(), rm);

        let prefix = <Self as EncodeMR<T>>::legacy_prefix();
        let rex = <Self as EncodeMR<T>>::rex(&op1, op2);

        self.emit_optional(&[prefix, rex]);
        self.emit(opc);
        self.emit(&[modrm]);
        emit_mem_tail(self, op1);
    }

    /// Encode a register-memory instruction (`RM` form: op1 -> `reg`,
    /// op2 -> `rm`).
    pub(crate) fn encode_rm<T: Reg>(&mut self, opc: &[u8], op1: T, op2: MemOp)
    where
        Self: EncodeMR<T>,
    {
        self.encode_mr(opc, op2, op1);
    }

    /// Encode an unconditional or conditional jump to a [`Label`], recording
    /// the relocation to patch once the label is bound.
    pub(crate) fn encode_jmp_label(&mut self, opc: &[u8], op1: &mut Label) {
        self.emit(opc);

        // Record the relocation offset at the first byte of the disp32.
        op1.record_offset(self.buf.len());

        // Placeholder disp32, patched once the label is bound.
        self.emit(&[0u8; 4]);

        self.resolve(op1);
    }

    /// Emit a direct `call rel32` to `target` if the displacement fits in 32
    /// bits (computed relative to the end of the 5-byte `call` instruction);
    /// otherwise fall back to `mov rax, imm64; call rax`. This choice is
    /// re-evaluated at every call site since the offset depends on where the
    /// code buffer and the external symbol happen to land in memory.
    pub(crate) fn call_extern(&mut self, target: usize) {
        let call_len = 5; // E8 + rel32
        let next_instr = self.buf.len() as isize + call_len;
        let diff = target as isize - next_instr;

        if let Ok(rel) = i32::try_from(diff) {
            self.emit(&[0xe8]);
            self.emit(&rel.to_ne_bytes());
        } else {
            // mov rax, imm64
            self.emit(&[0x48, 0xb8]);
            self.emit(&(target as u64).to_ne_bytes());
            // call rax
            self.emit(&[0xff, 0xd0]);
        }
    }
}

// -- Encoder helper traits.
//
// Each of these picks the legacy prefix (only 16-bit operands need `0x66`)
// and computes the `REX` byte, if any, for one operand shape.

/// Encode helper for register-register instructions.
pub(crate) trait EncodeRR<T: Reg> {
    fn legacy_prefix() -> Option<u8> {
        None
    }

    fn rex(op1: T, op2: T) -> Option<u8> {
        if op1.need_rex() || op2.need_rex() {
            Some(rex(op1.rexw(), op2.idx(), 0, op1.idx()))
        } else {
            None
        }
    }
}

impl EncodeRR<Reg8> for Asm {}
impl EncodeRR<Reg32> for Asm {}
impl EncodeRR<Reg16> for Asm {
    fn legacy_prefix() -> Option<u8> {
        Some(0x66)
    }
}
impl EncodeRR<Reg64> for Asm {}

/// Encode helper for register instructions.
pub(crate) trait EncodeR<T: Reg> {
    fn legacy_prefix() -> Option<u8> {
        None
    }

    fn rex(op1: T) -> Option<u8> {
        if op1.need_rex() {
            Some(rex(op1.rexw(), 0, 0, op1.idx()))
        } else {
            None
        }
    }
}

impl EncodeR<Reg8> for Asm {}
impl EncodeR<Reg32> for Asm {}
impl EncodeR<Reg16> for Asm {
    fn legacy_prefix() -> Option<u8> {
        Some(0x66)
    }
}
impl EncodeR<Reg64> for Asm {}

/// Encode helper for memory-register instructions.
pub(crate) trait EncodeMR<T: Reg> {
    fn legacy_prefix() -> Option<u8> {
        None
    }

    fn rex(op1: &MemOp, op2: T) -> Option<u8> {
        if op2.need_rex() || op1.base().is_ext() {
            Some(rex(
                op2.rexw(),
                op2.idx(),
                op1.index().idx(),
                op1.base().idx(),
            ))
        } else {
            None
        }
    }
}

impl EncodeMR<Reg8> for Asm {}
impl EncodeMR<Reg16> for Asm {
    fn legacy_prefix() -> Option<u8> {
        Some(0x66)
    }
}
impl EncodeMR<Reg32> for Asm {}
impl EncodeMR<Reg64> for Asm {}

/// Encode helper for memory-immediate instructions.
pub(crate) trait EncodeMI<T: Imm> {
    fn legacy_prefix() -> Option<u8> {
        None
    }

    fn rex(op1: &MemOp) -> Option<u8> {
        if op1.base().is_ext() {
            Some(rex(false, 0, op1.index().idx(), op1.base().idx()))
        } else {
            None
        }
    }
}

impl EncodeMI<Imm8> for Asm {}
impl EncodeMI<Imm16> for Asm {
    fn legacy_prefix() -> Option<u8> {
        Some(0x66)
    }
}
impl EncodeMI<Imm32> for Asm {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_extern_uses_rel32_when_it_fits() {
        // Emitted at the start of an empty buffer: the 5-byte `call`
        // instruction ends at offset 5, so a target at 0x105 is exactly
        // +0x100 away.
        let mut asm = Asm::new();
        asm.call_extern(0x105);
        assert_eq!(asm.into_code(), [0xe8, 0x00, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn call_extern_falls_back_to_indirect_call_when_rel32_overflows() {
        let mut asm = Asm::new();
        asm.call_extern(usize::MAX / 2);
        let code = asm.into_code();
        assert_eq!(code[0], 0x48);
        assert_eq!(code[1], 0xb8);
        assert_eq!(code[10], 0xff);
        assert_eq!(code[11], 0xd0);
    }
}
