//! x86-64 general-purpose register operands.

/// Common behavior needed by the encoder to compute `REX` bytes and `ModR/M`
/// register fields for any register width.
pub(crate) trait Reg: Copy {
    /// The register's encoding (0-15), ignoring any `REX` extension bit.
    fn idx(&self) -> u8;

    /// Whether a `REX` prefix is mandatory to encode this operand: either
    /// because its index needs the extension bit (`r8`-`r15` and friends), or
    /// because the operand width itself always requires `REX.W` (64-bit
    /// registers), or because the register is only reachable through `REX`
    /// (`spl`/`bpl`/`sil`/`dil`, which would otherwise decode as the legacy
    /// high-byte registers `ah`/`ch`/`dh`/`bh`).
    fn need_rex(&self) -> bool;

    /// Whether `REX.W` must be set for this operand's width.
    fn rexw(&self) -> bool;

    /// Whether this register's index needs the `REX` extension bit.
    fn is_ext(&self) -> bool {
        self.idx() >= 8
    }

    /// Whether using this register as a memory operand's base requires a
    /// `SIB` byte (true for `rsp`/`r12`, whose low 3 bits collide with the
    /// SIB-follows encoding of `ModR/M.rm`).
    fn need_sib(&self) -> bool {
        self.idx() & 0b111 == 0b100
    }

    /// Whether this register is a RIP-relative addressing pseudo-operand.
    /// None of the registers defined in this crate are, but the encoder's
    /// memory-operand assertions reference this for completeness.
    fn is_pc_rel(&self) -> bool {
        false
    }
}

macro_rules! impl_gpr {
    ($name:ident, rexw: $rexw:expr, $($variant:ident = $idx:expr),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[allow(non_camel_case_types)]
        pub enum $name {
            $($variant = $idx),+
        }

        impl Reg for $name {
            fn idx(&self) -> u8 {
                *self as u8
            }

            fn need_rex(&self) -> bool {
                $rexw || self.is_ext()
            }

            fn rexw(&self) -> bool {
                $rexw
            }
        }
    };
}

impl_gpr!(
    Reg64, rexw: true,
    rax = 0, rcx = 1, rdx = 2, rbx = 3, rsp = 4, rbp = 5, rsi = 6, rdi = 7,
    r8 = 8, r9 = 9, r10 = 10, r11 = 11, r12 = 12, r13 = 13, r14 = 14, r15 = 15,
);

impl_gpr!(
    Reg32, rexw: false,
    eax = 0, ecx = 1, edx = 2, ebx = 3, esp = 4, ebp = 5, esi = 6, edi = 7,
    r8d = 8, r9d = 9, r10d = 10, r11d = 11, r12d = 12, r13d = 13, r14d = 14, r15d = 15,
);

impl_gpr!(
    Reg16, rexw: false,
    ax = 0, cx = 1, dx = 2, bx = 3, sp = 4, bp = 5, si = 6, di = 7,
    r8w = 8, r9w = 9, r10w = 10, r11w = 11, r12w = 12, r13w = 13, r14w = 14, r15w = 15,
);

/// 8-bit registers. `spl`/`bpl`/`sil`/`dil` require a `REX` prefix to be
/// reachable at all -- without one the same encoding addresses the legacy
/// high-byte registers `ah`/`ch`/`dh`/`bh`, which this crate does not expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum Reg8 {
    al = 0,
    cl = 1,
    dl = 2,
    bl = 3,
    spl = 4,
    bpl = 5,
    sil = 6,
    dil = 7,
    r8b = 8,
    r9b = 9,
    r10b = 10,
    r11b = 11,
    r12b = 12,
    r13b = 13,
    r14b = 14,
    r15b = 15,
}

impl Reg for Reg8 {
    fn idx(&self) -> u8 {
        *self as u8
    }

    fn need_rex(&self) -> bool {
        matches!(self, Reg8::spl | Reg8::bpl | Reg8::sil | Reg8::dil) || self.is_ext()
    }

    fn rexw(&self) -> bool {
        false
    }
}
