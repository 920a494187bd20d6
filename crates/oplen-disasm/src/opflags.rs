//! Decode directives driven by the opcode tables.

use bitflags::bitflags;

bitflags! {
    /// Per-opcode decode directives.
    ///
    /// Each of the four opcode tables maps an opcode byte to one of these
    /// bitsets; the decoder pipeline is data-driven by them. `ERROR` is the
    /// sentinel for encodings the tables do not assign.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpFlags: u16 {
        /// Instruction has a ModR/M byte.
        const RM = 1 << 0;
        /// ModR/M `reg` is an opcode extension; REX.B rather than REX.R
        /// widens it. Only meaningful in x86-64 tables.
        const OX = 1 << 1;
        /// The immediate is a PC-relative branch displacement.
        const REL = 1 << 2;
        /// 8-bit immediate.
        const I8 = 1 << 3;
        /// 16-bit immediate.
        const I16 = 1 << 4;
        /// 32-bit immediate; narrows to 16 bits under 0x66.
        const I32 = 1 << 5;
        /// The I32 immediate widens to 64 bits under REX.W. Only meaningful
        /// in x86-64 tables.
        const RW = 1 << 6;
        /// The immediate is a direct memory offset (`moffs`).
        const AM = 1 << 7;
        /// Instruction requires a VEX prefix.
        const VX = 1 << 8;
        /// Instruction requires 0x66 as a mandatory prefix.
        const MP = 1 << 9;
        /// Invalid-encoding sentinel.
        const ERROR = 1 << 15;
    }
}

impl OpFlags {
    /// ModR/M with an opcode extension in `reg`.
    pub const EX: Self = Self::RM.union(Self::OX);
    /// 8-bit PC-relative displacement.
    pub const R8: Self = Self::I8.union(Self::REL);
    /// 32-bit PC-relative displacement.
    pub const R32: Self = Self::I32.union(Self::REL);

    /// Returns true for the invalid-encoding sentinel.
    pub fn is_error(&self) -> bool {
        self.contains(Self::ERROR)
    }
}
