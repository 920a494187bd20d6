//! # oplen-core
//!
//! Model types for the oplen length disassembler. This crate defines the
//! decoded-instruction record shared by the x86 and x86-64 decoders:
//! prefix bookkeeping, opcode bytes, ModR/M, SIB, displacement, immediates,
//! PC-relative targets, and the in-band error flags.
//!
//! No decoding happens here; see the `oplen-disasm` crate.

pub mod arch;
pub mod inst;
pub mod prefix;

pub use arch::Bitness;
pub use inst::{Disp, ErrorFlags, Imm, Inst, ModRm, Rel, Sib};
pub use prefix::{ExtPrefix, PrefixGroups, Rex, Vex};
