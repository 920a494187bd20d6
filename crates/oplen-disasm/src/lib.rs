//! # oplen-disasm
//!
//! Streaming length decoders for x86 and x86-64 machine code.
//!
//! Given a borrowed byte buffer, the decoders report the length of each
//! instruction together with a structural breakdown of its fields (legacy
//! prefixes, REX/VEX, opcode bytes, ModR/M, SIB, displacement, immediates,
//! PC-relative target). No mnemonics, no register names: the minimum a
//! binary rewriter, hooking engine or code scanner needs.
//!
//! Two parallel state machines are provided:
//! - [`x86::X86Disassembler`] - 32-bit operand/address defaults, VEX, 3DNow!
//! - [`x64::X64Disassembler`] - REX, VEX, 64-bit widening rules
//!
//! Malformed encodings never abort a decode: the record comes back with
//! diagnostic flags set and a length that still makes forward progress.

pub mod cursor;
pub mod opflags;
pub mod traits;
pub mod x64;
pub mod x86;

mod util;

pub use cursor::{Cursor, X64Cursor, X86Cursor};
pub use opflags::OpFlags;
pub use traits::{LengthDisassembler, MAX_LEN};
pub use x64::X64Disassembler;
pub use x86::X86Disassembler;
