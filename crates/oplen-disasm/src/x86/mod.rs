//! 32-bit (IA-32) length decoding.

mod decoder;
mod opcodes;

pub use decoder::X86Disassembler;
