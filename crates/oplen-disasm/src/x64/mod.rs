//! x86-64 (AMD64) length decoding.

mod decoder;
mod opcodes;

pub use decoder::X64Disassembler;
