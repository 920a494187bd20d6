//! oplen - report instruction lengths and structure for raw machine code.
//!
//! Usage:
//!   oplen <file>                   Decode a raw code file as x86-64
//!   oplen --hex "55 48 89 e5"      Decode an inline hex string
//!   oplen <file> --arch x86        Decode as 32-bit code
//!   oplen <file> -o 0x40 -c 10     Start at 0x40, stop after 10 instructions
//!
//! With no input at all, a built-in 32-bit sample function is decoded.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use oplen_core::Inst;
use oplen_disasm::{LengthDisassembler, X64Disassembler, X86Disassembler};

mod input;

/// A small compiled function used when no input is given: prologue, a
/// byte-copy loop with a backwards jne, epilogue.
const SAMPLE: &[u8] = &[
    0x55, 0x31, 0xD2, 0x89, 0xE5, 0x8B, 0x45, 0x08, 0x56, 0x8B, 0x75, 0x0C, 0x53, 0x8D, 0x58,
    0xFF, 0x0F, 0xB6, 0x0C, 0x16, 0x88, 0x4C, 0x13, 0x01, 0x83, 0xC2, 0x01, 0x84, 0xC9, 0x75,
    0xF1, 0x5B, 0x5E, 0x5D, 0xC3,
];

#[derive(Parser)]
#[command(name = "oplen")]
#[command(about = "A streaming length disassembler for x86 and x86-64", long_about = None)]
struct Cli {
    /// Path to a raw machine-code file
    file: Option<PathBuf>,

    /// Inline hex string to decode instead of a file
    #[arg(long, conflicts_with = "file")]
    hex: Option<String>,

    /// Target architecture
    #[arg(short, long, value_enum, default_value_t = Arch::X64)]
    arch: Arch,

    /// Offset to start decoding at
    #[arg(short, long, default_value = "0", value_parser = parse_offset)]
    offset: usize,

    /// Maximum number of instructions to decode
    #[arg(short, long)]
    count: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Arch {
    X86,
    X64,
}

fn parse_offset(text: &str) -> Result<usize, String> {
    let trimmed = text.trim();
    let parsed = if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        usize::from_str_radix(hex, 16)
    } else {
        trimmed.parse()
    };
    parsed.map_err(|e| format!("invalid offset {trimmed:?}: {e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (code, arch) = match (&cli.file, &cli.hex) {
        (Some(path), _) => (
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?,
            cli.arch,
        ),
        (None, Some(hex)) => (input::parse_hex(hex).context("failed to parse hex string")?, cli.arch),
        // the built-in sample is 32-bit code
        (None, None) => (SAMPLE.to_vec(), Arch::X86),
    };

    if code.is_empty() {
        bail!("no bytes to decode");
    }
    input::check_offset(cli.offset, code.len())?;

    match arch {
        Arch::X86 => report(X86Disassembler::new(), &code, cli.offset, cli.count),
        Arch::X64 => report(X64Disassembler::new(), &code, cli.offset, cli.count),
    }

    Ok(())
}

/// Prints one line per instruction: offset, bytes, length, error markers
/// and the resolved target of PC-relative instructions.
fn report<D: LengthDisassembler>(disasm: D, code: &[u8], start: usize, count: Option<usize>) {
    let mut ip = start;
    let mut decoded = 0usize;

    while let Some(inst) = disasm.decode_at(code, ip) {
        if count.is_some_and(|limit| decoded >= limit) {
            break;
        }

        let end = (ip + inst.length as usize).min(code.len());
        let hex: String = code[ip..end].iter().map(|b| format!("{b:02x}")).collect();
        print!("{ip:08x}: {hex:<30}");

        if let Some(rel) = inst.rel {
            print!(" ; -> {:08x}", rel.target);
        }
        for marker in error_markers(&inst) {
            print!(" ; {marker}");
        }
        println!();

        ip += inst.length as usize;
        decoded += 1;
    }
}

fn error_markers(inst: &Inst) -> Vec<&'static str> {
    let mut markers = Vec::new();
    if inst.errors.opcode {
        markers.push("bad opcode");
    }
    if inst.errors.lock {
        markers.push("bad lock");
    }
    if inst.errors.length {
        markers.push("too long");
    }
    if inst.errors.novex {
        markers.push("needs vex");
    }
    if inst.errors.truncated {
        markers.push("truncated");
    }
    markers
}
