//! Benchmarks for length-decoding throughput.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use oplen_disasm::{LengthDisassembler, X64Disassembler, X86Disassembler};

/// Sample x86-64 code: a small function with a realistic mix of moves,
/// arithmetic, a compare-and-branch diamond and the epilogue.
const X64_CODE: &[u8] = &[
    0x55, // push rbp
    0x48, 0x89, 0xE5, // mov rbp, rsp
    0x48, 0x83, 0xEC, 0x20, // sub rsp, 0x20
    0x48, 0x89, 0x7D, 0xF8, // mov [rbp-8], rdi
    0x48, 0x8B, 0x45, 0xF8, // mov rax, [rbp-8]
    0x48, 0x83, 0xC0, 0x01, // add rax, 1
    0x48, 0x89, 0x45, 0xF0, // mov [rbp-16], rax
    0x48, 0x83, 0x7D, 0xF0, 0x0A, // cmp qword [rbp-16], 10
    0x7E, 0x07, // jle .L1
    0xB8, 0x01, 0x00, 0x00, 0x00, // mov eax, 1
    0xEB, 0x05, // jmp .L2
    0xB8, 0x00, 0x00, 0x00, 0x00, // mov eax, 0
    0x48, 0x83, 0xC4, 0x20, // add rsp, 0x20
    0x5D, // pop rbp
    0xC3, // ret
];

/// Sample 32-bit code: the classic byte-copy loop.
const X86_CODE: &[u8] = &[
    0x55, 0x31, 0xD2, 0x89, 0xE5, 0x8B, 0x45, 0x08, 0x56, 0x8B, 0x75, 0x0C, 0x53, 0x8D, 0x58,
    0xFF, 0x0F, 0xB6, 0x0C, 0x16, 0x88, 0x4C, 0x13, 0x01, 0x83, 0xC2, 0x01, 0x84, 0xC9, 0x75,
    0xF1, 0x5B, 0x5E, 0x5D, 0xC3,
];

/// Larger code block for throughput testing (repeated pattern).
fn generate_block(pattern: &[u8], size: usize) -> Vec<u8> {
    let mut result = Vec::with_capacity(size);
    while result.len() < size {
        let remaining = size - result.len();
        let to_copy = remaining.min(pattern.len());
        result.extend_from_slice(&pattern[..to_copy]);
    }
    result
}

fn bench_x64_lengths(c: &mut Criterion) {
    let disasm = X64Disassembler::new();

    let mut group = c.benchmark_group("x64_lengths");

    group.bench_function("single_instruction", |b| {
        b.iter(|| {
            let _ = disasm.decode_at(black_box(&X64_CODE[1..4]), 0);
        })
    });

    group.bench_function("small_function", |b| {
        b.iter(|| {
            let _ = disasm.scan(black_box(X64_CODE), 0);
        })
    });

    for size in [1024, 4096, 16384, 65536] {
        let code = generate_block(X64_CODE, size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("throughput", size), &code, |b, code| {
            b.iter(|| {
                let _ = disasm.scan(black_box(code), 0);
            })
        });
    }

    group.finish();
}

fn bench_x86_lengths(c: &mut Criterion) {
    let disasm = X86Disassembler::new();

    let mut group = c.benchmark_group("x86_lengths");

    group.bench_function("small_function", |b| {
        b.iter(|| {
            let _ = disasm.scan(black_box(X86_CODE), 0);
        })
    });

    for size in [4096, 65536] {
        let code = generate_block(X86_CODE, size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("throughput", size), &code, |b, code| {
            b.iter(|| {
                let _ = disasm.scan(black_box(code), 0);
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_x64_lengths, bench_x86_lengths);
criterion_main!(benches);
