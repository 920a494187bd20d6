//! Property-based tests for the length decoders.
//!
//! These verify invariants that must hold for arbitrary input:
//! - Decoding never panics and never reads out of bounds
//! - Lengths stay within 1..=15 and partition the consumed buffer
//! - Structural implications (SIB needs ModR/M, rel consumes the imm slot)
//! - PC-relative targets are exact modular arithmetic
//! - Decoding is deterministic

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use oplen_disasm::{LengthDisassembler, X64Disassembler, X86Disassembler};

fn check_structure(inst: &oplen_core::Inst) -> Result<(), TestCaseError> {
    if inst.has_sib() {
        prop_assert!(inst.has_modrm(), "SIB without ModR/M");
    }
    if inst.has_imm2() {
        prop_assert!(inst.has_imm(), "imm2 without imm");
    }
    if inst.has_rel() {
        prop_assert!(!inst.has_imm(), "rel must consume the imm slot");
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10000))]

    /// Decoding arbitrary bytes never panics (both architectures).
    #[test]
    fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..32)) {
        let _ = X86Disassembler::new().decode_at(&bytes, 0);
        let _ = X64Disassembler::new().decode_at(&bytes, 0);
    }

    /// Decoded lengths stay within the architectural bounds and never
    /// overrun the buffer.
    #[test]
    fn x64_length_is_bounded(bytes in prop::collection::vec(any::<u8>(), 1..32)) {
        let inst = X64Disassembler::new().decode_at(&bytes, 0).unwrap();
        prop_assert!(inst.length >= 1);
        prop_assert!(usize::from(inst.length) <= 15);
        prop_assert!(usize::from(inst.length) <= bytes.len());
    }

    #[test]
    fn x86_length_is_bounded(bytes in prop::collection::vec(any::<u8>(), 1..32)) {
        let inst = X86Disassembler::new().decode_at(&bytes, 0).unwrap();
        prop_assert!(inst.length >= 1);
        prop_assert!(usize::from(inst.length) <= 15);
        prop_assert!(usize::from(inst.length) <= bytes.len());
    }

    /// Structural implications hold for every decode.
    #[test]
    fn x64_structure_invariants(bytes in prop::collection::vec(any::<u8>(), 1..32)) {
        let inst = X64Disassembler::new().decode_at(&bytes, 0).unwrap();
        check_structure(&inst)?;
    }

    #[test]
    fn x86_structure_invariants(bytes in prop::collection::vec(any::<u8>(), 1..32)) {
        let inst = X86Disassembler::new().decode_at(&bytes, 0).unwrap();
        check_structure(&inst)?;
    }

    /// `rel.target == ip + length + offset` in the architecture's width.
    #[test]
    fn x64_rel_target_arithmetic(
        bytes in prop::collection::vec(any::<u8>(), 1..32),
        ip in 0usize..16,
    ) {
        if let Some(inst) = X64Disassembler::new().decode_at(&bytes, ip) {
            if let Some(rel) = inst.rel {
                let expected = (ip as u64)
                    .wrapping_add(u64::from(inst.length))
                    .wrapping_add(rel.offset as i64 as u64);
                prop_assert_eq!(rel.target, expected);
            }
        }
    }

    #[test]
    fn x86_rel_target_arithmetic(
        bytes in prop::collection::vec(any::<u8>(), 1..32),
        ip in 0usize..16,
    ) {
        if let Some(inst) = X86Disassembler::new().decode_at(&bytes, ip) {
            if let Some(rel) = inst.rel {
                let expected = (ip as u32)
                    .wrapping_add(u32::from(inst.length))
                    .wrapping_add(rel.offset as u32);
                prop_assert_eq!(rel.target, u64::from(expected));
            }
        }
    }

    /// Decoding is deterministic.
    #[test]
    fn decode_is_deterministic(bytes in prop::collection::vec(any::<u8>(), 1..32)) {
        let disasm = X64Disassembler::new();
        let a = disasm.decode_at(&bytes, 0);
        let b = disasm.decode_at(&bytes, 0);
        prop_assert_eq!(a, b);
    }

    /// Sequential decoding partitions the buffer: every byte is covered
    /// exactly once and the lengths sum to the buffer size.
    #[test]
    fn x64_scan_partitions_buffer(bytes in prop::collection::vec(any::<u8>(), 16..128)) {
        let insts = X64Disassembler::new().scan(&bytes, 0);
        let mut expected_ip = 0usize;
        for (ip, inst) in &insts {
            prop_assert_eq!(*ip, expected_ip, "gap or overlap at {:#x}", ip);
            prop_assert!(inst.length >= 1);
            expected_ip += usize::from(inst.length);
        }
        prop_assert_eq!(expected_ip, bytes.len());
    }

    #[test]
    fn x86_scan_partitions_buffer(bytes in prop::collection::vec(any::<u8>(), 16..128)) {
        let insts = X86Disassembler::new().scan(&bytes, 0);
        let total: usize = insts.iter().map(|(_, inst)| usize::from(inst.length)).sum();
        prop_assert_eq!(total, bytes.len());
    }

    /// The aggregate error view matches the individual flags.
    #[test]
    fn error_flag_aggregation(bytes in prop::collection::vec(any::<u8>(), 1..32)) {
        let inst = X64Disassembler::new().decode_at(&bytes, 0).unwrap();
        let errors = inst.errors;
        let expected = errors.opcode
            || errors.operand
            || errors.length
            || errors.lock
            || errors.novex
            || errors.truncated;
        prop_assert_eq!(inst.is_error(), expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// REX-prefixed decodes never panic and keep the REX bits consistent.
    #[test]
    fn x64_rex_handling(rex in 0x40u8..=0x4F, opcode in any::<u8>(), tail in prop::collection::vec(any::<u8>(), 0..16)) {
        let mut bytes = vec![rex, opcode];
        bytes.extend(tail);
        let inst = X64Disassembler::new().decode_at(&bytes, 0).unwrap();
        if let Some(r) = inst.rex() {
            prop_assert_eq!(r.w, rex & 0x08 != 0);
            prop_assert_eq!(r.r, rex & 0x04 != 0);
            prop_assert_eq!(r.x, rex & 0x02 != 0);
            prop_assert_eq!(r.b, rex & 0x01 != 0);
        }
    }

    /// VEX-prefixed decodes never panic, on either architecture.
    #[test]
    fn vex_handling(
        two_byte in prop::bool::ANY,
        b1 in any::<u8>(),
        b2 in any::<u8>(),
        tail in prop::collection::vec(any::<u8>(), 0..16),
    ) {
        let mut bytes = if two_byte {
            vec![0xC5, b1]
        } else {
            vec![0xC4, b1, b2]
        };
        bytes.extend(tail);
        let _ = X86Disassembler::new().decode_at(&bytes, 0);
        let inst = X64Disassembler::new().decode_at(&bytes, 0).unwrap();
        prop_assert!(inst.has_vex());
    }

    /// EVEX stays structural: always a length-1 bad opcode.
    #[test]
    fn x64_evex_is_structural(tail in prop::collection::vec(any::<u8>(), 1..16)) {
        let mut bytes = vec![0x62];
        bytes.extend(tail);
        let inst = X64Disassembler::new().decode_at(&bytes, 0).unwrap();
        prop_assert_eq!(inst.vex_size(), 4);
        prop_assert!(inst.errors.opcode);
        prop_assert_eq!(inst.length, 1);
    }
}
