#![no_main]

use libfuzzer_sys::fuzz_target;
use oplen_disasm::{LengthDisassembler, X86Disassembler};

fuzz_target!(|data: &[u8]| {
    let disasm = X86Disassembler::new();

    if let Some(inst) = disasm.decode_at(data, 0) {
        assert!(inst.length >= 1);
        assert!(usize::from(inst.length) <= 15);
        assert!(usize::from(inst.length) <= data.len());
        if inst.has_sib() {
            assert!(inst.has_modrm());
        }
        if inst.has_rel() {
            assert!(!inst.has_imm());
        }
    }

    let mut offset = 0;
    while let Some(inst) = disasm.decode_at(data, offset) {
        offset += usize::from(inst.length);
    }
    assert_eq!(offset, data.len());
});
