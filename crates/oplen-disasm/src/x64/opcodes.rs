//! Opcode directive tables for x86-64 decoding.
//!
//! Same layout as the 32-bit tables, with the 64-bit mode differences
//! folded in: `40..4F` are REX prefixes rather than INC/DEC, the BCD and
//! far-segment encodings are gone, `63` is MOVSXD, `B8..BF` widen to 64-bit
//! immediates under REX.W (`RW`), and group-extended opcodes carry `OX` so
//! REX.B reaches their `reg` field. Entry values are derived from the Intel
//! SDM and are the external contract of the decoder.

use crate::opflags::OpFlags;

const NO: OpFlags = OpFlags::empty();
const ER: OpFlags = OpFlags::ERROR;
const RM: OpFlags = OpFlags::RM;
const EX: OpFlags = OpFlags::EX;
const I8: OpFlags = OpFlags::I8;
const I16: OpFlags = OpFlags::I16;
const I32: OpFlags = OpFlags::I32;
const R8: OpFlags = OpFlags::R8;
const R32: OpFlags = OpFlags::R32;
const RM_I8: OpFlags = OpFlags::RM.union(OpFlags::I8);
const RM_I32: OpFlags = OpFlags::RM.union(OpFlags::I32);
const EX_I8: OpFlags = OpFlags::EX.union(OpFlags::I8);
const EX_I32: OpFlags = OpFlags::EX.union(OpFlags::I32);
const I16_I8: OpFlags = OpFlags::I16.union(OpFlags::I8);
const RW_I32: OpFlags = OpFlags::RW.union(OpFlags::I32);
const MOFFS: OpFlags = OpFlags::AM;
const MP_RM: OpFlags = OpFlags::MP.union(OpFlags::RM);
const VX_RM: OpFlags = OpFlags::VX.union(OpFlags::RM);
const MP_RM_I8: OpFlags = MP_RM.union(OpFlags::I8);
const VX_RM_I8: OpFlags = VX_RM.union(OpFlags::I8);

/// Primary (single-byte) opcode map.
pub const PRIMARY: [OpFlags; 256] = [
    //  x0      x1      x2      x3      x4      x5      x6      x7      x8      x9      xA      xB      xC      xD      xE      xF
    RM,     RM,     RM,     RM,     I8,     I32,    ER,     ER,     RM,     RM,     RM,     RM,     I8,     I32,    ER,     ER,     // 0x
    RM,     RM,     RM,     RM,     I8,     I32,    ER,     ER,     RM,     RM,     RM,     RM,     I8,     I32,    ER,     ER,     // 1x
    RM,     RM,     RM,     RM,     I8,     I32,    ER,     ER,     RM,     RM,     RM,     RM,     I8,     I32,    ER,     ER,     // 2x
    RM,     RM,     RM,     RM,     I8,     I32,    ER,     ER,     RM,     RM,     RM,     RM,     I8,     I32,    ER,     ER,     // 3x
    ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     // 4x
    NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     // 5x
    ER,     ER,     ER,     RM,     ER,     ER,     ER,     ER,     I32,    RM_I32, I8,     RM_I8,  NO,     NO,     NO,     NO,     // 6x
    R8,     R8,     R8,     R8,     R8,     R8,     R8,     R8,     R8,     R8,     R8,     R8,     R8,     R8,     R8,     R8,     // 7x
    EX_I8,  EX_I32, ER,     EX_I8,  RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     EX,     // 8x
    NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     ER,     ER,     NO,     NO,     NO,     NO,     // 9x
    MOFFS,  MOFFS,  MOFFS,  MOFFS,  NO,     NO,     NO,     NO,     I8,     I32,    NO,     NO,     NO,     NO,     NO,     NO,     // Ax
    I8,     I8,     I8,     I8,     I8,     I8,     I8,     I8,     RW_I32, RW_I32, RW_I32, RW_I32, RW_I32, RW_I32, RW_I32, RW_I32, // Bx
    EX_I8,  EX_I8,  I16,    NO,     ER,     ER,     EX_I8,  EX_I32, I16_I8, NO,     I16,    NO,     NO,     I8,     NO,     NO,     // Cx
    EX,     EX,     EX,     EX,     ER,     ER,     ER,     NO,     EX,     EX,     EX,     EX,     EX,     EX,     EX,     EX,     // Dx
    R8,     R8,     R8,     R8,     I8,     I8,     I8,     I8,     R32,    R32,    ER,     R8,     NO,     NO,     NO,     NO,     // Ex
    ER,     NO,     ER,     ER,     NO,     NO,     ER,     ER,     NO,     NO,     NO,     NO,     NO,     NO,     RM,     EX,     // Fx
];

/// Two-byte (`0F xx`) opcode map.
pub const MAP_0F: [OpFlags; 256] = [
    //  x0      x1      x2      x3      x4      x5      x6      x7      x8      x9      xA      xB      xC      xD      xE      xF
    EX,     EX,     RM,     RM,     ER,     ER,     NO,     ER,     NO,     NO,     ER,     NO,     ER,     RM,     NO,     ER,     // 0x
    RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     EX,     RM,     RM,     RM,     RM,     RM,     RM,     EX,     // 1x
    RM,     RM,     RM,     RM,     RM,     ER,     RM,     ER,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     // 2x
    NO,     NO,     NO,     NO,     NO,     NO,     ER,     NO,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     // 3x
    RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     // 4x
    RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     // 5x
    RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     // 6x
    RM_I8,  EX_I8,  EX_I8,  EX_I8,  RM,     RM,     RM,     NO,     RM,     RM,     ER,     ER,     RM,     RM,     RM,     RM,     // 7x
    R32,    R32,    R32,    R32,    R32,    R32,    R32,    R32,    R32,    R32,    R32,    R32,    R32,    R32,    R32,    R32,    // 8x
    EX,     EX,     EX,     EX,     EX,     EX,     EX,     EX,     EX,     EX,     EX,     EX,     EX,     EX,     EX,     EX,     // 9x
    NO,     NO,     NO,     RM,     RM_I8,  RM,     ER,     ER,     NO,     NO,     NO,     RM,     RM_I8,  RM,     EX,     RM,     // Ax
    RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     NO,     EX_I8,  RM,     RM,     RM,     RM,     RM,     // Bx
    RM,     RM,     RM_I8,  RM,     RM_I8,  RM_I8,  RM_I8,  EX,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     // Cx
    RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     // Dx
    RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     // Ex
    RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     // Fx
];

/// Three-byte (`0F 38 xx`) opcode map.
pub const MAP_0F38: [OpFlags; 256] = [
    //  x0      x1      x2      x3      x4      x5      x6      x7      x8      x9      xA      xB      xC      xD      xE      xF
    RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     RM,     VX_RM,  VX_RM,  ER,     ER,     // 0x
    MP_RM,  ER,     ER,     ER,     MP_RM,  MP_RM,  ER,     MP_RM,  VX_RM,  ER,     VX_RM,  ER,     RM,     RM,     RM,     ER,     // 1x
    MP_RM,  MP_RM,  MP_RM,  MP_RM,  MP_RM,  MP_RM,  ER,     ER,     MP_RM,  MP_RM,  MP_RM,  MP_RM,  VX_RM,  VX_RM,  ER,     ER,     // 2x
    MP_RM,  MP_RM,  MP_RM,  MP_RM,  MP_RM,  MP_RM,  ER,     MP_RM,  MP_RM,  MP_RM,  MP_RM,  MP_RM,  MP_RM,  MP_RM,  MP_RM,  MP_RM,  // 3x
    MP_RM,  MP_RM,  ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     // 4x
    ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     VX_RM,  VX_RM,  ER,     ER,     ER,     ER,     ER,     ER,     // 5x
    ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     // 6x
    ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     VX_RM,  VX_RM,  ER,     ER,     ER,     ER,     ER,     ER,     // 7x
    MP_RM,  MP_RM,  ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     // 8x
    ER,     ER,     ER,     ER,     ER,     ER,     VX_RM,  VX_RM,  VX_RM,  ER,     VX_RM,  ER,     VX_RM,  ER,     VX_RM,  ER,     // 9x
    ER,     ER,     ER,     ER,     ER,     ER,     VX_RM,  VX_RM,  VX_RM,  ER,     VX_RM,  ER,     VX_RM,  ER,     VX_RM,  ER,     // Ax
    ER,     ER,     ER,     ER,     ER,     ER,     VX_RM,  VX_RM,  VX_RM,  ER,     VX_RM,  ER,     VX_RM,  ER,     VX_RM,  ER,     // Bx
    ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     RM,     RM,     RM,     RM,     RM,     RM,     ER,     ER,     // Cx
    ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     RM,     RM,     RM,     RM,     RM,     // Dx
    ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     // Ex
    RM,     RM,     ER,     ER,     ER,     ER,     RM,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     ER,     // Fx
];

/// Three-byte (`0F 3A xx`) opcode map.
pub const MAP_0F3A: [OpFlags; 256] = [
    //  x0        x1        x2        x3        x4        x5        x6        x7        x8        x9        xA        xB        xC        xD        xE        xF
    ER,       ER,       ER,       ER,       ER,       ER,       VX_RM_I8, ER,       MP_RM_I8, MP_RM_I8, MP_RM_I8, MP_RM_I8, MP_RM_I8, MP_RM_I8, MP_RM_I8, RM,       // 0x
    ER,       ER,       ER,       ER,       MP_RM_I8, MP_RM_I8, MP_RM_I8, MP_RM_I8, VX_RM_I8, VX_RM_I8, ER,       ER,       ER,       ER,       ER,       ER,       // 1x
    MP_RM_I8, MP_RM_I8, MP_RM_I8, ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // 2x
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // 3x
    MP_RM,    MP_RM,    MP_RM_I8, ER,       ER,       ER,       ER,       ER,       ER,       ER,       VX_RM_I8, VX_RM_I8, VX_RM_I8, ER,       ER,       ER,       // 4x
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // 5x
    MP_RM_I8, MP_RM_I8, MP_RM_I8, MP_RM_I8, ER,       ER,       ER,       ER,       VX_RM_I8, ER,       ER,       ER,       ER,       ER,       ER,       ER,       // 6x
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // 7x
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // 8x
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // 9x
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // Ax
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // Bx
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       MP_RM_I8, ER,       ER,       ER,       // Cx
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // Dx
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // Ex
    ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       ER,       // Fx
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rex_range_is_not_opcode_space() {
        for byte in 0x40..=0x4F {
            assert!(PRIMARY[byte].is_error());
        }
    }

    #[test]
    fn bcd_and_far_encodings_are_gone() {
        // aaa / aas / daa / das / push es / 9a callf
        for byte in [0x06, 0x0E, 0x16, 0x1E, 0x27, 0x2F, 0x37, 0x3F, 0x9A] {
            assert!(PRIMARY[byte].is_error(), "{byte:#04x} should be invalid");
        }
    }

    #[test]
    fn movsxd_and_mov_imm64() {
        assert_eq!(PRIMARY[0x63], RM);
        for byte in 0xB8..=0xBF {
            assert_eq!(PRIMARY[byte], RW_I32);
        }
    }

    #[test]
    fn group_extended_opcodes_carry_ox() {
        // 80/81/83 immediate groups, 8F pop, C6/C7 mov, D0..D3 shifts, FF inc/dec group
        for byte in [0x80, 0x81, 0x83, 0x8F, 0xC6, 0xC7, 0xD0, 0xD3, 0xFF] {
            assert!(
                PRIMARY[byte].contains(OpFlags::OX),
                "{byte:#04x} should extend via REX.B"
            );
        }
        // plain ModR/M register forms do not
        assert_eq!(PRIMARY[0x89], RM);
    }

    #[test]
    fn map_0f_spot_checks() {
        // group 6/7 (sgdt etc.) and nop/hint groups extend through reg
        assert_eq!(MAP_0F[0x00], EX);
        assert_eq!(MAP_0F[0x18], EX);
        assert_eq!(MAP_0F[0x1F], EX);
        // setcc family is an opcode extension
        assert_eq!(MAP_0F[0x90], EX);
        // jcc rel32
        assert_eq!(MAP_0F[0x8D], R32);
        // bt group with imm8
        assert_eq!(MAP_0F[0xBA], EX_I8);
        // moffs is plain AM on x64 (8-byte offset)
        assert_eq!(PRIMARY[0xA1], MOFFS);
    }

    #[test]
    fn escape_maps_match_the_32bit_contract() {
        assert_eq!(MAP_0F38[0x00], RM);
        assert_eq!(MAP_0F38[0x10], MP_RM);
        assert_eq!(MAP_0F38[0x0C], VX_RM);
        assert_eq!(MAP_0F3A[0x0F], RM);
        assert_eq!(MAP_0F3A[0x44], ER);
        assert_eq!(MAP_0F3A[0xCC], MP_RM_I8);
    }

    #[test]
    fn rel_entries_always_carry_an_immediate_width() {
        for table in [&PRIMARY, &MAP_0F, &MAP_0F38, &MAP_0F3A] {
            for (byte, entry) in table.iter().enumerate() {
                if !entry.is_error() && entry.contains(OpFlags::REL) {
                    assert!(
                        entry.intersects(OpFlags::I8.union(OpFlags::I16).union(OpFlags::I32)),
                        "opcode {byte:#04x} is REL without an immediate width"
                    );
                }
            }
        }
    }

    #[test]
    fn rw_implies_i32() {
        for table in [&PRIMARY, &MAP_0F, &MAP_0F38, &MAP_0F3A] {
            for (byte, entry) in table.iter().enumerate() {
                if !entry.is_error() && entry.contains(OpFlags::RW) {
                    assert!(
                        entry.contains(OpFlags::I32),
                        "opcode {byte:#04x} has RW without I32"
                    );
                }
            }
        }
    }
}
