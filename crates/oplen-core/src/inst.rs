//! The decoded-instruction record.

use crate::prefix::{ExtPrefix, PrefixGroups, Rex, Vex};

/// Decoded ModR/M byte.
///
/// `reg` and `rm` start as 3-bit fields; on x86-64 the decoder widens them
/// to 4 bits with the REX/VEX extension bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModRm {
    /// Addressing mode (2 bits).
    pub mode: u8,
    /// Register number or opcode extension (3-4 bits).
    pub reg: u8,
    /// Register/memory selector (3-4 bits).
    pub rm: u8,
}

impl ModRm {
    /// Splits a raw ModR/M byte.
    pub fn from_byte(byte: u8) -> Self {
        Self {
            mode: (byte >> 6) & 0x03,
            reg: (byte >> 3) & 0x07,
            rm: byte & 0x07,
        }
    }

    /// Returns true for the register-direct form (`mod == 11`).
    pub fn is_register_direct(&self) -> bool {
        self.mode == 0b11
    }
}

/// Decoded SIB byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sib {
    /// Index scale factor, already decoded to 1, 2, 4 or 8.
    pub scale: u8,
    /// Index register (3-4 bits).
    pub index: u8,
    /// Base register (3-4 bits).
    pub base: u8,
}

impl Sib {
    /// Splits a raw SIB byte, decoding the 2-bit scale into a factor.
    pub fn from_byte(byte: u8) -> Self {
        Self {
            scale: 1 << ((byte >> 6) & 0x03),
            index: (byte >> 3) & 0x07,
            base: byte & 0x07,
        }
    }
}

/// Address displacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Disp {
    /// Displacement width in bytes (1, 2 or 4).
    pub size: u8,
    /// Little-endian value, zero-extended.
    pub value: u32,
}

/// Immediate operand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Imm {
    /// Immediate width in bytes.
    pub size: u8,
    /// Little-endian value, zero-extended. At most 32 bits are populated
    /// when decoding 32-bit code.
    pub value: u64,
}

/// PC-relative branch operand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rel {
    /// Encoded width in bytes (1, 2 or 4).
    pub size: u8,
    /// Sign-extended branch displacement.
    pub offset: i32,
    /// Resolved target: `ip + length + offset`, wrapped to the
    /// architecture's address width.
    pub target: u64,
}

/// Per-instruction diagnostic flags.
///
/// Decoding always runs to completion; these flags report what was wrong
/// with the encoding. The caller decides whether to resync or abort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorFlags {
    /// Unmapped opcode, illegal VEX map, missing mandatory 0x66, or a SIB
    /// byte with the reserved index 4.
    pub opcode: bool,
    /// Reserved; never raised by the current decoders.
    pub operand: bool,
    /// Instruction would exceed 15 bytes; length was clamped.
    pub length: bool,
    /// LOCK prefix on a register form or on an instruction without a
    /// memory operand.
    pub lock: bool,
    /// VEX-only instruction encoded without a VEX prefix.
    pub novex: bool,
    /// The buffer ended mid-instruction; length covers the remaining tail.
    pub truncated: bool,
}

impl ErrorFlags {
    /// Returns true if any flag is set.
    pub fn any(&self) -> bool {
        self.opcode || self.operand || self.length || self.lock || self.novex || self.truncated
    }
}

/// One decoded instruction.
///
/// Produced by the decoders in `oplen-disasm`; every field reflects the
/// most recent decode. The record is plain data: fixed-size, `Copy`, no
/// heap allocation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inst {
    /// Instruction length in bytes, `1..=15`.
    pub length: u8,
    /// Legacy prefixes, one slot per group.
    pub groups: PrefixGroups,
    /// REX/VEX/EVEX prefix, if any.
    pub ext: ExtPrefix,
    /// 1st opcode byte.
    pub opcode1: u8,
    /// 2nd opcode byte (`0F xx` families).
    pub opcode2: u8,
    /// 3rd opcode byte (`0F 38`/`0F 3A` families and 3DNow! suffix).
    pub opcode3: u8,
    /// ModR/M byte, split.
    pub modrm: Option<ModRm>,
    /// SIB byte, split. Present only together with ModR/M.
    pub sib: Option<Sib>,
    /// Address displacement.
    pub disp: Option<Disp>,
    /// First immediate.
    pub imm: Option<Imm>,
    /// Second immediate (`ENTER`-style `i16, i8` pairs).
    pub imm2: Option<Imm>,
    /// PC-relative target. Mutually exclusive with `imm`.
    pub rel: Option<Rel>,
    /// Diagnostic flags for this decode.
    pub errors: ErrorFlags,
}

impl Inst {
    /// Returns true if any error flag is set.
    pub fn is_error(&self) -> bool {
        self.errors.any()
    }

    /// Returns true if the instruction has a ModR/M byte.
    pub fn has_modrm(&self) -> bool {
        self.modrm.is_some()
    }

    /// Returns true if the instruction has a SIB byte.
    pub fn has_sib(&self) -> bool {
        self.sib.is_some()
    }

    /// Returns true if the instruction has an address displacement.
    pub fn has_disp(&self) -> bool {
        self.disp.is_some()
    }

    /// Returns true if the instruction has an immediate operand.
    pub fn has_imm(&self) -> bool {
        self.imm.is_some()
    }

    /// Returns true if the instruction has a second immediate operand.
    pub fn has_imm2(&self) -> bool {
        self.imm2.is_some()
    }

    /// Returns true if the instruction has a PC-relative operand.
    pub fn has_rel(&self) -> bool {
        self.rel.is_some()
    }

    /// Returns true if a REX prefix is in effect.
    pub fn has_rex(&self) -> bool {
        self.rex().is_some()
    }

    /// The REX fields, if a REX prefix is in effect.
    pub fn rex(&self) -> Option<Rex> {
        self.ext.rex()
    }

    /// Returns true if the instruction is VEX- or EVEX-encoded.
    pub fn has_vex(&self) -> bool {
        self.ext.is_vex()
    }

    /// Size of the VEX/EVEX prefix in bytes, 0 when not VEX-encoded.
    pub fn vex_size(&self) -> u8 {
        self.ext.vex_size()
    }

    /// The VEX fields, if a 2- or 3-byte VEX prefix is in effect.
    pub fn vex(&self) -> Option<Vex> {
        self.ext.vex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modrm_split() {
        // 0x45 = mod 01, reg 000, rm 101
        let modrm = ModRm::from_byte(0x45);
        assert_eq!(modrm.mode, 0b01);
        assert_eq!(modrm.reg, 0);
        assert_eq!(modrm.rm, 5);
        assert!(!modrm.is_register_direct());
        assert!(ModRm::from_byte(0xE5).is_register_direct());
    }

    #[test]
    fn sib_scale_is_decoded() {
        // 0xD6 = scale 11 (x8), index 010, base 110
        let sib = Sib::from_byte(0xD6);
        assert_eq!(sib.scale, 8);
        assert_eq!(sib.index, 2);
        assert_eq!(sib.base, 6);
    }

    #[test]
    fn error_flags_aggregate() {
        let mut errors = ErrorFlags::default();
        assert!(!errors.any());
        errors.lock = true;
        assert!(errors.any());
    }

    #[test]
    fn fresh_record_is_clean() {
        let inst = Inst::default();
        assert!(!inst.is_error());
        assert!(!inst.has_modrm());
        assert!(!inst.has_rex());
        assert_eq!(inst.vex_size(), 0);
    }
}
