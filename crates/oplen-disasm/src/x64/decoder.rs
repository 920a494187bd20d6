//! x86-64 (AMD64) length decoder.

use oplen_core::prefix::bytes;
use oplen_core::{Bitness, Disp, ExtPrefix, Imm, Inst, ModRm, Rel, Rex, Sib, Vex};

use super::opcodes::{MAP_0F, MAP_0F38, MAP_0F3A, PRIMARY};
use crate::opflags::OpFlags;
use crate::traits::{LengthDisassembler, MAX_LEN};
use crate::util::sign_extend;

/// Length decoder for x86-64 code.
///
/// 64-bit addressing defaults with REX capture (the last REX wins, and a
/// legacy prefix after it voids it), unconditional `C4`/`C5`/`62` VEX
/// recognition, and the 64-bit widening rules for `moffs` and REX.W
/// immediates.
#[derive(Debug, Clone, Copy, Default)]
pub struct X64Disassembler;

impl X64Disassembler {
    /// Creates a new x86-64 decoder.
    pub fn new() -> Self {
        Self
    }
}

impl LengthDisassembler for X64Disassembler {
    fn decode_at(&self, bytes: &[u8], ip: usize) -> Option<Inst> {
        if ip >= bytes.len() {
            return None;
        }
        Some(Decoder::new(bytes, ip).run())
    }

    fn bitness(&self) -> Bitness {
        Bitness::X64
    }
}

/// Working state for a single instruction decode.
struct Decoder<'a> {
    bytes: &'a [u8],
    ip: usize,
    inst: Inst,
    flags: OpFlags,
}

impl<'a> Decoder<'a> {
    fn new(bytes: &'a [u8], ip: usize) -> Self {
        Self {
            bytes,
            ip,
            inst: Inst::default(),
            flags: OpFlags::ERROR,
        }
    }

    fn run(mut self) -> Inst {
        if self.decode().is_none() {
            // ran off the end of the buffer: report the remaining tail
            self.inst.errors.truncated = true;
            self.inst.length = (self.bytes.len() - self.ip) as u8;
        }
        self.inst
    }

    fn decode(&mut self) -> Option<()> {
        self.scan_prefixes()?;
        self.read_opcode()?;

        if self.flags.is_error() {
            // unmapped opcode: length 1 lets callers resync byte-by-byte
            self.inst.errors.opcode = true;
            self.inst.length = 1;
            return Some(());
        }

        if self.flags.contains(OpFlags::MP) && !self.inst.groups.has_operand_size() {
            self.inst.errors.opcode = true;
        }

        if self.flags.contains(OpFlags::RM) {
            self.read_modrm()?;
        } else if self.inst.groups.has_lock() {
            // LOCK needs a ModR/M memory form to latch onto
            self.inst.errors.lock = true;
        }

        self.read_immediates()?;

        if usize::from(self.inst.length) > MAX_LEN {
            self.inst.length = MAX_LEN as u8;
            self.inst.errors.length = true;
        }
        Some(())
    }

    /// Consumes the byte at `ip + length`.
    fn take(&mut self) -> Option<u8> {
        let byte = self.peek(0)?;
        self.inst.length += 1;
        Some(byte)
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes
            .get(self.ip + usize::from(self.inst.length) + ahead)
            .copied()
    }

    fn read_le(&mut self, size: u8) -> Option<u64> {
        let mut value = 0u64;
        for i in 0..size {
            value |= u64::from(self.take()?) << (i * 8);
        }
        Some(value)
    }

    /// Scans legacy prefixes and REX bytes. The first legacy prefix of each
    /// group sticks; for REX the last one wins, and any legacy prefix after
    /// a REX voids it (REX must be the final byte before the opcode).
    fn scan_prefixes(&mut self) -> Option<()> {
        while usize::from(self.inst.length) < MAX_LEN {
            let byte = self.peek(0)?;
            if self.inst.groups.observe(byte) {
                if matches!(self.inst.ext, ExtPrefix::Rex(_)) {
                    self.inst.ext = ExtPrefix::None;
                }
            } else if byte & 0xF0 == 0x40 {
                self.inst.ext = ExtPrefix::Rex(Rex::from_byte(byte));
            } else {
                break;
            }
            self.inst.length += 1;
        }
        Some(())
    }

    fn read_opcode(&mut self) -> Option<()> {
        // In 64-bit mode C4/C5/62 are unambiguous prefixes; the legacy
        // LES/LDS/BOUND encodings they shadowed are gone.
        if matches!(self.peek(0)?, 0xC4 | 0xC5 | 0x62) {
            return self.read_vex();
        }

        self.inst.opcode1 = self.take()?;
        match self.inst.opcode1 {
            0x0F => {
                self.inst.opcode2 = self.take()?;
                match self.inst.opcode2 {
                    0x38 => {
                        self.inst.opcode3 = self.take()?;
                        self.flags = MAP_0F38[usize::from(self.inst.opcode3)];
                    }
                    0x3A => {
                        self.inst.opcode3 = self.take()?;
                        self.flags = MAP_0F3A[usize::from(self.inst.opcode3)];
                    }
                    _ => self.flags = MAP_0F[usize::from(self.inst.opcode2)],
                }
            }
            0xF6 | 0xF7 => self.flags = self.group3_flags()?,
            opcode => self.flags = PRIMARY[usize::from(opcode)],
        }

        if !self.flags.is_error() && self.flags.contains(OpFlags::VX) && !self.inst.has_vex() {
            self.inst.errors.novex = true;
        }
        Some(())
    }

    /// F6/F7 extend through the ModR/M reg field with non-uniform shapes:
    /// sub-opcodes 0 and 1 (TEST) take an immediate, the rest do not. The
    /// ModR/M byte is only peeked here; the ModR/M stage consumes it.
    fn group3_flags(&mut self) -> Option<OpFlags> {
        Some(match (self.peek(0)? >> 3) & 0x07 {
            0 | 1 => {
                if self.inst.opcode1 == 0xF6 {
                    OpFlags::EX.union(OpFlags::I8)
                } else {
                    OpFlags::EX.union(OpFlags::RW).union(OpFlags::I32)
                }
            }
            _ => OpFlags::RM,
        })
    }

    fn read_vex(&mut self) -> Option<()> {
        // neither legacy prefixes nor REX may precede a VEX prefix
        if self.inst.groups.any() || matches!(self.inst.ext, ExtPrefix::Rex(_)) {
            self.inst.errors.opcode = true;
        }

        let lead = self.take()?;
        if lead == 0x62 {
            // EVEX is recognized structurally but not field-decoded; the
            // instruction falls through as a length-1 bad opcode.
            self.inst.ext = ExtPrefix::Evex;
            return Some(());
        }

        let mut vex = Vex::default();
        let map = if lead == 0xC4 {
            let byte = self.take()?;
            vex.r = byte & 0x80 == 0;
            vex.x = byte & 0x40 == 0;
            vex.b = byte & 0x20 == 0;
            byte & 0x1F
        } else {
            // C5 implies the 0F map
            1
        };

        match map {
            1 => self.inst.opcode1 = 0x0F,
            2 => {
                self.inst.opcode1 = 0x0F;
                self.inst.opcode2 = 0x38;
            }
            3 => {
                self.inst.opcode1 = 0x0F;
                self.inst.opcode2 = 0x3A;
            }
            _ => {
                self.inst.errors.opcode = true;
                self.inst.errors.novex = true;
            }
        }

        let byte = self.take()?;
        if lead == 0xC4 {
            vex.w = byte & 0x80 != 0;
        } else {
            vex.r = byte & 0x80 == 0;
        }
        vex.l = (byte >> 2) & 0x01;
        vex.reg = (!byte >> 3) & 0x0F;

        // pp folds the SIMD mandatory prefix into the legacy groups so the
        // rest of the pipeline treats VEX opcodes uniformly
        match byte & 0x03 {
            0x01 => self.inst.groups.group3 = bytes::OPERAND_SIZE,
            0x02 => self.inst.groups.group1 = bytes::REPZ,
            0x03 => self.inst.groups.group1 = bytes::REPNZ,
            _ => {}
        }

        self.inst.ext = if lead == 0xC4 {
            ExtPrefix::Vex3(vex)
        } else {
            ExtPrefix::Vex2(vex)
        };

        match (self.inst.opcode1, self.inst.opcode2) {
            (0x0F, 0x38) => {
                self.inst.opcode3 = self.take()?;
                self.flags = MAP_0F38[usize::from(self.inst.opcode3)];
            }
            (0x0F, 0x3A) => {
                self.inst.opcode3 = self.take()?;
                self.flags = MAP_0F3A[usize::from(self.inst.opcode3)];
            }
            (0x0F, _) => {
                self.inst.opcode2 = self.take()?;
                self.flags = MAP_0F[usize::from(self.inst.opcode2)];
            }
            // illegal map selector: flags stays at the error sentinel
            _ => {}
        }
        Some(())
    }

    fn read_modrm(&mut self) -> Option<()> {
        let modrm = ModRm::from_byte(self.take()?);
        self.inst.modrm = Some(modrm);

        let addr16 = self.inst.groups.has_address_size();
        let mut disp_size = 0u8;

        match modrm.mode {
            0b00 => {
                if addr16 {
                    if modrm.rm == 6 {
                        disp_size = 2;
                    }
                } else {
                    if modrm.rm == 4 {
                        self.read_sib()?;
                    }
                    if modrm.rm == 5 {
                        disp_size = 4;
                    }
                }
            }
            0b01 => {
                if !addr16 && modrm.rm == 4 {
                    self.read_sib()?;
                }
                disp_size = 1;
            }
            0b10 => {
                if !addr16 && modrm.rm == 4 {
                    self.read_sib()?;
                }
                disp_size = if addr16 { 2 } else { 4 };
            }
            _ => {
                // register-direct form forbids LOCK
                if self.inst.groups.has_lock() {
                    self.inst.errors.lock = true;
                }
            }
        }

        if disp_size > 0 {
            let value = self.read_le(disp_size)? as u32;
            self.inst.disp = Some(Disp {
                size: disp_size,
                value,
            });
        }

        self.extend_fields();
        Some(())
    }

    /// Widens the 3-bit ModR/M and SIB register fields with the REX (or
    /// VEX, same polarity) extension bits.
    fn extend_fields(&mut self) {
        let (_, ext_r, ext_x, ext_b) = self.inst.ext.wrxb();
        let modrm = match self.inst.modrm.as_mut() {
            Some(modrm) => modrm,
            None => return,
        };

        if let Some(sib) = self.inst.sib.as_mut() {
            modrm.reg |= (ext_r as u8) << 3;
            sib.index |= (ext_x as u8) << 3;
            sib.base |= (ext_b as u8) << 3;
        } else if self.flags.contains(OpFlags::OX) {
            // opcode extensions widen through REX.B instead
            modrm.reg |= (ext_b as u8) << 3;
        } else {
            modrm.reg |= (ext_r as u8) << 3;
            modrm.rm |= (ext_b as u8) << 3;
        }
    }

    fn read_sib(&mut self) -> Option<()> {
        let sib = Sib::from_byte(self.take()?);
        // raw index 4 (RSP) is the reserved no-index encoding; the check
        // runs on the 3-bit field, before the REX.X extension
        if sib.index == 4 {
            self.inst.errors.opcode = true;
        }
        self.inst.sib = Some(sib);
        Some(())
    }

    fn read_immediates(&mut self) -> Option<()> {
        let (rex_w, ..) = self.inst.ext.wrxb();
        let mut imm_size = 0u8;
        let mut imm2_size = 0u8;

        if self.flags.contains(OpFlags::AM) {
            // moffs: a direct memory offset in the current address width
            imm_size = if self.inst.groups.has_address_size() { 4 } else { 8 };
        } else {
            if self.flags.contains(OpFlags::I32) {
                imm_size = if rex_w && self.flags.contains(OpFlags::RW) {
                    8
                } else if self.inst.groups.has_operand_size() {
                    2
                } else {
                    4
                };
            }
            if self.flags.contains(OpFlags::I16) {
                if imm_size > 0 {
                    imm2_size = 2;
                } else {
                    imm_size = 2;
                }
            }
            if self.flags.contains(OpFlags::I8) {
                if imm_size > 0 {
                    imm2_size = 1;
                } else {
                    imm_size = 1;
                }
            }
        }

        if imm_size > 0 {
            let value = self.read_le(imm_size)?;
            self.inst.imm = Some(Imm {
                size: imm_size,
                value,
            });

            if imm2_size > 0 {
                let value = self.read_le(imm2_size)?;
                self.inst.imm2 = Some(Imm {
                    size: imm2_size,
                    value,
                });
            }
        }

        if self.flags.contains(OpFlags::REL) {
            // the sole immediate is really a signed branch displacement
            if let Some(imm) = self.inst.imm.take() {
                let offset = sign_extend(imm.value as u32, imm.size);
                let target = (self.ip as u64)
                    .wrapping_add(u64::from(self.inst.length))
                    .wrapping_add(offset as i64 as u64);
                self.inst.rel = Some(Rel {
                    size: imm.size,
                    offset,
                    target,
                });
            }
        }
        Some(())
    }
}
