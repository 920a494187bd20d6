//! 32-bit (IA-32) length decoder.

use oplen_core::prefix::bytes;
use oplen_core::{Bitness, Disp, ExtPrefix, Imm, Inst, ModRm, Rel, Sib, Vex};

use super::opcodes::{MAP_0F, MAP_0F38, MAP_0F3A, PRIMARY};
use crate::opflags::OpFlags;
use crate::traits::{LengthDisassembler, MAX_LEN};
use crate::util::sign_extend;

/// Length decoder for 32-bit x86 code.
///
/// 32-bit operand and address defaults, no REX; `C4`/`C5` introduce VEX
/// only when the following byte has bit 7 set (otherwise they are the
/// legacy LES/LDS encodings), and `0F 0F` is decoded as a 3DNow!
/// instruction with a trailing opcode selector.
#[derive(Debug, Clone, Copy, Default)]
pub struct X86Disassembler;

impl X86Disassembler {
    /// Creates a new 32-bit decoder.
    pub fn new() -> Self {
        Self
    }
}

impl LengthDisassembler for X86Disassembler {
    fn decode_at(&self, bytes: &[u8], ip: usize) -> Option<Inst> {
        if ip >= bytes.len() {
            return None;
        }
        Some(Decoder::new(bytes, ip).run())
    }

    fn bitness(&self) -> Bitness {
        Bitness::X86
    }
}

/// Working state for a single instruction decode.
struct Decoder<'a> {
    bytes: &'a [u8],
    ip: usize,
    inst: Inst,
    flags: OpFlags,
    threednow: bool,
}

impl<'a> Decoder<'a> {
    fn new(bytes: &'a [u8], ip: usize) -> Self {
        Self {
            bytes,
            ip,
            inst: Inst::default(),
            flags: OpFlags::ERROR,
            threednow: false,
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

    /// Scans legacy prefixes the way the CPU does: the first prefix of each
    /// group sticks, repeats are absorbed silently, and the scan gives up
    /// once the 15-byte instruction limit is reached.
    fn scan_prefixes(&mut self) -> Option<()> {
        while usize::from(self.inst.length) < MAX_LEN {
            let byte = self.peek(0)?;
            if !self.inst.groups.observe(byte) {
                break;
            }
            self.inst.length += 1;
        }
        Some(())
    }

    fn read_opcode(&mut self) -> Option<()> {
        // C4/C5/62 open a VEX/EVEX prefix only when the next byte has bit 7
        // set; with it clear they are the legacy LES/LDS/BOUND encodings.
        let lead = self.peek(0)?;
        if matches!(lead, 0xC4 | 0xC5 | 0x62) && self.peek(1).is_some_and(|b| b & 0x80 != 0) {
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
                    // 3DNow!: ModR/M and displacement come first, then one
                    // byte that selects the operation. Decode it as an
                    // imm8 and reclassify afterwards.
                    0x0F => {
                        self.flags = OpFlags::RM.union(OpFlags::I8);
                        self.threednow = true;
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
                    OpFlags::RM.union(OpFlags::I8)
                } else {
                    OpFlags::RM.union(OpFlags::I32)
                }
            }
            _ => OpFlags::RM,
        })
    }

    fn read_vex(&mut self) -> Option<()> {
        // legacy prefixes may not precede a VEX prefix
        if self.inst.groups.any() {
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
        Some(())
    }

    fn read_sib(&mut self) -> Option<()> {
        let sib = Sib::from_byte(self.take()?);
        // index 4 (ESP) is the reserved no-index encoding
        if sib.index == 4 {
            self.inst.errors.opcode = true;
        }
        self.inst.sib = Some(sib);
        Some(())
    }

    fn read_immediates(&mut self) -> Option<()> {
        let mut imm_size = 0u8;
        let mut imm2_size = 0u8;

        if self.flags.contains(OpFlags::AM) {
            // moffs: a direct memory offset in the current address width
            imm_size = if self.inst.groups.has_address_size() { 2 } else { 4 };
        } else {
            if self.flags.contains(OpFlags::I32) {
                imm_size = if self.inst.groups.has_operand_size() { 2 } else { 4 };
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

        if self.threednow {
            // the trailing byte is the 3DNow! opcode selector, not data
            if let Some(imm) = self.inst.imm.take() {
                self.inst.opcode3 = imm.value as u8;
            }
            return Some(());
        }

        if self.flags.contains(OpFlags::REL) {
            // the sole immediate is really a signed branch displacement
            if let Some(imm) = self.inst.imm.take() {
                let offset = sign_extend(imm.value as u32, imm.size);
                let target = (self.ip as u32)
                    .wrapping_add(u32::from(self.inst.length))
                    .wrapping_add(offset as u32);
                self.inst.rel = Some(Rel {
                    size: imm.size,
                    offset,
                    target: u64::from(target),
                });
            }
        }
        Some(())
    }
}
