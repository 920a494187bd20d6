//! Legacy prefix bookkeeping and the REX/VEX prefix model.

/// Legacy prefix byte values, by semantic group.
pub mod bytes {
    /// LOCK prefix (group 1).
    pub const LOCK: u8 = 0xF0;
    /// REPNE/REPNZ prefix (group 1).
    pub const REPNZ: u8 = 0xF2;
    /// REP/REPE/REPZ prefix (group 1).
    pub const REPZ: u8 = 0xF3;

    /// ES segment override (group 2).
    pub const SEG_ES: u8 = 0x26;
    /// CS segment override (group 2); doubles as the branch-not-taken hint.
    pub const SEG_CS: u8 = 0x2E;
    /// SS segment override (group 2).
    pub const SEG_SS: u8 = 0x36;
    /// DS segment override (group 2); doubles as the branch-taken hint.
    pub const SEG_DS: u8 = 0x3E;
    /// FS segment override (group 2).
    pub const SEG_FS: u8 = 0x64;
    /// GS segment override (group 2).
    pub const SEG_GS: u8 = 0x65;

    /// Operand-size override (group 3).
    pub const OPERAND_SIZE: u8 = 0x66;
    /// Address-size override (group 4).
    pub const ADDRESS_SIZE: u8 = 0x67;
}

/// The first legacy prefix observed from each of the four semantic groups,
/// `0` when the group is absent.
///
/// Real CPUs keep the first prefix of a group and silently absorb repeats;
/// `observe` reproduces that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrefixGroups {
    /// LOCK / REPNZ / REPZ.
    pub group1: u8,
    /// Segment overrides and branch-hint aliases.
    pub group2: u8,
    /// Operand-size override (0x66).
    pub group3: u8,
    /// Address-size override (0x67).
    pub group4: u8,
}

impl PrefixGroups {
    /// Records `byte` if it is a legacy prefix, keeping the first prefix
    /// seen per group. Returns false when `byte` is not a legacy prefix.
    pub fn observe(&mut self, byte: u8) -> bool {
        let slot = match byte {
            bytes::LOCK | bytes::REPNZ | bytes::REPZ => &mut self.group1,
            bytes::SEG_ES | bytes::SEG_CS | bytes::SEG_SS | bytes::SEG_DS | bytes::SEG_FS
            | bytes::SEG_GS => &mut self.group2,
            bytes::OPERAND_SIZE => &mut self.group3,
            bytes::ADDRESS_SIZE => &mut self.group4,
            _ => return false,
        };

        if *slot == 0 {
            *slot = byte;
        }
        true
    }

    /// Returns true if any group is occupied.
    pub fn any(&self) -> bool {
        self.group1 | self.group2 | self.group3 | self.group4 != 0
    }

    /// Returns true if the LOCK prefix was observed.
    pub fn has_lock(&self) -> bool {
        self.group1 == bytes::LOCK
    }

    /// Returns true if the operand-size override (0x66) was observed.
    pub fn has_operand_size(&self) -> bool {
        self.group3 == bytes::OPERAND_SIZE
    }

    /// Returns true if the address-size override (0x67) was observed.
    pub fn has_address_size(&self) -> bool {
        self.group4 == bytes::ADDRESS_SIZE
    }
}

/// REX prefix fields (x86-64 only).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rex {
    /// REX.W - 64-bit operand size.
    pub w: bool,
    /// REX.R - extends the ModR/M reg field.
    pub r: bool,
    /// REX.X - extends the SIB index field.
    pub x: bool,
    /// REX.B - extends ModR/M r/m, SIB base, or an opcode extension.
    pub b: bool,
}

impl Rex {
    /// Parses a REX byte (`0x40..=0x4F`).
    pub fn from_byte(byte: u8) -> Self {
        Self {
            w: byte & 0x08 != 0,
            r: byte & 0x04 != 0,
            x: byte & 0x02 != 0,
            b: byte & 0x01 != 0,
        }
    }
}

/// VEX payload fields.
///
/// R, X, B and the `vvvv` register selector are inverted on the wire; they
/// are stored here with logical polarity, so `r == true` extends a register
/// field exactly like REX.R would.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vex {
    /// Source register selector (`vvvv`, un-inverted).
    pub reg: u8,
    /// Vector length (L field).
    pub l: u8,
    /// W field (raw; not inverted in the encoding).
    pub w: bool,
    /// R field.
    pub r: bool,
    /// X field.
    pub x: bool,
    /// B field.
    pub b: bool,
}

/// The extension prefix of an instruction, if any.
///
/// REX and VEX never coexist on a valid encoding, so the record keeps
/// exactly one. `Evex` is recognized structurally but carries no fields:
/// opmask, zeroing, SAE and R' are deliberately not modeled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExtPrefix {
    /// No extension prefix.
    #[default]
    None,
    /// REX prefix (`0x40..=0x4F`, x86-64 only).
    Rex(Rex),
    /// Two-byte VEX (`C5`).
    Vex2(Vex),
    /// Three-byte VEX (`C4`).
    Vex3(Vex),
    /// Four-byte EVEX (`62`), structurally recognized only.
    Evex,
}

impl ExtPrefix {
    /// Returns true for any of the VEX family (including EVEX).
    pub fn is_vex(&self) -> bool {
        matches!(self, Self::Vex2(_) | Self::Vex3(_) | Self::Evex)
    }

    /// Size of the VEX/EVEX prefix in bytes, 0 when not VEX-encoded.
    pub fn vex_size(&self) -> u8 {
        match self {
            Self::Vex2(_) => 2,
            Self::Vex3(_) => 3,
            Self::Evex => 4,
            _ => 0,
        }
    }

    /// The REX fields, if a REX prefix is in effect.
    pub fn rex(&self) -> Option<Rex> {
        match self {
            Self::Rex(rex) => Some(*rex),
            _ => None,
        }
    }

    /// The VEX fields, if a 2- or 3-byte VEX prefix is in effect.
    pub fn vex(&self) -> Option<Vex> {
        match self {
            Self::Vex2(vex) | Self::Vex3(vex) => Some(*vex),
            _ => None,
        }
    }

    /// The W/R/X/B extension bits, REX or VEX alike (logical polarity).
    pub fn wrxb(&self) -> (bool, bool, bool, bool) {
        match self {
            Self::Rex(p) => (p.w, p.r, p.x, p.b),
            Self::Vex2(p) | Self::Vex3(p) => (p.w, p.r, p.x, p.b),
            _ => (false, false, false, false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_prefix_of_a_group_wins() {
        let mut groups = PrefixGroups::default();
        assert!(groups.observe(bytes::REPZ));
        assert!(groups.observe(bytes::LOCK));
        assert_eq!(groups.group1, bytes::REPZ);
        assert!(!groups.has_lock());
    }

    #[test]
    fn groups_are_independent() {
        let mut groups = PrefixGroups::default();
        groups.observe(bytes::SEG_GS);
        groups.observe(bytes::OPERAND_SIZE);
        groups.observe(bytes::ADDRESS_SIZE);
        assert_eq!(groups.group1, 0);
        assert_eq!(groups.group2, bytes::SEG_GS);
        assert!(groups.has_operand_size());
        assert!(groups.has_address_size());
        assert!(groups.any());
    }

    #[test]
    fn non_prefix_bytes_are_rejected() {
        let mut groups = PrefixGroups::default();
        assert!(!groups.observe(0x90));
        assert!(!groups.any());
    }

    #[test]
    fn rex_bits() {
        let rex = Rex::from_byte(0x4D);
        assert!(rex.w);
        assert!(rex.r);
        assert!(!rex.x);
        assert!(rex.b);
    }

    #[test]
    fn ext_prefix_sizes() {
        assert_eq!(ExtPrefix::None.vex_size(), 0);
        assert_eq!(ExtPrefix::Vex2(Vex::default()).vex_size(), 2);
        assert_eq!(ExtPrefix::Vex3(Vex::default()).vex_size(), 3);
        assert_eq!(ExtPrefix::Evex.vex_size(), 4);
        assert!(ExtPrefix::Evex.is_vex());
        assert!(!ExtPrefix::Rex(Rex::default()).is_vex());
    }
}
