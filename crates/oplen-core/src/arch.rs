//! Architecture identification and properties.

/// The two instruction-set widths the engine decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bitness {
    /// 32-bit x86 (IA-32).
    X86,
    /// x86-64 (AMD64).
    X64,
}

impl Bitness {
    /// Returns the address width in bytes.
    pub fn address_size(&self) -> usize {
        match self {
            Self::X86 => 4,
            Self::X64 => 8,
        }
    }

    /// Returns whether this is the 64-bit instruction set.
    pub fn is_64bit(&self) -> bool {
        matches!(self, Self::X64)
    }

    /// Returns the name of this architecture.
    pub fn name(&self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X64 => "x64",
        }
    }
}
