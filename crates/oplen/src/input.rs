//! Input parsing for the CLI: inline hex strings and offsets.

use thiserror::Error;

/// Errors produced while turning CLI input into bytes.
#[derive(Error, Debug)]
pub enum InputError {
    /// The hex string has a dangling nibble.
    #[error("hex string has an odd number of digits")]
    OddLength,

    /// A character that is neither a hex digit nor a separator.
    #[error("invalid character {0:?} in hex string")]
    BadDigit(char),

    /// The requested start offset does not fall inside the buffer.
    #[error("offset {offset:#x} is past the end of the {len}-byte buffer")]
    OffsetOutOfRange { offset: usize, len: usize },
}

/// Parses an inline hex string into bytes.
///
/// Whitespace and commas are separators; `"8b 45 08"`, `"8B,45,08"` and
/// `"8b4508"` all decode to the same three bytes.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, InputError> {
    let mut nibbles = Vec::new();
    for ch in text.chars() {
        if ch.is_whitespace() || ch == ',' {
            continue;
        }
        let digit = ch.to_digit(16).ok_or(InputError::BadDigit(ch))?;
        nibbles.push(digit as u8);
    }

    if nibbles.len() % 2 != 0 {
        return Err(InputError::OddLength);
    }

    Ok(nibbles.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
}

/// Checks that `offset` falls inside the buffer.
pub fn check_offset(offset: usize, len: usize) -> Result<(), InputError> {
    if offset >= len {
        return Err(InputError::OffsetOutOfRange { offset, len });
    }
    Ok(())
}
