//! VCPU-16 program image parser.
//!
//! An image is a bare concatenation of big-endian 16-bit words: instruction
//! word, then 0–2 immediate words, repeated. No header, no sections, no
//! relocation. Images load at address 0 and are truncated to the 64 Ki-word
//! address space.

use std::fmt;

/// Words in the VCPU-16 address space.
pub const MEM_WORDS: usize = 0x10000;

#[derive(Debug)]
pub enum RomError {
    /// Image length is not a whole number of 16-bit words.
    OddLength(usize),
}

impl fmt::Display for RomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OddLength(len) => {
                write!(f, "invalid ROM size: {len} bytes is not a whole number of words")
            }
        }
    }
}

impl std::error::Error for RomError {}

/// A decoded program image, host-endian.
pub struct Rom {
    words: Vec<u16>,
}

impl Rom {
    /// Decode an image from its on-disk byte form.
    ///
    /// Anything beyond the 64 Ki-word address space is dropped.
    pub fn from_bytes(data: &[u8]) -> Result<Self, RomError> {
        if data.len() % 2 != 0 {
            return Err(RomError::OddLength(data.len()));
        }
        let words = data
            .chunks_exact(2)
            .take(MEM_WORDS)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Self { words })
    }

    /// Encode words into their on-disk byte form.
    #[must_use]
    pub fn to_bytes(words: &[u16]) -> Vec<u8> {
        let mut data = Vec::with_capacity(words.len() * 2);
        for word in words {
            data.extend_from_slice(&word.to_be_bytes());
        }
        data
    }

    /// The image contents, one entry per memory word starting at address 0.
    #[must_use]
    pub fn words(&self) -> &[u16] {
        &self.words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reject_odd_length() {
        assert!(Rom::from_bytes(&[0x04, 0x00, 0xAB]).is_err());
    }

    #[test]
    fn words_decode_big_endian() {
        let rom = Rom::from_bytes(&[0x04, 0x00, 0xAB, 0xCD]).expect("valid");
        assert_eq!(rom.words(), &[0x0400, 0xABCD]);
    }

    #[test]
    fn byte_round_trip() {
        let words = [0x0000, 0x4200, 0xFFFF, 0x1234];
        let rom = Rom::from_bytes(&Rom::to_bytes(&words)).expect("valid");
        assert_eq!(rom.words(), &words);
    }

    #[test]
    fn truncate_past_address_space() {
        let data = vec![0u8; (MEM_WORDS + 16) * 2];
        let rom = Rom::from_bytes(&data).expect("valid");
        assert_eq!(rom.words().len(), MEM_WORDS);
    }
}
