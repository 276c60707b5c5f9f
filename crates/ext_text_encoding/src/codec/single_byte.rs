//! ASCII and ISO-8859-1.
//!
//! Both map bytes 1-to-1 onto the first 128 (ASCII) or 256 (Latin-1)
//! Unicode scalar values, so encoding is a range check and decoding is a
//! widening. ASCII rejects bytes with the high bit set; every Latin-1 byte
//! is valid.

use super::{put, Decode, Encode, EncodeStatus, Malformed};

/// Strict 7-bit US-ASCII
#[derive(Debug, Default, Clone, Copy)]
pub struct Ascii;

/// ISO-8859-1, where each byte is the code point of the same value
#[derive(Debug, Default, Clone, Copy)]
pub struct Latin1;

fn encode_below(limit: u32, src: &str, dst: &mut [u8]) -> (EncodeStatus, usize, usize) {
    let mut written = 0;
    for (offset, c) in src.char_indices() {
        if c as u32 >= limit {
            return (EncodeStatus::Unmappable(c), offset, written);
        }
        if !put(dst, &mut written, &[c as u8]) {
            return (EncodeStatus::OutputFull, offset, written);
        }
    }
    (EncodeStatus::InputEmpty, src.len(), written)
}

impl Decode for Ascii {
    fn decode(&mut self, src: &[u8], dst: &mut String) -> Result<(), Malformed> {
        if let Some(offset) = src.iter().position(|b| !b.is_ascii()) {
            return Err(Malformed { offset });
        }
        dst.extend(src.iter().map(|&b| b as char));
        Ok(())
    }
}

impl Encode for Ascii {
    fn encode(&mut self, src: &str, dst: &mut [u8]) -> (EncodeStatus, usize, usize) {
        encode_below(0x80, src, dst)
    }
}

impl Decode for Latin1 {
    fn decode(&mut self, src: &[u8], dst: &mut String) -> Result<(), Malformed> {
        dst.reserve(src.len());
        dst.extend(src.iter().map(|&b| b as char));
        Ok(())
    }
}

impl Encode for Latin1 {
    fn encode(&mut self, src: &str, dst: &mut [u8]) -> (EncodeStatus, usize, usize) {
        encode_below(0x100, src, dst)
    }
}
