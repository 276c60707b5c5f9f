//! UTF-16 and UTF-32 in both byte orders, with optional byte-order marks.
//!
//! The BOM-marked forms ("UTF-16", "UTF-32") write a little-endian BOM
//! before the first character and read whichever BOM is present, assuming
//! big-endian when there is none. The explicit forms never touch a BOM.

use super::{put, Decode, Encode, EncodeStatus, Malformed, WhatwgDecoder};
use encoding_rs::{UTF_16BE, UTF_16LE};

const BOM: char = '\u{FEFF}';

/// Byte order of multi-byte code units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    fn unit16(self, unit: u16) -> [u8; 2] {
        match self {
            ByteOrder::Little => unit.to_le_bytes(),
            ByteOrder::Big => unit.to_be_bytes(),
        }
    }

    fn unit32(self, unit: u32) -> [u8; 4] {
        match self {
            ByteOrder::Little => unit.to_le_bytes(),
            ByteOrder::Big => unit.to_be_bytes(),
        }
    }

    fn read32(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        }
    }
}

// ============================================================================
// UTF-16
// ============================================================================

/// UTF-16 decoder; `None` means sniff a BOM, defaulting to big-endian
pub struct Utf16Decoder {
    order: Option<ByteOrder>,
}

impl Utf16Decoder {
    pub fn new(order: Option<ByteOrder>) -> Self {
        Self { order }
    }
}

impl Decode for Utf16Decoder {
    fn decode(&mut self, src: &[u8], dst: &mut String) -> Result<(), Malformed> {
        let (order, skip) = match self.order {
            Some(order) => (order, 0),
            None => match src {
                [0xFF, 0xFE, ..] => (ByteOrder::Little, 2),
                [0xFE, 0xFF, ..] => (ByteOrder::Big, 2),
                _ => (ByteOrder::Big, 0),
            },
        };
        let encoding = match order {
            ByteOrder::Little => UTF_16LE,
            ByteOrder::Big => UTF_16BE,
        };
        WhatwgDecoder::new(encoding)
            .decode(&src[skip..], dst)
            .map_err(|e| Malformed {
                offset: e.offset + skip,
            })
    }
}

/// UTF-16 encoder, optionally writing a BOM before the first character
pub struct Utf16Encoder {
    order: ByteOrder,
    bom_pending: bool,
}

impl Utf16Encoder {
    pub fn new(order: ByteOrder, with_bom: bool) -> Self {
        Self {
            order,
            bom_pending: with_bom,
        }
    }

    fn put_char(&self, c: char, dst: &mut [u8], written: &mut usize) -> bool {
        let mut units = [0u16; 2];
        let units = c.encode_utf16(&mut units);
        let mut bytes = [0u8; 4];
        let mut len = 0;
        for unit in units.iter() {
            bytes[len..len + 2].copy_from_slice(&self.order.unit16(*unit));
            len += 2;
        }
        put(dst, written, &bytes[..len])
    }
}

impl Encode for Utf16Encoder {
    fn encode(&mut self, src: &str, dst: &mut [u8]) -> (EncodeStatus, usize, usize) {
        let mut written = 0;
        if self.bom_pending && !src.is_empty() {
            if !self.put_char(BOM, dst, &mut written) {
                return (EncodeStatus::OutputFull, 0, 0);
            }
            self.bom_pending = false;
        }
        for (offset, c) in src.char_indices() {
            if !self.put_char(c, dst, &mut written) {
                return (EncodeStatus::OutputFull, offset, written);
            }
        }
        (EncodeStatus::InputEmpty, src.len(), written)
    }
}

// ============================================================================
// UTF-32
// ============================================================================

/// UTF-32 decoder; `None` means sniff a BOM, defaulting to big-endian
pub struct Utf32Decoder {
    order: Option<ByteOrder>,
}

impl Utf32Decoder {
    pub fn new(order: Option<ByteOrder>) -> Self {
        Self { order }
    }
}

impl Decode for Utf32Decoder {
    fn decode(&mut self, src: &[u8], dst: &mut String) -> Result<(), Malformed> {
        let (order, skip) = match self.order {
            Some(order) => (order, 0),
            None => match src {
                [0xFF, 0xFE, 0x00, 0x00, ..] => (ByteOrder::Little, 4),
                [0x00, 0x00, 0xFE, 0xFF, ..] => (ByteOrder::Big, 4),
                _ => (ByteOrder::Big, 0),
            },
        };

        let body = &src[skip..];
        dst.reserve(body.len());
        let mut chunks = body.chunks_exact(4);
        for (i, chunk) in chunks.by_ref().enumerate() {
            let unit = order.read32([chunk[0], chunk[1], chunk[2], chunk[3]]);
            match char::from_u32(unit) {
                Some(c) => dst.push(c),
                None => {
                    return Err(Malformed {
                        offset: skip + i * 4,
                    })
                }
            }
        }
        if !chunks.remainder().is_empty() {
            return Err(Malformed {
                offset: src.len() - chunks.remainder().len(),
            });
        }
        Ok(())
    }
}

/// UTF-32 encoder, optionally writing a BOM before the first character
pub struct Utf32Encoder {
    order: ByteOrder,
    bom_pending: bool,
}

impl Utf32Encoder {
    pub fn new(order: ByteOrder, with_bom: bool) -> Self {
        Self {
            order,
            bom_pending: with_bom,
        }
    }
}

impl Encode for Utf32Encoder {
    fn encode(&mut self, src: &str, dst: &mut [u8]) -> (EncodeStatus, usize, usize) {
        let mut written = 0;
        if self.bom_pending && !src.is_empty() {
            if !put(dst, &mut written, &self.order.unit32(BOM as u32)) {
                return (EncodeStatus::OutputFull, 0, 0);
            }
            self.bom_pending = false;
        }
        for (offset, c) in src.char_indices() {
            if !put(dst, &mut written, &self.order.unit32(c as u32)) {
                return (EncodeStatus::OutputFull, offset, written);
            }
        }
        (EncodeStatus::InputEmpty, src.len(), written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_all(encoder: &mut dyn Encode, text: &str) -> Vec<u8> {
        let mut buf = vec![0u8; text.len() * 4 + 4];
        let (status, read, written) = encoder.encode(text, &mut buf);
        assert_eq!(status, EncodeStatus::InputEmpty);
        assert_eq!(read, text.len());
        buf.truncate(written);
        buf
    }

    #[test]
    fn test_utf16_bom_little_endian() {
        let bytes = encode_all(&mut Utf16Encoder::new(ByteOrder::Little, true), "A");
        assert_eq!(bytes, vec![0xFF, 0xFE, 0x41, 0x00]);
    }

    #[test]
    fn test_utf16_no_bom_for_empty_input() {
        let bytes = encode_all(&mut Utf16Encoder::new(ByteOrder::Little, true), "");
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_utf16be_surrogate_pair() {
        let bytes = encode_all(&mut Utf16Encoder::new(ByteOrder::Big, false), "😀");
        assert_eq!(bytes, vec![0xD8, 0x3D, 0xDE, 0x00]);
    }

    #[test]
    fn test_utf16_output_full_keeps_pair_whole() {
        let mut buf = [0u8; 5];
        let mut encoder = Utf16Encoder::new(ByteOrder::Little, false);
        let (status, read, written) = encoder.encode("a😀", &mut buf);
        assert_eq!(status, EncodeStatus::OutputFull);
        assert_eq!(read, 1);
        assert_eq!(written, 2);
    }

    #[test]
    fn test_utf16_decode_sniffs_bom() {
        let mut out = String::new();
        Utf16Decoder::new(None)
            .decode(&[0xFF, 0xFE, 0x41, 0x00], &mut out)
            .unwrap();
        assert_eq!(out, "A");

        let mut out = String::new();
        Utf16Decoder::new(None).decode(&[0x00, 0x41], &mut out).unwrap();
        assert_eq!(out, "A");
    }

    #[test]
    fn test_utf16_lone_surrogate_is_malformed() {
        let mut out = String::new();
        let err = Utf16Decoder::new(Some(ByteOrder::Little))
            .decode(&[0x41, 0x00, 0x00, 0xDC], &mut out)
            .unwrap_err();
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn test_utf16_odd_length_is_malformed() {
        let mut out = String::new();
        assert!(Utf16Decoder::new(Some(ByteOrder::Big))
            .decode(&[0x00, 0x41, 0x00], &mut out)
            .is_err());
    }

    #[test]
    fn test_utf32_round_trip_with_bom() {
        let bytes = encode_all(&mut Utf32Encoder::new(ByteOrder::Little, true), "é😀");
        assert_eq!(&bytes[..4], &[0xFF, 0xFE, 0x00, 0x00]);
        assert_eq!(bytes.len(), 12);

        let mut out = String::new();
        Utf32Decoder::new(None).decode(&bytes, &mut out).unwrap();
        assert_eq!(out, "é😀");
    }

    #[test]
    fn test_utf32_rejects_out_of_range() {
        let mut out = String::new();
        let err = Utf32Decoder::new(Some(ByteOrder::Big))
            .decode(&[0x00, 0x00, 0x00, 0x41, 0x00, 0x11, 0x00, 0x00], &mut out)
            .unwrap_err();
        assert_eq!(err.offset, 4);
    }

    #[test]
    fn test_utf32_rejects_surrogate_and_truncation() {
        let mut out = String::new();
        assert!(Utf32Decoder::new(Some(ByteOrder::Little))
            .decode(&[0x00, 0xD8, 0x00, 0x00], &mut out)
            .is_err());

        let mut out = String::new();
        let err = Utf32Decoder::new(Some(ByteOrder::Little))
            .decode(&[0x41, 0x00, 0x00, 0x00, 0x42], &mut out)
            .unwrap_err();
        assert_eq!(err.offset, 4);
    }
}
