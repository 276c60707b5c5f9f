//! Encoding name resolution
//!
//! Names are matched case-insensitively after trimming whitespace. The
//! Unicode family, ASCII and ISO-8859-1 are resolved here with iconv's
//! meaning; every other label is looked up in `encoding_rs`. The WHATWG
//! standard folds the ASCII and ISO-8859-1 labels into windows-1252, so only
//! the windows-1252 names themselves keep that mapping.

use crate::codec::{
    Ascii, ByteOrder, Decode, Encode, Latin1, Utf16Decoder, Utf16Encoder, Utf32Decoder,
    Utf32Encoder, WhatwgDecoder, WhatwgEncoder,
};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};

/// A resolved character set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Utf8,
    /// `None` is the BOM-marked form
    Utf16(Option<ByteOrder>),
    /// `None` is the BOM-marked form
    Utf32(Option<ByteOrder>),
    Ascii,
    Latin1,
    /// Any other encoding known to `encoding_rs`
    Legacy(&'static Encoding),
}

impl Charset {
    /// Resolve an encoding name, returning `None` if it is not recognized
    pub fn resolve(name: &str) -> Option<Charset> {
        let label = name.trim().to_ascii_lowercase();
        let charset = match label.as_str() {
            "" => return None,
            "utf-8" | "utf8" => Charset::Utf8,
            "utf-16" | "utf16" => Charset::Utf16(None),
            "utf-16le" | "utf16le" => Charset::Utf16(Some(ByteOrder::Little)),
            "utf-16be" | "utf16be" => Charset::Utf16(Some(ByteOrder::Big)),
            "utf-32" | "utf32" => Charset::Utf32(None),
            "utf-32le" | "utf32le" => Charset::Utf32(Some(ByteOrder::Little)),
            "utf-32be" | "utf32be" => Charset::Utf32(Some(ByteOrder::Big)),
            "ascii" | "us-ascii" | "ansi_x3.4-1968" | "iso646-us" | "646" | "csascii"
            | "iso-ir-6" | "iso_646.irv:1991" | "us" | "ibm367" | "cp367" => Charset::Ascii,
            "latin-1" => Charset::Latin1,
            other => {
                let encoding = Encoding::for_label_no_replacement(other.as_bytes())?;
                if encoding == WINDOWS_1252 {
                    // The remaining windows-1252 labels are all ISO-8859-1 aliases
                    match other {
                        "windows-1252" | "cp1252" | "x-cp1252" => Charset::Legacy(encoding),
                        _ => Charset::Latin1,
                    }
                } else if encoding == UTF_8 {
                    Charset::Utf8
                } else if encoding == UTF_16LE {
                    Charset::Utf16(Some(ByteOrder::Little))
                } else if encoding == UTF_16BE {
                    Charset::Utf16(Some(ByteOrder::Big))
                } else {
                    Charset::Legacy(encoding)
                }
            }
        };
        Some(charset)
    }

    /// Canonical display name
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Utf16(None) => "UTF-16",
            Charset::Utf16(Some(ByteOrder::Little)) => "UTF-16LE",
            Charset::Utf16(Some(ByteOrder::Big)) => "UTF-16BE",
            Charset::Utf32(None) => "UTF-32",
            Charset::Utf32(Some(ByteOrder::Little)) => "UTF-32LE",
            Charset::Utf32(Some(ByteOrder::Big)) => "UTF-32BE",
            Charset::Ascii => "ASCII",
            Charset::Latin1 => "ISO-8859-1",
            Charset::Legacy(encoding) => encoding.name(),
        }
    }

    pub fn decoder(&self) -> Box<dyn Decode> {
        match *self {
            Charset::Utf8 => Box::new(WhatwgDecoder::new(UTF_8)),
            Charset::Utf16(order) => Box::new(Utf16Decoder::new(order)),
            Charset::Utf32(order) => Box::new(Utf32Decoder::new(order)),
            Charset::Ascii => Box::new(Ascii),
            Charset::Latin1 => Box::new(Latin1),
            Charset::Legacy(encoding) => Box::new(WhatwgDecoder::new(encoding)),
        }
    }

    pub fn encoder(&self) -> Box<dyn Encode> {
        match *self {
            Charset::Utf8 => Box::new(WhatwgEncoder::new(UTF_8)),
            Charset::Utf16(order) => Box::new(Utf16Encoder::new(
                order.unwrap_or(ByteOrder::Little),
                order.is_none(),
            )),
            Charset::Utf32(order) => Box::new(Utf32Encoder::new(
                order.unwrap_or(ByteOrder::Little),
                order.is_none(),
            )),
            Charset::Ascii => Box::new(Ascii),
            Charset::Latin1 => Box::new(Latin1),
            Charset::Legacy(encoding) => Box::new(WhatwgEncoder::new(encoding)),
        }
    }
}
