//! Decoders and encoders that pivot through UTF-8.
//!
//! A conversion is always `source bytes -> String -> target bytes`. Decoders
//! consume the whole input in one call; encoders fill a caller-provided
//! buffer and report `OutputFull` when they run out of room, so the caller
//! can grow the buffer and continue.

mod single_byte;
mod unicode;
mod whatwg;

pub use single_byte::{Ascii, Latin1};
pub use unicode::{ByteOrder, Utf16Decoder, Utf16Encoder, Utf32Decoder, Utf32Encoder};
pub use whatwg::{WhatwgDecoder, WhatwgEncoder};

/// Position of the first byte that could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Malformed {
    pub offset: usize,
}

/// Outcome of a single encode call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeStatus {
    /// All input was encoded
    InputEmpty,
    /// The output buffer filled up before the input was exhausted
    OutputFull,
    /// The character cannot be represented in the target encoding
    Unmappable(char),
}

/// Decodes bytes of some encoding into UTF-8
pub trait Decode: Send {
    /// Decode all of `src`, appending to `dst`.
    fn decode(&mut self, src: &[u8], dst: &mut String) -> Result<(), Malformed>;
}

/// Encodes UTF-8 into bytes of some encoding
pub trait Encode: Send {
    /// Encode as much of `src` as fits into `dst`.
    ///
    /// Returns the status along with the number of bytes read from `src`
    /// and written to `dst`. Reads always end on a char boundary.
    fn encode(&mut self, src: &str, dst: &mut [u8]) -> (EncodeStatus, usize, usize);
}

/// Copy one encoded character into `dst` at `written`, if it fits
pub(crate) fn put(dst: &mut [u8], written: &mut usize, bytes: &[u8]) -> bool {
    let end = *written + bytes.len();
    if end > dst.len() {
        return false;
    }
    dst[*written..end].copy_from_slice(bytes);
    *written = end;
    true
}
