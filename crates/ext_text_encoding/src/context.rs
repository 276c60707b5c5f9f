//! Transcoding facility and per-call conversion contexts
//!
//! A [`Transcoder`] opens a [`Conversion`] for a (from, to) pair. The
//! returned box owns all conversion state and releases it when dropped, so
//! every exit path of a caller frees the context.

use crate::charset::Charset;
use crate::codec::{Decode, Encode, EncodeStatus, Malformed};
use crate::error::TextEncodingError;
use tracing::trace;

/// How a conversion step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// All input has been converted and written
    Complete,
    /// The output buffer is full; call again with more room
    OutputFull,
}

/// Bytes consumed and produced by one conversion step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub read: usize,
    pub written: usize,
    pub status: Status,
}

/// A stateful conversion bound to one encoding pair
pub trait Conversion: Send {
    /// Convert `src` into `dst`.
    ///
    /// `src` is the remaining input in full; the input is never split by
    /// the caller. On [`Status::OutputFull`] the caller supplies a fresh
    /// output slice together with `src[read..]`.
    fn convert(&mut self, src: &[u8], dst: &mut [u8]) -> Result<Progress, TextEncodingError>;
}

/// Opens conversion contexts for named encodings
pub trait Transcoder: Send + Sync {
    fn open(&self, from: &str, to: &str) -> Result<Box<dyn Conversion>, TextEncodingError>;

    /// Check that all of `text` decodes in `encoding`.
    ///
    /// Only the source side runs; nothing is re-encoded.
    fn validate(&self, encoding: &str, text: &[u8]) -> Result<(), TextEncodingError>;

    /// Whether `name` is an encoding this transcoder can open
    fn recognizes(&self, name: &str) -> bool;
}

/// Default transcoder: built-in Unicode/ASCII/Latin-1 codecs plus `encoding_rs`
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardTranscoder;

impl StandardTranscoder {
    fn charset(name: &str) -> Result<Charset, TextEncodingError> {
        Charset::resolve(name)
            .ok_or_else(|| TextEncodingError::unsupported_encoding(format!("'{}'", name)))
    }
}

impl Transcoder for StandardTranscoder {
    fn open(&self, from: &str, to: &str) -> Result<Box<dyn Conversion>, TextEncodingError> {
        let from = Self::charset(from)?;
        let to = Self::charset(to)?;
        Ok(Box::new(ConversionContext::new(from, to)))
    }

    fn validate(&self, encoding: &str, text: &[u8]) -> Result<(), TextEncodingError> {
        let charset = Self::charset(encoding)?;
        let mut decoded = String::with_capacity(text.len());
        charset
            .decoder()
            .decode(text, &mut decoded)
            .map_err(|e| invalid_sequence(charset, text, e))
    }

    fn recognizes(&self, name: &str) -> bool {
        Charset::resolve(name).is_some()
    }
}

fn invalid_sequence(charset: Charset, src: &[u8], e: Malformed) -> TextEncodingError {
    TextEncodingError::invalid_sequence(format!(
        "byte 0x{:02X} at offset {} is not valid {}",
        src.get(e.offset).copied().unwrap_or(0),
        e.offset,
        charset.name()
    ))
}

/// Conversion that decodes the source into UTF-8, then encodes it
pub struct ConversionContext {
    from: Charset,
    to: Charset,
    decoder: Box<dyn Decode>,
    encoder: Box<dyn Encode>,
    pending: String,
    pending_pos: usize,
}

impl ConversionContext {
    pub fn new(from: Charset, to: Charset) -> Self {
        trace!(from = from.name(), to = to.name(), "conversion context opened");
        Self {
            from,
            to,
            decoder: from.decoder(),
            encoder: to.encoder(),
            pending: String::new(),
            pending_pos: 0,
        }
    }
}

impl Conversion for ConversionContext {
    fn convert(&mut self, src: &[u8], dst: &mut [u8]) -> Result<Progress, TextEncodingError> {
        if !src.is_empty() {
            let from = self.from;
            self.decoder
                .decode(src, &mut self.pending)
                .map_err(|e| invalid_sequence(from, src, e))?;
        }
        let read = src.len();

        let (status, consumed, written) = self.encoder.encode(&self.pending[self.pending_pos..], dst);
        self.pending_pos += consumed;

        match status {
            EncodeStatus::InputEmpty => Ok(Progress {
                read,
                written,
                status: Status::Complete,
            }),
            EncodeStatus::OutputFull => Ok(Progress {
                read,
                written,
                status: Status::OutputFull,
            }),
            EncodeStatus::Unmappable(c) => Err(TextEncodingError::unmappable(format!(
                "U+{:04X} '{}' cannot be represented in {}",
                c as u32,
                c,
                self.to.name()
            ))),
        }
    }
}

impl Drop for ConversionContext {
    fn drop(&mut self) {
        trace!(from = self.from.name(), to = self.to.name(), "conversion context released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_unknown_encoding() {
        let err = StandardTranscoder.open("UTF-8", "KLINGON").err().unwrap();
        assert!(matches!(err, TextEncodingError::UnsupportedEncoding { .. }));

        let err = StandardTranscoder.open("KLINGON", "UTF-8").err().unwrap();
        assert!(matches!(err, TextEncodingError::UnsupportedEncoding { .. }));
    }

    #[test]
    fn test_convert_reports_output_full_then_completes() {
        let mut context = StandardTranscoder.open("UTF-8", "UTF-32BE").unwrap();
        let input = "ab".as_bytes();

        let mut first = [0u8; 4];
        let progress = context.convert(input, &mut first).unwrap();
        assert_eq!(progress.read, 2);
        assert_eq!(progress.written, 4);
        assert_eq!(progress.status, Status::OutputFull);

        let mut second = [0u8; 4];
        let progress = context.convert(&input[progress.read..], &mut second).unwrap();
        assert_eq!(progress.status, Status::Complete);
        assert_eq!(second, [0, 0, 0, b'b']);
    }

    #[test]
    fn test_invalid_sequence_message() {
        let mut context = StandardTranscoder.open("UTF-8", "UTF-8").unwrap();
        let mut out = [0u8; 8];
        let err = context.convert(&[b'a', 0xFF], &mut out).unwrap_err();
        assert!(matches!(err, TextEncodingError::InvalidSequence { .. }));
        assert!(err.to_string().contains("offset 1"));
    }

    #[test]
    fn test_unmappable_message() {
        let mut context = StandardTranscoder.open("UTF-8", "ASCII").unwrap();
        let mut out = [0u8; 16];
        let err = context.convert("café".as_bytes(), &mut out).unwrap_err();
        assert!(err.to_string().contains("U+00E9"));
    }

    #[test]
    fn test_validate_runs_decoder_only() {
        // JIS X 0212 decodes in EUC-JP but has no encoder mapping
        let text = [0x8F, 0xB0, 0xA1];
        assert!(StandardTranscoder.validate("EUC-JP", &text).is_ok());
        assert!(StandardTranscoder.open("EUC-JP", "EUC-JP").is_ok());

        let err = StandardTranscoder.validate("UTF-8", &[b'a', 0xFF]).unwrap_err();
        assert!(err.to_string().contains("offset 1"));

        let err = StandardTranscoder.validate("KLINGON", b"a").unwrap_err();
        assert!(matches!(err, TextEncodingError::UnsupportedEncoding { .. }));
    }

    #[test]
    fn test_recognizes() {
        assert!(StandardTranscoder.recognizes("GB18030"));
        assert!(!StandardTranscoder.recognizes("NOPE"));
    }
}
