//! Adapters over `encoding_rs` streaming decoders and encoders.

use super::{Decode, Encode, EncodeStatus, Malformed};
use encoding_rs::{Decoder, DecoderResult, Encoder, EncoderResult, Encoding};

/// Decoder for any encoding known to `encoding_rs`, without BOM sniffing
pub struct WhatwgDecoder {
    inner: Decoder,
}

impl WhatwgDecoder {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            inner: encoding.new_decoder_without_bom_handling(),
        }
    }
}

impl Decode for WhatwgDecoder {
    fn decode(&mut self, src: &[u8], dst: &mut String) -> Result<(), Malformed> {
        let mut read = 0;
        loop {
            let remaining = src.len() - read;
            let needed = self
                .inner
                .max_utf8_buffer_length_without_replacement(remaining)
                .unwrap_or(remaining);
            dst.reserve(needed.max(16));

            let (result, consumed) =
                self.inner
                    .decode_to_string_without_replacement(&src[read..], dst, true);
            read += consumed;

            match result {
                DecoderResult::InputEmpty => return Ok(()),
                DecoderResult::OutputFull => continue,
                DecoderResult::Malformed(bad, extra) => {
                    let offset = read.saturating_sub(bad as usize + extra as usize);
                    return Err(Malformed { offset });
                }
            }
        }
    }
}

/// Encoder for `encoding_rs` encodings whose output encoding is themselves
pub struct WhatwgEncoder {
    inner: Encoder,
}

impl WhatwgEncoder {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            inner: encoding.new_encoder(),
        }
    }
}

impl Encode for WhatwgEncoder {
    fn encode(&mut self, src: &str, dst: &mut [u8]) -> (EncodeStatus, usize, usize) {
        let (result, read, written) = self
            .inner
            .encode_from_utf8_without_replacement(src, dst, true);
        let status = match result {
            EncoderResult::InputEmpty => EncodeStatus::InputEmpty,
            EncoderResult::OutputFull => EncodeStatus::OutputFull,
            EncoderResult::Unmappable(c) => EncodeStatus::Unmappable(c),
        };
        (status, read, written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{SHIFT_JIS, UTF_8, WINDOWS_1252};

    #[test]
    fn test_utf8_rejects_lone_ff() {
        let mut out = String::new();
        let err = WhatwgDecoder::new(UTF_8).decode(&[0xFF], &mut out).unwrap_err();
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn test_utf8_reports_offset_of_bad_sequence() {
        let mut out = String::new();
        let err = WhatwgDecoder::new(UTF_8)
            .decode(b"abc\xC3(", &mut out)
            .unwrap_err();
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn test_windows_1252_decode() {
        let mut out = String::new();
        WhatwgDecoder::new(WINDOWS_1252)
            .decode(&[0x80, b'1'], &mut out)
            .unwrap();
        assert_eq!(out, "€1");
    }

    #[test]
    fn test_shift_jis_round_trip() {
        let mut buf = [0u8; 16];
        let (status, read, written) = WhatwgEncoder::new(SHIFT_JIS).encode("日本", &mut buf);
        assert_eq!(status, EncodeStatus::InputEmpty);
        assert_eq!(read, "日本".len());

        let mut out = String::new();
        WhatwgDecoder::new(SHIFT_JIS)
            .decode(&buf[..written], &mut out)
            .unwrap();
        assert_eq!(out, "日本");
    }

    #[test]
    fn test_encoder_reports_unmappable() {
        let mut buf = [0u8; 16];
        let (status, _, _) = WhatwgEncoder::new(WINDOWS_1252).encode("ж", &mut buf);
        assert_eq!(status, EncodeStatus::Unmappable('ж'));
    }
}
