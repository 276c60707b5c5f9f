//! Validation and conversion over a [`Transcoder`]

use crate::config::ConversionLimits;
use crate::context::{Conversion, StandardTranscoder, Status, Transcoder};
use crate::error::TextEncodingError;
use std::sync::Arc;
use tracing::debug;

/// Runs single-shot conversions against a transcoder.
///
/// Each call opens its own context and drops it before returning, so one
/// adapter can be shared freely across threads.
#[derive(Clone)]
pub struct EncodingAdapter {
    transcoder: Arc<dyn Transcoder>,
    limits: ConversionLimits,
}

impl Default for EncodingAdapter {
    fn default() -> Self {
        Self::new(Arc::new(StandardTranscoder), ConversionLimits::default())
    }
}

impl EncodingAdapter {
    pub fn new(transcoder: Arc<dyn Transcoder>, limits: ConversionLimits) -> Self {
        Self { transcoder, limits }
    }

    pub fn transcoder(&self) -> &Arc<dyn Transcoder> {
        &self.transcoder
    }

    pub fn limits(&self) -> ConversionLimits {
        self.limits
    }

    /// Whether `text` is valid in `encoding`.
    ///
    /// Only the decoding side is checked, so this agrees with a successful
    /// `convert(encoding, "UTF-8", text)`. Unknown encodings are reported
    /// as invalid.
    pub fn is_valid(&self, encoding: &str, text: &[u8]) -> bool {
        match self.transcoder.validate(encoding, text) {
            Ok(_) => true,
            Err(e) => {
                debug!(encoding = %encoding, error = %e, "text_encoding.invalid");
                false
            }
        }
    }

    /// Convert `text` from `from` to `to`
    pub fn convert(&self, from: &str, to: &str, text: &[u8]) -> Result<Vec<u8>, TextEncodingError> {
        let mut context = self.transcoder.open(from, to)?;
        self.run(context.as_mut(), text)
    }

    /// Drive `context` over `input`, growing the output until it fits
    fn run(&self, context: &mut dyn Conversion, input: &[u8]) -> Result<Vec<u8>, TextEncodingError> {
        let mut output = vec![0u8; self.limits.initial_capacity(input.len())];
        let mut read = 0;
        let mut written = 0;

        loop {
            let progress = context.convert(&input[read..], &mut output[written..])?;
            read += progress.read;
            written += progress.written;

            match progress.status {
                Status::Complete => {
                    output.truncate(written);
                    return Ok(output);
                }
                Status::OutputFull => {
                    let size = self.limits.grow(output.len())?;
                    output.resize(size, 0);
                }
            }
        }
    }
}
