//! runtime:text_encoding extension - Character set validation and conversion
//!
//! Exposes `text_encoding_is_valid`, `encode_text` and `text_encodings` to
//! scripts, both as deno_core ops and as host built-ins registered through
//! a [`builtins::FunctionRegistry`]. Conversions are backed by `encoding_rs`
//! for legacy charsets and by small built-in codecs for the Unicode family,
//! ASCII and ISO-8859-1.

pub mod adapter;
pub mod builtins;
pub mod charset;
pub mod codec;
pub mod config;
pub mod context;
pub mod error;

pub use adapter::EncodingAdapter;
pub use builtins::register_text_encoding;
pub use config::{supported_encodings, ConversionLimits, TextEncodingConfig};
pub use context::{StandardTranscoder, Transcoder};
pub use error::{TextEncodingError, TextEncodingErrorCode};

use deno_core::{op2, Extension, OpState};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::{debug, error, warn};

// ============================================================================
// State
// ============================================================================

/// Adapter used when no state was installed in OpState
static DEFAULT_ADAPTER: Lazy<EncodingAdapter> = Lazy::new(EncodingAdapter::default);

/// Wrapper to store the adapter in OpState
pub struct TextEncodingState {
    pub adapter: Arc<EncodingAdapter>,
}

fn adapter_from(state: &OpState) -> &EncodingAdapter {
    select_adapter(state.try_borrow::<TextEncodingState>())
}

fn select_adapter(state: Option<&TextEncodingState>) -> &EncodingAdapter {
    match state {
        Some(s) => s.adapter.as_ref(),
        None => &*DEFAULT_ADAPTER,
    }
}

/// Set up text encoding for the process.
///
/// Probes the transcoder with a UTF-8 round trip, installs the advertised
/// encoding table and returns the shared adapter.
pub fn init_text_encoding(
    config: &TextEncodingConfig,
) -> Result<Arc<EncodingAdapter>, TextEncodingError> {
    let adapter = EncodingAdapter::new(Arc::new(StandardTranscoder), config.limits()?);

    if let Err(e) = adapter.transcoder().open("UTF-8", "UTF-8") {
        error!(error = %e, "text_encoding: UTF-8 probe failed");
    }

    let names = advertised_names(config, adapter.transcoder().as_ref());
    if !crate::config::init_supported_encodings(names) {
        debug!("text_encoding: encoding table already initialized");
    }

    Ok(Arc::new(adapter))
}

/// Names to advertise for `config`.
///
/// Configured names the transcoder cannot open are dropped with a warning,
/// then duplicates are removed case-insensitively.
fn advertised_names(config: &TextEncodingConfig, transcoder: &dyn Transcoder) -> Vec<String> {
    let names: Vec<String> = match &config.encodings {
        Some(names) => names
            .iter()
            .filter(|name| {
                let known = transcoder.recognizes(name);
                if !known {
                    warn!(encoding = %name, "text_encoding: ignoring unrecognized encoding");
                }
                known
            })
            .cloned()
            .collect(),
        None => crate::config::DEFAULT_TEXT_ENCODINGS
            .iter()
            .map(|name| name.to_string())
            .collect(),
    };
    crate::config::dedup(names)
}

/// Initialize text encoding state in OpState
pub fn init_text_encoding_state(op_state: &mut OpState, adapter: Arc<EncodingAdapter>) {
    op_state.put(TextEncodingState { adapter });
}

// ============================================================================
// Helper Functions (Internal implementations used by ops and tests)
// ============================================================================

fn is_valid_impl(adapter: &EncodingAdapter, encoding: &str, text: &[u8]) -> bool {
    adapter.is_valid(encoding, text)
}

fn encode_text_impl(
    adapter: &EncodingAdapter,
    text: &[u8],
    from_encoding: &str,
    to_encoding: &str,
) -> Result<Vec<u8>, TextEncodingError> {
    adapter.convert(from_encoding, to_encoding, text)
}

fn text_encodings_impl() -> Vec<String> {
    supported_encodings().to_vec()
}

// ============================================================================
// Operations
// ============================================================================

/// Check whether text is valid in the given encoding
#[op2(fast)]
pub fn op_text_encoding_is_valid(
    state: &OpState,
    #[string] encoding: String,
    #[buffer] text: &[u8],
) -> bool {
    debug!(encoding = %encoding, len = text.len(), "text_encoding.is_valid");
    is_valid_impl(adapter_from(state), &encoding, text)
}

/// Convert text from one encoding to another
#[op2]
#[buffer]
pub fn op_encode_text(
    state: &OpState,
    #[buffer] text: &[u8],
    #[string] from_encoding: String,
    #[string] to_encoding: String,
) -> Result<Vec<u8>, TextEncodingError> {
    debug!(from = %from_encoding, to = %to_encoding, len = text.len(), "text_encoding.encode");
    encode_text_impl(adapter_from(state), text, &from_encoding, &to_encoding)
}

/// List the advertised encoding names
#[op2]
#[serde]
pub fn op_text_encodings() -> Vec<String> {
    debug!("text_encoding.encodings");
    text_encodings_impl()
}

// ============================================================================
// Extension Registration
// ============================================================================

// Include generated extension! macro from build.rs
include!(concat!(env!("OUT_DIR"), "/extension.rs"));

pub fn text_encoding_extension() -> Extension {
    runtime_text_encoding::ext()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_impl() {
        let adapter = EncodingAdapter::default();
        assert!(is_valid_impl(&adapter, "UTF-8", b"hello"));
        assert!(!is_valid_impl(&adapter, "UTF-8", &[0xFF]));
        assert!(!is_valid_impl(&adapter, "NOPE", b"hello"));
    }

    #[test]
    fn test_encode_text_impl() {
        let adapter = EncodingAdapter::default();
        let out = encode_text_impl(&adapter, b"A", "UTF-8", "UTF-16").unwrap();
        assert!(out.len() >= 2);
        assert!(out.ends_with(&[0x41, 0x00]));

        let err = encode_text_impl(&adapter, "café".as_bytes(), "UTF-8", "ASCII").unwrap_err();
        assert_eq!(err.code(), TextEncodingErrorCode::Unmappable as u32);
    }

    #[test]
    fn test_text_encodings_impl() {
        let names = text_encodings_impl();
        assert!(!names.is_empty());
        assert_eq!(names, text_encodings_impl());
    }

    #[test]
    fn test_default_encodings_are_recognized() {
        for name in config::DEFAULT_TEXT_ENCODINGS {
            assert!(
                StandardTranscoder.recognizes(name),
                "{} should be recognized",
                name
            );
        }
    }

    #[test]
    fn test_init_text_encoding() {
        let adapter = init_text_encoding(&TextEncodingConfig::default()).unwrap();
        assert_eq!(adapter.limits(), ConversionLimits::default());
        assert!(supported_encodings().iter().any(|name| name == "UTF-8"));
    }

    #[test]
    fn test_advertised_names_drop_unknown_and_duplicates() {
        let config = TextEncodingConfig {
            encodings: Some(vec![
                "UTF-8".to_string(),
                "KLINGON".to_string(),
                "utf-8".to_string(),
            ]),
            ..Default::default()
        };
        assert_eq!(
            advertised_names(&config, &StandardTranscoder),
            vec!["UTF-8".to_string()]
        );
    }

    #[test]
    fn test_advertised_names_default_table() {
        let names = advertised_names(&TextEncodingConfig::default(), &StandardTranscoder);
        assert_eq!(names.len(), config::DEFAULT_TEXT_ENCODINGS.len());
        assert_eq!(names[0], "UTF-8");
    }

    #[test]
    fn test_init_rejects_invalid_limits() {
        let config = TextEncodingConfig {
            max_output_bytes: Some(0),
            ..Default::default()
        };
        assert!(init_text_encoding(&config).is_err());
    }

    #[test]
    fn test_select_adapter() {
        assert_eq!(select_adapter(None).limits(), ConversionLimits::default());

        let limits = ConversionLimits {
            initial_expansion: 2,
            max_output_bytes: 32,
        };
        let state = TextEncodingState {
            adapter: Arc::new(EncodingAdapter::new(Arc::new(StandardTranscoder), limits)),
        };
        assert_eq!(select_adapter(Some(&state)).limits(), limits);
    }
}
