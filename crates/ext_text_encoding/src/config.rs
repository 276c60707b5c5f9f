//! Configuration and the advertised encoding table

use crate::error::TextEncodingError;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::collections::HashSet;

/// Encodings advertised when no configuration overrides them, in order
pub const DEFAULT_TEXT_ENCODINGS: &[&str] = &[
    "UTF-8",
    "UTF-16",
    "UTF-16LE",
    "UTF-16BE",
    "UTF-32",
    "UTF-32LE",
    "UTF-32BE",
    "ASCII",
    "ISO-8859-1",
    "ISO-8859-2",
    "ISO-8859-5",
    "ISO-8859-7",
    "ISO-8859-15",
    "WINDOWS-1250",
    "WINDOWS-1251",
    "WINDOWS-1252",
    "KOI8-R",
    "KOI8-U",
    "IBM866",
    "MACINTOSH",
    "SHIFT_JIS",
    "EUC-JP",
    "ISO-2022-JP",
    "EUC-KR",
    "GBK",
    "GB18030",
    "BIG5",
];

const DEFAULT_INITIAL_EXPANSION: usize = 4;
const DEFAULT_MAX_OUTPUT_BYTES: usize = 64 * 1024 * 1024;

/// Process-wide advertised encoding table
static TEXT_ENCODINGS: OnceCell<Vec<String>> = OnceCell::new();

/// Text encoding configuration (`[text_encoding]` in the app manifest)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TextEncodingConfig {
    /// Advertised encoding names, in order (default: built-in table)
    pub encodings: Option<Vec<String>>,
    /// Initial output size as a multiple of the input length (default: 4)
    pub initial_expansion: Option<usize>,
    /// Maximum converted output in bytes (default: 64 MiB)
    pub max_output_bytes: Option<usize>,
}

impl TextEncodingConfig {
    /// Parse a configuration table from TOML source
    pub fn from_toml_str(source: &str) -> Result<Self, TextEncodingError> {
        let config: TextEncodingConfig = toml::from_str(source)
            .map_err(|e| TextEncodingError::invalid_config(e.to_string()))?;
        config.limits()?;
        Ok(config)
    }

    /// Output buffer limits described by this configuration
    pub fn limits(&self) -> Result<ConversionLimits, TextEncodingError> {
        let initial_expansion = self.initial_expansion.unwrap_or(DEFAULT_INITIAL_EXPANSION);
        let max_output_bytes = self.max_output_bytes.unwrap_or(DEFAULT_MAX_OUTPUT_BYTES);
        if initial_expansion == 0 {
            return Err(TextEncodingError::invalid_config(
                "initial_expansion must be greater than 0",
            ));
        }
        if max_output_bytes == 0 {
            return Err(TextEncodingError::invalid_config(
                "max_output_bytes must be greater than 0",
            ));
        }
        Ok(ConversionLimits {
            initial_expansion,
            max_output_bytes,
        })
    }
}

/// Sizing policy for conversion output buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionLimits {
    pub initial_expansion: usize,
    pub max_output_bytes: usize,
}

impl Default for ConversionLimits {
    fn default() -> Self {
        Self {
            initial_expansion: DEFAULT_INITIAL_EXPANSION,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

impl ConversionLimits {
    /// First buffer size for an input of `input_len` bytes
    pub fn initial_capacity(&self, input_len: usize) -> usize {
        input_len
            .saturating_mul(self.initial_expansion)
            .min(self.max_output_bytes)
    }

    /// Next buffer size after `current` filled up
    pub fn grow(&self, current: usize) -> Result<usize, TextEncodingError> {
        if current >= self.max_output_bytes {
            return Err(TextEncodingError::capacity_exceeded(format!(
                "output exceeds {} bytes",
                self.max_output_bytes
            )));
        }
        Ok(current.saturating_mul(2).max(16).min(self.max_output_bytes))
    }
}

/// Install the advertised encoding table.
///
/// Duplicates (compared case-insensitively) are dropped, keeping the first
/// occurrence. Returns `false` if the table was already initialized, in
/// which case it is left unchanged.
pub fn init_supported_encodings(names: Vec<String>) -> bool {
    TEXT_ENCODINGS.set(dedup(names)).is_ok()
}

/// The advertised encoding table.
///
/// Falls back to [`DEFAULT_TEXT_ENCODINGS`] if nothing was installed before
/// the first read.
pub fn supported_encodings() -> &'static [String] {
    TEXT_ENCODINGS.get_or_init(|| {
        DEFAULT_TEXT_ENCODINGS
            .iter()
            .map(|name| name.to_string())
            .collect()
    })
}

pub(crate) fn dedup(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.trim().to_ascii_uppercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_has_no_duplicates() {
        let unique: HashSet<_> = DEFAULT_TEXT_ENCODINGS.iter().collect();
        assert_eq!(unique.len(), DEFAULT_TEXT_ENCODINGS.len());
    }

    #[test]
    fn test_supported_encodings_is_stable() {
        let first = supported_encodings();
        let second = supported_encodings();
        assert!(!first.is_empty());
        assert_eq!(first, second);
        assert!(!init_supported_encodings(vec!["UTF-8".to_string()]));
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let names = vec![
            "utf-8".to_string(),
            "ASCII".to_string(),
            "UTF-8".to_string(),
        ];
        assert_eq!(dedup(names), vec!["utf-8".to_string(), "ASCII".to_string()]);
    }

    #[test]
    fn test_parse_config() {
        let config = TextEncodingConfig::from_toml_str(
            r#"
            encodings = ["UTF-8", "ASCII"]
            max_output_bytes = 1024
            "#,
        )
        .unwrap();
        assert_eq!(config.encodings.as_deref().map(|e| e.len()), Some(2));

        let limits = config.limits().unwrap();
        assert_eq!(limits.initial_expansion, 4);
        assert_eq!(limits.max_output_bytes, 1024);
    }

    #[test]
    fn test_parse_config_rejects_zero() {
        let err = TextEncodingConfig::from_toml_str("initial_expansion = 0").unwrap_err();
        assert!(matches!(err, TextEncodingError::InvalidConfig { .. }));
    }

    #[test]
    fn test_parse_config_rejects_bad_toml() {
        let err = TextEncodingConfig::from_toml_str("encodings = 7").unwrap_err();
        assert!(matches!(err, TextEncodingError::InvalidConfig { .. }));
    }

    #[test]
    fn test_limits_growth() {
        let limits = ConversionLimits {
            initial_expansion: 4,
            max_output_bytes: 100,
        };
        assert_eq!(limits.initial_capacity(10), 40);
        assert_eq!(limits.initial_capacity(50), 100);
        assert_eq!(limits.grow(0).unwrap(), 16);
        assert_eq!(limits.grow(40).unwrap(), 80);
        assert_eq!(limits.grow(80).unwrap(), 100);
        assert!(limits.grow(100).is_err());
    }
}
