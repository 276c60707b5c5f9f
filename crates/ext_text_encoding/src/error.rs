//! Error types with structured codes

/// Error codes for text encoding operations (8100-8105)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum TextEncodingErrorCode {
    /// Generic text encoding error
    Generic = 8100,
    /// Encoding name not recognized by the transcoder
    UnsupportedEncoding = 8101,
    /// Input is not a valid byte sequence in the source encoding
    InvalidSequence = 8102,
    /// Character cannot be represented in the target encoding
    Unmappable = 8103,
    /// Output would exceed the configured size cap
    CapacityExceeded = 8104,
    /// Configuration could not be parsed or has invalid values
    InvalidConfig = 8105,
}

/// Custom error type for text encoding operations
#[derive(Debug, thiserror::Error, deno_error::JsError)]
pub enum TextEncodingError {
    #[error("[{code}] Text encoding error: {message}")]
    #[class(generic)]
    Generic { code: u32, message: String },

    #[error("[{code}] Unsupported encoding: {message}")]
    #[class(generic)]
    UnsupportedEncoding { code: u32, message: String },

    #[error("[{code}] Invalid byte sequence: {message}")]
    #[class(generic)]
    InvalidSequence { code: u32, message: String },

    #[error("[{code}] Unmappable character: {message}")]
    #[class(generic)]
    Unmappable { code: u32, message: String },

    #[error("[{code}] Output capacity exceeded: {message}")]
    #[class(generic)]
    CapacityExceeded { code: u32, message: String },

    #[error("[{code}] Invalid configuration: {message}")]
    #[class(generic)]
    InvalidConfig { code: u32, message: String },
}

impl TextEncodingError {
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            code: TextEncodingErrorCode::Generic as u32,
            message: message.into(),
        }
    }

    pub fn unsupported_encoding(message: impl Into<String>) -> Self {
        Self::UnsupportedEncoding {
            code: TextEncodingErrorCode::UnsupportedEncoding as u32,
            message: message.into(),
        }
    }

    pub fn invalid_sequence(message: impl Into<String>) -> Self {
        Self::InvalidSequence {
            code: TextEncodingErrorCode::InvalidSequence as u32,
            message: message.into(),
        }
    }

    pub fn unmappable(message: impl Into<String>) -> Self {
        Self::Unmappable {
            code: TextEncodingErrorCode::Unmappable as u32,
            message: message.into(),
        }
    }

    pub fn capacity_exceeded(message: impl Into<String>) -> Self {
        Self::CapacityExceeded {
            code: TextEncodingErrorCode::CapacityExceeded as u32,
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            code: TextEncodingErrorCode::InvalidConfig as u32,
            message: message.into(),
        }
    }

    /// Numeric code carried by every variant
    pub fn code(&self) -> u32 {
        match self {
            Self::Generic { code, .. }
            | Self::UnsupportedEncoding { code, .. }
            | Self::InvalidSequence { code, .. }
            | Self::Unmappable { code, .. }
            | Self::CapacityExceeded { code, .. }
            | Self::InvalidConfig { code, .. } => *code,
        }
    }
}
