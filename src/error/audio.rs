// Audio codec error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Audio error code constants
///
/// Single source of truth for the numeric codes reported to the host UI.
///
/// Error code range: 2001-2006
pub struct AudioErrorCodes {}

impl AudioErrorCodes {
    /// Decoder was handed zero bytes
    pub const EMPTY_INPUT: i32 = 2001;

    /// Bytes are not a recognised container/codec
    pub const UNSUPPORTED_FORMAT: i32 = 2002;

    /// Container recognised but decoding failed (corrupt or truncated)
    pub const DECODE_FAILED: i32 = 2003;

    /// PCM buffer failed construction checks
    pub const INVALID_BUFFER: i32 = 2004;

    /// Writing encoded WAV bytes failed
    pub const ENCODE_FAILED: i32 = 2005;

    /// Reading or writing a file failed
    pub const IO: i32 = 2006;
}

/// Log an audio error with structured context
///
/// Logs the numeric code, the component and the message so failures can be
/// correlated with what the user saw.
pub fn log_audio_error(err: &AudioError, context: &str) {
    error!(
        "Audio error in {}: code={}, component=AudioCodec, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Decoding, encoding and buffer construction errors
///
/// `EmptyInput`, `UnsupportedFormat` and `DecodeFailed` form the decode
/// class: they are not retryable and are shown to the user as a failed load.
///
/// Error code range: 2001-2006
#[derive(Debug, Clone, PartialEq)]
pub enum AudioError {
    /// Decoder was handed zero bytes
    EmptyInput,

    /// Bytes are not a recognised container/codec
    UnsupportedFormat { reason: String },

    /// Container recognised but decoding failed
    DecodeFailed { reason: String },

    /// PCM buffer failed construction checks
    InvalidBuffer { reason: String },

    /// Writing encoded WAV bytes failed
    EncodeFailed { reason: String },

    /// Reading or writing a file failed
    Io { details: String },
}

impl AudioError {
    /// True for the decode class (empty, unsupported, corrupt input)
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            AudioError::EmptyInput
                | AudioError::UnsupportedFormat { .. }
                | AudioError::DecodeFailed { .. }
        )
    }
}

impl ErrorCode for AudioError {
    fn code(&self) -> i32 {
        match self {
            AudioError::EmptyInput => AudioErrorCodes::EMPTY_INPUT,
            AudioError::UnsupportedFormat { .. } => AudioErrorCodes::UNSUPPORTED_FORMAT,
            AudioError::DecodeFailed { .. } => AudioErrorCodes::DECODE_FAILED,
            AudioError::InvalidBuffer { .. } => AudioErrorCodes::INVALID_BUFFER,
            AudioError::EncodeFailed { .. } => AudioErrorCodes::ENCODE_FAILED,
            AudioError::Io { .. } => AudioErrorCodes::IO,
        }
    }

    fn message(&self) -> String {
        match self {
            AudioError::EmptyInput => "Audio file is empty".to_string(),
            AudioError::UnsupportedFormat { reason } => {
                format!("Unsupported audio format: {}", reason)
            }
            AudioError::DecodeFailed { reason } => {
                format!("Failed to decode audio: {}", reason)
            }
            AudioError::InvalidBuffer { reason } => {
                format!("Invalid PCM buffer: {}", reason)
            }
            AudioError::EncodeFailed { reason } => {
                format!("Failed to encode WAV: {}", reason)
            }
            AudioError::Io { details } => format!("I/O error: {}", details),
        }
    }
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AudioError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AudioError {}

impl From<std::io::Error> for AudioError {
    fn from(err: std::io::Error) -> Self {
        AudioError::Io {
            details: err.to_string(),
        }
    }
}
