// Feature analysis error types and constants

use crate::error::ErrorCode;
use log::warn;
use std::fmt;

/// Analysis error code constants
///
/// Error code range: 2101-2104
pub struct AnalysisErrorCodes {}

impl AnalysisErrorCodes {
    /// Feature extraction was given a buffer with zero frames
    pub const EMPTY_BUFFER: i32 = 2101;

    /// FFT input length is not a power of two
    pub const FFT_LENGTH_NOT_POWER_OF_TWO: i32 = 2102;

    /// Analysis frame size is not a power of two >= 2
    pub const INVALID_FRAME_SIZE: i32 = 2103;

    /// Analysis hop size is zero
    pub const INVALID_HOP_SIZE: i32 = 2104;
}

/// Log an analysis error with structured context
///
/// Analysis errors are recoverable (empty audio is a valid input), so they
/// are logged at warn level.
pub fn log_analysis_error(err: &AnalysisError, context: &str) {
    warn!(
        "Analysis error in {}: code={}, component=FeatureExtractor, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Feature extraction and FFT errors
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Feature extraction was given a buffer with zero frames
    EmptyBuffer,

    /// FFT input length (in complex points) is not a power of two
    FftLengthNotPowerOfTwo { len: usize },

    /// Frame size must be a power of two >= 2
    InvalidFrameSize { frame_size: usize },

    /// Hop size must be greater than zero
    InvalidHopSize { hop_size: usize },
}

impl ErrorCode for AnalysisError {
    fn code(&self) -> i32 {
        match self {
            AnalysisError::EmptyBuffer => AnalysisErrorCodes::EMPTY_BUFFER,
            AnalysisError::FftLengthNotPowerOfTwo { .. } => {
                AnalysisErrorCodes::FFT_LENGTH_NOT_POWER_OF_TWO
            }
            AnalysisError::InvalidFrameSize { .. } => AnalysisErrorCodes::INVALID_FRAME_SIZE,
            AnalysisError::InvalidHopSize { .. } => AnalysisErrorCodes::INVALID_HOP_SIZE,
        }
    }

    fn message(&self) -> String {
        match self {
            AnalysisError::EmptyBuffer => "Cannot analyse an empty audio buffer".to_string(),
            AnalysisError::FftLengthNotPowerOfTwo { len } => {
                format!("FFT length must be a power of two (got {})", len)
            }
            AnalysisError::InvalidFrameSize { frame_size } => {
                format!(
                    "Frame size must be a power of two >= 2 (got {})",
                    frame_size
                )
            }
            AnalysisError::InvalidHopSize { hop_size } => {
                format!("Hop size must be greater than 0 (got {})", hop_size)
            }
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AnalysisError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AnalysisError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_error_codes() {
        assert_eq!(
            AnalysisError::EmptyBuffer.code(),
            AnalysisErrorCodes::EMPTY_BUFFER
        );
        assert_eq!(
            AnalysisError::FftLengthNotPowerOfTwo { len: 3 }.code(),
            AnalysisErrorCodes::FFT_LENGTH_NOT_POWER_OF_TWO
        );
        assert_eq!(
            AnalysisError::InvalidFrameSize { frame_size: 1000 }.code(),
            AnalysisErrorCodes::INVALID_FRAME_SIZE
        );
        assert_eq!(
            AnalysisError::InvalidHopSize { hop_size: 0 }.code(),
            AnalysisErrorCodes::INVALID_HOP_SIZE
        );
    }

    #[test]
    fn test_analysis_error_messages() {
        let err = AnalysisError::FftLengthNotPowerOfTwo { len: 6 };
        assert_eq!(err.message(), "FFT length must be a power of two (got 6)");

        let err = AnalysisError::InvalidHopSize { hop_size: 0 };
        assert!(err.message().contains("greater than 0"));
    }
}
