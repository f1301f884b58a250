// Types module - Data structures for audio features

use serde::{Deserialize, Serialize};

/// Features extracted from a PCM buffer
///
/// Serialized with camelCase field names (`zeroCrossingRate`, `isMono`, ...)
/// for the host application.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRecord {
    /// Length of the buffer in seconds
    pub duration: f64,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Root mean square amplitude of the first channel
    pub rms: f64,

    /// Zero-crossing rate (0.0 to 1.0, normalized by sample count)
    ///
    /// High values indicate noise-like or high-frequency content.
    pub zero_crossing_rate: f64,

    /// Mean spectral centroid in Hz across complete analysis frames
    ///
    /// Measures the "brightness" of the sound.
    pub spectral_centroid: f64,

    pub is_mono: bool,
    pub is_stereo: bool,
}

impl FeatureRecord {
    /// Record for a buffer with no frames: all measurements zero.
    pub fn empty(sample_rate: u32, channel_count: u16) -> Self {
        Self {
            duration: 0.0,
            sample_rate,
            rms: 0.0,
            zero_crossing_rate: 0.0,
            spectral_centroid: 0.0,
            is_mono: channel_count == 1,
            is_stereo: channel_count == 2,
        }
    }
}
