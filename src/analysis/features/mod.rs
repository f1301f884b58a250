// FeatureExtractor - acoustic feature extraction for uploaded audio
//
// Features are computed from the first channel of a PCM buffer and are used
// to describe reference audio before it is sent to a generation backend.
//
// Module organization:
// - types: Data structures (FeatureRecord)
// - fft: Recursive radix-2 FFT and magnitude spectra
// - spectral: Frequency-domain features (spectral centroid)
// - temporal: Time-domain features (RMS, ZCR)
// - mod.rs: Coordinator (FeatureExtractor)

mod fft;
mod spectral;
mod temporal;
mod types;

pub use fft::{fft_in_place, real_fft, FftProcessor, FFT_SIZE};
pub use spectral::SpectralFeatures;
pub use temporal::{compute_rms, compute_zcr};
pub use types::FeatureRecord;

use crate::audio::PcmBuffer;
use crate::config::AnalysisConfig;
use crate::error::{log_analysis_error, AnalysisError};

/// Default hop between analysis frames (a quarter frame)
pub const HOP_SIZE: usize = FFT_SIZE / 4;

/// FeatureExtractor coordinates the feature extraction pipeline
pub struct FeatureExtractor {
    fft_processor: FftProcessor,
    hop_size: usize,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self {
            fft_processor: FftProcessor::default(),
            hop_size: HOP_SIZE,
        }
    }
}

impl FeatureExtractor {
    /// Extractor with frame size 2048 and hop 512
    pub fn new() -> Self {
        Self::default()
    }

    /// Extractor with custom framing
    ///
    /// # Errors
    /// `InvalidFrameSize` unless the frame size is a power of two >= 2,
    /// `InvalidHopSize` for a zero hop.
    pub fn with_framing(frame_size: usize, hop_size: usize) -> Result<Self, AnalysisError> {
        if hop_size == 0 {
            return Err(AnalysisError::InvalidHopSize { hop_size });
        }
        Ok(Self {
            fft_processor: FftProcessor::new(frame_size)?,
            hop_size,
        })
    }

    pub fn from_config(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        Self::with_framing(config.frame_size, config.hop_size)
    }

    pub fn frame_size(&self) -> usize {
        self.fft_processor.fft_size()
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Extract features, failing on an empty buffer
    ///
    /// # Errors
    /// `AnalysisError::EmptyBuffer` when `frame_count == 0`.
    pub fn try_extract(&self, pcm: &PcmBuffer) -> Result<FeatureRecord, AnalysisError> {
        if pcm.is_empty() {
            return Err(AnalysisError::EmptyBuffer);
        }

        // Channel 0 always exists on a constructed buffer.
        let samples = pcm.channel(0).unwrap_or_default();
        let sample_rate = pcm.sample_rate();
        let channel_count = pcm.channel_count();

        let rms = compute_rms(samples);
        let zero_crossing_rate = compute_zcr(samples);
        let spectral = SpectralFeatures::new(sample_rate, self.frame_size());
        let spectral_centroid =
            spectral.mean_centroid(&self.fft_processor, samples, self.hop_size)?;

        Ok(FeatureRecord {
            duration: pcm.duration_secs(),
            sample_rate,
            rms,
            zero_crossing_rate,
            spectral_centroid,
            is_mono: channel_count == 1,
            is_stereo: channel_count == 2,
        })
    }

    /// Extract features from a PCM buffer
    ///
    /// An empty buffer yields [`FeatureRecord::empty`] rather than an error
    /// or NaN values; empty audio is a valid input.
    pub fn extract(&self, pcm: &PcmBuffer) -> FeatureRecord {
        match self.try_extract(pcm) {
            Ok(record) => record,
            Err(err) => {
                log_analysis_error(&err, "FeatureExtractor::extract");
                FeatureRecord::empty(pcm.sample_rate(), pcm.channel_count())
            }
        }
    }
}
