// AudioProcessor: caller-owned entry point to the codec & feature engine
//
// Bundles an injected decoder with the feature extractor and encoder
// settings. There is no process-wide decoding context: each caller builds
// its own processor, and every operation borrows buffers immutably.

use std::path::Path;

use tracing::debug;

use crate::analysis::{FeatureExtractor, FeatureRecord};
use crate::audio::{
    encode_wav, preprocess_for_timbre, wav_to_base64, AudioDecoder, AudioInfo, PcmBuffer,
    PlayableAudio, QuantizationPolicy, SymphoniaDecoder,
};
use crate::config::AppConfig;
use crate::error::{log_audio_error, AnalysisError, AudioError};

/// Decoder + feature extractor + encoder policy
pub struct AudioProcessor<D: AudioDecoder = SymphoniaDecoder> {
    decoder: D,
    extractor: FeatureExtractor,
    quantization: QuantizationPolicy,
}

impl Default for AudioProcessor<SymphoniaDecoder> {
    fn default() -> Self {
        Self::new(SymphoniaDecoder::new())
    }
}

impl<D: AudioDecoder> AudioProcessor<D> {
    /// Processor with default framing and truncating quantisation
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            extractor: FeatureExtractor::new(),
            quantization: QuantizationPolicy::default(),
        }
    }

    /// Processor configured from an [`AppConfig`]
    ///
    /// # Errors
    /// Fails if the configured analysis framing is invalid.
    pub fn from_config(decoder: D, config: &AppConfig) -> Result<Self, AnalysisError> {
        Ok(Self {
            decoder,
            extractor: FeatureExtractor::from_config(&config.analysis)?,
            quantization: config.encoder.quantization,
        })
    }

    pub fn with_quantization(mut self, policy: QuantizationPolicy) -> Self {
        self.quantization = policy;
        self
    }

    pub fn quantization(&self) -> QuantizationPolicy {
        self.quantization
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Decode raw file bytes into PCM
    pub fn load_bytes(&self, bytes: &[u8]) -> Result<PcmBuffer, AudioError> {
        self.decoder.decode(bytes).inspect_err(|err| {
            log_audio_error(err, "AudioProcessor::load_bytes");
        })
    }

    /// Read and decode an audio file
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<PcmBuffer, AudioError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| AudioError::Io {
            details: format!("reading {}: {}", path.display(), err),
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "Loaded audio file");
        self.load_bytes(&bytes)
    }

    /// Read an audio file without blocking the runtime, then decode it
    ///
    /// The file read is the only suspension point; decoding runs inline.
    pub async fn load_file_async<P: AsRef<Path>>(&self, path: P) -> Result<PcmBuffer, AudioError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|err| AudioError::Io {
            details: format!("reading {}: {}", path.display(), err),
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "Loaded audio file (async)");
        self.load_bytes(&bytes)
    }

    /// Duration, sample rate, channel count and length of a buffer
    pub fn audio_info(&self, pcm: &PcmBuffer) -> AudioInfo {
        pcm.info()
    }

    /// Encode as a canonical 16-bit PCM WAV byte stream
    pub fn to_wav(&self, pcm: &PcmBuffer) -> Vec<u8> {
        encode_wav(pcm, self.quantization)
    }

    /// Encode as WAV, then base64 for request payloads
    pub fn to_base64(&self, pcm: &PcmBuffer) -> String {
        wav_to_base64(&self.to_wav(pcm))
    }

    /// Encode as WAV wrapped in a playable/saveable handle
    pub fn to_playable(&self, pcm: &PcmBuffer) -> PlayableAudio {
        PlayableAudio::new(self.to_wav(pcm))
    }

    /// Acoustic features of the first channel (zero record for empty audio)
    pub fn extract_features(&self, pcm: &PcmBuffer) -> FeatureRecord {
        self.extractor.extract(pcm)
    }

    /// Timbre conditioning (identity transform)
    pub fn preprocess_for_timbre(&self, pcm: &PcmBuffer) -> PcmBuffer {
        preprocess_for_timbre(pcm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::WavDecoder;
    use crate::config::{AnalysisConfig, EncoderConfig};

    fn fake_decoder(bytes: &[u8]) -> Result<PcmBuffer, AudioError> {
        if bytes.is_empty() {
            return Err(AudioError::EmptyInput);
        }
        PcmBuffer::mono(
            8000,
            bytes.iter().map(|&b| b as f32 / 255.0 - 0.5).collect(),
        )
    }

    #[test]
    fn test_fake_decoder_is_injected() {
        let processor = AudioProcessor::new(fake_decoder);
        let pcm = processor.load_bytes(&[0, 255, 128]).unwrap();
        assert_eq!(pcm.sample_rate(), 8000);
        assert_eq!(pcm.frame_count(), 3);

        assert_eq!(
            processor.load_bytes(&[]).unwrap_err(),
            AudioError::EmptyInput
        );
    }

    #[test]
    fn test_wav_roundtrip_through_processor() {
        let processor = AudioProcessor::new(WavDecoder::new());
        let original = PcmBuffer::new(22050, vec![vec![0.5, -0.5, 0.25], vec![0.0; 3]]).unwrap();

        let wav = processor.to_wav(&original);
        let decoded = processor.load_bytes(&wav).unwrap();

        assert_eq!(processor.audio_info(&decoded), original.info());
    }

    #[test]
    fn test_from_config_applies_settings() {
        let config = AppConfig {
            analysis: AnalysisConfig {
                frame_size: 512,
                hop_size: 128,
            },
            encoder: EncoderConfig {
                quantization: QuantizationPolicy::Round,
            },
        };
        let processor = AudioProcessor::from_config(WavDecoder::new(), &config).unwrap();
        assert_eq!(processor.quantization(), QuantizationPolicy::Round);

        let pcm = PcmBuffer::mono(8000, vec![0.1]).unwrap();
        let wav = processor.to_wav(&pcm);
        assert_eq!(i16::from_le_bytes([wav[44], wav[45]]), 3277);
    }

    #[test]
    fn test_from_config_rejects_bad_framing() {
        let mut config = AppConfig::default();
        config.analysis.frame_size = 3000;
        assert!(AudioProcessor::from_config(WavDecoder::new(), &config).is_err());
    }

    #[test]
    fn test_base64_and_playable_share_wav_bytes() {
        use base64::Engine as _;

        let processor = AudioProcessor::new(WavDecoder::new());
        let pcm = PcmBuffer::silence(16000, 1, 160).unwrap();

        let wav = processor.to_wav(&pcm);
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(processor.to_base64(&pcm))
            .unwrap();
        assert_eq!(decoded, wav);
        assert_eq!(processor.to_playable(&pcm).bytes(), wav.as_slice());
    }

    #[test]
    fn test_features_and_timbre() {
        let processor = AudioProcessor::new(WavDecoder::new());
        let pcm = PcmBuffer::mono(8000, vec![0.5, -0.5, 0.5, -0.5]).unwrap();

        let features = processor.extract_features(&pcm);
        assert!((features.rms - 0.5).abs() < 1e-12);
        assert_eq!(features.zero_crossing_rate, 0.75);
        assert_eq!(processor.preprocess_for_timbre(&pcm), pcm);
    }

    #[test]
    fn test_load_file_missing_is_io_error() {
        let processor = AudioProcessor::<SymphoniaDecoder>::default();
        let err = processor.load_file("/nonexistent/input.wav").unwrap_err();
        assert!(matches!(err, AudioError::Io { .. }));
    }

    #[tokio::test]
    async fn test_load_file_async() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");

        let processor = AudioProcessor::new(WavDecoder::new());
        let pcm = PcmBuffer::mono(8000, vec![0.25; 800]).unwrap();
        std::fs::write(&path, processor.to_wav(&pcm)).unwrap();

        let loaded = processor.load_file_async(&path).await.unwrap();
        assert_eq!(loaded.frame_count(), 800);
        assert_eq!(loaded.sample_rate(), 8000);
    }
}
