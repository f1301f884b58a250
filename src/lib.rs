// Audiogen Core - audio codec & feature engine
// Decodes uploaded reference audio, extracts acoustic features and
// re-encodes PCM as 16-bit WAV for generation requests and playback.

// Module declarations
pub mod analysis;
pub mod audio;
pub mod config;
pub mod error;
pub mod processor;

// Re-exports for convenience
pub use analysis::{FeatureExtractor, FeatureRecord};
pub use audio::{
    encode_wav, preprocess_for_timbre, wav_to_base64, AudioDecoder, AudioInfo, PcmBuffer,
    PlayableAudio, QuantizationPolicy, SymphoniaDecoder, WavDecoder,
};
pub use config::AppConfig;
pub use error::{AnalysisError, AudioError, ErrorCode};
pub use processor::AudioProcessor;
