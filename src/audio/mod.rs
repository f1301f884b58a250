// Audio module - PCM buffers, decoding, WAV encoding and transport packaging

pub mod decoder;
pub mod pcm;
pub mod timbre;
pub mod transport;
pub mod wav;

// Re-export commonly used types for convenience
pub use decoder::{AudioDecoder, SymphoniaDecoder, WavDecoder};
pub use pcm::{AudioInfo, PcmBuffer};
pub use timbre::preprocess_for_timbre;
pub use transport::{wav_to_base64, PlayableAudio, WAV_MIME_TYPE};
pub use wav::{encode_wav, write_wav, QuantizationPolicy, WAV_HEADER_LEN};
