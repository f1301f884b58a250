//! Packaging of encoded WAV bytes for request bodies and playback.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::AudioError;

/// MIME type of the canonical WAV stream.
pub const WAV_MIME_TYPE: &str = "audio/wav";

/// Base64-encode WAV bytes (standard alphabet, padded, no line wrapping).
pub fn wav_to_base64(wav: &[u8]) -> String {
    STANDARD.encode(wav)
}

/// Encoded WAV ready to hand to a player or save to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayableAudio {
    bytes: Vec<u8>,
}

impl PlayableAudio {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn mime_type(&self) -> &'static str {
        WAV_MIME_TYPE
    }

    pub fn to_base64(&self) -> String {
        wav_to_base64(&self.bytes)
    }

    /// `data:` URL that embeds the audio inline.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", WAV_MIME_TYPE, self.to_base64())
    }

    /// Write the WAV bytes to `path`, replacing any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AudioError> {
        fs::write(path.as_ref(), &self.bytes).map_err(|err| AudioError::Io {
            details: format!("writing {}: {}", path.as_ref().display(), err),
        })?;
        log::info!(
            "[Transport] Saved {} bytes to {:?}",
            self.bytes.len(),
            path.as_ref()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_known_value() {
        assert_eq!(wav_to_base64(b"RIFF"), "UklGRg==");
        assert_eq!(wav_to_base64(&[]), "");
    }

    #[test]
    fn test_base64_has_no_line_breaks() {
        let payload = vec![0xABu8; 4096];
        let encoded = wav_to_base64(&payload);
        assert!(!encoded.contains('\n'));
        assert!(!encoded.contains('\r'));
        assert_eq!(STANDARD.decode(&encoded).unwrap(), payload);
    }

    #[test]
    fn test_data_url_prefix() {
        let playable = PlayableAudio::new(b"RIFF".to_vec());
        assert_eq!(playable.mime_type(), "audio/wav");
        assert_eq!(playable.to_data_url(), "data:audio/wav;base64,UklGRg==");
    }

    #[test]
    fn test_save_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let playable = PlayableAudio::new(vec![1, 2, 3, 4]);

        playable.save(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_save_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.wav");
        let err = PlayableAudio::new(vec![0]).save(&path).unwrap_err();
        assert!(matches!(err, AudioError::Io { .. }));
    }
}
