//! Timbre conditioning for reference audio.

use tracing::debug;

use super::pcm::PcmBuffer;

/// Prepare reference audio for timbre conditioning.
///
/// This is an identity transform: the returned buffer equals the input
/// sample for sample. The nominal 80 Hz high-pass / 2 kHz low-pass / 0.8 gain
/// cascade is not applied, and backends are tuned against unfiltered input.
pub fn preprocess_for_timbre(pcm: &PcmBuffer) -> PcmBuffer {
    debug!(
        frames = pcm.frame_count(),
        channels = pcm.channel_count(),
        "Timbre preprocessing (pass-through)"
    );
    pcm.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_equals_input() {
        let pcm = PcmBuffer::new(
            44100,
            vec![vec![0.9, -0.4, 1.3, 0.0], vec![-1.0, 0.25, 0.5, -2.0]],
        )
        .unwrap();
        assert_eq!(preprocess_for_timbre(&pcm), pcm);
    }

    #[test]
    fn test_empty_buffer_passes_through() {
        let pcm = PcmBuffer::silence(16000, 1, 0).unwrap();
        assert_eq!(preprocess_for_timbre(&pcm), pcm);
    }
}
