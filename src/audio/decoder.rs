//! Decoder adapters: raw file bytes in, [`PcmBuffer`] out.
//!
//! The core never parses codecs itself. Decoding is delegated to an injected
//! [`AudioDecoder`]: [`SymphoniaDecoder`] for general containers,
//! [`WavDecoder`] for plain WAV, or any closure for tests.

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use super::pcm::PcmBuffer;
use crate::error::AudioError;

/// Turns encoded audio bytes into PCM.
pub trait AudioDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<PcmBuffer, AudioError>;
}

impl<F> AudioDecoder for F
where
    F: Fn(&[u8]) -> Result<PcmBuffer, AudioError>,
{
    fn decode(&self, bytes: &[u8]) -> Result<PcmBuffer, AudioError> {
        self(bytes)
    }
}

/// General-purpose decoder backed by Symphonia.
///
/// Probes the container (WAV, FLAC, MP3, Ogg/Vorbis, ...) and decodes the
/// default track in full. A stream that ends before the frame count declared
/// by its container is rejected as truncated.
///
/// Integer PCM is normalised symmetrically (16-bit samples divide by 32768),
/// so positive samples written by [`crate::audio::encode_wav`] come back up to
/// one extra step low. Use [`WavDecoder`] when a round trip must stay within
/// 1/32767.
#[derive(Debug, Clone, Default)]
pub struct SymphoniaDecoder {
    extension_hint: Option<String>,
}

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Help the prober with a file extension such as `"mp3"`.
    pub fn with_extension_hint(mut self, extension: impl Into<String>) -> Self {
        self.extension_hint = Some(extension.into());
        self
    }
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<PcmBuffer, AudioError> {
        if bytes.is_empty() {
            return Err(AudioError::EmptyInput);
        }

        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = &self.extension_hint {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| AudioError::UnsupportedFormat {
                reason: e.to_string(),
            })?;
        let mut reader = probed.format;

        let track = reader
            .default_track()
            .ok_or_else(|| AudioError::UnsupportedFormat {
                reason: "no audio track".to_string(),
            })?;
        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::UnsupportedFormat {
                reason: format!("codec init failed: {e}"),
            })?;

        let mut sample_rate = codec_params.sample_rate;
        let mut channel_count = codec_params.channels.map(|c| c.count() as u16);
        let expected_frames = codec_params.n_frames;
        let mut decoded_frames: u64 = 0;
        let mut interleaved: Vec<f32> = Vec::new();

        loop {
            let packet = match reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => {
                    return Err(AudioError::DecodeFailed {
                        reason: "stream parameters changed mid-stream".to_string(),
                    })
                }
                Err(e) => {
                    return Err(AudioError::DecodeFailed {
                        reason: e.to_string(),
                    })
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(msg)) => {
                    warn!(error = %msg, "Skipping corrupted audio packet");
                    continue;
                }
                Err(e) => {
                    return Err(AudioError::DecodeFailed {
                        reason: e.to_string(),
                    })
                }
            };

            let spec = *decoded.spec();
            sample_rate = Some(spec.rate);
            channel_count = Some(spec.channels.count() as u16);

            if decoded.frames() == 0 {
                continue;
            }
            decoded_frames += decoded.frames() as u64;

            let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
            sample_buf.copy_interleaved_ref(decoded);
            interleaved.extend_from_slice(sample_buf.samples());
        }

        // The container declared more frames than the stream delivered.
        if let Some(expected) = expected_frames {
            if decoded_frames < expected {
                return Err(AudioError::DecodeFailed {
                    reason: format!(
                        "truncated stream: decoded {} of {} frames",
                        decoded_frames, expected
                    ),
                });
            }
        }

        let sample_rate = sample_rate.ok_or_else(|| AudioError::DecodeFailed {
            reason: "stream has no sample rate".to_string(),
        })?;
        let channel_count = channel_count.ok_or_else(|| AudioError::DecodeFailed {
            reason: "stream has no channel layout".to_string(),
        })?;

        debug!(
            sample_rate,
            channels = channel_count,
            samples = interleaved.len(),
            "Decoded audio via symphonia"
        );

        PcmBuffer::from_interleaved(sample_rate, channel_count, &interleaved).map_err(|e| {
            AudioError::DecodeFailed {
                reason: e.to_string(),
            }
        })
    }
}

/// WAV-only decoder backed by `hound`.
///
/// Integer samples are normalised asymmetrically (negative by `2^(bits-1)`,
/// non-negative by `2^(bits-1) - 1`), the inverse of the encoder's scaling,
/// so 16-bit WAV from [`crate::audio::encode_wav`] round-trips within one
/// quantisation step.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavDecoder;

impl WavDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl AudioDecoder for WavDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<PcmBuffer, AudioError> {
        if bytes.is_empty() {
            return Err(AudioError::EmptyInput);
        }

        let mut reader =
            hound::WavReader::new(Cursor::new(bytes)).map_err(|err| match err {
                hound::Error::FormatError(reason) => AudioError::UnsupportedFormat {
                    reason: reason.to_string(),
                },
                hound::Error::Unsupported => AudioError::UnsupportedFormat {
                    reason: "unsupported WAV variant".to_string(),
                },
                other => AudioError::DecodeFailed {
                    reason: other.to_string(),
                },
            })?;
        let spec = reader.spec();

        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .map(|sample| sample.map_err(read_failed))
                .collect::<Result<Vec<f32>, _>>()?,
            hound::SampleFormat::Int => match spec.bits_per_sample {
                8 | 16 => {
                    let (negative, positive) = int_scale(spec.bits_per_sample);
                    reader
                        .samples::<i16>()
                        .map(|sample| {
                            sample
                                .map(|v| normalise(i32::from(v), negative, positive))
                                .map_err(read_failed)
                        })
                        .collect::<Result<Vec<f32>, _>>()?
                }
                24 | 32 => {
                    let (negative, positive) = int_scale(spec.bits_per_sample);
                    reader
                        .samples::<i32>()
                        .map(|sample| {
                            sample
                                .map(|v| normalise(v, negative, positive))
                                .map_err(read_failed)
                        })
                        .collect::<Result<Vec<f32>, _>>()?
                }
                bits => {
                    return Err(AudioError::UnsupportedFormat {
                        reason: format!("unsupported bits_per_sample={}", bits),
                    })
                }
            },
        };

        debug!(
            sample_rate = spec.sample_rate,
            channels = spec.channels,
            samples = samples.len(),
            "Decoded WAV via hound"
        );

        PcmBuffer::from_interleaved(spec.sample_rate, spec.channels, &samples).map_err(|e| {
            AudioError::DecodeFailed {
                reason: e.to_string(),
            }
        })
    }
}

fn int_scale(bits: u16) -> (f64, f64) {
    let full_scale = (1u64 << (bits - 1)) as f64;
    (full_scale, full_scale - 1.0)
}

fn normalise(value: i32, negative: f64, positive: f64) -> f32 {
    let value = f64::from(value);
    if value < 0.0 {
        (value / negative) as f32
    } else {
        (value / positive) as f32
    }
}

fn read_failed(err: hound::Error) -> AudioError {
    AudioError::DecodeFailed {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::wav::{encode_wav, QuantizationPolicy};

    fn sine(sample_rate: u32, frequency: f32, frames: usize) -> Vec<f32> {
        (0..frames)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * std::f32::consts::PI * frequency * t).sin()
            })
            .collect()
    }

    fn assert_within_quantisation(original: &PcmBuffer, decoded: &PcmBuffer) {
        let tolerance = 1.0 / 32767.0 + 1e-6;
        for (a, b) in original.channels().iter().zip(decoded.channels()) {
            for (x, y) in a.iter().zip(b) {
                assert!(
                    (x - y).abs() <= tolerance,
                    "sample drifted by {} (original {}, decoded {})",
                    (x - y).abs(),
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_wav_decoder_roundtrip_stereo() {
        let left = sine(44100, 440.0, 4410);
        let right: Vec<f32> = left.iter().map(|s| -0.5 * s).collect();
        let original = PcmBuffer::new(44100, vec![left, right]).unwrap();

        for policy in [QuantizationPolicy::Truncate, QuantizationPolicy::Round] {
            let wav = encode_wav(&original, policy);
            let decoded = WavDecoder::new().decode(&wav).unwrap();

            assert_eq!(decoded.sample_rate(), 44100);
            assert_eq!(decoded.channel_count(), 2);
            assert_eq!(decoded.frame_count(), 4410);
            assert_within_quantisation(&original, &decoded);
        }
    }

    #[test]
    fn test_wav_decoder_full_scale() {
        let original = PcmBuffer::mono(8000, vec![1.0, -1.0, 0.0]).unwrap();
        let wav = encode_wav(&original, QuantizationPolicy::Truncate);
        let decoded = WavDecoder::new().decode(&wav).unwrap();
        assert_eq!(decoded.channel(0).unwrap(), &[1.0, -1.0, 0.0]);
    }

    #[test]
    fn test_wav_decoder_rejects_empty_input() {
        assert_eq!(
            WavDecoder::new().decode(&[]).unwrap_err(),
            AudioError::EmptyInput
        );
    }

    #[test]
    fn test_wav_decoder_rejects_garbage() {
        let err = WavDecoder::new().decode(b"definitely not a wav file").unwrap_err();
        assert!(err.is_decode_error(), "unexpected error {:?}", err);
    }

    #[test]
    fn test_wav_decoder_rejects_truncated_data() {
        let original = PcmBuffer::mono(8000, sine(8000, 200.0, 400)).unwrap();
        let wav = encode_wav(&original, QuantizationPolicy::Truncate);
        let err = WavDecoder::new().decode(&wav[..wav.len() - 101]).unwrap_err();
        assert!(err.is_decode_error(), "unexpected error {:?}", err);
    }

    #[test]
    fn test_symphonia_decodes_encoded_wav() {
        let original = PcmBuffer::mono(16000, sine(16000, 1000.0, 1600)).unwrap();
        let wav = encode_wav(&original, QuantizationPolicy::Truncate);

        let decoded = SymphoniaDecoder::new()
            .with_extension_hint("wav")
            .decode(&wav)
            .unwrap();

        assert_eq!(decoded.sample_rate(), 16000);
        assert_eq!(decoded.channel_count(), 1);
        assert_eq!(decoded.frame_count(), 1600);
        for (x, y) in original.channel(0).unwrap().iter().zip(decoded.channel(0).unwrap()) {
            assert!((x - y).abs() < 1e-3);
        }
    }

    #[test]
    fn test_symphonia_rejects_empty_and_garbage() {
        let decoder = SymphoniaDecoder::new();
        assert_eq!(decoder.decode(&[]).unwrap_err(), AudioError::EmptyInput);

        let err = decoder.decode(&[0x13; 512]).unwrap_err();
        assert!(err.is_decode_error(), "unexpected error {:?}", err);
    }

    #[test]
    fn test_symphonia_scales_symmetrically() {
        let original = PcmBuffer::mono(8000, vec![1.0, -1.0]).unwrap();
        let wav = encode_wav(&original, QuantizationPolicy::Truncate);

        let via_symphonia = SymphoniaDecoder::new().decode(&wav).unwrap();
        let via_hound = WavDecoder::new().decode(&wav).unwrap();

        let samples = via_symphonia.channel(0).unwrap();
        assert!((samples[0] - 32767.0 / 32768.0).abs() < 1e-7);
        assert!((samples[1] + 1.0).abs() < 1e-7);
        assert_eq!(via_hound.channel(0).unwrap(), &[1.0, -1.0]);
    }

    #[test]
    fn test_symphonia_rejects_truncated_data() {
        let original = PcmBuffer::mono(8000, sine(8000, 200.0, 400)).unwrap();
        let wav = encode_wav(&original, QuantizationPolicy::Truncate);
        let decoder = SymphoniaDecoder::new().with_extension_hint("wav");

        for cut in [100, 101] {
            let err = decoder.decode(&wav[..wav.len() - cut]).unwrap_err();
            match err {
                AudioError::DecodeFailed { reason } => {
                    assert!(reason.contains("truncated"), "unexpected reason {reason}")
                }
                other => panic!("Expected DecodeFailed, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_closure_acts_as_decoder() {
        let fake = |bytes: &[u8]| PcmBuffer::mono(8000, vec![0.0; bytes.len()]);
        let pcm = fake.decode(&[1, 2, 3]).unwrap();
        assert_eq!(pcm.frame_count(), 3);
    }
}
