//! Canonical 16-bit linear PCM WAV encoding.
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! 0   "RIFF"   4  36 + data_size   8  "WAVE"
//! 12  "fmt "   16 16               20 format=1   22 channels
//! 24  rate     28 byte_rate        32 block_align 34 bits=16
//! 36  "data"   40 data_size        44 interleaved i16 samples
//! ```

use std::io::Write;

use serde::{Deserialize, Serialize};

use super::pcm::PcmBuffer;
use crate::error::AudioError;

/// Size of the canonical header in bytes.
pub const WAV_HEADER_LEN: usize = 44;

const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: u16 = BITS_PER_SAMPLE / 8;
const PCM_FORMAT_TAG: u16 = 1;

/// How scaled float samples become 16-bit integers.
///
/// Negative samples are scaled by 32768 and non-negative ones by 32767 under
/// both policies; they differ only in the final integer conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantizationPolicy {
    /// Truncate toward zero
    #[default]
    Truncate,
    /// Round to the nearest integer, ties away from zero
    Round,
}

impl QuantizationPolicy {
    /// Clamp to [-1, 1], scale asymmetrically and convert to `i16`.
    pub fn quantize(self, sample: f32) -> i16 {
        let clamped = f64::from(sample.clamp(-1.0, 1.0));
        let scaled = if clamped < 0.0 {
            clamped * 32768.0
        } else {
            clamped * 32767.0
        };
        match self {
            QuantizationPolicy::Truncate => scaled as i16,
            QuantizationPolicy::Round => scaled.round() as i16,
        }
    }
}

/// Byte length of the sample data section for `pcm`.
pub fn data_len(pcm: &PcmBuffer) -> usize {
    pcm.frame_count() * pcm.channel_count() as usize * BYTES_PER_SAMPLE as usize
}

/// Total encoded length: header plus sample data.
pub fn encoded_len(pcm: &PcmBuffer) -> usize {
    WAV_HEADER_LEN + data_len(pcm)
}

/// Build the 44-byte header describing `pcm`.
pub fn wav_header(pcm: &PcmBuffer) -> [u8; WAV_HEADER_LEN] {
    // PcmBuffer construction guarantees these fit in u32.
    let data_size = data_len(pcm) as u32;
    let channels = pcm.channel_count();
    let sample_rate = pcm.sample_rate();
    let block_align = channels * BYTES_PER_SAMPLE;
    let byte_rate = sample_rate.wrapping_mul(u32::from(block_align));

    let mut header = [0u8; WAV_HEADER_LEN];
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&(36 + data_size).to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&PCM_FORMAT_TAG.to_le_bytes());
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());
    header
}

/// Encode `pcm` as an in-memory WAV byte stream.
///
/// Total for any well-formed [`PcmBuffer`]; the result is exactly
/// [`encoded_len`] bytes.
pub fn encode_wav(pcm: &PcmBuffer, policy: QuantizationPolicy) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(encoded_len(pcm));
    bytes.extend_from_slice(&wav_header(pcm));
    for_each_sample(pcm, policy, |value| {
        bytes.extend_from_slice(&value.to_le_bytes())
    });
    bytes
}

/// Stream the WAV encoding of `pcm` into `writer`.
///
/// Writer failures surface as [`AudioError::EncodeFailed`].
pub fn write_wav<W: Write>(
    writer: &mut W,
    pcm: &PcmBuffer,
    policy: QuantizationPolicy,
) -> Result<(), AudioError> {
    writer.write_all(&wav_header(pcm)).map_err(encode_failed)?;

    let mut result = Ok(());
    for_each_sample(pcm, policy, |value| {
        if result.is_ok() {
            result = writer.write_all(&value.to_le_bytes());
        }
    });
    result.map_err(encode_failed)?;

    writer.flush().map_err(encode_failed)
}

/// Visit quantised samples in frame-major, channel-minor order.
fn for_each_sample(pcm: &PcmBuffer, policy: QuantizationPolicy, mut emit: impl FnMut(i16)) {
    let channels = pcm.channels();
    for frame in 0..pcm.frame_count() {
        for channel in channels {
            emit(policy.quantize(channel[frame]));
        }
    }
}

fn encode_failed(err: std::io::Error) -> AudioError {
    AudioError::EncodeFailed {
        reason: err.to_string(),
    }
}
