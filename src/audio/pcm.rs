//! In-memory PCM representation shared by the decoder, encoder and analysis.

use serde::{Deserialize, Serialize};

use crate::error::AudioError;

/// Largest `frames * channels * 2` that still fits the 32-bit RIFF size fields.
const MAX_DATA_BYTES: u64 = u32::MAX as u64 - 36;

/// Largest channel count whose block align (`channels * 2`) fits a `u16`.
pub const MAX_CHANNELS: usize = (u16::MAX / 2) as usize;

/// Decoded audio: planar `f32` samples plus format metadata.
///
/// Samples are nominally in [-1.0, 1.0]. Out-of-range values are preserved
/// as-is and only clamped when the buffer is written out.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

/// Format summary of a [`PcmBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioInfo {
    /// Length in seconds
    pub duration: f64,
    pub sample_rate: u32,
    pub number_of_channels: u16,
    /// Samples per channel
    pub length: usize,
}

impl PcmBuffer {
    /// Build a buffer from planar channel data.
    ///
    /// Fails with [`AudioError::InvalidBuffer`] when the sample rate is zero,
    /// there are no channels, channel lengths differ, or the buffer would not
    /// fit a 16-bit PCM WAV container.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self, AudioError> {
        if sample_rate == 0 {
            return Err(invalid("sample rate must be greater than 0"));
        }
        if channels.is_empty() {
            return Err(invalid("at least one channel is required"));
        }
        if channels.len() > MAX_CHANNELS {
            return Err(invalid(format!(
                "channel count {} exceeds {}",
                channels.len(),
                MAX_CHANNELS
            )));
        }

        let frame_count = channels[0].len();
        if let Some((index, channel)) = channels
            .iter()
            .enumerate()
            .find(|(_, channel)| channel.len() != frame_count)
        {
            return Err(invalid(format!(
                "channel {} has {} frames, expected {}",
                index,
                channel.len(),
                frame_count
            )));
        }

        let data_bytes = frame_count as u64 * channels.len() as u64 * 2;
        if data_bytes > MAX_DATA_BYTES {
            return Err(invalid(format!(
                "{} bytes of sample data exceed the WAV size limit",
                data_bytes
            )));
        }

        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Build a buffer from frame-major interleaved samples.
    pub fn from_interleaved(
        sample_rate: u32,
        channel_count: u16,
        samples: &[f32],
    ) -> Result<Self, AudioError> {
        if channel_count == 0 {
            return Err(invalid("at least one channel is required"));
        }
        let stride = channel_count as usize;
        if samples.len() % stride != 0 {
            return Err(invalid(format!(
                "{} interleaved samples do not divide into {} channels",
                samples.len(),
                channel_count
            )));
        }

        let frame_count = samples.len() / stride;
        let mut channels: Vec<Vec<f32>> = (0..stride)
            .map(|_| Vec::with_capacity(frame_count))
            .collect();
        for frame in samples.chunks_exact(stride) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        Self::new(sample_rate, channels)
    }

    /// Single-channel convenience constructor.
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Result<Self, AudioError> {
        Self::new(sample_rate, vec![samples])
    }

    /// All-zero buffer of the given shape.
    pub fn silence(
        sample_rate: u32,
        channel_count: u16,
        frame_count: usize,
    ) -> Result<Self, AudioError> {
        Self::new(
            sample_rate,
            vec![vec![0.0; frame_count]; channel_count as usize],
        )
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        // Bounded by the check in `new`.
        self.channels.len() as u16
    }

    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    /// Samples of one channel, or `None` if the index is out of range.
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Frame-major interleaved copy of the samples.
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.frame_count() * self.channels.len());
        for frame in 0..self.frame_count() {
            for channel in &self.channels {
                out.push(channel[frame]);
            }
        }
        out
    }

    pub fn info(&self) -> AudioInfo {
        AudioInfo {
            duration: self.duration_secs(),
            sample_rate: self.sample_rate,
            number_of_channels: self.channel_count(),
            length: self.frame_count(),
        }
    }
}

fn invalid(reason: impl Into<String>) -> AudioError {
    AudioError::InvalidBuffer {
        reason: reason.into(),
    }
}
