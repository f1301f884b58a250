// Spectral module - Frequency-domain feature extraction
//
// Computes the spectral centroid from magnitude spectra and aggregates it
// over overlapping analysis frames.

use super::fft::FftProcessor;
use crate::error::AnalysisError;

/// Spectral feature computation functions
pub struct SpectralFeatures {
    sample_rate: u32,
    fft_size: usize,
}

impl SpectralFeatures {
    /// Create a new spectral features processor
    ///
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `fft_size` - FFT frame size the spectra were computed with
    pub fn new(sample_rate: u32, fft_size: usize) -> Self {
        Self {
            sample_rate,
            fft_size,
        }
    }

    /// Compute spectral centroid (weighted mean frequency)
    ///
    /// Formula: centroid = Σ(f_j × |X[j]|) / Σ|X[j]|, with f_j = j × sr / N
    ///
    /// # Returns
    /// Centroid in Hz, or `None` when the spectrum has zero total magnitude
    pub fn compute_centroid(&self, spectrum: &[f64]) -> Option<f64> {
        let bin_width = self.sample_rate as f64 / self.fft_size as f64;

        let (weighted_sum, magnitude_sum) =
            spectrum
                .iter()
                .enumerate()
                .fold((0.0, 0.0), |(weighted, total), (j, &magnitude)| {
                    (weighted + j as f64 * bin_width * magnitude, total + magnitude)
                });

        if magnitude_sum > 0.0 {
            Some(weighted_sum / magnitude_sum)
        } else {
            None
        }
    }

    /// Mean spectral centroid over all complete frames of `samples`
    ///
    /// Frames start every `hop_size` samples; a trailing partial frame is
    /// dropped and silent frames are skipped. Returns 0 when no frame counts.
    pub fn mean_centroid(
        &self,
        fft: &FftProcessor,
        samples: &[f32],
        hop_size: usize,
    ) -> Result<f64, AnalysisError> {
        if hop_size == 0 {
            return Err(AnalysisError::InvalidHopSize { hop_size });
        }

        let mut centroid_sum = 0.0;
        let mut counted = 0usize;
        let mut start = 0;
        while start + self.fft_size <= samples.len() {
            let spectrum =
                fft.compute_magnitude_spectrum(&samples[start..start + self.fft_size])?;
            if let Some(centroid) = self.compute_centroid(&spectrum) {
                centroid_sum += centroid;
                counted += 1;
            }
            start += hop_size;
        }

        tracing::debug!(frames = counted, "Spectral centroid frames analysed");

        Ok(if counted > 0 {
            centroid_sum / counted as f64
        } else {
            0.0
        })
    }
}
