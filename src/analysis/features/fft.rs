// FFT module - Fast Fourier Transform computation
//
// Recursive radix-2 Cooley-Tukey transform over interleaved re/im pairs.
// The recursion walks the input with a growing stride instead of copying
// even/odd halves, so every level works on fixed-size slices of one output
// buffer. Split order (even first, then odd) and the forward twiddle sign
// e^{-2*pi*i*k/N} are fixed so results are reproducible bit for bit.

use crate::error::AnalysisError;

/// FFT frame size for spectral centroid analysis
pub const FFT_SIZE: usize = 2048;

/// Forward FFT in place over `data`, laid out as `[re0, im0, re1, im1, ...]`.
///
/// The number of complex points (`data.len() / 2`) must be a power of two;
/// 0 and 1 points are returned unchanged.
pub fn fft_in_place(data: &mut [f64]) -> Result<(), AnalysisError> {
    if data.len() % 2 != 0 {
        return Err(AnalysisError::FftLengthNotPowerOfTwo { len: data.len() });
    }
    let points = data.len() / 2;
    if points <= 1 {
        return Ok(());
    }
    if !points.is_power_of_two() {
        return Err(AnalysisError::FftLengthNotPowerOfTwo { len: points });
    }

    let input = data.to_vec();
    transform(&input, 0, 1, data);
    Ok(())
}

/// FFT of a real-valued frame, returned as interleaved re/im pairs.
pub fn real_fft(frame: &[f32]) -> Result<Vec<f64>, AnalysisError> {
    let mut data = vec![0.0; frame.len() * 2];
    for (i, &sample) in frame.iter().enumerate() {
        data[2 * i] = f64::from(sample);
    }
    fft_in_place(&mut data)?;
    Ok(data)
}

/// Writes the DFT of points `offset, offset + stride, ...` of `input` into
/// `output` (length `2 * n`, `n` a power of two).
fn transform(input: &[f64], offset: usize, stride: usize, output: &mut [f64]) {
    let n = output.len() / 2;
    if n == 1 {
        output[0] = input[2 * offset];
        output[1] = input[2 * offset + 1];
        return;
    }

    let half = n / 2;
    {
        let (even, odd) = output.split_at_mut(2 * half);
        transform(input, offset, stride * 2, even);
        transform(input, offset + stride, stride * 2, odd);
    }

    for k in 0..half {
        let angle = -2.0 * std::f64::consts::PI * k as f64 / n as f64;
        let (w_im, w_re) = angle.sin_cos();

        let (e_re, e_im) = (output[2 * k], output[2 * k + 1]);
        let (o_re, o_im) = (output[2 * (k + half)], output[2 * (k + half) + 1]);

        let t_re = w_re * o_re - w_im * o_im;
        let t_im = w_re * o_im + w_im * o_re;

        output[2 * k] = e_re + t_re;
        output[2 * k + 1] = e_im + t_im;
        output[2 * (k + half)] = e_re - t_re;
        output[2 * (k + half) + 1] = e_im - t_im;
    }
}

/// FFT processor that computes magnitude spectra from audio frames
pub struct FftProcessor {
    fft_size: usize,
}

impl Default for FftProcessor {
    fn default() -> Self {
        Self { fft_size: FFT_SIZE }
    }
}

impl FftProcessor {
    /// Create a new FFT processor
    ///
    /// # Arguments
    /// * `fft_size` - Frame size in samples; must be a power of two >= 2
    pub fn new(fft_size: usize) -> Result<Self, AnalysisError> {
        if fft_size < 2 || !fft_size.is_power_of_two() {
            return Err(AnalysisError::InvalidFrameSize {
                frame_size: fft_size,
            });
        }
        Ok(Self { fft_size })
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Compute the magnitude spectrum of one frame
    ///
    /// No window is applied. Only the non-negative half of the spectrum is
    /// returned (bins `0..fft_size / 2`), relying on the symmetry of a
    /// real-valued FFT.
    ///
    /// # Arguments
    /// * `frame` - Exactly `fft_size` samples
    pub fn compute_magnitude_spectrum(&self, frame: &[f32]) -> Result<Vec<f64>, AnalysisError> {
        if frame.len() != self.fft_size {
            return Err(AnalysisError::InvalidFrameSize {
                frame_size: frame.len(),
            });
        }

        let spectrum = real_fft(frame)?;
        Ok(spectrum[..self.fft_size]
            .chunks_exact(2)
            .map(|bin| (bin[0] * bin[0] + bin[1] * bin[1]).sqrt())
            .collect())
    }
}
