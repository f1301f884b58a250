// Temporal module - Time-domain feature extraction
//
// Loudness (RMS) and zero-crossing rate computed directly from samples.
// Both return 0 for an empty slice instead of dividing by zero.

/// Root mean square amplitude
pub fn compute_rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples
        .iter()
        .map(|&s| {
            let s = f64::from(s);
            s * s
        })
        .sum();
    (sum_squares / samples.len() as f64).sqrt()
}

/// Zero-crossing rate (0.0 to 1.0)
///
/// Counts adjacent pairs whose sign differs, treating 0 as non-negative, and
/// normalises by the total sample count.
pub fn compute_zcr(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let crossings = samples
        .windows(2)
        .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
        .count();
    crossings as f64 / samples.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms_of_constant() {
        assert!((compute_rms(&[0.5; 100]) - 0.5).abs() < 1e-12);
        assert!((compute_rms(&[-0.5; 100]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_rms_of_unit_sine() {
        let sample_rate = 44100;
        let samples: Vec<f32> = (0..sample_rate)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * std::f32::consts::PI * 440.0 * t).sin()
            })
            .collect();
        let rms = compute_rms(&samples);
        assert!((rms - 0.707).abs() < 0.01, "rms {}", rms);
    }

    #[test]
    fn test_zcr_counts_sign_changes() {
        // + - + - => 3 crossings over 4 samples
        assert_eq!(compute_zcr(&[1.0, -1.0, 1.0, -1.0]), 0.75);
    }

    #[test]
    fn test_zcr_treats_zero_as_non_negative() {
        assert_eq!(compute_zcr(&[0.0, 0.5, 0.0, 1.0]), 0.0);
        // 0 -> negative is a crossing
        assert_eq!(compute_zcr(&[0.0, -0.5]), 0.5);
    }

    #[test]
    fn test_empty_input_is_zero() {
        assert_eq!(compute_rms(&[]), 0.0);
        assert_eq!(compute_zcr(&[]), 0.0);
        assert_eq!(compute_zcr(&[0.3]), 0.0);
    }

    #[test]
    fn test_zcr_sine_vs_noise() {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        let noise: Vec<f32> = (0..4096).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let sine: Vec<f32> = (0..4096)
            .map(|i| (2.0 * std::f32::consts::PI * 100.0 * i as f32 / 48000.0).sin())
            .collect();

        let noise_zcr = compute_zcr(&noise);
        let sine_zcr = compute_zcr(&sine);
        assert!(noise_zcr > 0.3, "noise zcr {}", noise_zcr);
        assert!(sine_zcr < 0.1, "sine zcr {}", sine_zcr);
    }
}
