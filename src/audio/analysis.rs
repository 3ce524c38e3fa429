use super::features::{AnalysisFrame, AnalysisResult};

/// Finite stand-in for -inf dB on silent input. Downstream smoothing divides
/// and compares against the level, so it must stay a real number.
pub const SILENCE_DB_FLOOR: f32 = -160.0;

/// Stateless per-tick analyzer: RMS, dB level, dominant pitch.
/// Calling `analyze` twice with identical frames yields identical results.
pub struct SoundAnalyzer {
    frame_size: usize,
    reference_amplitude: f32,
}

impl SoundAnalyzer {
    pub fn new(frame_size: usize, reference_amplitude: f32) -> Self {
        Self {
            frame_size,
            reference_amplitude,
        }
    }

    pub fn analyze(&self, frame: &AnalysisFrame) -> AnalysisResult {
        debug_assert_eq!(frame.samples.len(), self.frame_size);
        debug_assert_eq!(frame.spectrum.len(), self.frame_size);

        let rms = Self::rms(&frame.samples);
        let db_level = self.db_level(rms);
        let pitch_hz = dominant_pitch(&frame.spectrum, frame.sample_rate);

        AnalysisResult {
            rms,
            db_level,
            pitch_hz,
        }
    }

    fn rms(samples: &[f32]) -> f32 {
        let sum: f32 = samples.iter().map(|s| s * s).sum();
        (sum / samples.len() as f32).sqrt()
    }

    fn db_level(&self, rms: f32) -> f32 {
        if rms <= 0.0 {
            return SILENCE_DB_FLOOR;
        }
        (20.0 * (rms / self.reference_amplitude).log10()).max(SILENCE_DB_FLOOR)
    }
}

/// Scan for the strictly largest strictly-positive bin (ties keep the
/// earliest), refine the index with a symmetric parabolic correction, and
/// convert to Hz. An all-zero spectrum reports the frequency of bin 0; that
/// near-zero pitch is the defined silence behavior, not an error.
fn dominant_pitch(spectrum: &[f32], sample_rate: f32) -> f32 {
    let n = spectrum.len();
    let mut max_v = 0.0f32;
    let mut max_n = 0usize;
    for (i, &mag) in spectrum.iter().enumerate() {
        if mag > max_v && mag > 0.0 {
            max_v = mag;
            max_n = i;
        }
    }

    let mut refined = max_n as f32;
    // Edge bins have no symmetric neighbors; use the integer index as-is.
    if max_n > 0 && max_n + 1 < n {
        let d_l = spectrum[max_n - 1] / spectrum[max_n];
        let d_r = spectrum[max_n + 1] / spectrum[max_n];
        refined += 0.5 * (d_r * d_r - d_l * d_l);
    }

    refined * (sample_rate / 2.0) / n as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = 8;
    const SR: f32 = 48_000.0;

    fn frame(samples: Vec<f32>, spectrum: Vec<f32>) -> AnalysisFrame {
        AnalysisFrame {
            samples,
            spectrum,
            sample_rate: SR,
        }
    }

    fn analyzer() -> SoundAnalyzer {
        SoundAnalyzer::new(N, 0.1)
    }

    #[test]
    fn silence_has_zero_rms_and_floor_db() {
        let result = analyzer().analyze(&frame(vec![0.0; N], vec![0.0; N]));
        assert_eq!(result.rms, 0.0);
        assert_eq!(result.db_level, SILENCE_DB_FLOOR);
    }

    #[test]
    fn constant_buffer_rms_is_magnitude() {
        let result = analyzer().analyze(&frame(vec![-0.25; N], vec![0.0; N]));
        assert!((result.rms - 0.25).abs() < 1e-6);
    }

    #[test]
    fn reference_amplitude_is_zero_db() {
        let result = analyzer().analyze(&frame(vec![0.1; N], vec![0.0; N]));
        assert!(result.db_level.abs() < 1e-4);
    }

    #[test]
    fn pitch_from_isolated_bin() {
        let mut spectrum = vec![0.0; N];
        spectrum[5] = 1.0;
        // Zero neighbors give zero ratios, so refinement contributes nothing.
        let pitch = dominant_pitch(&spectrum, SR);
        let expected = 5.0 * (SR / 2.0) / N as f32;
        assert!((pitch - expected).abs() < 1e-3);
    }

    #[test]
    fn pitch_ties_keep_earliest_bin() {
        let mut spectrum = vec![0.0; N];
        spectrum[2] = 0.5;
        spectrum[4] = 0.5;
        let pitch = dominant_pitch(&spectrum, SR);
        // Refinement pulls toward neither side: both neighbors of bin 2 are 0.
        let expected = 2.0 * (SR / 2.0) / N as f32;
        assert!((pitch - expected).abs() < 1e-3);
    }

    #[test]
    fn pitch_refinement_leans_toward_larger_neighbor() {
        let mut spectrum = vec![0.0; N];
        spectrum[3] = 0.2;
        spectrum[4] = 1.0;
        spectrum[5] = 0.6;
        let pitch = dominant_pitch(&spectrum, SR);
        let unrefined = 4.0 * (SR / 2.0) / N as f32;
        assert!(pitch > unrefined);
    }

    #[test]
    fn edge_bin_skips_refinement() {
        let mut spectrum = vec![0.0; N];
        spectrum[N - 1] = 1.0;
        spectrum[N - 2] = 0.9;
        let pitch = dominant_pitch(&spectrum, SR);
        let expected = (N - 1) as f32 * (SR / 2.0) / N as f32;
        assert!((pitch - expected).abs() < 1e-3);
    }

    #[test]
    fn analyze_is_idempotent() {
        let f = frame(vec![0.3, -0.2, 0.1, 0.0, 0.5, -0.4, 0.2, -0.1], {
            let mut s = vec![0.0; N];
            s[2] = 0.8;
            s[3] = 0.4;
            s
        });
        let a = analyzer();
        assert_eq!(a.analyze(&f), a.analyze(&f));
    }
}
