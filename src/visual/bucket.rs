use crate::config::ConfigError;

/// Sums contiguous spectrum-bin ranges into a fixed number of display
/// buckets. Only the lowest `keep_percentage` fraction of the spectrum is
/// considered; integer truncation of the bucket width means trailing
/// remainder bins are simply never read.
pub struct SpectrumBucketizer {
    amt_visual: usize,
    bucket_width: usize,
}

impl SpectrumBucketizer {
    pub fn new(
        frame_size: usize,
        amt_visual: usize,
        keep_percentage: f32,
    ) -> Result<Self, ConfigError> {
        if amt_visual == 0 {
            return Err(ConfigError::AmtVisualZero);
        }
        if !(keep_percentage > 0.0 && keep_percentage <= 1.0) {
            return Err(ConfigError::KeepPercentage {
                value: keep_percentage,
            });
        }
        let retained = (frame_size as f32 * keep_percentage) as usize;
        let bucket_width = retained / amt_visual;
        if bucket_width == 0 {
            return Err(ConfigError::BucketWidthZero {
                retained,
                amt_visual,
            });
        }
        Ok(Self {
            amt_visual,
            bucket_width,
        })
    }

    pub fn amt_visual(&self) -> usize {
        self.amt_visual
    }

    pub fn bucket_width(&self) -> usize {
        self.bucket_width
    }

    /// Raw per-bucket sums; the mapper divides by `bucket_width` and applies
    /// the gain multiplier to turn these into display scales.
    pub fn sums(&self, spectrum: &[f32]) -> Vec<f32> {
        let mut cursor = 0;
        (0..self.amt_visual)
            .map(|_| {
                let sum = spectrum[cursor..cursor + self.bucket_width].iter().sum();
                cursor += self.bucket_width;
                sum
            })
            .collect()
    }
}
