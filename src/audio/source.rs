use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use super::features::AnalysisFrame;

/// Supplies one fixed-size sample/spectrum pair per analysis tick.
/// The core pipeline never looks behind this seam: live capture, file
/// playback, or a test stub all drive the same pull interface.
pub trait SpectralFrameSource {
    fn sample_rate(&self) -> f32;

    /// Next tick's frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> Option<AnalysisFrame>;
}

/// Frame source that walks a decoded sample buffer at a fixed tick rate and
/// computes the windowed magnitude spectrum itself.
///
/// Each tick advances a playback cursor by one hop (`sample_rate / fps`) and
/// exposes the most recent `frame_size` samples, mirroring a host that hands
/// out its latest output block every frame. The spectrum is a
/// Blackman-Harris-windowed forward FFT of size `2 * frame_size`; the first
/// `frame_size` magnitudes cover DC up to Nyquist at the same resolution the
/// pitch conversion assumes.
pub struct FftFrameSource {
    samples: Vec<f32>,
    sample_rate: f32,
    frame_size: usize,
    hop: usize,
    cursor: usize,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
}

impl FftFrameSource {
    pub fn new(samples: Vec<f32>, sample_rate: u32, frame_size: usize, fps: u32) -> Self {
        let fft_size = frame_size * 2;
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);
        let hop = (sample_rate as usize / fps.max(1) as usize).max(1);

        Self {
            samples,
            sample_rate: sample_rate as f32,
            frame_size,
            hop,
            cursor: 0,
            fft,
            window: blackman_harris(fft_size),
        }
    }

    pub fn total_ticks(&self) -> usize {
        self.samples.len().div_ceil(self.hop)
    }
}

impl SpectralFrameSource for FftFrameSource {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn next_frame(&mut self) -> Option<AnalysisFrame> {
        if self.cursor >= self.samples.len() {
            return None;
        }
        let end = (self.cursor + self.hop).min(self.samples.len());
        self.cursor = end;

        let n = self.frame_size;

        // Most recent n samples ending at the cursor, zero-padded at the
        // front until playback has produced a full frame.
        let mut frame = vec![0.0f32; n];
        let have = end.min(n);
        frame[n - have..].copy_from_slice(&self.samples[end - have..end]);

        let fft_size = n * 2;
        let mut buffer: Vec<Complex<f32>> = vec![Complex::new(0.0, 0.0); fft_size];
        let have2 = end.min(fft_size);
        for (i, &s) in self.samples[end - have2..end].iter().enumerate() {
            let slot = fft_size - have2 + i;
            buffer[slot] = Complex::new(s * self.window[slot], 0.0);
        }
        self.fft.process(&mut buffer);

        let spectrum: Vec<f32> = buffer[..n].iter().map(|c| c.norm() / n as f32).collect();

        Some(AnalysisFrame {
            samples: frame,
            spectrum,
            sample_rate: self.sample_rate,
        })
    }
}

fn blackman_harris(size: usize) -> Vec<f32> {
    const A0: f32 = 0.35875;
    const A1: f32 = 0.48829;
    const A2: f32 = 0.14128;
    const A3: f32 = 0.01168;

    (0..size)
        .map(|i| {
            let x = 2.0 * PI * i as f32 / (size - 1) as f32;
            A0 - A1 * x.cos() + A2 * (2.0 * x).cos() - A3 * (3.0 * x).cos()
        })
        .collect()
}
