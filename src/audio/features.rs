use serde::Serialize;

/// One tick's worth of raw analysis input, handed over by the frame source.
/// Tick-scoped: consumed by `SoundAnalyzer::analyze` and discarded, never
/// retained across ticks.
#[derive(Clone, Debug)]
pub struct AnalysisFrame {
    /// Time-domain samples, `frame_size` elements
    pub samples: Vec<f32>,
    /// Windowed magnitude spectrum, `frame_size` non-negative elements
    pub spectrum: Vec<f32>,
    /// Output sample rate in Hz
    pub sample_rate: f32,
}

/// Scalar descriptors derived from one frame. Immutable once computed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Root-mean-square amplitude (linear, >= 0)
    pub rms: f32,
    /// Level in dB relative to the reference amplitude; silence is clamped
    /// to a finite floor rather than -inf
    pub db_level: f32,
    /// Dominant pitch in Hz, parabolic sub-bin refined
    pub pitch_hz: f32,
}
