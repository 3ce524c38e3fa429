use serde::Serialize;
use std::f32::consts::PI;

use crate::audio::features::AnalysisResult;
use crate::config::VisualConfig;
use crate::visual::color::Color;
use crate::visual::track::SmoothedScalarTrack;

pub const CIRCLE_RADIUS: f32 = 10.0;

/// Startup placement for one display element. The renderer owns the actual
/// drawable; the core only exports a stable index and where it belongs.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ElementPlacement {
    pub index: usize,
    pub position: [f32; 2],
    /// Radians from the positive x axis; elements face outward from center
    pub angle: f32,
}

/// Per-tick output handed to the renderer. Scales are linear offsets from a
/// baseline of 1 unit along the renderer's chosen axis.
#[derive(Clone, Debug, Serialize)]
pub struct VisualFrame {
    pub scales: Vec<f32>,
    pub background: Color,
    pub rms: f32,
    pub db_level: f32,
    pub pitch_hz: f32,
}

/// Evenly spaced circle placements. Element indices correspond 1:1 with
/// bucket indices in angular order.
pub fn circle_layout(amt_visual: usize) -> Vec<ElementPlacement> {
    (0..amt_visual)
        .map(|i| {
            let angle = i as f32 / amt_visual as f32 * 2.0 * PI;
            ElementPlacement {
                index: i,
                position: [angle.cos() * CIRCLE_RADIUS, angle.sin() * CIRCLE_RADIUS],
                angle,
            }
        })
        .collect()
}

/// Owns the process-lifetime smoothing state: one track per display element
/// plus one for background intensity. Everything else in the pipeline is
/// tick-scoped.
pub struct VisualMapper {
    cfg: VisualConfig,
    bucket_width: usize,
    elements: Vec<SmoothedScalarTrack>,
    background: SmoothedScalarTrack,
}

impl VisualMapper {
    pub fn new(cfg: VisualConfig, bucket_width: usize) -> Self {
        let elements = vec![SmoothedScalarTrack::new(); cfg.amt_visual];
        Self {
            cfg,
            bucket_width,
            elements,
            background: SmoothedScalarTrack::new(),
        }
    }

    pub fn layout(&self) -> Vec<ElementPlacement> {
        circle_layout(self.cfg.amt_visual)
    }

    /// Current background track value, conventionally in [-1, 0] for levels
    /// below the reference but unclamped above.
    pub fn background_intensity(&self) -> f32 {
        self.background.value()
    }

    /// One mapping tick, called after the analyzer and bucketizer have run.
    pub fn tick(&mut self, result: &AnalysisResult, bucket_sums: &[f32], dt: f32) -> VisualFrame {
        debug_assert_eq!(bucket_sums.len(), self.elements.len());

        let scales: Vec<f32> = self
            .elements
            .iter_mut()
            .zip(bucket_sums)
            .map(|(track, &sum)| {
                let target = sum / self.bucket_width as f32 * self.cfg.visual_modifier;
                track.update(
                    target,
                    self.cfg.visualiser_smooth_speed,
                    dt,
                    Some(self.cfg.max_visual_scale),
                )
            })
            .collect();

        let intensity = self.background.update(
            result.db_level / self.cfg.db_cap,
            self.cfg.background_smooth_speed,
            dt,
            None,
        );
        // Negated, unclamped blend factor: quiet input drives the factor
        // past 1 and the blend extrapolates beyond min_color.
        let background = Color::from_array(self.cfg.max_color)
            .lerp(Color::from_array(self.cfg.min_color), -intensity);

        VisualFrame {
            scales,
            background,
            rms: result.rms,
            db_level: result.db_level,
            pitch_hz: result.pitch_hz,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::analysis::SILENCE_DB_FLOOR;

    fn cfg(amt_visual: usize) -> VisualConfig {
        VisualConfig {
            amt_visual,
            ..VisualConfig::default()
        }
    }

    fn silent_result() -> AnalysisResult {
        AnalysisResult {
            rms: 0.0,
            db_level: SILENCE_DB_FLOOR,
            pitch_hz: 0.0,
        }
    }

    #[test]
    fn layout_is_evenly_spaced_on_the_circle() {
        let placements = circle_layout(4);
        assert_eq!(placements.len(), 4);
        assert_eq!(placements[0].angle, 0.0);
        assert!((placements[1].angle - PI / 2.0).abs() < 1e-6);
        assert!((placements[0].position[0] - CIRCLE_RADIUS).abs() < 1e-5);
        assert!(placements[0].position[1].abs() < 1e-5);
        // Quarter turn lands on the y axis.
        assert!(placements[1].position[0].abs() < 1e-5);
        assert!((placements[1].position[1] - CIRCLE_RADIUS).abs() < 1e-5);
        // Index order and angular order agree.
        for (i, p) in placements.iter().enumerate() {
            assert_eq!(p.index, i);
        }
    }

    #[test]
    fn loud_bucket_snaps_its_element_up() {
        let mut mapper = VisualMapper::new(cfg(2), 4);
        let result = AnalysisResult {
            rms: 0.2,
            db_level: 6.0,
            pitch_hz: 440.0,
        };
        // Average of 0.4 over the bucket, times the 50x modifier = 20.
        let frame = mapper.tick(&result, &[1.6, 0.0], 1.0 / 60.0);
        assert!((frame.scales[0] - 20.0).abs() < 1e-4);
        assert_eq!(frame.scales[1], 0.0);
    }

    #[test]
    fn scales_clamp_at_max_visual_scale() {
        let mut mapper = VisualMapper::new(cfg(1), 1);
        let frame = mapper.tick(&silent_result(), &[100.0], 1.0 / 60.0);
        assert_eq!(frame.scales[0], 25.0);
    }

    #[test]
    fn silent_ticks_decay_every_scale_to_zero() {
        let mut mapper = VisualMapper::new(cfg(3), 2);
        // Seed some energy, then starve the mapper.
        mapper.tick(&silent_result(), &[0.5, 0.8, 0.2], 1.0 / 60.0);
        for _ in 0..600 {
            let frame = mapper.tick(&silent_result(), &[0.0, 0.0, 0.0], 1.0 / 60.0);
            assert!(frame.scales.iter().all(|&s| s >= 0.0));
        }
        let frame = mapper.tick(&silent_result(), &[0.0, 0.0, 0.0], 1.0 / 60.0);
        assert!(frame.scales.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn diagnostics_pass_through_unchanged() {
        let mut mapper = VisualMapper::new(cfg(1), 1);
        let result = AnalysisResult {
            rms: 0.3,
            db_level: 9.5,
            pitch_hz: 261.6,
        };
        let frame = mapper.tick(&result, &[0.0], 1.0 / 60.0);
        assert_eq!(frame.rms, 0.3);
        assert_eq!(frame.db_level, 9.5);
        assert_eq!(frame.pitch_hz, 261.6);
    }

    #[test]
    fn background_tracks_db_over_cap() {
        let mut mapper = VisualMapper::new(cfg(1), 1);
        let loud = AnalysisResult {
            rms: 1.0,
            db_level: 20.0,
            pitch_hz: 0.0,
        };
        mapper.tick(&loud, &[0.0], 1.0 / 60.0);
        // db_cap defaults to 40, so the track snaps up to 0.5.
        assert!((mapper.background_intensity() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn quiet_background_extrapolates_past_min_color() {
        let mut mapper = VisualMapper::new(cfg(1), 1);
        let mut frame = mapper.tick(&silent_result(), &[0.0], 1.0 / 60.0);
        for _ in 0..1000 {
            frame = mapper.tick(&silent_result(), &[0.0], 1.0 / 60.0);
        }
        // Intensity settles at SILENCE_DB_FLOOR / db_cap = -4, so the blend
        // factor is 4 and the white-to-black blend overshoots below black.
        assert!((mapper.background_intensity() - (-4.0)).abs() < 1e-3);
        assert!(frame.background.r < 0.0);
    }
}
