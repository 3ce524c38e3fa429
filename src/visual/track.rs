/// Decay-then-clamp-up smoothing filter: the value drifts down linearly every
/// tick, snaps up instantly when a louder reading arrives, and is finally
/// clamped to an optional upper bound. One instance per display element plus
/// one for the background gives both the same fast-attack slow-release
/// character.
#[derive(Clone, Copy, Debug, Default)]
pub struct SmoothedScalarTrack {
    value: f32,
}

impl SmoothedScalarTrack {
    pub fn new() -> Self {
        Self { value: 0.0 }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Pure state transition: decay, snap up to `target` if larger, clamp.
    pub fn update(
        &mut self,
        target: f32,
        decay_rate: f32,
        elapsed: f32,
        upper_bound: Option<f32>,
    ) -> f32 {
        self.value -= decay_rate * elapsed;
        if self.value < target {
            self.value = target;
        }
        if let Some(cap) = upper_bound {
            if self.value > cap {
                self.value = cap;
            }
        }
        self.value
    }
}
