//! Doodle model: a curling random walk that stands in for a trained network.

use super::{ModelError, StrokeModel};
use crate::stroke::{Pen, Stroke};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Random-walk stroke model.
///
/// Each drawing is a run of short strokes whose heading drifts with a steady
/// curl plus noise, occasionally lifting the pen. The first call of a pass
/// picks up the heading of the user's last seed stroke.
#[derive(Debug, Clone)]
pub struct DoodleModel {
    rng: StdRng,
    heading: f32,
    remaining: u32,
    /// Mean stroke length in pixels.
    pub step: f32,
    /// Heading change per stroke, in radians.
    pub curl: f32,
    /// Probability that a stroke is a pen-up move.
    pub lift_chance: f64,
    /// Fewest strokes per drawing.
    pub min_strokes: u32,
    /// Most strokes per drawing.
    pub max_strokes: u32,
}

impl DoodleModel {
    /// Create a deterministic model from a seed.
    pub fn new(seed: u64) -> Self {
        let mut model = Self {
            rng: StdRng::seed_from_u64(seed),
            heading: 0.0,
            remaining: 0,
            step: 8.0,
            curl: 0.12,
            lift_chance: 0.04,
            min_strokes: 40,
            max_strokes: 120,
        };
        model.reset();
        model
    }

    fn follow_seed(&mut self, seed: &[Stroke]) {
        let last_motion = seed
            .iter()
            .rev()
            .find(|s| !s.is_end() && (s.dx != 0.0 || s.dy != 0.0));
        if let Some(last) = last_motion {
            self.heading = last.dy.atan2(last.dx);
        }
    }
}

impl StrokeModel for DoodleModel {
    fn reset(&mut self) {
        let max = self.max_strokes.max(self.min_strokes);
        self.remaining = self.rng.random_range(self.min_strokes..=max);
        self.heading = self.rng.random_range(0.0..TAU);
    }

    fn generate(&mut self, seed: Option<&[Stroke]>) -> Result<Stroke, ModelError> {
        if let Some(seed) = seed {
            self.follow_seed(seed);
        }
        if self.remaining == 0 {
            return Ok(Stroke::end());
        }
        self.remaining -= 1;

        self.heading += self.curl + self.rng.random_range(-0.5..0.5);
        let length = self.step * self.rng.random_range(0.5..1.5);
        let pen = if self.rng.random_bool(self.lift_chance.clamp(0.0, 1.0)) {
            Pen::Up
        } else {
            Pen::Down
        };

        Ok(Stroke::new(
            length * self.heading.cos(),
            length * self.heading.sin(),
            pen,
        ))
    }
}
