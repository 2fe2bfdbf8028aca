use std::f32::consts::TAU;

use eframe::egui::{Pos2, pos2, vec2};
use rand::Rng;

pub const MIN_DISTANCE: f32 = 150.0;
pub const DISTANCE_SPREAD: f32 = 150.0;

pub const PALETTE: [&str; 15] = [
    "#FF5733", "#33FF57", "#3357FF", "#F033FF", "#FF33F0", "#33FFF0", "#F0FF33", "#FF3333",
    "#33FF33", "#3333FF", "#FF9900", "#00CCFF", "#CC00FF", "#FF00CC", "#00FF99",
];

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource {
    fn next_float(&mut self) -> f32;
}

/// Adapts any `rand` generator into a [`RandomSource`].
pub struct RngSource<R>(pub R);

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_float(&mut self) -> f32 {
        self.0.gen_range(0.0..1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlacementSpec {
    Random,
    Explicit { angle_degrees: f32, distance: f32 },
}

/// Resolved placement relative to the center, angle in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Polar {
    pub angle: f32,
    pub distance: f32,
}

impl Polar {
    pub fn from_degrees(angle_degrees: f32, distance: f32) -> Self {
        Self {
            angle: angle_degrees.to_radians(),
            distance,
        }
    }

    pub fn project(self, center: Pos2) -> Pos2 {
        center + vec2(self.angle.cos(), self.angle.sin()) * self.distance
    }
}

/// Maps a `[0, 1)` sample onto `[start, start + span)`. f32 rounding can land
/// a sample just under 1 on the upper bound, so the result is capped at the
/// largest float below it.
fn scale_below(sample: f32, start: f32, span: f32) -> f32 {
    let end = start + span;
    let below_end = f32::from_bits(end.to_bits() - 1);
    (start + sample * span).min(below_end)
}

pub fn compute_center(viewport_width: f32, viewport_height: f32) -> Pos2 {
    pos2(viewport_width / 2.0, viewport_height / 2.0)
}

pub struct LayoutEngine {
    random: Box<dyn RandomSource>,
}

impl LayoutEngine {
    pub fn new(random: impl RandomSource + 'static) -> Self {
        Self {
            random: Box::new(random),
        }
    }

    pub fn resolve(&mut self, spec: PlacementSpec) -> Polar {
        match spec {
            PlacementSpec::Random => {
                let angle = scale_below(self.random.next_float(), 0.0, TAU);
                let distance =
                    scale_below(self.random.next_float(), MIN_DISTANCE, DISTANCE_SPREAD);
                Polar { angle, distance }
            }
            PlacementSpec::Explicit {
                angle_degrees,
                distance,
            } => Polar::from_degrees(angle_degrees, distance),
        }
    }

    pub fn compute_position(&mut self, center: Pos2, spec: PlacementSpec) -> Pos2 {
        self.resolve(spec).project(center)
    }

    pub fn pick_color(&mut self) -> &'static str {
        let index = (self.random.next_float() * PALETTE.len() as f32) as usize;
        PALETTE[index.min(PALETTE.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    struct Sequence {
        values: Vec<f32>,
        cursor: usize,
    }

    impl Sequence {
        fn new(values: &[f32]) -> Self {
            Self {
                values: values.to_vec(),
                cursor: 0,
            }
        }
    }

    impl RandomSource for Sequence {
        fn next_float(&mut self) -> f32 {
            let value = self.values[self.cursor % self.values.len()];
            self.cursor += 1;
            value
        }
    }

    fn assert_close(actual: Pos2, expected: Pos2) {
        assert!(
            actual.distance(expected) < 1e-3,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn center_is_half_the_viewport() {
        assert_eq!(compute_center(1280.0, 720.0), pos2(640.0, 360.0));
        assert_eq!(compute_center(0.0, 0.0), pos2(0.0, 0.0));
    }

    #[test]
    fn explicit_placement_follows_polar_formula() {
        let mut engine = LayoutEngine::new(Sequence::new(&[0.0]));
        let center = pos2(500.0, 500.0);

        let east = engine.compute_position(
            center,
            PlacementSpec::Explicit {
                angle_degrees: 0.0,
                distance: 100.0,
            },
        );
        assert_eq!(east, pos2(600.0, 500.0));

        let south = engine.compute_position(
            center,
            PlacementSpec::Explicit {
                angle_degrees: 90.0,
                distance: 100.0,
            },
        );
        assert_close(south, pos2(500.0, 600.0));
    }

    #[test]
    fn random_placement_uses_injected_samples() {
        let mut engine = LayoutEngine::new(Sequence::new(&[0.25, 0.5]));
        let polar = engine.resolve(PlacementSpec::Random);

        assert!((polar.angle - TAU * 0.25).abs() < 1e-6);
        assert!((polar.distance - 225.0).abs() < 1e-4);
        assert_close(polar.project(pos2(0.0, 0.0)), pos2(0.0, 225.0));
    }

    #[test]
    fn random_placement_stays_within_ring() {
        let mut engine = LayoutEngine::new(RngSource(StdRng::seed_from_u64(7)));

        for _ in 0..500 {
            let polar = engine.resolve(PlacementSpec::Random);
            assert!(polar.distance >= MIN_DISTANCE, "too close: {}", polar.distance);
            assert!(polar.distance < 300.0, "too far: {}", polar.distance);
            assert!((0.0..TAU).contains(&polar.angle), "angle: {}", polar.angle);
        }
    }

    #[test]
    fn top_sample_stays_below_ring_edge() {
        let top = 1.0 - f32::EPSILON / 2.0;
        assert_eq!(150.0f32 + top * 150.0, 300.0);

        let mut engine = LayoutEngine::new(Sequence::new(&[top]));
        let polar = engine.resolve(PlacementSpec::Random);

        assert!(polar.distance < 300.0, "too far: {}", polar.distance);
        assert!(polar.distance > 299.99);
        assert!(polar.angle < TAU, "angle wrapped: {}", polar.angle);
    }

    #[test]
    fn seeded_engines_agree() {
        let mut first = LayoutEngine::new(RngSource(StdRng::seed_from_u64(42)));
        let mut second = LayoutEngine::new(RngSource(StdRng::seed_from_u64(42)));

        for _ in 0..10 {
            assert_eq!(
                first.resolve(PlacementSpec::Random),
                second.resolve(PlacementSpec::Random)
            );
            assert_eq!(first.pick_color(), second.pick_color());
        }
    }

    #[test]
    fn pick_color_covers_palette_bounds() {
        let mut engine = LayoutEngine::new(Sequence::new(&[0.0, 0.999_999]));
        assert_eq!(engine.pick_color(), PALETTE[0]);
        assert_eq!(engine.pick_color(), PALETTE[14]);
    }
}
