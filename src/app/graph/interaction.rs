use std::f32::consts::PI;

use eframe::egui::{Pos2, Ui, Vec2};

use crate::points::ContentPoint;

use super::super::ViewModel;
use super::super::render_utils::POINT_RADIUS;

pub(in crate::app) const PULSE_SECS: f64 = 1.5;
const HIT_SLOP: f32 = 4.0;

/// Closest point under `pointer`, both in canvas coordinates.
pub(in crate::app) fn point_at(points: &[ContentPoint], pointer: Pos2) -> Option<&ContentPoint> {
    points
        .iter()
        .filter_map(|point| {
            let distance = point.position().distance(pointer);
            (distance <= POINT_RADIUS + HIT_SLOP).then_some((point, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(point, _)| point)
}

/// Radius multiplier for a pulse started at `started`, or `None` once over.
pub(in crate::app) fn pulse_scale(started: f64, now: f64) -> Option<f32> {
    let elapsed = now - started;
    if !(0.0..PULSE_SECS).contains(&elapsed) {
        return None;
    }

    let phase = (elapsed / PULSE_SECS) as f32;
    Some(1.0 + 0.45 * (phase * PI).sin())
}

impl ViewModel {
    pub(in crate::app) fn hovered_point_id(&self, ui: &Ui, offset: Vec2) -> Option<String> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        point_at(self.store.all(), pointer - offset).map(|point| point.id.clone())
    }

    /// Drops finished pulses; returns whether any is still running.
    pub(in crate::app) fn prune_pulses(&mut self, now: f64) -> bool {
        let mut running = false;
        for decoration in self.decorations.values_mut() {
            if let Some(started) = decoration.pulse_started {
                if pulse_scale(started, now).is_some() {
                    running = true;
                } else {
                    decoration.pulse_started = None;
                }
            }
        }
        running
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;
    use crate::points::ContentType;

    fn at(id: &str, x: f32, y: f32) -> ContentPoint {
        ContentPoint::restored(
            id.to_owned(),
            pos2(x, y),
            "#FF5733".to_owned(),
            id.to_owned(),
            ContentType::Text,
            String::new(),
        )
    }

    #[test]
    fn point_at_picks_nearest_within_reach() {
        let points = vec![at("a", 100.0, 100.0), at("b", 108.0, 100.0)];

        assert_eq!(point_at(&points, pos2(101.0, 100.0)).unwrap().id, "a");
        assert_eq!(point_at(&points, pos2(107.0, 100.0)).unwrap().id, "b");
        assert!(point_at(&points, pos2(200.0, 200.0)).is_none());
    }

    #[test]
    fn pulse_grows_then_ends() {
        assert_eq!(pulse_scale(10.0, 10.0), Some(1.0));
        let peak = pulse_scale(10.0, 10.75).unwrap();
        assert!((peak - 1.45).abs() < 1e-4);
        assert_eq!(pulse_scale(10.0, 11.5), None);
        assert_eq!(pulse_scale(10.0, 9.0), None);
    }
}
