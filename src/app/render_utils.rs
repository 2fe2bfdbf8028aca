use eframe::egui::{Color32, Mesh, Painter, Pos2, Shape, Stroke, Vec2, vec2};

use crate::connections::{Segment, Surface};
use crate::layout::{DISTANCE_SPREAD, MIN_DISTANCE};

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
pub(super) const POINT_RADIUS: f32 = 9.0;
pub(super) const CENTER_RADIUS: f32 = 14.0;

/// Paints connection segments onto an egui painter, shifted from canvas
/// coordinates into screen coordinates by `offset`.
pub(super) struct PainterSurface<'a> {
    painter: &'a Painter,
    offset: Vec2,
}

impl<'a> PainterSurface<'a> {
    pub(super) fn new(painter: &'a Painter, offset: Vec2) -> Self {
        Self { painter, offset }
    }
}

impl Surface for PainterSurface<'_> {
    fn clear(&mut self) {
        self.painter
            .rect_filled(self.painter.clip_rect(), 0.0, BACKGROUND);
    }

    fn stroke_gradient_line(&mut self, segment: Segment) {
        if let Some(mesh) = gradient_line_mesh(&segment, self.offset) {
            self.painter.add(Shape::mesh(mesh));
        }
    }
}

/// Thin quad along the segment with the two stop colors on its ends; the
/// rasterizer interpolates between them.
pub(super) fn gradient_line_mesh(segment: &Segment, offset: Vec2) -> Option<Mesh> {
    let from = segment.from + offset;
    let to = segment.to + offset;
    let direction = to - from;
    let length = direction.length();
    if length <= f32::EPSILON {
        return None;
    }

    let half_width = segment.width.max(0.5) * 0.5;
    let normal = vec2(-direction.y, direction.x) / length * half_width;
    let [start, end] = segment.stops;

    let mut mesh = Mesh::default();
    mesh.colored_vertex(from + normal, start.color);
    mesh.colored_vertex(from - normal, start.color);
    mesh.colored_vertex(to + normal, end.color);
    mesh.colored_vertex(to - normal, end.color);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(1, 3, 2);
    Some(mesh)
}

/// Faint rings marking the band random placement draws from.
pub(super) fn draw_guides(painter: &Painter, center: Pos2) {
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));
    painter.circle_stroke(center, MIN_DISTANCE, stroke);
    painter.circle_stroke(center, MIN_DISTANCE + DISTANCE_SPREAD, stroke);
}

pub(super) fn draw_center(painter: &Painter, center: Pos2) {
    painter.circle_filled(center, CENTER_RADIUS, Color32::from_rgb(235, 235, 240));
    painter.circle_stroke(
        center,
        CENTER_RADIUS + 3.0,
        Stroke::new(1.5, Color32::from_rgba_unmultiplied(235, 235, 240, 90)),
    );
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;
    use crate::connections::{GradientStop, center_stop_color};

    fn segment(from: Pos2, to: Pos2) -> Segment {
        Segment {
            from,
            to,
            stops: [
                GradientStop {
                    offset: 0.0,
                    color: center_stop_color(),
                },
                GradientStop {
                    offset: 1.0,
                    color: Color32::RED,
                },
            ],
            width: 1.0,
        }
    }

    #[test]
    fn mesh_spans_segment_with_stop_colors() {
        let mesh = gradient_line_mesh(&segment(pos2(0.0, 0.0), pos2(10.0, 0.0)), vec2(5.0, 5.0))
            .expect("non-degenerate segment");

        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
        assert_eq!(mesh.vertices[0].pos, pos2(5.0, 5.5));
        assert_eq!(mesh.vertices[1].pos, pos2(5.0, 4.5));
        assert_eq!(mesh.vertices[3].pos, pos2(15.0, 4.5));
        assert_eq!(mesh.vertices[0].color, center_stop_color());
        assert_eq!(mesh.vertices[2].color, Color32::RED);
    }

    #[test]
    fn zero_length_segment_has_no_mesh() {
        assert!(gradient_line_mesh(&segment(pos2(3.0, 3.0), pos2(3.0, 3.0)), Vec2::ZERO).is_none());
    }
}
