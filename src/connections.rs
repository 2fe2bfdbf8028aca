use eframe::egui::{Color32, Pos2};

use crate::points::ContentPoint;
use crate::util::parse_css_color;

pub const LINE_WIDTH: f32 = 1.0;

/// Stop color at the center end of every connection, `rgba(0, 0, 0, 0.7)`.
pub fn center_stop_color() -> Color32 {
    Color32::from_rgba_unmultiplied(0, 0, 0, 178)
}

/// Used when a point carries a color string we cannot parse.
pub fn fallback_point_color() -> Color32 {
    Color32::from_rgb(160, 160, 160)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Pos2,
    pub to: Pos2,
    pub stops: [GradientStop; 2],
    pub width: f32,
}

pub trait Surface {
    fn clear(&mut self);
    fn stroke_gradient_line(&mut self, segment: Segment);
}

/// Draws a gradient line from the center to each point, in store order.
///
/// Every call starts by clearing the surface, so repeated calls with the same
/// inputs leave the surface in the same state.
pub fn render(surface: &mut impl Surface, center: Pos2, points: &[ContentPoint]) {
    surface.clear();

    for point in points {
        let end_color = parse_css_color(&point.color).unwrap_or_else(fallback_point_color);
        surface.stroke_gradient_line(Segment {
            from: center,
            to: point.position(),
            stops: [
                GradientStop {
                    offset: 0.0,
                    color: center_stop_color(),
                },
                GradientStop {
                    offset: 1.0,
                    color: end_color,
                },
            ],
            width: LINE_WIDTH,
        });
    }
}

/// Recording surface; the shell keeps one and paints it every frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    segments: Vec<Segment>,
}

impl DrawList {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl Surface for DrawList {
    fn clear(&mut self) {
        self.segments.clear();
    }

    fn stroke_gradient_line(&mut self, segment: Segment) {
        self.segments.push(segment);
    }
}
