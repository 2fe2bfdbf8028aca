use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};
use log::debug;

use crate::connections::{self, Surface};
use crate::util::{parse_css_color, truncate_label};

use super::super::render_utils::{
    POINT_RADIUS, PainterSurface, dim_color, draw_center, draw_guides,
};
use super::super::ViewModel;
use super::interaction::pulse_scale;

const TOOLTIP_OFFSET: f32 = 25.0;

impl ViewModel {
    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        self.set_viewport(rect.size());

        if self.connections_dirty {
            connections::render(&mut self.connections, self.center, self.store.all());
            self.connections_dirty = false;
            debug!(
                "event=connections_render module=app segments={}",
                self.connections.segments().len()
            );
        }

        let painter = ui.painter_at(rect);
        let offset = rect.min.to_vec2();
        let screen_center = self.center + offset;

        let mut surface = PainterSurface::new(&painter, offset);
        surface.clear();
        draw_guides(&painter, screen_center);
        for segment in self.connections.segments() {
            surface.stroke_gradient_line(*segment);
        }

        let now = ui.input(|input| input.time);
        let hovered = self.hovered_point_id(ui, offset);
        let search_matches = self.search_matches();

        for point in self.store.all() {
            let base = parse_css_color(&point.color)
                .unwrap_or_else(connections::fallback_point_color);
            let color = match &search_matches {
                Some(matches) if !matches.contains(point.id.as_str()) => dim_color(base, 0.35),
                _ => base,
            };
            let scale = self
                .decorations
                .get(&point.id)
                .and_then(|decoration| decoration.pulse_started)
                .and_then(|started| pulse_scale(started, now))
                .unwrap_or(1.0);

            let position = point.position() + offset;
            painter.circle_filled(position, POINT_RADIUS * scale, color);

            let emphasized = hovered.as_deref() == Some(point.id.as_str())
                || self.selected.as_deref() == Some(point.id.as_str());
            if emphasized {
                painter.circle_stroke(
                    position,
                    POINT_RADIUS * scale + 3.0,
                    Stroke::new(1.5, Color32::WHITE),
                );
            }
        }

        draw_center(&painter, screen_center);

        if let Some(point) = hovered.as_deref().and_then(|id| self.store.find_by_id(id)) {
            let anchor = point.position() + offset + vec2(TOOLTIP_OFFSET, 0.0);
            let galley = painter.layout_no_wrap(
                truncate_label(&point.title, 48),
                FontId::proportional(14.0),
                Color32::WHITE,
            );
            let text_rect = Align2::LEFT_CENTER.anchor_size(anchor, galley.size());
            painter.rect_filled(
                text_rect.expand(4.0),
                4.0,
                Color32::from_rgba_unmultiplied(0, 0, 0, 160),
            );
            painter.galley(text_rect.min, galley, Color32::WHITE);
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        if self.initial_load_done && self.store.is_empty() {
            painter.text(
                screen_center + vec2(0.0, 40.0),
                Align2::CENTER_TOP,
                "No content yet. Use \"Add content\" to place the first point.",
                FontId::proportional(14.0),
                Color32::from_gray(170),
            );
        }

        if response.clicked() {
            match hovered {
                Some(id) => self.open_point(&id, now),
                None => {
                    self.modal.dismiss();
                    self.selected = None;
                }
            }
        }

        if self.prune_pulses(now) {
            ui.ctx().request_repaint();
        }
    }
}
