use std::collections::HashSet;

use eframe::egui::{self, RichText, Sense, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::connections::fallback_point_color;
use crate::points::ContentPoint;
use crate::util::{parse_css_color, truncate_label};

use super::super::ViewModel;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Points whose title matches `query`, in store order. An empty query
/// matches everything.
pub(in crate::app) fn filter_points<'a>(
    points: &'a [ContentPoint],
    query: &str,
) -> Vec<&'a ContentPoint> {
    let query = query.trim();
    if query.is_empty() {
        return points.iter().collect();
    }

    let matcher = SkimMatcherV2::default();
    points
        .iter()
        .filter(|point| fuzzy_match_score(&matcher, &point.title, query).is_some())
        .collect()
}

impl ViewModel {
    /// Ids matching the search box, or `None` when no search is active.
    pub(in crate::app) fn search_matches(&self) -> Option<HashSet<&str>> {
        if self.search.trim().is_empty() {
            return None;
        }

        Some(
            filter_points(self.store.all(), &self.search)
                .into_iter()
                .map(|point| point.id.as_str())
                .collect(),
        )
    }

    pub(in crate::app) fn draw_point_list(&mut self, ui: &mut Ui) {
        ui.heading("Points");
        ui.add_space(6.0);
        ui.add(egui::TextEdit::singleline(&mut self.search).hint_text("Search titles"));
        ui.add_space(6.0);

        let mut clicked = None;
        let matches = filter_points(self.store.all(), &self.search);

        if matches.is_empty() {
            ui.label(if self.store.is_empty() {
                "No points yet."
            } else {
                "No titles match the search."
            });
        }

        egui::ScrollArea::vertical()
            .id_salt("point_list_scroll")
            .max_height(ui.available_height() * 0.6)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for point in &matches {
                    ui.horizontal(|ui| {
                        let (dot, _) = ui.allocate_exact_size(vec2(12.0, 12.0), Sense::hover());
                        let color =
                            parse_css_color(&point.color).unwrap_or_else(fallback_point_color);
                        ui.painter().circle_filled(dot.center(), 5.0, color);

                        let is_selected = self.selected.as_deref() == Some(point.id.as_str());
                        let label = format!(
                            "{}  ({})",
                            truncate_label(&point.title, 32),
                            point.content_type.label()
                        );
                        if ui
                            .selectable_label(is_selected, label)
                            .on_hover_text(point.title.as_str())
                            .clicked()
                        {
                            clicked = Some(point.id.clone());
                        }
                    });
                }
            });

        ui.separator();
        self.draw_selection_details(ui);

        if let Some(id) = clicked {
            let now = ui.input(|input| input.time);
            self.open_point(&id, now);
        }
    }

    fn draw_selection_details(&self, ui: &mut Ui) {
        let Some(point) = self
            .selected
            .as_deref()
            .and_then(|id| self.store.find_by_id(id))
        else {
            ui.label("Select a point on the canvas or in the list.");
            return;
        };

        ui.label(RichText::new(point.title.as_str()).strong());
        ui.small(point.id.as_str());
        ui.add_space(4.0);
        ui.label(format!("Type: {}", point.content_type.label()));
        ui.label(format!("Color: {}", point.color));

        let position = point.position();
        ui.label(format!("Position: ({:.1}, {:.1})", position.x, position.y));
        match point.placement() {
            Some(placement) => ui.label(format!(
                "Placement: {:.1}° at {:.1} px",
                placement.angle.to_degrees(),
                placement.distance
            )),
            None => ui.label("Placement: stored coordinates"),
        };
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;
    use crate::points::ContentType;

    fn titled(id: &str, title: &str) -> ContentPoint {
        ContentPoint::restored(
            id.to_owned(),
            pos2(0.0, 0.0),
            "#FF5733".to_owned(),
            title.to_owned(),
            ContentType::Text,
            String::new(),
        )
    }

    #[test]
    fn empty_query_keeps_all_points_in_order() {
        let points = vec![titled("1", "Zebra"), titled("2", "Apple")];
        let ids = filter_points(&points, "  ")
            .into_iter()
            .map(|point| point.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn fuzzy_query_filters_titles() {
        let points = vec![
            titled("1", "Holiday photos"),
            titled("2", "Meeting notes"),
            titled("3", "Photo booth"),
        ];
        let ids = filter_points(&points, "photo")
            .into_iter()
            .map(|point| point.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["1", "3"]);
    }
}
