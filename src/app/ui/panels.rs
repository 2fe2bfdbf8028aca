use eframe::egui::{self, Align, Color32, Context, Layout, RichText};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        load_error: Option<&str>,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("orbita");
                    ui.separator();
                    ui.label(self.source.describe());
                    if self.source.is_remote() {
                        ui.small("(additions stay in this session)");
                    }
                    ui.label(format!("points: {}", self.store.len()));

                    let add_button =
                        ui.add_enabled(!self.form_open, egui::Button::new("Add content"));
                    if add_button.clicked() {
                        self.form_open = true;
                    }

                    let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let warning = Color32::from_rgb(235, 170, 80);
                        if let Some(error) = load_error {
                            ui.label(
                                RichText::new(format!("Load failed: {error}")).color(warning),
                            );
                        } else if let Some(status) = &self.status {
                            ui.label(RichText::new(status.as_str()).color(warning));
                        } else if is_loading {
                            ui.spinner();
                        }
                    });
                });
            });

        egui::SidePanel::left("points")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_point_list(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if is_loading && !self.initial_load_done {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading content points...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                } else {
                    self.draw_canvas(ui);
                }
            });

        self.draw_form(ctx);
        self.draw_modal(ctx);
    }
}
