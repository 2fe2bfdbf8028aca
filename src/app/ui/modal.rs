use eframe::egui::{self, Color32, RichText, Ui};

use crate::media::{ModalBody, ModalContent};

use super::super::ViewModel;

const TRANSITION_SECS: f32 = 0.3;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(in crate::app) enum ModalPhase {
    #[default]
    Closed,
    Opening {
        elapsed: f32,
    },
    Open,
    Closing {
        elapsed: f32,
    },
}

/// Content modal. Closed -> Opening -> Open -> Closing -> Closed, each
/// transition lasting [`TRANSITION_SECS`].
#[derive(Debug, Default)]
pub(in crate::app) struct Modal {
    phase: ModalPhase,
    content: Option<ModalContent>,
}

impl Modal {
    pub(in crate::app) fn present(&mut self, content: ModalContent) {
        self.content = Some(content);
        self.phase = match self.phase {
            ModalPhase::Open => ModalPhase::Open,
            _ => ModalPhase::Opening { elapsed: 0.0 },
        };
    }

    pub(in crate::app) fn dismiss(&mut self) {
        if matches!(self.phase, ModalPhase::Open | ModalPhase::Opening { .. }) {
            self.phase = ModalPhase::Closing { elapsed: 0.0 };
        }
    }

    pub(in crate::app) fn tick(&mut self, dt: f32) {
        self.phase = match self.phase {
            ModalPhase::Opening { elapsed } if elapsed + dt >= TRANSITION_SECS => ModalPhase::Open,
            ModalPhase::Opening { elapsed } => ModalPhase::Opening {
                elapsed: elapsed + dt,
            },
            ModalPhase::Closing { elapsed } if elapsed + dt >= TRANSITION_SECS => {
                self.content = None;
                ModalPhase::Closed
            }
            ModalPhase::Closing { elapsed } => ModalPhase::Closing {
                elapsed: elapsed + dt,
            },
            phase => phase,
        };
    }

    #[cfg(test)]
    fn phase(&self) -> ModalPhase {
        self.phase
    }

    pub(in crate::app) fn content(&self) -> Option<&ModalContent> {
        self.content.as_ref()
    }

    pub(in crate::app) fn is_visible(&self) -> bool {
        self.phase != ModalPhase::Closed
    }

    pub(in crate::app) fn is_animating(&self) -> bool {
        matches!(
            self.phase,
            ModalPhase::Opening { .. } | ModalPhase::Closing { .. }
        )
    }

    pub(in crate::app) fn opacity(&self) -> f32 {
        match self.phase {
            ModalPhase::Closed => 0.0,
            ModalPhase::Opening { elapsed } => (elapsed / TRANSITION_SECS).clamp(0.0, 1.0),
            ModalPhase::Open => 1.0,
            ModalPhase::Closing { elapsed } => 1.0 - (elapsed / TRANSITION_SECS).clamp(0.0, 1.0),
        }
    }
}

fn draw_body(ui: &mut Ui, body: &ModalBody) {
    match body {
        ModalBody::Text(text) => {
            egui::ScrollArea::vertical()
                .max_height(360.0)
                .show(ui, |ui| ui.label(text.as_str()));
        }
        ModalBody::Image { url } => {
            ui.label("Image");
            ui.hyperlink_to(url.as_str(), url.as_str());
        }
        ModalBody::Video(Ok(embed_url)) => {
            ui.label("Video");
            ui.hyperlink_to(embed_url.as_str(), embed_url.as_str());
        }
        ModalBody::Video(Err(error)) => {
            ui.label(RichText::new(error.to_string()).color(Color32::from_rgb(235, 96, 96)));
        }
        ModalBody::Music { url } => {
            ui.label("Audio");
            ui.hyperlink_to(url.as_str(), url.as_str());
        }
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_modal(&mut self, ctx: &egui::Context) {
        let dt = ctx.input(|input| input.stable_dt).min(0.1);
        self.modal.tick(dt);
        if self.modal.is_animating() {
            ctx.request_repaint();
        }

        if !self.modal.is_visible() {
            return;
        }
        let Some(content) = self.modal.content().cloned() else {
            return;
        };

        let opacity = self.modal.opacity();
        let mut open = true;
        egui::Window::new(RichText::new(content.title.as_str()).strong())
            .id(egui::Id::new("content_modal"))
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .default_width(480.0)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.set_opacity(opacity);
                draw_body(ui, &content.body);
            });

        if !open {
            self.modal.dismiss();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points::ContentType;

    fn content() -> ModalContent {
        ModalContent::present("Title", ContentType::Text, "body")
    }

    #[test]
    fn full_cycle_walks_every_phase() {
        let mut modal = Modal::default();
        assert_eq!(modal.phase(), ModalPhase::Closed);

        modal.present(content());
        assert_eq!(modal.phase(), ModalPhase::Opening { elapsed: 0.0 });
        assert!(modal.is_animating());

        modal.tick(0.1);
        assert!(matches!(modal.phase(), ModalPhase::Opening { .. }));
        modal.tick(0.25);
        assert_eq!(modal.phase(), ModalPhase::Open);
        assert_eq!(modal.opacity(), 1.0);

        modal.dismiss();
        assert_eq!(modal.phase(), ModalPhase::Closing { elapsed: 0.0 });
        assert!(modal.content().is_some());

        modal.tick(0.5);
        assert_eq!(modal.phase(), ModalPhase::Closed);
        assert!(modal.content().is_none());
        assert!(!modal.is_visible());
    }

    #[test]
    fn dismiss_when_closed_is_a_no_op() {
        let mut modal = Modal::default();
        modal.dismiss();
        assert_eq!(modal.phase(), ModalPhase::Closed);
    }

    #[test]
    fn presenting_while_open_swaps_content_without_reanimating() {
        let mut modal = Modal::default();
        modal.present(content());
        modal.tick(1.0);

        modal.present(ModalContent::present("Other", ContentType::Text, "x"));
        assert_eq!(modal.phase(), ModalPhase::Open);
        assert_eq!(modal.content().unwrap().title, "Other");
    }

    #[test]
    fn opacity_rises_while_opening() {
        let mut modal = Modal::default();
        modal.present(content());
        modal.tick(0.15);
        assert!((modal.opacity() - 0.5).abs() < 1e-4);
    }
}
