use eframe::egui::{self, Color32, RichText, Ui};
use thiserror::Error;

use crate::points::ContentType;

use super::super::ViewModel;

#[derive(Debug, Error, PartialEq, Eq)]
pub(in crate::app) enum FormError {
    #[error("Please add a title")]
    MissingTitle,
    #[error("Please add the content")]
    MissingContent,
}

/// A submission that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) struct NewContent {
    pub title: String,
    pub content_type: ContentType,
    pub payload: String,
}

#[derive(Debug, Default)]
pub(in crate::app) struct ContentForm {
    pub title: String,
    pub content_type: ContentType,
    pub text: String,
    pub image_url: String,
    pub video_url: String,
    pub music_url: String,
    pub error: Option<String>,
}

impl ContentForm {
    fn payload(&self) -> &str {
        match self.content_type {
            ContentType::Text => &self.text,
            ContentType::Image => &self.image_url,
            ContentType::Video => &self.video_url,
            ContentType::Music => &self.music_url,
        }
    }

    pub(in crate::app) fn validate(&self) -> Result<NewContent, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::MissingTitle);
        }

        let payload = self.payload();
        if payload.trim().is_empty() {
            return Err(FormError::MissingContent);
        }

        let payload = match self.content_type {
            ContentType::Text => payload.to_owned(),
            _ => payload.trim().to_owned(),
        };

        Ok(NewContent {
            title: title.to_owned(),
            content_type: self.content_type,
            payload,
        })
    }

    pub(in crate::app) fn reset(&mut self) {
        *self = Self::default();
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_form(&mut self, ctx: &egui::Context) {
        if !self.form_open {
            return;
        }

        let mut open = true;
        let mut save_clicked = false;
        let mut cancel_clicked = false;

        egui::Window::new("Add content")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(360.0)
            .show(ctx, |ui| {
                self.draw_form_fields(ui);

                if let Some(error) = &self.form.error {
                    ui.add_space(4.0);
                    ui.label(RichText::new(error.as_str()).color(Color32::from_rgb(235, 96, 96)));
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    save_clicked = ui.button("Save").clicked();
                    cancel_clicked = ui.button("Cancel").clicked();
                });
            });

        if save_clicked {
            self.submit_form();
        } else if cancel_clicked || !open {
            self.form.reset();
            self.form_open = false;
        }
    }

    fn draw_form_fields(&mut self, ui: &mut Ui) {
        let form = &mut self.form;

        ui.label("Title");
        ui.text_edit_singleline(&mut form.title);
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            for content_type in ContentType::ALL {
                ui.radio_value(&mut form.content_type, content_type, content_type.label());
            }
        });
        ui.add_space(6.0);

        match form.content_type {
            ContentType::Text => {
                ui.label("Text");
                ui.text_edit_multiline(&mut form.text);
            }
            ContentType::Image => {
                ui.label("Image URL");
                ui.text_edit_singleline(&mut form.image_url);
            }
            ContentType::Video => {
                ui.label("YouTube URL");
                ui.text_edit_singleline(&mut form.video_url);
            }
            ContentType::Music => {
                ui.label("Audio URL");
                ui.text_edit_singleline(&mut form.music_url);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_required() {
        let form = ContentForm {
            title: "   ".to_owned(),
            text: "something".to_owned(),
            ..ContentForm::default()
        };
        assert_eq!(form.validate(), Err(FormError::MissingTitle));
    }

    #[test]
    fn content_for_selected_type_is_required() {
        let form = ContentForm {
            title: "Clip".to_owned(),
            content_type: ContentType::Video,
            text: "text is ignored for videos".to_owned(),
            ..ContentForm::default()
        };
        assert_eq!(form.validate(), Err(FormError::MissingContent));
    }

    #[test]
    fn valid_form_trims_title_and_urls() {
        let form = ContentForm {
            title: "  Clip ".to_owned(),
            content_type: ContentType::Video,
            video_url: " https://youtu.be/xyz789 ".to_owned(),
            ..ContentForm::default()
        };
        assert_eq!(
            form.validate(),
            Ok(NewContent {
                title: "Clip".to_owned(),
                content_type: ContentType::Video,
                payload: "https://youtu.be/xyz789".to_owned(),
            })
        );
    }

    #[test]
    fn text_payload_is_kept_verbatim() {
        let form = ContentForm {
            title: "Poem".to_owned(),
            text: "  indented\nlines ".to_owned(),
            ..ContentForm::default()
        };
        assert_eq!(form.validate().unwrap().payload, "  indented\nlines ");
    }

    #[test]
    fn reset_clears_everything() {
        let mut form = ContentForm {
            title: "x".to_owned(),
            content_type: ContentType::Music,
            music_url: "y".to_owned(),
            error: Some("oops".to_owned()),
            ..ContentForm::default()
        };
        form.reset();
        assert!(form.title.is_empty());
        assert_eq!(form.content_type, ContentType::Text);
        assert!(form.error.is_none());
    }
}
