mod store;

use eframe::egui::Pos2;
use serde::{Deserialize, Serialize};

use crate::layout::Polar;

pub use store::{PointStore, StoreError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Text,
    Image,
    Video,
    Music,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [Self::Text, Self::Image, Self::Video, Self::Music];

    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Image => "Image",
            Self::Video => "Video",
            Self::Music => "Music",
        }
    }
}

/// A single item placed around the central point.
///
/// `position` is derived: it is computed from `placement` and the viewport
/// center, or restored verbatim from local storage when no placement is known.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentPoint {
    pub id: String,
    position: Pos2,
    placement: Option<Polar>,
    pub color: String,
    pub title: String,
    pub content_type: ContentType,
    pub payload: String,
}

impl ContentPoint {
    pub fn placed(
        id: String,
        center: Pos2,
        placement: Polar,
        color: String,
        title: String,
        content_type: ContentType,
        payload: String,
    ) -> Self {
        Self {
            id,
            position: placement.project(center),
            placement: Some(placement),
            color,
            title,
            content_type,
            payload,
        }
    }

    pub fn restored(
        id: String,
        position: Pos2,
        color: String,
        title: String,
        content_type: ContentType,
        payload: String,
    ) -> Self {
        Self {
            id,
            position,
            placement: None,
            color,
            title,
            content_type,
            payload,
        }
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn placement(&self) -> Option<Polar> {
        self.placement
    }

    pub(crate) fn relayout(&mut self, center: Pos2) {
        if let Some(placement) = self.placement {
            self.position = placement.project(center);
        }
    }
}
