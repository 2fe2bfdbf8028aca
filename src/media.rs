use reqwest::Url;
use thiserror::Error;

use crate::points::{ContentPoint, ContentType};

pub const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid video URL")]
pub struct InvalidVideoUrl;

/// Extracts the video id from a YouTube watch URL (`v=` query parameter) or a
/// `youtu.be/<id>` short link.
pub fn youtube_video_id(raw: &str) -> Result<String, InvalidVideoUrl> {
    let raw = raw.trim();
    let url = Url::parse(raw)
        .or_else(|_| Url::parse(&format!("https://{raw}")))
        .map_err(|_| InvalidVideoUrl)?;
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    let id = match host {
        "youtube.com" | "m.youtube.com" | "music.youtube.com" if url.path() == "/watch" => url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned()),
        "youtu.be" => url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .map(str::to_owned),
        _ => None,
    };

    id.filter(|id| {
        !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    })
    .ok_or(InvalidVideoUrl)
}

pub fn youtube_embed_url(raw: &str) -> Result<String, InvalidVideoUrl> {
    youtube_video_id(raw).map(|id| format!("{YOUTUBE_EMBED_BASE}{id}"))
}

/// What the modal shows for a point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalBody {
    Text(String),
    Image { url: String },
    Video(Result<String, InvalidVideoUrl>),
    Music { url: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalContent {
    pub title: String,
    pub body: ModalBody,
}

impl ModalContent {
    pub fn present(title: &str, content_type: ContentType, payload: &str) -> Self {
        let body = match content_type {
            ContentType::Text => ModalBody::Text(payload.to_owned()),
            ContentType::Image => ModalBody::Image {
                url: payload.to_owned(),
            },
            ContentType::Video => ModalBody::Video(youtube_embed_url(payload)),
            ContentType::Music => ModalBody::Music {
                url: payload.to_owned(),
            },
        };

        Self {
            title: title.to_owned(),
            body,
        }
    }

    pub fn for_point(point: &ContentPoint) -> Self {
        Self::present(&point.title, point.content_type, &point.payload)
    }
}
