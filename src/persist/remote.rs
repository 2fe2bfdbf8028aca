use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use eframe::egui::Pos2;
use log::{debug, info, warn};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::layout::{LayoutEngine, PlacementSpec};
use crate::points::{ContentPoint, ContentType};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid manifest location `{location}`: {message}")]
    Location { location: String, message: String },
    #[error("request for `{location}` failed: {source}")]
    Request {
        location: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("`{location}` responded with HTTP {status}")]
    Status { location: String, status: StatusCode },
    #[error("failed to read `{location}`: {source}")]
    Io {
        location: String,
        #[source]
        source: io::Error,
    },
    #[error("`{location}` is not a valid {what}: {source}")]
    Parse {
        location: String,
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct Manifest {
    posts: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawPost {
    title: String,
    #[serde(rename = "type")]
    content_type: ContentType,
    content: String,
    #[serde(default)]
    color: Option<String>,
    position: RawPosition,
}

#[derive(Debug, Deserialize)]
struct RawPosition {
    angle: f32,
    distance: f32,
}

/// A fetched post, ready to become a [`ContentPoint`]. Its id is the path
/// listed in the manifest.
#[derive(Clone, Debug, PartialEq)]
pub struct PostDescriptor {
    pub id: String,
    pub title: String,
    pub content_type: ContentType,
    pub content: String,
    pub color: Option<String>,
    pub placement: PlacementSpec,
}

impl PostDescriptor {
    pub fn into_point(self, center: Pos2, layout: &mut LayoutEngine) -> ContentPoint {
        let placement = layout.resolve(self.placement);
        let color = self
            .color
            .unwrap_or_else(|| layout.pick_color().to_owned());
        ContentPoint::placed(
            self.id,
            center,
            placement,
            color,
            self.title,
            self.content_type,
            self.content,
        )
    }
}

/// Where the manifest and its posts come from.
pub trait PostSource {
    fn describe(&self) -> String;
    fn fetch_manifest(&self) -> impl Future<Output = Result<String, FetchError>>;
    fn fetch_post(&self, path: &str) -> impl Future<Output = Result<String, FetchError>>;
}

/// Posts served over HTTP, paths resolved against the manifest URL.
pub struct HttpSource {
    client: reqwest::Client,
    manifest_url: Url,
}

impl HttpSource {
    pub fn new(manifest_url: &str) -> Result<Self, FetchError> {
        let manifest_url = Url::parse(manifest_url).map_err(|error| FetchError::Location {
            location: manifest_url.to_owned(),
            message: error.to_string(),
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            manifest_url,
        })
    }

    async fn get(&self, url: Url) -> Result<String, FetchError> {
        let location = url.to_string();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                location: location.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { location, status });
        }

        response
            .text()
            .await
            .map_err(|source| FetchError::Request { location, source })
    }
}

impl PostSource for HttpSource {
    fn describe(&self) -> String {
        self.manifest_url.to_string()
    }

    async fn fetch_manifest(&self) -> Result<String, FetchError> {
        self.get(self.manifest_url.clone()).await
    }

    async fn fetch_post(&self, path: &str) -> Result<String, FetchError> {
        let url = self
            .manifest_url
            .join(path)
            .map_err(|error| FetchError::Location {
                location: path.to_owned(),
                message: error.to_string(),
            })?;
        self.get(url).await
    }
}

/// Posts on disk, paths resolved against the manifest's directory.
pub struct DirectorySource {
    manifest_path: PathBuf,
}

impl DirectorySource {
    pub fn new(manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
        }
    }

    async fn read(path: &Path) -> Result<String, FetchError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FetchError::Io {
                location: path.display().to_string(),
                source,
            })
    }
}

impl PostSource for DirectorySource {
    fn describe(&self) -> String {
        self.manifest_path.display().to_string()
    }

    async fn fetch_manifest(&self) -> Result<String, FetchError> {
        Self::read(&self.manifest_path).await
    }

    async fn fetch_post(&self, path: &str) -> Result<String, FetchError> {
        let base = self.manifest_path.parent().unwrap_or_else(|| Path::new(""));
        Self::read(&base.join(path)).await
    }
}

/// Result of a manifest load. `failure` is set when a fetch stopped the load;
/// descriptors fetched before it are kept.
#[derive(Debug, Default)]
pub struct ManifestLoad {
    pub descriptors: Vec<PostDescriptor>,
    pub failure: Option<FetchError>,
}

/// Fetches the manifest, then each listed post one after another in manifest
/// order. The first failing post ends the load.
pub async fn load_manifest(source: &impl PostSource) -> ManifestLoad {
    let location = source.describe();
    let manifest = match fetch_manifest(source, &location).await {
        Ok(manifest) => manifest,
        Err(error) => {
            warn!("event=manifest_load module=persist status=error error={error}");
            return ManifestLoad {
                descriptors: Vec::new(),
                failure: Some(error),
            };
        }
    };

    let total = manifest.posts.len();
    let mut descriptors = Vec::with_capacity(total);

    for path in manifest.posts {
        match fetch_post(source, &path).await {
            Ok(descriptor) => {
                debug!("event=post_fetched module=persist status=ok path={path}");
                descriptors.push(descriptor);
            }
            Err(error) => {
                warn!(
                    "event=manifest_load module=persist status=aborted loaded={} skipped={} error={error}",
                    descriptors.len(),
                    total - descriptors.len() - 1
                );
                return ManifestLoad {
                    descriptors,
                    failure: Some(error),
                };
            }
        }
    }

    info!("event=manifest_load module=persist status=ok location={location} posts={total}");
    ManifestLoad {
        descriptors,
        failure: None,
    }
}

async fn fetch_manifest(source: &impl PostSource, location: &str) -> Result<Manifest, FetchError> {
    let raw = source.fetch_manifest().await?;
    serde_json::from_str(&raw).map_err(|source| FetchError::Parse {
        location: location.to_owned(),
        what: "manifest",
        source,
    })
}

async fn fetch_post(source: &impl PostSource, path: &str) -> Result<PostDescriptor, FetchError> {
    let raw = source.fetch_post(path).await?;
    let post: RawPost = serde_json::from_str(&raw).map_err(|source| FetchError::Parse {
        location: path.to_owned(),
        what: "post",
        source,
    })?;

    Ok(PostDescriptor {
        id: path.to_owned(),
        title: post.title,
        content_type: post.content_type,
        content: post.content,
        color: post.color,
        placement: PlacementSpec::Explicit {
            angle_degrees: post.position.angle,
            distance: post.position.distance,
        },
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::time::Duration;

    use eframe::egui::pos2;

    use super::*;
    use crate::layout::{PALETTE, RngSource};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[derive(Default)]
    struct FakeSource {
        manifest: String,
        posts: HashMap<String, (u64, String)>,
        requested: RefCell<Vec<String>>,
    }

    impl FakeSource {
        fn new(paths: &[&str]) -> Self {
            Self {
                manifest: serde_json::json!({ "posts": paths }).to_string(),
                ..Self::default()
            }
        }

        fn with_post(mut self, path: &str, delay_ms: u64, body: serde_json::Value) -> Self {
            self.posts
                .insert(path.to_owned(), (delay_ms, body.to_string()));
            self
        }
    }

    impl PostSource for FakeSource {
        fn describe(&self) -> String {
            "fake".to_owned()
        }

        async fn fetch_manifest(&self) -> Result<String, FetchError> {
            Ok(self.manifest.clone())
        }

        async fn fetch_post(&self, path: &str) -> Result<String, FetchError> {
            self.requested.borrow_mut().push(path.to_owned());
            let Some((delay_ms, body)) = self.posts.get(path) else {
                return Err(FetchError::Io {
                    location: path.to_owned(),
                    source: io::Error::new(io::ErrorKind::NotFound, "no such post"),
                });
            };
            tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
            Ok(body.clone())
        }
    }

    fn post(title: &str, angle: f32) -> serde_json::Value {
        serde_json::json!({
            "title": title,
            "type": "text",
            "content": format!("{title} body"),
            "position": { "angle": angle, "distance": 100.0 }
        })
    }

    #[tokio::test]
    async fn posts_follow_manifest_order_despite_latency() {
        let source = FakeSource::new(&["posts/a.json", "posts/b.json"])
            .with_post("posts/a.json", 40, post("A", 0.0))
            .with_post("posts/b.json", 0, post("B", 90.0));

        let load = load_manifest(&source).await;

        assert!(load.failure.is_none());
        let ids = load
            .descriptors
            .iter()
            .map(|descriptor| descriptor.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["posts/a.json", "posts/b.json"]);
        assert_eq!(load.descriptors[0].title, "A");
        assert_eq!(
            load.descriptors[1].placement,
            PlacementSpec::Explicit {
                angle_degrees: 90.0,
                distance: 100.0
            }
        );
    }

    #[tokio::test]
    async fn failing_post_stops_remaining_fetches_and_keeps_earlier_ones() {
        let source = FakeSource::new(&["a.json", "missing.json", "c.json"])
            .with_post("a.json", 0, post("A", 0.0))
            .with_post("c.json", 0, post("C", 0.0));

        let load = load_manifest(&source).await;

        assert_eq!(load.descriptors.len(), 1);
        assert_eq!(load.descriptors[0].id, "a.json");
        assert!(matches!(load.failure, Some(FetchError::Io { ref location, .. }) if location == "missing.json"));
        assert_eq!(*source.requested.borrow(), ["a.json", "missing.json"]);
    }

    #[tokio::test]
    async fn malformed_post_reports_parse_error() {
        let source = FakeSource::new(&["bad.json"]).with_post(
            "bad.json",
            0,
            serde_json::json!({ "title": "no type" }),
        );

        let load = load_manifest(&source).await;

        assert!(load.descriptors.is_empty());
        assert!(matches!(
            load.failure,
            Some(FetchError::Parse { what: "post", .. })
        ));
    }

    #[tokio::test]
    async fn malformed_manifest_reports_parse_error() {
        let source = FakeSource {
            manifest: "[]".to_owned(),
            ..FakeSource::default()
        };

        let load = load_manifest(&source).await;

        assert!(load.descriptors.is_empty());
        assert!(matches!(
            load.failure,
            Some(FetchError::Parse { what: "manifest", .. })
        ));
        assert!(source.requested.borrow().is_empty());
    }

    #[tokio::test]
    async fn directory_source_resolves_posts_next_to_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("posts")).unwrap();
        std::fs::write(
            dir.path().join("manifest.json"),
            r#"{ "posts": ["posts/one.json"] }"#,
        )
        .unwrap();
        let mut body = post("One", 45.0);
        body["type"] = "video".into();
        body["color"] = "#123456".into();
        std::fs::write(dir.path().join("posts/one.json"), body.to_string()).unwrap();

        let load = load_manifest(&DirectorySource::new(dir.path().join("manifest.json"))).await;

        assert!(load.failure.is_none(), "{:?}", load.failure);
        let descriptor = &load.descriptors[0];
        assert_eq!(descriptor.id, "posts/one.json");
        assert_eq!(descriptor.content_type, ContentType::Video);
        assert_eq!(descriptor.color.as_deref(), Some("#123456"));
    }

    #[test]
    fn http_source_rejects_relative_manifest_url() {
        assert!(matches!(
            HttpSource::new("posts/manifest.json"),
            Err(FetchError::Location { .. })
        ));
    }

    #[test]
    fn descriptor_materializes_with_explicit_placement() {
        let mut layout = LayoutEngine::new(RngSource(StdRng::seed_from_u64(1)));
        let descriptor = PostDescriptor {
            id: "p".to_owned(),
            title: "Title".to_owned(),
            content_type: ContentType::Music,
            content: "https://example.com/song.mp3".to_owned(),
            color: None,
            placement: PlacementSpec::Explicit {
                angle_degrees: 0.0,
                distance: 100.0,
            },
        };

        let point = descriptor.into_point(pos2(500.0, 500.0), &mut layout);

        assert_eq!(point.position(), pos2(600.0, 500.0));
        assert!(PALETTE.contains(&point.color.as_str()));
        assert!(point.placement().is_some());
    }
}
