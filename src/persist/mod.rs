mod local;
mod remote;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::points::ContentPoint;

pub use local::{FileSlots, LocalPersistence};
pub use remote::{DirectorySource, HttpSource, ManifestLoad, load_manifest};
#[cfg(test)]
pub use remote::{FetchError, PostDescriptor};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to read slot `{key}`: {source}")]
    Read {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to write slot `{key}`: {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode points: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("persisted points are malformed: {0}")]
    MalformedPersistedData(#[source] serde_json::Error),
}

/// Where the manifest lives; URLs go over HTTP, anything else is a file path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManifestLocation {
    Http(String),
    File(PathBuf),
}

impl ManifestLocation {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Http(trimmed.to_owned())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

/// The active persistence strategy, chosen at startup.
#[derive(Clone, Debug)]
pub enum PointSource {
    Local(LocalPersistence<FileSlots>),
    Remote(ManifestLocation),
}

pub enum LoadOutcome {
    Restored(Vec<ContentPoint>),
    Posts(ManifestLoad),
}

impl PointSource {
    pub fn describe(&self) -> String {
        match self {
            Self::Local(local) => format!("local: {}", local.slots().dir().display()),
            Self::Remote(ManifestLocation::Http(url)) => format!("manifest: {url}"),
            Self::Remote(ManifestLocation::File(path)) => {
                format!("manifest: {}", path.display())
            }
        }
    }

    /// Blocks the calling thread; meant for the background load worker.
    pub fn load_blocking(&self) -> Result<LoadOutcome> {
        match self {
            Self::Local(local) => Ok(LoadOutcome::Restored(local.load())),
            Self::Remote(location) => {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .context("failed to start fetch runtime")?;

                let load = runtime.block_on(async {
                    match location {
                        ManifestLocation::Http(url) => match HttpSource::new(url) {
                            Ok(source) => load_manifest(&source).await,
                            Err(error) => ManifestLoad {
                                descriptors: Vec::new(),
                                failure: Some(error),
                            },
                        },
                        ManifestLocation::File(path) => {
                            load_manifest(&DirectorySource::new(path.clone())).await
                        }
                    }
                });

                Ok(LoadOutcome::Posts(load))
            }
        }
    }

    /// Commits the full point set. Manifest-backed sessions keep additions in
    /// memory only.
    pub fn commit(&mut self, points: &[ContentPoint]) -> Result<(), PersistError> {
        match self {
            Self::Local(local) => local.save(points),
            Self::Remote(_) => Ok(()),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}
