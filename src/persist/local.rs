#[cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use eframe::egui::pos2;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::points::{ContentPoint, ContentType};

use super::PersistError;

pub const POINTS_KEY: &str = "contentPoints";

/// Durable named string slots.
pub trait SlotStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// One `<key>.json` file per slot inside a directory.
#[derive(Clone, Debug)]
pub struct FileSlots {
    dir: PathBuf,
}

impl FileSlots {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SlotStore for FileSlots {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.slot_path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistError::Read {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        let write_error = |source| PersistError::Write {
            key: key.to_owned(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_error)?;
        let target = self.slot_path(key);
        let staging = target.with_extension("json.tmp");
        fs::write(&staging, value).map_err(write_error)?;
        fs::rename(&staging, &target).map_err(write_error)
    }
}

#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct MemorySlots {
    slots: HashMap<String, String>,
}

#[cfg(test)]
impl SlotStore for MemorySlots {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.slots.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Persisted shape of a point. Placement is not stored, only the computed
/// coordinates at save time.
#[derive(Debug, Serialize, Deserialize)]
struct StoredPoint {
    id: String,
    x: f32,
    y: f32,
    color: String,
    title: String,
    #[serde(rename = "type")]
    content_type: ContentType,
    data: String,
}

impl From<&ContentPoint> for StoredPoint {
    fn from(point: &ContentPoint) -> Self {
        let position = point.position();
        Self {
            id: point.id.clone(),
            x: position.x,
            y: position.y,
            color: point.color.clone(),
            title: point.title.clone(),
            content_type: point.content_type,
            data: point.payload.clone(),
        }
    }
}

impl From<StoredPoint> for ContentPoint {
    fn from(stored: StoredPoint) -> Self {
        ContentPoint::restored(
            stored.id,
            pos2(stored.x, stored.y),
            stored.color,
            stored.title,
            stored.content_type,
            stored.data,
        )
    }
}

#[derive(Clone, Debug)]
pub struct LocalPersistence<S> {
    slots: S,
}

impl<S: SlotStore> LocalPersistence<S> {
    pub fn new(slots: S) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &S {
        &self.slots
    }

    pub fn save(&mut self, points: &[ContentPoint]) -> Result<(), PersistError> {
        let stored = points.iter().map(StoredPoint::from).collect::<Vec<_>>();
        let raw = serde_json::to_string(&stored).map_err(PersistError::Encode)?;
        self.slots.write(POINTS_KEY, &raw)?;
        debug!(
            "event=points_saved module=persist status=ok count={}",
            stored.len()
        );
        Ok(())
    }

    /// Never fails: an absent, unreadable or malformed slot yields no points.
    pub fn load(&self) -> Vec<ContentPoint> {
        let raw = match self.slots.read(POINTS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(error) => {
                warn!("event=points_load module=persist status=error error={error}");
                return Vec::new();
            }
        };

        match decode_points(&raw) {
            Ok(points) => points,
            Err(error) => {
                warn!("event=points_load module=persist status=recovered error={error}");
                Vec::new()
            }
        }
    }
}

fn decode_points(raw: &str) -> Result<Vec<ContentPoint>, PersistError> {
    let stored: Vec<StoredPoint> =
        serde_json::from_str(raw).map_err(PersistError::MalformedPersistedData)?;
    Ok(stored.into_iter().map(ContentPoint::from).collect())
}
