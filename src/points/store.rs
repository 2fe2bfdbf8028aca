use std::collections::HashMap;

use eframe::egui::Pos2;
use log::warn;
use thiserror::Error;

use super::ContentPoint;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("a content point with id `{0}` already exists")]
    DuplicateId(String),
}

/// Insertion-ordered set of content points with unique ids.
#[derive(Debug, Default)]
pub struct PointStore {
    points: Vec<ContentPoint>,
    index_by_id: HashMap<String, usize>,
}

impl PointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, point: ContentPoint) -> Result<(), StoreError> {
        if self.index_by_id.contains_key(&point.id) {
            return Err(StoreError::DuplicateId(point.id));
        }

        self.index_by_id.insert(point.id.clone(), self.points.len());
        self.points.push(point);
        Ok(())
    }

    /// Replaces the whole collection. Later duplicates of an id are dropped.
    pub fn load_all(&mut self, points: impl IntoIterator<Item = ContentPoint>) {
        self.points.clear();
        self.index_by_id.clear();

        for point in points {
            if let Err(StoreError::DuplicateId(id)) = self.add(point) {
                warn!("event=load_duplicate module=points status=skipped id={id}");
            }
        }
    }

    pub fn all(&self) -> &[ContentPoint] {
        &self.points
    }

    pub fn find_by_id(&self, id: &str) -> Option<&ContentPoint> {
        self.index_by_id
            .get(id)
            .and_then(|&index| self.points.get(index))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn relayout(&mut self, center: Pos2) {
        for point in &mut self.points {
            point.relayout(center);
        }
    }
}
