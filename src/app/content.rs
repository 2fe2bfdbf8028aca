use std::time::{SystemTime, UNIX_EPOCH};

use eframe::egui::{Vec2, vec2};
use log::{error, info};

use crate::layout::{LayoutEngine, PlacementSpec, compute_center};
use crate::persist::{LoadOutcome, PointSource};
use crate::points::{ContentPoint, PointStore, StoreError};

use super::ui::form::{ContentForm, NewContent};
use super::ui::modal::Modal;
use super::{PointDecoration, ViewModel};

/// Time-based id; bumped past any id already in the store.
pub(super) fn fresh_point_id(store: &PointStore, now_millis: u128) -> String {
    let mut candidate = now_millis;
    loop {
        let id = candidate.to_string();
        if !store.contains(&id) {
            return id;
        }
        candidate += 1;
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
}

impl ViewModel {
    pub(super) fn new(source: PointSource, layout: LayoutEngine) -> Self {
        Self {
            source,
            store: PointStore::new(),
            layout,
            viewport: vec2(0.0, 0.0),
            center: compute_center(0.0, 0.0),
            connections: Default::default(),
            connections_dirty: true,
            decorations: Default::default(),
            form: ContentForm::default(),
            form_open: false,
            modal: Modal::default(),
            search: String::new(),
            selected: None,
            status: None,
            initial_load_done: false,
            load_in_flight: true,
            pending_additions: Vec::new(),
        }
    }

    /// Marks a load as running; additions are held back from the slot until
    /// it lands.
    pub(super) fn begin_load(&mut self) {
        self.load_in_flight = true;
    }

    /// The worker produced nothing; points added meanwhile stay in memory
    /// without being committed over data that was never read.
    pub(super) fn abandon_load(&mut self) {
        self.load_in_flight = false;
        self.initial_load_done = true;
        if !self.pending_additions.is_empty() {
            self.pending_additions.clear();
            self.status = Some("Points added during the failed load were not saved".to_owned());
        }
    }

    /// Replaces the store with freshly loaded points.
    pub(super) fn apply_load(&mut self, outcome: LoadOutcome) {
        self.status = None;

        match outcome {
            LoadOutcome::Restored(points) => self.store.load_all(points),
            LoadOutcome::Posts(load) => {
                let center = self.center;
                let points = load
                    .descriptors
                    .into_iter()
                    .map(|descriptor| descriptor.into_point(center, &mut self.layout))
                    .collect::<Vec<_>>();
                self.store.load_all(points);

                if let Some(failure) = load.failure {
                    self.status = Some(format!("Stopped loading posts: {failure}"));
                }
            }
        }

        let merged = self.merge_pending_additions();

        self.decorations.retain(|id, _| self.store.contains(id));
        if let Some(selected) = &self.selected
            && !self.store.contains(selected)
        {
            self.selected = None;
        }

        self.initial_load_done = true;
        self.connections_dirty = true;
        info!(
            "event=load_finish module=app status=ok points={} merged={merged}",
            self.store.len()
        );

        if merged > 0 {
            self.commit_points();
        }
    }

    /// Re-adds points submitted while the load was running, after the loaded
    /// ones. Ids taken by the loaded set are replaced with fresh ones.
    fn merge_pending_additions(&mut self) -> usize {
        self.load_in_flight = false;
        let pending = std::mem::take(&mut self.pending_additions);
        let count = pending.len();

        for mut point in pending {
            point.relayout(self.center);
            if self.store.contains(&point.id) {
                point.id = fresh_point_id(&self.store, unix_millis());
            }
            if let Err(error) = self.store.add(point) {
                error!("event=pending_merge module=app status=error error={error}");
            }
        }

        count
    }

    fn commit_points(&mut self) {
        if let Err(error) = self.source.commit(self.store.all()) {
            error!("event=points_commit module=app status=error error={error}");
            self.status = Some(format!("Could not save points: {error}"));
        }
    }

    pub(super) fn set_viewport(&mut self, size: Vec2) {
        if size == self.viewport {
            return;
        }

        self.viewport = size;
        self.center = compute_center(size.x, size.y);
        self.store.relayout(self.center);
        self.connections_dirty = true;
    }

    /// Places a validated submission at a random spot and commits it.
    pub(super) fn add_content(&mut self, content: NewContent) -> Result<(), StoreError> {
        let id = fresh_point_id(&self.store, unix_millis());
        let placement = self.layout.resolve(PlacementSpec::Random);
        let color = self.layout.pick_color().to_owned();
        let point = ContentPoint::placed(
            id.clone(),
            self.center,
            placement,
            color,
            content.title,
            content.content_type,
            content.payload,
        );

        let deferred = self.load_in_flight.then(|| point.clone());
        self.store.add(point)?;
        if let Some(point) = deferred {
            self.pending_additions.push(point);
        }
        self.connections_dirty = true;
        info!(
            "event=point_added module=app status=ok id={id} deferred={}",
            self.load_in_flight
        );

        if !self.load_in_flight {
            self.commit_points();
        }

        Ok(())
    }

    /// Validates the form and, on success, adds the point and resets it.
    pub(super) fn submit_form(&mut self) {
        let content = match self.form.validate() {
            Ok(content) => content,
            Err(error) => {
                self.form.error = Some(error.to_string());
                return;
            }
        };

        match self.add_content(content) {
            Ok(()) => {
                self.form.reset();
                self.form_open = false;
            }
            Err(error) => self.form.error = Some(error.to_string()),
        }
    }

    pub(super) fn open_point(&mut self, id: &str, now: f64) {
        let Some(point) = self.store.find_by_id(id) else {
            return;
        };

        self.modal.present(crate::media::ModalContent::for_point(point));
        self.selected = Some(id.to_owned());
        self.decorations
            .entry(id.to_owned())
            .or_insert_with(PointDecoration::default)
            .pulse_started = Some(now);
    }
}
