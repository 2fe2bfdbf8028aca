use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{Context, Pos2, Vec2};
use log::{error, info};

use crate::connections::DrawList;
use crate::layout::LayoutEngine;
use crate::persist::{LoadOutcome, PointSource};
use crate::points::{ContentPoint, PointStore};

mod content;
mod graph;
mod render_utils;
mod ui;

use ui::form::ContentForm;
use ui::modal::Modal;

type LoadResult = Result<LoadOutcome, String>;

pub struct OrbitaApp {
    load_rx: Option<Receiver<LoadResult>>,
    load_error: Option<String>,
    model: Box<ViewModel>,
}

struct ViewModel {
    source: PointSource,
    store: PointStore,
    layout: LayoutEngine,
    viewport: Vec2,
    center: Pos2,
    connections: DrawList,
    connections_dirty: bool,
    decorations: HashMap<String, PointDecoration>,
    form: ContentForm,
    form_open: bool,
    modal: Modal,
    search: String,
    selected: Option<String>,
    status: Option<String>,
    initial_load_done: bool,
    load_in_flight: bool,
    pending_additions: Vec<ContentPoint>,
}

/// UI-only state attached to a point, keyed by point id.
#[derive(Clone, Copy, Debug, Default)]
struct PointDecoration {
    pulse_started: Option<f64>,
}

impl OrbitaApp {
    pub fn new(cc: &eframe::CreationContext<'_>, source: PointSource, layout: LayoutEngine) -> Self {
        info!(
            "event=load_start module=app status=pending source=\"{}\"",
            source.describe()
        );
        let load_rx = Some(Self::spawn_load(&cc.egui_ctx, source.clone()));
        Self {
            load_rx,
            load_error: None,
            model: Box::new(ViewModel::new(source, layout)),
        }
    }

    fn spawn_load(ctx: &Context, source: PointSource) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();
        let ctx = ctx.clone();

        thread::spawn(move || {
            let result = source.load_blocking().map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
            ctx.request_repaint();
        });

        rx
    }

    fn poll_load(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(Ok(outcome)) => {
                self.load_error = None;
                self.model.apply_load(outcome);
            }
            Ok(Err(message)) => {
                error!("event=load_finish module=app status=error error={message}");
                self.load_error = Some(message);
                self.model.abandon_load();
            }
            Err(TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(TryRecvError::Disconnected) => {
                self.load_error = Some("Background load worker disconnected".to_owned());
                self.model.abandon_load();
            }
        }
    }
}

impl eframe::App for OrbitaApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_load();

        let mut reload_requested = false;
        let is_loading = self.load_rx.is_some();
        self.model.show(
            ctx,
            self.load_error.as_deref(),
            &mut reload_requested,
            is_loading,
        );

        if reload_requested && self.load_rx.is_none() {
            info!("event=reload_start module=app status=pending");
            self.model.begin_load();
            self.load_rx = Some(Self::spawn_load(ctx, self.model.source.clone()));
        }
    }
}
