mod app;
mod connections;
mod layout;
mod logging;
mod media;
mod persist;
mod points;
mod util;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::layout::{LayoutEngine, RngSource};
use crate::persist::{FileSlots, LocalPersistence, ManifestLocation, PointSource};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory holding the saved points slot.
    #[arg(long, default_value = ".orbita")]
    data_dir: PathBuf,

    /// Manifest URL or file path; when set, points come from its posts.
    #[arg(long)]
    manifest: Option<String>,

    /// Seed for point placement and colors.
    #[arg(long)]
    seed: Option<u64>,

    /// Log level: trace, debug, info, warn or error.
    #[arg(long, default_value_t = logging::default_log_level().to_owned())]
    log_level: String,

    /// Write rotating log files here instead of stderr.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Args {
    fn point_source(&self) -> PointSource {
        match &self.manifest {
            Some(location) => PointSource::Remote(ManifestLocation::parse(location)),
            None => PointSource::Local(LocalPersistence::new(FileSlots::new(&self.data_dir))),
        }
    }

    fn layout_engine(&self) -> LayoutEngine {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        LayoutEngine::new(RngSource(rng))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _logger = logging::init_logging(&args.log_level, args.log_dir.as_deref())?;

    let source = args.point_source();
    let layout = args.layout_engine();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 820.0]),
        ..Default::default()
    };

    eframe::run_native(
        "orbita",
        options,
        Box::new(move |cc| Ok(Box::new(app::OrbitaApp::new(cc, source, layout)))),
    )
    .map_err(|error| anyhow!("failed to run window: {error}"))
}
