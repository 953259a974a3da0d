use std::path::Path;

use anyhow::Context;
use app_catalog_explorer::app::ExplorerApp;
use app_catalog_explorer::data::loader::DatasetCache;
use app_catalog_explorer::settings::{Settings, SETTINGS_FILE};
use app_catalog_explorer::state::AppState;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = Settings::load_or_default(Path::new(SETTINGS_FILE));
    let cache = DatasetCache::new(&settings.dataset_path);
    let dataset = cache.load().inspect_err(|e| log::error!("{e:#}")).with_context(|| {
        format!("loading dataset {}", cache.path().display())
    })?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "App Catalog Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(ExplorerApp::new(AppState::new(dataset, settings))))),
    )
    .map_err(|e| anyhow::anyhow!("running UI: {e}"))
}
