mod app;
mod artifact;
mod color;
mod config;
mod data;
mod error;
mod reactive;
mod state;
mod ui;

use std::path::PathBuf;

use app::PenguinDashboardApp;
use config::DashboardConfig;
use eframe::egui;
use state::DashboardState;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::resolve(std::env::args_os().nth(1).map(PathBuf::from))?;

    // The base table is read exactly once; nothing can be shown without it.
    let dataset = match data::load(&config.dataset) {
        Ok(ds) => ds,
        Err(e) => {
            log::error!("{e}");
            return Err(e.into());
        }
    };
    if dataset.is_empty() {
        log::warn!("The dataset has no records; every view will be empty");
    }
    let state = DashboardState::new(dataset, config.controls.clone(), config.filter_mode);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(PenguinDashboardApp::new(state, config)))),
    )
    .map_err(|e| anyhow::anyhow!("running UI: {e}"))
}
