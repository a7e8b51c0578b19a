mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{anyhow, Context, Result};
use app::DashboardApp;
use clap::Parser;
use config::Config;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    // Nothing can be shown without data, so a failed load ends the process.
    let dataset = match data::loader::load_file(&config.data)
        .with_context(|| format!("loading {}", config.data.display()))
    {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("Failed to load data: {e:#}");
            return Err(e);
        }
    };
    log::info!(
        "Loaded {} days from {} ({} season labels, {} weather labels)",
        dataset.len(),
        config.data.display(),
        dataset.seasons.len(),
        dataset.weather.len()
    );

    let constraints = config.initial_constraints(&dataset);
    let state = AppState::new(dataset, config.data.clone(), constraints, config.histogram_bins());

    if config.summary {
        print!("{}", state.view.report());
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bike Rental Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("running the dashboard window: {e}"))
}
