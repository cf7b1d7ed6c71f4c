use std::sync::Arc;

use anyhow::Context;
use eframe::egui;
use pulse_explorer::app::PulseExplorerApp;
use pulse_explorer::config::AppConfig;
use pulse_explorer::data;
use pulse_explorer::data::schema::SurveySchema;
use pulse_explorer::state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().context("reading configuration")?;

    // Loaded once; every view shares this read-only table.
    let table = match data::loader::load_file(&config.data_path) {
        Ok(table) => Arc::new(table),
        Err(e) => {
            log::error!("Failed to load {}: {e:#}", config.data_path.display());
            return Err(e.context(format!("loading {}", config.data_path.display())));
        }
    };
    let schema = SurveySchema::household_pulse(&config.reason_prefix)
        .resolve(&table)
        .with_context(|| format!("checking columns of {}", config.data_path.display()))?;
    log::info!(
        "Loaded {} respondents with columns {:?} ({} reason indicators)",
        table.len(),
        table.column_names,
        schema.indicators.len()
    );

    let mut state = AppState::new(table, schema);
    state.status_message = Some(format!("Source: {}", config.data_path.display()));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Pulse Explorer – Household Pulse slices",
        options,
        Box::new(move |_cc| Ok(Box::new(PulseExplorerApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the UI: {e}"))
}
