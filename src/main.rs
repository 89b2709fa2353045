//! School performance analysis dashboard (IDEB/SAEB).
//!
//! Loads the two source tables, then serves three analysis tabs: per-school
//! IDEB results, per-school SAEB proficiency and cross-region comparison.

mod charts;
mod data;
mod gui;
mod stats;

use eframe::egui;
use gui::DashboardApp;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Dashboard de Análise - SAEB/IDEB"),
        ..Default::default()
    };

    eframe::run_native(
        "Dashboard de Análise - SAEB/IDEB",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc)))),
    )
}
