//! GUI layer: eframe application and tab widgets.

pub mod app;
pub mod indicator_tab;
pub mod region_tab;
pub mod widgets;

pub use app::DashboardApp;
