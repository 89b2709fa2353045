//! Dashboard Main Application
//! Loads both datasets at startup and renders the IDEB / SAEB / Regions tabs.

use egui::RichText;
use polars::prelude::*;
use tracing::error;

use crate::data::{normalize_regions, DatasetStore, COL_IDEB, COL_PROFICIENCIA};
use crate::gui::indicator_tab::{Indicator, IndicatorTab};
use crate::gui::region_tab::RegionTab;
use crate::gui::widgets;

/// Fixed source locations, relative to the working directory.
pub const IDEB_PATH: &str = "data/ideb.csv";
pub const SAEB_PATH: &str = "data/saeb.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Ideb,
    Saeb,
    Regioes,
}

struct LoadedData {
    ideb: DataFrame,
    saeb: DataFrame,
    /// Region-normalized working copies, used only by the Regions tab.
    ideb_regions: DataFrame,
    saeb_regions: DataFrame,
}

/// Main application window.
pub struct DashboardApp {
    data: Option<LoadedData>,
    load_error: Option<String>,
    tab: Tab,
    ideb_tab: IndicatorTab,
    saeb_tab: IndicatorTab,
    region_tab: RegionTab,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let (data, load_error) = match Self::load_datasets() {
            Ok(data) => (Some(data), None),
            Err(e) => {
                error!(error = %e, "dataset load failed");
                (None, Some(format!("Erro: {e}")))
            }
        };

        Self {
            data,
            load_error,
            tab: Tab::Ideb,
            ideb_tab: IndicatorTab::new(Indicator::Ideb),
            saeb_tab: IndicatorTab::new(Indicator::Saeb),
            region_tab: RegionTab::new(),
        }
    }

    fn load_datasets() -> anyhow::Result<LoadedData> {
        let mut store = DatasetStore::new();
        let ideb = store.get_or_load(IDEB_PATH, COL_IDEB)?;
        let saeb = store.get_or_load(SAEB_PATH, COL_PROFICIENCIA)?;

        let ideb_regions = normalize_regions(&ideb)?;
        let saeb_regions = normalize_regions(&saeb)?;

        Ok(LoadedData {
            ideb,
            saeb,
            ideb_regions,
            saeb_regions,
        })
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.label(
                RichText::new(
                    "📊 Dashboard de Análise de Desempenho por Escola - SAEB/IDEB (2005 - 2023)",
                )
                .size(18.0)
                .strong(),
            );
            ui.label("Bem-vindo ao sistema de acesso aos resultados do IDEB e SAEB.");
            ui.add_space(6.0);

            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tab, Tab::Ideb, "📈 IDEB");
                ui.selectable_value(&mut self.tab, Tab::Saeb, "📊 SAEB");
                ui.selectable_value(&mut self.tab, Tab::Regioes, "🗺 REGIÕES");
            });
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            // Ingestion failures are fatal: no partial render, only the message
            if let Some(message) = &self.load_error {
                let message = message.clone();
                ui.centered_and_justified(|ui| {
                    widgets::error_banner(ui, &message);
                });
                return;
            }
            let Some(data) = &self.data else {
                return;
            };

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.tab {
                    Tab::Ideb => self.ideb_tab.show(ui, &data.ideb),
                    Tab::Saeb => self.saeb_tab.show(ui, &data.saeb),
                    Tab::Regioes => {
                        self.region_tab
                            .show(ui, &data.ideb_regions, &data.saeb_regions)
                    }
                });
        });
    }
}
