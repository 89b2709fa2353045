//! IDEB / SAEB Tab Widget
//! School and stage selectors, results table, delta table, trend chart and
//! PNG export for one indicator dataset.

use egui::RichText;
use polars::prelude::*;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::charts::export::{
    ideb_chart_name, render_line_chart_png, saeb_chart_name, SINGLE_CHART_SIZE,
};
use crate::charts::ChartPlotter;
use crate::data::{
    unique_values, FilterSpec, COL_COMPONENTE, COL_EDICAO, COL_ESCOLA, COL_ETAPA, COL_IDEB,
    COL_PROFICIENCIA, TODAS,
};
use crate::gui::widgets::{self, column_f64, column_strings};
use crate::stats::compute_deltas;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Ideb,
    Saeb,
}

impl Indicator {
    pub fn label(&self) -> &'static str {
        match self {
            Indicator::Ideb => "IDEB",
            Indicator::Saeb => "SAEB",
        }
    }

    pub fn metric_col(&self) -> &'static str {
        match self {
            Indicator::Ideb => COL_IDEB,
            Indicator::Saeb => COL_PROFICIENCIA,
        }
    }

    pub fn metric_title(&self) -> &'static str {
        match self {
            Indicator::Ideb => "IDEB",
            Indicator::Saeb => "Proficiência",
        }
    }
}

/// Selector state and rendering for the IDEB and SAEB tabs.
pub struct IndicatorTab {
    indicator: Indicator,
    school: String,
    stage: String,
    component: String,
    status: Option<String>,
    last_export: Option<PathBuf>,
}

impl IndicatorTab {
    pub fn new(indicator: Indicator) -> Self {
        Self {
            indicator,
            school: TODAS.to_string(),
            stage: String::new(),
            component: String::new(),
            status: None,
            last_export: None,
        }
    }

    fn selector(ui: &mut egui::Ui, id: &str, label: &str, options: &[String], selected: &mut String) {
        widgets::selector(ui, id, label, 260.0, options, selected);
    }

    pub fn show(&mut self, ui: &mut egui::Ui, df: &DataFrame) {
        let kind = self.indicator.label();

        let mut schools = unique_values(df, COL_ESCOLA);
        schools.insert(0, TODAS.to_string());
        let stages = unique_values(df, COL_ETAPA);
        let components = if self.indicator == Indicator::Saeb {
            unique_values(df, COL_COMPONENTE)
        } else {
            Vec::new()
        };

        ui.horizontal(|ui| {
            Self::selector(
                ui,
                &format!("{kind}_school"),
                &format!("Selecione a ESCOLA ({kind})"),
                &schools,
                &mut self.school,
            );
            Self::selector(
                ui,
                &format!("{kind}_stage"),
                &format!("Selecione a ETAPA ({kind})"),
                &stages,
                &mut self.stage,
            );
            if self.indicator == Indicator::Saeb {
                Self::selector(
                    ui,
                    "saeb_component",
                    "Selecione o COMPONENTE CURRICULAR",
                    &components,
                    &mut self.component,
                );
            }
        });
        ui.add_space(8.0);

        let mut spec = FilterSpec::new().school(&self.school).stage(&self.stage);
        if self.indicator == Indicator::Saeb {
            spec = spec.component(&self.component);
        }

        let filtered = match spec.apply(df) {
            Ok(filtered) => filtered,
            Err(e) => {
                widgets::error_banner(ui, &format!("Erro ao processar os dados: {e}"));
                return;
            }
        };

        if filtered.is_empty() {
            warn!(indicator = kind, "no rows matched the selected filters");
            widgets::warning_banner(
                ui,
                &format!("Não há dados disponíveis para esta combinação de filtros no {kind}."),
            );
            return;
        }

        // Results table
        let subtitle = match self.indicator {
            Indicator::Ideb => format!("Resultados do IDEB - {} - {}", self.school, self.stage),
            Indicator::Saeb => format!(
                "Resultados do SAEB - {} - {} - {}",
                self.school, self.stage, self.component
            ),
        };
        ui.heading(subtitle);
        widgets::dataframe_table(
            ui,
            &format!("{kind}_results"),
            &filtered,
            &[
                (COL_PROFICIENCIA, "PROFICIÊNCIA MÉDIA"),
                (COL_COMPONENTE, "COMPONENTE CURRICULAR"),
            ],
            &[(self.indicator.metric_col(), 1)],
        );
        ui.add_space(12.0);

        // Delta table
        let delta_title = match self.indicator {
            Indicator::Ideb => format!("Variação do IDEB - {}", self.stage),
            Indicator::Saeb => format!("Variação da Proficiência Média - {}", self.component),
        };
        match compute_deltas(&filtered, self.indicator.metric_col()) {
            Ok(deltas) if !deltas.is_empty() => {
                ui.heading(delta_title);
                widgets::delta_table(
                    ui,
                    &format!("{kind}_deltas"),
                    &deltas,
                    &self.school,
                    &self.stage,
                    (self.indicator == Indicator::Saeb).then_some(self.component.as_str()),
                    self.indicator.metric_title(),
                );
                ui.add_space(12.0);
            }
            Ok(_) => {}
            Err(e) => widgets::error_banner(ui, &format!("Erro ao processar os dados: {e}")),
        }

        // Trend chart
        let editions = column_strings(&filtered, COL_EDICAO);
        let values = column_f64(&filtered, self.indicator.metric_col());

        let chart_title = match self.indicator {
            Indicator::Ideb => format!("Gráfico do IDEB - {}", self.stage),
            Indicator::Saeb => format!("Gráfico de Proficiência Média - {}", self.component),
        };
        ui.heading(chart_title);

        let y_label = match self.indicator {
            Indicator::Ideb => "IDEB".to_string(),
            Indicator::Saeb => format!("Proficiência Média ({})", self.component),
        };
        ChartPlotter::draw_trend_chart(ui, kind, &editions, &values, &y_label);
        ui.add_space(8.0);

        // PNG export
        if ui.button("⬇ Download do Gráfico (PNG)").clicked() {
            self.export_chart(&editions, &values, &y_label);
        }
        if let Some(path) = self.last_export.clone() {
            if ui.button("📂 Abrir gráfico exportado").clicked() {
                if let Err(e) = open::that(&path) {
                    self.status = Some(format!("Erro ao abrir o arquivo: {e}"));
                }
            }
        }
        if let Some(status) = &self.status {
            ui.label(RichText::new(status).size(11.0));
        }
    }

    fn export_chart(&mut self, editions: &[String], values: &[Option<f64>], y_label: &str) {
        let file_name = match self.indicator {
            Indicator::Ideb => ideb_chart_name(&self.school, &self.stage),
            Indicator::Saeb => saeb_chart_name(&self.school, &self.stage, &self.component),
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(file_name.as_str())
            .save_file()
        else {
            return; // User cancelled
        };

        let title = format!("{} - {} - {}", y_label, self.school, self.stage);
        let result = render_line_chart_png(&title, editions, values, y_label, SINGLE_CHART_SIZE)
            .map_err(anyhow::Error::from)
            .and_then(|png| std::fs::write(&path, png).map_err(anyhow::Error::from));

        match result {
            Ok(()) => {
                info!(path = %path.display(), "chart exported");
                self.status = Some(format!("Gráfico salvo em {}", path.display()));
                self.last_export = Some(path);
            }
            Err(e) => {
                warn!(error = %e, "chart export failed");
                self.status = Some(format!("Erro ao exportar o gráfico: {e}"));
            }
        }
    }
}
