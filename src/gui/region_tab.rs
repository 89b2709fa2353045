//! Regions Tab Widget
//! Cross-region comparison for one edition, or per-edition trend for a single
//! region, with summary statistics and PNG export.

use anyhow::Context;
use egui::{ComboBox, RichText};
use polars::prelude::*;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::charts::export::{
    region_comparison_name, region_trend_name, render_bar_chart_png, REGION_CHART_SIZE,
};
use crate::charts::ChartPlotter;
use crate::data::{
    unique_editions, unique_values, FilterSpec, COL_COMPONENTE, COL_EDICAO, COL_ETAPA, COL_IDEB,
    COL_REGIAO, TODAS,
};
use crate::gui::indicator_tab::Indicator;
use crate::gui::widgets::{self, column_f64, column_strings};
use crate::stats::aggregate::{COL_MEDIA, COL_QTD_ESCOLAS};
use crate::stats::{aggregate_by, summary_stats};

/// Selector state and rendering for the region analysis tab. Works over the
/// region-normalized working copies of both tables.
pub struct RegionTab {
    region: String,
    edition: String,
    indicator: Indicator,
    stage: String,
    component: String,
    status: Option<String>,
    last_export: Option<PathBuf>,
}

impl RegionTab {
    pub fn new() -> Self {
        Self {
            region: TODAS.to_string(),
            edition: String::new(),
            indicator: Indicator::Ideb,
            stage: String::new(),
            component: "-".to_string(),
            status: None,
            last_export: None,
        }
    }

    fn selector(ui: &mut egui::Ui, id: &str, label: &str, options: &[String], selected: &mut String) {
        widgets::selector(ui, id, label, 220.0, options, selected);
    }

    pub fn show(&mut self, ui: &mut egui::Ui, ideb: &DataFrame, saeb: &DataFrame) {
        ui.heading("📊 Análise por Região");
        ui.add_space(4.0);

        if ideb.column(COL_REGIAO).is_err() || saeb.column(COL_REGIAO).is_err() {
            widgets::error_banner(ui, "Erro: A coluna 'REGIÃO' não foi encontrada nos dados.");
            return;
        }

        // Region list is the union across both tables, sorted, TODAS first
        let mut regions: Vec<String> = unique_values(ideb, COL_REGIAO);
        for region in unique_values(saeb, COL_REGIAO) {
            if !regions.contains(&region) {
                regions.push(region);
            }
        }
        regions.sort();
        regions.insert(0, TODAS.to_string());

        let indicator_df = match self.indicator {
            Indicator::Ideb => ideb,
            Indicator::Saeb => saeb,
        };
        let stages = unique_values(indicator_df, COL_ETAPA);
        let components = match self.indicator {
            Indicator::Ideb => vec!["-".to_string()],
            Indicator::Saeb => unique_values(saeb, COL_COMPONENTE),
        };

        ui.horizontal(|ui| {
            Self::selector(ui, "region_region", "Selecione a REGIÃO", &regions, &mut self.region);

            ui.vertical(|ui| {
                ui.label("Selecione o Indicador");
                ComboBox::from_id_salt("region_indicator")
                    .width(220.0)
                    .selected_text(self.indicator.label())
                    .show_ui(ui, |ui| {
                        for indicator in [Indicator::Ideb, Indicator::Saeb] {
                            if ui
                                .selectable_label(self.indicator == indicator, indicator.label())
                                .clicked()
                            {
                                self.indicator = indicator;
                            }
                        }
                    });
            });

            Self::selector(ui, "region_stage", "Selecione a ETAPA", &stages, &mut self.stage);
            Self::selector(
                ui,
                "region_component",
                "Selecione o COMPONENTE",
                &components,
                &mut self.component,
            );
        });

        // Edition selector only applies when comparing across all regions
        if self.region == TODAS {
            let mut editions = unique_editions(ideb);
            for edition in unique_editions(saeb) {
                if !editions.contains(&edition) {
                    editions.push(edition);
                }
            }
            editions.sort_by_key(|e| e.parse::<i64>().unwrap_or(0));
            Self::selector(
                ui,
                "region_edition",
                "Selecione a EDIÇÃO para comparar regiões",
                &editions,
                &mut self.edition,
            );
        }
        ui.add_space(8.0);

        // Any unexpected aggregation failure is contained to this tab
        let render = if self.region == TODAS {
            self.show_comparison(ui, indicator_df)
        } else {
            self.show_single_region(ui, indicator_df)
        };
        if let Err(e) = render {
            warn!(error = %e, "region analysis failed");
            widgets::error_banner(ui, &format!("Erro ao processar os dados: {e}"));
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

    fn metric_title(&self) -> String {
        match self.indicator {
            Indicator::Ideb => "IDEB".to_string(),
            Indicator::Saeb => format!("Proficiência em {}", self.component),
        }
    }

    fn filter_spec(&self) -> FilterSpec {
        let mut spec = FilterSpec::new().stage(&self.stage);
        if self.region == TODAS {
            spec = spec.edition(&self.edition);
        } else {
            spec = spec.region(&self.region);
        }
        if self.indicator == Indicator::Saeb {
            spec = spec.component(&self.component);
        }
        spec
    }

    /// "TODAS" mode: one bar per region for the selected edition.
    fn show_comparison(&mut self, ui: &mut egui::Ui, df: &DataFrame) -> anyhow::Result<()> {
        let filtered = self
            .filter_spec()
            .apply(df)
            .context("falha ao filtrar os dados")?;
        if filtered.is_empty() {
            widgets::warning_banner(ui, "Não há dados disponíveis para os filtros selecionados.");
            return Ok(());
        }

        let means = aggregate_by(&filtered, COL_REGIAO, self.indicator.metric_col())
            .context("falha ao agregar por região")?;

        let title = format!(
            "Comparativo de {} entre Regiões - Edição {}",
            self.metric_title(),
            self.edition
        );
        ui.heading(&title);

        let labels = column_strings(&means, COL_REGIAO);
        let values = column_f64(&means, COL_MEDIA);
        ChartPlotter::draw_bar_chart(
            ui,
            "region_comparison",
            &labels,
            &values,
            "Região",
            &format!("Média {}", self.metric_title()),
        );
        ui.add_space(8.0);

        if ui.button("⬇ Download do Gráfico (PNG)").clicked() {
            let file_name = region_comparison_name(self.indicator.label(), &self.edition);
            self.export_bars(&title, &labels, &values, "Região", &file_name);
        }
        ui.add_space(12.0);

        // Region table, best mean first
        ui.heading("📋 Dados por Região");
        let by_mean = means
            .lazy()
            .sort_by_exprs(
                [col(COL_MEDIA)],
                SortMultipleOptions::default().with_order_descending(true),
            )
            .collect()
            .context("falha ao ordenar a tabela de regiões")?;
        widgets::dataframe_table(
            ui,
            "region_means",
            &by_mean,
            &[(COL_MEDIA, "MÉDIA"), (COL_QTD_ESCOLAS, "QTD ESCOLAS")],
            &[(COL_MEDIA, 2)],
        );

        Ok(())
    }

    /// Single-region mode: one bar per edition plus the summary statistics.
    fn show_single_region(&mut self, ui: &mut egui::Ui, df: &DataFrame) -> anyhow::Result<()> {
        let filtered = self
            .filter_spec()
            .apply(df)
            .context("falha ao filtrar os dados")?;
        if filtered.is_empty() {
            widgets::warning_banner(ui, "Não há dados disponíveis para os filtros selecionados.");
            return Ok(());
        }

        let means = aggregate_by(&filtered, COL_EDICAO, self.indicator.metric_col())
            .context("falha ao agregar por edição")?;

        let title = format!("Média de {} - Região {}", self.metric_title(), self.region);
        ui.heading(format!(
            "Médias de {} - Região {}",
            self.metric_title(),
            self.region
        ));

        let labels = column_strings(&means, COL_EDICAO);
        let values = column_f64(&means, COL_MEDIA);
        ChartPlotter::draw_bar_chart(
            ui,
            "region_trend",
            &labels,
            &values,
            "Edição",
            &format!("Média {}", self.metric_title()),
        );
        ui.add_space(8.0);

        if ui.button("⬇ Download do Gráfico (PNG)").clicked() {
            let component = (self.indicator == Indicator::Saeb).then_some(self.component.as_str());
            let file_name =
                region_trend_name(self.indicator.label(), &self.region, &self.stage, component);
            self.export_bars(&title, &labels, &values, "Edição", &file_name);
        }
        ui.add_space(12.0);

        // Descriptive statistics over the selected dimension tuple
        ui.heading("📊 Resumo Estatístico");
        let summary = match self.indicator {
            Indicator::Ideb => summary_stats(&filtered, &[COL_EDICAO, COL_ETAPA], COL_IDEB, 1),
            Indicator::Saeb => summary_stats(
                &filtered,
                &[COL_EDICAO, COL_ETAPA, COL_COMPONENTE],
                self.indicator.metric_col(),
                2,
            ),
        }
        .context("falha ao calcular o resumo estatístico")?;

        let decimals = match self.indicator {
            Indicator::Ideb => 1,
            Indicator::Saeb => 2,
        };
        widgets::dataframe_table(
            ui,
            "region_summary",
            &summary,
            &[(COL_COMPONENTE, "COMPONENTE CURRICULAR")],
            &[
                ("Média", decimals),
                ("Mínimo", decimals),
                ("Máximo", decimals),
                ("Desvio Padrão", decimals),
            ],
        );

        Ok(())
    }

    fn export_bars(
        &mut self,
        title: &str,
        labels: &[String],
        values: &[Option<f64>],
        x_label: &str,
        file_name: &str,
    ) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(file_name)
            .save_file()
        else {
            return; // User cancelled
        };

        let y_label = format!("Média {}", self.metric_title());
        let result = render_bar_chart_png(title, labels, values, x_label, &y_label, REGION_CHART_SIZE)
            .map_err(anyhow::Error::from)
            .and_then(|png| std::fs::write(&path, png).map_err(anyhow::Error::from));

        match result {
            Ok(()) => {
                info!(path = %path.display(), "region chart exported");
                self.status = Some(format!("Gráfico salvo em {}", path.display()));
                self.last_export = Some(path);
            }
            Err(e) => {
                warn!(error = %e, "region chart export failed");
                self.status = Some(format!("Erro ao exportar o gráfico: {e}"));
            }
        }
    }
}
