//! Shared GUI widgets: banners, DataFrame tables and the delta table.

use egui::{Color32, ComboBox, RichText};
use polars::prelude::*;

use crate::stats::{DeltaRecord, Trend};

/// Trend colors carried over from the original delta rendering
/// (up/green, down/red, flat/blue).
pub const INCREASE_COLOR: Color32 = Color32::from_rgb(40, 167, 69);
pub const DECREASE_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
pub const FLAT_COLOR: Color32 = Color32::from_rgb(52, 152, 219);

pub fn trend_color(trend: Option<Trend>) -> Color32 {
    match trend {
        Some(Trend::Increase) => INCREASE_COLOR,
        Some(Trend::Decrease) => DECREASE_COLOR,
        Some(Trend::Flat) | None => FLAT_COLOR,
    }
}

/// Keeps a selection valid against its option list. When the current value is
/// no longer offered (filters changed, data reloaded), fall back to the first
/// option.
pub fn clamp_selection(options: &[String], selected: &mut String) {
    if !options.contains(selected) {
        *selected = options.first().cloned().unwrap_or_default();
    }
}

/// Labeled filter drop-down shared by the tab widgets.
pub fn selector(
    ui: &mut egui::Ui,
    id: &str,
    label: &str,
    width: f32,
    options: &[String],
    selected: &mut String,
) {
    clamp_selection(options, selected);
    ui.vertical(|ui| {
        ui.label(label);
        ComboBox::from_id_salt(id.to_string())
            .width(width)
            .selected_text(selected.clone())
            .show_ui(ui, |ui| {
                for option in options {
                    if ui.selectable_label(*selected == *option, option).clicked() {
                        *selected = option.clone();
                    }
                }
            });
    });
}

pub fn warning_banner(ui: &mut egui::Ui, text: &str) {
    ui.label(
        RichText::new(format!("⚠ {}", text))
            .size(13.0)
            .color(Color32::from_rgb(243, 156, 18)),
    );
}

pub fn error_banner(ui: &mut egui::Ui, text: &str) {
    ui.label(
        RichText::new(format!("✖ {}", text))
            .size(13.0)
            .color(DECREASE_COLOR),
    );
}

fn cell_text(value: AnyValue, decimals: Option<usize>) -> String {
    if value.is_null() {
        return String::new();
    }
    if let (Some(p), AnyValue::Float64(v)) = (decimals, &value) {
        return format!("{:.1$}", v, p);
    }
    value.to_string().trim_matches('"').to_string()
}

/// Render a DataFrame as a striped grid. `headers` maps source column names
/// to display labels; `decimals` fixes the precision of float columns.
pub fn dataframe_table(
    ui: &mut egui::Ui,
    id: &str,
    df: &DataFrame,
    headers: &[(&str, &str)],
    decimals: &[(&str, usize)],
) {
    let columns = df.get_columns();

    egui::Frame::none()
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .rounding(5.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            egui::Grid::new(ui.make_persistent_id(format!("table_{}", id)))
                .striped(true)
                .min_col_width(70.0)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    for col in columns {
                        let name = col.name().as_str();
                        let label = headers
                            .iter()
                            .find(|(src, _)| *src == name)
                            .map(|(_, display)| *display)
                            .unwrap_or(name);
                        ui.label(RichText::new(label).strong().size(12.0));
                    }
                    ui.end_row();

                    for row in 0..df.height() {
                        for col in columns {
                            let precision = decimals
                                .iter()
                                .find(|(c, _)| *c == col.name().as_str())
                                .map(|(_, p)| *p);
                            let text = col
                                .get(row)
                                .map(|v| cell_text(v, precision))
                                .unwrap_or_default();
                            ui.label(RichText::new(text).size(12.0));
                        }
                        ui.end_row();
                    }
                });
        });
}

/// Render the edition-over-edition delta table with trend markers and colors.
pub fn delta_table(
    ui: &mut egui::Ui,
    id: &str,
    deltas: &[DeltaRecord],
    escola: &str,
    etapa: &str,
    componente: Option<&str>,
    metric_title: &str,
) {
    egui::Frame::none()
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .rounding(5.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            egui::Grid::new(ui.make_persistent_id(format!("deltas_{}", id)))
                .striped(true)
                .min_col_width(70.0)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("ESCOLA").strong().size(12.0));
                    ui.label(RichText::new("ETAPA").strong().size(12.0));
                    if componente.is_some() {
                        ui.label(RichText::new("COMPONENTE").strong().size(12.0));
                    }
                    ui.label(RichText::new("Comparação").strong().size(12.0));
                    ui.label(RichText::new("Edição Atual").strong().size(12.0));
                    ui.label(RichText::new(format!("{} Atual", metric_title)).strong().size(12.0));
                    ui.label(RichText::new("Edição Anterior").strong().size(12.0));
                    ui.label(
                        RichText::new(format!("{} Anterior", metric_title))
                            .strong()
                            .size(12.0),
                    );
                    ui.label(RichText::new("Variação").strong().size(12.0));
                    ui.end_row();

                    for record in deltas {
                        ui.label(RichText::new(escola).size(12.0));
                        ui.label(RichText::new(etapa).size(12.0));
                        if let Some(comp) = componente {
                            ui.label(RichText::new(comp).size(12.0));
                        }
                        ui.label(RichText::new(&record.comparison).size(12.0));
                        ui.label(RichText::new(&record.current_edition).size(12.0));
                        ui.label(RichText::new(metric_text(record.current)).size(12.0));
                        ui.label(RichText::new(&record.previous_edition).size(12.0));
                        ui.label(RichText::new(metric_text(record.previous)).size(12.0));

                        match record.delta {
                            Some(delta) => {
                                let trend = record.trend();
                                let marker = trend.map(|t| t.marker()).unwrap_or("");
                                ui.label(
                                    RichText::new(format!("{} {:.2}", marker, delta).trim().to_string())
                                        .size(12.0)
                                        .color(trend_color(trend)),
                                );
                            }
                            None => {
                                ui.label(RichText::new("").size(12.0));
                            }
                        }
                        ui.end_row();
                    }
                });
        });
}

fn metric_text(value: Option<f64>) -> String {
    value.map(|v| format!("{:.1}", v)).unwrap_or_default()
}

/// Non-null string values of a column, in row order.
pub fn column_strings(df: &DataFrame, column: &str) -> Vec<String> {
    df.column(column)
        .ok()
        .map(|col| {
            let series = col.as_materialized_series();
            (0..series.len())
                .filter_map(|i| {
                    let val = series.get(i).ok()?;
                    if val.is_null() {
                        None
                    } else {
                        Some(val.to_string().trim_matches('"').to_string())
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

/// f64 values of a column in row order, nulls preserved.
pub fn column_f64(df: &DataFrame, column: &str) -> Vec<Option<f64>> {
    df.column(column)
        .ok()
        .and_then(|col| col.cast(&DataType::Float64).ok())
        .and_then(|col| {
            col.f64()
                .ok()
                .map(|ca| ca.into_iter().collect::<Vec<Option<f64>>>())
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_selection_falls_back_to_first_option() {
        let options = vec!["TODAS".to_string(), "NORTE".to_string()];

        let mut stale = "SUL".to_string();
        clamp_selection(&options, &mut stale);
        assert_eq!(stale, "TODAS");

        let mut kept = "NORTE".to_string();
        clamp_selection(&options, &mut kept);
        assert_eq!(kept, "NORTE");

        let mut orphan = "NORTE".to_string();
        clamp_selection(&[], &mut orphan);
        assert_eq!(orphan, "");
    }
}
