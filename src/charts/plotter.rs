//! Chart Plotter Module
//! Interactive line and bar charts using egui_plot.

use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoint, PlotPoints, Points, Text};

/// Series color matching the original dashboard palette (skyblue bars,
/// default-blue line).
pub const BAR_COLOR: Color32 = Color32::from_rgb(135, 206, 235);
pub const LINE_COLOR: Color32 = Color32::from_rgb(31, 119, 180);

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Metric-over-editions line chart. One x slot per row, labeled with the
    /// edition string; missing metric values leave a gap.
    pub fn draw_trend_chart(
        ui: &mut egui::Ui,
        id: &str,
        editions: &[String],
        values: &[Option<f64>],
        y_label: &str,
    ) {
        let x_labels = editions.to_vec();

        let points: Vec<[f64; 2]> = values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| [i as f64, v]))
            .collect();

        Plot::new(format!("trend_{}", id))
            .height(320.0)
            .allow_scroll(false)
            .x_axis_label("Edição")
            .y_axis_label(y_label.to_string())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < 1e-6 && idx < x_labels.len() {
                    x_labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(LINE_COLOR)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(4.0)
                        .color(LINE_COLOR),
                );
                for &[x, y] in &points {
                    plot_ui.text(Text::new(
                        PlotPoint::new(x, y + 0.05),
                        RichText::new(format!("{:.1}", y)).size(11.0),
                    ));
                }
            });
    }

    /// Group-means bar chart (regions in comparison mode, editions in
    /// single-region mode), with the mean printed above each bar. A null
    /// mean leaves its slot empty.
    pub fn draw_bar_chart(
        ui: &mut egui::Ui,
        id: &str,
        labels: &[String],
        values: &[Option<f64>],
        x_label: &str,
        y_label: &str,
    ) {
        let x_labels = labels.to_vec();

        let entries = crate::charts::bar_entries(values);
        let bars: Vec<Bar> = entries
            .iter()
            .map(|&(i, v)| Bar::new(i as f64, v).width(0.6).fill(BAR_COLOR))
            .collect();

        Plot::new(format!("bars_{}", id))
            .height(320.0)
            .allow_scroll(false)
            .x_axis_label(x_label.to_string())
            .y_axis_label(y_label.to_string())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < 1e-6 && idx < x_labels.len() {
                    x_labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
                for &(i, v) in &entries {
                    plot_ui.text(Text::new(
                        PlotPoint::new(i as f64, v + 0.05),
                        RichText::new(format!("{:.1}", v))
                            .size(11.0)
                            .color(Color32::from_rgb(31, 119, 180)),
                    ));
                }
            });
    }
}
