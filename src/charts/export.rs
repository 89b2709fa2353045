//! Static Chart Export Module
//! Renders the current chart with plotters and encodes it as PNG bytes,
//! matching the original export resolutions.

use plotters::prelude::*;
use thiserror::Error;

/// 10x5 in at 300 dpi: line charts for a single school/region series.
pub const SINGLE_CHART_SIZE: (u32, u32) = (3000, 1500);
/// 12x6 in at 120 dpi: cross-region and per-edition bar charts.
pub const REGION_CHART_SIZE: (u32, u32) = (1440, 720);

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Chart render failed: {0}")]
    Render(String),
    #[error("PNG encode failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// File name for the IDEB tab export: `IDEB_{escola}_{etapa}.png`.
pub fn ideb_chart_name(escola: &str, etapa: &str) -> String {
    format!("IDEB_{}_{}.png", escola, etapa)
}

/// File name for the SAEB tab export: `SAEB_{escola}_{etapa}_{componente}.png`.
pub fn saeb_chart_name(escola: &str, etapa: &str, componente: &str) -> String {
    format!("SAEB_{}_{}_{}.png", escola, etapa, componente)
}

/// File name for the cross-region comparison export.
pub fn region_comparison_name(indicador: &str, edicao: &str) -> String {
    format!("COMPARATIVO_{}_EDICAO_{}.png", indicador, edicao)
}

/// File name for the single-region trend export; SAEB adds the component.
pub fn region_trend_name(
    indicador: &str,
    regiao: &str,
    etapa: &str,
    componente: Option<&str>,
) -> String {
    match componente {
        Some(comp) => format!("{}_{}_{}_{}.png", indicador, regiao, etapa, comp),
        None => format!("{}_{}_{}.png", indicador, regiao, etapa),
    }
}

fn y_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_infinite() {
        return (0.0, 1.0);
    }
    let pad = ((max - min) * 0.15).max(0.5);
    (min - pad, max + pad)
}

fn encode_png(buf: Vec<u8>, size: (u32, u32)) -> Result<Vec<u8>, ExportError> {
    let img = image::RgbImage::from_raw(size.0, size.1, buf)
        .ok_or_else(|| ExportError::Render("pixel buffer size mismatch".to_string()))?;
    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)?;
    Ok(png)
}

/// Render the metric-over-editions line chart to PNG bytes. Missing values
/// leave gaps, matching the interactive chart.
pub fn render_line_chart_png(
    title: &str,
    editions: &[String],
    values: &[Option<f64>],
    y_label: &str,
    size: (u32, u32),
) -> Result<Vec<u8>, ExportError> {
    let (width, height) = size;
    let mut buf = vec![255u8; (width * height * 3) as usize];

    let points: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
        .collect();
    let (y_min, y_max) = y_range(points.iter().map(|&(_, y)| y));
    let n = editions.len().max(1);
    let font_px = (height / 36) as i32;

    {
        let root = BitMapBackend::with_buffer(&mut buf, size).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ExportError::Render(e.to_string()))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", font_px + 8))
            .margin(20)
            .x_label_area_size(font_px * 4)
            .y_label_area_size(font_px * 4)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), y_min..y_max)
            .map_err(|e| ExportError::Render(e.to_string()))?;

        let labels = editions.to_vec();
        chart
            .configure_mesh()
            .x_labels(n)
            .x_label_formatter(&|x| {
                let idx = x.round() as usize;
                if (x - idx as f64).abs() < 1e-6 && idx < labels.len() {
                    labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .x_desc("Edição")
            .y_desc(y_label)
            .label_style(("sans-serif", font_px))
            .draw()
            .map_err(|e| ExportError::Render(e.to_string()))?;

        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                BLUE.stroke_width(3),
            ))
            .map_err(|e| ExportError::Render(e.to_string()))?;
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 6, BLUE.filled())),
            )
            .map_err(|e| ExportError::Render(e.to_string()))?;
        chart
            .draw_series(points.iter().map(|&(x, y)| {
                Text::new(
                    format!("{:.1}", y),
                    (x, y + (y_max - y_min) * 0.02),
                    ("sans-serif", font_px).into_font().color(&BLACK),
                )
            }))
            .map_err(|e| ExportError::Render(e.to_string()))?;

        root.present().map_err(|e| ExportError::Render(e.to_string()))?;
    }

    encode_png(buf, size)
}

/// Render a group-means bar chart to PNG bytes. A null mean leaves its
/// slot empty, matching the interactive chart.
pub fn render_bar_chart_png(
    title: &str,
    labels: &[String],
    values: &[Option<f64>],
    x_label: &str,
    y_label: &str,
    size: (u32, u32),
) -> Result<Vec<u8>, ExportError> {
    let (width, height) = size;
    let mut buf = vec![255u8; (width * height * 3) as usize];

    let entries = crate::charts::bar_entries(values);
    let max = entries.iter().map(|&(_, v)| v).fold(0.0f64, f64::max);
    let y_max = if max > 0.0 { max * 1.15 } else { 1.0 };
    let n = labels.len().max(1);
    let font_px = (height / 36) as i32;
    let skyblue = RGBColor(135, 206, 235);

    {
        let root = BitMapBackend::with_buffer(&mut buf, size).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ExportError::Render(e.to_string()))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", font_px + 8))
            .margin(20)
            .x_label_area_size(font_px * 4)
            .y_label_area_size(font_px * 4)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0.0..y_max)
            .map_err(|e| ExportError::Render(e.to_string()))?;

        let x_labels = labels.to_vec();
        chart
            .configure_mesh()
            .x_labels(n)
            .x_label_formatter(&|x| {
                let idx = x.round() as usize;
                if (x - idx as f64).abs() < 1e-6 && idx < x_labels.len() {
                    x_labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .x_desc(x_label)
            .y_desc(y_label)
            .label_style(("sans-serif", font_px))
            .draw()
            .map_err(|e| ExportError::Render(e.to_string()))?;

        chart
            .draw_series(entries.iter().map(|&(i, v)| {
                Rectangle::new([(i as f64 - 0.3, 0.0), (i as f64 + 0.3, v)], skyblue.filled())
            }))
            .map_err(|e| ExportError::Render(e.to_string()))?;
        chart
            .draw_series(entries.iter().map(|&(i, v)| {
                Text::new(
                    format!("{:.1}", v),
                    (i as f64, v + y_max * 0.02),
                    ("sans-serif", font_px).into_font().color(&BLUE),
                )
            }))
            .map_err(|e| ExportError::Render(e.to_string()))?;

        root.present().map_err(|e| ExportError::Render(e.to_string()))?;
    }

    encode_png(buf, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_names_encode_the_active_filters() {
        assert_eq!(
            ideb_chart_name("TODAS", "ANOS INICIAIS"),
            "IDEB_TODAS_ANOS INICIAIS.png"
        );
        assert_eq!(
            saeb_chart_name("ESCOLA A", "ANOS FINAIS", "MATEMÁTICA"),
            "SAEB_ESCOLA A_ANOS FINAIS_MATEMÁTICA.png"
        );
        assert_eq!(
            region_comparison_name("IDEB", "2019"),
            "COMPARATIVO_IDEB_EDICAO_2019.png"
        );
        assert_eq!(
            region_trend_name("IDEB", "NORTE", "ANOS INICIAIS", None),
            "IDEB_NORTE_ANOS INICIAIS.png"
        );
        assert_eq!(
            region_trend_name("SAEB", "SUL", "ANOS FINAIS", Some("LÍNGUA PORTUGUESA")),
            "SAEB_SUL_ANOS FINAIS_LÍNGUA PORTUGUESA.png"
        );
    }

    #[test]
    fn y_range_pads_and_tolerates_empty_input() {
        assert_eq!(y_range(std::iter::empty()), (0.0, 1.0));
        let (lo, hi) = y_range([4.0, 6.0].into_iter());
        assert!(lo < 4.0 && hi > 6.0);
    }
}
