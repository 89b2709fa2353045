//! Chart layer: interactive egui_plot widgets and static PNG export.

pub mod export;
pub mod plotter;

pub use plotter::ChartPlotter;

/// Bar positions for a group-means series. A null mean gets no bar and no
/// value label, but keeps its x slot so the axis labels stay aligned.
pub(crate) fn bar_entries(values: &[Option<f64>]) -> Vec<(usize, f64)> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_means_keep_their_slot_but_get_no_bar() {
        let entries = bar_entries(&[Some(6.5), None, Some(5.0)]);
        assert_eq!(entries, vec![(0, 6.5), (2, 5.0)]);
        assert!(bar_entries(&[None, None]).is_empty());
    }
}
