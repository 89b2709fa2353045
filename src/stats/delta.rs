//! Delta Calculator Module
//! Consecutive-edition differences over an edition-ordered table.

use polars::prelude::*;

use crate::data::COL_EDICAO;

/// Sign classification of an edition-over-edition difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Increase,
    Decrease,
    Flat,
}

impl Trend {
    pub fn classify(delta: f64) -> Self {
        if delta > 0.0 {
            Trend::Increase
        } else if delta < 0.0 {
            Trend::Decrease
        } else {
            Trend::Flat
        }
    }

    /// Visual marker shown next to the delta value.
    pub fn marker(&self) -> &'static str {
        match self {
            Trend::Increase => "▲",
            Trend::Decrease => "▼",
            Trend::Flat => "",
        }
    }
}

/// One adjacent-edition comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaRecord {
    /// "{current} - {previous}" label.
    pub comparison: String,
    pub current_edition: String,
    pub previous_edition: String,
    pub current: Option<f64>,
    pub previous: Option<f64>,
    /// current - previous; null if either side is missing.
    pub delta: Option<f64>,
}

impl DeltaRecord {
    pub fn trend(&self) -> Option<Trend> {
        self.delta.map(Trend::classify)
    }
}

/// Compute deltas for each adjacent row pair of an edition-ordered table.
/// Fewer than two rows yields an empty sequence.
pub fn compute_deltas(df: &DataFrame, metric_col: &str) -> PolarsResult<Vec<DeltaRecord>> {
    let editions = df.column(COL_EDICAO)?.cast(&DataType::String)?;
    let editions = editions.str()?;
    let metric = df.column(metric_col)?.cast(&DataType::Float64)?;
    let metric = metric.f64()?;

    let mut records = Vec::new();
    for i in 1..df.height() {
        let current_edition = editions.get(i).unwrap_or_default().to_string();
        let previous_edition = editions.get(i - 1).unwrap_or_default().to_string();
        let current = metric.get(i);
        let previous = metric.get(i - 1);

        records.push(DeltaRecord {
            comparison: format!("{} - {}", current_edition, previous_edition),
            current_edition,
            previous_edition,
            current,
            previous,
            delta: match (current, previous) {
                (Some(c), Some(p)) => Some(c - p),
                _ => None,
            },
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::COL_IDEB;

    fn table(editions: &[&str], values: &[Option<f64>]) -> DataFrame {
        DataFrame::new(vec![
            Column::new(COL_EDICAO.into(), editions),
            Column::new(COL_IDEB.into(), values),
        ])
        .unwrap()
    }

    #[test]
    fn adjacent_pair_scenario() {
        let df = table(&["2017", "2019"], &[Some(5.0), Some(6.5)]);
        let deltas = compute_deltas(&df, COL_IDEB).unwrap();

        assert_eq!(deltas.len(), 1);
        let record = &deltas[0];
        assert_eq!(record.comparison, "2019 - 2017");
        assert_eq!(record.current, Some(6.5));
        assert_eq!(record.previous, Some(5.0));
        assert!((record.delta.unwrap() - 1.5).abs() < 1e-9);
        assert_eq!(record.trend(), Some(Trend::Increase));
    }

    #[test]
    fn sequence_length_is_n_minus_one() {
        let df = table(
            &["2015", "2017", "2019", "2021"],
            &[Some(4.0), Some(4.5), Some(4.2), Some(4.2)],
        );
        let deltas = compute_deltas(&df, COL_IDEB).unwrap();
        assert_eq!(deltas.len(), 3);
        assert_eq!(deltas[1].trend(), Some(Trend::Decrease));
        assert_eq!(deltas[2].trend(), Some(Trend::Flat));
    }

    #[test]
    fn short_tables_yield_empty_sequences() {
        assert!(compute_deltas(&table(&[], &[]), COL_IDEB).unwrap().is_empty());
        assert!(compute_deltas(&table(&["2019"], &[Some(5.0)]), COL_IDEB)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn missing_metric_propagates_as_missing_delta() {
        let df = table(&["2017", "2019", "2021"], &[Some(5.0), None, Some(6.0)]);
        let deltas = compute_deltas(&df, COL_IDEB).unwrap();

        assert_eq!(deltas[0].delta, None);
        assert_eq!(deltas[0].trend(), None);
        assert_eq!(deltas[1].delta, None);
    }

    #[test]
    fn trend_classification_by_sign() {
        assert_eq!(Trend::classify(0.1), Trend::Increase);
        assert_eq!(Trend::classify(-0.1), Trend::Decrease);
        assert_eq!(Trend::classify(0.0), Trend::Flat);
        assert_eq!(Trend::Increase.marker(), "▲");
        assert_eq!(Trend::Decrease.marker(), "▼");
        assert_eq!(Trend::Flat.marker(), "");
    }
}
