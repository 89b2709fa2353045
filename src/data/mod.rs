//! Data layer: dataset loading, coercion, region normalization and filtering.

pub mod filter;
pub mod loader;
pub mod normalizer;

pub use filter::FilterSpec;
pub use loader::{DatasetStore, LoaderError};
pub use normalizer::normalize_regions;

use polars::prelude::*;

/// Column names as they appear in the source spreadsheets (post-trim).
pub const COL_INEP: &str = "INEP";
pub const COL_ESCOLA: &str = "ESCOLA";
pub const COL_REGIAO: &str = "REGIÃO";
pub const COL_EDICAO: &str = "EDIÇÃO";
pub const COL_ETAPA: &str = "ETAPA";
pub const COL_IDEB: &str = "IDEB";
pub const COL_PROFICIENCIA: &str = "PROFICIENCIA_MEDIA";
pub const COL_COMPONENTE: &str = "COMP_CURRICULAR";

/// Sentinel selector value meaning "no constraint" (all schools / all regions).
pub const TODAS: &str = "TODAS";

/// Get unique non-null values from a column, sorted.
pub fn unique_values(df: &DataFrame, column: &str) -> Vec<String> {
    df.column(column)
        .ok()
        .and_then(|col| col.unique().ok())
        .map(|unique| {
            let series = unique.as_materialized_series();
            let mut values: Vec<String> = (0..series.len())
                .filter_map(|i| {
                    let val = series.get(i).ok()?;
                    if val.is_null() {
                        None
                    } else {
                        Some(val.to_string().trim_matches('"').to_string())
                    }
                })
                .collect();
            values.sort();
            values
        })
        .unwrap_or_default()
}

/// Unique editions sorted by their integer value rather than lexically,
/// so "2005" < "2023" but also "5" < "11".
pub fn unique_editions(df: &DataFrame) -> Vec<String> {
    let mut editions = unique_values(df, COL_EDICAO);
    editions.sort_by_key(|e| e.parse::<i64>().unwrap_or(0));
    editions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_values_sorted_and_null_free() {
        let df = DataFrame::new(vec![Column::new(
            COL_ETAPA.into(),
            [
                Some("ANOS FINAIS"),
                Some("ANOS INICIAIS"),
                None,
                Some("ANOS FINAIS"),
            ],
        )])
        .unwrap();

        let values = unique_values(&df, COL_ETAPA);
        assert_eq!(values, vec!["ANOS FINAIS", "ANOS INICIAIS"]);
    }

    #[test]
    fn editions_sort_by_integer_value() {
        let df = DataFrame::new(vec![Column::new(
            COL_EDICAO.into(),
            ["2021", "2005", "2019", "0"],
        )])
        .unwrap();

        assert_eq!(unique_editions(&df), vec!["0", "2005", "2019", "2021"]);
    }
}
