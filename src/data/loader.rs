//! Dataset Loader Module
//! Loads the source spreadsheets with Polars and applies the ingestion coercions.

use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use super::{COL_EDICAO, COL_INEP};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Arquivo não encontrado: {}. Verifique os arquivos.", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to load dataset: {0}")]
    Polars(#[from] PolarsError),
}

/// Read a source table: CSV load, drop exported positional-index columns
/// ("Unnamed: 0" artifacts) and trim incidental whitespace from column names.
pub fn load_table(path: &Path) -> Result<DataFrame, LoaderError> {
    if !path.exists() {
        return Err(LoaderError::FileNotFound(path.to_path_buf()));
    }

    // Use lazy evaluation for memory efficiency, then collect
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    let df = tidy_columns(df)?;
    info!(path = %path.display(), rows = df.height(), "dataset loaded");
    Ok(df)
}

fn tidy_columns(mut df: DataFrame) -> Result<DataFrame, LoaderError> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.trim().to_string())
        .collect();
    df.set_column_names(names.clone())?;

    let drop: Vec<String> = names
        .into_iter()
        .filter(|n| n.starts_with("Unnamed"))
        .collect();
    if drop.is_empty() {
        Ok(df)
    } else {
        Ok(df.drop_many(drop))
    }
}

/// Apply the post-load coercions: `INEP` and `EDIÇÃO` become integer-valued
/// strings (invalid or missing values become "0"), the metric column becomes
/// nullable f64 (invalid values become null, never zero).
pub fn coerce(df: &DataFrame, metric_col: &str) -> Result<DataFrame, LoaderError> {
    let mut out = df.clone();

    for id_col in [COL_INEP, COL_EDICAO] {
        let coerced = to_id_string(df.column(id_col)?)?.with_name(id_col.into());
        out.with_column(coerced)?;
    }

    let metric = df
        .column(metric_col)?
        .cast(&DataType::Float64)?
        .as_materialized_series()
        .clone()
        .with_name(metric_col.into());
    out.with_column(metric)?;

    Ok(out)
}

/// Numeric parse with invalid → null, null fill 0, then integer-valued string.
fn to_id_string(col: &Column) -> PolarsResult<Series> {
    col.cast(&DataType::Float64)?
        .as_materialized_series()
        .fill_null(FillNullStrategy::Zero)?
        .cast(&DataType::Int64)?
        .cast(&DataType::String)
}

/// Memoized dataset access, keyed by source path. Source files are assumed
/// static for the process lifetime, so there is no invalidation.
#[derive(Default)]
pub struct DatasetStore {
    cache: HashMap<PathBuf, DataFrame>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load, tidy and coerce the table at `path`, or return the cached copy.
    pub fn get_or_load(
        &mut self,
        path: impl AsRef<Path>,
        metric_col: &str,
    ) -> Result<DataFrame, LoaderError> {
        let path = path.as_ref();
        if let Some(df) = self.cache.get(path) {
            return Ok(df.clone());
        }

        let df = coerce(&load_table(path)?, metric_col)?;
        self.cache.insert(path.to_path_buf(), df.clone());
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::COL_IDEB;

    fn write_temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_file_is_a_loader_error() {
        let err = load_table(Path::new("data/does_not_exist.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::FileNotFound(_)));
        assert!(err.to_string().contains("does_not_exist.csv"));
    }

    #[test]
    fn load_trims_headers_and_drops_unnamed_columns() {
        let path = write_temp_csv(
            "ideb_dashboard_load_test.csv",
            "Unnamed: 0, INEP ,ESCOLA,EDIÇÃO,ETAPA,IDEB\n0,11000023,ESCOLA A,2019,ANOS INICIAIS,5.4\n",
        );

        let df = load_table(&path).unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["INEP", "ESCOLA", "EDIÇÃO", "ETAPA", "IDEB"]);
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn invalid_identifier_and_edition_coerce_to_zero_string() {
        let df = DataFrame::new(vec![
            Column::new(COL_INEP.into(), [Some("11000023"), Some("abc"), None]),
            Column::new(COL_EDICAO.into(), [Some("2019"), None, Some("x")]),
            Column::new(COL_IDEB.into(), ["5.4", "n/a", "6.0"]),
        ])
        .unwrap();

        let coerced = coerce(&df, COL_IDEB).unwrap();

        let inep = coerced.column(COL_INEP).unwrap();
        let inep = inep.str().unwrap();
        assert_eq!(inep.get(0), Some("11000023"));
        assert_eq!(inep.get(1), Some("0"));
        assert_eq!(inep.get(2), Some("0"));

        let edicao = coerced.column(COL_EDICAO).unwrap();
        let edicao = edicao.str().unwrap();
        assert_eq!(edicao.get(0), Some("2019"));
        assert_eq!(edicao.get(1), Some("0"));
        assert_eq!(edicao.get(2), Some("0"));
    }

    #[test]
    fn invalid_metric_becomes_null_not_zero() {
        let df = DataFrame::new(vec![
            Column::new(COL_INEP.into(), ["1", "2"]),
            Column::new(COL_EDICAO.into(), ["2019", "2021"]),
            Column::new(COL_IDEB.into(), ["5.4", "n/a"]),
        ])
        .unwrap();

        let coerced = coerce(&df, COL_IDEB).unwrap();
        let metric = coerced.column(COL_IDEB).unwrap();
        let metric = metric.f64().unwrap();
        assert_eq!(metric.get(0), Some(5.4));
        assert_eq!(metric.get(1), None);
    }

    #[test]
    fn store_memoizes_by_path() {
        let path = write_temp_csv(
            "ideb_dashboard_store_test.csv",
            "INEP,ESCOLA,EDIÇÃO,ETAPA,IDEB\n11000023,ESCOLA A,2019,ANOS INICIAIS,5.4\n",
        );

        let mut store = DatasetStore::new();
        let first = store.get_or_load(&path, COL_IDEB).unwrap();
        let second = store.get_or_load(&path, COL_IDEB).unwrap();
        assert_eq!(first.height(), second.height());
        assert_eq!(store.cache.len(), 1);
    }
}
