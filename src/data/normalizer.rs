//! Region Normalizer Module
//! Standardizes the region label column for the cross-region views.

use polars::prelude::*;

use super::COL_REGIAO;

/// Tokens that mark missing region labels after normalization. The mixed-case
/// "NaN" can no longer appear once the column is upper-cased; the original
/// exclusion set carried it and it is kept verbatim.
const EXCLUDED_REGION_TOKENS: [&str; 3] = ["NAN", "", "NaN"];

/// Trim and upper-case region labels, dropping rows whose label is missing
/// or one of the excluded tokens. Tables without a region column pass through
/// unchanged. Idempotent.
pub fn normalize_regions(df: &DataFrame) -> PolarsResult<DataFrame> {
    if df.column(COL_REGIAO).is_err() {
        return Ok(df.clone());
    }

    let region = df.column(COL_REGIAO)?.cast(&DataType::String)?;
    let region = region.str()?;

    let normalized: StringChunked = region
        .into_iter()
        .map(|v| v.map(|s| s.trim().to_uppercase()))
        .collect();

    let keep: BooleanChunked = (&normalized)
        .into_iter()
        .map(|v| match v {
            None => false,
            Some(s) => !EXCLUDED_REGION_TOKENS.contains(&s),
        })
        .collect();

    let mut out = df.clone();
    out.with_column(normalized.into_series().with_name(COL_REGIAO.into()))?;
    Ok(out.filter(&keep)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{COL_ESCOLA, COL_IDEB};

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Column::new(COL_ESCOLA.into(), ["A", "B", "C", "D", "E"]),
            Column::new(
                COL_REGIAO.into(),
                [Some(" norte"), Some("SUL "), Some(" nan "), Some(""), None],
            ),
            Column::new(COL_IDEB.into(), [5.0, 6.0, 7.0, 8.0, 9.0]),
        ])
        .unwrap()
    }

    #[test]
    fn trims_uppercases_and_drops_missing_tokens() {
        let normalized = normalize_regions(&sample()).unwrap();
        assert_eq!(normalized.height(), 2);

        let region = normalized.column(COL_REGIAO).unwrap();
        let region = region.str().unwrap();
        assert_eq!(region.get(0), Some("NORTE"));
        assert_eq!(region.get(1), Some("SUL"));
    }

    #[test]
    fn padded_nan_token_is_excluded() {
        let df = DataFrame::new(vec![
            Column::new(COL_ESCOLA.into(), ["A"]),
            Column::new(COL_REGIAO.into(), [" nAn "]),
        ])
        .unwrap();

        let normalized = normalize_regions(&df).unwrap();
        assert_eq!(normalized.height(), 0);
    }

    #[test]
    fn applying_twice_equals_applying_once() {
        let once = normalize_regions(&sample()).unwrap();
        let twice = normalize_regions(&once).unwrap();
        assert!(once.equals(&twice));
    }

    #[test]
    fn table_without_region_column_passes_through() {
        let df = DataFrame::new(vec![Column::new(COL_ESCOLA.into(), ["A", "B"])]).unwrap();
        let out = normalize_regions(&df).unwrap();
        assert!(df.equals(&out));
    }
}
