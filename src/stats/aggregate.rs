//! Aggregator Module
//! Group means with school counts, and the per-group summary statistics table.

use polars::prelude::*;

use crate::data::{COL_EDICAO, COL_ESCOLA};

/// Output column names of [`aggregate_by`].
pub const COL_MEDIA: &str = "MEDIA";
pub const COL_QTD_ESCOLAS: &str = "QTD_ESCOLAS";

fn group_sort_key(group_col: &str) -> Expr {
    // Editions compare by integer value, not lexically
    if group_col == COL_EDICAO {
        col(group_col).cast(DataType::Int64)
    } else {
        col(group_col)
    }
}

/// One row per distinct group value with the metric mean (2 decimals) and the
/// count of distinct schools. `group_col` is the region column in comparison
/// mode or the edition column in single-region trend mode. Null metric values
/// are ignored by the mean.
pub fn aggregate_by(df: &DataFrame, group_col: &str, metric_col: &str) -> PolarsResult<DataFrame> {
    df.clone()
        .lazy()
        .group_by([col(group_col)])
        .agg([
            col(metric_col).mean().round(2).alias(COL_MEDIA),
            col(COL_ESCOLA).n_unique().alias(COL_QTD_ESCOLAS),
        ])
        .sort_by_exprs([group_sort_key(group_col)], SortMultipleOptions::default())
        .collect()
}

/// Per-group descriptive statistics over the selected dimension tuple
/// (edition×stage, or edition×stage×component): school count, mean, min, max
/// and sample standard deviation, rounded to `decimals` places. The standard
/// deviation of a single-row group is null. Rows come out sorted by the
/// grouping columns, editions by integer value.
pub fn summary_stats(
    df: &DataFrame,
    group_cols: &[&str],
    metric_col: &str,
    decimals: u32,
) -> PolarsResult<DataFrame> {
    let groups: Vec<Expr> = group_cols.iter().map(|c| col(*c)).collect();
    let sort_keys: Vec<Expr> = group_cols.iter().map(|c| group_sort_key(c)).collect();

    df.clone()
        .lazy()
        .group_by(groups)
        .agg([
            col(COL_ESCOLA).count().alias("Qtd Escolas"),
            col(metric_col).mean().round(decimals).alias("Média"),
            col(metric_col).min().round(decimals).alias("Mínimo"),
            col(metric_col).max().round(decimals).alias("Máximo"),
            col(metric_col).std(1).round(decimals).alias("Desvio Padrão"),
        ])
        .sort_by_exprs(sort_keys, SortMultipleOptions::default())
        .collect()
}
