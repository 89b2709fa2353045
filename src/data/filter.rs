//! Filter Engine Module
//! Exact-match filtering over the selector dimensions, edition-ordered output.

use polars::prelude::*;

use super::{COL_COMPONENTE, COL_EDICAO, COL_ESCOLA, COL_ETAPA, COL_REGIAO, TODAS};

/// A conjunctive set of exact-match constraints over the selector dimensions.
/// The "TODAS" sentinel on school or region is a no-op constraint.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    school: Option<String>,
    stage: Option<String>,
    region: Option<String>,
    edition: Option<String>,
    component: Option<String>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn school(mut self, school: &str) -> Self {
        if school != TODAS {
            self.school = Some(school.to_string());
        }
        self
    }

    pub fn stage(mut self, stage: &str) -> Self {
        self.stage = Some(stage.to_string());
        self
    }

    pub fn region(mut self, region: &str) -> Self {
        if region != TODAS {
            self.region = Some(region.to_string());
        }
        self
    }

    pub fn edition(mut self, edition: &str) -> Self {
        self.edition = Some(edition.to_string());
        self
    }

    pub fn component(mut self, component: &str) -> Self {
        self.component = Some(component.to_string());
        self
    }

    fn constraints(&self) -> Vec<(&'static str, &String)> {
        let mut out = Vec::new();
        if let Some(v) = &self.school {
            out.push((COL_ESCOLA, v));
        }
        if let Some(v) = &self.stage {
            out.push((COL_ETAPA, v));
        }
        if let Some(v) = &self.region {
            out.push((COL_REGIAO, v));
        }
        if let Some(v) = &self.edition {
            out.push((COL_EDICAO, v));
        }
        if let Some(v) = &self.component {
            out.push((COL_COMPONENTE, v));
        }
        out
    }

    /// Apply the constraints and sort the result by the integer value of the
    /// edition string. An empty result is a valid outcome, not an error.
    pub fn apply(&self, df: &DataFrame) -> PolarsResult<DataFrame> {
        let mut lazy = df.clone().lazy();

        for (column, value) in self.constraints() {
            lazy = lazy.filter(col(column).eq(lit(value.as_str())));
        }

        lazy.sort_by_exprs(
            [col(COL_EDICAO).cast(DataType::Int64)],
            SortMultipleOptions::default(),
        )
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::COL_IDEB;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Column::new(COL_ESCOLA.into(), ["A", "A", "B", "B"]),
            Column::new(
                COL_ETAPA.into(),
                [
                    "ANOS INICIAIS",
                    "ANOS INICIAIS",
                    "ANOS INICIAIS",
                    "ANOS FINAIS",
                ],
            ),
            Column::new(COL_EDICAO.into(), ["2021", "2019", "2019", "2021"]),
            Column::new(COL_IDEB.into(), [6.5, 5.0, 4.8, 5.9]),
        ])
        .unwrap()
    }

    #[test]
    fn conjunctive_constraints_match_all_dimensions() {
        let filtered = FilterSpec::new()
            .school("A")
            .stage("ANOS INICIAIS")
            .apply(&sample())
            .unwrap();

        assert_eq!(filtered.height(), 2);
        let school = filtered.column(COL_ESCOLA).unwrap();
        let school = school.str().unwrap();
        assert!(school.into_iter().all(|v| v == Some("A")));
    }

    #[test]
    fn todas_sentinel_is_a_noop_constraint() {
        let df = sample();
        let all = FilterSpec::new()
            .school(TODAS)
            .stage("ANOS INICIAIS")
            .apply(&df)
            .unwrap();
        let restricted = FilterSpec::new().stage("ANOS INICIAIS").apply(&df).unwrap();
        assert_eq!(all.height(), restricted.height());
    }

    #[test]
    fn result_is_sorted_by_integer_edition() {
        let filtered = FilterSpec::new().school("A").apply(&sample()).unwrap();
        let editions = filtered.column(COL_EDICAO).unwrap();
        let editions = editions.str().unwrap();
        assert_eq!(editions.get(0), Some("2019"));
        assert_eq!(editions.get(1), Some("2021"));
    }

    #[test]
    fn filter_and_complement_partition_the_table() {
        let df = sample();
        let a = FilterSpec::new().school("A").apply(&df).unwrap();
        let b = FilterSpec::new().school("B").apply(&df).unwrap();
        assert_eq!(a.height() + b.height(), df.height());
    }

    #[test]
    fn empty_result_is_valid() {
        let filtered = FilterSpec::new().school("Z").apply(&sample()).unwrap();
        assert_eq!(filtered.height(), 0);
    }
}
