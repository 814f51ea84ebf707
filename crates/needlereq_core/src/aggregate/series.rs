//! Aligns grouped period totals into one chartable series.
//!
//! # Invariants
//! - `labels` is sorted ascending and holds at most `max_periods` keys.
//! - Labels are drawn from every category in the input, values only from
//!   the requested category.
//! - Output depends only on the input rows and options.

use super::period::{PeriodKey, PeriodTotal};
use crate::model::requisition::Category;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Default number of most recent periods shown per chart.
pub const DEFAULT_MAX_PERIODS: usize = 10;

/// What to emit for a label the requested category has no row for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPeriods {
    /// Emit nothing. `values` may end up shorter than `labels`.
    #[default]
    Omit,
    /// Emit `0` so `values` always lines up with `labels`.
    ZeroFill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesOptions {
    pub max_periods: usize,
    pub missing: MissingPeriods,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            max_periods: DEFAULT_MAX_PERIODS,
            missing: MissingPeriods::default(),
        }
    }
}

/// Chart-ready series for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    pub category: Category,
    pub labels: Vec<PeriodKey>,
    pub values: Vec<i64>,
}

impl Series {
    /// Whether every label has exactly one value.
    pub fn is_aligned(&self) -> bool {
        self.labels.len() == self.values.len()
    }
}

/// Builds the series for `category` from grouped rows.
pub fn build_series(rows: &[PeriodTotal], category: Category, options: &SeriesOptions) -> Series {
    let periods: BTreeSet<&PeriodKey> = rows.iter().map(|row| &row.period).collect();
    let skip = periods.len().saturating_sub(options.max_periods);
    let labels: Vec<PeriodKey> = periods.into_iter().skip(skip).cloned().collect();

    let mut totals: BTreeMap<&PeriodKey, i64> = BTreeMap::new();
    for row in rows.iter().filter(|row| row.category == category) {
        *totals.entry(&row.period).or_insert(0) += row.total;
    }

    let values = labels
        .iter()
        .filter_map(|label| match (totals.get(label), options.missing) {
            (Some(total), _) => Some(*total),
            (None, MissingPeriods::ZeroFill) => Some(0),
            (None, MissingPeriods::Omit) => None,
        })
        .collect();

    Series {
        category,
        labels,
        values,
    }
}
