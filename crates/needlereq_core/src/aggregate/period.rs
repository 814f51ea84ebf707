//! Period keys and bucketing granularity.
//!
//! # Invariants
//! - A `PeriodKey` is either `YYYY` or `YYYY-MM`, zero padded, so plain
//!   string ordering is chronological ordering.

use crate::model::requisition::Category;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

static PERIOD_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}(-(0[1-9]|1[0-2]))?$").expect("valid period key regex"));

/// Bucketing resolution for aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    #[default]
    Yearly,
    Monthly,
}

impl Granularity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yearly => "yearly",
            Self::Monthly => "monthly",
        }
    }

    /// `strftime` pattern that turns an ISO date column into this bucket.
    pub fn strftime_pattern(self) -> &'static str {
        match self {
            Self::Yearly => "%Y",
            Self::Monthly => "%Y-%m",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yearly" | "year" => Some(Self::Yearly),
            "monthly" | "month" => Some(Self::Monthly),
            _ => None,
        }
    }
}

impl Display for Granularity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time bucket label, `YYYY` or `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodKey(String);

impl PeriodKey {
    /// Accepts only well-formed year or year-month keys.
    pub fn parse(value: &str) -> Option<Self> {
        PERIOD_KEY_RE
            .is_match(value)
            .then(|| Self(value.to_string()))
    }

    /// Buckets a date at the given granularity.
    pub fn from_date(date: NaiveDate, granularity: Granularity) -> Self {
        Self(date.format(granularity.strftime_pattern()).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PeriodKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Summed quantity of one category within one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotal {
    pub period: PeriodKey,
    pub category: Category,
    pub total: i64,
}

impl PeriodTotal {
    pub fn new(period: PeriodKey, category: Category, total: i64) -> Self {
        Self {
            period,
            category,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Granularity, PeriodKey};
    use chrono::NaiveDate;

    #[test]
    fn period_key_accepts_year_and_year_month_only() {
        assert!(PeriodKey::parse("2021").is_some());
        assert!(PeriodKey::parse("2021-07").is_some());
        assert!(PeriodKey::parse("2021-13").is_none());
        assert!(PeriodKey::parse("2021-7").is_none());
        assert!(PeriodKey::parse("21").is_none());
        assert!(PeriodKey::parse("").is_none());
    }

    #[test]
    fn from_date_zero_pads_months() {
        let date = NaiveDate::from_ymd_opt(2021, 6, 1).expect("valid date");
        assert_eq!(PeriodKey::from_date(date, Granularity::Yearly).as_str(), "2021");
        assert_eq!(
            PeriodKey::from_date(date, Granularity::Monthly).as_str(),
            "2021-06"
        );
    }

    #[test]
    fn granularity_parse_is_case_insensitive() {
        assert_eq!(Granularity::parse("Monthly"), Some(Granularity::Monthly));
        assert_eq!(Granularity::parse(" year "), Some(Granularity::Yearly));
        assert_eq!(Granularity::parse("weekly"), None);
    }
}
