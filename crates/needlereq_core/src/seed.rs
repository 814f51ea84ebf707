//! Random sample data for demos and load checks.
//!
//! Quantities are uniform in `1..=100`, category and subcategory are uniform
//! over their sets, dates are uniform over an inclusive range.

use crate::model::requisition::{
    Category, NewRequisition, Subcategory, ValidationError, DATE_FORMAT,
};
use crate::repo::requisition_repo::StoreResult;
use crate::store::EventStore;
use chrono::{Days, NaiveDate};
use rand::Rng;

const MAX_SEED_QUANTITY: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPlan {
    pub count: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SeedPlan {
    /// `count` rows dated between 2020-01-01 and 2023-12-31.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default(),
        }
    }

    pub fn with_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = start;
        self.end = end;
        self
    }
}

/// Generates the rows described by `plan` without storing them.
pub fn generate<R: Rng + ?Sized>(
    plan: &SeedPlan,
    rng: &mut R,
) -> Result<Vec<NewRequisition>, ValidationError> {
    if plan.end < plan.start {
        return Err(ValidationError::InvalidDate(format!(
            "{}..{}",
            plan.start.format(DATE_FORMAT),
            plan.end.format(DATE_FORMAT)
        )));
    }
    let span_days = u64::try_from((plan.end - plan.start).num_days()).unwrap_or(0);

    let rows = (0..plan.count)
        .map(|_| {
            let offset = rng.gen_range(0..=span_days);
            NewRequisition {
                quantity: rng.gen_range(1..=MAX_SEED_QUANTITY),
                category: Category::ALL[rng.gen_range(0..Category::ALL.len())],
                subcategory: Subcategory::ALL[rng.gen_range(0..Subcategory::ALL.len())],
                occurred_on: plan
                    .start
                    .checked_add_days(Days::new(offset))
                    .unwrap_or(plan.end),
            }
        })
        .collect();
    Ok(rows)
}

/// Inserts `plan.count` random rows in one transaction.
pub fn seed_random<R: Rng + ?Sized>(
    store: &EventStore,
    plan: &SeedPlan,
    rng: &mut R,
) -> StoreResult<usize> {
    let rows = generate(plan, rng)?;
    store.insert_batch(&rows)
}

#[cfg(test)]
mod tests {
    use super::{generate, SeedPlan};
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_rows_respect_plan_bounds() {
        let start = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2021, 3, 31).unwrap();
        let plan = SeedPlan::new(500).with_range(start, end);
        let mut rng = StdRng::seed_from_u64(7);

        let rows = generate(&plan, &mut rng).unwrap();
        assert_eq!(rows.len(), 500);
        for row in &rows {
            assert!((1..=100).contains(&row.quantity));
            assert!(row.occurred_on >= start && row.occurred_on <= end);
        }
    }

    #[test]
    fn same_seed_generates_same_rows() {
        let plan = SeedPlan::new(50);
        let first = generate(&plan, &mut StdRng::seed_from_u64(42)).unwrap();
        let second = generate(&plan, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_reversed_range() {
        let plan = SeedPlan::new(1).with_range(
            NaiveDate::from_ymd_opt(2022, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        );
        assert!(generate(&plan, &mut StdRng::seed_from_u64(1)).is_err());
    }
}
