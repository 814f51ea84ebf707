//! Requisition repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/delete/list/aggregate APIs over `requisicoes` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `NewRequisition::validate()` before SQL mutations.
//! - Listing skips persisted rows it cannot decode and logs each one.
//! - Aggregation skips rows whose date cannot be bucketed and sums only
//!   integer-typed quantities, so totals are always integers.

use crate::aggregate::period::{Granularity, PeriodKey, PeriodTotal};
use crate::db::DbError;
use crate::model::requisition::{
    Category, EventId, NewRequisition, RequisitionEvent, Subcategory, ValidationError, DATE_FORMAT,
};
use chrono::NaiveDate;
use log::warn;
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EVENT_SELECT_SQL: &str = "SELECT
    id,
    quantidade,
    tipo,
    talao,
    data
FROM requisicoes";

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence error for requisition storage and queries.
#[derive(Debug)]
pub enum StoreError {
    Validation(ValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted requisition: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for requisition events.
pub trait RequisitionRepository {
    fn insert(&self, requisition: &NewRequisition) -> StoreResult<EventId>;
    /// Inserts all rows atomically and returns how many were written.
    fn insert_batch(&self, requisitions: &[NewRequisition]) -> StoreResult<usize>;
    /// Returns whether a row was removed.
    fn delete_by_id(&self, id: EventId) -> StoreResult<bool>;
    /// Newest rows first. Rows that cannot be decoded are left out.
    fn list_recent(&self, limit: u32) -> StoreResult<Vec<RequisitionEvent>>;
    fn sum_by_period(
        &self,
        category: Category,
        granularity: Granularity,
    ) -> StoreResult<Vec<PeriodTotal>>;
}

/// SQLite-backed requisition repository.
pub struct SqliteRequisitionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRequisitionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RequisitionRepository for SqliteRequisitionRepository<'_> {
    fn insert(&self, requisition: &NewRequisition) -> StoreResult<EventId> {
        requisition.validate()?;
        insert_row(self.conn, requisition)?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_batch(&self, requisitions: &[NewRequisition]) -> StoreResult<usize> {
        for requisition in requisitions {
            requisition.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        for requisition in requisitions {
            insert_row(&tx, requisition)?;
        }
        tx.commit()?;

        Ok(requisitions.len())
    }

    fn delete_by_id(&self, id: EventId) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM requisicoes WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn list_recent(&self, limit: u32) -> StoreResult<Vec<RequisitionEvent>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} ORDER BY id DESC LIMIT ?1;"))?;
        let mut rows = stmt.query([i64::from(limit)])?;
        let mut events = Vec::new();

        while let Some(row) = rows.next()? {
            match parse_event_row(row) {
                Ok(event) => events.push(event),
                Err(StoreError::InvalidData(reason)) => warn!(
                    "event=requisition_list module=repo status=skipped reason={}",
                    reason
                ),
                Err(err) => return Err(err),
            }
        }

        Ok(events)
    }

    fn sum_by_period(
        &self,
        category: Category,
        granularity: Granularity,
    ) -> StoreResult<Vec<PeriodTotal>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                strftime(?1, data) AS period,
                COALESCE(
                    SUM(CASE WHEN typeof(quantidade) = 'integer' THEN quantidade END),
                    0
                ) AS total
             FROM requisicoes
             WHERE tipo = ?2
               AND strftime(?1, data) IS NOT NULL
             GROUP BY period
             ORDER BY period ASC;",
        )?;
        let mut rows = stmt.query(params![granularity.strftime_pattern(), category.as_str()])?;
        let mut totals = Vec::new();

        while let Some(row) = rows.next()? {
            let period_text: String = row.get("period")?;
            let period = PeriodKey::parse(&period_text).ok_or_else(|| {
                StoreError::InvalidData(format!("invalid period key `{period_text}`"))
            })?;
            let total: i64 = row.get("total")?;
            totals.push(PeriodTotal::new(period, category, total));
        }

        Ok(totals)
    }
}

fn insert_row(conn: &Connection, requisition: &NewRequisition) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO requisicoes (
            quantidade,
            tipo,
            talao,
            data
        ) VALUES (?1, ?2, ?3, ?4);",
        params![
            i64::from(requisition.quantity),
            requisition.category.as_str(),
            requisition.subcategory.as_str(),
            requisition.occurred_on.format(DATE_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

fn parse_event_row(row: &Row<'_>) -> StoreResult<RequisitionEvent> {
    let id: EventId = row.get("id")?;

    let quantity = match row.get::<_, Value>("quantidade")? {
        Value::Integer(value) if value > 0 => u32::try_from(value).ok(),
        _ => None,
    }
    .ok_or_else(|| {
        StoreError::InvalidData(format!("row {id}: quantidade is not a positive integer"))
    })?;

    let category_text = text_column(row, "tipo")?;
    let category = Category::parse(&category_text).map_err(|_| {
        StoreError::InvalidData(format!("row {id}: unknown tipo `{category_text}`"))
    })?;

    let subcategory_text = text_column(row, "talao")?;
    let subcategory = Subcategory::parse(&subcategory_text).map_err(|_| {
        StoreError::InvalidData(format!("row {id}: unknown talao `{subcategory_text}`"))
    })?;

    let date_text = text_column(row, "data")?;
    let occurred_on = parse_stored_date(&date_text).ok_or_else(|| {
        StoreError::InvalidData(format!("row {id}: invalid data `{date_text}`"))
    })?;

    Ok(RequisitionEvent {
        id,
        quantity,
        category,
        subcategory,
        occurred_on,
    })
}

/// Text content of `column`; any other storage class reads as empty.
fn text_column(row: &Row<'_>, column: &str) -> rusqlite::Result<String> {
    Ok(match row.get::<_, Value>(column)? {
        Value::Text(text) => text,
        _ => String::new(),
    })
}

/// Legacy rows may carry a `YYYY-MM-DD HH:MM:SS` timestamp; only the date
/// prefix is significant.
fn parse_stored_date(value: &str) -> Option<NaiveDate> {
    let prefix = value.get(..10)?;
    NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::parse_stored_date;

    #[test]
    fn stored_date_accepts_legacy_timestamps() {
        assert_eq!(
            parse_stored_date("2021-06-01 00:00:00").map(|date| date.to_string()),
            Some("2021-06-01".to_string())
        );
        assert!(parse_stored_date("2021-6-1").is_none());
        assert!(parse_stored_date("").is_none());
    }
}
