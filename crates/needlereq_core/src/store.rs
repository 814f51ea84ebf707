//! Event store gateway.
//!
//! # Responsibility
//! - Expose insert/delete/list/aggregate operations against one database
//!   file chosen at construction.
//! - Acquire a connection per operation and release it before returning.
//!
//! # Invariants
//! - No connection outlives a single call.
//! - Read paths never create a database file that does not exist yet.
//! - Write paths create the file and table on demand.

use crate::aggregate::period::{Granularity, PeriodTotal};
use crate::db::open_db;
use crate::model::requisition::{Category, EventId, NewRequisition, RequisitionEvent};
use crate::repo::requisition_repo::{
    RequisitionRepository, SqliteRequisitionRepository, StoreResult,
};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Location of the requisition database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

/// Gateway over the requisition table.
#[derive(Debug, Clone)]
pub struct EventStore {
    config: StoreConfig,
}

impl EventStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn db_path(&self) -> &Path {
        &self.config.db_path
    }

    /// Whether the backing file has been created yet.
    pub fn exists(&self) -> bool {
        self.config.db_path.exists()
    }

    /// Appends one requisition and returns its new id.
    pub fn insert(&self, requisition: &NewRequisition) -> StoreResult<EventId> {
        let started_at = Instant::now();
        let result = self.with_repo(|repo| repo.insert(requisition));
        match &result {
            Ok(id) => info!(
                "event=requisition_insert module=store status=ok id={} category={} duration_ms={}",
                id,
                requisition.category.slug(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=requisition_insert module=store status=error category={} error={}",
                requisition.category.slug(),
                err
            ),
        }
        result
    }

    /// Inserts many requisitions in a single transaction.
    pub fn insert_batch(&self, requisitions: &[NewRequisition]) -> StoreResult<usize> {
        let result = self.with_repo(|repo| repo.insert_batch(requisitions));
        if let Ok(count) = &result {
            info!(
                "event=requisition_insert_batch module=store status=ok count={}",
                count
            );
        }
        result
    }

    /// Removes the row with `id`. Missing ids are a no-op.
    pub fn delete_by_id(&self, id: EventId) -> StoreResult<()> {
        if !self.exists() {
            return Ok(());
        }
        let removed = self.with_repo(|repo| repo.delete_by_id(id)).map_err(|err| {
            error!(
                "event=requisition_delete module=store status=error id={} error={}",
                id, err
            );
            err
        })?;
        info!(
            "event=requisition_delete module=store status=ok id={} removed={}",
            id, removed
        );
        Ok(())
    }

    /// Most recently inserted rows, newest first.
    pub fn list_recent(&self, limit: u32) -> StoreResult<Vec<RequisitionEvent>> {
        if !self.exists() || limit == 0 {
            return Ok(Vec::new());
        }
        self.with_repo(|repo| repo.list_recent(limit))
    }

    /// Quantity totals of `category` per period, ascending by period.
    pub fn sum_by_period(
        &self,
        category: Category,
        granularity: Granularity,
    ) -> StoreResult<Vec<PeriodTotal>> {
        if !self.exists() {
            return Ok(Vec::new());
        }
        self.with_repo(|repo| repo.sum_by_period(category, granularity))
    }

    fn with_repo<T>(
        &self,
        op: impl FnOnce(&SqliteRequisitionRepository<'_>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let conn = open_db(&self.config.db_path)?;
        let repo = SqliteRequisitionRepository::new(&conn);
        op(&repo)
    }
}
