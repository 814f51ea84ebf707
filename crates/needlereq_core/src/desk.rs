//! Command handlers invoked by UI adapters.
//!
//! # Responsibility
//! - Turn user actions (submit, delete, filter change) into store calls.
//! - Re-render every category chart after each mutation.
//!
//! # Invariants
//! - Deletion runs gate check, then listing, then delete, then refresh,
//!   strictly in that order. A delete is only accepted while a deletion
//!   listing opened by a successful gate check is active, and each
//!   listing allows one delete.
//! - A failed validation, gate check or empty selection never touches the
//!   store.
//! - A failed refresh after a successful write is reported, but the write
//!   is kept.

use crate::aggregate::period::Granularity;
use crate::aggregate::series::{build_series, Series, SeriesOptions};
use crate::chart::{render_svg, BarChart, ChartError, ChartSurface};
use crate::config::AppConfig;
use crate::gate::{AuthError, DeleteGate};
use crate::model::requisition::{
    Category, EventId, RequisitionEvent, RequisitionForm, ValidationError,
};
use crate::repo::requisition_repo::StoreError;
use crate::store::EventStore;
use log::{info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure of one user-triggered command.
#[derive(Debug)]
pub enum CommandError {
    Validation(ValidationError),
    Store(StoreError),
    Auth(AuthError),
    /// Delete requested without a chosen row.
    EmptySelection,
    /// Delete requested without a gate-checked deletion listing.
    DeletionLocked,
    Chart(ChartError),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "storage failure: {err}"),
            Self::Auth(err) => write!(f, "{err}"),
            Self::EmptySelection => write!(f, "no requisition selected for deletion"),
            Self::DeletionLocked => {
                write!(f, "deletion is locked; enter the deletion password first")
            }
            Self::Chart(err) => write!(f, "chart refresh failed: {err}"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Auth(err) => Some(err),
            Self::EmptySelection | Self::DeletionLocked => None,
            Self::Chart(err) => Some(err),
        }
    }
}

impl From<ValidationError> for CommandError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for CommandError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

impl From<AuthError> for CommandError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<ChartError> for CommandError {
    fn from(value: ChartError) -> Self {
        Self::Chart(value)
    }
}

/// Requisition desk: store, gate and charts behind plain method calls.
pub struct RequisitionDesk<S: ChartSurface> {
    store: EventStore,
    gate: DeleteGate,
    options: SeriesOptions,
    granularity: BTreeMap<Category, Granularity>,
    surface: S,
    deletion_open: bool,
}

impl<S: ChartSurface> RequisitionDesk<S> {
    pub fn new(store: EventStore, gate: DeleteGate, options: SeriesOptions, surface: S) -> Self {
        Self {
            store,
            gate,
            options,
            granularity: BTreeMap::new(),
            surface,
            deletion_open: false,
        }
    }

    pub fn from_config(config: &AppConfig, surface: S) -> Self {
        Self::new(
            config.store(),
            config.delete_gate(),
            config.series_options(),
            surface,
        )
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Current bucketing for `category`; yearly until changed.
    pub fn granularity(&self, category: Category) -> Granularity {
        self.granularity
            .get(&category)
            .copied()
            .unwrap_or_default()
    }

    /// Validates and stores one form entry, then refreshes all charts.
    pub fn submit(&mut self, form: &RequisitionForm) -> Result<EventId, CommandError> {
        let requisition = form.parse().map_err(|err| {
            warn!(
                "event=requisition_submit module=desk status=rejected reason={}",
                err
            );
            err
        })?;
        let id = self.store.insert(&requisition)?;
        self.refresh_all()?;
        Ok(id)
    }

    /// Checks the secret and lists rows the user may pick for deletion.
    /// On success the deletion listing stays open for one delete.
    pub fn open_deletion(
        &mut self,
        secret: &str,
        limit: u32,
    ) -> Result<Vec<RequisitionEvent>, CommandError> {
        self.deletion_open = false;
        self.gate.check(secret)?;
        let rows = self.store.list_recent(limit)?;
        self.deletion_open = true;
        Ok(rows)
    }

    /// Whether a gate-checked deletion listing is active.
    pub fn deletion_open(&self) -> bool {
        self.deletion_open
    }

    /// Dismisses the deletion listing without deleting.
    pub fn close_deletion(&mut self) {
        self.deletion_open = false;
    }

    /// Deletes the chosen row from the open listing, then refreshes all
    /// charts. An empty selection keeps the listing open.
    pub fn delete_selected(&mut self, selection: Option<EventId>) -> Result<(), CommandError> {
        if !self.deletion_open {
            warn!("event=requisition_delete module=desk status=rejected reason=locked");
            return Err(CommandError::DeletionLocked);
        }
        let id = selection.ok_or(CommandError::EmptySelection)?;
        self.deletion_open = false;
        self.store.delete_by_id(id)?;
        self.refresh_all()
    }

    /// Gate check and deletion in one step, for adapters that pass the
    /// chosen id together with the secret.
    pub fn delete_with_secret(
        &mut self,
        secret: &str,
        selection: Option<EventId>,
    ) -> Result<(), CommandError> {
        self.deletion_open = false;
        self.gate.check(secret)?;
        self.deletion_open = true;
        let result = self.delete_selected(selection);
        self.deletion_open = false;
        result
    }

    /// Filter change for one category tab.
    pub fn set_granularity(
        &mut self,
        category: Category,
        granularity: Granularity,
    ) -> Result<(), CommandError> {
        self.granularity.insert(category, granularity);
        self.refresh(category)
    }

    /// Re-renders every category chart.
    pub fn refresh_all(&mut self) -> Result<(), CommandError> {
        for category in Category::ALL {
            self.refresh(category)?;
        }
        Ok(())
    }

    /// Aggregated series for `category` at its current granularity.
    pub fn series(&self, category: Category) -> Result<Series, CommandError> {
        let granularity = self.granularity(category);
        let rows = self.store.sum_by_period(category, granularity)?;
        let series = build_series(&rows, category, &self.options);
        info!(
            "event=series_build module=desk status=ok category={} granularity={} periods={} values={}",
            category.slug(),
            granularity,
            series.labels.len(),
            series.values.len()
        );
        Ok(series)
    }

    /// Renders `category` without presenting it.
    pub fn chart(&self, category: Category) -> Result<String, CommandError> {
        let series = self.series(category)?;
        Ok(render_svg(&BarChart::for_series(&series))?)
    }

    fn refresh(&mut self, category: Category) -> Result<(), CommandError> {
        let svg = self.chart(category)?;
        self.surface.present(category, &svg)?;
        Ok(())
    }
}
