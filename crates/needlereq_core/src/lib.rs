//! Core domain logic for NeedleReq.
//! This crate is the single source of truth for requisition storage,
//! aggregation and chart rendering. It has no UI toolkit dependency.

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod db;
pub mod desk;
pub mod gate;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod store;

pub use aggregate::period::{Granularity, PeriodKey, PeriodTotal};
pub use aggregate::series::{
    build_series, MissingPeriods, Series, SeriesOptions, DEFAULT_MAX_PERIODS,
};
pub use chart::{
    category_color, render_svg, BarChart, ChartError, ChartSurface, MemorySurface, SvgDirSurface,
};
pub use config::{AppConfig, ConfigError};
pub use desk::{CommandError, RequisitionDesk};
pub use gate::{AuthError, DeleteGate, DEFAULT_DELETE_SECRET};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::requisition::{
    parse_date, parse_quantity, Category, EventId, DATE_FORMAT, NewRequisition, RequisitionEvent,
    RequisitionForm, Subcategory, ValidationError,
};
pub use repo::requisition_repo::{
    RequisitionRepository, SqliteRequisitionRepository, StoreError, StoreResult,
};
pub use seed::{seed_random, SeedPlan};
pub use store::{EventStore, StoreConfig};

/// Minimal health-check API for adapter smoke tests.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
