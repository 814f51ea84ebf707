//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose requisition entry, deletion and chart calls to Dart via FRB.
//! - Translate core errors into envelope messages the UI can show as-is.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call receives the database path explicitly; no process-wide
//!   database handle is kept.
//! - Secrets are never echoed back in messages.

use needlereq_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppConfig, Category, CommandError, Granularity, MemorySurface, RequisitionDesk,
    RequisitionEvent, RequisitionForm, DATE_FORMAT,
};
use log::warn;
use std::path::Path;

const LIST_DEFAULT_LIMIT: u32 = 20;
const LIST_LIMIT_MAX: u32 = 200;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), Path::new(log_dir.trim())) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One stored requisition as shown in the deletion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequisitionItem {
    pub id: i64,
    pub quantity: u32,
    pub category: String,
    pub subcategory: String,
    /// `YYYY-MM-DD`.
    pub date: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Row id for successful inserts.
    pub id: Option<i64>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<i64>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Recent-rows response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequisitionListResponse {
    pub ok: bool,
    pub items: Vec<RequisitionItem>,
    pub message: String,
    /// Effective applied limit.
    pub applied_limit: u32,
}

/// Chart response envelope: rendered SVG plus the plotted series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartResponse {
    pub ok: bool,
    pub svg: String,
    pub labels: Vec<String>,
    pub values: Vec<i64>,
    pub message: String,
}

/// Validates and stores one requisition entered in the form.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - All fields arrive as raw text; validation happens in core.
/// - Creates the database file on first successful insert.
#[flutter_rust_bridge::frb(sync)]
pub fn requisition_insert(
    db_path: String,
    quantity: String,
    category: String,
    subcategory: String,
    date: String,
) -> ActionResponse {
    let form = RequisitionForm {
        quantity,
        category,
        subcategory,
        date,
    };
    let mut desk = match desk_for(&db_path) {
        Ok(desk) => desk,
        Err(message) => return ActionResponse::failure(message),
    };
    match desk.submit(&form) {
        Ok(id) => ActionResponse::success("Requisition saved.", Some(id)),
        Err(err) => ActionResponse::failure(command_message("requisition_insert", &err)),
    }
}

/// Lists the newest requisitions for the deletion dialog, newest first.
///
/// # FFI contract
/// - The deletion secret is checked first; a wrong secret returns
///   `ok=false` with no rows and the dialog must not open.
/// - `limit`: `None` or `0` means 20; values above 200 are clamped.
/// - A missing database file yields an empty list, not an error.
#[flutter_rust_bridge::frb(sync)]
pub fn requisition_list_recent(
    db_path: String,
    secret: String,
    limit: Option<u32>,
) -> RequisitionListResponse {
    let applied_limit = normalize_list_limit(limit);
    let mut desk = match desk_for(&db_path) {
        Ok(desk) => desk,
        Err(message) => {
            return RequisitionListResponse {
                ok: false,
                items: Vec::new(),
                message,
                applied_limit,
            }
        }
    };
    match desk.open_deletion(&secret, applied_limit) {
        Ok(rows) => {
            let items: Vec<RequisitionItem> = rows.iter().map(to_item).collect();
            let message = if items.is_empty() {
                "No requisitions.".to_string()
            } else {
                format!("Found {} requisition(s).", items.len())
            };
            RequisitionListResponse {
                ok: true,
                items,
                message,
                applied_limit,
            }
        }
        Err(err) => RequisitionListResponse {
            ok: false,
            items: Vec::new(),
            message: command_message("requisition_list_recent", &err),
            applied_limit,
        },
    }
}

/// Deletes one requisition after checking the deletion secret.
///
/// # FFI contract
/// - Wrong secret and missing selection fail without touching the store.
/// - Deleting an id that no longer exists succeeds.
#[flutter_rust_bridge::frb(sync)]
pub fn requisition_delete(db_path: String, secret: String, id: Option<i64>) -> ActionResponse {
    let mut desk = match desk_for(&db_path) {
        Ok(desk) => desk,
        Err(message) => return ActionResponse::failure(message),
    };
    match desk.delete_with_secret(&secret, id) {
        Ok(()) => ActionResponse::success("Requisition deleted.", id),
        Err(err) => ActionResponse::failure(command_message("requisition_delete", &err)),
    }
}

/// Renders one category chart at the requested granularity.
///
/// # FFI contract
/// - `category`: display name or slug (`Neetex`, `groz-beckert`, ...).
/// - `granularity`: `yearly|monthly`; empty means yearly.
/// - `ok=false` when the series cannot be drawn; labels and values are
///   still returned so the UI can show them.
#[flutter_rust_bridge::frb(sync)]
pub fn requisition_chart(db_path: String, category: String, granularity: String) -> ChartResponse {
    let category = match Category::parse(&category) {
        Ok(category) => category,
        Err(err) => return chart_failure(err.to_string()),
    };
    let granularity = if granularity.trim().is_empty() {
        Granularity::default()
    } else {
        match Granularity::parse(&granularity) {
            Some(value) => value,
            None => {
                return chart_failure(format!("unknown granularity `{}`", granularity.trim()))
            }
        }
    };
    let mut desk = match desk_for(&db_path) {
        Ok(desk) => desk,
        Err(message) => return chart_failure(message),
    };
    // Only the requested category is re-rendered here.
    if let Err(err) = desk.set_granularity(category, granularity) {
        let mut response = chart_failure(command_message("requisition_chart", &err));
        if let Ok(series) = desk.series(category) {
            response.labels = series.labels.iter().map(ToString::to_string).collect();
            response.values = series.values;
        }
        return response;
    }

    let svg = desk
        .surface()
        .latest(category)
        .map(str::to_owned)
        .unwrap_or_default();
    match desk.series(category) {
        Ok(series) => ChartResponse {
            ok: true,
            svg,
            labels: series.labels.iter().map(ToString::to_string).collect(),
            values: series.values,
            message: format!("{} ({granularity})", category.as_str()),
        },
        Err(err) => chart_failure(command_message("requisition_chart", &err)),
    }
}

fn desk_for(db_path: &str) -> Result<RequisitionDesk<MemorySurface>, String> {
    let db_path = db_path.trim();
    if db_path.is_empty() {
        return Err("db_path must not be empty".to_string());
    }
    let mut config = AppConfig::load(None).map_err(|err| format!("config load failed: {err}"))?;
    config.db_path = db_path.into();
    Ok(RequisitionDesk::from_config(&config, MemorySurface::new()))
}

fn command_message(operation: &str, err: &CommandError) -> String {
    warn!("event=ffi_call module=ffi status=error op={operation}");
    match err {
        CommandError::Validation(_)
        | CommandError::Auth(_)
        | CommandError::EmptySelection
        | CommandError::DeletionLocked => err.to_string(),
        CommandError::Store(_) | CommandError::Chart(_) => format!("{operation} failed: {err}"),
    }
}

fn chart_failure(message: String) -> ChartResponse {
    ChartResponse {
        ok: false,
        svg: String::new(),
        labels: Vec::new(),
        values: Vec::new(),
        message,
    }
}

fn normalize_list_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => LIST_DEFAULT_LIMIT,
        Some(value) if value > LIST_LIMIT_MAX => LIST_LIMIT_MAX,
        Some(value) => value,
    }
}

fn to_item(event: &RequisitionEvent) -> RequisitionItem {
    RequisitionItem {
        id: event.id,
        quantity: event.quantity,
        category: event.category.as_str().to_string(),
        subcategory: event.subcategory.as_str().to_string(),
        date: event.occurred_on.format(DATE_FORMAT).to_string(),
    }
}
