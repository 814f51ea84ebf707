//! Bar chart description, rendering and presentation surfaces.
//!
//! # Responsibility
//! - Describe one single-series bar chart per category.
//! - Render it to a standalone SVG document.
//! - Hand the rendered document to a presentation surface.
//!
//! # Invariants
//! - Rendering is a pure function of the chart description.
//! - Label and value counts must match before anything is drawn.

use crate::aggregate::series::Series;
use crate::model::requisition::Category;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod surface;
mod svg;

pub use surface::{ChartSurface, MemorySurface, SvgDirSurface};
pub use svg::render_svg;

pub const X_AXIS_LABEL: &str = "Period";
pub const Y_AXIS_LABEL: &str = "Quantity";
pub const LEGEND_TITLE: &str = "Category";

/// Fixed bar color for a category.
pub fn category_color(category: Category) -> &'static str {
    match category {
        // steelblue
        Category::GrozBeckert => "#4682b4",
        // orange
        Category::Neetex => "#ffa500",
    }
}

/// Chart-level errors.
#[derive(Debug)]
pub enum ChartError {
    /// Series cannot be drawn one bar per label.
    LengthMismatch { labels: usize, values: usize },
    /// Surface could not persist the rendered document.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for ChartError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LengthMismatch { labels, values } => write!(
                f,
                "chart has {labels} period label(s) but {values} value(s)"
            ),
            Self::Io { path, source } => {
                write!(f, "failed to write chart `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ChartError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::LengthMismatch { .. } => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Everything needed to draw one category chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarChart {
    pub title: String,
    pub series_name: String,
    pub color: &'static str,
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

impl BarChart {
    pub fn for_series(series: &Series) -> Self {
        Self {
            title: format!("Requisitions over time - {}", series.category),
            series_name: series.category.as_str().to_string(),
            color: category_color(series.category),
            labels: series
                .labels
                .iter()
                .map(|label| label.as_str().to_string())
                .collect(),
            values: series.values.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        if self.labels.len() != self.values.len() {
            return Err(ChartError::LengthMismatch {
                labels: self.labels.len(),
                values: self.values.len(),
            });
        }
        Ok(())
    }
}
