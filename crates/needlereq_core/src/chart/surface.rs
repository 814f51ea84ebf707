//! Presentation surfaces for rendered charts.
//!
//! A surface receives the full document on every refresh and replaces
//! whatever it showed before for that category.

use super::ChartError;
use crate::model::requisition::Category;
use log::debug;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Destination for rendered chart documents.
pub trait ChartSurface {
    fn present(&mut self, category: Category, svg: &str) -> Result<(), ChartError>;
}

/// Writes `<dir>/<category-slug>.svg`, overwriting the previous render.
#[derive(Debug, Clone)]
pub struct SvgDirSurface {
    dir: PathBuf,
}

impl SvgDirSurface {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn chart_path(&self, category: Category) -> PathBuf {
        self.dir.join(format!("{}.svg", category.slug()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ChartSurface for SvgDirSurface {
    fn present(&mut self, category: Category, svg: &str) -> Result<(), ChartError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| ChartError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.chart_path(category);
        std::fs::write(&path, svg).map_err(|source| ChartError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(
            "event=chart_present module=chart status=ok category={} path={}",
            category.slug(),
            path.display()
        );
        Ok(())
    }
}

/// Keeps the latest document per category in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    charts: BTreeMap<Category, String>,
    presentations: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self, category: Category) -> Option<&str> {
        self.charts.get(&category).map(String::as_str)
    }

    /// Total number of documents presented so far.
    pub fn presentations(&self) -> usize {
        self.presentations
    }
}

impl ChartSurface for MemorySurface {
    fn present(&mut self, category: Category, svg: &str) -> Result<(), ChartError> {
        self.charts.insert(category, svg.to_string());
        self.presentations += 1;
        Ok(())
    }
}
