//! Report renderer collaborator.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of approved members in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Data handed to a [`ReportRenderer`] for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSummary {
    pub group_id: String,
    /// Categories sorted by count, largest first.
    pub categories: Vec<CategoryCount>,
    pub total: usize,
    /// Earliest and latest acceptance time, minute precision.
    pub time_range: Option<(String, String)>,
}

impl ChartSummary {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// An image produced by a renderer. The file is owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChart {
    pub path: PathBuf,
}

/// Errors from chart rendering. Callers degrade to a text-only notice.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Nothing to draw.
    #[error("no records for group {0}")]
    Empty(String),

    /// The renderer is turned off.
    #[error("rendering disabled")]
    Disabled,

    /// Reading assets or writing the image failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding or decoding failed.
    #[error("image error: {0}")]
    Image(String),

    /// The background render task did not complete.
    #[error("render task failed: {0}")]
    Task(String),
}

/// Produces a visual summary of a group's acceptance categories.
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    async fn render(&self, summary: &ChartSummary) -> Result<RenderedChart, RenderError>;

    /// Name for logging.
    fn name(&self) -> &str;
}
