//! Renderer double that writes a placeholder file.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use join_core::{ChartSummary, RenderError, RenderedChart, ReportRenderer};

/// Writes a small placeholder file per call, or fails on demand.
#[derive(Debug)]
pub struct StaticRenderer {
    output_dir: Option<PathBuf>,
    calls: AtomicUsize,
}

impl StaticRenderer {
    /// Create a renderer that writes into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: Some(output_dir.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a renderer whose every call fails.
    pub fn failing() -> Self {
        Self {
            output_dir: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of render calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportRenderer for StaticRenderer {
    async fn render(&self, summary: &ChartSummary) -> Result<RenderedChart, RenderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);

        let Some(dir) = &self.output_dir else {
            return Err(RenderError::Image("mock render failure".to_string()));
        };

        let path = dir.join(format!("chart_{}_{}.png", summary.group_id, n));
        tokio::fs::write(&path, format!("{} members", summary.total)).await?;
        Ok(RenderedChart { path })
    }

    fn name(&self) -> &str {
        "StaticRenderer"
    }
}
