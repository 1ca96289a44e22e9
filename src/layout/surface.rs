//! Reference layout surface.
//!
//! Stacks text blocks vertically and breaks them into lines with the
//! crate's own line breaker. Hosts with a real text engine implement
//! [`LayoutSurface`] themselves; the CLI and the tests use this one.

use crate::font::{StandardMetrics, TextMetrics};
use crate::model::{TextBlock, UnitContent};
use crate::text::{self, BrokenLine};

use super::LayoutSurface;

/// A layout surface backed by [`TextMetrics`].
///
/// Content is measured once, when it is added; relayout only sums.
#[derive(Debug, Clone)]
pub struct FlowSurface<M: TextMetrics = StandardMetrics> {
    metrics: M,
    item_heights: Vec<f64>,
    height: f64,
}

impl FlowSurface<StandardMetrics> {
    pub fn new() -> Self {
        Self::with_metrics(StandardMetrics)
    }
}

impl Default for FlowSurface<StandardMetrics> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: TextMetrics> FlowSurface<M> {
    pub fn with_metrics(metrics: M) -> Self {
        Self {
            metrics,
            item_heights: Vec::new(),
            height: 0.0,
        }
    }

    /// Lines `block` wraps into at `available_width`.
    pub fn lines(&self, block: &TextBlock, available_width: f64) -> Vec<BrokenLine> {
        text::break_into_lines(
            &self.metrics,
            &block.content,
            available_width,
            block.style.font_size,
            block.style.bold,
        )
    }

    fn natural_height(&self, content: &UnitContent, available_width: f64) -> f64 {
        content
            .blocks()
            .iter()
            .map(|block| text::text_height(&self.metrics, &block.content, available_width, &block.style))
            .sum()
    }
}

impl<M: TextMetrics> LayoutSurface for FlowSurface<M> {
    fn clear(&mut self) {
        self.item_heights.clear();
    }

    fn add(&mut self, content: &UnitContent, forced_height: Option<f64>, available_width: f64) {
        let height =
            forced_height.unwrap_or_else(|| self.natural_height(content, available_width));
        self.item_heights.push(height);
    }

    fn invalidate_and_relayout(&mut self) {
        self.height = self.item_heights.iter().sum();
    }

    fn measured_height(&self) -> f64 {
        self.height
    }
}
