//! Skip-to-boundary navigation over valid cut points

use crate::annotation::{Segment, Tag};
use crate::engine::VirtualTimeline;

/// Navigation configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationConfig {
    /// Tolerance in seconds around the current position. A cut point closer
    /// than this is skipped over, so repeated skips make progress.
    pub margin: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self { margin: 0.5 }
    }
}

/// Next/previous lookup over a snapshot's cut points
#[derive(Debug, Clone)]
pub struct Navigator {
    cut_points: Vec<f64>,
    config: NavigationConfig,
}

impl Navigator {
    /// Creates a navigator from the timeline's valid cut points
    pub fn new(
        timeline: &VirtualTimeline,
        segments: &[Segment],
        tags: &[Tag],
        config: NavigationConfig,
    ) -> Self {
        Self::from_cut_points(timeline.valid_cut_points(segments, tags), config)
    }

    /// Creates a navigator from cut points in any order
    pub fn from_cut_points(mut cut_points: Vec<f64>, config: NavigationConfig) -> Self {
        cut_points.sort_by(f64::total_cmp);
        cut_points.dedup();
        Self { cut_points, config }
    }

    /// Returns the cut points, ascending
    pub fn cut_points(&self) -> &[f64] {
        &self.cut_points
    }

    /// Returns the configuration in use
    pub fn config(&self) -> NavigationConfig {
        self.config
    }

    /// First cut point beyond `current + margin`, if any
    pub fn next(&self, current: f64) -> Option<f64> {
        let threshold = current + self.config.margin;
        self.cut_points.iter().copied().find(|&p| p > threshold)
    }

    /// Last cut point before `current - margin`, or the start of the
    /// recording when there is none
    pub fn previous(&self, current: f64) -> f64 {
        let threshold = current - self.config.margin;
        self.cut_points
            .iter()
            .rev()
            .copied()
            .find(|&p| p < threshold)
            .unwrap_or(0.0)
    }
}
