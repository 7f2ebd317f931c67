//! Search strategies for locating template matches.
//!
//! `IconLocator` drives the NCC kernels over the full placement range, either
//! densely or tile by tile, and turns peaks into labelled matches.

mod locator;
pub mod offset;
pub mod tile;

pub use locator::{IconLocator, LocateReport, OutcomeStatus, TemplateOutcome};

use crate::candidate::peak::Peak;

/// How the placement range is traversed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanStrategy {
    /// Every placement in one row-major sweep.
    Dense,
    /// Disjoint rectangles of placements; same result as `Dense`.
    Tiled {
        tile_width: usize,
        tile_height: usize,
    },
}

/// Which point of the matched window a `Match` reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Anchor {
    /// Top-left corner of the window.
    #[default]
    TopLeft,
    /// `(x + w / 2, y + h / 2)` with integer division.
    Center,
}

/// Configuration for [`IconLocator`].
#[derive(Clone, Debug)]
pub struct LocateConfig {
    /// Inclusive lower bound on the NCC score (range about `[-1, 1]`).
    pub threshold: f64,
    pub strategy: ScanStrategy,
    pub anchor: Anchor,
    /// Scan rows or tiles on the rayon pool (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for LocateConfig {
    fn default() -> Self {
        Self {
            threshold: 0.9,
            strategy: ScanStrategy::Dense,
            anchor: Anchor::TopLeft,
            parallel: false,
        }
    }
}

/// Labelled match in scene (or offset) coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Match {
    /// Label of the template that matched.
    pub label: String,
    pub x: i64,
    pub y: i64,
    /// NCC score of the window.
    pub score: f64,
}

impl Match {
    pub fn new(label: impl Into<String>, x: i64, y: i64, score: f64) -> Self {
        Self {
            label: label.into(),
            x,
            y,
            score,
        }
    }

    /// Converts a kernel peak for a `tpl_width` x `tpl_height` template.
    pub fn from_peak(
        label: &str,
        peak: Peak,
        anchor: Anchor,
        tpl_width: usize,
        tpl_height: usize,
    ) -> Self {
        let (x, y) = match anchor {
            Anchor::TopLeft => (peak.x, peak.y),
            Anchor::Center => (peak.x + tpl_width / 2, peak.y + tpl_height / 2),
        };
        Self::new(label, x as i64, y as i64, peak.score)
    }
}
