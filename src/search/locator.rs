//! Sliding-window icon locator.

use crate::candidate::peak::{sort_peaks_row_major, Peak};
use crate::kernel::scalar::NccScalar;
use crate::kernel::{placement_range, Kernel, ScanParams};
use crate::search::tile::tile_placements;
use crate::search::{LocateConfig, Match, ScanStrategy};
use crate::template::{Template, TemplatePlan, TemplateSet};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{IconLocError, IconLocResult, ImageRole};
use crate::ImageView;

/// Finds every placement of a template whose NCC score meets the threshold.
///
/// Overlapping placements around one real icon are all reported; clustering
/// them is left to the caller (see [`crate::suppress_overlapping`]).
#[derive(Clone, Debug, Default)]
pub struct IconLocator {
    config: LocateConfig,
}

/// Result of one template within [`IconLocator::locate_all`].
#[derive(Clone, Debug, PartialEq)]
pub enum OutcomeStatus {
    /// The scan completed with this many matches (possibly zero).
    Matched(usize),
    /// The template could not be scanned.
    Failed(IconLocError),
}

/// Per-template outcome, in template-set order.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateOutcome {
    pub label: String,
    pub status: OutcomeStatus,
}

/// Matches of all templates plus what happened to each template.
#[derive(Clone, Debug, Default)]
pub struct LocateReport {
    /// Concatenated matches, grouped by template in set order.
    pub matches: Vec<Match>,
    pub outcomes: Vec<TemplateOutcome>,
}

impl LocateReport {
    /// Iterates `(label, error)` for templates that failed.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &IconLocError)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            OutcomeStatus::Failed(err) => Some((o.label.as_str(), err)),
            OutcomeStatus::Matched(_) => None,
        })
    }

    /// True when every template was scanned.
    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }
}

impl IconLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: LocateConfig) -> Self {
        self.config = config;
        self
    }

    /// Scans `scene` for `template` and returns passing placements row-major.
    ///
    /// Fails with `EmptyImage` for zero-sized inputs, `ChannelMismatch` when
    /// channel counts differ and `InvalidDimensions` when the template does not
    /// fit. No passing window is an empty `Ok`.
    ///
    /// An exact copy of the template scores `σ²/(σ+ε)²`, about `1 - 2ε/σ` for
    /// template standard deviation `σ` (see [`crate::lowlevel::NCC_EPSILON`]).
    /// That is within 1e-6 of 1 once `σ ≥ 2`; a 0/1 binary template sits near
    /// `1 - 4e-6`, so keep thresholds for such templates a little below 1.
    pub fn locate(
        &self,
        scene: ImageView<'_, u8>,
        template: &Template,
    ) -> IconLocResult<Vec<Peak>> {
        if scene.is_empty() {
            return Err(IconLocError::EmptyImage {
                role: ImageRole::Scene,
                width: scene.width(),
                height: scene.height(),
            });
        }
        let plan = TemplatePlan::from_view(template.view())?;
        self.locate_plan(scene, &plan)
    }

    /// Same as [`IconLocator::locate`] for an already built plan.
    pub fn locate_plan(
        &self,
        scene: ImageView<'_, u8>,
        plan: &TemplatePlan,
    ) -> IconLocResult<Vec<Peak>> {
        let threshold = self.config.threshold;
        if threshold.is_nan() {
            return Err(IconLocError::InvalidThreshold { threshold });
        }
        let (max_x, max_y) = placement_range(scene, plan)?;
        let params = ScanParams { threshold };

        let _span = trace_span!(
            "locate",
            tpl_width = plan.width(),
            tpl_height = plan.height(),
            windows = (max_x + 1) * (max_y + 1)
        )
        .entered();

        let peaks = match self.config.strategy {
            ScanStrategy::Dense => self.scan_dense(scene, plan, max_x, max_y, params),
            ScanStrategy::Tiled {
                tile_width,
                tile_height,
            } => self.scan_tiled(
                scene,
                plan,
                (max_x, max_y),
                (tile_width, tile_height),
                params,
            ),
        };

        trace_event!("locate_peaks", count = peaks.len());
        Ok(peaks)
    }

    /// Runs [`IconLocator::locate`] for every template in set order.
    ///
    /// Per-template failures are recorded in the report instead of aborting
    /// the remaining templates.
    pub fn locate_all(&self, scene: ImageView<'_, u8>, templates: &TemplateSet) -> LocateReport {
        let _span = trace_span!("locate_all", templates = templates.len()).entered();

        let mut report = LocateReport::default();
        for (label, template) in templates.iter() {
            let status = match self.locate(scene, template) {
                Ok(peaks) => {
                    let count = peaks.len();
                    report.matches.extend(peaks.into_iter().map(|peak| {
                        Match::from_peak(
                            label,
                            peak,
                            self.config.anchor,
                            template.width(),
                            template.height(),
                        )
                    }));
                    trace_event!("template_matched", label = label, count = count);
                    OutcomeStatus::Matched(count)
                }
                Err(err) => {
                    trace_warn!(
                        "template_failed",
                        label = label,
                        reason = err.to_string().as_str()
                    );
                    OutcomeStatus::Failed(err)
                }
            };
            report.outcomes.push(TemplateOutcome {
                label: label.to_owned(),
                status,
            });
        }
        report
    }

    fn scan_dense(
        &self,
        scene: ImageView<'_, u8>,
        plan: &TemplatePlan,
        max_x: usize,
        max_y: usize,
        params: ScanParams,
    ) -> Vec<Peak> {
        #[cfg(feature = "rayon")]
        if self.config.parallel {
            return crate::kernel::rayon::scan_rows_par::<NccScalar>(
                scene, plan, max_x, max_y, params,
            );
        }
        NccScalar::scan_roi(scene, plan, 0, 0, max_x, max_y, params)
    }

    fn scan_tiled(
        &self,
        scene: ImageView<'_, u8>,
        plan: &TemplatePlan,
        (max_x, max_y): (usize, usize),
        (tile_width, tile_height): (usize, usize),
        params: ScanParams,
    ) -> Vec<Peak> {
        let tiles = tile_placements(max_x, max_y, tile_width, tile_height);
        trace_event!("tiles", count = tiles.len());

        #[cfg(feature = "rayon")]
        let mut peaks = if self.config.parallel {
            crate::kernel::rayon::scan_tiles_par::<NccScalar>(scene, plan, &tiles, params)
        } else {
            scan_tiles_seq(scene, plan, &tiles, params)
        };
        #[cfg(not(feature = "rayon"))]
        let mut peaks = scan_tiles_seq(scene, plan, &tiles, params);

        sort_peaks_row_major(&mut peaks);
        peaks
    }
}

fn scan_tiles_seq(
    scene: ImageView<'_, u8>,
    plan: &TemplatePlan,
    tiles: &[crate::search::tile::Tile],
    params: ScanParams,
) -> Vec<Peak> {
    let mut peaks = Vec::new();
    for tile in tiles {
        peaks.extend(NccScalar::scan_roi(
            scene, plan, tile.x0, tile.y0, tile.x1, tile.y1, params,
        ));
    }
    peaks
}
