//! Correlation kernel implementations.

use crate::candidate::peak::Peak;
use crate::template::TemplatePlan;
use crate::util::{IconLocError, IconLocResult, ImageRole};
use crate::ImageView;

/// Scan configuration for kernel evaluations.
#[derive(Clone, Copy, Debug)]
pub struct ScanParams {
    /// Inclusive lower bound on the score; windows below it are dropped.
    pub threshold: f64,
}

/// Kernel trait for scoring and scan operations.
///
/// Scans visit placements row by row and return peaks in row-major order.
pub trait Kernel {
    /// Computes the score at a single placement (top-left coordinates).
    ///
    /// Returns `None` when the window does not fit inside the image.
    fn score_at(image: ImageView<'_, u8>, plan: &TemplatePlan, x: usize, y: usize)
        -> Option<f64>;

    /// Scans the full valid placement range.
    fn scan_full(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        params: ScanParams,
    ) -> IconLocResult<Vec<Peak>> {
        let (max_x, max_y) = placement_range(image, plan)?;
        Ok(Self::scan_roi(image, plan, 0, 0, max_x, max_y, params))
    }

    /// Scans placements `x0..=x1`, `y0..=y1`, clamped to the valid range.
    #[allow(clippy::too_many_arguments)]
    fn scan_roi(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        x0: usize,
        y0: usize,
        x1: usize,
        y1: usize,
        params: ScanParams,
    ) -> Vec<Peak> {
        let (Some(max_x), Some(max_y)) = (
            image.width().checked_sub(plan.width()),
            image.height().checked_sub(plan.height()),
        ) else {
            return Vec::new();
        };
        let x1 = x1.min(max_x);
        let y1 = y1.min(max_y);
        if x0 > x1 || y0 > y1 {
            return Vec::new();
        }

        let mut peaks = Vec::new();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let Some(score) = Self::score_at(image, plan, x, y) else {
                    continue;
                };
                if score >= params.threshold {
                    peaks.push(Peak { x, y, score });
                }
            }
        }
        peaks
    }
}

/// Validates scene/template compatibility and returns the largest placement.
///
/// Placements run over `0..=max_x` and `0..=max_y`.
pub fn placement_range(
    image: ImageView<'_, u8>,
    plan: &TemplatePlan,
) -> IconLocResult<(usize, usize)> {
    if image.is_empty() {
        return Err(IconLocError::EmptyImage {
            role: ImageRole::Scene,
            width: image.width(),
            height: image.height(),
        });
    }
    if image.channels() != plan.channels() {
        return Err(IconLocError::ChannelMismatch {
            scene: image.channels(),
            template: plan.channels(),
        });
    }
    if plan.width() > image.width() || plan.height() > image.height() {
        return Err(IconLocError::InvalidDimensions {
            tpl_width: plan.width(),
            tpl_height: plan.height(),
            img_width: image.width(),
            img_height: image.height(),
        });
    }
    Ok((image.width() - plan.width(), image.height() - plan.height()))
}

pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;
