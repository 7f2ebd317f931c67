//! Template plan precomputation for normalized cross-correlation.

use crate::image::ImageView;
use crate::util::{IconLocError, IconLocResult, ImageRole};

/// Added to both standard deviations so flat patches never divide by zero.
///
/// It also caps a self-match at `σ²/(σ+ε)²`: below 1 by about `2ε/σ`, which
/// stays under 1e-6 only for templates with `σ ≥ 2`.
pub const NCC_EPSILON: f64 = 1e-6;

/// Variance at or below which a patch is treated as flat.
pub(crate) const FLAT_VARIANCE: f64 = 1e-9;

/// Precomputed statistics and normalized buffer for NCC scanning.
///
/// Stores `(T - mean(T)) / (std(T) + ε)` in row-major order with channels
/// interleaved, so a window dot product only needs the raw scene values.
#[derive(Clone, Debug)]
pub struct TemplatePlan {
    width: usize,
    height: usize,
    channels: usize,
    mean: f64,
    std: f64,
    normalized: Vec<f64>,
    normalized_sum: f64,
}

impl TemplatePlan {
    /// Builds a plan from a template view.
    pub fn from_view(tpl: ImageView<'_, u8>) -> IconLocResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let channels = tpl.channels();
        if tpl.is_empty() {
            return Err(IconLocError::EmptyImage {
                role: ImageRole::Template,
                width,
                height,
            });
        }
        let count = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(channels))
            .ok_or(IconLocError::InvalidInput("template size overflows usize"))?;

        let mut values = Vec::with_capacity(count);
        for y in 0..height {
            let row = tpl.row(y).ok_or(IconLocError::BufferTooSmall {
                needed: y * tpl.stride() + width * channels,
                got: tpl.as_slice().len(),
            })?;
            values.extend(row.iter().map(|&v| f64::from(v)));
        }

        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        let std = variance.sqrt();

        let inv = 1.0 / (std + NCC_EPSILON);
        let normalized: Vec<f64> = values.iter().map(|v| (v - mean) * inv).collect();
        let normalized_sum = normalized.iter().sum();

        Ok(Self {
            width,
            height,
            channels,
            mean,
            std,
            normalized,
            normalized_sum,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of scalar samples (`width * height * channels`).
    pub fn len(&self) -> usize {
        self.normalized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    /// Mean over all pixels and channels.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation over all pixels and channels.
    pub fn std(&self) -> f64 {
        self.std
    }

    /// True when the template has (numerically) zero variance.
    pub fn is_flat(&self) -> bool {
        self.std * self.std <= FLAT_VARIANCE
    }

    /// Normalized template samples in row-major order.
    pub fn normalized(&self) -> &[f64] {
        &self.normalized
    }

    /// Normalized samples of template row `ty`.
    pub(crate) fn row(&self, ty: usize) -> &[f64] {
        let row_len = self.width * self.channels;
        &self.normalized[ty * row_len..(ty + 1) * row_len]
    }

    /// Sum of the normalized samples; zero up to rounding.
    pub(crate) fn normalized_sum(&self) -> f64 {
        self.normalized_sum
    }
}

#[cfg(test)]
mod tests {
    use super::{TemplatePlan, NCC_EPSILON};
    use crate::image::ImageView;
    use crate::util::{IconLocError, ImageRole};

    #[test]
    fn plan_matches_known_stats() {
        let data = [0u8, 1, 2, 3];
        let plan = TemplatePlan::from_view(ImageView::from_slice(&data, 2, 2).unwrap()).unwrap();
        assert!((plan.mean() - 1.5).abs() < 1e-12);
        assert!((plan.std() - 1.25f64.sqrt()).abs() < 1e-12);
        let inv = 1.0 / (1.25f64.sqrt() + NCC_EPSILON);
        for (value, expected) in plan.normalized().iter().zip([-1.5, -0.5, 0.5, 1.5]) {
            assert!((value - expected * inv).abs() < 1e-12);
        }
        assert!(!plan.is_flat());
    }

    #[test]
    fn flat_template_is_accepted() {
        let data = [200u8; 9];
        let plan = TemplatePlan::from_view(ImageView::from_slice(&data, 3, 3).unwrap()).unwrap();
        assert!(plan.is_flat());
        assert!(plan.normalized().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn empty_template_is_rejected() {
        let err = TemplatePlan::from_view(ImageView::<u8>::from_slice(&[], 0, 3).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            IconLocError::EmptyImage {
                role: ImageRole::Template,
                width: 0,
                height: 3,
            }
        );
    }
}
