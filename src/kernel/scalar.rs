//! Scalar NCC kernels.
//!
//! `NccScalar` is the production kernel: one pass over the window accumulating
//! `Σr`, `Σr²` and `Σr·t̂` against the precomputed normalized template.
//! `NccTwoPass` evaluates the textbook formula literally (window mean first,
//! then normalized products) and serves as the brute-force reference.

use crate::kernel::Kernel;
use crate::template::plan::{FLAT_VARIANCE, NCC_EPSILON};
use crate::template::TemplatePlan;
use crate::ImageView;

/// Single-pass NCC kernel.
pub struct NccScalar;

/// Two-pass NCC kernel used as the brute-force reference.
pub struct NccTwoPass;

/// Score of a zero-variance window.
///
/// A flat window centres to all zeros, so its correlation with any template is
/// zero. The one exception is a flat template with the same level, where both
/// patches are identical.
fn flat_window_score(window_mean: f64, plan: &TemplatePlan) -> f64 {
    if plan.is_flat() && (window_mean - plan.mean()).abs() <= FLAT_VARIANCE.sqrt() {
        1.0
    } else {
        0.0
    }
}

fn window_row<'a>(
    image: &ImageView<'a, u8>,
    plan: &TemplatePlan,
    x: usize,
    y: usize,
) -> Option<&'a [u8]> {
    let c = plan.channels();
    let row = image.row(y)?;
    row.get(x * c..(x + plan.width()) * c)
}

impl Kernel for NccScalar {
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        x: usize,
        y: usize,
    ) -> Option<f64> {
        if image.channels() != plan.channels() {
            return None;
        }

        let mut dot = 0.0f64;
        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        for ty in 0..plan.height() {
            let pixels = window_row(&image, plan, x, y + ty)?;
            for (&value, &t) in pixels.iter().zip(plan.row(ty)) {
                let v = f64::from(value);
                dot += v * t;
                sum += v;
                sum_sq += v * v;
            }
        }

        let n = plan.len() as f64;
        let mean = sum / n;
        let variance = (sum_sq / n - mean * mean).max(0.0);
        if variance <= FLAT_VARIANCE {
            return Some(flat_window_score(mean, plan));
        }

        // Σ (r - mean) t̂ = Σ r t̂ - mean Σ t̂
        let centred_dot = dot - mean * plan.normalized_sum();
        Some(centred_dot / ((variance.sqrt() + NCC_EPSILON) * n))
    }
}

impl Kernel for NccTwoPass {
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        x: usize,
        y: usize,
    ) -> Option<f64> {
        if image.channels() != plan.channels() {
            return None;
        }

        let mut window = Vec::with_capacity(plan.len());
        for ty in 0..plan.height() {
            let pixels = window_row(&image, plan, x, y + ty)?;
            window.extend(pixels.iter().map(|&v| f64::from(v)));
        }

        let n = window.len() as f64;
        let mean = window.iter().sum::<f64>() / n;
        let variance = window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        if variance <= FLAT_VARIANCE {
            return Some(flat_window_score(mean, plan));
        }

        let inv_std = 1.0 / (variance.sqrt() + NCC_EPSILON);
        let total: f64 = window
            .iter()
            .zip(plan.normalized())
            .map(|(r, t)| (r - mean) * inv_std * t)
            .sum();
        Some(total / n)
    }
}
