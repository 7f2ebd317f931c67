//! Raw window placements produced by the kernels.

use std::cmp::Ordering;

/// Window placement in scene space whose score passed the threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// X coordinate (column) of the window's top-left corner.
    pub x: usize,
    /// Y coordinate (row) of the window's top-left corner.
    pub y: usize,
    /// NCC score of the window.
    pub score: f64,
}

fn peak_cmp_row_major(a: &Peak, b: &Peak) -> Ordering {
    a.y.cmp(&b.y).then_with(|| a.x.cmp(&b.x))
}

/// Sorts peaks by row, then column; the order every scan strategy reports in.
pub(crate) fn sort_peaks_row_major(peaks: &mut [Peak]) {
    peaks.sort_unstable_by(peak_cmp_row_major);
}
