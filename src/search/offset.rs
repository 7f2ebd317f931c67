//! Calibration offsets between coordinate spaces.

use crate::search::Match;
use std::ops::Neg;

/// Fixed translation added to every reported coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Offset {
    pub dx: i64,
    pub dy: i64,
}

impl Offset {
    pub const fn new(dx: i64, dy: i64) -> Self {
        Self { dx, dy }
    }
}

impl Neg for Offset {
    type Output = Offset;

    fn neg(self) -> Offset {
        Offset::new(-self.dx, -self.dy)
    }
}

/// Returns copies of `matches` shifted by `offset`.
///
/// No bounds checks: shifted coordinates may leave the scene when the offset
/// maps into a larger or differently cropped frame.
pub fn apply_offset(matches: &[Match], offset: Offset) -> Vec<Match> {
    matches
        .iter()
        .map(|m| Match {
            x: m.x + offset.dx,
            y: m.y + offset.dy,
            ..m.clone()
        })
        .collect()
}
