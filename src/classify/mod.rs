//! Colour-rule icon classification.
//!
//! A cheaper, rule-based alternative to NCC for map markers drawn as a dark
//! ring around a coloured glyph: every dark pixel seeds a square neighbourhood
//! whose gold, brown and white pixel counts decide the icon kind. The rules
//! are tuned for one marker style and carry no similarity score.

use crate::image::ImageView;
use crate::search::Match;
use crate::trace::{trace_event, trace_span};
use crate::util::{IconLocError, IconLocResult};
use std::ops::RangeInclusive;

/// Marker kinds the colour rules can tell apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IconKind {
    Arrow,
    Ladder,
    Bench,
}

impl IconKind {
    pub fn label(self) -> &'static str {
        match self {
            IconKind::Arrow => "arrow",
            IconKind::Ladder => "ladder",
            IconKind::Bench => "bench",
        }
    }
}

/// Axis-aligned box in RGB space, bounds inclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbBox {
    pub r: RangeInclusive<u8>,
    pub g: RangeInclusive<u8>,
    pub b: RangeInclusive<u8>,
}

impl RgbBox {
    pub fn contains(&self, px: &[u8]) -> bool {
        match px {
            [r, g, b, ..] => self.r.contains(r) && self.g.contains(g) && self.b.contains(b),
            _ => false,
        }
    }
}

/// Colour classes and decision thresholds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorRules {
    pub black: RgbBox,
    pub gold: RgbBox,
    pub brown: RgbBox,
    pub white: RgbBox,
    /// Side of the square neighbourhood centred on a seed pixel.
    pub region_size: usize,
    /// Seeds closer than this to the border are ignored.
    pub margin: usize,
    /// More gold pixels than this is an arrow.
    pub arrow_min_gold: usize,
    /// More white than `ladder_min_white` and fewer brown than
    /// `ladder_max_brown` is a ladder.
    pub ladder_min_white: usize,
    pub ladder_max_brown: usize,
    /// More brown than `bench_min_brown` and fewer white than
    /// `bench_max_white` is a bench.
    pub bench_min_brown: usize,
    pub bench_max_white: usize,
}

impl Default for ColorRules {
    fn default() -> Self {
        Self {
            black: RgbBox {
                r: 0..=79,
                g: 0..=79,
                b: 0..=79,
            },
            gold: RgbBox {
                r: 151..=255,
                g: 131..=255,
                b: 0..=79,
            },
            brown: RgbBox {
                r: 81..=159,
                g: 51..=119,
                b: 0..=59,
            },
            white: RgbBox {
                r: 181..=255,
                g: 181..=255,
                b: 181..=255,
            },
            region_size: 24,
            margin: 10,
            arrow_min_gold: 150,
            ladder_min_white: 200,
            ladder_max_brown: 50,
            bench_min_brown: 120,
            bench_max_white: 120,
        }
    }
}

/// Pixel counts per colour class within a region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorCounts {
    pub black: usize,
    pub gold: usize,
    pub brown: usize,
    pub white: usize,
}

/// Counts pixels of each colour class; the classes may overlap.
pub fn count_colors(region: ImageView<'_, u8>, rules: &ColorRules) -> ColorCounts {
    let mut counts = ColorCounts::default();
    let c = region.channels();
    for y in 0..region.height() {
        let Some(row) = region.row(y) else { continue };
        for px in row.chunks_exact(c) {
            counts.black += usize::from(rules.black.contains(px));
            counts.gold += usize::from(rules.gold.contains(px));
            counts.brown += usize::from(rules.brown.contains(px));
            counts.white += usize::from(rules.white.contains(px));
        }
    }
    counts
}

/// Applies the decision rules to pre-computed counts, first rule wins.
pub fn classify_counts(counts: ColorCounts, rules: &ColorRules) -> Option<IconKind> {
    if counts.gold > rules.arrow_min_gold {
        return Some(IconKind::Arrow);
    }
    if counts.white > rules.ladder_min_white && counts.brown < rules.ladder_max_brown {
        return Some(IconKind::Ladder);
    }
    if counts.brown > rules.bench_min_brown && counts.white < rules.bench_max_white {
        return Some(IconKind::Bench);
    }
    None
}

/// Classifies a region by its colour counts.
pub fn classify_region(region: ImageView<'_, u8>, rules: &ColorRules) -> Option<IconKind> {
    classify_counts(count_colors(region, rules), rules)
}

/// Counts colour classes in the `size` square starting at `(x0, y0)`.
///
/// Parts of the square outside the scene count as black `[0, 0, 0]` pixels.
fn count_padded(
    scene: ImageView<'_, u8>,
    x0: i64,
    y0: i64,
    size: usize,
    rules: &ColorRules,
) -> ColorCounts {
    let clip = |start: i64, len: usize| {
        let lo = start.clamp(0, len as i64) as usize;
        let hi = (start + size as i64).clamp(0, len as i64) as usize;
        (lo, hi)
    };
    let (cx0, cx1) = clip(x0, scene.width());
    let (cy0, cy1) = clip(y0, scene.height());

    let mut counts = match scene.roi(cx0, cy0, cx1 - cx0, cy1 - cy0) {
        Ok(inside) => count_colors(inside, rules),
        Err(_) => ColorCounts::default(),
    };
    let padded = size * size - (cx1 - cx0) * (cy1 - cy0);
    if padded > 0 {
        const PAD: [u8; 3] = [0, 0, 0];
        counts.black += padded * usize::from(rules.black.contains(&PAD));
        counts.gold += padded * usize::from(rules.gold.contains(&PAD));
        counts.brown += padded * usize::from(rules.brown.contains(&PAD));
        counts.white += padded * usize::from(rules.white.contains(&PAD));
    }
    counts
}

/// Scans the scene for dark seed pixels and classifies their neighbourhoods.
///
/// Matches carry the seed coordinates, the kind's label and score `1.0`.
/// Neighbouring seeds on the same ring yield repeated matches, as with NCC.
/// A neighbourhood crossing the scene border is padded with black pixels.
pub fn scan_color_markers(
    scene: ImageView<'_, u8>,
    rules: &ColorRules,
) -> IconLocResult<Vec<Match>> {
    if scene.channels() < 3 {
        return Err(IconLocError::InvalidChannels {
            channels: scene.channels(),
        });
    }
    if rules.region_size == 0 {
        return Err(IconLocError::InvalidInput("region_size must be positive"));
    }

    let _span = trace_span!("scan_color_markers", width = scene.width(), height = scene.height())
        .entered();

    let half = (rules.region_size / 2) as i64;
    let mut matches = Vec::new();
    for y in rules.margin..scene.height().saturating_sub(rules.margin) {
        for x in rules.margin..scene.width().saturating_sub(rules.margin) {
            let Some(px) = scene.get(x, y) else { continue };
            if !rules.black.contains(px) {
                continue;
            }
            let (x, y) = (x as i64, y as i64);
            let counts = count_padded(scene, x - half, y - half, rules.region_size, rules);
            if let Some(kind) = classify_counts(counts, rules) {
                matches.push(Match::new(kind.label(), x, y, 1.0));
            }
        }
    }

    trace_event!("color_markers", count = matches.len());
    Ok(matches)
}
