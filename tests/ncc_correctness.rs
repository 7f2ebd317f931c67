use iconloc::lowlevel::{Kernel, NccTwoPass, ScanParams, TemplatePlan};
use iconloc::{IconLocError, IconLocator, ImageRole, ImageView, LocateConfig, Peak, Template};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn locator(threshold: f64) -> IconLocator {
    IconLocator::new().with_config(LocateConfig {
        threshold,
        ..LocateConfig::default()
    })
}

fn random_image(seed: u64, width: usize, height: usize, channels: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..width * height * channels)
        .map(|_| rng.random_range(0..=255))
        .collect()
}

fn crop(
    image: &[u8],
    width: usize,
    channels: usize,
    x0: usize,
    y0: usize,
    w: usize,
    h: usize,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(w * h * channels);
    for y in 0..h {
        let start = ((y0 + y) * width + x0) * channels;
        out.extend_from_slice(&image[start..start + w * channels]);
    }
    out
}

fn positions(peaks: &[Peak]) -> Vec<(usize, usize)> {
    peaks.iter().map(|p| (p.x, p.y)).collect()
}

/// 10x10 zeros with a 3x3 block of 200 at (2, 2)..=(4, 4).
fn block_scene() -> Vec<u8> {
    let mut scene = vec![0u8; 100];
    for y in 2..=4 {
        for x in 2..=4 {
            scene[y * 10 + x] = 200;
        }
    }
    scene
}

#[test]
fn flat_block_is_found_exactly_once() {
    let scene = block_scene();
    let view = ImageView::from_slice(&scene, 10, 10).unwrap();
    let tpl = Template::new(vec![200u8; 9], 3, 3).unwrap();

    let peaks = locator(0.99).locate(view, &tpl).unwrap();
    assert_eq!(positions(&peaks), vec![(2, 2)]);
    assert!((peaks[0].score - 1.0).abs() < 1e-6);
}

#[test]
fn flat_block_on_empty_scene_yields_no_matches() {
    let scene = vec![0u8; 100];
    let view = ImageView::from_slice(&scene, 10, 10).unwrap();
    let tpl = Template::new(vec![200u8; 9], 3, 3).unwrap();

    let peaks = locator(0.99).locate(view, &tpl).unwrap();
    assert!(peaks.is_empty());
}

#[test]
fn self_match_scores_one_rgb() {
    let (width, height, channels) = (32, 32, 3);
    let image = random_image(123, width, height, channels);
    let (x0, y0, w, h) = (7, 9, 11, 9);
    let tpl_data = crop(&image, width, channels, x0, y0, w, h);
    let tpl = Template::with_channels(tpl_data, w, h, channels).unwrap();

    let view = ImageView::from_interleaved(&image, width, height, channels).unwrap();
    let peaks = locator(0.999).locate(view, &tpl).unwrap();
    let hit = peaks
        .iter()
        .find(|p| (p.x, p.y) == (x0, y0))
        .expect("self match reported");
    assert!((hit.score - 1.0).abs() < 1e-6, "score {}", hit.score);
}

#[test]
fn self_match_scores_one_gray() {
    let (width, height) = (40, 30);
    let image = random_image(7, width, height, 1);
    let (x0, y0, w, h) = (25, 3, 6, 8);
    let tpl = Template::new(crop(&image, width, 1, x0, y0, w, h), w, h).unwrap();

    let view = ImageView::from_slice(&image, width, height).unwrap();
    let peaks = locator(0.999).locate(view, &tpl).unwrap();
    assert_eq!(positions(&peaks), vec![(x0, y0)]);
    assert!((peaks[0].score - 1.0).abs() < 1e-6);
}

#[test]
fn score_is_invariant_to_brightness_and_contrast() {
    let (width, height) = (24, 24);
    let image = random_image(99, width, height, 1);
    let (x0, y0, w, h) = (10, 12, 7, 5);
    // t' = t / 2 + 40 keeps the pattern linear in the scene values
    let tpl_data: Vec<u8> = crop(&image, width, 1, x0, y0, w, h)
        .into_iter()
        .map(|v| v / 2 + 40)
        .collect();
    let tpl = Template::new(tpl_data, w, h).unwrap();

    let view = ImageView::from_slice(&image, width, height).unwrap();
    let peaks = locator(0.99).locate(view, &tpl).unwrap();
    assert!(peaks.iter().any(|p| (p.x, p.y) == (x0, y0)));
}

#[test]
fn every_placement_is_evaluated_once() {
    let (width, height) = (13, 11);
    let image = random_image(5, width, height, 1);
    let tpl = Template::new(random_image(6, 4, 3, 1), 4, 3).unwrap();
    let view = ImageView::from_slice(&image, width, height).unwrap();

    let peaks = locator(f64::NEG_INFINITY).locate(view, &tpl).unwrap();
    assert_eq!(peaks.len(), (width - 4 + 1) * (height - 3 + 1));

    let mut seen = positions(&peaks);
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), peaks.len());
}

#[test]
fn single_placement_when_sizes_match() {
    let image = random_image(8, 5, 4, 3);
    let tpl = Template::with_channels(image.clone(), 5, 4, 3).unwrap();
    let view = ImageView::from_interleaved(&image, 5, 4, 3).unwrap();
    let peaks = locator(0.5).locate(view, &tpl).unwrap();
    assert_eq!(positions(&peaks), vec![(0, 0)]);
}

#[test]
fn matches_two_pass_reference() {
    let (width, height, channels) = (21, 17, 3);
    let image = random_image(11, width, height, channels);
    let tpl_data = random_image(12, 5, 4, channels);
    let tpl = Template::with_channels(tpl_data, 5, 4, channels).unwrap();
    let view = ImageView::from_interleaved(&image, width, height, channels).unwrap();

    let all = locator(f64::NEG_INFINITY).locate(view, &tpl).unwrap();
    let plan = TemplatePlan::from_view(tpl.view()).unwrap();
    let reference = NccTwoPass::scan_full(
        view,
        &plan,
        ScanParams {
            threshold: f64::NEG_INFINITY,
        },
    )
    .unwrap();

    assert_eq!(positions(&all), positions(&reference));
    for (fast, slow) in all.iter().zip(&reference) {
        assert!((fast.score - slow.score).abs() < 1e-9);
    }
}

#[test]
fn higher_threshold_returns_subset() {
    let (width, height) = (30, 30);
    let image = random_image(21, width, height, 1);
    let tpl = Template::new(crop(&image, width, 1, 4, 4, 5, 5), 5, 5).unwrap();
    let view = ImageView::from_slice(&image, width, height).unwrap();

    let thresholds = [-1.0, -0.2, 0.0, 0.3, 0.6, 0.9, 1.0];
    let sets: Vec<Vec<(usize, usize)>> = thresholds
        .iter()
        .map(|&t| positions(&locator(t).locate(view, &tpl).unwrap()))
        .collect();
    for pair in sets.windows(2) {
        let (low, high) = (&pair[0], &pair[1]);
        assert!(high.len() <= low.len());
        assert!(high.iter().all(|p| low.contains(p)));
    }
    // every score is at most 1, so nothing passes above it
    assert!(positions(&locator(1.0 + 1e-3).locate(view, &tpl).unwrap()).is_empty());
}

#[test]
fn flat_template_scores_are_finite() {
    let (width, height) = (16, 12);
    let image = random_image(31, width, height, 1);
    let view = ImageView::from_slice(&image, width, height).unwrap();
    let tpl = Template::new(vec![77u8; 12], 4, 3).unwrap();

    let peaks = locator(f64::NEG_INFINITY).locate(view, &tpl).unwrap();
    assert_eq!(peaks.len(), 13 * 10);
    assert!(peaks.iter().all(|p| p.score.is_finite()));
}

#[test]
fn flat_window_scores_zero_against_textured_template() {
    let scene = vec![42u8; 64];
    let view = ImageView::from_slice(&scene, 8, 8).unwrap();
    let tpl = Template::new(vec![0, 50, 100, 150], 2, 2).unwrap();
    let peaks = locator(f64::NEG_INFINITY).locate(view, &tpl).unwrap();
    assert!(peaks.iter().all(|p| p.score == 0.0));
}

#[test]
fn template_larger_than_scene_is_rejected() {
    let scene = vec![0u8; 20];
    let view = ImageView::from_slice(&scene, 5, 4).unwrap();

    let wide = Template::new(random_image(1, 6, 2, 1), 6, 2).unwrap();
    let err = locator(0.5).locate(view, &wide).unwrap_err();
    assert_eq!(
        err,
        IconLocError::InvalidDimensions {
            tpl_width: 6,
            tpl_height: 2,
            img_width: 5,
            img_height: 4,
        }
    );

    let tall = Template::new(random_image(2, 2, 5, 1), 2, 5).unwrap();
    let err = locator(0.5).locate(view, &tall).unwrap_err();
    assert!(matches!(err, IconLocError::InvalidDimensions { .. }));
}

#[test]
fn empty_inputs_are_rejected() {
    let tpl = Template::new(vec![1, 2, 3, 4], 2, 2).unwrap();
    let empty_scene = ImageView::<u8>::from_slice(&[], 0, 10).unwrap();
    let err = locator(0.5).locate(empty_scene, &tpl).unwrap_err();
    assert_eq!(
        err,
        IconLocError::EmptyImage {
            role: ImageRole::Scene,
            width: 0,
            height: 10,
        }
    );

    let scene = vec![0u8; 16];
    let view = ImageView::from_slice(&scene, 4, 4).unwrap();
    let empty_tpl = Template::new(Vec::new(), 3, 0).unwrap();
    let err = locator(0.5).locate(view, &empty_tpl).unwrap_err();
    assert_eq!(
        err,
        IconLocError::EmptyImage {
            role: ImageRole::Template,
            width: 3,
            height: 0,
        }
    );
}

#[test]
fn channel_mismatch_is_rejected() {
    let scene = vec![0u8; 8 * 8 * 3];
    let view = ImageView::from_interleaved(&scene, 8, 8, 3).unwrap();
    let tpl = Template::new(vec![1, 2, 3, 4], 2, 2).unwrap();
    let err = locator(0.5).locate(view, &tpl).unwrap_err();
    assert_eq!(
        err,
        IconLocError::ChannelMismatch {
            scene: 3,
            template: 1,
        }
    );
}

#[test]
fn results_are_deterministic() {
    let (width, height) = (25, 19);
    let image = random_image(77, width, height, 1);
    let tpl = Template::new(crop(&image, width, 1, 3, 6, 4, 4), 4, 4).unwrap();
    let view = ImageView::from_slice(&image, width, height).unwrap();
    let first = locator(0.4).locate(view, &tpl).unwrap();
    let second = locator(0.4).locate(view, &tpl).unwrap();
    assert_eq!(first, second);
}

#[test]
fn low_contrast_self_match_falls_short_by_epsilon_over_sigma() {
    // 0/1 checkerboard: mean 0.5, population std 0.5
    let tpl: Vec<u8> = (0..16).map(|i| ((i % 4 + i / 4) % 2) as u8).collect();
    let view = ImageView::from_slice(&tpl, 4, 4).unwrap();
    let peaks = locator(f64::NEG_INFINITY)
        .locate(view, &Template::new(tpl.clone(), 4, 4).unwrap())
        .unwrap();
    assert_eq!(peaks.len(), 1);

    let sigma = 0.5;
    let expected = (sigma / (sigma + iconloc::lowlevel::NCC_EPSILON)).powi(2);
    assert!((peaks[0].score - expected).abs() < 1e-9);
    assert!(1.0 - peaks[0].score > 1e-6);
    let relaxed = locator(0.99999)
        .locate(view, &Template::new(tpl.clone(), 4, 4).unwrap())
        .unwrap();
    assert_eq!(relaxed.len(), 1);
}
