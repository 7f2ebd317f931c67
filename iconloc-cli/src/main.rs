use clap::Parser;
use iconloc::classify::{scan_color_markers, ColorRules};
use iconloc::io::{load_gray_image, load_rgb_image};
use iconloc::{
    apply_offset, suppress_overlapping, Anchor, IconLocator, LocateConfig, Match, Offset,
    OutcomeStatus, OwnedImage, ScanStrategy, Template, TemplateOutcome, TemplateSet,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Locate map icons in a scene image (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output on stderr.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
enum ModeConfig {
    #[default]
    Ncc,
    Color,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ColorSpaceConfig {
    #[default]
    Rgb,
    Gray,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum AnchorConfig {
    #[default]
    TopLeft,
    Center,
}

impl From<AnchorConfig> for Anchor {
    fn from(value: AnchorConfig) -> Self {
        match value {
            AnchorConfig::TopLeft => Anchor::TopLeft,
            AnchorConfig::Center => Anchor::Center,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum StrategyConfig {
    #[default]
    Dense,
    Tiled,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct LocateConfigJson {
    threshold: f64,
    anchor: AnchorConfig,
    strategy: StrategyConfig,
    tile_size: usize,
    parallel: bool,
}

impl Default for LocateConfigJson {
    fn default() -> Self {
        let cfg = LocateConfig::default();
        Self {
            threshold: cfg.threshold,
            anchor: AnchorConfig::TopLeft,
            strategy: StrategyConfig::Dense,
            tile_size: 256,
            parallel: cfg.parallel,
        }
    }
}

impl From<&LocateConfigJson> for LocateConfig {
    fn from(value: &LocateConfigJson) -> Self {
        let strategy = match value.strategy {
            StrategyConfig::Dense => ScanStrategy::Dense,
            StrategyConfig::Tiled => ScanStrategy::Tiled {
                tile_width: value.tile_size,
                tile_height: value.tile_size,
            },
        };
        Self {
            threshold: value.threshold,
            strategy,
            anchor: value.anchor.into(),
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OffsetJson {
    dx: i64,
    dy: i64,
}

#[derive(Debug, Deserialize)]
struct TemplateEntry {
    label: String,
    path: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    scene_path: String,
    templates: Vec<TemplateEntry>,
    output_path: Option<String>,
    mode: ModeConfig,
    color_space: ColorSpaceConfig,
    locate: LocateConfigJson,
    offset: OffsetJson,
    nms_radius: u64,
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    #[serde(rename = "type")]
    label: String,
    x: i64,
    y: i64,
    score: f64,
}

impl From<Match> for MatchRecord {
    fn from(value: Match) -> Self {
        Self {
            label: value.label,
            x: value.x,
            y: value.y,
            score: value.score,
        }
    }
}

/// Per-template summary line written to stderr.
fn outcome_line(outcome: &TemplateOutcome) -> String {
    match &outcome.status {
        OutcomeStatus::Matched(count) => format!("{}: {count} matches", outcome.label),
        OutcomeStatus::Failed(err) => format!("{}: failed: {err}", outcome.label),
    }
}

fn to_records(matches: &[Match], offset: Offset) -> Vec<MatchRecord> {
    apply_offset(matches, offset)
        .into_iter()
        .map(MatchRecord::from)
        .collect()
}

fn load_image(path: &str, color_space: &ColorSpaceConfig) -> iconloc::IconLocResult<OwnedImage> {
    match color_space {
        ColorSpaceConfig::Rgb => load_rgb_image(path),
        ColorSpaceConfig::Gray => load_gray_image(path),
    }
}

fn run_ncc(config: &Config, scene: &OwnedImage) -> Result<Vec<Match>, Box<dyn std::error::Error>> {
    let mut templates = TemplateSet::new();
    for entry in &config.templates {
        let img = load_image(&entry.path, &config.color_space)?;
        templates.insert(entry.label.clone(), Template::from(img))?;
    }

    let locator = IconLocator::new().with_config(LocateConfig::from(&config.locate));
    let report = locator.locate_all(scene.view(), &templates);

    for outcome in &report.outcomes {
        eprintln!("{}", outcome_line(outcome));
    }
    Ok(report.matches)
}

fn run_color(scene: &OwnedImage) -> Result<Vec<Match>, Box<dyn std::error::Error>> {
    let matches = scan_color_markers(scene.view(), &ColorRules::default())?;
    for label in ["arrow", "ladder", "bench"] {
        let count = matches.iter().filter(|m| m.label == label).count();
        let outcome = TemplateOutcome {
            label: label.to_owned(),
            status: OutcomeStatus::Matched(count),
        };
        eprintln!("{}", outcome_line(&outcome));
    }
    Ok(matches)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("iconloc=info".parse()?))
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.scene_path.is_empty() {
        return Err("scene_path must be set in the config".into());
    }
    if config.mode == ModeConfig::Ncc && config.templates.is_empty() {
        return Err("ncc mode needs at least one entry in templates".into());
    }

    let matches = match config.mode {
        ModeConfig::Ncc => {
            let scene = load_image(&config.scene_path, &config.color_space)?;
            run_ncc(&config, &scene)?
        }
        ModeConfig::Color => {
            let scene = load_rgb_image(&config.scene_path)?;
            run_color(&scene)?
        }
    };

    let matches = if config.nms_radius > 0 {
        suppress_overlapping(&matches, config.nms_radius)
    } else {
        matches
    };
    let offset = Offset::new(config.offset.dx, config.offset.dy);
    let records = to_records(&matches, offset);
    let json = serde_json::to_string_pretty(&records)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
