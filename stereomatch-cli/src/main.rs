use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use stereomatch::io::{load_gray_image, save_gray_image};
use stereomatch::{
    create_mask, BlockMatchConfig, BlockMatcher, DisparityAlgorithm, DisparityBand, DisparityMap,
    DisparityRange, Metric, NoProgress, RowObserver, ScanlineConfig, ScanlineMatcher, StereoPair,
    TracingProgress, MASK_FOREGROUND,
};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Stereo disparity CLI (JSON config driven)")]
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
    /// Enable tracing output (spans, per-row progress).
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
enum AlgorithmConfig {
    #[default]
    Ssd,
    Ncc,
    Dp,
}

impl AlgorithmConfig {
    fn name(self) -> &'static str {
        match self {
            AlgorithmConfig::Ssd => "ssd",
            AlgorithmConfig::Ncc => "ncc",
            AlgorithmConfig::Dp => "dp",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RangeJson {
    min: usize,
    max: usize,
}

impl Default for RangeJson {
    fn default() -> Self {
        let range = DisparityRange::default();
        Self {
            min: range.min,
            max: range.max,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BandJson {
    low: f32,
    high: f32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    left_path: String,
    right_path: String,
    algorithm: AlgorithmConfig,
    block_radius: usize,
    disparity: RangeJson,
    occlusion_cost: u32,
    parallel: bool,
    /// Scale gray output so the largest disparity maps to 255.
    normalize: bool,
    disparity_path: Option<String>,
    /// Right-aligned map, written only by the dp algorithm.
    right_disparity_path: Option<String>,
    mask: Option<BandJson>,
    mask_path: Option<String>,
    output_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let block = BlockMatchConfig::default();
        let scanline = ScanlineConfig::default();
        Self {
            left_path: String::new(),
            right_path: String::new(),
            algorithm: AlgorithmConfig::default(),
            block_radius: block.block_radius,
            disparity: RangeJson::default(),
            occlusion_cost: scanline.occlusion_cost,
            parallel: block.parallel,
            normalize: true,
            disparity_path: None,
            right_disparity_path: None,
            mask: None,
            mask_path: None,
            output_path: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    algorithm: &'static str,
    width: usize,
    height: usize,
    min_disparity: Option<f32>,
    max_disparity: Option<f32>,
    /// Cells matched by the dp path (left, right).
    visited: Option<(usize, usize)>,
    mask_foreground: Option<usize>,
}

fn render(map: &DisparityMap, normalize: bool) -> stereomatch::OwnedImage {
    if normalize {
        map.to_gray_normalized()
    } else {
        map.to_gray()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("stereomatch=debug".parse()?),
            )
            .with_target(false)
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
    if config.left_path.is_empty() || config.right_path.is_empty() {
        return Err("left_path and right_path must be set in the config".into());
    }
    if config.mask_path.is_some() && config.mask.is_none() {
        return Err("mask_path requires a mask band".into());
    }

    let left = load_gray_image(&config.left_path)?;
    let right = load_gray_image(&config.right_path)?;
    let pair = StereoPair::new(left.view(), right.view())?;
    tracing::info!(
        width = pair.width(),
        height = pair.height(),
        algorithm = config.algorithm.name(),
        "loaded stereo pair"
    );

    let tracing_progress = TracingProgress::new();
    let observer: &dyn RowObserver = if cli.trace {
        &tracing_progress
    } else {
        &NoProgress
    };

    let (map, visited) = match config.algorithm {
        AlgorithmConfig::Ssd | AlgorithmConfig::Ncc => {
            let metric = match config.algorithm {
                AlgorithmConfig::Ncc => Metric::Ncc,
                _ => Metric::Ssd,
            };
            let matcher = BlockMatcher::new(BlockMatchConfig {
                metric,
                block_radius: config.block_radius,
                disparity: DisparityRange::new(config.disparity.min, config.disparity.max)?,
                parallel: config.parallel,
            })?;
            (matcher.compute_with(pair, observer)?, None)
        }
        AlgorithmConfig::Dp => {
            let matcher = ScanlineMatcher::new(ScanlineConfig {
                occlusion_cost: config.occlusion_cost,
                parallel: config.parallel,
            });
            let out = matcher.compute_with(pair, observer)?;
            if let Some(path) = &config.right_disparity_path {
                save_gray_image(path, &render(&out.right.to_dense(f32::NAN), config.normalize))?;
            }
            let visited = (out.left.visited_count(), out.right.visited_count());
            (out.left.to_dense(f32::NAN), Some(visited))
        }
    };

    if let Some(path) = &config.disparity_path {
        save_gray_image(path, &render(&map, config.normalize))?;
    }

    let mut mask_foreground = None;
    if let Some(band) = &config.mask {
        let mask = create_mask(&map, DisparityBand::new(band.low, band.high))?;
        mask_foreground = Some(
            mask.data()
                .iter()
                .filter(|&&v| v == MASK_FOREGROUND)
                .count(),
        );
        if let Some(path) = &config.mask_path {
            save_gray_image(path, &mask)?;
        }
    }

    let (min_disparity, max_disparity) = match map.min_max() {
        Some((lo, hi)) => (Some(lo), Some(hi)),
        None => (None, None),
    };
    let output = Output {
        algorithm: config.algorithm.name(),
        width: map.width(),
        height: map.height(),
        min_disparity,
        max_disparity,
        visited,
        mask_foreground,
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
