mod app;
mod art;
mod data;
mod util;

use std::path::PathBuf;

use clap::Parser;
use eframe::egui::vec2;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::{GeometricArtApp, LaunchOptions};
use crate::art::ArtConfig;
use crate::data::LoadOptions;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// CSV file with one row per entity and year.
    #[arg(long, default_value = "cross-country-literacy-rates.csv")]
    data: PathBuf,
    /// Column holding the 0-100 metric.
    #[arg(long, default_value = "Literacy rate")]
    metric_column: String,
    #[arg(long, default_value = "geometric_params.json")]
    cache: PathBuf,
    /// Always recompute visual parameters.
    #[arg(long)]
    no_cache: bool,
    /// JSON file overriding motion, selection and tooltip tuning.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    /// Keep a stratified sample instead of every entity.
    #[arg(long)]
    sample: bool,
    /// Where the S key writes PNG screenshots.
    #[arg(long, default_value = ".")]
    screenshot_dir: PathBuf,
    #[arg(long, default_value_t = 1200.0)]
    width: f32,
    #[arg(long, default_value_t = 800.0)]
    height: f32,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut art = match &args.config {
        Some(path) => match ArtConfig::load(path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("error: {error:#}");
                std::process::exit(2);
            }
        },
        None => ArtConfig::default(),
    };
    if let Some(seed) = args.seed {
        art.seed = seed;
    }

    let launch = LaunchOptions {
        load: LoadOptions {
            data_path: args.data,
            metric_column: args.metric_column,
            cache_path: (!args.no_cache).then_some(args.cache),
            sample_seed: args.sample.then_some(art.seed),
        },
        art,
        initial_size: vec2(args.width, args.height),
        screenshot_dir: args.screenshot_dir,
    };
    info!(seed = launch.art.seed, sample = args.sample, "starting");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height])
            .with_title("Geometric Art"),
        ..Default::default()
    };

    eframe::run_native(
        "Geometric Art",
        options,
        Box::new(move |cc| Ok(Box::new(GeometricArtApp::new(cc, launch)))),
    )
}
