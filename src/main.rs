//! Command line emotion classification of cropped face images.

use anyhow::{bail, Context, Result};
use clap::Parser;
use face_emotion::{
    classifier::{EmotionClassifier, HeuristicClassifier},
    config::{Config, EXAMPLE_CONFIG},
    emotion::EmotionResult,
    stats::EmotionTally,
    utils::face_crop::load_face,
};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Face images to classify, in stream order
    images: Vec<PathBuf>,

    /// Built-in preset (regional, halves, global, enhanced), ignored with --config
    #[arg(short, long, default_value = "regional")]
    preset: String,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Smoothing filter across images (none, exponential:<alpha>, moving_average:<window>)
    #[arg(short, long)]
    filter: Option<String>,

    /// Print the rules that fired for each image
    #[arg(short, long)]
    explain: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,
}

fn print_result(path: &std::path::Path, result: &EmotionResult) {
    println!("{}: {result}", path.display());
    for (class, p) in result.distribution() {
        println!("    {class:<9} {:>5.1}%", p * 100.0);
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }
    if args.images.is_empty() {
        bail!("No face images given");
    }

    // Load configuration
    if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
    }
    let mut config =
        Config::load(args.config.as_deref(), &args.preset).with_context(|| match &args.config {
            Some(path) => format!("Failed to load config {}", path.display()),
            None => format!("Failed to load preset '{}'", args.preset),
        })?;
    if let Some(filter) = args.filter {
        config.smoothing.filter = filter;
    }

    let classifier = HeuristicClassifier::new(&config).context("Invalid classifier configuration")?;
    let mut filter = config.create_filter()?;
    let mut tally = EmotionTally::new(config.tally.confidence_threshold);
    info!(
        "Classifying {} image(s) with {} ({}), filter {}",
        args.images.len(),
        classifier.name(),
        classifier.version(),
        filter.name()
    );

    for path in &args.images {
        let face = load_face(path, config.face_size)
            .with_context(|| format!("Failed to load face image {}", path.display()))?;

        let result = if args.explain {
            let explanation = match classifier.explain(&face) {
                Ok(explanation) => explanation,
                Err(e) if e.is_per_frame() => {
                    warn!("Skipping {}: {e}", path.display());
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            for rule in &explanation.fired {
                println!("  fired {:<32} +{:<5} {}", rule.id, rule.weight, rule.class);
            }
            if let Some(class) = explanation.damped.damped {
                println!("  damped {class}");
            }
            explanation.result
        } else {
            match classifier.classify(&face) {
                Ok(result) => result,
                Err(e) if e.is_per_frame() => {
                    warn!("Skipping {}: {e}", path.display());
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        };

        let smoothed = filter.apply(&result);
        tally.record(&smoothed);
        print_result(path, &smoothed);
    }

    if args.images.len() > 1 {
        println!("Counted {} of {} image(s)", tally.total(), args.images.len());
        for (class, pct) in tally.percentages() {
            println!("    {class:<9} {pct:>5.1}%");
        }
        if let Some(class) = tally.dominant() {
            println!("Dominant emotion: {class}");
        }
    }

    Ok(())
}
