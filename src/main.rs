//! pawbox CLI - pet enclosure flat patterns
//!
//! Estimates box dimensions from a photo and writes a laser-cuttable
//! tab/slot flat pattern as SVG or DXF.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pawbox::{
    init_logging, parse_length, BoxDimensions, BoxService, BoxStyle, Config, EstimateMethod,
    EstimateRequest, MeasurementSystem, OutputFormat,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pawbox", version)]
#[command(about = "Pet enclosure flat-pattern generator", long_about = None)]
struct Cli {
    /// Config file (.toml or .json); defaults to the platform config dir
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Material thickness (e.g. 3, 3mm, 0.125in)
    #[arg(long, value_parser = parse_mm)]
    thickness: Option<f64>,

    /// Box style: closed or open-top
    #[arg(long)]
    style: Option<BoxStyle>,

    /// Output format: svg or dxf
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Directory for generated files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Prefix file names with a random UUID
    #[arg(long)]
    unique: bool,
}

#[derive(Args, Clone)]
struct PhotoArgs {
    /// Photo of the pet (png, jpg, jpeg, gif, webp)
    image: PathBuf,

    /// auto, vision, or heuristic
    #[arg(long)]
    method: Option<EstimateMethod>,

    /// Real length of the pet's long side, used to scale the heuristic
    #[arg(long, value_parser = parse_mm)]
    reference_size: Option<f64>,

    /// Estimate timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a flat pattern from explicit dimensions
    Generate {
        /// Outer width (e.g. 200, 20cm, 8in)
        #[arg(long, value_parser = parse_mm)]
        width: f64,
        /// Outer height
        #[arg(long, value_parser = parse_mm)]
        height: f64,
        /// Outer depth
        #[arg(long, value_parser = parse_mm)]
        depth: f64,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Estimate box dimensions from a photo and print them as JSON
    Estimate {
        #[command(flatten)]
        photo: PhotoArgs,
    },
    /// Estimate from a photo, then generate the pattern
    FromImage {
        #[command(flatten)]
        photo: PhotoArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}

fn parse_mm(s: &str) -> Result<f64, String> {
    parse_length(s, MeasurementSystem::Metric).map_err(|e| e.to_string())
}

impl OutputArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(t) = self.thickness {
            config.generator.thickness = t;
        }
        if let Some(style) = self.style {
            config.generator.style = style;
        }
        if let Some(format) = self.format {
            config.generator.format = format;
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if self.unique {
            config.output.unique_names = true;
        }
    }
}

impl PhotoArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(method) = self.method {
            config.estimator.method = method;
        }
        if self.reference_size.is_some() {
            config.estimator.reference_size = self.reference_size;
        }
        if let Some(ms) = self.timeout_ms {
            config.estimator.timeout_ms = ms;
        }
    }

    fn request(&self, config: &Config) -> EstimateRequest {
        EstimateRequest::new(&self.image)
            .with_method(config.estimator.method)
            .with_reference_size(config.estimator.reference_size)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json)?;

    let mut config = Config::load_or_default(cli.config.as_deref())
        .with_context(|| match &cli.config {
            Some(path) => format!("Failed to load config {}", path.display()),
            None => "Failed to load default config".to_string(),
        })?;

    match cli.command {
        Commands::Generate {
            width,
            height,
            depth,
            output,
        } => {
            output.apply(&mut config);
            config.validate().context("Invalid options")?;
            let service = BoxService::from_config(&config);

            let dims = BoxDimensions::new(width, height, depth, config.generator.thickness);
            let pattern = service
                .generate(&dims)
                .await
                .context("Failed to generate pattern")?;
            println!("{}", pattern.path.display());
        }
        Commands::Estimate { photo } => {
            photo.apply(&mut config);
            config.validate().context("Invalid options")?;
            let service = BoxService::from_config(&config);

            let estimate = service
                .estimate(&photo.request(&config))
                .await
                .with_context(|| format!("Failed to estimate {}", photo.image.display()))?;
            println!("{}", serde_json::to_string_pretty(&estimate)?);
        }
        Commands::FromImage { photo, output } => {
            photo.apply(&mut config);
            output.apply(&mut config);
            config.validate().context("Invalid options")?;
            let service = BoxService::from_config(&config);

            let result = service
                .from_image(&photo.request(&config), config.generator.thickness)
                .await
                .with_context(|| format!("Failed to process {}", photo.image.display()))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
