//! Pixedge CLI: send an image through the edge dispatcher and save the result.
//!
//! Set PIXEDGE_API_URL (or API_URL) to point at the dispatcher.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use pixedge_cli::{init_tracing, ProcessOptions};
use pixedge_client::{ApiClient, Composer, ComposerOptions, ProcessedResult, UploadedImage};
use pixedge_core::{OutputFormat, ProviderActionList};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "pixedge", about = "Pixedge image processing CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process an image and save the result
    Process {
        /// Path to the image
        file: PathBuf,
        #[command(flatten)]
        options: OptionArgs,
        /// Output file name, without extension
        #[arg(long, default_value = "processed-image")]
        name: String,
        /// Directory to save the result in
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Print the provider action list for the given options
    Actions {
        #[command(flatten)]
        options: OptionArgs,
    },
}

#[derive(Args)]
struct OptionArgs {
    /// Target format: png, jpeg or webp
    #[arg(long)]
    format: Option<OutputFormat>,
    /// Width in pixels
    #[arg(long)]
    width: Option<u32>,
    /// Height in pixels
    #[arg(long)]
    height: Option<u32>,
    /// Quality, 0-100
    #[arg(long)]
    quality: Option<u8>,
    /// Rotation in degrees
    #[arg(long, allow_hyphen_values = true)]
    angle: Option<f64>,
    /// Watermark text
    #[arg(long)]
    watermark: Option<String>,
}

impl From<OptionArgs> for ProcessOptions {
    fn from(args: OptionArgs) -> Self {
        Self {
            format: args.format,
            width: args.width,
            height: args.height,
            quality: args.quality,
            angle: args.angle,
            watermark: args.watermark,
        }
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            file,
            options,
            name,
            out_dir,
        } => {
            let config = ProcessOptions::from(options).to_config()?;
            let client = ApiClient::from_env()
                .context("Failed to create API client. Check PIXEDGE_API_URL and PIXEDGE_TIMEOUT_SECS")?;
            let image = UploadedImage::from_path(&file)
                .with_context(|| format!("Failed to read image: {}", file.display()))?;

            let composer = Composer::new(client, ComposerOptions::default());
            composer.select_image(image);

            let result = composer.process(&config).await;
            if let ProcessedResult::Failure { .. } = result {
                print_json(&serde_json::json!({ "result": result }))?;
                std::process::exit(1);
            }

            let download = composer.download(&name, &out_dir).await?;
            print_json(&serde_json::json!({ "result": result, "download": download }))?;
        }
        Commands::Actions { options } => {
            let config = ProcessOptions::from(options).to_config()?;
            print_json(&ProviderActionList::from_config(&config))?;
        }
    }

    Ok(())
}
