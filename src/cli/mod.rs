// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod interactive;
pub mod render;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::capture::{CaptureController, FileCamera};
use crate::config::ScanConfig;
use crate::permission::{PermissionGate, SourcePermission};
use crate::recognition::RecognitionClient;
use crate::vision::ImageNormalizer;

/// NutraScan food recognition client
#[derive(Parser, Debug)]
#[command(name = "nutrascan")]
#[command(version = crate::version::VERSION_NUMBER)]
#[command(about = "Capture a food photo and look up its nutrition", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Configuration overrides shared by all commands
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// TOML configuration file
    #[arg(long, global = true, env = "NUTRASCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the recognition service
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Maximum width of uploaded images
    #[arg(long, global = true)]
    pub max_width: Option<u32>,

    /// JPEG quality in (0, 1]
    #[arg(long, global = true)]
    pub quality: Option<f32>,
}

impl ConfigArgs {
    /// Resolve the effective configuration; flags win over file and env
    pub fn resolve(&self) -> Result<ScanConfig> {
        let mut config = ScanConfig::load(self.config.as_deref())?;
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(max_width) = self.max_width {
            config.max_width = max_width;
        }
        if let Some(quality) = self.quality {
            config.quality = quality;
        }
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one capture cycle and print the result
    Scan(ScanArgs),

    /// Drive the camera from stdin commands
    Interactive(interactive::InteractiveArgs),
}

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Image file (or directory of frames) to capture from
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let mut config = cli.config.resolve()?;

    match cli.command {
        Commands::Scan(args) => {
            if let Some(image) = args.image {
                config.camera_source = image;
            }
            scan(&config, args.json).await
        }
        Commands::Interactive(args) => {
            if let Some(camera) = args.camera {
                config.camera_source = camera;
            }
            let controller = build_controller(&config)?;
            interactive::run(controller).await
        }
    }
}

/// Wire the pipeline from configuration
pub fn build_controller(config: &ScanConfig) -> Result<CaptureController> {
    config.validate().map_err(|e| anyhow!("invalid configuration: {}", e))?;

    let endpoint = config.endpoint().context("invalid recognition endpoint")?;
    let client = RecognitionClient::new(endpoint, config.timeout_ms)?;
    let normalizer = ImageNormalizer::new(config.max_width, config.quality)?;
    let gate = PermissionGate::new(Arc::new(SourcePermission::new(&config.camera_source)));
    let camera = Arc::new(FileCamera::new(&config.camera_source));

    info!("Camera source: {}", config.camera_source.display());
    Ok(CaptureController::new(gate, camera, normalizer, Arc::new(client)))
}

async fn scan(config: &ScanConfig, json: bool) -> Result<()> {
    let mut controller = build_controller(config)?;

    if !controller.initialize().await.is_granted() {
        interactive::print_outcome(controller.session());
        return Err(anyhow!("camera permission denied"));
    }

    controller.toggle_camera();
    if !json {
        println!("⏳ Processing your image...");
    }
    let session = controller.capture_and_recognize().await;

    if json {
        match session.result() {
            Some(result) => println!("{}", serde_json::to_string_pretty(result)?),
            None => println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "status": "aborted",
                    "advisory": session.advisory(),
                }))?
            ),
        }
    } else {
        interactive::print_outcome(session);
    }
    Ok(())
}
