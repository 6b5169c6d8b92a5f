// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analysis::{analyze, RatioResult};
use crate::config::ModelArgs;
use crate::vision::image_utils::encode_jpeg;
use crate::vision::model_manager::VisionModelManager;

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Image file to analyze
    pub image: PathBuf,

    /// Where to write the annotated JPEG (defaults to `<stem>_annotated.jpg`)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub models: ModelArgs,
}

/// Default annotated output path next to the input
pub fn default_output_path(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    image.with_file_name(format!("{}_annotated.jpg", stem))
}

/// Render results as an aligned text table
pub fn format_table(results: &[RatioResult]) -> String {
    let width = results
        .iter()
        .map(|r| r.name.len())
        .max()
        .unwrap_or(0)
        .max("Ratio".len());

    let mut out = format!("{:<width$}  {:>8}  {:>10}\n", "Ratio", "Value", "Phi %");
    for r in results {
        out.push_str(&format!(
            "{:<width$}  {:>8.3}  {:>9.2}%\n",
            r.name, r.ratio, r.closeness_to_phi
        ));
    }
    out
}

pub async fn run(args: AnalyzeArgs) -> Result<()> {
    let bytes = tokio::fs::read(&args.image)
        .await
        .with_context(|| format!("Failed to read {}", args.image.display()))?;

    let manager = VisionModelManager::load(&args.models.to_model_config())?;
    let provider = manager.provider();

    let report = tokio::task::spawn_blocking(move || analyze(provider.as_ref(), &bytes))
        .await
        .context("Analysis task failed")??;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.image));
    let jpeg = encode_jpeg(&report.annotated_image)?;
    tokio::fs::write(&output, jpeg)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Annotated image written to {}", output.display());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.results)?);
    } else {
        print!("{}", format_table(&report.results));
    }

    Ok(())
}
