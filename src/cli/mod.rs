// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod analyze;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Phi Ratio Analyzer CLI
#[derive(Parser, Debug)]
#[command(name = "phi-cli")]
#[command(version)]
#[command(about = "Offline golden ratio face analysis", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a local image and write an annotated copy
    Analyze(analyze::AnalyzeArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze(args) => analyze::run(args).await,
    }
}
