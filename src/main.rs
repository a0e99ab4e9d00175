//! CLI orchestrator for the shader pipeline.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use shadegen::{PipelineConfig, TemplateEmitter, Toolchain};

/// Generate and compile shaders from glTF materials.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the source glTF assets.
    #[arg(long)]
    gltf_dir: PathBuf,

    /// Path to the output directory (recreated from scratch).
    #[arg(long)]
    out_dir: PathBuf,

    /// Directory of reference sources to diff generated shaders against.
    #[arg(long)]
    ref_dir: Option<PathBuf>,

    /// Generate sources only; skip the external compiler invocations.
    #[arg(long)]
    skip_compile: bool,

    /// Disable parallelization to facilitate debugging.
    #[arg(long)]
    serial: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = PipelineConfig {
        gltf_dir: cli.gltf_dir,
        out_dir: cli.out_dir,
        ref_dir: cli.ref_dir,
        skip_compile: cli.skip_compile,
        serial: cli.serial,
    };

    let summary = shadegen::run(&config, &TemplateEmitter, &Toolchain::external())
        .context("shader pipeline failed")?;
    log::info!(
        "Processed {} asset(s), {} distinct shader(s)",
        summary.asset_count,
        summary.shader_count
    );
    Ok(())
}
