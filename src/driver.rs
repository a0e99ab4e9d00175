//! Pipeline Driver
//!
//! Orchestrates the whole run: discovers scene assets, dispatches asset
//! processing across a worker pool (or serially), merges the per-asset
//! descriptor working sets into one deduplicated global collection, then
//! dispatches generation + compilation of every distinct shader and
//! aggregates per-shader success into a single pass/fail verdict.
//!
//! Workers receive plain data (an asset path or a descriptor reference)
//! and communicate only via return values — shared state is read after
//! every unit returns, never mutated concurrently. Each worker writes only
//! files it exclusively owns, so concurrent output-directory writes cannot
//! conflict by construction.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::asset::{AssetResult, process_asset};
use crate::compiler::Toolchain;
use crate::emit::SourceEmitter;
use crate::errors::{PipelineError, Result};
use crate::shader::{CompileReport, ShaderDescriptor};
use crate::util::RefDiffer;

/// Scene asset extension scanned for under the input root.
const ASSET_EXTENSION: &str = "gltf";

/// Run configuration, filled from the CLI.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root directory scanned recursively for scene assets.
    pub gltf_dir: PathBuf,
    /// Output directory, recreated from scratch on every run.
    pub out_dir: PathBuf,
    /// Optional baseline directory for advisory regression diffing.
    pub ref_dir: Option<PathBuf>,
    /// Generate sources but skip the external compiler invocations.
    pub skip_compile: bool,
    /// Disable worker-pool parallelism (deterministic debugging).
    pub serial: bool,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub asset_count: usize,
    pub shader_count: usize,
}

/// Runs the full pipeline.
///
/// # Errors
///
/// Capability/input/generation errors abort the run. A compile failure
/// does not — all shaders get their chance, then the aggregate surfaces as
/// [`PipelineError::CompilationFailed`].
pub fn run(
    config: &PipelineConfig,
    emitter: &dyn SourceEmitter,
    toolchain: &Toolchain,
) -> Result<RunSummary> {
    if !config.gltf_dir.is_dir() {
        return Err(PipelineError::NotADirectory(config.gltf_dir.clone()));
    }
    recreate_out_dir(&config.out_dir)?;

    let asset_paths = discover_assets(&config.gltf_dir)?;
    log::info!(
        "Found {} asset(s) under {}",
        asset_paths.len(),
        config.gltf_dir.display()
    );

    // Phase 1: per-asset parsing and identity derivation. Units are
    // isolated; their only shared state is read after all return.
    let asset_results = dispatch(config.serial, &asset_paths, |path| {
        process_asset(path, &config.out_dir)
    });

    let mut shaders: BTreeMap<String, ShaderDescriptor> = BTreeMap::new();
    let mut asset_count = 0usize;
    for result in asset_results {
        let asset = result?;
        print!("{}", asset.log);
        merge_working_set(&mut shaders, asset);
        asset_count += 1;
    }
    log::info!("{} distinct shader(s) after merge", shaders.len());

    if !config.skip_compile {
        toolchain.identify();
    }
    let ref_differ = config.ref_dir.as_ref().map(RefDiffer::new);

    // Phase 2: each distinct descriptor is generated and compiled exactly
    // once, regardless of how many primitives reference it.
    let descriptors: Vec<&ShaderDescriptor> = shaders.values().collect();
    let build_results = dispatch(config.serial, &descriptors, |descriptor| {
        descriptor.generate_and_compile(
            emitter,
            toolchain,
            ref_differ.as_ref(),
            config.skip_compile,
        )
    });

    let mut failed = 0usize;
    for result in build_results {
        let report: CompileReport = result?;
        print!("{}", report.log);
        if !report.success {
            failed += 1;
        }
    }

    let total = descriptors.len();
    if failed > 0 {
        return Err(PipelineError::CompilationFailed { failed, total });
    }
    if config.skip_compile {
        log::info!("Generated {total} shader source(s); compilation skipped");
    } else {
        log::info!("All {total} shaders compiled successfully");
    }

    Ok(RunSummary {
        asset_count,
        shader_count: total,
    })
}

/// Removes any stale output directory, then creates it fresh, so
/// artifacts from a previous run never leak into the index.
fn recreate_out_dir(out_dir: &Path) -> Result<()> {
    if out_dir.exists() {
        fs::remove_dir_all(out_dir)?;
    }
    fs::create_dir_all(out_dir)?;
    Ok(())
}

/// Enumerates every scene asset file under the root, recursively. Sorted
/// for deterministic dispatch order.
fn discover_assets(root: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in walkdir::WalkDir::new(root) {
        let entry = entry.map_err(|err| PipelineError::Io(err.into()))?;
        if entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(ASSET_EXTENSION))
        {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    Ok(paths)
}

/// Runs one unit of work per item, either serially or on the rayon pool.
/// Results come back in submission order; completion order is irrelevant
/// because merging is keyed and failure counting is commutative.
fn dispatch<I, O, F>(serial: bool, items: &[I], work: F) -> Vec<Result<O>>
where
    I: Sync,
    O: Send,
    F: Fn(&I) -> Result<O> + Sync,
{
    if serial {
        items.iter().map(&work).collect()
    } else {
        items.par_iter().map(&work).collect()
    }
}

/// Idempotent merge: a later asset yielding an already-known identity
/// contributes no new descriptor.
fn merge_working_set(global: &mut BTreeMap<String, ShaderDescriptor>, asset: AssetResult) {
    for (name, descriptor) in asset.shaders {
        global.entry(name).or_insert(descriptor);
    }
}
