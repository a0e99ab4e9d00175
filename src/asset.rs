//! Asset Processor
//!
//! Consumes one parsed glTF asset: walks its meshes and primitives in file
//! order, derives a variant identity per primitive, constructs the shader
//! descriptors each identity needs on first encounter, and builds the
//! per-asset index correlating every (mesh, primitive) position with the
//! artifact names it resolved to.
//!
//! No shader is generated or compiled here — that is deferred to the
//! driver, after the global merge, so identical variants across assets are
//! processed exactly once. The asset processor's only filesystem side
//! effect is the index document.
//!
//! All log output is captured into a per-asset buffer so parallel workers'
//! output never interleaves.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::errors::{PipelineError, Result};
use crate::index::AssetShaderIndex;
use crate::shader::{ShaderDescriptor, ShaderStage};
use crate::util::TimedScope;
use crate::variant::ShaderVariant;

/// Extension of the per-asset index document.
const INDEX_EXTENSION: &str = "json";

/// What one asset contributes back to the driver: its captured log, the
/// working set of descriptors it needed, and the index it wrote.
#[derive(Debug)]
pub struct AssetResult {
    /// Captured per-asset log text, printed contiguously by the driver.
    pub log: String,
    /// Descriptors keyed by canonical name. Contains every descriptor the
    /// asset references; the driver's merge discards duplicates.
    pub shaders: BTreeMap<String, ShaderDescriptor>,
    /// Path of the index document written beside the compiled outputs.
    pub index_path: PathBuf,
}

/// Processes one scene asset file.
///
/// # Errors
///
/// Parse failures and capability errors (unsupported attribute, missing
/// mandatory attribute, unsupported material extension) are fatal and
/// carry the offending asset path.
pub fn process_asset(gltf_path: &Path, out_dir: &Path) -> Result<AssetResult> {
    let mut log = String::new();

    let scope = TimedScope::new(format!("Loading glTF asset {}", gltf_path.display()));
    let gltf = gltf::Gltf::open(gltf_path)
        .map_err(|err| PipelineError::from(err).in_asset(gltf_path))?;
    scope.finish(&mut log);

    let mut shaders: BTreeMap<String, ShaderDescriptor> = BTreeMap::new();
    let mut index = AssetShaderIndex::default();

    for (mesh_idx, mesh) in gltf.document.meshes().enumerate() {
        let mesh_name = mesh
            .name()
            .map_or_else(|| format!("UnnamedMesh{mesh_idx}"), ToString::to_string);
        index.begin_mesh();

        for (primitive_idx, primitive) in mesh.primitives().enumerate() {
            let variant = ShaderVariant::from_primitive(&primitive)
                .map_err(|err| err.in_asset(gltf_path))?;
            let _ = writeln!(
                log,
                "{mesh_name}[{primitive_idx}]: variant '{}'",
                variant.id()
            );

            // Resolution is keyed by canonical name: a primitive reuses a
            // descriptor created by an earlier primitive, in this asset or
            // (after the merge) any other.
            let mut resolved = Vec::with_capacity(ShaderStage::ALL.len());
            for stage in ShaderStage::ALL {
                let descriptor = ShaderDescriptor::new(out_dir, &variant, stage);
                resolved.push(
                    shaders
                        .entry(descriptor.name().to_string())
                        .or_insert(descriptor)
                        .clone(),
                );
            }
            index.push_primitive(resolved.iter());
        }
    }

    let index_path = index_path_for(gltf_path, out_dir);
    index.write(&index_path)
        .map_err(|err| err.in_asset(gltf_path))?;
    let _ = writeln!(log, "Wrote shader index {}", index_path.display());

    Ok(AssetResult {
        log,
        shaders,
        index_path,
    })
}

/// Index document path: same base name as the asset, fixed extension,
/// beside the compiled outputs.
fn index_path_for(gltf_path: &Path, out_dir: &Path) -> PathBuf {
    let stem = gltf_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "asset".to_string());
    out_dir.join(format!("{stem}.{INDEX_EXTENSION}"))
}
