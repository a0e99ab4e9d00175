//! Index Emission
//!
//! Serializes the per-asset mesh/primitive → artifact mapping as a JSON
//! document beside the compiled outputs. The document shape is
//! `[ mesh ][ primitive ][ backend ][ stage ] -> artifact filename`, so a
//! runtime can resolve the exact binary each primitive must load.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::errors::Result;
use crate::shader::ShaderDescriptor;

/// `stage label -> artifact filename`.
pub type StageMap = BTreeMap<String, String>;

/// `backend label -> stage map`.
pub type BackendMap = BTreeMap<String, StageMap>;

/// The per-asset shader index, built incrementally while walking the
/// asset's meshes and primitives in file order.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct AssetShaderIndex {
    meshes: Vec<Vec<BackendMap>>,
}

impl AssetShaderIndex {
    /// Opens a new mesh entry; subsequent primitives append to it.
    pub fn begin_mesh(&mut self) {
        self.meshes.push(Vec::new());
    }

    /// Appends one primitive entry to the current mesh, recording the
    /// artifact names of the descriptors the primitive resolved to.
    ///
    /// Must be called after [`Self::begin_mesh`].
    pub fn push_primitive<'a>(
        &mut self,
        descriptors: impl IntoIterator<Item = &'a ShaderDescriptor>,
    ) {
        let mut entry = BackendMap::new();
        for descriptor in descriptors {
            let stage = descriptor.stage();
            entry
                .entry(stage.backend().label().to_string())
                .or_default()
                .insert(stage.label().to_string(), descriptor.index_name());
        }
        if let Some(mesh) = self.meshes.last_mut() {
            mesh.push(entry);
        }
    }

    /// Number of mesh entries.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Writes the pretty-printed JSON document.
    pub fn write(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
