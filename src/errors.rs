//! Error Types
//!
//! This module defines the error types used throughout the pipeline.
//!
//! # Overview
//!
//! The main error type [`PipelineError`] covers all fatal failure modes:
//! - Capability errors (unsupported vertex attributes or material extensions)
//! - Input errors (missing or invalid asset root)
//! - Generation errors (shader source emission failures)
//! - Aggregated compilation failure (raised once, after every shader has
//!   had a chance to compile)
//!
//! Individual compiler invocation failures are *not* errors — they are
//! normal outcomes captured in [`crate::shader::CompileReport`] and only
//! escalated as [`PipelineError::CompilationFailed`] at the end of a run.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for the shader pipeline.
///
/// Every variant is fatal for the run in which it occurs; see the module
/// docs for the distinction from per-shader compile failures.
#[derive(Error, Debug)]
pub enum PipelineError {
    // ========================================================================
    // Capability Errors
    // ========================================================================
    /// A mandatory vertex attribute (POSITION, NORMAL) is absent.
    #[error("Mandatory attribute '{0}' is missing")]
    MissingMandatoryAttribute(&'static str),

    /// The primitive carries a vertex attribute outside the declared
    /// feature set (skinning joints/weights).
    #[error("Unsupported attribute '{0}'")]
    UnsupportedAttribute(String),

    /// The material uses an extension the generator cannot express.
    #[error("Material extension '{0}' is not implemented")]
    UnsupportedMaterialExtension(&'static str),

    /// A material texture samples a UV set the primitive does not carry;
    /// generated code could not reference the missing interpolant.
    #[error("Texture '{texture}' samples UV set {uv_set} but TEXCOORD_{uv_set} is absent")]
    MissingTextureUvSet {
        texture: &'static str,
        uv_set: u32,
    },

    // ========================================================================
    // Input Errors
    // ========================================================================
    /// The asset root does not exist or is not a directory.
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// glTF parsing error.
    #[error("glTF error: {0}")]
    Gltf(String),

    // ========================================================================
    // Generation & I/O Errors
    // ========================================================================
    /// Shader template rendering failed. Source text is a correctness
    /// precondition for compilation, so this stops the run.
    #[error("Shader generation failed: {0}")]
    Template(#[from] minijinja::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Index document serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // Aggregated Outcome
    // ========================================================================
    /// Raised by the driver after the compile phase when at least one
    /// shader failed. The per-shader diagnostics were already printed.
    #[error("{failed} of {total} shaders failed to compile")]
    CompilationFailed { failed: usize, total: usize },

    /// Attaches the offending asset path to a processing error.
    #[error("{}: {source}", .path.display())]
    Asset {
        path: PathBuf,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// Wraps an error with the asset file it occurred in.
    #[must_use]
    pub fn in_asset(self, path: &std::path::Path) -> Self {
        PipelineError::Asset {
            path: path.to_path_buf(),
            source: Box::new(self),
        }
    }
}

impl From<gltf::Error> for PipelineError {
    fn from(err: gltf::Error) -> Self {
        PipelineError::Gltf(err.to_string())
    }
}

/// Alias for `Result<T, PipelineError>`.
pub type Result<T> = std::result::Result<T, PipelineError>;
