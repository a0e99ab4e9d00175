//! shadegen — batch compiler for glTF PBR shader permutations.
//!
//! Turns a directory tree of glTF assets into one compiled shader pair
//! (vertex + pixel, plus a cross-compiled fragment stage) per distinct
//! combination of vertex layout and material configuration found across
//! all assets. Structurally identical permutations appearing in unrelated
//! meshes are generated and compiled exactly once, and a JSON index maps
//! each mesh/primitive back to the artifacts it must load at runtime.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod asset;
pub mod compiler;
pub mod driver;
pub mod emit;
pub mod errors;
pub mod index;
pub mod shader;
pub mod util;
pub mod variant;

pub use asset::{AssetResult, process_asset};
pub use compiler::{CompileOutcome, DxcCompiler, GlslangCompiler, ShaderCompiler, Toolchain};
pub use driver::{PipelineConfig, RunSummary, run};
pub use emit::{SourceEmitter, TemplateEmitter};
pub use errors::{PipelineError, Result};
pub use index::AssetShaderIndex;
pub use shader::{Backend, CompileReport, ShaderDescriptor, ShaderStage};
pub use util::RefDiffer;
pub use variant::{
    AlphaMode, MaterialTextureSet, OptionalAttribute, ShaderVariant, TextureKind,
    VertexAttributeSet,
};
