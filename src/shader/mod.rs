//! Shader Descriptors
//!
//! A [`ShaderDescriptor`] is the generation + compilation unit for one
//! (variant identity, backend, stage) triple. Descriptors are constructed
//! during asset processing, deduplicated by canonical name in the driver's
//! global collection, and generated + compiled exactly once per run no
//! matter how many primitives reference them.
//!
//! Construction only derives names and paths — it never touches the
//! filesystem. Text production is delegated to a [`SourceEmitter`] and
//! native compilation to a [`ShaderCompiler`] through the [`Toolchain`].

use std::fmt::Write as _;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::compiler::Toolchain;
use crate::emit::SourceEmitter;
use crate::errors::Result;
use crate::util::{RefDiffer, TimedScope};
use crate::variant::{ShaderVariant, join_ids};

/// Fixed entry point name shared by every generated shader.
pub const ENTRY_POINT: &str = "main";

/// Common filename prefix of every emitted artifact.
pub const FILENAME_PREFIX: &str = "GltfPbr";

/// Which backend a descriptor compiles through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Native path: HLSL source compiled to DXIL bytecode.
    Hlsl,
    /// Cross-compiled path: GLSL source compiled to SPIR-V.
    Glsl,
}

impl Backend {
    /// Label used in the per-asset index document.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Backend::Hlsl => "hlsl",
            Backend::Glsl => "glsl",
        }
    }
}

/// Stage configuration: extensions, profile and labels per
/// (backend, stage) pair. One concrete value, not a type hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    HlslVertex,
    HlslPixel,
    GlslFragment,
}

impl ShaderStage {
    /// All stages a variant resolves to, in construction order.
    pub const ALL: [ShaderStage; 3] = [
        ShaderStage::HlslVertex,
        ShaderStage::HlslPixel,
        ShaderStage::GlslFragment,
    ];

    /// Filename suffix appended after the identity.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            ShaderStage::HlslVertex => "VS",
            ShaderStage::HlslPixel => "PS",
            ShaderStage::GlslFragment => "frag",
        }
    }

    /// Source file extension.
    #[must_use]
    pub fn src_extension(self) -> &'static str {
        match self.backend() {
            Backend::Hlsl => "hlsl",
            Backend::Glsl => "glsl",
        }
    }

    /// Compiled binary extension.
    #[must_use]
    pub fn bin_extension(self) -> &'static str {
        match self.backend() {
            Backend::Hlsl => "cso",
            Backend::Glsl => "spv",
        }
    }

    /// Target profile handed to the compiler collaborator.
    #[must_use]
    pub fn profile(self) -> &'static str {
        match self {
            ShaderStage::HlslVertex => "vs_6_0",
            ShaderStage::HlslPixel => "ps_6_0",
            ShaderStage::GlslFragment => "frag",
        }
    }

    /// The backend this stage compiles through.
    #[must_use]
    pub fn backend(self) -> Backend {
        match self {
            ShaderStage::HlslVertex | ShaderStage::HlslPixel => Backend::Hlsl,
            ShaderStage::GlslFragment => Backend::Glsl,
        }
    }

    /// Label used in the per-asset index document.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ShaderStage::HlslVertex => "vertex",
            ShaderStage::HlslPixel => "pixel",
            ShaderStage::GlslFragment => "fragment",
        }
    }
}

/// Outcome of one compiler invocation: a success flag plus the captured
/// diagnostic text. A failed compile is a normal, aggregated outcome.
#[derive(Debug, Clone, Default)]
pub struct CompileReport {
    pub success: bool,
    pub log: String,
}

/// The generation + compilation unit for one (variant, backend, stage).
#[derive(Debug, Clone)]
pub struct ShaderDescriptor {
    name: String,
    stage: ShaderStage,
    variant: ShaderVariant,
    src_path: PathBuf,
    bin_path: PathBuf,
}

impl ShaderDescriptor {
    /// Derives the canonical name and artifact paths. Never touches the
    /// filesystem.
    ///
    /// The vertex stage folds in only the attribute identity — material
    /// state never changes vertex-stage text, so variants that differ only
    /// by material share one vertex descriptor. Pixel and fragment stages
    /// fold in the full variant identity.
    #[must_use]
    pub fn new(out_dir: &Path, variant: &ShaderVariant, stage: ShaderStage) -> Self {
        let identity = match stage {
            ShaderStage::HlslVertex => variant.attributes.id(),
            ShaderStage::HlslPixel | ShaderStage::GlslFragment => variant.id(),
        };
        let name = join_ids([
            FILENAME_PREFIX.to_string(),
            identity,
            stage.suffix().to_string(),
        ]);
        let src_path = out_dir.join(format!("{name}.{}", stage.src_extension()));
        let bin_path = out_dir.join(format!("{name}.{}", stage.bin_extension()));
        Self {
            name,
            stage,
            variant: variant.clone(),
            src_path,
            bin_path,
        }
    }

    /// Canonical name; the key of the driver's global collection.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    #[must_use]
    pub fn src_path(&self) -> &Path {
        &self.src_path
    }

    #[must_use]
    pub fn bin_path(&self) -> &Path {
        &self.bin_path
    }

    /// The artifact filename recorded in index documents.
    #[must_use]
    pub fn index_name(&self) -> String {
        self.bin_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Writes the shader source text through the emission collaborator.
    ///
    /// The source file is opened truncating; on success it holds the
    /// complete shader text. Any emitter error propagates — a shader that
    /// cannot be generated aborts the whole run.
    pub fn generate(&self, emitter: &dyn SourceEmitter, log: &mut String) -> Result<()> {
        let scope = TimedScope::new(format!("Generating {}", self.src_path.display()));
        let file = File::create(&self.src_path)?;
        let mut writer = BufWriter::new(file);
        emitter.emit(&mut writer, self.stage, &self.variant)?;
        scope.finish(log);
        Ok(())
    }

    /// Invokes the backend compiler. Never raises for a normal compile
    /// failure — the outcome is aggregated by the driver.
    #[must_use]
    pub fn compile(&self, toolchain: &Toolchain) -> CompileReport {
        let compiler = toolchain.for_backend(self.stage.backend());
        let outcome = compiler.compile(
            &self.src_path,
            ENTRY_POINT,
            self.stage.profile(),
            &self.bin_path,
        );
        CompileReport {
            success: outcome.success,
            log: outcome.log,
        }
    }

    /// Generate, optionally diff against a reference baseline, then
    /// compile. The unit of work dispatched by the driver's second phase.
    ///
    /// # Errors
    ///
    /// Only generation errors propagate; compile failures are reported in
    /// the returned [`CompileReport`].
    pub fn generate_and_compile(
        &self,
        emitter: &dyn SourceEmitter,
        toolchain: &Toolchain,
        ref_differ: Option<&RefDiffer>,
        skip_compile: bool,
    ) -> Result<CompileReport> {
        let mut log = String::new();
        self.generate(emitter, &mut log)?;

        // Advisory baseline diff; never affects compile success.
        if let Some(differ) = ref_differ {
            differ.check(&self.src_path, &mut log);
        }

        if skip_compile {
            let _ = writeln!(log, "Generated {} (compile skipped)", self.src_path.display());
            return Ok(CompileReport { success: true, log });
        }

        let report = self.compile(toolchain);
        let _ = writeln!(
            log,
            "Compiling {} -> {}: {}",
            self.src_path.display(),
            self.bin_path.display(),
            if report.success { "ok" } else { "FAILED" }
        );
        let mut combined = log;
        combined.push_str(&report.log);
        Ok(CompileReport {
            success: report.success,
            log: combined,
        })
    }
}
