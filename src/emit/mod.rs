//! Shader Source Emission
//!
//! Renders final HLSL/GLSL text with a template engine. The environment is
//! process-wide and lazily initialized; templates are embedded in the
//! binary.
//!
//! The emitted text follows a fixed layout: shared per-frame and
//! per-object constant buffers, `VsIn`/`VsOut` interface structs derived
//! from the variant's attribute set, material texture/sampler uniforms with
//! registers allocated by sorted texture name, alpha-test control flow for
//! `MASK` materials, and a variant-independent GLSL fragment stub for the
//! cross-compiled backend.

use std::io::Write;
use std::sync::OnceLock;

use minijinja::{Environment, Error, ErrorKind};
use rust_embed::RustEmbed;
use serde::Serialize;

use crate::errors::Result;
use crate::shader::{ENTRY_POINT, ShaderStage};
use crate::variant::{AlphaMode, OptionalAttribute, ShaderVariant, TextureKind};

/// Produces complete shader source text for one (stage, variant) pair.
///
/// Failure is fatal for the run: source text is a correctness precondition
/// for compilation.
pub trait SourceEmitter: Send + Sync {
    fn emit(
        &self,
        out: &mut dyn Write,
        stage: ShaderStage,
        variant: &ShaderVariant,
    ) -> Result<()>;
}

#[derive(RustEmbed)]
#[folder = "src/emit/templates"]
struct TemplateAssets;

static EMIT_ENV: OnceLock<Environment<'static>> = OnceLock::new();

fn get_env() -> &'static Environment<'static> {
    EMIT_ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_loader(template_loader);
        env
    })
}

fn template_loader(name: &str) -> std::result::Result<Option<String>, Error> {
    let Some(file) = TemplateAssets::get(name) else {
        return Ok(None);
    };
    String::from_utf8(file.data.into_owned())
        .map(Some)
        .map_err(|err| {
            Error::new(
                ErrorKind::SyntaxError,
                format!("Template {name} is not UTF-8: {err}"),
            )
        })
}

/// One material texture in the render context. Registers follow the sorted
/// texture name order the host application allocates.
#[derive(Debug, Clone, Serialize)]
struct TextureSlot {
    /// Capitalized base name, e.g. `BaseColor` for `g_tBaseColor`.
    cap_name: String,
    register: usize,
    texel_type: &'static str,
    /// The `VsOut` member the texture samples, e.g. `uv0`.
    uv: String,
}

#[derive(Debug, Serialize)]
struct EmitContext {
    entry_point: &'static str,
    is_ps: bool,

    has_tangent: bool,
    has_uv0: bool,
    has_uv1: bool,
    has_color0: bool,

    /// Pre-built `VsOut` member declarations, shared by both HLSL stages.
    vs_out_decls: Vec<String>,

    /// All bound textures, in register order.
    textures: Vec<TextureSlot>,

    base_color: Option<TextureSlot>,
    metallic_roughness: Option<TextureSlot>,
    occlusion: Option<TextureSlot>,
    emissive: Option<TextureSlot>,
    /// Present only when the material has a normal texture *and* the
    /// primitive carries tangents — otherwise generated code falls back to
    /// the interpolated normal.
    normal_map: Option<TextureSlot>,

    alpha_mode: &'static str,
    alpha_cutoff: Option<f32>,
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn texel_type_name(kind: TextureKind) -> &'static str {
    // All current interpretations sample through a float4 resource; the
    // tag still drives which channels the generated code consumes.
    let _ = kind.texel_type();
    "float4"
}

fn build_context(stage: ShaderStage, variant: &ShaderVariant) -> EmitContext {
    let attrs = &variant.attributes;
    let has_tangent = attrs.has(OptionalAttribute::Tangent);
    let has_uv0 = attrs.has(OptionalAttribute::TexCoord0);
    let has_uv1 = attrs.has(OptionalAttribute::TexCoord1);
    let has_color0 = attrs.has(OptionalAttribute::Color0);

    // VsOut layout: fixed members first, then tangent frame, then the
    // passthrough attributes, with sequential TEXCOORD indices.
    let mut vs_out_decls = vec!["float4 Pclip : SV_Position;".to_string()];
    let mut texcoord_idx = 0usize;
    let mut add_texcoord = |decls: &mut Vec<String>, ty: &str, name: &str| {
        decls.push(format!("{ty} {name} : TEXCOORD{texcoord_idx};"));
        texcoord_idx += 1;
    };
    add_texcoord(&mut vs_out_decls, "float3", "Pw");
    add_texcoord(&mut vs_out_decls, "float3", "Nw");
    if has_tangent {
        add_texcoord(&mut vs_out_decls, "float3", "Tw");
        add_texcoord(&mut vs_out_decls, "float3", "Bw");
    }
    if has_uv0 {
        add_texcoord(&mut vs_out_decls, "float2", "uv0");
    }
    if has_uv1 {
        add_texcoord(&mut vs_out_decls, "float2", "uv1");
    }
    if has_color0 {
        vs_out_decls.push("float4 rgbaColor0 : COLOR0;".to_string());
    }

    let mut textures = Vec::new();
    let slot_of = |kind: TextureKind| -> Option<TextureSlot> {
        let binding = variant.textures.get(kind)?;
        let slot = TextureSlot {
            cap_name: capitalize(kind.base_name()),
            register: 0, // fixed up below, in register order
            texel_type: texel_type_name(kind),
            uv: format!("uv{}", binding.uv_set),
        };
        Some(slot)
    };

    let mut base_color = slot_of(TextureKind::BaseColor);
    let mut metallic_roughness = slot_of(TextureKind::MetallicRoughness);
    let mut occlusion = slot_of(TextureKind::Occlusion);
    let mut emissive = slot_of(TextureKind::Emissive);
    let mut normal = slot_of(TextureKind::Normal);

    // Register allocation follows the identity's sorted binding order,
    // which coincides with sorting by texture name.
    for (register, binding) in variant.textures.iter().enumerate() {
        let slot = match binding.kind {
            TextureKind::BaseColor => base_color.as_mut(),
            TextureKind::MetallicRoughness => metallic_roughness.as_mut(),
            TextureKind::Occlusion => occlusion.as_mut(),
            TextureKind::Emissive => emissive.as_mut(),
            TextureKind::Normal => normal.as_mut(),
        };
        if let Some(slot) = slot {
            slot.register = register;
            textures.push(slot.clone());
        }
    }

    let normal_map = if has_tangent { normal } else { None };

    let (alpha_mode, alpha_cutoff) = match variant.alpha {
        AlphaMode::Opaque => ("OPAQUE", None),
        AlphaMode::Mask { cutoff } => ("MASK", Some(cutoff)),
        AlphaMode::Blend => ("BLEND", None),
    };

    EmitContext {
        entry_point: ENTRY_POINT,
        is_ps: stage == ShaderStage::HlslPixel,
        has_tangent,
        has_uv0,
        has_uv1,
        has_color0,
        vs_out_decls,
        textures,
        base_color,
        metallic_roughness,
        occlusion,
        emissive,
        normal_map,
        alpha_mode,
        alpha_cutoff,
    }
}

/// The default emitter: embedded templates, one per stage.
#[derive(Debug, Default)]
pub struct TemplateEmitter;

impl TemplateEmitter {
    fn template_name(stage: ShaderStage) -> &'static str {
        match stage {
            ShaderStage::HlslVertex => "vs.hlsl",
            ShaderStage::HlslPixel => "ps.hlsl",
            ShaderStage::GlslFragment => "frag.glsl",
        }
    }

    /// Renders the stage's source text to a string.
    pub fn render(stage: ShaderStage, variant: &ShaderVariant) -> Result<String> {
        let env = get_env();
        let template = env.get_template(Self::template_name(stage))?;
        let ctx = build_context(stage, variant);
        let source = template.render(&ctx)?;
        Ok(source)
    }
}

impl SourceEmitter for TemplateEmitter {
    fn emit(
        &self,
        out: &mut dyn Write,
        stage: ShaderStage,
        variant: &ShaderVariant,
    ) -> Result<()> {
        let source = Self::render(stage, variant)?;
        out.write_all(source.as_bytes())?;
        Ok(())
    }
}
