//! Material texture sets.
//!
//! A [`MaterialTextureSet`] records which optional textures a glTF material
//! binds, and which UV set each of them samples. The texel interpretation
//! tag selects a compatible sampling type in generated code but is *not*
//! part of the identity — two materials binding the same textures through
//! the same UV sets are the same permutation.

use crate::errors::{PipelineError, Result};

/// How the texels of a material texture are interpreted by generated code.
///
/// Only used to pick the sampling type; never part of equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexelType {
    /// Plain float4 sample (normal maps, metallic-roughness packing).
    Float4,
    /// Color data (base color, emissive).
    Rgba,
    /// Single-channel usage (occlusion).
    Scalar,
}

/// The optional material textures the generator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Normal,
    Occlusion,
    Emissive,
    BaseColor,
    MetallicRoughness,
}

impl TextureKind {
    /// All kinds, in declaration order.
    pub const ALL: [TextureKind; 5] = [
        TextureKind::Normal,
        TextureKind::Occlusion,
        TextureKind::Emissive,
        TextureKind::BaseColor,
        TextureKind::MetallicRoughness,
    ];

    /// The glTF/uniform base name (`normal` → `g_tNormal` etc.).
    #[must_use]
    pub fn base_name(self) -> &'static str {
        match self {
            TextureKind::Normal => "normal",
            TextureKind::Occlusion => "occlusion",
            TextureKind::Emissive => "emissive",
            TextureKind::BaseColor => "baseColor",
            TextureKind::MetallicRoughness => "metallicRoughness",
        }
    }

    /// The short tag used in the texture-set identity.
    #[must_use]
    pub fn id_tag(self) -> &'static str {
        match self {
            TextureKind::Normal => "n",
            TextureKind::Occlusion => "o",
            TextureKind::Emissive => "e",
            TextureKind::BaseColor => "bc",
            TextureKind::MetallicRoughness => "mr",
        }
    }

    /// The texel interpretation for generated sampling code.
    #[must_use]
    pub fn texel_type(self) -> TexelType {
        match self {
            TextureKind::Normal | TextureKind::MetallicRoughness => TexelType::Float4,
            TextureKind::Occlusion => TexelType::Scalar,
            TextureKind::Emissive | TextureKind::BaseColor => TexelType::Rgba,
        }
    }
}

/// One bound texture: its kind plus the UV set it samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureBinding {
    pub kind: TextureKind,
    /// Index of the UV set the texture samples (glTF `texCoord`, default 0).
    pub uv_set: u32,
}

/// The subset of optional textures bound on one material.
///
/// Bindings are kept sorted by identity tag, which is also the register
/// allocation order the host application expects (textures sorted by name).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialTextureSet {
    bindings: Vec<TextureBinding>,
}

impl MaterialTextureSet {
    /// Classifies the textures bound on a glTF material.
    ///
    /// # Errors
    ///
    /// [`PipelineError::UnsupportedMaterialExtension`] when the material
    /// uses the specular-glossiness workflow.
    pub fn from_material(material: &gltf::Material) -> Result<Self> {
        if material.pbr_specular_glossiness().is_some() {
            return Err(PipelineError::UnsupportedMaterialExtension(
                "KHR_materials_pbrSpecularGlossiness",
            ));
        }

        let mut bindings = Vec::new();
        let mut push = |kind: TextureKind, uv_set: Option<u32>| {
            if let Some(uv_set) = uv_set {
                bindings.push(TextureBinding { kind, uv_set });
            }
        };

        push(
            TextureKind::Normal,
            material.normal_texture().map(|t| t.tex_coord()),
        );
        push(
            TextureKind::Occlusion,
            material.occlusion_texture().map(|t| t.tex_coord()),
        );
        push(
            TextureKind::Emissive,
            material.emissive_texture().map(|t| t.tex_coord()),
        );

        let pbr = material.pbr_metallic_roughness();
        push(
            TextureKind::BaseColor,
            pbr.base_color_texture().map(|t| t.tex_coord()),
        );
        push(
            TextureKind::MetallicRoughness,
            pbr.metallic_roughness_texture().map(|t| t.tex_coord()),
        );

        Ok(Self::from_bindings(bindings))
    }

    /// Builds a set directly from bindings (test and tooling convenience).
    #[must_use]
    pub fn from_bindings(mut bindings: Vec<TextureBinding>) -> Self {
        bindings.sort_by_key(|b| b.kind.id_tag());
        Self { bindings }
    }

    /// The texture-set identity: `{tag}{uv_set}` entries sorted by tag,
    /// joined with `_`. Empty when no optional texture is bound.
    #[must_use]
    pub fn id(&self) -> String {
        self.bindings
            .iter()
            .map(|b| format!("{}{}", b.kind.id_tag(), b.uv_set))
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Number of bound textures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no optional texture is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Looks up the binding for a kind, if present.
    #[must_use]
    pub fn get(&self, kind: TextureKind) -> Option<TextureBinding> {
        self.bindings.iter().copied().find(|b| b.kind == kind)
    }

    /// Iterates bindings in register allocation order (sorted by tag).
    pub fn iter(&self) -> impl Iterator<Item = TextureBinding> + '_ {
        self.bindings.iter().copied()
    }
}
