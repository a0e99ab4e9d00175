//! Variant Identity
//!
//! Derives a short, canonical, deterministic key for every shader
//! permutation from exactly the inputs that affect generated shader text:
//! the optional vertex attributes of a primitive, the optional textures of
//! its material, and the material's alpha-handling mode.
//!
//! The identity is a pure function of those inputs. It carries no trace of
//! mesh names, primitive indices or asset identity, so structurally
//! identical permutations in unrelated assets collapse onto one key — the
//! basis of cross-asset deduplication in the driver.

pub mod attributes;
pub mod textures;

pub use attributes::{OptionalAttribute, VertexAttributeSet};
pub use textures::{MaterialTextureSet, TexelType, TextureBinding, TextureKind};

use crate::errors::{PipelineError, Result};

/// Alpha handling of a material. Folds into identity because it changes
/// generated control flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlphaMode {
    /// No alpha handling in the generated shader.
    Opaque,
    /// Alpha test; the cutoff appears in generated code and is therefore
    /// part of the identity.
    Mask { cutoff: f32 },
    /// Alpha blending (a flag only; blending state lives in the host app).
    Blend,
}

impl AlphaMode {
    /// Classifies a glTF material's alpha mode.
    #[must_use]
    pub fn from_material(material: &gltf::Material) -> Self {
        match material.alpha_mode() {
            gltf::material::AlphaMode::Opaque => AlphaMode::Opaque,
            gltf::material::AlphaMode::Mask => AlphaMode::Mask {
                cutoff: material.alpha_cutoff().unwrap_or(0.5),
            },
            gltf::material::AlphaMode::Blend => AlphaMode::Blend,
        }
    }

    /// The alpha-mode identity. Empty for opaque materials.
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            AlphaMode::Opaque => String::new(),
            AlphaMode::Mask { cutoff } => format!("MASK{cutoff}"),
            AlphaMode::Blend => "BLEND".to_string(),
        }
    }
}

/// The complete permutation description for one primitive/material pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderVariant {
    pub attributes: VertexAttributeSet,
    pub textures: MaterialTextureSet,
    pub alpha: AlphaMode,
}

impl ShaderVariant {
    /// Derives the variant of a primitive and its material.
    ///
    /// # Errors
    ///
    /// Propagates the capability errors of
    /// [`VertexAttributeSet::from_primitive`] and
    /// [`MaterialTextureSet::from_material`], and raises
    /// [`PipelineError::MissingTextureUvSet`] when a bound texture samples
    /// a UV set the primitive does not carry; no identity is computed for
    /// assets outside the declared feature set.
    pub fn from_primitive(primitive: &gltf::Primitive) -> Result<Self> {
        let attributes = VertexAttributeSet::from_primitive(primitive)?;
        let material = primitive.material();
        let textures = MaterialTextureSet::from_material(&material)?;
        check_uv_sets(&attributes, &textures)?;
        let alpha = AlphaMode::from_material(&material);
        Ok(Self {
            attributes,
            textures,
            alpha,
        })
    }

    /// The canonical variant identity: non-empty sub-identities joined
    /// with `-` in the fixed (attributes, textures, alpha) order.
    #[must_use]
    pub fn id(&self) -> String {
        join_ids([self.attributes.id(), self.textures.id(), self.alpha.id()])
    }
}

/// Every texture binding must address a UV channel the primitive carries;
/// generated sampling code references the corresponding interpolant
/// directly.
fn check_uv_sets(attributes: &VertexAttributeSet, textures: &MaterialTextureSet) -> Result<()> {
    for binding in textures.iter() {
        let carried = match binding.uv_set {
            0 => attributes.has(OptionalAttribute::TexCoord0),
            1 => attributes.has(OptionalAttribute::TexCoord1),
            _ => false,
        };
        if !carried {
            return Err(PipelineError::MissingTextureUvSet {
                texture: binding.kind.base_name(),
                uv_set: binding.uv_set,
            });
        }
    }
    Ok(())
}

/// Joins identity fragments with `-`, skipping empty ones.
pub(crate) fn join_ids<I>(parts: I) -> String
where
    I: IntoIterator<Item = String>,
{
    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
