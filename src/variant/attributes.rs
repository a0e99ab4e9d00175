//! Per-vertex attribute sets.
//!
//! A [`VertexAttributeSet`] records which *optional* vertex channels a glTF
//! primitive carries. The mandatory channels (POSITION, NORMAL) are always
//! present and therefore excluded from the identity — they never vary
//! between permutations. Skinning channels (JOINTS_n / WEIGHTS_n) are
//! outside the declared feature set and abort processing.

use gltf::Semantic;

use crate::errors::{PipelineError, Result};

/// The optional per-vertex channels the generator understands.
///
/// Each kind carries the shading-language name used both in generated
/// declarations and in the attribute-set identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionalAttribute {
    Tangent,
    TexCoord0,
    TexCoord1,
    Color0,
}

impl OptionalAttribute {
    /// All kinds, in declaration order.
    pub const ALL: [OptionalAttribute; 4] = [
        OptionalAttribute::Tangent,
        OptionalAttribute::TexCoord0,
        OptionalAttribute::TexCoord1,
        OptionalAttribute::Color0,
    ];

    /// The shading-language name. These feed the identity string, so they
    /// must stay stable.
    #[must_use]
    pub fn sl_name(self) -> &'static str {
        match self {
            OptionalAttribute::Tangent => "Tobj",
            OptionalAttribute::TexCoord0 => "uv0",
            OptionalAttribute::TexCoord1 => "uv1",
            OptionalAttribute::Color0 => "rgbaColor0",
        }
    }

    fn from_semantic(semantic: &Semantic) -> Option<Self> {
        match semantic {
            Semantic::Tangents => Some(OptionalAttribute::Tangent),
            Semantic::TexCoords(0) => Some(OptionalAttribute::TexCoord0),
            Semantic::TexCoords(1) => Some(OptionalAttribute::TexCoord1),
            Semantic::Colors(0) => Some(OptionalAttribute::Color0),
            _ => None,
        }
    }
}

/// The subset of optional vertex channels present on one primitive.
///
/// Two primitives with an equal set resolve to syntactically identical
/// vertex-stage input/output declarations, so the set is the vertex half of
/// the variant identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VertexAttributeSet {
    present: Vec<OptionalAttribute>,
}

impl VertexAttributeSet {
    /// Classifies the attributes of a glTF primitive.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::MissingMandatoryAttribute`] when POSITION or
    ///   NORMAL is absent.
    /// - [`PipelineError::UnsupportedAttribute`] for skinning channels.
    pub fn from_primitive(primitive: &gltf::Primitive) -> Result<Self> {
        let mut has_position = false;
        let mut has_normal = false;
        let mut present = Vec::new();

        for (semantic, _accessor) in primitive.attributes() {
            match semantic {
                Semantic::Positions => has_position = true,
                Semantic::Normals => has_normal = true,
                Semantic::Joints(_) | Semantic::Weights(_) => {
                    return Err(PipelineError::UnsupportedAttribute(
                        semantic_name(&semantic),
                    ));
                }
                ref other => {
                    if let Some(attr) = OptionalAttribute::from_semantic(other) {
                        if !present.contains(&attr) {
                            present.push(attr);
                        }
                    }
                    // Further texcoord/color sets are ignored: nothing in the
                    // generated shaders can address them.
                }
            }
        }

        if !has_position {
            return Err(PipelineError::MissingMandatoryAttribute("POSITION"));
        }
        if !has_normal {
            return Err(PipelineError::MissingMandatoryAttribute("NORMAL"));
        }

        // Identity must not depend on declaration order in the asset.
        present.sort_by_key(|attr| attr.sl_name());
        Ok(Self { present })
    }

    /// Builds a set directly from kinds (test and tooling convenience).
    #[must_use]
    pub fn from_kinds(kinds: &[OptionalAttribute]) -> Self {
        let mut present: Vec<_> = kinds.to_vec();
        present.sort_by_key(|attr| attr.sl_name());
        present.dedup();
        Self { present }
    }

    /// Whether the given optional channel is present.
    #[must_use]
    pub fn has(&self, attr: OptionalAttribute) -> bool {
        self.present.contains(&attr)
    }

    /// The attribute-set identity: present channel names, sorted, joined
    /// with `_`. Empty when only the mandatory channels are present.
    #[must_use]
    pub fn id(&self) -> String {
        self.present
            .iter()
            .map(|attr| attr.sl_name())
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Iterates the present channels in identity order.
    pub fn iter(&self) -> impl Iterator<Item = OptionalAttribute> + '_ {
        self.present.iter().copied()
    }
}

fn semantic_name(semantic: &Semantic) -> String {
    match semantic {
        Semantic::Joints(set) => format!("JOINTS_{set}"),
        Semantic::Weights(set) => format!("WEIGHTS_{set}"),
        other => format!("{other:?}"),
    }
}
