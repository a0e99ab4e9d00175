//! Variant Identity Tests
//!
//! Tests for:
//! - ShaderVariant: identity derivation from parsed glTF documents
//! - Attribute classification: mandatory, optional, unsupported channels
//! - Material classification: texture set, UV sets, alpha modes
//! - Capability errors: skinning, specular-glossiness, unmapped UV sets

use serde_json::{Value, json};

use shadegen::{PipelineError, ShaderVariant};

/// Builds a parseable glTF document with a fixed accessor pool:
/// 0 POSITION, 1 NORMAL, 2 TANGENT, 3 TEXCOORD_0, 4 TEXCOORD_1,
/// 5 COLOR_0, 6 JOINTS_0, 7 WEIGHTS_0.
fn gltf_doc(meshes: Value, materials: Value) -> gltf::Gltf {
    let doc = json!({
        "asset": { "version": "2.0" },
        "extensionsUsed": ["KHR_materials_pbrSpecularGlossiness"],
        "accessors": [
            { "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [-1.0, -1.0, -1.0], "max": [1.0, 1.0, 1.0] },
            { "componentType": 5126, "count": 3, "type": "VEC3" },
            { "componentType": 5126, "count": 3, "type": "VEC4" },
            { "componentType": 5126, "count": 3, "type": "VEC2" },
            { "componentType": 5126, "count": 3, "type": "VEC2" },
            { "componentType": 5126, "count": 3, "type": "VEC4" },
            { "componentType": 5123, "count": 3, "type": "VEC4" },
            { "componentType": 5126, "count": 3, "type": "VEC4" },
        ],
        "images": [{ "uri": "checker.png" }],
        "textures": [{ "source": 0 }],
        "materials": materials,
        "meshes": meshes,
    });
    gltf::Gltf::from_slice_without_validation(doc.to_string().as_bytes())
        .expect("fixture must parse")
}

fn first_variant(gltf: &gltf::Gltf) -> shadegen::Result<ShaderVariant> {
    let mesh = gltf.document.meshes().next().expect("fixture has a mesh");
    let primitive = mesh.primitives().next().expect("mesh has a primitive");
    ShaderVariant::from_primitive(&primitive)
}

// ============================================================================
// Identity Derivation
// ============================================================================

#[test]
fn fully_featured_primitive_identity() {
    let gltf = gltf_doc(
        json!([{
            "primitives": [{
                "attributes": {
                    "POSITION": 0, "NORMAL": 1, "TANGENT": 2,
                    "TEXCOORD_0": 3, "TEXCOORD_1": 4, "COLOR_0": 5
                },
                "material": 0
            }]
        }]),
        json!([{
            "normalTexture": { "index": 0 },
            "occlusionTexture": { "index": 0 },
            "emissiveTexture": { "index": 0 },
            "pbrMetallicRoughness": {
                "baseColorTexture": { "index": 0 },
                "metallicRoughnessTexture": { "index": 0 }
            },
            "alphaMode": "MASK",
            "alphaCutoff": 0.25
        }]),
    );
    let variant = first_variant(&gltf).unwrap();
    assert_eq!(
        variant.id(),
        "Tobj_rgbaColor0_uv0_uv1-bc0_e0_mr0_n0_o0-MASK0.25"
    );
}

#[test]
fn minimal_primitive_identity_is_empty() {
    let gltf = gltf_doc(
        json!([{
            "primitives": [{ "attributes": { "POSITION": 0, "NORMAL": 1 } }]
        }]),
        json!([]),
    );
    let variant = first_variant(&gltf).unwrap();
    assert_eq!(variant.id(), "");
}

#[test]
fn attribute_identity_ignores_declaration_order() {
    let forward = gltf_doc(
        json!([{
            "primitives": [{
                "attributes": { "POSITION": 0, "NORMAL": 1, "TANGENT": 2, "TEXCOORD_0": 3 }
            }]
        }]),
        json!([]),
    );
    let reversed = gltf_doc(
        json!([{
            "primitives": [{
                "attributes": { "TEXCOORD_0": 3, "TANGENT": 2, "NORMAL": 1, "POSITION": 0 }
            }]
        }]),
        json!([]),
    );
    let a = first_variant(&forward).unwrap();
    let b = first_variant(&reversed).unwrap();
    assert_eq!(a.id(), "Tobj_uv0");
    assert_eq!(a.id(), b.id());
}

#[test]
fn texture_uv_set_is_part_of_identity() {
    let materials = |tex_coord: u32| {
        json!([{
            "pbrMetallicRoughness": {
                "baseColorTexture": { "index": 0, "texCoord": tex_coord }
            }
        }])
    };
    let meshes = json!([{
        "primitives": [{
            "attributes": { "POSITION": 0, "NORMAL": 1, "TEXCOORD_0": 3, "TEXCOORD_1": 4 },
            "material": 0
        }]
    }]);
    let uv0 = first_variant(&gltf_doc(meshes.clone(), materials(0))).unwrap();
    let uv1 = first_variant(&gltf_doc(meshes, materials(1))).unwrap();
    assert_eq!(uv0.id(), "uv0_uv1-bc0");
    assert_eq!(uv1.id(), "uv0_uv1-bc1");
}

// ============================================================================
// Alpha Modes
// ============================================================================

#[test]
fn alpha_mask_defaults_cutoff_to_half() {
    let gltf = gltf_doc(
        json!([{
            "primitives": [{
                "attributes": { "POSITION": 0, "NORMAL": 1, "TEXCOORD_0": 3 },
                "material": 0
            }]
        }]),
        json!([{ "alphaMode": "MASK" }]),
    );
    let variant = first_variant(&gltf).unwrap();
    assert_eq!(variant.id(), "uv0-MASK0.5");
}

#[test]
fn alpha_blend_is_flagged_without_cutoff() {
    let gltf = gltf_doc(
        json!([{
            "primitives": [{
                "attributes": { "POSITION": 0, "NORMAL": 1 },
                "material": 0
            }]
        }]),
        json!([{ "alphaMode": "BLEND" }]),
    );
    let variant = first_variant(&gltf).unwrap();
    assert_eq!(variant.id(), "BLEND");
}

// ============================================================================
// Capability Errors
// ============================================================================

#[test]
fn missing_normal_is_fatal() {
    let gltf = gltf_doc(
        json!([{ "primitives": [{ "attributes": { "POSITION": 0 } }] }]),
        json!([]),
    );
    let err = first_variant(&gltf).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::MissingMandatoryAttribute("NORMAL")
    ));
}

#[test]
fn missing_position_is_fatal() {
    let gltf = gltf_doc(
        json!([{ "primitives": [{ "attributes": { "NORMAL": 1 } }] }]),
        json!([]),
    );
    let err = first_variant(&gltf).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::MissingMandatoryAttribute("POSITION")
    ));
}

#[test]
fn skinned_primitive_is_fatal() {
    let gltf = gltf_doc(
        json!([{
            "primitives": [{
                "attributes": {
                    "POSITION": 0, "NORMAL": 1, "JOINTS_0": 6, "WEIGHTS_0": 7
                }
            }]
        }]),
        json!([]),
    );
    let err = first_variant(&gltf).unwrap_err();
    match err {
        PipelineError::UnsupportedAttribute(name) => {
            assert!(name.starts_with("JOINTS_") || name.starts_with("WEIGHTS_"));
        }
        other => panic!("expected UnsupportedAttribute, got {other}"),
    }
}

#[test]
fn texture_sampling_an_absent_uv_set_is_fatal() {
    // baseColor samples UV set 1 but the primitive only carries TEXCOORD_0.
    let gltf = gltf_doc(
        json!([{
            "primitives": [{
                "attributes": { "POSITION": 0, "NORMAL": 1, "TEXCOORD_0": 3 },
                "material": 0
            }]
        }]),
        json!([{
            "pbrMetallicRoughness": {
                "baseColorTexture": { "index": 0, "texCoord": 1 }
            }
        }]),
    );
    let err = first_variant(&gltf).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::MissingTextureUvSet {
            texture: "baseColor",
            uv_set: 1
        }
    ));
}

#[test]
fn textured_material_on_an_unmapped_primitive_is_fatal() {
    // A texture always needs a UV channel, even for the default set 0.
    let gltf = gltf_doc(
        json!([{
            "primitives": [{
                "attributes": { "POSITION": 0, "NORMAL": 1 },
                "material": 0
            }]
        }]),
        json!([{
            "emissiveTexture": { "index": 0 }
        }]),
    );
    let err = first_variant(&gltf).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::MissingTextureUvSet {
            texture: "emissive",
            uv_set: 0
        }
    ));
}

#[test]
fn specular_glossiness_material_is_fatal() {
    let gltf = gltf_doc(
        json!([{
            "primitives": [{
                "attributes": { "POSITION": 0, "NORMAL": 1, "TEXCOORD_0": 3 },
                "material": 0
            }]
        }]),
        json!([{
            "extensions": {
                "KHR_materials_pbrSpecularGlossiness": {
                    "diffuseTexture": { "index": 0 }
                }
            }
        }]),
    );
    let err = first_variant(&gltf).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::UnsupportedMaterialExtension("KHR_materials_pbrSpecularGlossiness")
    ));
}
