//! Shared render resources for block batches.
//!
//! One cube mesh, one stud mesh and one `StandardMaterial` per
//! `MaterialKind`, all created once at startup and owned by the
//! `BlockAssets` resource. Every spawned block clones handles from here,
//! so the renderer batches each material into a single instanced draw and
//! no geometry or material is ever duplicated per block.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::terrain::MaterialKind;

/// Handles to the meshes and materials shared by all world blocks.
#[derive(Resource)]
pub struct BlockAssets {
    pub cube: Handle<Mesh>,
    pub stud: Handle<Mesh>,
    pub materials: HashMap<MaterialKind, Handle<StandardMaterial>>,
}

impl BlockAssets {
    /// Create the shared meshes and the per-material `StandardMaterial`s.
    ///
    /// # Arguments
    /// * `meshes` - mesh asset storage for the cube and stud geometry
    /// * `materials` - material asset storage for the per-kind materials
    #[must_use]
    pub fn build(meshes: &mut Assets<Mesh>, materials: &mut Assets<StandardMaterial>) -> Self {
        let cube = meshes.add(Cuboid::new(1.0, 1.0, 1.0));

        // Flattened cylinder sitting on the cube's top face.
        let stud_mesh: Mesh = Cylinder::new(0.35, 0.2).mesh().resolution(8).into();
        let stud = meshes.add(stud_mesh.translated_by(Vec3::Y * 0.6));

        let materials = MaterialKind::ALL
            .into_iter()
            .map(|kind| (kind, materials.add(block_material(kind))))
            .collect();

        BlockAssets {
            cube,
            stud,
            materials,
        }
    }

    /// Material handle for a block kind.
    #[must_use]
    pub fn material(&self, kind: MaterialKind) -> Handle<StandardMaterial> {
        self.materials.get(&kind).cloned().unwrap_or_default()
    }
}

/// Whether blocks of this kind carry a stud on top. Fill dirt, trunks and
/// water stay smooth.
#[must_use]
pub fn has_studs(kind: MaterialKind) -> bool {
    matches!(
        kind,
        MaterialKind::Grass
            | MaterialKind::Stone
            | MaterialKind::Sand
            | MaterialKind::Snow
            | MaterialKind::Leaves
    )
}

fn block_material(kind: MaterialKind) -> StandardMaterial {
    match kind {
        MaterialKind::Grass => StandardMaterial {
            base_color: Color::srgb_u8(0x2e, 0x7d, 0x32),
            perceptual_roughness: 0.2,
            ..default()
        },
        MaterialKind::Dirt => StandardMaterial {
            base_color: Color::srgb_u8(0x5d, 0x40, 0x37),
            perceptual_roughness: 0.8,
            ..default()
        },
        MaterialKind::Stone => StandardMaterial {
            base_color: Color::srgb_u8(0x9e, 0x9e, 0x9e),
            perceptual_roughness: 0.6,
            ..default()
        },
        MaterialKind::Sand => StandardMaterial {
            base_color: Color::srgb_u8(0xfb, 0xc0, 0x2d),
            perceptual_roughness: 0.4,
            ..default()
        },
        MaterialKind::Snow => StandardMaterial {
            base_color: Color::srgb_u8(0xff, 0xfa, 0xfa),
            perceptual_roughness: 0.1,
            metallic: 0.1,
            ..default()
        },
        MaterialKind::Water => StandardMaterial {
            base_color: Color::srgba_u8(0x4f, 0xc3, 0xf7, 0xb3),
            perceptual_roughness: 0.0,
            alpha_mode: AlphaMode::Blend,
            ..default()
        },
        MaterialKind::Wood => StandardMaterial {
            base_color: Color::srgb_u8(0x3e, 0x27, 0x23),
            perceptual_roughness: 0.7,
            ..default()
        },
        MaterialKind::Leaves => StandardMaterial {
            base_color: Color::srgb_u8(0x4c, 0xaf, 0x50),
            perceptual_roughness: 0.3,
            ..default()
        },
    }
}
