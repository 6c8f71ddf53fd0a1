//! Setup systems for initializing the scene.
//!
//! This module groups the `Startup` systems: building the shared block
//! assets, generating and spawning the world batches, and spawning the
//! lights, camera and the character rig. World generation is synchronous;
//! the tick loop only starts once the scene is fully built.

use bevy::math::Vec2;
use bevy::prelude::*;

use brickfield::agent::{Agent, FollowCamera};
use brickfield::material::{self, BlockAssets};
use brickfield::settings::Settings;
use brickfield::terrain::{HeightField, SURFACE_OFFSET};
use brickfield::world::{build_world, WorldBlocks};

/// Marker for every spawned world-block entity, so a rebuild can despawn
/// the whole set.
#[derive(Component)]
pub struct WorldBlock;

/// Marker for the character rig root.
#[derive(Component)]
pub struct AgentRig;

/// Marker for the sun light.
#[derive(Component)]
pub struct Sun;

/// Build the shared cube/stud meshes and per-material materials.
#[allow(clippy::needless_pass_by_value)]
pub fn setup_block_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let assets = BlockAssets::build(&mut meshes, &mut materials);
    commands.insert_resource(assets);
}

/// Generate the world once and spawn its batches.
#[allow(clippy::needless_pass_by_value)]
pub fn spawn_world(
    mut commands: Commands,
    field: Res<HeightField>,
    settings: Res<Settings>,
    assets: Res<BlockAssets>,
) {
    let blocks = build_world(&settings.world, &field);
    info!(
        "built world: {} blocks over {} columns",
        blocks.total_blocks(),
        blocks.stats.columns
    );
    spawn_block_entities(&mut commands, &blocks, &assets);
    commands.insert_resource(blocks);
}

/// Spawn one entity per placement (plus a stud where the material carries
/// one). All entities of a batch share mesh and material handles, so the
/// renderer instances them together.
pub fn spawn_block_entities(commands: &mut Commands, blocks: &WorldBlocks, assets: &BlockAssets) {
    for batch in blocks.batches.values() {
        let material = assets.material(batch.material);
        let studded = material::has_studs(batch.material);

        for position in &batch.positions {
            let transform = Transform::from_translation(position.as_vec3());
            commands.spawn((
                PbrBundle {
                    mesh: assets.cube.clone(),
                    material: material.clone(),
                    transform,
                    ..default()
                },
                WorldBlock,
            ));
            if studded {
                commands.spawn((
                    PbrBundle {
                        mesh: assets.stud.clone(),
                        material: material.clone(),
                        transform,
                        ..default()
                    },
                    WorldBlock,
                ));
            }
        }
    }
}

/// Spawn lights, the follow camera and the character rig.
///
/// The agent spawns at the origin, standing on whatever surface the height
/// field puts there (the tree clear zone guarantees it is never inside a
/// trunk).
#[allow(clippy::needless_pass_by_value)]
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    field: Res<HeightField>,
    settings: Res<Settings>,
) {
    commands.spawn((
        DirectionalLightBundle {
            directional_light: DirectionalLight {
                illuminance: 9000.0,
                shadows_enabled: settings.graphics.shadows,
                ..default()
            },
            transform: Transform::from_rotation(Quat::from_euler(
                EulerRot::YXZ,
                -0.7,
                -0.9,
                0.0,
            )),
            ..default()
        },
        Sun,
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
    });

    let spawn_height = field.walk_height(0, 0) as f32 + SURFACE_OFFSET;
    let agent = Agent::at(Vec2::ZERO, spawn_height);
    let focus = agent.position();

    let follow = FollowCamera::default();
    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_translation(focus + follow.offset)
                .looking_at(focus, Vec3::Y),
            ..default()
        },
        follow,
        bevy_atmosphere::prelude::AtmosphereCamera::default(),
    ));

    spawn_agent_rig(&mut commands, &mut meshes, &mut materials, agent);
}

/// Build the brick-figure: legs, torso, head and a head stud, parented to
/// the entity that owns the `Agent` state. The rig's origin is at the feet
/// so the agent's vertical position is the surface it stands on.
fn spawn_agent_rig(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    agent: Agent,
) {
    let leg_mesh = meshes.add(Cuboid::new(0.22, 0.45, 0.26));
    let torso_mesh = meshes.add(Cuboid::new(0.56, 0.5, 0.3));
    let head_mesh = meshes.add(Cuboid::new(0.34, 0.32, 0.34));
    let head_stud_mesh = meshes.add(Cylinder::new(0.11, 0.1).mesh().resolution(8));

    let legs = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0x1e, 0x58, 0xc8),
        perceptual_roughness: 0.3,
        ..default()
    });
    let torso = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0xd3, 0x2f, 0x2f),
        perceptual_roughness: 0.3,
        ..default()
    });
    let head = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0xff, 0xd5, 0x4f),
        perceptual_roughness: 0.25,
        ..default()
    });

    let transform = Transform::from_translation(agent.position());
    commands
        .spawn((SpatialBundle::from_transform(transform), agent, AgentRig))
        .with_children(|rig| {
            for side in [-0.14f32, 0.14] {
                rig.spawn(PbrBundle {
                    mesh: leg_mesh.clone(),
                    material: legs.clone(),
                    transform: Transform::from_xyz(side, 0.225, 0.0),
                    ..default()
                });
            }
            rig.spawn(PbrBundle {
                mesh: torso_mesh,
                material: torso,
                transform: Transform::from_xyz(0.0, 0.7, 0.0),
                ..default()
            });
            rig.spawn(PbrBundle {
                mesh: head_mesh,
                material: head.clone(),
                transform: Transform::from_xyz(0.0, 1.11, 0.0),
                ..default()
            });
            rig.spawn(PbrBundle {
                mesh: head_stud_mesh,
                material: head,
                transform: Transform::from_xyz(0.0, 1.32, 0.0),
                ..default()
            });
        });
}
