//! World rebuild on settings reload.
//!
//! Batches are immutable once built; a change to the world or terrain
//! parameters throws the whole set away. This system reacts to the
//! settings resource changing (the hot-reload path), reconstructs the
//! height field and replaces every world-block entity with a fresh build.

use bevy::prelude::*;

use brickfield::material::BlockAssets;
use brickfield::settings::Settings;
use brickfield::terrain::HeightField;
use brickfield::world::build_world;

use crate::app::setup::{spawn_block_entities, WorldBlock};

/// Rebuild the height field and the world batches after a settings reload.
#[allow(clippy::needless_pass_by_value)]
pub fn rebuild_on_settings_change(
    mut commands: Commands,
    settings: Res<Settings>,
    mut field: ResMut<HeightField>,
    assets: Option<Res<BlockAssets>>,
    existing: Query<Entity, With<WorldBlock>>,
) {
    if !settings.is_changed() || settings.is_added() {
        return;
    }
    let Some(assets) = assets else {
        return;
    };

    *field = HeightField::new(&settings.terrain);
    for entity in &existing {
        commands.entity(entity).despawn();
    }

    let blocks = build_world(&settings.world, &field);
    info!(
        "settings changed: rebuilt world, {} blocks over {} columns",
        blocks.total_blocks(),
        blocks.stats.columns
    );
    spawn_block_entities(&mut commands, &blocks, &assets);
    commands.insert_resource(blocks);
}
